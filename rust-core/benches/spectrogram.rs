use criterion::{black_box, criterion_group, criterion_main, Criterion};
use freq_domain::spectrum::{analyze_frame, spectrogram, stft, FrameSet, SpectrogramConfig, WindowType};
use std::f64::consts::PI;

fn signal(len: usize, sample_rate: u32) -> Vec<f64> {
    (0..len)
        .map(|n| {
            let t = n as f64 / sample_rate as f64;
            0.6 * (2.0 * PI * 440.0 * t).sin() + 0.3 * (2.0 * PI * 1320.0 * t).sin()
        })
        .collect()
}

fn bench_frame(c: &mut Criterion) {
    let samples = signal(1024, 44100);
    c.bench_function("analyze_frame_1024", |b| {
        b.iter(|| analyze_frame(black_box(&samples), 44100, 1.0, true))
    });
}

fn bench_spectrogram(c: &mut Criterion) {
    let samples = signal(44100, 44100);
    let config = SpectrogramConfig {
        frame_size: 1024,
        overlap: 75.0,
        a_weighting: true,
        ..SpectrogramConfig::default()
    };

    c.bench_function("spectrogram_1s", |b| {
        b.iter(|| spectrogram(black_box(&samples), 44100, &config))
    });

    c.bench_function("stft_1s", |b| {
        b.iter(|| {
            let frames = FrameSet::overlap(black_box(&samples), 44100, 1024, 75.0)?
                .apply_window(WindowType::Hann)?;
            stft(&frames, 44100, config.level_scale())
        })
    });
}

criterion_group!(benches, bench_frame, bench_spectrogram);
criterion_main!(benches);
