//! Time-frequency analysis
//!
//! Two interchangeable spectrogram implementations produce the same
//! frequency axis for the same frame size:
//!
//! * [`spectrogram`]: segment-based magnitude spectrogram on a planned real
//!   FFT (constant detrend, periodic window, spectrum scaling).
//! * [`stft`]: from-scratch framed FFT over frames that were already cut
//!   and windowed by [`FrameSet`](super::windowing::FrameSet), corrected
//!   by the window's ACF.
//!
//! Both zero-pad every frame to `2 * frame_size` points and keep the
//! non-DC, non-Nyquist single-sided bins.
//!
//! [`fft_average`] is the coarse alternative: one RMS-averaged spectrum
//! over all frames instead of a time-resolved matrix.

use super::fft::{fftfreq, linspace, ComplexFft, FftEngine};
use super::level::{a_weighting_curve, LevelScale};
use super::normalize::{dft_normalize_amplitude, exclude_negative_frequencies};
use super::windowing::WindowedFrames;
use super::windows::{generate_periodic_window, WindowType};
use crate::error::{AnalysisError, Result};
use ndarray::{Array2, Axis};

/// Spectrogram configuration
#[derive(Debug, Clone)]
pub struct SpectrogramConfig {
    /// Samples per STFT frame
    pub frame_size: usize,

    /// Overlap between consecutive frames in percent, [0, 100)
    pub overlap: f64,

    /// Window applied to each frame
    pub window_type: WindowType,

    /// FFT length; `None` uses `2 * frame_size`
    pub fft_size: Option<usize>,

    /// Decibel reference; zero or below reports full-scale log power
    pub db_reference: f64,

    /// Add the A-weighting curve (only when `db_reference > 0`)
    pub a_weighting: bool,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            frame_size: 1024,
            overlap: 75.0,
            window_type: WindowType::Hann,
            fft_size: None,
            db_reference: 1.0,
            a_weighting: false,
        }
    }
}

impl SpectrogramConfig {
    /// Check frame size, overlap and FFT length
    pub fn validate(&self) -> Result<()> {
        if self.frame_size == 0 {
            return Err(AnalysisError::InvalidFrameSize);
        }
        if !(0.0..100.0).contains(&self.overlap) {
            return Err(AnalysisError::InvalidOverlap(self.overlap));
        }
        let fft_size = self.fft_len();
        if fft_size < self.frame_size {
            return Err(AnalysisError::FftTooShort {
                fft_size,
                frame_size: self.frame_size,
            });
        }
        Ok(())
    }

    /// Effective FFT length
    pub fn fft_len(&self) -> usize {
        self.fft_size.unwrap_or(2 * self.frame_size)
    }

    /// Samples shared by consecutive segments
    pub fn overlap_samples(&self) -> usize {
        (self.frame_size as f64 * (self.overlap / 100.0)) as usize
    }

    pub fn level_scale(&self) -> LevelScale {
        LevelScale::new(self.db_reference, self.a_weighting)
    }
}

/// Frequency x time amplitude matrix with its axes
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Frequency of each row in Hz
    pub frequencies: Vec<f64>,

    /// Time of each column in seconds
    pub times: Vec<f64>,

    /// Amplitude, shape (frequencies.len(), times.len())
    pub values: Array2<f64>,
}

impl Spectrogram {
    /// (frequency bins, time frames)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Frequency spacing between adjacent rows in Hz
    pub fn bin_spacing(&self) -> Option<f64> {
        match self.frequencies.as_slice() {
            [first, second, ..] => Some(second - first),
            _ => None,
        }
    }
}

/// Segment-based magnitude spectrogram
///
/// Each segment of `frame_size` samples has its mean removed, is multiplied
/// by the periodic window and transformed with `fft_len()` points. Values
/// are `|X[k]| / sum(window)`, then converted to the configured level scale
/// with A-weighting broadcast across every time column.
pub fn spectrogram(
    samples: &[f64],
    sample_rate: u32,
    config: &SpectrogramConfig,
) -> Result<Spectrogram> {
    config.validate()?;
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidSampleRate);
    }

    let frame_size = config.frame_size;
    if samples.len() < frame_size {
        return Err(AnalysisError::InputTooShort {
            len: samples.len(),
            required: frame_size,
        });
    }

    let fft_size = config.fft_len();
    let noverlap = config.overlap_samples();
    let step = frame_size - noverlap;
    let segments = (samples.len() - noverlap) / step;

    let window = generate_periodic_window(config.window_type, frame_size);
    let scale = 1.0 / window.iter().sum::<f64>();

    let frequencies = exclude_negative_frequencies(&fftfreq(fft_size, 1.0 / sample_rate as f64));
    let bins = frequencies.len();
    let times: Vec<f64> = (0..segments)
        .map(|i| (frame_size as f64 / 2.0 + (i * step) as f64) / sample_rate as f64)
        .collect();

    let mut engine = FftEngine::new(fft_size);
    let mut segment = vec![0.0; frame_size];
    let mut values = Array2::<f64>::zeros((bins, segments));

    for (i, mut column) in values.axis_iter_mut(Axis(1)).enumerate() {
        let start = i * step;
        let source = &samples[start..start + frame_size];
        let mean = source.iter().sum::<f64>() / frame_size as f64;

        for ((dst, &s), &w) in segment.iter_mut().zip(source).zip(&window) {
            *dst = (s - mean) * w;
        }

        let spectrum = engine.compute(&segment)?;
        for (dst, x) in column.iter_mut().zip(&spectrum[1..]) {
            *dst = x.norm() * scale;
        }
    }

    log::debug!(
        "spectrogram: {} segments x {} bins (fft {}, step {}, window {})",
        segments,
        bins,
        fft_size,
        step,
        config.window_type
    );

    config.level_scale().apply_columns(&mut values, &frequencies);

    Ok(Spectrogram {
        frequencies,
        times,
        values,
    })
}

/// From-scratch STFT over pre-windowed frames
///
/// Every frame is transformed with `2 * frame_size` points, normalized to
/// the single-sided spectrum and multiplied by the ACF. The time axis runs
/// from zero to the end of the last frame.
pub fn stft(frames: &WindowedFrames, sample_rate: u32, level: LevelScale) -> Result<Spectrogram> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidSampleRate);
    }
    let frame_size = frames.frame_size();
    if frame_size == 0 {
        return Err(AnalysisError::InvalidFrameSize);
    }

    let fft_size = 2 * frame_size;
    let frequencies = exclude_negative_frequencies(&fftfreq(fft_size, 1.0 / sample_rate as f64));
    let times = linspace(0.0, frames.final_time(), frames.len());
    let bins = frequencies.len();
    let acf = frames.acf();

    let mut fft = ComplexFft::new();
    let mut values = Array2::<f64>::zeros((frames.len(), bins));

    for (mut row, frame) in values.axis_iter_mut(Axis(0)).zip(frames.frames()) {
        let amplitude = dft_normalize_amplitude(&fft.forward(frame, fft_size));
        for (dst, a) in row.iter_mut().zip(amplitude) {
            *dst = level.convert(a * acf);
        }
    }

    if level.is_weighted() {
        let curve = a_weighting_curve(&frequencies);
        for mut row in values.axis_iter_mut(Axis(0)) {
            for (a, w) in row.iter_mut().zip(&curve) {
                *a += w;
            }
        }
    }

    log::debug!(
        "stft: {} frames x {} bins (fft {}, acf {:.4}, final time {:.4} s)",
        frames.len(),
        bins,
        fft_size,
        acf,
        frames.final_time()
    );

    Ok(Spectrogram {
        frequencies,
        times,
        values: values.reversed_axes(),
    })
}

/// Per-frame spectra and their RMS average
#[derive(Debug, Clone)]
pub struct AveragedSpectrum {
    /// Per-frame amplitude, shape (frames, frequencies.len())
    pub frames: Array2<f64>,

    /// RMS of the linear amplitudes across frames, then level-converted
    pub mean: Vec<f64>,

    /// Linear frequency axis from 0 to the sample rate
    pub frequencies: Vec<f64>,
}

/// Averaged FFT over pre-windowed frames
///
/// Each frame contributes `acf * |FFT(frame)| / (N/2)` over all N bins. The
/// frequency axis spans `[0, sample_rate]` in N evenly spaced points.
pub fn fft_average(
    frames: &WindowedFrames,
    sample_rate: u32,
    level: LevelScale,
) -> Result<AveragedSpectrum> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidSampleRate);
    }
    let n = frames.frame_size();
    if n == 0 {
        return Err(AnalysisError::InvalidFrameSize);
    }

    let frequencies = linspace(0.0, sample_rate as f64, n);
    let scale = frames.acf() / (n as f64 / 2.0);

    let mut fft = ComplexFft::new();
    let mut values = Array2::<f64>::zeros((frames.len(), n));
    for (mut row, frame) in values.axis_iter_mut(Axis(0)).zip(frames.frames()) {
        for (dst, x) in row.iter_mut().zip(fft.forward(frame, n)) {
            *dst = x.norm() * scale;
        }
    }

    let count = frames.len() as f64;
    let mut mean: Vec<f64> = values
        .axis_iter(Axis(1))
        .map(|column| (column.iter().map(|a| a * a).sum::<f64>() / count).sqrt())
        .collect();

    level.apply(&mut mean, &frequencies);
    for mut row in values.axis_iter_mut(Axis(0)) {
        if let Some(slice) = row.as_slice_mut() {
            level.apply(slice, &frequencies);
        }
    }

    log::debug!("fft average: {} frames x {} bins", frames.len(), n);

    Ok(AveragedSpectrum {
        frames: values,
        mean,
        frequencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::windowing::FrameSet;
    use std::f64::consts::PI;

    fn sine(freq_hz: f64, sample_rate: u32, len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| (2.0 * PI * freq_hz * n as f64 / sample_rate as f64).sin())
            .collect()
    }

    fn linear_config(frame_size: usize, overlap: f64) -> SpectrogramConfig {
        SpectrogramConfig {
            frame_size,
            overlap,
            db_reference: 0.0,
            ..SpectrogramConfig::default()
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(SpectrogramConfig::default().validate().is_ok());
        assert!(matches!(
            linear_config(0, 50.0).validate(),
            Err(AnalysisError::InvalidFrameSize)
        ));
        assert!(matches!(
            linear_config(256, 100.0).validate(),
            Err(AnalysisError::InvalidOverlap(_))
        ));
        let short_fft = SpectrogramConfig {
            fft_size: Some(128),
            ..linear_config(256, 50.0)
        };
        assert!(matches!(
            short_fft.validate(),
            Err(AnalysisError::FftTooShort { fft_size: 128, frame_size: 256 })
        ));
    }

    #[test]
    fn test_overlap_samples_truncates_fraction() {
        // 0.29 * 100 is just below 29 in floating point
        assert_eq!(linear_config(100, 29.0).overlap_samples(), 28);
        assert_eq!(linear_config(256, 50.0).overlap_samples(), 128);
        assert_eq!(linear_config(1024, 75.0).overlap_samples(), 768);
        assert_eq!(linear_config(64, 0.0).overlap_samples(), 0);
    }

    #[test]
    fn test_spectrogram_shape_and_axes() {
        let samples = sine(1000.0, 8000, 4000);
        let result = spectrogram(&samples, 8000, &linear_config(256, 50.0)).unwrap();

        // noverlap 128, step 128: (4000 - 128) / 128 = 30 segments
        assert_eq!(result.shape(), (255, 30));
        assert_eq!(result.frequencies.len(), 255);
        assert_eq!(result.times.len(), 30);
        assert!((result.times[0] - 128.0 / 8000.0).abs() < 1e-12);
        assert!((result.times[1] - result.times[0] - 128.0 / 8000.0).abs() < 1e-12);
        assert!((result.bin_spacing().unwrap() - 8000.0 / 512.0).abs() < 1e-9);
    }

    #[test]
    fn test_spectrogram_rejects_short_input() {
        assert!(matches!(
            spectrogram(&[0.0; 100], 8000, &linear_config(256, 50.0)),
            Err(AnalysisError::InputTooShort { len: 100, required: 256 })
        ));
    }

    #[test]
    fn test_spectrogram_peak_tracks_tone() {
        let samples = sine(1000.0, 8000, 4000);
        let result = spectrogram(&samples, 8000, &linear_config(256, 50.0)).unwrap();

        for column in result.values.columns() {
            let (idx, _) = column
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
                .unwrap();
            assert!((result.frequencies[idx] - 1000.0).abs() < 8000.0 / 512.0);
        }
    }

    #[test]
    fn test_stft_matches_spectrogram_axis() {
        let samples = sine(1000.0, 8000, 4000);
        let config = linear_config(256, 50.0);
        let library = spectrogram(&samples, 8000, &config).unwrap();

        let frames = FrameSet::overlap(&samples, 8000, 256, 50.0)
            .unwrap()
            .apply_window(WindowType::Hann)
            .unwrap();
        let scratch = stft(&frames, 8000, config.level_scale()).unwrap();

        assert_eq!(scratch.frequencies.len(), library.frequencies.len());
        for (a, b) in scratch.frequencies.iter().zip(&library.frequencies) {
            assert!((a - b).abs() < 1e-9);
        }
        assert_eq!(scratch.shape(), (255, frames.len()));
        assert_eq!(scratch.times.len(), frames.len());
        assert!((scratch.times.last().unwrap() - frames.final_time()).abs() < 1e-12);
    }

    #[test]
    fn test_stft_and_spectrogram_agree_on_tone_level() {
        // Bin-centred tone: 1000 Hz lands on bin 64 of a 512-point FFT
        let samples = sine(1000.0, 8000, 4096);
        let config = linear_config(256, 50.0);
        let library = spectrogram(&samples, 8000, &config).unwrap();
        let frames = FrameSet::overlap(&samples, 8000, 256, 50.0)
            .unwrap()
            .apply_window(WindowType::Hann)
            .unwrap();
        let scratch = stft(&frames, 8000, config.level_scale()).unwrap();

        let row = 63;
        let lib_level = library.values[[row, 0]];
        let scratch_level = scratch.values[[row, 0]];
        // Both report half the tone amplitude (-6 dBFS) within window differences
        assert!((lib_level + 6.02).abs() < 0.5, "library {lib_level}");
        assert!((scratch_level + 6.02).abs() < 0.5, "scratch {scratch_level}");
    }

    #[test]
    fn test_stft_weighting_only_when_active() {
        let samples = sine(440.0, 8000, 2048);
        let frames = FrameSet::overlap(&samples, 8000, 128, 50.0)
            .unwrap()
            .apply_window(WindowType::Hann)
            .unwrap();

        let plain = stft(&frames, 8000, LevelScale::new(1.0, false)).unwrap();
        let weighted = stft(&frames, 8000, LevelScale::new(1.0, true)).unwrap();
        let ignored = stft(&frames, 8000, LevelScale::new(0.0, true)).unwrap();
        let full_scale = stft(&frames, 8000, LevelScale::FullScale).unwrap();

        assert_eq!(ignored.values, full_scale.values);
        let curve = a_weighting_curve(&plain.frequencies);
        let diff = weighted.values[[10, 3]] - plain.values[[10, 3]];
        assert!((diff - curve[10]).abs() < 1e-9);
    }

    #[test]
    fn test_fft_average_rms() {
        let samples = sine(1000.0, 8000, 2048);
        let frames = FrameSet::overlap(&samples, 8000, 64, 50.0)
            .unwrap()
            .apply_window(WindowType::Rectangular)
            .unwrap();
        let averaged = fft_average(&frames, 8000, LevelScale::FullScale).unwrap();

        assert_eq!(averaged.frequencies.len(), 64);
        assert_eq!(averaged.mean.len(), 64);
        assert_eq!(averaged.frames.dim(), (frames.len(), 64));
        assert_eq!(averaged.frequencies[0], 0.0);
        assert!((averaged.frequencies.last().unwrap() - 8000.0).abs() < 1e-9);
        // 1000 Hz is bin 8 of a 64-point FFT at 8 kHz; unit amplitude is 0 dBFS
        assert!(averaged.mean[8].abs() < 1e-9);
    }
}
