//! Spectral analysis with FFT

pub mod windows;
pub mod windowing;
pub mod fft;
pub mod normalize;
pub mod level;
pub mod analysis;
pub mod spectrogram;

pub use windows::{generate_periodic_window, generate_window, WindowType};
pub use windowing::{apply_window, window_correction_factor, FrameSet, WindowedFrames};
pub use fft::{fftfreq, linspace, ComplexFft, FftEngine};
pub use normalize::{dft_normalize, exclude_negative_frequencies, NormalizedSpectrum};
pub use level::{a_weighting, a_weighting_curve, decibel, full_scale, LevelScale};
pub use analysis::{analyze_frame, AnalyzerConfig, FrameSpectrum, SpectrumAnalyzer};
pub use spectrogram::{fft_average, spectrogram, stft, AveragedSpectrum, Spectrogram, SpectrogramConfig};
