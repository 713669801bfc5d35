//! Frequency-domain analysis core for audio visualization
//!
//! Spectra, spectrograms, averaged spectra and fundamental-frequency
//! tracks computed from single-channel sample buffers. Plotting and
//! capture live outside this crate; it only produces numeric arrays.
//!
//! Shape and progress reporting goes through the `log` facade and is
//! silent unless the caller installs a logger.

#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod error;
pub mod spectrum;
pub mod prompt;
#[cfg(feature = "pitch")]
pub mod pitch;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use error::{AnalysisError, Result};
pub use spectrum::{
    AnalyzerConfig, FrameSet, LevelScale, Spectrogram, SpectrogramConfig, SpectrumAnalyzer,
    WindowType,
};
