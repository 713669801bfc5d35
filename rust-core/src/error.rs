//! Error types for the analysis core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Frame size must be positive")]
    InvalidFrameSize,

    #[error("Overlap rate must be in [0, 100) percent (got {0})")]
    InvalidOverlap(f64),

    #[error("Sample rate must be positive")]
    InvalidSampleRate,

    #[error("FFT length {fft_size} is shorter than frame size {frame_size}")]
    FftTooShort { fft_size: usize, frame_size: usize },

    #[error("Input has {len} samples, at least {required} required")]
    InputTooShort { len: usize, required: usize },

    #[error("Window length must be non-zero")]
    EmptyWindow,

    #[error("Window has {window} samples but frame has {frame}")]
    WindowLengthMismatch { window: usize, frame: usize },

    #[error("Unknown window function: {0}")]
    UnknownWindow(String),

    #[error("FFT failed: {0}")]
    Fft(String),

    #[error("Pitch detection failed: {0}")]
    Pitch(String),

    #[error("Failed to read selection: {0}")]
    Io(#[from] std::io::Error),

    #[error("No valid selection after {attempts} attempts")]
    NoValidSelection { attempts: usize },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
