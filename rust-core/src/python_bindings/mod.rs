//! PyO3 bindings for Python integration
//!
//! Exposes the analysis core to a Python plotting layer as numpy arrays.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::AnalysisError;

mod window_bindings;
mod spectrum_bindings;
mod spectrogram_bindings;
#[cfg(feature = "pitch")]
mod pitch_bindings;

impl From<AnalysisError> for PyErr {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Fft(_) | AnalysisError::Pitch(_) | AnalysisError::Io(_) => {
                PyRuntimeError::new_err(err.to_string())
            }
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Python module definition
#[pymodule]
fn freq_domain(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<window_bindings::PyWindowType>()?;
    m.add_class::<spectrum_bindings::PySpectrumAnalyzer>()?;

    m.add_function(wrap_pyfunction!(spectrum_bindings::analyze_frame, m)?)?;
    m.add_function(wrap_pyfunction!(spectrogram_bindings::spectrogram, m)?)?;
    m.add_function(wrap_pyfunction!(spectrogram_bindings::overlap_frames, m)?)?;
    m.add_function(wrap_pyfunction!(spectrogram_bindings::stft, m)?)?;
    m.add_function(wrap_pyfunction!(spectrogram_bindings::fft_average, m)?)?;
    #[cfg(feature = "pitch")]
    m.add_function(wrap_pyfunction!(pitch_bindings::fundamental_frequency, m)?)?;

    Ok(())
}
