//! Python bindings for single-frame spectral analysis

use pyo3::prelude::*;
use numpy::{Complex64, PyArray1, PyReadonlyArray1};
use crate::spectrum::{AnalyzerConfig, FrameSpectrum, SpectrumAnalyzer};
use super::window_bindings::PyWindowType;

type FrameArrays<'py> = (
    &'py PyArray1<Complex64>,
    &'py PyArray1<f64>,
    &'py PyArray1<f64>,
    &'py PyArray1<f64>,
);

fn to_arrays(py: Python<'_>, result: FrameSpectrum) -> FrameArrays<'_> {
    (
        PyArray1::from_vec(py, result.spectrum),
        PyArray1::from_vec(py, result.amplitude),
        PyArray1::from_vec(py, result.phase),
        PyArray1::from_vec(py, result.frequencies),
    )
}

/// Spectrum analyzer exposed to Python
#[pyclass(name = "SpectrumAnalyzer")]
pub struct PySpectrumAnalyzer {
    analyzer: SpectrumAnalyzer,
}

#[pymethods]
impl PySpectrumAnalyzer {
    /// Create a new spectrum analyzer
    ///
    /// Args:
    ///     db_reference: Decibel reference (<= 0 reports full-scale log power)
    ///     a_weighting: Add the A-weighting curve when db_reference > 0
    ///     window_type: Window applied before the DFT
    #[new]
    #[pyo3(signature = (db_reference=1.0, a_weighting=false, window_type=PyWindowType::Rectangular))]
    fn new(db_reference: f64, a_weighting: bool, window_type: PyWindowType) -> Self {
        let config = AnalyzerConfig {
            db_reference,
            a_weighting,
            window_type: window_type.into(),
            ..AnalyzerConfig::default()
        };

        Self {
            analyzer: SpectrumAnalyzer::new(config),
        }
    }

    /// Analyze one buffer
    ///
    /// Returns:
    ///     Tuple of (spectrum, amplitude, phase, frequencies) numpy arrays
    fn analyze<'py>(
        &mut self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f64>,
        sample_rate: u32,
    ) -> PyResult<FrameArrays<'py>> {
        let result = self.analyzer.analyze(signal.as_slice()?, sample_rate)?;
        Ok(to_arrays(py, result))
    }

    fn get_db_reference(&self) -> f64 {
        self.analyzer.config().db_reference
    }
}

/// Analyze one buffer
///
/// Returns:
///     Tuple of (spectrum, amplitude, phase, frequencies) numpy arrays
#[pyfunction]
#[pyo3(signature = (signal, sample_rate, db_reference=1.0, a_weighting=false))]
pub fn analyze_frame<'py>(
    py: Python<'py>,
    signal: PyReadonlyArray1<f64>,
    sample_rate: u32,
    db_reference: f64,
    a_weighting: bool,
) -> PyResult<FrameArrays<'py>> {
    let result = crate::spectrum::analyze_frame(signal.as_slice()?, sample_rate, db_reference, a_weighting)?;
    Ok(to_arrays(py, result))
}
