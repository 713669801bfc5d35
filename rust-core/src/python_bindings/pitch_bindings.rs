//! Python bindings for fundamental-frequency extraction

use pyo3::prelude::*;
use numpy::{PyArray1, PyReadonlyArray1};
use crate::pitch::{self, AutocorrelationTracker};

/// Refined f0 track of a buffer
///
/// Returns:
///     Tuple of (f0, times); unvoiced frames are 0.0
#[pyfunction]
#[pyo3(signature = (samples, sample_rate, f0_floor=71.0, f0_ceil=800.0))]
pub fn fundamental_frequency<'py>(
    py: Python<'py>,
    samples: PyReadonlyArray1<f64>,
    sample_rate: u32,
    f0_floor: f64,
    f0_ceil: f64,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>)> {
    let tracker = AutocorrelationTracker {
        f0_floor,
        f0_ceil,
        ..AutocorrelationTracker::default()
    };
    let track = pitch::fundamental_frequency(&tracker, samples.as_slice()?, sample_rate)?;
    Ok((PyArray1::from_vec(py, track.f0), PyArray1::from_vec(py, track.times)))
}
