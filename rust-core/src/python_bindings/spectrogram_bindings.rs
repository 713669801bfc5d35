//! Python bindings for spectrograms and averaged spectra

use pyo3::prelude::*;
use numpy::{PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use crate::spectrum::{self, FrameSet, LevelScale, Spectrogram, SpectrogramConfig, WindowedFrames};
use super::window_bindings::PyWindowType;

type SpectrogramArrays<'py> = (&'py PyArray1<f64>, &'py PyArray1<f64>, &'py PyArray2<f64>);

fn to_arrays(py: Python<'_>, result: Spectrogram) -> SpectrogramArrays<'_> {
    (
        PyArray1::from_vec(py, result.frequencies),
        PyArray1::from_vec(py, result.times),
        PyArray2::from_owned_array(py, result.values),
    )
}

fn windowed_from_numpy(
    frames: &PyReadonlyArray2<f64>,
    final_time: f64,
    window_type: PyWindowType,
) -> PyResult<WindowedFrames> {
    let rows = frames
        .as_array()
        .rows()
        .into_iter()
        .map(|row| row.to_vec())
        .collect();
    Ok(FrameSet::from_frames(rows, final_time)?.apply_window(window_type.into())?)
}

/// Segment-based magnitude spectrogram
///
/// Returns:
///     Tuple of (frequencies, times, spectrogram[frequency, time])
#[pyfunction]
#[pyo3(signature = (
    samples,
    sample_rate,
    frame_size=1024,
    overlap=75.0,
    window_type=PyWindowType::Hann,
    db_reference=1.0,
    a_weighting=false,
    fft_size=None
))]
#[allow(clippy::too_many_arguments)]
pub fn spectrogram<'py>(
    py: Python<'py>,
    samples: PyReadonlyArray1<f64>,
    sample_rate: u32,
    frame_size: usize,
    overlap: f64,
    window_type: PyWindowType,
    db_reference: f64,
    a_weighting: bool,
    fft_size: Option<usize>,
) -> PyResult<SpectrogramArrays<'py>> {
    let config = SpectrogramConfig {
        frame_size,
        overlap,
        window_type: window_type.into(),
        fft_size,
        db_reference,
        a_weighting,
    };
    let result = spectrum::spectrogram(samples.as_slice()?, sample_rate, &config)?;
    Ok(to_arrays(py, result))
}

/// Cut a recording into overlapping frames
///
/// Returns:
///     Tuple of (frames[frame, sample], final_time)
#[pyfunction]
pub fn overlap_frames<'py>(
    py: Python<'py>,
    samples: PyReadonlyArray1<f64>,
    sample_rate: u32,
    frame_size: usize,
    overlap: f64,
) -> PyResult<(&'py PyArray2<f64>, f64)> {
    let frames = FrameSet::overlap(samples.as_slice()?, sample_rate, frame_size, overlap)?;
    let array = PyArray2::from_vec2(py, frames.frames())
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
    Ok((array, frames.final_time()))
}

/// From-scratch STFT over overlapped frames
///
/// The frames are windowed here and corrected by the window's ACF.
///
/// Returns:
///     Tuple of (frequencies, times, spectrogram[frequency, time])
#[pyfunction]
#[pyo3(signature = (frames, sample_rate, final_time, window_type=PyWindowType::Hann, db_reference=1.0, a_weighting=false))]
pub fn stft<'py>(
    py: Python<'py>,
    frames: PyReadonlyArray2<f64>,
    sample_rate: u32,
    final_time: f64,
    window_type: PyWindowType,
    db_reference: f64,
    a_weighting: bool,
) -> PyResult<SpectrogramArrays<'py>> {
    let windowed = windowed_from_numpy(&frames, final_time, window_type)?;
    let result = spectrum::stft(&windowed, sample_rate, LevelScale::new(db_reference, a_weighting))?;
    Ok(to_arrays(py, result))
}

/// RMS-averaged FFT over overlapped frames
///
/// Returns:
///     Tuple of (per_frame[frame, frequency], mean, frequencies)
#[pyfunction]
#[pyo3(signature = (frames, sample_rate, window_type=PyWindowType::Hann, db_reference=1.0, a_weighting=false))]
pub fn fft_average<'py>(
    py: Python<'py>,
    frames: PyReadonlyArray2<f64>,
    sample_rate: u32,
    window_type: PyWindowType,
    db_reference: f64,
    a_weighting: bool,
) -> PyResult<(&'py PyArray2<f64>, &'py PyArray1<f64>, &'py PyArray1<f64>)> {
    let windowed = windowed_from_numpy(&frames, 0.0, window_type)?;
    let result = spectrum::fft_average(&windowed, sample_rate, LevelScale::new(db_reference, a_weighting))?;
    Ok((
        PyArray2::from_owned_array(py, result.frames),
        PyArray1::from_vec(py, result.mean),
        PyArray1::from_vec(py, result.frequencies),
    ))
}
