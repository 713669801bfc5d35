//! Window selector exposed to Python

use pyo3::prelude::*;
use crate::spectrum::WindowType;

/// Window type enum exposed to Python
#[pyclass(name = "WindowType")]
#[derive(Clone, Copy)]
pub enum PyWindowType {
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

#[pymethods]
impl PyWindowType {
    /// Parse a window name such as "hann" or "boxcar"
    #[staticmethod]
    fn from_name(name: &str) -> PyResult<Self> {
        let window: WindowType = name.parse()?;
        Ok(window.into())
    }

    fn name(&self) -> &'static str {
        WindowType::from(*self).name()
    }
}

impl From<PyWindowType> for WindowType {
    fn from(py_win: PyWindowType) -> Self {
        match py_win {
            PyWindowType::Hann => WindowType::Hann,
            PyWindowType::Hamming => WindowType::Hamming,
            PyWindowType::Blackman => WindowType::Blackman,
            PyWindowType::Rectangular => WindowType::Rectangular,
        }
    }
}

impl From<WindowType> for PyWindowType {
    fn from(win: WindowType) -> Self {
        match win {
            WindowType::Hann => PyWindowType::Hann,
            WindowType::Hamming => PyWindowType::Hamming,
            WindowType::Blackman => PyWindowType::Blackman,
            WindowType::Rectangular => PyWindowType::Rectangular,
        }
    }
}
