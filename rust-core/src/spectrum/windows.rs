//! Window function table for spectral analysis
//!
//! Symmetric windows taper each overlapped STFT frame; periodic windows
//! are used by the segment-based spectrogram so that consecutive
//! segments tile without a duplicated end sample.

use crate::error::AnalysisError;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    /// Raised cosine reaching zero at both ends
    #[default]
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    Blackman,

    /// Rectangular window (no tapering)
    Rectangular,
}

impl WindowType {
    /// Canonical lowercase name, as accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            WindowType::Hann => "hann",
            WindowType::Hamming => "hamming",
            WindowType::Blackman => "blackman",
            WindowType::Rectangular => "boxcar",
        }
    }

    /// Value of the window at phase `x` in [0, 1]
    fn value_at(&self, x: f64) -> f64 {
        let angle = 2.0 * PI * x;
        match self {
            WindowType::Hann => 0.5 - 0.5 * angle.cos(),
            WindowType::Hamming => 0.54 - 0.46 * angle.cos(),
            WindowType::Blackman => 0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos(),
            WindowType::Rectangular => 1.0,
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Ok(WindowType::Hann),
            "hamming" => Ok(WindowType::Hamming),
            "blackman" => Ok(WindowType::Blackman),
            "boxcar" | "rectangular" | "rect" | "none" => Ok(WindowType::Rectangular),
            other => Err(AnalysisError::UnknownWindow(other.to_string())),
        }
    }
}

/// Generate symmetric window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1, with w[0] == w[M-1]
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    match length {
        0 => return Vec::new(),
        1 => return vec![1.0],
        _ => {}
    }

    let denom = (length - 1) as f64;
    (0..length)
        .map(|n| window_type.value_at(n as f64 / denom))
        .collect()
}

/// Generate periodic window coefficients (DFT-even)
///
/// Equivalent to the first M samples of an M+1 point symmetric window.
pub fn generate_periodic_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length == 0 {
        return Vec::new();
    }
    let m = length as f64;
    (0..length)
        .map(|n| window_type.value_at(n as f64 / m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_length_windows_are_empty() {
        for window_type in [WindowType::Hann, WindowType::Hamming, WindowType::Blackman, WindowType::Rectangular] {
            assert!(generate_window(window_type, 0).is_empty());
            assert!(generate_periodic_window(window_type, 0).is_empty());
        }
    }

    #[test]
    fn test_window_generation() {
        let length = 161;

        let hann = generate_window(WindowType::Hann, length);
        let hamming = generate_window(WindowType::Hamming, length);
        let blackman = generate_window(WindowType::Blackman, length);

        assert_eq!(hann.len(), length);
        assert_eq!(hamming.len(), length);
        assert_eq!(blackman.len(), length);

        // Symmetric
        assert!((hann[0] - hann[length - 1]).abs() < 1e-10);
        assert!((hamming[0] - hamming[length - 1]).abs() < 1e-10);
        assert!((blackman[0] - blackman[length - 1]).abs() < 1e-10);

        let center = length / 2;
        assert!((hann[center] - 1.0).abs() < 1e-10);
        assert!((hamming[center] - 1.0).abs() < 1e-10);
        assert!((blackman[center] - 1.0).abs() < 1e-10);

        // Hann reaches zero, Hamming keeps a 0.08 pedestal
        assert!(hann[0].abs() < 1e-12);
        assert!(hamming[0] > 0.07 && hamming[0] < 0.09);
    }

    #[test]
    fn test_periodic_window() {
        let periodic = generate_periodic_window(WindowType::Hann, 8);
        let symmetric = generate_window(WindowType::Hann, 9);

        assert_eq!(periodic.len(), 8);
        for (p, s) in periodic.iter().zip(symmetric.iter()) {
            assert!((p - s).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_sample_window() {
        assert_eq!(generate_window(WindowType::Hann, 1), vec![1.0]);
    }

    #[test]
    fn test_rectangular_window() {
        let window = generate_window(WindowType::Rectangular, 100);
        assert_eq!(window.len(), 100);
        assert!(window.iter().all(|&w| w == 1.0));
    }

    #[test]
    fn test_parse_window_name() {
        assert_eq!("hann".parse::<WindowType>().unwrap(), WindowType::Hann);
        assert_eq!("Hanning".parse::<WindowType>().unwrap(), WindowType::Hann);
        assert_eq!("boxcar".parse::<WindowType>().unwrap(), WindowType::Rectangular);
        assert_eq!(
            WindowType::Blackman.name().parse::<WindowType>().unwrap(),
            WindowType::Blackman
        );
        assert!(matches!(
            "kaiser".parse::<WindowType>(),
            Err(AnalysisError::UnknownWindow(_))
        ));
    }
}
