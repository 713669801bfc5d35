//! Single-frame spectral analysis
//!
//! Combines the DFT, single-sided normalization and level conversion into
//! one spectrum per buffer.

use super::fft::{fftfreq, ComplexFft};
use super::level::LevelScale;
use super::normalize::{dft_normalize, exclude_negative_frequencies};
use super::windowing::{apply_window, window_correction_factor};
use super::windows::WindowType;
use crate::error::{AnalysisError, Result};
use num_complex::Complex;

/// Spectrum analyzer configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Decibel reference; zero or below reports full-scale log power
    pub db_reference: f64,

    /// Add the A-weighting curve (only when `db_reference > 0`)
    pub a_weighting: bool,

    /// Window applied to the buffer before the DFT
    pub window_type: WindowType,

    /// Apply amplitude correction for windowing
    pub apply_correction: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            db_reference: 1.0,
            a_weighting: false,
            window_type: WindowType::Rectangular,
            apply_correction: true,
        }
    }
}

impl AnalyzerConfig {
    pub fn level_scale(&self) -> LevelScale {
        LevelScale::new(self.db_reference, self.a_weighting)
    }
}

/// Spectrum of one buffer
#[derive(Debug, Clone, Default)]
pub struct FrameSpectrum {
    /// Normalized single-sided complex spectrum
    pub spectrum: Vec<Complex<f64>>,

    /// Amplitude on the configured level scale
    pub amplitude: Vec<f64>,

    /// Phase in degrees
    pub phase: Vec<f64>,

    /// Frequency of each bin in Hz
    pub frequencies: Vec<f64>,
}

/// Single-buffer spectrum analyzer
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft: ComplexFft,
}

impl SpectrumAnalyzer {
    /// Create new spectrum analyzer
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            fft: ComplexFft::new(),
        }
    }

    /// Analyze one buffer
    ///
    /// # Arguments
    /// * `signal` - Time-domain samples, the DFT length is the buffer length
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Returns
    /// Normalized spectrum, amplitude, phase and frequency axis of equal length
    pub fn analyze(&mut self, signal: &[f64], sample_rate: u32) -> Result<FrameSpectrum> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate);
        }
        let n = signal.len();

        let (spectrum_data, correction) = if self.config.window_type == WindowType::Rectangular {
            (self.fft.forward(signal, n), 1.0)
        } else {
            let windowed = apply_window(signal, self.config.window_type);
            let correction = if self.config.apply_correction && n > 0 {
                window_correction_factor(self.config.window_type, n)?
            } else {
                1.0
            };
            (self.fft.forward(&windowed, n), correction)
        };

        let normalized = dft_normalize(&spectrum_data);
        let frequencies = exclude_negative_frequencies(&fftfreq(n, 1.0 / sample_rate as f64));

        let mut amplitude = normalized.amplitude;
        if correction != 1.0 {
            for a in amplitude.iter_mut() {
                *a *= correction;
            }
        }
        self.config.level_scale().apply(&mut amplitude, &frequencies);

        log::trace!(
            "analyzed {} samples into {} bins ({:?})",
            n,
            frequencies.len(),
            self.config.level_scale()
        );

        Ok(FrameSpectrum {
            spectrum: normalized.spectrum,
            amplitude,
            phase: normalized.phase,
            frequencies,
        })
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

/// Analyze one buffer with a one-off analyzer
pub fn analyze_frame(
    signal: &[f64],
    sample_rate: u32,
    db_reference: f64,
    a_weighting: bool,
) -> Result<FrameSpectrum> {
    SpectrumAnalyzer::new(AnalyzerConfig {
        db_reference,
        a_weighting,
        ..AnalyzerConfig::default()
    })
    .analyze(signal, sample_rate)
}
