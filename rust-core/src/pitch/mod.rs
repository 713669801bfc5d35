//! Fundamental frequency extraction

pub mod tracker;

pub use tracker::AutocorrelationTracker;

use crate::error::{AnalysisError, Result};

/// f0 value per analysis frame with its time axis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct F0Track {
    /// Fundamental frequency in Hz, 0.0 for unvoiced frames
    pub f0: Vec<f64>,

    /// Frame times in seconds
    pub times: Vec<f64>,
}

impl F0Track {
    pub fn len(&self) -> usize {
        self.f0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.f0.is_empty()
    }

    /// (time, f0) pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.f0.iter().copied())
    }
}

/// Pitch detection algorithm: a raw estimate followed by a refinement pass
pub trait PitchDetector {
    /// Raw f0 per frame, frames spaced `frame_period_ms` apart from t = 0
    fn estimate(&self, samples: &[f64], sample_rate: u32, frame_period_ms: f64) -> Result<F0Track>;

    /// Refine a raw f0 sequence at the given frame times
    fn refine(
        &self,
        samples: &[f64],
        sample_rate: u32,
        f0: &[f64],
        times: &[f64],
    ) -> Result<Vec<f64>>;
}

/// Frame period used for f0 extraction: 20 sampling periods, in milliseconds
pub fn frame_period_ms(sample_rate: u32) -> f64 {
    1000.0 / sample_rate as f64 * 20.0
}

/// Extract the refined f0 track of a buffer
///
/// Detector errors are returned as-is; nothing is retried.
pub fn fundamental_frequency<D: PitchDetector + ?Sized>(
    detector: &D,
    samples: &[f64],
    sample_rate: u32,
) -> Result<F0Track> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidSampleRate);
    }

    let period = frame_period_ms(sample_rate);
    let raw = detector.estimate(samples, sample_rate, period)?;
    let f0 = detector.refine(samples, sample_rate, &raw.f0, &raw.times)?;

    log::debug!(
        "f0: {} frames at {:.4} ms, {} voiced",
        f0.len(),
        period,
        f0.iter().filter(|&&f| f > 0.0).count()
    );

    Ok(F0Track {
        f0,
        times: raw.times,
    })
}
