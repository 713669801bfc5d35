//! Autocorrelation pitch tracker with instantaneous-frequency refinement

use super::{F0Track, PitchDetector};
use crate::error::{AnalysisError, Result};
use crate::spectrum::windows::{generate_window, WindowType};
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

/// Normalized-autocorrelation f0 estimator
#[derive(Debug, Clone)]
pub struct AutocorrelationTracker {
    /// Lowest detectable f0 in Hz
    pub f0_floor: f64,

    /// Highest detectable f0 in Hz
    pub f0_ceil: f64,

    /// Minimum normalized autocorrelation for a voiced frame
    pub voicing_threshold: f64,
}

impl Default for AutocorrelationTracker {
    fn default() -> Self {
        Self {
            f0_floor: 71.0,
            f0_ceil: 800.0,
            voicing_threshold: 0.5,
        }
    }
}

/// Refined values further than this fraction from the raw f0 are discarded
const MAX_REFINE_DEVIATION: f64 = 0.2;

/// Candidate peaks within this fraction of the best correlation win on lag
const PEAK_TOLERANCE: f64 = 0.9;

impl AutocorrelationTracker {
    fn validate(&self, samples: &[f64], sample_rate: u32) -> Result<()> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate);
        }
        if samples.is_empty() {
            return Err(AnalysisError::Pitch("empty signal".into()));
        }
        if !(self.f0_floor > 0.0 && self.f0_floor < self.f0_ceil) {
            return Err(AnalysisError::Pitch(format!(
                "invalid f0 range {}..{} Hz",
                self.f0_floor, self.f0_ceil
            )));
        }
        if self.f0_ceil >= sample_rate as f64 / 2.0 {
            return Err(AnalysisError::Pitch(format!(
                "f0 ceiling {} Hz is above Nyquist",
                self.f0_ceil
            )));
        }
        Ok(())
    }
}

impl PitchDetector for AutocorrelationTracker {
    fn estimate(&self, samples: &[f64], sample_rate: u32, frame_period_ms: f64) -> Result<F0Track> {
        self.validate(samples, sample_rate)?;
        if frame_period_ms <= 0.0 {
            return Err(AnalysisError::Pitch("frame period must be positive".into()));
        }

        let fs = sample_rate as f64;
        let duration_ms = samples.len() as f64 / fs * 1000.0;
        let frames = (duration_ms / frame_period_ms + 1e-9).floor() as usize + 1;
        let times: Vec<f64> = (0..frames)
            .map(|i| i as f64 * frame_period_ms / 1000.0)
            .collect();

        let window = (3.0 * fs / self.f0_floor).ceil() as usize;
        let min_lag = ((fs / self.f0_ceil).floor() as usize).max(2);
        let max_lag = (fs / self.f0_floor).ceil() as usize;

        let mut correlator = Correlator::new(window, max_lag);
        let f0 = times
            .iter()
            .map(|&t| {
                let center = (t * fs).round() as isize;
                let start = center - (window / 2) as isize;
                let r = correlator.normalized(samples, start);
                pick_lag(r, min_lag, max_lag, self.voicing_threshold)
                    .map(|lag| fs / lag)
                    .unwrap_or(0.0)
            })
            .collect();

        Ok(F0Track { f0, times })
    }

    fn refine(
        &self,
        samples: &[f64],
        sample_rate: u32,
        f0: &[f64],
        times: &[f64],
    ) -> Result<Vec<f64>> {
        self.validate(samples, sample_rate)?;
        if f0.len() != times.len() {
            return Err(AnalysisError::Pitch(format!(
                "{} f0 values for {} frame times",
                f0.len(),
                times.len()
            )));
        }

        let fs = sample_rate as f64;
        Ok(f0
            .iter()
            .zip(times)
            .map(|(&raw, &t)| {
                if raw <= 0.0 {
                    return raw;
                }
                let refined = instantaneous_frequency(samples, fs, raw, t);
                if refined.is_finite() && (refined - raw).abs() <= MAX_REFINE_DEVIATION * raw {
                    refined
                } else {
                    raw
                }
            })
            .collect())
    }
}

/// FFT cross-correlation of a window against its lagged continuation
struct Correlator {
    window: usize,
    max_lag: usize,
    fft_size: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    head: Vec<Complex<f64>>,
    segment: Vec<Complex<f64>>,
    energy: Vec<f64>,
    r: Vec<f64>,
}

impl Correlator {
    fn new(window: usize, max_lag: usize) -> Self {
        let fft_size = (2 * window + max_lag + 1).next_power_of_two();
        let mut planner = FftPlanner::new();

        Self {
            window,
            max_lag,
            fft_size,
            forward: planner.plan_fft_forward(fft_size),
            inverse: planner.plan_fft_inverse(fft_size),
            head: vec![Complex::new(0.0, 0.0); fft_size],
            segment: vec![Complex::new(0.0, 0.0); fft_size],
            energy: vec![0.0; window + max_lag + 1],
            r: vec![0.0; max_lag + 1],
        }
    }

    /// Normalized autocorrelation r[τ] for τ in 0..=max_lag of the window at `start`
    ///
    /// Samples outside the signal read as zero.
    fn normalized(&mut self, samples: &[f64], start: isize) -> &[f64] {
        let len = self.window + self.max_lag;
        let sample_at = |i: usize| {
            let idx = start + i as isize;
            if idx >= 0 {
                samples.get(idx as usize).copied().unwrap_or(0.0)
            } else {
                0.0
            }
        };

        self.head.fill(Complex::new(0.0, 0.0));
        self.segment.fill(Complex::new(0.0, 0.0));
        self.energy[0] = 0.0;
        for i in 0..len {
            let x = sample_at(i);
            self.segment[i] = Complex::new(x, 0.0);
            if i < self.window {
                self.head[i] = Complex::new(x, 0.0);
            }
            self.energy[i + 1] = self.energy[i] + x * x;
        }

        self.forward.process(&mut self.head);
        self.forward.process(&mut self.segment);
        for (s, h) in self.segment.iter_mut().zip(&self.head) {
            *s *= h.conj();
        }
        self.inverse.process(&mut self.segment);

        let head_energy = self.energy[self.window];
        let scale = 1.0 / self.fft_size as f64;
        for lag in 0..=self.max_lag {
            let lagged_energy = self.energy[lag + self.window] - self.energy[lag];
            let denom = (head_energy * lagged_energy).sqrt();
            self.r[lag] = if denom > 1e-12 {
                self.segment[lag].re * scale / denom
            } else {
                0.0
            };
        }

        &self.r
    }
}

/// Lag of the first correlation peak close to the best one, with parabolic interpolation
fn pick_lag(r: &[f64], min_lag: usize, max_lag: usize, threshold: f64) -> Option<f64> {
    let peaks: Vec<usize> = (min_lag.max(1)..max_lag.min(r.len() - 1))
        .filter(|&lag| r[lag] > r[lag - 1] && r[lag] >= r[lag + 1])
        .collect();

    let best = peaks.iter().map(|&lag| r[lag]).fold(f64::NEG_INFINITY, f64::max);
    if best < threshold {
        return None;
    }

    let lag = *peaks.iter().find(|&&lag| r[lag] >= PEAK_TOLERANCE * best)?;

    let (left, mid, right) = (r[lag - 1], r[lag], r[lag + 1]);
    let curvature = left - 2.0 * mid + right;
    let offset = if curvature.abs() > 1e-12 {
        0.5 * (left - right) / curvature
    } else {
        0.0
    };

    Some(lag as f64 + offset.clamp(-0.5, 0.5))
}

/// Frequency near `f0` from the phase advance over a quarter period
///
/// A Blackman window three periods long is centred on `time`; the
/// single-bin DFT at `f0` is taken at the window position and a quarter
/// period later, and the phase difference gives the instantaneous frequency.
fn instantaneous_frequency(samples: &[f64], fs: f64, f0: f64, time: f64) -> f64 {
    let length = ((3.0 * fs / f0).round() as usize).max(3);
    let shift = ((fs / (4.0 * f0)).round() as isize).max(1);
    let window = generate_window(WindowType::Blackman, length);
    let omega = 2.0 * PI * f0 / fs;
    let start = (time * fs).round() as isize - (length / 2) as isize;

    let sample_at = |idx: isize| {
        if idx >= 0 {
            samples.get(idx as usize).copied().unwrap_or(0.0)
        } else {
            0.0
        }
    };

    let mut current = Complex::new(0.0, 0.0);
    let mut shifted = Complex::new(0.0, 0.0);
    for (n, &w) in window.iter().enumerate() {
        let kernel = Complex::from_polar(w, -omega * n as f64);
        current += kernel * sample_at(start + n as isize);
        shifted += kernel * sample_at(start + n as isize + shift);
    }

    if current.norm() < 1e-12 || shifted.norm() < 1e-12 {
        return f64::NAN;
    }

    (shifted * current.conj()).arg() * fs / (2.0 * PI * shift as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::{frame_period_ms, fundamental_frequency};

    fn sine(freq_hz: f64, sample_rate: u32, len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| (2.0 * PI * freq_hz * n as f64 / sample_rate as f64).sin())
            .collect()
    }

    #[test]
    fn test_frame_count_and_times() {
        let tracker = AutocorrelationTracker::default();
        let samples = sine(200.0, 8000, 800);
        let track = tracker.estimate(&samples, 8000, frame_period_ms(8000)).unwrap();

        // One frame every 20 samples, plus the frame at t = 0
        assert_eq!(track.len(), 41);
        assert_eq!(track.times[0], 0.0);
        assert!((track.times[1] - 0.0025).abs() < 1e-12);
    }

    #[test]
    fn test_raw_estimate_of_sine() {
        let tracker = AutocorrelationTracker::default();
        let samples = sine(200.0, 8000, 1600);
        let track = tracker.estimate(&samples, 8000, frame_period_ms(8000)).unwrap();

        for &f in &track.f0[15..track.len() - 15] {
            assert!((f - 200.0).abs() < 2.0, "raw f0 {f}");
        }
    }

    #[test]
    fn test_refined_track_of_sine() {
        let tracker = AutocorrelationTracker::default();
        let samples = sine(220.0, 8000, 1600);
        let track = fundamental_frequency(&tracker, &samples, 8000).unwrap();

        for &f in &track.f0[15..track.len() - 15] {
            assert!((f - 220.0).abs() < 0.5, "refined f0 {f}");
        }
    }

    #[test]
    fn test_silence_is_unvoiced() {
        let tracker = AutocorrelationTracker::default();
        let track = fundamental_frequency(&tracker, &[0.0; 800], 8000).unwrap();
        assert!(track.f0.iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_rejects_bad_input() {
        let tracker = AutocorrelationTracker::default();
        assert!(matches!(
            tracker.estimate(&[], 8000, 2.5),
            Err(AnalysisError::Pitch(_))
        ));
        assert!(matches!(
            tracker.refine(&[0.0; 10], 8000, &[100.0], &[]),
            Err(AnalysisError::Pitch(_))
        ));
        let narrow = AutocorrelationTracker {
            f0_ceil: 5000.0,
            ..AutocorrelationTracker::default()
        };
        assert!(matches!(
            narrow.estimate(&[0.0; 10], 8000, 2.5),
            Err(AnalysisError::Pitch(_))
        ));
    }

    #[test]
    fn test_pick_lag_prefers_first_period() {
        // Peaks at 10 and 20 of nearly equal height
        let r: Vec<f64> = (0..30)
            .map(|lag| (2.0 * PI * lag as f64 / 10.0).cos() * (1.0 - lag as f64 * 0.001))
            .collect();
        let lag = pick_lag(&r, 3, 29, 0.5).unwrap();
        assert!((lag - 10.0).abs() < 0.5);
    }
}
