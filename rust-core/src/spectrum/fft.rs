//! FFT primitives
//!
//! `FftEngine` wraps a planned real-input FFT (realfft) with reusable
//! buffers for segment-by-segment spectrograms. `ComplexFft` is the full
//! double-sided transform (rustfft) used by the normalization path.

use crate::error::{AnalysisError, Result};
use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner, Length};
use std::sync::Arc;

/// FFT engine for real-valued signals
pub struct FftEngine {
    /// FFT size (number of samples after zero-padding)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer
    input_buffer: Vec<f64>,

    /// Reusable output buffer (complex spectrum)
    output_buffer: Vec<Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
        }
    }

    /// Compute the one-sided spectrum of `signal`
    ///
    /// The signal is zero-padded (or truncated) to `fft_size`.
    ///
    /// # Returns
    /// X[k] for k = 0..=fft_size/2, borrowed from the internal buffer
    pub fn compute(&mut self, signal: &[f64]) -> Result<&[Complex<f64>]> {
        let copy_len = signal.len().min(self.fft_size);
        self.input_buffer[..copy_len].copy_from_slice(&signal[..copy_len]);
        self.input_buffer[copy_len..].fill(0.0);

        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)
            .map_err(|e| AnalysisError::Fft(e.to_string()))?;

        Ok(&self.output_buffer)
    }

}

/// Double-sided complex DFT with plan caching
pub struct ComplexFft {
    planner: FftPlanner<f64>,
    plan: Option<Arc<dyn Fft<f64>>>,
}

impl ComplexFft {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            plan: None,
        }
    }

    /// Forward DFT of a real signal, zero-padded or truncated to `n` points
    pub fn forward(&mut self, signal: &[f64], n: usize) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = signal
            .iter()
            .take(n)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(n, Complex::new(0.0, 0.0));

        if n == 0 {
            return buffer;
        }

        let plan = match &self.plan {
            Some(plan) if plan.len() == n => Arc::clone(plan),
            _ => {
                let plan = self.planner.plan_fft_forward(n);
                self.plan = Some(Arc::clone(&plan));
                plan
            }
        };
        plan.process(&mut buffer);

        buffer
    }
}

impl Default for ComplexFft {
    fn default() -> Self {
        Self::new()
    }
}

/// DFT sample frequencies for an `n`-point transform
///
/// `[0, 1, ..., ceil(n/2)-1, -floor(n/2), ..., -1] / (d*n)`
pub fn fftfreq(n: usize, d: f64) -> Vec<f64> {
    let scale = 1.0 / (d * n as f64);
    let positive = (n + 1) / 2;
    (0..n)
        .map(|i| {
            if i < positive {
                i as f64 * scale
            } else {
                -((n - i) as f64) * scale
            }
        })
        .collect()
}

/// `num` evenly spaced values from `start` to `stop` inclusive
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num).map(|i| start + step * i as f64).collect()
        }
    }
}
