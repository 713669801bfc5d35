//! Single-sided normalization of raw DFT output
//!
//! A real signal's DFT is scaled by N and mirrored about Nyquist. Keeping
//! bins `1..floor(N/2)` and scaling by 2/N yields the physical amplitude of
//! each component. DC and the exact Nyquist bin have no mirror partner and
//! are dropped, on both the spectrum and the frequency axis.

use num_complex::Complex;

/// Normalized single-sided spectrum
#[derive(Debug, Clone, Default)]
pub struct NormalizedSpectrum {
    /// X[i] * 2/N
    pub spectrum: Vec<Complex<f64>>,

    /// |X[i]| * 2/N
    pub amplitude: Vec<f64>,

    /// arg(X[i]) in degrees
    pub phase: Vec<f64>,
}

/// Range of retained bins for an `n`-point DFT
fn retained_bins(n: usize) -> std::ops::Range<usize> {
    let end = n / 2;
    if end > 1 {
        1..end
    } else {
        0..0
    }
}

/// Normalize a double-sided DFT
pub fn dft_normalize(spectrum: &[Complex<f64>]) -> NormalizedSpectrum {
    let n = spectrum.len();
    let scale = 2.0 / n as f64;

    let normalized: Vec<Complex<f64>> = spectrum[retained_bins(n)]
        .iter()
        .map(|&x| x * scale)
        .collect();
    let amplitude = normalized.iter().map(|x| x.norm()).collect();
    let phase = normalized.iter().map(|x| x.arg().to_degrees()).collect();

    NormalizedSpectrum {
        spectrum: normalized,
        amplitude,
        phase,
    }
}

/// Normalized amplitude only, skipping the complex and phase outputs
pub fn dft_normalize_amplitude(spectrum: &[Complex<f64>]) -> Vec<f64> {
    let n = spectrum.len();
    let scale = 2.0 / n as f64;
    spectrum[retained_bins(n)]
        .iter()
        .map(|x| x.norm() * scale)
        .collect()
}

/// Restrict an `fftfreq` axis to the bins kept by [`dft_normalize`]
pub fn exclude_negative_frequencies(freqs: &[f64]) -> Vec<f64> {
    freqs[retained_bins(freqs.len())].to_vec()
}
