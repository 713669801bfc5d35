//! Decibel conversion and A-weighting

use ndarray::{Array2, Axis};

/// Amplitude relative to `reference` in dB: 20*log10(amplitude/reference)
///
/// Zero amplitude gives -inf.
#[inline]
pub fn decibel(amplitude: f64, reference: f64) -> f64 {
    20.0 * (amplitude / reference).log10()
}

/// Amplitude relative to full scale in dB (log power spectrum)
#[inline]
pub fn full_scale(amplitude: f64) -> f64 {
    20.0 * amplitude.log10()
}

/// IEC 61672 A-weighting in dB at frequency `f` (Hz)
///
/// Normalized to 0 dB at 1 kHz. A(0) is -inf.
pub fn a_weighting(f: f64) -> f64 {
    const F1: f64 = 20.6;
    const F2: f64 = 107.7;
    const F3: f64 = 737.9;
    const F4: f64 = 12_194.0;

    let f2 = f * f;
    let ra = (F4 * F4 * f2 * f2)
        / ((f2 + F1 * F1) * ((f2 + F2 * F2) * (f2 + F3 * F3)).sqrt() * (f2 + F4 * F4));

    20.0 * ra.log10() + 2.00
}

/// A-weighting curve over a frequency axis
pub fn a_weighting_curve(freqs: &[f64]) -> Vec<f64> {
    freqs.iter().map(|&f| a_weighting(f)).collect()
}

/// How linear amplitudes are reported
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelScale {
    /// 20*log10(a/reference), A-weighted if `a_weighting` is set
    Decibel { reference: f64, a_weighting: bool },

    /// 20*log10(a), never weighted
    FullScale,
}

impl LevelScale {
    /// Select the scale from a dB reference and weighting flag
    ///
    /// A reference of zero or below selects full-scale log power and
    /// ignores the weighting flag.
    pub fn new(db_reference: f64, a_weighting: bool) -> Self {
        if db_reference > 0.0 {
            LevelScale::Decibel {
                reference: db_reference,
                a_weighting,
            }
        } else {
            LevelScale::FullScale
        }
    }

    /// Whether the A-weighting curve is added
    pub fn is_weighted(&self) -> bool {
        matches!(self, LevelScale::Decibel { a_weighting: true, .. })
    }

    /// Convert a single amplitude, without weighting
    #[inline]
    pub fn convert(&self, amplitude: f64) -> f64 {
        match *self {
            LevelScale::Decibel { reference, .. } => decibel(amplitude, reference),
            LevelScale::FullScale => full_scale(amplitude),
        }
    }

    /// Convert amplitudes in place, without weighting
    pub fn convert_in_place(&self, amplitudes: &mut [f64]) {
        for a in amplitudes.iter_mut() {
            *a = self.convert(*a);
        }
    }

    /// Convert amplitudes in place and add A-weighting when active
    ///
    /// `freqs` must be the frequency axis matching `amplitudes`.
    pub fn apply(&self, amplitudes: &mut [f64], freqs: &[f64]) {
        debug_assert_eq!(amplitudes.len(), freqs.len());

        self.convert_in_place(amplitudes);
        if self.is_weighted() {
            for (a, &f) in amplitudes.iter_mut().zip(freqs) {
                *a += a_weighting(f);
            }
        }
    }

    /// Convert a (frequency, time) matrix and add A-weighting to every column
    pub fn apply_columns(&self, matrix: &mut Array2<f64>, freqs: &[f64]) {
        debug_assert_eq!(matrix.nrows(), freqs.len());

        matrix.mapv_inplace(|a| self.convert(a));
        if self.is_weighted() {
            let curve = a_weighting_curve(freqs);
            for mut column in matrix.axis_iter_mut(Axis(1)) {
                for (a, w) in column.iter_mut().zip(&curve) {
                    *a += w;
                }
            }
        }
    }
}

impl Default for LevelScale {
    fn default() -> Self {
        LevelScale::Decibel {
            reference: 1.0,
            a_weighting: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_decibel_of_reference_is_zero() {
        for reference in [1e-6, 2e-5, 0.5, 1.0, 94.0] {
            assert_eq!(decibel(reference, reference), 0.0);
        }
        assert!((decibel(10.0, 1.0) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_amplitude_is_negative_infinity() {
        assert_eq!(decibel(0.0, 1.0), f64::NEG_INFINITY);
        assert_eq!(full_scale(0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_a_weighting_reference_points() {
        assert!(a_weighting(1000.0).abs() < 0.01);
        assert!((a_weighting(100.0) + 19.1).abs() < 0.1);
        assert!((a_weighting(10_000.0) + 2.5).abs() < 0.1);
        assert_eq!(a_weighting(0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_weighting_only_with_positive_reference() {
        let freqs = [100.0, 1000.0, 5000.0];
        let amps = [0.1, 0.5, 1.0];

        for (reference, weighted) in [(1.0, true), (1.0, false), (0.0, true), (-1.0, true), (0.0, false)] {
            let scale = LevelScale::new(reference, weighted);
            let mut out = amps;
            scale.apply(&mut out, &freqs);

            for i in 0..amps.len() {
                let unweighted = if reference > 0.0 {
                    decibel(amps[i], reference)
                } else {
                    full_scale(amps[i])
                };
                let expected = if reference > 0.0 && weighted {
                    unweighted + a_weighting(freqs[i])
                } else {
                    unweighted
                };
                assert_eq!(out[i], expected);
            }
        }
    }

    #[test]
    fn test_apply_columns_broadcasts_weighting() {
        let freqs = [100.0, 1000.0];
        let mut matrix = array![[1.0, 1.0, 1.0], [1.0, 1.0, 1.0]];
        LevelScale::new(1.0, true).apply_columns(&mut matrix, &freqs);

        for column in matrix.columns() {
            assert_eq!(column[0], a_weighting(100.0));
            assert_eq!(column[1], a_weighting(1000.0));
        }
    }
}
