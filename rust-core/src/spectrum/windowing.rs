//! Overlap framing and windowing
//!
//! Cuts a recording into overlapping frames and tapers each frame with a
//! window before the FFT to reduce spectral leakage.

use super::windows::{generate_window, WindowType};
use crate::error::{AnalysisError, Result};

/// Overlapping frames cut from a single recording
#[derive(Debug, Clone)]
pub struct FrameSet {
    /// Frames, each `frame_size` samples long
    frames: Vec<Vec<f64>>,

    /// Samples per frame
    frame_size: usize,

    /// Time in seconds at the end of the last frame
    final_time: f64,
}

impl FrameSet {
    /// Cut `samples` into overlapping frames
    ///
    /// # Arguments
    /// * `samples` - Recording
    /// * `sample_rate` - Sample rate in Hz
    /// * `frame_size` - Samples per frame
    /// * `overlap` - Overlap between consecutive frames in percent, [0, 100)
    ///
    /// Frame `i` starts at `floor(hop * i)` with `hop = frame_size * (1 - overlap/100)`.
    /// A recording shorter than one frame yields an empty set.
    pub fn overlap(
        samples: &[f64],
        sample_rate: u32,
        frame_size: usize,
        overlap: f64,
    ) -> Result<Self> {
        if frame_size == 0 {
            return Err(AnalysisError::InvalidFrameSize);
        }
        if !(0.0..100.0).contains(&overlap) {
            return Err(AnalysisError::InvalidOverlap(overlap));
        }
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate);
        }

        let ratio = overlap / 100.0;
        let frame_len = frame_size as f64;
        let hop = frame_len * (1.0 - ratio);

        let count = ((samples.len() as f64 - frame_len * ratio) / hop).floor();
        let mut count = if count > 0.0 { count as usize } else { 0 };

        // Float rounding in the count can push the last frame one sample past the end
        while count > 0 && (hop * (count - 1) as f64) as usize + frame_size > samples.len() {
            count -= 1;
        }

        let mut frames = Vec::with_capacity(count);
        let mut end = 0;
        for i in 0..count {
            let start = (hop * i as f64) as usize;
            end = start + frame_size;
            frames.push(samples[start..end].to_vec());
        }

        let final_time = end as f64 / sample_rate as f64;

        log::debug!(
            "framed {} samples into {} frames of {} (hop {:.1}, final time {:.4} s)",
            samples.len(),
            count,
            frame_size,
            hop,
            final_time
        );

        Ok(Self {
            frames,
            frame_size,
            final_time,
        })
    }

    /// Build a frame set from pre-cut frames
    pub fn from_frames(frames: Vec<Vec<f64>>, final_time: f64) -> Result<Self> {
        let frame_size = frames.first().map(Vec::len).unwrap_or(0);
        if frame_size == 0 {
            return Err(AnalysisError::InvalidFrameSize);
        }
        if let Some(bad) = frames.iter().find(|f| f.len() != frame_size) {
            return Err(AnalysisError::WindowLengthMismatch {
                window: frame_size,
                frame: bad.len(),
            });
        }

        Ok(Self {
            frames,
            frame_size,
            final_time,
        })
    }

    pub fn frames(&self) -> &[Vec<f64>] {
        &self.frames
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Time in seconds at the end of the last frame
    pub fn final_time(&self) -> f64 {
        self.final_time
    }

    /// Multiply every frame by the selected window
    pub fn apply_window(&self, window_type: WindowType) -> Result<WindowedFrames> {
        let window = generate_window(window_type, self.frame_size);
        self.apply_window_coefficients(&window)
    }

    /// Multiply every frame by explicit window coefficients
    pub fn apply_window_coefficients(&self, window: &[f64]) -> Result<WindowedFrames> {
        if window.is_empty() {
            return Err(AnalysisError::EmptyWindow);
        }
        if window.len() != self.frame_size {
            return Err(AnalysisError::WindowLengthMismatch {
                window: window.len(),
                frame: self.frame_size,
            });
        }

        let frames = self
            .frames
            .iter()
            .map(|frame| frame.iter().zip(window).map(|(&s, &w)| s * w).collect())
            .collect();

        Ok(WindowedFrames {
            frames,
            frame_size: self.frame_size,
            final_time: self.final_time,
            acf: correction_factor(window),
        })
    }
}

/// Frames after windowing, with the amplitude correction factor of the window
#[derive(Debug, Clone)]
pub struct WindowedFrames {
    frames: Vec<Vec<f64>>,
    frame_size: usize,
    final_time: f64,
    acf: f64,
}

impl WindowedFrames {
    pub fn frames(&self) -> &[Vec<f64>] {
        &self.frames
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn final_time(&self) -> f64 {
        self.final_time
    }

    /// Amplitude correction factor: frame length / sum(window)
    pub fn acf(&self) -> f64 {
        self.acf
    }
}

/// Multiply a single buffer by the symmetric window of its own length
///
/// An empty buffer stays empty.
pub fn apply_window(signal: &[f64], window_type: WindowType) -> Vec<f64> {
    let mut windowed = signal.to_vec();
    for (x, w) in windowed.iter_mut().zip(generate_window(window_type, signal.len())) {
        *x *= w;
    }
    windowed
}

/// Calculate window amplitude correction factor
///
/// Windowing reduces the amplitude of the signal. Multiplying the FFT
/// magnitude by this factor restores it.
///
/// # Returns
/// Correction factor, `length / sum(window)`
pub fn window_correction_factor(window_type: WindowType, length: usize) -> Result<f64> {
    if length == 0 {
        return Err(AnalysisError::EmptyWindow);
    }
    Ok(correction_factor(&generate_window(window_type, length)))
}

fn correction_factor(window: &[f64]) -> f64 {
    let sum: f64 = window.iter().sum();
    window.len() as f64 / sum
}
