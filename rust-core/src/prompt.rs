//! Operating-mode selection from a text stream
//!
//! Reads one integer per line and re-prompts on bad input, up to a fixed
//! number of attempts.

use crate::error::{AnalysisError, Result};
use std::io::{BufRead, Write};

/// Default number of attempts before giving up
pub const DEFAULT_ATTEMPTS: usize = 5;

/// Read a mode number in `0..mode_count`
///
/// # Arguments
/// * `input` - Source of user lines (e.g. locked stdin)
/// * `output` - Where prompts and complaints are written
/// * `mode_count` - Number of selectable modes
/// * `max_attempts` - Lines read before failing with `NoValidSelection`
pub fn select_mode<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    mode_count: usize,
    max_attempts: usize,
) -> Result<usize> {
    let mut line = String::new();

    for attempt in 1..=max_attempts {
        write!(output, ">>> Please INPUT Mode : ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            log::debug!("mode selection input closed after {} attempts", attempt - 1);
            break;
        }

        match line.trim().parse::<usize>() {
            Ok(mode) if mode < mode_count => return Ok(mode),
            Ok(mode) => {
                log::debug!("mode {} out of range 0..{}", mode, mode_count);
                writeln!(output, "\n!!! Invalid input value range, please Re-Input !!!\n")?;
            }
            Err(_) => {
                log::debug!("unparseable mode {:?}", line.trim());
                writeln!(output, "\n!!! Input Value Error, please Re-Input !!!\n")?;
            }
        }
    }

    Err(AnalysisError::NoValidSelection {
        attempts: max_attempts,
    })
}
