// SPDX-License-Identifier: LGPL-3.0-or-later

//! Pure gain stage.

use crate::processor::{ProcessError, Processor};

use super::recursive::RecursiveFilter;

/// A degenerate recursive filter of degree (1, 0) that just scales
/// the signal by a linear gain.
///
/// # Examples
/// ```
/// use amp_dsp::filters::Level;
/// use amp_dsp::processor::Processor;
///
/// let mut level = Level::new();
/// level.set_gain(0.5);
/// let out = level.process(&[&[1.0, -0.5][..]], 2).unwrap();
/// assert_eq!(out[0], vec![0.5, -0.25]);
/// ```
#[derive(Debug, Clone)]
pub struct Level {
    filter: RecursiveFilter,
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

impl Level {
    /// Create a level stage with zero gain (silence).
    pub fn new() -> Self {
        Self {
            filter: RecursiveFilter::new(1, 0),
        }
    }

    /// Set the multiplicative (linear, not dB) gain.
    pub fn set_gain(&mut self, gain: f32) {
        self.filter.set_coefficients(&[gain], &[]);
    }
}

impl Processor for Level {
    fn process<'a>(
        &'a mut self,
        inputs: &[&[f32]],
        num_frames: usize,
    ) -> Result<&'a [Vec<f32>], ProcessError> {
        self.filter.process(inputs, num_frames)
    }
}
