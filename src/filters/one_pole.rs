// SPDX-License-Identifier: LGPL-3.0-or-later

//! Single-pole high-pass and low-pass filters.
//!
//! First-order smoothers with one knob: the corner frequency. The
//! smoothing coefficient comes from the linearized corner
//! `c = 2π·f / fs` (no tangent prewarping; these are gentle tone
//! filters, not surgical ones):
//!
//! - high-pass: `y[n] = α·y[n−1] + α·(x[n] − x[n−1])`, `α = 1/(c+1)`
//! - low-pass:  `y[n] = α·x[n] + (1−α)·y[n−1]`, `α = c/(c+1)`

use crate::processor::{ProcessError, Processor};

use super::recursive::RecursiveFilter;

/// Parameters for the single-pole filters: just a corner frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePoleParams {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Corner frequency in Hz.
    pub frequency: f32,
}

impl OnePoleParams {
    /// Create a parameter set.
    pub fn new(sample_rate: f32, frequency: f32) -> Self {
        Self {
            sample_rate,
            frequency,
        }
    }

    /// Linearized corner `c = 2π·f / fs`.
    fn corner(&self) -> f32 {
        2.0 * std::f32::consts::PI * self.frequency / self.sample_rate
    }
}

/// Single-pole high-pass filter.
///
/// At `frequency = 0` the filter is a perfect pass-through; raising the
/// corner removes DC and low end.
#[derive(Debug, Clone)]
pub struct HighPass {
    filter: RecursiveFilter,
}

impl Default for HighPass {
    fn default() -> Self {
        Self::new()
    }
}

impl HighPass {
    /// Create a high-pass with zeroed coefficients (silent until
    /// [`set_params`](Self::set_params) is called).
    pub fn new() -> Self {
        Self {
            filter: RecursiveFilter::new(2, 2),
        }
    }

    /// Derive and load coefficients for the given corner frequency.
    pub fn set_params(&mut self, params: &OnePoleParams) {
        let alpha = 1.0 / (params.corner() + 1.0);
        // y[n] = alpha*y[n-1] + alpha*(x[n] - x[n-1])
        self.filter
            .set_coefficients(&[alpha, -alpha], &[0.0, alpha]);
    }
}

impl Processor for HighPass {
    fn process<'a>(
        &'a mut self,
        inputs: &[&[f32]],
        num_frames: usize,
    ) -> Result<&'a [Vec<f32>], ProcessError> {
        self.filter.process(inputs, num_frames)
    }
}

/// Single-pole low-pass filter.
///
/// At `frequency = 0` the output is pinned to its initial (zero) state;
/// as the corner rises far past the audio band the filter approaches a
/// pass-through.
#[derive(Debug, Clone)]
pub struct LowPass {
    filter: RecursiveFilter,
}

impl Default for LowPass {
    fn default() -> Self {
        Self::new()
    }
}

impl LowPass {
    /// Create a low-pass with zeroed coefficients.
    pub fn new() -> Self {
        Self {
            filter: RecursiveFilter::new(1, 2),
        }
    }

    /// Derive and load coefficients for the given corner frequency.
    pub fn set_params(&mut self, params: &OnePoleParams) {
        let c = params.corner();
        let alpha = c / (c + 1.0);
        // y[n] = alpha*x[n] + (1-alpha)*y[n-1]
        self.filter.set_coefficients(&[alpha], &[0.0, 1.0 - alpha]);
    }
}

impl Processor for LowPass {
    fn process<'a>(
        &'a mut self,
        inputs: &[&[f32]],
        num_frames: usize,
    ) -> Result<&'a [Vec<f32>], ProcessError> {
        self.filter.process(inputs, num_frames)
    }
}
