// SPDX-License-Identifier: LGPL-3.0-or-later

//! Noise gate gain stage: applies a gain-reduction curve.
//!
//! The gain stage owns a copy of the per-channel, per-sample reduction
//! matrix (in dB) computed by a [`Trigger`](super::Trigger) and applies
//! it multiplicatively to whatever audio it processes. It refuses to
//! run when the stored matrix does not match the requested block shape:
//! a mismatch means the chain was assembled or sequenced wrong, and
//! applying a stale curve would be worse than failing loudly.

use crate::processor::{OutputBlock, ProcessError, Processor};
use crate::units::db_to_power;

/// Applies gain reduction computed by a trigger.
///
/// [`set_gain_reduction_db`](Self::set_gain_reduction_db) must be
/// called with a fresh curve before each [`process`](Processor::process)
/// call (normally via [`Trigger::push_to`](super::Trigger::push_to)).
///
/// # Examples
/// ```
/// use amp_dsp::gate::Gain;
/// use amp_dsp::processor::Processor;
///
/// let mut gain = Gain::new();
/// // -10 dB (power) on every sample of one channel
/// gain.set_gain_reduction_db(&[vec![-10.0; 4]]);
/// let input = [1.0f32, 1.0, 1.0, 1.0];
/// let out = gain.process(&[&input], 4).unwrap();
/// assert!((out[0][0] - 0.1).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Gain {
    gain_reduction_db: Vec<Vec<f32>>,
    output: OutputBlock,
}

impl Gain {
    /// Create a gain stage with no reduction data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of the reduction matrix to apply on the next
    /// `process` call. One row per channel, one dB value per sample.
    pub fn set_gain_reduction_db(&mut self, gain_reduction_db: &[Vec<f32>]) {
        self.gain_reduction_db.resize_with(gain_reduction_db.len(), Vec::new);
        for (dst, src) in self.gain_reduction_db.iter_mut().zip(gain_reduction_db) {
            dst.clear();
            dst.extend_from_slice(src);
        }
    }

    /// Validate that the stored reduction matrix matches the requested
    /// block shape.
    fn check_shape(&self, num_channels: usize, num_frames: usize) -> Result<(), ProcessError> {
        if self.gain_reduction_db.len() != num_channels {
            return Err(ProcessError::ChannelCountMismatch {
                expected: self.gain_reduction_db.len(),
                actual: num_channels,
            });
        }
        if self.gain_reduction_db.is_empty() {
            if num_frames > 0 {
                return Err(ProcessError::NoReductionChannels { frames: num_frames });
            }
            return Ok(());
        }
        if self.gain_reduction_db[0].len() != num_frames {
            return Err(ProcessError::FrameCountMismatch {
                expected: self.gain_reduction_db[0].len(),
                actual: num_frames,
            });
        }
        Ok(())
    }
}

impl Processor for Gain {
    fn process<'a>(
        &'a mut self,
        inputs: &[&[f32]],
        num_frames: usize,
    ) -> Result<&'a [Vec<f32>], ProcessError> {
        self.check_shape(inputs.len(), num_frames)?;
        self.output.prepare(inputs.len(), num_frames);

        for (c, input) in inputs.iter().enumerate() {
            let curve = &self.gain_reduction_db[c];
            let out = &mut self.output.channels_mut()[c];
            for s in 0..num_frames {
                out[s] = db_to_power(curve[s]) * input[s];
            }
        }
        Ok(self.output.channels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_reduction_is_identity() {
        let mut g = Gain::new();
        g.set_gain_reduction_db(&[vec![0.0; 8]]);
        let input: Vec<f32> = (0..8).map(|i| i as f32 * 0.1).collect();
        let out = g.process(&[&input], 8).unwrap();
        for (a, b) in out[0].iter().zip(&input) {
            assert!((a - b).abs() < 1e-7);
        }
    }

    #[test]
    fn test_reduction_applied_in_power_domain() {
        let mut g = Gain::new();
        // -10 dB in the power domain is a factor of 0.1
        g.set_gain_reduction_db(&[vec![-10.0; 4]]);
        let input = [1.0f32, 0.5, -0.25, 0.0];
        let out = g.process(&[&input], 4).unwrap();
        for (o, i) in out[0].iter().zip(&input) {
            assert!((o - i * 0.1).abs() < 1e-6, "{o} vs {}", i * 0.1);
        }
    }

    #[test]
    fn test_per_sample_curve() {
        let mut g = Gain::new();
        g.set_gain_reduction_db(&[vec![0.0, -10.0, -20.0, -30.0]]);
        let input = [1.0f32; 4];
        let out = g.process(&[&input], 4).unwrap();
        let expected = [1.0, 0.1, 0.01, 0.001];
        for (o, e) in out[0].iter().zip(&expected) {
            assert!((o - e).abs() < 1e-5, "{o} vs {e}");
        }
    }

    #[test]
    fn test_channel_count_mismatch_is_error() {
        let mut g = Gain::new();
        g.set_gain_reduction_db(&[vec![0.0; 4], vec![0.0; 4]]);
        let a = [0.0f32; 4];
        let err = g.process(&[&a, &a, &a], 4).unwrap_err();
        assert_eq!(
            err,
            ProcessError::ChannelCountMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_no_channels_with_frames_is_error() {
        let mut g = Gain::new();
        let err = g.process(&[], 16).unwrap_err();
        assert_eq!(err, ProcessError::NoReductionChannels { frames: 16 });
    }

    #[test]
    fn test_no_channels_no_frames_is_ok() {
        let mut g = Gain::new();
        let out = g.process(&[], 0).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_frame_count_mismatch_is_error() {
        let mut g = Gain::new();
        g.set_gain_reduction_db(&[vec![0.0; 64]]);
        let a = [0.0f32; 128];
        let err = g.process(&[&a], 128).unwrap_err();
        assert_eq!(
            err,
            ProcessError::FrameCountMismatch {
                expected: 64,
                actual: 128
            }
        );
    }

    #[test]
    fn test_error_leaves_no_output_for_block() {
        // A failed call must not produce a buffer shaped like the
        // requested block.
        let mut g = Gain::new();
        g.set_gain_reduction_db(&[vec![-10.0; 4]]);
        let a = [1.0f32; 4];
        g.process(&[&a], 4).unwrap();

        let b = [2.0f32; 8];
        assert!(g.process(&[&b], 8).is_err());
        // The stage is still usable with a matching curve afterwards
        g.set_gain_reduction_db(&[vec![0.0; 8]]);
        let out = g.process(&[&b], 8).unwrap();
        assert_eq!(out[0], vec![2.0; 8]);
    }

    #[test]
    fn test_set_gain_reduction_overwrites() {
        let mut g = Gain::new();
        g.set_gain_reduction_db(&[vec![-100.0; 4]]);
        g.set_gain_reduction_db(&[vec![0.0; 4]]);
        let input = [1.0f32; 4];
        let out = g.process(&[&input], 4).unwrap();
        assert_eq!(out[0], vec![1.0; 4]);
    }

    #[test]
    fn test_stereo_independent_curves() {
        let mut g = Gain::new();
        g.set_gain_reduction_db(&[vec![0.0; 2], vec![-10.0; 2]]);
        let a = [1.0f32, 1.0];
        let out = g.process(&[&a, &a], 2).unwrap();
        assert!((out[0][0] - 1.0).abs() < 1e-6);
        assert!((out[1][0] - 0.1).abs() < 1e-6);
    }
}
