// SPDX-License-Identifier: LGPL-3.0-or-later

//! Noise gate trigger: envelope follower plus hysteretic state machine.
//!
//! The trigger tracks signal loudness with a one-pole power envelope,
//! converts it to dB, and drives a two-state machine per channel:
//!
//! - **Moving**: the applied reduction chases a quadratic expansion
//!   curve, at most half the remaining distance per sample and never
//!   faster than the configured open/close rates. Reaching 0 dB flips
//!   the channel to Holding.
//! - **Holding**: the gate is fully open (0 dB reduction). Time spent
//!   below the threshold accumulates; once it exceeds the hold time the
//!   channel returns to Moving and the reduction starts closing.
//!
//! The audio itself passes through unchanged; the trigger only
//! computes the reduction curve for a [`Gain`](super::Gain) stage to
//! apply.

use crate::consts::{MAXIMUM_LOUDNESS_POWER, MINIMUM_LOUDNESS_DB, MINIMUM_LOUDNESS_POWER};
use crate::processor::{OutputBlock, ProcessError, Processor};
use crate::units::power_to_db;

use super::gain::Gain;

/// Reduction this close to 0 dB counts as fully open. The half-step
/// opening rule converges only asymptotically, so without a snap
/// threshold the open state would never latch.
const OPEN_SNAP_DB: f32 = 1e-6;

/// Noise gate trigger parameters.
///
/// Times are in seconds, the threshold in dB (power domain). The ratio
/// scales the quadratic expansion curve below the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerParams {
    /// Time constant of the loudness envelope, in seconds.
    pub time: f32,
    /// Threshold below which expansion starts, in dB.
    pub threshold: f32,
    /// Expansion ratio (curvature of the reduction parabola).
    pub ratio: f32,
    /// Time to go from maximum gain reduction to none, in seconds.
    pub open_time: f32,
    /// Time to stay open before the gate may start closing, in seconds.
    pub hold_time: f32,
    /// Time to go from open to maximum gain reduction, in seconds.
    pub close_time: f32,
}

impl TriggerParams {
    /// Create a parameter set.
    pub fn new(
        time: f32,
        threshold: f32,
        ratio: f32,
        open_time: f32,
        hold_time: f32,
        close_time: f32,
    ) -> Self {
        Self {
            time,
            threshold,
            ratio,
            open_time,
            hold_time,
            close_time,
        }
    }
}

impl Default for TriggerParams {
    /// 50 ms envelope, −60 dB threshold, ratio 1.5, 2 ms open,
    /// 50 ms hold, 50 ms close.
    fn default() -> Self {
        Self::new(0.05, -60.0, 1.5, 0.002, 0.050, 0.050)
    }
}

/// Gate state, per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    /// Reduction is chasing the target curve (opening or closing).
    Moving,
    /// Gate fully open; waiting out the hold time before closing.
    Holding,
}

/// Per-channel trigger state.
#[derive(Debug, Clone, Copy)]
struct ChannelState {
    state: GateState,
    /// Smoothed signal power (envelope follower output).
    level: f32,
    /// Time spent below threshold while holding, in seconds.
    time_held: f32,
    /// Reduction applied at the previous sample, in dB.
    last_reduction_db: f32,
}

/// Noise gate trigger.
///
/// Computes a per-channel, per-sample gain-reduction curve and passes
/// the audio through unchanged. [`set_sample_rate`](Self::set_sample_rate)
/// must be called before the first [`process`](Processor::process).
///
/// # Examples
/// ```
/// use amp_dsp::gate::{Gain, Trigger, TriggerParams};
/// use amp_dsp::processor::Processor;
///
/// let mut trigger = Trigger::new();
/// trigger.set_sample_rate(48000.0);
/// trigger.set_params(TriggerParams::default());
///
/// let quiet = vec![1e-5f32; 128];
/// let out = trigger.process(&[&quiet], 128).unwrap();
/// assert_eq!(out[0], quiet); // audio untouched
/// assert!(trigger.gain_reduction_db()[0][127] < 0.0); // but gated
/// ```
#[derive(Debug, Clone)]
pub struct Trigger {
    params: TriggerParams,
    sample_rate: f32,
    channels: Vec<ChannelState>,
    /// Per-channel, per-sample reduction for the current block, in dB.
    gain_reduction_db: Vec<Vec<f32>>,
    output: OutputBlock,
}

impl Default for Trigger {
    fn default() -> Self {
        Self::new()
    }
}

impl Trigger {
    /// Create a trigger with default parameters and no sample rate.
    pub fn new() -> Self {
        Self {
            params: TriggerParams::default(),
            sample_rate: 0.0,
            channels: Vec::new(),
            gain_reduction_db: Vec::new(),
            output: OutputBlock::new(),
        }
    }

    /// Replace the parameter set. Takes effect from the next block.
    pub fn set_params(&mut self, params: TriggerParams) {
        self.params = params;
    }

    /// Set the sample rate in Hz. Must be called (with a nonzero rate)
    /// before the first `process`; the envelope coefficient is derived
    /// from it every block.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// The gain-reduction curve computed by the last `process` call,
    /// one row per channel, one dB value per sample.
    pub fn gain_reduction_db(&self) -> &[Vec<f32>] {
        &self.gain_reduction_db
    }

    /// Copy the last block's gain-reduction curve into a [`Gain`]
    /// stage.
    ///
    /// Call after `process` on this trigger and before `process` on the
    /// gain stage, once per block.
    pub fn push_to(&self, gain: &mut Gain) {
        gain.set_gain_reduction_db(&self.gain_reduction_db);
    }

    /// Reduction (dB, ≤ 0) the expansion curve prescribes for a
    /// loudness of `level_db`.
    fn reduction_for(params: &TriggerParams, level_db: f32) -> f32 {
        if level_db < params.threshold {
            let d = level_db - params.threshold;
            -params.ratio * d * d
        } else {
            0.0
        }
    }

    /// The deepest reduction the curve can prescribe (at the noise
    /// floor).
    fn max_reduction(params: &TriggerParams) -> f32 {
        Self::reduction_for(params, MINIMUM_LOUDNESS_DB)
    }

    /// Resize the reduction matrix and per-channel state for a new
    /// block shape.
    fn prepare(&mut self, num_channels: usize, num_frames: usize) {
        let change = self.output.prepare(num_channels, num_frames);
        if !change.any() {
            return;
        }

        let max_reduction = Self::max_reduction(&self.params);
        if change.channels {
            self.channels.clear();
            self.channels.resize(
                num_channels,
                ChannelState {
                    state: GateState::Moving,
                    level: MINIMUM_LOUDNESS_POWER,
                    time_held: 0.0,
                    last_reduction_db: max_reduction,
                },
            );
            self.gain_reduction_db.resize_with(num_channels, Vec::new);
        }
        for row in &mut self.gain_reduction_db {
            row.clear();
            row.resize(num_frames, max_reduction);
        }
    }
}

impl Processor for Trigger {
    fn process<'a>(
        &'a mut self,
        inputs: &[&[f32]],
        num_frames: usize,
    ) -> Result<&'a [Vec<f32>], ProcessError> {
        self.prepare(inputs.len(), num_frames);

        let params = self.params;
        let alpha = 0.5f32.powf(1.0 / (params.time * self.sample_rate));
        let beta = 1.0 - alpha;
        let threshold = params.threshold;
        let dt = 1.0 / self.sample_rate;
        let max_reduction = Self::max_reduction(&params);
        // Per-sample limits on how fast the reduction may move:
        // opening is positive-going, closing negative-going.
        let d_open = -max_reduction / params.open_time * dt;
        let d_close = max_reduction / params.close_time * dt;

        for (c, input) in inputs.iter().enumerate() {
            let ch = &mut self.channels[c];
            let curve = &mut self.gain_reduction_db[c];
            for s in 0..num_frames {
                let x = input[s];
                ch.level = (alpha * ch.level + beta * x * x)
                    .clamp(MINIMUM_LOUDNESS_POWER, MAXIMUM_LOUDNESS_POWER);
                let level_db = power_to_db(ch.level);

                match ch.state {
                    GateState::Holding => {
                        curve[s] = 0.0;
                        ch.last_reduction_db = 0.0;
                        if level_db < threshold {
                            ch.time_held += dt;
                            if ch.time_held >= params.hold_time {
                                ch.state = GateState::Moving;
                            }
                        } else {
                            ch.time_held = 0.0;
                        }
                    }
                    GateState::Moving => {
                        let target = Self::reduction_for(&params, level_db);
                        if target > ch.last_reduction_db {
                            // Opening: half the distance, rate-limited.
                            let step =
                                (0.5 * (target - ch.last_reduction_db)).clamp(0.0, d_open);
                            ch.last_reduction_db += step;
                            if ch.last_reduction_db >= -OPEN_SNAP_DB {
                                ch.last_reduction_db = 0.0;
                                ch.state = GateState::Holding;
                                ch.time_held = 0.0;
                            }
                        } else if target < ch.last_reduction_db {
                            // Closing: half the distance, rate-limited.
                            let step =
                                (0.5 * (target - ch.last_reduction_db)).clamp(d_close, 0.0);
                            ch.last_reduction_db += step;
                            if ch.last_reduction_db < max_reduction {
                                ch.last_reduction_db = max_reduction;
                            }
                        }
                        curve[s] = ch.last_reduction_db;
                    }
                }
            }
        }

        // The trigger never alters the audio.
        self.output.copy_from(inputs, num_frames);
        Ok(self.output.channels())
    }
}
