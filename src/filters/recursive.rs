// SPDX-License-Identifier: LGPL-3.0-or-later

//! Generic recursive linear filter engine.
//!
//! Evaluates the difference equation
//!
//! ```text
//! y[n] = Σ_{i=0..P} bᵢ·x[n−i] + Σ_{i=1..Q} aᵢ·y[n−i]
//! ```
//!
//! over per-channel circular histories of fixed degree. The feedback
//! coefficients are stored pre-negated so the inner loop is a single
//! accumulating sum. Degree means "longest history": a filter whose
//! output depends on `x[n−2]` has input degree 3 (`n, n−1, n−2`).
//! Output degree is never 1 (`y[n]` never feeds its own computation),
//! and slot 0 of the feedback coefficients exists but is never read.
//!
//! History indexing is explicit pre-decrement-and-wrap arithmetic: the
//! "current" index walks backwards through the ring, and taps are read
//! at `(start + i) mod degree`. This is the per-sample hot path of the
//! whole filter section and stays as plain index math.

use crate::processor::{OutputBlock, ProcessError, Processor};

/// Order-agnostic recursive (IIR) filter.
///
/// Coefficient vectors are sized at construction; parameter changes
/// rewrite their values but never their degree. Per-channel histories
/// are allocated (and zeroed) whenever the channel count changes and
/// persist across blocks otherwise.
///
/// A NaN produced by the recursion is flushed to 0 instead of being
/// fed back; one bad sample must not latch the filter into permanent
/// NaN output. Flushes are counted and readable via
/// [`nan_flushes`](Self::nan_flushes).
#[derive(Debug, Clone)]
pub struct RecursiveFilter {
    input_coefficients: Vec<f32>,
    output_coefficients: Vec<f32>,
    /// Per-channel ring of past inputs, `input_degree` entries each.
    input_history: Vec<Vec<f32>>,
    /// Per-channel ring of past outputs, `output_degree` entries each.
    output_history: Vec<Vec<f32>>,
    /// Current "sample 0" position in the input rings (shared by all
    /// channels, which advance in lockstep).
    input_start: usize,
    output_start: usize,
    nan_flushes: u64,
    output: OutputBlock,
}

impl RecursiveFilter {
    /// Create a filter with the given history degrees. All
    /// coefficients start at zero (the filter outputs silence until
    /// coefficients are set).
    pub fn new(input_degree: usize, output_degree: usize) -> Self {
        Self {
            input_coefficients: vec![0.0; input_degree],
            output_coefficients: vec![0.0; output_degree],
            input_history: Vec::new(),
            output_history: Vec::new(),
            // Pre-decrement convention: 1 is subtracted before first use.
            input_start: input_degree,
            output_start: output_degree,
            nan_flushes: 0,
            output: OutputBlock::new(),
        }
    }

    /// Input (feedforward) history depth.
    pub fn input_degree(&self) -> usize {
        self.input_coefficients.len()
    }

    /// Output (feedback) history depth.
    pub fn output_degree(&self) -> usize {
        self.output_coefficients.len()
    }

    /// Current feedforward coefficients.
    pub fn input_coefficients(&self) -> &[f32] {
        &self.input_coefficients
    }

    /// Current feedback coefficients (pre-negated, slot 0 unused).
    pub fn output_coefficients(&self) -> &[f32] {
        &self.output_coefficients
    }

    /// Replace both coefficient vectors. Effective from the next
    /// sample; history is untouched.
    ///
    /// # Panics
    /// If either slice's length differs from the degree fixed at
    /// construction; that is a wiring bug, not a runtime condition.
    pub fn set_coefficients(&mut self, input: &[f32], output: &[f32]) {
        assert_eq!(
            input.len(),
            self.input_coefficients.len(),
            "input coefficient count must match the filter's input degree"
        );
        assert_eq!(
            output.len(),
            self.output_coefficients.len(),
            "output coefficient count must match the filter's output degree"
        );
        self.input_coefficients.copy_from_slice(input);
        self.output_coefficients.copy_from_slice(output);
    }

    /// How many NaN outputs have been flushed to zero since
    /// construction.
    pub fn nan_flushes(&self) -> u64 {
        self.nan_flushes
    }

    /// Zero all channel histories and re-seed the ring cursors.
    /// Coefficients are untouched.
    pub fn clear(&mut self) {
        for h in &mut self.input_history {
            h.fill(0.0);
        }
        for h in &mut self.output_history {
            h.fill(0.0);
        }
        self.input_start = self.input_coefficients.len();
        self.output_start = self.output_coefficients.len();
    }

    fn prepare(&mut self, num_channels: usize, num_frames: usize) {
        let change = self.output.prepare(num_channels, num_frames);
        if change.channels {
            let in_deg = self.input_coefficients.len();
            let out_deg = self.output_coefficients.len();
            self.input_history = vec![vec![0.0; in_deg]; num_channels];
            self.output_history = vec![vec![0.0; out_deg]; num_channels];
            self.input_start = in_deg;
            self.output_start = out_deg;
        }
    }
}

impl Processor for RecursiveFilter {
    fn process<'a>(
        &'a mut self,
        inputs: &[&[f32]],
        num_frames: usize,
    ) -> Result<&'a [Vec<f32>], ProcessError> {
        self.prepare(inputs.len(), num_frames);

        let in_deg = self.input_coefficients.len();
        let out_deg = self.output_coefficients.len();
        let mut final_in_start = self.input_start;
        let mut final_out_start = self.output_start;
        let mut nan_flushes = 0u64;

        for (c, input) in inputs.iter().enumerate() {
            // Every channel replays the same cursor walk; all end at
            // the same position, which becomes next block's start.
            let mut in_start = self.input_start;
            let mut out_start = self.output_start;
            let in_hist = &mut self.input_history[c];
            let out_hist = &mut self.output_history[c];
            let out_buf = &mut self.output.channels_mut()[c];

            for s in 0..num_frames {
                let mut acc = 0.0f32;

                in_start = if in_start == 0 { in_deg - 1 } else { in_start - 1 };
                in_hist[in_start] = input[s];
                for i in 0..in_deg {
                    acc += self.input_coefficients[i] * in_hist[(in_start + i) % in_deg];
                }

                if out_deg > 0 {
                    out_start = if out_start == 0 { out_deg - 1 } else { out_start - 1 };
                    // Slot 0 would be y[n] itself; the sum starts at 1.
                    for i in 1..out_deg {
                        acc += self.output_coefficients[i] * out_hist[(out_start + i) % out_deg];
                    }
                }

                // Keep a NaN from jamming the recursion open.
                if acc.is_nan() {
                    acc = 0.0;
                    nan_flushes += 1;
                }

                if out_deg > 0 {
                    out_hist[out_start] = acc;
                }
                out_buf[s] = acc;
            }

            final_in_start = in_start;
            final_out_start = out_start;
        }

        self.input_start = final_in_start;
        self.output_start = final_out_start;
        self.nan_flushes += nan_flushes;
        Ok(self.output.channels())
    }
}
