// SPDX-License-Identifier: LGPL-3.0-or-later

//! Flat sample history with periodic rewind compaction.
//!
//! The convolver needs the last `required` samples *contiguously* in
//! front of every incoming block, so a wraparound ring is the wrong
//! shape. Instead the history is a flat buffer written left to right
//! with roughly 10× headroom. When the next block would run off the
//! end, the last `required` samples are copied back to the front and
//! the cursor rewinds. The headroom keeps that copy rare: one rewind
//! per ~9 blocks of writing, not one per block.

/// Single-channel sample history guaranteeing that the most recent
/// `required` samples are always readable contiguously behind the
/// write cursor.
///
/// # Examples
/// ```
/// use amp_dsp::ir::HistoryBuffer;
///
/// let mut hist = HistoryBuffer::new();
/// hist.set_required(2);
/// hist.update(&[1.0, 2.0, 3.0]);
/// // Window spans the 2 retained samples plus the new block
/// assert_eq!(hist.window(5), &[0.0, 0.0, 1.0, 2.0, 3.0]);
/// hist.advance(3);
/// hist.update(&[4.0]);
/// assert_eq!(hist.window(3), &[2.0, 3.0, 4.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    history: Vec<f32>,
    /// Write cursor: the next block lands at `history[index..]`.
    index: usize,
    /// Samples that must stay retrievable behind the cursor.
    required: usize,
}

impl HistoryBuffer {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many past samples must remain retrievable. Takes effect
    /// on the next [`update`](Self::update) (which may grow the
    /// buffer).
    pub fn set_required(&mut self, required: usize) {
        self.required = required;
    }

    /// Samples guaranteed retrievable behind the cursor.
    pub fn required(&self) -> usize {
        self.required
    }

    /// Current backing-store size in samples.
    pub fn capacity(&self) -> usize {
        self.history.len()
    }

    /// Grow the backing store for a block of `block_len` samples.
    ///
    /// Sized at 10× the larger of block and required history so the
    /// rewind copy stays infrequent. Growth zero-fills and re-seeds the
    /// cursor just past the (all-zero) required region.
    fn ensure_size(&mut self, block_len: usize) {
        let repeat = block_len.max(self.required);
        let needed = 10 * repeat;
        if self.history.len() < needed {
            self.history.clear();
            self.history.resize(needed, 0.0);
            // Guaranteed to be less than `needed`.
            self.index = self.required;
        }
    }

    /// Copy the last `required` samples to the front and rewind the
    /// cursor.
    fn rewind(&mut self) {
        let start = self.index - self.required;
        self.history.copy_within(start..self.index, 0);
        self.index = self.required;
    }

    /// Write a block at the cursor (without advancing it), growing or
    /// rewinding first as needed.
    ///
    /// After this call `window(required + block.len())` exposes the
    /// retained history followed by the new block. Call
    /// [`advance`](Self::advance) once the block has been consumed.
    pub fn update(&mut self, block: &[f32]) {
        self.ensure_size(block.len());
        if self.index + block.len() >= self.history.len() {
            self.rewind();
        }
        self.history[self.index..self.index + block.len()].copy_from_slice(block);
    }

    /// Advance the cursor past a consumed block.
    pub fn advance(&mut self, num_frames: usize) {
        self.index += num_frames;
    }

    /// A contiguous view of `len` samples starting `required` samples
    /// behind the cursor.
    pub fn window(&self, len: usize) -> &[f32] {
        let start = self.index - self.required;
        &self.history[start..start + len]
    }
}
