// SPDX-License-Identifier: LGPL-3.0-or-later

//! Shared streaming-processor contract and output-buffer management.
//!
//! Every stage in the chain implements [`Processor`]: a synchronous,
//! block-based `process` call that may be handed a different channel
//! count or frame count on any invocation. Each stage owns an
//! [`OutputBlock`] holding its per-channel output buffers; buffers are
//! reallocated only when the block shape actually changes, so steady
//! state processing performs no heap work.

use thiserror::Error;

/// Errors surfaced by a `process` call.
///
/// These indicate a mis-assembled chain (stages called out of order or
/// with inconsistent shapes). The failing call writes no output; the
/// caller should treat the block as lost rather than resume mid-chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// The gain stage's reduction matrix covers a different number of
    /// channels than the block being processed.
    #[error("gain stage holds reduction for {expected} channels, but {actual} were provided")]
    ChannelCountMismatch {
        /// Channels covered by the stored gain-reduction matrix.
        expected: usize,
        /// Channels in the block handed to `process`.
        actual: usize,
    },

    /// The gain stage has no reduction channels at all, yet was asked
    /// to produce frames.
    #[error("gain stage holds no reduction channels, yet {frames} frames were requested")]
    NoReductionChannels {
        /// Frames requested by the `process` call.
        frames: usize,
    },

    /// The gain stage's reduction matrix covers a different number of
    /// frames than the block being processed.
    #[error("gain stage holds reduction for {expected} frames, but {actual} were provided")]
    FrameCountMismatch {
        /// Frames covered by the stored gain-reduction matrix.
        expected: usize,
        /// Frames in the block handed to `process`.
        actual: usize,
    },
}

/// What changed when an [`OutputBlock`] was prepared for a new block.
///
/// Processors use this to reset shape-dependent state: a channel-count
/// change invalidates per-channel histories, a frame-count change
/// invalidates per-block scratch data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeChange {
    /// The channel count differs from the previous block.
    pub channels: bool,
    /// The frame count differs (always true when `channels` is true).
    pub frames: bool,
}

impl ShapeChange {
    /// True if anything about the block shape changed.
    pub fn any(&self) -> bool {
        self.channels || self.frames
    }
}

/// Owned per-channel output buffers for one processor.
///
/// Replaces a raw pointer table into the buffers with owned storage the
/// processor hands out by reference: the buffers live exactly as long
/// as the processor, are reallocated only by [`prepare`](Self::prepare),
/// and a view returned by one `process` call must not be read after the
/// shape changes (the borrow checker enforces the single-instance part
/// of that contract; across shape changes the old view simply no longer
/// exists to be read).
#[derive(Debug, Clone, Default)]
pub struct OutputBlock {
    channels: Vec<Vec<f32>>,
    num_frames: usize,
}

impl OutputBlock {
    /// Create an empty block (zero channels, zero frames).
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the block holds `num_channels` buffers of `num_frames`
    /// samples, reallocating only on change.
    ///
    /// A channel-count change also counts as a frame-count change:
    /// freshly added channels get brand-new buffers. Buffer contents
    /// are unspecified after a shape change; every processor writes
    /// all `num_frames` samples of every channel before returning.
    pub fn prepare(&mut self, num_channels: usize, num_frames: usize) -> ShapeChange {
        let channels_changed = self.channels.len() != num_channels;
        let frames_changed = channels_changed || self.num_frames != num_frames;

        if channels_changed {
            self.channels.resize_with(num_channels, Vec::new);
        }
        if frames_changed {
            for ch in &mut self.channels {
                ch.resize(num_frames, 0.0);
            }
            self.num_frames = num_frames;
        }

        ShapeChange {
            channels: channels_changed,
            frames: frames_changed,
        }
    }

    /// Number of channels currently allocated.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames per channel currently allocated.
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Immutable view of the per-channel buffers.
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Mutable view of the per-channel buffers.
    pub fn channels_mut(&mut self) -> &mut [Vec<f32>] {
        &mut self.channels
    }

    /// Copy `num_frames` samples of every input channel into the
    /// corresponding output buffer (pass-through).
    ///
    /// The block must already be prepared for this shape.
    pub fn copy_from(&mut self, inputs: &[&[f32]], num_frames: usize) {
        debug_assert_eq!(self.channels.len(), inputs.len());
        for (dst, src) in self.channels.iter_mut().zip(inputs) {
            dst[..num_frames].copy_from_slice(&src[..num_frames]);
        }
    }
}

/// A block-based streaming audio processor.
///
/// # Contract
///
/// - `inputs` is one slice per channel; every slice must hold at least
///   `num_frames` samples, and only that prefix is read.
/// - Channel count and frame count may change between calls at any
///   time. The processor reallocates internal state on change and
///   reuses it otherwise; steady-state calls are allocation-free.
/// - The returned buffers always have exactly `inputs.len()` channels
///   of `num_frames` samples, and remain valid until the next call on
///   the same processor.
/// - Calls are synchronous and run to completion on the calling
///   (typically real-time audio) thread.
pub trait Processor {
    /// Process one block and return the per-channel output buffers.
    fn process<'a>(
        &'a mut self,
        inputs: &[&[f32]],
        num_frames: usize,
    ) -> Result<&'a [Vec<f32>], ProcessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_reports_changes() {
        let mut block = OutputBlock::new();

        let change = block.prepare(2, 64);
        assert!(change.channels);
        assert!(change.frames);
        assert_eq!(block.num_channels(), 2);
        assert_eq!(block.num_frames(), 64);

        // Same shape: nothing changes
        let change = block.prepare(2, 64);
        assert!(!change.channels);
        assert!(!change.frames);

        // Frame count change only
        let change = block.prepare(2, 128);
        assert!(!change.channels);
        assert!(change.frames);

        // Channel change implies frame change
        let change = block.prepare(1, 128);
        assert!(change.channels);
        assert!(change.frames);
    }

    #[test]
    fn test_prepare_allocates_correct_shape() {
        let mut block = OutputBlock::new();
        for &(ch, fr) in &[(1usize, 16usize), (2, 16), (2, 480), (8, 1), (1, 0), (0, 32)] {
            block.prepare(ch, fr);
            assert_eq!(block.num_channels(), ch);
            assert_eq!(block.num_frames(), fr);
            for c in block.channels() {
                assert_eq!(c.len(), fr);
            }
        }
    }

    #[test]
    fn test_copy_from() {
        let mut block = OutputBlock::new();
        block.prepare(2, 4);

        let a = [1.0, 2.0, 3.0, 4.0, 99.0];
        let b = [5.0, 6.0, 7.0, 8.0, 99.0];
        // Slices longer than num_frames: only the prefix is read
        block.copy_from(&[&a, &b], 4);

        assert_eq!(block.channels()[0], vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(block.channels()[1], vec![5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_error_messages_name_shapes() {
        let err = ProcessError::ChannelCountMismatch {
            expected: 2,
            actual: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('2') && msg.contains('3'), "{msg}");

        let err = ProcessError::FrameCountMismatch {
            expected: 64,
            actual: 128,
        };
        let msg = err.to_string();
        assert!(msg.contains("64") && msg.contains("128"), "{msg}");
    }
}
