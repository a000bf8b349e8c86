// SPDX-License-Identifier: LGPL-3.0-or-later

//! Impulse-response convolver.
//!
//! Applies a loaded cabinet/room response as a causal FIR: the taps are
//! the (possibly resampled) recording, reversed and level-calibrated,
//! and each output sample is a dot product against the most recent
//! history. The history is mono (channel 0 of the input) and the
//! result is broadcast to every output channel.

use std::path::Path;

use crate::consts::{IR_GAIN_TRIM_DB, IR_MAX_LENGTH, IR_REFERENCE_SAMPLE_RATE};
use crate::processor::{OutputBlock, ProcessError, Processor};
use crate::units::db_to_gain;

use super::history::HistoryBuffer;
use super::resample::resample_cubic;
use super::wav::{self, WavError};

/// Outcome of loading an impulse response.
///
/// A failed load is a *state*, not an error: construction still
/// succeeds so the host can inspect the status and decide on fallback
/// (bypass, default cabinet, ...). An unloaded convolver processes to
/// silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The response loaded and the taps are in place.
    Success,
    /// The file was missing.
    NotFound,
    /// The file exists but uses an unsupported sample layout.
    UnsupportedFormat,
    /// Anything else (corrupt file, read failure).
    Other,
}

impl From<&WavError> for LoadStatus {
    fn from(err: &WavError) -> Self {
        match err {
            WavError::NotFound(_) => LoadStatus::NotFound,
            WavError::UnsupportedFormat(_) => LoadStatus::UnsupportedFormat,
            WavError::Decode(_) => LoadStatus::Other,
        }
    }
}

/// Raw impulse-response audio plus its native sample rate.
///
/// Lets a host keep a decoded response around and rebuild convolvers
/// at new processing rates without re-reading the file.
#[derive(Debug, Clone, PartialEq)]
pub struct IrData {
    /// The recording, mono.
    pub raw_audio: Vec<f32>,
    /// Rate the recording was made at, in Hz.
    pub sample_rate: f32,
}

/// Cabinet simulation by direct convolution.
///
/// # Examples
/// ```
/// use amp_dsp::ir::{ImpulseResponse, IrData, LoadStatus};
/// use amp_dsp::processor::Processor;
///
/// // A one-tap unit response: output is the gain-calibrated input
/// let data = IrData { raw_audio: vec![1.0], sample_rate: 48000.0 };
/// let mut ir = ImpulseResponse::from_data(&data, 48000.0);
/// assert_eq!(ir.status(), LoadStatus::Success);
///
/// let input = [1.0f32, 0.0, 0.0, 0.0];
/// let out = ir.process(&[&input], 4).unwrap();
/// assert!((out[0][0] - 10f32.powf(-18.0 / 20.0)).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct ImpulseResponse {
    status: LoadStatus,
    /// Decoded recording, kept for re-rating via [`ir_data`](Self::ir_data).
    raw_audio: Vec<f32>,
    raw_sample_rate: f32,
    /// Processing rate the taps were built for.
    sample_rate: f32,
    /// Reversed, gain-calibrated taps.
    weight: Vec<f32>,
    history: HistoryBuffer,
    output: OutputBlock,
}

impl ImpulseResponse {
    /// Load a response from a WAV file, building taps for the given
    /// processing sample rate.
    ///
    /// Never fails: on a load problem the convolver comes up empty
    /// (silent) with [`status`](Self::status) telling why.
    pub fn from_file(path: &Path, sample_rate: f32) -> Self {
        let mut ir = Self {
            status: LoadStatus::Other,
            raw_audio: Vec::new(),
            raw_sample_rate: 0.0,
            sample_rate,
            weight: Vec::new(),
            history: HistoryBuffer::new(),
            output: OutputBlock::new(),
        };
        match wav::load(path) {
            Ok((samples, rate)) => {
                ir.status = LoadStatus::Success;
                ir.raw_audio = samples;
                ir.raw_sample_rate = rate as f32;
                ir.set_weights();
            }
            Err(err) => {
                ir.status = LoadStatus::from(&err);
                log::warn!("failed to load impulse response {}: {err}", path.display());
            }
        }
        ir
    }

    /// Build a convolver from already-decoded audio (no file access).
    pub fn from_data(data: &IrData, sample_rate: f32) -> Self {
        let mut ir = Self {
            status: LoadStatus::Success,
            raw_audio: data.raw_audio.clone(),
            raw_sample_rate: data.sample_rate,
            sample_rate,
            weight: Vec::new(),
            history: HistoryBuffer::new(),
            output: OutputBlock::new(),
        };
        ir.set_weights();
        ir
    }

    /// The load outcome. Check before trusting the output: an
    /// unloaded convolver silently produces zeros.
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Processing sample rate the taps were built for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Number of active taps.
    pub fn length(&self) -> usize {
        self.weight.len()
    }

    /// The decoded recording and its native rate, for building another
    /// convolver at a different processing rate.
    pub fn ir_data(&self) -> IrData {
        IrData {
            raw_audio: self.raw_audio.clone(),
            sample_rate: self.raw_sample_rate,
        }
    }

    /// Build the tap vector from the raw recording.
    ///
    /// Resamples (via cubic interpolation, with a zero pad so the
    /// stencil sees silence past the edges) when the recording rate
    /// differs from the processing rate, truncates to
    /// [`IR_MAX_LENGTH`], reverses for the forward dot product, and
    /// applies the level calibration: a fixed −18 dB trim scaled by
    /// `48000 / fs` so perceived level is rate-independent.
    fn set_weights(&mut self) {
        let resampled: Vec<f32> = if self.raw_sample_rate == self.sample_rate {
            self.raw_audio.clone()
        } else {
            let mut padded = Vec::with_capacity(self.raw_audio.len() + 2);
            padded.push(0.0);
            padded.extend_from_slice(&self.raw_audio);
            padded.push(0.0);
            resample_cubic(&padded, self.raw_sample_rate, self.sample_rate, 0.0)
        };

        let length = resampled.len().min(IR_MAX_LENGTH);
        let gain = db_to_gain(IR_GAIN_TRIM_DB) * IR_REFERENCE_SAMPLE_RATE / self.sample_rate;
        self.weight.clear();
        self.weight.extend(resampled[..length].iter().rev().map(|v| gain * v));
        self.history.set_required(length.saturating_sub(1));

        log::debug!(
            "impulse response: {} taps at {} Hz (recorded at {} Hz)",
            length,
            self.sample_rate,
            self.raw_sample_rate
        );
    }
}

impl Processor for ImpulseResponse {
    /// Convolve one block.
    ///
    /// Only channel 0 feeds the history; the channel-0 result is
    /// copied to every other channel (mono cabinet, multi-channel
    /// duplication).
    ///
    /// # Panics
    /// If called with zero channels but a nonzero frame count. That
    /// is a broken chain, not a recoverable condition.
    fn process<'a>(
        &'a mut self,
        inputs: &[&[f32]],
        num_frames: usize,
    ) -> Result<&'a [Vec<f32>], ProcessError> {
        assert!(
            !inputs.is_empty() || num_frames == 0,
            "impulse response fed {num_frames} frames of zero channels"
        );
        self.output.prepare(inputs.len(), num_frames);
        if inputs.is_empty() {
            return Ok(self.output.channels());
        }

        self.history.update(&inputs[0][..num_frames]);

        let taps = self.weight.len();
        let required = self.history.required();
        let window = self.history.window(required + num_frames);

        let (first, rest) = self.output.channels_mut().split_at_mut(1);
        for (i, out) in first[0][..num_frames].iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (w, x) in self.weight.iter().zip(&window[i..i + taps]) {
                acc += w * x;
            }
            *out = acc;
        }
        for ch in rest {
            ch.copy_from_slice(&first[0]);
        }

        self.history.advance(num_frames);
        Ok(self.output.channels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    /// The fixed calibration factor at the reference rate.
    fn unit_gain() -> f32 {
        10f32.powf(-18.0 / 20.0)
    }

    fn unit_ir() -> ImpulseResponse {
        ImpulseResponse::from_data(
            &IrData {
                raw_audio: vec![1.0],
                sample_rate: SR,
            },
            SR,
        )
    }

    #[test]
    fn test_unit_tap_reproduces_input_scaled() {
        let mut ir = unit_ir();
        let input: Vec<f32> = (0..64).map(|i| (i as f32 * 0.2).sin()).collect();
        let out = ir.process(&[&input], 64).unwrap();
        let g = unit_gain();
        for (i, (o, x)) in out[0].iter().zip(&input).enumerate() {
            assert!(
                (o - g * x).abs() < 1e-6,
                "sample {i}: {o} vs {}",
                g * x
            );
        }
    }

    #[test]
    fn test_delay_tap_shifts_by_one_sample() {
        // IR [0, 1] is a one-sample delay
        let mut ir = ImpulseResponse::from_data(
            &IrData {
                raw_audio: vec![0.0, 1.0],
                sample_rate: SR,
            },
            SR,
        );
        let input = [1.0f32, 2.0, 3.0, 4.0];
        let out = ir.process(&[&input], 4).unwrap();
        let g = unit_gain();
        assert!((out[0][0] - 0.0).abs() < 1e-7);
        for i in 1..4 {
            assert!(
                (out[0][i] - g * input[i - 1]).abs() < 1e-6,
                "sample {i}: {}",
                out[0][i]
            );
        }
    }

    #[test]
    fn test_history_carries_across_blocks() {
        let mut ir = ImpulseResponse::from_data(
            &IrData {
                raw_audio: vec![0.0, 1.0],
                sample_rate: SR,
            },
            SR,
        );
        let g = unit_gain();

        let first = [1.0f32, 2.0];
        ir.process(&[&first], 2).unwrap();
        let second = [3.0f32, 4.0];
        let out = ir.process(&[&second], 2).unwrap();
        // First sample of block 2 sees the last sample of block 1
        assert!((out[0][0] - g * 2.0).abs() < 1e-6, "{}", out[0][0]);
        assert!((out[0][1] - g * 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_mono_kernel_broadcasts_to_all_channels() {
        let mut ir = unit_ir();
        let left = [1.0f32, 2.0, 3.0];
        // Channel 1 content is ignored entirely
        let right = [-9.0f32, -9.0, -9.0];
        let out = ir.process(&[&left, &right], 3).unwrap();
        assert_eq!(out[0], out[1]);
        let g = unit_gain();
        assert!((out[1][2] - g * 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_long_ir_truncated_to_max_length() {
        let mut raw = vec![0.0f32; 10_000];
        raw[0] = 1.0;
        let ir = ImpulseResponse::from_data(
            &IrData {
                raw_audio: raw,
                sample_rate: SR,
            },
            SR,
        );
        assert_eq!(ir.length(), IR_MAX_LENGTH);
    }

    #[test]
    fn test_resampling_path_scales_tap_count() {
        // Recorded at 24 kHz, processed at 48 kHz: roughly twice the taps
        let raw = vec![0.5f32; 1000];
        let ir = ImpulseResponse::from_data(
            &IrData {
                raw_audio: raw,
                sample_rate: 24000.0,
            },
            SR,
        );
        assert!(
            ir.length() > 1900 && ir.length() < 2100,
            "expected ~2000 taps, got {}",
            ir.length()
        );
    }

    #[test]
    fn test_rate_dependent_gain_compensation() {
        // The same unit tap built for 96 kHz carries half the gain of
        // the 48 kHz build
        let data = IrData {
            raw_audio: vec![1.0],
            sample_rate: 96000.0,
        };
        let mut ir = ImpulseResponse::from_data(&data, 96000.0);
        let input = [1.0f32];
        let out = ir.process(&[&input], 1).unwrap();
        assert!((out[0][0] - unit_gain() * 0.5).abs() < 1e-6, "{}", out[0][0]);
    }

    #[test]
    fn test_missing_file_yields_status_and_silence() {
        let mut ir = ImpulseResponse::from_file(Path::new("/no/such/cab.wav"), SR);
        assert_eq!(ir.status(), LoadStatus::NotFound);
        assert_eq!(ir.length(), 0);

        let input = [1.0f32, -1.0, 0.5];
        let out = ir.process(&[&input], 3).unwrap();
        assert_eq!(out[0], vec![0.0; 3]);
    }

    #[test]
    fn test_ir_data_roundtrip() {
        let data = IrData {
            raw_audio: vec![0.25, 0.5, -0.5],
            sample_rate: 44100.0,
        };
        let ir = ImpulseResponse::from_data(&data, SR);
        assert_eq!(ir.ir_data(), data);

        // Rebuild at the recording's own rate: no resampling, taps are
        // the reversed scaled recording
        let rebuilt = ImpulseResponse::from_data(&ir.ir_data(), 44100.0);
        assert_eq!(rebuilt.length(), 3);
    }

    #[test]
    fn test_load_from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cab.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        writer.write_sample(1.0f32).unwrap();
        writer.write_sample(0.5f32).unwrap();
        writer.finalize().unwrap();

        let mut ir = ImpulseResponse::from_file(&path, SR);
        assert_eq!(ir.status(), LoadStatus::Success);
        assert_eq!(ir.length(), 2);

        let input = [1.0f32, 0.0, 0.0];
        let out = ir.process(&[&input], 3).unwrap();
        let g = unit_gain();
        assert!((out[0][0] - g).abs() < 1e-6);
        assert!((out[0][1] - g * 0.5).abs() < 1e-6);
        assert!(out[0][2].abs() < 1e-7);
    }

    #[test]
    fn test_shape_changes_between_blocks() {
        let mut ir = unit_ir();
        let a = [1.0f32; 16];
        let out = ir.process(&[&a], 16).unwrap();
        assert_eq!(out.len(), 1);

        let b = [1.0f32; 32];
        let out = ir.process(&[&b, &b], 32).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].len(), 32);
    }

    #[test]
    #[should_panic(expected = "zero channels")]
    fn test_zero_channels_with_frames_panics() {
        let mut ir = unit_ir();
        let _ = ir.process(&[], 8);
    }
}
