// SPDX-License-Identifier: LGPL-3.0-or-later

//! WAV decoding for impulse responses.
//!
//! Thin wrapper over `hound` that normalizes whatever PCM layout the
//! file uses to mono `f32` in `[-1, 1]`. Impulse responses are treated
//! as mono: for multi-channel files only the first channel is kept.

use std::path::Path;

use thiserror::Error;

/// Why a WAV file could not be turned into an impulse response.
#[derive(Debug, Error)]
pub enum WavError {
    /// The file does not exist (or is not a regular file).
    #[error("impulse response file not found: {0}")]
    NotFound(String),

    /// The file decoded, but uses a sample layout this loader does not
    /// handle.
    #[error("unsupported wav sample format: {0}")]
    UnsupportedFormat(String),

    /// The file is not valid WAV (or failed mid-read).
    #[error("failed to decode wav: {0}")]
    Decode(#[from] hound::Error),
}

/// Load a WAV file as mono `f32` samples plus its native sample rate.
///
/// Handles 16/24/32-bit integer and 32-bit float PCM. Integer samples
/// are scaled by their nominal full-scale value. Multi-channel files
/// keep channel 0 only.
///
/// # Arguments
/// * `path` - Path to the WAV file
///
/// # Returns
/// `(samples, sample_rate)` on success.
pub fn load(path: &Path) -> Result<(Vec<f32>, u32), WavError> {
    if !path.is_file() {
        return Err(WavError::NotFound(path.display().to_string()));
    }

    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        (hound::SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<Result<Vec<_>, _>>()?,
        (hound::SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8_388_608.0))
            .collect::<Result<Vec<_>, _>>()?,
        (hound::SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 2_147_483_648.0))
            .collect::<Result<Vec<_>, _>>()?,
        (format, bits) => {
            return Err(WavError::UnsupportedFormat(format!("{format:?}/{bits}-bit")));
        }
    };

    let channels = spec.channels.max(1) as usize;
    let mono: Vec<f32> = interleaved.iter().step_by(channels).copied().collect();
    Ok((mono, spec.sample_rate))
}
