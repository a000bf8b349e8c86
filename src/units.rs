// SPDX-License-Identifier: LGPL-3.0-or-later

//! Unit conversion functions.
//!
//! Conversions between decibels, linear amplitude gain, power ratios,
//! and time/sample counts. The gate works in the power domain
//! (`10·log10`), so both the amplitude and power conversions are here.

/// Convert decibels to linear gain (amplitude ratio).
///
/// # Examples
/// ```
/// # use amp_dsp::units::db_to_gain;
/// assert!((db_to_gain(0.0) - 1.0).abs() < 1e-6);
/// assert!((db_to_gain(-6.0) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    (db * (std::f32::consts::LN_10 / 20.0)).exp()
}

/// Convert linear gain (amplitude ratio) to decibels.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.log10()
}

/// Convert decibels to a power ratio.
///
/// # Examples
/// ```
/// # use amp_dsp::units::db_to_power;
/// assert!((db_to_power(-120.0) / 1e-12 - 1.0).abs() < 1e-5);
/// ```
#[inline]
pub fn db_to_power(db: f32) -> f32 {
    (db * (std::f32::consts::LN_10 / 10.0)).exp()
}

/// Convert a power ratio to decibels.
#[inline]
pub fn power_to_db(pwr: f32) -> f32 {
    10.0 * pwr.log10()
}

/// Convert seconds to a (fractional) sample count.
///
/// # Arguments
/// * `sr` - Sample rate in Hz
/// * `time` - Time in seconds
#[inline]
pub fn seconds_to_samples(sr: f32, time: f32) -> f32 {
    time * sr
}

/// Convert a sample count to seconds.
///
/// # Arguments
/// * `sr` - Sample rate in Hz
/// * `samples` - Number of samples
#[inline]
pub fn samples_to_seconds(sr: f32, samples: f32) -> f32 {
    samples / sr
}
