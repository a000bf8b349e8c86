// SPDX-License-Identifier: LGPL-3.0-or-later

//! Impulse-response (cabinet) convolution.
//!
//! An [`ImpulseResponse`] turns a recorded cabinet/room response into a
//! causal FIR applied by sliding dot product over a [`HistoryBuffer`]
//! of recent input. Responses come from WAV files ([`wav::load`]) or a
//! previously extracted [`IrData`], and are resampled
//! ([`resample::resample_cubic`]) when the recording rate differs from
//! the processing rate.

pub mod history;
pub mod resample;
pub mod response;
pub mod wav;

pub use history::HistoryBuffer;
pub use response::{ImpulseResponse, IrData, LoadStatus};
