// SPDX-License-Identifier: LGPL-3.0-or-later

//! Two-stage noise gate: trigger and gain.
//!
//! The gate is split so the gain reduction can be computed from one
//! point in the chain (before the amp model, where the noise floor is
//! audible) and applied at another (after it, where opening artifacts
//! are cheapest). The [`Trigger`] listens to the signal and computes a
//! per-channel, per-sample gain-reduction curve in dB; the [`Gain`]
//! stage applies a curve it was handed to whatever audio flows through
//! it.
//!
//! The two stages are coupled by an explicit hand-off rather than by
//! hidden references: run the trigger, call
//! [`Trigger::push_to`] (or copy
//! [`Trigger::gain_reduction_db`] into
//! [`Gain::set_gain_reduction_db`]), then run the gain stage on the
//! same block shape.

pub mod gain;
pub mod trigger;

pub use gain::Gain;
pub use trigger::{Trigger, TriggerParams};
