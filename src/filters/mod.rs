// SPDX-License-Identifier: LGPL-3.0-or-later

//! Recursive (IIR) linear filters for tone shaping.
//!
//! The engine ([`RecursiveFilter`]) evaluates an arbitrary-degree
//! difference equation over per-channel circular histories. The
//! concrete filter types only derive coefficients from musician-facing
//! parameters:
//!
//! - [`LowShelf`], [`Peaking`], [`HighShelf`]: biquads per the
//!   RBJ Audio EQ Cookbook, driven by [`BiquadParams`]
//! - [`HighPass`], [`LowPass`]: single-pole filters driven by
//!   [`OnePoleParams`]
//! - [`Level`]: a pure linear gain

pub mod biquad;
pub mod level;
pub mod one_pole;
pub mod recursive;

pub use biquad::{BiquadParams, HighShelf, LowShelf, Peaking};
pub use level::Level;
pub use one_pole::{HighPass, LowPass, OnePoleParams};
pub use recursive::RecursiveFilter;
