// SPDX-License-Identifier: LGPL-3.0-or-later

//! # amp-dsp
//!
//! Real-time DSP building blocks for modeled guitar/amp audio.
//!
//! This crate provides the processing chain that typically sits around a
//! neural or analytic amp model:
//!
//! - **Noise gate**: a two-stage gate split into a [`gate::Trigger`]
//!   (envelope follower + hysteretic state machine computing per-sample
//!   gain reduction) and a [`gate::Gain`] (applies the reduction curve).
//! - **Recursive filters**: an order-agnostic IIR engine
//!   ([`filters::RecursiveFilter`]) with shelving/peaking biquads,
//!   single-pole high/low pass, and a pure-gain stage for tone shaping.
//! - **Impulse responses**: [`ir::ImpulseResponse`] convolves a loaded,
//!   possibly-resampled cabinet IR against a rewound sample history.
//!
//! All processors implement [`processor::Processor`]: a block-based
//! `process(inputs, num_frames)` that accepts varying channel and frame
//! counts at any time, reallocating only when the block shape changes.
//! A typical chain runs trigger → gain → filters → impulse response:
//!
//! ```
//! use amp_dsp::gate::{Gain, Trigger};
//! use amp_dsp::filters::{BiquadParams, Peaking};
//! use amp_dsp::processor::Processor;
//!
//! let mut trigger = Trigger::new();
//! trigger.set_sample_rate(48000.0);
//! let mut gain = Gain::new();
//! let mut tone = Peaking::new();
//! tone.set_params(&BiquadParams::new(48000.0, 800.0, 0.707, 3.0));
//!
//! let left = vec![0.1f32; 64];
//! let right = vec![0.1f32; 64];
//! let block: Vec<&[f32]> = vec![&left, &right];
//!
//! let gated = trigger.process(&block, 64).unwrap().to_vec();
//! trigger.push_to(&mut gain);
//! let inputs: Vec<&[f32]> = gated.iter().map(|c| c.as_slice()).collect();
//! let quiet = gain.process(&inputs, 64).unwrap().to_vec();
//! let inputs: Vec<&[f32]> = quiet.iter().map(|c| c.as_slice()).collect();
//! let shaped = tone.process(&inputs, 64).unwrap();
//! assert_eq!(shaped.len(), 2);
//! ```

// Foundational modules
pub mod consts;
pub mod interpolation;
pub mod units;

// Processing components
pub mod filters;
pub mod gate;
pub mod ir;
pub mod processor;

pub use processor::{ProcessError, Processor};
