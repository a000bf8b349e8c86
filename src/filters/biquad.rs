// SPDX-License-Identifier: LGPL-3.0-or-later

//! Shelving and peaking biquads per the RBJ Audio EQ Cookbook.
//!
//! See <https://webaudio.github.io/Audio-EQ-Cookbook/audio-eq-cookbook.html>.
//! Each type computes its `a`/`b` coefficient sets from
//! [`BiquadParams`] and hands them to the shared
//! [`RecursiveFilter`] engine with the feedback side pre-negated and
//! normalized by `a0`, so the engine's inner loop is pure addition.

use crate::processor::{ProcessError, Processor};

use super::recursive::RecursiveFilter;

/// The three musician-facing parameters (plus sample rate) shared by
/// every biquad type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadParams {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Center/corner frequency in Hz.
    pub frequency: f32,
    /// Quality factor (bandwidth).
    pub quality: f32,
    /// Gain in dB (shelving/peaking amount).
    pub gain_db: f32,
}

impl BiquadParams {
    /// Create a parameter set.
    pub fn new(sample_rate: f32, frequency: f32, quality: f32, gain_db: f32) -> Self {
        Self {
            sample_rate,
            frequency,
            quality,
            gain_db,
        }
    }

    /// Cookbook amplitude term `A = 10^(gain_db / 40)`.
    fn a(&self) -> f32 {
        10.0f32.powf(self.gain_db / 40.0)
    }

    /// Normalized angular frequency `ω0 = 2π·f / fs`.
    fn omega_0(&self) -> f32 {
        2.0 * std::f32::consts::PI * self.frequency / self.sample_rate
    }

    /// Cookbook bandwidth term `α = sin(ω0) / (2Q)`.
    fn alpha(&self, omega_0: f32) -> f32 {
        omega_0.sin() / (2.0 * self.quality)
    }
}

/// Normalize by `a0`, flip the feedback signs, and load the engine.
fn assign_coefficients(
    filter: &mut RecursiveFilter,
    a0: f32,
    a1: f32,
    a2: f32,
    b0: f32,
    b1: f32,
    b2: f32,
) {
    filter.set_coefficients(
        &[b0 / a0, b1 / a0, b2 / a0],
        // Slot 0 is never read; sign flip lets the engine add.
        &[0.0, -a1 / a0, -a2 / a0],
    );
}

macro_rules! biquad_processor {
    ($name:ident) => {
        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Processor for $name {
            fn process<'a>(
                &'a mut self,
                inputs: &[&[f32]],
                num_frames: usize,
            ) -> Result<&'a [Vec<f32>], ProcessError> {
                self.filter.process(inputs, num_frames)
            }
        }
    };
}

/// Low-shelf biquad: boosts or cuts everything below the corner
/// frequency by `gain_db`.
#[derive(Debug, Clone)]
pub struct LowShelf {
    filter: RecursiveFilter,
}

impl LowShelf {
    /// Create a low shelf with zeroed coefficients (silent until
    /// [`set_params`](Self::set_params) is called).
    pub fn new() -> Self {
        Self {
            filter: RecursiveFilter::new(3, 3),
        }
    }

    /// Derive and load coefficients for the given parameters.
    pub fn set_params(&mut self, params: &BiquadParams) {
        let a = params.a();
        let omega_0 = params.omega_0();
        let alpha = params.alpha(omega_0);
        let cosw = omega_0.cos();

        let ap = a + 1.0;
        let am = a - 1.0;
        let root_a2alpha = 2.0 * a.sqrt() * alpha;

        let b0 = a * (ap - am * cosw + root_a2alpha);
        let b1 = 2.0 * a * (am - ap * cosw);
        let b2 = a * (ap - am * cosw - root_a2alpha);
        let a0 = ap + am * cosw + root_a2alpha;
        let a1 = -2.0 * (am + ap * cosw);
        let a2 = ap + am * cosw - root_a2alpha;

        assign_coefficients(&mut self.filter, a0, a1, a2, b0, b1, b2);
    }
}

biquad_processor!(LowShelf);

/// Peaking (bell) biquad: boosts or cuts a band around the center
/// frequency by `gain_db`.
#[derive(Debug, Clone)]
pub struct Peaking {
    filter: RecursiveFilter,
}

impl Peaking {
    /// Create a peaking filter with zeroed coefficients.
    pub fn new() -> Self {
        Self {
            filter: RecursiveFilter::new(3, 3),
        }
    }

    /// Derive and load coefficients for the given parameters.
    pub fn set_params(&mut self, params: &BiquadParams) {
        let a = params.a();
        let omega_0 = params.omega_0();
        let alpha = params.alpha(omega_0);
        let cosw = omega_0.cos();

        let b0 = 1.0 + alpha * a;
        let b1 = -2.0 * cosw;
        let b2 = 1.0 - alpha * a;
        let a0 = 1.0 + alpha / a;
        let a1 = -2.0 * cosw;
        let a2 = 1.0 - alpha / a;

        assign_coefficients(&mut self.filter, a0, a1, a2, b0, b1, b2);
    }
}

biquad_processor!(Peaking);

/// High-shelf biquad: boosts or cuts everything above the corner
/// frequency by `gain_db`.
#[derive(Debug, Clone)]
pub struct HighShelf {
    filter: RecursiveFilter,
}

impl HighShelf {
    /// Create a high shelf with zeroed coefficients.
    pub fn new() -> Self {
        Self {
            filter: RecursiveFilter::new(3, 3),
        }
    }

    /// Derive and load coefficients for the given parameters.
    pub fn set_params(&mut self, params: &BiquadParams) {
        let a = params.a();
        let omega_0 = params.omega_0();
        let alpha = params.alpha(omega_0);
        let cosw = omega_0.cos();

        let root_a2alpha = 2.0 * a.sqrt() * alpha;
        let ap = a + 1.0;
        let am = a - 1.0;

        let b0 = a * (ap + am * cosw + root_a2alpha);
        let b1 = -2.0 * a * (am + ap * cosw);
        let b2 = a * (ap + am * cosw - root_a2alpha);
        let a0 = ap - am * cosw + root_a2alpha;
        let a1 = 2.0 * (am - ap * cosw);
        let a2 = ap - am * cosw - root_a2alpha;

        assign_coefficients(&mut self.filter, a0, a1, a2, b0, b1, b2);
    }
}

biquad_processor!(HighShelf);
