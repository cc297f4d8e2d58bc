//! Baseband mixing oscillator.

use num_complex::Complex64;
use std::f64::consts::{PI, TAU};

/// A unit-magnitude complex oscillator driven at a fixed frequency and
/// sample rate (spec §4.1 "Phasor"). Used to mix a real input signal down
/// to complex baseband by multiplying with successive `rotate()` outputs.
#[derive(Debug, Clone)]
pub struct Phasor {
    phase: f64,
    step: f64,
}

impl Phasor {
    pub fn new(freq_hz: f64, sample_rate: f64) -> Self {
        Self { phase: 0.0, step: TAU * freq_hz / sample_rate }
    }

    /// Returns `exp(i*phase)` for the current phase, then advances it.
    pub fn rotate(&mut self) -> Complex64 {
        let out = Complex64::from_polar(1.0, self.phase);
        self.phase += self.step;
        if self.phase > PI {
            self.phase -= TAU;
        } else if self.phase <= -PI {
            self.phase += TAU;
        }
        out
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
