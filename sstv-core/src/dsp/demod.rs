//! FM demodulation (spec §4.1, §4.2).

use num_complex::Complex64;
use std::f64::consts::{PI, TAU};

/// Restricts `x` to the principal range `(-pi, pi]`.
pub fn wrap_phase(x: f64) -> f64 {
    let mut y = x;
    while y > PI {
        y -= TAU;
    }
    while y <= -PI {
        y += TAU;
    }
    y
}

/// Converts successive complex baseband samples into normalized
/// instantaneous frequency values expressed in units of `bandwidth`.
#[derive(Debug, Clone)]
pub struct FmDemodulator {
    sample_rate: f64,
    bandwidth: f64,
    prev_arg: f64,
}

impl FmDemodulator {
    pub fn new(sample_rate: f64, bandwidth: f64) -> Self {
        Self { sample_rate, bandwidth, prev_arg: 0.0 }
    }

    pub fn demodulate(&mut self, s: Complex64) -> f64 {
        let arg = s.arg();
        let delta = wrap_phase(arg - self.prev_arg);
        self.prev_arg = arg;
        (self.sample_rate / (self.bandwidth * PI)) * delta
    }

    pub fn reset(&mut self) {
        self.prev_arg = 0.0;
    }
}
