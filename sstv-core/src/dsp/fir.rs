//! Kaiser-windowed FIR low-pass design and complex ring convolution
//! (spec §4.1).

use num_complex::Complex64;

use crate::errors::{DspError, SstvError};

const KAISER_BETA: f64 = 2.0;

/// Zeroth-order modified Bessel function of the first kind, computed by
/// summing the first 35 terms of its series expansion (sorted ascending
/// before summation for numerical stability, per spec).
fn bessel_i0(x: f64) -> f64 {
    let half_x_sq = (x / 2.0).powi(2);
    let mut term = 1.0f64;
    let mut terms = Vec::with_capacity(35);
    terms.push(term);
    for k in 1..35usize {
        term *= half_x_sq / (k * k) as f64;
        terms.push(term);
    }
    terms.sort_by(|a, b| a.partial_cmp(b).unwrap());
    terms.into_iter().sum()
}

fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        (std::f64::consts::PI * x).sin() / (std::f64::consts::PI * x)
    }
}

/// Designs an odd-length Kaiser-windowed low-pass FIR with cutoff
/// `cutoff_hz` at `sample_rate`, returning `length` real taps.
pub fn kaiser_lowpass_taps(cutoff_hz: f64, sample_rate: f64, length: usize) -> Result<Vec<f64>, SstvError> {
    if length % 2 == 0 || length == 0 {
        return Err(DspError::FilterDesignFailed {
            reason: format!("Kaiser FIR length must be odd and non-zero, got {length}"),
        }
        .into());
    }
    let center = (length - 1) as f64 / 2.0;
    let denom_i0 = bessel_i0(KAISER_BETA);
    let taps = (0..length)
        .map(|n| {
            let m = n as f64 - center;
            let windowed_arg = if center > 0.0 {
                1.0 - (m / center).powi(2)
            } else {
                1.0
            };
            let window = bessel_i0(KAISER_BETA * windowed_arg.max(0.0).sqrt()) / denom_i0;
            sinc(cutoff_hz * m * 2.0 / sample_rate) * window
        })
        .collect();
    Ok(taps)
}

/// Ring of `L` complex samples convolved with a fixed set of real taps;
/// O(L) per pushed sample.
#[derive(Debug, Clone)]
pub struct ComplexFir {
    taps: Vec<f64>,
    ring: Vec<Complex64>,
    pos: usize,
}

impl ComplexFir {
    pub fn new(taps: Vec<f64>) -> Self {
        let len = taps.len();
        Self { taps, ring: vec![Complex64::new(0.0, 0.0); len], pos: 0 }
    }

    pub fn push(&mut self, sample: Complex64) -> Complex64 {
        let len = self.ring.len();
        self.ring[self.pos] = sample;
        let mut acc = Complex64::new(0.0, 0.0);
        for (k, &tap) in self.taps.iter().enumerate() {
            let idx = (self.pos + len - k) % len;
            acc += self.ring[idx] * tap;
        }
        self.pos = (self.pos + 1) % len;
        acc
    }

    pub fn group_delay(&self) -> usize {
        (self.taps.len().saturating_sub(1)) / 2
    }

    pub fn reset(&mut self) {
        self.ring.iter_mut().for_each(|v| *v = Complex64::new(0.0, 0.0));
        self.pos = 0;
    }
}
