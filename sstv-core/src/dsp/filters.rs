//! Scalar filtering primitives (spec §4.1): moving average, delay line,
//! Schmitt trigger, zero-phase exponential smoothing, and a Goertzel
//! single-frequency detector.

/// O(1) sliding-window average over the last `L` samples.
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    ring: Vec<f64>,
    pos: usize,
    sum: f64,
    count: usize,
}

impl SimpleMovingAverage {
    pub fn new(length: usize) -> Self {
        Self { ring: vec![0.0; length.max(1)], pos: 0, sum: 0.0, count: 0 }
    }

    pub fn push(&mut self, x: f64) -> f64 {
        let len = self.ring.len();
        if self.count < len {
            self.count += 1;
        } else {
            self.sum -= self.ring[self.pos];
        }
        self.ring[self.pos] = x;
        self.sum += x;
        self.pos = (self.pos + 1) % len;
        self.sum / self.count as f64
    }

    pub fn reset(&mut self) {
        self.ring.iter_mut().for_each(|v| *v = 0.0);
        self.pos = 0;
        self.sum = 0.0;
        self.count = 0;
    }
}

/// Ring buffer that outputs the sample pushed `L` steps ago.
#[derive(Debug, Clone)]
pub struct Delay {
    ring: Vec<f64>,
    pos: usize,
}

impl Delay {
    pub fn new(length: usize) -> Self {
        Self { ring: vec![0.0; length.max(1)], pos: 0 }
    }

    pub fn push(&mut self, x: f64) -> f64 {
        let len = self.ring.len();
        let out = self.ring[self.pos];
        self.ring[self.pos] = x;
        self.pos = (self.pos + 1) % len;
        out
    }

    pub fn reset(&mut self) {
        self.ring.iter_mut().for_each(|v| *v = 0.0);
        self.pos = 0;
    }
}

/// Hysteresis latch. Returns `false` once the input drops below `lo`,
/// `true` once it rises above `hi`, and holds its last state otherwise.
#[derive(Debug, Clone)]
pub struct SchmittTrigger {
    lo: f64,
    hi: f64,
    state: bool,
}

impl SchmittTrigger {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi, state: false }
    }

    pub fn update(&mut self, x: f64) -> bool {
        if x < self.lo {
            self.state = false;
        } else if x > self.hi {
            self.state = true;
        }
        self.state
    }

    pub fn reset(&mut self) {
        self.state = false;
    }
}

/// Exponential moving average with a cutoff expressed in output samples
/// per input-sample rate (spec §4.1). Used in forward+backward pairs by
/// line decoders to produce a zero-phase low-pass.
#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage {
    alpha: f64,
    y: Option<f64>,
}

impl ExponentialMovingAverage {
    pub fn new(freq: f64, rate: f64, order: f64) -> Self {
        let x = (std::f64::consts::TAU * freq / rate).cos();
        let alpha = (x - 1.0 + (x * (x - 4.0) + 3.0).sqrt()).powf(1.0 / order);
        Self { alpha, y: None }
    }

    pub fn avg(&mut self, x: f64) -> f64 {
        let y = match self.y {
            Some(prev) => prev * (1.0 - self.alpha) + self.alpha * x,
            None => x,
        };
        self.y = Some(y);
        y
    }

    pub fn reset(&mut self) {
        self.y = None;
    }
}

/// Single-frequency tone detector (spec §4.1). Kept in the core for
/// discrete tone-presence checks where full FM demodulation is overkill;
/// not currently wired into the sync or line-decode critical path.
#[derive(Debug, Clone)]
pub struct GoertzelFilter {
    coeff: f64,
    cos_theta: f64,
    sin_theta: f64,
    s1: f64,
    s2: f64,
}

impl GoertzelFilter {
    pub fn new(freq_hz: f64, sample_rate: f64) -> Self {
        let theta = std::f64::consts::TAU * freq_hz / sample_rate;
        Self {
            coeff: 2.0 * theta.cos(),
            cos_theta: theta.cos(),
            sin_theta: theta.sin(),
            s1: 0.0,
            s2: 0.0,
        }
    }

    pub fn process(&mut self, x: f64) {
        let s0 = x + self.coeff * self.s1 - self.s2;
        self.s2 = self.s1;
        self.s1 = s0;
    }

    pub fn magnitude(&self) -> f64 {
        let re = self.s1 - self.s2 * self.cos_theta;
        let im = self.s2 * self.sin_theta;
        (re * re + im * im).sqrt()
    }

    pub fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn sma_count_ramps_before_full_window() {
        let mut sma = SimpleMovingAverage::new(4);
        assert_abs_diff_eq!(sma.push(4.0), 4.0);
        assert_abs_diff_eq!(sma.push(8.0), 6.0);
    }

    #[test]
    fn sma_settles_to_window_average() {
        let mut sma = SimpleMovingAverage::new(3);
        sma.push(1.0);
        sma.push(2.0);
        sma.push(3.0);
        assert_abs_diff_eq!(sma.push(6.0), (2.0 + 3.0 + 6.0) / 3.0);
    }

    #[test]
    fn delay_emits_sample_from_l_steps_ago() {
        let mut d = Delay::new(3);
        assert_abs_diff_eq!(d.push(1.0), 0.0);
        assert_abs_diff_eq!(d.push(2.0), 0.0);
        assert_abs_diff_eq!(d.push(3.0), 0.0);
        assert_abs_diff_eq!(d.push(4.0), 1.0);
        assert_abs_diff_eq!(d.push(5.0), 2.0);
    }

    #[test]
    fn schmitt_trigger_has_hysteresis() {
        let mut trig = SchmittTrigger::new(-1.0, 1.0);
        assert!(!trig.update(0.0));
        assert!(!trig.update(-2.0));
        assert!(!trig.update(0.0));
        assert!(trig.update(2.0));
        assert!(trig.update(0.0));
    }

    #[test]
    fn ema_converges_toward_constant_input() {
        let mut ema = ExponentialMovingAverage::new(100.0, 48_000.0, 2);
        let mut y = 0.0;
        for _ in 0..5_000 {
            y = ema.avg(1.0);
        }
        assert_abs_diff_eq!(y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn goertzel_magnitude_grows_with_cycle_count_up_to_window_length() {
        let freq = 1000.0;
        let rate = 48_000.0;
        let window = 100;
        let mut g = GoertzelFilter::new(freq, rate);
        let mut phase = 0.0f64;
        let step = std::f64::consts::TAU * freq / rate;
        let mut last = 0.0;
        for n in 1..=window {
            g.process(phase.sin());
            phase += step;
            let mag = g.magnitude();
            if n > 1 {
                assert!(mag >= last - 1e-9);
            }
            last = mag;
        }
    }

    proptest! {
        /// Feeding more cycles of a tone matching the filter's target
        /// frequency never decreases its magnitude, for any target
        /// frequency comfortably inside the Nyquist range (spec §13).
        #[test]
        fn goertzel_magnitude_is_monotonic_in_cycle_count(freq in 200.0f64..4_000.0) {
            let rate = 48_000.0;
            let mut g = GoertzelFilter::new(freq, rate);
            let step = std::f64::consts::TAU * freq / rate;
            let mut phase = 0.0f64;
            let mut last = 0.0;
            for n in 1..=64 {
                g.process(phase.sin());
                phase += step;
                let mag = g.magnitude();
                if n > 1 {
                    prop_assert!(mag >= last - 1e-6);
                }
                last = mag;
            }
        }
    }
}
