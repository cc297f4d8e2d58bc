//! Sync-pulse detection: baseband mixing, FM demodulation, and
//! pulse-width classification (spec §4.2).

use serde::{Deserialize, Serialize};

use crate::dsp::{ComplexFir, Delay, FmDemodulator, Phasor, SchmittTrigger, SimpleMovingAverage};
use crate::errors::SstvError;

pub const SYNC_HZ: f64 = 1200.0;
pub const BLACK_HZ: f64 = 1500.0;
pub const WHITE_HZ: f64 = 2300.0;
pub const MIXER_CENTER_HZ: f64 = 1900.0;
pub const BANDWIDTH_HZ: f64 = 800.0;

/// Converts a real tone frequency into the normalized value the FM
/// demodulator produces for it after baseband mixing at
/// [`MIXER_CENTER_HZ`] (spec §4.2's Schmitt-threshold and
/// frequency-validation normalization).
pub fn normalized_freq(f_hz: f64) -> f64 {
    2.0 * (f_hz - MIXER_CENTER_HZ) / BANDWIDTH_HZ
}

/// Classified pulse width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncWidth {
    Five,
    Nine,
    Twenty,
}

/// An accepted sync pulse (spec §3 "Sync event").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncEvent {
    pub width: SyncWidth,
    /// Offset of the pulse's trailing edge within the pushed block,
    /// compensated for the baseband filter's group delay. May be
    /// negative when the filter delay exceeds the sample index.
    pub sample_offset_in_block: isize,
    pub freq_offset: f64,
}

/// Converts real audio samples into normalized demodulated frequency
/// values and classifies 1200 Hz dwells as sync pulses.
#[derive(Debug, Clone)]
pub struct SyncDetector {
    mixer: Phasor,
    lowpass: ComplexFir,
    demod: FmDemodulator,
    sma: SimpleMovingAverage,
    delay: Delay,
    trigger: SchmittTrigger,
    counter: usize,
    sample_rate: f64,
}

impl SyncDetector {
    pub fn new(sample_rate: f64) -> Result<Self, SstvError> {
        let fir_cutoff = (2800.0 - 1000.0) / 2.0;
        let mut fir_length = (0.002 * sample_rate).round() as usize;
        fir_length |= 1;
        let taps = crate::dsp::fir::kaiser_lowpass_taps(fir_cutoff, sample_rate, fir_length)?;

        let mut sma_length = (0.0025 * sample_rate).round() as usize;
        sma_length |= 1;

        let hi = normalized_freq((SYNC_HZ + BLACK_HZ) / 2.0);
        let lo = normalized_freq((SYNC_HZ + (SYNC_HZ + BLACK_HZ) / 2.0) / 2.0);

        Ok(Self {
            mixer: Phasor::new(-MIXER_CENTER_HZ, sample_rate),
            lowpass: ComplexFir::new(taps),
            demod: FmDemodulator::new(sample_rate, BANDWIDTH_HZ),
            sma: SimpleMovingAverage::new(sma_length),
            delay: Delay::new(sma_length),
            trigger: SchmittTrigger::new(lo, hi),
            counter: 0,
            sample_rate,
        })
    }

    pub fn reset(&mut self) {
        self.mixer.reset();
        self.lowpass.reset();
        self.demod.reset();
        self.sma.reset();
        self.delay.reset();
        self.trigger.reset();
        self.counter = 0;
    }

    /// Processes one real sample, returning its normalized demodulated
    /// frequency value and, if the sample completed a classified pulse,
    /// the resulting [`SyncEvent`].
    pub fn process_sample(&mut self, sample: f32, index_in_block: usize) -> (f64, Option<SyncEvent>) {
        let baseband = self.mixer.rotate() * (sample as f64);
        let filtered = self.lowpass.push(baseband);
        let freq = self.demod.demodulate(filtered);

        let sma_val = self.sma.push(freq);
        let delayed = self.delay.push(freq);
        let outside_pulse = self.trigger.update(sma_val);

        let mut event = None;
        if !outside_pulse {
            self.counter += 1;
        } else if self.counter > 0 {
            event = self.classify(delayed, index_in_block);
            self.counter = 0;
        }
        (freq, event)
    }

    fn classify(&self, delayed_freq: f64, index_in_block: usize) -> Option<SyncEvent> {
        let fs = self.sample_rate;
        let c = self.counter as f64;
        let width = if c >= 0.0025 * fs && c < 0.0070 * fs {
            SyncWidth::Five
        } else if c >= 0.0070 * fs && c < 0.0145 * fs {
            SyncWidth::Nine
        } else if c >= 0.0145 * fs && c <= 0.0250 * fs {
            SyncWidth::Twenty
        } else {
            return None;
        };

        let freq_offset = delayed_freq - normalized_freq(SYNC_HZ);
        if freq_offset.abs() > 50.0 * 2.0 / BANDWIDTH_HZ {
            return None;
        }

        let filter_delay = self.lowpass.group_delay() as isize;
        Some(SyncEvent {
            width,
            sample_offset_in_block: index_in_block as isize - filter_delay,
            freq_offset,
        })
    }
}
