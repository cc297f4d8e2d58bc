//! The decoder orchestrator: owns the circular audio/demod buffers, the
//! sync detector, and the active per-mode line decoder (spec §4.4).

use crate::config::DecoderOptions;
use crate::errors::{ConfigError, SstvError};
use crate::framebuffer::Framebuffer;
use crate::line::pd::PdDecoder;
use crate::line::robot36::Robot36Decoder;
use crate::line::robot72::Robot72Decoder;
use crate::line::scottie::ScottieS1Decoder;
use crate::line::{DecodedLine, LineDecoder};
use crate::logging::{DecoderObserver, LineDecoded, NoopObserver, PulseRejected, SyncObserved};
use crate::modes::Mode;
use crate::sync::{SyncDetector, SyncWidth};

/// Lifecycle state (spec §3 "Lifecycle").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    Idle,
    Decoding,
}

/// A point-in-time read of decoder progress (spec §6 `snapshot()`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub state: DecoderState,
    pub mode_name: &'static str,
    pub current_line: usize,
    pub total_lines: usize,
    pub progress_percent: f64,
    pub frequency_hz: i64,
    pub signal_strength_pct: f64,
}

fn build_line_decoder(mode: Mode, sample_rate: f64) -> Box<dyn LineDecoder> {
    match mode {
        Mode::Robot36 => Box::new(Robot36Decoder::new(sample_rate)),
        Mode::Robot72 => Box::new(Robot72Decoder::new(sample_rate)),
        Mode::ScottieS1 => Box::new(ScottieS1Decoder::new(sample_rate)),
        Mode::Pd120 => Box::new(PdDecoder::pd120(sample_rate)),
        Mode::Pd160 => Box::new(PdDecoder::pd160(sample_rate)),
        Mode::Pd180 => Box::new(PdDecoder::pd180(sample_rate)),
    }
}

fn ring_distance(start: usize, end: usize, n: usize) -> usize {
    if end >= start {
        end - start
    } else {
        (n - start) + end
    }
}

fn extract_ring_slice(buf: &[f64], start: usize, end: usize, n: usize) -> Vec<f64> {
    let len = ring_distance(start, end, n);
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        out.push(buf[(start + i) % n]);
    }
    out
}

/// Streaming SSTV decoder. Generic over the observer hook so the hot path
/// monomorphizes to nothing when the caller uses [`NoopObserver`].
pub struct Decoder<O: DecoderObserver = NoopObserver> {
    sample_rate: f64,
    mode: Mode,
    options: DecoderOptions,
    observer: O,

    state: DecoderState,
    audio: Vec<f32>,
    demod: Vec<f64>,
    n: usize,
    total_written: u64,

    sync_detector: SyncDetector,
    line_decoder: Box<dyn LineDecoder>,
    framebuffer: Framebuffer,

    current_line: usize,
    last_sync_pos: isize,
    last_sync_width: Option<SyncWidth>,
    freq_offset: f64,
    signal_strength: f64,
}

impl<O: DecoderObserver> Decoder<O> {
    pub fn new(sample_rate: f64, mode: Mode, options: DecoderOptions, observer: O) -> Result<Self, SstvError> {
        if !(sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate { rate: sample_rate }.into());
        }
        let n = (7.0 * sample_rate).ceil() as usize;
        let spec = mode.spec();
        let fill_color = options.fill_color;

        Ok(Self {
            sample_rate,
            mode,
            options,
            observer,
            state: DecoderState::Idle,
            audio: vec![0.0; n],
            demod: vec![0.0; n],
            n,
            total_written: 0,
            sync_detector: SyncDetector::new(sample_rate)?,
            line_decoder: build_line_decoder(mode, sample_rate),
            framebuffer: Framebuffer::new(spec.width_px, spec.height_px, fill_color),
            current_line: 0,
            last_sync_pos: -1,
            last_sync_width: None,
            freq_offset: 0.0,
            signal_strength: 0.0,
        })
    }

    fn clear_state(&mut self) {
        self.audio.iter_mut().for_each(|x| *x = 0.0);
        self.demod.iter_mut().for_each(|x| *x = 0.0);
        self.total_written = 0;
        self.sync_detector.reset();
        self.line_decoder.reset();
        self.current_line = 0;
        self.last_sync_pos = -1;
        self.last_sync_width = None;
        self.freq_offset = 0.0;
        self.signal_strength = 0.0;
        self.framebuffer.clear();
    }

    /// Resets all decoder state and begins consuming samples.
    pub fn start(&mut self) {
        self.clear_state();
        self.state = DecoderState::Decoding;
    }

    /// Stops consuming samples; the framebuffer is left as-is.
    pub fn stop(&mut self) {
        self.state = DecoderState::Idle;
    }

    /// Zeroes all state but `Fs` and `mode`; the framebuffer returns to
    /// its fill color.
    pub fn reset(&mut self) {
        self.clear_state();
    }

    /// Consumes one block of real PCM samples (spec §4.4).
    pub fn push_samples(&mut self, block: &[f32]) {
        let rms = if block.is_empty() {
            0.0
        } else {
            (block.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>() / block.len() as f64).sqrt()
        };
        let new_strength = (500.0 * rms).min(100.0);
        self.signal_strength = self.options.signal_strength_decay * self.signal_strength
            + (1.0 - self.options.signal_strength_decay) * new_strength;

        if self.state != DecoderState::Decoding {
            return;
        }

        let block_start_abs = self.total_written;
        let mut last_event = None;
        let mut demod_block = vec![0.0f64; block.len()];
        for (i, sample) in block.iter().enumerate() {
            let (freq, event) = self.sync_detector.process_sample(*sample, i);
            demod_block[i] = freq;
            if event.is_some() {
                last_event = event;
            }
        }

        for (i, (&sample, &freq)) in block.iter().zip(demod_block.iter()).enumerate() {
            let idx = ((block_start_abs as usize) + i) % self.n;
            self.audio[idx] = sample;
            self.demod[idx] = freq;
        }
        self.total_written += block.len() as u64;

        let Some(event) = last_event else { return };

        if event.width == SyncWidth::Five {
            self.observer.on_reject(PulseRejected { width: event.width });
            return;
        }

        let event_abs_pos = block_start_abs as i64 + event.sample_offset_in_block as i64;
        let event_ring_pos = event_abs_pos.rem_euclid(self.n as i64) as usize;

        if self.last_sync_pos >= 0 {
            let distance = ring_distance(self.last_sync_pos as usize, event_ring_pos, self.n);
            if (distance as f64) <= self.options.sync_debounce_fraction * self.sample_rate {
                return;
            }
        }

        self.freq_offset = event.freq_offset;
        self.observer.on_sync(SyncObserved { width: event.width, freq_offset: event.freq_offset });

        if self.last_sync_pos >= 0 {
            let slice = extract_ring_slice(&self.demod, self.last_sync_pos as usize, event_ring_pos, self.n);
            if let Some(decoded) = self.line_decoder.decode(&slice, 0, self.freq_offset) {
                if let DecodedLine::Emit { pixels, rows } = decoded {
                    self.framebuffer.place_rows(self.current_line, &pixels, rows as usize);
                    self.current_line = (self.current_line + rows as usize).min(self.line_decoder.height_px());
                    self.observer.on_line(LineDecoded { row: self.current_line, rows });
                }
            }
        }

        self.last_sync_pos = event_ring_pos as isize;
        self.last_sync_width = Some(event.width);
    }

    pub fn snapshot(&self) -> Snapshot {
        let total_lines = self.line_decoder.height_px();
        let progress_percent = if total_lines == 0 {
            0.0
        } else {
            100.0 * self.current_line as f64 / total_lines as f64
        };
        Snapshot {
            state: self.state,
            mode_name: self.mode.spec().name,
            current_line: self.current_line,
            total_lines,
            progress_percent,
            frequency_hz: (1900.0 + self.freq_offset).round() as i64,
            signal_strength_pct: self.signal_strength,
        }
    }

    pub fn pixel_buffer(&self) -> &[u8] {
        self.framebuffer.pixels()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.framebuffer.width(), self.framebuffer.height())
    }
}
