//! Per-mode scan-line decoders (spec §4.3).
//!
//! Every decoder shares one capability set ([`LineDecoder`]) and one
//! common inner loop ([`scan_window`]): a forward EMA pass to low-pass
//! the captured window, then a backward EMA pass that also maps the
//! result into a `[0,1]`-ish pixel level. This bidirectional pass
//! cancels the phase distortion a single-direction IIR would introduce
//! (spec §4.3 "Common inner loop").

pub mod pd;
pub mod robot36;
pub mod robot72;
pub mod scottie;

use crate::dsp::ExponentialMovingAverage;

/// Tagged result of decoding one sync-to-sync capture window (spec §9
/// "tagged variant"). The orchestrator matches on this rather than
/// inspecting a numeric row count.
#[derive(Debug, Clone)]
pub enum DecodedLine {
    /// Consumed (e.g. an even Robot 36 line waiting to be paired) with no
    /// rows to place yet.
    Buffered,
    /// `rows` rows of row-major RGBA8 pixels, `width_px` pixels wide.
    Emit { pixels: Vec<u8>, rows: u8 },
}

/// The shared capability set every per-mode decoder exposes (spec §9
/// "Polymorphism over line decoders").
pub trait LineDecoder {
    fn decode(&mut self, buffer: &[f64], sync_index: isize, freq_offset: f64) -> Option<DecodedLine>;

    /// Duration, in samples, of the extended opening sequence that
    /// precedes the very first scan line. Zero for every mode except
    /// Scottie S1.
    fn first_sync_pulse_samples(&self) -> usize {
        0
    }

    fn width_px(&self) -> usize;
    fn height_px(&self) -> usize;

    fn reset(&mut self) {}
}

pub(crate) fn freq_to_level(x: f64, freq_offset: f64) -> f64 {
    0.5 * (x - freq_offset + 1.0)
}

/// Runs the common bidirectional-EMA pass over `line_buffer[sync_index +
/// begin .. sync_index + end)`, returning a scratch buffer of
/// `freq_to_level`-mapped values, or `None` if the buffer doesn't cover
/// the requested window (spec §8 boundary behavior).
pub(crate) fn scan_window(
    line_buffer: &[f64],
    sync_index: isize,
    begin: isize,
    end: isize,
    max_channel_samples: usize,
    width_px: usize,
    freq_offset: f64,
) -> Option<Vec<f64>> {
    let len = line_buffer.len() as isize;
    if sync_index + begin < 0 || sync_index + end > len {
        return None;
    }
    let window_len = (end - begin) as usize;
    let mut scratch = vec![0.0f64; window_len];
    let mut ema = ExponentialMovingAverage::new(width_px as f64, 2.0 * max_channel_samples as f64, 2.0);

    for (i, slot) in scratch.iter_mut().enumerate() {
        let idx = (sync_index + begin + i as isize) as usize;
        *slot = ema.avg(line_buffer[idx]);
    }
    ema.reset();
    for i in (0..window_len).rev() {
        scratch[i] = freq_to_level(ema.avg(scratch[i]), freq_offset);
    }
    Some(scratch)
}

/// Resamples `width_px` evenly spaced 8-bit pixel values out of `scratch`
/// starting at `channel_begin` and spanning `channel_samples` (spec §4.3
/// step 5).
pub(crate) fn sample_channel_u8(scratch: &[f64], channel_begin: usize, channel_samples: usize, width_px: usize) -> Vec<u8> {
    (0..width_px)
        .map(|c| {
            let pos = channel_begin + (c * channel_samples) / width_px;
            let v = scratch[pos].clamp(0.0, 1.0);
            (v * 255.0).round() as u8
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scan_window_rejects_too_short_buffers() {
        let buffer = vec![0.0; 10];
        assert!(scan_window(&buffer, 0, 0, 20, 10, 4, 0.0).is_none());
    }

    #[test]
    fn uniform_input_maps_to_expected_level_at_the_extremes() {
        let buffer = vec![-1.0f64; 200];
        let scratch = scan_window(&buffer, 0, 0, 200, 100, 4, 0.0).unwrap();
        for v in &scratch {
            assert!((*v - 0.0).abs() < 1e-6);
        }
        let buffer = vec![1.0f64; 200];
        let scratch = scan_window(&buffer, 0, 0, 200, 100, 4, 0.0).unwrap();
        for v in &scratch {
            assert!((*v - 1.0).abs() < 1e-6);
        }
        let buffer = vec![0.0f64; 200];
        let scratch = scan_window(&buffer, 0, 0, 200, 100, 4, 0.0).unwrap();
        for v in &scratch {
            assert!((*v - 0.5).abs() < 1e-6);
        }
    }

    proptest! {
        /// `freq_to_level` maps any normalized frequency in `[-1, 1]` (the
        /// range produced by the sync detector for valid pixel tones) to
        /// a level within `[0, 1]`, for any `freq_offset` within the
        /// sync detector's acceptance band (spec §13).
        #[test]
        fn freq_to_level_is_bounded_for_in_range_inputs(
            x in -1.0f64..1.0,
            freq_offset in -0.1f64..0.1,
        ) {
            let level = freq_to_level(x, freq_offset);
            prop_assert!(level >= -0.15 && level <= 1.15);
        }
    }
}
