//! Scottie S1: direct RGB, red anchored to the start of the capture
//! window, green/blue anchored to its end (spec §4.3; anchoring choice
//! recorded in `DESIGN.md`).

use crate::line::{sample_channel_u8, scan_window, DecodedLine, LineDecoder};
use crate::modes::{ms_to_samples, Mode};

pub struct ScottieS1Decoder {
    width_px: usize,
    height_px: usize,
    sync_samples: usize,
    porch_samples: usize,
    red_samples: usize,
    sep1_samples: usize,
    green_samples: usize,
    sep2_samples: usize,
    blue_samples: usize,
    required_samples: usize,
}

impl ScottieS1Decoder {
    pub fn new(sample_rate: f64) -> Self {
        let spec = Mode::ScottieS1.spec();
        let sync_samples = ms_to_samples(spec.sync_ms, sample_rate);
        let porch_samples = ms_to_samples(spec.porch_ms, sample_rate);
        let red_samples = ms_to_samples(spec.channel_scan_ms[0], sample_rate);
        let sep1_samples = ms_to_samples(spec.separators_ms[0], sample_rate);
        let green_samples = ms_to_samples(spec.channel_scan_ms[1], sample_rate);
        let sep2_samples = ms_to_samples(spec.separators_ms[1], sample_rate);
        let blue_samples = ms_to_samples(spec.channel_scan_ms[2], sample_rate);
        let required_samples =
            sync_samples + porch_samples + red_samples + sep1_samples + green_samples + sep2_samples + blue_samples;

        Self {
            width_px: spec.width_px,
            height_px: spec.height_px,
            sync_samples,
            porch_samples,
            red_samples,
            sep1_samples,
            green_samples,
            sep2_samples,
            blue_samples,
            required_samples,
        }
    }
}

impl LineDecoder for ScottieS1Decoder {
    fn decode(&mut self, buffer: &[f64], sync_index: isize, freq_offset: f64) -> Option<DecodedLine> {
        if buffer.len() < self.required_samples {
            return None;
        }
        let max_channel_samples = self.red_samples.max(self.green_samples).max(self.blue_samples);
        let scratch = scan_window(
            buffer,
            sync_index,
            0,
            buffer.len() as isize,
            max_channel_samples,
            self.width_px,
            freq_offset,
        )?;

        let red_begin = self.porch_samples;
        let blue_begin = scratch.len() - self.sync_samples - self.blue_samples;
        let green_end = blue_begin - self.sep2_samples;
        let green_begin = green_end - self.green_samples;

        let red = sample_channel_u8(&scratch, red_begin, self.red_samples, self.width_px);
        let green = sample_channel_u8(&scratch, green_begin, self.green_samples, self.width_px);
        let blue = sample_channel_u8(&scratch, blue_begin, self.blue_samples, self.width_px);

        let mut pixels = Vec::with_capacity(self.width_px * 4);
        for x in 0..self.width_px {
            pixels.extend_from_slice(&[red[x], green[x], blue[x], 255]);
        }
        Some(DecodedLine::Emit { pixels, rows: 1 })
    }

    fn first_sync_pulse_samples(&self) -> usize {
        self.sync_samples + self.porch_samples + self.red_samples + self.sep1_samples + self.green_samples
    }

    fn width_px(&self) -> usize {
        self.width_px
    }

    fn height_px(&self) -> usize {
        self.height_px
    }
}
