//! Robot 72: sequential Y, V, U (spec §4.3).

use crate::color::yuv_to_rgb;
use crate::line::{sample_channel_u8, scan_window, DecodedLine, LineDecoder};
use crate::modes::{ms_to_samples, Mode};

pub struct Robot72Decoder {
    width_px: usize,
    height_px: usize,
    y_begin: usize,
    y_samples: usize,
    v_begin: usize,
    v_samples: usize,
    u_begin: usize,
    u_samples: usize,
    end_samples: usize,
}

impl Robot72Decoder {
    pub fn new(sample_rate: f64) -> Self {
        let spec = Mode::Robot72.spec();
        let porch = ms_to_samples(spec.porch_ms, sample_rate);
        let y_samples = ms_to_samples(spec.channel_scan_ms[0], sample_rate);
        let sep1 = ms_to_samples(spec.separators_ms[0], sample_rate);
        let porch2 = ms_to_samples(spec.separators_ms[1], sample_rate);
        let v_samples = ms_to_samples(spec.channel_scan_ms[1], sample_rate);
        let sep2 = ms_to_samples(spec.separators_ms[2], sample_rate);
        let porch3 = ms_to_samples(spec.separators_ms[3], sample_rate);
        let u_samples = ms_to_samples(spec.channel_scan_ms[2], sample_rate);

        let y_begin = porch;
        let v_begin = y_begin + y_samples + sep1 + porch2;
        let u_begin = v_begin + v_samples + sep2 + porch3;
        let end_samples = u_begin + u_samples;

        Self {
            width_px: spec.width_px,
            height_px: spec.height_px,
            y_begin,
            y_samples,
            v_begin,
            v_samples,
            u_begin,
            u_samples,
            end_samples,
        }
    }
}

impl LineDecoder for Robot72Decoder {
    fn decode(&mut self, buffer: &[f64], sync_index: isize, freq_offset: f64) -> Option<DecodedLine> {
        let max_channel_samples = self.y_samples.max(self.v_samples).max(self.u_samples);
        let scratch = scan_window(
            buffer,
            sync_index,
            0,
            self.end_samples as isize,
            max_channel_samples,
            self.width_px,
            freq_offset,
        )?;

        let y = sample_channel_u8(&scratch, self.y_begin, self.y_samples, self.width_px);
        let v = sample_channel_u8(&scratch, self.v_begin, self.v_samples, self.width_px);
        let u = sample_channel_u8(&scratch, self.u_begin, self.u_samples, self.width_px);

        let mut pixels = Vec::with_capacity(self.width_px * 4);
        for x in 0..self.width_px {
            let (r, g, b) = yuv_to_rgb(y[x], u[x], v[x]);
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
        Some(DecodedLine::Emit { pixels, rows: 1 })
    }

    fn width_px(&self) -> usize {
        self.width_px
    }

    fn height_px(&self) -> usize {
        self.height_px
    }
}
