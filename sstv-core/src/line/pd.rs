//! PD120/PD160/PD180: dual-luminance lines with shared, 5-tap median
//! filtered and desaturated chroma (spec §4.3).

use crate::color::yuv_to_rgb;
use crate::line::{sample_channel_u8, scan_window, DecodedLine, LineDecoder};
use crate::modes::{ms_to_samples, Mode, ModeSpec};

const CHROMA_DESATURATION: f64 = 0.7;

pub struct PdDecoder {
    width_px: usize,
    height_px: usize,
    porch_samples: usize,
    k_samples: usize,
    end_samples: usize,
}

impl PdDecoder {
    pub fn new(mode: Mode, sample_rate: f64) -> Self {
        let spec: &'static ModeSpec = mode.spec();
        let porch_samples = ms_to_samples(spec.porch_ms, sample_rate);
        let k_samples = ms_to_samples(spec.channel_scan_ms[0], sample_rate);
        let end_samples = porch_samples + 4 * k_samples;
        Self {
            width_px: spec.width_px,
            height_px: spec.height_px,
            porch_samples,
            k_samples,
            end_samples,
        }
    }

    pub fn pd120(sample_rate: f64) -> Self {
        Self::new(Mode::Pd120, sample_rate)
    }

    pub fn pd160(sample_rate: f64) -> Self {
        Self::new(Mode::Pd160, sample_rate)
    }

    pub fn pd180(sample_rate: f64) -> Self {
        Self::new(Mode::Pd180, sample_rate)
    }
}

/// 5-tap median filter with edge-replicated boundaries, applied to
/// average chroma before desaturation (spec §4.3 PD chroma post-filter).
fn median_filter5(channel: &[u8]) -> Vec<u8> {
    let n = channel.len();
    let at = |i: isize| -> u8 {
        let clamped = i.clamp(0, n as isize - 1);
        channel[clamped as usize]
    };
    (0..n)
        .map(|i| {
            let mut window = [
                at(i as isize - 2),
                at(i as isize - 1),
                at(i as isize),
                at(i as isize + 1),
                at(i as isize + 2),
            ];
            window.sort_unstable();
            window[2]
        })
        .collect()
}

fn desaturate(chroma: u8) -> u8 {
    let centered = chroma as f64 - 128.0;
    (centered * CHROMA_DESATURATION + 128.0).round().clamp(0.0, 255.0) as u8
}

impl LineDecoder for PdDecoder {
    fn decode(&mut self, buffer: &[f64], sync_index: isize, freq_offset: f64) -> Option<DecodedLine> {
        let scratch = scan_window(
            buffer,
            sync_index,
            0,
            self.end_samples as isize,
            self.k_samples,
            self.width_px,
            freq_offset,
        )?;

        let y_even_begin = self.porch_samples;
        let v_begin = y_even_begin + self.k_samples;
        let u_begin = v_begin + self.k_samples;
        let y_odd_begin = u_begin + self.k_samples;

        let y_even = sample_channel_u8(&scratch, y_even_begin, self.k_samples, self.width_px);
        let v_avg = sample_channel_u8(&scratch, v_begin, self.k_samples, self.width_px);
        let u_avg = sample_channel_u8(&scratch, u_begin, self.k_samples, self.width_px);
        let y_odd = sample_channel_u8(&scratch, y_odd_begin, self.k_samples, self.width_px);

        let v = median_filter5(&v_avg).into_iter().map(desaturate).collect::<Vec<_>>();
        let u = median_filter5(&u_avg).into_iter().map(desaturate).collect::<Vec<_>>();

        let mut pixels = Vec::with_capacity(self.width_px * 2 * 4);
        for x in 0..self.width_px {
            let (r, g, b) = yuv_to_rgb(y_even[x], u[x], v[x]);
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
        for x in 0..self.width_px {
            let (r, g, b) = yuv_to_rgb(y_odd[x], u[x], v[x]);
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
        Some(DecodedLine::Emit { pixels, rows: 2 })
    }

    fn width_px(&self) -> usize {
        self.width_px
    }

    fn height_px(&self) -> usize {
        self.height_px
    }
}
