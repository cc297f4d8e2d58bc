//! Robot 36: interlaced Y / (B-Y, R-Y) (spec §4.3).

use crate::color::yuv_to_rgb;
use crate::line::{sample_channel_u8, scan_window, DecodedLine, LineDecoder};
use crate::modes::{ms_to_samples, Mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parity {
    Even,
    Odd,
}

struct BufferedEven {
    y: Vec<u8>,
    u: Vec<u8>,
}

pub struct Robot36Decoder {
    width_px: usize,
    height_px: usize,
    porch_samples: usize,
    y_samples: usize,
    sep_samples: usize,
    porch2_samples: usize,
    chroma_samples: usize,
    end_samples: usize,
    last_parity: Option<Parity>,
    buffered: Option<BufferedEven>,
}

impl Robot36Decoder {
    pub fn new(sample_rate: f64) -> Self {
        let spec = Mode::Robot36.spec();
        let porch_samples = ms_to_samples(spec.porch_ms, sample_rate);
        let y_samples = ms_to_samples(spec.channel_scan_ms[0], sample_rate);
        let sep_samples = ms_to_samples(spec.separators_ms[0], sample_rate);
        let porch2_samples = ms_to_samples(spec.separators_ms[1], sample_rate);
        let chroma_samples = ms_to_samples(spec.channel_scan_ms[1], sample_rate);
        let end_samples = porch_samples + y_samples + sep_samples + porch2_samples + chroma_samples;
        Self {
            width_px: spec.width_px,
            height_px: spec.height_px,
            porch_samples,
            y_samples,
            sep_samples,
            porch2_samples,
            chroma_samples,
            end_samples,
            last_parity: None,
            buffered: None,
        }
    }

    fn classify_parity(&mut self, separator_level: f64) -> Parity {
        let raw = 2.0 * separator_level - 1.0;
        if (-1.1..=-0.9).contains(&raw) {
            Parity::Even
        } else if (0.9..=1.1).contains(&raw) {
            Parity::Odd
        } else {
            self.last_parity
                .map(|p| if p == Parity::Even { Parity::Odd } else { Parity::Even })
                .unwrap_or(Parity::Even)
        }
    }
}

impl LineDecoder for Robot36Decoder {
    fn decode(&mut self, buffer: &[f64], sync_index: isize, freq_offset: f64) -> Option<DecodedLine> {
        let max_channel_samples = self.y_samples.max(self.chroma_samples);
        let scratch = scan_window(
            buffer,
            sync_index,
            0,
            self.end_samples as isize,
            max_channel_samples,
            self.width_px,
            freq_offset,
        )?;

        let y_begin = self.porch_samples;
        let chroma_begin = self.porch_samples + self.y_samples + self.sep_samples + self.porch2_samples;
        let sep_pos = self.porch_samples + self.y_samples + self.sep_samples / 2;

        let parity = self.classify_parity(scratch[sep_pos]);
        self.last_parity = Some(parity);

        let y = sample_channel_u8(&scratch, y_begin, self.y_samples, self.width_px);
        let chroma = sample_channel_u8(&scratch, chroma_begin, self.chroma_samples, self.width_px);

        match parity {
            Parity::Even => {
                self.buffered = Some(BufferedEven { y, u: chroma });
                Some(DecodedLine::Buffered)
            }
            Parity::Odd => {
                let BufferedEven { y: y_even, u } = self.buffered.take()?;
                let mut pixels = Vec::with_capacity(self.width_px * 2 * 4);
                for x in 0..self.width_px {
                    let (r, g, b) = yuv_to_rgb(y_even[x], u[x], chroma[x]);
                    pixels.extend_from_slice(&[r, g, b, 255]);
                }
                for x in 0..self.width_px {
                    let (r, g, b) = yuv_to_rgb(y[x], u[x], chroma[x]);
                    pixels.extend_from_slice(&[r, g, b, 255]);
                }
                Some(DecodedLine::Emit { pixels, rows: 2 })
            }
        }
    }

    fn width_px(&self) -> usize {
        self.width_px
    }

    fn height_px(&self) -> usize {
        self.height_px
    }

    fn reset(&mut self) {
        self.last_parity = None;
        self.buffered = None;
    }
}
