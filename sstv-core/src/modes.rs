//! The frozen per-mode timing table (spec §3, §6).

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, SstvError};

/// Supported SSTV transmission modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Robot36,
    Robot72,
    ScottieS1,
    Pd120,
    Pd160,
    Pd180,
}

impl Mode {
    /// Resolves a caller-supplied mode name (case-insensitive, matching
    /// the names in the supported-modes table) to a `Mode`.
    pub fn from_name(name: &str) -> Result<Self, SstvError> {
        let normalized: String = name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "robot36" => Ok(Mode::Robot36),
            "robot72" => Ok(Mode::Robot72),
            "scotties1" => Ok(Mode::ScottieS1),
            "pd120" => Ok(Mode::Pd120),
            "pd160" => Ok(Mode::Pd160),
            "pd180" => Ok(Mode::Pd180),
            _ => Err(ConfigError::UnknownMode { name: name.to_string() }.into()),
        }
    }

    pub fn spec(self) -> &'static ModeSpec {
        match self {
            Mode::Robot36 => &ROBOT36,
            Mode::Robot72 => &ROBOT72,
            Mode::ScottieS1 => &SCOTTIE_S1,
            Mode::Pd120 => &PD120,
            Mode::Pd160 => &PD160,
            Mode::Pd180 => &PD180,
        }
    }
}

/// Informational-only color-channel ordering. Never consulted by any
/// decode path (spec §9 open question on Robot 36's `colorOrder`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorOrder {
    Gbr,
    Rgb,
    Yuv,
    Rgbdirect,
}

/// Immutable per-mode timing and geometry record (spec §3 "Mode record").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeSpec {
    pub name: &'static str,
    pub vis_code: u8,
    pub width_px: usize,
    pub height_px: usize,
    pub line_ms: f64,
    pub sync_ms: f64,
    pub porch_ms: f64,
    /// Legacy metadata, not consumed during decode (spec §9).
    pub separators_ms: &'static [f64],
    pub channel_scan_ms: &'static [f64],
    pub color_order: ColorOrder,
}

pub static ROBOT36: ModeSpec = ModeSpec {
    name: "Robot36",
    vis_code: 8,
    width_px: 320,
    height_px: 240,
    line_ms: 150.0,
    sync_ms: 9.0,
    porch_ms: 3.0,
    separators_ms: &[4.5, 1.5],
    channel_scan_ms: &[88.0, 44.0],
    color_order: ColorOrder::Yuv,
};

pub static ROBOT72: ModeSpec = ModeSpec {
    name: "Robot72",
    vis_code: 12,
    width_px: 320,
    height_px: 240,
    line_ms: 300.0,
    sync_ms: 9.0,
    porch_ms: 3.0,
    separators_ms: &[4.5, 1.5, 4.5, 1.5],
    channel_scan_ms: &[138.0, 69.0, 69.0],
    color_order: ColorOrder::Yuv,
};

pub static SCOTTIE_S1: ModeSpec = ModeSpec {
    name: "ScottieS1",
    vis_code: 60,
    width_px: 320,
    height_px: 256,
    line_ms: 428.22,
    sync_ms: 9.0,
    porch_ms: 1.5,
    separators_ms: &[1.5, 1.5],
    channel_scan_ms: &[138.24, 138.24, 138.24],
    color_order: ColorOrder::Rgbdirect,
};

pub static PD120: ModeSpec = ModeSpec {
    name: "PD120",
    vis_code: 95,
    width_px: 640,
    height_px: 496,
    line_ms: 496.628,
    sync_ms: 20.0,
    porch_ms: 2.08,
    separators_ms: &[],
    channel_scan_ms: &[121.6, 121.6, 121.6, 121.6],
    color_order: ColorOrder::Yuv,
};

pub static PD160: ModeSpec = ModeSpec {
    name: "PD160",
    vis_code: 98,
    width_px: 512,
    height_px: 400,
    line_ms: 804.416,
    sync_ms: 20.0,
    porch_ms: 2.08,
    separators_ms: &[],
    channel_scan_ms: &[195.584, 195.584, 195.584, 195.584],
    color_order: ColorOrder::Yuv,
};

pub static PD180: ModeSpec = ModeSpec {
    name: "PD180",
    vis_code: 96,
    width_px: 640,
    height_px: 496,
    line_ms: 751.68,
    sync_ms: 20.0,
    porch_ms: 2.08,
    separators_ms: &[],
    channel_scan_ms: &[182.4, 182.4, 182.4, 182.4],
    color_order: ColorOrder::Yuv,
};

/// Converts a duration in milliseconds to a sample count at `sample_rate`,
/// rounding to the nearest integer.
pub fn ms_to_samples(ms: f64, sample_rate: f64) -> usize {
    (ms / 1000.0 * sample_rate).round() as usize
}
