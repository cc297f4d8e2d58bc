//! Runtime-tunable decoder options.
//!
//! Mode timings ([`crate::modes::ModeSpec`]) are protocol constants, not
//! configuration: they are not meant to be overridden per deployment.
//! `DecoderOptions` is the one piece of genuine runtime configuration,
//! loadable from TOML by the CLI the same way the prior pipeline's CLI
//! config layered on top of its core config module.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderOptions {
    /// Exponential smoothing weight applied to the old `signal_strength`
    /// value each `push_samples` call (spec: 0.8).
    pub signal_strength_decay: f64,

    /// Minimum ring-buffer distance between accepted syncs, expressed as
    /// a fraction of `Fs` (spec: 0.1, i.e. 100 ms).
    pub sync_debounce_fraction: f64,

    /// Initial framebuffer fill color (spec: opaque black).
    pub fill_color: [u8; 4],
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            signal_strength_decay: 0.8,
            sync_debounce_fraction: 0.1,
            fill_color: [0, 0, 0, 255],
        }
    }
}
