//! Real-time SSTV (Slow-Scan Television) decoder core.
//!
//! A linear pipeline — `SyncDetector` → per-mode `LineDecoder` →
//! `Framebuffer` — fed by [`decoder::Decoder::push_samples`] and observed
//! through [`decoder::Decoder::snapshot`].

pub mod color;
pub mod config;
pub mod decoder;
pub mod dsp;
pub mod errors;
pub mod framebuffer;
pub mod line;
pub mod logging;
pub mod modes;
pub mod sync;

pub use config::DecoderOptions;
pub use decoder::{Decoder, DecoderState, Snapshot};
pub use errors::{ConfigError, DspError, Result, SstvError};
pub use logging::{DecoderObserver, LineDecoded, NoopObserver, PulseRejected, SyncObserved};
pub use modes::Mode;
