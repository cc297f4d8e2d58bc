//! Signal-processing primitives (spec §4.1).

pub mod complex;
pub mod demod;
pub mod filters;
pub mod fir;

pub use complex::Phasor;
pub use demod::FmDemodulator;
pub use filters::{Delay, ExponentialMovingAverage, GoertzelFilter, SchmittTrigger, SimpleMovingAverage};
pub use fir::ComplexFir;
