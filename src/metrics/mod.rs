//! Case-velocity metrics.
//!
//! - pure derivation of daily deltas + centered moving average (`derive`)
//! - a tracing wrapper used by the pipeline (`observed`)

pub mod derive;
pub mod observed;

pub use derive::*;
pub use observed::*;
