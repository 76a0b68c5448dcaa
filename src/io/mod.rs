//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - region selection (`select`)
//! - augmented table export to CSV (`export`)
//! - metrics JSON read/write (`snapshot`)

pub mod export;
pub mod ingest;
pub mod select;
pub mod snapshot;

pub use export::*;
pub use ingest::*;
pub use select::*;
pub use snapshot::*;
