//! Core data models for the rollup pipeline.

mod aggregate;
mod keys;
mod record;
mod stats;

pub use aggregate::*;
pub use keys::*;
pub use record::*;
pub use stats::*;
