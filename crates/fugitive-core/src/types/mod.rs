//! Core types for fugitive emission entries.

mod proptests;
mod record;
mod refrigerant;
mod unit;

pub use record::{EmissionRecord, RawEntry, SIMPLE_METHOD};
pub use refrigerant::Refrigerant;
pub use unit::Unit;
