#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Fugitive Core Library
//!
//! Record types, the emission builder, and the declarative DocType schema
//! shared by the store and the setup CLI.

pub mod builder;
pub mod error;
pub mod samples;
pub mod schema;
pub mod summary;
pub mod types;

// Re-exports for convenience
pub use builder::{build, build_from_fields, co2_equivalent};
pub use error::{Error, Result};
pub use samples::reference_samples;
pub use schema::{DocTypeSchema, FieldSpec, FieldType, Permission};
pub use summary::{EmissionSummary, Period};
pub use types::{EmissionRecord, RawEntry, Refrigerant, Unit};
