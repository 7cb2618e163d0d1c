//! Document store for the Fugitive Simple DocType.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      fugitive-store                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  setup: create_doctype / add_sample_data / insert_record    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  DocumentStore trait                                        │
//! │  ├── MemoryStore (in-process)                               │
//! │  └── JsonFileStore (single JSON file, atomic commit)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  StoreState (committed database + staged transaction)       │
//! │  validate (DocType-driven document checks)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod document;
pub mod error;
pub mod json_file;
pub mod memory;
pub mod setup;
pub mod state;
pub mod validate;

pub use backend::{DocumentStore, StoreBackend, StoreConfig, create_store};
pub use document::{DocKey, Document, DocumentHandle, Fields};
pub use error::{Error, Result};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use setup::{
    SeedReport, SetupOutcome, add_sample_data, create_doctype, delete_record, insert_record,
};

pub use fugitive_core::schema::DOCTYPE_KIND;
