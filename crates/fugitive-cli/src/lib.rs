//! # fugitive-cli
//!
//! Library side of the `fugitive-setup` binary: argument definitions,
//! configuration loading and the command implementations, kept out of
//! `main.rs` so they can be tested without spawning a process.

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod logging;

pub use cli::{AddArgs, Cli, Command, ConfigAction};
pub use config::SetupConfig;
