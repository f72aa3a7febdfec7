//! CLI module
//!
//! Command-line interface for the Planning Center source.
//!
//! # Commands
//!
//! - `spec` - Print the configuration schema
//! - `check` - Test credentials against the API
//! - `discover` - List available streams with schemas
//! - `streams` - List stream names (lightweight)
//! - `read` - Extract data from streams

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{message_to_json, Runner};
