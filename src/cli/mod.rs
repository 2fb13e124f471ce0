//! CLI module
//!
//! Command-line interface for walking collections.
//!
//! # Commands
//!
//! - `walk` - Print every item of a collection, following next links
//! - `config` - Show the effective client configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{parse_request_options, Runner, TOKEN_ENV};
