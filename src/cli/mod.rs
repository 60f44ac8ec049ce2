//! CLI module for the realty command-line interface.
//!
//! Commands run against the configured dataset in-process, without a server.

mod commands;
mod output;

pub use commands::*;
