//! Presentation layer for vote-ledger
//!
//! This crate contains CLI definitions, the HTTP API, the wire shapes both
//! share, and console output formatting.

pub mod cli;
pub mod dto;
pub mod http;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use http::{AppState, create_router, serve, shutdown_signal};
pub use output::console::ConsoleFormatter;
