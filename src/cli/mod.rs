//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `create-user` - Account bootstrap
//! - `sync-entries` - Time entry reconciliation

pub mod args;

pub use args::{Cli, Commands};
