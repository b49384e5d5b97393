//! Timesheet API - time tracking with weekly timesheets.
//!
//! Users clock in and out of the projects assigned to them and submit
//! weekly hours. Repeated saves and the reconciliation of finished
//! sessions add to a week's row; they never overwrite it. Completing a
//! project snapshots the hours worked and archives its timesheets.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Records and pure rules (week bucketing, additive merge)
//! - **services**: Time-entry and timesheet engines, auth and administration
//! - **infra**: Database, migrations, repositories and Unit of Work
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create the first admin
//! cargo run -- create-user --username admin --password admin123 --name "Site Admin" --admin
//!
//! # Fold finished sessions into timesheets
//! cargo run -- sync-entries
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};
