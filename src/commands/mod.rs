//! Commands module - CLI command implementations.
//!
//! Each command is implemented in its own module for separation of concerns.

pub mod create_user;
pub mod migrate;
pub mod serve;
pub mod sync_entries;
