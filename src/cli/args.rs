//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Timesheet API - time tracking and weekly timesheets
#[derive(Parser, Debug)]
#[command(name = "timesheet-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create a user account (e.g. the first admin)
    CreateUser(CreateUserArgs),

    /// Fold completed time entries into weekly timesheets
    SyncEntries,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to (defaults to SERVER_HOST or 0.0.0.0)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on (defaults to SERVER_PORT or 3000)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the create-user command
#[derive(Parser, Debug)]
pub struct CreateUserArgs {
    /// Login name
    #[arg(short, long)]
    pub username: String,

    /// Password (6-128 characters)
    #[arg(short, long, env = "CREATE_USER_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Grant the admin role
    #[arg(long)]
    pub admin: bool,
}
