//! Create-user command - bootstrap accounts without the HTTP API.

use crate::cli::args::CreateUserArgs;
use crate::config::Config;
use crate::domain::UserRole;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the create-user command
pub async fn execute(args: CreateUserArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let services = Services::from_connection(db.get_connection(), config);

    let role = if args.admin {
        UserRole::Admin
    } else {
        UserRole::User
    };

    let user = services
        .users()
        .create_user(args.username, args.password, args.name, role)
        .await?;

    println!("Created {} '{}' (id {})", user.role, user.username, user.id);
    Ok(())
}
