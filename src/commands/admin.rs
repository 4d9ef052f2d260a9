//! Admin command - bootstrap account maintenance.

use crate::cli::args::{AdminAction, AdminArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the admin command
pub async fn execute(args: AdminArgs, config: Config) -> AppResult<()> {
    match args.action {
        AdminAction::Ensure => {
            let db = Database::connect(&config)
                .await
                .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
            let username = config.admin.username.clone();
            let services = Services::from_connection(db.get_connection(), config);

            if services.auth().ensure_admin().await? {
                tracing::info!(%username, "Admin account created");
            } else {
                tracing::info!("An admin account already exists; nothing to do");
            }
        }
    }

    Ok(())
}
