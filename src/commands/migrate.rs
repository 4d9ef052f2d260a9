//! Migrate command - Database migration management.

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

fn migration_error(action: &'static str) -> impl FnOnce(DbErr) -> AppError {
    move |e| {
        tracing::error!(error = %e, action, "Migration failed");
        AppError::internal(format!("Migration {} failed: {}", action, e))
    }
}

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Manual control: nothing runs on connect
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await.map_err(migration_error("up"))?;
            tracing::info!("Migrations applied");
        }
        MigrateAction::Down => {
            db.rollback_migration()
                .await
                .map_err(migration_error("down"))?;
            tracing::info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            let status = db
                .migration_status()
                .await
                .map_err(migration_error("status"))?;
            let pending = status.iter().filter(|(_, applied)| !applied).count();
            for (name, applied) in status {
                println!("{:<8} {}", if applied { "applied" } else { "pending" }, name);
            }
            tracing::info!(pending, "Migration status listed");
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping every table and re-running all migrations");
            db.fresh_migrations()
                .await
                .map_err(migration_error("fresh"))?;
            tracing::info!("Fresh migrations completed");
        }
    }

    Ok(())
}
