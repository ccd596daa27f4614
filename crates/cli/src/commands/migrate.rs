//! Database migration command.

use super::CommandError;

/// Run the API database migrations.
///
/// # Errors
///
/// Returns [`CommandError`] if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
