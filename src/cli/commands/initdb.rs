use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, error, info, trace};

/// Connects to `database_url` and applies every pending migration.
pub async fn run_migrations(database_url: &str) -> Result<DatabaseConnection> {
    trace!("Attempting to connect to database");
    let db = Database::connect(database_url).await.map_err(|e| {
        error!("Failed to connect to database '{}': {}", database_url, e);
        e
    })?;
    debug!("Database connection established");

    let pending = Migrator::get_pending_migrations(&db).await?.len();
    info!("Running {} pending database migrations", pending);
    Migrator::up(&db, None).await.map_err(|e| {
        error!("Failed to run database migrations: {}", e);
        e
    })?;
    info!("Database migrations completed successfully");

    Ok(db)
}

pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing league database");
    debug!("Database URL: {}", database_url);

    let db = run_migrations(database_url).await?;
    db.close().await?;

    info!("Database initialization completed successfully!");
    Ok(())
}
