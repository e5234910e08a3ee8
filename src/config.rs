use anyhow::Result;
use config::{Config, Environment, File};
use engine::LeagueEngine;
use moka::future::Cache;
use sea_orm::Database;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;
use tracing::{debug, info};

use crate::schemas::AppState;

/// Tunables read from `league_manager.toml` and `LEAGUE_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Seed for the match simulator; random when unset
    pub rng_seed: Option<u64>,
    pub cache_capacity: u64,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rng_seed: None,
            cache_capacity: 1000,
            cache_ttl_secs: 300,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Loads settings, later sources overriding earlier ones: defaults, the
    /// optional `league_manager.toml` file, then the environment.
    pub fn load() -> Result<Self> {
        let defaults = Settings::default();
        let settings = Config::builder()
            .set_default("cache_capacity", defaults.cache_capacity)?
            .set_default("cache_ttl_secs", defaults.cache_ttl_secs)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .add_source(File::with_name("league_manager").required(false))
            .add_source(Environment::with_prefix("LEAGUE").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

/// Initialize application configuration and state
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    let settings = Settings::load()?;
    debug!(?settings, "Settings loaded");

    // Connect to database
    info!("Connecting to database: {}", database_url);
    // sqlx turns on `foreign_keys` for every SQLite connection it opens
    let db = Database::connect(database_url).await?;

    Ok(build_app_state(db, settings))
}

/// Wires a connection and settings into the shared handler state.
pub fn build_app_state(db: sea_orm::DatabaseConnection, settings: Settings) -> AppState {
    let cache = Cache::builder()
        .max_capacity(settings.cache_capacity)
        .time_to_live(Duration::from_secs(settings.cache_ttl_secs))
        .build();
    let engine = LeagueEngine::from_seed(settings.rng_seed);

    AppState {
        db,
        cache,
        engine,
        settings,
        cache_epoch: Arc::new(AtomicU64::new(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.rng_seed, None);
        assert_eq!(settings.cache_capacity, 1000);
        assert_eq!(settings.cache_ttl_secs, 300);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    async fn foreign_keys_enabled(db: &sea_orm::DatabaseConnection) -> bool {
        let row = db
            .query_one(Statement::from_string(DatabaseBackend::Sqlite, "PRAGMA foreign_keys;"))
            .await
            .unwrap()
            .unwrap();
        row.try_get_by_index::<i32>(0).unwrap() == 1
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced_on_pooled_connections() {
        let path = std::env::temp_dir().join(format!("league_manager_fk_{}.db", std::process::id()));
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let state = initialize_app_state_with_url(&url).await.unwrap();

        // Concurrent queries check out distinct connections from the pool
        let (a, b, c) = tokio::join!(
            foreign_keys_enabled(&state.db),
            foreign_keys_enabled(&state.db),
            foreign_keys_enabled(&state.db)
        );
        assert!(a && b && c);

        drop(state);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_without_sources_matches_defaults() {
        // Only meaningful when no LEAGUE_* variables leak into the test run
        if std::env::vars().any(|(key, _)| key.starts_with("LEAGUE_")) {
            return;
        }
        assert_eq!(Settings::load().unwrap(), Settings::default());
    }
}
