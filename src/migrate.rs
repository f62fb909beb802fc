//! Schema migration and seed execution.
//!
//! Both operations are forced and non-interactive: the workflow invokes
//! them in order once every configuration stage has succeeded.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::paths::ProjectPaths;

pub trait Migrator {
    /// Apply all pending schema migrations.
    fn migrate(&self) -> Result<()>;

    /// Populate baseline records.
    fn seed(&self) -> Result<()>;
}

/// Runs the `.sql` files under `migrations/` and `seeders/` against the
/// database configured by the DB stage. Connection settings are read from
/// the env file at call time, so the values the operator just accepted are
/// the ones used.
pub struct SqlMigrator {
    env_file: PathBuf,
    migrations_dir: PathBuf,
    seeders_dir: PathBuf,
}

impl SqlMigrator {
    pub fn new(paths: &ProjectPaths) -> Self {
        Self {
            env_file: paths.env_file(),
            migrations_dir: paths.migrations_dir(),
            seeders_dir: paths.seeders_dir(),
        }
    }

    fn connect_options(&self) -> Result<sqlx::mysql::MySqlConnectOptions> {
        let config = AppConfig::load(&self.env_file)?;
        Ok(sqlx::mysql::MySqlConnectOptions::new()
            .host(config.get("DB_HOST").unwrap_or("127.0.0.1"))
            .port(
                config
                    .get("DB_PORT")
                    .and_then(|port| port.parse().ok())
                    .unwrap_or(3306),
            )
            .username(config.get("DB_USERNAME").unwrap_or("root"))
            .password(config.get("DB_PASSWORD").unwrap_or(""))
            .database(config.get("DB_DATABASE").unwrap_or("rebase")))
    }

    fn runtime() -> Result<tokio::runtime::Runtime> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to start runtime for database work")
    }
}

impl Migrator for SqlMigrator {
    fn migrate(&self) -> Result<()> {
        let options = self.connect_options()?;
        Self::runtime()?.block_on(async {
            let pool = sqlx::mysql::MySqlPoolOptions::new()
                .connect_with(options)
                .await
                .context("Failed to connect for migrations")?;

            let migrator = sqlx::migrate::Migrator::new(self.migrations_dir.as_path())
                .await
                .with_context(|| {
                    format!("Failed to load migrations from {}", self.migrations_dir.display())
                })?;
            migrator.run(&pool).await.context("Migration failed")?;

            pool.close().await;
            Ok(())
        })
    }

    fn seed(&self) -> Result<()> {
        let mut seeders: Vec<PathBuf> = std::fs::read_dir(&self.seeders_dir)
            .with_context(|| format!("Failed to read {}", self.seeders_dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map_or(false, |ext| ext == "sql"))
            .collect();
        seeders.sort();

        let options = self.connect_options()?;
        Self::runtime()?.block_on(async {
            let pool = sqlx::mysql::MySqlPoolOptions::new()
                .connect_with(options)
                .await
                .context("Failed to connect for seeders")?;

            for path in &seeders {
                let sql = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read seeder {}", path.display()))?;
                sqlx::raw_sql(&sql)
                    .execute(&pool)
                    .await
                    .with_context(|| format!("Seeder failed: {}", path.display()))?;
            }

            pool.close().await;
            Ok(())
        })
    }
}
