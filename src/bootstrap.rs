//! The first-run initialization workflow.
//!
//! Six stages run in fixed order: App, Log, Database, Redis, Queue, Cache.
//! Each stage prompts for its fields, verifies live connectivity where the
//! candidate values have external side effects, and persists all of its keys
//! in a single write. A failed stage persists nothing of its own and halts
//! the run; writes from earlier stages stay in place (incremental setup, no
//! cross-stage rollback). After the last stage the workflow runs migrations,
//! then seeders, then writes the lock marker that gates re-execution.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::AppConfig;
use crate::envfile::EnvFile;
use crate::error::InitError;
use crate::locale;
use crate::migrate::Migrator;
use crate::paths::ProjectPaths;
use crate::probe::{CacheProbe, DatabaseProbe, DbSettings, RedisSettings};
use crate::prompt::Prompt;

const LOG_CHANNELS: &[&str] = &[
    "single", "daily", "slack", "syslog", "errorlog", "custom", "stack",
];
const LOG_DAILY_DAYS: &[&str] = &["7", "14", "30"];
const REDIS_DB_INDEXES: &[&str] = &[
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15",
];

/// Result of one `run` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Completed,
    AlreadyInitialized,
    StageFailed,
}

/// Collaborators the workflow drives. Passed in so tests can substitute
/// scripted prompts and fake probes.
pub struct InitContext<'a> {
    pub paths: ProjectPaths,
    pub prompt: &'a mut dyn Prompt,
    pub db: &'a dyn DatabaseProbe,
    pub cache: &'a dyn CacheProbe,
    pub migrator: &'a dyn Migrator,
}

pub fn run(ctx: &mut InitContext) -> Result<InitOutcome> {
    let lock_file = ctx.paths.lock_file();
    if lock_file.exists() {
        println!(
            "{}",
            InitError::AlreadyInitialized {
                lock_path: lock_file
            }
        );
        return Ok(InitOutcome::AlreadyInitialized);
    }

    ensure_env_file(&ctx.paths)?;
    let mut config = AppConfig::load(ctx.paths.env_file())?;

    println!("Configuring APP... (APP_KEY is generated automatically)");
    if let Err(err) = configure_app(ctx, &mut config) {
        return Ok(report_failure("APP", &err));
    }

    println!("Configuring LOG... (LOG_LEVEL follows APP_ENV)");
    if let Err(err) = configure_log(ctx, &mut config) {
        return Ok(report_failure("LOG", &err));
    }

    println!("Configuring DB... (currently MySQL; adjust other databases yourself)");
    if let Err(err) = configure_database(ctx, &mut config) {
        return Ok(report_failure("DB", &err));
    }

    println!("Configuring Redis...");
    if let Err(err) = configure_redis(ctx, &mut config) {
        return Ok(report_failure("Redis", &err));
    }

    println!("Configuring QUEUE... (currently Redis; adjust other connections yourself)");
    if let Err(err) = configure_queue(ctx, &mut config) {
        return Ok(report_failure("QUEUE", &err));
    }

    println!("Configuring CACHE... (currently Redis; adjust other drivers yourself)");
    if let Err(err) = configure_cache(ctx, &mut config) {
        return Ok(report_failure("CACHE", &err));
    }

    println!("Running migrations...");
    if let Err(err) = ctx.migrator.migrate() {
        return Ok(report_failure("migrations", &err));
    }
    println!("  ✓ Migrations successful!");

    println!("Running seeders...");
    if let Err(err) = ctx.migrator.seed() {
        return Ok(report_failure("seeders", &err));
    }
    println!("  ✓ Seeders successful!");

    write_lock(&ctx.paths)?;

    println!("\n✨ Application initialized successfully!");
    Ok(InitOutcome::Completed)
}

fn report_failure(stage: &str, err: &anyhow::Error) -> InitOutcome {
    println!("{} {err:#}", format!("✗ Configuring {stage} failed:").red());
    InitOutcome::StageFailed
}

/// Seed `.env` from `.env.example` when it does not exist yet.
fn ensure_env_file(paths: &ProjectPaths) -> Result<()> {
    let env_file = paths.env_file();
    if env_file.exists() {
        return Ok(());
    }

    let example = paths.env_example();
    if example.exists() {
        std::fs::copy(&example, &env_file)
            .with_context(|| format!("Failed to copy {} to .env", example.display()))?;
        println!("  ✓ Created .env from .env.example");
    } else {
        std::fs::write(&env_file, "")
            .with_context(|| format!("Failed to create {}", env_file.display()))?;
    }
    Ok(())
}

/// Persist one stage's keys and refresh the config snapshot so later stages
/// observe them.
fn persist(ctx: &InitContext, config: &mut AppConfig, pairs: &[(&str, String)]) -> Result<()> {
    let mut env = EnvFile::load(ctx.paths.env_file())?;
    env.apply(pairs)?;
    config.reload(ctx.paths.env_file())
}

fn generate_app_key() -> String {
    let mut key = String::with_capacity(64);
    for _ in 0..32 {
        key.push_str(&format!("{:02x}", fastrand::u8(..)));
    }
    key
}

fn configure_app(ctx: &mut InitContext, config: &mut AppConfig) -> Result<()> {
    let locales = locale::supported_locales();

    let prompt = &mut *ctx.prompt;
    let name = prompt.ask("Enter the APP_NAME", "rebase")?;
    let env = prompt.choose("Enter the APP_ENV", locale::supported_environments(), 0)?;
    let debug = prompt.choose("Enter the APP_DEBUG", &["true", "false"], 0)?;
    let url = prompt.ask("Enter the APP_URL", "http://localhost")?;
    let app_locale = prompt.choose(
        "Enter the APP_LOCALE (the timezone follows the selected locale)",
        &locales,
        0,
    )?;
    let fallback_locale = prompt.choose("Enter the APP_FALLBACK_LOCALE", &locales, 0)?;
    let faker_locale = prompt.choose("Enter the APP_FAKER_LOCALE", &locales, 0)?;

    let timezone = locale::timezone_for(&app_locale, &fallback_locale)?;
    let key = generate_app_key();

    persist(
        ctx,
        config,
        &[
            ("APP_NAME", name),
            ("APP_ENV", env),
            ("APP_DEBUG", debug),
            ("APP_URL", url),
            ("APP_LOCALE", app_locale),
            ("APP_FALLBACK_LOCALE", fallback_locale),
            ("APP_FAKER_LOCALE", faker_locale),
            ("APP_TIMEZONE", timezone.to_string()),
            ("APP_KEY", key),
        ],
    )?;
    println!("  ✓ Configuring APP successful!");
    Ok(())
}

fn configure_log(ctx: &mut InitContext, config: &mut AppConfig) -> Result<()> {
    let prompt = &mut *ctx.prompt;
    let channel = prompt.choose("Enter the LOG_CHANNEL", LOG_CHANNELS, 6)?;
    let stack = prompt.choose("Enter the LOG_STACK", LOG_CHANNELS, 1)?;
    let days = prompt.choose("Enter the LOG_DAILY_DAYS", LOG_DAILY_DAYS, 1)?;

    // Derived, not prompted: production logs errors only.
    let level = if config.is_prod() { "error" } else { "debug" };

    persist(
        ctx,
        config,
        &[
            ("LOG_CHANNEL", channel),
            ("LOG_STACK", stack),
            ("LOG_LEVEL", level.to_string()),
            ("LOG_DAILY_DAYS", days),
        ],
    )?;
    println!("  ✓ Configuring LOG successful!");
    Ok(())
}

fn configure_database(ctx: &mut InitContext, config: &mut AppConfig) -> Result<()> {
    let prompt = &mut *ctx.prompt;
    let connection = prompt.choose("Enter the DB_CONNECTION", &["mysql"], 0)?;
    let host = prompt.ask("Enter the DB_HOST", "127.0.0.1")?;
    let port = prompt.ask("Enter the DB_PORT", "3306")?;
    let database = prompt.ask("Enter the DB_DATABASE", "rebase")?;
    let username = prompt.ask("Enter the DB_USERNAME", "root")?;
    let password = prompt.secret("Enter the DB_PASSWORD")?;
    let charset = prompt.ask("Enter the DB_CHARSET", "utf8mb4")?;
    let collation = prompt.ask("Enter the DB_COLLATION", "utf8mb4_unicode_ci")?;
    let prefix = prompt.ask("Enter the DB_PREFIX", "")?;

    let settings = DbSettings {
        host: host.clone(),
        port: port.parse().context("DB_PORT must be a number")?,
        database: database.clone(),
        username: username.clone(),
        password: password.clone(),
        charset: charset.clone(),
        collation: collation.clone(),
    };

    println!("  Connecting to MySQL to create database '{database}'...");
    ctx.db.provision(&settings).map_err(InitError::from)?;
    println!("  ✓ Database '{database}' created and reachable");

    persist(
        ctx,
        config,
        &[
            ("DB_CONNECTION", connection),
            ("DB_HOST", host),
            ("DB_PORT", port),
            ("DB_DATABASE", database),
            ("DB_USERNAME", username),
            ("DB_PASSWORD", password),
            ("DB_CHARSET", charset),
            ("DB_COLLATION", collation),
            ("DB_PREFIX", prefix),
        ],
    )?;
    println!("  ✓ Configuring DB successful!");
    Ok(())
}

fn configure_redis(ctx: &mut InitContext, config: &mut AppConfig) -> Result<()> {
    let prompt = &mut *ctx.prompt;
    let host = prompt.ask("Enter the REDIS_HOST", "127.0.0.1")?;
    let password = prompt.secret("Enter the REDIS_PASSWORD")?;
    let port = prompt.ask("Enter the REDIS_PORT", "6379")?;
    let db = prompt.choose("Enter the REDIS_DB", REDIS_DB_INDEXES, 0)?;
    let cache_db = prompt.choose("Enter the REDIS_CACHE_DB", REDIS_DB_INDEXES, 1)?;
    let lock_db = prompt.choose("Enter the REDIS_LOCK_DB", REDIS_DB_INDEXES, 2)?;
    let queue_db = prompt.choose("Enter the REDIS_QUEUE_DB", REDIS_DB_INDEXES, 3)?;
    let prefix = prompt.ask("Enter the REDIS_PREFIX", "")?;
    let cache_lock_connection = prompt.choose(
        "Enter the REDIS_CACHE_LOCK_CONNECTION",
        &["default", "lock"],
        1,
    )?;
    let queue_connection = prompt.choose(
        "Enter the REDIS_QUEUE_CONNECTION",
        &["default", "queue"],
        1,
    )?;

    let settings = RedisSettings {
        host: host.clone(),
        port: port.parse().context("REDIS_PORT must be a number")?,
        password: password.clone(),
        database: db.parse().context("REDIS_DB must be 0..=15")?,
    };

    println!("  Testing Redis connection...");
    ctx.cache.ping(&settings).map_err(InitError::from)?;
    println!("  ✓ Redis connection successful!");

    persist(
        ctx,
        config,
        &[
            ("REDIS_HOST", host),
            ("REDIS_PASSWORD", password),
            ("REDIS_PORT", port),
            ("REDIS_DB", db),
            ("REDIS_CACHE_DB", cache_db),
            ("REDIS_LOCK_DB", lock_db),
            ("REDIS_QUEUE_DB", queue_db),
            ("REDIS_PREFIX", prefix),
            ("REDIS_CACHE_LOCK_CONNECTION", cache_lock_connection),
            ("REDIS_QUEUE_CONNECTION", queue_connection),
        ],
    )?;
    println!("  ✓ Configuring Redis successful!");
    Ok(())
}

fn configure_queue(ctx: &mut InitContext, config: &mut AppConfig) -> Result<()> {
    let connection = ctx.prompt.choose("Enter the QUEUE_CONNECTION", &["redis"], 0)?;
    persist(ctx, config, &[("QUEUE_CONNECTION", connection)])?;
    println!("  ✓ Configuring QUEUE successful!");
    Ok(())
}

fn configure_cache(ctx: &mut InitContext, config: &mut AppConfig) -> Result<()> {
    let prompt = &mut *ctx.prompt;
    let store = prompt.choose("Enter the CACHE_STORE", &["redis"], 0)?;
    let prefix = prompt.ask("Enter the CACHE_PREFIX", "")?;
    persist(
        ctx,
        config,
        &[("CACHE_STORE", store), ("CACHE_PREFIX", prefix)],
    )?;
    println!("  ✓ Configuring CACHE successful!");
    Ok(())
}

/// Free-text timestamp; the content is informational and never parsed.
fn write_lock(paths: &ProjectPaths) -> Result<()> {
    let lock_file = paths.lock_file();
    if let Some(parent) = lock_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    std::fs::write(&lock_file, format!("Initialized at {stamp}\n"))
        .with_context(|| format!("Failed to write lock file: {}", lock_file.display()))?;
    println!("  ✓ Initialization lock file created: {}", lock_file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_key_is_fresh_hex() {
        let a = generate_app_key();
        let b = generate_app_key();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_redis_db_choices_cover_0_to_15() {
        assert_eq!(REDIS_DB_INDEXES.len(), 16);
        assert_eq!(REDIS_DB_INDEXES[0], "0");
        assert_eq!(REDIS_DB_INDEXES[15], "15");
    }
}
