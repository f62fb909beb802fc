//! Live verification of candidate database and Redis settings.
//!
//! Probes prove the operator's values work before anything is persisted.
//! Connections are transient: opened for the check, closed before returning,
//! never held across stages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{system} connection failed: {message}")]
    Connect { system: &'static str, message: String },

    #[error("CREATE DATABASE failed: {message}")]
    Schema { message: String },
}

/// Candidate database settings collected by the DB stage.
#[derive(Debug, Clone)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub charset: String,
    pub collation: String,
}

/// Candidate Redis settings collected by the Redis stage.
#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub password: String,
    pub database: u8,
}

pub trait DatabaseProbe {
    /// Verify the server is reachable, create the schema if it is missing,
    /// and confirm the schema itself accepts connections.
    fn provision(&self, settings: &DbSettings) -> Result<(), ProbeError>;
}

pub trait CacheProbe {
    /// Obtain a client and issue a liveness probe.
    fn ping(&self, settings: &RedisSettings) -> Result<(), ProbeError>;
}

/// MySQL implementation over sqlx, driven by a throwaway current-thread
/// runtime so the wizard itself stays synchronous.
pub struct MySqlProbe;

fn connect_err(system: &'static str) -> impl Fn(sqlx::Error) -> ProbeError {
    move |err| ProbeError::Connect {
        system,
        message: err.to_string(),
    }
}

impl DatabaseProbe for MySqlProbe {
    fn provision(&self, settings: &DbSettings) -> Result<(), ProbeError> {
        use sqlx::mysql::MySqlConnectOptions;
        use sqlx::{ConnectOptions, Connection};

        // No database selected: the target schema may not exist yet.
        let server_options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.username)
            .password(&settings.password)
            .charset(&settings.charset)
            .collation(&settings.collation);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| ProbeError::Connect {
                system: "MySQL",
                message: err.to_string(),
            })?;

        runtime.block_on(async {
            let mut conn = server_options
                .connect()
                .await
                .map_err(connect_err("MySQL server"))?;

            let ddl = format!(
                "CREATE DATABASE IF NOT EXISTS `{}` CHARACTER SET {} COLLATE {}",
                settings.database, settings.charset, settings.collation
            );
            sqlx::raw_sql(&ddl)
                .execute(&mut conn)
                .await
                .map_err(|err| ProbeError::Schema {
                    message: err.to_string(),
                })?;
            conn.close().await.ok();

            // Reconnect selecting the schema to confirm it is reachable.
            let mut conn = server_options
                .clone()
                .database(&settings.database)
                .connect()
                .await
                .map_err(connect_err("MySQL database"))?;
            conn.close().await.ok();

            Ok(())
        })
    }
}

/// Redis implementation over the synchronous `redis` connection API.
pub struct RedisProbe;

impl CacheProbe for RedisProbe {
    fn ping(&self, settings: &RedisSettings) -> Result<(), ProbeError> {
        let to_probe_err = |err: redis::RedisError| ProbeError::Connect {
            system: "Redis",
            message: err.to_string(),
        };

        let info = redis::ConnectionInfo {
            addr: redis::ConnectionAddr::Tcp(settings.host.clone(), settings.port),
            redis: redis::RedisConnectionInfo {
                db: i64::from(settings.database),
                username: None,
                password: if settings.password.is_empty() {
                    None
                } else {
                    Some(settings.password.clone())
                },
                ..Default::default()
            },
        };

        let client = redis::Client::open(info).map_err(to_probe_err)?;
        let mut conn = client.get_connection().map_err(to_probe_err)?;
        redis::cmd("PING")
            .query::<String>(&mut conn)
            .map_err(to_probe_err)?;
        Ok(())
    }
}
