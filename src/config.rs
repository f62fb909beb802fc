//! In-process view of the persisted configuration.
//!
//! Values live in the `.env` file; this snapshot is what the wizard consults
//! between stages. `reload` is the refresh that makes freshly persisted
//! values visible. The snapshot is passed explicitly everywhere it is read,
//! never held as a process-wide global.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::default();
        config.reload(path)?;
        Ok(config)
    }

    /// Re-read the env file so this snapshot observes the latest writes.
    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read env file: {}", path.display()))?;

        self.values = content
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    return None;
                }
                let (key, value) = line.split_once('=')?;
                Some((key.trim().to_string(), value.trim().to_string()))
            })
            .collect();
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn app_env(&self) -> &str {
        self.get("APP_ENV").unwrap_or("dev")
    }

    pub fn is_prod(&self) -> bool {
        self.app_env() == "prod"
    }

    pub fn locale(&self) -> &str {
        self.get("APP_LOCALE").unwrap_or("en")
    }

    pub fn fallback_locale(&self) -> &str {
        self.get("APP_FALLBACK_LOCALE").unwrap_or("en")
    }

    pub fn timezone(&self) -> &str {
        self.get("APP_TIMEZONE").unwrap_or("UTC")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_with(content: &str) -> AppConfig {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        AppConfig::load(&path).unwrap()
    }

    #[test]
    fn test_parses_key_value_lines() {
        let config = config_with("APP_ENV=stag\n# comment\n\nDB_HOST=db.internal\n");
        assert_eq!(config.get("APP_ENV"), Some("stag"));
        assert_eq!(config.get("DB_HOST"), Some("db.internal"));
        assert_eq!(config.get("MISSING"), None);
    }

    #[test]
    fn test_is_prod() {
        assert!(config_with("APP_ENV=prod\n").is_prod());
        assert!(!config_with("APP_ENV=dev\n").is_prod());
        assert!(!config_with("").is_prod());
    }

    #[test]
    fn test_locale_accessors_default_sensibly() {
        let config = config_with("");
        assert_eq!(config.locale(), "en");
        assert_eq!(config.fallback_locale(), "en");
        assert_eq!(config.timezone(), "UTC");
    }

    #[test]
    fn test_reload_observes_new_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "APP_ENV=dev\n").unwrap();

        let mut config = AppConfig::load(&path).unwrap();
        assert_eq!(config.app_env(), "dev");

        std::fs::write(&path, "APP_ENV=prod\n").unwrap();
        config.reload(&path).unwrap();
        assert!(config.is_prod());
    }
}
