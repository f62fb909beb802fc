//! Line-oriented `.env` persistence.
//!
//! Updates are whole-line replacements per key, so every untouched line
//! keeps its byte-for-byte content and position. Keys that do not exist yet
//! are appended at the end of the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::{NoExpand, Regex};

/// An `.env` file held in memory between load and save.
#[derive(Debug)]
pub struct EnvFile {
    path: PathBuf,
    content: String,
}

impl EnvFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read env file: {}", path.display()))?;
        Ok(Self { path, content })
    }

    /// Current value for `key`, if the file has a line for it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.content
            .lines()
            .find_map(|line| line.strip_prefix(key).and_then(|rest| rest.strip_prefix('=')))
    }

    /// Replace the `KEY=...` line in place, or append one if absent.
    ///
    /// Idempotent by key: setting the same key twice leaves exactly one line
    /// holding the last value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let pattern = Regex::new(&format!(r"(?m)^{}=.*$", regex::escape(key)))
            .with_context(|| format!("Invalid env key: {key}"))?;
        let line = format!("{key}={value}");

        if pattern.is_match(&self.content) {
            self.content = pattern
                .replace_all(&self.content, NoExpand(&line))
                .into_owned();
        } else {
            if !self.content.is_empty() && !self.content.ends_with('\n') {
                self.content.push('\n');
            }
            self.content.push_str(&line);
            self.content.push('\n');
        }
        Ok(())
    }

    /// Set every pair, then write the file once. One call per stage, so a
    /// stage's keys land together or not at all.
    pub fn apply(&mut self, pairs: &[(&str, String)]) -> Result<()> {
        for (key, value) in pairs {
            self.set(key, value)?;
        }
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        fs::write(&self.path, &self.content)
            .with_context(|| format!("Failed to write env file: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_with(content: &str) -> (tempfile::TempDir, EnvFile) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, EnvFile::load(&path).unwrap())
    }

    #[test]
    fn test_set_replaces_line_in_place() {
        let (_dir, mut env) = env_with("APP_NAME=rebase\nDB_HOST=localhost\nDB_PORT=3306\n");
        env.set("DB_HOST", "10.0.0.5").unwrap();
        env.save().unwrap();

        let written = fs::read_to_string(env.path.clone()).unwrap();
        assert_eq!(written, "APP_NAME=rebase\nDB_HOST=10.0.0.5\nDB_PORT=3306\n");
    }

    #[test]
    fn test_set_is_idempotent_by_key() {
        let (_dir, mut env) = env_with("# comment\nDB_HOST=a\nOTHER=1\n");
        env.set("DB_HOST", "first").unwrap();
        env.set("DB_HOST", "second").unwrap();

        let lines: Vec<&str> = env
            .content
            .lines()
            .filter(|l| l.starts_with("DB_HOST="))
            .collect();
        assert_eq!(lines, vec!["DB_HOST=second"]);
        assert!(env.content.starts_with("# comment\n"));
        assert!(env.content.contains("OTHER=1"));
    }

    #[test]
    fn test_missing_key_is_appended() {
        let (_dir, mut env) = env_with("APP_NAME=rebase\n");
        env.set("CACHE_PREFIX", "rb").unwrap();
        assert_eq!(env.content, "APP_NAME=rebase\nCACHE_PREFIX=rb\n");
    }

    #[test]
    fn test_dollar_signs_in_values_are_literal() {
        let (_dir, mut env) = env_with("DB_PASSWORD=old\n");
        env.set("DB_PASSWORD", "pa$$1").unwrap();
        assert_eq!(env.get("DB_PASSWORD"), Some("pa$$1"));
    }

    #[test]
    fn test_prefix_keys_do_not_collide() {
        let (_dir, mut env) = env_with("APP_ENV=dev\nAPP_ENV_EXTRA=x\n");
        env.set("APP_ENV", "prod").unwrap();
        assert_eq!(env.get("APP_ENV"), Some("prod"));
        assert_eq!(env.get("APP_ENV_EXTRA"), Some("x"));
    }

    #[test]
    fn test_apply_writes_all_pairs_at_once() {
        let (dir, mut env) = env_with("QUEUE_CONNECTION=sync\n");
        env.apply(&[
            ("QUEUE_CONNECTION", "redis".to_string()),
            ("CACHE_STORE", "redis".to_string()),
        ])
        .unwrap();

        let written = fs::read_to_string(dir.path().join(".env")).unwrap();
        assert_eq!(written, "QUEUE_CONNECTION=redis\nCACHE_STORE=redis\n");
    }
}
