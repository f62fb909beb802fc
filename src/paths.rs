//! Single source of truth for the project filesystem layout.
//!
//! This module defines WHERE files live. It has no I/O, no validation,
//! no business logic.
//!
//! ```text
//! project/
//! ├── .env                     # Persisted configuration (KEY=value lines)
//! ├── .env.example             # Template seeded to .env on first run
//! ├── migrations/              # Schema migrations (*.sql)
//! ├── seeders/                 # Baseline data (*.sql)
//! └── storage/
//!     └── app/
//!         └── init.lock        # Run-once marker for `rebase init`
//! ```

use std::path::{Path, PathBuf};

/// Paths rooted at a project directory.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persisted configuration file: `<root>/.env`
    pub fn env_file(&self) -> PathBuf {
        self.root.join(".env")
    }

    /// Configuration template: `<root>/.env.example`
    pub fn env_example(&self) -> PathBuf {
        self.root.join(".env.example")
    }

    /// Initialization lock marker: `<root>/storage/app/init.lock`
    pub fn lock_file(&self) -> PathBuf {
        self.root.join("storage").join("app").join("init.lock")
    }

    /// Schema migrations: `<root>/migrations/`
    pub fn migrations_dir(&self) -> PathBuf {
        self.root.join("migrations")
    }

    /// Seed data: `<root>/seeders/`
    pub fn seeders_dir(&self) -> PathBuf {
        self.root.join("seeders")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = ProjectPaths::new("/srv/rebase");
        assert_eq!(paths.env_file(), Path::new("/srv/rebase/.env"));
        assert_eq!(paths.env_example(), Path::new("/srv/rebase/.env.example"));
        assert_eq!(
            paths.lock_file(),
            Path::new("/srv/rebase/storage/app/init.lock")
        );
        assert_eq!(paths.migrations_dir(), Path::new("/srv/rebase/migrations"));
        assert_eq!(paths.seeders_dir(), Path::new("/srv/rebase/seeders"));
    }
}
