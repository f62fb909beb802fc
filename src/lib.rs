pub mod bootstrap;
pub mod config;
pub mod envfile;
pub mod error;
pub mod locale;
pub mod migrate;
pub mod paths;
pub mod probe;
pub mod prompt;

// Re-export commonly used types
pub use bootstrap::{InitContext, InitOutcome};
pub use config::AppConfig;
pub use error::InitError;
pub use paths::ProjectPaths;
