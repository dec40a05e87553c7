//! Application configuration
//!
//! Settings come from CLI flags with environment fallbacks; a `.env` file in the
//! working directory is loaded first when present.

use clap::Args;

pub mod db;
pub mod logging;
pub mod resources;

pub use db::DatabaseConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use resources::ResourceNamesConfig;

/// Settings shared by every command.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Resource name matching settings.
    #[command(flatten)]
    pub resources: ResourceNamesConfig,
}

/// Load `.env` into the process environment if the file exists.
pub fn load_dotenv() {
    _ = dotenvy::dotenv();
}
