mod database;
mod logging;
mod settings;

pub use database::{init_database, migrate};
pub use logging::init_logging;
pub use settings::{AuthorityStrategy, Settings, SettingsError};
