pub mod config;
pub mod error;
pub mod templates;

pub use config::{Config, TocSettings};
pub use error::ConfigError;
