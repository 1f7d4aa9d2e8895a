use std::{io, path::PathBuf};

use jumpto_config::ConfigError;
use thiserror::Error;

/// Top-level error type for the jumpto crate.
#[derive(Debug, Error)]
pub enum JumptoError {
  #[error("Failed to read {}: {source}", path.display())]
  ReadFile {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to parse heading list from {}: {source}", path.display())]
  ParseHeadings {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Invalid tip '{0}'. Expected SLUG=TEXT")]
  InvalidTip(String),

  #[error("No input file given and none configured")]
  MissingInput,

  #[error("Configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Serde error: {0}")]
  Serde(#[from] serde_json::Error),
}

/// Result type for jumpto operations.
pub type Result<T> = std::result::Result<T, JumptoError>;
