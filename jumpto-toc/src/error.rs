use std::fmt;

use log::{debug, warn};
use thiserror::Error;

/// Error type for fallible parsing entry points of jumpto-toc.
#[derive(Debug, Error)]
pub enum TocError {
  #[error("Unknown table of contents type: {0} (expected list, tree or auto)")]
  UnknownKind(String),
}

/// Side of a `from`/`to` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
  From,
  To,
}

impl fmt::Display for Boundary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::From => f.write_str("from"),
      Self::To => f.write_str("to"),
    }
  }
}

/// Developer-facing findings collected while building a render plan.
///
/// None of these abort rendering. The worst outcome is an empty table of
/// contents plus a logged diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
  /// Filtering left nothing to link to.
  #[error("No headings matched table of contents options: {options}")]
  NoMatchingHeaders { options: String },

  /// The configured section slug does not exist; the candidate pool is
  /// empty.
  #[error("Section `{0}` not found in headings")]
  UnknownSection(String),

  /// A range boundary does not exist in the pool and was ignored.
  #[error("Range boundary {side}=`{slug}` not found, ignoring it")]
  UnknownBoundary { side: Boundary, slug: String },

  /// Tips were given but the flat layout has no place to show them.
  #[error("Ignoring {0} tip(s), tips are only shown in the nested layout")]
  UnusedTips(usize),

  /// A `level` entry that is not a positive integer.
  #[error("Ignoring malformed heading level `{0}`")]
  MalformedLevel(String),
}

impl Diagnostic {
  /// Whether this diagnostic points at a likely configuration mistake.
  #[must_use]
  pub const fn is_warning(&self) -> bool {
    matches!(self, Self::NoMatchingHeaders { .. } | Self::MalformedLevel(_))
  }

  /// Log the diagnostic at its severity.
  pub fn emit(&self) {
    if self.is_warning() {
      warn!("{self}");
    } else {
      debug!("{self}");
    }
  }
}
