//! Types for jumpto-toc public API and internal use.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::TocError;

/// Represents a heading in a Markdown document, as supplied by the host.
///
/// Field aliases accept the shapes other tools emit for the same data
/// (`id`/`text` from extracted headers, `depth` from content APIs).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct HeadingRecord {
  /// Anchor ID of the heading, unique within the document.
  #[serde(alias = "id")]
  pub slug:  String,
  /// Display text of the heading.
  #[serde(alias = "text")]
  pub title: String,
  /// Heading level (2 for `h2`).
  #[serde(alias = "depth")]
  pub level: u8,
}

impl HeadingRecord {
  /// Create a new [`HeadingRecord`].
  #[must_use]
  pub fn new(
    slug: impl Into<String>,
    title: impl Into<String>,
    level: u8,
  ) -> Self {
    Self {
      slug: slug.into(),
      title: title.into(),
      level,
    }
  }
}

/// Requested rendering mode for a table of contents.
#[derive(
  Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum TocKind {
  /// Always a flat sentence of links.
  List,

  /// Always a nested list, with a depth hint for styling.
  Tree,

  /// Nested when more than one level is requested, flat otherwise.
  #[default]
  Auto,
}

impl TocKind {
  /// Resolve the requested mode into the layout that will be rendered.
  #[must_use]
  pub const fn resolve(self, multiple_levels: bool) -> Layout {
    match self {
      Self::List => Layout::Flat,
      Self::Tree => Layout::Nested,
      Self::Auto if multiple_levels => Layout::Nested,
      Self::Auto => Layout::Flat,
    }
  }
}

impl FromStr for TocKind {
  type Err = TocError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "list" => Ok(Self::List),
      "tree" => Ok(Self::Tree),
      "auto" => Ok(Self::Auto),
      _ => Err(TocError::UnknownKind(s.to_string())),
    }
  }
}

impl fmt::Display for TocKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::List => f.write_str("list"),
      Self::Tree => f.write_str("tree"),
      Self::Auto => f.write_str("auto"),
    }
  }
}

/// Concrete markup shape produced for a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
  /// `Prompt: A, B or C.`
  Flat,
  /// Nested `<ul>` grouped by heading level.
  Nested,
}
