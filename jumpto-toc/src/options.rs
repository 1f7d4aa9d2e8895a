//! Per-instance options for a table of contents.
//!
//! Options are usually loaded from TOML or JSON, so the `level` and `exclude`
//! fields accept the same shorthand forms an author would write by hand:
//! `level = 2`, `level = "2,3"`, `level = [2, 3]`, `exclude = "intro"` or
//! `exclude = ["intro", "outro"]`.
use std::{
  collections::{BTreeSet, HashMap},
  fmt::{self, Write},
};

use serde::{
  Deserialize,
  Deserializer,
  Serialize,
  Serializer,
  de::{self, SeqAccess, Visitor},
  ser::SerializeSeq,
};

use crate::types::{HeadingRecord, TocKind};

/// Default label placed in front of the rendered links.
pub const DEFAULT_PROMPT: &str = "Jump to";

/// Default heading level included in a table of contents.
pub const DEFAULT_LEVEL: u8 = 2;

/// Set of heading levels to include.
///
/// Entries that are not positive integers are dropped and remembered, so the
/// render plan can report them instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSet {
  levels:    BTreeSet<u8>,
  malformed: Vec<String>,
}

impl Default for LevelSet {
  fn default() -> Self {
    Self::single(DEFAULT_LEVEL)
  }
}

impl LevelSet {
  /// A set holding exactly one level.
  #[must_use]
  pub fn single(level: u8) -> Self {
    Self::from_levels([level])
  }

  /// Build a set from already-numeric levels. Zero is not a valid level and
  /// is reported as malformed.
  #[must_use]
  pub fn from_levels(levels: impl IntoIterator<Item = u8>) -> Self {
    let mut set = Self::empty();
    for level in levels {
      set.push_number(i64::from(level));
    }
    set
  }

  /// Parse a comma-separated list such as `"2, 3"`.
  ///
  /// Never fails: entries that do not parse are kept aside as malformed.
  /// Empty entries (`"2,"`) are skipped silently.
  #[must_use]
  pub fn parse(input: &str) -> Self {
    let mut set = Self::empty();
    set.push_list(input);
    set
  }

  const fn empty() -> Self {
    Self {
      levels:    BTreeSet::new(),
      malformed: Vec::new(),
    }
  }

  fn push_list(&mut self, input: &str) {
    for entry in input.split(',').map(str::trim) {
      if entry.is_empty() {
        continue;
      }
      match entry.parse::<u8>() {
        Ok(level) if level > 0 => {
          self.levels.insert(level);
        },
        _ => self.malformed.push(entry.to_string()),
      }
    }
  }

  fn push_number(&mut self, value: i64) {
    match u8::try_from(value) {
      Ok(level) if level > 0 => {
        self.levels.insert(level);
      },
      _ => self.malformed.push(value.to_string()),
    }
  }

  /// Whether `level` is part of the set.
  #[must_use]
  pub fn contains(&self, level: u8) -> bool {
    self.levels.contains(&level)
  }

  /// Number of distinct levels.
  #[must_use]
  pub fn len(&self) -> usize {
    self.levels.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.levels.is_empty()
  }

  /// More than one distinct level was requested.
  #[must_use]
  pub fn has_multiple(&self) -> bool {
    self.levels.len() > 1
  }

  /// Deepest requested level.
  #[must_use]
  pub fn max(&self) -> Option<u8> {
    self.levels.last().copied()
  }

  /// Levels in ascending order.
  pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
    self.levels.iter().copied()
  }

  /// Entries dropped while parsing.
  #[must_use]
  pub fn malformed(&self) -> &[String] {
    &self.malformed
  }
}

impl fmt::Display for LevelSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (idx, level) in self.levels.iter().enumerate() {
      if idx > 0 {
        f.write_char(',')?;
      }
      write!(f, "{level}")?;
    }
    Ok(())
  }
}

impl Serialize for LevelSet {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let mut seq = serializer.serialize_seq(Some(self.levels.len()))?;
    for level in &self.levels {
      seq.serialize_element(level)?;
    }
    seq.end()
  }
}

/// One element of a `level = [...]` array.
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelEntry {
  Number(i64),
  Text(String),
}

impl<'de> Deserialize<'de> for LevelSet {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    struct LevelSetVisitor;

    impl<'de> Visitor<'de> for LevelSetVisitor {
      type Value = LevelSet;

      fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(
          "a heading level, a comma-separated string of levels, or a list \
           of levels",
        )
      }

      fn visit_i64<E>(self, value: i64) -> Result<LevelSet, E>
      where
        E: de::Error,
      {
        let mut set = LevelSet::empty();
        set.push_number(value);
        Ok(set)
      }

      fn visit_u64<E>(self, value: u64) -> Result<LevelSet, E>
      where
        E: de::Error,
      {
        let mut set = LevelSet::empty();
        match i64::try_from(value) {
          Ok(value) => set.push_number(value),
          Err(_) => set.malformed.push(value.to_string()),
        }
        Ok(set)
      }

      fn visit_f64<E>(self, value: f64) -> Result<LevelSet, E>
      where
        E: de::Error,
      {
        let mut set = LevelSet::empty();
        set.malformed.push(value.to_string());
        Ok(set)
      }

      fn visit_str<E>(self, value: &str) -> Result<LevelSet, E>
      where
        E: de::Error,
      {
        Ok(LevelSet::parse(value))
      }

      fn visit_seq<A>(self, mut seq: A) -> Result<LevelSet, A::Error>
      where
        A: SeqAccess<'de>,
      {
        let mut set = LevelSet::empty();
        while let Some(entry) = seq.next_element::<LevelEntry>()? {
          match entry {
            LevelEntry::Number(value) => set.push_number(value),
            LevelEntry::Text(value) => set.push_list(&value),
          }
        }
        Ok(set)
      }
    }

    deserializer.deserialize_any(LevelSetVisitor)
  }
}

/// Slugs removed from the table of contents regardless of level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlugSet(Vec<String>);

impl SlugSet {
  /// Whether `slug` is part of the set.
  #[must_use]
  pub fn contains(&self, slug: &str) -> bool {
    self.0.iter().any(|s| s == slug)
  }

  /// Add a slug, ignoring duplicates.
  pub fn insert(&mut self, slug: impl Into<String>) {
    let slug = slug.into();
    if !self.contains(&slug) {
      self.0.push(slug);
    }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }
}

impl From<&str> for SlugSet {
  fn from(slug: &str) -> Self {
    let mut set = Self::default();
    set.insert(slug);
    set
  }
}

impl<S: Into<String>> FromIterator<S> for SlugSet {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    let mut set = Self::default();
    for slug in iter {
      set.insert(slug);
    }
    set
  }
}

impl<S: Into<String>> Extend<S> for SlugSet {
  fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
    for slug in iter {
      self.insert(slug);
    }
  }
}

impl Serialize for SlugSet {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    self.0.serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for SlugSet {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    struct SlugSetVisitor;

    impl<'de> Visitor<'de> for SlugSetVisitor {
      type Value = SlugSet;

      fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a slug or a list of slugs")
      }

      fn visit_str<E>(self, value: &str) -> Result<SlugSet, E>
      where
        E: de::Error,
      {
        Ok(SlugSet::from(value))
      }

      fn visit_seq<A>(self, mut seq: A) -> Result<SlugSet, A::Error>
      where
        A: SeqAccess<'de>,
      {
        let mut set = SlugSet::default();
        while let Some(slug) = seq.next_element::<String>()? {
          set.insert(slug);
        }
        Ok(set)
      }
    }

    deserializer.deserialize_any(SlugSetVisitor)
  }
}

/// Options for one table of contents instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TocOptions {
  /// Explicit headings. When empty, the ambient headings of the hosting page
  /// are used instead.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub headers: Vec<HeadingRecord>,

  /// Label in front of the links. Empty suppresses the label.
  pub prompt: String,

  /// Heading levels to include.
  pub level: LevelSet,

  /// Slugs to leave out.
  #[serde(skip_serializing_if = "SlugSet::is_empty")]
  pub exclude: SlugSet,

  /// Only consider headings nested under this slug.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub section: Option<String>,

  /// First heading of the document-order slice, inclusive.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub from: Option<String>,

  /// Last heading of the document-order slice, inclusive.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub to: Option<String>,

  /// Rendering mode.
  #[serde(rename = "type")]
  pub kind: TocKind,

  /// Annotation text per slug, shown beneath top-level items.
  #[serde(skip_serializing_if = "HashMap::is_empty")]
  pub tips: HashMap<String, String>,
}

impl Default for TocOptions {
  fn default() -> Self {
    Self {
      headers: Vec::new(),
      prompt:  DEFAULT_PROMPT.to_string(),
      level:   LevelSet::default(),
      exclude: SlugSet::default(),
      section: None,
      from:    None,
      to:      None,
      kind:    TocKind::default(),
      tips:    HashMap::new(),
    }
  }
}

impl TocOptions {
  /// Annotation text for `slug`, if any.
  #[must_use]
  pub fn tip(&self, slug: &str) -> Option<&str> {
    self.tips.get(slug).map(String::as_str)
  }

  /// Short description of the filtering options, used in diagnostics.
  #[must_use]
  pub fn describe(&self) -> String {
    let mut out = format!("level={}", self.level);
    if let Some(ref section) = self.section {
      let _ = write!(out, " section={section}");
    }
    if let Some(ref from) = self.from {
      let _ = write!(out, " from={from}");
    }
    if let Some(ref to) = self.to {
      let _ = write!(out, " to={to}");
    }
    if !self.exclude.is_empty() {
      let excluded: Vec<&str> = self.exclude.iter().collect();
      let _ = write!(out, " exclude={}", excluded.join(","));
    }
    out
  }
}
