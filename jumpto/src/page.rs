//! Markdown articles as a source of headings.
//!
//! A [`Page`] is the hosting document a table of contents is embedded in. It
//! reads either a Markdown article, whose headings are extracted with comrak,
//! or a JSON list of heading records prepared elsewhere.
use std::{
  collections::HashSet,
  fs,
  path::{Path, PathBuf},
};

use comrak::{
  Arena,
  nodes::{AstNode, NodeHeading, NodeValue},
  options::Options,
  parse_document,
};
use jumpto_toc::{HeaderSource, HeadingRecord};
use log::{debug, trace};

use crate::error::{JumptoError, Result};

/// A loaded article and the headings it supplies.
#[derive(Debug, Clone, Default)]
pub struct Page {
  path:     Option<PathBuf>,
  title:    Option<String>,
  headings: Vec<HeadingRecord>,
}

impl Page {
  /// Load a page from disk. Files ending in `.json` hold a list of heading
  /// records; anything else is read as Markdown.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, or if a JSON file does not
  /// contain a heading list.
  pub fn load(path: &Path) -> Result<Self> {
    let content =
      fs::read_to_string(path).map_err(|source| JumptoError::ReadFile {
        path: path.to_path_buf(),
        source,
      })?;

    let is_json = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let mut page = if is_json {
      Self::from_json(&content).map_err(|source| {
        JumptoError::ParseHeadings {
          path: path.to_path_buf(),
          source,
        }
      })?
    } else {
      Self::from_markdown(&content)
    };

    debug!(
      "Loaded {} headings from {}",
      page.headings.len(),
      path.display()
    );
    page.path = Some(path.to_path_buf());
    Ok(page)
  }

  /// Build a page from Markdown source.
  #[must_use]
  pub fn from_markdown(content: &str) -> Self {
    let (headings, title) = extract_headings(content);
    Self {
      path: None,
      title,
      headings,
    }
  }

  /// Build a page from a JSON array of heading records.
  ///
  /// # Errors
  ///
  /// Returns an error if `content` is not a valid heading list.
  pub fn from_json(content: &str) -> serde_json::Result<Self> {
    let headings: Vec<HeadingRecord> = serde_json::from_str(content)?;
    let title = headings
      .iter()
      .find(|h| h.level == 1)
      .map(|h| h.title.clone());
    Ok(Self {
      path: None,
      title,
      headings,
    })
  }

  #[must_use]
  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  /// Text of the first level 1 heading, if any.
  #[must_use]
  pub fn title(&self) -> Option<&str> {
    self.title.as_deref()
  }

  /// All headings of the page in document order.
  #[must_use]
  pub fn headings(&self) -> &[HeadingRecord] {
    &self.headings
  }
}

impl HeaderSource for Page {
  fn headers(&self) -> Vec<HeadingRecord> {
    self.headings.clone()
  }
}

fn comrak_options() -> Options<'static> {
  let mut options = Options::default();
  options.extension.table = true;
  options.extension.footnotes = true;
  options.extension.strikethrough = true;
  options.extension.tasklist = true;
  options.extension.superscript = true;
  options
}

/// Extract headings and title from Markdown content.
///
/// Slugs come from a trailing `{#id}` anchor when the heading has one and are
/// derived from the heading text otherwise. A derived slug that collides with
/// any slug already on the page, explicit or derived, gets the first free `-1`,
/// `-2`, ... suffix. Explicit anchors are kept as written.
#[must_use]
pub fn extract_headings(content: &str) -> (Vec<HeadingRecord>, Option<String>) {
  let arena = Arena::new();
  let options = comrak_options();
  let root = parse_document(&arena, content, &options);

  let mut headings = Vec::new();
  let mut found_title = None;
  let mut seen: HashSet<String> = HashSet::new();

  for node in root.descendants() {
    let level = match &node.data.borrow().value {
      NodeValue::Heading(NodeHeading { level, .. }) => *level,
      _ => continue,
    };

    let text = extract_inline_text(node);
    let (title, slug) = match split_explicit_anchor(&text) {
      Some((title, anchor)) => (title.to_string(), anchor.to_string()),
      None => {
        let title = text.trim().to_string();
        let slug = unique_slug(&seen, slugify(&title));
        (title, slug)
      },
    };
    seen.insert(slug.clone());

    if level == 1 && found_title.is_none() {
      found_title = Some(title.clone());
    }

    trace!("Found heading h{level} #{slug}: {title}");
    headings.push(HeadingRecord::new(slug, title, level));
  }

  (headings, found_title)
}

/// Split `Title {#anchor}` into its title and anchor.
fn split_explicit_anchor(text: &str) -> Option<(&str, &str)> {
  let trimmed = text.trim_end();
  let start = trimmed.rfind("{#")?;
  let anchor = trimmed[start + 2..].strip_suffix('}')?;
  if anchor.is_empty() {
    return None;
  }
  Some((trimmed[..start].trim(), anchor))
}

fn unique_slug(seen: &HashSet<String>, slug: String) -> String {
  let mut candidate = slug.clone();
  let mut suffix = 0_usize;
  while seen.contains(&candidate) {
    suffix += 1;
    candidate = format!("{slug}-{suffix}");
  }
  candidate
}

/// Extract all inline text from a heading node.
fn extract_inline_text<'a>(node: &'a AstNode<'a>) -> String {
  let mut text = String::new();
  for child in node.children() {
    match &child.data.borrow().value {
      NodeValue::Text(t) => text.push_str(t),
      NodeValue::Code(t) => text.push_str(&t.literal),
      NodeValue::Link(..)
      | NodeValue::Emph
      | NodeValue::Strong
      | NodeValue::Strikethrough
      | NodeValue::Superscript
      | NodeValue::FootnoteReference(..) => {
        text.push_str(&extract_inline_text(child));
      },
      NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
      _ => {},
    }
  }
  text
}

/// Slugify a string for use as an anchor ID.
/// Converts to lowercase, replaces non-alphanumeric characters with dashes,
/// and trims leading/trailing dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
  text
    .to_lowercase()
    .replace(|c: char| !c.is_alphanumeric() && c != '-' && c != '_', "-")
    .trim_matches('-')
    .to_string()
}
