//! Markup for a render plan.
//!
//! Titles and tips are embedded as-is. They are expected to be sanitized by
//! whatever extracted them.
use std::{
  borrow::Cow,
  collections::HashMap,
  fmt::Write,
  sync::LazyLock,
};

use log::error;
use regex::Regex;

use crate::{
  options::TocOptions,
  plan::RenderPlan,
  types::{HeadingRecord, Layout},
};

/// One non-word character at either end of a title.
static EDGE_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\W|\W$").unwrap_or_else(|e| {
    error!("Failed to compile EDGE_PUNCTUATION regex: {e}");
    never_matching_regex()
  })
});

fn never_matching_regex() -> Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}

/// Strip a single leading and a single trailing non-word character.
#[must_use]
pub fn clean_title(title: &str) -> Cow<'_, str> {
  EDGE_PUNCTUATION.replace_all(title, "")
}

fn push_link(out: &mut String, item: &HeadingRecord, title: &str) {
  // Writing to String is infallible
  let _ = write!(out, "<a href=\"#{}\">{}</a>", item.slug, title);
}

/// Render the plan's items in its layout, without the surrounding container.
#[must_use]
pub fn render_fragment(plan: &RenderPlan, options: &TocOptions) -> String {
  match plan.layout {
    Layout::Flat => render_flat(&plan.items, &options.prompt),
    Layout::Nested => render_nested(&plan.items, &options.prompt, &options.tips),
  }
}

/// Render items as one sentence: `Prompt: A, B or C.`
#[must_use]
pub fn render_flat(items: &[HeadingRecord], prompt: &str) -> String {
  let mut html = String::from("<p class=\"toc-prompt\">");
  if !prompt.is_empty() {
    let _ = write!(html, "{prompt}: ");
  }

  let last = items.len().saturating_sub(1);
  for (idx, item) in items.iter().enumerate() {
    if idx > 0 {
      html.push_str(if idx == last { " or " } else { ", " });
    }
    push_link(&mut html, item, &clean_title(&item.title));
  }

  html.push_str(".</p>");
  html
}

/// Render items as a nested list grouped by heading level.
///
/// A heading deeper than the current list opens exactly one sub-list, however
/// many levels it skips. A shallower heading closes sub-lists until it fits.
/// Tips are attached to root-level items only.
#[must_use]
pub fn render_nested(
  items: &[HeadingRecord],
  prompt: &str,
  tips: &HashMap<String, String>,
) -> String {
  let mut html = String::new();
  if !prompt.is_empty() {
    let _ = write!(html, "<p class=\"toc-prompt\">{prompt}:</p>");
  }
  html.push_str("<ul>");

  // Heading level of every open list, root first
  let mut open: Vec<u8> = Vec::new();

  for item in items {
    match open.last().copied() {
      None => {
        open.push(item.level);
        html.push_str("<li>");
      },
      Some(current) if item.level > current => {
        open.push(item.level);
        html.push_str("<ul><li>");
      },
      Some(_) => {
        while let [.., parent, current] = open[..] {
          if current <= item.level {
            break;
          }
          if parent < item.level {
            // Sits between the parent and the open sub-list: a sibling
            if let Some(last) = open.last_mut() {
              *last = item.level;
            }
            break;
          }
          open.pop();
          html.push_str("</li></ul>");
        }
        if let [root] = open.as_mut_slice()
          && *root > item.level
        {
          *root = item.level;
        }
        html.push_str("</li><li>");
      },
    }

    push_link(&mut html, item, &item.title);

    if open.len() == 1
      && let Some(tip) = tips.get(&item.slug)
    {
      let _ = write!(html, "<br><small class=\"toc-tip\">{tip}</small>");
    }
  }

  for _ in 1..open.len() {
    html.push_str("</li></ul>");
  }
  if !open.is_empty() {
    html.push_str("</li>");
  }
  html.push_str("</ul>");
  html
}
