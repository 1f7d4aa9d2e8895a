//! Heading filters.
//!
//! Narrowing happens in a fixed order: section, then range, then level, then
//! exclusion. The first two work on contiguous document-order slices, the
//! last two drop individual records. Nothing is ever reordered.
use crate::{
  error::{Boundary, Diagnostic},
  options::TocOptions,
  types::HeadingRecord,
};

/// Result of running every filter over a heading sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
  /// Headings that produce a link, in document order.
  pub items:       Vec<HeadingRecord>,
  /// Findings collected along the way.
  pub diagnostics: Vec<Diagnostic>,
}

fn position(pool: &[HeadingRecord], slug: &str) -> Option<usize> {
  pool.iter().position(|h| h.slug == slug)
}

/// Headings nested under the first heading whose slug is `slug`.
///
/// The run starts right after the anchor heading and stops at the first
/// heading whose level is at or above the anchor's. Returns [`None`] when no
/// heading has that slug.
#[must_use]
pub fn restrict_to_section<'a>(
  pool: &'a [HeadingRecord],
  slug: &str,
) -> Option<&'a [HeadingRecord]> {
  let idx = position(pool, slug)?;
  let anchor = pool[idx].level;
  let rest = &pool[idx + 1..];
  let end = rest
    .iter()
    .position(|h| h.level <= anchor)
    .unwrap_or(rest.len());
  Some(&rest[..end])
}

/// Slice `pool` to the inclusive range between `from` and `to`.
///
/// `to` is located first and everything after it dropped; `from` is then
/// searched in what is left. A boundary that cannot be found is ignored.
#[must_use]
pub fn restrict_to_range<'a>(
  pool: &'a [HeadingRecord],
  from: Option<&str>,
  to: Option<&str>,
) -> &'a [HeadingRecord] {
  slice_range(pool, from, to).0
}

fn slice_range<'a>(
  pool: &'a [HeadingRecord],
  from: Option<&str>,
  to: Option<&str>,
) -> (&'a [HeadingRecord], Vec<Diagnostic>) {
  let mut missing = Vec::new();
  let mut pool = pool;

  if let Some(to) = to {
    match position(pool, to) {
      Some(idx) => pool = &pool[..=idx],
      None => {
        missing.push(Diagnostic::UnknownBoundary {
          side: Boundary::To,
          slug: to.to_string(),
        });
      },
    }
  }

  if let Some(from) = from {
    match position(pool, from) {
      Some(idx) => pool = &pool[idx..],
      None => {
        missing.push(Diagnostic::UnknownBoundary {
          side: Boundary::From,
          slug: from.to_string(),
        });
      },
    }
  }

  (pool, missing)
}

/// Run the full filter pipeline over `headers`.
#[must_use]
pub fn filter_headers(
  headers: &[HeadingRecord],
  options: &TocOptions,
) -> FilterOutcome {
  let mut diagnostics: Vec<Diagnostic> = options
    .level
    .malformed()
    .iter()
    .cloned()
    .map(Diagnostic::MalformedLevel)
    .collect();

  let mut pool = headers;

  if let Some(ref section) = options.section {
    if let Some(descendants) = restrict_to_section(pool, section) {
      pool = descendants;
    } else {
      diagnostics.push(Diagnostic::UnknownSection(section.clone()));
      pool = &[];
    }
  }

  if !pool.is_empty() {
    let (sliced, missing) =
      slice_range(pool, options.from.as_deref(), options.to.as_deref());
    pool = sliced;
    diagnostics.extend(missing);
  }

  let items: Vec<HeadingRecord> = pool
    .iter()
    .filter(|h| options.level.contains(h.level))
    .filter(|h| !options.exclude.contains(&h.slug))
    .cloned()
    .collect();

  if items.is_empty() {
    diagnostics.push(Diagnostic::NoMatchingHeaders {
      options: options.describe(),
    });
  }

  FilterOutcome { items, diagnostics }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::options::{LevelSet, SlugSet};

  fn doc() -> Vec<HeadingRecord> {
    vec![
      HeadingRecord::new("a", "A", 2),
      HeadingRecord::new("b", "B", 3),
      HeadingRecord::new("c", "C", 3),
      HeadingRecord::new("d", "D", 2),
    ]
  }

  fn slugs(items: &[HeadingRecord]) -> Vec<&str> {
    items.iter().map(|h| h.slug.as_str()).collect()
  }

  #[test]
  fn test_section_takes_descendants_only() {
    let headers = doc();
    let pool = restrict_to_section(&headers, "a");
    assert_eq!(pool.map(slugs), Some(vec!["b", "c"]));
  }

  #[test]
  fn test_section_without_descendants_is_empty() {
    let headers = doc();
    assert_eq!(restrict_to_section(&headers, "d").map(<[_]>::len), Some(0));
    assert_eq!(restrict_to_section(&headers, "b").map(<[_]>::len), Some(0));
  }

  #[test]
  fn test_section_unknown_slug() {
    let headers = doc();
    assert!(restrict_to_section(&headers, "missing").is_none());

    let options = TocOptions {
      section: Some("missing".to_string()),
      level: LevelSet::parse("2,3"),
      ..TocOptions::default()
    };
    let outcome = filter_headers(&headers, &options);
    assert!(outcome.items.is_empty());
    assert!(
      outcome
        .diagnostics
        .contains(&Diagnostic::UnknownSection("missing".to_string()))
    );
  }

  #[test]
  fn test_section_stops_at_shallower_heading() {
    let headers = vec![
      HeadingRecord::new("intro", "Intro", 2),
      HeadingRecord::new("part", "Part", 3),
      HeadingRecord::new("detail", "Detail", 4),
      HeadingRecord::new("aside", "Aside", 3),
      HeadingRecord::new("next", "Next", 3),
    ];
    let pool = restrict_to_section(&headers, "part");
    assert_eq!(pool.map(slugs), Some(vec!["detail"]));
  }

  #[test]
  fn test_range_is_inclusive() {
    let headers = doc();
    let pool = restrict_to_range(&headers, Some("b"), Some("c"));
    assert_eq!(slugs(pool), vec!["b", "c"]);
  }

  #[test]
  fn test_range_ignores_missing_boundaries() {
    let headers = doc();
    assert_eq!(
      slugs(restrict_to_range(&headers, Some("nope"), Some("c"))),
      vec!["a", "b", "c"]
    );
    assert_eq!(
      slugs(restrict_to_range(&headers, Some("b"), Some("nope"))),
      vec!["b", "c", "d"]
    );
    assert_eq!(slugs(restrict_to_range(&headers, None, None)).len(), 4);
  }

  #[test]
  fn test_range_from_after_to_is_ignored() {
    // `from` is searched in the already truncated pool, where it no longer
    // exists
    let headers = doc();
    assert_eq!(
      slugs(restrict_to_range(&headers, Some("d"), Some("b"))),
      vec!["a", "b"]
    );
  }

  #[test]
  fn test_range_searches_within_section() {
    let headers = doc();
    let options = TocOptions {
      section: Some("a".to_string()),
      from: Some("a".to_string()),
      to: Some("b".to_string()),
      level: LevelSet::parse("2,3"),
      ..TocOptions::default()
    };
    let outcome = filter_headers(&headers, &options);

    // `a` is outside the section pool, so `from` is ignored
    assert_eq!(slugs(&outcome.items), vec!["b"]);
    assert!(outcome.diagnostics.contains(&Diagnostic::UnknownBoundary {
      side: Boundary::From,
      slug: "a".to_string(),
    }));
  }

  #[test]
  fn test_level_filter_default() {
    let headers = doc();
    let outcome = filter_headers(&headers, &TocOptions::default());
    assert_eq!(slugs(&outcome.items), vec!["a", "d"]);
    assert!(outcome.diagnostics.is_empty());
  }

  #[test]
  fn test_exclude_filter() {
    let headers = doc();
    let options = TocOptions {
      exclude: SlugSet::from("b"),
      level: LevelSet::parse("2,3"),
      ..TocOptions::default()
    };
    let outcome = filter_headers(&headers, &options);
    assert_eq!(slugs(&outcome.items), vec!["a", "c", "d"]);
  }

  #[test]
  fn test_empty_result_is_diagnosed() {
    let headers = doc();
    let options = TocOptions {
      level: LevelSet::single(5),
      ..TocOptions::default()
    };
    let outcome = filter_headers(&headers, &options);
    assert!(outcome.items.is_empty());
    assert_eq!(outcome.diagnostics, vec![Diagnostic::NoMatchingHeaders {
      options: "level=5".to_string(),
    }]);
  }

  #[test]
  fn test_malformed_levels_are_reported() {
    let headers = doc();
    let options = TocOptions {
      level: LevelSet::parse("x"),
      ..TocOptions::default()
    };
    let outcome = filter_headers(&headers, &options);
    assert!(outcome.items.is_empty());
    assert_eq!(outcome.diagnostics.len(), 2);
    assert_eq!(
      outcome.diagnostics[0],
      Diagnostic::MalformedLevel("x".to_string())
    );
  }
}
