//! The component a hosting page embeds.
//!
//! [`TableOfContents`] owns its options and, unless the options carry
//! explicit headings, asks the page for its ambient headings once it has
//! been attached. Every call to [`TableOfContents::render`] derives a fresh
//! [`RenderPlan`] from the current inputs.
use std::fmt::Write;

use log::debug;

use crate::{
  options::TocOptions,
  plan::RenderPlan,
  render::render_fragment,
  types::HeadingRecord,
};

/// Supplier of the hosting page's own headings, in document order.
pub trait HeaderSource {
  /// Headings of the hosting document.
  fn headers(&self) -> Vec<HeadingRecord>;
}

impl<F> HeaderSource for F
where
  F: Fn() -> Vec<HeadingRecord>,
{
  fn headers(&self) -> Vec<HeadingRecord> {
    self()
  }
}

/// A page without headings of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAmbientHeaders;

impl HeaderSource for NoAmbientHeaders {
  fn headers(&self) -> Vec<HeadingRecord> {
    Vec::new()
  }
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
  /// Markup to embed. An empty, hidden container when nothing is navigable.
  pub html: String,
  /// The plan the markup was produced from.
  pub plan: RenderPlan,
}

impl Rendered {
  /// Whether the markup shows anything.
  #[must_use]
  pub fn is_visible(&self) -> bool {
    self.plan.is_navigable()
  }
}

/// Table of contents bound to a hosting page.
#[derive(Debug, Clone)]
pub struct TableOfContents<S> {
  options:  TocOptions,
  source:   S,
  attached: bool,
  ambient:  Option<Vec<HeadingRecord>>,
}

impl<S: HeaderSource> TableOfContents<S> {
  /// Create a component. The ambient headings are not looked up yet; the
  /// page may still be initializing.
  #[must_use]
  pub const fn new(options: TocOptions, source: S) -> Self {
    Self {
      options,
      source,
      attached: false,
      ambient: None,
    }
  }

  /// Mark the component as attached to its page, fetching the ambient
  /// headings if the options do not carry any.
  pub fn attach(&mut self) {
    self.attached = true;
    self.resolve_ambient();
  }

  fn resolve_ambient(&mut self) {
    if self.attached
      && self.ambient.is_none()
      && self.options.headers.is_empty()
    {
      let headers = self.source.headers();
      debug!("Resolved {} ambient headings", headers.len());
      self.ambient = Some(headers);
    }
  }

  #[must_use]
  pub const fn is_attached(&self) -> bool {
    self.attached
  }

  #[must_use]
  pub const fn options(&self) -> &TocOptions {
    &self.options
  }

  /// Replace the options. The next render uses them.
  pub fn set_options(&mut self, options: TocOptions) {
    self.options = options;
    self.resolve_ambient();
  }

  /// Replace the explicit headings. An empty list falls back to the
  /// ambient headings.
  pub fn set_headers(&mut self, headers: Vec<HeadingRecord>) {
    self.options.headers = headers;
    self.resolve_ambient();
  }

  /// Headings the next render works on.
  #[must_use]
  pub fn headers(&self) -> &[HeadingRecord] {
    if self.options.headers.is_empty() {
      self.ambient.as_deref().unwrap_or_default()
    } else {
      &self.options.headers
    }
  }

  /// Derive the plan for the current inputs.
  #[must_use]
  pub fn plan(&self) -> RenderPlan {
    RenderPlan::build(self.headers(), &self.options)
  }

  /// Render the current inputs.
  #[must_use]
  pub fn render(&self) -> Rendered {
    let plan = self.plan();
    plan.emit_diagnostics();
    let html = wrap(&plan, &self.options);
    Rendered { html, plan }
  }
}

/// Render `headers` under `options` in one go, without a hosting page.
#[must_use]
pub fn render_toc(headers: &[HeadingRecord], options: &TocOptions) -> Rendered {
  let plan = RenderPlan::build(headers, options);
  plan.emit_diagnostics();
  let html = wrap(&plan, options);
  Rendered { html, plan }
}

fn wrap(plan: &RenderPlan, options: &TocOptions) -> String {
  let mut html = String::from("<nav class=\"toc\"");
  if let Some(depth) = plan.depth {
    let _ = write!(html, " data-depth=\"{depth}\"");
  }

  if !plan.is_navigable() {
    html.push_str(" hidden></nav>");
    return html;
  }

  html.push('>');
  html.push_str(&render_fragment(plan, options));
  html.push_str("</nav>");
  html
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use super::*;
  use crate::options::LevelSet;

  fn page() -> Vec<HeadingRecord> {
    vec![
      HeadingRecord::new("a", "A", 2),
      HeadingRecord::new("b", "B", 3),
      HeadingRecord::new("c", "C", 2),
    ]
  }

  #[test]
  fn test_ambient_lookup_is_deferred_until_attach() {
    let calls = Cell::new(0);
    let source = || {
      calls.set(calls.get() + 1);
      page()
    };

    let mut toc = TableOfContents::new(TocOptions::default(), source);
    assert_eq!(calls.get(), 0);
    assert!(toc.headers().is_empty());
    assert!(!toc.render().is_visible());

    toc.attach();
    assert_eq!(calls.get(), 1);
    assert_eq!(toc.headers().len(), 3);

    // Further renders and re-attaching reuse the resolved list
    let _ = toc.render();
    toc.attach();
    assert_eq!(calls.get(), 1);
  }

  #[test]
  fn test_explicit_headers_skip_ambient_lookup() {
    let calls = Cell::new(0);
    let source = || {
      calls.set(calls.get() + 1);
      Vec::new()
    };

    let options = TocOptions {
      headers: page(),
      ..TocOptions::default()
    };
    let mut toc = TableOfContents::new(options, source);
    toc.attach();

    assert_eq!(calls.get(), 0);
    assert!(toc.render().is_visible());
  }

  #[test]
  fn test_clearing_headers_falls_back_to_ambient() {
    let options = TocOptions {
      headers: vec![HeadingRecord::new("x", "X", 2)],
      ..TocOptions::default()
    };
    let mut toc = TableOfContents::new(options, page);
    toc.attach();
    assert_eq!(toc.headers().len(), 1);

    toc.set_headers(Vec::new());
    assert_eq!(toc.headers().len(), 3);
  }

  #[test]
  fn test_render_recomputes_after_option_change() {
    let mut toc = TableOfContents::new(TocOptions::default(), page);
    toc.attach();
    assert_eq!(toc.render().plan.items.len(), 2);

    toc.set_options(TocOptions {
      level: LevelSet::parse("2,3"),
      ..TocOptions::default()
    });
    assert_eq!(toc.render().plan.items.len(), 3);
  }

  #[test]
  fn test_hidden_container_below_two_items() {
    let options = TocOptions {
      level: LevelSet::single(3),
      ..TocOptions::default()
    };
    let rendered = render_toc(&page(), &options);
    assert!(!rendered.is_visible());
    assert_eq!(rendered.html, "<nav class=\"toc\" hidden></nav>");
  }

  #[test]
  fn test_depth_attribute() {
    let options = TocOptions {
      level: LevelSet::parse("2,3"),
      kind: crate::types::TocKind::Tree,
      prompt: String::new(),
      ..TocOptions::default()
    };
    let rendered = render_toc(&page(), &options);
    assert!(rendered.html.starts_with("<nav class=\"toc\" data-depth=\"2\"><ul>"));
    assert!(rendered.html.ends_with("</ul></nav>"));
  }

  #[test]
  fn test_no_ambient_headers() {
    let mut toc = TableOfContents::new(TocOptions::default(), NoAmbientHeaders);
    toc.attach();
    assert!(toc.headers().is_empty());
    assert!(!toc.render().is_visible());
  }
}
