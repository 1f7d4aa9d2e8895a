use crate::{
  error::Diagnostic,
  filter::{FilterOutcome, filter_headers},
  options::TocOptions,
  types::{HeadingRecord, Layout, TocKind},
};

/// Everything one render pass needs, derived from headings and options.
///
/// A plan is a plain value: it is rebuilt whenever the inputs change and
/// never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
  /// Headings that produce a link, in document order.
  pub items: Vec<HeadingRecord>,

  /// More than one distinct level was requested.
  pub multiple_levels: bool,

  /// Markup shape after resolving [`TocKind::Auto`].
  pub layout: Layout,

  /// Styling hint, `max(level) - 1`. Only set for [`TocKind::Tree`].
  pub depth: Option<u8>,

  /// Findings from filtering.
  pub diagnostics: Vec<Diagnostic>,
}

impl RenderPlan {
  /// Build a plan for `headers` under `options`.
  #[must_use]
  pub fn build(headers: &[HeadingRecord], options: &TocOptions) -> Self {
    let FilterOutcome {
      items,
      mut diagnostics,
    } = filter_headers(headers, options);
    let multiple_levels = options.level.has_multiple();
    let layout = options.kind.resolve(multiple_levels);
    if layout == Layout::Flat && !options.tips.is_empty() {
      diagnostics.push(Diagnostic::UnusedTips(options.tips.len()));
    }
    let depth = match options.kind {
      TocKind::Tree => options.level.max().map(|max| max.saturating_sub(1)),
      TocKind::List | TocKind::Auto => None,
    };

    Self {
      items,
      multiple_levels,
      layout,
      depth,
      diagnostics,
    }
  }

  /// A table of contents with fewer than two entries has nothing to offer.
  #[must_use]
  pub fn is_navigable(&self) -> bool {
    self.items.len() >= 2
  }

  /// Log every diagnostic at its severity.
  pub fn emit_diagnostics(&self) {
    for diagnostic in &self.diagnostics {
      diagnostic.emit();
    }
  }
}
