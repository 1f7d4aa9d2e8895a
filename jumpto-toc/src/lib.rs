//! # jumpto-toc - "Jump to" tables of contents for Markdown articles
//!
//! Given the headings of a document (slug, title, level) in document order,
//! this crate picks the ones worth linking to and renders them either as a
//! one-line sentence of links or as a nested list.
//!
//! ## Quick Start
//!
//! ```rust
//! use jumpto_toc::{HeadingRecord, LevelSet, TocKind, TocOptions, render_toc};
//!
//! let headers = vec![
//!   HeadingRecord::new("a", "A", 2),
//!   HeadingRecord::new("b", "B", 3),
//!   HeadingRecord::new("c", "C", 2),
//! ];
//!
//! let options = TocOptions {
//!   level: LevelSet::parse("2,3"),
//!   kind: TocKind::Tree,
//!   ..TocOptions::default()
//! };
//!
//! let rendered = render_toc(&headers, &options);
//! assert!(rendered.is_visible());
//! println!("{}", rendered.html);
//! ```
//!
//! ## Filtering
//!
//! Headings are narrowed in a fixed order, see [`filter`]:
//!
//! 1. `section`: only the headings nested under one heading
//! 2. `from` / `to`: an inclusive document-order slice
//! 3. `level`: the heading levels to keep
//! 4. `exclude`: slugs to drop
//!
//! Nothing here fails. Options that match nothing produce an empty, hidden
//! container and a logged [`Diagnostic`].
//!
//! ## Hosting
//!
//! [`TableOfContents`] models the embedded component: it takes a
//! [`HeaderSource`] for the page's own headings and only consults it once
//! attached, when the options carry no explicit headings.

pub mod error;
pub mod filter;
pub mod options;
pub mod plan;
pub mod render;
pub mod shell;
mod types;

pub use crate::{
  error::{Boundary, Diagnostic, TocError},
  filter::{FilterOutcome, filter_headers},
  options::{DEFAULT_LEVEL, DEFAULT_PROMPT, LevelSet, SlugSet, TocOptions},
  plan::RenderPlan,
  shell::{
    HeaderSource,
    NoAmbientHeaders,
    Rendered,
    TableOfContents,
    render_toc,
  },
  types::{HeadingRecord, Layout, TocKind},
};
