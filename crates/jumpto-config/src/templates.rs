use std::fmt;

/// Error type for template operations.
#[derive(Debug)]
pub enum TemplateError {
  /// The requested configuration format is not supported.
  UnsupportedFormat(String),
}

impl fmt::Display for TemplateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnsupportedFormat(format) => {
        write!(f, "Unsupported config format: {format}")
      },
    }
  }
}

impl std::error::Error for TemplateError {}

/// Default configuration template in TOML, commented so that a new user can
/// find their way around without reading the docs first.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# jumpto configuration file

# Markdown article (or JSON heading list) to build the table of contents for
# input = "content/articles/data-fetching.md"

# Write the rendered fragment here instead of stdout
# output = "toc.html"

[toc]
# Label in front of the links. Set to "" to drop the label.
prompt = "Jump to"

# Heading levels to include: a number, "2,3", or [2, 3]
level = 2

# Slugs to leave out: a single slug or a list
# exclude = ["introduction"]

# Only list the headings nested under this slug
# section = "auto-imports"

# Inclusive document-order slice, by slug
# from = "usefetch"
# to = "useasyncdata"

# Rendering mode: "list", "tree", or "auto" (tree when several levels are requested)
type = "auto"

# Annotations shown beneath top-level links, keyed by slug
# [toc.tips]
# layers = "How the site is split into layers"
"#;

/// Default configuration template in JSON.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "toc": {
    "prompt": "Jump to",
    "level": 2,
    "type": "auto",
    "tips": {}
  }
}
"#;

/// Get the default configuration template for `format` (`toml` or `json`).
///
/// # Errors
///
/// Returns [`TemplateError::UnsupportedFormat`] for any other format.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
