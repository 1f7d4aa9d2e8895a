use std::{
  fs,
  io::{self, Write},
  path::{Path, PathBuf},
};

use jumpto_config::Config;
use jumpto_toc::{Rendered, TableOfContents, TocOptions};
use log::{debug, info};

use crate::{
  error::{JumptoError, Result},
  page::Page,
};

/// Pick the article to read: the one named on the command line, else the
/// configured one.
///
/// # Errors
///
/// Returns [`JumptoError::MissingInput`] when neither is set.
pub fn resolve_input(file: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
  file
    .or_else(|| config.input.clone())
    .ok_or(JumptoError::MissingInput)
}

/// Load `input` and render its table of contents under `options`.
///
/// The page is the component's ambient heading source, so explicit
/// `headers` in `options` take precedence over the article's own.
///
/// # Errors
///
/// Returns an error if the article cannot be loaded.
pub fn render(input: &Path, options: TocOptions) -> Result<Rendered> {
  let page = Page::load(input)?;
  let source = page.path().unwrap_or(input).display().to_string();
  match page.title() {
    Some(title) => {
      debug!("Rendering table of contents for \"{title}\" ({source})");
    },
    None => debug!("Rendering table of contents for {source}"),
  }

  let mut toc = TableOfContents::new(options, page);
  toc.attach();

  let rendered = toc.render();
  info!(
    "Rendered {} of {} headings from {source} ({:?} layout)",
    rendered.plan.items.len(),
    toc.headers().len(),
    rendered.plan.layout
  );
  Ok(rendered)
}

/// Headings of `input` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the article cannot be loaded.
pub fn headers_json(input: &Path) -> Result<String> {
  let page = Page::load(input)?;
  Ok(serde_json::to_string_pretty(page.headings())?)
}

/// Write `content` to `output`, or to stdout when no file is given.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
  if let Some(path) = output {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, format!("{content}\n"))?;
    info!("Wrote {}", path.display());
  } else {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{content}")?;
  }
  Ok(())
}
