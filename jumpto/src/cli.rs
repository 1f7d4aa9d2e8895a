use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jumpto_config::Config;

use crate::error::{JumptoError, Result};

/// Command line interface for jumpto
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Render \"Jump to\" tables of contents for Markdown articles"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the jumpto CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Render the table of contents of an article.
  Render {
    /// Markdown article or JSON heading list. Defaults to the configured
    /// input.
    file: Option<PathBuf>,

    /// Write the fragment to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    toc: TocArgs,
  },

  /// Print the headings extracted from an article as JSON.
  Headers {
    /// Markdown article or JSON heading list. Defaults to the configured
    /// input.
    file: Option<PathBuf>,
  },

  /// Initialize a new jumpto configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "jumpto.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

/// Per-invocation table of contents options. Each flag given replaces the
/// configured value.
#[derive(Args, Debug, Default, Clone)]
pub struct TocArgs {
  /// Label in front of the links. Pass an empty string to drop it.
  #[arg(long)]
  pub prompt: Option<String>,

  /// Heading levels to include, e.g. `2` or `2,3`.
  #[arg(short, long)]
  pub level: Option<String>,

  /// Slug to leave out (can be specified multiple times)
  #[arg(short = 'x', long, action = clap::ArgAction::Append)]
  pub exclude: Vec<String>,

  /// Only list the headings nested under this slug.
  #[arg(short, long)]
  pub section: Option<String>,

  /// First heading of an inclusive slice, by slug.
  #[arg(long)]
  pub from: Option<String>,

  /// Last heading of an inclusive slice, by slug.
  #[arg(long)]
  pub to: Option<String>,

  /// Rendering mode.
  #[arg(short = 't', long = "type", value_parser = ["list", "tree", "auto"])]
  pub kind: Option<String>,

  /// Annotation for a top-level link (SLUG=TEXT, can be specified multiple
  /// times)
  #[arg(long = "tip", action = clap::ArgAction::Append)]
  pub tips: Vec<String>,
}

impl TocArgs {
  /// Apply the flags that were given on top of `config`.
  ///
  /// # Errors
  ///
  /// Returns an error if a tip is not in SLUG=TEXT format or a value is
  /// rejected by the configuration.
  pub fn apply(&self, config: &mut Config) -> Result<()> {
    let scalars = [
      ("prompt", &self.prompt),
      ("level", &self.level),
      ("section", &self.section),
      ("from", &self.from),
      ("to", &self.to),
      ("type", &self.kind),
    ];
    for (key, value) in scalars {
      if let Some(value) = value {
        config.toc.apply_override(key, value)?;
      }
    }

    if !self.exclude.is_empty() {
      config.toc.apply_override("exclude", &self.exclude.join(","))?;
    }

    for tip in &self.tips {
      let (slug, text) = tip
        .split_once('=')
        .filter(|(slug, _)| !slug.trim().is_empty())
        .ok_or_else(|| JumptoError::InvalidTip(tip.clone()))?;
      config
        .toc
        .apply_override(&format!("tip-{}", slug.trim()), text.trim())?;
    }

    Ok(())
  }
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
  use jumpto_toc::{LevelSet, TocKind};

  use super::*;

  fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("jumpto").chain(args.iter().copied()))
      .expect("valid arguments")
  }

  #[test]
  fn test_render_flags_override_config() {
    let cli = parse(&[
      "render",
      "post.md",
      "--level",
      "2,3",
      "-x",
      "intro",
      "-x",
      "outro",
      "--type",
      "tree",
      "--tip",
      "layers=Read this first",
      "--prompt",
      "",
    ]);

    let Commands::Render { file, toc, .. } = cli.command else {
      panic!("expected render command");
    };
    assert_eq!(file, Some(PathBuf::from("post.md")));

    let mut config = Config::default();
    config.toc.apply_override("section", "intro").expect("valid");
    toc.apply(&mut config).expect("valid flags");

    let options = config.to_options();
    assert_eq!(options.level, LevelSet::parse("2,3"));
    assert_eq!(options.exclude.iter().collect::<Vec<_>>(), vec![
      "intro", "outro"
    ]);
    assert_eq!(options.kind, TocKind::Tree);
    assert_eq!(options.tip("layers"), Some("Read this first"));
    assert_eq!(options.prompt, "");
    // Not given on the command line, so the configured value survives
    assert_eq!(options.section.as_deref(), Some("intro"));
  }

  #[test]
  fn test_invalid_tip() {
    let cli = parse(&["render", "--tip", "no-separator"]);
    let Commands::Render { toc, .. } = cli.command else {
      panic!("expected render command");
    };

    let err = toc.apply(&mut Config::default()).expect_err("invalid tip");
    assert!(matches!(err, JumptoError::InvalidTip(_)));
  }

  #[test]
  fn test_global_flags_after_subcommand() {
    let cli = parse(&["headers", "post.md", "-v", "--config", "level=3"]);
    assert!(cli.verbose);
    assert_eq!(cli.config_overrides, vec!["level=3".to_string()]);
  }

  #[test]
  fn test_unknown_type_is_rejected() {
    let result = Cli::try_parse_from(["jumpto", "render", "--type", "grid"]);
    assert!(result.is_err());
  }
}
