use std::{
  collections::HashMap,
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use jumpto_toc::{LevelSet, SlugSet, TocKind, TocOptions};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Prefix of override keys that carry a tip, as in `tip-layers=...`.
const TIP_PREFIX: &str = "tip-";

/// Configuration for the jumpto CLI.
///
/// [`Config`] is typically loaded from one or more TOML or JSON files and then
/// adjusted with `KEY=VALUE` overrides and CLI flags. Table of contents
/// options live under the `[toc]` table; only the values a file actually sets
/// take part in merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
  /// Markdown article or JSON heading list to read.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub input: Option<PathBuf>,

  /// File to write the rendered fragment to.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub output: Option<PathBuf>,

  /// Table of contents options.
  pub toc: TocSettings,
}

/// Table of contents options as written in a config file.
///
/// Unlike [`TocOptions`], every field records whether it was set, so that
/// merging several files does not reset earlier values to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TocSettings {
  /// Label in front of the links.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub prompt: Option<String>,

  /// Heading levels to include.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub level: Option<LevelSet>,

  /// Slugs to leave out. Accumulates across files.
  #[serde(skip_serializing_if = "SlugSet::is_empty")]
  pub exclude: SlugSet,

  /// Restrict to the headings nested under this slug.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub section: Option<String>,

  /// First heading of the slice.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub from: Option<String>,

  /// Last heading of the slice.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub to: Option<String>,

  /// Rendering mode.
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub kind: Option<TocKind>,

  /// Annotations per slug. Later files override individual entries.
  #[serde(skip_serializing_if = "HashMap::is_empty")]
  pub tips: HashMap<String, String>,
}

fn non_empty(value: &str) -> Option<String> {
  if value.is_empty() {
    None
  } else {
    Some(value.to_string())
  }
}

impl TocSettings {
  /// Merge `other` into this one, with `other` taking precedence.
  ///
  /// - [`Option<T>`] fields: other's [`Some`] value replaces this one
  /// - `exclude`: other's slugs are added
  /// - `tips`: other's entries are merged in, overriding individual slugs
  pub fn merge(&mut self, other: Self) {
    if other.prompt.is_some() {
      self.prompt = other.prompt;
    }
    if other.level.is_some() {
      self.level = other.level;
    }
    if other.section.is_some() {
      self.section = other.section;
    }
    if other.from.is_some() {
      self.from = other.from;
    }
    if other.to.is_some() {
      self.to = other.to;
    }
    if other.kind.is_some() {
      self.kind = other.kind;
    }
    self.exclude.extend(other.exclude.iter().map(str::to_string));
    self.tips.extend(other.tips);
  }

  /// Apply a single override. `key` is given without the `toc.` prefix.
  ///
  /// An empty value clears `section`, `from`, `to`, `level`, `exclude` and
  /// tips; an empty `prompt` is kept, as it suppresses the label.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys and unparsable `type` values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "prompt" => self.prompt = Some(value.to_string()),
      "level" => {
        self.level = if value.is_empty() {
          None
        } else {
          Some(LevelSet::parse(value))
        };
      },
      "exclude" => {
        self.exclude = value
          .split(',')
          .map(str::trim)
          .filter(|slug| !slug.is_empty())
          .collect();
      },
      "section" => self.section = non_empty(value),
      "from" => self.from = non_empty(value),
      "to" => self.to = non_empty(value),
      "type" => {
        self.kind = if value.is_empty() {
          None
        } else {
          Some(value.parse().map_err(|e| {
            ConfigError::Config(format!("Invalid value for '{key}': {e}"))
          })?)
        };
      },
      _ => {
        let Some(slug) = key.strip_prefix(TIP_PREFIX).filter(|s| !s.is_empty())
        else {
          return Err(ConfigError::Config(format!(
            "Unknown configuration key: '{key}'. See documentation for \
             supported keys."
          )));
        };
        if value.is_empty() {
          self.tips.remove(slug);
        } else {
          self.tips.insert(slug.to_string(), value.to_string());
        }
      },
    }

    Ok(())
  }

  /// Resolve into the options a table of contents renders with. Unset
  /// values take their defaults.
  #[must_use]
  pub fn to_options(&self) -> TocOptions {
    let defaults = TocOptions::default();
    TocOptions {
      headers: Vec::new(),
      prompt:  self.prompt.clone().unwrap_or(defaults.prompt),
      level:   self.level.clone().unwrap_or(defaults.level),
      exclude: self.exclude.clone(),
      section: self.section.clone(),
      from:    self.from.clone(),
      to:      self.to.clone(),
      kind:    self.kind.unwrap_or(defaults.kind),
      tips:    self.tips.clone(),
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content =
      fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
      })?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => {
        serde_json::from_str(&content).map_err(|source| {
          ConfigError::Json {
            path: path.to_path_buf(),
            source,
          }
        })
      },
      "toml" => {
        toml::from_str(&content).map_err(|source| {
          ConfigError::Toml {
            path: path.to_path_buf(),
            source,
          }
        })
      },
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files, or a discovered one, then apply
  /// `KEY=VALUE` overrides.
  ///
  /// Files are merged in order, later files taking precedence. When no file is
  /// given, [`Config::find_config_file`] is consulted; finding nothing is not
  /// an error.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged = Self::from_file(first)?;
      for config_path in rest {
        merged.merge(Self::from_file(config_path)?);
      }

      if !rest.is_empty() {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config)?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// Keys are `input`, `output`, and the table of contents options with or
  /// without a `toc.` prefix (`level`, `toc.section`, `tip-layers`, ...).
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```rust, ignore
  /// config.apply_overrides(&vec![
  ///     "toc.level=2,3".to_string(),
  ///     "tip-layers=How the site is split".to_string(),
  /// ])?;
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single configuration override by key.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value is invalid.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "input" => self.input = non_empty(value).map(PathBuf::from),
      "output" => self.output = non_empty(value).map(PathBuf::from),
      _ => {
        let key = key.strip_prefix("toc.").unwrap_or(key);
        self.toc.apply_override(key, value)?;
      },
    }
    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: other's [`Some`] value replaces this config's
  ///   value
  /// - `toc.exclude`: other's slugs are added
  /// - `toc.tips`: other's entries are merged in (can override individual
  ///   slugs)
  pub fn merge(&mut self, other: Self) {
    if other.input.is_some() {
      self.input = other.input;
    }
    if other.output.is_some() {
      self.output = other.output;
    }
    self.toc.merge(other.toc);
  }

  /// Table of contents options resolved from this configuration.
  #[must_use]
  pub fn to_options(&self) -> TocOptions {
    self.toc.to_options()
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let config_filenames = [
          "jumpto.toml",
          "jumpto.json",
          ".jumpto.toml",
          ".jumpto.json",
        ];

        let current_dir = std::env::current_dir().ok()?;
        for filename in &config_filenames {
          let config_path = current_dir.join(filename);
          if config_path.exists() {
            return Some(config_path);
          }
        }

        let config_home = std::env::var("XDG_CONFIG_HOME")
          .map(PathBuf::from)
          .or_else(|_| {
            std::env::var("HOME").map(|home| PathBuf::from(home).join(".config"))
          })
          .ok()?;

        let config_dir = config_home.join("jumpto");
        for filename in &["config.toml", "config.json"] {
          let config_path = config_dir.join(filename);
          if config_path.exists() {
            return Some(config_path);
          }
        }

        None
      })
      .clone()
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the template cannot be retrieved or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)
      .map_err(|e| ConfigError::Template(e.to_string()))?;

    fs::write(path, config_content).map_err(|source| {
      ConfigError::Write {
        path: path.to_path_buf(),
        source,
      }
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use tempfile::TempDir;

  use super::*;
  use crate::templates::{DEFAULT_JSON_TEMPLATE, DEFAULT_TOML_TEMPLATE};

  fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write config fixture");
    path
  }

  #[test]
  fn test_default_templates_parse() {
    let from_toml: Config =
      toml::from_str(DEFAULT_TOML_TEMPLATE).expect("TOML template must parse");
    let from_json: Config = serde_json::from_str(DEFAULT_JSON_TEMPLATE)
      .expect("JSON template must parse");

    assert_eq!(from_toml.to_options(), TocOptions::default());
    assert_eq!(from_json.to_options(), TocOptions::default());
  }

  #[test]
  fn test_unset_settings_use_defaults() {
    let options = Config::default().to_options();
    assert_eq!(options, TocOptions::default());
  }

  #[test]
  fn test_from_file_toml_and_json() {
    let dir = TempDir::new().unwrap();
    let toml_path = write(
      &dir,
      "jumpto.toml",
      r#"
input = "article.md"

[toc]
level = "2,3"
exclude = "intro"
type = "tree"

[toc.tips]
layers = "Read me"
"#,
    );
    let json_path = write(
      &dir,
      "jumpto.json",
      r#"{"toc": {"prompt": "See", "level": [2], "section": "layers"}}"#,
    );

    let config = Config::from_file(&toml_path).unwrap();
    assert_eq!(config.input, Some(PathBuf::from("article.md")));
    let options = config.to_options();
    assert_eq!(options.level, LevelSet::parse("3,2"));
    assert!(options.exclude.contains("intro"));
    assert_eq!(options.kind, TocKind::Tree);
    assert_eq!(options.tip("layers"), Some("Read me"));

    let options = Config::from_file(&json_path).unwrap().to_options();
    assert_eq!(options.prompt, "See");
    assert_eq!(options.section.as_deref(), Some("layers"));
  }

  #[test]
  fn test_from_file_rejects_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "jumpto.yaml", "toc: {}");

    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Unsupported config file format"));
  }

  #[test]
  fn test_from_file_reports_parse_errors() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.toml", "[toc\nlevel = 2");

    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML config"));
    assert!(matches!(&err, ConfigError::Toml { path: p, .. } if *p == path));
    assert!(std::error::Error::source(&err).is_some());

    let path = write(&dir, "broken.json", "{\"toc\": ");
    let err = Config::from_file(&path).unwrap_err();
    assert!(matches!(&err, ConfigError::Json { path: p, .. } if *p == path));
  }

  #[test]
  fn test_from_file_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Config::from_file(&path).unwrap_err();
    assert!(matches!(&err, ConfigError::Read { path: p, .. } if *p == path));
    assert!(err.to_string().contains("absent.toml"));
  }

  #[test]
  fn test_load_merges_files_in_order() {
    let dir = TempDir::new().unwrap();
    let base = write(
      &dir,
      "base.toml",
      r#"
[toc]
prompt = "See"
level = 2
exclude = ["intro"]

[toc.tips]
a = "first"
b = "kept"
"#,
    );
    let overlay = write(
      &dir,
      "overlay.toml",
      r#"
[toc]
level = "2,3"
exclude = "outro"

[toc.tips]
a = "second"
"#,
    );

    let config = Config::load(&[base, overlay], &[]).unwrap();
    let options = config.to_options();

    // Not set by the overlay, so the base value survives
    assert_eq!(options.prompt, "See");
    assert_eq!(options.level, LevelSet::parse("2,3"));
    assert_eq!(options.exclude.iter().collect::<Vec<_>>(), vec![
      "intro", "outro"
    ]);
    assert_eq!(options.tip("a"), Some("second"));
    assert_eq!(options.tip("b"), Some("kept"));
  }

  #[test]
  fn test_load_applies_overrides_after_files() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.toml", "[toc]\nsection = \"intro\"\n");

    let config = Config::load(&[base], &[
      "toc.section=".to_string(),
      "level=3".to_string(),
      "tip-setup = Start here".to_string(),
    ])
    .unwrap();

    assert_eq!(config.toc.section, None);
    assert_eq!(config.toc.level, Some(LevelSet::single(3)));
    assert_eq!(config.toc.tips.get("setup").map(String::as_str), Some(
      "Start here"
    ));
  }

  #[test]
  fn test_apply_overrides_toc_fields() {
    let mut config = Config::default();

    config
      .apply_overrides(&[
        "prompt=".to_string(),
        "exclude=a, b,,c".to_string(),
        "from=b".to_string(),
        "to=c".to_string(),
        "type=LIST".to_string(),
        "output=toc.html".to_string(),
      ])
      .unwrap();

    let options = config.to_options();
    assert_eq!(options.prompt, "");
    assert_eq!(options.exclude.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert_eq!(options.from.as_deref(), Some("b"));
    assert_eq!(options.to.as_deref(), Some("c"));
    assert_eq!(options.kind, TocKind::List);
    assert_eq!(config.output, Some(PathBuf::from("toc.html")));
  }

  #[test]
  fn test_apply_override_tip_removal() {
    let mut config = Config::default();
    config.apply_override("tip-a", "note").unwrap();
    assert_eq!(config.toc.tips.len(), 1);

    config.apply_override("toc.tip-a", "").unwrap();
    assert!(config.toc.tips.is_empty());
  }

  #[test]
  fn test_apply_overrides_invalid_format() {
    let mut config = Config::default();

    let result = config.apply_overrides(&["no_equals_sign".to_string()]);

    assert!(result.is_err());
    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Expected KEY=VALUE")
    );
  }

  #[test]
  fn test_apply_overrides_unknown_key() {
    let mut config = Config::default();

    for key in ["unknown_key=value", "tip-=value", "toc.depth=2"] {
      let result = config.apply_overrides(&[key.to_string()]);
      assert!(
        result
          .unwrap_err()
          .to_string()
          .contains("Unknown configuration key")
      );
    }
  }

  #[test]
  fn test_apply_overrides_invalid_type() {
    let mut config = Config::default();

    let result = config.apply_override("type", "grid");

    assert!(result.unwrap_err().to_string().contains("Invalid value"));
  }

  #[test]
  fn test_generate_default_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("jumpto.toml");

    Config::generate_default_config("toml", &path).unwrap();
    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.toc.prompt.as_deref(), Some("Jump to"));

    let err = Config::generate_default_config("yaml", &path).unwrap_err();
    assert!(matches!(err, ConfigError::Template(_)));

    let unwritable = dir.path().join("missing-dir").join("jumpto.toml");
    let err = Config::generate_default_config("toml", &unwritable).unwrap_err();
    assert!(matches!(err, ConfigError::Write { .. }));
  }
}
