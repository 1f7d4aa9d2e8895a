use std::fs;

use color_eyre::eyre::{Context, Result, bail};
use jumpto::{
  cli::{Cli, Commands},
  commands,
};
use jumpto_config::Config;
use log::{LevelFilter, info};

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => {
      // Check if file already exists and that we're not forcing overwrite
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      // Create parent directories if needed
      if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty())
      {
        if !parent.exists() {
          fs::create_dir_all(parent).wrap_err_with(|| {
            format!("Failed to create directory: {}", parent.display())
          })?;
          info!("Created directory: {}", parent.display());
        }
      }

      Config::generate_default_config(&format, &output).wrap_err_with(
        || {
          format!(
            "Failed to generate configuration file: {}",
            output.display()
          )
        },
      )?;

      info!(
        "Configuration file created successfully. Edit it to customize your \
         tables of contents."
      );
    },

    Commands::Headers { file } => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)
        .wrap_err("Failed to load configuration")?;
      let input = commands::resolve_input(file, &config)?;

      let json = commands::headers_json(&input).wrap_err_with(|| {
        format!("Failed to extract headings from {}", input.display())
      })?;
      commands::write_output(&json, None)?;
    },

    Commands::Render { file, output, toc } => {
      let mut config = Config::load(&cli.config_files, &cli.config_overrides)
        .wrap_err("Failed to load configuration")?;
      toc.apply(&mut config)?;

      let input = commands::resolve_input(file, &config)?;
      let rendered = commands::render(&input, config.to_options())
        .wrap_err_with(|| format!("Failed to render {}", input.display()))?;

      let output = output.or(config.output);
      commands::write_output(&rendered.html, output.as_deref())
        .wrap_err("Failed to write table of contents")?;
    },
  }

  Ok(())
}
