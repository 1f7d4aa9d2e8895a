use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;

const BIN_NAME: &str = "jumpto";

const DEFAULT_SHELLS: [Shell; 4] =
  [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell];

#[derive(Parser)]
#[command(author, version, about)]
struct Xtask {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build distribution artifacts for the jumpto CLI
  Dist {
    /// Output directory for generated files.
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,

    /// Shells to generate completions for (defaults to bash, zsh, fish and
    /// powershell).
    #[arg(long = "shell", action = clap::ArgAction::Append)]
    shells: Vec<Shell>,

    /// Skip shell completions.
    #[arg(long, conflicts_with = "no_manpage")]
    no_completions: bool,

    /// Skip the manpage.
    #[arg(long, conflicts_with = "no_completions")]
    no_manpage: bool,
  },
}

fn main() -> Result<()> {
  let xtask = Xtask::parse();

  match xtask.command {
    Commands::Dist {
      output_dir,
      shells,
      no_completions,
      no_manpage,
    } => {
      if !no_completions {
        let shells = if shells.is_empty() {
          DEFAULT_SHELLS.to_vec()
        } else {
          shells
        };
        generate_completions(&output_dir, &shells)?;
      }
      if !no_manpage {
        generate_manpage(&output_dir)?;
      }
    },
  }

  Ok(())
}

fn generate_completions(output_dir: &Path, shells: &[Shell]) -> Result<()> {
  let completions_dir = output_dir.join("completions");
  fs::create_dir_all(&completions_dir).with_context(|| {
    format!("Failed to create {}", completions_dir.display())
  })?;

  let mut cmd = jumpto::cli::Cli::command();
  for shell in shells {
    let path = generate_to(*shell, &mut cmd, BIN_NAME, &completions_dir)
      .with_context(|| format!("Failed to generate {shell} completions"))?;
    println!("Wrote {}", path.display());
  }
  Ok(())
}

/// Render jumpto(1) from the CLI definition.
fn generate_manpage(output_dir: &Path) -> Result<()> {
  let man_dir = output_dir.join("man");
  fs::create_dir_all(&man_dir)
    .with_context(|| format!("Failed to create {}", man_dir.display()))?;

  let file_path = man_dir.join(format!("{BIN_NAME}.1"));
  let mut file = fs::File::create(&file_path).with_context(|| {
    format!("Failed to create manpage file at {}", file_path.display())
  })?;
  Man::new(jumpto::cli::Cli::command())
    .render(&mut file)
    .context("Failed to render manpage")?;
  println!("Wrote {}", file_path.display());
  Ok(())
}
