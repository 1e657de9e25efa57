use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use stepmap::app::App;
use stepmap::config::Config;
use stepmap::logging;
use stepmap::steps::{document, StepStore};
use stepmap::ui::terminal_guard::install_panic_hook;

#[derive(Parser)]
#[command(name = "stepmap")]
#[command(about = "Edit ordered process steps in the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the step editor on a sequence file (.json, .yaml, .yml)
    Edit {
        /// Sequence file; created on save if missing
        file: PathBuf,

        /// Never write changes back to the file
        #[arg(long)]
        no_save: bool,
    },

    /// Print the sequence with its positional labels
    Show {
        file: PathBuf,
    },

    /// Validate a sequence file
    Check {
        file: PathBuf,
    },

    /// Write the default configuration to .stepmap/config.toml
    InitConfig {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = matches!(cli.command, Commands::Edit { .. });
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;
    if let Some(path) = &logging_handle.log_file_path {
        tracing::info!(path = %path.display(), "Logging to file");
    }

    match cli.command {
        Commands::Edit { file, no_save } => cmd_edit(config, &file, no_save),
        Commands::Show { file } => cmd_show(&file),
        Commands::Check { file } => cmd_check(&file),
        Commands::InitConfig { force } => cmd_init_config(force),
    }
}

fn load_store(file: &Path) -> Result<StepStore> {
    let doc = document::load(file)
        .with_context(|| format!("Failed to read sequence from {}", file.display()))?;
    doc.into_store()
        .with_context(|| format!("Invalid sequence in {}", file.display()))
}

fn cmd_edit(config: Config, file: &Path, no_save: bool) -> Result<()> {
    let store = load_store(file)?;
    let save_on_exit = config.editor.save_on_exit && !no_save;

    install_panic_hook();
    let mut app = App::new(config, file.display().to_string(), store);
    app.run()?;

    if !app.is_modified() {
        return Ok(());
    }
    if !save_on_exit {
        tracing::info!("Changes not saved (saving disabled)");
        println!("Changes discarded ({} not written)", file.display());
        return Ok(());
    }

    let doc = app.document();
    document::save(file, &doc)
        .with_context(|| format!("Failed to write sequence to {}", file.display()))?;
    println!("Saved {} steps to {}", doc.steps.len(), file.display());
    Ok(())
}

fn cmd_show(file: &Path) -> Result<()> {
    let store = load_store(file)?;

    if store.is_empty() {
        println!("(no steps)");
        return Ok(());
    }

    for step in store.steps() {
        let marker = if store.active() == Some(step.id) { "*" } else { " " };
        println!("{}{:>3}. {}  [#{}]", marker, step.label, step.texto, step.id);
    }
    Ok(())
}

fn cmd_check(file: &Path) -> Result<()> {
    let doc = document::load(file)
        .with_context(|| format!("Failed to read sequence from {}", file.display()))?;

    match doc.into_store() {
        Ok(store) => {
            println!("OK: {} steps, next id {}", store.len(), store.next_id());
            Ok(())
        }
        Err(err) if err.is_validation_error() => {
            bail!("INVALID: {}: {}", file.display(), err)
        }
        Err(err) => Err(err).with_context(|| format!("Failed to check {}", file.display())),
    }
}

fn cmd_init_config(force: bool) -> Result<()> {
    let path = Config::local_config_path();
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Config::default().save()?;
    println!("Wrote {}", path.display());
    Ok(())
}
