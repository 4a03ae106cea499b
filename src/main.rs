use anyhow::{Context, Result};
use canopy_lib::model::config::AppConfig;
use canopy_script::{CompileError, ComponentCompiler, SourceCompiler};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "canopy.toml", global = true)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a script file and print the component types it defines
    Check { file: PathBuf },
    /// Print the effective configuration
    Config,
}

fn init_tracing(level: &str) {
    // RUST_LOG wins when set
    match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => {
            tracing_subscriber::fmt().with_env_filter(filter).try_init().ok();
        }
        Err(_) => canopy_core::init_logging(level),
    }
}

fn report_diagnostics(file: &Path, error: &CompileError) {
    for diagnostic in &error.diagnostics {
        eprintln!("{}:{diagnostic}", file.display());
    }
}

fn check(file: &Path) -> Result<()> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let unit = match ComponentCompiler.compile(&source) {
        Ok(unit) => unit,
        Err(e) => {
            report_diagnostics(file, &e);
            anyhow::bail!("{} failed to compile", file.display());
        }
    };

    for script_type in unit.types() {
        println!("{script_type}");
    }
    tracing::info!(file = %file.display(), types = unit.types().len(), "Script compiled");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(&args.config)?;
    init_tracing(
        args.log_level
            .as_deref()
            .unwrap_or(&config.core.logging.level),
    );

    match args.command {
        Command::Check { file } => check(&file),
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
