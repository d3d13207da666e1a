//! nb-config-manager
//!
//! Resolves the notebook frontend config directory for the active
//! environment, merging per-user extension activations into it.

use anyhow::{Context, Result};
use clap::Parser;
use nb_config_manager::cli::{Cli, Command, ResolveArgs, ShowArgs};
use nb_config_manager::config::SettingsLoader;
use nb_config_manager::format::{OutputFormat, format_resolution_json, format_resolution_text};
use nb_config_manager::resolver::ConfigResolver;
use nb_config_manager::store::DocumentStore;
use std::fs::OpenOptions;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {}
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)
                .with_context(|| format!("Failed to open log file {filename}"))?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut loader = SettingsLoader::load(cli.settings.clone())?;
    if let Some(path) = loader.settings_path() {
        debug!(path = %path.display(), "Using settings file");
    }
    cli.apply_to(loader.settings_mut());
    let settings = loader.into_settings();

    let dirs = settings.config_dirs()?;
    let resolver = ConfigResolver::new(dirs, settings.disable_user_config)
        .context("Failed to resolve nbconfig directory")?;

    match cli.command {
        Some(Command::Show(args)) => run_show(&resolver, args),
        Some(Command::Resolve(args)) => run_resolve(&resolver, args),
        None => run_resolve(&resolver, ResolveArgs::default()),
    }
}

fn run_resolve(resolver: &ConfigResolver, args: ResolveArgs) -> Result<()> {
    let resolution = resolver.resolution();
    let active_dir = resolver.active_config_dir();
    match args.format {
        OutputFormat::Text => print!("{}", format_resolution_text(resolution, active_dir)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&format_resolution_json(resolution, active_dir))?
        ),
    }
    Ok(())
}

fn run_show(resolver: &ConfigResolver, args: ShowArgs) -> Result<()> {
    let document = resolver
        .get(&args.section)
        .with_context(|| format!("Failed to read section '{}'", args.section))?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
