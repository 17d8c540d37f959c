//! Main entry point for the mtl-creator CLI

use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::{Generator, generate};
use std::io;
use std::path::Path;

use mtl_creator::cli::{Cli, Commands};
use mtl_creator::commands;
use mtl_creator::config::Config;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logger; -v and -q take precedence over RUST_LOG
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = log_level(cli.verbose, cli.quiet) {
        logger.filter_level(level);
    }
    logger.init();

    // Execute command
    let config_path = cli.config.clone();
    let config_path = config_path.as_deref();
    match cli.command {
        Commands::Process(args) => commands::process::execute(args, &load_config(config_path)?),
        Commands::Resolve(args) => commands::resolve::execute(args, &load_config(config_path)?),
        Commands::Cache { command } => {
            commands::cache::execute(command, &load_config(config_path)?)
        }
        Commands::Menu => commands::menu::execute(&load_config(config_path)?),
        Commands::Completions { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(())
        }
    }
}

fn log_level(verbose: u8, quiet: bool) -> Option<log::LevelFilter> {
    match verbose {
        0 if quiet => Some(log::LevelFilter::Error),
        0 => None,
        1 => Some(log::LevelFilter::Info),
        2 => Some(log::LevelFilter::Debug),
        _ => Some(log::LevelFilter::Trace),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(Config::default_path()),
    }
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}
