//! Texture cache command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use indicatif::{ProgressBar, ProgressStyle};
use obj_mtl::{TextureIndex, normalize};

use crate::config::Config;

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Rescan the search roots and rewrite the texture cache
    Build,

    /// Show where the cache lives and how many textures it holds
    Info,

    /// Show the cached texture for a material or texture name
    Lookup {
        /// Name to look up; normalized the same way as material names
        name: String,
    },
}

pub fn execute(command: CacheCommands, config: &Config) -> Result<()> {
    match command {
        CacheCommands::Build => {
            let index = build_index(config)?;
            println!(
                "Cached {} textures in {}",
                index.len(),
                config.textures.cache_file.display()
            );
            Ok(())
        }
        CacheCommands::Info => info(config),
        CacheCommands::Lookup { name } => lookup(config, &name),
    }
}

/// Scan the configured search roots and save the resulting index
pub fn build_index(config: &Config) -> Result<TextureIndex> {
    let spinner = scan_spinner();
    let mut found = 0_usize;
    let scanned = TextureIndex::build_with_progress(&config.textures.search_roots, |_| {
        found += 1;
        if found % 100 == 0 {
            spinner.set_message(format!("Scanning for textures... {found} found"));
        }
    });
    spinner.finish_and_clear();

    let index = scanned.context("Failed to build texture index")?;
    let cache_file = &config.textures.cache_file;
    index
        .save(cache_file)
        .with_context(|| format!("Failed to save texture cache: {}", cache_file.display()))?;
    Ok(index)
}

fn scan_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Scanning for textures...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Load the cached index, building it when there is no cache or `rebuild` is set
pub fn load_index(config: &Config, rebuild: bool) -> Result<TextureIndex> {
    if !rebuild && let Some(index) = load_existing(config)? {
        return Ok(index);
    }
    build_index(config)
}

fn load_existing(config: &Config) -> Result<Option<TextureIndex>> {
    let cache_file = &config.textures.cache_file;
    TextureIndex::load(cache_file)
        .with_context(|| format!("Failed to load texture cache: {}", cache_file.display()))
}

fn info(config: &Config) -> Result<()> {
    println!("Cache file: {}", config.textures.cache_file.display());
    println!("Search roots:");
    for root in &config.textures.search_roots {
        println!("  {}", root.display());
    }

    match load_existing(config)? {
        Some(index) => println!("Textures: {}", index.len()),
        None => println!("Textures: not cached yet (run `mtl-creator cache build`)"),
    }
    Ok(())
}

fn lookup(config: &Config, name: &str) -> Result<()> {
    let Some(index) = load_existing(config)? else {
        anyhow::bail!(
            "No texture cache at {}, run `mtl-creator cache build` first",
            config.textures.cache_file.display()
        );
    };

    let key = normalize(name);
    match index.lookup(&key) {
        Some(path) => {
            println!("{key} -> {path}");
            Ok(())
        }
        None => anyhow::bail!("No texture cached for '{key}'"),
    }
}
