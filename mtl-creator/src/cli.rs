//! Root CLI structure for mtl-creator

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::cache::CacheCommands;
use crate::commands::process::ProcessArgs;
use crate::commands::resolve::ResolveArgs;

#[derive(Parser)]
#[command(name = "mtl-creator")]
#[command(
    about = "Generate MTL files and rescale OBJ meshes exported from game content",
    long_about = None
)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to mtl-creator.json in the working directory)
    #[arg(short, long, global = true, env = "MTL_CREATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the MTL file for one or more OBJ files and rescale them
    Process(ProcessArgs),

    /// Show how the materials of an OBJ file resolve, without writing anything
    Resolve(ResolveArgs),

    /// Texture cache operations
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Interactive menu
    Menu,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
