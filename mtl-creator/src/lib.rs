//! mtl-creator library
//!
//! Command-line front end for the `obj-mtl` crate: configuration, texture
//! cache management and the subcommands of the `mtl-creator` binary.

pub mod cli;
pub mod commands;
pub mod config;
