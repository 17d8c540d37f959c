//! `resolve` command: dry run of the material pipeline

use anyhow::{Context, Result};
use clap::Args;
use obj_mtl::{
    MaterialNameResolver, MaterialPipeline, ObjMtlError, RescaleEngine, ShaderLibrary, TargetUnit,
};
use prettytable::{Cell, Row, Table, format};
use std::fs;
use std::path::PathBuf;

use crate::commands::{cache, describe_rescale, describe_source};
use crate::config::Config;

#[derive(Args)]
pub struct ResolveArgs {
    /// OBJ file to inspect
    pub file: PathBuf,

    /// Target unit (meters, centimeters, ue4, uu); overrides the config file
    #[arg(short, long)]
    pub unit: Option<TargetUnit>,
}

pub fn execute(args: ResolveArgs, config: &Config) -> Result<()> {
    let unit = args.unit.unwrap_or(config.scale.target_unit);
    if !args.file.is_file() {
        return Err(ObjMtlError::InputNotFound(args.file).into());
    }
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let textures = cache::load_index(config, false)?;
    let shaders = ShaderLibrary::scan(&config.textures.search_roots)
        .context("Failed to scan for shader descriptions")?;
    let resolver = MaterialNameResolver::new(&textures).with_shaders(&shaders);
    let prepared =
        MaterialPipeline::new(resolver, RescaleEngine::new(unit)).prepare(&text, &args.file);

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(
        ["Material", "Key", "Diffuse", "Source", "Opacity"]
            .into_iter()
            .map(|title| Cell::new(title).style_spec("b"))
            .collect(),
    ));
    for binding in &prepared.bindings {
        table.add_row(Row::new(vec![
            Cell::new(&binding.material.raw_name),
            Cell::new(&binding.material.normalized_key),
            Cell::new(binding.diffuse_texture_path.as_deref().unwrap_or("-")),
            Cell::new(describe_source(binding.diffuse_source)),
            Cell::new(binding.opacity_texture_path.as_deref().unwrap_or("-")),
        ]));
    }
    table.printstd();

    println!();
    println!(
        "Materials: {} ({} missing)",
        prepared.bindings.len(),
        prepared.missing_materials.len()
    );
    for name in &prepared.missing_materials {
        println!("  missing: {name}");
    }
    println!("Rescale: {}", describe_rescale(&prepared.rescale, unit));
    println!("Nothing was written.");
    Ok(())
}
