//! `process` command: write materials and rescale OBJ files

use anyhow::{Context, Result};
use clap::Args;
use obj_mtl::{
    MaterialNameResolver, MaterialPipeline, ProcessReport, RescaleEngine, ShaderLibrary,
    TargetUnit,
};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::commands::{cache, describe_rescale};
use crate::config::Config;

#[derive(Args)]
pub struct ProcessArgs {
    /// OBJ files to process
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Target unit (meters, centimeters, ue4, uu); overrides the config file
    #[arg(short, long)]
    pub unit: Option<TargetUnit>,

    /// Rescan the texture directories before processing
    #[arg(long)]
    pub rebuild_cache: bool,
}

pub fn execute(args: ProcessArgs, config: &Config) -> Result<()> {
    let unit = args.unit.unwrap_or(config.scale.target_unit);
    run(
        &args.files,
        unit,
        args.rebuild_cache,
        config,
        &mut io::stdout().lock(),
    )
}

/// Process `files` one after another
///
/// A file that fails is reported and skipped; the call fails if any file did.
pub fn run<W: Write>(
    files: &[PathBuf],
    unit: TargetUnit,
    rebuild_cache: bool,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    let textures = cache::load_index(config, rebuild_cache)?;
    let shaders = ShaderLibrary::scan(&config.textures.search_roots)
        .context("Failed to scan for shader descriptions")?;
    log::info!(
        "{} textures and {} shader descriptions available",
        textures.len(),
        shaders.len()
    );

    let resolver = MaterialNameResolver::new(&textures).with_shaders(&shaders);
    let pipeline = MaterialPipeline::new(resolver, RescaleEngine::new(unit));

    let mut failed = 0;
    for file in files {
        let processed = pipeline
            .process_file(file)
            .with_context(|| format!("Failed to process {}", file.display()));
        match processed {
            Ok(report) => print_report(&report, unit, out)?,
            Err(e) => {
                eprintln!("Error: {e:#}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed", files.len());
    }
    Ok(())
}

fn print_report<W: Write>(report: &ProcessReport, unit: TargetUnit, out: &mut W) -> Result<()> {
    writeln!(out, "Processed: {}", report.mesh_path.display())?;
    writeln!(
        out,
        "  Materials: {} ({} missing)",
        report.material_count,
        report.missing_materials.len()
    )?;
    writeln!(out, "  Material file: {}", report.material_path.display())?;
    writeln!(out, "  Rescale: {}", describe_rescale(&report.rescale, unit))?;
    if let Some(path) = &report.missing_report_path {
        writeln!(out, "  Missing materials: {}", path.display())?;
    }
    Ok(())
}
