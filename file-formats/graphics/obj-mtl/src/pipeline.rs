//! End-to-end preparation of a single OBJ file
//!
//! [`MaterialPipeline::prepare`] is a pure text transform; [`MaterialPipeline::process_file`]
//! wraps it with the file reads and writes:
//!
//! - `<stem>.mtl` next to the mesh is always (re)written
//! - the mesh itself is rewritten in place only when it changed
//! - `<stem>_missing_materials.txt` lists unresolved materials and is removed
//!   when every material resolves

use crate::error::{ObjMtlError, Result};
use crate::mesh::MeshDocument;
use crate::rescale::{RescaleEngine, RescaleOutcome};
use crate::resolver::{MaterialNameResolver, ResolvedBinding, missing_materials};
use crate::writer::MaterialFileWriter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const MATERIAL_EXTENSION: &str = "mtl";
const MISSING_REPORT_SUFFIX: &str = "_missing_materials.txt";

/// Outputs of preparing one mesh
#[derive(Debug, Clone)]
pub struct PreparedAssets {
    /// Rewritten mesh text
    pub mesh_text: String,
    /// Whether `mesh_text` differs from the input
    pub mesh_changed: bool,
    /// Generated MTL text
    pub material_text: String,
    /// Every material with its textures, sorted by raw name
    pub bindings: Vec<ResolvedBinding>,
    /// Unresolved material names, sorted
    pub missing_materials: Vec<String>,
    /// What the rescale step did
    pub rescale: RescaleOutcome,
}

/// Summary of [`MaterialPipeline::process_file`]
#[derive(Debug, Clone)]
pub struct ProcessReport {
    /// The processed mesh
    pub mesh_path: PathBuf,
    /// The written MTL file
    pub material_path: PathBuf,
    /// The written missing-materials report, if any material was unresolved
    pub missing_report_path: Option<PathBuf>,
    /// Number of distinct materials
    pub material_count: usize,
    /// Unresolved material names, sorted
    pub missing_materials: Vec<String>,
    /// What the rescale step did
    pub rescale: RescaleOutcome,
    /// Whether the mesh file was rewritten
    pub mesh_rewritten: bool,
}

/// File name of the MTL generated for `mesh_path`
pub fn material_library_name(mesh_path: &Path) -> String {
    let stem = mesh_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}.{MATERIAL_EXTENSION}")
}

/// Path of the MTL generated for `mesh_path`
pub fn material_file_path(mesh_path: &Path) -> PathBuf {
    mesh_path.with_file_name(material_library_name(mesh_path))
}

/// Path of the missing-materials report for `mesh_path`
pub fn missing_report_path(mesh_path: &Path) -> PathBuf {
    let stem = mesh_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    mesh_path.with_file_name(format!("{stem}{MISSING_REPORT_SUFFIX}"))
}

/// Resolves, writes materials for and rescales OBJ files
#[derive(Debug, Clone)]
pub struct MaterialPipeline<'a> {
    resolver: MaterialNameResolver<'a>,
    engine: RescaleEngine,
    writer: MaterialFileWriter,
}

impl<'a> MaterialPipeline<'a> {
    /// Create a pipeline
    pub fn new(resolver: MaterialNameResolver<'a>, engine: RescaleEngine) -> Self {
        Self {
            resolver,
            engine,
            writer: MaterialFileWriter::new(),
        }
    }

    /// Transform `mesh_text`, which lives at `mesh_path`
    pub fn prepare(&self, mesh_text: &str, mesh_path: &Path) -> PreparedAssets {
        let mut document = MeshDocument::parse(mesh_text);

        let bindings = self.resolver.resolve_all(document.materials());
        let material_text = self.writer.write(&bindings, mesh_path);
        let missing_materials = missing_materials(&bindings);

        let rescale = self
            .engine
            .apply(&mut document, &material_library_name(mesh_path));
        let mesh_text = document.render();

        PreparedAssets {
            mesh_changed: rescale.is_applied(),
            mesh_text,
            material_text,
            bindings,
            missing_materials,
            rescale,
        }
    }

    /// Prepare the mesh at `mesh_path` and write all outputs
    pub fn process_file(&self, mesh_path: &Path) -> Result<ProcessReport> {
        let mesh_text = match fs::read_to_string(mesh_path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ObjMtlError::InputNotFound(mesh_path.to_path_buf()));
            }
            Err(e) => return Err(ObjMtlError::io(mesh_path, e)),
        };

        log::info!("Processing {}", mesh_path.display());
        let prepared = self.prepare(&mesh_text, mesh_path);

        let material_path = material_file_path(mesh_path);
        fs::write(&material_path, &prepared.material_text)
            .map_err(|e| ObjMtlError::io(&material_path, e))?;
        log::info!("Wrote {}", material_path.display());

        if prepared.mesh_changed {
            fs::write(mesh_path, &prepared.mesh_text).map_err(|e| ObjMtlError::io(mesh_path, e))?;
            log::info!("Rewrote {}", mesh_path.display());
        }

        let report_path = missing_report_path(mesh_path);
        let missing_report_path = if prepared.missing_materials.is_empty() {
            match fs::remove_file(&report_path) {
                Ok(()) => log::info!("Removed stale {}", report_path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(ObjMtlError::io(&report_path, e)),
            }
            None
        } else {
            let mut report = prepared.missing_materials.join("\n");
            report.push('\n');
            fs::write(&report_path, report).map_err(|e| ObjMtlError::io(&report_path, e))?;
            log::info!(
                "{} unresolved materials listed in {}",
                prepared.missing_materials.len(),
                report_path.display()
            );
            Some(report_path)
        };

        Ok(ProcessReport {
            mesh_path: mesh_path.to_path_buf(),
            material_path,
            missing_report_path,
            material_count: prepared.bindings.len(),
            missing_materials: prepared.missing_materials,
            rescale: prepared.rescale,
            mesh_rewritten: prepared.mesh_changed,
        })
    }
}
