//! # Wavefront OBJ material preparation
//!
//! This library prepares OBJ meshes exported from older game content for use
//! in modern tools. For each mesh it:
//!
//! - finds the texture belonging to every `usemtl` material, either by name or
//!   through a shader description file
//! - generates a matching MTL file
//! - references that MTL from the mesh and converts the vertex positions to a
//!   target unit, at most once per file
//! - reports the materials for which no texture was found
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use obj_mtl::{MaterialNameResolver, MaterialPipeline, RescaleEngine, ShaderLibrary, TargetUnit, TextureIndex};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let roots = [Path::new("assets")];
//! let textures = TextureIndex::load_or_build(Path::new("texture_cache.json"), &roots, false)?;
//! let shaders = ShaderLibrary::scan(&roots)?;
//!
//! let resolver = MaterialNameResolver::new(&textures).with_shaders(&shaders);
//! let pipeline = MaterialPipeline::new(resolver, RescaleEngine::new(TargetUnit::Meters));
//!
//! let report = pipeline.process_file(Path::new("maps/rankin.obj"))?;
//! println!("{} materials, {} missing", report.material_count, report.missing_materials.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`texture_index`]: Texture lookup by normalized name, with a JSON cache
//! - [`shader`]: Shader description parsing (`.mat` and `.props.txt`)
//! - [`resolver`]: Material name normalization and texture binding
//! - [`mesh`]: Line-level OBJ document
//! - [`writer`]: MTL generation
//! - [`rescale`]: Idempotent vertex rescaling
//! - [`pipeline`]: Whole-file processing
//! - [`unit`]: Target units and scale factors
//! - [`error`]: Error types and handling

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod mesh;
pub mod pipeline;
pub mod rescale;
pub mod resolver;
pub mod shader;
pub mod texture_index;
pub mod unit;
pub mod writer;

pub use error::{ObjMtlError, Result};
pub use mesh::{LineKind, MeshDocument, RESCALE_SENTINEL};
pub use pipeline::{MaterialPipeline, PreparedAssets, ProcessReport};
pub use rescale::{RescaleEngine, RescaleOutcome, SkipReason};
pub use resolver::{DiffuseSource, MaterialNameResolver, MaterialRef, ResolvedBinding, normalize};
pub use shader::{ShaderFormat, ShaderLibrary, ShaderSlots};
pub use texture_index::TextureIndex;
pub use unit::TargetUnit;
pub use writer::MaterialFileWriter;
