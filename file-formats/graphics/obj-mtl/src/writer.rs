//! MTL generation from resolved material bindings

use crate::resolver::ResolvedBinding;
use std::collections::BTreeMap;
use std::path::{Component, Path};

/// Writes one `newmtl` block per material
///
/// All materials share a plain white diffuse setup; only the texture maps
/// differ. Blocks are sorted by raw material name so the output is stable
/// across runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialFileWriter;

impl MaterialFileWriter {
    /// Create a new writer
    pub fn new() -> Self {
        Self
    }

    /// Render the MTL text for `bindings`
    ///
    /// Texture paths are written relative to the directory of `mesh_path`.
    pub fn write(&self, bindings: &[ResolvedBinding], mesh_path: &Path) -> String {
        let mesh_dir = mesh_path.parent().unwrap_or_else(|| Path::new(""));

        // Sorted by raw name, one block per name
        let sorted: BTreeMap<&str, &ResolvedBinding> = bindings
            .iter()
            .map(|b| (b.material.raw_name.as_str(), b))
            .collect();

        let mut mtl = String::new();
        for (name, binding) in sorted {
            mtl.push_str(&format!("newmtl {name}\n"));
            mtl.push_str("Ka 1.000 1.000 1.000\n");
            mtl.push_str("Kd 1.000 1.000 1.000\n");
            mtl.push_str("Ks 0.000 0.000 0.000\n");
            mtl.push_str("d 1.0\n");
            mtl.push_str("illum 2\n");

            if let Some(diffuse) = &binding.diffuse_texture_path {
                mtl.push_str(&format!("map_Kd {}\n", texture_reference(diffuse, mesh_dir)));
            }
            if let Some(opacity) = &binding.opacity_texture_path {
                mtl.push_str(&format!("map_d {}\n", texture_reference(opacity, mesh_dir)));
            }

            mtl.push('\n');
        }

        mtl
    }
}

/// Path to write for `texture`, relative to `mesh_dir` when possible
fn texture_reference(texture: &str, mesh_dir: &Path) -> String {
    match relative_path(Path::new(texture), mesh_dir) {
        Some(relative) => relative,
        None => {
            log::debug!(
                "Cannot express {texture} relative to {}, using it as is",
                mesh_dir.display()
            );
            texture.to_string()
        }
    }
}

/// Lexical relative path from directory `base` to `path`, `/`-separated
///
/// Relative inputs are anchored at the current directory. Returns `None`
/// when the two paths share no root, e.g. different drive letters.
pub fn relative_path(path: &Path, base: &Path) -> Option<String> {
    let path = normalized_absolute(path)?;
    let base = normalized_absolute(base)?;

    let common = path
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return None;
    }

    let parts: Vec<&str> = std::iter::repeat_n("..", base.len() - common)
        .chain(path[common..].iter().map(String::as_str))
        .collect();

    if parts.is_empty() {
        Some(".".to_string())
    } else {
        Some(parts.join("/"))
    }
}

fn normalized_absolute(path: &Path) -> Option<Vec<String>> {
    let path = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    let absolute = std::path::absolute(path).ok()?;

    let mut parts: Vec<String> = Vec::new();
    let mut anchored = 0;
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                parts.push(component.as_os_str().to_string_lossy().into_owned());
                anchored = parts.len();
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.len() > anchored {
                    parts.pop();
                }
            }
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
        }
    }
    Some(parts)
}
