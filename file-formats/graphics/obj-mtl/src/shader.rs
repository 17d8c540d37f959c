//! Auxiliary shader description files
//!
//! Some exported materials do not share a name with their texture. The
//! exporter leaves a shader description next to the assets that names the
//! texture bound to each slot, in one of two formats:
//!
//! - `<material>.mat`: flat `Key=Value` lines, e.g. `Diffuse=Rock_Base`
//! - `<material>.props.txt`: property dumps where textures are embedded as
//!   `Texture'Package.Group.Name'`, e.g.
//!   `Diffuse = Texture'RockPkg.Base.Rock_Base'`
//!
//! The format is chosen from the file name, never from the content.

use crate::error::{ObjMtlError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Slot name → lowercased texture key
pub type ShaderSlots = BTreeMap<String, String>;

/// Slot holding the diffuse texture
pub const SLOT_DIFFUSE: &str = "Diffuse";
/// Fallback slot holding the diffuse texture
pub const SLOT_DIFFUSE_TEXTURE: &str = "DiffuseTexture";
/// Slot holding the opacity mask
pub const SLOT_OPACITY: &str = "Opacity";

const PROPS_SUFFIX: &str = ".props.txt";
const MAT_SUFFIX: &str = ".mat";
const TEXTURE_REF_OPEN: &str = "Texture'";

/// Recognized shader description formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderFormat {
    /// `Key=Value` lines
    Mat,
    /// Property dump with embedded `Texture'...'` references
    Props,
}

impl ShaderFormat {
    /// Detect the format and material base name from a file name
    ///
    /// Returns `(format, lowercased base name)`.
    pub fn detect(file_name: &str) -> Option<(Self, String)> {
        let lower = file_name.to_lowercase();
        if let Some(base) = lower.strip_suffix(PROPS_SUFFIX) {
            return Some((Self::Props, base.to_string()));
        }
        lower
            .strip_suffix(MAT_SUFFIX)
            .map(|base| (Self::Mat, base.to_string()))
    }

    /// Parse file content in this format
    pub fn parse(self, text: &str) -> ShaderSlots {
        match self {
            Self::Mat => parse_mat(text),
            Self::Props => parse_props(text),
        }
    }
}

/// Parse the flat `Key=Value` format
pub fn parse_mat(text: &str) -> ShaderSlots {
    let mut slots = ShaderSlots::new();
    for line in text.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }
        slots.insert(key.to_string(), value.to_lowercase());
    }
    slots
}

/// Parse the property-dump format
///
/// Only properties whose value embeds a `Texture'<path>'` reference are kept;
/// the texture key is the last `.`-separated segment of `<path>`.
pub fn parse_props(text: &str) -> ShaderSlots {
    let mut slots = ShaderSlots::new();
    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let Some(reference) = embedded_texture(value) else {
            continue;
        };
        let name = reference.rsplit('.').next().unwrap_or(reference);
        if name.is_empty() {
            continue;
        }
        slots.insert(key.trim().to_string(), name.to_lowercase());
    }
    slots
}

fn embedded_texture(value: &str) -> Option<&str> {
    let start = value.find(TEXTURE_REF_OPEN)? + TEXTURE_REF_OPEN.len();
    let rest = &value[start..];
    let end = rest.find('\'')?;
    let reference = &rest[..end];
    (!reference.is_empty()).then_some(reference)
}

/// Diffuse texture key from parsed slots
pub fn diffuse_key(slots: &ShaderSlots) -> Option<&str> {
    slots
        .get(SLOT_DIFFUSE)
        .or_else(|| slots.get(SLOT_DIFFUSE_TEXTURE))
        .map(String::as_str)
}

/// Opacity texture key from parsed slots
pub fn opacity_key(slots: &ShaderSlots) -> Option<&str> {
    slots.get(SLOT_OPACITY).map(String::as_str)
}

/// Shader description files found below the asset search roots, keyed by
/// lowercased material base name
///
/// Built once per run; when two files share a base name the first one found
/// is kept.
#[derive(Debug, Clone, Default)]
pub struct ShaderLibrary {
    files: BTreeMap<String, (ShaderFormat, PathBuf)>,
}

impl ShaderLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `roots` recursively for `.mat` and `.props.txt` files
    pub fn scan<P: AsRef<Path>>(roots: &[P]) -> Result<Self> {
        let mut library = Self::new();

        for root in roots {
            let root = root.as_ref();
            if !root.is_dir() {
                return Err(ObjMtlError::SearchRootNotFound(root.to_path_buf()));
            }

            for entry in WalkDir::new(root).into_iter().filter_map(|e| {
                e.map_err(|err| log::warn!("Skipping unreadable entry: {err}"))
                    .ok()
            }) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let Some(file_name) = entry.file_name().to_str() else {
                    continue;
                };
                if let Some((format, base)) = ShaderFormat::detect(file_name) {
                    library.insert(base, format, entry.into_path());
                }
            }
        }

        log::info!("Found {} shader descriptions", library.len());
        Ok(library)
    }

    /// Register a shader file for `base`; an existing entry is kept
    pub fn insert(&mut self, base: impl Into<String>, format: ShaderFormat, path: PathBuf) {
        self.files.entry(base.into()).or_insert((format, path));
    }

    /// Path of the shader description for a normalized material key
    pub fn path_for(&self, key: &str) -> Option<&Path> {
        self.files.get(key).map(|(_, path)| path.as_path())
    }

    /// Number of known shader descriptions
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no shader descriptions are known
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Read the slots of the shader description for `key`
    ///
    /// Best-effort: no description, or one that cannot be read, yields an
    /// empty mapping.
    pub fn resolve_indirect(&self, key: &str) -> ShaderSlots {
        let Some((format, path)) = self.files.get(key) else {
            return ShaderSlots::new();
        };

        match fs::read(path) {
            Ok(bytes) => format.parse(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                log::warn!("Cannot read shader description {}: {e}", path.display());
                ShaderSlots::new()
            }
        }
    }
}
