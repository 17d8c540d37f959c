//! Texture lookup index keyed by normalized file stem
//!
//! The index maps the lowercased stem of every recognized image file below a
//! set of search roots to its path. Scanning large asset trees is slow, so the
//! index can be persisted as a JSON cache and reloaded on later runs.
//!
//! Two files sharing a stem resolve by last-scanned-wins. Directory walk order
//! is whatever the platform returns, so which file wins a collision is not
//! stable across platforms; collisions are logged but not otherwise handled.

use crate::error::{ObjMtlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Image extensions picked up by [`TextureIndex::build`] (compared case-insensitively)
pub const TEXTURE_EXTENSIONS: &[&str] = &["png", "tga", "jpg", "jpeg", "bmp", "dds"];

/// Mapping from normalized texture base-name to a resolvable path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureIndex {
    entries: BTreeMap<String, String>,
}

impl TextureIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `roots` recursively and index every recognized image file
    pub fn build<P: AsRef<Path>>(roots: &[P]) -> Result<Self> {
        Self::build_with_progress(roots, |_| {})
    }

    /// Like [`TextureIndex::build`], calling `on_texture` for every indexed file
    pub fn build_with_progress<P, F>(roots: &[P], mut on_texture: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: FnMut(&Path),
    {
        let mut index = Self::new();

        for root in roots {
            let root = root.as_ref();
            if !root.is_dir() {
                return Err(ObjMtlError::SearchRootNotFound(root.to_path_buf()));
            }

            let root = std::path::absolute(root).map_err(|e| ObjMtlError::io(root, e))?;
            log::info!("Scanning textures in {}", root.display());

            for entry in WalkDir::new(&root) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        log::warn!("Skipping unreadable entry: {e}");
                        continue;
                    }
                };

                if !entry.file_type().is_file() {
                    continue;
                }

                let Some(key) = texture_key(entry.path()) else {
                    continue;
                };

                on_texture(entry.path());
                let path = entry.path().to_string_lossy().replace('\\', "/");
                if let Some(previous) = index.insert(key.clone(), path) {
                    log::debug!("Texture key '{key}' collides, replacing {previous}");
                }
            }
        }

        log::info!("Indexed {} textures", index.len());
        Ok(index)
    }

    /// Load a persisted index; a missing cache file yields `Ok(None)`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ObjMtlError::io(path, e)),
        };

        let index: Self = serde_json::from_str(&data).map_err(|source| {
            ObjMtlError::CacheFormat {
                path: path.to_path_buf(),
                source,
            }
        })?;

        log::info!(
            "Loaded texture cache {} ({} textures)",
            path.display(),
            index.len()
        );
        Ok(Some(index))
    }

    /// Persist the index as pretty-printed JSON with sorted keys
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut json =
            serde_json::to_string_pretty(self).map_err(|source| ObjMtlError::CacheFormat {
                path: path.to_path_buf(),
                source,
            })?;
        json.push('\n');

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ObjMtlError::io(parent, e))?;
        }
        fs::write(path, json).map_err(|e| ObjMtlError::io(path, e))?;

        log::info!("Saved texture cache to {}", path.display());
        Ok(())
    }

    /// Load the cache at `cache_path`, or scan `roots` and save a fresh one
    /// when the cache is absent or `rebuild` is set
    pub fn load_or_build<P: AsRef<Path>>(cache_path: &Path, roots: &[P], rebuild: bool) -> Result<Self> {
        if !rebuild {
            if let Some(index) = Self::load(cache_path)? {
                return Ok(index);
            }
            log::info!("Texture cache not found, building a new one");
        }

        let index = Self::build(roots)?;
        index.save(cache_path)?;
        Ok(index)
    }

    /// Add an entry, returning the path it replaced
    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), path.into())
    }

    /// Look up the path for a normalized key
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether `key` is indexed
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of indexed textures
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries sorted by key
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TextureIndex {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (key, path) in iter {
            index.insert(key, path);
        }
        index
    }
}

/// Lowercased file stem of `path` if it has a recognized image extension
pub fn texture_key(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    if !TEXTURE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    Some(path.file_stem()?.to_str()?.to_lowercase())
}
