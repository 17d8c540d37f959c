//! Material name normalization and texture resolution

use crate::shader::{self, ShaderLibrary, ShaderSlots};
use crate::texture_index::TextureIndex;
use std::collections::{BTreeMap, HashMap};

/// Normalize a raw material name into a texture lookup key
///
/// The name is lowercased and cut at the first `.` or whitespace, so
/// `Rock_01.skin` and `rock_01 (copy)` both become `rock_01`.
pub fn normalize(raw: &str) -> String {
    let end = raw
        .find(|c: char| c == '.' || c.is_whitespace())
        .unwrap_or(raw.len());
    raw[..end].to_lowercase()
}

/// A material referenced by the mesh
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialRef {
    /// Name exactly as written after `usemtl`
    pub raw_name: String,
    /// Lookup key derived by [`normalize`]
    pub normalized_key: String,
}

impl MaterialRef {
    /// Create a reference from a raw material name
    pub fn new(raw_name: impl Into<String>) -> Self {
        let raw_name = raw_name.into();
        let normalized_key = normalize(&raw_name);
        Self {
            raw_name,
            normalized_key,
        }
    }
}

/// Where a resolved diffuse texture came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffuseSource {
    /// The shader description named the texture
    Shader,
    /// The material's own normalized name matched a texture
    MaterialName,
}

/// A material together with the textures found for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    /// The material
    pub material: MaterialRef,
    /// Diffuse texture path, `None` when unresolved
    pub diffuse_texture_path: Option<String>,
    /// Opacity texture path from the shader description
    pub opacity_texture_path: Option<String>,
    /// How the diffuse texture was found
    pub diffuse_source: Option<DiffuseSource>,
}

impl ResolvedBinding {
    /// Whether a diffuse texture was found
    pub fn is_resolved(&self) -> bool {
        self.diffuse_texture_path.is_some()
    }
}

/// Resolves materials against a [`TextureIndex`], optionally consulting
/// shader descriptions first
#[derive(Debug, Clone, Copy)]
pub struct MaterialNameResolver<'a> {
    textures: &'a TextureIndex,
    shaders: Option<&'a ShaderLibrary>,
}

impl<'a> MaterialNameResolver<'a> {
    /// Resolve by material name only
    pub fn new(textures: &'a TextureIndex) -> Self {
        Self {
            textures,
            shaders: None,
        }
    }

    /// Also consult shader descriptions
    pub fn with_shaders(mut self, shaders: &'a ShaderLibrary) -> Self {
        self.shaders = Some(shaders);
        self
    }

    /// Texture slots from the shader description matching `key`
    pub fn resolve_indirect(&self, key: &str) -> ShaderSlots {
        self.shaders
            .map(|library| library.resolve_indirect(key))
            .unwrap_or_default()
    }

    /// Resolve a single material
    pub fn resolve(&self, material: &MaterialRef) -> ResolvedBinding {
        let slots = self.resolve_indirect(&material.normalized_key);
        self.bind(material, &slots)
    }

    /// Resolve every material once, sorted by raw name
    ///
    /// Materials whose raw names normalize to the same key share a single
    /// shader lookup.
    pub fn resolve_all<'m, I>(&self, materials: I) -> Vec<ResolvedBinding>
    where
        I: IntoIterator<Item = &'m MaterialRef>,
    {
        let unique: BTreeMap<&str, &MaterialRef> = materials
            .into_iter()
            .map(|m| (m.raw_name.as_str(), m))
            .collect();

        let mut slots_by_key: HashMap<&str, ShaderSlots> = HashMap::new();
        unique
            .into_values()
            .map(|material| {
                let slots = slots_by_key
                    .entry(material.normalized_key.as_str())
                    .or_insert_with(|| self.resolve_indirect(&material.normalized_key));
                self.bind(material, slots)
            })
            .collect()
    }

    fn bind(&self, material: &MaterialRef, slots: &ShaderSlots) -> ResolvedBinding {
        let from_shader = shader::diffuse_key(slots)
            .and_then(|key| self.textures.lookup(key))
            .map(|path| (path, DiffuseSource::Shader));
        let from_name = || {
            self.textures
                .lookup(&material.normalized_key)
                .map(|path| (path, DiffuseSource::MaterialName))
        };

        let (diffuse_texture_path, diffuse_source) = match from_shader.or_else(from_name) {
            Some((path, source)) => (Some(path.to_string()), Some(source)),
            None => {
                log::debug!("No texture found for material '{}'", material.raw_name);
                (None, None)
            }
        };

        let opacity_texture_path = shader::opacity_key(slots)
            .and_then(|key| self.textures.lookup(key))
            .map(str::to_string);

        ResolvedBinding {
            material: material.clone(),
            diffuse_texture_path,
            opacity_texture_path,
            diffuse_source,
        }
    }
}

/// Raw names of unresolved materials, sorted and without duplicates
pub fn missing_materials(bindings: &[ResolvedBinding]) -> Vec<String> {
    let mut missing: Vec<String> = bindings
        .iter()
        .filter(|b| !b.is_resolved())
        .map(|b| b.material.raw_name.clone())
        .collect();
    missing.sort();
    missing.dedup();
    missing
}
