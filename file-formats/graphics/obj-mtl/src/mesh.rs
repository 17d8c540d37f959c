//! Line-level view of a Wavefront OBJ document
//!
//! Only the lines that matter for material binding and rescaling are
//! interpreted: vertex positions (`v`), material use (`usemtl`), material
//! library references (`mtllib`) and the rescale marker comment. Everything
//! else, including faces, normals and texture coordinates, is kept verbatim.

use crate::resolver::MaterialRef;
use std::collections::HashSet;

/// Vertex position directive
pub const VERTEX_DIRECTIVE: &str = "v";
/// Material use directive
pub const MATERIAL_USE_DIRECTIVE: &str = "usemtl";
/// Material library directive
pub const MATERIAL_LIB_DIRECTIVE: &str = "mtllib";
/// Token identifying a rescale marker line
///
/// Downstream tools look for this exact token to skip already converted
/// files, so it must not change.
pub const RESCALE_SENTINEL: &str = "UT2_SCALED_TO_";

/// Classification of a single mesh line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `v x y z ...`
    Vertex,
    /// `usemtl name`
    MaterialUse,
    /// `mtllib file`
    MaterialLibRef,
    /// A line carrying [`RESCALE_SENTINEL`]
    RescaleMarker,
    /// Anything else
    Other,
}

impl LineKind {
    /// Classify a line by its first token
    ///
    /// Directives win over the sentinel, so a material whose name happens to
    /// contain [`RESCALE_SENTINEL`] is still a material use.
    pub fn classify(line: &str) -> Self {
        match line.split_whitespace().next() {
            Some(VERTEX_DIRECTIVE) => Self::Vertex,
            Some(MATERIAL_USE_DIRECTIVE) => Self::MaterialUse,
            Some(MATERIAL_LIB_DIRECTIVE) => Self::MaterialLibRef,
            _ if line.contains(RESCALE_SENTINEL) => Self::RescaleMarker,
            _ => Self::Other,
        }
    }
}

/// Line terminator used when rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// The terminator characters
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Material name following a `usemtl` directive, if any
pub fn material_use_name(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix(MATERIAL_USE_DIRECTIVE)?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name = rest.trim();
    (!name.is_empty()).then_some(name)
}

/// Parsed OBJ text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeshDocument {
    lines: Vec<String>,
    line_ending: LineEnding,
    trailing_newline: bool,
    materials: Vec<MaterialRef>,
    vertex_lines: Vec<usize>,
    has_material_lib_ref: bool,
    has_rescale_marker: bool,
}

impl MeshDocument {
    /// Split `text` into lines and collect materials, vertices and markers
    pub fn parse(text: &str) -> Self {
        let line_ending = match text.find('\n') {
            Some(pos) if text[..pos].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        };

        let mut lines: Vec<String> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        let trailing_newline = text.ends_with('\n');
        if trailing_newline || text.is_empty() {
            lines.pop();
        }

        let mut document = Self {
            lines,
            line_ending,
            trailing_newline,
            ..Self::default()
        };
        document.reindex();
        document
    }

    /// Reassemble the document into text
    pub fn render(&self) -> String {
        let ending = self.line_ending.as_str();
        let mut text = self.lines.join(ending);
        if self.trailing_newline && !self.lines.is_empty() {
            text.push_str(ending);
        }
        text
    }

    /// All lines in file order, without terminators
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Classification of line `index`
    pub fn line_kind(&self, index: usize) -> Option<LineKind> {
        self.lines.get(index).map(|line| LineKind::classify(line))
    }

    /// Distinct materials in first-seen order
    pub fn materials(&self) -> &[MaterialRef] {
        &self.materials
    }

    /// Indices of vertex lines
    pub fn vertex_lines(&self) -> &[usize] {
        &self.vertex_lines
    }

    /// Number of vertex lines
    pub fn vertex_count(&self) -> usize {
        self.vertex_lines.len()
    }

    /// Whether an `mtllib` directive is present
    pub fn has_material_lib_ref(&self) -> bool {
        self.has_material_lib_ref
    }

    /// Whether a rescale marker is present
    pub fn has_rescale_marker(&self) -> bool {
        self.has_rescale_marker
    }

    /// Whether a previous run already rewrote this document
    pub fn is_processed(&self) -> bool {
        self.has_material_lib_ref || self.has_rescale_marker
    }

    /// Line terminator style detected at parse time
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub(crate) fn insert_lines_at_top(&mut self, new_lines: Vec<String>) {
        if self.lines.is_empty() {
            self.trailing_newline = true;
        }
        self.lines.splice(0..0, new_lines);
        self.reindex();
    }

    pub(crate) fn replace_line(&mut self, index: usize, line: String) {
        if let Some(slot) = self.lines.get_mut(index) {
            *slot = line;
        }
    }

    fn reindex(&mut self) {
        let mut seen = HashSet::new();
        self.materials.clear();
        self.vertex_lines.clear();
        self.has_material_lib_ref = false;
        self.has_rescale_marker = false;

        for (index, line) in self.lines.iter().enumerate() {
            if line.contains(RESCALE_SENTINEL) {
                self.has_rescale_marker = true;
            }
            match LineKind::classify(line) {
                LineKind::Vertex => self.vertex_lines.push(index),
                LineKind::MaterialLibRef => self.has_material_lib_ref = true,
                LineKind::MaterialUse => match material_use_name(line) {
                    Some(name) => {
                        if seen.insert(name.to_string()) {
                            self.materials.push(MaterialRef::new(name));
                        }
                    }
                    None => log::warn!("Line {}: usemtl without a material name", index + 1),
                },
                LineKind::RescaleMarker | LineKind::Other => {}
            }
        }
    }
}
