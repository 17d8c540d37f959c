//! Idempotent unit conversion of vertex positions
//!
//! A document is rescaled at most once. The first run prepends a marker
//! comment and an `mtllib` reference; any later run finds either of them and
//! leaves the document untouched.

use crate::mesh::{MATERIAL_LIB_DIRECTIVE, MeshDocument, RESCALE_SENTINEL, VERTEX_DIRECTIVE};
use crate::unit::TargetUnit;
use std::fmt;

/// Why a document was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The document already references a material library
    MaterialLibraryPresent,
    /// The document already carries a rescale marker
    AlreadyRescaled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaterialLibraryPresent => f.write_str("material library reference already present"),
            Self::AlreadyRescaled => f.write_str("rescale marker already present"),
        }
    }
}

/// Result of [`RescaleEngine::apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescaleOutcome {
    /// Nothing was changed
    Skipped(SkipReason),
    /// Marker and library reference were inserted
    Applied {
        /// Vertex lines whose coordinates were multiplied
        vertices_scaled: usize,
        /// Vertex lines passed through because they did not parse
        malformed_vertices: usize,
    },
}

impl RescaleOutcome {
    /// Whether the document was modified
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Multiplies vertex positions by a fixed factor
#[derive(Debug, Clone, PartialEq)]
pub struct RescaleEngine {
    factor: f64,
    unit_label: String,
}

impl RescaleEngine {
    /// Engine converting to `unit`
    pub fn new(unit: TargetUnit) -> Self {
        Self::with_factor(unit.scale_factor(), unit.marker_label())
    }

    /// Engine with an explicit factor and marker label
    pub fn with_factor(factor: f64, unit_label: impl Into<String>) -> Self {
        Self {
            factor,
            unit_label: unit_label.into(),
        }
    }

    /// The scale factor
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// The marker comment recording this conversion
    pub fn marker_line(&self) -> String {
        format!("# {RESCALE_SENTINEL}{} = {}", self.unit_label, self.factor)
    }

    /// Rescale `document` and reference `material_library`, unless a previous
    /// run already did
    pub fn apply(&self, document: &mut MeshDocument, material_library: &str) -> RescaleOutcome {
        if document.has_material_lib_ref() {
            log::info!("Skipping rescale: material library reference already present");
            return RescaleOutcome::Skipped(SkipReason::MaterialLibraryPresent);
        }
        if document.has_rescale_marker() {
            log::info!("Skipping rescale: rescale marker already present");
            return RescaleOutcome::Skipped(SkipReason::AlreadyRescaled);
        }

        let mut vertices_scaled = 0;
        let mut malformed_vertices = 0;

        if self.multiplies() {
            let targets = document.vertex_lines().to_vec();
            for index in targets {
                let original = document.lines()[index].as_str();
                match scale_vertex_line(original, self.factor) {
                    Some(line) => {
                        document.replace_line(index, line);
                        vertices_scaled += 1;
                    }
                    None => {
                        log::warn!("Line {}: malformed vertex left unchanged", index + 1);
                        malformed_vertices += 1;
                    }
                }
            }
        }

        document.insert_lines_at_top(vec![
            self.marker_line(),
            format!("{MATERIAL_LIB_DIRECTIVE} {material_library}"),
        ]);

        log::info!(
            "Rescaled {vertices_scaled} vertices by {} ({})",
            self.factor,
            self.unit_label
        );
        RescaleOutcome::Applied {
            vertices_scaled,
            malformed_vertices,
        }
    }

    fn multiplies(&self) -> bool {
        if !self.factor.is_finite() || self.factor <= 0.0 {
            log::warn!("Unsupported scale factor {}, coordinates left as is", self.factor);
            return false;
        }
        #[allow(clippy::float_cmp)]
        let identity = self.factor == 1.0;
        !identity
    }
}

/// Multiply the first three coordinates of a `v` line by `factor`
///
/// Any further tokens (a `w` component or vertex colors) are kept as written.
/// Returns `None` if the line is not a vertex or the coordinates do not parse.
pub fn scale_vertex_line(line: &str, factor: f64) -> Option<String> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != VERTEX_DIRECTIVE {
        return None;
    }

    let mut position = [0.0_f64; 3];
    for coordinate in &mut position {
        *coordinate = tokens.next()?.parse::<f64>().ok()? * factor;
    }

    let mut scaled = format!(
        "{VERTEX_DIRECTIVE} {} {} {}",
        position[0], position[1], position[2]
    );
    for rest in tokens {
        scaled.push(' ');
        scaled.push_str(rest);
    }
    Some(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const MESH: &str = "\
o Rock
v 1.0 2.0 3.0
v -10 0 250 1.0
vt 0.5 0.5
usemtl Rock_01
f 1 2 1
";

    #[test]
    fn test_scale_vertex_line() {
        assert_eq!(
            scale_vertex_line("v 1.0 2.0 3.0", 0.01).as_deref(),
            Some("v 0.01 0.02 0.03")
        );
        assert_eq!(
            scale_vertex_line("v 1 1 1 0.5 0.25 0.125", 2.0).as_deref(),
            Some("v 2 2 2 0.5 0.25 0.125")
        );
        assert_eq!(scale_vertex_line("v 1 2", 2.0), None);
        assert_eq!(scale_vertex_line("v 1 two 3", 2.0), None);
        assert_eq!(scale_vertex_line("vt 1 2 3", 2.0), None);
    }

    #[test]
    fn test_scaled_values_round_trip() {
        let line = scale_vertex_line("v 123.456 -0.001 98765.4321", 0.01905).unwrap();
        let parsed: Vec<f64> = line
            .split_whitespace()
            .skip(1)
            .map(|t| t.parse().unwrap())
            .collect();
        assert_eq!(parsed, vec![123.456 * 0.01905, -0.001 * 0.01905, 98765.4321 * 0.01905]);
    }

    #[test]
    fn test_apply_inserts_marker_and_library() {
        let mut doc = MeshDocument::parse(MESH);
        let outcome = RescaleEngine::with_factor(0.01, "METERS").apply(&mut doc, "rock.mtl");
        assert_eq!(
            outcome,
            RescaleOutcome::Applied {
                vertices_scaled: 2,
                malformed_vertices: 0
            }
        );

        let expected = "\
# UT2_SCALED_TO_METERS = 0.01
mtllib rock.mtl
o Rock
v 0.01 0.02 0.03
v -0.1 0 2.5 1.0
vt 0.5 0.5
usemtl Rock_01
f 1 2 1
";
        assert_eq!(doc.render(), expected);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let engine = RescaleEngine::new(TargetUnit::Meters);
        let mut doc = MeshDocument::parse(MESH);
        engine.apply(&mut doc, "rock.mtl");
        let once = doc.render();

        let outcome = engine.apply(&mut doc, "rock.mtl");
        assert_eq!(
            outcome,
            RescaleOutcome::Skipped(SkipReason::MaterialLibraryPresent)
        );
        assert_eq!(doc.render(), once);

        // Reparsing the output gives the same answer
        let mut reparsed = MeshDocument::parse(&once);
        assert!(!engine.apply(&mut reparsed, "rock.mtl").is_applied());
        assert_eq!(reparsed.render(), once);
    }

    #[test]
    fn test_existing_mtllib_prevents_scaling() {
        let text = "mtllib other.mtl\nv 1 2 3\n";
        let mut doc = MeshDocument::parse(text);
        let outcome = RescaleEngine::new(TargetUnit::Meters).apply(&mut doc, "x.mtl");
        assert_eq!(
            outcome,
            RescaleOutcome::Skipped(SkipReason::MaterialLibraryPresent)
        );
        assert_eq!(doc.render(), text);
    }

    #[test]
    fn test_existing_marker_prevents_scaling() {
        let text = "# UT2_SCALED_TO_METERS = 0.01905\nv 1 2 3\n";
        let mut doc = MeshDocument::parse(text);
        let outcome = RescaleEngine::new(TargetUnit::Centimeters).apply(&mut doc, "x.mtl");
        assert_eq!(outcome, RescaleOutcome::Skipped(SkipReason::AlreadyRescaled));
        assert_eq!(doc.render(), text);
    }

    #[test_case(1.0 ; "identity")]
    #[test_case(0.0 ; "zero")]
    #[test_case(-2.0 ; "negative")]
    #[test_case(f64::NAN ; "nan")]
    fn test_non_multiplying_factors_still_mark(factor: f64) {
        let mut doc = MeshDocument::parse("v 1.5 2.5 3.5\n");
        let outcome = RescaleEngine::with_factor(factor, "UU").apply(&mut doc, "a.mtl");
        assert_eq!(
            outcome,
            RescaleOutcome::Applied {
                vertices_scaled: 0,
                malformed_vertices: 0
            }
        );
        assert_eq!(doc.lines()[2], "v 1.5 2.5 3.5");
        assert!(doc.has_rescale_marker());
        assert!(doc.has_material_lib_ref());
    }

    #[test]
    fn test_malformed_vertex_passes_through() {
        let mut doc = MeshDocument::parse("v 1 2\nv 1 2 3\n");
        let outcome = RescaleEngine::with_factor(2.0, "CM").apply(&mut doc, "a.mtl");
        assert_eq!(
            outcome,
            RescaleOutcome::Applied {
                vertices_scaled: 1,
                malformed_vertices: 1
            }
        );
        assert_eq!(doc.lines()[2], "v 1 2");
        assert_eq!(doc.lines()[3], "v 2 4 6");
    }

    #[test]
    fn test_vertex_count_preserved() {
        let mut doc = MeshDocument::parse(MESH);
        let before = doc.vertex_count();
        RescaleEngine::new(TargetUnit::Ue4).apply(&mut doc, "rock.mtl");
        assert_eq!(doc.vertex_count(), before);
        assert_eq!(MeshDocument::parse(&doc.render()).vertex_count(), before);
    }

    #[test]
    fn test_marker_line() {
        assert_eq!(
            RescaleEngine::new(TargetUnit::Meters).marker_line(),
            "# UT2_SCALED_TO_METERS = 0.01905"
        );
    }
}
