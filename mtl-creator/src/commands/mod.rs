//! Subcommand implementations

pub mod cache;
pub mod menu;
pub mod process;
pub mod resolve;

use obj_mtl::{DiffuseSource, RescaleOutcome, TargetUnit};

/// One-line description of a rescale outcome
pub fn describe_rescale(outcome: &RescaleOutcome, unit: TargetUnit) -> String {
    match *outcome {
        RescaleOutcome::Skipped(reason) => format!("skipped, {reason}"),
        RescaleOutcome::Applied {
            vertices_scaled,
            malformed_vertices: 0,
        } => format!(
            "{vertices_scaled} vertices scaled to {unit} (x{})",
            unit.scale_factor()
        ),
        RescaleOutcome::Applied {
            vertices_scaled,
            malformed_vertices,
        } => format!(
            "{vertices_scaled} vertices scaled to {unit} (x{}), {malformed_vertices} malformed left unchanged",
            unit.scale_factor()
        ),
    }
}

/// Short label for where a diffuse texture came from
pub fn describe_source(source: Option<DiffuseSource>) -> &'static str {
    match source {
        Some(DiffuseSource::Shader) => "shader",
        Some(DiffuseSource::MaterialName) => "name",
        None => "-",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obj_mtl::SkipReason;

    #[test]
    fn test_describe_rescale() {
        assert_eq!(
            describe_rescale(
                &RescaleOutcome::Applied {
                    vertices_scaled: 12,
                    malformed_vertices: 0
                },
                TargetUnit::Centimeters
            ),
            "12 vertices scaled to centimeters (x1.905)"
        );
        assert_eq!(
            describe_rescale(
                &RescaleOutcome::Applied {
                    vertices_scaled: 3,
                    malformed_vertices: 1
                },
                TargetUnit::Uu
            ),
            "3 vertices scaled to uu (x1), 1 malformed left unchanged"
        );
        assert_eq!(
            describe_rescale(
                &RescaleOutcome::Skipped(SkipReason::AlreadyRescaled),
                TargetUnit::Meters
            ),
            "skipped, rescale marker already present"
        );
    }
}
