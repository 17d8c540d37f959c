//! Target units for geometry rescaling
//!
//! Source geometry is assumed to be in Unreal Tournament 2 units, where one
//! unit is 1.905 centimeters.

use crate::error::{ObjMtlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A unit system the mesh coordinates can be converted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetUnit {
    /// Meters (1 uu = 0.01905 m)
    #[default]
    Meters,
    /// Centimeters (1 uu = 1.905 cm)
    Centimeters,
    /// Unreal Engine 4 units, which are centimeters
    Ue4,
    /// Unreal units; the geometry is left at its original scale
    Uu,
}

impl TargetUnit {
    /// All supported units, in display order
    pub const ALL: [Self; 4] = [Self::Meters, Self::Centimeters, Self::Ue4, Self::Uu];

    /// Multiplier applied to each vertex coordinate
    pub fn scale_factor(self) -> f64 {
        match self {
            Self::Meters => 0.01905,
            Self::Centimeters | Self::Ue4 => 1.905,
            Self::Uu => 1.0,
        }
    }

    /// Lowercase name as used in configuration files
    pub fn name(self) -> &'static str {
        match self {
            Self::Meters => "meters",
            Self::Centimeters => "centimeters",
            Self::Ue4 => "ue4",
            Self::Uu => "uu",
        }
    }

    /// Uppercase label written into the rescale marker
    pub fn marker_label(self) -> String {
        self.name().to_uppercase()
    }
}

impl fmt::Display for TargetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetUnit {
    type Err = ObjMtlError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|unit| unit.name() == lower)
            .ok_or_else(|| ObjMtlError::UnknownUnit(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("meters", TargetUnit::Meters, 0.01905)]
    #[test_case("Centimeters", TargetUnit::Centimeters, 1.905)]
    #[test_case("UE4", TargetUnit::Ue4, 1.905)]
    #[test_case(" uu ", TargetUnit::Uu, 1.0)]
    fn test_parse_unit(label: &str, expected: TargetUnit, factor: f64) {
        let unit: TargetUnit = label.parse().expect("known unit");
        assert_eq!(unit, expected);
        assert!((unit.scale_factor() - factor).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_unit() {
        let err = "furlongs".parse::<TargetUnit>().unwrap_err();
        assert!(matches!(err, ObjMtlError::UnknownUnit(ref s) if s == "furlongs"));
    }

    #[test]
    fn test_marker_label() {
        assert_eq!(TargetUnit::Meters.marker_label(), "METERS");
        assert_eq!(TargetUnit::Ue4.marker_label(), "UE4");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&TargetUnit::Centimeters).unwrap();
        assert_eq!(json, "\"centimeters\"");
        let unit: TargetUnit = serde_json::from_str("\"uu\"").unwrap();
        assert_eq!(unit, TargetUnit::Uu);
    }
}
