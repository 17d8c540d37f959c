//! Error handling for OBJ material preparation

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing an OBJ file and its materials
#[derive(Debug, Error)]
pub enum ObjMtlError {
    /// The mesh file to process does not exist
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// A configured texture search root does not exist
    #[error("Texture search root not found: {}", .0.display())]
    SearchRootNotFound(PathBuf),

    /// An I/O error occurred on a specific file
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file that was being read or written
        path: PathBuf,
        /// The underlying error
        #[source]
        source: io::Error,
    },

    /// The texture cache file could not be decoded or encoded
    #[error("Invalid texture cache {}: {source}", path.display())]
    CacheFormat {
        /// The cache file
        path: PathBuf,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A target unit label outside the supported set
    #[error("Unknown target unit: {0} (expected one of meters, centimeters, ue4, uu)")]
    UnknownUnit(String),
}

impl ObjMtlError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for OBJ material operations
pub type Result<T> = std::result::Result<T, ObjMtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ObjMtlError::InputNotFound(PathBuf::from("maps/rankin.obj"));
        assert_eq!(format!("{}", error), "Input file not found: maps/rankin.obj");

        let error = ObjMtlError::UnknownUnit("furlongs".to_string());
        assert_eq!(
            format!("{}", error),
            "Unknown target unit: furlongs (expected one of meters, centimeters, ue4, uu)"
        );

        let error = ObjMtlError::io(
            "texture_cache.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(format!("{}", error), "I/O error on texture_cache.json: denied");
    }
}
