use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for amalgamation runs
#[derive(Error, Debug)]
pub enum AmalgamateError {
    /// A planned input file does not exist or is not a regular file
    #[error("Missing input file: {path}")]
    MissingInputFile { path: PathBuf },

    /// A planned input file exists but could not be read as UTF-8 text
    #[error("Failed to read {path}: {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output directory could not be created or the file could not be written
    #[error("Failed to write {path}: {source}")]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The header and source outputs resolve to one path
    #[error("Header and source would be written to the same file: {path}")]
    OutputCollision { path: PathBuf },

    /// Any other IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AmalgamateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AmalgamateError::MissingInputFile {
            path: PathBuf::from("arbiter/a.cpp"),
        };
        assert_eq!(format!("{err}"), "Missing input file: arbiter/a.cpp");

        let err = AmalgamateError::ReadFailure {
            path: PathBuf::from("LICENSE"),
            source: io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
        };
        assert_eq!(
            format!("{err}"),
            "Failed to read LICENSE: stream did not contain valid UTF-8"
        );

        let err = AmalgamateError::OutputWriteFailure {
            path: PathBuf::from("dist/arbiter.cpp"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(format!("{err}"), "Failed to write dist/arbiter.cpp: denied");

        let err = AmalgamateError::OutputCollision {
            path: PathBuf::from("out/a.hpp"),
        };
        assert_eq!(
            format!("{err}"),
            "Header and source would be written to the same file: out/a.hpp"
        );
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;

        let err = AmalgamateError::OutputWriteFailure {
            path: PathBuf::from("out.hpp"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());

        let err = AmalgamateError::MissingInputFile {
            path: PathBuf::from("a.hpp"),
        };
        assert!(err.source().is_none());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: AmalgamateError = io_err.into();
        assert!(matches!(err, AmalgamateError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: AmalgamateError = json_err.into();
        assert!(matches!(err, AmalgamateError::Json(_)));
    }
}
