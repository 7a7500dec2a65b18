use crate::error::{AmalgamateError, Result};
use std::fs;
use std::path::Path;

/// Reads the contents of an input file as UTF-8 text
///
/// # Errors
///
/// - `AmalgamateError::MissingInputFile` if the path doesn't exist or isn't a file.
/// - `AmalgamateError::ReadFailure` if the file exists but can't be read as text.
pub fn read_input_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(AmalgamateError::MissingInputFile {
            path: path.to_path_buf(),
        });
    }

    fs::read_to_string(path).map_err(|source| AmalgamateError::ReadFailure {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `contents` to `path`, creating missing parent directories first.
/// An existing file is truncated.
///
/// # Errors
///
/// Returns `AmalgamateError::OutputWriteFailure` if the directory can't be
/// created or the file can't be written.
pub fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    let failure = |source| AmalgamateError::OutputWriteFailure {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.is_dir()
    {
        fs::create_dir_all(parent).map_err(failure)?;
    }

    fs::write(path, contents).map_err(failure)
}

/// Renders a relative input path the way it appears in markers: `/` separated
/// regardless of host convention.
pub fn display_relative(path: &str) -> String {
    path.replace('\\', "/")
}
