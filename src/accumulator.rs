use crate::error::Result;
use crate::fs_utils::{display_relative, read_input_file, write_output};
use std::path::{Path, PathBuf};

/// Width of the `/` run in file markers
const MARKER_WIDTH: usize = 70;

/// Ordered, append-only text buffer for one output artifact.
///
/// Every stored block ends with a newline. Relative file paths given to
/// [`Accumulator::add_file`] are resolved against the root the accumulator
/// was created with.
#[derive(Debug, Clone)]
pub struct Accumulator {
    top_dir: PathBuf,
    blocks: Vec<String>,
}

impl Accumulator {
    pub fn new(top_dir: impl Into<PathBuf>) -> Self {
        Self {
            top_dir: top_dir.into(),
            blocks: Vec::new(),
        }
    }

    /// Appends `text` as one block, adding a trailing newline if missing.
    pub fn add_text(&mut self, text: impl Into<String>) {
        let mut text = text.into();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        self.blocks.push(text);
    }

    /// Appends the content of `relative_path` between begin and end markers.
    ///
    /// With `wrap_in_comment` the content is enclosed in `/*` and `*/`.
    ///
    /// # Errors
    ///
    /// - `AmalgamateError::MissingInputFile` if the file doesn't exist.
    /// - `AmalgamateError::ReadFailure` if it can't be read as text.
    pub fn add_file(&mut self, relative_path: &str, wrap_in_comment: bool) -> Result<()> {
        let mut content = read_input_file(&self.top_dir.join(relative_path))?;
        if wrap_in_comment {
            content = format!("/*\n{content}\n*/");
        }

        let shown = display_relative(relative_path);
        self.add_marker("Beginning", &shown);
        self.add_text(content);
        self.add_marker("End", &shown);
        self.add_text("\n\n\n\n");
        Ok(())
    }

    fn add_marker(&mut self, prefix: &str, shown_path: &str) {
        let rule = format!("// {}", "/".repeat(MARKER_WIDTH));
        self.add_text("");
        self.add_text(rule.clone());
        self.add_text(format!("// {prefix} of content of file: {shown_path}"));
        self.add_text(rule);
        self.add_text("");
    }

    /// Concatenates all blocks, normalizing `\r\n` to `\n`.
    pub fn get_value(&self) -> String {
        self.blocks.concat().replace("\r\n", "\n")
    }

    /// Writes the serialized value as UTF-8 to `output_path`.
    ///
    /// # Errors
    ///
    /// Returns `AmalgamateError::OutputWriteFailure` if the parent directory
    /// can't be created or the file can't be written.
    pub fn write_to(&self, output_path: &Path) -> Result<()> {
        write_output(output_path, self.get_value().as_bytes())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Begin-marker text for `relative_path` as it appears in an artifact.
pub fn begin_marker(relative_path: &str) -> String {
    format!(
        "// Beginning of content of file: {}",
        display_relative(relative_path)
    )
}

/// End-marker text for `relative_path` as it appears in an artifact.
pub fn end_marker(relative_path: &str) -> String {
    format!(
        "// End of content of file: {}",
        display_relative(relative_path)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AmalgamateError;
    use std::fs;
    use tempfile::TempDir;

    fn rule() -> String {
        format!("// {}\n", "/".repeat(MARKER_WIDTH))
    }

    #[test]
    fn test_add_text_appends_newline() {
        let mut acc = Accumulator::new(".");
        acc.add_text("#pragma once");
        acc.add_text("#define X\n");
        acc.add_text("");
        assert_eq!(acc.len(), 3);
        assert_eq!(acc.get_value(), "#pragma once\n#define X\n\n");
    }

    #[test]
    fn test_add_text_keeps_existing_blank_lines() {
        let mut acc = Accumulator::new(".");
        acc.add_text("\n\n\n\n");
        assert_eq!(acc.get_value(), "\n\n\n\n");
    }

    #[test]
    fn test_add_file_markers() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.hpp"), "struct A;").unwrap();

        let mut acc = Accumulator::new(temp_dir.path());
        acc.add_file("a.hpp", false).unwrap();

        let expected = format!(
            "\n{rule}// Beginning of content of file: a.hpp\n{rule}\nstruct A;\n\n{rule}// End of content of file: a.hpp\n{rule}\n\n\n\n\n",
            rule = rule()
        );
        assert_eq!(acc.get_value(), expected);
    }

    #[test]
    fn test_add_file_wrap_in_comment() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("LICENSE"), "Copyright someone\n").unwrap();

        let mut acc = Accumulator::new(temp_dir.path());
        acc.add_file("LICENSE", true).unwrap();

        let value = acc.get_value();
        assert!(value.contains("/*\nCopyright someone\n\n*/\n"));
        let begin = value.find(&begin_marker("LICENSE")).unwrap();
        let open = value.find("/*").unwrap();
        let end = value.find(&end_marker("LICENSE")).unwrap();
        assert!(begin < open && open < end);
    }

    #[test]
    fn test_add_file_nested_path_normalized() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("arbiter/drivers")).unwrap();
        fs::write(temp_dir.path().join("arbiter/drivers/fs.hpp"), "// fs").unwrap();

        let mut acc = Accumulator::new(temp_dir.path());
        acc.add_file("arbiter/drivers/fs.hpp", false).unwrap();

        let value = acc.get_value();
        assert!(value.contains("// Beginning of content of file: arbiter/drivers/fs.hpp\n"));
        assert!(value.contains("// End of content of file: arbiter/drivers/fs.hpp\n"));
        assert_eq!(begin_marker("arbiter\\drivers\\fs.hpp"), begin_marker("arbiter/drivers/fs.hpp"));
    }

    #[test]
    fn test_add_file_backslash_path() {
        let temp_dir = TempDir::new().unwrap();
        // A nested path on Windows, a single file name elsewhere
        fs::create_dir_all(temp_dir.path().join("arbiter")).unwrap();
        fs::write(temp_dir.path().join("arbiter\\util.hpp"), "// util").unwrap();

        let mut acc = Accumulator::new(temp_dir.path());
        acc.add_file("arbiter\\util.hpp", false).unwrap();

        let value = acc.get_value();
        assert!(value.contains("// Beginning of content of file: arbiter/util.hpp\n"));
        assert!(value.contains("// End of content of file: arbiter/util.hpp\n"));
        assert!(!value.contains('\\'));
    }

    #[test]
    fn test_add_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let mut acc = Accumulator::new(temp_dir.path());

        let result = acc.add_file("a.cpp", false);
        match result {
            Err(AmalgamateError::MissingInputFile { path }) => {
                assert!(path.ends_with("a.cpp"));
            }
            other => panic!("expected MissingInputFile, got {other:?}"),
        }
        assert!(acc.is_empty());
    }

    #[test]
    fn test_get_value_normalizes_crlf() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("win.hpp"), "line one\r\nline two\r\n").unwrap();

        let mut acc = Accumulator::new(temp_dir.path());
        acc.add_text("banner\r\n");
        acc.add_file("win.hpp", false).unwrap();

        let value = acc.get_value();
        assert!(!value.contains("\r\n"));
        assert!(value.starts_with("banner\n"));
        assert!(value.contains("line one\nline two\n"));
    }

    #[test]
    fn test_write_to() {
        let temp_dir = TempDir::new().unwrap();
        let mut acc = Accumulator::new(temp_dir.path());
        acc.add_text("#pragma once");

        let out = temp_dir.path().join("dist/arbiter.hpp");
        acc.write_to(&out).unwrap();
        assert_eq!(fs::read(&out).unwrap(), b"#pragma once\n");
    }
}
