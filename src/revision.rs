//! Best-effort lookup of the repository revision embedded in the header.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a revision could not be determined. Never fatal to a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("revision unavailable from {path}: {reason}")]
pub struct RevisionError {
    pub path: PathBuf,
    pub reason: String,
}

impl RevisionError {
    fn new(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Supplies the revision string for a run
pub trait RevisionSource {
    /// # Errors
    ///
    /// Returns `RevisionError` with the reason the revision is unknown.
    fn read_revision(&self) -> Result<String, RevisionError>;
}

/// Reads the checked-out commit from a `.git` directory
#[derive(Debug, Clone)]
pub struct GitRevision {
    git_dir: PathBuf,
}

impl GitRevision {
    /// Looks for `.git` directly under `top_dir`.
    pub fn new(top_dir: &Path) -> Self {
        Self {
            git_dir: top_dir.join(".git"),
        }
    }

    fn read_trimmed(path: &Path) -> Result<String, RevisionError> {
        let content =
            fs::read_to_string(path).map_err(|e| RevisionError::new(path, e.to_string()))?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(RevisionError::new(path, "file is empty"));
        }
        Ok(trimmed.to_string())
    }

    fn resolve_ref(&self, name: &str) -> Result<String, RevisionError> {
        let loose = self.git_dir.join(name);
        if loose.is_file() {
            return Self::read_trimmed(&loose);
        }

        let packed = self.git_dir.join("packed-refs");
        let content = fs::read_to_string(&packed)
            .map_err(|_| RevisionError::new(&loose, format!("ref {name} not found")))?;
        content
            .lines()
            .filter(|line| !line.starts_with('#') && !line.starts_with('^'))
            .find_map(|line| {
                let (sha, ref_name) = line.split_once(' ')?;
                (ref_name.trim() == name).then(|| sha.to_string())
            })
            .ok_or_else(|| RevisionError::new(&packed, format!("ref {name} not found")))
    }
}

impl RevisionSource for GitRevision {
    fn read_revision(&self) -> Result<String, RevisionError> {
        let head = self.git_dir.join("HEAD");
        if !head.is_file() {
            return self.resolve_ref("refs/heads/master");
        }

        let head = Self::read_trimmed(&head)?;
        match head.strip_prefix("ref:") {
            Some(name) => self.resolve_ref(name.trim()),
            None => Ok(head),
        }
    }
}

/// A revision known up front, e.g. given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedRevision(pub String);

impl FixedRevision {
    pub fn new(revision: impl Into<String>) -> Self {
        Self(revision.into())
    }
}

impl RevisionSource for FixedRevision {
    fn read_revision(&self) -> Result<String, RevisionError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

    fn git_dir(temp_dir: &TempDir) -> PathBuf {
        let dir = temp_dir.path().join(".git");
        fs::create_dir_all(dir.join("refs/heads")).unwrap();
        dir
    }

    #[test]
    fn test_symbolic_head() {
        let temp_dir = TempDir::new().unwrap();
        let git = git_dir(&temp_dir);
        fs::write(git.join("HEAD"), "ref: refs/heads/main\n").unwrap();
        fs::write(git.join("refs/heads/main"), format!("{SHA}\n")).unwrap();

        let revision = GitRevision::new(temp_dir.path()).read_revision();
        assert_eq!(revision.unwrap(), SHA);
    }

    #[test]
    fn test_detached_head() {
        let temp_dir = TempDir::new().unwrap();
        let git = git_dir(&temp_dir);
        fs::write(git.join("HEAD"), format!("{SHA}\n")).unwrap();

        let revision = GitRevision::new(temp_dir.path()).read_revision();
        assert_eq!(revision.unwrap(), SHA);
    }

    #[test]
    fn test_packed_ref() {
        let temp_dir = TempDir::new().unwrap();
        let git = git_dir(&temp_dir);
        fs::write(git.join("HEAD"), "ref: refs/heads/release\n").unwrap();
        fs::write(
            git.join("packed-refs"),
            format!("# pack-refs with: peeled fully-peeled sorted\n{SHA} refs/heads/release\n^ffff\n"),
        )
        .unwrap();

        let revision = GitRevision::new(temp_dir.path()).read_revision();
        assert_eq!(revision.unwrap(), SHA);
    }

    #[test]
    fn test_master_without_head() {
        let temp_dir = TempDir::new().unwrap();
        let git = git_dir(&temp_dir);
        fs::write(git.join("refs/heads/master"), SHA).unwrap();

        let revision = GitRevision::new(temp_dir.path()).read_revision();
        assert_eq!(revision.unwrap(), SHA);
    }

    #[test]
    fn test_no_repository() {
        let temp_dir = TempDir::new().unwrap();
        let err = GitRevision::new(temp_dir.path()).read_revision().unwrap_err();
        assert!(err.path.ends_with("refs/heads/master"));
        assert!(err.to_string().starts_with("revision unavailable from"));
    }

    #[test]
    fn test_dangling_ref() {
        let temp_dir = TempDir::new().unwrap();
        let git = git_dir(&temp_dir);
        fs::write(git.join("HEAD"), "ref: refs/heads/gone\n").unwrap();

        let err = GitRevision::new(temp_dir.path()).read_revision().unwrap_err();
        assert!(err.reason.contains("refs/heads/gone"));
    }

    #[test]
    fn test_fixed_revision() {
        let source = FixedRevision::new("abc123");
        assert_eq!(source.read_revision().unwrap(), "abc123");
    }
}
