//! Session directory layout and bootstrap.

use crate::error::CorpusError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    AlreadyExists,
}

/// Create `path` (and missing parents) if absent.
///
/// An existing directory is reported, not treated as an error; an existing
/// non-directory at `path` is an error.
pub fn ensure_dir(path: &Path) -> Result<DirStatus, CorpusError> {
    if path.is_dir() {
        return Ok(DirStatus::AlreadyExists);
    }
    match fs::create_dir_all(path) {
        Ok(()) => Ok(DirStatus::Created),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => {
            Ok(DirStatus::AlreadyExists)
        }
        Err(e) => Err(CorpusError::io(path, e)),
    }
}

pub(crate) fn create_parent(path: &Path) -> Result<(), CorpusError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent).map(|_| ()),
        _ => Ok(()),
    }
}

/// Directories of one benchmark session, rooted at the working directory
/// the external collaborators are run from.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub const GRIDS: &'static str = "grids";
    pub const DICTIONARIES: &'static str = "dics";
    pub const PLOTS: &'static str = "plots";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn grids(&self) -> PathBuf {
        self.root.join(Self::GRIDS)
    }

    pub fn dictionaries(&self) -> PathBuf {
        self.root.join(Self::DICTIONARIES)
    }

    pub fn plots(&self) -> PathBuf {
        self.root.join(Self::PLOTS)
    }

    /// Resolve a root-relative path.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    pub fn bootstrap(&self) -> Result<Vec<(PathBuf, DirStatus)>, CorpusError> {
        [self.grids(), self.dictionaries(), self.plots()]
            .into_iter()
            .map(|dir| ensure_dir(&dir).map(|status| (dir, status)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("a").join("b");
        assert_eq!(ensure_dir(&dir).unwrap(), DirStatus::Created);
        assert_eq!(ensure_dir(&dir).unwrap(), DirStatus::AlreadyExists);
    }

    #[test]
    fn ensure_dir_rejects_file_in_the_way() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("plots");
        fs::write(&file, "not a dir").unwrap();
        assert!(matches!(ensure_dir(&file), Err(CorpusError::Io { .. })));
    }

    #[test]
    fn bootstrap_creates_session_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(tmp.path());
        let created = layout.bootstrap().unwrap();
        assert_eq!(created.len(), 3);
        assert!(created.iter().all(|(_, s)| *s == DirStatus::Created));
        assert!(layout.plots().is_dir());

        let again = layout.bootstrap().unwrap();
        assert!(again.iter().all(|(_, s)| *s == DirStatus::AlreadyExists));
    }
}
