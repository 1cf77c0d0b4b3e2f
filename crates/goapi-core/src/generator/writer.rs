//! Output file writing

use crate::error::GenerateError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Mode for regular files: rw-r--r--
pub const MODE_REGULAR: u32 = 0o644;
/// Mode for shell scripts: rwxr-xr-x
pub const MODE_EXECUTABLE: u32 = 0o755;

/// File mode for an output path; shell scripts are executable
pub fn mode_for(relative_path: &str) -> u32 {
    if relative_path.ends_with(".sh") {
        MODE_EXECUTABLE
    } else {
        MODE_REGULAR
    }
}

/// Writes files beneath an output directory
///
/// There is no rollback: a failed run leaves whatever was already written.
#[derive(Debug, Clone)]
pub struct FileWriter {
    root: PathBuf,
}

impl FileWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a slash-delimited relative path
    pub fn resolve(&self, relative_path: &str) -> PathBuf {
        relative_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    /// Create a directory (and its parents) beneath the root
    pub async fn create_dir(&self, relative_path: &str) -> Result<PathBuf, GenerateError> {
        let path = self.resolve(relative_path);
        fs::create_dir_all(&path)
            .await
            .map_err(|source| GenerateError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    /// Write `content` to `relative_path`, creating parent directories
    pub async fn write(&self, relative_path: &str, content: &[u8]) -> Result<PathBuf, GenerateError> {
        let path = self.resolve(relative_path);
        let write_error = |source| GenerateError::Write {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(write_error)?;
        }

        fs::write(&path, content).await.map_err(write_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(mode_for(relative_path));
            fs::set_permissions(&path, permissions)
                .await
                .map_err(write_error)?;
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_for_scripts() {
        assert_eq!(mode_for("scripts/deploy.sh"), MODE_EXECUTABLE);
        assert_eq!(mode_for("scripts/README.md"), MODE_REGULAR);
        assert_eq!(mode_for("go.mod"), MODE_REGULAR);
    }

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path());

        let path = writer
            .write("grafana/provisioning/datasources/prometheus.yml", b"x: 1\n")
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("grafana/provisioning/datasources/prometheus.yml"));
        assert_eq!(std::fs::read(&path).unwrap(), b"x: 1\n");
    }

    #[tokio::test]
    async fn test_create_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path());

        writer.create_dir("cmd/api").await.unwrap();
        writer.create_dir("cmd/api").await.unwrap();
        assert!(dir.path().join("cmd/api").is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_scripts_are_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path());

        let script = writer.write("scripts/generate.sh", b"#!/bin/sh\n").await.unwrap();
        let readme = writer.write("README.md", b"# hi\n").await.unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&script), MODE_EXECUTABLE);
        assert_eq!(mode(&readme), MODE_REGULAR);
    }

    #[tokio::test]
    async fn test_write_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Makefile")).unwrap();
        let writer = FileWriter::new(dir.path());

        let err = writer.write("Makefile", b"all:\n").await.unwrap_err();
        match err {
            GenerateError::Write { path, .. } => assert_eq!(path, dir.path().join("Makefile")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
