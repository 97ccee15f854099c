use std::fs::{self, File};
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// A per-file failure recorded during a batch operation.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub(crate) struct FileError {
    pub path: String,
    pub error: String,
}

impl FileError {
    pub(crate) fn new(path: &Path, error: &impl std::fmt::Display) -> Self {
        Self {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}

/// Root-relative path joined with `/`, independent of the host separator.
pub(crate) fn relative_path_str(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    normalize_archive_path(relative)
}

pub(crate) fn normalize_archive_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Streams the file through SHA-256 and returns the lowercase hex digest.
pub(crate) fn compute_file_sha256(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("opening {} for hashing", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Writes `lines` joined by newlines, without a trailing newline.
pub(crate) fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(path, lines.join("\n")).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = PathBuf::from("/venv/site-packages");
        let file = root.join("pkg").join("sub").join("mod.pyd");
        assert_eq!(relative_path_str(&file, &root), "pkg/sub/mod.pyd");
    }

    #[test]
    fn sha256_matches_known_digest() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("hello.txt");
        fs::write(&path, b"hello")?;
        assert_eq!(
            compute_file_sha256(&path)?,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        Ok(())
    }

    #[test]
    fn write_lines_creates_parents() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out").join("list.txt");
        write_lines(&path, &["a".to_string(), "b".to_string()])?;
        assert_eq!(fs::read_to_string(&path)?, "a\nb");
        Ok(())
    }
}
