use std::path::{Path, PathBuf};

use glob::Pattern;
use serde_json::json;

use crate::{CommandContext, ExecutionOutcome};

#[derive(Debug, thiserror::Error)]
pub enum EnvironmentRootError {
    #[error("Path '{}' does not exist or is not a directory.", .0.display())]
    InvalidPath(PathBuf),
    #[error("Could not locate site-packages in the current environment.")]
    NotFound,
    #[error("could not inspect the current interpreter: {0:#}")]
    Probe(anyhow::Error),
}

impl EnvironmentRootError {
    /// A missing site-packages entry is informational; a bad path is a user
    /// error and a failed probe is a command failure.
    pub(crate) fn into_outcome(self) -> ExecutionOutcome {
        let message = self.to_string();
        match self {
            EnvironmentRootError::InvalidPath(path) => ExecutionOutcome::user_error(
                message,
                json!({
                    "venv_path": path.display().to_string(),
                    "hint": "pass the root of an existing virtual environment",
                }),
            ),
            EnvironmentRootError::NotFound => ExecutionOutcome::success(
                message,
                json!({ "hint": "pass --venv-path to point at an environment explicitly" }),
            ),
            EnvironmentRootError::Probe(_) => ExecutionOutcome::failure(
                message,
                json!({ "hint": "pass --python or set PBU_PYTHON to a working interpreter" }),
            ),
        }
    }
}

/// Resolves the site-packages directory to scan.
///
/// An explicit root must be an existing directory; within it the first of
/// `Lib/site-packages` and `lib/python*/site-packages` is used, falling back to
/// the root itself. Without a root, the interpreter's `sys.path` is searched
/// for the configured site marker.
pub(crate) fn resolve_site_packages(
    ctx: &CommandContext,
    venv_path: Option<&Path>,
) -> Result<PathBuf, EnvironmentRootError> {
    match venv_path {
        Some(root) => site_packages_under(root),
        None => {
            let info = ctx
                .interpreter_info()
                .map_err(EnvironmentRootError::Probe)?;
            info.site_packages(&ctx.config().site().marker)
                .map(PathBuf::from)
                .ok_or(EnvironmentRootError::NotFound)
        }
    }
}

pub(crate) fn site_packages_under(root: &Path) -> Result<PathBuf, EnvironmentRootError> {
    if !root.is_dir() {
        return Err(EnvironmentRootError::InvalidPath(root.to_path_buf()));
    }
    let windows = root.join("Lib").join("site-packages");
    if windows.is_dir() {
        return Ok(windows);
    }
    let pattern = format!(
        "{}/lib/python*/site-packages",
        Pattern::escape(&root.to_string_lossy())
    );
    if let Ok(paths) = glob::glob(&pattern) {
        let mut candidates: Vec<PathBuf> = paths.flatten().filter(|p| p.is_dir()).collect();
        candidates.sort();
        if let Some(first) = candidates.into_iter().next() {
            return Ok(first);
        }
    }
    tracing::debug!(root = %root.display(), "no site-packages layout found; scanning root");
    Ok(root.to_path_buf())
}
