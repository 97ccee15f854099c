use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use serde_json::json;

use crate::core::fs::FileError;
use crate::tooling::batch_outcome;
use crate::{CommandContext, ExecutionOutcome};

#[derive(Clone, Debug)]
pub struct RemoveTarballsRequest {
    pub dist_dir: PathBuf,
    pub dry_run: bool,
}

impl Default for RemoveTarballsRequest {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from("dist"),
            dry_run: false,
        }
    }
}

/// Deletes source archives (`*.tar.gz`) left in a build output directory.
///
/// # Errors
/// Returns an error if the directory path cannot be turned into a glob.
pub fn remove_tarballs(
    _ctx: &CommandContext,
    request: &RemoveTarballsRequest,
) -> Result<ExecutionOutcome> {
    let dist_dir = &request.dist_dir;
    let tarballs = find_tarballs(dist_dir)?;
    if tarballs.is_empty() {
        tracing::info!(dist_dir = %dist_dir.display(), "no tarball files found");
        return Ok(ExecutionOutcome::success(
            format!("No tarball files found in {}.", dist_dir.display()),
            json!({
                "dist_dir": dist_dir.display().to_string(),
                "removed": [],
                "errors": [],
            }),
        ));
    }

    let mut removed = Vec::new();
    let mut errors = Vec::new();
    for tarball in tarballs {
        if request.dry_run {
            tracing::info!(path = %tarball.display(), "would remove tarball");
            removed.push(tarball.display().to_string());
            continue;
        }
        match fs::remove_file(&tarball) {
            Ok(()) => {
                tracing::info!(path = %tarball.display(), "removed tarball");
                removed.push(tarball.display().to_string());
            }
            Err(err) => {
                tracing::warn!(path = %tarball.display(), error = %err, "failed to remove tarball");
                errors.push(FileError::new(&tarball, &err));
            }
        }
    }

    let verb = if request.dry_run { "would remove" } else { "removed" };
    let message = format!(
        "{verb} {} tarball{}",
        removed.len(),
        if removed.len() == 1 { "" } else { "s" }
    );
    Ok(batch_outcome(
        message,
        json!({
            "dist_dir": dist_dir.display().to_string(),
            "dry_run": request.dry_run,
            "removed": removed,
        }),
        &errors,
    ))
}

fn find_tarballs(dist_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.tar.gz",
        Pattern::escape(&dist_dir.to_string_lossy())
    );
    let mut tarballs: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid tarball pattern {pattern}"))?
        .flatten()
        .filter(|path| path.is_file())
        .collect();
    tarballs.sort();
    Ok(tarballs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tempfile::tempdir;

    use crate::config::{Config, EnvSnapshot};
    use crate::effects::testing::FakePythonRuntime;
    use crate::{CommandStatus, GlobalOptions};

    fn run(request: &RemoveTarballsRequest) -> ExecutionOutcome {
        let global = GlobalOptions::default();
        let config = Config::from_snapshot(&EnvSnapshot::testing(&[]), &global);
        let ctx = CommandContext::with_config(&global, config, Arc::new(FakePythonRuntime::new()));
        remove_tarballs(&ctx, request).expect("remove tarballs")
    }

    #[test]
    fn removes_every_tarball_and_keeps_wheels() -> Result<()> {
        let temp = tempdir()?;
        fs::write(temp.path().join("pkg-1.0.tar.gz"), b"")?;
        fs::write(temp.path().join("pkg-1.1.tar.gz"), b"")?;
        fs::write(temp.path().join("pkg-1.1-py3-none-any.whl"), b"")?;

        let outcome = run(&RemoveTarballsRequest {
            dist_dir: temp.path().to_path_buf(),
            dry_run: false,
        });
        assert_eq!(outcome.status, CommandStatus::Ok);
        assert_eq!(outcome.message, "removed 2 tarballs");
        assert!(find_tarballs(temp.path())?.is_empty());
        assert!(temp.path().join("pkg-1.1-py3-none-any.whl").exists());
        Ok(())
    }

    #[test]
    fn dry_run_lists_without_deleting() -> Result<()> {
        let temp = tempdir()?;
        let tarball = temp.path().join("pkg-1.0.tar.gz");
        fs::write(&tarball, b"")?;
        let outcome = run(&RemoveTarballsRequest {
            dist_dir: temp.path().to_path_buf(),
            dry_run: true,
        });
        assert!(tarball.exists());
        assert_eq!(outcome.details["removed"][0], tarball.display().to_string());
        Ok(())
    }

    #[test]
    fn empty_or_missing_directory_reports_no_tarballs() -> Result<()> {
        let temp = tempdir()?;
        for dist_dir in [temp.path().to_path_buf(), temp.path().join("missing")] {
            let outcome = run(&RemoveTarballsRequest {
                dist_dir,
                dry_run: false,
            });
            assert_eq!(outcome.status, CommandStatus::Ok);
            assert!(outcome.message.starts_with("No tarball files found"));
        }
        Ok(())
    }
}
