use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

use crate::core::fs::FileError;
use crate::tooling::batch_outcome;
use crate::{CommandContext, ExecutionOutcome};

/// Suffix of the platform-independent wheels produced by a pure build.
const PURE_WHEEL_SUFFIX: &str = "py3-none-any.whl";

#[derive(Clone, Debug)]
pub struct RenameWheelRequest {
    pub dist_dir: PathBuf,
    pub python_tag: Option<String>,
    pub platform_tag: Option<String>,
    /// Replaces the whole `{py}-{py}-{platform}` tag when set.
    pub wheel_tag: Option<String>,
}

impl Default for RenameWheelRequest {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from("dist"),
            python_tag: None,
            platform_tag: None,
            wheel_tag: None,
        }
    }
}

/// Retags pure wheels in `dist_dir` for the target interpreter and platform.
///
/// # Errors
/// Returns an error if the directory cannot be listed or the interpreter
/// probe needed for a default tag fails.
pub fn rename_wheel_files(
    ctx: &CommandContext,
    request: &RenameWheelRequest,
) -> Result<ExecutionOutcome> {
    let wheels = matching_wheels(&request.dist_dir)?;
    if wheels.is_empty() {
        tracing::info!(dist_dir = %request.dist_dir.display(), "no matching wheel files");
        return Ok(ExecutionOutcome::success(
            format!("No matching wheel files found in {}.", request.dist_dir.display()),
            json!({
                "dist_dir": request.dist_dir.display().to_string(),
                "renamed": [],
                "errors": [],
            }),
        ));
    }

    let tag = resolve_build_tag(ctx, request)?;
    let mut renamed = Vec::new();
    let mut errors = Vec::new();
    for wheel in wheels {
        let Some(target) = retagged_path(&wheel, &tag) else {
            continue;
        };
        if target.exists() {
            tracing::warn!(target = %target.display(), "rename target already exists");
            errors.push(FileError {
                path: wheel.display().to_string(),
                error: format!("target {} already exists", target.display()),
            });
            continue;
        }
        match fs::rename(&wheel, &target) {
            Ok(()) => {
                tracing::info!(from = %wheel.display(), to = %target.display(), "renamed wheel");
                renamed.push(json!({
                    "from": wheel.display().to_string(),
                    "to": target.display().to_string(),
                }));
            }
            Err(err) => {
                tracing::warn!(path = %wheel.display(), error = %err, "failed to rename wheel");
                errors.push(FileError::new(&wheel, &err));
            }
        }
    }

    let message = format!(
        "renamed {} wheel file{} to {tag}",
        renamed.len(),
        if renamed.len() == 1 { "" } else { "s" }
    );
    Ok(batch_outcome(
        message,
        json!({
            "dist_dir": request.dist_dir.display().to_string(),
            "tag": tag,
            "renamed": renamed,
        }),
        &errors,
    ))
}

/// `{py}-{py}-{platform}`, the tag of a wheel built for one CPython ABI.
pub(crate) fn build_tag(python_tag: &str, platform_tag: &str) -> String {
    format!("{python_tag}-{python_tag}-{platform_tag}")
}

fn resolve_build_tag(ctx: &CommandContext, request: &RenameWheelRequest) -> Result<String> {
    if let Some(tag) = request.wheel_tag.as_deref().filter(|t| !t.is_empty()) {
        return Ok(tag.to_string());
    }
    if let (Some(python), Some(platform)) = (&request.python_tag, &request.platform_tag) {
        return Ok(build_tag(python, platform));
    }
    let info = ctx
        .interpreter_info()
        .context("determining default wheel tags")?;
    let python = request
        .python_tag
        .clone()
        .unwrap_or_else(|| info.python_tag());
    let platform = request
        .platform_tag
        .clone()
        .unwrap_or_else(|| info.platform_tag());
    Ok(build_tag(&python, &platform))
}

fn matching_wheels(dist_dir: &Path) -> Result<Vec<PathBuf>> {
    if !dist_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut wheels: Vec<PathBuf> = fs::read_dir(dist_dir)
        .with_context(|| format!("reading {}", dist_dir.display()))?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with(PURE_WHEEL_SUFFIX))
        })
        .collect();
    wheels.sort();
    Ok(wheels)
}

fn retagged_path(wheel: &Path, tag: &str) -> Option<PathBuf> {
    let name = wheel.file_name()?.to_str()?;
    let prefix = name.strip_suffix(PURE_WHEEL_SUFFIX)?;
    Some(wheel.with_file_name(format!("{prefix}{tag}.whl")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tempfile::tempdir;

    use crate::config::{Config, EnvSnapshot};
    use crate::effects::testing::FakePythonRuntime;
    use crate::{CommandStatus, GlobalOptions};

    fn run_with(runtime: FakePythonRuntime, request: &RenameWheelRequest) -> ExecutionOutcome {
        let global = GlobalOptions::default();
        let config = Config::from_snapshot(&EnvSnapshot::testing(&[]), &global);
        let ctx = CommandContext::with_config(&global, config, Arc::new(runtime));
        rename_wheel_files(&ctx, request).expect("rename")
    }

    fn dist_with(names: &[&str]) -> tempfile::TempDir {
        let temp = tempdir().expect("tempdir");
        for name in names {
            fs::write(temp.path().join(name), b"wheel").expect("write");
        }
        temp
    }

    #[test]
    fn explicit_tags_rename_matching_wheels_only() {
        let dist = dist_with(&["pkg-2.0.0-py3-none-any.whl", "other-1.0-cp311-cp311-win_amd64.whl"]);
        let outcome = run_with(
            FakePythonRuntime::new(),
            &RenameWheelRequest {
                dist_dir: dist.path().to_path_buf(),
                python_tag: Some("cp313".into()),
                platform_tag: Some("linux_x86_64".into()),
                wheel_tag: None,
            },
        );
        assert_eq!(outcome.status, CommandStatus::Ok, "{}", outcome.message);
        assert!(dist.path().join("pkg-2.0.0-cp313-cp313-linux_x86_64.whl").exists());
        assert!(!dist.path().join("pkg-2.0.0-py3-none-any.whl").exists());
        assert!(dist.path().join("other-1.0-cp311-cp311-win_amd64.whl").exists());
    }

    #[test]
    fn wheel_tag_replaces_whole_suffix() {
        let dist = dist_with(&["abc-1.2.3-py3-none-any.whl"]);
        let runtime = FakePythonRuntime::new();
        let outcome = run_with(
            runtime,
            &RenameWheelRequest {
                dist_dir: dist.path().to_path_buf(),
                wheel_tag: Some("cp310-cp310-win_amd64".into()),
                ..RenameWheelRequest::default()
            },
        );
        assert_eq!(outcome.status, CommandStatus::Ok);
        assert!(dist.path().join("abc-1.2.3-cp310-cp310-win_amd64.whl").exists());
    }

    #[test]
    fn defaults_come_from_interpreter_probe() {
        let dist = dist_with(&["example-1.0.0-py3-none-any.whl"]);
        let runtime = FakePythonRuntime::new().respond(
            "-c",
            0,
            r#"{"major": 3, "minor": 12, "platform": "linux-x86_64", "sys_path": []}"#,
        );
        let outcome = run_with(
            runtime,
            &RenameWheelRequest {
                dist_dir: dist.path().to_path_buf(),
                platform_tag: Some("win_amd64".into()),
                ..RenameWheelRequest::default()
            },
        );
        assert_eq!(outcome.details["tag"], "cp312-cp312-win_amd64");
        assert!(dist.path().join("example-1.0.0-cp312-cp312-win_amd64.whl").exists());
    }

    #[test]
    fn existing_target_is_reported_and_batch_continues() {
        let dist = dist_with(&[
            "a-1.0-py3-none-any.whl",
            "a-1.0-custom.whl",
            "b-1.0-py3-none-any.whl",
        ]);
        let outcome = run_with(
            FakePythonRuntime::new(),
            &RenameWheelRequest {
                dist_dir: dist.path().to_path_buf(),
                wheel_tag: Some("custom".into()),
                ..RenameWheelRequest::default()
            },
        );
        assert_eq!(outcome.status, CommandStatus::UserError);
        assert!(dist.path().join("a-1.0-py3-none-any.whl").exists());
        assert!(dist.path().join("b-1.0-custom.whl").exists());
        assert_eq!(outcome.details["errors"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn no_matches_is_not_an_error_and_skips_probe() {
        let dist = dist_with(&["readme.txt"]);
        let runtime = FakePythonRuntime::new();
        let outcome = run_with(
            runtime,
            &RenameWheelRequest {
                dist_dir: dist.path().to_path_buf(),
                ..RenameWheelRequest::default()
            },
        );
        assert_eq!(outcome.status, CommandStatus::Ok);
        assert!(outcome.message.starts_with("No matching wheel files found"));
    }

    #[test]
    fn build_tag_repeats_python_tag() {
        assert_eq!(build_tag("cp39", "win_amd64"), "cp39-cp39-win_amd64");
    }
}
