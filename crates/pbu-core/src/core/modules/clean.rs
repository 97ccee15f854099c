use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use serde_json::json;
use walkdir::WalkDir;

use super::site::resolve_site_packages;
use crate::core::filter::{compile_filter, passes};
use crate::core::fs::{relative_path_str, FileError};
use crate::tooling::batch_outcome;
use crate::{CommandContext, ExecutionOutcome};

/// Build leftovers removed from an environment, in removal order.
const CLEAN_EXTENSIONS: [&str; 2] = [".pyd", ".c"];

#[derive(Clone, Debug, Default)]
pub struct CleanModulesRequest {
    pub venv_path: Option<PathBuf>,
    pub regex: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct ExtensionReport {
    pub extension: &'static str,
    /// Files with this extension, before filtering.
    pub found: usize,
    pub removed: Vec<String>,
    pub errors: Vec<FileError>,
    pub summary: String,
}

/// Deletes compiled extensions and generated C sources from an environment.
///
/// # Errors
/// Never fails for per-file problems; those are recorded in the outcome.
pub fn clean_pyd_modules(
    ctx: &CommandContext,
    request: &CleanModulesRequest,
) -> Result<ExecutionOutcome> {
    let filter = match compile_filter(request.regex.as_deref()) {
        Ok(filter) => filter,
        Err(outcome) => return Ok(outcome),
    };
    let site = match resolve_site_packages(ctx, request.venv_path.as_deref()) {
        Ok(site) => site,
        Err(err) => return Ok(err.into_outcome()),
    };

    let reports: Vec<ExtensionReport> = CLEAN_EXTENSIONS
        .iter()
        .map(|&extension| {
            clean_by_extension(
                &site,
                extension,
                filter.as_ref(),
                request.regex.as_deref(),
                request.dry_run,
            )
        })
        .collect();

    let errors: Vec<FileError> = reports
        .iter()
        .flat_map(|report| report.errors.iter().cloned())
        .collect();
    let message = reports
        .iter()
        .map(|report| report.summary.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    Ok(batch_outcome(
        message,
        json!({
            "site_packages": site.display().to_string(),
            "regex": request.regex,
            "dry_run": request.dry_run,
            "extensions": reports,
        }),
        &errors,
    ))
}

pub(crate) fn clean_by_extension(
    root: &Path,
    extension: &'static str,
    filter: Option<&Regex>,
    pattern: Option<&str>,
    dry_run: bool,
) -> ExtensionReport {
    let candidates: Vec<(PathBuf, String)> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .to_ascii_lowercase()
                .ends_with(extension)
        })
        .map(|entry| {
            let relative = relative_path_str(entry.path(), root);
            (entry.into_path(), relative)
        })
        .collect();

    let mut report = ExtensionReport {
        extension,
        found: candidates.len(),
        ..ExtensionReport::default()
    };
    for (path, relative) in candidates {
        if !passes(filter, &relative) {
            continue;
        }
        if dry_run {
            tracing::info!(path = %path.display(), "would remove");
            report.removed.push(path.display().to_string());
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "removed");
                report.removed.push(path.display().to_string());
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to remove");
                report.errors.push(FileError::new(&path, &err));
            }
        }
    }
    report.summary = summarize(&report, root, pattern, dry_run);
    report
}

fn summarize(report: &ExtensionReport, root: &Path, pattern: Option<&str>, dry_run: bool) -> String {
    let glob = format!("*{}", report.extension);
    if report.found == 0 {
        return format!("No {glob} files found in {}.", root.display());
    }
    if report.removed.is_empty() && report.errors.is_empty() {
        if let Some(pattern) = pattern {
            return format!(
                "No {glob} files with '{pattern}' filter found in {}.",
                root.display()
            );
        }
    }
    let verb = if dry_run { "Would remove" } else { "Removed" };
    format!(
        "{verb} {} {glob} file{} from {}.",
        report.removed.len(),
        if report.removed.len() == 1 { "" } else { "s" },
        root.display()
    )
}
