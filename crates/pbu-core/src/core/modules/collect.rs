use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use walkdir::WalkDir;

use super::names::module_name_from_relative;
use super::site::resolve_site_packages;
use crate::core::filter::{compile_filter, passes};
use crate::core::fs::{relative_path_str, write_lines};
use crate::{CommandContext, ExecutionOutcome};

/// Which installed files count as modules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKind {
    Pyd,
    So,
    Py,
    /// Windows and POSIX extension modules.
    #[default]
    Compiled,
    /// Extension modules plus pure-Python sources.
    All,
}

impl ModuleKind {
    #[must_use]
    pub fn suffixes(self) -> &'static [&'static str] {
        match self {
            ModuleKind::Pyd => &[".pyd"],
            ModuleKind::So => &[".so"],
            ModuleKind::Py => &[".py"],
            ModuleKind::Compiled => &[".pyd", ".so"],
            ModuleKind::All => &[".pyd", ".so", ".py"],
        }
    }

    fn accepts(self, file_name: &str) -> bool {
        let lowered = file_name.to_ascii_lowercase();
        self.suffixes()
            .iter()
            .any(|suffix| lowered.ends_with(suffix))
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModuleKind::Pyd => "pyd",
            ModuleKind::So => "so",
            ModuleKind::Py => "py",
            ModuleKind::Compiled => "compiled",
            ModuleKind::All => "all",
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct CollectModulesRequest {
    pub venv_path: Option<PathBuf>,
    pub regex: Option<String>,
    pub kind: ModuleKind,
    pub output: Option<PathBuf>,
}

/// Lists the dotted names of modules installed in an environment.
///
/// # Errors
/// Returns an error if the module list cannot be written to `output`.
pub fn collect_pyd_modules(
    ctx: &CommandContext,
    request: &CollectModulesRequest,
) -> Result<ExecutionOutcome> {
    let filter = match compile_filter(request.regex.as_deref()) {
        Ok(filter) => filter,
        Err(outcome) => return Ok(outcome),
    };
    let site = match resolve_site_packages(ctx, request.venv_path.as_deref()) {
        Ok(site) => site,
        Err(err) => return Ok(err.into_outcome()),
    };

    let modules = collect_modules(&site, request.kind, filter.as_ref());
    tracing::info!(
        site = %site.display(),
        kind = %request.kind,
        count = modules.len(),
        "collected modules"
    );

    if let Some(output) = &request.output {
        if modules.is_empty() {
            tracing::info!(path = %output.display(), "no modules to write");
        } else {
            write_lines(output, &modules)?;
            tracing::info!(path = %output.display(), "wrote module list");
        }
    }

    let message = if modules.is_empty() {
        match &request.regex {
            Some(pattern) => format!(
                "No modules matching '{pattern}' found in {}.",
                site.display()
            ),
            None => format!("No modules found in {}.", site.display()),
        }
    } else {
        format!(
            "found {} module{} in {}",
            modules.len(),
            if modules.len() == 1 { "" } else { "s" },
            site.display()
        )
    };
    Ok(ExecutionOutcome::success(
        message,
        json!({
            "site_packages": site.display().to_string(),
            "kind": request.kind,
            "regex": request.regex,
            "modules": modules,
            "output": request.output.as_ref().map(|p| p.display().to_string()),
        }),
    ))
}

/// Walks `root` and returns the sorted, unique module names of every file
/// accepted by `kind` whose name passes `filter`.
pub(crate) fn collect_modules(root: &Path, kind: ModuleKind, filter: Option<&Regex>) -> Vec<String> {
    let mut modules = BTreeSet::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !kind.accepts(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let relative = relative_path_str(entry.path(), root);
        let Some(name) = module_name_from_relative(&relative) else {
            continue;
        };
        if passes(filter, &name) {
            tracing::debug!(module = %name, path = %relative, "found module");
            modules.insert(name);
        }
    }
    modules.into_iter().collect()
}
