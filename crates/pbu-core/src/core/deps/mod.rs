//! Transitive dependency listing backed by `pipdeptree`.

mod pipdeptree;
mod tree;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::json;

use crate::core::filter::{compile_filter, passes};
use crate::core::fs::write_lines;
use crate::tooling::missing_file;
use crate::{CommandContext, ExecutionOutcome};

pub use pipdeptree::UnsafeCommandError;
pub use tree::DependencyNode;

use pipdeptree::load_installed_tree;
use tree::{collect_dependency_names, find_package_node, parse_tree, render_tree};

#[derive(Clone, Debug, Default)]
pub struct CollectDependenciesRequest {
    pub package: Option<String>,
    pub output: Option<PathBuf>,
    /// Reads a captured `pipdeptree --json-tree` document instead of running it.
    pub from_json: Option<PathBuf>,
    pub regex: Option<String>,
}

/// Lists every package the requested package depends on, directly or not.
///
/// # Errors
/// Returns an error if the dependency list cannot be written to `output`.
pub fn collect_dependencies(
    ctx: &CommandContext,
    request: &CollectDependenciesRequest,
) -> Result<ExecutionOutcome> {
    let Some(package) = request.package.as_deref().filter(|p| !p.trim().is_empty()) else {
        return Ok(ExecutionOutcome::user_error(
            "Please provide a package name using --package.",
            json!({ "hint": "pass --package NAME" }),
        ));
    };
    let filter = match compile_filter(request.regex.as_deref()) {
        Ok(filter) => filter,
        Err(outcome) => return Ok(outcome),
    };

    tracing::info!(package, "collecting dependencies");
    let tree = match &request.from_json {
        Some(path) => match load_captured_tree(path) {
            Ok(tree) => tree,
            Err(outcome) => return Ok(outcome),
        },
        None => match load_installed_tree(ctx) {
            Ok(tree) => tree,
            Err(outcome) => return Ok(outcome),
        },
    };

    let Some(node) = find_package_node(&tree, package) else {
        return Ok(ExecutionOutcome::success(
            format!("Package '{package}' not found in the environment."),
            json!({ "package": package, "found": false, "dependencies": [], "tree": [] }),
        ));
    };

    let names: Vec<String> = collect_dependency_names(&node.dependencies)
        .into_iter()
        .filter(|name| passes(filter.as_ref(), name))
        .collect();
    let lines = render_tree(&node.dependencies);
    tracing::debug!(package, count = names.len(), "resolved dependencies");

    if let Some(output) = &request.output {
        if names.is_empty() {
            tracing::info!(path = %output.display(), "no dependencies to write");
        } else {
            write_lines(output, &names)?;
            tracing::info!(path = %output.display(), "wrote dependency list");
        }
    }

    let message = if names.is_empty() {
        format!("No dependencies found for {package}.")
    } else {
        format!("Dependencies for {package}:")
    };
    Ok(ExecutionOutcome::success(
        message,
        json!({
            "package": node.key,
            "found": true,
            "version": node.installed_version,
            "dependencies": names,
            "tree": lines,
            "output": request.output.as_ref().map(|p| p.display().to_string()),
        }),
    ))
}

fn load_captured_tree(path: &Path) -> Result<Vec<DependencyNode>, ExecutionOutcome> {
    if !path.is_file() {
        return Err(missing_file(
            path,
            "capture one with `python -m pipdeptree --json-tree > deps.json`",
        ));
    }
    let body = fs::read_to_string(path).map_err(|err| {
        ExecutionOutcome::failure(
            format!("could not read {}", path.display()),
            json!({ "reason": err.to_string() }),
        )
    })?;
    parse_tree(&body).map_err(|err| {
        ExecutionOutcome::user_error(
            format!("{} is not a pipdeptree JSON tree", path.display()),
            json!({ "reason": err.to_string() }),
        )
    })
}
