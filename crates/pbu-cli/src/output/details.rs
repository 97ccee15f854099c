use pbu_core::CommandGroup;
use serde_json::Value;

pub(super) fn hint_from_details(details: &Value) -> Option<&str> {
    details
        .as_object()
        .and_then(|map| map.get("hint"))
        .and_then(Value::as_str)
}

pub(super) fn output_from_details<'a>(details: &'a Value, key: &str) -> Option<&'a str> {
    details
        .as_object()
        .and_then(|map| map.get(key))
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

fn strings<'a>(details: &'a Value, key: &str) -> impl Iterator<Item = &'a str> {
    details
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

fn dry_run(details: &Value) -> bool {
    details.get("dry_run").and_then(Value::as_bool) == Some(true)
}

/// Per-item lines printed after the status line.
pub(super) fn detail_lines(group: CommandGroup, details: &Value) -> Vec<String> {
    match group {
        CommandGroup::CollectPydModules => strings(details, "modules").map(str::to_string).collect(),
        CommandGroup::CollectDepModules => {
            let mut lines: Vec<String> = strings(details, "tree").map(str::to_string).collect();
            let written = details
                .get("dependencies")
                .and_then(Value::as_array)
                .is_some_and(|deps| !deps.is_empty());
            if written {
                if let Some(output) = output_from_details(details, "output") {
                    lines.push(format!("Dependencies written to {output}"));
                }
            }
            lines
        }
        CommandGroup::CleanPydModules => {
            let verb = if dry_run(details) { "Would remove" } else { "Removing" };
            details
                .get("extensions")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .flat_map(|report| strings(report, "removed"))
                .map(|path| format!("{verb} {path}"))
                .collect()
        }
        CommandGroup::RemoveTarballs => {
            let verb = if dry_run(details) { "Would remove" } else { "Removed" };
            strings(details, "removed")
                .map(|path| format!("{verb} {path}"))
                .collect()
        }
        CommandGroup::RenameWheelFiles => details
            .get("renamed")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|entry| {
                let from = entry.get("from").and_then(Value::as_str)?;
                let to = entry.get("to").and_then(Value::as_str)?;
                Some(format!("Renamed {from} -> {to}"))
            })
            .collect(),
        CommandGroup::Pyd2Wheel => Vec::new(),
    }
}

/// `path: error` for every per-file failure recorded by a batch command.
pub(super) fn error_lines(details: &Value) -> Vec<String> {
    details
        .get("errors")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            let path = entry.get("path").and_then(Value::as_str)?;
            let error = entry.get("error").and_then(Value::as_str)?;
            Some(format!("{path}: {error}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_lines_follow_dry_run_flag() {
        let details = json!({
            "dry_run": true,
            "extensions": [
                { "extension": ".pyd", "removed": ["/site/a.pyd"] },
                { "extension": ".c", "removed": ["/site/a.c"] },
            ],
        });
        assert_eq!(
            detail_lines(CommandGroup::CleanPydModules, &details),
            vec!["Would remove /site/a.pyd", "Would remove /site/a.c"]
        );
    }

    #[test]
    fn dependency_lines_mention_output_file() {
        let details = json!({
            "tree": ["  - dep1 (1.0)"],
            "dependencies": ["dep1"],
            "output": "deps.txt",
        });
        assert_eq!(
            detail_lines(CommandGroup::CollectDepModules, &details),
            vec!["  - dep1 (1.0)", "Dependencies written to deps.txt"]
        );
    }

    #[test]
    fn missing_keys_render_nothing() {
        assert!(detail_lines(CommandGroup::RenameWheelFiles, &json!({})).is_empty());
        assert!(error_lines(&Value::Null).is_empty());
    }
}
