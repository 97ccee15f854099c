use std::path::Path;

use serde_json::{json, Value};

use crate::core::fs::FileError;
use crate::ExecutionOutcome;

/// Outcome for a batch that may have recorded per-file errors.
///
/// Any recorded error downgrades the batch to a user error; the details keep
/// the full error list alongside whatever the command reported.
pub(crate) fn batch_outcome(
    message: impl Into<String>,
    mut details: Value,
    errors: &[FileError],
) -> ExecutionOutcome {
    if let Value::Object(map) = &mut details {
        map.insert("errors".to_string(), json!(errors));
    }
    if errors.is_empty() {
        ExecutionOutcome::success(message, details)
    } else {
        let message = format!(
            "{} ({} error{})",
            message.into(),
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        );
        ExecutionOutcome::user_error(message, details)
    }
}

pub(crate) fn missing_file(path: &Path, hint: &str) -> ExecutionOutcome {
    ExecutionOutcome::user_error(
        format!("File '{}' does not exist.", path.display()),
        json!({ "path": path.display().to_string(), "hint": hint }),
    )
}

pub(crate) fn invalid_regex(pattern: &str, err: &regex::Error) -> ExecutionOutcome {
    ExecutionOutcome::user_error(
        format!("invalid --regex pattern '{pattern}'"),
        json!({ "regex": pattern, "reason": err.to_string() }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommandStatus;

    #[test]
    fn errors_downgrade_batch_and_are_listed() {
        let errors = vec![FileError {
            path: "dist/a.whl".into(),
            error: "denied".into(),
        }];
        let outcome = batch_outcome("renamed 0 wheel files", json!({ "renamed": [] }), &errors);
        assert_eq!(outcome.status, CommandStatus::UserError);
        assert_eq!(outcome.message, "renamed 0 wheel files (1 error)");
        assert_eq!(outcome.details["errors"][0]["path"], "dist/a.whl");

        let outcome = batch_outcome("done", json!({}), &[]);
        assert_eq!(outcome.status, CommandStatus::Ok);
        assert_eq!(outcome.details["errors"], json!([]));
    }
}
