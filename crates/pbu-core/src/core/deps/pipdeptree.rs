use serde_json::json;

use super::tree::{parse_tree, DependencyNode};
use crate::{CommandContext, ExecutionOutcome};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("refusing to run `{command}`: unexpected option '{option}'")]
pub struct UnsafeCommandError {
    pub command: String,
    pub option: String,
}

/// `<python> -m pipdeptree --json-tree`
pub(crate) fn pipdeptree_args() -> Vec<String> {
    ["-m", "pipdeptree", "--json-tree"]
        .into_iter()
        .map(ToOwned::to_owned)
        .collect()
}

/// Rejects single-dash short options other than `-m`.
pub(crate) fn validate_command(program: &str, args: &[String]) -> Result<(), UnsafeCommandError> {
    let unsafe_option = args.iter().find(|arg| {
        arg.starts_with('-') && !arg.starts_with("--") && arg.len() > 1 && arg.as_str() != "-m"
    });
    match unsafe_option {
        Some(option) => Err(UnsafeCommandError {
            command: format!("{program} {}", args.join(" ")),
            option: option.clone(),
        }),
        None => Ok(()),
    }
}

/// Runs pipdeptree with the configured interpreter; every problem is a
/// command failure.
pub(crate) fn load_installed_tree(
    ctx: &CommandContext,
) -> Result<Vec<DependencyNode>, ExecutionOutcome> {
    let python = ctx.interpreter().map_err(|err| {
        ExecutionOutcome::failure(
            format!("{err:#}"),
            json!({ "hint": "pass --python or set PBU_PYTHON" }),
        )
    })?;
    let args = pipdeptree_args();
    if let Err(err) = validate_command(&python, &args) {
        tracing::error!(command = %err.command, option = %err.option, "unsafe command");
        return Err(ExecutionOutcome::failure(
            err.to_string(),
            json!({ "command": err.command, "option": err.option }),
        ));
    }

    tracing::debug!(python = %python, "running pipdeptree");
    let output = ctx
        .python_runtime()
        .run_command(&python, &args)
        .map_err(|err| ExecutionOutcome::failure(format!("{err:#}"), json!({ "python": python })))?;
    if !output.success() {
        tracing::error!(code = output.code, stderr = %output.stderr.trim(), "subprocess failed");
        return Err(ExecutionOutcome::failure(
            format!("pipdeptree exited with status {}", output.code),
            json!({
                "python": python,
                "code": output.code,
                "stderr": output.stderr.trim(),
                "hint": format!("install it with `{python} -m pip install pipdeptree`"),
            }),
        ));
    }
    parse_tree(&output.stdout).map_err(|err| {
        ExecutionOutcome::failure(
            "pipdeptree produced an invalid dependency tree",
            json!({ "reason": err.to_string() }),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_command_passes_validation() {
        assert!(validate_command("/usr/bin/python3", &pipdeptree_args()).is_ok());
    }

    #[test]
    fn short_options_other_than_module_flag_are_rejected() {
        let args = vec!["-c".to_string(), "print(1)".to_string()];
        let err = validate_command("python", &args).unwrap_err();
        assert_eq!(err.option, "-c");
        assert!(err.to_string().contains("python -c print(1)"));

        let args = vec!["-m".to_string(), "pipdeptree".to_string(), "-x".to_string()];
        assert!(validate_command("python", &args).is_err());
    }

    #[test]
    fn long_options_and_positionals_are_allowed() {
        let args = vec!["-m".to_string(), "pkg".to_string(), "--flag".to_string(), "-".to_string()];
        assert!(validate_command("python", &args).is_ok());
    }
}
