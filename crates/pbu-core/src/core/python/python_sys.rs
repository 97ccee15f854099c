use anyhow::{anyhow, bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::from_str;
use which::which;

use crate::effects::PythonRuntime;

const INTERPRETER_SCRIPT: &str = r#"import json, sys, sysconfig
data = {
    "major": sys.version_info[0],
    "minor": sys.version_info[1],
    "platform": sysconfig.get_platform(),
    "sys_path": list(sys.path),
}
print(json.dumps(data))
"#;

/// Detects the Python interpreter available on `PATH`.
///
/// # Errors
///
/// Returns an error when no interpreter can be found or the detected path is
/// not valid UTF-8.
pub fn detect_interpreter() -> Result<String> {
    for candidate in ["python3", "python"] {
        if let Ok(path) = which(candidate) {
            return path
                .into_os_string()
                .into_string()
                .map_err(|_| anyhow!("non-utf8 path"));
        }
    }

    bail!("no python interpreter found; pass --python or set PBU_PYTHON")
}

/// Probes version, platform, and search path of the given interpreter.
///
/// # Errors
///
/// Returns an error when the interpreter cannot be executed or the payload is
/// malformed.
pub fn probe_interpreter(runtime: &dyn PythonRuntime, python: &str) -> Result<InterpreterInfo> {
    let payload: InterpreterPayload =
        probe_python(runtime, python, INTERPRETER_SCRIPT, "interpreter")?;
    Ok(InterpreterInfo {
        major: payload.major,
        minor: payload.minor,
        platform: payload.platform,
        sys_path: payload.sys_path,
    })
}

fn probe_python<T>(runtime: &dyn PythonRuntime, python: &str, script: &str, guide: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let args = vec!["-c".to_string(), script.to_string()];
    let output = runtime
        .run_command(python, &args)
        .with_context(|| format!("failed to probe {guide} via {python}"))?;
    if !output.success() {
        bail!("python {guide} probe failed: {}", output.stderr.trim());
    }
    from_str(output.stdout.trim()).context(format!("invalid {guide} payload"))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterpreterInfo {
    pub major: u32,
    pub minor: u32,
    /// Raw `sysconfig.get_platform()` value, e.g. `linux-x86_64`.
    pub platform: String,
    pub sys_path: Vec<String>,
}

impl InterpreterInfo {
    /// CPython tag for this interpreter, e.g. `cp311`.
    #[must_use]
    pub fn python_tag(&self) -> String {
        format!("cp{}{}", self.major, self.minor)
    }

    /// Platform descriptor with hyphens replaced, e.g. `linux_x86_64`.
    #[must_use]
    pub fn platform_tag(&self) -> String {
        self.platform.replace('-', "_")
    }

    /// First `sys.path` entry containing `marker`.
    #[must_use]
    pub fn site_packages(&self, marker: &str) -> Option<&str> {
        self.sys_path
            .iter()
            .map(String::as_str)
            .find(|entry| entry.contains(marker))
    }
}

#[derive(Deserialize)]
struct InterpreterPayload {
    major: u32,
    minor: u32,
    platform: String,
    #[serde(default)]
    sys_path: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::testing::FakePythonRuntime;

    #[test]
    fn probe_parses_interpreter_payload() -> Result<()> {
        let runtime = FakePythonRuntime::new().respond(
            "-c",
            0,
            r#"{"major": 3, "minor": 12, "platform": "win-amd64", "sys_path": ["", "C:\\venv\\Lib\\site-packages"]}"#,
        );
        let info = probe_interpreter(&runtime, "/fake/bin/python")?;
        assert_eq!(info.python_tag(), "cp312");
        assert_eq!(info.platform_tag(), "win_amd64");
        assert_eq!(
            info.site_packages("site-packages"),
            Some("C:\\venv\\Lib\\site-packages")
        );
        Ok(())
    }

    #[test]
    fn probe_reports_interpreter_failure() {
        let runtime = FakePythonRuntime::new().respond("-c", 1, "");
        let err = probe_interpreter(&runtime, "/fake/bin/python").unwrap_err();
        assert!(err.to_string().contains("probe failed"), "{err}");
    }

    #[test]
    fn site_packages_requires_marker() {
        let info = InterpreterInfo {
            major: 3,
            minor: 11,
            platform: "linux-x86_64".into(),
            sys_path: vec!["/usr/lib/python311.zip".into()],
        };
        assert!(info.site_packages("site-packages").is_none());
        assert_eq!(info.platform_tag(), "linux_x86_64");
    }
}
