use anyhow::Result;

use super::process::{run_command, RunOutput};
use crate::python_sys::detect_interpreter;

/// Side-effecting access to Python: interpreter discovery and subprocesses.
pub trait PythonRuntime: Send + Sync {
    fn detect_interpreter(&self) -> Result<String>;
    fn run_command(&self, program: &str, args: &[String]) -> Result<RunOutput>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPythonRuntime;

impl PythonRuntime for SystemPythonRuntime {
    fn detect_interpreter(&self) -> Result<String> {
        detect_interpreter()
    }

    fn run_command(&self, program: &str, args: &[String]) -> Result<RunOutput> {
        run_command(program, args)
    }
}
