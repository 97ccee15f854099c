use std::sync::{Arc, OnceLock};

use anyhow::Result;

use crate::config::{Config, GlobalOptions};
use crate::effects::PythonRuntime;
use crate::python_sys::{probe_interpreter, InterpreterInfo};
use crate::CommandGroup;

#[derive(Clone, Copy, Debug)]
pub struct CommandInfo {
    pub group: CommandGroup,
    pub name: &'static str,
}

impl CommandInfo {
    #[must_use]
    pub const fn new(group: CommandGroup, name: &'static str) -> Self {
        Self { group, name }
    }
}

/// Per-invocation state handed to every command: global flags, the
/// configuration snapshot, and the Python runtime used for probes and
/// subprocesses.
pub struct CommandContext<'a> {
    pub global: &'a GlobalOptions,
    config: Config,
    python: Arc<dyn PythonRuntime>,
    interpreter: OnceLock<String>,
}

impl<'a> CommandContext<'a> {
    #[must_use]
    pub fn new(global: &'a GlobalOptions, python: Arc<dyn PythonRuntime>) -> Self {
        let config = Config::from_env(global);
        Self::with_config(global, config, python)
    }

    #[must_use]
    pub fn with_config(
        global: &'a GlobalOptions,
        config: Config,
        python: Arc<dyn PythonRuntime>,
    ) -> Self {
        Self {
            global,
            config,
            python,
            interpreter: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn python_runtime(&self) -> &dyn PythonRuntime {
        self.python.as_ref()
    }

    /// Resolves the interpreter path, preferring an explicit configuration.
    ///
    /// # Errors
    /// Returns an error when no interpreter is configured and none is found on `PATH`.
    pub fn interpreter(&self) -> Result<String> {
        if let Some(python) = self.interpreter.get() {
            return Ok(python.clone());
        }
        let python = match &self.config.python().explicit {
            Some(explicit) => explicit.clone(),
            None => self.python.detect_interpreter()?,
        };
        tracing::debug!(python = %python, "resolved interpreter");
        let _ = self.interpreter.set(python.clone());
        Ok(python)
    }

    /// Probes version, platform, and `sys.path` of the resolved interpreter.
    ///
    /// # Errors
    /// Returns an error if the interpreter cannot be resolved or probed.
    pub fn interpreter_info(&self) -> Result<InterpreterInfo> {
        let python = self.interpreter()?;
        probe_interpreter(self.python_runtime(), &python)
    }
}
