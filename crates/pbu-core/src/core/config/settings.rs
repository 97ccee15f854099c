use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_SITE_MARKER: &str = "site-packages";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub verbose: u8,
    pub trace: bool,
    pub json: bool,
    pub no_color: bool,
    pub python: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) python: PythonConfig,
    pub(crate) site: SiteConfig,
}

impl Config {
    /// Builds a configuration snapshot from the current process environment.
    #[must_use]
    pub fn from_env(global: &GlobalOptions) -> Self {
        let snapshot = EnvSnapshot::capture();
        Self::from_snapshot(&snapshot, global)
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot, global: &GlobalOptions) -> Self {
        let explicit = global
            .python
            .clone()
            .or_else(|| non_empty(snapshot.var("PBU_PYTHON")));
        Self {
            python: PythonConfig { explicit },
            site: SiteConfig {
                marker: non_empty(snapshot.var("PBU_SITE_MARKER"))
                    .unwrap_or_else(|| DEFAULT_SITE_MARKER.to_string()),
            },
        }
    }

    #[must_use]
    pub fn python(&self) -> &PythonConfig {
        &self.python
    }

    #[must_use]
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

#[derive(Debug, Clone)]
pub struct PythonConfig {
    /// Interpreter requested via `--python` or `PBU_PYTHON`.
    pub explicit: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Substring identifying the site-packages entry on `sys.path`.
    pub marker: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_flag_wins_over_environment() {
        let snapshot = EnvSnapshot::testing(&[("PBU_PYTHON", "/opt/py/bin/python")]);
        let global = GlobalOptions {
            python: Some("/usr/bin/python3".into()),
            ..GlobalOptions::default()
        };
        let config = Config::from_snapshot(&snapshot, &global);
        assert_eq!(config.python().explicit.as_deref(), Some("/usr/bin/python3"));

        let config = Config::from_snapshot(&snapshot, &GlobalOptions::default());
        assert_eq!(
            config.python().explicit.as_deref(),
            Some("/opt/py/bin/python")
        );
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let snapshot = EnvSnapshot::testing(&[("PBU_PYTHON", "  "), ("PBU_SITE_MARKER", "")]);
        let config = Config::from_snapshot(&snapshot, &GlobalOptions::default());
        assert!(config.python().explicit.is_none());
        assert_eq!(config.site().marker, DEFAULT_SITE_MARKER);
    }

    #[test]
    fn site_marker_can_be_overridden() {
        let snapshot = EnvSnapshot::testing(&[("PBU_SITE_MARKER", "dist-packages")]);
        let config = Config::from_snapshot(&snapshot, &GlobalOptions::default());
        assert_eq!(config.site().marker, "dist-packages");
    }
}
