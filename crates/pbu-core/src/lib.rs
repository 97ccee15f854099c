#![deny(clippy::all)]

mod core;

pub(crate) use crate::core::config;
pub(crate) use crate::core::python::python_sys;
pub(crate) use crate::core::runtime::effects;
pub(crate) use crate::core::tooling;
pub(crate) use crate::core::tooling::diagnostics;

pub use crate::core::config::context::{CommandContext, CommandInfo};
pub use crate::core::config::{Config, GlobalOptions};
pub use crate::core::python::python_sys::InterpreterInfo;
pub use crate::core::runtime::effects::{PythonRuntime, SystemPythonRuntime};
pub use crate::core::runtime::process::RunOutput;
pub use crate::core::runtime::CommandGroup;
pub use crate::core::tooling::diagnostics::commands as diag_commands;
pub use crate::core::tooling::outcome::{CommandStatus, ExecutionOutcome};

pub use crate::core::deps::{
    collect_dependencies, CollectDependenciesRequest, DependencyNode, UnsafeCommandError,
};
pub use crate::core::distribution::{
    pyd2wheel, remove_tarballs, rename_wheel_files, MissingVersionError, Pyd2WheelRequest,
    PydFilename, PydFilenameError, RemoveTarballsRequest, RenameWheelRequest,
};
pub use crate::core::modules::{
    clean_pyd_modules, collect_pyd_modules, module_name_from_relative, CleanModulesRequest,
    CollectModulesRequest, EnvironmentRootError, ModuleKind,
};

pub use crate::core::runtime::{format_status_message, to_json_response, PBU_VERSION};
