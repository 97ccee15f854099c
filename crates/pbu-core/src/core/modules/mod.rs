//! Scanning an installed environment for compiled extension modules.

mod clean;
mod collect;
mod names;
mod site;

pub use clean::{clean_pyd_modules, CleanModulesRequest};
pub use collect::{collect_pyd_modules, CollectModulesRequest, ModuleKind};
pub use names::module_name_from_relative;
pub use site::EnvironmentRootError;
