pub(crate) mod effects;
pub(crate) mod process;
mod response;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use response::{format_status_message, to_json_response};

pub const PBU_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandGroup {
    RenameWheelFiles,
    RemoveTarballs,
    CollectPydModules,
    CleanPydModules,
    CollectDepModules,
    Pyd2Wheel,
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandGroup::RenameWheelFiles => "rename-wheel-files",
            CommandGroup::RemoveTarballs => "remove-tarballs",
            CommandGroup::CollectPydModules => "collect-pyd-modules",
            CommandGroup::CleanPydModules => "clean-pyd-modules",
            CommandGroup::CollectDepModules => "collect-dep-modules",
            CommandGroup::Pyd2Wheel => "pyd2wheel",
        };
        f.write_str(name)
    }
}
