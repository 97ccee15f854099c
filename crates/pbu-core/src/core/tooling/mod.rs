//! CLI-facing diagnostics and outcome shaping.

pub(crate) mod diagnostics;
mod messages;
pub(crate) mod outcome;

pub(crate) use messages::*;
