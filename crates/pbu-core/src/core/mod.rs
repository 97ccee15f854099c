pub(crate) mod config;
pub(crate) mod deps;
pub(crate) mod distribution;
pub(crate) mod filter;
pub(crate) mod fs;
pub(crate) mod modules;
pub(crate) mod python;
pub(crate) mod runtime;
pub(crate) mod tooling;
