use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use pbu_core::ModuleKind;

pub const PBU_HELP_TEMPLATE: &str =
    "{before-help}\nUsage:\n    {usage}\n\nGlobal options:\n{options}\n";

pub const PBU_BEFORE_HELP: &str = concat!(
    "pbu ",
    env!("CARGO_PKG_VERSION"),
    " - Python build artifact utilities\n\n",
    "\x1b[1;36mDistributions\x1b[0m\n",
    "  rename-wheel-files    Retag py3-none-any wheels for a CPython version and platform.\n",
    "  remove-tarballs       Delete *.tar.gz source archives from a dist directory.\n",
    "  pyd2wheel             Pack a single compiled extension into a wheel.\n\n",
    "\x1b[1;36mEnvironments\x1b[0m\n",
    "  collect-pyd-modules   List extension modules installed in site-packages.\n",
    "  clean-pyd-modules     Delete *.pyd and *.c build leftovers from site-packages.\n",
    "  collect-dep-modules   List every dependency of an installed package (pipdeptree).\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "pbu",
    author,
    version,
    propagate_version = false,
    disable_help_subcommand = true,
    before_help = PBU_BEFORE_HELP,
    help_template = PBU_HELP_TEMPLATE
)]
#[allow(clippy::struct_excessive_bools)]
pub struct PbuCli {
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)",
        global = true
    )]
    pub quiet: bool,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging (-vv reaches debug, -vvv trace)",
        global = true
    )]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q", global = true)]
    pub trace: bool,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes",
        global = true
    )]
    pub json: bool,
    #[arg(long, help = "Disable colored human output", global = true)]
    pub no_color: bool,
    #[arg(
        long,
        value_name = "PATH",
        help = "Python interpreter to probe and run (overrides PBU_PYTHON)",
        global = true
    )]
    pub python: Option<String>,
    #[command(subcommand)]
    pub command: CommandGroupCli,
}

#[derive(Subcommand, Debug)]
pub enum CommandGroupCli {
    #[command(
        about = "Rename *py3-none-any.whl files to a platform-specific tag.",
        override_usage = "pbu rename-wheel-files [--dist-dir DIR] [--python-version-tag TAG] [--platform-tag TAG] [--wheel-tag TAG]"
    )]
    RenameWheelFiles(RenameWheelArgs),
    #[command(about = "Remove *.tar.gz files from a dist directory.")]
    RemoveTarballs(RemoveTarballsArgs),
    #[command(about = "Collect dotted names of modules installed in site-packages.")]
    CollectPydModules(CollectPydArgs),
    #[command(about = "Remove *.pyd and *.c files from site-packages.")]
    CleanPydModules(CleanPydArgs),
    #[command(about = "Collect all dependencies of an installed package.")]
    CollectDepModules(CollectDepArgs),
    #[command(
        name = "pyd2wheel",
        about = "Create a wheel from a compiled extension file, next to it."
    )]
    Pyd2Wheel(Pyd2WheelArgs),
}

#[derive(Args, Debug)]
pub struct RenameWheelArgs {
    #[arg(long, value_name = "DIR", default_value = "dist")]
    pub dist_dir: PathBuf,
    #[arg(
        long,
        value_name = "TAG",
        help = "Python tag such as cp311 (defaults to the interpreter's)"
    )]
    pub python_version_tag: Option<String>,
    #[arg(
        long,
        value_name = "TAG",
        help = "Platform tag such as win_amd64 (defaults to the interpreter's)"
    )]
    pub platform_tag: Option<String>,
    #[arg(
        long,
        value_name = "TAG",
        help = "Full tag replacing py3-none-any, e.g. cp310-cp310-win_amd64"
    )]
    pub wheel_tag: Option<String>,
}

#[derive(Args, Debug)]
pub struct RemoveTarballsArgs {
    #[arg(long, value_name = "DIR", default_value = "dist")]
    pub dist_dir: PathBuf,
    #[arg(long, help = "List the tarballs without deleting them")]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct CollectPydArgs {
    #[arg(
        long,
        value_name = "PATH",
        help = "Virtual environment to scan (defaults to the interpreter's site-packages)"
    )]
    pub venv_path: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "PATTERN",
        help = "Case-insensitive regex applied to module names"
    )]
    pub regex: Option<String>,
    #[arg(long, value_enum, default_value_t = ModeArg::Compiled)]
    pub mode: ModeArg,
    #[arg(long, hide = true, conflicts_with = "mode")]
    pub collect_py: bool,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Also write the module list to FILE"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CleanPydArgs {
    #[arg(long, value_name = "PATH")]
    pub venv_path: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "PATTERN",
        help = "Case-insensitive regex applied to site-packages relative paths"
    )]
    pub regex: Option<String>,
    #[arg(long, help = "List the files without deleting them")]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct CollectDepArgs {
    #[arg(long, value_name = "NAME")]
    pub package: Option<String>,
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    #[arg(
        long,
        value_name = "FILE",
        help = "Read a captured `pipdeptree --json-tree` document instead of running pipdeptree"
    )]
    pub from_json: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "PATTERN",
        help = "Case-insensitive regex applied to dependency names"
    )]
    pub regex: Option<String>,
}

#[derive(Args, Debug)]
pub struct Pyd2WheelArgs {
    #[arg(value_name = "PYD_FILE")]
    pub pyd_file: PathBuf,
    #[arg(
        long,
        value_name = "VERSION",
        help = "Package version (required when the file name has none)"
    )]
    pub package_version: Option<String>,
    #[arg(long, alias = "abi_tag", value_name = "TAG", default_value = "none")]
    pub abi_tag: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Pyd,
    So,
    Py,
    Compiled,
    All,
}

impl From<ModeArg> for ModuleKind {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pyd => ModuleKind::Pyd,
            ModeArg::So => ModuleKind::So,
            ModeArg::Py => ModuleKind::Py,
            ModeArg::Compiled => ModuleKind::Compiled,
            ModeArg::All => ModuleKind::All,
        }
    }
}
