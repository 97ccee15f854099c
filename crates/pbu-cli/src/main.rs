use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use pbu_core::{CommandContext, GlobalOptions, SystemPythonRuntime};

mod cli;
mod dispatch;
mod output;
mod style;

use cli::PbuCli;
use output::OutputOptions;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = PbuCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let global = GlobalOptions {
        quiet: cli.quiet,
        verbose: cli.verbose,
        trace: cli.trace,
        json: cli.json,
        no_color: cli.no_color,
        python: cli.python.clone(),
    };
    let ctx = CommandContext::new(&global, Arc::new(SystemPythonRuntime));

    let (info, outcome) = dispatch::dispatch_command(&ctx, &cli.command)?;
    let opts = OutputOptions {
        quiet: cli.quiet,
        json: cli.json,
        no_color: cli.no_color,
    };
    let code = output::emit_output(&opts, info, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("pbu={level},pbu_core={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
