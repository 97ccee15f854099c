mod details;

use atty::Stream;
use color_eyre::Result;
use pbu_core::{CommandInfo, CommandStatus, ExecutionOutcome};

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
    pub no_color: bool,
}

pub fn emit_output(
    opts: &OutputOptions,
    info: CommandInfo,
    outcome: &ExecutionOutcome,
) -> Result<i32> {
    let code = outcome.status.exit_code();

    if opts.json {
        let payload = pbu_core::to_json_response(info, outcome, code);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(code);
    }

    let style_out = Style::new(opts.no_color, atty::is(Stream::Stdout));
    let style_err = Style::new(opts.no_color, atty::is(Stream::Stderr));
    let message = pbu_core::format_status_message(info, &outcome.message);
    let lines = details::detail_lines(info.group, &outcome.details);

    match outcome.status {
        CommandStatus::Ok => {
            if opts.quiet {
                return Ok(code);
            }
            println!("{}", style_out.status(outcome.status, &message));
            for line in lines {
                println!("{line}");
            }
            if let Some(hint) = details::hint_from_details(&outcome.details) {
                println!("{}", style_out.hint(hint));
            }
        }
        CommandStatus::UserError | CommandStatus::Failure => {
            if !opts.quiet {
                for line in lines {
                    println!("{line}");
                }
            }
            eprintln!("{}", style_err.status(outcome.status, &message));
            for line in details::error_lines(&outcome.details) {
                eprintln!("{}", style_err.error_line(&format!("  {line}")));
            }
            if let Some(stderr) = details::output_from_details(&outcome.details, "stderr") {
                eprintln!();
                eprintln!("stderr:");
                eprintln!("{stderr}");
            }
            if let Some(hint) = details::hint_from_details(&outcome.details) {
                eprintln!("{}", style_err.hint(hint));
            }
        }
    }

    Ok(code)
}
