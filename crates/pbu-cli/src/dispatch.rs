use color_eyre::Result;
use pbu_core::{
    CleanModulesRequest, CollectDependenciesRequest, CollectModulesRequest, CommandContext,
    CommandGroup, CommandInfo, ExecutionOutcome, ModuleKind, Pyd2WheelRequest,
    RemoveTarballsRequest, RenameWheelRequest,
};

use crate::cli::{CollectPydArgs, CommandGroupCli};

pub fn dispatch_command(
    ctx: &CommandContext,
    group: &CommandGroupCli,
) -> Result<(CommandInfo, ExecutionOutcome)> {
    match group {
        CommandGroupCli::RenameWheelFiles(args) => {
            let info = CommandInfo::new(CommandGroup::RenameWheelFiles, "rename-wheel-files");
            let request = RenameWheelRequest {
                dist_dir: args.dist_dir.clone(),
                python_tag: args.python_version_tag.clone(),
                platform_tag: args.platform_tag.clone(),
                wheel_tag: args.wheel_tag.clone(),
            };
            core_call(info, || pbu_core::rename_wheel_files(ctx, &request))
        }
        CommandGroupCli::RemoveTarballs(args) => {
            let info = CommandInfo::new(CommandGroup::RemoveTarballs, "remove-tarballs");
            let request = RemoveTarballsRequest {
                dist_dir: args.dist_dir.clone(),
                dry_run: args.dry_run,
            };
            core_call(info, || pbu_core::remove_tarballs(ctx, &request))
        }
        CommandGroupCli::CollectPydModules(args) => {
            let info = CommandInfo::new(CommandGroup::CollectPydModules, "collect-pyd-modules");
            let request = collect_request_from_args(args);
            core_call(info, || pbu_core::collect_pyd_modules(ctx, &request))
        }
        CommandGroupCli::CleanPydModules(args) => {
            let info = CommandInfo::new(CommandGroup::CleanPydModules, "clean-pyd-modules");
            let request = CleanModulesRequest {
                venv_path: args.venv_path.clone(),
                regex: args.regex.clone(),
                dry_run: args.dry_run,
            };
            core_call(info, || pbu_core::clean_pyd_modules(ctx, &request))
        }
        CommandGroupCli::CollectDepModules(args) => {
            let info = CommandInfo::new(CommandGroup::CollectDepModules, "collect-dep-modules");
            let request = CollectDependenciesRequest {
                package: args.package.clone(),
                output: args.output.clone(),
                from_json: args.from_json.clone(),
                regex: args.regex.clone(),
            };
            core_call(info, || pbu_core::collect_dependencies(ctx, &request))
        }
        CommandGroupCli::Pyd2Wheel(args) => {
            let info = CommandInfo::new(CommandGroup::Pyd2Wheel, "pyd2wheel");
            let request = Pyd2WheelRequest {
                pyd_file: args.pyd_file.clone(),
                version: args.package_version.clone(),
                abi_tag: args.abi_tag.clone(),
            };
            core_call(info, || pbu_core::pyd2wheel(ctx, &request))
        }
    }
}

fn collect_request_from_args(args: &CollectPydArgs) -> CollectModulesRequest {
    let kind = if args.collect_py {
        tracing::warn!("--collect-py is deprecated; use --mode py");
        ModuleKind::Py
    } else {
        args.mode.into()
    };
    CollectModulesRequest {
        venv_path: args.venv_path.clone(),
        regex: args.regex.clone(),
        kind,
        output: args.output.clone(),
    }
}

/// Runs a core command, turning unexpected errors into a failure outcome.
fn core_call<F>(info: CommandInfo, action: F) -> Result<(CommandInfo, ExecutionOutcome)>
where
    F: FnOnce() -> anyhow::Result<ExecutionOutcome>,
{
    match action() {
        Ok(outcome) => Ok((info, outcome)),
        Err(err) => {
            tracing::debug!(command = info.name, error = ?err, "command failed");
            let issues: Vec<String> = err.chain().map(std::string::ToString::to_string).collect();
            Ok((
                info,
                ExecutionOutcome::failure(
                    format!("{err:#}"),
                    serde_json::json!({
                        "reason": "internal_error",
                        "issues": issues,
                    }),
                ),
            ))
        }
    }
}
