use serde_json::{json, Value};

use crate::diagnostics::commands;
use crate::{CommandGroup, CommandInfo, CommandStatus, ExecutionOutcome};

#[must_use]
pub fn to_json_response(info: CommandInfo, outcome: &ExecutionOutcome, code: i32) -> Value {
    let status = match outcome.status {
        CommandStatus::Ok => "ok",
        CommandStatus::UserError => "user-error",
        CommandStatus::Failure => "error",
    };
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": status,
        "code": diagnostic_code(info.group),
        "exit_code": code,
        "message": format_status_message(info, &outcome.message),
        "details": details,
    })
}

#[must_use]
pub fn format_status_message(info: CommandInfo, message: &str) -> String {
    let prefix = format!("pbu {}", info.name);
    if message.is_empty() {
        prefix
    } else if message.starts_with(&prefix) {
        message.to_string()
    } else {
        format!("{prefix}: {message}")
    }
}

fn diagnostic_code(group: CommandGroup) -> &'static str {
    match group {
        CommandGroup::RenameWheelFiles => commands::RENAME_WHEEL_FILES,
        CommandGroup::RemoveTarballs => commands::REMOVE_TARBALLS,
        CommandGroup::CollectPydModules => commands::COLLECT_PYD_MODULES,
        CommandGroup::CleanPydModules => commands::CLEAN_PYD_MODULES,
        CommandGroup::CollectDepModules => commands::COLLECT_DEP_MODULES,
        CommandGroup::Pyd2Wheel => commands::PYD2WHEEL,
    }
}
