use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: message.into(),
            details,
        }
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::UserError,
            message: message.into(),
            details,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}

impl CommandStatus {
    /// Process exit code for this status.
    ///
    /// Reported input problems are handled outcomes and exit with `0`; only
    /// command failures (subprocess errors, unexpected I/O) are non-zero.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            CommandStatus::Ok | CommandStatus::UserError => 0,
            CommandStatus::Failure => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_failures_exit_non_zero() {
        assert_eq!(CommandStatus::Ok.exit_code(), 0);
        assert_eq!(CommandStatus::UserError.exit_code(), 0);
        assert_eq!(CommandStatus::Failure.exit_code(), 1);
    }
}
