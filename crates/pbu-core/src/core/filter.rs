use regex::{Regex, RegexBuilder};

use crate::tooling::invalid_regex;
use crate::ExecutionOutcome;

/// Compiles an optional `--regex` argument, matched case-insensitively.
pub(crate) fn compile_filter(pattern: Option<&str>) -> Result<Option<Regex>, ExecutionOutcome> {
    let Some(pattern) = pattern.filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|err| invalid_regex(pattern, &err))
}

pub(crate) fn passes(filter: Option<&Regex>, haystack: &str) -> bool {
    filter.is_none_or(|regex| regex.is_match(haystack))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommandStatus;

    #[test]
    fn filter_ignores_case() {
        let filter = compile_filter(Some("^PKG\\.")).expect("valid").expect("present");
        assert!(passes(Some(&filter), "pkg.sub"));
        assert!(!passes(Some(&filter), "other.pkg"));
        assert!(passes(None, "anything"));
    }

    #[test]
    fn invalid_pattern_is_a_user_error() {
        let outcome = compile_filter(Some("(unclosed")).unwrap_err();
        assert_eq!(outcome.status, CommandStatus::UserError);
        assert_eq!(outcome.details["regex"], "(unclosed");
    }

    #[test]
    fn empty_pattern_means_no_filter() {
        assert!(compile_filter(Some("")).expect("valid").is_none());
    }
}
