//! Mapping of installed extension and source files to dotted module names.

use once_cell::sync::Lazy;
use regex::Regex;

/// A trailing interpreter/ABI/platform tag recognised on compiled extensions.
pub(crate) struct AbiSuffixPattern {
    pub(crate) label: &'static str,
    pub(crate) regex: Regex,
}

/// Tried in order; the first match is stripped together with the extension.
pub(crate) static ABI_SUFFIX_PATTERNS: Lazy<Vec<AbiSuffixPattern>> = Lazy::new(|| {
    [
        // mod.cp311-win_amd64.pyd
        ("cpython-windows", r"(?i)\.cp\d+[^./\\]*\.pyd$"),
        // mod.pypy39-pp73-win_amd64.pyd
        ("pypy-windows", r"(?i)\.pypy\d+-pp\d+[^./\\]*\.pyd$"),
        // mod.cpython-311-x86_64-linux-gnu.so
        ("cpython-posix", r"\.cpython-\d+[^./\\]*\.so$"),
        // mod.pypy39-pp73-x86_64-linux-gnu.so
        ("pypy-posix", r"\.pypy\d+-pp\d+[^./\\]*\.so$"),
        // mod.abi3.so
        ("stable-abi", r"\.abi3\.so$"),
    ]
    .into_iter()
    .map(|(label, pattern)| AbiSuffixPattern {
        label,
        regex: Regex::new(pattern).expect("ABI suffix patterns are valid"),
    })
    .collect()
});

/// Strips the first matching ABI suffix pattern, extension included.
pub(crate) fn strip_abi_suffix(relative: &str) -> Option<&str> {
    ABI_SUFFIX_PATTERNS.iter().find_map(|pattern| {
        pattern.regex.find(relative).map(|found| {
            tracing::trace!(pattern = pattern.label, path = relative, "stripped abi suffix");
            &relative[..found.start()]
        })
    })
}

fn strip_extension(relative: &str) -> &str {
    let basename_start = relative.rfind(['/', '\\']).map_or(0, |idx| idx + 1);
    match relative[basename_start..].rfind('.') {
        Some(dot) if dot > 0 => &relative[..basename_start + dot],
        _ => relative,
    }
}

/// Converts a site-packages relative path into a dotted module name.
///
/// `pkg/sub/mod.cp311-win_amd64.pyd` becomes `pkg.sub.mod` and
/// `pkg/__init__.cp311-win_amd64.pyd` becomes `pkg`. Returns `None` for a
/// bare top-level `__init__` or an empty path.
#[must_use]
pub fn module_name_from_relative(relative: &str) -> Option<String> {
    let stem = strip_abi_suffix(relative).unwrap_or_else(|| strip_extension(relative));
    let parts: Vec<&str> = stem
        .split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .collect();
    let parts = match parts.split_last() {
        Some((&"__init__", parents)) => parents,
        _ => parts.as_slice(),
    };
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("."))
    }
}
