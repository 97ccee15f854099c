use std::fmt;

/// Accepted shape `name-version-pytag-platform.pyd`.
pub(crate) const LONG_FORMAT: &str = "{distribution}-{version}-{python tag}-{platform tag}.pyd";
/// Accepted shape `name.pytag-platform.pyd`.
pub(crate) const SHORT_FORMAT: &str = "{distribution}.{python tag}-{platform tag}.pyd";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "The pyd file name should be one of these formats:\n - {long}\n - {short}\nGot pyd_file: {file_name}",
    long = LONG_FORMAT,
    short = SHORT_FORMAT
)]
pub struct PydFilenameError {
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "The version of the package should be provided as it can not be extracted from the pyd file name '{file_name}'."
)]
pub struct MissingVersionError {
    pub file_name: String,
}

/// Extensions of the compiled modules the packer accepts.
const EXTENSION_SUFFIXES: [&str; 2] = ["pyd", "so"];

/// Name and tags recovered from a compiled extension's file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PydFilename {
    /// `dummy-0.1.0-py311-win_amd64.pyd`
    Long {
        name: String,
        version: String,
        python_tag: String,
        platform_tag: String,
    },
    /// `DAVEcore.cp310-win_amd64.pyd`
    Short {
        name: String,
        python_tag: String,
        platform_tag: String,
    },
}

impl PydFilename {
    /// Parses a file name, trying the long shape before the short one.
    ///
    /// # Errors
    /// Returns [`PydFilenameError`] when neither shape matches.
    pub fn parse(file_name: &str) -> Result<Self, PydFilenameError> {
        let err = || PydFilenameError {
            file_name: file_name.to_string(),
        };
        let (stem, extension) = file_name.rsplit_once('.').ok_or_else(err)?;
        if !EXTENSION_SUFFIXES
            .iter()
            .any(|suffix| extension.eq_ignore_ascii_case(suffix))
        {
            return Err(err());
        }

        let fields: Vec<&str> = stem.split('-').collect();
        if let [name, version, python_tag, platform_tag] = fields.as_slice() {
            if fields.iter().all(|field| !field.is_empty())
                && is_tag(python_tag)
                && is_tag(platform_tag)
            {
                return Ok(PydFilename::Long {
                    name: (*name).to_string(),
                    version: (*version).to_string(),
                    python_tag: (*python_tag).to_string(),
                    platform_tag: (*platform_tag).to_string(),
                });
            }
        }

        // Dotted module prefixes stay in the name; tags never contain a dot.
        let (name, tags) = stem.rsplit_once('.').ok_or_else(err)?;
        match tags.split('-').collect::<Vec<_>>().as_slice() {
            [python_tag, platform_tag]
                if !name.is_empty() && !python_tag.is_empty() && !platform_tag.is_empty() =>
            {
                Ok(PydFilename::Short {
                    name: name.to_string(),
                    python_tag: (*python_tag).to_string(),
                    platform_tag: (*platform_tag).to_string(),
                })
            }
            _ => Err(err()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            PydFilename::Long { name, .. } | PydFilename::Short { name, .. } => name,
        }
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        match self {
            PydFilename::Long { version, .. } => Some(version),
            PydFilename::Short { .. } => None,
        }
    }

    #[must_use]
    pub fn python_tag(&self) -> &str {
        match self {
            PydFilename::Long { python_tag, .. } | PydFilename::Short { python_tag, .. } => {
                python_tag
            }
        }
    }

    #[must_use]
    pub fn platform_tag(&self) -> &str {
        match self {
            PydFilename::Long { platform_tag, .. } | PydFilename::Short { platform_tag, .. } => {
                platform_tag
            }
        }
    }
}

fn is_tag(field: &str) -> bool {
    !field.contains('.')
}

impl fmt::Display for PydFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PydFilename::Long {
                name,
                version,
                python_tag,
                platform_tag,
            } => write!(f, "{name}-{version}-{python_tag}-{platform_tag}"),
            PydFilename::Short {
                name,
                python_tag,
                platform_tag,
            } => write!(f, "{name}.{python_tag}-{platform_tag}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_form_carries_version() {
        let parsed = PydFilename::parse("dummy-0.1.0-py311-win_amd64.pyd").expect("long form");
        assert_eq!(
            parsed,
            PydFilename::Long {
                name: "dummy".into(),
                version: "0.1.0".into(),
                python_tag: "py311".into(),
                platform_tag: "win_amd64".into(),
            }
        );
        assert_eq!(parsed.version(), Some("0.1.0"));
    }

    #[test]
    fn short_form_has_no_version() {
        let parsed = PydFilename::parse("DAVEcore.cp310-win_amd64.pyd").expect("short form");
        assert_eq!(parsed.name(), "DAVEcore");
        assert_eq!(parsed.version(), None);
        assert_eq!(parsed.python_tag(), "cp310");
        assert_eq!(parsed.platform_tag(), "win_amd64");
        assert_eq!(parsed.to_string(), "DAVEcore.cp310-win_amd64");
    }

    #[test]
    fn unrecognised_names_list_both_formats() {
        for bad in [
            "invalidname.pyd",
            "a-b-c.pyd",
            "noextension",
            "pkg.cp310.pyd",
            "dummy-0.1.0-py311-win_amd64.txt",
            "DAVEcore.cp310-win_amd64.dll",
        ] {
            let err = PydFilename::parse(bad).unwrap_err();
            let message = err.to_string();
            assert!(message.contains(LONG_FORMAT), "{message}");
            assert!(message.contains(SHORT_FORMAT), "{message}");
            assert!(message.ends_with(bad), "{message}");
        }
    }

    #[test]
    fn dotted_module_prefix_stays_in_the_name() {
        let parsed = PydFilename::parse("pkg.sub.cp310-win_amd64.pyd").expect("short form");
        assert_eq!(parsed.name(), "pkg.sub");
        assert_eq!(parsed.python_tag(), "cp310");
        assert_eq!(parsed.platform_tag(), "win_amd64");
    }

    #[test]
    fn posix_extension_and_uppercase_suffix_are_accepted() {
        let parsed = PydFilename::parse("dummy-0.1.0-cp311-linux_x86_64.so").expect("so");
        assert_eq!(parsed.version(), Some("0.1.0"));
        assert!(PydFilename::parse("DAVEcore.cp310-win_amd64.PYD").is_ok());
    }
}
