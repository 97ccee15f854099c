use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;
use walkdir::WalkDir;
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

use super::filename::{MissingVersionError, PydFilename, LONG_FORMAT, SHORT_FORMAT};
use crate::core::fs::{compute_file_sha256, relative_path_str};
use crate::tooling::missing_file;
use crate::{CommandContext, ExecutionOutcome, PBU_VERSION};

#[derive(Clone, Debug)]
pub struct Pyd2WheelRequest {
    pub pyd_file: PathBuf,
    /// Overrides the version parsed from the file name.
    pub version: Option<String>,
    pub abi_tag: String,
}

impl Default for Pyd2WheelRequest {
    fn default() -> Self {
        Self {
            pyd_file: PathBuf::new(),
            version: None,
            abi_tag: "none".to_string(),
        }
    }
}

/// Fully resolved wheel coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct WheelSpec {
    pub name: String,
    pub version: String,
    pub python_tag: String,
    pub abi_tag: String,
    pub platform_tag: String,
}

impl WheelSpec {
    pub(crate) fn resolve(
        parsed: &PydFilename,
        file_name: &str,
        version: Option<&str>,
        abi_tag: &str,
    ) -> Result<Self, MissingVersionError> {
        let version = version
            .filter(|v| !v.trim().is_empty())
            .or(parsed.version())
            .ok_or_else(|| MissingVersionError {
                file_name: file_name.to_string(),
            })?;
        Ok(Self {
            name: parsed.name().to_string(),
            version: version.to_string(),
            python_tag: parsed.python_tag().to_string(),
            abi_tag: abi_tag.to_string(),
            platform_tag: parsed.platform_tag().to_string(),
        })
    }

    pub(crate) fn wheel_file_name(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}.whl",
            self.name, self.version, self.python_tag, self.abi_tag, self.platform_tag
        )
    }

    pub(crate) fn dist_info(&self) -> String {
        format!("{}-{}.dist-info", self.name, self.version)
    }

    pub(crate) fn metadata(&self) -> String {
        format!(
            "Metadata-Version: 2.1\nName: {}\nVersion: {}\n",
            self.name, self.version
        )
    }

    pub(crate) fn wheel_metadata(&self) -> String {
        format!(
            "Wheel-Version: 1.0\nGenerator: pbu {PBU_VERSION}\nRoot-Is-Purelib: false\nTag: {}-{}-{}\nBuild: 1",
            self.python_tag, self.abi_tag, self.platform_tag
        )
    }
}

/// Packs a single compiled extension into a wheel next to it.
///
/// # Errors
/// Returns an error if the scratch directory, metadata, or archive cannot be
/// written. Name and version problems are reported as user errors.
pub fn pyd2wheel(_ctx: &CommandContext, request: &Pyd2WheelRequest) -> Result<ExecutionOutcome> {
    let pyd_file = &request.pyd_file;
    if !pyd_file.is_file() {
        return Ok(missing_file(
            pyd_file,
            "pass the path of an existing compiled extension",
        ));
    }
    let file_name = pyd_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parsed = match PydFilename::parse(&file_name) {
        Ok(parsed) => parsed,
        Err(err) => {
            return Ok(ExecutionOutcome::user_error(
                err.to_string(),
                json!({ "pyd_file": file_name, "formats": [LONG_FORMAT, SHORT_FORMAT] }),
            ))
        }
    };
    let spec = match WheelSpec::resolve(
        &parsed,
        &file_name,
        request.version.as_deref(),
        &request.abi_tag,
    ) {
        Ok(spec) => spec,
        Err(err) => {
            return Ok(ExecutionOutcome::user_error(
                err.to_string(),
                json!({ "pyd_file": file_name, "hint": "pass --package-version" }),
            ))
        }
    };
    tracing::info!(
        name = %spec.name,
        version = %spec.version,
        python_tag = %spec.python_tag,
        abi_tag = %spec.abi_tag,
        platform_tag = %spec.platform_tag,
        "packing extension"
    );

    let wheel = build_wheel(pyd_file, &spec)?;
    Ok(ExecutionOutcome::success(
        format!("created wheel file: {}", wheel.display()),
        json!({
            "wheel": wheel.display().to_string(),
            "name": spec.name,
            "version": spec.version,
            "python_tag": spec.python_tag,
            "abi_tag": spec.abi_tag,
            "platform_tag": spec.platform_tag,
        }),
    ))
}

pub(crate) fn build_wheel(pyd_file: &Path, spec: &WheelSpec) -> Result<PathBuf> {
    let parent = pyd_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let scratch = tempfile::Builder::new()
        .prefix(".pbu-wheel-")
        .tempdir_in(parent)
        .with_context(|| format!("creating scratch directory in {}", parent.display()))?;
    let root = scratch.path();

    let file_name = pyd_file
        .file_name()
        .with_context(|| format!("{} has no file name", pyd_file.display()))?;
    fs::copy(pyd_file, root.join(file_name))
        .with_context(|| format!("copying {}", pyd_file.display()))?;

    let dist_info_name = spec.dist_info();
    let dist_info = root.join(&dist_info_name);
    fs::create_dir_all(&dist_info)
        .with_context(|| format!("creating {}", dist_info.display()))?;
    fs::write(dist_info.join("METADATA"), spec.metadata())?;
    fs::write(dist_info.join("WHEEL"), spec.wheel_metadata())?;
    let record = render_record(root, &dist_info_name)?;
    fs::write(dist_info.join("RECORD"), record)?;

    let target = parent.join(spec.wheel_file_name());
    if target.exists() {
        fs::remove_file(&target)
            .with_context(|| format!("removing existing {}", target.display()))?;
    }
    if let Err(err) = zip_directory(root, &target) {
        let _ = fs::remove_file(&target);
        return Err(err);
    }
    scratch
        .close()
        .context("removing scratch directory")?;
    tracing::info!(wheel = %target.display(), "created wheel");
    Ok(target)
}

/// One `path,sha256=<hex>,<size>` line per file, plus the unhashed RECORD entry.
pub(crate) fn render_record(root: &Path, dist_info: &str) -> Result<String> {
    let mut records = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let digest = compute_file_sha256(entry.path())?;
        let size = entry.metadata()?.len();
        let relative = relative_path_str(entry.path(), root);
        records.push(format!("{relative},sha256={digest},{size}"));
    }
    records.push(format!("{dist_info}/RECORD,,"));
    let mut body = records.join("\n");
    body.push('\n');
    Ok(body)
}

fn zip_directory(root: &Path, target: &Path) -> Result<()> {
    let file = File::create(target).with_context(|| format!("creating {}", target.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        zip.start_file(relative_path_str(entry.path(), root), options)?;
        let mut source = File::open(entry.path())
            .with_context(|| format!("reading {}", entry.path().display()))?;
        io::copy(&mut source, &mut zip)?;
    }
    zip.finish()?;
    Ok(())
}
