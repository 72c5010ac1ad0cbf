//! External tool backend trait and the subprocess implementation.
//!
//! The pipeline needs exactly two capabilities from the outside world, both
//! defined on [`DocBackend`]:
//!
//! | Capability | Production tool |
//! |---|---|
//! | **convert** a document to HTML | `asciidoctor -b html5 -o - ...` |
//! | **last change timestamp** of a file | `git log -n1 --format=%at` |
//!
//! [`CommandBackend`] fulfils both by spawning the configured programs. The
//! pipeline only sees the trait, so tests swap in a recording mock.

use crate::config::BuildConfig;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;
use tracing::debug;

/// Environment variable the converter reads instead of the wall clock.
pub const SOURCE_DATE_EPOCH: &str = "SOURCE_DATE_EPOCH";

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    ExitStatus { program: String, status: ExitStatus },
    #[error("unexpected timestamp output: {0:?}")]
    InvalidTimestamp(String),
}

/// Extra options for documents rendered as manual pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManpageOptions {
    /// `version-label` attribute (product name shown next to the version).
    pub version_label: String,
    /// `revnumber` attribute (the release version).
    pub revnumber: String,
}

/// Everything the converter needs for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertRequest {
    pub source: PathBuf,
    /// Converter backend, e.g. `html5`.
    pub backend: String,
    /// Present for versioned documents: selects the manpage doctype.
    pub manpage: Option<ManpageOptions>,
    /// Reproducibility pin, seconds since the Unix epoch.
    pub source_date_epoch: Option<i64>,
}

/// The two external capabilities the pipeline depends on.
pub trait DocBackend {
    /// Render a document, returning the converter's standard output.
    fn convert(&self, request: &ConvertRequest) -> Result<Vec<u8>, BackendError>;

    /// Last recorded change of `path`, in seconds since the Unix epoch.
    /// `Ok(None)` means the file has no history.
    fn last_change_timestamp(&self, path: &Path) -> Result<Option<i64>, BackendError>;
}

/// Backend that shells out to the converter and VCS programs.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    converter: String,
    vcs: String,
}

impl CommandBackend {
    pub fn new(converter: impl Into<String>, vcs: impl Into<String>) -> Self {
        Self {
            converter: converter.into(),
            vcs: vcs.into(),
        }
    }

    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(&config.converter.program, &config.vcs.program)
    }
}

/// Converter arguments for a request, in invocation order.
pub fn convert_args(request: &ConvertRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    if let Some(manpage) = &request.manpage {
        args.push("-a".into());
        args.push(format!("version-label={}", manpage.version_label).into());
        args.push("-a".into());
        args.push(format!("revnumber={}", manpage.revnumber).into());
        args.push("-d".into());
        args.push("manpage".into());
    }
    args.push("-b".into());
    args.push(request.backend.as_str().into());
    args.push("-o".into());
    args.push("-".into());
    args.push("-a".into());
    args.push("skip-front-matter".into());
    args.push(request.source.as_os_str().to_owned());
    args
}

/// Parse the VCS output: empty means no history.
pub fn parse_timestamp(stdout: &str) -> Result<Option<i64>, BackendError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| BackendError::InvalidTimestamp(trimmed.to_string()))
}

impl DocBackend for CommandBackend {
    fn convert(&self, request: &ConvertRequest) -> Result<Vec<u8>, BackendError> {
        let args = convert_args(request);
        let mut command = Command::new(&self.converter);
        command.args(&args).stderr(Stdio::inherit());
        // Never let an inherited value pin an unpinned document
        match request.source_date_epoch {
            Some(epoch) => command.env(SOURCE_DATE_EPOCH, epoch.to_string()),
            None => command.env_remove(SOURCE_DATE_EPOCH),
        };
        debug!(program = %self.converter, ?args, epoch = ?request.source_date_epoch, "converting");

        let output = command.output().map_err(|source| BackendError::Spawn {
            program: self.converter.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(BackendError::ExitStatus {
                program: self.converter.clone(),
                status: output.status,
            });
        }
        Ok(output.stdout)
    }

    fn last_change_timestamp(&self, path: &Path) -> Result<Option<i64>, BackendError> {
        // Run from the file's own directory so the lookup works whatever the
        // process working directory is.
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file_name = path.file_name().unwrap_or(path.as_os_str());

        let output = Command::new(&self.vcs)
            .args(["log", "-n1", "--format=%at", "--"])
            .arg(file_name)
            .current_dir(dir)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| BackendError::Spawn {
                program: self.vcs.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(BackendError::ExitStatus {
                program: self.vcs.clone(),
                status: output.status,
            });
        }
        let timestamp = parse_timestamp(&String::from_utf8_lossy(&output.stdout))?;
        debug!(path = %path.display(), ?timestamp, "last change");
        Ok(timestamp)
    }
}
