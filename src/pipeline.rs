//! The document pipeline: discover, plan, convert.
//!
//! Each source document becomes a [`DocumentJob`] and is processed on its
//! own, strictly in sequence:
//!
//! ```text
//! 1. timestamp    git log -n1 --format=%at     (failure → unpinned build)
//! 2. read         source contents               (failure → job fails)
//! 3. front matter existing block | manual page block | nothing
//! 4. mkdir -p     output parent
//! 5. write        front matter (create/truncate)
//! 6. convert      asciidoctor ... >> output     (failure → job fails)
//! ```
//!
//! ## Failure isolation
//!
//! A failing job never stops the run. Its error is recorded in the
//! [`BuildReport`] and announced as a [`BuildEvent::JobFailed`]; the next job
//! starts regardless. Only problems that affect the whole run, like a target
//! outside the source root, are returned as [`PipelineError`].
//!
//! ## Reproducibility
//!
//! The converter sees `SOURCE_DATE_EPOCH` set to the document's last commit
//! time, never the wall clock, so an unchanged document with unchanged
//! history renders to byte-identical output.

use crate::backend::{BackendError, CommandBackend, ConvertRequest, DocBackend, ManpageOptions};
use crate::config::BuildConfig;
use crate::discover::{self, DiscoverError};
use crate::front_matter;
use crate::job::{DocumentJob, Layout};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Discover(#[from] DiscoverError),
}

/// Failure of a single job. Never aborts the run.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("cannot read {path}: {source}")]
    SourceRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("conversion failed: {0}")]
    Conversion(#[from] BackendError),
}

/// Progress events emitted while the pipeline runs.
///
/// Sent through an optional channel so the CLI can print them as they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    /// A job is about to be processed.
    JobStarted { source: PathBuf, output: PathBuf },
    /// A job failed; later jobs still run.
    JobFailed { source: PathBuf, error: String },
}

/// Result of one job.
#[derive(Debug)]
pub struct JobOutcome {
    pub job: DocumentJob,
    /// Reproducibility pin used for the conversion, if the lookup succeeded.
    pub timestamp: Option<i64>,
    pub error: Option<JobError>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of every job in a run, in processing order.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub outcomes: Vec<JobOutcome>,
}

impl BuildReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.total() - self.failed()
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// Build the job list without touching the converter or VCS.
///
/// With a target, the list holds exactly that document; otherwise every
/// document found under the source root.
pub fn plan(
    layout: &Layout,
    config: &BuildConfig,
    target: Option<&Path>,
) -> Result<Vec<DocumentJob>, DiscoverError> {
    let relative_paths = match target {
        Some(target) => vec![discover::resolve_target(&layout.source_root, target)?],
        None => discover::discover(&layout.source_root, &config.extension),
    };
    Ok(relative_paths
        .iter()
        .map(|relative| DocumentJob::new(layout, relative))
        .collect())
}

/// Run the pipeline with the subprocess backend from the config.
pub fn run(
    layout: &Layout,
    config: &BuildConfig,
    target: Option<&Path>,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, PipelineError> {
    let backend = CommandBackend::from_config(config);
    run_with_backend(&backend, layout, config, target, events)
}

/// Run the pipeline using a specific backend (allows testing with mock).
pub fn run_with_backend(
    backend: &impl DocBackend,
    layout: &Layout,
    config: &BuildConfig,
    target: Option<&Path>,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, PipelineError> {
    let jobs = plan(layout, config, target)?;
    debug!(count = jobs.len(), root = %layout.source_root.display(), "planned jobs");

    let emit = |event: BuildEvent| {
        if let Some(tx) = &events {
            // The receiver going away only loses progress output
            let _ = tx.send(event);
        }
    };

    let mut report = BuildReport::default();
    for job in jobs {
        emit(BuildEvent::JobStarted {
            source: job.relative_path.clone(),
            output: job.output_path.clone(),
        });

        let timestamp = lookup_timestamp(backend, &job);
        let error = process_job(backend, config, &job, timestamp).err();
        if let Some(err) = &error {
            emit(BuildEvent::JobFailed {
                source: job.relative_path.clone(),
                error: err.to_string(),
            });
        }
        report.outcomes.push(JobOutcome {
            job,
            timestamp,
            error,
        });
    }
    Ok(report)
}

/// Query the VCS, degrading any failure to an unpinned build.
fn lookup_timestamp(backend: &impl DocBackend, job: &DocumentJob) -> Option<i64> {
    match backend.last_change_timestamp(&job.source_path) {
        Ok(Some(epoch)) => Some(epoch),
        Ok(None) => {
            warn!(
                "{}: no version-control history, building without {}",
                job.relative_path.display(),
                crate::backend::SOURCE_DATE_EPOCH
            );
            None
        }
        Err(err) => {
            warn!(
                "{}: timestamp lookup failed ({err}), building without {}",
                job.relative_path.display(),
                crate::backend::SOURCE_DATE_EPOCH
            );
            None
        }
    }
}

/// Convert one document and write its page.
pub fn process_job(
    backend: &impl DocBackend,
    config: &BuildConfig,
    job: &DocumentJob,
    timestamp: Option<i64>,
) -> Result<(), JobError> {
    let manpage = job.version.as_ref().map(|version| ManpageOptions {
        version_label: config.converter.version_label.clone(),
        revnumber: version.clone(),
    });

    let content = fs::read_to_string(&job.source_path).map_err(|source| JobError::SourceRead {
        path: job.source_path.clone(),
        source,
    })?;
    let front_matter = front_matter::resolve(
        &content,
        job.version.as_deref(),
        &config.front_matter.layout,
    );

    if let Some(parent) = job.output_path.parent() {
        fs::create_dir_all(parent).map_err(|source| JobError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let write_err = |source| JobError::WriteOutput {
        path: job.output_path.clone(),
        source,
    };
    fs::write(&job.output_path, front_matter.as_bytes()).map_err(write_err)?;

    let request = ConvertRequest {
        source: job.source_path.clone(),
        backend: config.converter.backend.clone(),
        manpage,
        source_date_epoch: timestamp,
    };
    let html = backend.convert(&request)?;

    OpenOptions::new()
        .append(true)
        .open(&job.output_path)
        .and_then(|mut file| file.write_all(&html))
        .map_err(write_err)?;
    Ok(())
}
