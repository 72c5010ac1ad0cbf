//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Processing gettingstarted/pipeline.adoc -> gettingstarted/pipeline.html
//! Processing v1.0/nn_socket.adoc -> v1.0/nn_socket.html
//!     failed: conversion failed: asciidoctor exited with exit status: 1
//!
//! Converted 1 of 2 documents (1 failed)
//! ```
//!
//! ## Check
//!
//! ```text
//! gettingstarted/pipeline.adoc -> gettingstarted/pipeline.html
//! v1.0/nn_socket.adoc -> v1.0/nn_socket.html (manual page 1.0)
//!
//! 2 documents
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::job::DocumentJob;
use crate::pipeline::{BuildEvent, BuildReport};
use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

// ============================================================================
// Build output
// ============================================================================

/// Format a single build progress event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::JobStarted { source, output } => vec![format!(
            "Processing {} -> {}",
            source.display(),
            output.display()
        )],
        BuildEvent::JobFailed { error, .. } => vec![format!("    failed: {error}")],
    }
}

/// Format the closing summary of a build.
pub fn format_summary(report: &BuildReport) -> Vec<String> {
    let total = report.total();
    let failed = report.failed();
    let mut line = format!(
        "Converted {} of {} document{}",
        report.succeeded(),
        total,
        plural(total)
    );
    if failed > 0 {
        line.push_str(&format!(" ({failed} failed)"));
    }
    vec![String::new(), line]
}

/// Print a build event to stdout.
pub fn print_build_event(event: &BuildEvent) {
    for line in format_build_event(event) {
        println!("{}", line);
    }
}

/// Print build events on a background thread until every sender is dropped.
pub fn spawn_event_printer(events: Receiver<BuildEvent>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for event in events {
            print_build_event(&event);
        }
    })
}

/// Wait for the printer thread. A panic on it is re-raised here, so a broken
/// progress display never ends in a successful summary.
pub fn join_event_printer(printer: JoinHandle<()>) {
    if let Err(panic) = printer.join() {
        std::panic::resume_unwind(panic);
    }
}

/// Print the build summary to stdout.
pub fn print_summary(report: &BuildReport) {
    for line in format_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the planned jobs: one `source -> output` line each, manual pages
/// tagged with their version.
pub fn format_check_output(jobs: &[DocumentJob]) -> Vec<String> {
    let mut lines: Vec<String> = jobs
        .iter()
        .map(|job| {
            let mut line = format!(
                "{} -> {}",
                job.relative_path.display(),
                job.output_path.display()
            );
            if let Some(version) = &job.version {
                line.push_str(&format!(" (manual page {version})"));
            }
            line
        })
        .collect();
    lines.push(String::new());
    lines.push(format!("{} document{}", jobs.len(), plural(jobs.len())));
    lines
}

/// Print the planned jobs to stdout.
pub fn print_check_output(jobs: &[DocumentJob]) {
    for line in format_check_output(jobs) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::pipeline::{JobError, JobOutcome};
    use std::path::{Path, PathBuf};

    fn job(relative: &str, output: &str, version: Option<&str>) -> DocumentJob {
        DocumentJob {
            relative_path: PathBuf::from(relative),
            source_path: Path::new("_adoc").join(relative),
            output_path: PathBuf::from(output),
            version: version.map(String::from),
        }
    }

    fn outcome(relative: &str, error: Option<JobError>) -> JobOutcome {
        JobOutcome {
            job: job(relative, "out.html", None),
            timestamp: None,
            error,
        }
    }

    #[test]
    fn job_started_line() {
        let event = BuildEvent::JobStarted {
            source: "v1.0/nn_socket.adoc".into(),
            output: "v1.0/nn_socket.html".into(),
        };
        assert_eq!(
            format_build_event(&event),
            vec!["Processing v1.0/nn_socket.adoc -> v1.0/nn_socket.html"]
        );
    }

    #[test]
    fn job_failed_line_is_indented() {
        let event = BuildEvent::JobFailed {
            source: "index.adoc".into(),
            error: "cannot read _adoc/index.adoc: denied".into(),
        };
        assert_eq!(
            format_build_event(&event),
            vec!["    failed: cannot read _adoc/index.adoc: denied"]
        );
    }

    #[test]
    fn summary_all_succeeded() {
        let report = BuildReport {
            outcomes: vec![outcome("a.adoc", None), outcome("b.adoc", None)],
        };
        assert_eq!(format_summary(&report), vec!["", "Converted 2 of 2 documents"]);
    }

    #[test]
    fn summary_with_failures() {
        let failure = JobError::Conversion(BackendError::InvalidTimestamp("x".into()));
        let report = BuildReport {
            outcomes: vec![outcome("a.adoc", None), outcome("b.adoc", Some(failure))],
        };
        assert_eq!(
            format_summary(&report)[1],
            "Converted 1 of 2 documents (1 failed)"
        );
    }

    #[test]
    fn summary_single_document() {
        let report = BuildReport {
            outcomes: vec![outcome("a.adoc", None)],
        };
        assert_eq!(format_summary(&report)[1], "Converted 1 of 1 document");
    }

    #[test]
    fn summary_empty_run() {
        assert_eq!(
            format_summary(&BuildReport::default())[1],
            "Converted 0 of 0 documents"
        );
    }

    #[test]
    fn check_output_tags_manual_pages() {
        let jobs = vec![
            job("guide/intro.adoc", "guide/intro.html", None),
            job("v1.0/nn_bind.adoc", "v1.0/nn_bind.html", Some("1.0")),
        ];
        assert_eq!(
            format_check_output(&jobs),
            vec![
                "guide/intro.adoc -> guide/intro.html",
                "v1.0/nn_bind.adoc -> v1.0/nn_bind.html (manual page 1.0)",
                "",
                "2 documents",
            ]
        );
    }

    #[test]
    fn event_printer_drains_until_senders_drop() {
        let (tx, rx) = std::sync::mpsc::channel();
        let printer = spawn_event_printer(rx);
        tx.send(BuildEvent::JobStarted {
            source: "index.adoc".into(),
            output: "index.html".into(),
        })
        .unwrap();
        drop(tx);
        join_event_printer(printer);
    }

    #[test]
    #[should_panic(expected = "printer failed")]
    fn event_printer_panic_is_reraised() {
        let printer: JoinHandle<()> = std::thread::spawn(|| panic!("printer failed"));
        join_event_printer(printer);
    }

    #[test]
    fn check_output_empty() {
        assert_eq!(format_check_output(&[]), vec!["", "0 documents"]);
    }
}
