//! Batch pipeline orchestration.
//!
//! Drives discovery, the optional metadata-export pass, and the main
//! per-file pass over a fixed-size worker pool. Every per-file stage failure
//! is caught at the stage boundary, converted into an error record, and
//! processing continues; only discovery, preflight, and report persistence
//! are fatal.

use crate::config::{CoreConfig, PublishMode};
use crate::discovery;
use crate::error::{CoreError, CoreResult};
use crate::external::check_dependency;
use crate::external::encoder::{EncodeProfile, run_encode};
use crate::external::prober::{DurationTolerance, export_metadata};
use crate::idempotency;
use crate::publish::{LocalMirror, PublishTarget, RemoteStore, publish_output};
use crate::report::{self, ErrorCollector};
use crate::task::{FileTask, TaskState};
use crate::thumbnail;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Aggregate result of one pipeline run.
///
/// Per-file failures do not fail the run; they are visible here and in the
/// persisted error report.
#[derive(Debug)]
pub struct RunSummary {
    pub discovered: usize,
    pub converted: usize,
    pub skipped: usize,
    pub errored: usize,
    /// Number of recorded stage failures (a file can contribute several).
    pub error_count: usize,
    /// Where the error report was written.
    pub report_path: PathBuf,
    pub elapsed: Duration,
}

/// Outcome of one format's stage sequence for one file.
enum FormatOutcome {
    Converted,
    Skipped,
    Failed,
}

/// Runs the full pipeline for one configuration.
///
/// # Errors
///
/// Fatal conditions only: invalid configuration, missing tool binaries, an
/// unreadable input tree, a worker pool that cannot be built, or a report
/// that cannot be persisted.
pub fn run_pipeline(config: &CoreConfig) -> CoreResult<RunSummary> {
    let start = Instant::now();
    config.validate()?;

    check_dependency(&config.encoder_bin)?;
    check_dependency(&config.prober_bin)?;

    let files = discovery::find_processable_files(&config.input_root, &config.allowed_extensions)?;
    log::info!("Discovered {} candidate files", files.len());

    let mut tasks = files
        .iter()
        .map(|f| FileTask::new(f, &config.input_root, &config.output_root))
        .collect::<CoreResult<Vec<_>>>()?;

    fs::create_dir_all(&config.output_root)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.concurrency)
        .build()
        .map_err(|e| CoreError::OperationFailed(format!("failed to build worker pool: {e}")))?;

    let collector = ErrorCollector::default();
    let target = build_publish_target(config)?;
    let target_ref = target.as_deref();

    if config.export_metadata {
        log::info!("Running metadata export pass");
        pool.install(|| {
            tasks.par_iter().for_each(|task| export_task_metadata(config, &collector, task));
        });
    }

    pool.install(|| {
        tasks
            .par_iter_mut()
            .for_each(|task| process_task(config, target_ref, &collector, task));
    });

    let records = collector.into_records();
    let error_count = records.len();
    let report_path = report::write_error_report(&config.output_root, &records)?;

    let summary = RunSummary {
        discovered: tasks.len(),
        converted: count_state(&tasks, TaskState::Converted),
        skipped: count_state(&tasks, TaskState::Skipped),
        errored: count_state(&tasks, TaskState::Errored),
        error_count,
        report_path,
        elapsed: start.elapsed(),
    };
    log::info!(
        "Run finished: {} converted, {} skipped, {} errored",
        summary.converted,
        summary.skipped,
        summary.errored
    );
    Ok(summary)
}

fn count_state(tasks: &[FileTask], state: TaskState) -> usize {
    tasks.iter().filter(|t| t.state == state).count()
}

fn build_publish_target(config: &CoreConfig) -> CoreResult<Option<Box<dyn PublishTarget>>> {
    match config.publish {
        PublishMode::Disabled => Ok(None),
        PublishMode::Mirror => {
            let root = config.mirror_root.clone().ok_or_else(|| {
                CoreError::InvalidConfig("mirror publishing requires a mirror root".to_string())
            })?;
            Ok(Some(Box::new(LocalMirror::new(root, config.bucket.clone()))))
        }
        PublishMode::Remote => {
            let endpoint = config.store_endpoint.clone().ok_or_else(|| {
                CoreError::InvalidConfig("remote publishing requires a store endpoint".to_string())
            })?;
            Ok(Some(Box::new(RemoteStore::new(
                endpoint,
                config.bucket.clone(),
                config.store_token.clone(),
            )?)))
        }
    }
}

/// Metadata-export pass body: probes one input and writes the JSON sibling.
/// Failures are recorded and skipped, never fatal.
fn export_task_metadata(config: &CoreConfig, collector: &ErrorCollector, task: &FileTask) {
    if let Some(dir) = task.output_dir() {
        if let Err(e) = fs::create_dir_all(dir) {
            collector.record("metadata", &e.into(), &task.input_path, None);
            return;
        }
    }
    let dest = task.metadata_path();
    if let Err(e) = export_metadata(&config.prober_bin, &task.input_path, &dest) {
        collector.record("metadata", &e, &task.input_path, Some(&dest));
    }
}

/// Main-pass body: runs one file's stage pipeline to completion.
fn process_task(
    config: &CoreConfig,
    target: Option<&dyn PublishTarget>,
    collector: &ErrorCollector,
    task: &mut FileTask,
) {
    if let Some(dir) = task.output_dir() {
        if let Err(e) = fs::create_dir_all(dir) {
            collector.record("prepare", &e.into(), &task.input_path, None);
            task.state = TaskState::Errored;
            return;
        }
    }

    // Coarse pre-filter: did a prior run already produce base-name outputs?
    // This only feeds the previously-converted flag; the per-format duration
    // check below stays authoritative for skipping.
    let previously_converted = [EncodeProfile::Webm, EncodeProfile::Mp4]
        .iter()
        .any(|p| has_nonempty_file(&task.output_path(p.extension())));
    if previously_converted {
        log::debug!(
            "Base outputs for {} already present from an earlier run",
            task.input_path.display()
        );
    }

    let mut converted = 0usize;
    let mut failed = 0usize;

    if config.encode_webm {
        match run_format(config, target, collector, task, EncodeProfile::Webm, previously_converted, false) {
            FormatOutcome::Converted => converted += 1,
            FormatOutcome::Failed => failed += 1,
            FormatOutcome::Skipped => {}
        }
    }
    if config.encode_mp4 {
        match run_format(
            config,
            target,
            collector,
            task,
            EncodeProfile::Mp4,
            previously_converted,
            config.generate_thumbnails,
        ) {
            FormatOutcome::Converted => converted += 1,
            FormatOutcome::Failed => failed += 1,
            FormatOutcome::Skipped => {}
        }
    }

    task.state = if failed > 0 {
        TaskState::Errored
    } else if converted > 0 {
        TaskState::Converted
    } else {
        TaskState::Skipped
    };
}

fn has_nonempty_file(path: &std::path::Path) -> bool {
    fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}

/// Runs transcode → thumbnail (MP4 only) → publish for one format.
///
/// A failed transcode skips the format's dependent stages; thumbnail and
/// publish failures are recorded independently and do not affect each other.
fn run_format(
    config: &CoreConfig,
    target: Option<&dyn PublishTarget>,
    collector: &ErrorCollector,
    task: &FileTask,
    profile: EncodeProfile,
    previously_converted: bool,
    with_preview: bool,
) -> FormatOutcome {
    let output = task.output_path(profile.extension());

    let tolerance = DurationTolerance::default();
    let encode_skipped =
        idempotency::should_skip(&config.prober_bin, &task.input_path, &output, &tolerance);
    if !encode_skipped {
        if let Err(e) = run_encode(
            &config.encoder_bin,
            profile,
            &task.input_path,
            &output,
            &config.audio_codec,
        ) {
            collector.record("transcode", &e, &task.input_path, Some(&output));
            return FormatOutcome::Failed;
        }
    }

    let mut stage_failed = false;

    if with_preview {
        let preview = task.preview_path();
        // A still-valid preview from the run that produced the skipped encode
        // does not need regenerating.
        if encode_skipped && has_nonempty_file(&preview) {
            log::debug!("Keeping existing preview {}", preview.display());
        } else if let Err(e) =
            thumbnail::generate_preview(&config.encoder_bin, &config.prober_bin, &output, &preview)
        {
            collector.record("thumbnail", &e, &task.input_path, Some(&preview));
            stage_failed = true;
        }
    }

    if let Some(target) = target {
        if let Err(e) = publish_output(
            target,
            &task.input_path,
            &output,
            &config.output_root,
            previously_converted,
        ) {
            collector.record("publish", &e, &task.input_path, Some(&output));
            stage_failed = true;
        }
    }

    if stage_failed {
        FormatOutcome::Failed
    } else if encode_skipped {
        FormatOutcome::Skipped
    } else {
        FormatOutcome::Converted
    }
}
