//! Batch processing shell around the core redactor
//!
//! The calling-application layer: reads input files, runs the
//! [`FooterRedactor`], writes cleaned outputs, generates best-effort
//! previews and records results in the [`SessionStore`]. Documents are
//! independent, so a batch fans out across files; pages within a
//! document stay in order.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rayon::prelude::*;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::ProcessingConfig;
use crate::error::{Error, Result};
use crate::redactor::FooterRedactor;
use crate::session::{ProcessedFile, SessionStore};
use crate::utils::Metrics;

/// Prefix applied to cleaned output file names.
const OUTPUT_PREFIX: &str = "footer_removed_";

/// Processes one document end to end.
#[async_trait]
pub trait DocumentProcessor: Send + Sync {
    async fn process(&self, input: &Path, output_dir: &Path) -> Result<FileReport>;
}

/// Result of processing a single input file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub original_name: String,
    pub output_path: PathBuf,
    pub preview_paths: Vec<PathBuf>,
    pub pages_total: usize,
    pub pages_redacted: usize,
    pub text_ops_removed: usize,
    pub duration: Duration,
}

/// One failed input within a batch.
#[derive(Debug)]
pub struct BatchFailure {
    pub input: PathBuf,
    pub error: Error,
}

/// Outcome of a batch run. Failures are collected per file so one bad
/// input never sinks the rest of the batch.
#[derive(Debug)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub reports: Vec<FileReport>,
    pub failures: Vec<BatchFailure>,
    pub duration: Duration,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Batch orchestrator holding the shared config, session store and
/// metrics.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    config: ProcessingConfig,
    redactor: FooterRedactor,
    session: Arc<SessionStore>,
    metrics: Arc<Metrics>,
}

impl BatchProcessor {
    pub fn new(config: ProcessingConfig) -> Self {
        let redactor = FooterRedactor::new(config.redaction.clone());
        Self {
            config,
            redactor,
            session: Arc::new(SessionStore::new()),
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Runs a whole batch on the blocking pool, fanning out across files.
    #[instrument(skip(self, inputs), fields(files = inputs.len()))]
    pub async fn execute(&self, inputs: Vec<PathBuf>, output_dir: PathBuf) -> Result<BatchSummary> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.process_many(&inputs, &output_dir))
            .await
            .map_err(|e| Error::IoError(io::Error::new(io::ErrorKind::Other, e)))
    }

    /// Synchronous batch entry point: processes every input, collecting
    /// per-file failures instead of aborting the batch.
    pub fn process_many(&self, inputs: &[PathBuf], output_dir: &Path) -> BatchSummary {
        let run_id = Uuid::new_v4();
        let start = Instant::now();
        info!(%run_id, files = inputs.len(), "starting batch");

        let results: Vec<(PathBuf, Result<FileReport>)> = inputs
            .par_iter()
            .map(|input| (input.clone(), self.process_file_sync(input, output_dir)))
            .collect();

        let mut reports = Vec::new();
        let mut failures = Vec::new();
        for (input, result) in results {
            match result {
                Ok(report) => {
                    self.metrics.increment_counter("files_processed");
                    self.metrics
                        .add_to_counter("pages_redacted", report.pages_redacted as u64);
                    reports.push(report);
                }
                Err(error) => {
                    self.metrics.increment_counter("files_failed");
                    warn!(input = %input.display(), %error, "file failed");
                    failures.push(BatchFailure { input, error });
                }
            }
        }

        let duration = start.elapsed();
        info!(
            %run_id,
            succeeded = reports.len(),
            failed = failures.len(),
            ?duration,
            "batch finished"
        );

        BatchSummary {
            run_id,
            reports,
            failures,
            duration,
        }
    }

    /// Processes one file: read, redact, write, previews, session record.
    pub fn process_file_sync(&self, input: &Path, output_dir: &Path) -> Result<FileReport> {
        let start = Instant::now();
        let original_name = input
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::IoError(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("input path has no usable file name: {}", input.display()),
                ))
            })?;

        let bytes = std::fs::read(input)?;
        let outcome = self.redactor.redact(&bytes)?;

        std::fs::create_dir_all(output_dir)?;
        let output_path = output_dir.join(format!("{}{}", OUTPUT_PREFIX, original_name));
        if let Err(e) = std::fs::write(&output_path, &outcome.bytes) {
            // Never leave a partial output behind.
            let _ = std::fs::remove_file(&output_path);
            return Err(e.into());
        }

        let preview_paths = self.generate_previews(&outcome.bytes, &original_name, output_dir);

        let entry = self.session.record(ProcessedFile {
            original_name: original_name.clone(),
            output_path: output_path.clone(),
            preview_paths: preview_paths.clone(),
            pages_total: outcome.pages_total,
            pages_redacted: outcome.pages_redacted,
            text_ops_removed: outcome.text_ops_removed,
            processed_at: chrono::Utc::now(),
        });

        info!(
            file = %entry.original_name,
            pages = outcome.pages_total,
            redacted = outcome.pages_redacted,
            previews = preview_paths.len(),
            "file processed"
        );

        Ok(FileReport {
            original_name,
            output_path,
            preview_paths,
            pages_total: outcome.pages_total,
            pages_redacted: outcome.pages_redacted,
            text_ops_removed: outcome.text_ops_removed,
            duration: start.elapsed(),
        })
    }

    /// Preview generation never fails the file: errors are logged and an
    /// empty list is returned.
    #[cfg(feature = "preview")]
    fn generate_previews(&self, bytes: &[u8], original_name: &str, output_dir: &Path) -> Vec<PathBuf> {
        use crate::preview::PreviewRenderer;

        if !self.config.previews.enabled {
            return Vec::new();
        }

        let renderer = PreviewRenderer::new(self.config.previews.clone());
        let images = match renderer.render(bytes) {
            Ok(images) => images,
            Err(error) => {
                warn!(file = original_name, %error, "preview generation failed");
                return Vec::new();
            }
        };

        let stem = Path::new(original_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(original_name);

        let mut paths = Vec::new();
        for image in images {
            let path = output_dir.join(format!("preview_{}_{}.png", stem, image.page_index));
            match std::fs::write(&path, &image.png) {
                Ok(()) => paths.push(path),
                Err(error) => {
                    warn!(file = original_name, %error, "could not write preview image");
                }
            }
        }
        paths
    }

    #[cfg(not(feature = "preview"))]
    fn generate_previews(&self, _bytes: &[u8], original_name: &str, _output_dir: &Path) -> Vec<PathBuf> {
        if self.config.previews.enabled {
            warn!(
                file = original_name,
                "previews requested but this build has no preview support"
            );
        }
        Vec::new()
    }
}

#[async_trait]
impl DocumentProcessor for BatchProcessor {
    async fn process(&self, input: &Path, output_dir: &Path) -> Result<FileReport> {
        let this = self.clone();
        let input = input.to_path_buf();
        let output_dir = output_dir.to_path_buf();
        tokio::task::spawn_blocking(move || this.process_file_sync(&input, &output_dir))
            .await
            .map_err(|e| Error::IoError(io::Error::new(io::ErrorKind::Other, e)))?
    }
}
