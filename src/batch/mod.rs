// src/batch/mod.rs
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::extractors::fields::FieldExtractor;
use crate::pdf::source::{load_form, PageTextSource, PdfExtractSource};
use crate::storage::StorageManager;
use crate::utils::error::{AppError, ExtractError};
use crate::utils::line_debug;

/// Where to read forms from and where to write their JSON.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub debug: bool, // Also write annotated line dumps
}

/// A form that made it all the way to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub output: PathBuf,
    pub field_count: usize,
}

/// Result of processing one input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<ProcessedFile, ExtractError>,
}

impl FileOutcome {
    pub fn file_name(&self) -> String {
        display_name(&self.input)
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    /// File names of the failed inputs, in processing order.
    pub fn failed_names(&self) -> Vec<String> {
        self.failures().map(FileOutcome::file_name).collect()
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Case-insensitive `.pdf` suffix check on the file name.
pub fn is_pdf(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(".pdf"))
        .unwrap_or(false)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct BatchRunner<S = PdfExtractSource> {
    config: BatchConfig,
    source: Arc<S>,
    extractor: FieldExtractor,
    storage: StorageManager,
}

impl BatchRunner<PdfExtractSource> {
    /// Runner that reads real PDFs with `pdf-extract`.
    pub fn new(config: BatchConfig) -> Result<Self, AppError> {
        Self::with_source(config, PdfExtractSource::new())
    }
}

impl<S> BatchRunner<S>
where
    S: PageTextSource + Send + Sync + 'static,
{
    /// Creates the output directory up front; failing that is fatal for the whole batch.
    pub fn with_source(config: BatchConfig, source: S) -> Result<Self, AppError> {
        let storage = StorageManager::new(&config.output_dir)?;
        Ok(Self {
            config,
            source: Arc::new(source),
            extractor: FieldExtractor::new(),
            storage,
        })
    }

    /// Processes every PDF in the input directory, one at a time.
    /// Per-file failures are recorded in the report and never stop the batch.
    pub async fn run(&self) -> Result<BatchReport, AppError> {
        let started_at = Utc::now();
        let inputs = self.list_inputs().await?;
        tracing::info!("Found {} PDF files in {}", inputs.len(), self.config.input_dir.display());

        let mut outcomes = Vec::with_capacity(inputs.len());
        for input in inputs {
            outcomes.push(self.process_file(&input).await);
        }

        // Each failure was already logged with its cause by `process_file`
        let report = BatchReport { started_at, finished_at: Utc::now(), outcomes };
        tracing::info!(
            "Processing finished in {} ms. Success: {}, Failures: {} {:?}",
            report.elapsed_ms(),
            report.succeeded(),
            report.failed(),
            report.failed_names()
        );

        Ok(report)
    }

    /// Runs one file through text loading, field extraction and storage.
    pub async fn process_file(&self, input: &Path) -> FileOutcome {
        let name = display_name(input);
        tracing::info!("Processing form {}...", name);

        let result = self.try_process(input).await;
        match &result {
            Ok(processed) => tracing::info!(
                "Successfully created {} ({} fields)",
                processed.output.display(),
                processed.field_count
            ),
            Err(e) => tracing::error!("Error processing {}: {}", name, e),
        }

        FileOutcome { input: input.to_path_buf(), result }
    }

    async fn try_process(&self, input: &Path) -> Result<ProcessedFile, ExtractError> {
        // PDF parsing is CPU-bound; keep it off the async worker threads
        let source = Arc::clone(&self.source);
        let path = input.to_path_buf();
        let form = tokio::task::spawn_blocking(move || load_form(&*source, &path))
            .await
            .map_err(|e| ExtractError::Task(e.to_string()))??;

        if self.config.debug {
            let dump_path = self.storage.debug_path_for(input);
            if let Err(e) = line_debug::save_line_dump(&form.title, &form.lines, &dump_path) {
                tracing::warn!("Failed to write line dump for {}: {}", display_name(input), e);
            }
        }

        let document = self.extractor.extract(&form.lines, &form.title);
        let output = self.storage.save_document(&document, input)?;

        Ok(ProcessedFile { output, field_count: document.fields.len() })
    }

    async fn list_inputs(&self) -> Result<Vec<PathBuf>, AppError> {
        let input_dir = &self.config.input_dir;
        let mut entries = tokio::fs::read_dir(input_dir).await.map_err(|e| {
            AppError::Config(format!("Cannot read input directory {}: {}", input_dir.display(), e))
        })?;

        let mut inputs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !is_pdf(&path) {
                tracing::debug!("Skipping non-PDF entry {}", path.display());
                continue;
            }
            // Follows symlinks, so a linked PDF is still processed
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => inputs.push(path),
                Ok(_) => tracing::debug!("Skipping non-file entry {}", path.display()),
                Err(e) => tracing::warn!("Cannot stat {}: {}", path.display(), e),
            }
        }

        inputs.sort();
        Ok(inputs)
    }
}
