use std::path::{Path, PathBuf};

use crate::io::fs_scan;
use crate::sorting::outcome::{ClassificationOutcome, FailureRecord, FailureStage, PlacementResult};
use crate::sorting::report::RunReport;
use crate::sorting::sort_executor::{ProbeWorker, SortContext, SortExecutor};
use crate::sorting::sort_logger::SortLogger;

/// Errors that abort a sorting run before any image is processed.
///
/// Per-image failures are not errors at this level; they come back inside
/// the [`RunReport`] and failure records.
#[derive(Debug, thiserror::Error)]
pub enum SortRunError {
    #[error("Input directory does not exist: {0}")]
    MissingInputDir(PathBuf),

    #[error("Failed to list input directory {path}: {source}")]
    ListInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Sort execution failed: {0}")]
    Executor(String),
}

/// Orchestrates a full sorting run: list inputs, execute the per-image map,
/// tally the report, and collect failure records for the failure log.
pub struct SortImagesUseCase {
    executor: Box<dyn SortExecutor>,
    logger: Box<dyn SortLogger>,
}

impl SortImagesUseCase {
    pub fn new(executor: Box<dyn SortExecutor>, logger: Box<dyn SortLogger>) -> Self {
        Self { executor, logger }
    }

    pub fn execute(
        &mut self,
        workers: Vec<ProbeWorker>,
        ctx: &SortContext,
        input_dir: &Path,
    ) -> Result<(RunReport, Vec<FailureRecord>), SortRunError> {
        if !input_dir.is_dir() {
            return Err(SortRunError::MissingInputDir(input_dir.to_path_buf()));
        }

        if ctx.registry.is_empty() {
            self.logger
                .warn("reference registry is empty; every probe will be sorted as unknown");
        }

        let items = fs_scan::visible_files(input_dir).map_err(|e| SortRunError::ListInput {
            path: input_dir.to_path_buf(),
            source: e,
        })?;
        self.logger
            .info(&format!("found {} input image(s)", items.len()));

        let results = self
            .executor
            .execute(workers, &items, ctx)
            .map_err(|e| SortRunError::Executor(e.to_string()))?;

        let mut report = RunReport::default();
        let mut failures = Vec::new();
        let total = results.len();

        for (i, result) in results.iter().enumerate() {
            self.logger.progress(i + 1, total);
            self.logger
                .file_outcome(&result.file_name, &result.outcome, result.placement.as_ref());
            report.record(&result.outcome, result.placement.as_ref());

            if let ClassificationOutcome::ExtractionError { .. } = result.outcome {
                failures.push(FailureRecord {
                    file_name: result.file_name.clone(),
                    stage: FailureStage::Extraction,
                });
            } else if let Some(PlacementResult::CopyError { .. }) = result.placement {
                failures.push(FailureRecord {
                    file_name: result.file_name.clone(),
                    stage: FailureStage::Copy,
                });
            }
        }

        if let Some(mismatch) = report.discrepancy() {
            self.logger.warn(&mismatch);
        }
        self.logger.summary(&report);

        Ok((report, failures))
    }
}
