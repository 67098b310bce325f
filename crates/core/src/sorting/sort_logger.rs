use crate::sorting::outcome::{ClassificationOutcome, PlacementResult};
use crate::sorting::report::RunReport;

/// Cross-cutting logger for sorting events.
///
/// Decouples the pipeline from specific output mechanisms (stdout, log
/// crate, test capture) so orchestration code doesn't change when the
/// caller's reporting needs do.
pub trait SortLogger: Send {
    /// Report per-image progress.
    fn progress(&mut self, current: usize, total: usize);

    /// Record the outcome of one input image.
    fn file_outcome(
        &mut self,
        file_name: &str,
        outcome: &ClassificationOutcome,
        placement: Option<&PlacementResult>,
    );

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Log a non-fatal problem with the run (empty registry, count
    /// mismatch).
    fn warn(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self, _report: &RunReport) {}
}

/// Silent logger that discards all events. Used in tests where logger
/// output is irrelevant.
pub struct NullSortLogger;

impl SortLogger for NullSortLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn file_outcome(
        &mut self,
        _file_name: &str,
        _outcome: &ClassificationOutcome,
        _placement: Option<&PlacementResult>,
    ) {
    }
    fn info(&mut self, _message: &str) {}
    fn warn(&mut self, _message: &str) {}
}

/// CLI-oriented logger: one `log` line per file, errors at error level,
/// summary block at completion.
pub struct StdoutSortLogger;

impl SortLogger for StdoutSortLogger {
    fn progress(&mut self, current: usize, total: usize) {
        log::debug!("processed {current}/{total}");
    }

    fn file_outcome(
        &mut self,
        file_name: &str,
        outcome: &ClassificationOutcome,
        placement: Option<&PlacementResult>,
    ) {
        match outcome_line(file_name, outcome, placement) {
            (false, line) => log::info!("{line}"),
            (true, line) => log::error!("{line}"),
        }
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn warn(&mut self, message: &str) {
        log::warn!("{message}");
    }

    fn summary(&self, report: &RunReport) {
        log::info!("\n{}", report.summary_string());
    }
}

/// Render one per-file log line. Returns `(is_error, line)`.
fn outcome_line(
    file_name: &str,
    outcome: &ClassificationOutcome,
    placement: Option<&PlacementResult>,
) -> (bool, String) {
    if let Some(PlacementResult::CopyError { cause }) = placement {
        return (true, format!("{file_name}: copy failed: {cause}"));
    }

    let suffix = match placement {
        Some(PlacementResult::SkippedDuplicate) => " (skipped: already present)",
        _ => "",
    };

    match outcome {
        ClassificationOutcome::Matched { person, distance } => (
            false,
            format!("{file_name}: {person} (distance {distance:.3}){suffix}"),
        ),
        ClassificationOutcome::Unknown {
            best_distance: Some(d),
        } => (
            false,
            format!("{file_name}: unknown (nearest distance {d:.3}){suffix}"),
        ),
        ClassificationOutcome::Unknown {
            best_distance: None,
        } => (false, format!("{file_name}: unknown (empty registry){suffix}")),
        ClassificationOutcome::NoFaceDetected => (
            false,
            format!("{file_name}: no face detected -> unknown{suffix}"),
        ),
        ClassificationOutcome::ExtractionError { cause } => {
            (true, format!("{file_name}: extraction failed: {cause}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matched_line_names_person_and_distance() {
        let outcome = ClassificationOutcome::Matched {
            person: "alice".into(),
            distance: 0.312,
        };
        let (is_error, line) = outcome_line("a.jpg", &outcome, Some(&PlacementResult::Copied));
        assert!(!is_error);
        assert_eq!(line, "a.jpg: alice (distance 0.312)");
    }

    #[test]
    fn test_skipped_duplicate_is_annotated() {
        let outcome = ClassificationOutcome::Matched {
            person: "alice".into(),
            distance: 0.3,
        };
        let (_, line) = outcome_line("a.jpg", &outcome, Some(&PlacementResult::SkippedDuplicate));
        assert!(line.contains("skipped: already present"));
    }

    #[test]
    fn test_no_face_routes_to_unknown() {
        let (is_error, line) = outcome_line(
            "b.jpg",
            &ClassificationOutcome::NoFaceDetected,
            Some(&PlacementResult::Copied),
        );
        assert!(!is_error);
        assert!(line.contains("no face detected"));
    }

    #[test]
    fn test_failures_are_error_level() {
        let (is_error, _) = outcome_line(
            "c.jpg",
            &ClassificationOutcome::ExtractionError {
                cause: "decode".into(),
            },
            None,
        );
        assert!(is_error);

        let (is_error, line) = outcome_line(
            "d.jpg",
            &ClassificationOutcome::Matched {
                person: "alice".into(),
                distance: 0.2,
            },
            Some(&PlacementResult::CopyError {
                cause: "disk full".into(),
            }),
        );
        assert!(is_error);
        assert!(line.contains("copy failed"));
    }

    #[test]
    fn test_null_logger_is_noop() {
        let mut logger = NullSortLogger;
        logger.progress(1, 2);
        logger.info("hello");
        logger.warn("uh oh");
        logger.file_outcome("a.jpg", &ClassificationOutcome::NoFaceDetected, None);
        logger.summary(&RunReport::default());
    }
}
