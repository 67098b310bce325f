use crate::sorting::outcome::{ClassificationOutcome, PlacementResult};

/// Post-run tallies for reconciliation and the final summary.
///
/// `input_total` counts attempted non-hidden input files; under cancellation
/// only the subset actually attempted is counted, so the reconciliation law
/// still holds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunReport {
    pub input_total: usize,
    /// Placed under a real person's folder (copied or already present).
    pub known_total: usize,
    /// Placed under the unknown folder (copied or already present).
    pub unknown_total: usize,
    /// Extraction or copy failures.
    pub failed_total: usize,
    pub copied: usize,
    pub skipped_duplicates: usize,
}

impl RunReport {
    /// Fold one processed image into the tallies.
    pub fn record(&mut self, outcome: &ClassificationOutcome, placement: Option<&PlacementResult>) {
        self.input_total += 1;

        match placement {
            Some(PlacementResult::Copied) => self.copied += 1,
            Some(PlacementResult::SkippedDuplicate) => self.skipped_duplicates += 1,
            _ => {}
        }

        match (outcome, placement) {
            (ClassificationOutcome::ExtractionError { .. }, _) => self.failed_total += 1,
            (_, Some(PlacementResult::CopyError { .. })) => self.failed_total += 1,
            (
                ClassificationOutcome::Matched { .. },
                Some(PlacementResult::Copied | PlacementResult::SkippedDuplicate),
            ) => self.known_total += 1,
            (
                ClassificationOutcome::Unknown { .. } | ClassificationOutcome::NoFaceDetected,
                Some(PlacementResult::Copied | PlacementResult::SkippedDuplicate),
            ) => self.unknown_total += 1,
            // A non-error outcome always carries a placement
            _ => {}
        }
    }

    /// Reconciliation law: every attempted input is placed under a person,
    /// placed under unknown, or recorded as a failure.
    pub fn is_reconciled(&self) -> bool {
        self.input_total == self.known_total + self.unknown_total + self.failed_total
    }

    /// Human-readable description of a reconciliation mismatch, or `None`
    /// when the counts balance. A mismatch is a sanity-check warning, never
    /// fatal.
    pub fn discrepancy(&self) -> Option<String> {
        if self.is_reconciled() {
            None
        } else {
            Some(format!(
                "count mismatch: {} input(s) != {} known + {} unknown + {} failed",
                self.input_total, self.known_total, self.unknown_total, self.failed_total
            ))
        }
    }

    pub fn summary_string(&self) -> String {
        let mut lines = vec![format!("Processed {} image(s):", self.input_total)];
        lines.push(format!("  matched     : {}", self.known_total));
        lines.push(format!("  unknown     : {}", self.unknown_total));
        lines.push(format!("  failed      : {}", self.failed_total));
        lines.push(format!(
            "  copied {} file(s), skipped {} already present",
            self.copied, self.skipped_duplicates
        ));
        lines.join("\n")
    }
}
