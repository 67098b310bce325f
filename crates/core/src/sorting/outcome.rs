use crate::shared::constants::UNKNOWN_LABEL;

/// How classification ended for one input image. Exactly one outcome is
/// produced per image.
#[derive(Clone, Debug, PartialEq)]
pub enum ClassificationOutcome {
    /// A registered person was strictly closer than the threshold.
    Matched { person: String, distance: f32 },
    /// A face was found but nobody was close enough. `best_distance` is
    /// `None` when the registry is empty.
    Unknown { best_distance: Option<f32> },
    /// The extractor ran but found zero faces. Routed to unknown, not a
    /// failure.
    NoFaceDetected,
    /// Decode or extraction failed. The image is abandoned: no placement,
    /// recorded as a failure instead.
    ExtractionError { cause: String },
}

impl ClassificationOutcome {
    /// Output folder this outcome routes to, or `None` when the image is
    /// not placed at all.
    pub fn destination_label(&self) -> Option<&str> {
        match self {
            ClassificationOutcome::Matched { person, .. } => Some(person),
            ClassificationOutcome::Unknown { .. } | ClassificationOutcome::NoFaceDetected => {
                Some(UNKNOWN_LABEL)
            }
            ClassificationOutcome::ExtractionError { .. } => None,
        }
    }
}

/// How placement ended for one input image.
#[derive(Clone, Debug, PartialEq)]
pub enum PlacementResult {
    Copied,
    /// Destination already existed: treated as already processed, a no-op
    /// success.
    SkippedDuplicate,
    CopyError { cause: String },
}

/// Pipeline stage at which an image was lost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FailureStage {
    Extraction,
    Copy,
}

/// An image that could not be fully processed. Accumulated across the run
/// and flushed to the failure log at the end.
#[derive(Clone, Debug, PartialEq)]
pub struct FailureRecord {
    pub file_name: String,
    pub stage: FailureStage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_labels() {
        let matched = ClassificationOutcome::Matched {
            person: "alice".into(),
            distance: 0.3,
        };
        assert_eq!(matched.destination_label(), Some("alice"));

        let unknown = ClassificationOutcome::Unknown {
            best_distance: Some(0.7),
        };
        assert_eq!(unknown.destination_label(), Some("unknown"));

        assert_eq!(
            ClassificationOutcome::NoFaceDetected.destination_label(),
            Some("unknown")
        );

        let failed = ClassificationOutcome::ExtractionError {
            cause: "decode".into(),
        };
        assert_eq!(failed.destination_label(), None);
    }
}
