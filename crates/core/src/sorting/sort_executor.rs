use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::classify::classifier::{MatchLabel, NearestNeighborClassifier};
use crate::extraction::domain::face_extractor::FaceExtractor;
use crate::io::domain::image_reader::ImageReader;
use crate::registry::registry::ReferenceRegistry;
use crate::sorting::outcome::{ClassificationOutcome, PlacementResult};
use crate::sorting::placement;

/// Shared, read-only context for a sorting run.
///
/// The registry is fully built before any probe is touched and never
/// mutated afterwards, so it can be shared across workers without locking.
#[derive(Clone)]
pub struct SortContext {
    pub registry: Arc<ReferenceRegistry>,
    pub classifier: NearestNeighborClassifier,
    pub output_root: PathBuf,
    /// Longest-side cap for probe decoding; `None` disables resizing.
    pub resize_max: Option<u32>,
    /// Cooperative cancellation: checked between images. Already-placed
    /// files stay in place and the report covers only attempted items.
    pub cancelled: Arc<AtomicBool>,
}

impl SortContext {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// One worker's collaborators: a decoder and an extractor. The threaded
/// executor gives each worker thread its own pair.
pub struct ProbeWorker {
    pub reader: Box<dyn ImageReader>,
    pub extractor: Box<dyn FaceExtractor>,
}

/// Result of pushing one input image through extract → classify → place.
#[derive(Clone, Debug)]
pub struct ItemResult {
    pub file_name: String,
    pub outcome: ClassificationOutcome,
    pub placement: Option<PlacementResult>,
}

/// Port: how the per-image map is executed. Infrastructure provides
/// sequential and worker-pool implementations; results come back in the
/// original item order either way, so logging stays deterministic.
pub trait SortExecutor: Send {
    fn execute(
        &self,
        workers: Vec<ProbeWorker>,
        items: &[PathBuf],
        ctx: &SortContext,
    ) -> Result<Vec<ItemResult>, Box<dyn std::error::Error>>;
}

/// Per-image state machine shared by all executors:
///
/// ```text
/// Pending → ExtractionFailed                  (no placement, failure)
///         → NoFaceDetected  → place(unknown)
///         → Matched|Unknown → place(label)    (Copied | Skipped | CopyError)
/// ```
///
/// Failures are per-item by construction: every path out of here is a
/// value, never an early return of the batch.
pub fn process_item(worker: &mut ProbeWorker, ctx: &SortContext, path: &Path) -> ItemResult {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let outcome = classify_probe(worker, ctx, path);
    let placement = outcome
        .destination_label()
        .map(|label| placement::place(path, &ctx.output_root.join(label), &file_name));

    ItemResult {
        file_name,
        outcome,
        placement,
    }
}

fn classify_probe(worker: &mut ProbeWorker, ctx: &SortContext, path: &Path) -> ClassificationOutcome {
    // Probes are downscaled before extraction; references never are.
    let frame = match worker.reader.read(path, ctx.resize_max) {
        Ok(frame) => frame,
        Err(e) => {
            return ClassificationOutcome::ExtractionError {
                cause: e.to_string(),
            }
        }
    };

    let faces = match worker.extractor.detect_and_encode(&frame) {
        Ok(faces) => faces,
        Err(e) => {
            return ClassificationOutcome::ExtractionError {
                cause: e.to_string(),
            }
        }
    };

    // First detected face only, mirroring the registry builder's policy.
    let Some(first) = faces.first() else {
        return ClassificationOutcome::NoFaceDetected;
    };

    let decision = ctx.classifier.classify(&ctx.registry, &first.embedding);
    match decision.label {
        MatchLabel::Known(person) => ClassificationOutcome::Matched {
            person,
            distance: decision.distance,
        },
        MatchLabel::Unknown => ClassificationOutcome::Unknown {
            best_distance: decision.distance.is_finite().then_some(decision.distance),
        },
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use std::fs;

    #[test]
    fn test_matched_probe_is_placed_under_person() {
        let tmp = tempfile::tempdir().unwrap();
        let probe = tmp.path().join("photo.jpg");
        fs::write(&probe, [100u8]).unwrap();

        let ctx = context(
            byte_registry(&[("alice", 100.0), ("bob", 200.0)]),
            tmp.path().join("sorted"),
            5.0,
        );
        let result = process_item(&mut byte_worker(), &ctx, &probe);

        assert_eq!(
            result.outcome,
            ClassificationOutcome::Matched {
                person: "alice".into(),
                distance: 0.0
            }
        );
        assert_eq!(result.placement, Some(PlacementResult::Copied));
        assert!(tmp.path().join("sorted/alice/photo.jpg").exists());
    }

    #[test]
    fn test_distant_probe_goes_to_unknown() {
        let tmp = tempfile::tempdir().unwrap();
        let probe = tmp.path().join("photo.jpg");
        fs::write(&probe, [50u8]).unwrap();

        let ctx = context(byte_registry(&[("alice", 100.0)]), tmp.path().join("sorted"), 5.0);
        let result = process_item(&mut byte_worker(), &ctx, &probe);

        assert_eq!(
            result.outcome,
            ClassificationOutcome::Unknown {
                best_distance: Some(50.0)
            }
        );
        assert!(tmp.path().join("sorted/unknown/photo.jpg").exists());
    }

    #[test]
    fn test_no_face_goes_to_unknown() {
        let tmp = tempfile::tempdir().unwrap();
        let probe = tmp.path().join("landscape.jpg");
        fs::write(&probe, [0u8]).unwrap();

        let ctx = context(byte_registry(&[("alice", 100.0)]), tmp.path().join("sorted"), 5.0);
        let result = process_item(&mut byte_worker(), &ctx, &probe);

        assert_eq!(result.outcome, ClassificationOutcome::NoFaceDetected);
        assert!(tmp.path().join("sorted/unknown/landscape.jpg").exists());
    }

    #[test]
    fn test_unreadable_probe_is_abandoned_without_placement() {
        let tmp = tempfile::tempdir().unwrap();
        let probe = tmp.path().join("corrupt.jpg");
        fs::write(&probe, b"!garbage").unwrap();

        let ctx = context(byte_registry(&[("alice", 100.0)]), tmp.path().join("sorted"), 5.0);
        let result = process_item(&mut byte_worker(), &ctx, &probe);

        assert!(matches!(
            result.outcome,
            ClassificationOutcome::ExtractionError { .. }
        ));
        assert_eq!(result.placement, None);
        assert!(!tmp.path().join("sorted").join("unknown").join("corrupt.jpg").exists());
    }

    #[test]
    fn test_empty_registry_reports_no_distance() {
        let tmp = tempfile::tempdir().unwrap();
        let probe = tmp.path().join("photo.jpg");
        fs::write(&probe, [100u8]).unwrap();

        let ctx = context(byte_registry(&[]), tmp.path().join("sorted"), 5.0);
        let result = process_item(&mut byte_worker(), &ctx, &probe);

        assert_eq!(
            result.outcome,
            ClassificationOutcome::Unknown {
                best_distance: None
            }
        );
    }

    #[test]
    fn test_second_pass_skips_existing_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let probe = tmp.path().join("photo.jpg");
        fs::write(&probe, [100u8]).unwrap();

        let ctx = context(byte_registry(&[("alice", 100.0)]), tmp.path().join("sorted"), 5.0);
        let first = process_item(&mut byte_worker(), &ctx, &probe);
        let second = process_item(&mut byte_worker(), &ctx, &probe);

        assert_eq!(first.placement, Some(PlacementResult::Copied));
        assert_eq!(second.placement, Some(PlacementResult::SkippedDuplicate));
    }
}
