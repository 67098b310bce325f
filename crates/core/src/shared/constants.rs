pub const DETECTOR_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const DETECTOR_MODEL_URL: &str =
    "https://github.com/facesort/facesort/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMBEDDING_MODEL_NAME: &str = "w600k_r50.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://github.com/facesort/facesort/releases/download/v0.1.0/w600k_r50.onnx";

/// A probe matches a person only when its nearest reference embedding is
/// strictly closer than this (Euclidean distance).
pub const DEFAULT_THRESHOLD: f32 = 0.5;

/// Probe images are shrunk so neither side exceeds this before detection.
/// Reference images are always processed at full resolution.
pub const DEFAULT_RESIZE_MAX: u32 = 1200;

/// Output folder label for probes that match no registered person.
pub const UNKNOWN_LABEL: &str = "unknown";

pub const REFERENCE_DIR_NAME: &str = "reference_faces";
pub const INPUT_DIR_NAME: &str = "input_images";
pub const OUTPUT_DIR_NAME: &str = "sorted_images";
pub const FAILURE_LOG_NAME: &str = "copy_failed.log";
