use crate::shared::embedding::Embedding;
use crate::shared::frame::Frame;

/// Pixel-space bounding box of a detected face.
#[derive(Clone, Debug)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub confidence: f64,
}

/// A detected face paired with its feature vector.
#[derive(Clone, Debug)]
pub struct DetectedFace {
    pub region: FaceRegion,
    pub embedding: Embedding,
}

/// Domain interface for face detection plus embedding extraction.
///
/// Returns zero or more faces with no ordering guarantee beyond "the first
/// result is the one callers should use when they need a single face".
/// Implementations may hold inference state, hence `&mut self`.
pub trait FaceExtractor: Send {
    fn detect_and_encode(
        &mut self,
        frame: &Frame,
    ) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>>;
}
