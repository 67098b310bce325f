use std::path::Path;

use crate::shared::frame::Frame;

/// Domain interface for decoding an image file into an RGB frame.
///
/// `resize_max` caps the longest side (aspect-preserving, shrink-only);
/// `None` decodes at full resolution. Reference images are read without a
/// cap, probe images with one.
pub trait ImageReader: Send {
    fn read(&self, path: &Path, resize_max: Option<u32>)
        -> Result<Frame, Box<dyn std::error::Error>>;
}
