use std::path::Path;

use crate::io::domain::image_reader::ImageReader;
use crate::shared::frame::Frame;

/// Decodes image files with the `image` crate and converts to RGB8.
///
/// When `resize_max` is given, images whose longest side exceeds it are
/// shrunk to fit within `resize_max` × `resize_max`, preserving aspect
/// ratio. Smaller images are never upscaled.
pub struct ImageFileReader;

impl ImageReader for ImageFileReader {
    fn read(
        &self,
        path: &Path,
        resize_max: Option<u32>,
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        let decoded = image::open(path)?;
        let decoded = match resize_max {
            Some(max) if decoded.width() > max || decoded.height() > max => {
                decoded.thumbnail(max, max)
            }
            _ => decoded,
        };

        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Frame::new(rgb.into_raw(), width, height, 3))
    }
}
