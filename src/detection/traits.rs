use async_trait::async_trait;
use image::DynamicImage;

use crate::errors::LensResult;
use crate::overlay::types::DetectedObject;

/// Source of detection results for a single image.
///
/// Boxes are in the image's own pixel coordinates and are not guaranteed to be
/// clamped to its bounds.
#[async_trait]
pub trait ObjectDetector: Send + Sync {
    async fn process(&self, image: &DynamicImage) -> LensResult<Vec<DetectedObject>>;
}
