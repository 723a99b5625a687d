/// Detectors backed by precomputed results.
///
/// `JsonDetector` reads a JSON array of detected objects from disk, which lets
/// the host binary replay results produced by an external model.
use std::path::PathBuf;

use async_trait::async_trait;
use image::DynamicImage;

use crate::detection::traits::ObjectDetector;
use crate::errors::LensResult;
use crate::overlay::types::DetectedObject;

pub struct JsonDetector {
    path: PathBuf,
}

impl JsonDetector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ObjectDetector for JsonDetector {
    async fn process(&self, image: &DynamicImage) -> LensResult<Vec<DetectedObject>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let objects: Vec<DetectedObject> = serde_json::from_str(&content)?;
        tracing::info!(
            path = %self.path.display(),
            width = image.width(),
            height = image.height(),
            count = objects.len(),
            "detections loaded"
        );
        Ok(objects)
    }
}

/// Returns the same results for every image.
pub struct FixedDetector {
    objects: Vec<DetectedObject>,
}

impl FixedDetector {
    pub fn new(objects: Vec<DetectedObject>) -> Self {
        Self { objects }
    }
}

#[async_trait]
impl ObjectDetector for FixedDetector {
    async fn process(&self, _image: &DynamicImage) -> LensResult<Vec<DetectedObject>> {
        Ok(self.objects.clone())
    }
}
