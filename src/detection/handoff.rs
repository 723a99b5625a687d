/// Single-shot handoff of detection results back to the view's thread.
///
/// The detector runs on a tokio task; its result comes back through a oneshot
/// channel exactly once per image, tagged with the id of the image it belongs to.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use image::DynamicImage;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::detection::traits::ObjectDetector;
use crate::errors::{LensError, LensResult};
use crate::overlay::types::DetectedObject;

#[derive(Debug, Clone)]
pub struct DetectionBatch {
    pub image_id: Uuid,
    pub objects: Vec<DetectedObject>,
    pub completed_at: DateTime<Utc>,
}

pub type PendingDetection = oneshot::Receiver<LensResult<DetectionBatch>>;

/// Start detection for `image`. Must be called from within a tokio runtime.
pub fn spawn_detection(
    detector: Arc<dyn ObjectDetector>,
    image_id: Uuid,
    image: Arc<DynamicImage>,
) -> PendingDetection {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let result = detector
            .process(&image)
            .await
            .map(|objects| DetectionBatch {
                image_id,
                objects,
                completed_at: Utc::now(),
            });
        if let Err(e) = &result {
            tracing::error!(%image_id, error = %e, "object detection failed");
        }
        if tx.send(result).is_err() {
            tracing::debug!(%image_id, "detection receiver dropped");
        }
    });
    rx
}

/// Wait for the batch. A dropped sender surfaces as `Cancelled`.
pub async fn await_detection(pending: PendingDetection) -> LensResult<DetectionBatch> {
    pending.await.map_err(|_| LensError::Cancelled)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::json_detector::FixedDetector;
    use crate::overlay::types::PixelRect;
    use async_trait::async_trait;

    struct FailingDetector;

    #[async_trait]
    impl ObjectDetector for FailingDetector {
        async fn process(&self, _image: &DynamicImage) -> LensResult<Vec<DetectedObject>> {
            Err(LensError::Detection("model unavailable".into()))
        }
    }

    fn blank() -> Arc<DynamicImage> {
        Arc::new(DynamicImage::new_rgba8(8, 8))
    }

    #[tokio::test]
    async fn delivers_one_batch_tagged_with_image_id() {
        let detector: Arc<dyn ObjectDetector> = Arc::new(FixedDetector::new(vec![
            DetectedObject::new(PixelRect::new(0, 0, 4, 4)),
        ]));
        let id = Uuid::new_v4();
        let batch = await_detection(spawn_detection(detector, id, blank())).await.unwrap();
        assert_eq!(batch.image_id, id);
        assert_eq!(batch.objects.len(), 1);
    }

    #[tokio::test]
    async fn detector_error_is_forwarded() {
        let detector: Arc<dyn ObjectDetector> = Arc::new(FailingDetector);
        let result = await_detection(spawn_detection(detector, Uuid::new_v4(), blank())).await;
        assert!(matches!(result, Err(LensError::Detection(_))));
    }

    #[tokio::test]
    async fn dropped_sender_is_cancelled() {
        let (tx, rx) = oneshot::channel::<LensResult<DetectionBatch>>();
        drop(tx);
        assert!(matches!(await_detection(rx).await, Err(LensError::Cancelled)));
    }
}
