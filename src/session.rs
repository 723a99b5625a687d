/// Detector screen flow: show an image, detect objects, draw markers, and hand
/// tapped objects on to product search.
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use image::DynamicImage;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::detection::filter::{debug_print, filter_by_label};
use crate::detection::handoff::{await_detection, spawn_detection, DetectionBatch, PendingDetection};
use crate::detection::traits::ObjectDetector;
use crate::errors::LensResult;
use crate::overlay::crop::CroppedObject;
use crate::overlay::markers::MarkerStyle;
use crate::overlay::types::Point;
use crate::overlay::view::ClickableImageView;
use crate::source::load_preset;

const SEARCH_QUEUE_DEPTH: usize = 8;

/// A cropped object queued for product image search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub id: Uuid,
    pub crop: CroppedObject,
    pub requested_at: DateTime<Utc>,
}

pub struct DetectorSession {
    view: ClickableImageView,
    detector: Arc<dyn ObjectDetector>,
    label_filter: Option<String>,
    current_image: Option<Uuid>,
}

impl DetectorSession {
    /// Build a session and the receiving end of its search queue.
    pub fn new(
        config: &AppConfig,
        detector: Arc<dyn ObjectDetector>,
    ) -> (Self, mpsc::Receiver<SearchRequest>) {
        let (search_tx, search_rx) = mpsc::channel::<SearchRequest>(SEARCH_QUEUE_DEPTH);

        let mut view = ClickableImageView::new(
            config.viewport.viewport(),
            MarkerStyle::from(&config.overlay),
        );
        view.set_on_object_click(move |crop| {
            let request = SearchRequest {
                id: Uuid::new_v4(),
                crop,
                requested_at: Utc::now(),
            };
            tracing::info!(
                request_id = %request.id,
                width = request.crop.width(),
                height = request.crop.height(),
                "product search requested"
            );
            if let Err(e) = search_tx.try_send(request) {
                tracing::warn!(error = %e, "search queue unavailable, dropping request");
            }
        });

        let session = Self {
            view,
            detector,
            label_filter: config.detector.label_filter().map(String::from),
            current_image: None,
        };
        (session, search_rx)
    }

    pub fn view(&self) -> &ClickableImageView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ClickableImageView {
        &mut self.view
    }

    /// Clear old markers, display `image` and start detection on it.
    pub fn begin_detection(&mut self, image: DynamicImage) -> PendingDetection {
        self.view.draw_detection_results(Vec::new());

        let image = Arc::new(image);
        let image_id = Uuid::new_v4();
        self.view.set_image(Arc::clone(&image));
        self.current_image = Some(image_id);

        tracing::debug!(%image_id, "detection started");
        spawn_detection(Arc::clone(&self.detector), image_id, image)
    }

    /// Apply a finished batch. Returns `false` when the batch belongs to an image
    /// that is no longer displayed.
    pub fn apply_batch(&mut self, batch: DetectionBatch) -> bool {
        if self.current_image != Some(batch.image_id) {
            tracing::debug!(image_id = %batch.image_id, "dropping stale detection batch");
            return false;
        }

        debug_print(&batch.objects);
        let results = match &self.label_filter {
            Some(label) => filter_by_label(batch.objects, label),
            None => batch.objects,
        };
        tracing::info!(
            image_id = %batch.image_id,
            markers = results.len(),
            elapsed_ms = (Utc::now() - batch.completed_at).num_milliseconds(),
            "detection results applied"
        );
        self.view.draw_detection_results(results);
        true
    }

    /// Display `image`, wait for detection and draw the markers.
    /// Returns the number of markers shown.
    pub async fn set_view_and_detect(&mut self, image: DynamicImage) -> LensResult<usize> {
        let pending = self.begin_detection(image);
        let batch = await_detection(pending).await?;
        self.apply_batch(batch);
        Ok(self.view.transformed_results().len())
    }

    /// Show a bundled preset. A preset that cannot be loaded leaves the screen unchanged.
    pub async fn show_preset(&mut self, dir: &Path, name: &str) -> LensResult<Option<usize>> {
        match load_preset(dir, name) {
            Some(img) => self.set_view_and_detect(img).await.map(Some),
            None => Ok(None),
        }
    }

    /// Forward a tap to the view. See [`ClickableImageView::on_tap`].
    pub fn on_tap(&mut self, tap: Point) -> LensResult<Option<usize>> {
        self.view.on_tap(tap)
    }
}
