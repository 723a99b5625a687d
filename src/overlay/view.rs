use std::sync::Arc;

use image::{DynamicImage, RgbaImage};

use crate::errors::LensResult;
use crate::overlay::crop::{crop_original, CroppedObject};
use crate::overlay::hit_test::hit_test;
use crate::overlay::markers::{draw_markers, render_preview, MarkerStyle};
use crate::overlay::transform::{transform_detections, LetterboxTransform};
use crate::overlay::types::{DetectedObject, Point, TransformedDetection, Viewport};

type ObjectClickListener = Box<dyn FnMut(CroppedObject)>;

/// Image surface with tappable markers over detected objects.
///
/// Holds the displayed raster, the viewport size and the current marker list.
/// The marker list is replaced as a whole on every update. The view is
/// neither `Send` nor `Sync`: updates, draws and taps stay on one thread.
pub struct ClickableImageView {
    image: Option<Arc<DynamicImage>>,
    viewport: Viewport,
    style: MarkerStyle,
    /// Last detection list supplied, kept so a viewport change can re-map it.
    results: Arc<[DetectedObject]>,
    transformed: Arc<[TransformedDetection]>,
    on_object_click: Option<ObjectClickListener>,
}

impl ClickableImageView {
    pub fn new(viewport: Viewport, style: MarkerStyle) -> Self {
        Self {
            image: None,
            viewport,
            style,
            results: Arc::from(Vec::new()),
            transformed: Arc::from(Vec::new()),
            on_object_click: None,
        }
    }

    /// Called with the cropped object whenever a tap lands on a marker.
    pub fn set_on_object_click<F>(&mut self, listener: F)
    where
        F: FnMut(CroppedObject) + 'static,
    {
        self.on_object_click = Some(Box::new(listener));
    }

    /// Replace the displayed raster. Existing markers are left alone; callers
    /// clear them first with an empty `draw_detection_results`.
    pub fn set_image(&mut self, image: Arc<DynamicImage>) {
        tracing::debug!(width = image.width(), height = image.height(), "image set");
        self.image = Some(image);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn image(&self) -> Option<&Arc<DynamicImage>> {
        self.image.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Layout changed: re-map the last detection list against the new size.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.remap();
    }

    /// Map `results` into view space and replace the marker list.
    ///
    /// Without a displayed image nothing is mapped and the markers stay as they were.
    pub fn draw_detection_results(&mut self, results: Vec<DetectedObject>) {
        if self.image.is_none() {
            tracing::debug!("no image displayed, ignoring {} results", results.len());
            return;
        }
        self.results = Arc::from(results);
        self.remap();
    }

    fn remap(&mut self) {
        let Some(img) = self.image.as_ref() else {
            return;
        };
        let mapped = transform_detections(img.width(), img.height(), self.viewport, &self.results);
        self.transformed = Arc::from(mapped);
    }

    /// Snapshot of the current markers.
    pub fn transformed_results(&self) -> Arc<[TransformedDetection]> {
        Arc::clone(&self.transformed)
    }

    pub fn transform(&self) -> Option<LetterboxTransform> {
        let img = self.image.as_ref()?;
        LetterboxTransform::fit(img.width(), img.height(), self.viewport)
    }

    /// Handle a touch-down at `tap`.
    ///
    /// Returns the index of the marker hit, if any. On a hit the original box is
    /// cropped and the listener invoked once with the crop; a failed crop is
    /// returned as an error and the listener is not called.
    pub fn on_tap(&mut self, tap: Point) -> LensResult<Option<usize>> {
        let Some(index) = hit_test(tap, &self.transformed, self.style.radius) else {
            return Ok(None);
        };

        let det = self.transformed[index];
        if let Some(t) = self.transform() {
            let at = t.to_source(&tap);
            tracing::debug!(
                index,
                tap_x = tap.x,
                tap_y = tap.y,
                source_x = at.x,
                source_y = at.y,
                original = %det.original_box,
                "marker tapped"
            );
        }

        let crop = crop_original(self.image.as_deref(), det.original_box)?;
        if let Some(listener) = self.on_object_click.as_mut() {
            listener(crop);
        }
        Ok(Some(index))
    }

    /// Draw the markers onto a viewport-sized canvas. Returns the marker count.
    pub fn draw(&self, canvas: &mut RgbaImage) -> usize {
        draw_markers(canvas, &self.transformed, &self.style)
    }

    /// Render the displayed image letterboxed into the viewport with markers.
    pub fn render(&self) -> Option<RgbaImage> {
        let img = self.image.as_ref()?;
        Some(render_preview(img, self.viewport, &self.transformed, &self.style))
    }
}
