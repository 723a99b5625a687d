/// Letterbox mapping between source-image pixels and the on-screen viewport.
///
/// The image is scaled uniformly by the larger of the two axis ratios so it
/// fits the viewport on its constrained axis, then centred on the other axis.
use crate::overlay::types::{DetectedObject, DisplayRect, PixelRect, Point, TransformedDetection, Viewport};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxTransform {
    /// Source pixels per viewport pixel, shared by both axes.
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
}

impl LetterboxTransform {
    /// Returns `None` when either the source or the viewport has a zero side.
    pub fn fit(source_w: u32, source_h: u32, viewport: Viewport) -> Option<Self> {
        if source_w == 0 || source_h == 0 || viewport.is_degenerate() {
            return None;
        }
        let (sw, sh) = (source_w as f32, source_h as f32);
        let (vw, vh) = (viewport.width as f32, viewport.height as f32);

        let scale = (sw / vw).max(sh / vh);
        let pad_x = (vw - sw / scale).abs() / 2.0;
        let pad_y = (vh - sh / scale).abs() / 2.0;

        Some(Self { scale, pad_x, pad_y })
    }

    pub fn to_display(&self, rect: &PixelRect) -> DisplayRect {
        DisplayRect {
            left: rect.left as f32 / self.scale + self.pad_x,
            top: rect.top as f32 / self.scale + self.pad_y,
            right: rect.right as f32 / self.scale + self.pad_x,
            bottom: rect.bottom as f32 / self.scale + self.pad_y,
        }
    }

    /// Maps a viewport point back into source pixels.
    pub fn to_source(&self, point: &Point) -> Point {
        Point::new(
            (point.x - self.pad_x) * self.scale,
            (point.y - self.pad_y) * self.scale,
        )
    }

    /// Size of the scaled image inside the viewport, rounded to whole pixels.
    pub fn scaled_size(&self, source_w: u32, source_h: u32) -> (u32, u32) {
        (
            (source_w as f32 / self.scale).round() as u32,
            (source_h as f32 / self.scale).round() as u32,
        )
    }
}

/// Maps every detection box into viewport space, preserving order and length.
///
/// A zero-sized source or viewport is treated as a no-op and yields an empty list.
pub fn transform_detections(
    source_w: u32,
    source_h: u32,
    viewport: Viewport,
    results: &[DetectedObject],
) -> Vec<TransformedDetection> {
    let Some(transform) = LetterboxTransform::fit(source_w, source_h, viewport) else {
        tracing::debug!(
            source_w,
            source_h,
            view_w = viewport.width,
            view_h = viewport.height,
            "degenerate size, skipping transform"
        );
        return Vec::new();
    };

    tracing::debug!(
        source_w,
        source_h,
        view_w = viewport.width,
        view_h = viewport.height,
        scale = transform.scale,
        "transforming {} detections",
        results.len()
    );

    results
        .iter()
        .map(|result| {
            let display_box = transform.to_display(&result.bounding_box);
            TransformedDetection {
                display_box,
                original_box: result.bounding_box,
                center: display_box.center(),
            }
        })
        .collect()
}
