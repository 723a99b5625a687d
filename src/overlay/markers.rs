/// Draw clickable markers onto a viewport-sized canvas.
///
/// Each detection gets a filled white dot at its display centre with a soft
/// black shadow around it.
use image::{DynamicImage, RgbaImage};

use crate::config::OverlayConfig;
use crate::overlay::transform::LetterboxTransform;
use crate::overlay::types::{Point, TransformedDetection, Viewport};

const DOT_COLOUR: [u8; 4] = [255, 255, 255, 255];
const SHADOW_MAX_ALPHA: f32 = 160.0;
const BACKGROUND: [u8; 4] = [0, 0, 0, 255];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f32,
    pub shadow_radius: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::from(&OverlayConfig::default())
    }
}

impl From<&OverlayConfig> for MarkerStyle {
    fn from(cfg: &OverlayConfig) -> Self {
        Self {
            radius: cfg.marker_radius,
            shadow_radius: cfg.shadow_radius,
        }
    }
}

/// Draw one marker per detection. Returns the number of markers drawn.
pub fn draw_markers(
    canvas: &mut RgbaImage,
    detections: &[TransformedDetection],
    style: &MarkerStyle,
) -> usize {
    for det in detections {
        draw_dot(canvas, det.center, style);
    }
    detections.len()
}

/// Letterbox `source` into a viewport-sized canvas, then draw the markers on top.
pub fn render_preview(
    source: &DynamicImage,
    viewport: Viewport,
    detections: &[TransformedDetection],
    style: &MarkerStyle,
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(viewport.width, viewport.height, image::Rgba(BACKGROUND));

    if let Some(t) = LetterboxTransform::fit(source.width(), source.height(), viewport) {
        let (nw, nh) = t.scaled_size(source.width(), source.height());
        if nw > 0 && nh > 0 {
            let resized = source
                .resize_exact(nw, nh, image::imageops::FilterType::CatmullRom)
                .to_rgba8();
            image::imageops::overlay(
                &mut canvas,
                &resized,
                t.pad_x.round() as i64,
                t.pad_y.round() as i64,
            );
        }
    }

    let drawn = draw_markers(&mut canvas, detections, style);
    tracing::trace!(markers = drawn, "preview rendered");
    canvas
}

fn draw_dot(canvas: &mut RgbaImage, center: Point, style: &MarkerStyle) {
    let (w, h) = canvas.dimensions();
    let outer = style.radius + style.shadow_radius.max(0.0);

    let x0 = (center.x - outer).floor().max(0.0) as i64;
    let y0 = (center.y - outer).floor().max(0.0) as i64;
    let x1 = ((center.x + outer).ceil() as i64).min(w as i64 - 1);
    let y1 = ((center.y + outer).ceil() as i64).min(h as i64 - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let d = Point::new(x as f32 + 0.5, y as f32 + 0.5)
                .distance_squared(&center)
                .sqrt();
            if d <= style.radius {
                set_pixel(canvas, x as u32, y as u32, DOT_COLOUR);
            } else if style.shadow_radius > 0.0 && d <= outer {
                // Linear falloff from the dot edge out to the shadow radius.
                let falloff = 1.0 - (d - style.radius) / style.shadow_radius;
                let alpha = (SHADOW_MAX_ALPHA * falloff).round() as u8;
                set_pixel(canvas, x as u32, y as u32, [0, 0, 0, alpha]);
            }
        }
    }
}

fn set_pixel(canvas: &mut RgbaImage, x: u32, y: u32, col: [u8; 4]) {
    let p = canvas.get_pixel_mut(x, y);
    let a = col[3] as f32 / 255.0;
    p[0] = (p[0] as f32 * (1.0 - a) + col[0] as f32 * a).round() as u8;
    p[1] = (p[1] as f32 * (1.0 - a) + col[1] as f32 * a).round() as u8;
    p[2] = (p[2] as f32 * (1.0 - a) + col[2] as f32 * a).round() as u8;
    p[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::types::{DisplayRect, PixelRect};
    use image::Rgba;

    fn det_at(cx: f32, cy: f32) -> TransformedDetection {
        TransformedDetection {
            display_box: DisplayRect { left: cx, top: cy, right: cx, bottom: cy },
            original_box: PixelRect::new(0, 0, 1, 1),
            center: Point::new(cx, cy),
        }
    }

    #[test]
    fn marker_count_matches_detections() {
        let mut canvas = RgbaImage::from_pixel(200, 200, Rgba([10, 20, 30, 255]));
        let dets = [det_at(50.0, 50.0), det_at(150.0, 150.0), det_at(500.0, 500.0)];
        assert_eq!(draw_markers(&mut canvas, &dets, &MarkerStyle::default()), 3);
        assert_eq!(draw_markers(&mut canvas, &[], &MarkerStyle::default()), 0);
    }

    #[test]
    fn dot_is_white_and_shadow_darkens() {
        let mut canvas = RgbaImage::from_pixel(200, 200, Rgba([100, 100, 100, 255]));
        let style = MarkerStyle { radius: 20.0, shadow_radius: 10.0 };
        draw_markers(&mut canvas, &[det_at(100.0, 100.0)], &style);

        assert_eq!(canvas.get_pixel(100, 100), &Rgba([255, 255, 255, 255]));
        // Just outside the dot edge: shadowed, darker than the background.
        assert!(canvas.get_pixel(122, 100)[0] < 100);
        // Beyond the shadow: untouched.
        assert_eq!(canvas.get_pixel(140, 100), &Rgba([100, 100, 100, 255]));
    }

    #[test]
    fn preview_letterboxes_source() {
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(200, 100, Rgba([0, 200, 0, 255])));
        let preview = render_preview(&source, Viewport::new(100, 100), &[], &MarkerStyle::default());

        assert_eq!(preview.dimensions(), (100, 100));
        // 200x100 scaled by 2 -> 100x50 with 25 px bars above and below.
        assert_eq!(preview.get_pixel(50, 10), &Rgba(BACKGROUND));
        assert_eq!(preview.get_pixel(50, 50), &Rgba([0, 200, 0, 255]));
        assert_eq!(preview.get_pixel(50, 90), &Rgba(BACKGROUND));
    }
}
