use std::fmt;

use serde::{Deserialize, Serialize};

/// Axis-aligned box in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// True when the box is non-empty and lies fully inside a `width`×`height` raster.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let (w, h) = (i64::from(width), i64::from(height));
        self.left >= 0
            && self.top >= 0
            && self.right > self.left
            && self.bottom > self.top
            && i64::from(self.right) <= w
            && i64::from(self.bottom) <= h
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) - ({}, {})", self.left, self.top, self.right, self.bottom)
    }
}

/// Axis-aligned box in viewport (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl DisplayRect {
    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// On-screen rendering area, read at transform and draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionLabel {
    pub text: String,
    pub confidence: f32,
    #[serde(default)]
    pub index: i32,
}

/// One detector result. Labels are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub bounding_box: PixelRect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<i32>,
    #[serde(default)]
    pub labels: Vec<DetectionLabel>,
}

impl DetectedObject {
    pub fn new(bounding_box: PixelRect) -> Self {
        Self {
            bounding_box,
            tracking_id: None,
            labels: Vec::new(),
        }
    }

    pub fn with_label(mut self, text: &str, confidence: f32) -> Self {
        let index = self.labels.len() as i32;
        self.labels.push(DetectionLabel {
            text: text.to_string(),
            confidence,
            index,
        });
        self
    }

    pub fn has_label(&self, text: &str) -> bool {
        self.labels.iter().any(|l| l.text == text)
    }
}

/// A detection mapped into viewport space. `original_box` is kept for crops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformedDetection {
    pub display_box: DisplayRect,
    pub original_box: PixelRect,
    pub center: Point,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_within_accepts_full_frame() {
        assert!(PixelRect::new(0, 0, 640, 480).fits_within(640, 480));
    }

    #[test]
    fn fits_within_rejects_overhang_and_empty() {
        assert!(!PixelRect::new(0, 0, 641, 480).fits_within(640, 480));
        assert!(!PixelRect::new(-1, 0, 10, 10).fits_within(640, 480));
        assert!(!PixelRect::new(10, 10, 10, 20).fits_within(640, 480));
        assert!(!PixelRect::new(20, 10, 10, 20).fits_within(640, 480));
    }

    #[test]
    fn detected_object_parses_without_optional_fields() {
        let obj: DetectedObject = serde_json::from_str(
            r#"{"bounding_box":{"left":1,"top":2,"right":3,"bottom":4}}"#,
        )
        .unwrap();
        assert_eq!(obj.bounding_box, PixelRect::new(1, 2, 3, 4));
        assert!(obj.labels.is_empty());
        assert_eq!(obj.tracking_id, None);
    }
}
