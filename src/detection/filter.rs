use crate::overlay::types::DetectedObject;

/// Keep only objects carrying a label whose text equals `label`. Order is kept.
pub fn filter_by_label(results: Vec<DetectedObject>, label: &str) -> Vec<DetectedObject> {
    results.into_iter().filter(|r| r.has_label(label)).collect()
}

/// Dump every detection to the debug log.
pub fn debug_print(results: &[DetectedObject]) {
    for (index, obj) in results.iter().enumerate() {
        let b = obj.bounding_box;
        tracing::debug!(
            index,
            tracking_id = ?obj.tracking_id,
            left = b.left,
            top = b.top,
            right = b.right,
            bottom = b.bottom,
            "detected object"
        );
        for label in &obj.labels {
            tracing::debug!(index, category = %label.text, confidence = label.confidence, "  label");
        }
    }
}
