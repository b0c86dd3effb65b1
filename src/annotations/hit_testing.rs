//! Hit testing functions for detecting clicks on annotations.

use crate::domain::{Annotation, Point};

/// Text height band above the baseline that counts as a hit
pub const TEXT_ABOVE_BASELINE: f32 = 20.0;
/// Text height band below the baseline that counts as a hit
pub const TEXT_BELOW_BASELINE: f32 = 5.0;

/// Measures rendered text width, so hit boxes match what is drawn
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Parameters shared by every hit test in a session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitParams {
    /// Grab distance around shape endpoints
    pub threshold: f32,
    /// Font size text annotations are rendered with
    pub text_font_size: f32,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            threshold: 20.0,
            text_font_size: 24.0,
        }
    }
}

/// Check if a point is within `threshold` of `target` on both axes
#[inline]
fn near(point: Point, target: Point, threshold: f32) -> bool {
    (point.x - target.x).abs() < threshold && (point.y - target.y).abs() < threshold
}

/// Check if a point grabs an annotation.
///
/// Text is hit inside its rendered bounding box. Two-point shapes are only
/// hit near one of their endpoints, not along the segment or outline.
pub fn hit_test(
    point: Point,
    annotation: &Annotation,
    params: &HitParams,
    measure: &dyn TextMeasure,
) -> bool {
    match annotation {
        Annotation::Text(text) => {
            let width = measure.text_width(&text.text, params.text_font_size);
            point.x >= text.anchor.x
                && point.x <= text.anchor.x + width
                && point.y >= text.anchor.y - TEXT_ABOVE_BASELINE
                && point.y <= text.anchor.y + TEXT_BELOW_BASELINE
        }
        other => match other.endpoints() {
            Some((start, end)) => {
                near(point, start, params.threshold) || near(point, end, params.threshold)
            }
            None => false,
        },
    }
}
