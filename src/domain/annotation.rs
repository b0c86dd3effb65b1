//! Annotation types for marking up photos
//!
//! All annotation types store coordinates in surface pixel space.

use serde::{Deserialize, Serialize};

use super::color::AnnotationColor;
use super::geometry::Point;

/// Stable identifier of an annotation within one editing session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(pub u64);

/// Two-point annotation (line, arrow, rectangle, circle)
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeAnnotation {
    /// Start point (circle center, rectangle corner)
    pub start: Point,
    /// End point (circle edge, opposite rectangle corner)
    pub end: Point,
    pub color: AnnotationColor,
}

/// Measurement line with perpendicular end caps and an optional label
#[derive(Clone, Debug, PartialEq)]
pub struct MeasureAnnotation {
    pub start: Point,
    pub end: Point,
    pub color: AnnotationColor,
    /// Free-form measurement text such as "2.80m"
    pub label: Option<String>,
}

/// Free text anchored at its baseline start
#[derive(Clone, Debug, PartialEq)]
pub struct TextAnnotation {
    pub anchor: Point,
    pub text: String,
    pub color: AnnotationColor,
}

/// Kinds of annotation drawn with a press-drag-release gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Arrow,
    Rect,
    Circle,
    Measure,
}

/// Discriminant of an annotation, used by list views and notifications
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Line,
    Arrow,
    Rect,
    Circle,
    Measure,
    Text,
}

impl AnnotationKind {
    pub fn name(self) -> &'static str {
        match self {
            AnnotationKind::Line => "line",
            AnnotationKind::Arrow => "arrow",
            AnnotationKind::Rect => "rect",
            AnnotationKind::Circle => "circle",
            AnnotationKind::Measure => "measure",
            AnnotationKind::Text => "text",
        }
    }
}

/// Unified annotation type, stored in creation order
#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    Line(ShapeAnnotation),
    Arrow(ShapeAnnotation),
    Rect(ShapeAnnotation),
    Circle(ShapeAnnotation),
    Measure(MeasureAnnotation),
    Text(TextAnnotation),
}

impl Annotation {
    /// Build a two-point annotation of the given kind. Measurements start
    /// without a label.
    pub fn shape(kind: ShapeKind, start: Point, end: Point, color: AnnotationColor) -> Self {
        let shape = ShapeAnnotation { start, end, color };
        match kind {
            ShapeKind::Line => Annotation::Line(shape),
            ShapeKind::Arrow => Annotation::Arrow(shape),
            ShapeKind::Rect => Annotation::Rect(shape),
            ShapeKind::Circle => Annotation::Circle(shape),
            ShapeKind::Measure => Annotation::Measure(MeasureAnnotation {
                start,
                end,
                color,
                label: None,
            }),
        }
    }

    pub fn text(anchor: Point, text: impl Into<String>, color: AnnotationColor) -> Self {
        Annotation::Text(TextAnnotation {
            anchor,
            text: text.into(),
            color,
        })
    }

    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Line(_) => AnnotationKind::Line,
            Annotation::Arrow(_) => AnnotationKind::Arrow,
            Annotation::Rect(_) => AnnotationKind::Rect,
            Annotation::Circle(_) => AnnotationKind::Circle,
            Annotation::Measure(_) => AnnotationKind::Measure,
            Annotation::Text(_) => AnnotationKind::Text,
        }
    }

    pub fn color(&self) -> AnnotationColor {
        match self {
            Annotation::Line(s) | Annotation::Arrow(s) | Annotation::Rect(s) | Annotation::Circle(s) => {
                s.color
            }
            Annotation::Measure(m) => m.color,
            Annotation::Text(t) => t.color,
        }
    }

    /// Start and end points of two-point annotations; `None` for text
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        match self {
            Annotation::Line(s) | Annotation::Arrow(s) | Annotation::Rect(s) | Annotation::Circle(s) => {
                Some((s.start, s.end))
            }
            Annotation::Measure(m) => Some((m.start, m.end)),
            Annotation::Text(_) => None,
        }
    }

    /// Measurement label, if this is a labelled measurement
    pub fn label(&self) -> Option<&str> {
        match self {
            Annotation::Measure(m) => m.label.as_deref(),
            _ => None,
        }
    }

    /// Move the annotation by an offset. Shapes move both endpoints, text
    /// moves its anchor, so the rendered size never changes.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        match self {
            Annotation::Line(s) | Annotation::Arrow(s) | Annotation::Rect(s) | Annotation::Circle(s) => {
                s.start = s.start.translate(dx, dy);
                s.end = s.end.translate(dx, dy);
            }
            Annotation::Measure(m) => {
                m.start = m.start.translate(dx, dy);
                m.end = m.end.translate(dx, dy);
            }
            Annotation::Text(t) => t.anchor = t.anchor.translate(dx, dy),
        }
    }

    /// Text shown for this annotation in list views
    pub fn summary_label(&self) -> String {
        match self.label() {
            Some(label) => label.to_string(),
            None => self.kind().name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_preserves_shape_extent() {
        let mut rect = Annotation::shape(
            ShapeKind::Rect,
            Point::new(10.0, 10.0),
            Point::new(40.0, 30.0),
            AnnotationColor::GOLD,
        );
        rect.translate(5.0, -3.0);
        let (start, end) = rect.endpoints().unwrap();
        assert_eq!(start, Point::new(15.0, 7.0));
        assert_eq!(end, Point::new(45.0, 27.0));
        assert_eq!(end.x - start.x, 30.0);
        assert_eq!(end.y - start.y, 20.0);
    }

    #[test]
    fn test_translate_text_moves_anchor() {
        let mut text = Annotation::text(Point::new(1.0, 2.0), "Door", AnnotationColor::RED);
        text.translate(2.0, 2.0);
        match text {
            Annotation::Text(t) => {
                assert_eq!(t.anchor, Point::new(3.0, 4.0));
                assert_eq!(t.color, AnnotationColor::RED);
            }
            other => panic!("unexpected annotation {other:?}"),
        }
    }

    #[test]
    fn test_summary_label() {
        let mut measure = Annotation::shape(
            ShapeKind::Measure,
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            AnnotationColor::GOLD,
        );
        assert_eq!(measure.summary_label(), "measure");
        if let Annotation::Measure(m) = &mut measure {
            m.label = Some("2.80m".into());
        }
        assert_eq!(measure.summary_label(), "2.80m");
    }
}
