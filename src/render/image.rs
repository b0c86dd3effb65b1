//! Surface rendering for annotations using tiny-skia
//!
//! The renderer is stateless: every redraw repaints the base image and all
//! annotations from scratch.

use image::RgbaImage;
use tiny_skia::{
    Color, ColorU8, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

use super::geometry::{arrow, circle_radius, measure};
use super::text::{TextAlign, TextEngine};
use crate::config::{AnnotationColor, EditorConfig, PlaqueStyle};
use crate::domain::{Annotation, AnnotationId, MeasureAnnotation, Point, normalize_rect};

/// Extra stroke width of the halo drawn under a selected annotation
const HALO_SPREAD: f32 = 8.0;
/// Opacity of the selection halo
const HALO_ALPHA: u8 = 90;

/// Stroke and text metrics used when drawing annotations
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStyle {
    pub stroke_width: f32,
    pub selected_stroke_width: f32,
    pub arrow_head_length: f32,
    pub cap_half_length: f32,
    pub text_font_size: f32,
    pub label_font_size: f32,
    pub plaque: PlaqueStyle,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for RenderStyle {
    fn from(config: &EditorConfig) -> Self {
        Self {
            stroke_width: config.stroke_width,
            selected_stroke_width: config.selected_stroke_width,
            arrow_head_length: config.arrow_head_length,
            cap_half_length: config.measure_cap_half_length,
            text_font_size: config.text_font_size,
            label_font_size: config.label_font_size,
            plaque: config.label_plaque,
        }
    }
}

/// Paints annotations onto a surface
pub struct Renderer<'a> {
    style: &'a RenderStyle,
    text: &'a TextEngine,
}

impl<'a> Renderer<'a> {
    pub fn new(style: &'a RenderStyle, text: &'a TextEngine) -> Self {
        Self { style, text }
    }

    /// Repaint the whole surface.
    ///
    /// A missing base image leaves the background transparent; annotations
    /// are still drawn. The transient shape is drawn last, never highlighted.
    pub fn redraw<'b>(
        &self,
        surface: &mut Pixmap,
        base: Option<&Pixmap>,
        annotations: impl IntoIterator<Item = (AnnotationId, &'b Annotation)>,
        selected: Option<AnnotationId>,
        transient: Option<&Annotation>,
    ) {
        surface.fill(Color::TRANSPARENT);

        if let Some(base) = base {
            let sx = surface.width() as f32 / base.width() as f32;
            let sy = surface.height() as f32 / base.height() as f32;
            surface.draw_pixmap(
                0,
                0,
                base.as_ref(),
                &PixmapPaint::default(),
                Transform::from_scale(sx, sy),
                None,
            );
        }

        for (id, annotation) in annotations {
            self.draw_annotation(surface, annotation, selected == Some(id));
        }

        if let Some(transient) = transient {
            self.draw_annotation(surface, transient, false);
        }
    }

    /// Draw a single annotation, with a halo and wider stroke if selected
    pub fn draw_annotation(&self, pixmap: &mut Pixmap, annotation: &Annotation, selected: bool) {
        let color = annotation.color();
        let width = if selected {
            self.style.selected_stroke_width
        } else {
            self.style.stroke_width
        };

        if let Annotation::Text(text) = annotation {
            self.text.draw_text(
                pixmap,
                &text.text,
                text.anchor,
                self.style.text_font_size,
                color,
                TextAlign::BaselineLeft,
            );
            return;
        }

        let Some(path) = self.build_outline_path(annotation) else {
            log::debug!("Skipping degenerate {} annotation", annotation.kind().name());
            return;
        };

        if selected {
            stroke_path(pixmap, &path, color, HALO_ALPHA, width + HALO_SPREAD);
        }
        stroke_path(pixmap, &path, color, 255, width);

        if let Annotation::Measure(m) = annotation {
            self.draw_measure_label(pixmap, m);
        }
    }

    /// Stroked outline of a two-point annotation
    fn build_outline_path(&self, annotation: &Annotation) -> Option<tiny_skia::Path> {
        match annotation {
            Annotation::Line(s) => build_segments_path(&[(s.start, s.end)]),
            Annotation::Arrow(s) => {
                let [h1, h2] = arrow::head_segments(s.start, s.end, self.style.arrow_head_length);
                build_segments_path(&[(s.start, s.end), (h1.start, h1.end), (h2.start, h2.end)])
            }
            Annotation::Rect(s) => build_rect_path(s.start, s.end),
            Annotation::Circle(s) => {
                PathBuilder::from_circle(s.start.x, s.start.y, circle_radius(s.start, s.end))
            }
            Annotation::Measure(m) => {
                let [c1, c2] = measure::cap_segments(m.start, m.end, self.style.cap_half_length);
                build_segments_path(&[(m.start, m.end), (c1.start, c1.end), (c2.start, c2.end)])
            }
            Annotation::Text(_) => None,
        }
    }

    /// Opaque plaque with the label centered on the segment midpoint
    fn draw_measure_label(&self, pixmap: &mut Pixmap, m: &MeasureAnnotation) {
        let Some(label) = m.label.as_deref() else {
            return;
        };
        let mid = m.start.midpoint(m.end);
        let plaque = &self.style.plaque;
        if let Some(rect) = tiny_skia::Rect::from_xywh(
            mid.x - plaque.width / 2.0,
            mid.y - plaque.height * 2.0 / 3.0,
            plaque.width,
            plaque.height,
        ) {
            pixmap.fill_rect(rect, &solid_paint(plaque.color, 255), Transform::identity(), None);
        }
        self.text.draw_text(
            pixmap,
            label,
            mid,
            self.style.label_font_size,
            m.color,
            TextAlign::Center,
        );
    }
}

fn solid_paint(color: AnnotationColor, alpha: u8) -> Paint<'static> {
    let [r, g, b, _] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, alpha);
    paint.anti_alias = true;
    paint
}

fn stroke_path(pixmap: &mut Pixmap, path: &tiny_skia::Path, color: AnnotationColor, alpha: u8, width: f32) {
    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(path, &solid_paint(color, alpha), &stroke, Transform::identity(), None);
}

/// Build a path of disconnected straight segments
fn build_segments_path(segments: &[(Point, Point)]) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for (start, end) in segments {
        pb.move_to(start.x, start.y);
        pb.line_to(end.x, end.y);
    }
    pb.finish()
}

/// Build a rectangle path from any two opposite corners
fn build_rect_path(a: Point, b: Point) -> Option<tiny_skia::Path> {
    let (min_x, min_y, max_x, max_y) = normalize_rect(a.x, a.y, b.x, b.y);
    let mut pb = PathBuilder::new();
    pb.move_to(min_x, min_y);
    pb.line_to(max_x, min_y);
    pb.line_to(max_x, max_y);
    pb.line_to(min_x, max_y);
    pb.close();
    pb.finish()
}

/// Convert an RgbaImage into a premultiplied pixmap
pub fn pixmap_from_rgba(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Convert a premultiplied pixmap back into an RgbaImage
pub fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}
