//! Text layout and rasterization using ab_glyph
//!
//! The font comes from the config, or else the system's sans-serif face.
//! With neither the engine still reports approximate metrics so
//! hit-testing works, but draws no glyphs.

use std::path::Path;

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use anyhow::Context;
use tiny_skia::{Pixmap, PremultipliedColorU8};

use crate::annotations::TextMeasure;
use crate::config::{AnnotationColor, EditorConfig};
use crate::domain::Point;

/// Advance per character, as a fraction of the font size, when no font
/// is available
const FALLBACK_ADVANCE: f32 = 0.55;

/// Horizontal placement of a text run relative to its origin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// Origin is the start of the baseline
    BaselineLeft,
    /// Origin is the center of the run, both axes
    Center,
}

#[derive(Clone, Default)]
pub struct TextEngine {
    font: Option<FontArc>,
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl TextEngine {
    /// Engine with approximate metrics and no glyph output
    pub fn fallback() -> Self {
        Self { font: None }
    }

    pub fn from_font(font: FontArc) -> Self {
        Self { font: Some(font) }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font: {}", path.display()))?;
        let font = FontArc::try_from_vec(bytes)
            .with_context(|| format!("Not a usable font: {}", path.display()))?;
        Ok(Self::from_font(font))
    }

    /// Default sans-serif face from the system font collection
    pub fn system() -> Option<Self> {
        use font_kit::family_name::FamilyName;
        use font_kit::properties::Properties;
        use font_kit::source::SystemSource;

        let handle = SystemSource::new()
            .select_best_match(&[FamilyName::SansSerif], &Properties::new())
            .ok()?;
        let font = handle.load().ok()?;
        let bytes = font.copy_font_data()?;
        let font = FontArc::try_from_vec((*bytes).clone()).ok()?;
        log::debug!("Using system font {:?}", font_family(&handle));
        Some(Self::from_font(font))
    }

    /// Load the configured font, then a system sans-serif face. Without
    /// either, only approximate metrics are available.
    pub fn from_config(config: &EditorConfig) -> Self {
        if let Some(path) = config.font_path.as_deref() {
            match Self::from_path(path) {
                Ok(engine) => return engine,
                Err(err) => log::warn!("Could not load configured font: {:#}", err),
            }
        }
        Self::system().unwrap_or_else(|| {
            log::warn!("No usable font found, text glyphs will not be drawn");
            Self::fallback()
        })
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw `text` in a solid color. Returns the run width.
    pub fn draw_text(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        origin: Point,
        font_size: f32,
        color: AnnotationColor,
        align: TextAlign,
    ) -> f32 {
        let width = self.text_width(text, font_size);
        let Some(font) = &self.font else {
            return width;
        };
        let scaled = font.as_scaled(PxScale::from(font_size));

        let (mut caret, baseline) = match align {
            TextAlign::BaselineLeft => (origin.x, origin.y),
            TextAlign::Center => (
                origin.x - width * 0.5,
                origin.y + (scaled.ascent() + scaled.descent()) * 0.5,
            ),
        };

        let [r, g, b, _] = color.to_rgba_u8();
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(font_size, point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i32 + gx as i32;
                let py = bounds.min.y as i32 + gy as i32;
                blend_pixel(pixmap, px, py, [r, g, b], coverage);
            });
        }
        width
    }
}

impl TextMeasure for TextEngine {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let Some(font) = &self.font else {
            return text.chars().count() as f32 * font_size * FALLBACK_ADVANCE;
        };
        let scaled = font.as_scaled(PxScale::from(font_size));
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }
}

fn font_family(handle: &font_kit::handle::Handle) -> String {
    match handle {
        font_kit::handle::Handle::Path { path, .. } => path.display().to_string(),
        font_kit::handle::Handle::Memory { .. } => "<in memory>".to_string(),
    }
}

/// Source-over blend of a solid color with partial coverage
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, rgb: [u8; 3], coverage: f32) {
    if x < 0 || y < 0 || x >= pixmap.width() as i32 || y >= pixmap.height() as i32 {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let idx = y as usize * pixmap.width() as usize + x as usize;
    let dst = pixmap.pixels()[idx];
    let inv = 1.0 - alpha;
    let mix = |src: u8, dst: u8| (src as f32 * alpha + dst as f32 * inv).round() as u8;
    let a = (alpha * 255.0 + dst.alpha() as f32 * inv).round() as u8;
    let (r, g, b) = (
        mix(rgb[0], dst.red()).min(a),
        mix(rgb[1], dst.green()).min(a),
        mix(rgb[2], dst.blue()).min(a),
    );
    if let Some(color) = PremultipliedColorU8::from_rgba(r, g, b, a) {
        pixmap.pixels_mut()[idx] = color;
    }
}
