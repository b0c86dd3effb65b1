//! Annotation rendering module
//!
//! This module contains:
//! - Geometry calculations for arrows, measurement caps and circles
//! - Surface rendering using tiny-skia
//! - Text layout and glyph rasterization

pub mod geometry;
pub mod image;
pub mod text;

pub use self::image::{RenderStyle, Renderer, pixmap_from_rgba, rgba_from_pixmap};
pub use self::text::{TextAlign, TextEngine};
