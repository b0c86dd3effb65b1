//! Configuration persistence for editor settings

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub use crate::domain::AnnotationColor;

/// Editor tool selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Line,
    Arrow,
    Rect,
    Circle,
    Measure,
    Text,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Select,
        Tool::Line,
        Tool::Arrow,
        Tool::Rect,
        Tool::Circle,
        Tool::Measure,
        Tool::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Line => "line",
            Tool::Arrow => "arrow",
            Tool::Rect => "rect",
            Tool::Circle => "circle",
            Tool::Measure => "measure",
            Tool::Text => "text",
        }
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tool: {s:?}"))
    }
}

/// Raster encoding of the flattened capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Jpeg,
    Png,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Png => "png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Png => "image/png",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "png" => Ok(ExportFormat::Png),
            other => Err(format!("unsupported export format: {other:?}")),
        }
    }
}

/// Encoding options for the flattened raster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// 0.0-1.0, ignored for lossless formats
    pub quality: f32,
}

impl ExportOptions {
    /// Quality clamped into range and mapped to the 1-100 JPEG scale
    pub fn jpeg_quality(&self) -> u8 {
        let q = if self.quality.is_finite() {
            self.quality.clamp(0.0, 1.0)
        } else {
            default_quality()
        };
        ((q * 100.0).round() as u8).max(1)
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Jpeg,
            quality: default_quality(),
        }
    }
}

fn default_quality() -> f32 {
    0.9
}

/// Measurement label plaque drawn behind the label text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaqueStyle {
    pub width: f32,
    pub height: f32,
    pub color: AnnotationColor,
}

impl Default for PlaqueStyle {
    fn default() -> Self {
        Self {
            width: 80.0,
            height: 30.0,
            color: AnnotationColor::NAVY,
        }
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Surfaces are fitted to this width in pixels
    #[serde(default = "default_max_display_width")]
    pub max_display_width: u32,
    /// Color selected when the editor starts
    #[serde(default)]
    pub default_color: AnnotationColor,
    /// Colors offered by the palette
    #[serde(default = "default_palette")]
    pub palette: Vec<AnnotationColor>,
    #[serde(default)]
    pub export: ExportOptions,
    /// Endpoint grab distance for hit-testing
    #[serde(default = "default_hit_threshold")]
    pub hit_threshold: f32,
    #[serde(default = "default_arrow_head_length")]
    pub arrow_head_length: f32,
    #[serde(default = "default_measure_cap_half_length")]
    pub measure_cap_half_length: f32,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    #[serde(default = "default_selected_stroke_width")]
    pub selected_stroke_width: f32,
    #[serde(default = "default_text_font_size")]
    pub text_font_size: f32,
    #[serde(default = "default_label_font_size")]
    pub label_font_size: f32,
    #[serde(default)]
    pub label_plaque: PlaqueStyle,
    /// TrueType/OpenType font used for text glyphs
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

fn default_max_display_width() -> u32 {
    550
}

fn default_palette() -> Vec<AnnotationColor> {
    vec![
        AnnotationColor::GOLD,
        AnnotationColor::RED,
        AnnotationColor::BLUE,
        AnnotationColor::GREEN,
        AnnotationColor::WHITE,
        AnnotationColor::BLACK,
    ]
}

fn default_hit_threshold() -> f32 {
    20.0
}

fn default_arrow_head_length() -> f32 {
    20.0
}

fn default_measure_cap_half_length() -> f32 {
    15.0
}

fn default_stroke_width() -> f32 {
    4.0
}

fn default_selected_stroke_width() -> f32 {
    6.0
}

fn default_text_font_size() -> f32 {
    24.0
}

fn default_label_font_size() -> f32 {
    20.0
}

impl EditorConfig {
    /// Directory and file name under the user config dir
    pub const APP_DIR: &'static str = "photomeasure";
    pub const FILE_NAME: &'static str = "config.json";

    /// Default config file location
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|err| {
                log::warn!("Error loading config, using defaults: {:#}", err);
                Self::default()
            }),
            Some(_) => Self::default(),
            None => {
                log::warn!("Could not determine config directory, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Malformed config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("Could not determine config directory for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:#}", err);
        }
    }

    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_display_width: default_max_display_width(),
            default_color: AnnotationColor::GOLD,
            palette: default_palette(),
            export: ExportOptions::default(),
            hit_threshold: default_hit_threshold(),
            arrow_head_length: default_arrow_head_length(),
            measure_cap_half_length: default_measure_cap_half_length(),
            stroke_width: default_stroke_width(),
            selected_stroke_width: default_selected_stroke_width(),
            text_font_size: default_text_font_size(),
            label_font_size: default_label_font_size(),
            label_plaque: PlaqueStyle::default(),
            font_path: None,
        }
    }
}
