//! Persistence of saved captures
//!
//! The editor only produces [`FlattenedCapture`]s. Where they end up is
//! decided by a [`PersistenceSink`] supplied by the host application.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FlattenedCapture;

/// Record of one saved capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureRecord {
    pub id: String,
    /// Encoded image, relative to the sink root
    pub image_file: PathBuf,
    /// Number of annotations flattened into the image
    pub annotations: usize,
    pub width: u32,
    pub height: u32,
    pub date: DateTime<Utc>,
}

/// Destination for flattened captures
pub trait PersistenceSink {
    fn persist(&mut self, capture: &FlattenedCapture) -> Result<MeasureRecord>;
}

/// Stores each capture as an image file next to an `index.json` of records
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub const INDEX_FILE: &'static str = "index.json";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default location under the user data directory
    pub fn default_location() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("photomeasure").join("measures"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(Self::INDEX_FILE)
    }

    /// Records in save order
    pub fn load_index(&self) -> Result<Vec<MeasureRecord>> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read index: {}", path.display()))?;
        let records = serde_json::from_str(&json)
            .with_context(|| format!("Malformed index: {}", path.display()))?;
        Ok(records)
    }

    /// Records with the most recent save first
    pub fn records_newest_first(&self) -> Result<Vec<MeasureRecord>> {
        let mut records = self.load_index()?;
        records.reverse();
        Ok(records)
    }

    fn write_index(&self, records: &[MeasureRecord]) -> Result<()> {
        let path = self.index_path();
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write index: {}", path.display()))?;
        Ok(())
    }
}

/// Identifier derived from the save time, unique within a sink
fn record_id(date: &DateTime<Utc>, existing: &[MeasureRecord]) -> String {
    let base = date.format("%Y%m%d-%H%M%S%3f").to_string();
    let mut id = base.clone();
    let mut n = 1;
    while existing.iter().any(|r| r.id == id) {
        id = format!("{base}-{n}");
        n += 1;
    }
    id
}

impl PersistenceSink for DirectorySink {
    fn persist(&mut self, capture: &FlattenedCapture) -> Result<MeasureRecord> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;

        let mut records = self.load_index()?;
        let id = record_id(&capture.created_at, &records);
        let image_file = PathBuf::from(format!("measure-{id}.{}", capture.format.extension()));
        let image_path = self.root.join(&image_file);
        std::fs::write(&image_path, &capture.image)
            .with_context(|| format!("Failed to write image: {}", image_path.display()))?;

        let record = MeasureRecord {
            id,
            image_file,
            annotations: capture.annotation_count,
            width: capture.width,
            height: capture.height,
            date: capture.created_at,
        };
        records.push(record.clone());
        self.write_index(&records)?;
        log::info!(
            "Saved capture {} with {} annotation(s) to {}",
            record.id,
            record.annotations,
            image_path.display()
        );
        Ok(record)
    }
}
