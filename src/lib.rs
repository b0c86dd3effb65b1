//! Photo annotation and measurement editor core
//!
//! Load a photo, draw lines, arrows, rectangles, circles, labelled
//! measurements and free text over it, then flatten the result into a
//! single raster for storage.

pub mod annotations;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod intake;
pub mod render;
pub mod session;

pub use config::EditorConfig;
pub use error::EditorError;
pub use session::{Editor, EditorMsg, EditorSession, Notification};
