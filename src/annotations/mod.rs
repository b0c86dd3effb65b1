//! Annotation storage and hit testing
//!
//! This module provides:
//! - The ordered annotation store with its selection
//! - Hit testing used to pick annotations under the pointer

pub mod hit_testing;
pub mod store;

pub use hit_testing::{HitParams, TextMeasure, hit_test};
pub use store::{AnnotationStore, AnnotationSummary};
