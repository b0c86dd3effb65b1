//! Pure domain types with minimal dependencies
//!
//! Types here have no rendering, I/O or config dependencies so they can be
//! shared by the store, the interaction controller and the renderer.

pub mod annotation;
pub mod color;
pub mod geometry;

pub use annotation::*;
pub use color::*;
pub use geometry::*;
