//! Layout calculation modules
//!
//! This module handles all the geometric calculations for a spine design:
//! - Stack layout (spine rectangles, aggregate metrics)
//! - Artwork bounds (safe area, minimum zoom, offset range)

mod bounds;
mod stack;
mod types;

pub use bounds::*;
pub use stack::*;
pub use types::*;
