//! # bridge_math
//!
//! Math types for the bridge simulation. Re-exports [`glam`] for linear
//! algebra and defines [`Transform2D`], the planar placement every space
//! object carries.

pub mod transform;

// Re-export glam types for convenience.
pub use glam::{Vec2, vec2};

pub use transform::{Transform2D, normalize_degrees};
