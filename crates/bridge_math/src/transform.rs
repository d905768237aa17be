//! Planar transform component.
//!
//! The play field is a flat plane. [`Transform2D`] stores a world position
//! and a rotation in degrees, where rotation 0 points along +X. Crews think
//! in compass headings instead, where heading 0 points "up" (-Y); the two
//! differ by a quarter turn.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Wrap an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Position and rotation of an object on the play field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform2D {
    /// World-space position.
    pub position: Vec2,
    /// Rotation in degrees, 0 along +X, increasing towards +Y.
    pub rotation: f32,
}

impl Transform2D {
    /// The identity transform: origin, rotation 0.
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
    };

    /// Create a transform at `position` with rotation 0.
    #[must_use]
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create a transform with position and rotation.
    #[must_use]
    pub fn from_position_rotation(position: Vec2, rotation: f32) -> Self {
        Self { position, rotation }
    }

    /// Compass heading in degrees, `[0, 360)`.
    #[must_use]
    pub fn heading(&self) -> f32 {
        normalize_degrees(self.rotation + 90.0)
    }

    /// Set the rotation from a compass heading.
    pub fn set_heading(&mut self, heading: f32) {
        self.rotation = heading - 90.0;
    }

    /// Unit vector the object is facing.
    #[must_use]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.rotation.to_radians())
    }

    /// Distance between the two positions.
    #[must_use]
    pub fn distance_to(&self, other: &Transform2D) -> f32 {
        self.position.distance(other.position)
    }

    /// Rotation (in degrees) that would face `point` from this position.
    #[must_use]
    pub fn rotation_towards(&self, point: Vec2) -> f32 {
        let delta = point - self.position;
        normalize_degrees(delta.y.atan2(delta.x).to_degrees())
    }

    /// Translate the transform by the given offset.
    #[must_use]
    pub fn translated(mut self, offset: Vec2) -> Self {
        self.position += offset;
        self
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_identity_transform() {
        let t = Transform2D::IDENTITY;
        assert_eq!(t.position, Vec2::ZERO);
        assert_eq!(t.rotation, 0.0);
    }

    #[test]
    fn test_heading_is_quarter_turn_from_rotation() {
        let mut t = Transform2D::IDENTITY;
        assert!(approx(t.heading(), 90.0));
        t.set_heading(0.0);
        assert!(approx(t.rotation, -90.0));
        assert!(approx(t.heading(), 0.0));
    }

    #[test]
    fn test_normalize_degrees() {
        assert!(approx(normalize_degrees(-90.0), 270.0));
        assert!(approx(normalize_degrees(720.0), 0.0));
        assert!(normalize_degrees(-1e-9) < 360.0);
    }

    #[test]
    fn test_forward_and_translation() {
        let t = Transform2D::from_position_rotation(Vec2::new(10.0, 0.0), 90.0);
        let moved = t.translated(t.forward() * 5.0);
        assert!(approx(moved.position.x, 10.0));
        assert!(approx(moved.position.y, 5.0));
    }

    #[test]
    fn test_rotation_towards() {
        let t = Transform2D::from_position(Vec2::ZERO);
        assert!(approx(t.rotation_towards(Vec2::new(0.0, 10.0)), 90.0));
        assert!(approx(t.rotation_towards(Vec2::new(-10.0, 0.0)), 180.0));
    }

    #[test]
    fn test_distance() {
        let a = Transform2D::from_position(Vec2::new(0.0, 0.0));
        let b = Transform2D::from_position(Vec2::new(3.0, 4.0));
        assert!(approx(a.distance_to(&b), 5.0));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let t = Transform2D::from_position_rotation(Vec2::new(1.0, 2.0), 45.0);
        let bytes = rmp_serde::to_vec(&t).unwrap();
        let restored: Transform2D = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(t, restored);
    }
}
