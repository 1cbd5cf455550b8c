//! Position feature.
//!
//! `TransformableModel` tracks the current and previous reference point of
//! an entity plus its size. The reference point is the bottom-center of the
//! footprint. The previous position is what the collision engine marches
//! from, so the distinction between `teleport` (which resets it) and
//! `move_location` (which keeps it one tick behind) matters.

use crate::collision::Footprint;
use crate::entity::Feature;

/// Current/previous position and size of an entity.
#[derive(Debug)]
pub struct TransformableModel {
    x: f64,
    y: f64,
    old_x: f64,
    old_y: f64,
    width: f64,
    height: f64,
}

impl TransformableModel {
    /// Creates a transformable of the given size, at the origin.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is negative or not finite.
    #[must_use]
    pub fn new(width: f64, height: f64) -> TransformableModel {
        assert!(
            width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0,
            "invalid transformable size"
        );
        TransformableModel {
            x: 0.0,
            y: 0.0,
            old_x: 0.0,
            old_y: 0.0,
            width,
            height,
        }
    }

    /// Moves by the given velocity integrated over `dt`, keeping the
    /// previous position for the collision march.
    pub fn move_location(&mut self, dt: f64, vx: f64, vy: f64) {
        self.old_x = self.x;
        self.old_y = self.y;
        self.x += vx * dt;
        self.y += vy * dt;
    }

    /// Sets the position directly. The previous position is reset too, so
    /// no movement is observed.
    pub fn teleport(&mut self, x: f64, y: f64) {
        self.teleport_x(x);
        self.teleport_y(y);
    }

    pub fn teleport_x(&mut self, x: f64) {
        self.x = x;
        self.old_x = x;
    }

    pub fn teleport_y(&mut self, y: f64) {
        self.y = y;
        self.old_y = y;
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn old_x(&self) -> f64 {
        self.old_x
    }

    #[must_use]
    pub fn old_y(&self) -> f64 {
        self.old_y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The spatial footprint handed to the collision engine.
    #[must_use]
    pub fn footprint(&self) -> Footprint {
        Footprint {
            old_x: self.old_x,
            old_y: self.old_y,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

impl Feature for TransformableModel {}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn move_location_keeps_previous_position() {
        let mut transformable = TransformableModel::new(16.0, 32.0);
        transformable.teleport(10.0, 20.0);
        transformable.move_location(0.5, 4.0, -2.0);

        assert_approx_eq!(transformable.x(), 12.0);
        assert_approx_eq!(transformable.y(), 19.0);
        assert_approx_eq!(transformable.old_x(), 10.0);
        assert_approx_eq!(transformable.old_y(), 20.0);
    }

    #[test]
    fn teleport_resets_previous_position() {
        let mut transformable = TransformableModel::new(16.0, 32.0);
        transformable.move_location(1.0, 5.0, 5.0);
        transformable.teleport(100.0, 200.0);

        let footprint = transformable.footprint();
        assert_approx_eq!(footprint.old_x, 100.0);
        assert_approx_eq!(footprint.old_y, 200.0);
        assert_approx_eq!(footprint.x, 100.0);
        assert_approx_eq!(footprint.y, 200.0);
    }

    #[test]
    #[should_panic(expected = "invalid transformable size")]
    fn negative_size_is_rejected() {
        let _ = TransformableModel::new(-1.0, 4.0);
    }
}
