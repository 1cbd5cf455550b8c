use std::rc::Rc;

use crate::collision::{Axis, CollisionCategory};
use crate::log::trace;

/// Movement observation handed to the collision engine: where the entity was
/// at the previous tick, where it is now, and its size. The reference point
/// is the bottom-center of the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub old_x: f64,
    pub old_y: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The tile a collision was found against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub tx: i32,
    pub ty: i32,
    pub group: String,
}

/// A resolved collision: the tile hit and the corrected coordinate on the
/// category's axis. Exactly one of `x`/`y` is set, matching the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    pub tile: Tile,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Read access to the tile layer. The engine owns no tile storage; the map
/// implementation (or a test fixture) provides lookups by tile index.
pub trait TileGrid {
    fn tile_width(&self) -> f64;
    fn tile_height(&self) -> f64;

    /// Collision group of the tile at the given indices, or `None` when the
    /// cell is empty or outside the map.
    fn group_at(&self, tx: i32, ty: i32) -> Option<&str>;
}

/// Collision computation service against a [`TileGrid`].
///
/// Shared through [`Services`](crate::services::Services) so every
/// `TileCollidableModel` resolves the same instance.
pub struct MapCollision {
    grid: Rc<dyn TileGrid>,
}

impl std::fmt::Debug for MapCollision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapCollision").finish_non_exhaustive()
    }
}

impl MapCollision {
    #[must_use]
    pub fn new(grid: Rc<dyn TileGrid>) -> MapCollision {
        MapCollision { grid }
    }

    /// Marches a probe point from the footprint's previous position to its
    /// current one and reports the first tile the category reacts to.
    ///
    /// The probe sits on the leading edge of the box for the travel
    /// direction: the bottom or top edge for a vertical category, the
    /// mid-height side edge for a horizontal one. Sampling is at half-tile
    /// granularity so no tile row or column on the path is skipped. Returns
    /// `None` when there is no movement on the category's axis this tick.
    #[must_use]
    pub fn compute_collision(
        &self,
        footprint: &Footprint,
        category: &CollisionCategory,
    ) -> Option<CollisionResult> {
        let dx = footprint.x - footprint.old_x;
        let dy = footprint.y - footprint.old_y;
        let travel = match category.axis() {
            Axis::X => dx,
            Axis::Y => dy,
        };
        if travel == 0.0 {
            return None;
        }

        let tile_width = self.grid.tile_width();
        let tile_height = self.grid.tile_height();
        let (offset_x, offset_y) = probe_offset(footprint, category.axis(), dx, dy);

        let span = (dx.abs() / tile_width).max(dy.abs() / tile_height);
        let steps = (span.ceil() as u32 * 2).max(1);

        for step in 1..=steps {
            let progress = f64::from(step) / f64::from(steps);
            let probe_x = footprint.old_x + offset_x + dx * progress;
            let probe_y = footprint.old_y + offset_y + dy * progress;
            let tx = tile_index(probe_x, tile_width, dx);
            let ty = tile_index(probe_y, tile_height, dy);

            let Some(group) = self.grid.group_at(tx, ty) else {
                continue;
            };
            if !category.reacts_to(group) || !self.constraints_allow(category, tx, ty) {
                continue;
            }
            trace!(
                "collision: category {} hit {group} at ({tx}, {ty})",
                category.name()
            );
            return Some(self.resolve(footprint, category, tx, ty, group, dx, dy));
        }
        None
    }

    /// Checks the hit tile's neighbors against the category's constraints.
    /// Any forbidden neighbor group suppresses the collision.
    fn constraints_allow(&self, category: &CollisionCategory, tx: i32, ty: i32) -> bool {
        for constraint in category.constraints() {
            let (offset_tx, offset_ty) = constraint.orientation().offset();
            if let Some(neighbor) = self.grid.group_at(tx + offset_tx, ty + offset_ty) {
                if constraint.forbids(neighbor) {
                    return false;
                }
            }
        }
        true
    }

    /// Corrected coordinate: the reference point is pushed back to the face
    /// of the hit tile that the probe crossed.
    #[allow(clippy::too_many_arguments)]
    fn resolve(
        &self,
        footprint: &Footprint,
        category: &CollisionCategory,
        tx: i32,
        ty: i32,
        group: &str,
        dx: f64,
        dy: f64,
    ) -> CollisionResult {
        let tile = Tile {
            tx,
            ty,
            group: group.to_string(),
        };
        match category.axis() {
            Axis::X => {
                let tile_width = self.grid.tile_width();
                let x = if dx > 0.0 {
                    f64::from(tx) * tile_width - footprint.width / 2.0
                } else {
                    (f64::from(tx) + 1.0) * tile_width + footprint.width / 2.0
                };
                CollisionResult {
                    tile,
                    x: Some(x),
                    y: None,
                }
            }
            Axis::Y => {
                let tile_height = self.grid.tile_height();
                let y = if dy > 0.0 {
                    f64::from(ty) * tile_height - footprint.height
                } else {
                    (f64::from(ty) + 1.0) * tile_height
                };
                CollisionResult {
                    tile,
                    x: None,
                    y: Some(y),
                }
            }
        }
    }
}

/// Leading-edge probe offset from the reference point, per axis and travel
/// direction.
fn probe_offset(footprint: &Footprint, axis: Axis, dx: f64, dy: f64) -> (f64, f64) {
    match axis {
        Axis::X => {
            let side = if dx > 0.0 {
                footprint.width / 2.0
            } else {
                -footprint.width / 2.0
            };
            (side, footprint.height / 2.0)
        }
        Axis::Y => {
            let edge = if dy > 0.0 { footprint.height } else { 0.0 };
            (0.0, edge)
        }
    }
}

/// Tile index containing a coordinate. A probe sitting exactly on a tile
/// boundary belongs to the tile nearer the direction of travel.
fn tile_index(position: f64, tile_size: f64, travel: f64) -> i32 {
    let scaled = position / tile_size;
    let floor = scaled.floor();
    if scaled == floor && travel < 0.0 {
        floor as i32 - 1
    } else {
        floor as i32
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_approx_eq::assert_approx_eq;

    use super::*;
    use crate::collision::{CollisionConstraint, Orientation};

    struct GridFixture {
        tiles: HashMap<(i32, i32), &'static str>,
    }

    impl GridFixture {
        fn new(tiles: &[((i32, i32), &'static str)]) -> Rc<GridFixture> {
            Rc::new(GridFixture {
                tiles: tiles.iter().copied().collect(),
            })
        }
    }

    impl TileGrid for GridFixture {
        fn tile_width(&self) -> f64 {
            16.0
        }
        fn tile_height(&self) -> f64 {
            16.0
        }
        fn group_at(&self, tx: i32, ty: i32) -> Option<&str> {
            self.tiles.get(&(tx, ty)).copied()
        }
    }

    fn ground_row() -> Rc<GridFixture> {
        GridFixture::new(&[
            ((0, 0), "ground"),
            ((1, 0), "ground"),
            ((2, 0), "ground"),
            ((3, 0), "ground"),
        ])
    }

    fn vertical() -> CollisionCategory {
        CollisionCategory::new("legs", Axis::Y, vec!["ground".to_string()], Vec::new())
    }

    fn falling(x: f64, from: f64, to: f64) -> Footprint {
        Footprint {
            old_x: x,
            old_y: from,
            x,
            y: to,
            width: 16.0,
            height: 32.0,
        }
    }

    #[test]
    fn falling_lands_on_tile_top() {
        let map = MapCollision::new(ground_row());
        let result = map
            .compute_collision(&falling(40.0, 40.0, 8.0), &vertical())
            .unwrap();

        assert_eq!(result.tile.group, "ground");
        assert_eq!((result.tile.tx, result.tile.ty), (2, 0));
        assert!(result.x.is_none());
        assert_approx_eq!(result.y.unwrap(), 16.0);
    }

    #[test]
    fn fast_fall_does_not_tunnel() {
        let map = MapCollision::new(ground_row());
        // Far more than one tile of travel in a single tick.
        let result = map
            .compute_collision(&falling(8.0, 200.0, -50.0), &vertical())
            .unwrap();
        assert_approx_eq!(result.y.unwrap(), 16.0);
    }

    #[test]
    fn boundary_probe_belongs_to_tile_ahead() {
        let map = MapCollision::new(ground_row());
        // Ends exactly on the tile-top boundary; moving down, the tile below
        // the boundary is the one hit.
        let result = map
            .compute_collision(&falling(8.0, 24.0, 16.0), &vertical())
            .unwrap();
        assert_eq!(result.tile.ty, 0);
        assert_approx_eq!(result.y.unwrap(), 16.0);
    }

    #[test]
    fn moving_right_is_pushed_back_to_tile_face() {
        let map = GridFixture::new(&[((5, 0), "wall"), ((5, 1), "wall"), ((5, 2), "wall")]);
        let map = MapCollision::new(map);
        let category =
            CollisionCategory::new("side", Axis::X, vec!["wall".to_string()], Vec::new());
        let footprint = Footprint {
            old_x: 40.0,
            old_y: 0.0,
            x: 76.0,
            y: 0.0,
            width: 16.0,
            height: 32.0,
        };

        let result = map.compute_collision(&footprint, &category).unwrap();
        assert_eq!(result.tile.tx, 5);
        assert!(result.y.is_none());
        // Right edge flush against x = 80, reference point at 72.
        assert_approx_eq!(result.x.unwrap(), 72.0);
    }

    #[test]
    fn moving_up_is_pushed_below_tile() {
        let map = MapCollision::new(GridFixture::new(&[((0, 5), "ground")]));
        let footprint = Footprint {
            old_x: 8.0,
            old_y: 40.0,
            x: 8.0,
            y: 60.0,
            width: 16.0,
            height: 32.0,
        };

        let result = map.compute_collision(&footprint, &vertical()).unwrap();
        assert_eq!(result.tile.ty, 5);
        // Head flush against the tile bottom at y = 80.
        assert_approx_eq!(result.y.unwrap(), 48.0);
    }

    #[test]
    fn unlisted_group_is_ignored() {
        let map = MapCollision::new(GridFixture::new(&[((2, 0), "water")]));
        assert!(map
            .compute_collision(&falling(40.0, 40.0, 8.0), &vertical())
            .is_none());
    }

    #[test]
    fn constraint_suppresses_covered_tile() {
        let constrained = CollisionCategory::new(
            "head",
            Axis::Y,
            vec!["ground".to_string()],
            vec![CollisionConstraint::new(
                Orientation::North,
                vec!["ground".to_string()],
            )],
        );
        let rising = Footprint {
            old_x: 8.0,
            old_y: 40.0,
            x: 8.0,
            y: 60.0,
            width: 16.0,
            height: 32.0,
        };

        // A ground tile with more ground above it is an interior seam, not a
        // face: the constraint masks it entirely.
        let covered = MapCollision::new(GridFixture::new(&[
            ((0, 5), "ground"),
            ((0, 6), "ground"),
        ]));
        assert!(covered.compute_collision(&rising, &constrained).is_none());

        // The same tile with nothing above still collides.
        let exposed = MapCollision::new(GridFixture::new(&[((0, 5), "ground")]));
        let result = exposed.compute_collision(&rising, &constrained).unwrap();
        assert_approx_eq!(result.y.unwrap(), 48.0);
    }

    #[test]
    fn no_travel_on_axis_means_no_collision() {
        let map = MapCollision::new(ground_row());
        let mut footprint = falling(40.0, 8.0, 8.0);
        assert!(map.compute_collision(&footprint, &vertical()).is_none());

        // Purely horizontal movement does not trigger a vertical category,
        // even while overlapping a listed tile.
        footprint.x = 50.0;
        assert!(map.compute_collision(&footprint, &vertical()).is_none());
    }
}
