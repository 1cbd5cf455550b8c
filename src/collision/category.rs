use serde::{Deserialize, Serialize};

/// The axis a collision category corrects. A category reacts to movement on
/// exactly one axis; entities needing both attach one category per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// One of the eight tile neighbors, in a y-up grid (`North` is `ty + 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Orientation {
    /// Tile-index offset of the neighbor in this direction.
    #[must_use]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Orientation::North => (0, 1),
            Orientation::NorthEast => (1, 1),
            Orientation::East => (1, 0),
            Orientation::SouthEast => (1, -1),
            Orientation::South => (0, -1),
            Orientation::SouthWest => (-1, -1),
            Orientation::West => (-1, 0),
            Orientation::NorthWest => (-1, 1),
        }
    }
}

/// Suppresses a category's response on tiles whose neighbor in the given
/// orientation belongs to one of the listed groups.
///
/// The canonical use is masking the vertical face of a ground tile that sits
/// directly below another ground tile, so a horizontal category does not snag
/// on interior tile seams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionConstraint {
    orientation: Orientation,
    groups: Vec<String>,
}

impl CollisionConstraint {
    #[must_use]
    pub fn new(orientation: Orientation, groups: Vec<String>) -> CollisionConstraint {
        CollisionConstraint {
            orientation,
            groups,
        }
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Whether the neighbor group named here forbids the collision.
    #[must_use]
    pub fn forbids(&self, neighbor_group: &str) -> bool {
        self.groups.iter().any(|group| group == neighbor_group)
    }
}

/// A named, immutable collision rule: which tile groups an entity reacts to
/// on which axis, minus the constrained cases. Loaded from configuration,
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionCategory {
    name: String,
    axis: Axis,
    groups: Vec<String>,
    #[serde(default)]
    constraints: Vec<CollisionConstraint>,
}

impl CollisionCategory {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        axis: Axis,
        groups: Vec<String>,
        constraints: Vec<CollisionConstraint>,
    ) -> CollisionCategory {
        CollisionCategory {
            name: name.into(),
            axis,
            groups,
            constraints,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    #[must_use]
    pub fn constraints(&self) -> &[CollisionConstraint] {
        &self.constraints
    }

    /// Whether a tile of `group` is one this category reacts to at all.
    #[must_use]
    pub fn reacts_to(&self, group: &str) -> bool {
        self.groups.iter().any(|candidate| candidate == group)
    }
}
