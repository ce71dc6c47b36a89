use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3};
use crate::topology::Solid;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// The smallest box containing every point, or `None` for no points.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut aabb = Self {
            min: first,
            max: first,
        };
        for p in iter {
            aabb.min = aabb.min.inf(p);
            aabb.max = aabb.max.sup(p);
        }
        Some(aabb)
    }

    /// Returns `true` if the boxes overlap or touch within `margin`.
    #[must_use]
    pub fn intersects(&self, other: &Self, margin: f64) -> bool {
        (0..3).all(|i| {
            self.min[i] <= other.max[i] + margin && other.min[i] <= self.max[i] + margin
        })
    }

    /// The smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Computes the axis-aligned bounding box of a solid.
pub struct BoundingBox<'a> {
    solid: &'a Solid,
}

impl<'a> BoundingBox<'a> {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(solid: &'a Solid) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the AABB.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if the solid has no vertices.
    pub fn execute(&self) -> Result<Aabb> {
        self.solid
            .bounding_box()
            .ok_or_else(|| OperationError::InvalidInput("solid has no vertices".into()).into())
    }
}

impl Solid {
    /// Bounding box of all vertices, or `None` for an empty solid.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices().map(|(_, v)| &v.point))
    }
}
