use crate::error::{GeometryError, Result};
use crate::math::polygon_3d::{max_plane_deviation, polygon_area_3d};
use crate::math::{
    is_finite_point, newell_normal, transform_point, Matrix4, Point3, Vector3, MODEL_TOLERANCE,
};

use super::Plane;

/// A closed, planar ring of points.
///
/// The closing edge from the last point back to the first is implicit.
/// Construction rejects rings that cannot bound a face.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point3>,
}

impl Polygon {
    /// Creates a polygon from an ordered ring of points.
    ///
    /// A trailing point equal to the first is dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if any coordinate is non-finite, fewer than
    /// three points remain, two consecutive points coincide, the ring has no
    /// area, or the points are not coplanar.
    pub fn new(vertices: Vec<Point3>) -> Result<Self> {
        let mut vertices = vertices;
        if vertices.iter().any(|p| !is_finite_point(p)) {
            return Err(GeometryError::NonFinite("polygon").into());
        }
        if vertices.len() > 1 {
            let closes = match (vertices.first(), vertices.last()) {
                (Some(first), Some(last)) => (first - last).norm() < MODEL_TOLERANCE,
                _ => false,
            };
            if closes {
                vertices.pop();
            }
        }
        validate_ring(&vertices)?;
        Ok(Self { vertices })
    }

    /// An axis-aligned `width` x `height` rectangle centred on the origin
    /// in the XY plane, wound counter-clockwise.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is not positive.
    pub fn rectangle(width: f64, height: f64) -> Result<Self> {
        if width.is_nan() || height.is_nan() || width.min(height) < MODEL_TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "rectangle dimensions must be positive, got {width} x {height}"
            ))
            .into());
        }
        let (hw, hh) = (width * 0.5, height * 0.5);
        Self::new(vec![
            Point3::new(-hw, -hh, 0.0),
            Point3::new(hw, -hh, 0.0),
            Point3::new(hw, hh, 0.0),
            Point3::new(-hw, hh, 0.0),
        ])
    }

    /// Returns the ring of points.
    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Number of edges (equal to the number of points).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }

    /// Unit normal by the right-hand rule over the ring order.
    ///
    /// # Errors
    ///
    /// Never fails for a constructed polygon; the signature follows
    /// [`newell_normal`].
    pub fn normal(&self) -> Result<Vector3> {
        newell_normal(&self.vertices)
    }

    /// Supporting plane of the ring.
    ///
    /// # Errors
    ///
    /// See [`Polygon::normal`].
    pub fn plane(&self) -> Result<Plane> {
        Plane::from_ring(&self.vertices)
    }

    /// Enclosed area.
    ///
    /// # Errors
    ///
    /// See [`Polygon::normal`].
    pub fn area(&self) -> Result<f64> {
        Ok(polygon_area_3d(&self.vertices, &self.normal()?))
    }

    /// The same ring in the opposite order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            vertices: self.vertices.iter().rev().copied().collect(),
        }
    }

    /// The ring mapped through an affine transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform collapses the ring.
    pub fn transformed(&self, matrix: &Matrix4) -> Result<Self> {
        Self::new(
            self.vertices
                .iter()
                .map(|p| transform_point(matrix, p))
                .collect(),
        )
    }
}

/// Checks that a ring can bound a face.
pub(crate) fn validate_ring(points: &[Point3]) -> Result<()> {
    if points.len() < 3 {
        return Err(GeometryError::Degenerate(format!(
            "a polygon needs at least 3 distinct points, got {}",
            points.len()
        ))
        .into());
    }
    let n = points.len();
    for i in 0..n {
        let j = (i + 1) % n;
        if (points[j] - points[i]).norm() < MODEL_TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "zero-length edge between points {i} and {j}"
            ))
            .into());
        }
    }
    let plane = Plane::from_ring(points)?;
    let deviation = max_plane_deviation(points, &plane);
    if deviation > MODEL_TOLERANCE {
        return Err(GeometryError::NonPlanar { deviation }.into());
    }
    Ok(())
}
