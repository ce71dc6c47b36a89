use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::winding_number;
use crate::math::polygon_3d::{max_plane_deviation, project_to_uv};
use crate::math::{newell_vector, Matrix4, Point2, Point3, Vector3, MODEL_TOLERANCE};

use super::Polygon;

/// A planar region: an outer boundary with zero or more holes.
///
/// By convention the outer ring is counter-clockwise and holes are
/// clockwise about the profile normal. Builders re-orient the rings with
/// [`Profile::oriented_rings`], so callers may pass either winding.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    outer: Polygon,
    holes: Vec<Polygon>,
}

impl Profile {
    /// Creates a profile from an outer boundary and holes.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonPlanar`] if a hole does not lie in the
    /// plane of the outer boundary, or [`GeometryError::Degenerate`] if a
    /// hole vertex falls outside it.
    pub fn new(outer: Polygon, holes: Vec<Polygon>) -> Result<Self> {
        let plane = outer.plane()?;
        let outer_uv: Vec<Point2> = outer
            .vertices()
            .iter()
            .map(|p| project_to_uv(p, &plane))
            .collect();
        for (index, hole) in holes.iter().enumerate() {
            let deviation = max_plane_deviation(hole.vertices(), &plane);
            if deviation > MODEL_TOLERANCE {
                return Err(GeometryError::NonPlanar { deviation }.into());
            }
            let outside = hole
                .vertices()
                .iter()
                .any(|p| winding_number(&project_to_uv(p, &plane), &outer_uv) == 0);
            if outside {
                return Err(GeometryError::Degenerate(format!(
                    "hole {index} is not inside the outer boundary"
                ))
                .into());
            }
        }
        Ok(Self { outer, holes })
    }

    /// Returns the outer boundary.
    #[must_use]
    pub fn outer(&self) -> &Polygon {
        &self.outer
    }

    /// Returns the holes.
    #[must_use]
    pub fn holes(&self) -> &[Polygon] {
        &self.holes
    }

    /// Total number of boundary edges over the outer ring and all holes.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.outer.edge_count() + self.holes.iter().map(Polygon::edge_count).sum::<usize>()
    }

    /// Unit normal of the outer boundary.
    ///
    /// # Errors
    ///
    /// See [`Polygon::normal`].
    pub fn normal(&self) -> Result<Vector3> {
        self.outer.normal()
    }

    /// The rings wound for a face whose outward normal is `normal`:
    /// outer ring first and counter-clockwise, holes clockwise.
    #[must_use]
    pub fn oriented_rings(&self, normal: &Vector3) -> Vec<Vec<Point3>> {
        let mut rings = Vec::with_capacity(1 + self.holes.len());
        rings.push(wound(self.outer.vertices(), normal, true));
        for hole in &self.holes {
            rings.push(wound(hole.vertices(), normal, false));
        }
        rings
    }

    /// The profile mapped through an affine transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform collapses any ring.
    pub fn transformed(&self, matrix: &Matrix4) -> Result<Self> {
        Ok(Self {
            outer: self.outer.transformed(matrix)?,
            holes: self
                .holes
                .iter()
                .map(|h| h.transformed(matrix))
                .collect::<Result<Vec<_>>>()?,
        })
    }

    /// The profile rotated by `angle` radians about the local Z axis.
    ///
    /// # Errors
    ///
    /// See [`Profile::transformed`].
    pub fn rotated(&self, angle: f64) -> Result<Self> {
        self.transformed(&Matrix4::new_rotation(Vector3::z() * angle))
    }
}

impl From<Polygon> for Profile {
    fn from(outer: Polygon) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }
}

/// Returns `points` ordered counter-clockwise (`ccw`) or clockwise about
/// `normal`.
fn wound(points: &[Point3], normal: &Vector3, ccw: bool) -> Vec<Point3> {
    let is_ccw = newell_vector(points).dot(normal) > 0.0;
    if is_ccw == ccw {
        points.to_vec()
    } else {
        points.iter().rev().copied().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn square(cx: f64, cy: f64, half: f64, z: f64) -> Polygon {
        Polygon::new(vec![
            p(cx - half, cy - half, z),
            p(cx + half, cy - half, z),
            p(cx + half, cy + half, z),
            p(cx - half, cy + half, z),
        ])
        .unwrap()
    }

    #[test]
    fn edge_count_includes_holes() {
        let profile =
            Profile::new(square(0.0, 0.0, 2.0, 0.0), vec![square(0.0, 0.0, 0.5, 0.0)]).unwrap();
        assert_eq!(profile.edge_count(), 8);
    }

    #[test]
    fn hole_out_of_plane_rejected() {
        let result = Profile::new(square(0.0, 0.0, 2.0, 0.0), vec![square(0.0, 0.0, 0.5, 1.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn hole_outside_outer_rejected() {
        let result = Profile::new(square(0.0, 0.0, 1.0, 0.0), vec![square(5.0, 0.0, 0.5, 0.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn oriented_rings_fix_winding() {
        // Hole given counter-clockwise on purpose
        let profile =
            Profile::new(square(0.0, 0.0, 2.0, 0.0), vec![square(0.0, 0.0, 0.5, 0.0)]).unwrap();
        let rings = profile.oriented_rings(&Vector3::z());
        assert!(newell_vector(&rings[0]).z > 0.0);
        assert!(newell_vector(&rings[1]).z < 0.0);

        let flipped = profile.oriented_rings(&-Vector3::z());
        assert!(newell_vector(&flipped[0]).z < 0.0);
        assert!(newell_vector(&flipped[1]).z > 0.0);
    }

    #[test]
    fn rotation_about_z() {
        let profile = Profile::from(Polygon::rectangle(2.0, 1.0).unwrap());
        let rotated = profile.rotated(std::f64::consts::FRAC_PI_2).unwrap();
        let first = rotated.outer().vertices()[0];
        // (-1, -0.5) rotated a quarter turn is (0.5, -1)
        assert!((first - p(0.5, -1.0, 0.0)).norm() < 1e-12);
    }
}
