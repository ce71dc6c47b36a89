use crate::error::{GeometryError, Result};
use crate::math::{newell_normal, Point3, Vector3, TOLERANCE};

/// An infinite plane in 3D space.
///
/// Defined by an origin point, and two orthogonal direction vectors
/// (`u_dir`, `v_dir`). The normal is `u_dir × v_dir`, so a ring that is
/// counter-clockwise in `(u, v)` is counter-clockwise about the normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    origin: Point3,
    u_dir: Vector3,
    v_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a new plane from an origin and two direction vectors.
    ///
    /// `v_dir` is re-orthogonalised against `u_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vectors are zero-length
    /// or parallel (degenerate plane).
    pub fn new(origin: Point3, u_dir: Vector3, v_dir: Vector3) -> Result<Self> {
        let u_len = u_dir.norm();
        if u_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        if v_dir.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let u_dir = u_dir / u_len;

        let normal = u_dir.cross(&v_dir);
        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(
                GeometryError::Degenerate("plane directions are parallel".into()).into(),
            );
        }
        let normal = normal / normal_len;
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Creates a plane from an origin and a normal vector.
    ///
    /// The U and V directions are computed automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;

        // Choose a reference vector not parallel to the normal
        let reference = if normal.x.abs() < 0.9 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            Vector3::new(0.0, 1.0, 0.0)
        };

        let u_dir = normal.cross(&reference).normalize();
        let v_dir = normal.cross(&u_dir);

        Ok(Self {
            origin,
            u_dir,
            v_dir,
            normal,
        })
    }

    /// Best-fit plane through a closed ring: Newell normal, origin at the
    /// first point.
    ///
    /// # Errors
    ///
    /// Returns an error if the ring is empty or encloses no area.
    pub fn from_ring(points: &[Point3]) -> Result<Self> {
        let first = points
            .first()
            .ok_or_else(|| GeometryError::Degenerate("empty ring".into()))?;
        let normal = newell_normal(points)?;
        Self::from_normal(*first, normal)
    }

    /// Builds a plane from an already orthonormal right-handed basis.
    pub(crate) fn from_frame_axes(
        origin: Point3,
        u_dir: Vector3,
        v_dir: Vector3,
        normal: Vector3,
    ) -> Self {
        Self {
            origin,
            u_dir,
            v_dir,
            normal,
        }
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the U direction vector.
    #[must_use]
    pub fn u_dir(&self) -> &Vector3 {
        &self.u_dir
    }

    /// Returns the V direction vector.
    #[must_use]
    pub fn v_dir(&self) -> &Vector3 {
        &self.v_dir
    }

    /// Returns the unit normal of the plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Signed distance of `point` from the plane, positive on the normal side.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&(point - self.origin))
    }

    /// Evaluates `origin + u * u_dir + v * v_dir`.
    #[must_use]
    pub fn point_at(&self, u: f64, v: f64) -> Point3 {
        self.origin + self.u_dir * u + self.v_dir * v
    }

    /// Intersects the ray `origin + t * direction` with the plane.
    ///
    /// Returns `None` when the ray is parallel to the plane.
    #[must_use]
    pub fn intersect_ray(&self, origin: &Point3, direction: &Vector3) -> Option<Point3> {
        let denom = self.normal.dot(direction);
        if denom.abs() < TOLERANCE {
            return None;
        }
        let t = self.normal.dot(&(self.origin - origin)) / denom;
        Some(origin + direction * t)
    }

    /// The same plane with the normal flipped.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            origin: self.origin,
            u_dir: self.v_dir,
            v_dir: self.u_dir,
            normal: -self.normal,
        }
    }
}
