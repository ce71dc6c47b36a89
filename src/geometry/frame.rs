use crate::error::{GeometryError, Result};
use crate::math::{Matrix4, Point3, Vector3, TOLERANCE};

use super::Plane;

/// An orthonormal right-handed coordinate frame.
///
/// Sweep paths hand out frames whose `z_axis` follows the path tangent;
/// profiles are drawn in the frame's local XY plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    origin: Point3,
    x_axis: Vector3,
    y_axis: Vector3,
    z_axis: Vector3,
}

impl Frame {
    /// The world frame.
    #[must_use]
    pub fn world() -> Self {
        Self {
            origin: Point3::origin(),
            x_axis: Vector3::x(),
            y_axis: Vector3::y(),
            z_axis: Vector3::z(),
        }
    }

    /// Creates a frame from an origin, a Z axis and a hint for the X axis.
    ///
    /// The X axis is the hint with its Z component removed; Y completes the
    /// right-handed basis.
    ///
    /// # Errors
    ///
    /// Returns an error if `z_axis` is zero-length or parallel to `x_hint`.
    pub fn new(origin: Point3, x_hint: Vector3, z_axis: Vector3) -> Result<Self> {
        let z_len = z_axis.norm();
        if z_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let z_axis = z_axis / z_len;
        let x_axis = x_hint - z_axis * x_hint.dot(&z_axis);
        let x_len = x_axis.norm();
        if x_len < TOLERANCE {
            return Err(GeometryError::Degenerate("frame X hint is parallel to Z".into()).into());
        }
        let x_axis = x_axis / x_len;
        let y_axis = z_axis.cross(&x_axis);
        Ok(Self {
            origin,
            x_axis,
            y_axis,
            z_axis,
        })
    }

    /// Creates a frame whose Z axis is `tangent`.
    ///
    /// The X axis is horizontal (`world Z × tangent`) so that profile Y
    /// points up; vertical tangents fall back to world X.
    ///
    /// # Errors
    ///
    /// Returns an error if `tangent` is zero-length.
    pub fn from_tangent(origin: Point3, tangent: Vector3) -> Result<Self> {
        let len = tangent.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let z = tangent / len;
        let horizontal = Vector3::z().cross(&z);
        let x_hint = if horizontal.norm() < 1e-6 {
            Vector3::x()
        } else {
            horizontal
        };
        Self::new(origin, x_hint, z)
    }

    /// Returns the origin of the frame.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the X axis.
    #[must_use]
    pub fn x_axis(&self) -> &Vector3 {
        &self.x_axis
    }

    /// Returns the Y axis.
    #[must_use]
    pub fn y_axis(&self) -> &Vector3 {
        &self.y_axis
    }

    /// Returns the Z axis.
    #[must_use]
    pub fn z_axis(&self) -> &Vector3 {
        &self.z_axis
    }

    /// Maps a point in local coordinates to world coordinates.
    #[must_use]
    pub fn to_world(&self, local: &Point3) -> Point3 {
        self.origin + self.x_axis * local.x + self.y_axis * local.y + self.z_axis * local.z
    }

    /// The frame's XY plane, with normal along Z.
    #[must_use]
    pub fn xy_plane(&self) -> Plane {
        Plane::from_frame_axes(self.origin, self.x_axis, self.y_axis, self.z_axis)
    }

    /// The frame rotated by `angle` radians about its own Z axis.
    #[must_use]
    pub fn rotated(&self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let x_axis = self.x_axis * c + self.y_axis * s;
        let y_axis = self.z_axis.cross(&x_axis);
        Self {
            origin: self.origin,
            x_axis,
            y_axis,
            z_axis: self.z_axis,
        }
    }

    /// The local-to-world matrix.
    #[must_use]
    #[rustfmt::skip]
    pub fn to_matrix(&self) -> Matrix4 {
        Matrix4::new(
            self.x_axis.x, self.y_axis.x, self.z_axis.x, self.origin.x,
            self.x_axis.y, self.y_axis.y, self.z_axis.y, self.origin.y,
            self.x_axis.z, self.y_axis.z, self.z_axis.z, self.origin.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn horizontal_tangent_keeps_y_up() {
        let f = Frame::from_tangent(p(0.0, 0.0, 0.0), Vector3::x()).unwrap();
        assert_relative_eq!(*f.y_axis(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(f.x_axis().cross(f.y_axis()), *f.z_axis(), epsilon = 1e-12);
    }

    #[test]
    fn vertical_tangent_falls_back_to_world_x() {
        let f = Frame::from_tangent(p(1.0, 2.0, 3.0), Vector3::z()).unwrap();
        assert_relative_eq!(*f.x_axis(), Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(*f.y_axis(), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn zero_tangent_rejected() {
        assert!(Frame::from_tangent(p(0.0, 0.0, 0.0), Vector3::zeros()).is_err());
    }

    #[test]
    fn to_world_matches_matrix() {
        let f = Frame::from_tangent(p(1.0, 2.0, 3.0), Vector3::new(1.0, 1.0, 0.5))
            .unwrap()
            .rotated(0.3);
        let local = p(0.5, -0.25, 2.0);
        let a = f.to_world(&local);
        let b = f.to_matrix().transform_point(&local);
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }

    #[test]
    fn rotation_quarter_turn() {
        let f = Frame::world().rotated(std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(*f.x_axis(), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(*f.y_axis(), -Vector3::x(), epsilon = 1e-12);
    }
}
