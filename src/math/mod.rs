pub mod polygon_2d;
pub mod polygon_3d;

use crate::error::{GeometryError, Result};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance used when deciding whether points are coplanar or coincident
/// at building scale (model units are typically meters).
pub const MODEL_TOLERANCE: f64 = 1e-6;

/// Computes the unit normal of a closed polygon using Newell's method.
///
/// The normal follows the right-hand rule over the point order.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] if the polygon has no area.
pub fn newell_normal(points: &[Point3]) -> Result<Vector3> {
    let normal = newell_vector(points);
    let len = normal.norm();
    if len < TOLERANCE {
        return Err(
            GeometryError::Degenerate("degenerate polygon: cannot compute normal".into()).into(),
        );
    }
    Ok(normal / len)
}

/// Unnormalized Newell vector; its length is twice the polygon area.
#[must_use]
pub fn newell_vector(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    normal
}

/// Returns `true` if every coordinate of the point is finite.
#[must_use]
pub fn is_finite_point(p: &Point3) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

/// Applies an affine 4x4 matrix to a point.
#[must_use]
pub fn transform_point(m: &Matrix4, p: &Point3) -> Point3 {
    m.transform_point(p)
}

/// Applies the linear part of a 4x4 matrix to a direction.
#[must_use]
pub fn transform_vector(m: &Matrix4, v: &Vector3) -> Vector3 {
    m.transform_vector(v)
}

/// Determinant of the upper-left 3x3 block; negative for mirroring transforms.
#[must_use]
pub fn linear_determinant(m: &Matrix4) -> f64 {
    m.fixed_view::<3, 3>(0, 0).determinant()
}
