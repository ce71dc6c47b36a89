use crate::geometry::Plane;

use super::{Point2, Point3, Vector3};

/// Projects a 3D point onto the UV coordinate system of a plane.
#[must_use]
pub fn project_to_uv(point: &Point3, plane: &Plane) -> Point2 {
    let diff = point - plane.origin();
    Point2::new(diff.dot(plane.u_dir()), diff.dot(plane.v_dir()))
}

/// Largest absolute distance from any point to the plane.
#[must_use]
pub fn max_plane_deviation(points: &[Point3], plane: &Plane) -> f64 {
    points
        .iter()
        .map(|p| plane.signed_distance(p).abs())
        .fold(0.0, f64::max)
}

/// Area of the triangle `(a, b, c)`.
#[must_use]
pub fn triangle_area(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    0.5 * (b - a).cross(&(c - a)).norm()
}

/// Compute the area of a 3D polygon (coplanar points).
///
/// Uses the cross-product summation method projected along the polygon normal.
#[must_use]
pub fn polygon_area_3d(points: &[Point3], normal: &Vector3) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let mut cross_sum = Vector3::zeros();
    let o = &points[0];
    for i in 1..n {
        let a = points[i] - o;
        let b = points[(i + 1) % n] - o;
        cross_sum += a.cross(&b);
    }
    0.5 * cross_sum.dot(normal).abs()
}

/// Centroid (vertex average) of a point set.
#[must_use]
pub fn vertex_centroid(points: &[Point3]) -> Point3 {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    Point3::from(sum / n)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn unit_square() -> Vec<Point3> {
        vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)]
    }

    #[test]
    fn square_area() {
        let area = polygon_area_3d(&unit_square(), &Vector3::z());
        assert!((area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn triangle_area_right_triangle() {
        let area = triangle_area(&p(0.0, 0.0, 0.0), &p(2.0, 0.0, 0.0), &p(0.0, 2.0, 0.0));
        assert!((area - 2.0).abs() < 1e-12);
    }

    #[test]
    fn deviation_of_lifted_point() {
        let plane = Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::z()).unwrap();
        let mut pts = unit_square();
        pts[2].z = 0.25;
        assert!((max_plane_deviation(&pts, &plane) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn projection_round_trips_in_plane() {
        let plane = Plane::from_normal(p(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 1.0)).unwrap();
        let q = p(4.0, -1.0, 3.0);
        let uv = project_to_uv(&q, &plane);
        let back = plane.point_at(uv.x, uv.y);
        assert!((back - q).norm() < 1e-12);
    }

    #[test]
    fn centroid_of_square() {
        let c = vertex_centroid(&unit_square());
        assert!((c - p(0.5, 0.5, 0.0)).norm() < 1e-12);
    }
}
