use super::Point2;

/// Computes the signed area of a 2D polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Winding number of `point` with respect to the closed ring `verts`.
///
/// Counter-clockwise rings contribute `+1` for enclosed points,
/// clockwise rings `-1`.
#[must_use]
pub fn winding_number(point: &Point2, verts: &[Point2]) -> i32 {
    let n = verts.len();
    let mut winding = 0i32;
    for i in 0..n {
        let a = verts[i];
        let b = verts[(i + 1) % n];
        if a.y <= point.y {
            if b.y > point.y && cross_2d(b.x - a.x, b.y - a.y, point.x - a.x, point.y - a.y) > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y
            && cross_2d(b.x - a.x, b.y - a.y, point.x - a.x, point.y - a.y) < 0.0
        {
            winding -= 1;
        }
    }
    winding
}

/// Returns `true` if the ring turns the same way at every vertex.
///
/// Collinear vertices are tolerated.
#[must_use]
pub fn is_convex(verts: &[Point2], tolerance: f64) -> bool {
    let n = verts.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0_f64;
    for i in 0..n {
        let a = verts[i];
        let b = verts[(i + 1) % n];
        let c = verts[(i + 2) % n];
        let turn = cross_2d(b.x - a.x, b.y - a.y, c.x - b.x, c.y - b.y);
        if turn.abs() <= tolerance {
            continue;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

/// 2D cross product: `(ax * by - ay * bx)`.
#[inline]
fn cross_2d(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn unit_square() -> Vec<Point2> {
        vec![q(0.0, 0.0), q(1.0, 0.0), q(1.0, 1.0), q(0.0, 1.0)]
    }

    #[test]
    fn signed_area_ccw_positive() {
        assert!((signed_area_2d(&unit_square()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn signed_area_cw_negative() {
        let mut sq = unit_square();
        sq.reverse();
        assert!((signed_area_2d(&sq) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn winding_number_inside_and_outside() {
        let sq = unit_square();
        assert_eq!(winding_number(&q(0.5, 0.5), &sq), 1);
        assert_eq!(winding_number(&q(1.5, 0.5), &sq), 0);

        let mut cw = sq;
        cw.reverse();
        assert_eq!(winding_number(&q(0.5, 0.5), &cw), -1);
    }

    #[test]
    fn convexity() {
        assert!(is_convex(&unit_square(), 1e-12));
        let l_shape = vec![
            q(0.0, 0.0),
            q(2.0, 0.0),
            q(2.0, 1.0),
            q(1.0, 1.0),
            q(1.0, 2.0),
            q(0.0, 2.0),
        ];
        assert!(!is_convex(&l_shape, 1e-12));
    }

    #[test]
    fn collinear_vertex_still_convex() {
        let pts = vec![q(0.0, 0.0), q(1.0, 0.0), q(2.0, 0.0), q(2.0, 1.0), q(0.0, 1.0)];
        assert!(is_convex(&pts, 1e-12));
    }
}
