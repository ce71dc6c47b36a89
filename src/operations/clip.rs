use crate::error::Result;
use crate::geometry::Plane;
use crate::math::{newell_vector, Point3, Vector3, TOLERANCE};
use crate::topology::{FaceId, Solid};

/// The two halves of a ring cut by a plane.
///
/// Both keep the winding of the input ring. Either may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slice {
    /// Points on the negative side of the plane, or on the plane.
    pub inside: Vec<Point3>,
    /// Points on the positive side.
    pub outside: Vec<Point3>,
}

impl Slice {
    /// Returns `true` if the ring has points on both sides.
    #[must_use]
    pub fn is_split(&self) -> bool {
        !self.inside.is_empty() && !self.outside.is_empty()
    }
}

/// Cuts the outer loop of `face` with `plane`.
///
/// # Errors
///
/// Returns an error if the face does not belong to `solid`.
pub fn slice(solid: &Solid, face: FaceId, plane: &Plane) -> Result<Slice> {
    let points = solid.face_outer_points(face)?;
    Ok(slice_points(&points, plane))
}

/// Cuts a closed ring with `plane` (Sutherland–Hodgman, keeping both sides).
///
/// A point `p` is inside when `normal · (p − origin)` is negative or within
/// [`TOLERANCE`] of zero. Each edge crossing the plane adds its intersection
/// point to both halves. A point equal to the one last pushed on the same
/// side is skipped, as is a closing point equal to that side's first.
#[must_use]
pub fn slice_points(points: &[Point3], plane: &Plane) -> Slice {
    let mut out = Slice::default();
    let n = points.len();
    for i in 0..n {
        let start = points[i];
        let end = points[(i + 1) % n];
        let wrap = i + 1 == n;
        let ds = plane.signed_distance(&start);
        let de = plane.signed_distance(&end);
        let start_in = ds < TOLERANCE;
        let end_in = de < TOLERANCE;

        match (start_in, end_in) {
            (true, true) => push(&mut out.inside, start, wrap),
            (false, false) => push(&mut out.outside, start, wrap),
            (true, false) => {
                let cut = intersection(&start, &end, ds, de);
                push(&mut out.inside, start, wrap);
                push(&mut out.inside, cut, wrap);
                push(&mut out.outside, cut, wrap);
            }
            (false, true) => {
                let cut = intersection(&start, &end, ds, de);
                push(&mut out.inside, cut, wrap);
                push(&mut out.outside, start, wrap);
                push(&mut out.outside, cut, wrap);
            }
        }
    }
    out
}

/// Cuts every face of `solid` with `plane`, in face order.
///
/// # Errors
///
/// Returns an error if the solid's topology is inconsistent.
pub fn section(solid: &Solid, plane: &Plane) -> Result<Vec<(FaceId, Slice)>> {
    solid
        .face_ids()
        .into_iter()
        .map(|face| Ok((face, slice(solid, face, plane)?)))
        .collect()
}

/// Closed outlines where `plane` cuts through `solid`.
///
/// Every face not parallel to the plane contributes the crossings of its
/// outer and inner loops. Sorted along the cut direction, consecutive pairs
/// of crossings bound the segments inside the face. Segments from all faces
/// are joined end to end into rings wound counter-clockwise about the plane
/// normal, so holes come back as rings of their own. Faces lying in the
/// plane are skipped; their edges are picked up by the neighbouring faces.
///
/// # Errors
///
/// Returns an error if the solid's topology is inconsistent.
pub fn section_polygons(solid: &Solid, plane: &Plane) -> Result<Vec<Vec<Point3>>> {
    let mut graph = SectionGraph::default();
    for face in solid.face_ids() {
        let direction = solid.face_plane(face)?.normal().cross(plane.normal());
        if direction.norm() < TOLERANCE {
            continue;
        }
        let direction = direction.normalize();

        let mut crossings = Vec::new();
        loop_crossings(&solid.face_outer_points(face)?, plane, &mut crossings);
        for hole in solid.face_inner_points(face)? {
            loop_crossings(&hole, plane, &mut crossings);
        }
        crossings.sort_by(|a, b| a.coords.dot(&direction).total_cmp(&b.coords.dot(&direction)));
        for pair in crossings.chunks_exact(2) {
            graph.add_segment(pair[0], pair[1]);
        }
    }
    Ok(graph.rings(plane.normal()))
}

/// Points where a closed ring meets `plane`. Vertices on the plane count
/// once, edges lying in it contribute both ends.
fn loop_crossings(ring: &[Point3], plane: &Plane, out: &mut Vec<Point3>) {
    let n = ring.len();
    for i in 0..n {
        let (start, end) = (ring[i], ring[(i + 1) % n]);
        let ds = plane.signed_distance(&start);
        let de = plane.signed_distance(&end);
        let point = if ds.abs() < TOLERANCE {
            start
        } else if de.abs() >= TOLERANCE && (ds < 0.0) != (de < 0.0) {
            intersection(&start, &end, ds, de)
        } else {
            continue;
        };
        if !out.iter().any(|q| (q - point).norm() < TOLERANCE) {
            out.push(point);
        }
    }
}

/// Undirected segments with merged end points.
#[derive(Debug, Default)]
struct SectionGraph {
    points: Vec<Point3>,
    edges: Vec<(usize, usize)>,
}

impl SectionGraph {
    fn vertex(&mut self, point: Point3) -> usize {
        if let Some(i) = self.points.iter().position(|q| (q - point).norm() < TOLERANCE) {
            return i;
        }
        self.points.push(point);
        self.points.len() - 1
    }

    fn add_segment(&mut self, a: Point3, b: Point3) {
        if (a - b).norm() < TOLERANCE {
            return;
        }
        let (a, b) = (self.vertex(a), self.vertex(b));
        if self.edges.iter().any(|&e| e == (a, b) || e == (b, a)) {
            return;
        }
        self.edges.push((a, b));
    }

    fn next_edge(&self, from: usize, used: &[bool]) -> Option<(usize, usize)> {
        self.edges.iter().enumerate().find_map(|(i, &(s, e))| {
            if used[i] {
                None
            } else if s == from {
                Some((i, e))
            } else if e == from {
                Some((i, s))
            } else {
                None
            }
        })
    }

    /// Walks unused edges into closed rings. Chains that do not close are
    /// dropped.
    fn rings(&self, normal: &Vector3) -> Vec<Vec<Point3>> {
        let mut used = vec![false; self.edges.len()];
        let mut rings = Vec::new();
        for first in 0..self.edges.len() {
            if used[first] {
                continue;
            }
            used[first] = true;
            let (start, mut current) = self.edges[first];
            let mut ring = vec![self.points[start]];
            while current != start {
                ring.push(self.points[current]);
                let Some((i, other)) = self.next_edge(current, &used) else {
                    break;
                };
                used[i] = true;
                current = other;
            }
            if current == start && ring.len() >= 3 {
                if newell_vector(&ring).dot(normal) < 0.0 {
                    ring.reverse();
                }
                rings.push(ring);
            }
        }
        rings
    }
}

fn intersection(start: &Point3, end: &Point3, ds: f64, de: f64) -> Point3 {
    let t = ds / (ds - de);
    start + (end - start) * t
}

fn push(side: &mut Vec<Point3>, point: Point3, wrap: bool) {
    let same = |q: &Point3| (q - point).norm() < TOLERANCE;
    if side.last().is_some_and(same) {
        return;
    }
    if wrap && side.first().is_some_and(same) {
        return;
    }
    side.push(point);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Polygon, Profile};
    use crate::math::polygon_3d::polygon_area_3d;
    use crate::math::Vector3;
    use crate::operations::shaping::build_extrude;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn square() -> Vec<Point3> {
        vec![
            p(0.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(2.0, 2.0, 0.0),
            p(0.0, 2.0, 0.0),
        ]
    }

    fn vertical_plane(x: f64) -> Plane {
        Plane::from_normal(p(x, 0.0, 0.0), Vector3::x()).unwrap()
    }

    // ── One side ──

    #[test]
    fn ring_entirely_inside() {
        let result = slice_points(&square(), &vertical_plane(5.0));
        assert_eq!(result.inside, square());
        assert!(result.outside.is_empty());
        assert!(!result.is_split());
    }

    #[test]
    fn ring_entirely_outside() {
        let result = slice_points(&square(), &vertical_plane(-1.0));
        assert!(result.inside.is_empty());
        assert_eq!(result.outside, square());
    }

    #[test]
    fn ring_on_the_plane_counts_as_inside() {
        let plane = Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::z()).unwrap();
        let result = slice_points(&square(), &plane);
        assert_eq!(result.inside.len(), 4);
        assert!(result.outside.is_empty());
    }

    // ── Crossing ──

    #[test]
    fn split_conserves_points() {
        let ring = square();
        let result = slice_points(&ring, &vertical_plane(1.0));
        assert!(result.is_split());
        // Two crossing edges: n + 2k points in total.
        assert_eq!(result.inside.len() + result.outside.len(), ring.len() + 2 * 2);
        assert_eq!(result.inside.len(), 4);
        assert_eq!(result.outside.len(), 4);
    }

    #[test]
    fn split_halves_keep_area_and_winding() {
        let result = slice_points(&square(), &vertical_plane(0.5));
        let a = polygon_area_3d(&result.inside, &Vector3::z());
        let b = polygon_area_3d(&result.outside, &Vector3::z());
        assert_relative_eq!(a, 1.0, epsilon = 1e-12);
        assert_relative_eq!(b, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn vertex_on_plane_is_not_duplicated() {
        // The plane passes through the apex of a triangle.
        let ring = vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(1.0, 2.0, 0.0)];
        let result = slice_points(&ring, &vertical_plane(1.0));
        for side in [&result.inside, &result.outside] {
            let n = side.len();
            for i in 0..n {
                assert!((side[i] - side[(i + 1) % n]).norm() > TOLERANCE);
            }
        }
        assert_eq!(result.inside.len(), 3);
        assert_eq!(result.outside.len(), 3);
    }

    // ── Solids ──

    #[test]
    fn section_through_block() {
        let profile = Profile::from(Polygon::rectangle(2.0, 2.0).unwrap());
        let solid = build_extrude(&profile, &Vector3::z(), 2.0, false).unwrap();
        let plane = Plane::from_normal(p(0.0, 0.0, 1.0), Vector3::z()).unwrap();
        let slices = section(&solid, &plane).unwrap();

        assert_eq!(slices.len(), 6);
        let split = slices.iter().filter(|(_, s)| s.is_split()).count();
        assert_eq!(split, 4);
        let face = slices[0].0;
        assert_eq!(slice(&solid, face, &plane).unwrap(), slices[0].1);
    }

    // ── Section outlines ──

    fn ring_area(ring: &[Point3]) -> f64 {
        newell_vector(ring).z * 0.5
    }

    #[test]
    fn block_section_is_one_ring() {
        let profile = Profile::from(Polygon::rectangle(2.0, 2.0).unwrap());
        let solid = build_extrude(&profile, &Vector3::z(), 2.0, false).unwrap();
        let plane = Plane::from_normal(p(0.0, 0.0, 1.0), Vector3::z()).unwrap();
        let rings = section_polygons(&solid, &plane).unwrap();

        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
        assert!(rings[0].iter().all(|q| (q.z - 1.0).abs() < TOLERANCE));
        assert_relative_eq!(ring_area(&rings[0]), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn holed_section_has_a_ring_per_loop() {
        let hole = Polygon::new(vec![
            p(-1.0, -1.0, 0.0),
            p(-1.0, 1.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(1.0, -1.0, 0.0),
        ])
        .unwrap();
        let profile = Profile::new(Polygon::rectangle(6.0, 6.0).unwrap(), vec![hole]).unwrap();
        let solid = build_extrude(&profile, &Vector3::z(), 2.0, false).unwrap();
        let plane = Plane::from_normal(p(0.0, 0.0, 1.0), Vector3::z()).unwrap();
        let rings = section_polygons(&solid, &plane).unwrap();

        let mut areas: Vec<f64> = rings.iter().map(|r| ring_area(r.as_slice())).collect();
        areas.sort_by(f64::total_cmp);
        assert_eq!(areas.len(), 2);
        assert_relative_eq!(areas[0], 4.0, epsilon = 1e-9);
        assert_relative_eq!(areas[1], 36.0, epsilon = 1e-9);
    }

    #[test]
    fn cap_in_the_plane_is_not_doubled() {
        let profile = Profile::from(Polygon::rectangle(2.0, 2.0).unwrap());
        let solid = build_extrude(&profile, &Vector3::z(), 2.0, false).unwrap();
        let plane = Plane::from_normal(p(0.0, 0.0, 0.0), Vector3::z()).unwrap();
        let rings = section_polygons(&solid, &plane).unwrap();

        assert_eq!(rings.len(), 1);
        let ring = &rings[0];
        assert_eq!(ring.len(), 4);
        for i in 0..ring.len() {
            assert!((ring[i] - ring[(i + 1) % ring.len()]).norm() > TOLERANCE);
        }
        assert_relative_eq!(ring_area(ring), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn plane_missing_the_solid_gives_nothing() {
        let profile = Profile::from(Polygon::rectangle(2.0, 2.0).unwrap());
        let solid = build_extrude(&profile, &Vector3::z(), 2.0, false).unwrap();
        let plane = Plane::from_normal(p(0.0, 0.0, 5.0), Vector3::z()).unwrap();
        assert!(section_polygons(&solid, &plane).unwrap().is_empty());
    }
}
