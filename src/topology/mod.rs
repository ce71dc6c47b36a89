mod edge;
mod face;
mod loops;
pub(crate) mod stitch;
mod transform;
mod validate;
mod vertex;

pub use edge::{EdgeData, EdgeId, HalfEdgeData, HalfEdgeId, Side};
pub use face::{FaceData, FaceId};
pub use loops::{LoopData, LoopId};
pub use vertex::{VertexData, VertexId};

use slotmap::SlotMap;

use crate::error::{GeometryError, Result, TopologyError};
use crate::geometry::{validate_ring, Plane, Polygon};
use crate::math::{is_finite_point, newell_normal, Point3, Vector3};

/// A boundary-representation solid.
///
/// The solid is the arena owning every vertex, edge, loop and face it is
/// made of. Entities reference each other via typed IDs (generational
/// indices) issued by this solid; an ID is never reissued while the solid
/// lives. IDs from one solid are meaningless in another.
#[derive(Debug, Clone, Default)]
pub struct Solid {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    loops: SlotMap<LoopId, LoopData>,
    faces: SlotMap<FaceId, FaceData>,
}

impl Solid {
    /// Creates a new, empty solid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the solid has no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if any coordinate is NaN or infinite.
    pub fn add_vertex(&mut self, point: Point3) -> Result<VertexId> {
        if !is_finite_point(&point) {
            return Err(GeometryError::NonFinite("vertex").into());
        }
        Ok(self.vertices.insert(VertexData::new(point)))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex does not belong to this solid.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or(TopologyError::EntityNotFound("vertex"))
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Edge operations ---

    /// Inserts an edge from `from` to `to` with both halves unattached.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex does not belong to this solid, or
    /// both ends are the same vertex.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> Result<EdgeId> {
        self.vertex(from)?;
        self.vertex(to)?;
        if from == to {
            return Err(TopologyError::InvalidTopology("edge endpoints coincide".into()).into());
        }
        Ok(self.edges.insert(EdgeData::new(from, to)))
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge does not belong to this solid.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or(TopologyError::EntityNotFound("edge"))
    }

    fn edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeData, TopologyError> {
        self.edges
            .get_mut(id)
            .ok_or(TopologyError::EntityNotFound("edge"))
    }

    /// Iterates over all edges.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the data of one half-edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the owning edge does not belong to this solid.
    pub fn half_edge(&self, id: HalfEdgeId) -> Result<&HalfEdgeData, TopologyError> {
        Ok(self.edge(id.edge)?.half(id.side))
    }

    /// The vertex a half-edge starts from.
    ///
    /// # Errors
    ///
    /// Returns an error if the owning edge does not belong to this solid.
    pub fn half_edge_start(&self, id: HalfEdgeId) -> Result<VertexId, TopologyError> {
        Ok(self.half_edge(id)?.vertex)
    }

    /// The vertex a half-edge ends at (the start of its twin).
    ///
    /// # Errors
    ///
    /// Returns an error if the owning edge does not belong to this solid.
    pub fn half_edge_end(&self, id: HalfEdgeId) -> Result<VertexId, TopologyError> {
        Ok(self.half_edge(id.twin())?.vertex)
    }

    // --- Loop operations ---

    /// Builds a loop from a polygon: one vertex per point, one edge per
    /// consecutive pair, threading the edges' left halves in input order.
    ///
    /// # Errors
    ///
    /// See [`Solid::loop_from_points`].
    pub fn loop_from_polygon(&mut self, polygon: &Polygon) -> Result<LoopId> {
        self.loop_from_points(polygon.vertices())
    }

    /// Builds a loop from a raw ring of points.
    ///
    /// The ring is validated before anything is inserted.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the ring has fewer than 3 distinct
    /// points, a zero-length edge, non-finite coordinates or is not planar.
    pub fn loop_from_points(&mut self, points: &[Point3]) -> Result<LoopId> {
        if points.iter().any(|p| !is_finite_point(p)) {
            return Err(GeometryError::NonFinite("loop").into());
        }
        validate_ring(points)?;

        let vertices = points
            .iter()
            .map(|p| self.add_vertex(*p))
            .collect::<Result<Vec<_>>>()?;
        let n = vertices.len();
        let mut half_edges = Vec::with_capacity(n);
        for i in 0..n {
            let edge = self.add_edge(vertices[i], vertices[(i + 1) % n])?;
            half_edges.push(HalfEdgeId::left(edge));
        }
        self.loop_from_half_edges(half_edges)
    }

    /// Threads existing half-edges into a new loop.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 3 halves are given, any half belongs to
    /// another solid or is already used by a loop, or the halves do not
    /// chain into a closed cycle. Nothing is modified on error.
    pub fn loop_from_half_edges(&mut self, half_edges: Vec<HalfEdgeId>) -> Result<LoopId> {
        self.check_loop(&half_edges)?;
        self.insert_loop(half_edges)
    }

    fn check_loop(&self, half_edges: &[HalfEdgeId]) -> Result<()> {
        let n = half_edges.len();
        if n < 3 {
            return Err(TopologyError::InvalidTopology(format!(
                "a loop needs at least 3 half-edges, got {n}"
            ))
            .into());
        }
        for (i, &h) in half_edges.iter().enumerate() {
            if self.half_edge(h)?.loop_id.is_some() {
                return Err(TopologyError::HalfEdgeInUse.into());
            }
            let next = half_edges[(i + 1) % n];
            if self.half_edge_end(h)? != self.half_edge_start(next)? {
                return Err(TopologyError::OpenLoop.into());
            }
        }
        for (i, &h) in half_edges.iter().enumerate() {
            if half_edges[..i].contains(&h) {
                return Err(TopologyError::HalfEdgeInUse.into());
            }
        }
        Ok(())
    }

    /// Threads half-edges that passed [`check_loop`](Self::check_loop).
    fn insert_loop(&mut self, half_edges: Vec<HalfEdgeId>) -> Result<LoopId> {
        let loop_id = self.loops.insert(LoopData {
            half_edges: half_edges.clone(),
            face: None,
        });
        for h in half_edges {
            self.edge_mut(h.edge)?.half_mut(h.side).loop_id = Some(loop_id);
        }
        Ok(loop_id)
    }

    /// Returns a reference to the loop data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop does not belong to this solid.
    pub fn face_loop(&self, id: LoopId) -> Result<&LoopData, TopologyError> {
        self.loops
            .get(id)
            .ok_or(TopologyError::EntityNotFound("loop"))
    }

    /// Iterates over all loops.
    pub fn loops(&self) -> impl Iterator<Item = (LoopId, &LoopData)> {
        self.loops.iter()
    }

    /// The start vertex of every half-edge of a loop, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop or any of its edges is missing.
    pub fn loop_vertices(&self, id: LoopId) -> Result<Vec<VertexId>, TopologyError> {
        self.face_loop(id)?
            .half_edges
            .iter()
            .map(|&h| self.half_edge_start(h))
            .collect()
    }

    /// The positions of a loop's vertices, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop or any of its entities is missing.
    pub fn loop_points(&self, id: LoopId) -> Result<Vec<Point3>, TopologyError> {
        self.loop_vertices(id)?
            .into_iter()
            .map(|v| Ok(self.vertex(v)?.point))
            .collect()
    }

    // --- Face operations ---

    /// Creates a face from an outer loop and hole loops, linking the loops'
    /// back-references. Winding is not re-validated.
    ///
    /// # Errors
    ///
    /// Returns an error if a loop does not belong to this solid, is already
    /// attached to a face, or is listed twice.
    pub fn add_face(&mut self, outer: LoopId, inner: Vec<LoopId>) -> Result<FaceId> {
        let all: Vec<LoopId> = std::iter::once(outer).chain(inner.iter().copied()).collect();
        for (i, &l) in all.iter().enumerate() {
            if self.face_loop(l)?.face.is_some() || all[..i].contains(&l) {
                return Err(TopologyError::InvalidTopology(
                    "loop is already attached to a face".into(),
                )
                .into());
            }
        }

        let face = self.faces.insert(FaceData { outer, inner });
        for l in all {
            if let Some(data) = self.loops.get_mut(l) {
                data.face = Some(face);
            }
        }
        Ok(face)
    }

    /// Closes the end of a swept solid from rings of edges.
    ///
    /// The first ring is the outer boundary; the others are holes. Forward
    /// caps use each edge's left half in ring order. Reversed caps use the
    /// right halves in reverse order, which flips the winding.
    ///
    /// # Errors
    ///
    /// Returns an error if no ring is given, or a ring does not close into a
    /// loop of free half-edges. Nothing is modified on error.
    pub fn cap(&mut self, rings: &[Vec<EdgeId>], reverse: bool) -> Result<FaceId> {
        if rings.is_empty() {
            return Err(TopologyError::InvalidTopology("cap needs at least one ring".into()).into());
        }
        let rings: Vec<Vec<HalfEdgeId>> = rings
            .iter()
            .map(|ring| {
                if reverse {
                    ring.iter().rev().map(|&e| HalfEdgeId::right(e)).collect()
                } else {
                    ring.iter().map(|&e| HalfEdgeId::left(e)).collect()
                }
            })
            .collect();
        // All rings are checked before any is threaded.
        for (i, halves) in rings.iter().enumerate() {
            self.check_loop(halves)?;
            if rings[..i].iter().flatten().any(|h| halves.contains(h)) {
                return Err(TopologyError::HalfEdgeInUse.into());
            }
        }
        let mut loops = rings
            .into_iter()
            .map(|halves| self.insert_loop(halves))
            .collect::<Result<Vec<_>>>()?;
        let outer = loops.remove(0);
        self.add_face(outer, loops)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the face does not belong to this solid.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or(TopologyError::EntityNotFound("face"))
    }

    /// Iterates over all faces.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter()
    }

    /// IDs of all faces, in insertion order.
    #[must_use]
    pub fn face_ids(&self) -> Vec<FaceId> {
        self.faces.keys().collect()
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Positions of the face's outer boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or any of its entities is missing.
    pub fn face_outer_points(&self, id: FaceId) -> Result<Vec<Point3>, TopologyError> {
        self.loop_points(self.face(id)?.outer)
    }

    /// Positions of each of the face's holes.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or any of its entities is missing.
    pub fn face_inner_points(&self, id: FaceId) -> Result<Vec<Vec<Point3>>, TopologyError> {
        self.face(id)?
            .inner
            .iter()
            .map(|&l| self.loop_points(l))
            .collect()
    }

    /// Outward unit normal of a face, from its outer loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is missing or its outer loop has no area.
    pub fn face_normal(&self, id: FaceId) -> Result<Vector3> {
        newell_normal(&self.face_outer_points(id)?)
    }

    /// Supporting plane of a face, with normal pointing outward.
    ///
    /// # Errors
    ///
    /// See [`Solid::face_normal`].
    pub fn face_plane(&self, id: FaceId) -> Result<Plane> {
        Plane::from_ring(&self.face_outer_points(id)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::KernelError;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn unit_square() -> Vec<Point3> {
        vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)]
    }

    // ── Vertices and edges ─────────────────────────────────────

    #[test]
    fn add_vertex_rejects_nan() {
        let mut solid = Solid::new();
        assert!(solid.add_vertex(p(f64::NAN, 0.0, 0.0)).is_err());
        assert_eq!(solid.vertex_count(), 0);
    }

    #[test]
    fn edge_halves_have_opposite_endpoints() {
        let mut solid = Solid::new();
        let a = solid.add_vertex(p(0.0, 0.0, 0.0)).unwrap();
        let b = solid.add_vertex(p(1.0, 0.0, 0.0)).unwrap();
        let e = solid.add_edge(a, b).unwrap();

        let edge = solid.edge(e).unwrap();
        assert_eq!(edge.left.vertex, a);
        assert_eq!(edge.right.vertex, b);
        assert!(edge.left.loop_id.is_none());
        assert_eq!(solid.half_edge_end(HalfEdgeId::left(e)).unwrap(), b);
        assert_eq!(solid.half_edge_end(HalfEdgeId::right(e)).unwrap(), a);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut solid = Solid::new();
        let a = solid.add_vertex(p(0.0, 0.0, 0.0)).unwrap();
        let b = solid.add_vertex(p(0.0, 0.0, 0.0)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn foreign_vertex_is_not_found() {
        let mut other = Solid::new();
        let _ = other.add_vertex(p(0.0, 0.0, 0.0)).unwrap();
        let foreign = other.add_vertex(p(1.0, 0.0, 0.0)).unwrap();

        let solid = Solid::new();
        assert!(matches!(
            solid.vertex(foreign),
            Err(TopologyError::EntityNotFound("vertex"))
        ));
    }

    // ── Loops ──────────────────────────────────────────────────

    #[test]
    fn loop_from_polygon_preserves_order_and_normal() {
        let mut solid = Solid::new();
        let polygon = Polygon::new(unit_square()).unwrap();
        let l = solid.loop_from_polygon(&polygon).unwrap();

        assert_eq!(solid.loop_points(l).unwrap(), unit_square());
        assert_eq!(solid.vertex_count(), 4);
        assert_eq!(solid.edge_count(), 4);

        let n = newell_normal(&solid.loop_points(l).unwrap()).unwrap();
        assert!((n - polygon.normal().unwrap()).norm() < 1e-12);
    }

    #[test]
    fn loop_uses_left_halves() {
        let mut solid = Solid::new();
        let l = solid.loop_from_points(&unit_square()).unwrap();
        for h in &solid.face_loop(l).unwrap().half_edges {
            assert_eq!(h.side, Side::Left);
            assert_eq!(solid.half_edge(*h).unwrap().loop_id, Some(l));
            assert!(solid.half_edge(h.twin()).unwrap().loop_id.is_none());
        }
    }

    #[test]
    fn loop_from_two_points_rejected_without_mutation() {
        let mut solid = Solid::new();
        let err = solid
            .loop_from_points(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)])
            .unwrap_err();
        assert!(matches!(err, KernelError::Geometry(_)));
        assert_eq!(solid.vertex_count(), 0);
        assert_eq!(solid.edge_count(), 0);
    }

    #[test]
    fn half_edge_cannot_join_two_loops() {
        let mut solid = Solid::new();
        let l = solid.loop_from_points(&unit_square()).unwrap();
        let halves = solid.face_loop(l).unwrap().half_edges.clone();
        let err = solid.loop_from_half_edges(halves).unwrap_err();
        assert!(matches!(err, KernelError::Topology(TopologyError::HalfEdgeInUse)));
    }

    #[test]
    fn open_chain_rejected() {
        let mut solid = Solid::new();
        let v: Vec<_> = unit_square()
            .into_iter()
            .map(|q| solid.add_vertex(q).unwrap())
            .collect();
        let e0 = solid.add_edge(v[0], v[1]).unwrap();
        let e1 = solid.add_edge(v[1], v[2]).unwrap();
        let e2 = solid.add_edge(v[2], v[3]).unwrap();
        let err = solid
            .loop_from_half_edges(vec![
                HalfEdgeId::left(e0),
                HalfEdgeId::left(e1),
                HalfEdgeId::left(e2),
            ])
            .unwrap_err();
        assert!(matches!(err, KernelError::Topology(TopologyError::OpenLoop)));
        assert!(solid.half_edge(HalfEdgeId::left(e0)).unwrap().loop_id.is_none());
    }

    // ── Faces and caps ─────────────────────────────────────────

    #[test]
    fn add_face_links_loops() {
        let mut solid = Solid::new();
        let outer_ring = [p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(4.0, 4.0, 0.0), p(0.0, 4.0, 0.0)];
        let hole_ring = [p(1.0, 1.0, 0.0), p(1.0, 2.0, 0.0), p(2.0, 2.0, 0.0), p(2.0, 1.0, 0.0)];
        let outer = solid.loop_from_points(&outer_ring).unwrap();
        let hole = solid.loop_from_points(&hole_ring).unwrap();
        let face = solid.add_face(outer, vec![hole]).unwrap();

        assert_eq!(solid.face_loop(outer).unwrap().face, Some(face));
        assert_eq!(solid.face_loop(hole).unwrap().face, Some(face));
        assert_eq!(solid.face_inner_points(face).unwrap().len(), 1);
        assert!((solid.face_normal(face).unwrap() - Vector3::z()).norm() < 1e-12);

        assert!(solid.add_face(outer, vec![]).is_err());
    }

    #[test]
    fn cap_forward_and_reverse_wind_oppositely() {
        let mut solid = Solid::new();
        let v: Vec<_> = unit_square()
            .into_iter()
            .map(|q| solid.add_vertex(q).unwrap())
            .collect();
        let ring: Vec<EdgeId> = (0..4)
            .map(|i| solid.add_edge(v[i], v[(i + 1) % 4]).unwrap())
            .collect();

        let front = solid.cap(&[ring.clone()], false).unwrap();
        let back = solid.cap(&[ring], true).unwrap();

        assert!((solid.face_normal(front).unwrap() - Vector3::z()).norm() < 1e-12);
        assert!((solid.face_normal(back).unwrap() + Vector3::z()).norm() < 1e-12);
        assert!(solid.validate().is_ok());
    }

    #[test]
    fn failed_cap_leaves_rings_free() {
        let mut solid = Solid::new();
        let v: Vec<_> = unit_square()
            .into_iter()
            .map(|q| solid.add_vertex(q).unwrap())
            .collect();
        let ring: Vec<EdgeId> = (0..4)
            .map(|i| solid.add_edge(v[i], v[(i + 1) % 4]).unwrap())
            .collect();
        // Three sides of the square do not close.
        let open = ring[..3].to_vec();

        assert!(solid.cap(&[ring.clone(), open], false).is_err());
        assert_eq!(solid.face_count(), 0);
        assert_eq!(solid.loops().count(), 0);
        for &e in &ring {
            assert!(solid.half_edge(HalfEdgeId::left(e)).unwrap().loop_id.is_none());
        }
        assert!(solid.cap(&[ring], false).is_ok());
    }
}
