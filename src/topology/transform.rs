use slotmap::SecondaryMap;

use crate::error::{GeometryError, Result, TopologyError};
use crate::math::{is_finite_point, linear_determinant, transform_point, Matrix4};

use super::{EdgeData, FaceData, HalfEdgeId, LoopData, Solid};

impl Solid {
    /// Returns a copy of the solid mapped through an affine transform.
    ///
    /// Transforms with a negative determinant mirror the solid; every loop
    /// is then reversed so face normals keep pointing outward.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if the transform produces a
    /// non-finite coordinate, or a degenerate error for a singular matrix.
    pub fn transformed(&self, matrix: &Matrix4) -> Result<Solid> {
        let det = linear_determinant(matrix);
        if det.abs() < f64::EPSILON || !det.is_finite() {
            return Err(GeometryError::Degenerate("transform matrix is singular".into()).into());
        }

        let mut solid = self.clone();
        for (_, vertex) in &mut solid.vertices {
            vertex.point = transform_point(matrix, &vertex.point);
            if !is_finite_point(&vertex.point) {
                return Err(GeometryError::NonFinite("transformed vertex").into());
            }
        }

        if det < 0.0 {
            for (_, edge) in &mut solid.edges {
                std::mem::swap(&mut edge.left.vertex, &mut edge.right.vertex);
            }
            for (_, l) in &mut solid.loops {
                l.half_edges.reverse();
            }
        }
        Ok(solid)
    }

    /// Copies all of `other`'s topology into this solid under fresh IDs.
    ///
    /// # Errors
    ///
    /// Returns an error if `other` is internally inconsistent.
    pub fn append(&mut self, other: &Solid) -> Result<(), TopologyError> {
        let mut vertex_map = SecondaryMap::new();
        for (id, vertex) in &other.vertices {
            vertex_map.insert(id, self.vertices.insert(vertex.clone()));
        }

        let mut edge_map = SecondaryMap::new();
        for (id, edge) in &other.edges {
            let from = *vertex_map
                .get(edge.left.vertex)
                .ok_or(TopologyError::EntityNotFound("vertex"))?;
            let to = *vertex_map
                .get(edge.right.vertex)
                .ok_or(TopologyError::EntityNotFound("vertex"))?;
            edge_map.insert(id, self.edges.insert(EdgeData::new(from, to)));
        }

        let mut loop_map = SecondaryMap::new();
        for (id, l) in &other.loops {
            let half_edges = l
                .half_edges
                .iter()
                .map(|h| {
                    let edge = *edge_map
                        .get(h.edge)
                        .ok_or(TopologyError::EntityNotFound("edge"))?;
                    Ok(HalfEdgeId { edge, side: h.side })
                })
                .collect::<Result<Vec<_>, TopologyError>>()?;
            let new_id = self.loops.insert(LoopData {
                half_edges: half_edges.clone(),
                face: None,
            });
            for h in half_edges {
                self.edge_mut(h.edge)?.half_mut(h.side).loop_id = Some(new_id);
            }
            loop_map.insert(id, new_id);
        }

        for (_, face) in &other.faces {
            let outer = *loop_map
                .get(face.outer)
                .ok_or(TopologyError::EntityNotFound("loop"))?;
            let inner = face
                .inner
                .iter()
                .map(|&l| loop_map.get(l).copied().ok_or(TopologyError::EntityNotFound("loop")))
                .collect::<Result<Vec<_>, TopologyError>>()?;
            let face_id = self.faces.insert(FaceData {
                outer,
                inner: inner.clone(),
            });
            for l in std::iter::once(outer).chain(inner) {
                if let Some(data) = self.loops.get_mut(l) {
                    data.face = Some(face_id);
                }
            }
        }
        Ok(())
    }
}
