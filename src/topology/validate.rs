use crate::error::TopologyError;

use super::Solid;

impl Solid {
    /// Checks the structural invariants of the half-edge graph.
    ///
    /// Every loop must close and use each half-edge at most once, every
    /// half-edge must point back at the loop using it, and faces and loops
    /// must reference each other.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), TopologyError> {
        for (loop_id, l) in &self.loops {
            let n = l.half_edges.len();
            if n < 3 {
                return Err(TopologyError::InvalidTopology(format!(
                    "loop has {n} half-edges"
                )));
            }
            for (i, &h) in l.half_edges.iter().enumerate() {
                if self.half_edge(h)?.loop_id != Some(loop_id) {
                    return Err(TopologyError::InvalidTopology(
                        "half-edge does not point back at its loop".into(),
                    ));
                }
                let next = l.half_edges[(i + 1) % n];
                if self.half_edge_end(h)? != self.half_edge_start(next)? {
                    return Err(TopologyError::OpenLoop);
                }
            }
            if let Some(face) = l.face {
                let f = self.face(face)?;
                if f.outer != loop_id && !f.inner.contains(&loop_id) {
                    return Err(TopologyError::InvalidTopology(
                        "loop points at a face that does not list it".into(),
                    ));
                }
            }
        }

        for (_, edge) in &self.edges {
            self.vertex(edge.left.vertex)?;
            self.vertex(edge.right.vertex)?;
            for half in [&edge.left, &edge.right] {
                if let Some(l) = half.loop_id {
                    self.face_loop(l)?;
                }
            }
        }

        for (face_id, face) in &self.faces {
            for &l in std::iter::once(&face.outer).chain(&face.inner) {
                if self.face_loop(l)?.face != Some(face_id) {
                    return Err(TopologyError::InvalidTopology(
                        "face loop is not linked back to the face".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Returns `true` if every half-edge of every edge is used by a loop,
    /// i.e. the boundary is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.edges.is_empty()
            && self
                .edges
                .values()
                .all(|e| e.left.loop_id.is_some() && e.right.loop_id.is_some())
    }
}
