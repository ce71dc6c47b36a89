use std::collections::HashMap;

use crate::error::Result;
use crate::math::Point3;

use super::{EdgeId, FaceId, HalfEdgeId, Solid, VertexId};

/// Spatial hash-based vertex merger.
///
/// Groups points by grid cell and merges vertices that are within `tolerance`
/// of each other.
pub(crate) struct VertexMerger {
    cell_size: f64,
    map: HashMap<(i64, i64, i64), Vec<(VertexId, Point3)>>,
}

impl VertexMerger {
    pub(crate) fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            map: HashMap::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_key(&self, p: &Point3) -> (i64, i64, i64) {
        let inv = 1.0 / self.cell_size;
        (
            (p.x * inv).floor() as i64,
            (p.y * inv).floor() as i64,
            (p.z * inv).floor() as i64,
        )
    }

    pub(crate) fn get_or_create(&mut self, solid: &mut Solid, point: &Point3) -> Result<VertexId> {
        let key = self.cell_key(point);

        // Search in neighboring cells (3x3x3) for a match
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbor = (key.0 + dx, key.1 + dy, key.2 + dz);
                    if let Some(entries) = self.map.get(&neighbor) {
                        for &(vid, ref existing) in entries {
                            if (point - existing).norm() < self.cell_size {
                                return Ok(vid);
                            }
                        }
                    }
                }
            }
        }

        let vid = solid.add_vertex(*point)?;
        self.map.entry(key).or_default().push((vid, *point));
        Ok(vid)
    }
}

/// Pairs directed vertex hops with existing edges so adjacent faces share
/// edges: a hop `a -> b` reuses the free right half of an edge created as
/// `b -> a`, otherwise a new edge is made.
#[derive(Default)]
pub(crate) struct EdgeMatcher {
    open: HashMap<(VertexId, VertexId), EdgeId>,
}

impl EdgeMatcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn half_edge(
        &mut self,
        solid: &mut Solid,
        from: VertexId,
        to: VertexId,
    ) -> Result<HalfEdgeId> {
        if let Some(edge) = self.open.remove(&(to, from)) {
            return Ok(HalfEdgeId::right(edge));
        }
        let edge = solid.add_edge(from, to)?;
        self.open.insert((from, to), edge);
        Ok(HalfEdgeId::left(edge))
    }
}

/// Adds a hole-free face through merged vertices and shared edges.
///
/// Consecutive points that merge into the same vertex are collapsed.
/// Returns `None` (adding nothing) if fewer than three vertices remain.
pub(crate) fn add_merged_face(
    solid: &mut Solid,
    merger: &mut VertexMerger,
    matcher: &mut EdgeMatcher,
    ring: &[Point3],
) -> Result<Option<FaceId>> {
    let mut ids: Vec<VertexId> = Vec::with_capacity(ring.len());
    for p in ring {
        let id = merger.get_or_create(solid, p)?;
        if ids.last() != Some(&id) {
            ids.push(id);
        }
    }
    while ids.len() > 1 && ids.first() == ids.last() {
        ids.pop();
    }
    let mut seen = ids.clone();
    seen.sort_unstable();
    seen.dedup();
    if ids.len() < 3 || seen.len() != ids.len() {
        return Ok(None);
    }

    let n = ids.len();
    let mut halves = Vec::with_capacity(n);
    for i in 0..n {
        halves.push(matcher.half_edge(solid, ids[i], ids[(i + 1) % n])?);
    }
    let outer = solid.loop_from_half_edges(halves)?;
    Ok(Some(solid.add_face(outer, Vec::new())?))
}
