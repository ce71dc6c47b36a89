use tracing::debug;

use crate::error::{OperationError, Result};
use crate::math::{is_finite_point, Point3};
use crate::topology::stitch::EdgeMatcher;
use crate::topology::Solid;

/// Wraps an already built solid.
///
/// # Errors
///
/// Returns an error if the solid's topology is inconsistent.
pub fn build_mesh(solid: &Solid) -> Result<Solid> {
    solid.validate()?;
    Ok(solid.clone())
}

/// Builds a solid from an indexed triangle list.
///
/// Triangles sharing a vertex pair in opposite directions share an edge.
/// Each triangle becomes one face; no coplanar merging is attempted.
///
/// # Errors
///
/// Returns [`OperationError::InvalidInput`] if a vertex is not finite, an
/// index is out of range, or a triangle repeats a vertex.
pub fn build_mesh_from_triangles(vertices: &[Point3], triangles: &[[usize; 3]]) -> Result<Solid> {
    if let Some(bad) = vertices.iter().position(|p| !is_finite_point(p)) {
        return Err(OperationError::InvalidInput(format!("vertex {bad} is not finite")).into());
    }
    for (t, tri) in triangles.iter().enumerate() {
        if tri.iter().any(|&i| i >= vertices.len()) {
            return Err(OperationError::InvalidInput(format!(
                "triangle {t} indexes past {} vertices",
                vertices.len()
            ))
            .into());
        }
        if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
            return Err(
                OperationError::InvalidInput(format!("triangle {t} repeats a vertex")).into(),
            );
        }
    }

    let mut solid = Solid::new();
    let mut ids = Vec::with_capacity(vertices.len());
    for p in vertices {
        ids.push(solid.add_vertex(*p)?);
    }

    let mut matcher = EdgeMatcher::new();
    for tri in triangles {
        let mut halves = Vec::with_capacity(3);
        for k in 0..3 {
            halves.push(matcher.half_edge(&mut solid, ids[tri[k]], ids[tri[(k + 1) % 3]])?);
        }
        let outer = solid.loop_from_half_edges(halves)?;
        solid.add_face(outer, Vec::new())?;
    }

    debug!(
        faces = solid.face_count(),
        closed = solid.is_closed(),
        "imported triangle mesh"
    );
    Ok(solid)
}
