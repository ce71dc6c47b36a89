use crate::error::{OperationError, Result};
use crate::math::polygon_2d::is_convex;
use crate::math::polygon_3d::project_to_uv;
use crate::math::{is_finite_point, Point2, TOLERANCE};
use crate::tessellation::triangulate_face;
use crate::topology::stitch::{add_merged_face, EdgeMatcher, VertexMerger};
use crate::topology::Solid;

use super::polygon::BspPolygon;

/// Breaks every face of `solid` into convex polygons.
///
/// Convex faces without holes are kept whole. Other faces are triangulated.
/// Polygons with no area are dropped.
///
/// # Errors
///
/// Returns [`OperationError::Failed`] for non-finite coordinates or a face
/// that cannot be triangulated.
pub(super) fn solid_to_polygons(solid: &Solid) -> Result<Vec<BspPolygon>> {
    let mut polygons = Vec::with_capacity(solid.face_count());
    for face in solid.face_ids() {
        let outer = solid.face_outer_points(face)?;
        if !outer.iter().all(is_finite_point) {
            return Err(OperationError::Failed("non-finite coordinate in boolean input".into()).into());
        }

        if solid.face(face)?.inner.is_empty() {
            let plane = solid.face_plane(face)?;
            let uv: Vec<Point2> = outer.iter().map(|p| project_to_uv(p, &plane)).collect();
            if is_convex(&uv, TOLERANCE) {
                polygons.extend(BspPolygon::new(outer));
                continue;
            }
        }

        let triangles = triangulate_face(solid, face, 0.0)
            .map_err(|e| OperationError::Failed(format!("boolean input face: {e}")))?;
        polygons.extend(triangles.triangles.iter().filter_map(|t| {
            BspPolygon::new(t.iter().map(|&i| triangles.points[i]).collect())
        }));
    }
    Ok(polygons)
}

/// Rebuilds a solid from BSP output.
///
/// Vertices closer than `epsilon` are merged and faces that meet along a
/// pair of opposite hops share an edge. Slivers thinner than `epsilon`
/// are skipped, however long they are.
///
/// # Errors
///
/// Returns [`OperationError::Failed`] if a polygon has a non-finite
/// coordinate.
pub(super) fn polygons_to_solid(polygons: &[BspPolygon], epsilon: f64) -> Result<Solid> {
    let mut solid = Solid::new();
    let mut merger = VertexMerger::new(epsilon);
    let mut matcher = EdgeMatcher::new();
    for polygon in polygons {
        if !polygon.vertices.iter().all(is_finite_point) {
            return Err(OperationError::Failed("boolean produced a non-finite coordinate".into()).into());
        }
        if polygon.thickness() < epsilon {
            continue;
        }
        add_merged_face(&mut solid, &mut merger, &mut matcher, &polygon.vertices)?;
    }
    Ok(solid)
}
