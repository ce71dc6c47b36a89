use std::collections::HashMap;

use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{Result, TessellationError};
use crate::geometry::Plane;
use crate::math::polygon_2d::winding_number;
use crate::math::polygon_3d::{project_to_uv, triangle_area};
use crate::math::{is_finite_point, newell_normal, Point2, Point3, Vector3};
use crate::topology::{FaceId, Solid};

/// Triangles covering one planar face.
#[derive(Debug, Clone)]
pub struct FaceTriangles {
    /// Boundary points of the face: outer loop first, then each hole.
    pub points: Vec<Point3>,
    /// Counter-clockwise index triples into `points`, seen from outside.
    pub triangles: Vec<[usize; 3]>,
    /// Unit face normal.
    pub normal: Vector3,
    /// Projection plane. `u_dir × v_dir` equals `normal`.
    pub plane: Plane,
}

/// Triangulates a planar face, holes included.
///
/// The boundary is projected onto the face plane and fed to a constrained
/// Delaunay triangulation. A triangle is kept when its centroid has a
/// positive winding number over all loops, so holes (wound clockwise) cut
/// out the region they enclose. Triangles below `min_area` are dropped.
///
/// # Errors
///
/// Returns [`TessellationError::Failed`] if the face has non-finite points,
/// no area, crossing boundary edges, or no triangles left.
pub fn triangulate_face(solid: &Solid, face: FaceId, min_area: f64) -> Result<FaceTriangles> {
    let outer = solid.face_outer_points(face)?;
    let inner = solid.face_inner_points(face)?;

    let contours: Vec<Vec<Point3>> = std::iter::once(outer).chain(inner).collect();
    if !contours.iter().flatten().all(is_finite_point) {
        return Err(TessellationError::Failed("face has non-finite points".into()).into());
    }
    let normal = newell_normal(&contours[0])
        .map_err(|_| TessellationError::Failed("face has zero area".into()))?;
    let plane = Plane::from_normal(contours[0][0], normal)?;

    let contours_2d: Vec<Vec<Point2>> = contours
        .iter()
        .map(|ring| ring.iter().map(|p| project_to_uv(p, &plane)).collect())
        .collect();
    let points: Vec<Point3> = contours.into_iter().flatten().collect();

    let mut cdt = ConstrainedDelaunayTriangulation::<SpadePoint2<f64>>::new();
    let mut by_handle: HashMap<usize, usize> = HashMap::new();
    let mut offset = 0;
    for ring in &contours_2d {
        let mut handles = Vec::with_capacity(ring.len());
        for (i, uv) in ring.iter().enumerate() {
            let h = cdt.insert(SpadePoint2::new(uv.x, uv.y)).map_err(|e: InsertionError| {
                TessellationError::Failed(format!("CDT insert: {e}"))
            })?;
            by_handle.entry(h.index()).or_insert(offset + i);
            handles.push(h);
        }
        for i in 0..handles.len() {
            let from = handles[i];
            let to = handles[(i + 1) % handles.len()];
            if from == to {
                continue;
            }
            if !cdt.can_add_constraint(from, to) {
                return Err(
                    TessellationError::Failed("face boundary intersects itself".into()).into(),
                );
            }
            cdt.add_constraint(from, to);
        }
        offset += ring.len();
    }

    let mut triangles = Vec::new();
    for tri in cdt.inner_faces() {
        let [a, b, c] = tri.vertices();
        let (pa, pb, pc) = (a.position(), b.position(), c.position());
        let centroid = Point2::new((pa.x + pb.x + pc.x) / 3.0, (pa.y + pb.y + pc.y) / 3.0);
        let winding: i32 = contours_2d.iter().map(|ring| winding_number(&centroid, ring)).sum();
        if winding <= 0 {
            continue;
        }

        let mut ids = [0usize; 3];
        for (slot, vh) in ids.iter_mut().zip([a, b, c]) {
            *slot = *by_handle.get(&vh.fix().index()).ok_or_else(|| {
                TessellationError::Failed("triangulation introduced a new vertex".into())
            })?;
        }
        if triangle_area(&points[ids[0]], &points[ids[1]], &points[ids[2]]) < min_area {
            continue;
        }
        triangles.push(ids);
    }

    if triangles.is_empty() {
        return Err(TessellationError::Failed("face produced no triangles".into()).into());
    }

    Ok(FaceTriangles {
        points,
        triangles,
        normal,
        plane,
    })
}
