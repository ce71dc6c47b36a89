use std::collections::HashMap;

use crate::math::{Point3, Vector3, TOLERANCE};

use super::VertexAttributes;

/// Averages normals across coincident vertices.
///
/// Vertices at the same position are grouped by normal: a vertex joins the
/// first group whose leading normal is within `angle_threshold`. Each group
/// takes the normalised sum of its members' normals. Members that end up
/// with identical attributes are merged and triangle indices are remapped.
pub(super) fn smooth_normals(
    vertices: &mut Vec<VertexAttributes>,
    triangles: &mut [[usize; 3]],
    angle_threshold: f64,
) {
    let cos_limit = angle_threshold.cos();

    let mut by_position: HashMap<[u64; 3], Vec<usize>> = HashMap::new();
    for (i, v) in vertices.iter().enumerate() {
        by_position.entry(position_key(&v.position)).or_default().push(i);
    }

    let mut remap: Vec<usize> = (0..vertices.len()).collect();
    for members in by_position.values() {
        let mut groups: Vec<(Vector3, Vector3, Vec<usize>)> = Vec::new();
        for &i in members {
            let n = vertices[i].normal;
            match groups.iter_mut().find(|(lead, _, _)| lead.dot(&n) >= cos_limit) {
                Some((_, sum, ids)) => {
                    *sum += n;
                    ids.push(i);
                }
                None => groups.push((n, n, vec![i])),
            }
        }

        for (lead, sum, ids) in groups {
            let averaged = if sum.norm() > TOLERANCE {
                sum.normalize()
            } else {
                lead
            };
            for &i in &ids {
                vertices[i].normal = averaged;
            }
            for (k, &i) in ids.iter().enumerate() {
                if let Some(&j) = ids[..k].iter().find(|&&j| {
                    remap[j] == j
                        && vertices[j].uv == vertices[i].uv
                        && vertices[j].color == vertices[i].color
                }) {
                    remap[i] = j;
                }
            }
        }
    }

    // Compact in index order so the output does not depend on hash order.
    let mut new_index = vec![0usize; vertices.len()];
    let mut kept = Vec::with_capacity(vertices.len());
    for (i, v) in vertices.iter().enumerate() {
        if remap[i] == i {
            new_index[i] = kept.len();
            kept.push(*v);
        }
    }
    for tri in triangles.iter_mut() {
        for slot in tri.iter_mut() {
            *slot = new_index[remap[*slot]];
        }
    }
    *vertices = kept;
}

/// Exact position key; `-0.0` and `0.0` collapse together.
fn position_key(p: &Point3) -> [u64; 3] {
    [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topology::FaceId;

    fn vertex(x: f64, normal: Vector3) -> VertexAttributes {
        VertexAttributes {
            face: FaceId::default(),
            position: Point3::new(x, 0.0, 0.0),
            normal,
            uv: None,
            color: None,
        }
    }

    #[test]
    fn shallow_crease_is_merged() {
        let a = Vector3::new(0.0, 0.1, 1.0).normalize();
        let b = Vector3::new(0.0, -0.1, 1.0).normalize();
        let mut vertices = vec![vertex(0.0, a), vertex(0.0, b), vertex(1.0, a)];
        let mut triangles = vec![[0, 2, 1]];
        smooth_normals(&mut vertices, &mut triangles, 45.0_f64.to_radians());

        assert_eq!(vertices.len(), 2);
        assert!((vertices[0].normal - Vector3::z()).norm() < 1e-12);
        assert_eq!(triangles[0], [0, 1, 0]);
    }

    #[test]
    fn sharp_edge_is_kept() {
        let mut vertices = vec![vertex(0.0, Vector3::z()), vertex(0.0, Vector3::x())];
        let mut triangles: Vec<[usize; 3]> = vec![];
        smooth_normals(&mut vertices, &mut triangles, 45.0_f64.to_radians());

        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].normal, Vector3::z());
        assert_eq!(vertices[1].normal, Vector3::x());
    }

    #[test]
    fn differing_uvs_average_without_merging() {
        let a = Vector3::new(0.1, 0.0, 1.0).normalize();
        let b = Vector3::new(-0.1, 0.0, 1.0).normalize();
        let mut first = vertex(0.0, a);
        first.uv = Some(crate::math::Point2::new(0.0, 0.0));
        let mut second = vertex(0.0, b);
        second.uv = Some(crate::math::Point2::new(1.0, 0.0));
        let mut vertices = vec![first, second];
        smooth_normals(&mut vertices, &mut [], 45.0_f64.to_radians());

        assert_eq!(vertices.len(), 2);
        assert!((vertices[0].normal - vertices[1].normal).norm() < 1e-12);
    }
}
