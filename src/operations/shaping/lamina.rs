use tracing::debug;

use crate::error::Result;
use crate::geometry::Profile;
use crate::topology::Solid;

/// Builds a zero-thickness sheet from a profile.
///
/// The result has exactly two coincident faces sharing every edge: the front
/// face follows the profile normal and the back face is its reverse. Holes
/// appear in both.
///
/// # Errors
///
/// Returns an error if the profile normal cannot be computed.
pub fn build_lamina(profile: &Profile) -> Result<Solid> {
    let normal = profile.normal()?;
    let rings = profile.oriented_rings(&normal);

    let mut solid = Solid::new();
    let mut edge_rings = Vec::with_capacity(rings.len());
    for ring in &rings {
        let mut ids = Vec::with_capacity(ring.len());
        for p in ring {
            ids.push(solid.add_vertex(*p)?);
        }
        let n = ids.len();
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            edges.push(solid.add_edge(ids[i], ids[(i + 1) % n])?);
        }
        edge_rings.push(edges);
    }

    solid.cap(&edge_rings, false)?;
    solid.cap(&edge_rings, true)?;

    debug!(
        faces = solid.face_count(),
        edges = solid.edge_count(),
        "built lamina"
    );
    Ok(solid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::math::{Point3, Vector3};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn lamina_has_two_opposite_faces() {
        let profile = Profile::from(Polygon::rectangle(2.0, 3.0).unwrap());
        let solid = build_lamina(&profile).unwrap();

        assert_eq!(solid.face_count(), 2);
        assert_eq!(solid.edge_count(), 4);
        assert!(solid.is_closed());
        solid.validate().unwrap();

        let normals: Vec<Vector3> = solid
            .face_ids()
            .into_iter()
            .map(|f| solid.face_normal(f).unwrap())
            .collect();
        assert!((normals[0] + normals[1]).norm() < 1e-12);
        assert!(normals.iter().any(|n| (n - Vector3::z()).norm() < 1e-12));
    }

    #[test]
    fn lamina_keeps_holes_on_both_faces() {
        let outer = Polygon::new(vec![
            p(0.0, 0.0, 0.0),
            p(4.0, 0.0, 0.0),
            p(4.0, 4.0, 0.0),
            p(0.0, 4.0, 0.0),
        ])
        .unwrap();
        let hole = Polygon::new(vec![
            p(1.0, 1.0, 0.0),
            p(2.0, 1.0, 0.0),
            p(2.0, 2.0, 0.0),
            p(1.0, 2.0, 0.0),
        ])
        .unwrap();
        let solid = build_lamina(&Profile::new(outer, vec![hole]).unwrap()).unwrap();
        assert_eq!(solid.face_count(), 2);
        assert!(solid.faces().all(|(_, f)| f.inner.len() == 1));
        assert!(solid.is_closed());
    }
}
