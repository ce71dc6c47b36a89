use tracing::debug;

use crate::error::{GeometryError, OperationError, Result};
use crate::math::{is_finite_point, Point3, MODEL_TOLERANCE};
use crate::topology::{EdgeId, HalfEdgeId, Solid, VertexId};

/// Builds a swept solid from profile rings placed at successive stations.
///
/// `stations[k][r]` is ring `r` at station `k`. Ring 0 is the outer boundary,
/// counter-clockwise about the sweep direction, and the remaining rings are
/// holes, clockwise. Every station must have the same ring structure.
///
/// Open sweeps get a start cap facing backward and an end cap facing forward.
/// Closed sweeps join the last station back to the first and have no caps.
///
/// Everything is validated before the first entity is created.
pub(super) fn build_swept_solid(stations: &[Vec<Vec<Point3>>], closed: bool) -> Result<Solid> {
    validate_stations(stations, closed)?;

    let mut solid = Solid::new();

    // Rings are stored reversed so that edge `i` runs from `w[i]` to
    // `w[i + 1]` clockwise about the sweep direction. The left halves then
    // wind the start cap outward and the right halves the end cap.
    let mut vertices: Vec<Vec<Vec<VertexId>>> = Vec::with_capacity(stations.len());
    for rings in stations {
        let mut station = Vec::with_capacity(rings.len());
        for ring in rings {
            let mut ids = Vec::with_capacity(ring.len());
            for p in ring.iter().rev() {
                ids.push(solid.add_vertex(*p)?);
            }
            station.push(ids);
        }
        vertices.push(station);
    }

    let mut ring_edges: Vec<Vec<Vec<EdgeId>>> = Vec::with_capacity(stations.len());
    for station in &vertices {
        ring_edges.push(edges_around(&mut solid, station)?);
    }

    if !closed {
        solid.cap(&ring_edges[0], false)?;
    }

    let count = stations.len();
    let segments = if closed { count } else { count - 1 };
    for k in 0..segments {
        let next = (k + 1) % count;
        for (r, ring) in vertices[k].iter().enumerate() {
            let n = ring.len();
            let mut sides = Vec::with_capacity(n);
            for (i, &from) in ring.iter().enumerate() {
                sides.push(solid.add_edge(from, vertices[next][r][i])?);
            }
            for i in 0..n {
                let j = (i + 1) % n;
                let halves = vec![
                    HalfEdgeId::right(ring_edges[k][r][i]),
                    HalfEdgeId::left(sides[i]),
                    HalfEdgeId::left(ring_edges[next][r][i]),
                    HalfEdgeId::right(sides[j]),
                ];
                let outer = solid.loop_from_half_edges(halves)?;
                solid.add_face(outer, Vec::new())?;
            }
        }
    }

    if !closed {
        solid.cap(&ring_edges[count - 1], true)?;
    }

    debug!(
        faces = solid.face_count(),
        edges = solid.edge_count(),
        vertices = solid.vertex_count(),
        closed,
        "built swept solid"
    );
    Ok(solid)
}

/// One edge per consecutive vertex pair of every ring, wrapping around.
fn edges_around(solid: &mut Solid, rings: &[Vec<VertexId>]) -> Result<Vec<Vec<EdgeId>>> {
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        let n = ring.len();
        let mut edges = Vec::with_capacity(n);
        for i in 0..n {
            edges.push(solid.add_edge(ring[i], ring[(i + 1) % n])?);
        }
        out.push(edges);
    }
    Ok(out)
}

fn validate_stations(stations: &[Vec<Vec<Point3>>], closed: bool) -> Result<()> {
    let minimum = if closed { 3 } else { 2 };
    if stations.len() < minimum {
        return Err(OperationError::InvalidInput(format!(
            "a sweep needs at least {minimum} stations, got {}",
            stations.len()
        ))
        .into());
    }

    let first = &stations[0];
    if first.is_empty() {
        return Err(OperationError::InvalidInput("profile has no rings".into()).into());
    }
    for (k, rings) in stations.iter().enumerate() {
        let same_shape = rings.len() == first.len()
            && rings.iter().zip(first).all(|(a, b)| a.len() == b.len());
        if !same_shape {
            return Err(OperationError::InvalidInput(format!(
                "station {k} does not match the profile's ring structure"
            ))
            .into());
        }
        for ring in rings {
            if ring.len() < 3 {
                return Err(GeometryError::Degenerate("ring with fewer than 3 points".into()).into());
            }
            if !ring.iter().all(is_finite_point) {
                return Err(GeometryError::NonFinite("sweep station").into());
            }
        }
    }

    let count = stations.len();
    let segments = if closed { count } else { count - 1 };
    for k in 0..segments {
        let next = (k + 1) % count;
        for (a, b) in stations[k].iter().zip(&stations[next]) {
            if a.iter().zip(b).any(|(p, q)| (q - p).norm() < MODEL_TOLERANCE) {
                return Err(GeometryError::Degenerate(format!(
                    "stations {k} and {next} touch"
                ))
                .into());
            }
        }
    }
    Ok(())
}
