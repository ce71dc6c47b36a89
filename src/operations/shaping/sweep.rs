use tracing::warn;

use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::{Curve, Frame, Plane, Profile};
use crate::math::{Point3, Vector3, MODEL_TOLERANCE, TOLERANCE};
use crate::topology::Solid;

use super::swept::build_swept_solid;

/// Sweeps a profile along a curve.
///
/// The profile is given in local XY coordinates. It is turned by `rotation`
/// radians about the local Z axis and placed in the curve's first frame. Its
/// rings are then carried from frame to frame along each path segment,
/// meeting the next frame's XY plane as a mitred joint.
///
/// `start_setback` and `end_setback` trim the path by arc length at either
/// end. If together they consume the whole path they are both ignored, with a
/// warning. Closed curves ignore setbacks and produce a capless ring.
///
/// # Errors
///
/// Returns [`OperationError::InvalidInput`] for negative or non-finite
/// setbacks, a zero-length curve, or a profile standing perpendicular to the
/// local XY plane. Returns a geometry error if the path doubles back or a
/// frame is parallel to the segment entering it.
pub fn build_sweep(
    profile: &Profile,
    curve: &dyn Curve,
    start_setback: f64,
    end_setback: f64,
    rotation: f64,
) -> Result<Solid> {
    for (name, value) in [("start", start_setback), ("end", end_setback)] {
        if !value.is_finite() || value < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "{name} setback must be a non-negative distance, got {value}"
            ))
            .into());
        }
    }
    if !rotation.is_finite() {
        return Err(OperationError::InvalidInput("sweep rotation must be finite".into()).into());
    }

    let length = curve.length();
    if length.is_nan() || length < MODEL_TOLERANCE {
        return Err(OperationError::InvalidInput("sweep path has zero length".into()).into());
    }

    let closed = curve.is_closed();
    let (start, end) = if closed {
        (0.0, 0.0)
    } else if start_setback + end_setback >= length {
        warn!(
            start_setback,
            end_setback, length, "setbacks consume the whole sweep path; ignoring them"
        );
        (0.0, 0.0)
    } else {
        (start_setback, end_setback)
    };
    let frames = curve.frames(start / length, 1.0 - end / length)?;

    let local = profile.rotated(rotation)?;
    if local.normal()?.z.abs() < MODEL_TOLERANCE {
        return Err(OperationError::InvalidInput(
            "sweep profile must not be perpendicular to the local XY plane".into(),
        )
        .into());
    }
    let rings = local.oriented_rings(&Vector3::z());

    let stations = carry_rings(&rings, &frames, closed)?;
    build_swept_solid(&stations, closed)
}

/// Places `rings` at the first frame and carries them along the path.
fn carry_rings(
    rings: &[Vec<Point3>],
    frames: &[Frame],
    closed: bool,
) -> Result<Vec<Vec<Vec<Point3>>>> {
    let n = frames.len();
    let minimum = if closed { 3 } else { 2 };
    if n < minimum {
        return Err(GeometryError::Degenerate(format!(
            "a sweep path needs at least {minimum} frames, got {n}"
        ))
        .into());
    }

    let segments = if closed { n } else { n - 1 };
    let mut directions = Vec::with_capacity(segments);
    for k in 0..segments {
        let d = frames[(k + 1) % n].origin() - frames[k].origin();
        let len = d.norm();
        if len < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "sweep frames {k} and {} coincide",
                (k + 1) % n
            ))
            .into());
        }
        directions.push(d / len);
    }

    let first: Vec<Vec<Point3>> = if closed {
        // The first frame of a closed path is a mitre; place the profile
        // square to the first segment and project it onto the mitre.
        let square = Frame::from_tangent(*frames[0].origin(), directions[0])?;
        let plane = frames[0].xy_plane();
        rings
            .iter()
            .map(|ring| {
                ring.iter()
                    .map(|p| project(&plane, &square.to_world(p), &directions[0]))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        rings
            .iter()
            .map(|ring| ring.iter().map(|p| frames[0].to_world(p)).collect())
            .collect()
    };

    let mut stations = Vec::with_capacity(n);
    stations.push(first);
    for k in 0..n - 1 {
        let plane = frames[k + 1].xy_plane();
        let next = stations[k]
            .iter()
            .map(|ring| {
                ring.iter()
                    .map(|p| project(&plane, p, &directions[k]))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        stations.push(next);
    }
    Ok(stations)
}

fn project(plane: &Plane, point: &Point3, direction: &Vector3) -> Result<Point3> {
    plane.intersect_ray(point, direction).ok_or_else(|| {
        GeometryError::Degenerate("sweep frame is parallel to the path".into()).into()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{CircularArc, Line, Polygon, Polyline};
    use crate::operations::query::{BoundingBox, Volume};
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn square(size: f64) -> Profile {
        Profile::from(Polygon::rectangle(size, size).unwrap())
    }

    // ── Straight paths ──

    #[test]
    fn sweep_along_line_matches_extrusion() {
        let line = Line::new(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)).unwrap();
        let solid = build_sweep(&square(1.0), &line, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(solid.face_count(), 6);
        assert!(solid.is_closed());
        solid.validate().unwrap();
        let volume = Volume::new(&solid).execute().unwrap();
        assert_relative_eq!(volume, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn setbacks_trim_the_path() {
        let line = Line::new(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)).unwrap();
        let solid = build_sweep(&square(1.0), &line, 2.0, 3.0, 0.0).unwrap();
        let bounds = BoundingBox::new(&solid).execute().unwrap();
        assert_relative_eq!(bounds.min.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.x, 7.0, epsilon = 1e-9);
    }

    #[test]
    fn oversized_setbacks_are_ignored() {
        let line = Line::new(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)).unwrap();
        let solid = build_sweep(&square(1.0), &line, 6.0, 5.0, 0.0).unwrap();
        let bounds = BoundingBox::new(&solid).execute().unwrap();
        assert_relative_eq!(bounds.min.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.max.x, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn rotation_turns_the_profile() {
        let line = Line::new(p(0.0, 0.0, 0.0), p(0.0, 0.0, 5.0)).unwrap();
        let profile = Profile::from(Polygon::rectangle(4.0, 1.0).unwrap());
        let flat = build_sweep(&profile, &line, 0.0, 0.0, 0.0).unwrap();
        let turned = build_sweep(&profile, &line, 0.0, 0.0, FRAC_PI_2).unwrap();
        let a = BoundingBox::new(&flat).execute().unwrap();
        let b = BoundingBox::new(&turned).execute().unwrap();
        let (ax, ay) = (a.max.x - a.min.x, a.max.y - a.min.y);
        let (bx, by) = (b.max.x - b.min.x, b.max.y - b.min.y);
        assert_relative_eq!(ax, by, epsilon = 1e-9);
        assert_relative_eq!(ay, bx, epsilon = 1e-9);
    }

    // ── Bent paths ──

    #[test]
    fn open_polyline_face_count() {
        let path = Polyline::new(vec![
            p(0.0, 0.0, 0.0),
            p(5.0, 0.0, 0.0),
            p(5.0, 5.0, 0.0),
            p(10.0, 5.0, 0.0),
        ])
        .unwrap();
        let solid = build_sweep(&square(1.0), &path, 0.0, 0.0, 0.0).unwrap();
        // Two caps plus four side faces per segment.
        assert_eq!(solid.face_count(), 2 + 4 * 3);
        assert!(solid.is_closed());
        solid.validate().unwrap();
    }

    #[test]
    fn closed_polyline_makes_a_ring() {
        let path = Polyline::closed(vec![
            p(0.0, 0.0, 0.0),
            p(10.0, 0.0, 0.0),
            p(10.0, 10.0, 0.0),
            p(0.0, 10.0, 0.0),
        ])
        .unwrap();
        let solid = build_sweep(&square(1.0), &path, 1.0, 1.0, 0.0).unwrap();
        assert_eq!(solid.face_count(), 4 * 4);
        assert!(solid.is_closed());
        solid.validate().unwrap();
        // Mitred square frame: centerline 40 times cross-section 1.
        let volume = Volume::new(&solid).execute().unwrap();
        assert_relative_eq!(volume, 40.0, epsilon = 1e-6);
    }

    #[test]
    fn arc_sweep_volume_follows_pappus() {
        let arc = CircularArc::new(p(0.0, 0.0, 0.0), 10.0, Vector3::z(), Vector3::x(), 0.0, PI)
            .unwrap()
            .with_segments(64);
        let solid = build_sweep(&square(1.0), &arc, 0.0, 0.0, 0.0).unwrap();
        assert_eq!(solid.face_count(), 2 + 4 * 64);
        let volume = Volume::new(&solid).execute().unwrap();
        // Area times centroid path length, within chordal error.
        let expected = 10.0 * PI;
        assert!((volume - expected).abs() < expected * 0.01, "got {volume}");
    }

    // ── Errors ──

    #[test]
    fn negative_setback_rejected() {
        let line = Line::new(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)).unwrap();
        assert!(build_sweep(&square(1.0), &line, -1.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn profile_on_its_side_rejected() {
        let line = Line::new(p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)).unwrap();
        let upright = Profile::from(
            Polygon::new(vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.0, 0.0, 1.0),
                p(0.0, 0.0, 1.0),
            ])
            .unwrap(),
        );
        assert!(build_sweep(&upright, &line, 0.0, 0.0, 0.0).is_err());
    }
}
