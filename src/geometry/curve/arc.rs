use std::f64::consts::{PI, TAU};

use crate::error::{GeometryError, Result};
use crate::geometry::Frame;
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{check_parameter, check_range, mitred_frames, Curve};

/// Default angular step used to sample arcs into sweep frames.
const DEFAULT_STEP: f64 = PI / 16.0;

/// A circular arc in 3D space.
///
/// Defined by a center, radius, normal axis, and a reference direction
/// for the zero-angle. The arc runs from `start_angle` to `end_angle`
/// (radians) counter-clockwise about the normal. Sweeps follow the chords
/// between `segments` evenly spaced samples.
#[derive(Debug, Clone)]
pub struct CircularArc {
    center: Point3,
    radius: f64,
    normal: Vector3,
    ref_dir: Vector3,
    start_angle: f64,
    end_angle: f64,
    segments: usize,
}

impl CircularArc {
    /// Creates a new arc.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the arc circle
    /// * `radius` - Radius (must be positive)
    /// * `normal` - Normal vector defining the arc plane
    /// * `ref_dir` - Reference direction for angle = 0 (must be perpendicular to normal)
    /// * `start_angle` - Start angle in radians
    /// * `end_angle` - End angle in radians, greater than `start_angle`
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive, the normal is zero-length,
    /// the reference direction is not perpendicular to the normal, or the
    /// angular span is empty or exceeds a full turn.
    pub fn new(
        center: Point3,
        radius: f64,
        normal: Vector3,
        ref_dir: Vector3,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<Self> {
        if radius.is_nan() || radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }

        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / normal_len;

        let ref_len = ref_dir.norm();
        if ref_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let ref_dir = ref_dir / ref_len;

        if normal.dot(&ref_dir).abs() > 1e-9 {
            return Err(GeometryError::Degenerate(
                "reference direction must be perpendicular to normal".into(),
            )
            .into());
        }

        let sweep = end_angle - start_angle;
        if sweep <= TOLERANCE || sweep > TAU + TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "arc sweep must be in (0, 2π], got {sweep}"
            ))
            .into());
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let segments = ((sweep / DEFAULT_STEP).ceil() as usize).max(4);

        Ok(Self {
            center,
            radius,
            normal,
            ref_dir,
            start_angle,
            end_angle,
            segments,
        })
    }

    /// Overrides the number of chords used for sweeping.
    #[must_use]
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments.max(if self.is_closed() { 3 } else { 1 });
        self
    }

    /// Returns the center of the arc.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius of the arc.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    fn angle_at(&self, u: f64) -> f64 {
        self.start_angle + self.sweep() * u
    }

    /// Computes the second axis direction (perpendicular to both normal and `ref_dir`).
    fn binormal(&self) -> Vector3 {
        self.normal.cross(&self.ref_dir)
    }

    fn point_at_angle(&self, angle: f64) -> Point3 {
        let (s, c) = angle.sin_cos();
        self.center + (self.ref_dir * c + self.binormal() * s) * self.radius
    }
}

impl Curve for CircularArc {
    fn length(&self) -> f64 {
        self.radius * self.sweep()
    }

    fn evaluate(&self, u: f64) -> Result<Point3> {
        check_parameter(u)?;
        Ok(self.point_at_angle(self.angle_at(u)))
    }

    fn tangent(&self, u: f64) -> Result<Vector3> {
        check_parameter(u)?;
        let (s, c) = self.angle_at(u).sin_cos();
        Ok(self.binormal() * c - self.ref_dir * s)
    }

    fn is_closed(&self) -> bool {
        (self.sweep() - TAU).abs() < TOLERANCE
    }

    #[allow(clippy::cast_precision_loss)]
    fn frames(&self, start: f64, end: f64) -> Result<Vec<Frame>> {
        if self.is_closed() {
            let n = self.segments;
            let samples: Vec<Point3> = (0..n)
                .map(|k| self.point_at_angle(self.angle_at(k as f64 / n as f64)))
                .collect();
            return mitred_frames(&samples, true);
        }
        check_range(start, end)?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = ((self.segments as f64 * (end - start)).ceil() as usize).max(1);
        let samples: Vec<Point3> = (0..=n)
            .map(|k| {
                let u = start + (end - start) * k as f64 / n as f64;
                self.point_at_angle(self.angle_at(u))
            })
            .collect();
        mitred_frames(&samples, false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn quarter() -> CircularArc {
        CircularArc::new(p(0.0, 0.0, 0.0), 2.0, Vector3::z(), Vector3::x(), 0.0, FRAC_PI_2)
            .unwrap()
    }

    #[test]
    fn quarter_arc_length_and_endpoints() {
        let arc = quarter();
        assert!((arc.length() - PI).abs() < 1e-12);
        assert!((arc.evaluate(0.0).unwrap() - p(2.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((arc.evaluate(1.0).unwrap() - p(0.0, 2.0, 0.0)).norm() < 1e-12);
        assert!((arc.tangent(0.0).unwrap() - Vector3::y()).norm() < 1e-12);
    }

    #[test]
    fn frames_follow_segments() {
        let arc = quarter().with_segments(4);
        let frames = arc.frames(0.0, 1.0).unwrap();
        assert_eq!(frames.len(), 5);
        for f in &frames {
            assert!((f.origin().coords.norm() - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn full_circle_is_closed() {
        let circle =
            CircularArc::new(p(0.0, 0.0, 0.0), 1.0, Vector3::z(), Vector3::x(), 0.0, TAU)
                .unwrap()
                .with_segments(8);
        assert!(circle.is_closed());
        assert_eq!(circle.frames(0.0, 1.0).unwrap().len(), 8);
    }

    #[test]
    fn invalid_radius_rejected() {
        let result = CircularArc::new(p(0.0, 0.0, 0.0), 0.0, Vector3::z(), Vector3::x(), 0.0, 1.0);
        assert!(result.is_err());
    }
}
