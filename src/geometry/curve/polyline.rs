use crate::error::{GeometryError, Result};
use crate::geometry::Frame;
use crate::math::{is_finite_point, Point3, Vector3, MODEL_TOLERANCE, TOLERANCE};

use super::{check_parameter, check_range, mitred_frames, Curve};

/// A piecewise-linear path, open or closed.
///
/// A closed polyline sweeps into a tube without end caps.
#[derive(Debug, Clone)]
pub struct Polyline {
    points: Vec<Point3>,
    closed: bool,
    /// Arc length at the start of each segment, plus the total at the end.
    cumulative: Vec<f64>,
}

impl Polyline {
    /// Creates an open polyline through `points`.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than two points, non-finite coordinates
    /// or zero-length segments.
    pub fn new(points: Vec<Point3>) -> Result<Self> {
        Self::build(points, false)
    }

    /// Creates a closed polyline; the segment from the last point back to
    /// the first is implicit.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than three points, non-finite coordinates
    /// or zero-length segments.
    pub fn closed(points: Vec<Point3>) -> Result<Self> {
        Self::build(points, true)
    }

    fn build(points: Vec<Point3>, closed: bool) -> Result<Self> {
        let min = if closed { 3 } else { 2 };
        if points.len() < min {
            return Err(GeometryError::Degenerate(format!(
                "polyline needs at least {min} points, got {}",
                points.len()
            ))
            .into());
        }
        if points.iter().any(|p| !is_finite_point(p)) {
            return Err(GeometryError::NonFinite("polyline").into());
        }

        let n = points.len();
        let segment_count = if closed { n } else { n - 1 };
        let mut cumulative = Vec::with_capacity(segment_count + 1);
        let mut total = 0.0;
        cumulative.push(total);
        for i in 0..segment_count {
            let len = (points[(i + 1) % n] - points[i]).norm();
            if len < MODEL_TOLERANCE {
                return Err(
                    GeometryError::Degenerate(format!("zero-length polyline segment {i}")).into(),
                );
            }
            total += len;
            cumulative.push(total);
        }

        Ok(Self {
            points,
            closed,
            cumulative,
        })
    }

    /// Returns the vertices.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    fn segment_count(&self) -> usize {
        self.cumulative.len() - 1
    }

    /// Finds the segment containing arc length `s` and the local parameter.
    fn locate(&self, s: f64) -> (usize, f64) {
        let last = self.segment_count() - 1;
        let i = self
            .cumulative
            .windows(2)
            .position(|w| s <= w[1])
            .unwrap_or(last);
        let seg_len = self.cumulative[i + 1] - self.cumulative[i];
        let t = ((s - self.cumulative[i]) / seg_len).clamp(0.0, 1.0);
        (i, t)
    }

    fn segment(&self, i: usize) -> (Point3, Point3) {
        let n = self.points.len();
        (self.points[i], self.points[(i + 1) % n])
    }
}

impl Curve for Polyline {
    fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn evaluate(&self, u: f64) -> Result<Point3> {
        check_parameter(u)?;
        let (i, t) = self.locate(u.clamp(0.0, 1.0) * self.length());
        let (a, b) = self.segment(i);
        Ok(a + (b - a) * t)
    }

    fn tangent(&self, u: f64) -> Result<Vector3> {
        check_parameter(u)?;
        let (i, _) = self.locate(u.clamp(0.0, 1.0) * self.length());
        let (a, b) = self.segment(i);
        Ok((b - a).normalize())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn frames(&self, start: f64, end: f64) -> Result<Vec<Frame>> {
        if self.closed {
            return mitred_frames(&self.points, true);
        }
        check_range(start, end)?;

        let length = self.length();
        let (s0, s1) = (start * length, end * length);
        let eps = MODEL_TOLERANCE.max(length * TOLERANCE);

        let mut samples = vec![self.evaluate(start)?];
        for (i, &s) in self
            .cumulative
            .iter()
            .enumerate()
            .take(self.points.len() - 1)
            .skip(1)
        {
            if s > s0 + eps && s < s1 - eps {
                samples.push(self.points[i]);
            }
        }
        samples.push(self.evaluate(end)?);
        mitred_frames(&samples, false)
    }
}
