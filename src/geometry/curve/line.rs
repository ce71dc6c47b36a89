use crate::error::{GeometryError, Result};
use crate::geometry::Frame;
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{check_parameter, check_range, Curve};

/// A straight segment from `start` to `end`.
#[derive(Debug, Clone)]
pub struct Line {
    start: Point3,
    end: Point3,
    direction: Vector3,
}

impl Line {
    /// Creates a new segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints coincide.
    pub fn new(start: Point3, end: Point3) -> Result<Self> {
        let d = end - start;
        let len = d.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            start,
            end,
            direction: d / len,
        })
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> &Point3 {
        &self.start
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> &Point3 {
        &self.end
    }

    /// Returns the unit direction from start to end.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }
}

impl Curve for Line {
    fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    fn evaluate(&self, u: f64) -> Result<Point3> {
        check_parameter(u)?;
        Ok(self.start + (self.end - self.start) * u)
    }

    fn tangent(&self, u: f64) -> Result<Vector3> {
        check_parameter(u)?;
        Ok(self.direction)
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn frames(&self, start: f64, end: f64) -> Result<Vec<Frame>> {
        check_range(start, end)?;
        Ok(vec![
            Frame::from_tangent(self.evaluate(start)?, self.direction)?,
            Frame::from_tangent(self.evaluate(end)?, self.direction)?,
        ])
    }
}
