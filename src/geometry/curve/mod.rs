mod arc;
mod line;
mod polyline;

pub use arc::CircularArc;
pub use line::Line;
pub use polyline::Polyline;

use crate::error::{GeometryError, OperationError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::Frame;

/// A sweep path.
///
/// Parameters are normalised: `0.0` is the start of the curve and `1.0`
/// the end, proportional to arc length.
pub trait Curve: std::fmt::Debug + Send + Sync {
    /// Total arc length.
    fn length(&self) -> f64;

    /// Evaluates the curve at normalised parameter `u`.
    ///
    /// # Errors
    ///
    /// Returns an error if `u` is outside `[0, 1]`.
    fn evaluate(&self, u: f64) -> Result<Point3>;

    /// Unit tangent at normalised parameter `u`.
    ///
    /// # Errors
    ///
    /// Returns an error if `u` is outside `[0, 1]`.
    fn tangent(&self, u: f64) -> Result<Vector3>;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;

    /// Orthonormal frames sampled between `start` and `end`, both included.
    ///
    /// Frame Z axes follow the path. Interior frames are mitred: their Z axis
    /// bisects the incoming and outgoing directions. Closed curves ignore the
    /// range and return one frame per sample around the loop, without
    /// repeating the first.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is empty or out of bounds, or the
    /// sampled path doubles back on itself.
    fn frames(&self, start: f64, end: f64) -> Result<Vec<Frame>>;
}

/// Validates a normalised parameter.
pub(crate) fn check_parameter(u: f64) -> Result<()> {
    if (-TOLERANCE..=1.0 + TOLERANCE).contains(&u) {
        Ok(())
    } else {
        Err(OperationError::InvalidInput(format!("curve parameter {u} is outside [0, 1]")).into())
    }
}

/// Validates a normalised parameter range.
pub(crate) fn check_range(start: f64, end: f64) -> Result<()> {
    check_parameter(start)?;
    check_parameter(end)?;
    if end - start <= TOLERANCE {
        return Err(OperationError::InvalidInput(format!(
            "empty curve range [{start}, {end}]"
        ))
        .into());
    }
    Ok(())
}

/// Builds mitred frames through a sequence of path points.
///
/// Open paths get end frames perpendicular to the first and last segments.
pub(crate) fn mitred_frames(points: &[Point3], closed: bool) -> Result<Vec<Frame>> {
    let n = points.len();
    let min = if closed { 3 } else { 2 };
    if n < min {
        return Err(GeometryError::Degenerate(format!(
            "a sweep path needs at least {min} samples, got {n}"
        ))
        .into());
    }

    let segment_count = if closed { n } else { n - 1 };
    let mut directions = Vec::with_capacity(segment_count);
    for i in 0..segment_count {
        let d = points[(i + 1) % n] - points[i];
        let len = d.norm();
        if len < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "sweep path has coincident samples at {i}"
            ))
            .into());
        }
        directions.push(d / len);
    }

    let mut frames = Vec::with_capacity(n);
    for (i, origin) in points.iter().enumerate() {
        let z = if closed {
            directions[(i + segment_count - 1) % segment_count] + directions[i]
        } else if i == 0 {
            directions[0]
        } else if i == n - 1 {
            directions[segment_count - 1]
        } else {
            directions[i - 1] + directions[i]
        };
        if z.norm() < 1e-6 {
            return Err(GeometryError::Degenerate(format!(
                "sweep path reverses direction at sample {i}"
            ))
            .into());
        }
        frames.push(Frame::from_tangent(*origin, z)?);
    }
    Ok(frames)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn right_angle_miter_bisects() {
        let frames =
            mitred_frames(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)], false).unwrap();
        assert_eq!(frames.len(), 3);
        let expected = Vector3::new(1.0, 1.0, 0.0).normalize();
        assert!((frames[1].z_axis() - expected).norm() < 1e-12);
        assert!((frames[2].z_axis() - Vector3::y()).norm() < 1e-12);
    }

    #[test]
    fn reversal_rejected() {
        let result = mitred_frames(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 0.0, 0.0)], false);
        assert!(result.is_err());
    }

    #[test]
    fn closed_square_frames_are_all_mitred() {
        let pts = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)];
        let frames = mitred_frames(&pts, true).unwrap();
        assert_eq!(frames.len(), 4);
        let first = Vector3::new(1.0, -1.0, 0.0).normalize();
        assert!((frames[0].z_axis() - first).norm() < 1e-12);
    }

    #[test]
    fn empty_range_rejected() {
        assert!(check_range(0.5, 0.5).is_err());
        assert!(check_range(-0.5, 0.5).is_err());
        assert!(check_range(0.0, 1.0).is_ok());
    }
}
