use crate::error::{OperationError, Result};
use crate::geometry::Profile;
use crate::math::{Point3, Vector3, MODEL_TOLERANCE, TOLERANCE};
use crate::topology::Solid;

use super::swept::build_swept_solid;

/// Extrudes a profile along a direction to create a prism.
///
/// The result has `2 + E` faces, where `E` counts the edges of the outer
/// boundary and every hole. A negative `distance` extrudes against
/// `direction`. With `both_sides` the profile is first moved back by half the
/// extrusion so that the solid straddles the profile plane.
///
/// # Errors
///
/// Returns [`OperationError::InvalidInput`] if the direction is zero-length,
/// the distance is zero or not finite, or the direction lies in the profile
/// plane.
pub fn build_extrude(
    profile: &Profile,
    direction: &Vector3,
    distance: f64,
    both_sides: bool,
) -> Result<Solid> {
    if direction.norm() < TOLERANCE || !direction.iter().all(|c| c.is_finite()) {
        return Err(
            OperationError::InvalidInput("extrude direction must be non-zero".into()).into(),
        );
    }
    if !distance.is_finite() || distance.abs() < MODEL_TOLERANCE {
        return Err(OperationError::InvalidInput(format!(
            "extrude distance must be non-zero and finite, got {distance}"
        ))
        .into());
    }

    let sweep = direction.normalize() * distance;
    let normal = profile.normal()?;
    if normal.dot(&sweep.normalize()).abs() < MODEL_TOLERANCE {
        return Err(OperationError::InvalidInput(
            "extrude direction lies in the profile plane".into(),
        )
        .into());
    }

    // Wind the rings about the actual sweep vector so the start cap faces
    // backward whatever the profile's own orientation.
    let offset = if both_sides { -sweep / 2.0 } else { Vector3::zeros() };
    let start: Vec<Vec<Point3>> = profile
        .oriented_rings(&sweep)
        .into_iter()
        .map(|ring| ring.into_iter().map(|p| p + offset).collect())
        .collect();
    let end: Vec<Vec<Point3>> = start
        .iter()
        .map(|ring| ring.iter().map(|p| p + sweep).collect())
        .collect();

    build_swept_solid(&[start, end], false)
}
