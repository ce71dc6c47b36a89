mod extrude;
mod lamina;
mod mesh;
mod swept;
mod sweep;

pub use extrude::build_extrude;
pub use lamina::build_lamina;
pub use mesh::{build_mesh, build_mesh_from_triangles};
pub use sweep::build_sweep;

use std::sync::Arc;

use crate::error::Result;
use crate::geometry::{Curve, Profile};
use crate::math::Vector3;
use crate::topology::Solid;

/// How a profile travels to form a solid.
#[derive(Debug, Clone)]
pub enum Path {
    /// A straight extrusion of `distance` along `direction`.
    Direction { direction: Vector3, distance: f64 },
    /// A sweep along a curve, trimmed by setback distances at either end and
    /// with the profile turned by `rotation` radians about the path tangent.
    Curve {
        curve: Arc<dyn Curve>,
        start_setback: f64,
        end_setback: f64,
        rotation: f64,
    },
}

impl Path {
    /// A straight path.
    #[must_use]
    pub fn direction(direction: Vector3, distance: f64) -> Self {
        Self::Direction {
            direction,
            distance,
        }
    }

    /// A curved path with no setbacks or rotation.
    #[must_use]
    pub fn curve(curve: Arc<dyn Curve>) -> Self {
        Self::Curve {
            curve,
            start_setback: 0.0,
            end_setback: 0.0,
            rotation: 0.0,
        }
    }
}

/// Sweeps `profile` along `path`.
///
/// # Errors
///
/// See [`build_extrude`] and [`build_sweep`].
pub fn build_along(profile: &Profile, path: &Path) -> Result<Solid> {
    match path {
        Path::Direction {
            direction,
            distance,
        } => build_extrude(profile, direction, *distance, false),
        Path::Curve {
            curve,
            start_setback,
            end_setback,
            rotation,
        } => build_sweep(profile, curve.as_ref(), *start_setback, *end_setback, *rotation),
    }
}
