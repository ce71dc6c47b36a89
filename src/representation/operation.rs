use std::sync::Arc;

use tracing::debug;

use crate::error::{KernelError, OperationError, Result};
use crate::geometry::{Curve, Profile};
use crate::math::{Matrix4, Vector3};
use crate::operations::shaping::{build_extrude, build_lamina, build_mesh, build_sweep};
use crate::topology::Solid;

/// How a [`SolidOperation`] makes its solid.
#[derive(Debug, Clone)]
pub enum OperationKind {
    /// A profile pushed straight along `direction`.
    Extrude {
        profile: Profile,
        direction: Vector3,
        distance: f64,
        both_sides: bool,
    },
    /// A profile carried along a curve.
    Sweep {
        profile: Profile,
        curve: Arc<dyn Curve>,
        start_setback: f64,
        end_setback: f64,
        rotation: f64,
    },
    /// A flat two-sided sheet.
    Lamina { profile: Profile },
    /// A solid built elsewhere.
    Imported { solid: Arc<Solid> },
}

impl OperationKind {
    fn build(&self) -> Result<Solid> {
        match self {
            Self::Extrude {
                profile,
                direction,
                distance,
                both_sides,
            } => build_extrude(profile, direction, *distance, *both_sides),
            Self::Sweep {
                profile,
                curve,
                start_setback,
                end_setback,
                rotation,
            } => build_sweep(profile, curve.as_ref(), *start_setback, *end_setback, *rotation),
            Self::Lamina { profile } => build_lamina(profile),
            Self::Imported { solid } => build_mesh(solid),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Extrude { .. } => "extrude",
            Self::Sweep { .. } => "sweep",
            Self::Lamina { .. } => "lamina",
            Self::Imported { .. } => "imported",
        }
    }
}

/// One solid or void contributing to a [`Representation`](super::Representation).
///
/// The built solid is kept as a shared snapshot. Every setter rebuilds it
/// and replaces the snapshot; a setter that fails leaves the operation as
/// it was.
#[derive(Debug, Clone)]
pub struct SolidOperation {
    kind: OperationKind,
    is_void: bool,
    transform: Option<Matrix4>,
    solid: Arc<Solid>,
}

impl SolidOperation {
    /// Builds an operation from its kind.
    ///
    /// # Errors
    ///
    /// Returns the builder's error if the solid cannot be made.
    pub fn new(kind: OperationKind) -> Result<Self> {
        let solid = Arc::new(make(&kind, None)?);
        Ok(Self {
            kind,
            is_void: false,
            transform: None,
            solid,
        })
    }

    /// An extrusion. See [`build_extrude`].
    ///
    /// # Errors
    ///
    /// Returns the builder's error.
    pub fn extrude(profile: Profile, direction: Vector3, distance: f64, both_sides: bool) -> Result<Self> {
        Self::new(OperationKind::Extrude {
            profile,
            direction,
            distance,
            both_sides,
        })
    }

    /// A sweep along `curve`. See [`build_sweep`].
    ///
    /// # Errors
    ///
    /// Returns the builder's error.
    pub fn sweep(
        profile: Profile,
        curve: Arc<dyn Curve>,
        start_setback: f64,
        end_setback: f64,
        rotation: f64,
    ) -> Result<Self> {
        Self::new(OperationKind::Sweep {
            profile,
            curve,
            start_setback,
            end_setback,
            rotation,
        })
    }

    /// A lamina. See [`build_lamina`].
    ///
    /// # Errors
    ///
    /// Returns the builder's error.
    pub fn lamina(profile: Profile) -> Result<Self> {
        Self::new(OperationKind::Lamina { profile })
    }

    /// Wraps an existing solid after checking its topology.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid's topology is inconsistent.
    pub fn imported(solid: Solid) -> Result<Self> {
        Self::new(OperationKind::Imported {
            solid: Arc::new(solid),
        })
    }

    /// Marks the operation as a void, to be subtracted when composing.
    #[must_use]
    pub fn into_void(mut self) -> Self {
        self.is_void = true;
        self
    }

    #[must_use]
    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        self.is_void
    }

    #[must_use]
    pub fn transform(&self) -> Option<&Matrix4> {
        self.transform.as_ref()
    }

    /// The built solid, transform applied.
    #[must_use]
    pub fn solid(&self) -> &Arc<Solid> {
        &self.solid
    }

    /// Replaces the profile of an extrusion, sweep or lamina.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for an imported solid, or the
    /// builder's error.
    pub fn set_profile(&mut self, profile: Profile) -> Result<()> {
        let mut kind = self.kind.clone();
        match &mut kind {
            OperationKind::Extrude { profile: p, .. }
            | OperationKind::Sweep { profile: p, .. }
            | OperationKind::Lamina { profile: p } => *p = profile,
            OperationKind::Imported { .. } => return Err(unsupported("profile", &self.kind)),
        }
        self.commit(kind, self.transform)
    }

    /// Replaces the distance of an extrusion.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for other kinds, or the
    /// builder's error.
    pub fn set_distance(&mut self, distance: f64) -> Result<()> {
        let mut kind = self.kind.clone();
        match &mut kind {
            OperationKind::Extrude { distance: d, .. } => *d = distance,
            _ => return Err(unsupported("distance", &self.kind)),
        }
        self.commit(kind, self.transform)
    }

    /// Replaces the direction of an extrusion.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for other kinds, or the
    /// builder's error.
    pub fn set_direction(&mut self, direction: Vector3) -> Result<()> {
        let mut kind = self.kind.clone();
        match &mut kind {
            OperationKind::Extrude { direction: d, .. } => *d = direction,
            _ => return Err(unsupported("direction", &self.kind)),
        }
        self.commit(kind, self.transform)
    }

    /// Replaces the setbacks of a sweep.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for other kinds, or the
    /// builder's error.
    pub fn set_setbacks(&mut self, start: f64, end: f64) -> Result<()> {
        let mut kind = self.kind.clone();
        match &mut kind {
            OperationKind::Sweep {
                start_setback,
                end_setback,
                ..
            } => {
                *start_setback = start;
                *end_setback = end;
            }
            _ => return Err(unsupported("setbacks", &self.kind)),
        }
        self.commit(kind, self.transform)
    }

    /// Replaces the profile rotation of a sweep, in radians.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for other kinds, or the
    /// builder's error.
    pub fn set_rotation(&mut self, rotation: f64) -> Result<()> {
        let mut kind = self.kind.clone();
        match &mut kind {
            OperationKind::Sweep { rotation: r, .. } => *r = rotation,
            _ => return Err(unsupported("rotation", &self.kind)),
        }
        self.commit(kind, self.transform)
    }

    pub fn set_void(&mut self, is_void: bool) {
        self.is_void = is_void;
    }

    /// Places the built solid with an affine transform, or clears it.
    ///
    /// # Errors
    ///
    /// Returns an error for a singular matrix or one that produces
    /// non-finite coordinates.
    pub fn set_transform(&mut self, transform: Option<Matrix4>) -> Result<()> {
        self.commit(self.kind.clone(), transform)
    }

    /// Builds the solid again from the current parameters.
    ///
    /// # Errors
    ///
    /// Returns the builder's error.
    pub fn rebuild(&mut self) -> Result<()> {
        self.commit(self.kind.clone(), self.transform)
    }

    fn commit(&mut self, kind: OperationKind, transform: Option<Matrix4>) -> Result<()> {
        let solid = make(&kind, transform.as_ref())?;
        debug!(
            kind = kind.name(),
            faces = solid.face_count(),
            "solid operation rebuilt"
        );
        self.kind = kind;
        self.transform = transform;
        self.solid = Arc::new(solid);
        Ok(())
    }
}

fn make(kind: &OperationKind, transform: Option<&Matrix4>) -> Result<Solid> {
    let solid = kind.build()?;
    match transform {
        Some(m) => solid.transformed(m),
        None => Ok(solid),
    }
}

fn unsupported(what: &str, kind: &OperationKind) -> KernelError {
    OperationError::InvalidInput(format!("{} operation has no {what}", kind.name())).into()
}
