//! Boolean operations on solids.
//!
//! Faces are broken into convex polygons, combined with binary space
//! partitioning trees and stitched back into a [`Solid`]. Coincident
//! coplanar faces are routed by facing, so touching solids merge without
//! leaving a double wall.

mod bsp;
mod convert;
mod polygon;

use tracing::debug;

use crate::error::Result;
use crate::topology::Solid;

use bsp::{Limits, Node};
use convert::{polygons_to_solid, solid_to_polygons};

/// Tolerances for boolean operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BooleanParams {
    /// Distance within which a point counts as on a plane. Also the merge
    /// distance when the result is stitched.
    pub epsilon: f64,
    /// Deepest BSP tree allowed before the operation gives up.
    pub max_depth: usize,
}

impl Default for BooleanParams {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            max_depth: 512,
        }
    }
}

impl BooleanParams {
    fn limits(&self) -> Limits {
        Limits {
            epsilon: self.epsilon,
            max_depth: self.max_depth,
        }
    }
}

/// Which boolean to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// Everything in either solid.
    Union,
    /// Everything in the first solid but not the second.
    Difference,
    /// Everything in both solids.
    Intersection,
}

/// Combines two solids.
///
/// Solids whose bounding boxes do not overlap skip the BSP entirely: a
/// union appends both topologies, a difference returns `a` and an
/// intersection is empty.
///
/// # Errors
///
/// Returns [`OperationError::Failed`](crate::error::OperationError::Failed)
/// if an input face cannot be converted, the BSP tree gets deeper than
/// `params.max_depth`, or the result has a non-finite coordinate.
pub fn boolean(a: &Solid, b: &Solid, op: BooleanOp, params: &BooleanParams) -> Result<Solid> {
    let overlap = match (a.bounding_box(), b.bounding_box()) {
        (Some(box_a), Some(box_b)) => box_a.intersects(&box_b, params.epsilon),
        _ => false,
    };
    if !overlap {
        debug!(?op, "bounding boxes are disjoint");
        return match op {
            BooleanOp::Union => {
                let mut out = a.clone();
                out.append(b)?;
                Ok(out)
            }
            BooleanOp::Difference => Ok(a.clone()),
            BooleanOp::Intersection => Ok(Solid::new()),
        };
    }

    let limits = params.limits();
    let eps = params.epsilon;
    let mut ta = Node::from_polygons(solid_to_polygons(a)?, limits)?;
    let mut tb = Node::from_polygons(solid_to_polygons(b)?, limits)?;

    match op {
        BooleanOp::Union => {
            ta.clip_to(&tb, eps);
            tb.clip_to(&ta, eps);
            tb.invert();
            tb.clip_to(&ta, eps);
            tb.invert();
            ta.build(tb.all_polygons(), limits, 0)?;
        }
        BooleanOp::Difference => {
            ta.invert();
            ta.clip_to(&tb, eps);
            tb.clip_to(&ta, eps);
            tb.invert();
            tb.clip_to(&ta, eps);
            tb.invert();
            ta.build(tb.all_polygons(), limits, 0)?;
            ta.invert();
        }
        BooleanOp::Intersection => {
            ta.invert();
            tb.clip_to(&ta, eps);
            tb.invert();
            ta.clip_to(&tb, eps);
            tb.clip_to(&ta, eps);
            ta.build(tb.all_polygons(), limits, 0)?;
            ta.invert();
        }
    }

    let polygons = ta.all_polygons();
    debug!(?op, polygons = polygons.len(), "boolean finished");
    polygons_to_solid(&polygons, eps)
}

/// Unions any number of solids, left to right.
///
/// No solids give the empty solid; one solid is returned as a copy.
///
/// # Errors
///
/// Fails on the first pairwise union that fails; see [`boolean`].
pub fn boolean_union(solids: &[&Solid], params: &BooleanParams) -> Result<Solid> {
    let Some((first, rest)) = solids.split_first() else {
        return Ok(Solid::new());
    };
    let mut acc = (*first).clone();
    for solid in rest {
        acc = boolean(&acc, solid, BooleanOp::Union, params)?;
    }
    Ok(acc)
}

/// Subtracts `b` from `a`.
///
/// # Errors
///
/// See [`boolean`].
pub fn boolean_difference(a: &Solid, b: &Solid, params: &BooleanParams) -> Result<Solid> {
    boolean(a, b, BooleanOp::Difference, params)
}

/// Keeps what `a` and `b` share.
///
/// # Errors
///
/// See [`boolean`].
pub fn boolean_intersection(a: &Solid, b: &Solid, params: &BooleanParams) -> Result<Solid> {
    boolean(a, b, BooleanOp::Intersection, params)
}
