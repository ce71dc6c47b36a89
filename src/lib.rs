//! A boundary-representation modelling kernel.
//!
//! Planar profiles are extruded or swept into half-edge [`topology::Solid`]s,
//! combined with BSP booleans by a [`representation::Representation`], and
//! tessellated into flat triangle buffers.

pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod representation;
pub mod tessellation;
pub mod topology;
pub mod warning;

pub use error::{KernelError, Result};
