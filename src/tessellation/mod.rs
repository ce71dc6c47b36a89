mod mesh_buffer;
mod smooth;
mod tessellate_face;
mod tessellate_solid;

pub use mesh_buffer::{Bounds, MeshBuffer, VertexHandle};
pub use tessellate_face::{triangulate_face, FaceTriangles};
pub use tessellate_solid::{TessellateSolid, Tessellation};

use crate::error::{Result, TessellationError};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};
use crate::topology::FaceId;

/// How vertex normals are produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalMode {
    /// Every vertex takes its face normal.
    Flat,
    /// Coincident vertices whose normals differ by less than
    /// `angle_threshold` (radians) share an averaged normal.
    Smooth { angle_threshold: f64 },
}

impl NormalMode {
    /// Smooth normals with a 45° threshold.
    #[must_use]
    pub fn smooth() -> Self {
        Self::Smooth {
            angle_threshold: 45.0_f64.to_radians(),
        }
    }
}

/// A linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[must_use]
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Parameters controlling tessellation output.
#[derive(Debug, Clone, Copy)]
pub struct TessellationParams {
    /// Normal generation mode.
    pub normals: NormalMode,
    /// Triangles with a smaller area are dropped.
    pub min_triangle_area: f64,
    /// Emit planar texture coordinates.
    pub uvs: bool,
    /// Color applied to every vertex.
    pub color: Option<Color>,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            normals: NormalMode::Flat,
            min_triangle_area: TOLERANCE,
            uvs: true,
            color: None,
        }
    }
}

impl TessellationParams {
    /// Checks that the parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::InvalidParameters`] for a negative or
    /// non-finite minimum area, or a smoothing angle outside `[0, π]`.
    pub fn validate(&self) -> Result<()> {
        if !self.min_triangle_area.is_finite() || self.min_triangle_area < 0.0 {
            return Err(TessellationError::InvalidParameters(format!(
                "min_triangle_area must be finite and non-negative, got {}",
                self.min_triangle_area
            ))
            .into());
        }
        if let NormalMode::Smooth { angle_threshold } = self.normals {
            if !(0.0..=std::f64::consts::PI).contains(&angle_threshold) {
                return Err(TessellationError::InvalidParameters(format!(
                    "smoothing angle must be within [0, π], got {angle_threshold}"
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// Attributes of one output vertex, as seen by a vertex modifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexAttributes {
    /// Face the vertex was generated for.
    pub face: FaceId,
    pub position: Point3,
    pub normal: Vector3,
    pub uv: Option<Point2>,
    pub color: Option<Color>,
}
