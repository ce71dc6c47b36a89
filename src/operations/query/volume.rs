use crate::error::{OperationError, Result};
use crate::tessellation::{TessellateSolid, TessellationParams};
use crate::topology::Solid;

/// Computes the volume of a solid.
///
/// Uses tessellation and the signed tetrahedron method. For each triangle,
/// computes `(1/6) * v0 . (v1 x v2)` and sums over all triangles. Triangles
/// wind counter-clockwise seen from outside, so a closed solid gives a
/// positive sum.
pub struct Volume<'a> {
    solid: &'a Solid,
    params: TessellationParams,
}

impl<'a> Volume<'a> {
    /// Creates a new `Volume` query with default tessellation parameters.
    #[must_use]
    pub fn new(solid: &'a Solid) -> Self {
        Self {
            solid,
            params: TessellationParams {
                uvs: false,
                ..TessellationParams::default()
            },
        }
    }

    /// Executes the query, returning the volume (absolute value).
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Failed`] if any face cannot be tessellated,
    /// since the sum would then be meaningless.
    pub fn execute(&self) -> Result<f64> {
        let tessellation = TessellateSolid::new(self.solid, self.params).execute()?;
        if let Some(first) = tessellation.warnings.iter().next() {
            return Err(OperationError::Failed(format!(
                "volume needs every face tessellated: {}",
                first.message
            ))
            .into());
        }

        let mesh = &tessellation.mesh;
        let positions = mesh.positions();
        let mut signed_volume = 0.0;
        for tri in mesh.indices() {
            let v0 = positions[tri[0] as usize].coords;
            let v1 = positions[tri[1] as usize].coords;
            let v2 = positions[tri[2] as usize].coords;
            signed_volume += v0.dot(&v1.cross(&v2));
        }

        Ok(signed_volume.abs() / 6.0)
    }
}
