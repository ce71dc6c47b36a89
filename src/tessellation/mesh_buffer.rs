use crate::error::{Result, TessellationError};
use crate::math::{Point2, Point3, Vector3};

use super::Color;

/// Index of a vertex in a [`MeshBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexHandle(u32);

impl VertexHandle {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Component-wise minimum and maximum of an attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<const N: usize> {
    pub min: [f64; N],
    pub max: [f64; N],
}

impl<const N: usize> Bounds<N> {
    fn from_value(value: [f64; N]) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    fn include(&mut self, value: [f64; N]) {
        for (i, v) in value.into_iter().enumerate() {
            self.min[i] = self.min[i].min(v);
            self.max[i] = self.max[i].max(v);
        }
    }
}

fn grow<const N: usize>(bounds: &mut Option<Bounds<N>>, value: [f64; N]) {
    match bounds {
        Some(b) => b.include(value),
        None => *bounds = Some(Bounds::from_value(value)),
    }
}

/// An indexed triangle mesh with optional per-vertex attributes.
///
/// Each attribute array is either empty or as long as the position array.
/// Vertices added without an attribute that other vertices carry get a zero
/// value in its place.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffer {
    positions: Vec<Point3>,
    normals: Vec<Vector3>,
    uvs: Vec<Point2>,
    colors: Vec<Color>,
    indices: Vec<[u32; 3]>,
    position_bounds: Option<Bounds<3>>,
    normal_bounds: Option<Bounds<3>>,
    uv_bounds: Option<Bounds<2>>,
    color_bounds: Option<Bounds<4>>,
}

impl MeshBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::Failed`] once the buffer holds `u32::MAX`
    /// vertices.
    pub fn add_vertex(
        &mut self,
        position: Point3,
        normal: Option<Vector3>,
        uv: Option<Point2>,
        color: Option<Color>,
    ) -> Result<VertexHandle> {
        let count = self.positions.len();
        let handle = u32::try_from(count)
            .map_err(|_| TessellationError::Failed("mesh buffer is full".into()))?;

        self.positions.push(position);
        grow(&mut self.position_bounds, [position.x, position.y, position.z]);

        push_attribute(&mut self.normals, count, normal, Vector3::zeros());
        if let Some(n) = normal {
            grow(&mut self.normal_bounds, [n.x, n.y, n.z]);
        }
        push_attribute(&mut self.uvs, count, uv, Point2::origin());
        if let Some(t) = uv {
            grow(&mut self.uv_bounds, [t.x, t.y]);
        }
        push_attribute(&mut self.colors, count, color, Color::rgba(0.0, 0.0, 0.0, 0.0));
        if let Some(c) = color {
            grow(
                &mut self.color_bounds,
                [c.r.into(), c.g.into(), c.b.into(), c.a.into()],
            );
        }

        Ok(VertexHandle(handle))
    }

    /// Appends a triangle.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::Failed`] if a handle does not refer to a
    /// vertex of this buffer.
    pub fn add_triangle(&mut self, a: VertexHandle, b: VertexHandle, c: VertexHandle) -> Result<()> {
        if [a, b, c].iter().any(|h| h.index() >= self.positions.len()) {
            return Err(TessellationError::Failed(format!(
                "triangle ({}, {}, {}) references a missing vertex",
                a.0, b.0, c.0
            ))
            .into());
        }
        self.indices.push([a.0, b.0, c.0]);
        Ok(())
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[must_use]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    #[must_use]
    pub fn normals(&self) -> &[Vector3] {
        &self.normals
    }

    #[must_use]
    pub fn uvs(&self) -> &[Point2] {
        &self.uvs
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    #[must_use]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// Positions as `[x, y, z, x, y, z, ...]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn positions_flat(&self) -> Vec<f32> {
        self.positions
            .iter()
            .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect()
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn normals_flat(&self) -> Vec<f32> {
        self.normals
            .iter()
            .flat_map(|n| [n.x as f32, n.y as f32, n.z as f32])
            .collect()
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn uvs_flat(&self) -> Vec<f32> {
        self.uvs.iter().flat_map(|t| [t.x as f32, t.y as f32]).collect()
    }

    #[must_use]
    pub fn colors_flat(&self) -> Vec<f32> {
        self.colors.iter().flat_map(|c| [c.r, c.g, c.b, c.a]).collect()
    }

    #[must_use]
    pub fn indices_flat(&self) -> Vec<u32> {
        self.indices.iter().flatten().copied().collect()
    }

    #[must_use]
    pub fn position_bounds(&self) -> Option<Bounds<3>> {
        self.position_bounds
    }

    #[must_use]
    pub fn normal_bounds(&self) -> Option<Bounds<3>> {
        self.normal_bounds
    }

    #[must_use]
    pub fn uv_bounds(&self) -> Option<Bounds<2>> {
        self.uv_bounds
    }

    #[must_use]
    pub fn color_bounds(&self) -> Option<Bounds<4>> {
        self.color_bounds
    }
}

fn push_attribute<T: Copy>(values: &mut Vec<T>, count: usize, value: Option<T>, zero: T) {
    match value {
        Some(v) => {
            values.resize(count, zero);
            values.push(v);
        }
        None if !values.is_empty() => values.push(zero),
        None => {}
    }
}
