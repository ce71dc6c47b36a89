use rayon::prelude::*;
use tracing::{info_span, warn};

use crate::error::Result;
use crate::math::Point2;
use crate::topology::Solid;
use crate::warning::{Warning, Warnings};

use super::smooth::smooth_normals;
use super::{triangulate_face, MeshBuffer, NormalMode, TessellationParams, VertexAttributes};

type VertexModifier<'a> = Box<dyn Fn(VertexAttributes) -> VertexAttributes + Send + Sync + 'a>;

/// Output of [`TessellateSolid`].
#[derive(Debug, Clone, Default)]
pub struct Tessellation {
    pub mesh: MeshBuffer,
    /// One entry per face that could not be triangulated.
    pub warnings: Warnings,
}

/// Tessellates all faces of a solid into a combined mesh buffer.
///
/// Faces are triangulated in parallel and merged in face order. A face that
/// fails is skipped and reported in [`Tessellation::warnings`].
pub struct TessellateSolid<'a> {
    solid: &'a Solid,
    params: TessellationParams,
    modifier: Option<VertexModifier<'a>>,
}

impl<'a> TessellateSolid<'a> {
    /// Creates a new `TessellateSolid` operation.
    #[must_use]
    pub fn new(solid: &'a Solid, params: TessellationParams) -> Self {
        Self {
            solid,
            params,
            modifier: None,
        }
    }

    /// Rewrites every output vertex before it is stored.
    #[must_use]
    pub fn with_vertex_modifier(
        mut self,
        modifier: impl Fn(VertexAttributes) -> VertexAttributes + Send + Sync + 'a,
    ) -> Self {
        self.modifier = Some(Box::new(modifier));
        self
    }

    /// Executes the tessellation.
    ///
    /// # Errors
    ///
    /// Returns an error only for invalid parameters; per-face failures become
    /// warnings.
    pub fn execute(&self) -> Result<Tessellation> {
        self.params.validate()?;
        let face_ids = self.solid.face_ids();
        let span = info_span!("tessellate", faces = face_ids.len());
        let _guard = span.enter();

        let solid = self.solid;
        let min_area = self.params.min_triangle_area;
        let results: Vec<_> = face_ids
            .par_iter()
            .map(|&face| (face, triangulate_face(solid, face, min_area)))
            .collect();

        let mut warnings = Warnings::new();
        let mut vertices: Vec<VertexAttributes> = Vec::new();
        let mut triangles: Vec<[usize; 3]> = Vec::new();
        for (index, (face, result)) in results.into_iter().enumerate() {
            let face_mesh = match result {
                Ok(face_mesh) => face_mesh,
                Err(e) => {
                    warn!(?face, index, error = %e, "skipping face");
                    warnings.push(Warning::warning(format!("face {index} ({face:?}) skipped: {e}")));
                    continue;
                }
            };

            let base = vertices.len();
            let (u, v) = (face_mesh.plane.u_dir(), face_mesh.plane.v_dir());
            vertices.extend(face_mesh.points.iter().map(|p| VertexAttributes {
                face,
                position: *p,
                normal: face_mesh.normal,
                uv: self
                    .params
                    .uvs
                    .then(|| Point2::new(u.dot(&p.coords), v.dot(&p.coords))),
                color: self.params.color,
            }));
            triangles.extend(
                face_mesh
                    .triangles
                    .iter()
                    .map(|t| [t[0] + base, t[1] + base, t[2] + base]),
            );
        }

        if let NormalMode::Smooth { angle_threshold } = self.params.normals {
            smooth_normals(&mut vertices, &mut triangles, angle_threshold);
        }

        let mut mesh = MeshBuffer::new();
        let mut handles = Vec::with_capacity(vertices.len());
        for attributes in vertices {
            let a = match &self.modifier {
                Some(modify) => modify(attributes),
                None => attributes,
            };
            handles.push(mesh.add_vertex(a.position, Some(a.normal), a.uv, a.color)?);
        }
        for t in &triangles {
            mesh.add_triangle(handles[t[0]], handles[t[1]], handles[t[2]])?;
        }

        Ok(Tessellation { mesh, warnings })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Polygon, Profile};
    use crate::math::{Point3, Vector3};
    use crate::operations::shaping::{build_extrude, build_lamina};
    use crate::tessellation::Color;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn unit_cube() -> Solid {
        let profile = Profile::from(Polygon::rectangle(1.0, 1.0).unwrap());
        build_extrude(&profile, &Vector3::z(), 1.0, false).unwrap()
    }

    #[test]
    fn cube_has_12_triangles() {
        let cube = unit_cube();
        let result = TessellateSolid::new(&cube, TessellationParams::default())
            .execute()
            .unwrap();
        assert!(result.warnings.is_empty());
        assert_eq!(result.mesh.triangle_count(), 12);
        assert_eq!(result.mesh.vertex_count(), 24);
        assert_eq!(result.mesh.normals().len(), 24);
        assert_eq!(result.mesh.uvs().len(), 24);
    }

    #[test]
    fn triangles_wind_with_normals() {
        let cube = unit_cube();
        let result = TessellateSolid::new(&cube, TessellationParams::default())
            .execute()
            .unwrap();
        let mesh = &result.mesh;
        for tri in mesh.indices() {
            let [a, b, c] = tri.map(|i| mesh.positions()[i as usize]);
            let n = mesh.normals()[tri[0] as usize];
            assert!((b - a).cross(&(c - a)).dot(&n) > 0.0);
        }
    }

    #[test]
    fn smooth_mode_keeps_cube_edges_sharp() {
        let cube = unit_cube();
        let params = TessellationParams {
            normals: NormalMode::smooth(),
            uvs: false,
            ..TessellationParams::default()
        };
        let result = TessellateSolid::new(&cube, params).execute().unwrap();
        // 90° creases exceed the 45° threshold: no vertex is shared.
        assert_eq!(result.mesh.vertex_count(), 24);
    }

    #[test]
    fn color_and_modifier_applied() {
        let cube = unit_cube();
        let params = TessellationParams {
            color: Some(Color::rgb(1.0, 0.0, 0.0)),
            ..TessellationParams::default()
        };
        let result = TessellateSolid::new(&cube, params)
            .with_vertex_modifier(|mut v| {
                if v.normal.z > 0.5 {
                    v.color = Some(Color::rgb(0.0, 0.0, 1.0));
                }
                v
            })
            .execute()
            .unwrap();
        let blue = result
            .mesh
            .colors()
            .iter()
            .filter(|c| (c.b - 1.0).abs() < f32::EPSILON)
            .count();
        assert_eq!(blue, 4);
        assert_eq!(result.mesh.colors().len(), 24);
    }

    #[test]
    fn lamina_tessellates_both_sides() {
        let profile = Profile::from(
            Polygon::new(vec![
                p(0.0, 0.0, 0.0),
                p(3.0, 0.0, 0.0),
                p(3.0, 2.0, 0.0),
                p(0.0, 2.0, 0.0),
            ])
            .unwrap(),
        );
        let lamina = build_lamina(&profile).unwrap();
        let result = TessellateSolid::new(&lamina, TessellationParams::default())
            .execute()
            .unwrap();
        assert_eq!(result.mesh.triangle_count(), 4);
        assert!(result.mesh.positions().iter().all(|q| q.coords.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn invalid_params_rejected() {
        let cube = unit_cube();
        let params = TessellationParams {
            min_triangle_area: -1.0,
            ..TessellationParams::default()
        };
        assert!(TessellateSolid::new(&cube, params).execute().is_err());
    }

    #[test]
    fn self_intersecting_face_becomes_warning() {
        let mut solid = Solid::new();
        // A bow-tie loop: geometrically crossed, topologically fine.
        let outer = solid
            .loop_from_points(&[
                p(0.0, 0.0, 0.0),
                p(2.0, 0.0, 0.0),
                p(0.0, 2.0, 0.0),
                p(2.0, 2.0, 0.0),
                p(1.0, 3.0, 0.0),
            ])
            .unwrap();
        let face = solid.add_face(outer, vec![]).unwrap();
        let result = TessellateSolid::new(&solid, TessellationParams::default())
            .execute()
            .unwrap();
        assert_eq!(result.warnings.len(), 1);
        let warning = result.warnings.iter().next().unwrap();
        assert!(warning.message.contains(&format!("{face:?}")));
        assert!(result.mesh.is_empty());
    }
}
