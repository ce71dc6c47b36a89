use crate::math::{newell_vector, Point3, Vector3};

/// An oriented plane `normal · p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct SplitPlane {
    pub(super) normal: Vector3,
    pub(super) w: f64,
}

impl SplitPlane {
    /// Plane through a ring, oriented by its winding. `None` if the ring has
    /// no area.
    pub(super) fn from_ring(points: &[Point3]) -> Option<Self> {
        let n = newell_vector(points);
        let len = n.norm();
        if len <= f64::EPSILON || !len.is_finite() {
            return None;
        }
        let normal = n / len;
        let centroid = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
        #[allow(clippy::cast_precision_loss)]
        let w = normal.dot(&centroid) / points.len() as f64;
        Some(Self { normal, w })
    }

    pub(super) fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub(super) fn distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.w
    }
}

/// A convex planar polygon carried through the BSP tree.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct BspPolygon {
    pub(super) vertices: Vec<Point3>,
    pub(super) plane: SplitPlane,
}

impl BspPolygon {
    pub(super) fn new(vertices: Vec<Point3>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = SplitPlane::from_ring(&vertices)?;
        Some(Self { vertices, plane })
    }

    pub(super) fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    /// Twice the polygon area.
    pub(super) fn double_area(&self) -> f64 {
        newell_vector(&self.vertices).norm()
    }

    /// Twice the area over the longest edge. For a triangle this is its
    /// height above that edge.
    pub(super) fn thickness(&self) -> f64 {
        let n = self.vertices.len();
        let longest = (0..n)
            .map(|i| (self.vertices[(i + 1) % n] - self.vertices[i]).norm())
            .fold(0.0, f64::max);
        if longest > 0.0 {
            self.double_area() / longest
        } else {
            0.0
        }
    }
}

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

/// Where the pieces of a split polygon go.
#[derive(Debug, Default)]
pub(super) struct SplitTargets {
    pub(super) coplanar_front: Vec<BspPolygon>,
    pub(super) coplanar_back: Vec<BspPolygon>,
    pub(super) front: Vec<BspPolygon>,
    pub(super) back: Vec<BspPolygon>,
}

impl SplitPlane {
    /// Sorts `polygon` against this plane, splitting it if it spans.
    ///
    /// Coplanar polygons go to `coplanar_front` when they face the same way
    /// as the plane and to `coplanar_back` otherwise. Vertices within
    /// `epsilon` of the plane count as on it.
    pub(super) fn split(&self, polygon: BspPolygon, epsilon: f64, out: &mut SplitTargets) {
        let mut polygon_type = COPLANAR;
        let types: Vec<u8> = polygon
            .vertices
            .iter()
            .map(|v| {
                let t = self.distance(v);
                let kind = if t < -epsilon {
                    BACK
                } else if t > epsilon {
                    FRONT
                } else {
                    COPLANAR
                };
                polygon_type |= kind;
                kind
            })
            .collect();

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    out.coplanar_front.push(polygon);
                } else {
                    out.coplanar_back.push(polygon);
                }
            }
            FRONT => out.front.push(polygon),
            BACK => out.back.push(polygon),
            _ => {
                let n = polygon.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);
                    if ti != BACK {
                        f.push(vi);
                    }
                    if ti != FRONT {
                        b.push(vi);
                    }
                    if ti | tj == SPANNING {
                        let t = (self.w - self.normal.dot(&vi.coords))
                            / self.normal.dot(&(vj - vi));
                        let v = vi + (vj - vi) * t;
                        f.push(v);
                        b.push(v);
                    }
                }
                // Pieces keep the parent's plane so later tests stay consistent.
                if f.len() >= 3 {
                    out.front.push(BspPolygon {
                        vertices: f,
                        plane: polygon.plane,
                    });
                }
                if b.len() >= 3 {
                    out.back.push(BspPolygon {
                        vertices: b,
                        plane: polygon.plane,
                    });
                }
            }
        }
    }
}
