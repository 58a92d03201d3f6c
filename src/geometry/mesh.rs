//! `Mesh`: a set of planar 3D polygons (a polyset) plus its convexity hint.

use crate::errors::ValidationError;
use crate::float_types::{
    PI, Real, TAU,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::geometry::{polygon::Polygon, vertex::Vertex};
use nalgebra::{Point3, Vector3};

/// Whether a mesh is known to be convex.
///
/// Convexity detection can't decide for non-planar faces, so the hint is tri-state.
/// Anything but [`Convexity::Convex`] must be tessellated before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Convexity {
    Convex,
    NonConvex,
    #[default]
    Unknown,
}

impl Convexity {
    pub const fn is_convex(self) -> bool {
        matches!(self, Convexity::Convex)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// 3D polygons for volumetric shapes
    pub polygons: Vec<Polygon>,

    /// Convexity hint supplied by whoever produced the polygons
    pub convexity: Convexity,
}

impl Mesh {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon], convexity: Convexity) -> Self {
        Mesh {
            polygons: polygons.to_vec(),
            convexity,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// True when every polygon is already a triangle
    pub fn is_triangulated(&self) -> bool {
        self.polygons.iter().all(Polygon::is_triangle)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.polygons
            .iter()
            .map(Polygon::bounding_box)
            .reduce(|a, b| a.merged(&b))
            .unwrap_or_else(Aabb::new_invalid)
    }

    /// Triangulate each polygon in the Mesh returning a new Mesh containing triangles.
    /// The convexity hint carries over unchanged.
    pub fn triangulate(&self) -> Mesh {
        let triangles = self
            .polygons
            .iter()
            .flat_map(|poly| {
                poly.triangulate().into_iter().filter_map(|triangle| {
                    let normal = poly.normal;
                    Polygon::new(triangle.to_vec()).ok().map(|mut tri| {
                        tri.normal = normal;
                        tri
                    })
                })
            })
            .collect::<Vec<_>>();

        Mesh::from_polygons(&triangles, self.convexity)
    }

    /// Axis-aligned box with one corner at the origin, spanning `(width, length, height)`.
    pub fn cuboid(width: Real, length: Real, height: Real) -> Mesh {
        let corners = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(width, 0.0, 0.0),
            Point3::new(width, length, 0.0),
            Point3::new(0.0, length, 0.0),
            Point3::new(0.0, 0.0, height),
            Point3::new(width, 0.0, height),
            Point3::new(width, length, height),
            Point3::new(0.0, length, height),
        ];
        // (indices, outward normal), CCW from outside
        let faces = [
            ([0, 3, 2, 1], -Vector3::z()),
            ([4, 5, 6, 7], Vector3::z()),
            ([0, 1, 5, 4], -Vector3::y()),
            ([3, 7, 6, 2], Vector3::y()),
            ([0, 4, 7, 3], -Vector3::x()),
            ([1, 2, 6, 5], Vector3::x()),
        ];

        let polygons = faces
            .iter()
            .map(|(indices, normal)| Polygon {
                vertices: indices
                    .iter()
                    .map(|&i| Vertex::new(corners[i], *normal))
                    .collect(),
                normal: *normal,
            })
            .collect();

        Mesh {
            polygons,
            convexity: Convexity::Convex,
        }
    }

    pub fn cube(width: Real) -> Mesh {
        Self::cuboid(width, width, width)
    }

    /// UV sphere centered at the origin, built from triangles at the poles and quads
    /// in between.
    pub fn sphere(radius: Real, segments: usize, stacks: usize) -> Mesh {
        let segments = segments.max(3);
        let stacks = stacks.max(2);
        let point = |i: usize, j: usize| {
            let theta = i as Real / segments as Real * TAU;
            let phi = j as Real / stacks as Real * PI;
            let dir = Vector3::new(theta.cos() * phi.sin(), theta.sin() * phi.sin(), phi.cos());
            Vertex::new(Point3::from(dir * radius), dir)
        };

        let mut polygons = Vec::new();
        for i in 0..segments {
            for j in 0..stacks {
                let mut vertices = vec![point(i, j)];
                if j > 0 {
                    vertices.push(point(i + 1, j));
                }
                if j < stacks - 1 {
                    vertices.push(point(i + 1, j + 1));
                }
                vertices.push(point(i, j + 1));
                if let Ok(polygon) = Polygon::new(vertices) {
                    polygons.push(polygon);
                }
            }
        }

        Mesh {
            polygons,
            convexity: Convexity::Convex,
        }
    }

    /// Construct a mesh from points and faces (indices into `points`).
    /// The convexity of an arbitrary polyhedron is not known.
    pub fn polyhedron(
        points: &[[Real; 3]],
        faces: &[Vec<usize>],
    ) -> Result<Mesh, ValidationError> {
        let mut polygons = Vec::with_capacity(faces.len());
        for (face, indices) in faces.iter().enumerate() {
            let mut positions = Vec::with_capacity(indices.len());
            for &index in indices {
                let Some(&[x, y, z]) = points.get(index) else {
                    return Err(ValidationError::FaceIndexOutOfRange {
                        face,
                        index,
                        len: points.len(),
                    });
                };
                positions.push(Point3::new(x, y, z));
            }
            polygons.push(Polygon::from_points(&positions)?);
        }

        Ok(Mesh {
            polygons,
            convexity: Convexity::Unknown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_bounding_box_spans_the_corner() {
        let bb = Mesh::cuboid(1.0, 2.0, 3.0).bounding_box();
        assert_eq!(bb.mins, Point3::origin());
        assert_eq!(bb.maxs, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn empty_mesh_has_an_invalid_box() {
        let bb = Mesh::default().bounding_box();
        assert!(bb.mins.x > bb.maxs.x);
    }

    #[test]
    fn triangulate_leaves_the_source_untouched() {
        let cube = Mesh::cube(2.0);
        let tri = cube.triangulate();
        assert_eq!(cube.polygons.len(), 6);
        assert_eq!(tri.polygons.len(), 12);
        assert!(tri.is_triangulated());
        assert!(!cube.is_triangulated());
    }

    #[test]
    fn polyhedron_rejects_out_of_range_faces() {
        let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let err = Mesh::polyhedron(&points, &[vec![0, 1, 7]]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::FaceIndexOutOfRange {
                face: 0,
                index: 7,
                len: 3
            }
        );
        let ok = Mesh::polyhedron(&points, &[vec![0, 1, 2]]).unwrap();
        assert_eq!(ok.convexity, Convexity::Unknown);
    }

    #[test]
    fn sphere_fits_its_radius() {
        let bb = Mesh::sphere(2.0, 16, 8).bounding_box();
        assert!(bb.maxs.z <= 2.0 + 1e-9 && bb.mins.z >= -2.0 - 1e-9);
        assert!((bb.maxs.x - 2.0).abs() < 1e-9);
    }
}
