//! Planar 3D polygons and their triangulation.

use crate::errors::ValidationError;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb, tolerance};
use crate::geometry::vertex::Vertex;
use geo::{LineString, Polygon as GeoPolygon, TriangulateEarcut, coord};
use nalgebra::{Point3, Vector3};

/// A planar polygon, defined by a list of vertices in winding order.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    /// Unit normal of the polygon's plane (Newell's method)
    pub normal: Vector3<Real>,
}

impl Polygon {
    /// Create a polygon from vertices
    pub fn new(vertices: Vec<Vertex>) -> Result<Self, ValidationError> {
        if vertices.len() < 3 {
            return Err(ValidationError::TooFewPoints(vertices.len()));
        }
        if let Some(bad) = vertices
            .iter()
            .find(|v| !v.pos.coords.iter().all(|c| c.is_finite()))
        {
            return Err(ValidationError::InvalidCoordinate(bad.pos));
        }
        let normal = newell_normal(&vertices);
        Ok(Polygon { vertices, normal })
    }

    /// Build a polygon from bare positions, using the computed plane normal for every vertex.
    pub fn from_points(points: &[Point3<Real>]) -> Result<Self, ValidationError> {
        let vertices: Vec<Vertex> = points
            .iter()
            .map(|p| Vertex::new(*p, Vector3::zeros()))
            .collect();
        let mut polygon = Polygon::new(vertices)?;
        let normal = polygon.normal;
        for v in &mut polygon.vertices {
            v.normal = normal;
        }
        Ok(polygon)
    }

    pub fn bounding_box(&self) -> Aabb {
        let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
        let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
        for v in &self.vertices {
            mins = mins.inf(&v.pos);
            maxs = maxs.sup(&v.pos);
        }
        Aabb::new(mins, maxs)
    }

    /// True when the polygon is a triangle already.
    pub fn is_triangle(&self) -> bool {
        self.vertices.len() == 3
    }

    /// Triangulate this polygon into a list of triangles, each triangle is [v0, v1, v2].
    ///
    /// The polygon is flattened onto its own plane, ear-clipped, and lifted back to 3D.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        if self.is_triangle() {
            return vec![[self.vertices[0], self.vertices[1], self.vertices[2]]];
        }

        let (u, v) = build_orthonormal_basis(self.normal);
        let origin_3d = self.vertices[0].pos;

        let mut all_vertices_2d = Vec::with_capacity(self.vertices.len());
        for vert in &self.vertices {
            let offset = vert.pos.coords - origin_3d.coords;
            all_vertices_2d.push(coord! {x: offset.dot(&u), y: offset.dot(&v)});
        }

        let triangulation = GeoPolygon::new(LineString::new(all_vertices_2d), Vec::new())
            .earcut_triangles_raw();
        let triangle_indices = triangulation.triangle_indices;
        let vertices = triangulation.vertices;

        // Convert back into 3D triangles
        let mut triangles = Vec::with_capacity(triangle_indices.len() / 3);
        for tri_chunk in triangle_indices.chunks_exact(3) {
            let corner = |idx: usize| {
                let base = idx * 2;
                let pos_3d = origin_3d.coords + (vertices[base] * u) + (vertices[base + 1] * v);
                Vertex::new(Point3::from(pos_3d), self.normal)
            };
            triangles.push([corner(tri_chunk[0]), corner(tri_chunk[1]), corner(tri_chunk[2])]);
        }
        triangles
    }
}

/// Newell's method: robust for non-triangular and slightly non-planar loops.
fn newell_normal(vertices: &[Vertex]) -> Vector3<Real> {
    let mut normal = Vector3::zeros();
    for (current, next) in vertices.iter().zip(vertices.iter().cycle().skip(1)) {
        let (a, b) = (current.pos, next.pos);
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    if normal.norm() < tolerance() {
        Vector3::z()
    } else {
        normal.normalize()
    }
}

/// Given a normal vector `n`, build two perpendicular unit vectors `u` and `v` so that
/// {u, v, n} forms an orthonormal basis. `n` is assumed non‑zero.
pub fn build_orthonormal_basis(n: Vector3<Real>) -> (Vector3<Real>, Vector3<Real>) {
    let n = n.normalize();

    // Pick a vector that is not parallel to `n`.
    let other = if n.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };

    let u = n.cross(&other).normalize();
    let v = n.cross(&u).normalize();
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_points_is_rejected() {
        let err = Polygon::from_points(&[Point3::origin(), Point3::new(1.0, 0.0, 0.0)]);
        assert_eq!(err, Err(ValidationError::TooFewPoints(2)));
    }

    #[test]
    fn quad_triangulates_into_two_triangles() {
        let quad = Polygon::from_points(&[
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(2.0, 0.0, 1.0),
            Point3::new(2.0, 2.0, 1.0),
            Point3::new(0.0, 2.0, 1.0),
        ])
        .unwrap();
        assert!((quad.normal - Vector3::z()).norm() < 1e-9);

        let tris = quad.triangulate();
        assert_eq!(tris.len(), 2);
        for tri in &tris {
            for v in tri {
                assert!((v.pos.z - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn concave_polygon_keeps_its_area() {
        // An L-shape, area 3
        let l_shape = Polygon::from_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ])
        .unwrap();
        let area: Real = l_shape
            .triangulate()
            .iter()
            .map(|[a, b, c]| 0.5 * (b.pos - a.pos).cross(&(c.pos - a.pos)).norm())
            .sum();
        assert!((area - 3.0).abs() < 1e-9);
    }
}
