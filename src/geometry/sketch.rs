//! `Sketch`: planar 2D geometry backed by `geo`, living in the z = 0 plane.

use crate::float_types::{Real, TAU, parry3d::bounding_volume::Aabb};
use crate::geometry::mesh::{Convexity, Mesh};
use crate::geometry::{polygon::Polygon, vertex::Vertex};
use geo::{BoundingRect, LineString, MultiPolygon, Polygon as GeoPolygon, TriangulateEarcut};
use nalgebra::{Point3, Vector3};

#[derive(Clone, Debug, PartialEq)]
pub struct Sketch {
    pub geometry: MultiPolygon<Real>,
}

impl Default for Sketch {
    fn default() -> Self {
        Sketch::new(MultiPolygon::new(vec![]))
    }
}

impl Sketch {
    pub const fn new(geometry: MultiPolygon<Real>) -> Self {
        Sketch { geometry }
    }

    /// Single outline without holes, given as `[x, y]` pairs.
    pub fn polygon(points: &[[Real; 2]]) -> Self {
        let exterior: LineString<Real> = points.iter().map(|&[x, y]| (x, y)).collect();
        Sketch::new(MultiPolygon::new(vec![GeoPolygon::new(exterior, vec![])]))
    }

    pub fn rectangle(width: Real, length: Real) -> Self {
        Self::polygon(&[[0.0, 0.0], [width, 0.0], [width, length], [0.0, length]])
    }

    pub fn square(width: Real) -> Self {
        Self::rectangle(width, width)
    }

    pub fn circle(radius: Real, segments: usize) -> Self {
        let segments = segments.max(3);
        let points: Vec<[Real; 2]> = (0..segments)
            .map(|i| {
                let theta = i as Real / segments as Real * TAU;
                [radius * theta.cos(), radius * theta.sin()]
            })
            .collect();
        Self::polygon(&points)
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.0.is_empty()
    }

    /// Flat box at z = 0, or an invalid box when there's nothing to bound.
    pub fn bounding_box(&self) -> Aabb {
        match self.geometry.bounding_rect() {
            Some(rect) => Aabb::new(
                Point3::new(rect.min().x, rect.min().y, 0.0),
                Point3::new(rect.max().x, rect.max().y, 0.0),
            ),
            None => Aabb::new_invalid(),
        }
    }

    /// Ear-cut every polygon (holes included) into triangles facing +Z.
    ///
    /// Renderers can't fill concave outlines directly, so this is the only form
    /// a sketch is ever drawn in.
    pub fn tessellate(&self) -> Mesh {
        let mut polygons = Vec::new();
        for polygon in &self.geometry {
            let triangulation = polygon.earcut_triangles_raw();
            let vertices = triangulation.vertices;
            for tri in triangulation.triangle_indices.chunks_exact(3) {
                let corner = |idx: usize| {
                    Vertex::new(
                        Point3::new(vertices[2 * idx], vertices[2 * idx + 1], 0.0),
                        Vector3::z(),
                    )
                };
                if let Ok(triangle) =
                    Polygon::new(vec![corner(tri[0]), corner(tri[1]), corner(tri[2])])
                {
                    polygons.push(triangle);
                }
            }
        }

        // a triangle soup is trivially drawable, each piece is convex
        Mesh::from_polygons(&polygons, Convexity::Convex)
    }
}
