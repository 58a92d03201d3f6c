//! Concrete geometry handed to the tree builder by a [`GeometryProvider`].
//!
//! The tree builder never computes geometry itself. It only wraps what the provider
//! returns, and decides when a piece has to be tessellated before a renderer can
//! draw it.

pub mod mesh;
pub mod polygon;
pub mod sketch;
pub mod vertex;

use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::scene::SceneNode;
use std::sync::Arc;

pub use mesh::{Convexity, Mesh};
pub use sketch::Sketch;

/// Evaluated geometry of one scene node.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// Volumetric polyset
    Mesh(Mesh),
    /// Planar outline set
    Sketch(Sketch),
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Mesh(mesh) => mesh.is_empty(),
            Geometry::Sketch(sketch) => sketch.is_empty(),
        }
    }

    pub const fn dimension(&self) -> usize {
        match self {
            Geometry::Mesh(_) => 3,
            Geometry::Sketch(_) => 2,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            Geometry::Mesh(mesh) => mesh.bounding_box(),
            Geometry::Sketch(sketch) => sketch.bounding_box(),
        }
    }

    /// Returns geometry a renderer can draw as-is.
    ///
    /// 2D outlines are always tessellated. 3D meshes are re-tessellated unless they are
    /// known to be convex; an unknown convexity counts as non-convex. Whatever needs
    /// no work comes back as the same `Arc`, and the input is never modified.
    pub fn prepare_for_render(geometry: &Arc<Geometry>) -> Arc<Geometry> {
        if geometry.is_empty() {
            return Arc::clone(geometry);
        }
        match geometry.as_ref() {
            Geometry::Sketch(sketch) => Arc::new(Geometry::Mesh(sketch.tessellate())),
            Geometry::Mesh(mesh) if !mesh.convexity.is_convex() => {
                Arc::new(Geometry::Mesh(mesh.triangulate()))
            },
            Geometry::Mesh(_) => Arc::clone(geometry),
        }
    }
}

impl From<Mesh> for Geometry {
    fn from(mesh: Mesh) -> Self {
        Geometry::Mesh(mesh)
    }
}

impl From<Sketch> for Geometry {
    fn from(sketch: Sketch) -> Self {
        Geometry::Sketch(sketch)
    }
}

/// Source of concrete geometry for leaf-like scene nodes.
///
/// Returning `None` means the node has no geometry; the tree builder drops it silently.
pub trait GeometryProvider {
    fn evaluate_geometry(&mut self, node: &SceneNode) -> Option<Arc<Geometry>>;
}

impl<F> GeometryProvider for F
where
    F: FnMut(&SceneNode) -> Option<Arc<Geometry>>,
{
    fn evaluate_geometry(&mut self, node: &SceneNode) -> Option<Arc<Geometry>> {
        self(node)
    }
}
