//! Test support library
//! Provides a geometry provider over a few named shapes, scene shorthands and
//! floating-point helpers.

#![allow(dead_code)]

use csgtree::{
    Convexity, CsgRef, Geometry, GeometryProvider, Mesh, SceneNode, Sketch,
    float_types::{Real, parry3d::bounding_volume::Aabb},
};
use nalgebra::{Matrix4, Vector3};
use std::collections::HashMap;
use std::sync::Arc;

/// Hands out one shared `Arc` per shape name, so tests can check for sharing.
///
/// - `cube`: unit cube at the origin
/// - `sphere`: radius-1 UV sphere
/// - `square`: unit square sketch
/// - `polyhedron`: cube with unknown convexity
/// - `hull`, `minkowski`, `render`, `linear_extrude`: 2×2×2 cube
/// - anything else (e.g. `empty`): no geometry
#[derive(Debug)]
pub struct Shapes {
    shapes: HashMap<&'static str, Arc<Geometry>>,
    pub calls: usize,
}

impl Shapes {
    pub fn new() -> Self {
        let mut polyhedron = Mesh::cube(1.0);
        polyhedron.convexity = Convexity::Unknown;
        let big = Arc::new(Geometry::from(Mesh::cube(2.0)));

        let mut shapes = HashMap::new();
        shapes.insert("cube", Arc::new(Geometry::from(Mesh::cube(1.0))));
        shapes.insert("sphere", Arc::new(Geometry::from(Mesh::sphere(1.0, 16, 8))));
        shapes.insert("square", Arc::new(Geometry::from(Sketch::square(1.0))));
        shapes.insert("polyhedron", Arc::new(Geometry::from(polyhedron)));
        for name in ["hull", "minkowski", "render", "linear_extrude"] {
            shapes.insert(name, Arc::clone(&big));
        }
        Shapes { shapes, calls: 0 }
    }

    pub fn get(&self, name: &str) -> Arc<Geometry> {
        Arc::clone(&self.shapes[name])
    }
}

impl GeometryProvider for Shapes {
    fn evaluate_geometry(&mut self, node: &SceneNode) -> Option<Arc<Geometry>> {
        self.calls += 1;
        self.shapes.get(node.name()).cloned()
    }
}

pub fn translate(index: usize, x: Real, y: Real, z: Real, children: Vec<SceneNode>) -> SceneNode {
    SceneNode::transform(
        index,
        Matrix4::new_translation(&Vector3::new(x, y, z)),
        children,
    )
}

/// Routes crate logs to the test output; set `RUST_LOG=csgtree=trace` to see them.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

pub fn box_approx_eq(a: &Aabb, b: &Aabb) -> bool {
    (0..3).all(|i| approx_eq(a.mins[i], b.mins[i], 1e-9) && approx_eq(a.maxs[i], b.maxs[i], 1e-9))
}

pub fn labels(nodes: &[CsgRef]) -> Vec<String> {
    nodes.iter().map(|node| node.to_string()).collect()
}
