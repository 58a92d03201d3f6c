mod support;

use csgtree::{
    Convexity, CsgNode, CsgOperator, CsgRef, Geometry, Mesh, Sketch,
    csg::SplitTag,
    float_types::{PI, Real},
};
use nalgebra::{Matrix4, Vector3};
use std::rc::Rc;
use std::sync::Arc;

use crate::support::approx_eq;

fn cube_at(label: &str, x: Real, y: Real, z: Real) -> CsgRef {
    CsgNode::leaf(
        Arc::new(Geometry::from(Mesh::cube(1.0))),
        Matrix4::new_translation(&Vector3::new(x, y, z)),
        Some([0.5, 0.5, 0.5, 1.0]),
        label,
    )
}

#[test]
fn display_dumps_the_tree() {
    let tree = CsgNode::operation(
        CsgOperator::Difference,
        CsgNode::operation(
            CsgOperator::Union,
            cube_at("cube1", 0.0, 0.0, 0.0),
            cube_at("sphere2", 0.0, 0.0, 0.0),
        ),
        CsgNode::operation(
            CsgOperator::Intersection,
            cube_at("cylinder3", 0.0, 0.0, 0.0),
            cube_at("cube4", 0.0, 0.0, 0.0),
        ),
    );
    assert_eq!(tree.to_string(), "((cube1 + sphere2) - (cylinder3 * cube4))");
}

#[test]
fn operation_box_covers_both_operands() {
    let tree = CsgNode::operation(
        CsgOperator::Intersection,
        cube_at("cube1", 0.0, 0.0, 0.0),
        cube_at("cube2", 3.0, -1.0, 0.5),
    );
    let bb = tree.bounding_box();
    assert!(approx_eq(bb.mins.y, -1.0, 1e-9));
    assert!(approx_eq(bb.maxs.x, 4.0, 1e-9));
    assert!(approx_eq(bb.maxs.z, 1.5, 1e-9));
}

#[test]
fn rotated_leaf_box_covers_all_corners() {
    let leaf = CsgNode::leaf(
        Arc::new(Geometry::from(Mesh::cube(1.0))),
        Matrix4::from_axis_angle(&Vector3::z_axis(), PI / 4.0),
        None,
        "cube1",
    );
    let half_diagonal = (2.0 as Real).sqrt() / 2.0;
    let bb = leaf.bounding_box();
    assert!(approx_eq(bb.mins.x, -half_diagonal, 1e-9));
    assert!(approx_eq(bb.maxs.x, half_diagonal, 1e-9));
    assert!(approx_eq(bb.mins.y, 0.0, 1e-9));
    assert!(approx_eq(bb.maxs.y, 2.0 * half_diagonal, 1e-9));
}

#[test]
fn clone_at_is_a_fresh_unflagged_copy() {
    let leaf = cube_at("cube1", 1.0, 0.0, 0.0);
    leaf.set_highlight(true);
    leaf.set_background(true);
    leaf.set_selected(true);
    leaf.set_split_tag(Some(SplitTag {
        id: 1,
        depth: 1,
        parent: 0,
        child_index: 0,
    }));

    let copy = leaf.clone_at(&Vector3::new(0.0, 2.0, 0.0));
    assert!(!Rc::ptr_eq(&leaf, &copy));
    assert!(!copy.is_highlight() && !copy.is_background() && !copy.is_selected());
    assert_eq!(copy.split_tag(), None);

    let (original, copied) = (leaf.as_leaf().unwrap(), copy.as_leaf().unwrap());
    assert!(Arc::ptr_eq(&original.geometry, &copied.geometry));
    assert_eq!(copied.label, "cube1");
    assert_eq!(copied.color, original.color);
    assert!(approx_eq(copied.matrix()[(0, 3)], 1.0, 1e-9));
    assert!(approx_eq(copied.matrix()[(1, 3)], 2.0, 1e-9));
    assert!(approx_eq(copy.bounding_box().mins.y, 2.0, 1e-9));
    // original untouched
    assert!(approx_eq(original.matrix()[(1, 3)], 0.0, 1e-9));
}

#[test]
fn clone_at_copies_operations_deeply() {
    let left = cube_at("cube1", 0.0, 0.0, 0.0);
    let tree = CsgNode::operation(CsgOperator::Difference, Rc::clone(&left), cube_at("cube2", 0.5, 0.0, 0.0));
    let copy = tree.clone_at(&Vector3::zeros());

    assert_eq!(copy.to_string(), tree.to_string());
    assert_eq!(copy.operator(), Some(CsgOperator::Difference));
    assert!(!Rc::ptr_eq(&copy.as_operation().unwrap().left, &left));

    copy.transform(&Matrix4::new_translation(&Vector3::new(0.0, 0.0, 10.0)));
    assert!(approx_eq(left.bounding_box().mins.z, 0.0, 1e-9));
    assert!(approx_eq(copy.bounding_box().mins.z, 10.0, 1e-9));
}

#[test]
fn transform_moves_every_leaf_and_refreshes_boxes() {
    let tree = CsgNode::operation(
        CsgOperator::Union,
        cube_at("cube1", 0.0, 0.0, 0.0),
        cube_at("cube2", 2.0, 0.0, 0.0),
    );
    tree.transform(&Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0)));

    let bb = tree.bounding_box();
    assert!(approx_eq(bb.maxs.x, 6.0, 1e-9));
    let right = &tree.as_operation().unwrap().right;
    assert!(approx_eq(right.bounding_box().mins.x, 4.0, 1e-9));
    assert!(approx_eq(right.as_leaf().unwrap().matrix()[(0, 3)], 4.0, 1e-9));
}

#[test]
fn object_id_comes_from_the_label() {
    let id = |label: &str| cube_at(label, 0.0, 0.0, 0.0).as_leaf().unwrap().object_id();
    assert_eq!(id("cube12"), Some(12));
    assert_eq!(id("linear_extrude7"), Some(7));
    assert_eq!(id("hull"), None);
}

#[test]
fn leaves_are_left_to_right() {
    let tree = CsgNode::operation(
        CsgOperator::Union,
        cube_at("a1", 0.0, 0.0, 0.0),
        CsgNode::operation(
            CsgOperator::Difference,
            cube_at("b2", 0.0, 0.0, 0.0),
            cube_at("c3", 0.0, 0.0, 0.0),
        ),
    );
    let labels: Vec<&str> = tree.leaves().into_iter().map(|leaf| leaf.label.as_str()).collect();
    assert_eq!(labels, ["a1", "b2", "c3"]);
}

#[test]
fn leaves_pass_the_convexity_hint_through() {
    let cube = cube_at("cube1", 0.0, 0.0, 0.0);
    assert_eq!(cube.as_leaf().unwrap().convexity(), Some(Convexity::Convex));

    let points = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.5, 0.5, 1.0],
    ];
    let faces = [
        vec![0, 3, 2, 1],
        vec![0, 1, 4],
        vec![1, 2, 4],
        vec![2, 3, 4],
        vec![3, 0, 4],
    ];
    let pyramid = Arc::new(Geometry::from(Mesh::polyhedron(&points, &faces).unwrap()));
    let leaf = CsgNode::leaf(
        Geometry::prepare_for_render(&pyramid),
        Matrix4::identity(),
        None,
        "polyhedron2",
    );
    let leaf = leaf.as_leaf().unwrap();
    assert!(matches!(leaf.geometry.as_ref(), Geometry::Mesh(mesh) if mesh.is_triangulated()));
    assert_eq!(leaf.convexity(), Some(Convexity::Unknown));

    let square = CsgNode::leaf(
        Arc::new(Geometry::from(Sketch::square(1.0))),
        Matrix4::identity(),
        None,
        "square3",
    );
    assert_eq!(square.as_leaf().unwrap().convexity(), None);
}
