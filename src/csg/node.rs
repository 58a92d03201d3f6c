//! `CsgNode`: leaves and binary operations of the evaluation tree.
//!
//! Nodes are reference counted. The same subtree is routinely held by the main
//! result, the highlight/background lists and the selection at once, so everything
//! that changes after construction (flags, leaf matrices, cached boxes) sits in a
//! `Cell` and is only touched through the setters below.

use crate::csg::CsgOperator;
use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::geometry::{Convexity, Geometry};
use crate::scene::Rgba;
use nalgebra::{Matrix4, Point3, Vector3};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Shared handle to a node.
pub type CsgRef = Rc<CsgNode>;

/// Placement metadata of a split background tree, consumed by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitTag {
    /// Index of the scene node the tree was split at
    pub id: usize,
    /// Number of real ancestors of that scene node
    pub depth: usize,
    /// Index of the nearest real ancestor
    pub parent: usize,
    /// Branch position under that ancestor
    pub child_index: usize,
}

#[derive(Debug)]
pub struct CsgLeaf {
    pub geometry: Arc<Geometry>,
    matrix: Cell<Matrix4<Real>>,
    pub color: Option<Rgba>,
    /// Kind name followed by the scene-node index, e.g. `cube3`
    pub label: String,
}

impl CsgLeaf {
    pub fn matrix(&self) -> Matrix4<Real> {
        self.matrix.get()
    }

    /// Convexity hint of the wrapped mesh. Sketches carry none.
    pub fn convexity(&self) -> Option<Convexity> {
        match self.geometry.as_ref() {
            Geometry::Mesh(mesh) => Some(mesh.convexity),
            Geometry::Sketch(_) => None,
        }
    }

    /// Scene-node index encoded in the label, if any.
    pub fn object_id(&self) -> Option<usize> {
        let start = self.label.find(|c: char| c.is_ascii_digit())?;
        let digits: String = self.label[start..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }

    fn transformed_box(&self) -> Aabb {
        transform_aabb(&self.geometry.bounding_box(), &self.matrix.get())
    }
}

#[derive(Debug)]
pub struct CsgOperation {
    pub operator: CsgOperator,
    pub left: CsgRef,
    pub right: CsgRef,
}

#[derive(Debug)]
pub enum CsgKind {
    Leaf(CsgLeaf),
    Operation(CsgOperation),
}

#[derive(Debug)]
pub struct CsgNode {
    kind: CsgKind,
    background: Cell<bool>,
    highlight: Cell<bool>,
    selected: Cell<bool>,
    bounding_box: Cell<Aabb>,
    split: Cell<Option<SplitTag>>,
}

impl CsgNode {
    fn with_kind(kind: CsgKind, bounding_box: Aabb) -> CsgRef {
        Rc::new(CsgNode {
            kind,
            background: Cell::new(false),
            highlight: Cell::new(false),
            selected: Cell::new(false),
            bounding_box: Cell::new(bounding_box),
            split: Cell::new(None),
        })
    }

    pub fn leaf(
        geometry: Arc<Geometry>,
        matrix: Matrix4<Real>,
        color: Option<Rgba>,
        label: impl Into<String>,
    ) -> CsgRef {
        let leaf = CsgLeaf {
            geometry,
            matrix: Cell::new(matrix),
            color,
            label: label.into(),
        };
        let bounding_box = leaf.transformed_box();
        Self::with_kind(CsgKind::Leaf(leaf), bounding_box)
    }

    /// The box is the union of both children's boxes, computed here once.
    pub fn operation(operator: CsgOperator, left: CsgRef, right: CsgRef) -> CsgRef {
        let bounding_box = left.bounding_box().merged(&right.bounding_box());
        Self::with_kind(
            CsgKind::Operation(CsgOperation {
                operator,
                left,
                right,
            }),
            bounding_box,
        )
    }

    pub const fn kind(&self) -> &CsgKind {
        &self.kind
    }

    pub const fn as_leaf(&self) -> Option<&CsgLeaf> {
        match &self.kind {
            CsgKind::Leaf(leaf) => Some(leaf),
            CsgKind::Operation(_) => None,
        }
    }

    pub const fn as_operation(&self) -> Option<&CsgOperation> {
        match &self.kind {
            CsgKind::Operation(op) => Some(op),
            CsgKind::Leaf(_) => None,
        }
    }

    pub fn operator(&self) -> Option<CsgOperator> {
        self.as_operation().map(|op| op.operator)
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bounding_box.get()
    }

    /// Replace the cached box. Only the layout engine repositions boxes explicitly.
    pub fn set_bounding_box(&self, bounding_box: Aabb) {
        self.bounding_box.set(bounding_box);
    }

    pub fn is_background(&self) -> bool {
        self.background.get()
    }

    pub fn set_background(&self, background: bool) {
        self.background.set(background);
    }

    pub fn is_highlight(&self) -> bool {
        self.highlight.get()
    }

    pub fn set_highlight(&self, highlight: bool) {
        self.highlight.set(highlight);
    }

    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    pub fn set_selected(&self, selected: bool) {
        self.selected.set(selected);
    }

    pub fn split_tag(&self) -> Option<SplitTag> {
        self.split.get()
    }

    pub fn set_split_tag(&self, tag: Option<SplitTag>) {
        self.split.set(tag);
    }

    /// Structural copy with fresh identity: operations are cloned recursively,
    /// leaves share their geometry but get `offset` pre-applied to their matrix.
    /// Flags and split metadata are not carried over.
    pub fn clone_at(&self, offset: &Vector3<Real>) -> CsgRef {
        match &self.kind {
            CsgKind::Leaf(leaf) => CsgNode::leaf(
                Arc::clone(&leaf.geometry),
                Matrix4::new_translation(offset) * leaf.matrix(),
                leaf.color,
                leaf.label.clone(),
            ),
            CsgKind::Operation(op) => CsgNode::operation(
                op.operator,
                op.left.clone_at(offset),
                op.right.clone_at(offset),
            ),
        }
    }

    /// Pre-multiplies `matrix` onto every leaf of the subtree and refreshes the boxes
    /// along the way.
    pub fn transform(&self, matrix: &Matrix4<Real>) {
        match &self.kind {
            CsgKind::Leaf(leaf) => {
                leaf.matrix.set(matrix * leaf.matrix());
                self.bounding_box.set(leaf.transformed_box());
            },
            CsgKind::Operation(op) => {
                op.left.transform(matrix);
                op.right.transform(matrix);
                self.bounding_box
                    .set(op.left.bounding_box().merged(&op.right.bounding_box()));
            },
        }
    }

    /// Leaves in left-to-right order.
    pub fn leaves(&self) -> Vec<&CsgLeaf> {
        match &self.kind {
            CsgKind::Leaf(leaf) => vec![leaf],
            CsgKind::Operation(op) => {
                let mut leaves = op.left.leaves();
                leaves.extend(op.right.leaves());
                leaves
            },
        }
    }
}

impl fmt::Display for CsgNode {
    /// Dumps the tree, e.g. `((cube1 + sphere2) - cylinder3)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CsgKind::Leaf(leaf) => write!(f, "{}", leaf.label),
            CsgKind::Operation(op) => write!(
                f,
                "({} {} {})",
                op.left,
                op.operator.symbol(),
                op.right
            ),
        }
    }
}

/// Box of the eight transformed corners. Invalid (empty) boxes pass through.
pub fn transform_aabb(aabb: &Aabb, matrix: &Matrix4<Real>) -> Aabb {
    if aabb.mins.x > aabb.maxs.x {
        return *aabb;
    }
    let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
    let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
    for corner in aabb.vertices() {
        let p = matrix.transform_point(&corner);
        mins = mins.inf(&p);
        maxs = maxs.sup(&p);
    }
    Aabb::new(mins, maxs)
}
