//! The abstract scene graph the CSG tree is built from.
//!
//! Scene nodes are produced by a front end (parser + instantiation) and are only
//! read here. Every node carries an `index` that is unique within its tree and is
//! used as the identity key throughout a build.

pub mod ancestry;
pub mod location;

use crate::csg::CsgOperator;
use crate::errors::ValidationError;
use crate::float_types::Real;
use nalgebra::Matrix4;
use std::collections::HashSet;

pub use ancestry::{SplitPlacement, ancestor_path, real_ancestors, split_placement};
pub use location::{CursorPosition, Location};

/// Straight RGBA, each channel in `0.0..=1.0`.
pub type Rgba = [f32; 4];

/// Statement modifiers attached to a node by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Drawn ghosted for reference, kept out of the main result
    pub background: bool,
    /// Drawn emphasised, tracked separately from the main result
    pub highlight: bool,
}

/// What a scene node does. Kind decides how the tree builder treats the node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Top of the scene; folds its children with union
    Root,
    /// Plain grouping (module instances, `children()`, `move`...), folds with union
    Group,
    /// Intersection-like composite, folds with intersection
    Intersection,
    /// Explicit boolean statement
    CsgOp(CsgOperator),
    /// Applies a local matrix to its subtree
    Transform(Matrix4<Real>),
    /// Colors its subtree unless an outer color already applies
    Color(Rgba),
    /// Geometry-producing leaf (`cube`, `sphere`, `polygon`, extrusions...)
    Primitive(String),
    /// Subtree evaluated into a single geometry up front
    Render,
    /// Advanced operation evaluated monolithically (`minkowski`, `hull`, `resize`...)
    Cgaladv(String),
}

impl NodeKind {
    /// Nodes whose pieces are worth showing apart: `intersection()` statements and
    /// intersection-style composites.
    pub const fn is_intersection_like(&self) -> bool {
        matches!(
            self,
            NodeKind::Intersection | NodeKind::CsgOp(CsgOperator::Intersection)
        )
    }

    /// Kind name, as used in leaf labels.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Group => "group",
            NodeKind::Intersection => "intersection",
            NodeKind::CsgOp(op) => op.name(),
            NodeKind::Transform(_) => "transform",
            NodeKind::Color(_) => "color",
            NodeKind::Primitive(name) | NodeKind::Cgaladv(name) => name.as_str(),
            NodeKind::Render => "render",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub index: usize,
    pub kind: NodeKind,
    /// Name of the module instantiation that created the node (`"children"`, `"move"`, ...)
    pub instance_name: String,
    pub children: Vec<SceneNode>,
    pub modifiers: Modifiers,
    pub location: Option<Location>,
}

impl SceneNode {
    pub fn new(index: usize, kind: NodeKind) -> Self {
        let instance_name = kind.name().to_string();
        SceneNode {
            index,
            kind,
            instance_name,
            children: Vec::new(),
            modifiers: Modifiers::default(),
            location: None,
        }
    }

    pub fn root(index: usize, children: Vec<SceneNode>) -> Self {
        Self::new(index, NodeKind::Root).with_children(children)
    }

    pub fn group(index: usize, children: Vec<SceneNode>) -> Self {
        Self::new(index, NodeKind::Group).with_children(children)
    }

    pub fn intersection(index: usize, children: Vec<SceneNode>) -> Self {
        Self::new(index, NodeKind::Intersection).with_children(children)
    }

    pub fn csg_op(index: usize, op: CsgOperator, children: Vec<SceneNode>) -> Self {
        Self::new(index, NodeKind::CsgOp(op)).with_children(children)
    }

    pub fn transform(index: usize, matrix: Matrix4<Real>, children: Vec<SceneNode>) -> Self {
        Self::new(index, NodeKind::Transform(matrix)).with_children(children)
    }

    pub fn color(index: usize, color: Rgba, children: Vec<SceneNode>) -> Self {
        Self::new(index, NodeKind::Color(color)).with_children(children)
    }

    pub fn primitive(index: usize, name: impl Into<String>) -> Self {
        Self::new(index, NodeKind::Primitive(name.into()))
    }

    pub fn render(index: usize, children: Vec<SceneNode>) -> Self {
        Self::new(index, NodeKind::Render).with_children(children)
    }

    pub fn cgaladv(index: usize, name: impl Into<String>, children: Vec<SceneNode>) -> Self {
        Self::new(index, NodeKind::Cgaladv(name.into())).with_children(children)
    }

    pub fn with_children(mut self, children: Vec<SceneNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = name.into();
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// `%` modifier
    pub fn background(mut self) -> Self {
        self.modifiers.background = true;
        self
    }

    /// `#` modifier
    pub fn highlight(mut self) -> Self {
        self.modifiers.highlight = true;
        self
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// True if the cursor lies inside this node's source span.
    pub fn spans(&self, cursor: Option<CursorPosition>) -> bool {
        match (self.location, cursor) {
            (Some(location), Some(cursor)) => location.contains(cursor),
            _ => false,
        }
    }

    /// Nodes that don't count as a level when placing split background trees: a
    /// transform or color wrapping fewer than two children, and the `children` /
    /// `move` pass-through groups.
    pub fn is_transparent_wrapper(&self) -> bool {
        match self.kind {
            NodeKind::Transform(_) | NodeKind::Color(_) => self.children.len() < 2,
            NodeKind::Group => matches!(self.instance_name.as_str(), "children" | "move"),
            _ => false,
        }
    }

    /// Checks that every index in the tree is unique.
    pub fn validate(&self) -> Result<(), ValidationError> {
        fn walk(node: &SceneNode, seen: &mut HashSet<usize>) -> Result<(), ValidationError> {
            if !seen.insert(node.index) {
                return Err(ValidationError::DuplicateIndex(node.index));
            }
            node.children.iter().try_for_each(|child| walk(child, seen))
        }
        walk(self, &mut HashSet::new())
    }
}
