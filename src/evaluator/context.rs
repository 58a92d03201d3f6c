//! Per-build working state.

use crate::csg::CsgRef;
use crate::evaluator::combine::Extracted;
use crate::float_types::Real;
use crate::scene::{Rgba, SceneNode};
use crate::selection::Selection;
use nalgebra::Matrix4;
use std::collections::HashMap;

/// Accumulated context pushed down the scene graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraversalState {
    pub matrix: Matrix4<Real>,
    pub color: Option<Rgba>,
}

impl Default for TraversalState {
    fn default() -> Self {
        TraversalState {
            matrix: Matrix4::identity(),
            color: None,
        }
    }
}

/// Everything one build needs and nothing that outlives it.
///
/// Stored terms and visited-children lists are consumed by the parent's fold, so
/// both maps drain as the traversal climbs back up.
#[derive(Debug)]
pub struct BuildContext<'s> {
    pub root: &'s SceneNode,
    stored_terms: HashMap<usize, CsgRef>,
    visited_children: HashMap<usize, Vec<&'s SceneNode>>,
    pub extracted: Extracted,
    pub selection: Selection,
}

impl<'s> BuildContext<'s> {
    pub fn new(root: &'s SceneNode) -> Self {
        BuildContext {
            root,
            stored_terms: HashMap::new(),
            visited_children: HashMap::new(),
            extracted: Extracted::default(),
            selection: Selection::new(),
        }
    }

    pub fn store(&mut self, index: usize, term: Option<CsgRef>) {
        match term {
            Some(term) => {
                self.stored_terms.insert(index, term);
            },
            None => {
                self.stored_terms.remove(&index);
            },
        }
    }

    pub fn take_term(&mut self, index: usize) -> Option<CsgRef> {
        self.stored_terms.remove(&index)
    }

    /// Children of `index` that finished, in visiting order.
    pub fn take_visited(&mut self, index: usize) -> Vec<&'s SceneNode> {
        self.visited_children.remove(&index).unwrap_or_default()
    }

    /// Drops whatever the children of `index` produced.
    pub fn discard_children(&mut self, index: usize) {
        for child in self.take_visited(index) {
            self.stored_terms.remove(&child.index);
        }
    }

    /// Records `node` as a finished child of `parent`. Called for every node, whether
    /// or not it produced anything.
    pub fn add_to_parent(&mut self, node: &'s SceneNode, parent: Option<&'s SceneNode>) {
        self.visited_children.remove(&node.index);
        if let Some(parent) = parent {
            self.visited_children
                .entry(parent.index)
                .or_default()
                .push(node);
        }
    }

    /// What outlives the build: extracted subtrees and the selection.
    pub fn into_products(self) -> (Extracted, Selection) {
        (self.extracted, self.selection)
    }

    /// True once every transient entry has been consumed, except the root's own term.
    pub fn is_drained(&self) -> bool {
        self.visited_children.is_empty()
            && self.stored_terms.keys().all(|&index| index == self.root.index)
    }
}
