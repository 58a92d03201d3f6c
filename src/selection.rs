//! Tracks the node under the editor cursor.

use crate::csg::CsgRef;
use std::rc::Rc;

/// The produced node whose source span contains the cursor.
///
/// Matches are recorded in traversal order and the last one wins.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    node: Option<CsgRef>,
    index: Option<usize>,
}

impl Selection {
    pub const fn new() -> Self {
        Selection {
            node: None,
            index: None,
        }
    }

    /// Marks `node` selected (which also highlights it) and remembers it.
    pub fn record(&mut self, node: &CsgRef, scene_index: usize) {
        node.set_selected(true);
        node.set_highlight(true);
        self.node = Some(Rc::clone(node));
        self.index = Some(scene_index);
    }

    pub fn reset(&mut self) {
        self.node = None;
        self.index = None;
    }

    pub const fn node(&self) -> Option<&CsgRef> {
        self.node.as_ref()
    }

    /// Index of the scene node the selection came from.
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    pub const fn is_empty(&self) -> bool {
        self.node.is_none()
    }
}
