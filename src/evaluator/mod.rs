//! Builds the CSG evaluation tree from a scene graph.
//!
//! The scene is walked depth first. Transform and color nodes push their context
//! down on the way in; everything else happens on the way out, once all children
//! have produced their subtrees: leaves ask the [`GeometryProvider`] for geometry,
//! composites fold their children pairwise with [`combine`].
//!
//! Besides the main tree a build yields the highlighted and background subtrees that
//! were pulled out of it, the node under the cursor, and the placed boxes of split
//! background trees (see [`crate::layout`]).

pub mod combine;
pub mod context;

use crate::csg::{CsgNode, CsgOperator, CsgRef, SplitTag};
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::geometry::{Geometry, GeometryProvider};
use crate::layout::{ROOT_SENTINEL, layout_background};
use crate::scene::{CursorPosition, NodeKind, SceneNode, real_ancestors, split_placement};
use crate::selection::Selection;
use nalgebra::Vector3;
use std::rc::Rc;

pub use combine::{Extracted, combine};
pub use context::{BuildContext, TraversalState};

/// Turns scene graphs into CSG trees.
///
/// One evaluator runs one build at a time; the products of the last build stay
/// available until the next [`build_tree`](Self::build_tree) or [`reset`](Self::reset).
///
/// ```
/// use csgtree::{CsgTreeEvaluator, Geometry, Mesh, SceneNode};
/// use std::sync::Arc;
///
/// let scene = SceneNode::root(0, vec![SceneNode::primitive(1, "cube")]);
/// let mut evaluator =
///     CsgTreeEvaluator::new(|_: &SceneNode| Some(Arc::new(Geometry::from(Mesh::cube(1.0)))));
/// let root = evaluator.build_tree(&scene).unwrap();
/// assert_eq!(root.to_string(), "cube1");
/// ```
#[derive(Debug)]
pub struct CsgTreeEvaluator<P> {
    provider: P,
    cursor: Option<CursorPosition>,
    root_node: Option<CsgRef>,
    highlight_nodes: Vec<CsgRef>,
    background_nodes: Vec<CsgRef>,
    background_boxes: Vec<Aabb>,
    selection: Selection,
}

impl<P: GeometryProvider> CsgTreeEvaluator<P> {
    pub const fn new(provider: P) -> Self {
        CsgTreeEvaluator {
            provider,
            cursor: None,
            root_node: None,
            highlight_nodes: Vec::new(),
            background_nodes: Vec::new(),
            background_boxes: Vec::new(),
            selection: Selection::new(),
        }
    }

    /// Selects whatever the statement under `cursor` produces.
    pub const fn with_cursor(mut self, cursor: CursorPosition) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub const fn set_cursor(&mut self, cursor: CursorPosition) {
        self.cursor = Some(cursor);
    }

    pub const fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    pub const fn cursor(&self) -> Option<CursorPosition> {
        self.cursor
    }

    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Forgets every product of the previous build.
    pub fn reset(&mut self) {
        self.root_node = None;
        self.highlight_nodes.clear();
        self.background_nodes.clear();
        self.background_boxes.clear();
        self.selection.reset();
    }

    /// Builds the tree for `root`.
    ///
    /// Returns `None` when nothing in the scene produced geometry, or when the only
    /// thing produced is background (which then lands in the background list).
    pub fn build_tree(&mut self, root: &SceneNode) -> Option<CsgRef> {
        self.reset();
        debug_assert!(root.validate().is_ok(), "scene node indices must be unique");

        let mut ctx = BuildContext::new(root);
        self.traverse(&mut ctx, root, None, &TraversalState::default());

        let term = ctx.take_term(root.index);
        debug_assert!(ctx.is_drained(), "build left unconsumed terms behind");
        let (extracted, selection) = ctx.into_products();
        self.highlight_nodes = extracted.highlight;
        self.background_nodes = extracted.background;
        self.selection = selection;

        if let Some(term) = term {
            let root_box = term.bounding_box();
            if term.is_highlight() {
                self.highlight_nodes.push(Rc::clone(&term));
            }
            self.root_node = if term.is_background() {
                self.background_nodes.push(term);
                None
            } else {
                Some(term)
            };
            self.background_boxes = layout_background(&root_box, &self.background_nodes);
        }

        tracing::debug!(
            root = ?self.root_node.as_ref().map(|node| node.to_string()),
            highlights = self.highlight_nodes.len(),
            backgrounds = self.background_nodes.len(),
            placed = self.background_boxes.len(),
            selected = ?self.selection.index(),
            "built csg tree"
        );
        self.root_node.clone()
    }

    fn traverse<'s>(
        &mut self,
        ctx: &mut BuildContext<'s>,
        node: &'s SceneNode,
        parent: Option<&'s SceneNode>,
        state: &TraversalState,
    ) {
        let state = Self::enter(node, state);
        for child in &node.children {
            self.traverse(ctx, child, Some(node), &state);
        }
        self.exit(ctx, node, &state);
        ctx.add_to_parent(node, parent);
    }

    fn enter(node: &SceneNode, state: &TraversalState) -> TraversalState {
        let mut state = *state;
        match &node.kind {
            NodeKind::Transform(matrix) => state.matrix *= matrix,
            // the outermost color wins
            NodeKind::Color(color) => {
                if state.color.is_none() {
                    state.color = Some(*color);
                }
            },
            _ => {},
        }
        state
    }

    fn exit(&mut self, ctx: &mut BuildContext<'_>, node: &SceneNode, state: &TraversalState) {
        match &node.kind {
            NodeKind::Root | NodeKind::Group | NodeKind::Transform(_) | NodeKind::Color(_) => {
                self.apply_to_children(ctx, node, CsgOperator::Union, false);
            },
            NodeKind::Intersection => {
                self.apply_to_children(ctx, node, CsgOperator::Intersection, true);
            },
            NodeKind::CsgOp(op) => {
                self.apply_to_children(ctx, node, *op, node.kind.is_intersection_like());
            },
            NodeKind::Primitive(_) | NodeKind::Render => {
                let term = self.evaluate_leaf(ctx, node, state);
                ctx.discard_children(node.index);
                ctx.store(node.index, term);
            },
            NodeKind::Cgaladv(_) => {
                let term = self.evaluate_leaf(ctx, node, state);
                Self::apply_background_and_highlight(ctx, node);
                ctx.store(node.index, term);
            },
        }
    }

    /// Wraps the provider's geometry for `node` in a leaf at the current transform and
    /// color. Geometry a renderer can't draw directly is tessellated first.
    fn evaluate_leaf(
        &mut self,
        ctx: &mut BuildContext<'_>,
        node: &SceneNode,
        state: &TraversalState,
    ) -> Option<CsgRef> {
        let geometry = self.provider.evaluate_geometry(node)?;
        let leaf = CsgNode::leaf(
            Geometry::prepare_for_render(&geometry),
            state.matrix,
            state.color,
            format!("{}{}", node.name(), node.index),
        );

        let at_cursor = node.spans(self.cursor);
        if node.modifiers.highlight || at_cursor {
            leaf.set_highlight(true);
        } else if node.modifiers.background {
            leaf.set_background(true);
        }
        if at_cursor {
            ctx.selection.record(&leaf, node.index);
        }
        Some(leaf)
    }

    /// Monolithic nodes swallow their children's geometry, but background and
    /// highlighted pieces below them are still shown.
    fn apply_background_and_highlight(ctx: &mut BuildContext<'_>, node: &SceneNode) {
        for child in ctx.take_visited(node.index) {
            let Some(term) = ctx.take_term(child.index) else {
                continue;
            };
            if term.is_background() {
                ctx.extracted.background.push(Rc::clone(&term));
            }
            if term.is_highlight() {
                ctx.extracted.highlight.push(term);
            }
        }
    }

    /// Folds the children of `node` left to right with `op`.
    ///
    /// With `split` set, a union of clones of all children (background included) is
    /// tagged with the node's split placement and added to the background list, so
    /// the pieces can be laid out apart from the result.
    fn apply_to_children(
        &mut self,
        ctx: &mut BuildContext<'_>,
        node: &SceneNode,
        op: CsgOperator,
        split: bool,
    ) {
        let children = ctx.take_visited(node.index);
        tracing::trace!(index = node.index, children = children.len(), op = op.name(), "fold");

        let mut acc: Option<CsgRef> = None;
        let mut mirror: Option<CsgRef> = None;
        for child in children {
            let Some(term) = ctx.take_term(child.index) else {
                continue;
            };
            if split {
                let copy = term.clone_at(&Vector3::zeros());
                mirror = Some(match mirror.take() {
                    Some(prev) => CsgNode::operation(CsgOperator::Union, prev, copy),
                    None => copy,
                });
            }
            acc = Some(match acc.take() {
                Some(prev) => combine(op, prev, term, &mut ctx.extracted),
                None => term,
            });
        }

        let Some(result) = acc else {
            ctx.store(node.index, None);
            return;
        };

        let at_cursor = node.spans(self.cursor);
        if node.modifiers.background {
            result.set_background(true);
        }
        if node.modifiers.highlight || at_cursor {
            result.set_highlight(true);
        }
        if at_cursor {
            ctx.selection.record(&result, node.index);
        }

        if let Some(mirror) = mirror {
            Self::tag_split_tree(ctx, node, mirror);
        }
        ctx.store(node.index, Some(result));
    }

    /// Files `mirror` as the split background tree of `node`.
    ///
    /// Only nodes whose real ancestors are all intersection-like, and whose topmost real
    /// ancestor is the scene root, are filed, so the layout can always walk a split tree's
    /// ancestry.
    fn tag_split_tree(ctx: &mut BuildContext<'_>, node: &SceneNode, mirror: CsgRef) {
        let Some(placement) = split_placement(ctx.root, node.index) else {
            return;
        };
        // the topmost real ancestor is never tagged itself, so the chain has to end there
        let real = real_ancestors(ctx.root, node.index);
        let resolvable = real.first().is_some_and(|top| top.index <= ROOT_SENTINEL)
            && real
                .iter()
                .all(|a| a.index <= ROOT_SENTINEL || a.kind.is_intersection_like());
        if !resolvable {
            tracing::trace!(index = node.index, "split tree under a non-intersection ancestor, not laid out");
            return;
        }

        mirror.set_split_tag(Some(SplitTag {
            id: node.index,
            depth: placement.depth,
            parent: placement.parent,
            child_index: placement.child_index,
        }));
        ctx.extracted.background.push(mirror);
    }

    /// Main result of the last build.
    pub const fn root_node(&self) -> Option<&CsgRef> {
        self.root_node.as_ref()
    }

    pub fn highlight_nodes(&self) -> &[CsgRef] {
        &self.highlight_nodes
    }

    /// Background subtrees in the order they were found, split trees included.
    pub fn background_nodes(&self) -> &[CsgRef] {
        &self.background_nodes
    }

    /// Placed boxes of the split background trees.
    pub fn background_boxes(&self) -> &[Aabb] {
        &self.background_boxes
    }

    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    pub const fn selected(&self) -> Option<&CsgRef> {
        self.selection.node()
    }

    pub const fn selected_index(&self) -> Option<usize> {
        self.selection.index()
    }
}
