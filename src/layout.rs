//! Spreads split background trees out next to the main result.
//!
//! Every split tree carries a [`SplitTag`] naming its depth and its nearest real
//! ancestor. Trees are placed one row per depth level, behind the root's bounding
//! box along +Z, each scaled to the root's size. Within a row a tree gets as many
//! slots as its widest level of descendants, so a subtree's children can sit
//! underneath it without colliding with their cousins.

use crate::csg::{CsgRef, SplitTag};
use crate::float_types::{Real, parry3d::bounding_volume::Aabb, tolerance};
use nalgebra::{Matrix4, Point3, Vector3};
use std::collections::{BTreeMap, HashMap};

/// Parent ids at or below this value stand for the scene root; the ancestor walk
/// stops there.
pub const ROOT_SENTINEL: usize = 1;

/// The split-tree hierarchy recovered from the background list.
#[derive(Debug, Default)]
pub struct SplitHierarchy {
    nodes: HashMap<usize, CsgRef>,
    per_level: BTreeMap<usize, Vec<usize>>,
    child_count: HashMap<usize, usize>,
    family_count: HashMap<usize, HashMap<usize, usize>>,
    max_depth: usize,
}

impl SplitHierarchy {
    /// Collects every tagged node of `background`, in list order.
    ///
    /// # Panics
    /// If an ancestor chain names a split id that isn't in the list, or loops.
    /// Such metadata can only come from a broken build.
    pub fn from_nodes(background: &[CsgRef]) -> Self {
        let mut hierarchy = SplitHierarchy::default();
        let mut tags: Vec<SplitTag> = Vec::new();

        for node in background {
            let Some(tag) = node.split_tag() else {
                continue;
            };
            tracing::debug!(
                id = tag.id,
                depth = tag.depth,
                parent = tag.parent,
                child_index = tag.child_index,
                "split background tree"
            );
            hierarchy.nodes.entry(tag.id).or_insert_with(|| CsgRef::clone(node));
            hierarchy.per_level.entry(tag.depth).or_default().push(tag.id);
            tags.push(tag);
        }

        for tag in &tags {
            hierarchy.max_depth = hierarchy.max_depth.max(tag.depth);
            *hierarchy.child_count.entry(tag.parent).or_default() += 1;
            hierarchy.bump(tag.parent, tag.depth);

            // every ancestor learns it has one more descendant at this depth
            let mut steps = 0;
            let mut pindex = tag.parent;
            while pindex > ROOT_SENTINEL {
                let parent = hierarchy.tag_of(pindex);
                hierarchy.bump(parent.parent, tag.depth);
                pindex = parent.parent;
                steps += 1;
                assert!(
                    steps <= hierarchy.nodes.len(),
                    "split tree ancestor chain of {} loops",
                    tag.id
                );
            }
        }

        hierarchy
    }

    fn bump(&mut self, id: usize, depth: usize) {
        *self
            .family_count
            .entry(id)
            .or_default()
            .entry(depth)
            .or_default() += 1;
    }

    fn tag_of(&self, id: usize) -> SplitTag {
        match self.nodes.get(&id).and_then(|node| node.split_tag()) {
            Some(tag) => tag,
            None => panic!("split tree {id} is referenced as a parent but was never tagged"),
        }
    }

    /// Number of split trees whose nearest real ancestor is `id`.
    pub fn direct_children(&self, id: usize) -> usize {
        self.child_count.get(&id).copied().unwrap_or(0)
    }

    /// Number of split trees at `depth` somewhere below `id`.
    pub fn family_count(&self, id: usize, depth: usize) -> usize {
        self.family_count
            .get(&id)
            .and_then(|levels| levels.get(&depth))
            .copied()
            .unwrap_or(0)
    }

    /// Width, in slots, reserved for the tree `id`: its widest level of descendants.
    /// A tree without tagged descendants still takes one slot.
    pub fn space_needed(&self, id: usize) -> usize {
        self.family_count
            .get(&id)
            .and_then(|levels| levels.values().max().copied())
            .unwrap_or(0)
            .max(1)
    }

    /// Split ids at `depth`, in discovery order.
    pub fn level(&self, depth: usize) -> &[usize] {
        self.per_level.get(&depth).map(Vec::as_slice).unwrap_or(&[])
    }

    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Moves every split tree into its slot relative to `root_box` and returns the
    /// placed boxes, level by level.
    pub fn place(&self, root_box: &Aabb) -> Vec<Aabb> {
        let mut boxes = Vec::new();
        if root_box.mins.x > root_box.maxs.x {
            return boxes;
        }

        for depth in 1..=self.max_depth {
            let ids = self.level(depth);
            let total: usize = ids.iter().map(|&id| self.space_needed(id)).sum();
            let mut cursor = -((total / 2) as Real);
            for &id in ids {
                let node = &self.nodes[&id];
                tracing::debug!(id, space_needed = self.space_needed(id), cursor, depth, "placing split tree");
                boxes.push(move_at(node, cursor, depth as Real, root_box));
                cursor += self.space_needed(id) as Real;
            }
        }
        boxes
    }
}

/// Scales `node` to the size of `reference` and centers it at
/// `reference.center + (x * size.x, 0, y * size.z)`.
///
/// Axes on which the node is flat are left unscaled.
pub fn move_at(node: &CsgRef, x: Real, y: Real, reference: &Aabb) -> Aabb {
    let current = node.bounding_box();
    let size = current.extents();
    let ref_size = reference.extents();
    let ref_center = reference.center();

    let scale = Vector3::from_fn(|axis, _| {
        if size[axis] > tolerance() {
            ref_size[axis] / size[axis]
        } else {
            1.0
        }
    });
    let translation = Vector3::new(
        ref_center.x + x * ref_size.x,
        ref_center.y,
        ref_center.z + y * ref_size.z,
    );

    let matrix = Matrix4::new_translation(&translation)
        * Matrix4::new_nonuniform_scaling(&scale)
        * Matrix4::new_translation(&-current.center().coords);
    node.transform(&matrix);

    let placed = Aabb::new(
        Point3::from(translation - ref_size / 2.0),
        Point3::from(translation + ref_size / 2.0),
    );
    node.set_bounding_box(placed);
    placed
}

/// Lays out every split tree found in `background` and returns the placed boxes.
pub fn layout_background(root_box: &Aabb, background: &[CsgRef]) -> Vec<Aabb> {
    let hierarchy = SplitHierarchy::from_nodes(background);
    if hierarchy.is_empty() {
        return Vec::new();
    }
    hierarchy.place(root_box)
}
