//! Ancestor-chain queries over a scene tree.
//!
//! Split background trees are laid out by how many "real" ancestors they have, so
//! transparent wrappers (see [`SceneNode::is_transparent_wrapper`]) are skipped when
//! counting levels.

use crate::scene::SceneNode;

/// Where a split background tree sits relative to its real ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPlacement {
    /// Number of real ancestors between the node and the scene root (root included)
    pub depth: usize,
    /// Index of the nearest real ancestor
    pub parent: usize,
    /// Position, among that ancestor's children, of the branch leading to the node
    pub child_index: usize,
}

/// Path from `root` down to the node carrying `index`, both ends included.
pub fn ancestor_path(root: &SceneNode, index: usize) -> Option<Vec<&SceneNode>> {
    fn descend<'a>(node: &'a SceneNode, index: usize, path: &mut Vec<&'a SceneNode>) -> bool {
        path.push(node);
        if node.index == index {
            return true;
        }
        for child in &node.children {
            if descend(child, index, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    let mut path = Vec::new();
    descend(root, index, &mut path).then_some(path)
}

/// Ancestors of the node carrying `index` that are not transparent wrappers, root first.
/// Empty if `index` is the root or isn't in the tree.
pub fn real_ancestors(root: &SceneNode, index: usize) -> Vec<&SceneNode> {
    let Some(mut path) = ancestor_path(root, index) else {
        return Vec::new();
    };
    path.pop();
    path.retain(|node| !node.is_transparent_wrapper());
    path
}

/// Split-tree placement for the node carrying `index`, or `None` when it has no real
/// ancestor (it is the root, sits under wrappers only, or isn't in the tree).
pub fn split_placement(root: &SceneNode, index: usize) -> Option<SplitPlacement> {
    let path = ancestor_path(root, index)?;

    let mut depth = 0;
    let mut nearest: Option<(&SceneNode, &SceneNode)> = None;
    for pair in path.windows(2) {
        if !pair[0].is_transparent_wrapper() {
            depth += 1;
            nearest = Some((pair[0], pair[1]));
        }
    }

    let (parent, branch) = nearest?;
    let child_index = parent
        .children
        .iter()
        .position(|child| std::ptr::eq(child, branch))?;
    Some(SplitPlacement {
        depth,
        parent: parent.index,
        child_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csg::CsgOperator;
    use nalgebra::Matrix4;

    fn scene() -> SceneNode {
        // 0 root
        // ├── 1 cube
        // └── 2 translate
        //     └── 3 difference
        //         ├── 4 cube
        //         └── 5 children()
        //             └── 6 sphere
        SceneNode::root(
            0,
            vec![
                SceneNode::primitive(1, "cube"),
                SceneNode::transform(
                    2,
                    Matrix4::new_translation(&nalgebra::Vector3::new(1.0, 0.0, 0.0)),
                    vec![SceneNode::csg_op(
                        3,
                        CsgOperator::Difference,
                        vec![
                            SceneNode::primitive(4, "cube"),
                            SceneNode::group(5, vec![SceneNode::primitive(6, "sphere")])
                                .with_instance_name("children"),
                        ],
                    )],
                ),
            ],
        )
    }

    #[test]
    fn path_runs_root_to_node() {
        let scene = scene();
        let path: Vec<usize> = ancestor_path(&scene, 6)
            .unwrap()
            .iter()
            .map(|n| n.index)
            .collect();
        assert_eq!(path, vec![0, 2, 3, 5, 6]);
        assert!(ancestor_path(&scene, 42).is_none());
    }

    #[test]
    fn wrappers_are_not_real_ancestors() {
        let scene = scene();
        let real: Vec<usize> = real_ancestors(&scene, 6).iter().map(|n| n.index).collect();
        assert_eq!(real, vec![0, 3]);
        assert!(real_ancestors(&scene, 0).is_empty());
    }

    #[test]
    fn placement_skips_the_translate() {
        let scene = scene();
        // the difference hangs off the root through the translate: branch is child #1
        assert_eq!(
            split_placement(&scene, 3),
            Some(SplitPlacement {
                depth: 1,
                parent: 0,
                child_index: 1
            })
        );
        assert_eq!(
            split_placement(&scene, 6),
            Some(SplitPlacement {
                depth: 2,
                parent: 3,
                child_index: 1
            })
        );
        assert_eq!(split_placement(&scene, 0), None);
    }
}
