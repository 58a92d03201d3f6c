//! The binary CSG evaluation tree.

pub mod node;
pub mod operator;

pub use node::{CsgKind, CsgLeaf, CsgNode, CsgOperation, CsgRef, SplitTag, transform_aabb};
pub use operator::CsgOperator;
