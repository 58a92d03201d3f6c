//! Builds binary **Constructive Solid Geometry (CSG)** evaluation trees from modeling
//! scene graphs.
//!
//! A scene graph of primitives, transforms, colors and boolean statements goes in;
//! a tree of [`CsgNode`]s comes out, ready for a CSG renderer. Along the way the
//! builder
//! - folds every composite's children under its boolean operator,
//! - pulls background (`%`) and highlighted (`#`) subtrees out of the main result,
//! - tracks the subtree produced by the statement under the editor cursor,
//! - lays split background trees out in rows next to the result so the pieces of an
//!   intersection can be inspected one by one.
//!
//! Geometry itself is supplied by a [`GeometryProvider`]; this crate never evaluates
//! booleans on meshes.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod csg;
pub mod errors;
pub mod evaluator;
pub mod float_types;
pub mod geometry;
pub mod layout;
pub mod scene;
pub mod selection;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use csg::{CsgNode, CsgOperator, CsgRef};
pub use errors::ValidationError;
pub use evaluator::CsgTreeEvaluator;
pub use geometry::{Convexity, Geometry, GeometryProvider, Mesh, Sketch};
pub use scene::{CursorPosition, Location, NodeKind, SceneNode};
