//! Validation errors

use crate::float_types::Real;
use nalgebra::Point3;

/// All the input problems we might encounter while assembling scenes and geometry
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (DuplicateIndex) Two scene nodes share the same index
    #[error("(DuplicateIndex) Scene node index {0} is used more than once")]
    DuplicateIndex(usize),
    /// (TooFewPoints) A polygon has fewer than the minimal #points
    #[error("(TooFewPoints) A polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),
    /// (FaceIndexOutOfRange) A polyhedron face references a missing point
    #[error("(FaceIndexOutOfRange) Face {face} references point {index} (points.len = {len})")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        len: usize,
    },
    /// (InvalidCoordinate) The coordinate has a NaN or infinite
    #[error("(InvalidCoordinate) The coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point3<Real>),
}
