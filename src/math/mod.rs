//! Mathematical utilities: polynomial roots and dense least squares.

pub mod linalg;
pub mod poly;

pub use linalg::*;
pub use poly::*;
