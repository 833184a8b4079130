//! Interior linear system of the two-scale relation.

pub mod builder;

pub use builder::*;
