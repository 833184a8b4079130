//! Coefficient data: the generated Daubechies table and bundled reference values.

pub mod daubechies;
pub mod reference;

pub use daubechies::*;
pub use reference::*;
