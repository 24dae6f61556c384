//! Graph algorithms over the molecule graph.

pub mod connect;
pub mod rings;

pub use connect::ComponentWalker;
pub use rings::{BondClass, RingInfo};
