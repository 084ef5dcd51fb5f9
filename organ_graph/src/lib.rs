//! # Organ Graph
//!
//! The data layer of the growth simulator. A plant is a tree of typed organs
//! (seed, stems, roots) stored in an append-only directed graph. This crate
//! owns the organ types and the graph store and knows nothing about how a
//! plant grows; the production rules live in `growth_engine`.
//!
//! ## Core Components
//!
//! - **organs**: Organ identifiers, kinds and node records
//! - **graph**: The `GrowthGraph` store with ordered listing, pre-order traversal and fold
//! - **error**: Errors raised by graph operations

pub mod error;
pub mod graph;
pub mod organs;

pub use error::*;
pub use graph::*;
pub use organs::*;
