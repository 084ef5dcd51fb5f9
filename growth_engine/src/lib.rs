//! # Growth Engine
//!
//! Grows a plant one generation at a time. Each step walks the organ graph
//! in a pre-order snapshot taken before any rule fires and applies the
//! production rule of every visited organ's kind. Organs spawned during a
//! step are left alone until the next one.
//!
//! ## Core Components
//!
//! - **rules**: The tunable constants of every production rule, loadable from TOML
//! - **engine**: The stepping engine and its per-generation reports
//! - **error**: Configuration errors
//!
//! The organ types and the graph itself come from `organ_graph` and are
//! re-exported here.

pub mod engine;
pub mod error;
pub mod rules;

pub use engine::*;
pub use error::*;
pub use rules::*;

pub use organ_graph::{GraphError, GraphSnapshot, GrowthGraph, OrganId, OrganKind, OrganNode};
