//! Builds the merged property graph from definition sources and resolves it
//! into a set of fully evaluated constants.

pub mod builder;
pub mod cycle_detect;
pub mod dep_graph;
pub mod error;
pub mod expr;
pub mod graph;
pub mod resolver;

pub use builder::{build, MAX_INCLUDE_DEPTH};
pub use error::{BuildError, ResolveError};
pub use graph::PropertyGraph;
pub use resolver::{resolve, ResolvedProperty, ResolvedPropertySet};
