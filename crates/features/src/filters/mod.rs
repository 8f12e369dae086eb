//! # Feature Filters
//!
//! Stages of the compile pipeline. Every filter takes the working set and the
//! current [`FilterContext`] and returns the context the next stage sees;
//! geometry filters additionally hand over the node they built.
//!
//! ## Table of Contents
//! 1. FeatureFilter / GeometryFilter — stage contracts

use crate::context::FilterContext;
use crate::error::Result;
use crate::feature::FeatureList;
use crate::node::Node;

pub mod build_geometry;
pub mod extrude;
pub mod substitute_model;
pub mod transform;

pub use build_geometry::BuildGeometryFilter;
pub use extrude::ExtrudeGeometryFilter;
pub use substitute_model::SubstituteModelFilter;
pub use transform::TransformFilter;

// ============================================================================
// 1. FeatureFilter / GeometryFilter — stage contracts
// ============================================================================

/// A pipeline stage that may rewrite the working set in place.
pub trait FeatureFilter {
    fn push(&mut self, features: &mut FeatureList, cx: FilterContext) -> Result<FilterContext>;
}

/// A stage that produces a scene node from the working set.
pub trait GeometryFilter: FeatureFilter {
    /// Node built by the last `push`; `None` when nothing was generated
    fn take_node(&mut self) -> Option<Node>;
}
