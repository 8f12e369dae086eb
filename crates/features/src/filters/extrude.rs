//! # Extrude Geometry Filter
//!
//! Selected for styles carrying an extrusion symbol. Extruded wall and roof
//! generation is not implemented yet, so the stage produces no node and the
//! compilation result is empty.

use crate::context::FilterContext;
use crate::error::Result;
use crate::feature::FeatureList;
use crate::filters::{FeatureFilter, GeometryFilter};
use crate::node::Node;
use crate::style::Style;

/// Extrusion strategy placeholder
pub struct ExtrudeGeometryFilter<'a> {
    style: &'a Style,
}

impl<'a> ExtrudeGeometryFilter<'a> {
    pub fn new(style: &'a Style) -> Self {
        Self { style }
    }
}

impl FeatureFilter for ExtrudeGeometryFilter<'_> {
    fn push(&mut self, features: &mut FeatureList, cx: FilterContext) -> Result<FilterContext> {
        tracing::debug!(
            "Extrusion requested for {} features with style '{}' (height {}); no geometry built",
            features.len(),
            self.style.name(),
            self.style.extrusion().map_or(0.0, |e| e.height)
        );
        Ok(cx)
    }
}

impl GeometryFilter for ExtrudeGeometryFilter<'_> {
    fn take_node(&mut self) -> Option<Node> {
        None
    }
}
