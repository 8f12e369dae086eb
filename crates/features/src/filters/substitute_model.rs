//! # Substitute Model Filter
//!
//! Places one instance of the style's model at every feature location.
//! Points use each vertex; lines and polygons use the centre of their
//! bounds.
//!
//! In geocentric output without a local frame, each instance is oriented to
//! the local east-north-up axes so models stand upright on the ellipsoid.

use glam::{DMat4, DVec3};

use crate::context::FilterContext;
use crate::error::Result;
use crate::feature::{Feature, FeatureGeometry, FeatureList};
use crate::filters::{FeatureFilter, GeometryFilter};
use crate::node::{MatrixTransform, ModelRef, Node};
use crate::srs::{enu_rotation, SpatialReference};
use crate::style::{ModelSymbol, Style};

/// Model-substitution strategy
pub struct SubstituteModelFilter<'a> {
    style: &'a Style,
    node: Option<Node>,
}

impl<'a> SubstituteModelFilter<'a> {
    pub fn new(style: &'a Style) -> Self {
        Self { style, node: None }
    }
}

fn placements(feature: &Feature) -> Vec<DVec3> {
    match &feature.geometry {
        FeatureGeometry::Point(p) => vec![*p],
        FeatureGeometry::MultiPoint(pts) => pts.clone(),
        other => other.bounds_center().into_iter().collect(),
    }
}

fn instance_matrix(position: DVec3, scale: f64, srs: SpatialReference, oriented: bool) -> Result<DMat4> {
    let scale = DMat4::from_scale(DVec3::splat(scale));
    if oriented {
        let geo = srs.to_geographic(position)?;
        let rotation = DMat4::from_mat3(enu_rotation(geo.x, geo.y));
        Ok(DMat4::from_translation(position) * rotation * scale)
    } else {
        Ok(DMat4::from_translation(position) * scale)
    }
}

impl SubstituteModelFilter<'_> {
    fn build(&self, symbol: &ModelSymbol, features: &FeatureList, cx: &FilterContext) -> Result<Vec<Node>> {
        let srs = cx.profile().srs();
        let oriented = srs.is_geocentric() && !cx.has_reference_frame();
        let path = cx.session().model_path(&symbol.uri).map(|p| p.to_path_buf());
        if path.is_none() {
            tracing::warn!("Model '{}' is not in the session catalogue", symbol.uri);
        }

        let mut instances = Vec::new();
        for feature in features {
            for position in placements(feature) {
                let mut transform = MatrixTransform::new(instance_matrix(position, symbol.scale, srs, oriented)?);
                transform.add_child(Some(Node::Model(ModelRef {
                    uri: symbol.uri.clone(),
                    path: path.clone(),
                })));
                instances.push(Node::Transform(transform));
            }
        }
        Ok(instances)
    }
}

impl FeatureFilter for SubstituteModelFilter<'_> {
    fn push(&mut self, features: &mut FeatureList, cx: FilterContext) -> Result<FilterContext> {
        self.node = None;
        let Some(symbol) = self.style.model() else {
            return Ok(cx);
        };

        let instances = self.build(symbol, features, &cx)?;
        tracing::debug!("Placed {} instances of '{}'", instances.len(), symbol.uri);
        if !instances.is_empty() {
            self.node = Some(Node::Group(instances));
        }
        Ok(cx)
    }
}

impl GeometryFilter for SubstituteModelFilter<'_> {
    fn take_node(&mut self) -> Option<Node> {
        self.node.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::{FeatureProfile, GeoExtent};
    use crate::session::{MapInfo, Session};
    use std::path::Path;
    use std::sync::Arc;

    fn context(srs: SpatialReference) -> FilterContext {
        let session = Session::new(MapInfo::new(srs, srs.is_geocentric())).with_model("tree", "assets/tree.glb");
        let extent = GeoExtent::new(srs, -1.0e7, -1.0e7, 1.0e7, 1.0e7);
        FilterContext::new(Arc::new(session), FeatureProfile::new(extent))
    }

    fn style(uri: &str, scale: f64) -> Style {
        Style::new("forest").with_symbol(ModelSymbol {
            uri: uri.to_string(),
            scale,
        })
    }

    fn run(style: &Style, mut features: FeatureList, cx: FilterContext) -> Option<Node> {
        let mut filter = SubstituteModelFilter::new(style);
        filter.push(&mut features, cx).unwrap();
        filter.take_node()
    }

    #[test]
    fn test_one_instance_per_point() {
        let style = style("tree", 2.0);
        let features = vec![
            Feature::new(FeatureGeometry::Point(DVec3::new(10.0, 20.0, 0.0))),
            Feature::new(FeatureGeometry::MultiPoint(vec![DVec3::ZERO, DVec3::X])),
        ];
        let node = run(&style, features, context(SpatialReference::Mercator)).unwrap();
        assert_eq!(node.children().len(), 3);

        let first = node.children()[0].as_transform().unwrap();
        assert_eq!(first.matrix.w_axis.truncate(), DVec3::new(10.0, 20.0, 0.0));
        assert_eq!(first.matrix.x_axis.x, 2.0);
        match &first.children[0] {
            Node::Model(model) => {
                assert_eq!(model.uri, "tree");
                assert_eq!(model.path.as_deref(), Some(Path::new("assets/tree.glb")));
            }
            other => panic!("expected model, got {:?}", other),
        }
    }

    #[test]
    fn test_polygon_uses_bounds_centre() {
        let style = style("tree", 1.0);
        let outer = vec![DVec3::ZERO, DVec3::new(4.0, 0.0, 0.0), DVec3::new(4.0, 2.0, 0.0), DVec3::ZERO];
        let features = vec![Feature::new(FeatureGeometry::Polygon { outer, holes: vec![] })];
        let node = run(&style, features, context(SpatialReference::Mercator)).unwrap();
        let t = node.children()[0].as_transform().unwrap();
        assert_eq!(t.matrix.w_axis.truncate(), DVec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_unknown_model_still_places_reference() {
        let style = style("rock", 1.0);
        let features = vec![Feature::new(FeatureGeometry::Point(DVec3::ZERO))];
        let node = run(&style, features, context(SpatialReference::Mercator)).unwrap();
        let t = node.children()[0].as_transform().unwrap();
        assert_eq!(
            t.children[0],
            Node::Model(ModelRef {
                uri: "rock".to_string(),
                path: None
            })
        );
    }

    #[test]
    fn test_geocentric_instances_point_up() {
        let style = style("tree", 1.0);
        let ecef = SpatialReference::Geographic
            .transform(DVec3::new(30.0, 40.0, 0.0), &SpatialReference::Geocentric)
            .unwrap();
        let features = vec![Feature::new(FeatureGeometry::Point(ecef))];
        let node = run(&style, features, context(SpatialReference::Geocentric)).unwrap();
        let t = node.children()[0].as_transform().unwrap();

        let up = t.matrix.transform_vector3(DVec3::Z);
        let expected = enu_rotation(30.0, 40.0).z_axis;
        assert!(up.abs_diff_eq(expected, 1e-9));
    }

    #[test]
    fn test_empty_input_builds_nothing() {
        let style = style("tree", 1.0);
        assert!(run(&style, FeatureList::new(), context(SpatialReference::Mercator)).is_none());
    }
}
