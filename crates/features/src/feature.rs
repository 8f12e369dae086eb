//! # Features
//!
//! Geometry-bearing records the compiler works on. Coordinates are kept as
//! `f64` triples in whatever SRS the owning [`crate::extent::FeatureProfile`]
//! names; stages rewrite them in place.
//!
//! ## Table of Contents
//! 1. Feature — geometry + attributes
//! 2. FeatureGeometry — geometry variants
//! 3. Coordinate visitors

use glam::DVec3;
use serde_json::{Map, Value};

/// Ordered, fully materialized working set
pub type FeatureList = Vec<Feature>;

// ============================================================================
// 1. Feature — geometry + attributes
// ============================================================================

/// A vector feature with geometry and attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Source identifier, if the data source provides one
    pub id: Option<String>,
    /// Geometry in the working set's current SRS
    pub geometry: FeatureGeometry,
    /// Attribute table
    pub attributes: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: FeatureGeometry) -> Self {
        Self {
            id: None,
            geometry,
            attributes: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// "name" attribute, checked in the casings data sources commonly use
    pub fn name(&self) -> Option<&str> {
        ["name", "Name", "NAME"]
            .iter()
            .find_map(|key| self.attributes.get(*key))
            .and_then(Value::as_str)
    }
}

// ============================================================================
// 2. FeatureGeometry — geometry variants
// ============================================================================

/// Geometry variants. Polygon rings are stored open or closed as the source
/// provided them.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    /// Single point
    Point(DVec3),
    /// Multiple points
    MultiPoint(Vec<DVec3>),
    /// Polyline (ordered vertices)
    LineString(Vec<DVec3>),
    /// Multiple polylines
    MultiLineString(Vec<Vec<DVec3>>),
    /// Polygon (outer ring + optional holes)
    Polygon {
        outer: Vec<DVec3>,
        holes: Vec<Vec<DVec3>>,
    },
    /// Multiple polygons
    MultiPolygon(Vec<PolygonRings>),
}

/// A polygon with outer ring and optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRings {
    pub outer: Vec<DVec3>,
    pub holes: Vec<Vec<DVec3>>,
}

impl FeatureGeometry {
    pub fn is_point(&self) -> bool {
        matches!(self, FeatureGeometry::Point(_) | FeatureGeometry::MultiPoint(_))
    }

    pub fn is_line(&self) -> bool {
        matches!(self, FeatureGeometry::LineString(_) | FeatureGeometry::MultiLineString(_))
    }

    pub fn is_polygon(&self) -> bool {
        matches!(self, FeatureGeometry::Polygon { .. } | FeatureGeometry::MultiPolygon(_))
    }

    /// Total vertex count across all parts
    pub fn num_coords(&self) -> usize {
        let mut count = 0;
        self.for_each_coord(|_| count += 1);
        count
    }

    /// Centre of the vertex bounding box; `None` for empty geometry
    pub fn bounds_center(&self) -> Option<DVec3> {
        bounds_of(std::iter::once(self)).map(|(min, max)| (min + max) * 0.5)
    }

    // ========================================================================
    // 3. Coordinate visitors
    // ========================================================================

    /// Visit every vertex in storage order
    pub fn for_each_coord(&self, mut f: impl FnMut(DVec3)) {
        match self {
            FeatureGeometry::Point(p) => f(*p),
            FeatureGeometry::MultiPoint(pts) | FeatureGeometry::LineString(pts) => {
                pts.iter().copied().for_each(f)
            }
            FeatureGeometry::MultiLineString(lines) => lines.iter().flatten().copied().for_each(f),
            FeatureGeometry::Polygon { outer, holes } => outer
                .iter()
                .chain(holes.iter().flatten())
                .copied()
                .for_each(f),
            FeatureGeometry::MultiPolygon(polys) => polys
                .iter()
                .flat_map(|p| p.outer.iter().chain(p.holes.iter().flatten()))
                .copied()
                .for_each(f),
        }
    }

    /// Rewrite every vertex in place
    pub fn for_each_coord_mut(&mut self, mut f: impl FnMut(&mut DVec3)) {
        // Infallible wrapper over the fallible visitor
        let _ = self.try_for_each_coord_mut(|c| {
            f(c);
            Ok::<(), std::convert::Infallible>(())
        });
    }

    /// Rewrite every vertex in place, stopping at the first error
    pub fn try_for_each_coord_mut<E, F>(&mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&mut DVec3) -> Result<(), E>,
    {
        match self {
            FeatureGeometry::Point(p) => f(p),
            FeatureGeometry::MultiPoint(pts) | FeatureGeometry::LineString(pts) => {
                pts.iter_mut().try_for_each(&mut f)
            }
            FeatureGeometry::MultiLineString(lines) => {
                lines.iter_mut().flatten().try_for_each(&mut f)
            }
            FeatureGeometry::Polygon { outer, holes } => outer
                .iter_mut()
                .chain(holes.iter_mut().flatten())
                .try_for_each(&mut f),
            FeatureGeometry::MultiPolygon(polys) => polys
                .iter_mut()
                .flat_map(|p| p.outer.iter_mut().chain(p.holes.iter_mut().flatten()))
                .try_for_each(&mut f),
        }
    }
}

/// Component-wise (min, max) over every vertex of every geometry
pub fn bounds_of<'a, I>(geometries: I) -> Option<(DVec3, DVec3)>
where
    I: IntoIterator<Item = &'a FeatureGeometry>,
{
    let mut bounds: Option<(DVec3, DVec3)> = None;
    for geometry in geometries {
        geometry.for_each_coord(|c| {
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(c), max.max(c)),
                None => (c, c),
            });
        });
    }
    bounds
}

/// Bounds of a whole working set
pub fn feature_bounds(features: &[Feature]) -> Option<(DVec3, DVec3)> {
    bounds_of(features.iter().map(|f| &f.geometry))
}
