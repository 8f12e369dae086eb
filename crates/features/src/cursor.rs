//! # Feature Cursors
//!
//! Single-use sources the compiler drains into its working set.
//!
//! ## Table of Contents
//! 1. FeatureCursor — drain contract
//! 2. VecCursor — in-memory cursor
//! 3. GeoJsonCursor — GeoJSON-backed cursor
//! 4. GeoJSON geometry conversion

use geojson::{feature::Id, GeoJson, Geometry, Value};
use glam::DVec3;
use std::path::Path;

use crate::error::{FeatureError, Result};
use crate::extent::{FeatureProfile, GeoExtent};
use crate::feature::{feature_bounds, Feature, FeatureGeometry, FeatureList, PolygonRings};
use crate::srs::SpatialReference;

// ============================================================================
// 1. FeatureCursor — drain contract
// ============================================================================

/// A forward-only source of features.
pub trait FeatureCursor {
    /// Next feature, or `None` once exhausted
    fn next_feature(&mut self) -> Option<Feature>;

    /// Drain every remaining feature into `features`, preserving order
    fn fill(&mut self, features: &mut FeatureList) {
        while let Some(feature) = self.next_feature() {
            features.push(feature);
        }
    }
}

// ============================================================================
// 2. VecCursor — in-memory cursor
// ============================================================================

/// Cursor over an owned list of features
#[derive(Debug)]
pub struct VecCursor {
    features: std::vec::IntoIter<Feature>,
}

impl VecCursor {
    pub fn new(features: FeatureList) -> Self {
        Self {
            features: features.into_iter(),
        }
    }

    /// Features not yet yielded
    pub fn remaining(&self) -> usize {
        self.features.len()
    }
}

impl FeatureCursor for VecCursor {
    fn next_feature(&mut self) -> Option<Feature> {
        self.features.next()
    }

    fn fill(&mut self, features: &mut FeatureList) {
        features.extend(self.features.by_ref());
    }
}

impl From<FeatureList> for VecCursor {
    fn from(features: FeatureList) -> Self {
        Self::new(features)
    }
}

// ============================================================================
// 3. GeoJsonCursor — GeoJSON-backed cursor
// ============================================================================

/// Cursor over the features of a GeoJSON document, in geographic coordinates
/// (lon, lat, altitude).
#[derive(Debug)]
pub struct GeoJsonCursor {
    inner: VecCursor,
    profile: Option<FeatureProfile>,
}

impl GeoJsonCursor {
    /// Read and parse a GeoJSON file
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FeatureError::Io(path.to_path_buf(), e))?;
        let cursor = Self::from_geojson_str(&content)?;
        tracing::info!(
            "Read {} features from {}",
            cursor.inner.remaining(),
            path.display()
        );
        Ok(cursor)
    }

    /// Parse GeoJSON text. Features without geometry are skipped.
    pub fn from_geojson_str(content: &str) -> Result<Self> {
        let geojson: GeoJson = content.parse()?;

        let features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(f) => vec![f],
            GeoJson::Geometry(g) => vec![geojson::Feature {
                bbox: None,
                geometry: Some(g),
                id: None,
                properties: None,
                foreign_members: None,
            }],
        };

        let mut list = FeatureList::with_capacity(features.len());
        for feature in features {
            let Some(geometry) = feature.geometry.as_ref() else {
                continue;
            };
            let Some(geometry) = convert_geometry(geometry)? else {
                continue;
            };
            list.push(Feature {
                id: feature.id.map(|id| match id {
                    Id::String(s) => s,
                    Id::Number(n) => n.to_string(),
                }),
                geometry,
                attributes: feature.properties.unwrap_or_default(),
            });
        }

        let profile = feature_bounds(&list).map(|(min, max)| {
            FeatureProfile::new(GeoExtent::new(
                SpatialReference::Geographic,
                min.x,
                min.y,
                max.x,
                max.y,
            ))
        });

        Ok(Self {
            inner: VecCursor::new(list),
            profile,
        })
    }

    /// Geographic profile bounding every feature; `None` for an empty document
    pub fn profile(&self) -> Option<FeatureProfile> {
        self.profile
    }

    pub fn remaining(&self) -> usize {
        self.inner.remaining()
    }
}

impl FeatureCursor for GeoJsonCursor {
    fn next_feature(&mut self) -> Option<Feature> {
        self.inner.next_feature()
    }

    fn fill(&mut self, features: &mut FeatureList) {
        self.inner.fill(features)
    }
}

// ============================================================================
// 4. GeoJSON geometry conversion
// ============================================================================

fn position(coord: &[f64]) -> Result<DVec3> {
    match coord {
        [lon, lat] => Ok(DVec3::new(*lon, *lat, 0.0)),
        [lon, lat, alt, ..] => Ok(DVec3::new(*lon, *lat, *alt)),
        _ => Err(FeatureError::GeoJson(format!(
            "position needs at least two ordinates, got {}",
            coord.len()
        ))),
    }
}

fn positions(coords: &[Vec<f64>]) -> Result<Vec<DVec3>> {
    coords.iter().map(|c| position(c)).collect()
}

fn rings(rings: &[Vec<Vec<f64>>]) -> Result<Option<PolygonRings>> {
    let Some((outer, holes)) = rings.split_first() else {
        return Ok(None);
    };
    Ok(Some(PolygonRings {
        outer: positions(outer)?,
        holes: holes.iter().map(|r| positions(r)).collect::<Result<_>>()?,
    }))
}

/// Convert a GeoJSON geometry. Collections contribute their first member.
fn convert_geometry(geometry: &Geometry) -> Result<Option<FeatureGeometry>> {
    let converted = match &geometry.value {
        Value::Point(coord) => FeatureGeometry::Point(position(coord)?),
        Value::MultiPoint(coords) => FeatureGeometry::MultiPoint(positions(coords)?),
        Value::LineString(coords) => FeatureGeometry::LineString(positions(coords)?),
        Value::MultiLineString(lines) => FeatureGeometry::MultiLineString(
            lines.iter().map(|l| positions(l)).collect::<Result<_>>()?,
        ),
        Value::Polygon(polygon) => match rings(polygon)? {
            Some(PolygonRings { outer, holes }) => FeatureGeometry::Polygon { outer, holes },
            None => return Ok(None),
        },
        Value::MultiPolygon(polys) => {
            let mut parts = Vec::with_capacity(polys.len());
            for polygon in polys {
                parts.extend(rings(polygon)?);
            }
            FeatureGeometry::MultiPolygon(parts)
        }
        Value::GeometryCollection(geoms) => {
            tracing::debug!("Flattening geometry collection of {} members", geoms.len());
            return match geoms.first() {
                Some(first) => convert_geometry(first),
                None => Ok(None),
            };
        }
    };
    Ok(Some(converted))
}
