//! # Extents and Feature Profiles
//!
//! ## Table of Contents
//! 1. GeoExtent — SRS-tagged bounding rectangle
//! 2. FeatureProfile — SRS + extent of a feature set

use geo::{coord, Rect};
use glam::DVec3;

use crate::error::{FeatureError, Result};
use crate::srs::SpatialReference;

/// Samples per edge when reprojecting an extent; edges of a lon/lat box are
/// curves in most other systems so corners alone under-estimate the bounds.
const EDGE_SAMPLES: usize = 8;

// ============================================================================
// 1. GeoExtent — SRS-tagged bounding rectangle
// ============================================================================

/// An axis-aligned rectangle in some spatial reference system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoExtent {
    srs: SpatialReference,
    bounds: Rect<f64>,
}

impl GeoExtent {
    /// Corners may be given in any order.
    pub fn new(srs: SpatialReference, xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            srs,
            bounds: Rect::new(coord! { x: xmin, y: ymin }, coord! { x: xmax, y: ymax }),
        }
    }

    /// Smallest extent containing every point (x/y only). `None` when empty.
    pub fn from_points<I>(srs: SpatialReference, points: I) -> Option<Self>
    where
        I: IntoIterator<Item = DVec3>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::new(srs, min.x, min.y, max.x, max.y))
    }

    pub fn srs(&self) -> SpatialReference {
        self.srs
    }

    pub fn xmin(&self) -> f64 {
        self.bounds.min().x
    }

    pub fn ymin(&self) -> f64 {
        self.bounds.min().y
    }

    pub fn xmax(&self) -> f64 {
        self.bounds.max().x
    }

    pub fn ymax(&self) -> f64 {
        self.bounds.max().y
    }

    /// East-west span in SRS units (degrees for geographic extents)
    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    pub fn center(&self) -> DVec3 {
        let c = self.bounds.center();
        DVec3::new(c.x, c.y, 0.0)
    }

    pub fn is_valid(&self) -> bool {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()
    }

    /// Re-express this extent in another SRS.
    ///
    /// The boundary is densified and every sample reprojected, so the result
    /// contains the source rectangle. Geocentric extents go through their
    /// geographic footprint first.
    pub fn transform(&self, to: &SpatialReference) -> Result<GeoExtent> {
        if !self.is_valid() {
            return Err(FeatureError::InvalidExtent(format!("{self:?}")));
        }
        if self.srs == *to {
            return Ok(*self);
        }
        if self.srs.is_geocentric() {
            return self.geocentric_footprint().transform(to);
        }

        let samples = self
            .boundary_samples()
            .map(|p| self.srs.transform(p, to))
            .collect::<Result<Vec<_>>>()?;

        GeoExtent::from_points(*to, samples)
            .ok_or_else(|| FeatureError::InvalidExtent("empty boundary".to_string()))
    }

    /// Geographic extent covering every ECEF point whose x/y falls inside
    /// this rectangle.
    ///
    /// Only x and y are stored, so the longitude span is exact (the rectangle's
    /// azimuth range around the polar axis) and latitude covers the full
    /// -90..90. Rectangles that enclose the polar axis or straddle the
    /// antimeridian cover every longitude.
    fn geocentric_footprint(&self) -> GeoExtent {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        let encloses_axis = min.x <= 0.0 && max.x >= 0.0 && min.y <= 0.0 && max.y >= 0.0;
        let straddles_antimeridian = max.x < 0.0 && min.y <= 0.0 && max.y >= 0.0;
        if encloses_axis || straddles_antimeridian {
            return GeoExtent::new(SpatialReference::Geographic, -180.0, -90.0, 180.0, 90.0);
        }

        let (west, east) = [(min.x, min.y), (min.x, max.y), (max.x, min.y), (max.x, max.y)]
            .iter()
            .map(|(x, y)| y.atan2(*x).to_degrees())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(w, e), lon| (w.min(lon), e.max(lon)));
        GeoExtent::new(SpatialReference::Geographic, west, -90.0, east, 90.0)
    }

    fn boundary_samples(&self) -> impl Iterator<Item = DVec3> + '_ {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        (0..=EDGE_SAMPLES).flat_map(move |i| {
            let t = i as f64 / EDGE_SAMPLES as f64;
            let x = min.x + (max.x - min.x) * t;
            let y = min.y + (max.y - min.y) * t;
            [
                DVec3::new(x, min.y, 0.0),
                DVec3::new(x, max.y, 0.0),
                DVec3::new(min.x, y, 0.0),
                DVec3::new(max.x, y, 0.0),
            ]
        })
    }
}

// ============================================================================
// 2. FeatureProfile — SRS + extent of a feature set
// ============================================================================

/// Describes the reference system and spatial extent of a feature set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureProfile {
    extent: GeoExtent,
}

impl FeatureProfile {
    pub fn new(extent: GeoExtent) -> Self {
        Self { extent }
    }

    pub fn srs(&self) -> SpatialReference {
        self.extent.srs()
    }

    pub fn extent(&self) -> &GeoExtent {
        &self.extent
    }
}
