//! # Transform Filter
//!
//! Reprojects the working set into the destination SRS and optionally
//! localizes it into a tangent frame centred on the data.
//!
//! ## Order of operations
//! ```text
//! local (incoming frame) ─► world ─► reproject ─► bounds ─► localize
//! ```
//!
//! ## Table of Contents
//! 1. TransformFilter
//! 2. Localization frame

use glam::DVec3;

use crate::context::{FilterContext, ReferenceFrame};
use crate::error::{FeatureError, Result};
use crate::extent::{FeatureProfile, GeoExtent};
use crate::feature::{feature_bounds, FeatureList};
use crate::filters::FeatureFilter;
use crate::srs::{enu_rotation, SpatialReference};

// ============================================================================
// 1. TransformFilter
// ============================================================================

/// Reprojection stage.
#[derive(Debug, Clone)]
pub struct TransformFilter {
    dest: SpatialReference,
    make_geocentric: bool,
    localize: bool,
}

impl TransformFilter {
    /// `make_geocentric` builds output in ECEF even when `dest` is a
    /// geographic or projected map SRS.
    pub fn new(dest: SpatialReference, make_geocentric: bool) -> Self {
        Self {
            dest,
            make_geocentric,
            localize: false,
        }
    }

    pub fn with_localize(mut self, localize: bool) -> Self {
        self.localize = localize;
        self
    }

    pub fn set_localize_coordinates(&mut self, localize: bool) {
        self.localize = localize;
    }

    pub fn localize_coordinates(&self) -> bool {
        self.localize
    }

    /// SRS the working set is expressed in after `push`
    pub fn output_srs(&self) -> SpatialReference {
        if self.make_geocentric {
            SpatialReference::Geocentric
        } else {
            self.dest
        }
    }
}

impl FeatureFilter for TransformFilter {
    fn push(&mut self, features: &mut FeatureList, cx: FilterContext) -> Result<FilterContext> {
        let source = cx.profile().srs();
        let output = self.output_srs();
        let mut cx = cx;

        // Coordinates relative to a previous frame go back to world space first
        if let Some(frame) = cx.reference_frame().copied() {
            for feature in features.iter_mut() {
                feature.geometry.for_each_coord_mut(|c| *c = frame.to_world(*c));
            }
            cx = cx.without_reference_frame();
        }

        if source != output {
            for feature in features.iter_mut() {
                feature.geometry.try_for_each_coord_mut(|c| {
                    *c = source.transform(*c, &output)?;
                    Ok::<(), FeatureError>(())
                })?;
            }
        }

        let bounds = feature_bounds(features);
        let extent = match bounds {
            Some((min, max)) => GeoExtent::new(output, min.x, min.y, max.x, max.y),
            None => cx.profile().extent().transform(&output)?,
        };
        cx = cx.with_profile(FeatureProfile::new(extent));

        tracing::debug!(
            "Transformed {} features from {} to {}",
            features.len(),
            source,
            output
        );

        if self.localize {
            if let Some((min, max)) = bounds {
                let frame = localization_frame(output, (min + max) * 0.5)?;
                for feature in features.iter_mut() {
                    feature.geometry.for_each_coord_mut(|c| *c = frame.to_local(*c));
                }
                tracing::debug!("Localized features around {}", frame.origin());
                cx = cx.with_reference_frame(frame);
            }
        }

        Ok(cx)
    }
}

// ============================================================================
// 2. Localization frame
// ============================================================================

/// East-north-up frame at `center` for geocentric output, a plain
/// translation otherwise.
fn localization_frame(srs: SpatialReference, center: DVec3) -> Result<ReferenceFrame> {
    if srs.is_geocentric() {
        let geo = srs.to_geographic(center)?;
        Ok(ReferenceFrame::rigid(enu_rotation(geo.x, geo.y), center))
    } else {
        Ok(ReferenceFrame::translation(center))
    }
}
