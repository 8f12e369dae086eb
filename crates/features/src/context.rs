//! # Filter Context
//!
//! State threaded by value through every compilation stage. Each stage takes
//! the current context and returns the (possibly updated) one, so a frame
//! established by an early stage is visible to every later stage.
//!
//! ## Table of Contents
//! 1. ReferenceFrame — world↔local transform pair
//! 2. FilterContext

use glam::{DMat3, DMat4, DVec3};
use std::sync::Arc;

use crate::extent::FeatureProfile;
use crate::session::{MapInfo, Session};

// ============================================================================
// 1. ReferenceFrame — world↔local transform pair
// ============================================================================

/// World-to-local transform and its inverse.
///
/// Only rigid frames (rotation + translation) are built, and both matrices
/// are computed together, so `inverse * frame` is the identity up to
/// rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    frame: DMat4,
    inverse: DMat4,
}

impl ReferenceFrame {
    /// Frame whose local origin is `origin` and whose local axes are the
    /// columns of the orthonormal `rotation`, both expressed in world space.
    pub fn rigid(rotation: DMat3, origin: DVec3) -> Self {
        let local_to_world = DMat4::from_cols(
            rotation.x_axis.extend(0.0),
            rotation.y_axis.extend(0.0),
            rotation.z_axis.extend(0.0),
            origin.extend(1.0),
        );
        let transposed = rotation.transpose();
        let world_to_local = DMat4::from_cols(
            transposed.x_axis.extend(0.0),
            transposed.y_axis.extend(0.0),
            transposed.z_axis.extend(0.0),
            (-(transposed * origin)).extend(1.0),
        );
        Self {
            frame: world_to_local,
            inverse: local_to_world,
        }
    }

    /// Axis-aligned frame centred on `origin`
    pub fn translation(origin: DVec3) -> Self {
        Self {
            frame: DMat4::from_translation(-origin),
            inverse: DMat4::from_translation(origin),
        }
    }

    /// World → local
    pub fn frame(&self) -> &DMat4 {
        &self.frame
    }

    /// Local → world
    pub fn inverse(&self) -> &DMat4 {
        &self.inverse
    }

    /// Local origin in world coordinates
    pub fn origin(&self) -> DVec3 {
        self.inverse.w_axis.truncate()
    }

    pub fn to_local(&self, world: DVec3) -> DVec3 {
        self.frame.transform_point3(world)
    }

    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.inverse.transform_point3(local)
    }
}

// ============================================================================
// 2. FilterContext
// ============================================================================

/// Pipeline-local state: current profile, optional local frame, session.
#[derive(Debug, Clone)]
pub struct FilterContext {
    session: Arc<Session>,
    profile: FeatureProfile,
    reference_frame: Option<ReferenceFrame>,
}

impl FilterContext {
    pub fn new(session: Arc<Session>, profile: FeatureProfile) -> Self {
        Self {
            session,
            profile,
            reference_frame: None,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn map_info(&self) -> &MapInfo {
        self.session.map_info()
    }

    /// Profile the working set is currently expressed in
    pub fn profile(&self) -> &FeatureProfile {
        &self.profile
    }

    pub fn with_profile(mut self, profile: FeatureProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn reference_frame(&self) -> Option<&ReferenceFrame> {
        self.reference_frame.as_ref()
    }

    pub fn has_reference_frame(&self) -> bool {
        self.reference_frame.is_some()
    }

    pub fn with_reference_frame(mut self, frame: ReferenceFrame) -> Self {
        self.reference_frame = Some(frame);
        self
    }

    pub fn without_reference_frame(mut self) -> Self {
        self.reference_frame = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::GeoExtent;
    use crate::srs::{enu_rotation, SpatialReference};

    #[test]
    fn test_rigid_frame_round_trip() {
        let origin = DVec3::new(4_510_731.0, 4_510_731.0, 0.0);
        let rf = ReferenceFrame::rigid(enu_rotation(45.0, 0.0), origin);

        let product = *rf.inverse() * *rf.frame();
        assert!(product.abs_diff_eq(DMat4::IDENTITY, 1e-6));

        let world = DVec3::new(4_511_000.5, 4_510_000.25, 321.0);
        let local = rf.to_local(world);
        assert!(local.length() < 2_000.0);
        assert!(rf.to_world(local).abs_diff_eq(world, 1e-6));
        assert!(rf.origin().abs_diff_eq(origin, 0.0));
    }

    #[test]
    fn test_translation_frame() {
        let rf = ReferenceFrame::translation(DVec3::new(10.0, 20.0, 30.0));
        assert_eq!(rf.to_local(DVec3::new(11.0, 20.0, 30.0)), DVec3::X);
        assert_eq!(*rf.inverse() * *rf.frame(), DMat4::IDENTITY);
    }

    #[test]
    fn test_context_chaining() {
        let session = Arc::new(Session::new(MapInfo::new(SpatialReference::Geographic, true)));
        let profile = FeatureProfile::new(GeoExtent::new(SpatialReference::Geographic, 0.0, 0.0, 1.0, 1.0));
        let cx = FilterContext::new(session, profile);
        assert!(!cx.has_reference_frame());

        let cx = cx.with_reference_frame(ReferenceFrame::translation(DVec3::ONE));
        assert!(cx.has_reference_frame());
        assert!(cx.map_info().is_geocentric());
        assert!(!cx.without_reference_frame().has_reference_frame());
    }
}
