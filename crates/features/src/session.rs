//! Session-scoped, read-only resources shared by every compilation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::srs::SpatialReference;

/// Destination map descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapInfo {
    srs: SpatialReference,
    geocentric: bool,
}

impl MapInfo {
    /// `srs` is the map profile's SRS; `geocentric` selects a round-earth
    /// scene, in which case geometry is built in ECEF regardless of `srs`.
    pub fn new(srs: SpatialReference, geocentric: bool) -> Self {
        Self { srs, geocentric }
    }

    pub fn srs(&self) -> SpatialReference {
        self.srs
    }

    pub fn is_geocentric(&self) -> bool {
        self.geocentric || self.srs.is_geocentric()
    }
}

/// Map info plus the model catalogue used by model substitution.
///
/// Never mutated by the compiler; share it behind an `Arc` across threads.
#[derive(Debug, Clone)]
pub struct Session {
    map_info: MapInfo,
    models: HashMap<String, PathBuf>,
}

impl Session {
    pub fn new(map_info: MapInfo) -> Self {
        Self {
            map_info,
            models: HashMap::new(),
        }
    }

    pub fn with_model(mut self, uri: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.models.insert(uri.into(), path.into());
        self
    }

    pub fn map_info(&self) -> &MapInfo {
        &self.map_info
    }

    /// Resolved file for a model uri, if the catalogue knows it
    pub fn model_path(&self, uri: &str) -> Option<&Path> {
        self.models.get(uri).map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocentric_srs_implies_geocentric_map() {
        assert!(MapInfo::new(SpatialReference::Geocentric, false).is_geocentric());
        assert!(MapInfo::new(SpatialReference::Geographic, true).is_geocentric());
        assert!(!MapInfo::new(SpatialReference::Mercator, false).is_geocentric());
    }

    #[test]
    fn test_model_catalogue() {
        let session = Session::new(MapInfo::new(SpatialReference::Geographic, true))
            .with_model("tree", "models/tree.glb");
        assert_eq!(session.model_path("tree"), Some(Path::new("models/tree.glb")));
        assert!(session.model_path("rock").is_none());
    }
}
