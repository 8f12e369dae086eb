//! # Compiler Configuration
//!
//! Parses `features.toml`, the declarative setup for a feature compiler:
//! destination map, localization policy, model catalogue and named styles.
//!
//! ```toml
//! [map]
//! srs = "epsg:4326"
//! geocentric = true
//!
//! [localization]
//! enabled = true
//! max_extent_degrees = 180.0
//!
//! [models]
//! tree = "models/tree.glb"
//!
//! [[styles]]
//! name = "poi"
//! [styles.point]
//! color = [1.0, 0.0, 0.0]
//! size = 6.0
//! ```
//!
//! ## Table of Contents
//! 1. CompilerConfig — Top-level config
//! 2. MapConfig / LocalizationConfig
//! 3. StyleConfig — Named symbol tables
//! 4. Parsing and conversion

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::compiler::{CompilerOptions, DEFAULT_MAX_LOCALIZED_EXTENT};
use crate::error::{FeatureError, Result};
use crate::session::{MapInfo, Session};
use crate::srs::SpatialReference;
use crate::style::{ExtrusionSymbol, LineSymbol, ModelSymbol, PointSymbol, PolygonSymbol, Style};

// ============================================================================
// 1. CompilerConfig — Top-level config
// ============================================================================

/// Top-level compiler configuration, parsed from `features.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub localization: LocalizationConfig,
    /// Model uri → file path, relative to the config file
    #[serde(default)]
    pub models: BTreeMap<String, String>,
    #[serde(default)]
    pub styles: Vec<StyleConfig>,
}

// ============================================================================
// 2. MapConfig / LocalizationConfig
// ============================================================================

/// Destination map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Map SRS ("wgs84", "epsg:4326", "epsg:3857", "geocentric", ...)
    #[serde(default = "default_srs")]
    pub srs: String,
    /// Round-earth scene: geometry is built in ECEF
    #[serde(default = "default_true")]
    pub geocentric: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            srs: default_srs(),
            geocentric: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Extents at least this wide (degrees) keep world coordinates
    #[serde(default = "default_max_extent")]
    pub max_extent_degrees: f64,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_extent_degrees: default_max_extent(),
        }
    }
}

fn default_srs() -> String {
    "epsg:4326".to_string()
}
fn default_true() -> bool {
    true
}
fn default_max_extent() -> f64 {
    DEFAULT_MAX_LOCALIZED_EXTENT
}

// ============================================================================
// 3. StyleConfig — Named symbol tables
// ============================================================================

/// One `[[styles]]` entry. Each symbol table is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    pub name: String,
    #[serde(default)]
    pub model: Option<ModelSymbol>,
    #[serde(default)]
    pub point: Option<PointSymbol>,
    #[serde(default)]
    pub line: Option<LineSymbol>,
    #[serde(default)]
    pub polygon: Option<PolygonSymbol>,
    #[serde(default)]
    pub extrusion: Option<ExtrusionSymbol>,
}

impl StyleConfig {
    pub fn to_style(&self) -> Style {
        let mut style = Style::new(&self.name);
        if let Some(model) = &self.model {
            style.add_symbol(model.clone());
        }
        if let Some(point) = &self.point {
            style.add_symbol(point.clone());
        }
        if let Some(line) = &self.line {
            style.add_symbol(line.clone());
        }
        if let Some(polygon) = &self.polygon {
            style.add_symbol(polygon.clone());
        }
        if let Some(extrusion) = &self.extrusion {
            style.add_symbol(extrusion.clone());
        }
        style
    }
}

// ============================================================================
// 4. Parsing and conversion
// ============================================================================

impl CompilerConfig {
    /// Load a CompilerConfig from a `features.toml` file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FeatureError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CompilerConfig = toml::from_str(content)?;
        tracing::debug!(
            "Parsed compiler config: map {} ({} styles, {} models)",
            config.map.srs,
            config.styles.len(),
            config.models.len()
        );
        Ok(config)
    }

    pub fn map_info(&self) -> Result<MapInfo> {
        let srs: SpatialReference = self.map.srs.parse()?;
        Ok(MapInfo::new(srs, self.map.geocentric))
    }

    /// Build a session; model paths resolve against `config_dir`
    pub fn session(&self, config_dir: &Path) -> Result<Session> {
        let mut session = Session::new(self.map_info()?);
        for (uri, relative) in &self.models {
            session = session.with_model(uri, self.resolve_path(config_dir, relative));
        }
        Ok(session)
    }

    pub fn options(&self) -> CompilerOptions {
        CompilerOptions {
            localize: self.localization.enabled,
            max_localized_extent: self.localization.max_extent_degrees,
        }
    }

    /// Resolve a relative path from features.toml to an absolute path
    pub fn resolve_path(&self, config_dir: &Path, relative: &str) -> PathBuf {
        config_dir.join(relative)
    }

    pub fn style(&self, name: &str) -> Result<Style> {
        self.styles
            .iter()
            .find(|s| s.name == name)
            .map(StyleConfig::to_style)
            .ok_or_else(|| FeatureError::UnknownStyle(name.to_string()))
    }

    pub fn styles(&self) -> Vec<Style> {
        self.styles.iter().map(StyleConfig::to_style).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Rgba, SymbolKind};

    const SAMPLE: &str = r#"
[map]
srs = "spherical-mercator"
geocentric = false

[localization]
max_extent_degrees = 90.0

[models]
tree = "models/tree.glb"

[[styles]]
name = "poi"
[styles.point]
color = [1.0, 0.0, 0.0]
size = 6.0

[[styles]]
name = "forest"
[styles.model]
uri = "tree"
scale = 2.5
[styles.polygon]
"#;

    #[test]
    fn test_parse_sample() {
        let config = CompilerConfig::from_toml_str(SAMPLE).unwrap();
        let map = config.map_info().unwrap();
        assert_eq!(map.srs(), SpatialReference::Mercator);
        assert!(!map.is_geocentric());

        let options = config.options();
        assert!(options.localize);
        assert_eq!(options.max_localized_extent, 90.0);

        let poi = config.style("poi").unwrap();
        let point = poi.point().unwrap();
        assert_eq!(point.color, Rgba([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(point.size, 6.0);

        let forest = config.style("forest").unwrap();
        assert_eq!(forest.model().unwrap().scale, 2.5);
        assert!(forest.has(SymbolKind::Polygon));
        assert!(!forest.has(SymbolKind::Line));
    }

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::from_toml_str("").unwrap();
        let map = config.map_info().unwrap();
        assert_eq!(map.srs(), SpatialReference::Geographic);
        assert!(map.is_geocentric());
        assert_eq!(config.options(), CompilerOptions::default());
        assert!(config.styles().is_empty());
    }

    #[test]
    fn test_session_resolves_models() {
        let config = CompilerConfig::from_toml_str(SAMPLE).unwrap();
        let session = config.session(Path::new("/project")).unwrap();
        assert_eq!(session.model_path("tree"), Some(Path::new("/project/models/tree.glb")));
        assert!(session.model_path("rock").is_none());
    }

    #[test]
    fn test_unknown_style_and_srs() {
        let config = CompilerConfig::from_toml_str(SAMPLE).unwrap();
        assert!(matches!(config.style("roads"), Err(FeatureError::UnknownStyle(_))));

        let bad = CompilerConfig::from_toml_str("[map]\nsrs = \"epsg:32644\"").unwrap();
        assert!(matches!(bad.map_info(), Err(FeatureError::UnknownSrs(_))));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            CompilerConfig::from_toml_str("[map\nsrs ="),
            Err(FeatureError::Config(_))
        ));
    }
}
