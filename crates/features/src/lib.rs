//! # Eustress Features — Feature-to-Geometry Compiler
//!
//! Compiles styled vector features (points, lines, polygons) into a small
//! scene-node tree positioned in the map's spatial reference. On round-earth
//! maps, regional data is built in a local east-north-up frame and wrapped in
//! a transform back to world space, keeping vertex coordinates small enough
//! for `f32` rendering.
//!
//! ## Architecture
//! - `features.toml` — Declarative setup (map SRS, localization, models, styles)
//! - `FeatureCursor` — Drained once per compilation into a working set
//! - `FeatureCompiler` — Transform → strategy → localization finalizer
//!
//! ## Modules
//! - `compiler` — `FeatureCompiler::compile` and the localization decision
//! - `config` — Parse `features.toml`
//! - `context` — `FilterContext` and `ReferenceFrame`
//! - `cursor` — Feature cursors (in-memory, GeoJSON)
//! - `diagnostics` — Injected sink for recoverable conditions
//! - `extent` — `GeoExtent` and `FeatureProfile`
//! - `feature` — Feature and geometry types
//! - `filters` — Pipeline stages (transform, build geometry, models, extrusion)
//! - `localize` — Wraps localized output in its inverse frame
//! - `node` — Scene-node output tree
//! - `session` — `MapInfo` and the model catalogue
//! - `srs` — Geographic / geocentric / mercator conversions
//! - `strategy` — Strategy selection from style symbology
//! - `style` — Styles and symbols
//!
//! ## Table of Contents
//! 1. Module declarations
//! 2. Re-exports

pub mod compiler;
pub mod config;
pub mod context;
pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod extent;
pub mod feature;
pub mod filters;
pub mod localize;
pub mod node;
pub mod session;
pub mod srs;
pub mod strategy;
pub mod style;

pub use compiler::{should_localize, Compilation, CompilerOptions, FeatureCompiler};
pub use config::CompilerConfig;
pub use context::{FilterContext, ReferenceFrame};
pub use cursor::{FeatureCursor, GeoJsonCursor, VecCursor};
pub use diagnostics::{Diagnostic, DiagnosticLog, Diagnostics, TracingDiagnostics};
pub use error::{FeatureError, Result};
pub use extent::{FeatureProfile, GeoExtent};
pub use feature::{Feature, FeatureGeometry, FeatureList};
pub use node::{MatrixTransform, Node};
pub use session::{MapInfo, Session};
pub use srs::SpatialReference;
pub use strategy::{select_strategy, Strategy, SymbolPresence};
pub use style::{Style, Symbol, SymbolKind};
