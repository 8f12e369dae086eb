//! # Feature Compiler
//!
//! Top-level entry point: turns a feature cursor plus a style into an
//! optional scene node.
//!
//! ## Pipeline
//! ```text
//! validate ─► drain cursor ─► decide localization ─► TransformFilter
//!          ─► strategy filter ─► localize::finalize ─► Option<Node>
//! ```
//!
//! ## Table of Contents
//! 1. CompilerOptions
//! 2. Localization decision
//! 3. FeatureCompiler
//! 4. Compilation — detailed result

use std::sync::Arc;

use crate::context::FilterContext;
use crate::cursor::FeatureCursor;
use crate::diagnostics::{Diagnostic, Diagnostics, TracingDiagnostics};
use crate::error::Result;
use crate::extent::FeatureProfile;
use crate::feature::FeatureList;
use crate::filters::{FeatureFilter, TransformFilter};
use crate::localize;
use crate::node::Node;
use crate::session::{MapInfo, Session};
use crate::strategy::{select_strategy, Strategy, SymbolPresence};
use crate::style::Style;

// ============================================================================
// 1. CompilerOptions
// ============================================================================

/// Localization widths at or above this many degrees stay in world space
pub const DEFAULT_MAX_LOCALIZED_EXTENT: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompilerOptions {
    /// Allow localization into a tangent frame on geocentric maps
    pub localize: bool,
    /// Geographic extent width (degrees) below which localization applies
    pub max_localized_extent: f64,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            localize: true,
            max_localized_extent: DEFAULT_MAX_LOCALIZED_EXTENT,
        }
    }
}

// ============================================================================
// 2. Localization decision
// ============================================================================

/// Whether geometry for `profile` should be built in a local frame.
///
/// Only geocentric maps localize, and only when the source extent spans
/// strictly less than `options.max_localized_extent` degrees of longitude.
/// Wider data keeps world coordinates; a single tangent plane would distort
/// it.
pub fn should_localize(profile: &FeatureProfile, map_info: &MapInfo, options: &CompilerOptions) -> Result<bool> {
    if !options.localize || !map_info.is_geocentric() {
        return Ok(false);
    }
    let geographic = profile.extent().transform(&profile.srs().geographic())?;
    Ok(geographic.width() < options.max_localized_extent)
}

// ============================================================================
// 3. FeatureCompiler
// ============================================================================

/// Compiles feature sets against one session.
///
/// `Send + Sync`: the session is read-only and the diagnostics sink is
/// internally synchronized, so one compiler can serve many threads.
pub struct FeatureCompiler {
    session: Arc<Session>,
    options: CompilerOptions,
    diagnostics: Arc<dyn Diagnostics>,
}

impl FeatureCompiler {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            options: CompilerOptions::default(),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Route diagnostics to `sink` instead of `tracing`
    pub fn with_diagnostics(mut self, sink: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile the features in `cursor` with `style`.
    ///
    /// Missing inputs are reported as diagnostics and yield `Ok(None)`
    /// without touching the cursor. An `Err` means a stage failed, for
    /// example a coordinate outside the destination SRS's domain.
    pub fn compile(
        &self,
        cursor: &mut dyn FeatureCursor,
        profile: Option<&FeatureProfile>,
        style: Option<&Style>,
    ) -> Result<Option<Node>> {
        Ok(self.compile_detailed(cursor, profile, style)?.and_then(|c| c.node))
    }

    /// Like [`compile`](Self::compile), but also reports how the result was
    /// produced. `None` only when an input was missing.
    pub fn compile_detailed(
        &self,
        cursor: &mut dyn FeatureCursor,
        profile: Option<&FeatureProfile>,
        style: Option<&Style>,
    ) -> Result<Option<Compilation>> {
        let Some(profile) = profile else {
            self.diagnostics.report(Diagnostic::MissingProfile);
            return Ok(None);
        };
        let Some(style) = style else {
            self.diagnostics.report(Diagnostic::MissingStyle);
            return Ok(None);
        };

        let mut features = FeatureList::new();
        cursor.fill(&mut features);

        let map_info = *self.session.map_info();
        let localized = should_localize(profile, &map_info, &self.options)?;

        let cx = FilterContext::new(Arc::clone(&self.session), *profile);

        let mut transform = TransformFilter::new(map_info.srs(), map_info.is_geocentric()).with_localize(localized);
        let cx = transform.push(&mut features, cx)?;

        let strategy = select_strategy(SymbolPresence::of(style));
        let (node, cx) = match strategy {
            Some(strategy) => {
                let mut filter = strategy.filter(style);
                let cx = filter.push(&mut features, cx)?;
                (filter.take_node(), cx)
            }
            None => {
                self.diagnostics.report(Diagnostic::InsufficientSymbology {
                    style: style.name().to_string(),
                });
                (None, cx)
            }
        };

        let node = localize::finalize(node, &cx);

        tracing::info!(
            "Compiled {} features with style '{}' (strategy: {}, localized: {})",
            features.len(),
            style.name(),
            strategy.map_or("none", |s| s.name()),
            cx.has_reference_frame()
        );

        Ok(Some(Compilation {
            node,
            strategy,
            localized: cx.has_reference_frame(),
            feature_count: features.len(),
            profile: *cx.profile(),
        }))
    }
}

// ============================================================================
// 4. Compilation — detailed result
// ============================================================================

/// Result of [`FeatureCompiler::compile_detailed`]
#[derive(Debug, Clone)]
pub struct Compilation {
    pub node: Option<Node>,
    /// Strategy that ran; `None` for insufficient symbology
    pub strategy: Option<Strategy>,
    /// A local reference frame was established and the node wrapped
    pub localized: bool,
    pub feature_count: usize,
    /// Profile of the output geometry (world space)
    pub profile: FeatureProfile,
}
