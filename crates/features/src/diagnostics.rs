//! # Compiler Diagnostics
//!
//! The compiler reports recoverable conditions (missing inputs, unusable
//! styles) through an injected [`Diagnostics`] sink rather than a global
//! logger, so callers and tests can observe them directly.
//!
//! ## Table of Contents
//! 1. Diagnostic — reportable conditions
//! 2. Diagnostics — sink trait
//! 3. TracingDiagnostics — forwards to `tracing`
//! 4. DiagnosticLog — in-memory recorder

use parking_lot::Mutex;
use std::fmt;

// ============================================================================
// 1. Diagnostic — reportable conditions
// ============================================================================

/// A recoverable condition that produced an empty compilation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `compile` was called without a feature profile
    MissingProfile,
    /// `compile` was called without a style
    MissingStyle,
    /// The style declares none of the symbols any strategy understands
    InsufficientSymbology { style: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingProfile => write!(f, "Valid feature profile required"),
            Diagnostic::MissingStyle => write!(f, "Valid style required"),
            Diagnostic::InsufficientSymbology { style } => {
                write!(f, "Insufficient symbology in style '{}'; no geometry created", style)
            }
        }
    }
}

// ============================================================================
// 2. Diagnostics — sink trait
// ============================================================================

/// Receives diagnostics from a compiler. Shared across threads.
pub trait Diagnostics: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

// ============================================================================
// 3. TracingDiagnostics — forwards to `tracing`
// ============================================================================

/// Default sink: every diagnostic becomes a `warn` event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(target: "eustress_features::compiler", "{}", diagnostic);
    }
}

// ============================================================================
// 4. DiagnosticLog — in-memory recorder
// ============================================================================

/// Records every diagnostic in arrival order
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded diagnostics
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    pub fn contains(&self, diagnostic: &Diagnostic) -> bool {
        self.entries.lock().contains(diagnostic)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Diagnostics for DiagnosticLog {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::debug!("recorded diagnostic: {}", diagnostic);
        self.entries.lock().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_records_in_order() {
        let log = DiagnosticLog::new();
        assert!(log.is_empty());

        log.report(Diagnostic::MissingStyle);
        log.report(Diagnostic::InsufficientSymbology { style: "empty".to_string() });

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0], Diagnostic::MissingStyle);
        assert!(log.contains(&Diagnostic::InsufficientSymbology { style: "empty".to_string() }));
        assert!(!log.contains(&Diagnostic::MissingProfile));

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_messages_are_distinct() {
        let missing = Diagnostic::MissingProfile.to_string();
        let insufficient = Diagnostic::InsufficientSymbology { style: "s".to_string() }.to_string();
        assert_ne!(missing, insufficient);
        assert!(insufficient.contains("no geometry created"));
    }
}
