//! # Styles and Symbols
//!
//! A [`Style`] is a named, ordered list of typed symbols. The compiler only
//! asks which kinds are present; the geometry strategies read the symbol
//! parameters (colour, width, model uri, ...).
//!
//! ## Table of Contents
//! 1. Rgba — colour parsed from `[r, g, b]` / `[r, g, b, a]`
//! 2. Symbol kinds
//! 3. Style

use serde::{Deserialize, Serialize};

// ============================================================================
// 1. Rgba — colour parsed from `[r, g, b]` / `[r, g, b, a]`
// ============================================================================

/// RGBA colour in the 0.0–1.0 range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f32>", into = "Vec<f32>")]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([1.0, 1.0, 1.0, 1.0]);

    pub fn is_translucent(&self) -> bool {
        self.0[3] < 1.0
    }
}

impl From<Vec<f32>> for Rgba {
    fn from(color: Vec<f32>) -> Self {
        match color.len() {
            3 => Rgba([color[0], color[1], color[2], 1.0]),
            4 => Rgba([color[0], color[1], color[2], color[3]]),
            _ => Rgba([0.5, 0.5, 0.5, 1.0]),
        }
    }
}

impl From<Rgba> for Vec<f32> {
    fn from(color: Rgba) -> Self {
        color.0.to_vec()
    }
}

fn default_color() -> Rgba {
    Rgba([0.3, 0.6, 1.0, 1.0])
}
fn default_one() -> f32 {
    1.0
}
fn default_scale() -> f64 {
    1.0
}
fn default_point_size() -> f32 {
    4.0
}

// ============================================================================
// 2. Symbol kinds
// ============================================================================

/// Discriminant used for presence queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Model,
    Point,
    Line,
    Polygon,
    Extrusion,
}

/// Substitute an external model at each feature location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSymbol {
    /// Model identifier, resolved through the session's model catalogue
    pub uri: String,
    /// Uniform scale applied to every instance
    #[serde(default = "default_scale")]
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSymbol {
    #[serde(default = "default_color")]
    pub color: Rgba,
    /// Point size in pixels
    #[serde(default = "default_point_size")]
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSymbol {
    #[serde(default = "default_color")]
    pub color: Rgba,
    /// Line width in pixels
    #[serde(default = "default_one")]
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonSymbol {
    #[serde(default = "default_color")]
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionSymbol {
    /// Extrusion height in metres
    #[serde(default)]
    pub height: f64,
}

/// One typed symbol
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Model(ModelSymbol),
    Point(PointSymbol),
    Line(LineSymbol),
    Polygon(PolygonSymbol),
    Extrusion(ExtrusionSymbol),
}

impl Symbol {
    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Model(_) => SymbolKind::Model,
            Symbol::Point(_) => SymbolKind::Point,
            Symbol::Line(_) => SymbolKind::Line,
            Symbol::Polygon(_) => SymbolKind::Polygon,
            Symbol::Extrusion(_) => SymbolKind::Extrusion,
        }
    }
}

impl From<ModelSymbol> for Symbol {
    fn from(s: ModelSymbol) -> Self {
        Symbol::Model(s)
    }
}

impl From<PointSymbol> for Symbol {
    fn from(s: PointSymbol) -> Self {
        Symbol::Point(s)
    }
}

impl From<LineSymbol> for Symbol {
    fn from(s: LineSymbol) -> Self {
        Symbol::Line(s)
    }
}

impl From<PolygonSymbol> for Symbol {
    fn from(s: PolygonSymbol) -> Self {
        Symbol::Polygon(s)
    }
}

impl From<ExtrusionSymbol> for Symbol {
    fn from(s: ExtrusionSymbol) -> Self {
        Symbol::Extrusion(s)
    }
}

impl Default for PointSymbol {
    fn default() -> Self {
        Self {
            color: default_color(),
            size: default_point_size(),
        }
    }
}

impl Default for LineSymbol {
    fn default() -> Self {
        Self {
            color: default_color(),
            width: default_one(),
        }
    }
}

impl Default for PolygonSymbol {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

// ============================================================================
// 3. Style
// ============================================================================

/// Named collection of symbols. Lookups return the first symbol of a kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    name: String,
    symbols: Vec<Symbol>,
}

impl Style {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbols: Vec::new(),
        }
    }

    /// Builder-style symbol append
    pub fn with_symbol(mut self, symbol: impl Into<Symbol>) -> Self {
        self.symbols.push(symbol.into());
        self
    }

    pub fn add_symbol(&mut self, symbol: impl Into<Symbol>) {
        self.symbols.push(symbol.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn get(&self, kind: SymbolKind) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.kind() == kind)
    }

    pub fn has(&self, kind: SymbolKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn model(&self) -> Option<&ModelSymbol> {
        self.symbols.iter().find_map(|s| match s {
            Symbol::Model(m) => Some(m),
            _ => None,
        })
    }

    pub fn point(&self) -> Option<&PointSymbol> {
        self.symbols.iter().find_map(|s| match s {
            Symbol::Point(p) => Some(p),
            _ => None,
        })
    }

    pub fn line(&self) -> Option<&LineSymbol> {
        self.symbols.iter().find_map(|s| match s {
            Symbol::Line(l) => Some(l),
            _ => None,
        })
    }

    pub fn polygon(&self) -> Option<&PolygonSymbol> {
        self.symbols.iter().find_map(|s| match s {
            Symbol::Polygon(p) => Some(p),
            _ => None,
        })
    }

    pub fn extrusion(&self) -> Option<&ExtrusionSymbol> {
        self.symbols.iter().find_map(|s| match s {
            Symbol::Extrusion(e) => Some(e),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_symbol_of_kind_wins() {
        let style = Style::new("roads")
            .with_symbol(LineSymbol { color: Rgba::WHITE, width: 2.0 })
            .with_symbol(LineSymbol { color: Rgba::WHITE, width: 9.0 });

        assert_eq!(style.line().map(|l| l.width), Some(2.0));
        assert!(style.has(SymbolKind::Line));
        assert!(!style.has(SymbolKind::Polygon));
        assert_eq!(style.get(SymbolKind::Line).map(Symbol::kind), Some(SymbolKind::Line));
        assert_eq!(style.symbols().len(), 2);
    }

    #[test]
    fn test_extrusion_height_lookup() {
        let style = Style::new("buildings")
            .with_symbol(PolygonSymbol::default())
            .with_symbol(ExtrusionSymbol { height: 20.0 });

        assert_eq!(style.extrusion().map(|e| e.height), Some(20.0));
        assert_eq!(style.symbols()[1].kind(), SymbolKind::Extrusion);
        assert!(Style::new("flat").extrusion().is_none());
    }

    #[test]
    fn test_rgba_from_vec() {
        assert_eq!(Rgba::from(vec![1.0, 0.0, 0.0]), Rgba([1.0, 0.0, 0.0, 1.0]));
        assert!(Rgba::from(vec![0.0, 0.0, 0.0, 0.5]).is_translucent());
        assert_eq!(Rgba::from(vec![1.0]), Rgba([0.5, 0.5, 0.5, 1.0]));
    }

    #[test]
    fn test_symbol_defaults_from_json() {
        let point: PointSymbol = serde_json::from_str("{}").unwrap();
        assert_eq!(point, PointSymbol::default());

        let model: ModelSymbol = serde_json::from_str(r#"{"uri": "tree"}"#).unwrap();
        assert_eq!(model.scale, 1.0);
    }
}
