//! # Geometry Strategy Selection
//!
//! Picks how features become geometry from the symbols present in a style.
//!
//! | Precedence | Symbols                          | Strategy          |
//! |-----------:|----------------------------------|-------------------|
//! | 1          | model                            | ModelSubstitution |
//! | 2          | extrusion + (line or polygon)    | Extrusion         |
//! | 3          | point, line or polygon           | SimpleGeometry    |
//! | –          | none of the above                | no geometry       |

use std::fmt;

use crate::filters::{BuildGeometryFilter, ExtrudeGeometryFilter, GeometryFilter, SubstituteModelFilter};
use crate::style::{Style, SymbolKind};

/// Which symbol kinds a style carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolPresence {
    pub model: bool,
    pub point: bool,
    pub line: bool,
    pub polygon: bool,
    pub extrusion: bool,
}

impl SymbolPresence {
    pub fn of(style: &Style) -> Self {
        Self {
            model: style.has(SymbolKind::Model),
            point: style.has(SymbolKind::Point),
            line: style.has(SymbolKind::Line),
            polygon: style.has(SymbolKind::Polygon),
            extrusion: style.has(SymbolKind::Extrusion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ModelSubstitution,
    Extrusion,
    SimpleGeometry,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::ModelSubstitution => "model-substitution",
            Strategy::Extrusion => "extrusion",
            Strategy::SimpleGeometry => "simple-geometry",
        }
    }

    /// Geometry stage implementing this strategy for `style`
    pub fn filter<'a>(&self, style: &'a Style) -> Box<dyn GeometryFilter + 'a> {
        match self {
            Strategy::ModelSubstitution => Box::new(SubstituteModelFilter::new(style)),
            Strategy::Extrusion => Box::new(ExtrudeGeometryFilter::new(style)),
            Strategy::SimpleGeometry => Box::new(BuildGeometryFilter::new(style)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// First matching strategy in precedence order; `None` when the style has
/// nothing the compiler can draw.
pub fn select_strategy(symbols: SymbolPresence) -> Option<Strategy> {
    if symbols.model {
        Some(Strategy::ModelSubstitution)
    } else if symbols.extrusion && (symbols.line || symbols.polygon) {
        Some(Strategy::Extrusion)
    } else if symbols.point || symbols.line || symbols.polygon {
        Some(Strategy::SimpleGeometry)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{ExtrusionSymbol, ModelSymbol, PointSymbol, PolygonSymbol};

    fn presence(model: bool, point: bool, line: bool, polygon: bool, extrusion: bool) -> SymbolPresence {
        SymbolPresence {
            model,
            point,
            line,
            polygon,
            extrusion,
        }
    }

    #[test]
    fn test_model_wins_over_everything() {
        let all = presence(true, true, true, true, true);
        assert_eq!(select_strategy(all), Some(Strategy::ModelSubstitution));
        let model_polygon = presence(true, false, false, true, false);
        assert_eq!(select_strategy(model_polygon), Some(Strategy::ModelSubstitution));
    }

    #[test]
    fn test_extrusion_needs_line_or_polygon() {
        assert_eq!(select_strategy(presence(false, false, true, false, true)), Some(Strategy::Extrusion));
        assert_eq!(select_strategy(presence(false, false, false, true, true)), Some(Strategy::Extrusion));
        // Point alone doesn't qualify for extrusion
        assert_eq!(
            select_strategy(presence(false, true, false, false, true)),
            Some(Strategy::SimpleGeometry)
        );
        assert_eq!(select_strategy(presence(false, false, false, false, true)), None);
    }

    #[test]
    fn test_simple_geometry() {
        assert_eq!(select_strategy(presence(false, true, false, false, false)), Some(Strategy::SimpleGeometry));
        assert_eq!(select_strategy(presence(false, false, false, true, false)), Some(Strategy::SimpleGeometry));
    }

    #[test]
    fn test_empty_style_selects_nothing() {
        assert_eq!(select_strategy(SymbolPresence::default()), None);
        assert_eq!(select_strategy(SymbolPresence::of(&Style::new("empty"))), None);
    }

    #[test]
    fn test_presence_from_style() {
        let style = Style::new("mixed")
            .with_symbol(ModelSymbol {
                uri: "tree".to_string(),
                scale: 1.0,
            })
            .with_symbol(PointSymbol::default())
            .with_symbol(PolygonSymbol::default())
            .with_symbol(ExtrusionSymbol { height: 3.0 });
        assert_eq!(SymbolPresence::of(&style), presence(true, true, false, true, true));
        assert_eq!(Strategy::ModelSubstitution.to_string(), "model-substitution");
    }
}
