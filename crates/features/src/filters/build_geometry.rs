//! # Build Geometry Filter
//!
//! Turns simple features into drawable meshes using the style's point, line
//! and polygon symbols.
//! - Point / MultiPoint → one `Points` mesh per feature
//! - LineString → `LineStrip` per part
//! - Polygon → earcut `Triangles`, or `LineLoop` outlines when the style
//!   only carries a line symbol
//!
//! ## Table of Contents
//! 1. BuildGeometryFilter
//! 2. Per-geometry mesh builders
//! 3. Polygon triangulation

use geo::{coord, LineString, Polygon, TriangulateEarcut};
use glam::{DVec3, Vec3};
use std::collections::HashMap;

use crate::context::FilterContext;
use crate::error::Result;
use crate::feature::{Feature, FeatureGeometry, FeatureList};
use crate::filters::{FeatureFilter, GeometryFilter};
use crate::node::{Geometry, Mesh, Node, Topology};
use crate::style::{LineSymbol, PointSymbol, PolygonSymbol, Style};

// ============================================================================
// 1. BuildGeometryFilter
// ============================================================================

/// Simple-geometry strategy
pub struct BuildGeometryFilter<'a> {
    style: &'a Style,
    node: Option<Node>,
}

impl<'a> BuildGeometryFilter<'a> {
    pub fn new(style: &'a Style) -> Self {
        Self { style, node: None }
    }

    fn build_feature(&self, feature: &Feature, meshes: &mut Vec<Mesh>) {
        let point = self.style.point();
        let line = self.style.line();
        let polygon = self.style.polygon();

        match &feature.geometry {
            FeatureGeometry::Point(p) => {
                if let Some(symbol) = point {
                    meshes.extend(point_mesh(std::slice::from_ref(p), symbol));
                }
            }
            FeatureGeometry::MultiPoint(pts) => {
                if let Some(symbol) = point {
                    meshes.extend(point_mesh(pts, symbol));
                }
            }
            FeatureGeometry::LineString(path) => {
                if let Some(symbol) = line {
                    meshes.extend(line_mesh(path, Topology::LineStrip, symbol));
                }
            }
            FeatureGeometry::MultiLineString(paths) => {
                if let Some(symbol) = line {
                    meshes.extend(paths.iter().filter_map(|p| line_mesh(p, Topology::LineStrip, symbol)));
                }
            }
            FeatureGeometry::Polygon { outer, holes } => {
                build_polygon(outer, holes, polygon, line, meshes);
            }
            FeatureGeometry::MultiPolygon(parts) => {
                for part in parts {
                    build_polygon(&part.outer, &part.holes, polygon, line, meshes);
                }
            }
        }
    }
}

impl FeatureFilter for BuildGeometryFilter<'_> {
    fn push(&mut self, features: &mut FeatureList, cx: FilterContext) -> Result<FilterContext> {
        let mut meshes = Vec::new();
        for feature in features.iter() {
            self.build_feature(feature, &mut meshes);
        }

        tracing::debug!(
            "Built {} meshes from {} features with style '{}'",
            meshes.len(),
            features.len(),
            self.style.name()
        );

        self.node = if meshes.is_empty() {
            None
        } else {
            Some(Node::Geometry(Geometry {
                name: Some(self.style.name().to_string()),
                meshes,
            }))
        };
        Ok(cx)
    }
}

impl GeometryFilter for BuildGeometryFilter<'_> {
    fn take_node(&mut self) -> Option<Node> {
        self.node.take()
    }
}

// ============================================================================
// 2. Per-geometry mesh builders
// ============================================================================

fn to_vec3(points: &[DVec3]) -> Vec<Vec3> {
    points.iter().map(|p| p.as_vec3()).collect()
}

fn build_polygon(
    outer: &[DVec3],
    holes: &[Vec<DVec3>],
    fill: Option<&PolygonSymbol>,
    outline: Option<&LineSymbol>,
    meshes: &mut Vec<Mesh>,
) {
    if let Some(symbol) = fill {
        meshes.extend(polygon_mesh(outer, holes, symbol));
    } else if let Some(symbol) = outline {
        meshes.extend(
            std::iter::once(outer)
                .chain(holes.iter().map(Vec::as_slice))
                .filter_map(|ring| line_mesh(open_ring(ring), Topology::LineLoop, symbol)),
        );
    }
}

fn point_mesh(points: &[DVec3], symbol: &PointSymbol) -> Option<Mesh> {
    if points.is_empty() {
        return None;
    }
    Some(Mesh::sequential(Topology::Points, to_vec3(points), symbol.color, symbol.size))
}

fn line_mesh(path: &[DVec3], topology: Topology, symbol: &LineSymbol) -> Option<Mesh> {
    if path.len() < 2 {
        tracing::warn!("Line requires at least 2 vertices, got {}", path.len());
        return None;
    }
    Some(Mesh::sequential(topology, to_vec3(path), symbol.color, symbol.width))
}

/// Ring without its closing vertex
fn open_ring(ring: &[DVec3]) -> &[DVec3] {
    match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

// ============================================================================
// 3. Polygon triangulation
// ============================================================================

/// Newell normal of a ring; `None` when the ring is degenerate
fn ring_normal(ring: &[DVec3]) -> Option<DVec3> {
    let mut normal = DVec3::ZERO;
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal.try_normalize()
}

/// Triangulate a planar polygon with holes.
///
/// Rings are projected onto the plane of the outer ring, triangulated with
/// earcut in 2D, and the resulting corners mapped back to the 3D vertices.
fn polygon_mesh(outer: &[DVec3], holes: &[Vec<DVec3>], symbol: &PolygonSymbol) -> Option<Mesh> {
    let outer = open_ring(outer);
    if outer.len() < 3 {
        tracing::warn!("Polygon ring requires at least 3 vertices, got {}", outer.len());
        return None;
    }

    let normal = ring_normal(outer).unwrap_or(DVec3::Z);
    let u = normal.any_orthonormal_vector();
    let v = normal.cross(u);

    let mut positions = Vec::new();
    let mut lookup: HashMap<(u64, u64), u32> = HashMap::new();
    let mut project = |ring: &[DVec3]| -> LineString<f64> {
        ring.iter()
            .map(|p| {
                let (x, y) = (p.dot(u), p.dot(v));
                lookup.entry((x.to_bits(), y.to_bits())).or_insert_with(|| {
                    positions.push(p.as_vec3());
                    (positions.len() - 1) as u32
                });
                coord! { x: x, y: y }
            })
            .collect()
    };

    let exterior = project(outer);
    let interiors: Vec<LineString<f64>> = holes
        .iter()
        .map(|h| open_ring(h))
        .filter(|h| h.len() >= 3)
        .map(|h| project(h))
        .collect();

    let mut indices = Vec::new();
    for triangle in Polygon::new(exterior, interiors).earcut_triangles() {
        for corner in triangle.to_array() {
            match lookup.get(&(corner.x.to_bits(), corner.y.to_bits())) {
                Some(index) => indices.push(*index),
                None => {
                    tracing::warn!("Triangulation produced an unknown vertex; skipping polygon");
                    return None;
                }
            }
        }
    }

    if indices.is_empty() {
        return None;
    }

    Some(Mesh {
        topology: Topology::Triangles,
        positions,
        indices,
        color: symbol.color,
        size: 1.0,
    })
}
