//! # Scene Nodes
//!
//! Minimal scene-graph output of the compiler. Engine glue converts these
//! into ECS entities and GPU meshes; the compiler only creates, wraps and
//! returns them.
//!
//! ## Table of Contents
//! 1. Mesh — vertex data with one topology
//! 2. Node variants
//! 3. Traversal helpers

use glam::{DMat4, DVec3, Vec3};
use std::path::PathBuf;

use crate::style::Rgba;

// ============================================================================
// 1. Mesh — vertex data with one topology
// ============================================================================

/// How a mesh's indices are assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Points,
    LineStrip,
    LineLoop,
    Triangles,
}

/// Vertex positions (local, single precision) plus indices
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub topology: Topology,
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub color: Rgba,
    /// Point size or line width in pixels; unused for triangles
    pub size: f32,
}

impl Mesh {
    /// Non-indexed-style mesh: indices enumerate the positions in order
    pub fn sequential(topology: Topology, positions: Vec<Vec3>, color: Rgba, size: f32) -> Self {
        let indices = (0..positions.len() as u32).collect();
        Self {
            topology,
            positions,
            indices,
            color,
            size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// ============================================================================
// 2. Node variants
// ============================================================================

/// Leaf holding drawable meshes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub name: Option<String>,
    pub meshes: Vec<Mesh>,
}

/// Placement node: children are drawn with `matrix` applied
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixTransform {
    pub matrix: DMat4,
    pub children: Vec<Node>,
}

impl MatrixTransform {
    pub fn new(matrix: DMat4) -> Self {
        Self {
            matrix,
            children: Vec::new(),
        }
    }

    /// Append a child; `None` is ignored, leaving the transform empty
    pub fn add_child(&mut self, child: Option<Node>) {
        self.children.extend(child);
    }
}

/// Reference to an external model asset
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRef {
    pub uri: String,
    /// File resolved from the session's model catalogue
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Group(Vec<Node>),
    Transform(MatrixTransform),
    Geometry(Geometry),
    Model(ModelRef),
}

// ============================================================================
// 3. Traversal helpers
// ============================================================================

/// Counts gathered over a node tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    pub nodes: usize,
    pub transforms: usize,
    pub meshes: usize,
    pub vertices: usize,
    pub models: usize,
}

impl Node {
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Group(children) => children,
            Node::Transform(t) => &t.children,
            Node::Geometry(_) | Node::Model(_) => &[],
        }
    }

    pub fn as_transform(&self) -> Option<&MatrixTransform> {
        match self {
            Node::Transform(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&Geometry> {
        match self {
            Node::Geometry(g) => Some(g),
            _ => None,
        }
    }

    pub fn stats(&self) -> NodeStats {
        let mut stats = NodeStats::default();
        self.accumulate(&mut stats);
        stats
    }

    fn accumulate(&self, stats: &mut NodeStats) {
        stats.nodes += 1;
        match self {
            Node::Transform(_) => stats.transforms += 1,
            Node::Geometry(g) => {
                stats.meshes += g.meshes.len();
                stats.vertices += g.meshes.iter().map(|m| m.positions.len()).sum::<usize>();
            }
            Node::Model(_) => stats.models += 1,
            Node::Group(_) => {}
        }
        for child in self.children() {
            child.accumulate(stats);
        }
    }

    /// Every mesh vertex with all enclosing transforms applied, in double
    /// precision. Model references contribute their placement origin.
    pub fn world_vertices(&self) -> Vec<DVec3> {
        let mut out = Vec::new();
        self.collect_world_vertices(DMat4::IDENTITY, &mut out);
        out
    }

    fn collect_world_vertices(&self, parent: DMat4, out: &mut Vec<DVec3>) {
        match self {
            Node::Group(children) => {
                for child in children {
                    child.collect_world_vertices(parent, out);
                }
            }
            Node::Transform(t) => {
                let matrix = parent * t.matrix;
                for child in &t.children {
                    child.collect_world_vertices(matrix, out);
                }
            }
            Node::Geometry(g) => out.extend(
                g.meshes
                    .iter()
                    .flat_map(|m| m.positions.iter())
                    .map(|p| parent.transform_point3(p.as_dvec3())),
            ),
            Node::Model(_) => out.push(parent.transform_point3(DVec3::ZERO)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Node {
        Node::Geometry(Geometry {
            name: Some("tri".to_string()),
            meshes: vec![Mesh::sequential(
                Topology::Triangles,
                vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                Rgba::WHITE,
                1.0,
            )],
        })
    }

    #[test]
    fn test_add_none_child_leaves_transform_empty() {
        let mut t = MatrixTransform::new(DMat4::IDENTITY);
        t.add_child(None);
        assert!(t.children.is_empty());
        t.add_child(Some(triangle()));
        assert_eq!(t.children.len(), 1);
    }

    #[test]
    fn test_stats_and_world_vertices() {
        let mut t = MatrixTransform::new(DMat4::from_translation(DVec3::new(100.0, 0.0, 0.0)));
        t.add_child(Some(triangle()));
        let root = Node::Group(vec![
            Node::Transform(t),
            Node::Model(ModelRef {
                uri: "tree".to_string(),
                path: None,
            }),
        ]);

        let stats = root.stats();
        assert_eq!(stats.nodes, 4);
        assert_eq!(stats.transforms, 1);
        assert_eq!(stats.meshes, 1);
        assert_eq!(stats.vertices, 3);
        assert_eq!(stats.models, 1);

        let verts = root.world_vertices();
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[1], DVec3::new(101.0, 0.0, 0.0));
        assert_eq!(verts[3], DVec3::ZERO);
    }
}
