use std::collections::BTreeMap;

use serde::Serialize;

use crate::ir::{DiagramEdge, DiagramNode, Direction, Point};

/// Layer and in-layer position the engine settled on for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankSlot {
    pub rank: usize,
    pub order: usize,
}

/// Polyline for one input edge, from the source boundary to the target boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRoute {
    pub edge: usize,
    pub from: String,
    pub to: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEdge {
    pub edge: usize,
    pub from: String,
    pub to: String,
    pub missing: Vec<String>,
}

/// Contract violations and repairs observed during one layout call.
/// Indices refer to positions in the caller's node and edge lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutDiagnostics {
    pub skipped_edges: Vec<SkippedEdge>,
    pub reversed_edges: Vec<usize>,
    pub self_loops: Vec<usize>,
    pub duplicate_edges: Vec<usize>,
    pub duplicate_nodes: Vec<usize>,
}

impl LayoutDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.skipped_edges.is_empty() && self.duplicate_nodes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub direction: Direction,
    /// Input nodes in input order with `size` and `position` filled in.
    pub nodes: Vec<DiagramNode>,
    /// Input edges, unchanged.
    pub edges: Vec<DiagramEdge>,
    pub routes: Vec<EdgeRoute>,
    pub ranks: BTreeMap<String, RankSlot>,
    pub width: f32,
    pub height: f32,
    pub diagnostics: LayoutDiagnostics,
}

impl Layout {
    pub(crate) fn empty(direction: Direction, margin: f32) -> Self {
        Self {
            direction,
            nodes: Vec::new(),
            edges: Vec::new(),
            routes: Vec::new(),
            ranks: BTreeMap::new(),
            width: margin * 2.0,
            height: margin * 2.0,
            diagnostics: LayoutDiagnostics::default(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.node(id).and_then(|node| node.position)
    }

    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.ranks.get(id).map(|slot| slot.rank)
    }

    pub fn route(&self, edge: usize) -> Option<&EdgeRoute> {
        self.routes.iter().find(|route| route.edge == edge)
    }
}
