//! Layered layout for architecture and process diagrams.
//!
//! One call builds a fresh ranked graph from the snapshot, assigns ranks with
//! back-edges flipped, splits long links with dummies, reduces crossings with
//! median sweeps, assigns coordinates in rank space and finally maps them to
//! screen space for the requested direction. Nothing survives between calls.

mod graph;
mod ordering;
mod position;
mod ranking;
mod routing;
pub(crate) mod types;
pub use types::*;

use graph::RankGraph;
use ordering::{LayerLinks, order_ranks};
use position::{assign_coordinates, to_screen};
use ranking::{assign_ranks, split_long_links};
use routing::route_edges;

use crate::config::LayoutOptions;
use crate::ir::{Diagram, Point};
use crate::size::{HeuristicSizer, SizeEstimator, resolve_size};
use std::collections::BTreeMap;

pub fn compute_layout(diagram: &Diagram, options: &LayoutOptions) -> Layout {
    compute_layout_with(diagram, options, &HeuristicSizer)
}

pub fn compute_layout_with(
    diagram: &Diagram,
    options: &LayoutOptions,
    sizer: &dyn SizeEstimator,
) -> Layout {
    let options = options.sanitized();
    let direction = options.direction;
    let mut diagnostics = LayoutDiagnostics::default();

    let mut graph = RankGraph::build(diagram, sizer, &mut diagnostics);
    if graph.real_vertices == 0 {
        let mut layout = Layout::empty(direction, options.margin);
        layout.edges = diagram.edges.clone();
        layout.diagnostics = diagnostics;
        return layout;
    }

    let mut ranking = assign_ranks(&graph);
    split_long_links(&mut graph, &mut ranking);
    for (link, flipped) in graph.links.iter().zip(&ranking.reversed) {
        if *flipped {
            diagnostics.reversed_edges.extend(&link.edges);
        }
    }
    diagnostics.reversed_edges.sort_unstable();

    let mut rank_nodes = ranking.buckets();
    let links = LayerLinks::from_chains(graph.vertices.len(), &ranking.chains);
    let crossings = order_ranks(&mut rank_nodes, &links, options.order_passes);
    log::debug!(
        "layout: {} nodes, {} links, {} dummies, {} ranks, {} crossings kept",
        graph.real_vertices,
        graph.links.len(),
        graph.vertices.iter().filter(|vertex| vertex.is_dummy()).count(),
        rank_nodes.len(),
        crossings
    );

    let centers = assign_coordinates(&rank_nodes, &graph.vertices, &links, &options);
    let mut routes = route_edges(diagram, &graph, &ranking, &centers, direction);

    let mut top_left: Vec<Point> = graph
        .vertices
        .iter()
        .zip(&centers)
        .map(|(vertex, center)| {
            let screen = to_screen(*center, direction);
            Point::new(
                screen.x - vertex.size.width / 2.0,
                screen.y - vertex.size.height / 2.0,
            )
        })
        .collect();
    top_left.truncate(graph.real_vertices);

    let (width, height) = normalize_layout(&mut top_left, &graph, &mut routes, options.margin);

    let mut ranks = BTreeMap::new();
    for bucket in &rank_nodes {
        for (order, vertex) in bucket.iter().enumerate() {
            let Some(node) = graph.vertices[*vertex].node else {
                continue;
            };
            ranks.insert(
                diagram.nodes[node].id.clone(),
                RankSlot {
                    rank: ranking.ranks[*vertex],
                    order,
                },
            );
        }
    }

    let nodes = diagram
        .nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| {
            let vertex = graph.node_vertex[idx];
            let mut placed = node.clone();
            placed.size = Some(if graph.vertices[vertex].node == Some(idx) {
                graph.vertices[vertex].size
            } else {
                resolve_size(sizer, node)
            });
            placed.position = Some(top_left[vertex]);
            placed
        })
        .collect();

    Layout {
        direction,
        nodes,
        edges: diagram.edges.clone(),
        routes,
        ranks,
        width,
        height,
        diagnostics,
    }
}

/// Translates boxes and routes so the smallest coordinate on each axis sits at
/// the margin. Returns the overall extent, margin included on both sides.
fn normalize_layout(
    top_left: &mut [Point],
    graph: &RankGraph,
    routes: &mut [EdgeRoute],
    margin: f32,
) -> (f32, f32) {
    let route_points = || routes.iter().flat_map(|route| route.points.iter());
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    for point in top_left.iter().chain(route_points()) {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
    }

    let shift_x = margin - min_x;
    let shift_y = margin - min_y;
    for point in top_left.iter_mut() {
        point.x += shift_x;
        point.y += shift_y;
    }
    for route in routes.iter_mut() {
        for point in route.points.iter_mut() {
            point.x += shift_x;
            point.y += shift_y;
        }
    }

    let mut max_x: f32 = 0.0;
    let mut max_y: f32 = 0.0;
    for (point, vertex) in top_left.iter().zip(&graph.vertices) {
        max_x = max_x.max(point.x + vertex.size.width);
        max_y = max_y.max(point.y + vertex.size.height);
    }
    for route in routes.iter() {
        for point in &route.points {
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
    }
    (max_x + margin, max_y + margin)
}
