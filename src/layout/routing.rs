use crate::ir::{Diagram, Direction};

use super::graph::RankGraph;
use super::position::{RankPoint, axis_extent, to_screen};
use super::ranking::Ranking;
use super::types::EdgeRoute;

const SELF_LOOP_REACH: f32 = 24.0;

/// Builds a polyline per routable input edge. Points are in screen space but
/// not yet shifted by the margin.
pub(super) fn route_edges(
    diagram: &Diagram,
    graph: &RankGraph,
    ranking: &Ranking,
    centers: &[RankPoint],
    direction: Direction,
) -> Vec<EdgeRoute> {
    let mut routes = Vec::new();
    for (idx, edge) in diagram.edges.iter().enumerate() {
        let points = if let Some(link) = graph.edge_link[idx] {
            let mut points = chain_points(&ranking.chains[link], graph, centers, direction);
            if ranking.reversed[link] {
                points.reverse();
            }
            points
        } else if let Some(vertex) = graph.self_loop_vertex[idx] {
            self_loop_points(vertex, graph, centers, direction)
        } else {
            continue;
        };
        routes.push(EdgeRoute {
            edge: idx,
            from: edge.from.clone(),
            to: edge.to.clone(),
            points: points
                .into_iter()
                .map(|point| to_screen(point, direction))
                .collect(),
        });
    }
    routes
}

/// Leaves the upper box on its rank-facing side, passes through every dummy
/// center and enters the lower box on its opposite side.
fn chain_points(
    chain: &[usize],
    graph: &RankGraph,
    centers: &[RankPoint],
    direction: Direction,
) -> Vec<RankPoint> {
    let last = chain.len().saturating_sub(1);
    chain
        .iter()
        .enumerate()
        .map(|(pos, vertex)| {
            let center = centers[*vertex];
            let (_, main_extent) = axis_extent(graph.vertices[*vertex].size, direction);
            let main = if pos == 0 {
                center.main + main_extent / 2.0
            } else if pos == last {
                center.main - main_extent / 2.0
            } else {
                center.main
            };
            RankPoint {
                cross: center.cross,
                main,
            }
        })
        .collect()
}

/// Small rectangular loop on the trailing cross-axis side of the box.
fn self_loop_points(
    vertex: usize,
    graph: &RankGraph,
    centers: &[RankPoint],
    direction: Direction,
) -> Vec<RankPoint> {
    let center = centers[vertex];
    let (cross_extent, main_extent) = axis_extent(graph.vertices[vertex].size, direction);
    let side = center.cross + cross_extent / 2.0;
    let above = center.main - main_extent / 4.0;
    let below = center.main + main_extent / 4.0;
    vec![
        RankPoint {
            cross: side,
            main: above,
        },
        RankPoint {
            cross: side + SELF_LOOP_REACH,
            main: above,
        },
        RankPoint {
            cross: side + SELF_LOOP_REACH,
            main: below,
        },
        RankPoint {
            cross: side,
            main: below,
        },
    ]
}
