//! Coordinate assignment in rank space.
//!
//! Everything here works on a `(cross, main)` pair per vertex: `main` runs
//! along the rank axis and `cross` within a rank. [`to_screen`] maps the pair
//! onto x/y for a given [`Direction`].

use crate::config::LayoutOptions;
use crate::ir::{Direction, Point, Size};

use super::graph::Vertex;
use super::ordering::LayerLinks;

const BALANCE_PASSES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct RankPoint {
    pub cross: f32,
    pub main: f32,
}

/// Extent of a box along the (cross, main) axes for a direction.
pub(super) fn axis_extent(size: Size, direction: Direction) -> (f32, f32) {
    if direction.is_horizontal() {
        (size.height, size.width)
    } else {
        (size.width, size.height)
    }
}

pub(super) fn to_screen(point: RankPoint, direction: Direction) -> Point {
    match direction {
        Direction::TopDown => Point::new(point.cross, point.main),
        Direction::BottomTop => Point::new(point.cross, -point.main),
        Direction::LeftRight => Point::new(point.main, point.cross),
        Direction::RightLeft => Point::new(-point.main, point.cross),
    }
}

/// Center of every vertex in rank space.
pub(super) fn assign_coordinates(
    rank_nodes: &[Vec<usize>],
    vertices: &[Vertex],
    links: &LayerLinks,
    options: &LayoutOptions,
) -> Vec<RankPoint> {
    let direction = options.direction;
    let extents: Vec<(f32, f32)> = vertices
        .iter()
        .map(|vertex| axis_extent(vertex.size, direction))
        .collect();

    let mut centers = vec![
        RankPoint {
            cross: 0.0,
            main: 0.0,
        };
        vertices.len()
    ];

    let mut main_cursor = 0.0f32;
    for bucket in rank_nodes {
        let thickness = bucket
            .iter()
            .map(|vertex| extents[*vertex].1)
            .fold(0.0f32, f32::max);
        for vertex in bucket {
            centers[*vertex].main = main_cursor + thickness / 2.0;
        }
        main_cursor += thickness + options.rank_spacing;
    }

    let mut cross: Vec<f32> = vec![0.0; vertices.len()];
    for bucket in rank_nodes {
        pack_centered(bucket, &extents, options.node_spacing, &mut cross);
    }

    for _ in 0..BALANCE_PASSES {
        for bucket in rank_nodes.iter().skip(1) {
            balance_bucket(bucket, &links.upper, &extents, options.node_spacing, &mut cross);
        }
        for bucket in rank_nodes.iter().rev().skip(1) {
            balance_bucket(bucket, &links.lower, &extents, options.node_spacing, &mut cross);
        }
    }

    for (center, value) in centers.iter_mut().zip(cross) {
        center.cross = value;
    }
    centers
}

/// Minimum center distance between two in-rank neighbours: their half
/// extents plus the node separation as a clear gap.
fn min_separation(a: usize, b: usize, extents: &[(f32, f32)], node_spacing: f32) -> f32 {
    extents[a].0 / 2.0 + extents[b].0 / 2.0 + node_spacing
}

/// Packs a rank tightly and centers it on the cross-axis origin.
fn pack_centered(bucket: &[usize], extents: &[(f32, f32)], node_spacing: f32, cross: &mut [f32]) {
    let Some((&first, rest)) = bucket.split_first() else {
        return;
    };
    cross[first] = 0.0;
    let mut prev = first;
    for &vertex in rest {
        cross[vertex] = cross[prev] + min_separation(prev, vertex, extents, node_spacing);
        prev = vertex;
    }
    let span = cross[prev] - cross[first];
    for vertex in bucket {
        cross[*vertex] -= span / 2.0;
    }
}

/// Pulls each vertex toward the mean center of its neighbours on the
/// reference rank, then restores the separation constraints. The result is
/// the average of a left-to-right and a right-to-left projection, both of
/// which keep the rank order and spacing.
fn balance_bucket(
    bucket: &[usize],
    neighbors: &[Vec<usize>],
    extents: &[(f32, f32)],
    node_spacing: f32,
    cross: &mut [f32],
) {
    if bucket.is_empty() {
        return;
    }
    let desired: Vec<f32> = bucket
        .iter()
        .map(|vertex| {
            let list = &neighbors[*vertex];
            if list.is_empty() {
                cross[*vertex]
            } else {
                list.iter().map(|n| cross[*n]).sum::<f32>() / list.len() as f32
            }
        })
        .collect();

    let count = bucket.len();
    let mut forward = desired.clone();
    for idx in 1..count {
        let gap = min_separation(bucket[idx - 1], bucket[idx], extents, node_spacing);
        forward[idx] = forward[idx].max(forward[idx - 1] + gap);
    }
    let mut backward = desired;
    for idx in (0..count - 1).rev() {
        let gap = min_separation(bucket[idx], bucket[idx + 1], extents, node_spacing);
        backward[idx] = backward[idx].min(backward[idx + 1] - gap);
    }
    for (idx, vertex) in bucket.iter().enumerate() {
        cross[*vertex] = (forward[idx] + backward[idx]) / 2.0;
    }
}
