//! Crossing reduction between adjacent ranks.

use std::cmp::Ordering;

/// Adjacency between neighbouring ranks, one entry per chain segment.
#[derive(Debug, Clone, Default)]
pub(super) struct LayerLinks {
    pub upper: Vec<Vec<usize>>,
    pub lower: Vec<Vec<usize>>,
}

impl LayerLinks {
    pub fn from_chains(vertex_count: usize, chains: &[Vec<usize>]) -> Self {
        let mut upper = vec![Vec::new(); vertex_count];
        let mut lower = vec![Vec::new(); vertex_count];
        for chain in chains {
            for pair in chain.windows(2) {
                lower[pair[0]].push(pair[1]);
                upper[pair[1]].push(pair[0]);
            }
        }
        Self { upper, lower }
    }
}

/// Reorders every rank in place with alternating median sweeps and keeps the
/// ordering with the fewest crossings seen. Runs at most `passes` sweeps.
/// Returns the crossing count of the kept ordering.
pub(super) fn order_ranks(
    rank_nodes: &mut [Vec<usize>],
    links: &LayerLinks,
    passes: usize,
) -> usize {
    let vertex_count = links.upper.len();
    let mut positions = vec![0usize; vertex_count];
    update_positions(rank_nodes, &mut positions);

    let mut best = rank_nodes.to_vec();
    let mut best_crossings = count_crossings(rank_nodes, links, &positions);
    if rank_nodes.len() <= 1 || best_crossings == 0 {
        return best_crossings;
    }

    for _ in 0..passes.max(1) {
        for rank in 1..rank_nodes.len() {
            sort_bucket(&mut rank_nodes[rank], &links.upper, &positions);
            update_positions(rank_nodes, &mut positions);
        }
        for rank in (0..rank_nodes.len() - 1).rev() {
            sort_bucket(&mut rank_nodes[rank], &links.lower, &positions);
            update_positions(rank_nodes, &mut positions);
        }

        let crossings = count_crossings(rank_nodes, links, &positions);
        if crossings < best_crossings {
            best_crossings = crossings;
            best = rank_nodes.to_vec();
            if crossings == 0 {
                break;
            }
        }
    }

    for (slot, kept) in rank_nodes.iter_mut().zip(best) {
        *slot = kept;
    }
    best_crossings
}

fn update_positions(rank_nodes: &[Vec<usize>], positions: &mut [usize]) {
    for bucket in rank_nodes {
        for (idx, vertex) in bucket.iter().enumerate() {
            positions[*vertex] = idx;
        }
    }
}

/// Stable sort by neighbour median. Vertices without neighbours on the
/// reference side keep their current slot as the key; ties fall back to the
/// current slot and then to vertex index (declaration order).
fn sort_bucket(bucket: &mut [usize], neighbors: &[Vec<usize>], positions: &[usize]) {
    if bucket.len() <= 1 {
        return;
    }
    let mut keyed: Vec<(f32, usize, usize)> = bucket
        .iter()
        .map(|vertex| {
            let current = positions[*vertex];
            let score = median_position(&neighbors[*vertex], positions).unwrap_or(current as f32);
            (score, current, *vertex)
        })
        .collect();
    keyed.sort_by(|a, b| match a.0.partial_cmp(&b.0) {
        Some(Ordering::Equal) | None => a.1.cmp(&b.1).then(a.2.cmp(&b.2)),
        Some(ordering) => ordering,
    });
    for (slot, (_, _, vertex)) in bucket.iter_mut().zip(keyed) {
        *slot = vertex;
    }
}

pub(super) fn median_position(neighbors: &[usize], positions: &[usize]) -> Option<f32> {
    if neighbors.is_empty() {
        return None;
    }
    let mut values: Vec<usize> = neighbors.iter().map(|n| positions[*n]).collect();
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid] as f32)
    } else {
        Some((values[mid - 1] + values[mid]) as f32 * 0.5)
    }
}

/// Total number of segment crossings between every pair of adjacent ranks.
pub(super) fn count_crossings(
    rank_nodes: &[Vec<usize>],
    links: &LayerLinks,
    positions: &[usize],
) -> usize {
    let mut total = 0;
    for bucket in rank_nodes.iter().take(rank_nodes.len().saturating_sub(1)) {
        let mut segments: Vec<(usize, usize)> = Vec::new();
        for vertex in bucket {
            for next in &links.lower[*vertex] {
                segments.push((positions[*vertex], positions[*next]));
            }
        }
        segments.sort_unstable();
        for (idx, a) in segments.iter().enumerate() {
            for b in &segments[idx + 1..] {
                if a.0 < b.0 && a.1 > b.1 {
                    total += 1;
                }
            }
        }
    }
    total
}
