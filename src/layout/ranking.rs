use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::graph::RankGraph;

/// Ranking of a [`RankGraph`] plus the per-link orientation used to get it.
#[derive(Debug, Clone, Default)]
pub(super) struct Ranking {
    /// Rank per vertex, dummies included once links are split.
    pub ranks: Vec<usize>,
    /// Links that point against the processing order and were flipped.
    pub reversed: Vec<bool>,
    /// Vertex chain per link, ordered from the lower rank to the higher one,
    /// endpoints included.
    pub chains: Vec<Vec<usize>>,
}

impl Ranking {
    pub fn max_rank(&self) -> usize {
        self.ranks.iter().copied().max().unwrap_or(0)
    }

    /// Vertices grouped by rank, each bucket in vertex order.
    pub fn buckets(&self) -> Vec<Vec<usize>> {
        let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); self.max_rank() + 1];
        for (vertex, rank) in self.ranks.iter().enumerate() {
            buckets[*rank].push(vertex);
        }
        buckets
    }
}

/// Deterministic topological order of the real vertices. When every remaining
/// vertex still has unprocessed predecessors, the earliest-declared vertex of
/// a cycle whose outside predecessors are all processed is promoted. Only its
/// incoming links from inside that cycle become back-edges.
pub(super) fn processing_order(graph: &RankGraph) -> Vec<usize> {
    let count = graph.real_vertices;
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut indeg: Vec<usize> = vec![0; count];
    for link in &graph.links {
        outgoing[link.from].push(link.to);
        indeg[link.to] += 1;
    }

    let component = component_ids(&outgoing);
    let component_count = component.iter().max().map_or(0, |last| last + 1);
    // Links entering a component from another one whose source is unprocessed.
    let mut pending_entries = vec![0usize; component_count];
    for link in &graph.links {
        if component[link.from] != component[link.to] {
            pending_entries[component[link.to]] += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
    for (vertex, deg) in indeg.iter().enumerate() {
        if *deg == 0 {
            ready.push(Reverse(vertex));
        }
    }

    let mut order = Vec::with_capacity(count);
    let mut processed = vec![false; count];
    loop {
        while let Some(Reverse(vertex)) = ready.pop() {
            if processed[vertex] {
                continue;
            }
            order.push(vertex);
            processed[vertex] = true;
            for &next in &outgoing[vertex] {
                if component[next] != component[vertex] {
                    let entries = &mut pending_entries[component[next]];
                    *entries = entries.saturating_sub(1);
                }
                if processed[next] {
                    continue;
                }
                indeg[next] = indeg[next].saturating_sub(1);
                if indeg[next] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        if order.len() >= count {
            break;
        }

        let promoted = (0..count)
            .find(|&vertex| !processed[vertex] && pending_entries[component[vertex]] == 0)
            .or_else(|| (0..count).find(|&vertex| !processed[vertex]));
        let Some(vertex) = promoted else {
            break;
        };
        ready.push(Reverse(vertex));
    }

    order
}

/// Strongly connected component id per vertex, computed with an iterative
/// Tarjan walk in vertex order.
fn component_ids(outgoing: &[Vec<usize>]) -> Vec<usize> {
    const UNVISITED: usize = usize::MAX;
    let count = outgoing.len();
    let mut index = vec![UNVISITED; count];
    let mut low = vec![0usize; count];
    let mut on_stack = vec![false; count];
    let mut stack: Vec<usize> = Vec::new();
    let mut component = vec![UNVISITED; count];
    let mut next_index = 0usize;
    let mut next_component = 0usize;
    // (vertex, next outgoing slot to visit)
    let mut frames: Vec<(usize, usize)> = Vec::new();

    for root in 0..count {
        if index[root] != UNVISITED {
            continue;
        }
        index[root] = next_index;
        low[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;
        frames.push((root, 0));

        while let Some(frame) = frames.last_mut() {
            let vertex = frame.0;
            if let Some(&next) = outgoing[vertex].get(frame.1) {
                frame.1 += 1;
                if index[next] == UNVISITED {
                    index[next] = next_index;
                    low[next] = next_index;
                    next_index += 1;
                    stack.push(next);
                    on_stack[next] = true;
                    frames.push((next, 0));
                } else if on_stack[next] {
                    low[vertex] = low[vertex].min(index[next]);
                }
                continue;
            }

            frames.pop();
            if low[vertex] == index[vertex] {
                while let Some(member) = stack.pop() {
                    on_stack[member] = false;
                    component[member] = next_component;
                    if member == vertex {
                        break;
                    }
                }
                next_component += 1;
            }
            if let Some(parent) = frames.last() {
                let parent = parent.0;
                low[parent] = low[parent].min(low[vertex]);
            }
        }
    }

    component
}

/// Longest-path ranking over the graph with back-edges flipped. Vertices with
/// no incoming links land on rank 0, so every disconnected component starts
/// at the origin.
pub(super) fn assign_ranks(graph: &RankGraph) -> Ranking {
    let count = graph.real_vertices;
    let order = processing_order(graph);
    let mut position = vec![0usize; count];
    for (idx, vertex) in order.iter().enumerate() {
        position[*vertex] = idx;
    }

    let mut reversed = Vec::with_capacity(graph.links.len());
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); count];
    for link in &graph.links {
        let flip = position[link.to] < position[link.from];
        reversed.push(flip);
        let (upper, lower) = if flip {
            (link.to, link.from)
        } else {
            (link.from, link.to)
        };
        incoming[lower].push(upper);
    }

    let mut ranks = vec![0usize; count];
    for &vertex in &order {
        let rank = incoming[vertex]
            .iter()
            .map(|upper| ranks[*upper] + 1)
            .max()
            .unwrap_or(0);
        ranks[vertex] = rank;
    }

    Ranking {
        ranks,
        reversed,
        chains: Vec::new(),
    }
}

/// Splits links spanning more than one rank with zero-size dummies so that
/// every segment joins adjacent ranks.
pub(super) fn split_long_links(graph: &mut RankGraph, ranking: &mut Ranking) {
    let mut chains = Vec::with_capacity(graph.links.len());
    for idx in 0..graph.links.len() {
        let link = &graph.links[idx];
        let (upper, lower) = if ranking.reversed[idx] {
            (link.to, link.from)
        } else {
            (link.from, link.to)
        };
        let upper_rank = ranking.ranks[upper];
        let lower_rank = ranking.ranks[lower];

        let mut chain = vec![upper];
        for rank in (upper_rank + 1)..lower_rank {
            let dummy = graph.add_dummy();
            ranking.ranks.push(rank);
            debug_assert_eq!(ranking.ranks.len(), dummy + 1);
            chain.push(dummy);
        }
        chain.push(lower);
        chains.push(chain);
    }
    ranking.chains = chains;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Diagram, NodeKind};
    use crate::layout::types::LayoutDiagnostics;
    use crate::size::HeuristicSizer;

    fn graph_of(ids: &[&str], edges: &[(&str, &str)]) -> RankGraph {
        let mut diagram = Diagram::new();
        for id in ids {
            diagram.add_node(id, NodeKind::Task, id);
        }
        for (from, to) in edges {
            diagram.add_edge(from, to);
        }
        let mut diagnostics = LayoutDiagnostics::default();
        RankGraph::build(&diagram, &HeuristicSizer, &mut diagnostics)
    }

    fn outgoing_of(graph: &RankGraph) -> Vec<Vec<usize>> {
        let mut outgoing = vec![Vec::new(); graph.real_vertices];
        for link in &graph.links {
            outgoing[link.from].push(link.to);
        }
        outgoing
    }

    #[test]
    fn ranks_chain_by_depth() {
        let graph = graph_of(
            &["A", "B", "C", "D", "E"],
            &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E")],
        );
        let ranking = assign_ranks(&graph);
        assert_eq!(ranking.ranks, vec![0, 1, 2, 3, 4]);
        assert!(ranking.reversed.iter().all(|flip| !flip));
    }

    #[test]
    fn breaks_three_cycle_with_one_back_edge() {
        let graph = graph_of(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        let ranking = assign_ranks(&graph);
        assert_eq!(ranking.ranks, vec![0, 1, 2]);
        assert_eq!(ranking.reversed, vec![false, false, true]);
    }

    #[test]
    fn vertex_downstream_of_cycle_keeps_its_link() {
        // `sink` is declared first but only hangs off the X/Y cycle.
        let graph = graph_of(&["sink", "X", "Y"], &[("X", "Y"), ("Y", "X"), ("Y", "sink")]);
        let ranking = assign_ranks(&graph);
        assert_eq!(ranking.ranks, vec![2, 0, 1]);
        assert_eq!(ranking.reversed, vec![false, true, false]);
    }

    #[test]
    fn flipped_links_stay_inside_their_cycle() {
        let graph = graph_of(
            &["out", "A", "B", "C", "D", "E"],
            &[
                ("A", "B"),
                ("B", "C"),
                ("C", "A"),
                ("C", "out"),
                ("D", "E"),
                ("E", "D"),
                ("out", "D"),
            ],
        );
        let ranking = assign_ranks(&graph);
        let component = component_ids(&outgoing_of(&graph));
        let flipped: Vec<usize> = (0..graph.links.len())
            .filter(|idx| ranking.reversed[*idx])
            .collect();
        assert_eq!(flipped.len(), 2, "one back-edge per cycle");
        for idx in flipped {
            let link = &graph.links[idx];
            assert_eq!(component[link.from], component[link.to], "link {idx}");
        }
    }

    #[test]
    fn components_group_cycle_members() {
        let graph = graph_of(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("B", "A"), ("B", "C"), ("C", "D"), ("D", "C")],
        );
        let component = component_ids(&outgoing_of(&graph));
        assert_eq!(component[0], component[1]);
        assert_eq!(component[2], component[3]);
        assert_ne!(component[0], component[2]);
    }

    #[test]
    fn components_start_at_rank_zero() {
        let graph = graph_of(&["A", "B", "C", "D"], &[("A", "B"), ("C", "D")]);
        let ranking = assign_ranks(&graph);
        assert_eq!(ranking.ranks, vec![0, 1, 0, 1]);
    }

    #[test]
    fn declaration_order_does_not_outrank_dependencies() {
        let graph = graph_of(&["D", "C", "B", "A"], &[("A", "B"), ("B", "C"), ("C", "D")]);
        let ranking = assign_ranks(&graph);
        assert_eq!(ranking.ranks, vec![3, 2, 1, 0]);
    }

    #[test]
    fn flipped_links_never_share_a_rank() {
        // C reaches A only through a back-edge while C itself sits in a
        // second cycle with E.
        let graph = graph_of(
            &["A", "B", "C", "E"],
            &[("A", "B"), ("B", "A"), ("C", "A"), ("E", "C"), ("C", "E")],
        );
        let ranking = assign_ranks(&graph);
        for (idx, link) in graph.links.iter().enumerate() {
            assert_ne!(
                ranking.ranks[link.from], ranking.ranks[link.to],
                "link {idx} collapsed onto one rank"
            );
        }
    }

    #[test]
    fn long_links_get_dummies() {
        let mut graph = graph_of(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("A", "C")]);
        let mut ranking = assign_ranks(&graph);
        split_long_links(&mut graph, &mut ranking);
        assert_eq!(graph.vertices.len(), 4);
        assert!(graph.vertices[3].is_dummy());
        assert_eq!(ranking.ranks[3], 1);
        assert_eq!(ranking.chains[2], vec![0, 3, 2]);
        assert_eq!(ranking.chains[0], vec![0, 1]);
    }

    #[test]
    fn reversed_chain_runs_from_upper_vertex() {
        let mut graph = graph_of(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")],
        );
        let mut ranking = assign_ranks(&graph);
        split_long_links(&mut graph, &mut ranking);
        assert!(ranking.reversed[3]);
        let chain = &ranking.chains[3];
        assert_eq!(chain.first(), Some(&0));
        assert_eq!(chain.last(), Some(&3));
        assert_eq!(chain.len(), 4);
    }

    #[test]
    fn buckets_group_by_rank() {
        let graph = graph_of(&["A", "B", "C"], &[("A", "B"), ("A", "C")]);
        let ranking = assign_ranks(&graph);
        assert_eq!(ranking.buckets(), vec![vec![0], vec![1, 2]]);
    }
}
