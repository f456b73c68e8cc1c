use archdiagram_layout::config::LayoutOptions;
use archdiagram_layout::ir::{Diagram, Direction, NodeKind};
use archdiagram_layout::layout::compute_layout;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn dense_diagram(nodes: usize, extra_edges: usize) -> Diagram {
    let mut diagram = Diagram::new();
    if nodes == 0 {
        return diagram;
    }
    for i in 0..nodes {
        diagram.add_node(&format!("N{i}"), NodeKind::Task, &format!("Node {i}"));
    }
    for i in 0..nodes.saturating_sub(1) {
        diagram.add_edge(&format!("N{i}"), &format!("N{}", i + 1));
    }
    let mut count = 0usize;
    for i in 0..nodes {
        for j in (i + 2)..nodes {
            if count >= extra_edges {
                break;
            }
            diagram.add_edge(&format!("N{i}"), &format!("N{j}"));
            count += 1;
        }
        if count >= extra_edges {
            break;
        }
    }
    diagram
}

/// Rows of services feeding the next row, with every row's tail looping back
/// to its head so ranking has cycles to break.
fn grid_feedback_diagram(rows: usize, cols: usize) -> Diagram {
    let mut diagram = Diagram::new();
    for r in 0..rows {
        for c in 0..cols {
            diagram.add_node(&format!("R{r}C{c}"), NodeKind::Service, &format!("svc {r}.{c}"));
        }
    }
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                diagram.add_edge(&format!("R{r}C{c}"), &format!("R{r}C{}", c + 1));
            }
            if r + 1 < rows {
                diagram.add_edge(&format!("R{r}C{c}"), &format!("R{}C{}", r + 1, (c * 7 + 3) % cols));
            }
        }
        if cols > 1 {
            diagram.add_edge(&format!("R{r}C{}", cols - 1), &format!("R{r}C0"));
        }
    }
    diagram
}

fn sparse_components_diagram(components: usize, size: usize) -> Diagram {
    let mut diagram = Diagram::new();
    for k in 0..components {
        for i in 0..size {
            let kind = match i % 4 {
                0 => NodeKind::StartEvent,
                1 => NodeKind::Gateway,
                2 => NodeKind::Database,
                _ => NodeKind::Api,
            };
            diagram.add_node(&format!("K{k}N{i}"), kind, "");
        }
        for i in 1..size {
            diagram.add_edge(&format!("K{k}N{}", i / 2), &format!("K{k}N{i}"));
        }
    }
    diagram
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let options = LayoutOptions::default();
    let cases = [
        ("dense_20", dense_diagram(20, 40)),
        ("dense_80", dense_diagram(80, 200)),
        ("dense_200", dense_diagram(200, 600)),
        ("grid_feedback_8x8", grid_feedback_diagram(8, 8)),
        ("sparse_components_30x12", sparse_components_diagram(30, 12)),
    ];
    for (name, diagram) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), diagram, |b, data| {
            b.iter(|| {
                let layout = compute_layout(black_box(data), &options);
                black_box(layout.width);
            });
        });
    }
    group.finish();
}

fn bench_directions(c: &mut Criterion) {
    let mut group = c.benchmark_group("directions");
    let diagram = grid_feedback_diagram(6, 6);
    for direction in [
        Direction::TopDown,
        Direction::LeftRight,
        Direction::BottomTop,
        Direction::RightLeft,
    ] {
        let options = LayoutOptions::default().with_direction(direction);
        group.bench_with_input(
            BenchmarkId::from_parameter(direction.as_token()),
            &diagram,
            |b, data| {
                b.iter(|| black_box(compute_layout(black_box(data), &options).height));
            },
        );
    }
    group.finish();
}

fn bench_fixtures(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixtures");
    let options = LayoutOptions::default();
    for (name, json) in [
        (
            "microservices",
            include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/tests/fixtures/microservices.json"
            )),
        ),
        (
            "order_flow",
            include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/tests/fixtures/order_flow.json"
            )),
        ),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), json, |b, data| {
            b.iter(|| {
                let diagram: Diagram = serde_json::from_str(black_box(data)).expect("parse failed");
                black_box(compute_layout(&diagram, &options).nodes.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_layout, bench_directions, bench_fixtures
);
criterion_main!(benches);
