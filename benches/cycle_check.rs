use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flowdag::cycles::generic::has_cycle_fn;
use flowdag::{Edge, EdgePolicy, EditorConfig, FlowGraph, NodeId, would_create_cycle};

fn chain(len: usize) -> (Vec<String>, Vec<Edge<String>>) {
    let ids: Vec<String> = (0..len).map(|i| format!("n{i}")).collect();
    let edges = ids
        .windows(2)
        .map(|pair| Edge::new(pair[0].clone(), pair[1].clone()))
        .collect();
    (ids, edges)
}

/// Layered graph: every node links to each node of the next layer.
fn layered(layers: usize, width: usize) -> (Vec<usize>, Vec<Edge<usize>>) {
    let nodes: Vec<usize> = (0..layers * width).collect();
    let mut edges = Vec::new();
    for layer in 0..layers - 1 {
        for a in 0..width {
            for b in 0..width {
                edges.push(Edge::new(layer * width + a, (layer + 1) * width + b));
            }
        }
    }
    (nodes, edges)
}

fn bench_chain_candidates(c: &mut Criterion) {
    let (ids, edges) = chain(1_000);
    let closing = Edge::new(ids[999].clone(), ids[0].clone());
    let shortcut = Edge::new(ids[0].clone(), ids[999].clone());

    c.bench_function("chain_1000_closing_candidate", |b| {
        b.iter(|| black_box(would_create_cycle(&ids, &edges, Some(&closing))))
    });
    c.bench_function("chain_1000_shortcut_candidate", |b| {
        b.iter(|| black_box(would_create_cycle(&ids, &edges, Some(&shortcut))))
    });
}

fn bench_layered_no_candidate(c: &mut Criterion) {
    let (nodes, edges) = layered(20, 10);

    c.bench_function("layered_20x10_no_candidate", |b| {
        b.iter(|| black_box(would_create_cycle(&nodes, &edges, None)))
    });
}

fn bench_closure_adapter(c: &mut Criterion) {
    let ids: Vec<usize> = (0..500).collect();

    c.bench_function("closure_chain_500", |b| {
        b.iter(|| {
            black_box(has_cycle_fn(&ids, |&id| {
                if id + 1 < 500 { vec![id + 1] } else { vec![] }
            }))
        })
    });
}

fn bench_editor_connect(c: &mut Criterion) {
    for policy in [EdgePolicy::Gate, EdgePolicy::Rollback] {
        c.bench_function(&format!("editor_connect_100_{policy:?}"), |b| {
            b.iter(|| {
                let mut graph = FlowGraph::new(EditorConfig::with_policy(policy));
                let ids: Vec<NodeId> = (0..100).map(|_| graph.add_node(None)).collect();
                for pair in ids.windows(2) {
                    let _ = graph.connect(&pair[0], &pair[1]);
                }
                // Every back-link is refused.
                for pair in ids.windows(2) {
                    let _ = black_box(graph.connect(&pair[1], &pair[0]));
                }
                black_box(graph.edge_count())
            })
        });
    }
}

criterion_group!(
    benches,
    bench_chain_candidates,
    bench_layered_no_candidate,
    bench_closure_adapter,
    bench_editor_connect
);
criterion_main!(benches);
