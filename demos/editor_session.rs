//! Drive the editor model the way a canvas would.
//!
//! Run with `RUST_LOG=flowdag=debug cargo run --example editor_session` to see
//! every accepted and refused edit.

use flowdag::{EdgePolicy, EditorConfig, Element, FlowGraph, NodeId, Position};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = EditorConfig::from_json(r#"{ "label_prefix": "Step", "edge_policy": "gate" }"#)?;
    let mut graph = FlowGraph::with_starter_elements(config.clone());

    let ingest = NodeId::from("n1");
    let transform = NodeId::from("n2");
    let publish = graph.add_node(None);
    let logo = graph.add_image_node("blob:logo.png", Some(Position::new(320.0, 40.0)));

    graph.rename(&publish, "  Publish  ")?;
    graph.connect(&transform, &publish)?;
    graph.connect(&logo, &ingest)?;

    // Hovering Publish -> Ingest shows the drag as not allowed...
    println!("can connect publish -> ingest: {}", graph.can_connect(&publish, &ingest));

    // ...and completing the gesture anyway is refused.
    if let Err(err) = graph.connect(&publish, &ingest) {
        println!("refused: {err}");
    }

    // A canvas that draws edges optimistically uses the rollback policy.
    let mut optimistic = FlowGraph::with_starter_elements(EditorConfig {
        edge_policy: EdgePolicy::Rollback,
        ..config
    });
    if let Err(err) = optimistic.connect(&transform, &ingest) {
        println!("rolled back: {err}");
    }
    println!("edges after rollback: {}", optimistic.edge_count());

    let removed = graph.remove(&[Element::Node(transform)]);
    println!("deleted transform and {} attached edge(s)", removed - 1);

    println!("{}", serde_json::to_string_pretty(graph.nodes())?);
    Ok(())
}
