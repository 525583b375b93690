//! Build an 8-connected graph over a synthetic image and walk its cheapest path
//!
//! The shortest path runs in aprender; the result is mapped back to pixels.
//!
//! Run with: `RUST_LOG=grid_graph=debug cargo run --example grid_to_graph --features aprender`

use grid_graph::{GraphBuilder, Neighborhood, OffsetPolicy, SampleFn, VertexId};
use tracing::info;

const WIDTH: usize = 24;
const HEIGHT: usize = 16;

/// Dark background with a bright ring; crossing the ring is expensive
fn ring_image() -> anyhow::Result<grid_graph::DenseGrid<u8, 2>> {
    let (cx, cy) = (WIDTH as f64 / 2.0, HEIGHT as f64 / 2.0);
    let image = grid_graph::DenseGrid::from_fn([WIDTH, HEIGHT], |[x, y]| {
        let r = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt();
        if (5.0..6.5).contains(&r) {
            250
        } else {
            10
        }
    })?;
    Ok(image)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("grid_to_graph=info".parse()?),
        )
        .init();

    let image = ring_image()?;

    // Gradient cost: small steps inside flat regions, large across the ring
    let metric = SampleFn(|a: u8, b: u8| 1.0 + f32::from(a.abs_diff(b)));
    let mut builder = GraphBuilder::new().with_metric(metric);
    builder.set_input(&image);
    builder.set_neighborhood(Neighborhood::moore(OffsetPolicy::Ordered));
    let graph = builder.build()?;

    info!(
        "{}x{} image -> {} vertices, {} edges",
        WIDTH,
        HEIGHT,
        graph.num_vertices(),
        graph.num_edges()
    );

    // center of the ring to the top-left corner
    let start = graph
        .vertex(&[WIDTH as i64 / 2, HEIGHT as i64 / 2])
        .ok_or_else(|| anyhow::anyhow!("center outside image"))?;
    let goal = VertexId(0);
    let (path, cost) = graph
        .to_aprender()
        .dijkstra(start.0 as usize, goal.0 as usize)
        .ok_or_else(|| anyhow::anyhow!("no path from {start:?} to {goal:?}"))?;
    let path = path
        .into_iter()
        .map(|v| u32::try_from(v).map(VertexId))
        .collect::<Result<Vec<_>, _>>()?;

    info!("cheapest path has {} steps, cost {:.1}", path.len() - 1, cost);
    for index in graph.path_to_coordinates(&path)? {
        info!("  {:?}", index);
    }
    Ok(())
}
