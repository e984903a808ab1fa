//! Build an irregular quad grid and print what came out.
//!
//! Usage: cargo run --example irregular_grid [SEED] [SUBDIVISIONS]
//!
//! Set `RUST_LOG=debug` to see each stage of the pipeline.

use std::collections::BTreeMap;

use quadrille::algo::grid::{irregular_grid, GridOptions};
use quadrille::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let subdivisions = args.next().and_then(|s| s.parse().ok()).unwrap_or(2);

    let options = GridOptions::default()
        .with_seed(seed)
        .with_subdivisions(subdivisions);
    let mesh: HalfEdgeMesh = irregular_grid(&options)?;

    println!("Seed:         {}", options.seed);
    println!("Vertices:     {}", mesh.num_vertices());
    println!("Edges:        {}", mesh.num_edges());
    println!("Quads:        {}", mesh.num_faces());
    println!("Boundary:     {} edges", mesh.boundary_loops().iter().map(Vec::len).sum::<usize>());

    let mut valences: BTreeMap<usize, usize> = BTreeMap::new();
    for v in mesh.vertex_ids().filter(|&v| !mesh.is_outer_vertex(v)) {
        *valences.entry(mesh.valence(v)).or_default() += 1;
    }
    println!("Interior valence:");
    for (valence, count) in valences {
        println!("  {:>2}: {}", valence, count);
    }

    // Walk the first face the way a viewer would draw it
    if let Some(f) = mesh.face_ids().next() {
        let mut cursor = mesh.boundary_cursor(f);
        println!("Face {:?}:", f);
        loop {
            let (from, to) = cursor.segment(&mesh);
            println!(
                "  ({:.3}, {:.3}) -> ({:.3}, {:.3})",
                from.x, from.z, to.x, to.z
            );
            if cursor.advance(&mesh) {
                break;
            }
        }
    }

    let report = mesh.validate();
    if report.is_empty() {
        println!("Topology:     valid");
    } else {
        println!("Topology:     {} issues", report.len());
    }
    Ok(())
}
