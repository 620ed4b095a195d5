//! Reproject a large synthetic layer sequentially and in parallel.
//!
//! Run with: cargo run --release --example parallel_projection --features parallel

use std::time::Instant;
use trail_stitcher::projection::{mercator_from_lon_lat, project_paths, project_paths_parallel};
use trail_stitcher::{stitch_segments, ChainConfig};

fn main() {
    // 5,000 consecutive legs of 200 points heading north-east from Springer
    let legs = 5_000;
    let per_leg = 200;
    let step = 0.0001;

    let paths: Vec<Vec<[f64; 2]>> = (0..legs)
        .map(|leg| {
            (0..per_leg)
                .map(|i| {
                    let k = (leg * (per_leg - 1) + i) as f64;
                    let (x, y) =
                        mercator_from_lon_lat(-84.1927 + k * step, 34.6295 + k * step * 0.5);
                    [x, y]
                })
                .collect()
        })
        .rev()
        .collect();

    println!("Projecting {} paths ({} points)\n", paths.len(), legs * per_leg);

    let start = Instant::now();
    let sequential = project_paths(&paths);
    println!("Sequential: {:?}", start.elapsed());

    let start = Instant::now();
    let parallel = project_paths_parallel(&paths);
    println!("Parallel:   {:?}", start.elapsed());

    assert_eq!(sequential, parallel);

    let start = Instant::now();
    match stitch_segments(&parallel, &ChainConfig::default()) {
        Ok(chain) => println!(
            "\nStitched {} / {} segments into {} points in {:?} ({:?})",
            chain.used_count(),
            chain.total_segments,
            chain.points.len(),
            start.elapsed(),
            chain.termination
        ),
        Err(e) => eprintln!("Stitching failed: {}", e),
    }
}
