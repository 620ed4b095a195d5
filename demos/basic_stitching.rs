//! Basic example of stitching unordered trail segments.
//!
//! Run with: cargo run --example basic_stitching

use trail_stitcher::{downsample, stitch_segments, ChainConfig, GpsPoint, LinkKind, Segment};

fn main() {
    // Three legs of a short trail, stored out of order.
    // The middle leg is digitized backwards and misses the joint by ~80 m.
    let legs = vec![
        vec![
            GpsPoint::new(34.70, -84.10),
            GpsPoint::new(34.75, -84.05),
            GpsPoint::new(34.80, -84.00),
        ],
        vec![
            GpsPoint::new(34.70, -84.10),
            GpsPoint::new(34.68, -84.14),
            GpsPoint::new(34.66, -84.16),
        ],
        vec![
            GpsPoint::new(34.6295, -84.1927), // Springer Mountain
            GpsPoint::new(34.645, -84.175),
            GpsPoint::new(34.6605, -84.1605),
        ],
    ];

    let segments: Vec<Segment> = legs.into_iter().filter_map(Segment::new).collect();
    let config = ChainConfig::default();

    println!("Trail Stitching Example\n");
    println!(
        "Anchor: [{}, {}], tolerance: {} deg\n",
        config.anchor.longitude, config.anchor.latitude, config.tolerance
    );

    let chain = match stitch_segments(&segments, &config) {
        Ok(chain) => chain,
        Err(e) => {
            eprintln!("Stitching failed: {}", e);
            return;
        }
    };

    for link in &chain.links {
        let how = match link.kind {
            LinkKind::Anchor { distance } => format!("start ({:.4} deg from anchor)", distance),
            LinkKind::Exact => "exact endpoint".to_string(),
            LinkKind::Nearest { distance } => format!("nearest ({:.4} deg gap)", distance),
        };
        println!(
            "  segment {} {}: {}",
            link.segment,
            if link.reversed { "reversed" } else { "forward " },
            how
        );
    }

    println!(
        "\nChained {} / {} segments ({:?})",
        chain.used_count(),
        chain.total_segments,
        chain.termination
    );
    println!("Chain points: {}", chain.points.len());

    let sampled = downsample(&chain.points, 4);
    println!("Downsampled to {} points:", sampled.len());
    for p in &sampled {
        println!("  [{:.4}, {:.4}]", p.longitude, p.latitude);
    }
}
