//! Tiling and scheduling regression test
//!
//! Results must not depend on tile extents beyond rounding, and must be
//! bit-identical across thread counts and claim batch sizes for a fixed
//! tiling.

use texstat_core::Dimensions;
use texstat_filter::{
    AvgVarConfig, AvgVarSetup, TileGeometry, TileSize, compute_averages_and_variances,
};
use texstat_test::{RegParams, gradient_u8, noise_f32};

#[test]
fn tile_reg() {
    let mut rp = RegParams::new("tile");

    // --- Task regions partition the image ---
    for (dims, tile) in [
        (Dimensions::new_2d(70, 45).unwrap(), TileSize::new(32, 32, 1)),
        (Dimensions::new(20, 33, 35).unwrap(), TileSize::new(16, 16, 16)),
        (Dimensions::new(5, 5, 3).unwrap(), TileSize::new(4, 2, 2)),
    ] {
        let geometry = TileGeometry::new(dims, tile, 3);
        let mut hits = vec![0u8; dims.pixel_count()];
        for i in 0..geometry.task_count() {
            for r in geometry.chunks(geometry.task(i)) {
                rp.compare_values(1.0, (r.width <= geometry.tile().x) as u8 as f64, 0.0);
                for z in r.z..r.z + r.depth {
                    for y in r.y..r.y + r.height {
                        for x in r.x..r.x + r.width {
                            hits[dims.index(x, y, z)] += 1;
                        }
                    }
                }
            }
        }
        let all_once = hits.iter().all(|&h| h == 1);
        rp.compare_values(1.0, all_once as u8 as f64, 0.0);
    }

    // --- Tile extents change rounding only ---
    let dims = Dimensions::new_2d(50, 37).unwrap();
    let img = gradient_u8(dims);
    let view = img.view().unwrap();
    let base = AvgVarConfig::new(2, 3).with_threads(1);
    let reference = compute_averages_and_variances(view, &base).unwrap();
    for tile in [TileSize::new(8, 8, 1), TileSize::new(5, 13, 1), TileSize::new(64, 1, 1)] {
        let stats = compute_averages_and_variances(view, &base.with_tile_size(tile)).unwrap();
        rp.compare_float4_slices(reference.averages(), stats.averages(), 1e-4);
        rp.compare_float4_slices(reference.variances(), stats.variances(), 1e-3);
        rp.compare_f32_slices(reference.alpha_averages(), stats.alpha_averages(), 1e-4);
    }

    let dims = Dimensions::new(12, 10, 9).unwrap();
    let img = noise_f32(dims, 3);
    let view = img.view().unwrap();
    let base = AvgVarConfig::new(1, 2).with_threads(1);
    let reference = compute_averages_and_variances(view, &base).unwrap();
    for tile in [TileSize::new(4, 4, 4), TileSize::new(16, 3, 2)] {
        let stats = compute_averages_and_variances(view, &base.with_tile_size(tile)).unwrap();
        rp.compare_float4_slices(reference.averages(), stats.averages(), 1e-4);
        rp.compare_float4_slices(reference.variances(), stats.variances(), 1e-3);
        rp.compare_f32_slices(reference.alpha_averages(), stats.alpha_averages(), 1e-4);
    }

    // --- Thread count and batching never change a bit ---
    let tiled = base.with_tile_size(TileSize::new(4, 2, 3));
    let single = compute_averages_and_variances(view, &tiled).unwrap();
    for (threads, batch) in [(2, 1), (4, 1), (4, 3), (8, 16), (2, usize::MAX / 2 + 1)] {
        let setup =
            AvgVarSetup::new(view, &tiled.with_threads(threads).with_task_batch(batch)).unwrap();
        rp.compare_values(threads as f64, setup.threads() as f64, 0.0);
        let capped = setup.task_batch() <= setup.task_count();
        rp.compare_values(1.0, capped as u8 as f64, 0.0);
        let mut stats = setup.new_buffers();
        setup.execute(&mut stats).unwrap();
        rp.compare_float4_slices(single.averages(), stats.averages(), 0.0);
        rp.compare_float4_slices(single.variances(), stats.variances(), 0.0);
        rp.compare_f32_slices(single.alpha_averages(), stats.alpha_averages(), 0.0);
    }

    // --- Threads are capped by the task count ---
    let dims = Dimensions::new_2d(8, 8).unwrap();
    let img = gradient_u8(dims);
    let config = AvgVarConfig::new(1, 1).with_threads(6);
    let setup = AvgVarSetup::new(img.view().unwrap(), &config).unwrap();
    rp.compare_values(1.0, setup.task_count() as f64, 0.0);
    rp.compare_values(1.0, setup.threads() as f64, 0.0);

    // --- Reusing a setup gives the same result ---
    let mut again = setup.new_buffers();
    setup.execute(&mut again).unwrap();
    let mut first = setup.new_buffers();
    setup.execute(&mut first).unwrap();
    rp.compare_float4_slices(first.variances(), again.variances(), 0.0);

    assert!(rp.cleanup(), "tile regression test failed");
}
