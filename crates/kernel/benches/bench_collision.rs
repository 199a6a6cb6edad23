use std::hint::black_box;
use std::time::Instant;

use glam::Vec3;
use mazewalk_common::{Config, Intent};
use mazewalk_kernel::{BlockWorld, MazeLayout, PlayerController};

/// Square maze of `side` cells with walls on the border and every other
/// interior cell, giving a block count that grows with side^2.
fn make_world(side: usize) -> BlockWorld {
    let rows: Vec<String> = (0..side)
        .map(|z| {
            (0..side)
                .map(|x| {
                    let border = x == 0 || z == 0 || x == side - 1 || z == side - 1;
                    if border || (x % 2 == 0 && z % 2 == 0) { '#' } else { '.' }
                })
                .collect()
        })
        .collect();
    let layout = MazeLayout::parse(&rows.join("\n")).expect("generated layout is well formed");
    BlockWorld::from_maze(&layout)
}

fn bench_collides(side: usize, iterations: usize) {
    let world = make_world(side);
    let controller = PlayerController::default();
    let probe = Vec3::new(3.0, 0.0, 3.0);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(controller.collides(black_box(probe), black_box(&world)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  collides ({} blocks, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        world.len()
    );
}

fn bench_ground_probe(side: usize, iterations: usize) {
    let world = make_world(side);
    let controller = PlayerController::default();

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(controller.ground_height(black_box(&world)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  ground probe ({} blocks, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        world.len()
    );
}

fn bench_tick(side: usize, iterations: usize) {
    let world = make_world(side);
    let mut config = Config::default();
    config.camera.spawn = Vec3::new(3.0, 0.0, 3.0);
    let mut controller = PlayerController::new(&config);
    let intents = [Intent::Forward, Intent::Right];

    let start = Instant::now();
    for i in 0..iterations {
        controller.apply_mouse_delta(if i % 120 < 60 { 3.0 } else { -3.0 }, 0.0);
        controller.tick(black_box(&intents), true, 1.0 / 60.0, black_box(&world));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  full tick ({} blocks, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        world.len()
    );
}

fn main() {
    println!("=== Collision Benchmarks ===\n");

    println!("Collision test:");
    bench_collides(8, 100_000);
    bench_collides(32, 10_000);
    bench_collides(128, 1_000);

    println!("\nGround probe:");
    bench_ground_probe(8, 100_000);
    bench_ground_probe(32, 10_000);
    bench_ground_probe(128, 1_000);

    println!("\nController tick (two intents + physics):");
    bench_tick(8, 10_000);
    bench_tick(32, 1_000);

    println!("\n=== Done ===");
}
