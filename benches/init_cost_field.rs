//! Measure the cost pass over a world scattered with obstacles
//!
//! World is 200 cells by 200 cells
//!

use bevy::prelude::*;
use bevy_flowfield_pathfinder::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Layer of the walls
const WALL: u8 = 1;
/// Layer of the mud
const MUD: u8 = 2;

/// Scatter a fixed set of obstacles of random size over the world
fn prepare_obstacles(width: usize, height: usize, count: u32) -> BoxObstacles {
	let mut rng = StdRng::seed_from_u64(42);
	let mut obstacles = BoxObstacles::new();
	for i in 0..count {
		let layer = if rng.random_bool(0.5) { WALL } else { MUD };
		let centre = Vec3::new(
			rng.random_range(0.0..width as f32),
			0.0,
			rng.random_range(0.0..height as f32),
		);
		let half_extents = Vec3::new(rng.random_range(0.5..4.0), 1.0, rng.random_range(0.5..4.0));
		obstacles.insert(Obstacle::new(Entity::from_raw(i), layer), centre, half_extents);
	}
	obstacles
}

/// Derive the costs of every cell of a fresh grid
fn init_cost_field(obstacles: &BoxObstacles, classifiers: &TerrainClassifiers) {
	if let Ok(mut grid) = FieldGrid::new(200, 200, 0.5) {
		let _ = grid.calculate_cost_field(obstacles, classifiers);
	}
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("data_initialisation");
	group.significance_level(0.05).sample_size(100);
	let obstacles = prepare_obstacles(200, 200, 250);
	let classifiers =
		TerrainClassifiers::new(LayerMask::from_layers(&[MUD]), LayerMask::from_layers(&[WALL]));
	group.bench_function("init_cost_field", |b| {
		b.iter(|| init_cost_field(black_box(&obstacles), black_box(&classifiers)))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
