//! Measure a full rebuild of the fields for a world of walls winding back and
//! forth, forcing the longest route possible
//!
//! World is 100 cells by 100 cells, every other row is a wall with a single
//! gap at alternating ends
//!

use bevy::prelude::*;
use bevy_flowfield_pathfinder::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Layer of the walls
const WALL: u8 = 1;

/// Build the maze walls, each wall is a single box spanning all but one cell of its row
fn maze(width: usize, height: usize) -> BoxObstacles {
	let mut obstacles = BoxObstacles::new();
	let half_span = (width - 1) as f32 / 2.0;
	for (i, y) in (1..height).step_by(2).enumerate() {
		// gaps alternate between the right and left hand sides
		let centre_x = if i % 2 == 0 { half_span } else { half_span + 1.0 };
		obstacles.insert(
			Obstacle::new(Entity::from_raw(i as u32), WALL),
			Vec3::new(centre_x, 0.0, y as f32 + 0.5),
			Vec3::new(half_span, 0.5, 0.5),
		);
	}
	obstacles
}

/// Create a [Pathfinder] with its initial field already published
fn prepare_pathfinder(width: usize, height: usize) -> (Pathfinder, BoxObstacles) {
	let config = PathfinderConfig::new(
		width,
		height,
		0.5,
		LayerMask::NONE,
		LayerMask::from_layers(&[WALL]),
	)
	.expect("valid config");
	let obstacles = maze(width, height);
	let mut pathfinder = Pathfinder::new(config);
	pathfinder.complete_rebuilds(&obstacles);
	(pathfinder, obstacles)
}

/// Rebuild towards the top of the maze and walk a path up from the origin
fn flow_maze(pathfinder: &mut Pathfinder, obstacles: &BoxObstacles, target: Vec3) {
	pathfinder.set_destination(target);
	pathfinder.complete_rebuilds(obstacles);
	let end = pathfinder.get_destination();
	let _ = pathfinder.extract_path(GridIndex::new(0, 0), end);
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.05).sample_size(100);
	let (mut pathfinder, obstacles) = prepare_pathfinder(100, 100);
	group.bench_function("calc_flow_maze", |b| {
		b.iter(|| {
			flow_maze(
				black_box(&mut pathfinder),
				black_box(&obstacles),
				black_box(Vec3::new(0.5, 0.0, 99.5)),
			)
		})
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
