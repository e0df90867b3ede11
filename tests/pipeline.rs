//! Drive the whole pipeline, obstacles through to paths, and compare the
//! integration field against a brute-force shortest path search
//!

use std::{cmp::Reverse, collections::BinaryHeap};

use bevy::prelude::*;
use bevy_flowfield_pathfinder::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Layer of walls
const WALL: u8 = 1;
/// Layer of mud
const MUD: u8 = 2;

fn config(width: usize, height: usize) -> PathfinderConfig {
	PathfinderConfig::new(
		width,
		height,
		0.5,
		LayerMask::from_layers(&[MUD]),
		LayerMask::from_layers(&[WALL]),
	)
	.unwrap()
}

/// Obstacles filling whole cells of a grid with radius `0.5`
fn fill_cells(obstacles: &mut BoxObstacles, cells: &[(usize, usize)], layer: u8) {
	for (x, y) in cells.iter() {
		let id = obstacles.len() as u32;
		obstacles.insert(
			Obstacle::new(Entity::from_raw(id), layer),
			Vec3::new(*x as f32 + 0.5, 0.0, *y as f32 + 0.5),
			Vec3::splat(0.5),
		);
	}
}

/// Shortest cumulative cost from every cell to `destination` using a binary
/// heap, over the same neighbour rules as the field
fn dijkstra(grid: &FieldGrid, destination: GridIndex) -> Vec<u16> {
	let width = grid.get_width();
	let offset = |i: GridIndex| i.get_y() * width + i.get_x();
	let mut best = vec![u16::MAX; grid.get_cells().len()];
	let mut heap = BinaryHeap::new();
	best[offset(destination)] = 0;
	heap.push(Reverse((0u32, destination.get_x(), destination.get_y())));
	while let Some(Reverse((cost, x, y))) = heap.pop() {
		let index = GridIndex::new(x, y);
		if cost > best[offset(index)] as u32 {
			continue;
		}
		for n in grid.get_neighbours(index) {
			let cell = grid.get_cell(n).unwrap();
			if !cell.is_passable() {
				continue;
			}
			let next = cost + cell.get_cost() as u32;
			if next < best[offset(n)] as u32 {
				best[offset(n)] = next as u16;
				heap.push(Reverse((next, n.get_x(), n.get_y())));
			}
		}
	}
	best
}

/// Scatter walls and mud over a grid, leaving the destination clear
fn random_obstacles(rng: &mut StdRng, width: usize, height: usize) -> BoxObstacles {
	let mut walls = Vec::new();
	let mut mud = Vec::new();
	for y in 0..height {
		for x in 0..width {
			if (x, y) == (0, 0) {
				continue;
			}
			if rng.random_bool(0.2) {
				walls.push((x, y));
			} else if rng.random_bool(0.15) {
				mud.push((x, y));
			}
		}
	}
	let mut obstacles = BoxObstacles::new();
	fill_cells(&mut obstacles, &walls, WALL);
	fill_cells(&mut obstacles, &mud, MUD);
	obstacles
}

#[test]
fn integration_matches_shortest_paths() {
	let mut rng = StdRng::seed_from_u64(1234);
	for _ in 0..10 {
		let width = rng.random_range(4..24);
		let height = rng.random_range(4..24);
		let obstacles = random_obstacles(&mut rng, width, height);
		let mut pathfinder = Pathfinder::new(config(width, height));
		pathfinder.complete_rebuilds(&obstacles);
		let grid = pathfinder.get_grid();
		let reference = dijkstra(grid, GridIndex::new(0, 0));
		let result: Vec<u16> = grid.get_cells().iter().map(|c| c.get_best_cost()).collect();
		assert_eq!(reference, result);
	}
}

#[test]
fn every_reached_cell_flows_home() {
	let mut rng = StdRng::seed_from_u64(98765);
	for _ in 0..10 {
		let width = rng.random_range(4..20);
		let height = rng.random_range(4..20);
		let obstacles = random_obstacles(&mut rng, width, height);
		let mut pathfinder = Pathfinder::new(config(width, height));
		pathfinder.complete_rebuilds(&obstacles);
		let destination = pathfinder.get_destination();
		for cell in pathfinder.get_grid().get_cells().iter() {
			let start = cell.get_grid_index();
			let valid = pathfinder.is_path_valid(start).unwrap();
			if !cell.is_passable() || !cell.is_reached() {
				assert!(!valid);
				continue;
			}
			assert!(valid);
			let path = pathfinder.extract_path(start, destination).unwrap();
			assert!(path.len() <= width * height);
			// costs strictly decrease along the path
			for pair in path.windows(2) {
				let from = pathfinder.get_grid().get_cell(pair[0]).unwrap();
				let to = pathfinder.get_grid().get_cell(pair[1]).unwrap();
				assert!(to.get_best_cost() < from.get_best_cost());
			}
		}
	}
}

#[test]
fn wall_row_forces_a_detour() {
	//  ___________________
	// |   |   |   |   | s |
	// |___|___|___|___|___|
	// |   |   |   |   |   |
	// |___|___|___|___|___|
	// | X | X | X | X |   |
	// |___|___|___|___|___|
	// |   |   |   |   |   |
	// |___|___|___|___|___|
	// | d |   |   |   |   |
	// |___|___|___|___|___|
	let mut obstacles = BoxObstacles::new();
	fill_cells(&mut obstacles, &[(0, 2), (1, 2), (2, 2), (3, 2)], WALL);
	let mut pathfinder = Pathfinder::new(config(5, 5));
	pathfinder.complete_rebuilds(&obstacles);
	let path = pathfinder
		.extract_path(GridIndex::new(4, 4), GridIndex::new(0, 0))
		.unwrap();
	// the gap at the end of the wall is always used
	assert!(path.contains(&GridIndex::new(4, 2)));
	assert_eq!(7, pathfinder.get_grid().get_cell(GridIndex::new(4, 4)).unwrap().get_best_cost());
	for index in path.iter() {
		assert!(pathfinder.get_grid().get_cell(*index).unwrap().is_passable());
	}
}

#[test]
fn mud_is_avoided_when_cheaper() {
	// a patch of mud in the middle of an open field
	let mut obstacles = BoxObstacles::new();
	fill_cells(&mut obstacles, &[(2, 1), (2, 2), (2, 3)], MUD);
	let mut pathfinder = Pathfinder::new(config(5, 5));
	pathfinder.complete_rebuilds(&obstacles);
	let grid = pathfinder.get_grid();
	assert_eq!(4, grid.get_cell(GridIndex::new(2, 2)).unwrap().get_cost());
	let path = pathfinder
		.extract_path(GridIndex::new(4, 2), GridIndex::new(0, 0))
		.unwrap();
	assert!(!path.contains(&GridIndex::new(2, 2)));
}

#[test]
fn moving_destination() {
	let mut pathfinder = Pathfinder::new(config(8, 8));
	let obstacles = BoxObstacles::new();
	pathfinder.complete_rebuilds(&obstacles);
	let ticket = pathfinder.set_destination(Vec3::new(7.5, 0.0, 7.5));
	pathfinder.complete_rebuilds(&obstacles);
	assert_eq!(RebuildStatus::Published, pathfinder.rebuild_status(ticket));
	let sample = pathfinder.sample_flow(Vec3::new(0.5, 0.0, 0.5)).unwrap();
	assert_eq!(Direction::NorthEast, sample.direction);
	assert_eq!(7, sample.best_cost);
	let snapshot = pathfinder.debug_snapshot();
	assert_eq!(GridIndex::new(7, 7), snapshot.destination);
	// every cell but the destination points somewhere
	assert_eq!(63, snapshot.direction_segments().len());
}
