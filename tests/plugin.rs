//! Run the plugin inside a headless app
//!

use bevy::{ecs::event::Events, prelude::*};
use bevy_flowfield_pathfinder::prelude::*;

/// Layer of walls
const WALL: u8 = 1;

/// A headless app with a 5x5 pathfinder and a wall across the middle
fn setup() -> (App, Entity) {
	let mut app = App::new();
	app.add_plugins(FlowFieldPathfinderPlugin);
	let config = PathfinderConfig::new(
		5,
		5,
		0.5,
		LayerMask::NONE,
		LayerMask::from_layers(&[WALL]),
	)
	.unwrap();
	let pathfinder = app.world_mut().spawn(Pathfinder::new(config)).id();
	// wall covering cells (0, 2) to (3, 2)
	app.world_mut().spawn((
		TerrainObstacle::new(WALL, Vec3::new(2.0, 0.5, 0.5)),
		GlobalTransform::from_translation(Vec3::new(2.0, 0.0, 2.5)),
	));
	(app, pathfinder)
}

/// Collect the [EventFlowFieldPublished] in the current buffers
fn published(app: &App) -> Vec<EventFlowFieldPublished> {
	let events = app.world().resource::<Events<EventFlowFieldPublished>>();
	let mut cursor = events.get_cursor();
	cursor.read(events).copied().collect()
}

#[test]
fn initial_field_over_three_frames() {
	let (mut app, entity) = setup();
	app.update();
	app.update();
	let pathfinder = app.world().get::<Pathfinder>(entity).unwrap();
	assert!(pathfinder.is_rebuilding());
	assert_eq!(None, pathfinder.get_published_ticket());
	app.update();
	let pathfinder = app.world().get::<Pathfinder>(entity).unwrap();
	assert!(!pathfinder.is_rebuilding());
	assert_eq!(Some(RebuildTicket::new(1)), pathfinder.get_published_ticket());
	let wall = pathfinder.get_grid().get_cell(GridIndex::new(1, 2)).unwrap();
	assert!(!wall.is_passable());
	let gap = pathfinder.get_grid().get_cell(GridIndex::new(4, 2)).unwrap();
	assert!(gap.is_passable());
	let actual = vec![EventFlowFieldPublished {
		entity,
		ticket: RebuildTicket::new(1),
	}];
	assert_eq!(actual, published(&app));
}

#[test]
fn destination_request_rebuilds() {
	let (mut app, entity) = setup();
	for _ in 0..3 {
		app.update();
	}
	app.world_mut()
		.send_event(EventUpdateDestination::new(Vec3::new(4.5, 0.0, 4.5)));
	for _ in 0..3 {
		app.update();
	}
	let pathfinder = app.world().get::<Pathfinder>(entity).unwrap();
	assert_eq!(GridIndex::new(4, 4), pathfinder.get_destination());
	assert_eq!(Some(RebuildTicket::new(2)), pathfinder.get_published_ticket());
	// the far side of the wall routes through the gap
	let path = pathfinder
		.extract_path(GridIndex::new(0, 0), GridIndex::new(4, 4))
		.unwrap();
	assert!(path.contains(&GridIndex::new(4, 2)));
}

#[test]
fn burst_of_requests_keeps_the_last() {
	let (mut app, entity) = setup();
	app.world_mut()
		.send_event(EventUpdateDestination::new(Vec3::new(4.5, 0.0, 0.5)));
	app.world_mut()
		.send_event(EventUpdateDestination::new(Vec3::new(0.5, 0.0, 4.5)));
	for _ in 0..6 {
		app.update();
	}
	let pathfinder = app.world().get::<Pathfinder>(entity).unwrap();
	assert!(!pathfinder.is_rebuilding());
	assert_eq!(GridIndex::new(0, 4), pathfinder.get_destination());
}
