//! Logic for advancing the rebuild of each [Pathfinder] a stage per frame and
//! gathering the obstacles of the world for the cost pass
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Marks an entity as terrain which affects the cost field. The entity's
/// [GlobalTransform] translation is the centre of an axis-aligned box with the
/// given half extents in world units
#[derive(Component, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct TerrainObstacle {
	/// Layer of the obstacle, classified by the [TerrainClassifiers] of the [PathfinderConfig]
	layer: u8,
	/// Half the size of the box along each axis
	half_extents: Vec3,
}

impl TerrainObstacle {
	/// Create a new instance of [TerrainObstacle]
	pub fn new(layer: u8, half_extents: Vec3) -> Self {
		TerrainObstacle {
			layer,
			half_extents,
		}
	}
	/// Get the layer
	pub fn get_layer(&self) -> u8 {
		self.layer
	}
	/// Get the half extents
	pub fn get_half_extents(&self) -> Vec3 {
		self.half_extents
	}
}

/// Emitted when a [Pathfinder] has published a freshly built field
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct EventFlowFieldPublished {
	/// The entity owning the [Pathfinder]
	pub entity: Entity,
	/// The request which was fulfilled
	pub ticket: RebuildTicket,
}

/// Emitted when a rebuild was aborted, the [Pathfinder] keeps its previous field
#[derive(Event, Clone, Debug, PartialEq)]
pub struct EventFlowFieldFailed {
	/// The entity owning the [Pathfinder]
	pub entity: Entity,
	/// The request which failed
	pub ticket: RebuildTicket,
	/// Why it failed
	pub error: FlowFieldError,
}

/// Collect every [TerrainObstacle] into a queryable set of boxes
pub fn gather_obstacles<'a>(
	obstacles: impl Iterator<Item = (Entity, &'a TerrainObstacle, &'a GlobalTransform)>,
) -> BoxObstacles {
	let mut boxes = BoxObstacles::new();
	for (entity, terrain, transform) in obstacles {
		boxes.insert(
			Obstacle::new(entity, terrain.get_layer()),
			transform.translation(),
			terrain.get_half_extents(),
		);
	}
	boxes
}

/// Run a single stage of the rebuild of each [Pathfinder], so that a rebuild
/// spreads over several frames instead of stalling one
#[cfg(not(tarpaulin_include))]
pub fn advance_rebuilds(
	mut pathfinder_q: Query<(Entity, &mut Pathfinder)>,
	obstacle_q: Query<(Entity, &TerrainObstacle, &GlobalTransform)>,
	mut event_published: EventWriter<EventFlowFieldPublished>,
	mut event_failed: EventWriter<EventFlowFieldFailed>,
) {
	// nothing to do while every pathfinder is idle
	if !pathfinder_q.iter().any(|(_, p)| p.is_rebuilding()) {
		return;
	}
	// only a cost pass reads the obstacles
	let obstacles = if pathfinder_q.iter().any(|(_, p)| p.needs_obstacles()) {
		gather_obstacles(obstacle_q.iter())
	} else {
		BoxObstacles::new()
	};
	for (entity, mut pathfinder) in &mut pathfinder_q {
		if !pathfinder.is_rebuilding() {
			continue;
		}
		match pathfinder.advance(&obstacles) {
			RebuildProgress::Published(ticket) => {
				event_published.write(EventFlowFieldPublished { entity, ticket });
			}
			RebuildProgress::Failed(ticket, error) => {
				event_failed.write(EventFlowFieldFailed {
					entity,
					ticket,
					error,
				});
			}
			RebuildProgress::Working { ticket, next } => {
				trace!("Pathfinder {:?} rebuild {:?} next {:?}", entity, ticket, next);
			}
			RebuildProgress::Idle => {}
		}
	}
}
