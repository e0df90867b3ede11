//! Logic relating to requesting a new destination for the [Pathfinder]s
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Request that every [Pathfinder] rebuilds its fields to flow towards a
/// position in world space
#[derive(Event, Clone, Copy, Debug)]
pub struct EventUpdateDestination(Vec3);

impl EventUpdateDestination {
	/// Create a new instance of [EventUpdateDestination]
	pub fn new(world_position: Vec3) -> Self {
		EventUpdateDestination(world_position)
	}
	/// Get the requested destination
	pub fn get_world_position(&self) -> Vec3 {
		self.0
	}
}

/// Read [EventUpdateDestination] and hand the destination to each [Pathfinder].
///
/// Several requests may arrive in a single frame, only the last one matters so
/// the rest are skipped rather than queued one after another
#[cfg(not(tarpaulin_include))]
pub fn event_update_destination(
	mut events: EventReader<EventUpdateDestination>,
	mut pathfinder_q: Query<(Entity, &mut Pathfinder)>,
) {
	if let Some(event) = events.read().last() {
		for (entity, mut pathfinder) in &mut pathfinder_q {
			let ticket = pathfinder.set_destination(event.get_world_position());
			debug!(
				"Pathfinder {:?} requested rebuild {:?} towards {}",
				entity,
				ticket,
				event.get_world_position()
			);
		}
	}
}
