//! Defines the Bevy [Plugin] for FlowField pathfinding
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod destination_layer;
pub mod rebuild_layer;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	/// Collect destination requests
	Requests,
	/// Advance in-flight rebuilds
	Rebuild,
}

pub struct FlowFieldPathfinderPlugin;

impl Plugin for FlowFieldPathfinderPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<Direction>()
			.register_type::<GridIndex>()
			.register_type::<RebuildTicket>()
			.register_type::<TerrainObstacle>()
			.add_event::<destination_layer::EventUpdateDestination>()
			.add_event::<rebuild_layer::EventFlowFieldPublished>()
			.add_event::<rebuild_layer::EventFlowFieldFailed>()
			.configure_sets(Update, (OrderingSet::Requests, OrderingSet::Rebuild).chain())
			.add_systems(
				Update,
				(
					destination_layer::event_update_destination.in_set(OrderingSet::Requests),
					rebuild_layer::advance_rebuilds.in_set(OrderingSet::Rebuild),
				),
			);
	}
}
