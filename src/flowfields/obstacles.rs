//! The cost field is derived from a spatial query: for every cell the
//! obstacles overlapping a small box around the cell centre are fetched and
//! classified as impassable or difficult terrain.
//!
//! The query itself is an external collaborator, anything implementing
//! [ObstacleQuery] can drive the pathfinder (a physics engine, a
//! hand-maintained list of colliders...). [BoxObstacles] is a simple
//! implementation over axis-aligned boxes.
//!

use std::sync::Arc;

use bevy::{
	math::bounding::{Aabb3d, IntersectsVolume},
	prelude::*,
};

use crate::prelude::*;

/// Handle to an obstacle returned from an [ObstacleQuery]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Obstacle {
	/// The entity representing the obstacle
	entity: Entity,
	/// Physics/terrain layer, `0..32`, used for classification
	layer: u8,
}

impl Obstacle {
	/// Create a new instance of [Obstacle]
	pub fn new(entity: Entity, layer: u8) -> Self {
		Obstacle { entity, layer }
	}
	/// Get the entity of the obstacle
	pub fn get_entity(&self) -> Entity {
		self.entity
	}
	/// Get the layer of the obstacle
	pub fn get_layer(&self) -> u8 {
		self.layer
	}
}

/// Given a world point and the half extents of a box, find every obstacle overlapping it
pub trait ObstacleQuery {
	/// Find the obstacles overlapping an axis-aligned box. No ordering of the
	/// results is assumed
	fn overlap_box(
		&self,
		centre: Vec3,
		half_extents: Vec3,
	) -> std::result::Result<Vec<Obstacle>, ObstacleQueryError>;
}

/// Decides whether an [Obstacle] belongs to a class of terrain
pub trait TerrainClassifier: Send + Sync {
	/// Does the obstacle belong to this class
	fn classify(&self, obstacle: &Obstacle) -> bool;
}

impl<F> TerrainClassifier for F
where
	F: Fn(&Obstacle) -> bool + Send + Sync,
{
	fn classify(&self, obstacle: &Obstacle) -> bool {
		self(obstacle)
	}
}

/// A set of layers, bit `n` set means layer `n` is a member
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub struct LayerMask(u32);

impl LayerMask {
	/// A mask with no layers
	pub const NONE: LayerMask = LayerMask(0);
	/// Create a mask from raw bits
	pub fn from_bits(bits: u32) -> Self {
		LayerMask(bits)
	}
	/// Create a mask from a list of layers, layers of `32` and above are ignored
	pub fn from_layers(layers: &[u8]) -> Self {
		let mut bits = 0;
		for layer in layers.iter() {
			if let Some(bit) = 1u32.checked_shl(*layer as u32) {
				bits |= bit;
			}
		}
		LayerMask(bits)
	}
	/// Get the raw bits
	pub fn get_bits(&self) -> u32 {
		self.0
	}
	/// Whether `layer` is a member of the mask
	pub fn contains(&self, layer: u8) -> bool {
		1u32.checked_shl(layer as u32)
			.is_some_and(|bit| self.0 & bit > 0)
	}
}

impl TerrainClassifier for LayerMask {
	fn classify(&self, obstacle: &Obstacle) -> bool {
		self.contains(obstacle.get_layer())
	}
}

/// The pair of classifiers used to derive cell costs
#[derive(Clone)]
pub struct TerrainClassifiers {
	/// Obstacles which raise the cost of a cell
	difficult: Arc<dyn TerrainClassifier>,
	/// Obstacles which block a cell entirely
	impassable: Arc<dyn TerrainClassifier>,
}

impl TerrainClassifiers {
	/// Create a new instance of [TerrainClassifiers]
	pub fn new(
		difficult: impl TerrainClassifier + 'static,
		impassable: impl TerrainClassifier + 'static,
	) -> Self {
		TerrainClassifiers {
			difficult: Arc::new(difficult),
			impassable: Arc::new(impassable),
		}
	}
	/// Is the obstacle difficult terrain
	pub fn is_difficult(&self, obstacle: &Obstacle) -> bool {
		self.difficult.classify(obstacle)
	}
	/// Is the obstacle impassable terrain
	pub fn is_impassable(&self, obstacle: &Obstacle) -> bool {
		self.impassable.classify(obstacle)
	}
}

impl std::fmt::Debug for TerrainClassifiers {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TerrainClassifiers").finish_non_exhaustive()
	}
}

/// An [ObstacleQuery] over a list of axis-aligned boxes
#[derive(Clone, Debug, Default)]
pub struct BoxObstacles {
	/// Each obstacle and the volume it occupies
	boxes: Vec<(Obstacle, Aabb3d)>,
}

impl BoxObstacles {
	/// Create an empty set of obstacles
	pub fn new() -> Self {
		BoxObstacles::default()
	}
	/// Add an obstacle occupying the box at `centre` with `half_extents`
	pub fn insert(&mut self, obstacle: Obstacle, centre: Vec3, half_extents: Vec3) {
		self.boxes.push((obstacle, Aabb3d::new(centre, half_extents)));
	}
	/// Number of obstacles
	pub fn len(&self) -> usize {
		self.boxes.len()
	}
	/// Whether there are no obstacles
	pub fn is_empty(&self) -> bool {
		self.boxes.is_empty()
	}
}

impl ObstacleQuery for BoxObstacles {
	fn overlap_box(
		&self,
		centre: Vec3,
		half_extents: Vec3,
	) -> std::result::Result<Vec<Obstacle>, ObstacleQueryError> {
		let probe = Aabb3d::new(centre, half_extents);
		Ok(self
			.boxes
			.iter()
			.filter(|(_, volume)| probe.intersects(volume))
			.map(|(obstacle, _)| *obstacle)
			.collect())
	}
}
