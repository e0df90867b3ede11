//! Useful structures and tools used by the fields
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Default cost of traversing a grid cell
pub const COST_DEFAULT: u8 = 1;
/// Special cost value marking a grid cell as impassable
pub const COST_IMPASSABLE: u8 = u8::MAX;
/// Extra cost added (once) to a cell overlapped by difficult terrain
pub const DIFFICULT_TERRAIN_PENALTY: u8 = 3;
/// Special integration value marking a grid cell that has no known route to the destination
pub const BEST_COST_UNREACHED: u16 = u16::MAX;
/// Obstacle probes are shrunk below the true half-cell size so that an
/// obstacle sitting flush against a cell boundary doesn't bleed into the neighbour
pub const OBSTACLE_PROBE_SCALE: f32 = 0.9;

/// The eight compass directions of movement across the grid plus [Direction::None].
///
/// North is towards increasing grid `y` (world `+z`), East is towards
/// increasing grid `x` (world `+x`)
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, Reflect)]
pub enum Direction {
	/// No movement, used by the destination and any cell without a route
	#[default]
	None,
	North,
	East,
	South,
	West,
	NorthEast,
	SouthEast,
	SouthWest,
	NorthWest,
}

impl Direction {
	/// The orthogonal directions in the order neighbours are inspected
	pub const CARDINAL: [Direction; 4] = [
		Direction::North,
		Direction::East,
		Direction::South,
		Direction::West,
	];
	/// Every direction of movement, cardinals first
	pub const CARDINAL_AND_INTER_CARDINAL: [Direction; 8] = [
		Direction::North,
		Direction::East,
		Direction::South,
		Direction::West,
		Direction::NorthEast,
		Direction::SouthEast,
		Direction::SouthWest,
		Direction::NorthWest,
	];
	/// Get the unit offset of the direction in grid space
	pub fn get_vector(&self) -> IVec2 {
		match self {
			Direction::None => IVec2::new(0, 0),
			Direction::North => IVec2::new(0, 1),
			Direction::East => IVec2::new(1, 0),
			Direction::South => IVec2::new(0, -1),
			Direction::West => IVec2::new(-1, 0),
			Direction::NorthEast => IVec2::new(1, 1),
			Direction::SouthEast => IVec2::new(1, -1),
			Direction::SouthWest => IVec2::new(-1, -1),
			Direction::NorthWest => IVec2::new(-1, 1),
		}
	}
	/// Lookup the [Direction] which has the offset `vector`. Only the nine
	/// known offsets are valid, anything else means a field has been corrupted
	pub fn from_vector(vector: IVec2) -> Result<Self, FlowFieldError> {
		match (vector.x, vector.y) {
			(0, 0) => Ok(Direction::None),
			(0, 1) => Ok(Direction::North),
			(1, 0) => Ok(Direction::East),
			(0, -1) => Ok(Direction::South),
			(-1, 0) => Ok(Direction::West),
			(1, 1) => Ok(Direction::NorthEast),
			(1, -1) => Ok(Direction::SouthEast),
			(-1, -1) => Ok(Direction::SouthWest),
			(-1, 1) => Ok(Direction::NorthWest),
			_ => Err(FlowFieldError::UnclassifiedDirection { offset: vector }),
		}
	}
	/// For two cells next to each other find the [Direction] pointing from the `source` to the `target`
	pub fn cell_to_cell_direction(
		target: GridIndex,
		source: GridIndex,
	) -> Result<Self, FlowFieldError> {
		Direction::from_vector(target.as_ivec2() - source.as_ivec2())
	}
	/// Is the direction one of North, East, South or West
	pub fn is_cardinal(&self) -> bool {
		matches!(
			self,
			Direction::North | Direction::East | Direction::South | Direction::West
		)
	}
	/// For a diagonal direction get the two cardinal directions flanking it
	pub fn flanking_cardinals(&self) -> Option<(Direction, Direction)> {
		match self {
			Direction::NorthEast => Some((Direction::North, Direction::East)),
			Direction::SouthEast => Some((Direction::South, Direction::East)),
			Direction::SouthWest => Some((Direction::South, Direction::West)),
			Direction::NorthWest => Some((Direction::North, Direction::West)),
			_ => None,
		}
	}
}
