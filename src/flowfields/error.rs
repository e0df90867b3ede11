//! Errors raised while building or reading a flow field
//!

use bevy::prelude::*;
use thiserror::Error;

use crate::prelude::*;

/// Failures of the field pipeline and of the [crate::prelude::Pathfinder] read paths
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowFieldError {
	/// The configuration supplied to a [crate::prelude::Pathfinder] cannot describe a grid
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
	/// A grid index was used directly that lies outside of the grid
	#[error("grid index {index:?} is outside of a {width}x{height} grid")]
	OutOfBounds {
		/// The offending index
		index: GridIndex,
		/// Number of columns of the grid
		width: usize,
		/// Number of rows of the grid
		height: usize,
	},
	/// There is no passable route from `start` to `end`
	#[error("no route from {start:?} to {end:?}")]
	Unreachable {
		/// Where the walk began
		start: GridIndex,
		/// Where the walk was heading
		end: GridIndex,
	},
	/// Accumulating the integration cost of a cell exceeded what a `u16` can represent
	#[error("integration cost overflowed at {index:?}, the grid is too large for its costs")]
	CostOverflow {
		/// The cell whose cost could not be represented
		index: GridIndex,
	},
	/// An offset that isn't one of the nine known directions reached the direction lookup
	#[error("offset {offset} is not a known direction")]
	UnclassifiedDirection {
		/// The offending offset
		offset: IVec2,
	},
}

/// A spatial obstacle query failed to produce results for a probe
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("obstacle query failed: {0}")]
pub struct ObstacleQueryError(pub String);

impl From<&str> for ObstacleQueryError {
	fn from(value: &str) -> Self {
		ObstacleQueryError(value.to_owned())
	}
}
