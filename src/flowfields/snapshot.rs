//! A read-only copy of the published fields for debug renderers and tooling
//!

use bevy::prelude::*;

use crate::prelude::*;

/// The state of a single cell at the time of the snapshot
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSnapshot {
	/// Index of the cell
	pub index: GridIndex,
	/// Centre of the cell in world space
	pub world_position: Vec3,
	/// Offset of the flow direction, zero when the cell has no direction
	pub direction: IVec2,
	/// Cumulative cost to the destination
	pub best_cost: u16,
	/// Traversal cost
	pub cost: u8,
}

/// Every cell of a grid along with the destination it flows to
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSnapshot {
	/// Number of columns
	pub width: usize,
	/// Number of rows
	pub height: usize,
	/// Cell the field flows towards
	pub destination: GridIndex,
	/// Cells row by row
	pub cells: Vec<CellSnapshot>,
}

impl FieldSnapshot {
	/// Capture the current state of `grid`
	pub fn capture(grid: &FieldGrid, destination: GridIndex) -> Self {
		let cells = grid
			.get_cells()
			.iter()
			.map(|cell| CellSnapshot {
				index: cell.get_grid_index(),
				world_position: cell.get_world_position(),
				direction: cell.get_best_direction().get_vector(),
				best_cost: cell.get_best_cost(),
				cost: cell.get_cost(),
			})
			.collect();
		FieldSnapshot {
			width: grid.get_width(),
			height: grid.get_height(),
			destination,
			cells,
		}
	}
	/// Line segments, `(start, end)`, from each cell centre one unit along its
	/// direction on the `x-z` plane. Cells without a direction are skipped
	pub fn direction_segments(&self) -> Vec<(Vec3, Vec3)> {
		self.cells
			.iter()
			.filter(|cell| cell.direction != IVec2::ZERO)
			.map(|cell| {
				let offset = Vec3::new(cell.direction.x as f32, 0.0, cell.direction.y as f32);
				(cell.world_position, cell.world_position + offset)
			})
			.collect()
	}
	/// Serialise the snapshot into a `ron` string
	#[cfg(feature = "ron")]
	pub fn to_ron(&self) -> Result<String, ron::Error> {
		ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
	}
}
