//! The cost field is the `cost` of every [GridCell], an 8-bit value. A value
//! of `1` is the default, a value of `255` is a special case that indicates
//! that the cell is strictly forbidden from being used in a pathing calculation
//! (effectively saying there is a wall or cliff/impassable terrain there).
//! Cells overlapped by difficult terrain (mud, shallow water...) cost `4`.
//!
//! For each cell the obstacles overlapping a box at the cell centre are
//! queried. The box is shrunk to `0.9` of the cell radius so that obstacles
//! flush against a neighbouring cell don't leak into this one:
//!
//! ```text
//!  _____________
//! |  _________  |
//! | |         | |
//! | |    o    | | <- probe box inside the cell
//! | |_________| |
//! |_____________|
//! ```
//!
//! Classification is applied once per cell, an impassable obstacle wins over
//! any difficult one and several difficult obstacles only raise the cost once.
//! An example cost field may look:
//!
//! ```text
//!  _______________________________
//! |     |     |     |     |     |
//! |  1  |  1  | 255 |  1  |  1  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  1  |  4  | 255 |  1  |  1  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  1  |  4  |  1  |  1  |  1  |
//! |_____|_____|_____|_____|_____|
//! ```
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Summary of a cost pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CostFieldReport {
	/// Cells marked impassable
	pub impassable: usize,
	/// Cells marked as difficult terrain
	pub difficult: usize,
	/// Cells whose obstacle query failed and kept the default cost
	pub failed_queries: usize,
}

impl FieldGrid {
	/// Derive the cost of every cell from the obstacles reported by `obstacles`.
	///
	/// A failed query for one cell is logged and leaves that cell at the
	/// default cost, the sweep carries on over the remaining cells
	pub fn calculate_cost_field(
		&mut self,
		obstacles: &dyn ObstacleQuery,
		classifiers: &TerrainClassifiers,
	) -> Result<CostFieldReport, FlowFieldError> {
		let half_extents = Vec3::splat(self.get_cell_radius() * OBSTACLE_PROBE_SCALE);
		let mut report = CostFieldReport::default();
		for cell in self.get_cells_mut().iter_mut() {
			cell.set_cost(COST_DEFAULT);
			let overlapping = match obstacles.overlap_box(cell.get_world_position(), half_extents)
			{
				Ok(overlapping) => overlapping,
				Err(e) => {
					warn!(
						"Obstacle query for cell {:?} failed, using default cost: {}",
						cell.get_grid_index(),
						e
					);
					report.failed_queries += 1;
					continue;
				}
			};
			if overlapping.iter().any(|o| classifiers.is_impassable(o)) {
				cell.set_cost(COST_IMPASSABLE);
				report.impassable += 1;
			} else if overlapping.iter().any(|o| classifiers.is_difficult(o)) {
				cell.add_cost(DIFFICULT_TERRAIN_PENALTY)?;
				report.difficult += 1;
			}
		}
		trace!("Cost field: {:?}", report);
		Ok(report)
	}
}
