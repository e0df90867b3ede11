//! The three fields built over the [FieldGrid], in the order a rebuild runs them:
//!
//! * [cost_field] - the cost of moving through each cell, derived from obstacle queries
//! * [integration_field] - the cumulative cost of reaching the destination from each cell
//! * [flow_field] - the direction each cell should be left by to reach the destination
//!
//! Each pass reads the results of the passes before it, so they must run in order
//!

pub mod cost_field;
pub mod flow_field;
pub mod integration_field;

use crate::prelude::*;

impl FieldGrid {
	/// Clear the results of any previous rebuild, every cell returns to the
	/// default cost with no route and no direction
	pub fn reset_fields(&mut self) {
		for cell in self.get_cells_mut().iter_mut() {
			cell.set_cost(COST_DEFAULT);
			cell.set_best_cost(BEST_COST_UNREACHED);
			cell.set_best_direction(Direction::None);
		}
	}
}
