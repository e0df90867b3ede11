//! The flow field is the `best_direction` of every [GridCell]. It is derived
//! from the integration field: each cell points at the neighbour with the
//! lowest integration cost, provided that neighbour is strictly cheaper than
//! the cell itself. A steering pipeline/character controller reads the
//! [Direction] of the cell an actor stands in to move it towards the
//! destination.
//!
//! Neighbours are the same as those used by the integration field, so a
//! diagonal flanked by an impassable cell is never chosen:
//!
//! ```text
//!   X ~ <- never points here from o
//!   o X
//! ```
//!
//! Neighbours are inspected North, East, South, West and then the diagonals,
//! the first cheapest neighbour found wins so ties favour orthogonal movement.
//!
//! The destination, and any cell without a route, keeps [Direction::None].
//!

use bevy::prelude::*;

use crate::prelude::*;

impl FieldGrid {
	/// Calculate the direction of every cell from the integration field, which
	/// must already be fully relaxed
	pub fn calculate_flow_field(&mut self) -> Result<(), FlowFieldError> {
		let mut directed: usize = 0;
		for i in 0..self.get_cells().len() {
			let cell = &self.get_cells()[i];
			let field_cell = cell.get_grid_index();
			// unreached cells, impassable ones included, have no route
			if !cell.is_reached() {
				self.get_cells_mut()[i].set_best_direction(Direction::None);
				continue;
			}
			// store the cheapest node
			let mut cheapest_value = cell.get_best_cost();
			let mut cheapest_neighbour = None;
			for n in self.get_neighbours(field_cell).iter() {
				let neighbour_cost = self.get_cell(*n)?.get_best_cost();
				if neighbour_cost < cheapest_value {
					cheapest_value = neighbour_cost;
					cheapest_neighbour = Some(*n);
				}
			}
			let direction = match cheapest_neighbour {
				Some(target) => {
					directed += 1;
					Direction::cell_to_cell_direction(target, field_cell)?
				}
				None => Direction::None,
			};
			self.get_cells_mut()[i].set_best_direction(direction);
		}
		trace!("Flow field directed {} cells", directed);
		Ok(())
	}
}
