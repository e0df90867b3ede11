//! The integration field is the `best_cost` of every [GridCell], a 16-bit
//! cumulative cost of reaching the destination. It uses the cost field as its
//! input.
//!
//! When a new destination needs to be processed the field is reset to
//! `u16::MAX` and the cell containing the destination is set to `0`. The
//! destination is pushed onto a FIFO queue and then:
//!
//! 1. Pop a cell from the queue
//! 2. Find its neighbours (orthogonal, plus diagonals which aren't cut off by impassable corners)
//! 3. For each passable neighbour add its cost to the popped cell's integration cost
//! 4. If that's cheaper than what the neighbour currently holds then store it and push the neighbour onto the queue
//! 5. Repeat until the queue is empty
//!
//! A cell may be revisited whenever a cheaper route to it is found so the
//! field settles on the cheapest route from every reachable cell. As diagonal
//! steps cost the same as orthogonal ones on uniform ground this produces a
//! square wavefront (the underlying costs are `1` here with the destination
//! at the centre):
//!
//! ```text
//!  _______________________________
//! |     |     |     |     |     |
//! |  2  |  2  |  2  |  2  |  2  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  2  |  1  |  1  |  1  |  2  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  2  |  1  |  0  |  1  |  2  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  2  |  1  |  1  |  1  |  2  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  2  |  2  |  2  |  2  |  2  |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! Impassable cells are never relaxed and keep `u16::MAX`, as does any cell
//! walled off from the destination.
//!

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::prelude::*;

impl FieldGrid {
	/// From the `destination` iterate over successive neighbouring cells and
	/// calculate the integration cost of every cell that can reach it.
	///
	/// Only the `best_cost` of the destination is zeroed, its terrain `cost`
	/// is left as the cost pass assigned it.
	///
	/// Errors if the `destination` lies outside of the grid or if a cumulative
	/// cost can't be represented
	pub fn calculate_integration_field(
		&mut self,
		destination: GridIndex,
	) -> Result<(), FlowFieldError> {
		let goal = self.get_cell_mut(destination)?;
		if !goal.is_passable() {
			warn!(
				"Destination {:?} is impassable, actors will gather around it",
				destination
			);
		}
		goal.set_best_cost(0);
		let mut queue = VecDeque::new();
		queue.push_back(destination);
		let mut relaxations: usize = 0;
		while let Some(index) = queue.pop_front() {
			let current_best = self.get_cell(index)?.get_best_cost();
			for n in self.get_neighbours(index).iter() {
				let neighbour = self.get_cell_mut(*n)?;
				// ignore impassable cells
				if !neighbour.is_passable() {
					continue;
				}
				let int_cost = (neighbour.get_cost() as u16)
					.checked_add(current_best)
					.filter(|cost| *cost != BEST_COST_UNREACHED)
					.ok_or(FlowFieldError::CostOverflow { index: *n })?;
				// don't overwrite a cell with a better cost
				if int_cost < neighbour.get_best_cost() {
					neighbour.set_best_cost(int_cost);
					queue.push_back(*n);
					relaxations += 1;
				}
			}
		}
		trace!(
			"Integration field from {:?} settled after {} relaxations",
			destination,
			relaxations
		);
		Ok(())
	}
}
