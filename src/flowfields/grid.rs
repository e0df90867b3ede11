//! The grid is a fixed `width x height` lattice of [GridCell]s laid across the
//! `x-z` plane of the world. Each cell records its traversal cost, its
//! cumulative cost to the destination and the [Direction] an actor should move
//! in to reach the destination.
//!
//! Cells are indexed from the world origin, `(0, 0)` is the cell whose centre
//! sits at `(radius, 0, radius)`:
//!
//! ```text
//!   y/z
//!    ^
//!    |__ __ __ __
//!    |__|__|__|__|
//!    |__|__|__|__|
//!    |__|__|__|__|
//!    |__|__|__|__|----> x
//!  (0,0)
//! ```
//!
//! Cells never reference each other, all neighbour lookups go through the
//! [FieldGrid] by [GridIndex].
//!

use bevy::prelude::*;

use crate::prelude::*;

/// ID of a cell within the grid, `(x, y)`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct GridIndex((usize, usize));

impl GridIndex {
	/// Create a new instance of [GridIndex]
	pub fn new(x: usize, y: usize) -> Self {
		GridIndex((x, y))
	}
	/// Get the `(x, y)` tuple
	pub fn get_xy(&self) -> (usize, usize) {
		self.0
	}
	/// Get the column
	pub fn get_x(&self) -> usize {
		self.0 .0
	}
	/// Get the row
	pub fn get_y(&self) -> usize {
		self.0 .1
	}
	/// Signed representation, used for offset arithmetic
	pub fn as_ivec2(&self) -> IVec2 {
		IVec2::new(self.get_x() as i32, self.get_y() as i32)
	}
	/// Step one cell in `direction`. Returns [None] if the step would take the
	/// index below zero, the upper bounds are the concern of the [FieldGrid]
	pub fn step(&self, direction: Direction) -> Option<GridIndex> {
		let offset = direction.get_vector();
		let x = self.get_x().checked_add_signed(offset.x as isize)?;
		let y = self.get_y().checked_add_signed(offset.y as isize)?;
		Some(GridIndex::new(x, y))
	}
}

/// A single site of the lattice
#[derive(Clone, Debug, PartialEq)]
pub struct GridCell {
	/// Centre of the cell in world space
	world_position: Vec3,
	/// Position of the cell in the lattice
	grid_index: GridIndex,
	/// Cost of moving through this cell, `255` is impassable
	cost: u8,
	/// Cumulative cost of reaching the destination from this cell
	best_cost: u16,
	/// Direction to move in from this cell
	best_direction: Direction,
}

impl GridCell {
	/// Create a new cell with a default cost and no route
	fn new(world_position: Vec3, grid_index: GridIndex) -> Self {
		GridCell {
			world_position,
			grid_index,
			cost: COST_DEFAULT,
			best_cost: BEST_COST_UNREACHED,
			best_direction: Direction::None,
		}
	}
	/// Get the centre of the cell in world space
	pub fn get_world_position(&self) -> Vec3 {
		self.world_position
	}
	/// Get the index of the cell
	pub fn get_grid_index(&self) -> GridIndex {
		self.grid_index
	}
	/// Get the traversal cost
	pub fn get_cost(&self) -> u8 {
		self.cost
	}
	/// Get the cumulative cost to the destination
	pub fn get_best_cost(&self) -> u16 {
		self.best_cost
	}
	/// Get the direction of travel
	pub fn get_best_direction(&self) -> Direction {
		self.best_direction
	}
	/// Whether the cell can be entered
	pub fn is_passable(&self) -> bool {
		self.cost != COST_IMPASSABLE
	}
	/// Whether the integration pass found a route from this cell
	pub fn is_reached(&self) -> bool {
		self.best_cost != BEST_COST_UNREACHED
	}
	pub(crate) fn set_cost(&mut self, cost: u8) {
		self.cost = cost;
	}
	/// Increase the cost of the cell, an impassable cell stays impassable.
	/// Reaching the impassable value by accumulation is an error
	pub(crate) fn add_cost(&mut self, amount: u8) -> Result<(), FlowFieldError> {
		if self.cost == COST_IMPASSABLE {
			return Ok(());
		}
		match self.cost.checked_add(amount) {
			Some(cost) if cost != COST_IMPASSABLE => {
				self.cost = cost;
				Ok(())
			}
			_ => Err(FlowFieldError::CostOverflow {
				index: self.grid_index,
			}),
		}
	}
	pub(crate) fn set_best_cost(&mut self, best_cost: u16) {
		self.best_cost = best_cost;
	}
	pub(crate) fn set_best_direction(&mut self, direction: Direction) {
		self.best_direction = direction;
	}
}

/// The lattice of cells, allocated once and mutated in place by each field pass
#[derive(Clone, Debug)]
pub struct FieldGrid {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// Half the length of a side of a cell
	cell_radius: f32,
	/// Cells stored row by row
	cells: Vec<GridCell>,
}

impl FieldGrid {
	/// Allocate a new grid. Errors with [FlowFieldError::InvalidConfig] if
	/// either dimension is zero, the cell count can't be represented or the
	/// radius isn't a positive finite number
	pub fn new(width: usize, height: usize, cell_radius: f32) -> Result<Self, FlowFieldError> {
		FieldGrid::validate(width, height, cell_radius)?;
		Ok(FieldGrid::allocate(width, height, cell_radius))
	}
	/// Check that a grid of the given shape can be built
	pub(crate) fn validate(
		width: usize,
		height: usize,
		cell_radius: f32,
	) -> Result<(), FlowFieldError> {
		if width == 0 || height == 0 {
			return Err(FlowFieldError::InvalidConfig(format!(
				"grid dimensions must be at least 1x1, got {}x{}",
				width, height
			)));
		}
		if width.checked_mul(height).is_none() {
			return Err(FlowFieldError::InvalidConfig(format!(
				"grid of {}x{} cells cannot be allocated",
				width, height
			)));
		}
		if !cell_radius.is_finite() || cell_radius <= 0.0 {
			return Err(FlowFieldError::InvalidConfig(format!(
				"cell radius must be positive and finite, got {}",
				cell_radius
			)));
		}
		Ok(())
	}
	/// Build the cells of a grid whose shape has already been validated
	pub(crate) fn allocate(width: usize, height: usize, cell_radius: f32) -> Self {
		let diameter = cell_radius * 2.0;
		let mut cells = Vec::with_capacity(width * height);
		for y in 0..height {
			for x in 0..width {
				let world_position = Vec3::new(
					diameter * x as f32 + cell_radius,
					0.0,
					diameter * y as f32 + cell_radius,
				);
				cells.push(GridCell::new(world_position, GridIndex::new(x, y)));
			}
		}
		FieldGrid {
			width,
			height,
			cell_radius,
			cells,
		}
	}
	/// Get the number of columns
	pub fn get_width(&self) -> usize {
		self.width
	}
	/// Get the number of rows
	pub fn get_height(&self) -> usize {
		self.height
	}
	/// Get the radius of a cell
	pub fn get_cell_radius(&self) -> f32 {
		self.cell_radius
	}
	/// Get the diameter of a cell
	pub fn get_cell_diameter(&self) -> f32 {
		self.cell_radius * 2.0
	}
	/// Get all cells, row by row
	pub fn get_cells(&self) -> &[GridCell] {
		&self.cells
	}
	/// Get all cells mutably, row by row
	pub(crate) fn get_cells_mut(&mut self) -> &mut [GridCell] {
		&mut self.cells
	}
	/// Whether `index` lies inside the grid
	pub fn contains(&self, index: GridIndex) -> bool {
		index.get_x() < self.width && index.get_y() < self.height
	}
	/// Position of `index` in the backing storage
	fn offset_of(&self, index: GridIndex) -> Option<usize> {
		if self.contains(index) {
			Some(index.get_y() * self.width + index.get_x())
		} else {
			None
		}
	}
	/// Builds the error of a direct lookup outside of the grid
	fn out_of_bounds(&self, index: GridIndex) -> FlowFieldError {
		FlowFieldError::OutOfBounds {
			index,
			width: self.width,
			height: self.height,
		}
	}
	/// Retrieve a cell, errors if `index` is outside of the grid
	pub fn get_cell(&self, index: GridIndex) -> Result<&GridCell, FlowFieldError> {
		match self.offset_of(index) {
			Some(i) => Ok(&self.cells[i]),
			None => Err(self.out_of_bounds(index)),
		}
	}
	/// Retrieve a mutable cell, errors if `index` is outside of the grid
	pub(crate) fn get_cell_mut(&mut self, index: GridIndex) -> Result<&mut GridCell, FlowFieldError> {
		match self.offset_of(index) {
			Some(i) => Ok(&mut self.cells[i]),
			None => Err(self.out_of_bounds(index)),
		}
	}
	/// Overwrite the traversal cost of a cell. Note that the next cost pass of
	/// a rebuild replaces any value set this way
	pub fn set_cost(&mut self, index: GridIndex, cost: u8) -> Result<(), FlowFieldError> {
		self.get_cell_mut(index)?.set_cost(cost);
		Ok(())
	}
	/// Get the cell one step from `index` in `direction`, [None] when the step leaves the grid
	pub fn get_cell_at_relative_position(
		&self,
		index: GridIndex,
		direction: Direction,
	) -> Option<&GridCell> {
		let target = index.step(direction)?;
		let i = self.offset_of(target)?;
		Some(&self.cells[i])
	}
	/// Find the neighbours of `index` that movement can flow between.
	///
	/// Passable orthogonal neighbours are included first (North, East, South,
	/// West). A diagonal neighbour is only included when both cardinal cells
	/// flanking it are passable so that routes never cut a corner formed by
	/// impassable cells, i.e
	///
	/// ```text
	///   X ~ <- ignore diagonal from o
	///   o X
	/// ```
	///
	/// Any neighbour outside of the grid is silently excluded
	pub fn get_neighbours(&self, index: GridIndex) -> Vec<GridIndex> {
		let mut passable = Vec::with_capacity(8);
		for direction in Direction::CARDINAL.iter() {
			if let Some(cell) = self.get_cell_at_relative_position(index, *direction) {
				if cell.is_passable() {
					passable.push(*direction);
				}
			}
		}
		let mut neighbours: Vec<GridIndex> = passable
			.iter()
			.filter_map(|direction| index.step(*direction))
			.collect();
		for diagonal in [
			Direction::NorthEast,
			Direction::NorthWest,
			Direction::SouthEast,
			Direction::SouthWest,
		] {
			if let Some((a, b)) = diagonal.flanking_cardinals() {
				if passable.contains(&a) && passable.contains(&b) {
					if let Some(cell) = self.get_cell_at_relative_position(index, diagonal) {
						neighbours.push(cell.get_grid_index());
					}
				}
			}
		}
		neighbours
	}
	/// Get the world space centre of a cell
	pub fn index_to_world(&self, index: GridIndex) -> Result<Vec3, FlowFieldError> {
		Ok(self.get_cell(index)?.get_world_position())
	}
	/// Map a world position onto the grid. The position is converted to a
	/// fraction of the grid extent along `x` and `z`, clamped into `[0, 1]`,
	/// scaled by the grid dimensions and floored, so any position resolves to
	/// a cell inside the grid
	pub fn world_to_index(&self, position: Vec3) -> GridIndex {
		let diameter = self.get_cell_diameter();
		let percent_x = (position.x / self.width as f32 / diameter).clamp(0.0, 1.0);
		let percent_y = (position.z / self.height as f32 / diameter).clamp(0.0, 1.0);
		// NaN saturates to 0 on the cast
		let x = ((self.width as f32 * percent_x).floor() as usize).min(self.width.saturating_sub(1));
		let y =
			((self.height as f32 * percent_y).floor() as usize).min(self.height.saturating_sub(1));
		GridIndex::new(x, y)
	}
}
