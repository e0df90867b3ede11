//! The [Pathfinder] owns a grid and the lifecycle of its fields. Hosts set a
//! destination, advance the rebuild a stage at a time (or let the
//! [crate::plugin::FlowFieldPathfinderPlugin] do it each frame) and read
//! directions, paths and debug data from the last published field.
//!
//! Only one rebuild is ever in flight. A destination requested while a rebuild
//! is running is queued, and a later request replaces any earlier queued one,
//! so the last requested destination always wins without two rebuilds ever
//! touching the grid at once.
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Construction parameters of a [Pathfinder], immutable once created
#[derive(Clone, Debug)]
pub struct PathfinderConfig {
	/// Number of columns
	grid_width: usize,
	/// Number of rows
	grid_height: usize,
	/// Half the length of a side of a cell in world units
	cell_radius: f32,
	/// How obstacles are classified into terrain costs
	classifiers: TerrainClassifiers,
}

impl PathfinderConfig {
	/// Create a new instance of [PathfinderConfig]. The grid must have at
	/// least one cell and the radius must be a positive finite number
	pub fn new(
		grid_width: usize,
		grid_height: usize,
		cell_radius: f32,
		difficult_terrain: impl TerrainClassifier + 'static,
		impassable_terrain: impl TerrainClassifier + 'static,
	) -> Result<Self, FlowFieldError> {
		FieldGrid::validate(grid_width, grid_height, cell_radius)?;
		Ok(PathfinderConfig {
			grid_width,
			grid_height,
			cell_radius,
			classifiers: TerrainClassifiers::new(difficult_terrain, impassable_terrain),
		})
	}
	/// Get the number of columns
	pub fn get_grid_width(&self) -> usize {
		self.grid_width
	}
	/// Get the number of rows
	pub fn get_grid_height(&self) -> usize {
		self.grid_height
	}
	/// Get the radius of a cell
	pub fn get_cell_radius(&self) -> f32 {
		self.cell_radius
	}
	/// Get the terrain classifiers
	pub fn get_classifiers(&self) -> &TerrainClassifiers {
		&self.classifiers
	}
}

/// What a call to [Pathfinder::advance] did
#[derive(Clone, Debug, PartialEq)]
pub enum RebuildProgress {
	/// No rebuild is in flight or queued
	Idle,
	/// A stage ran, more remain
	Working {
		/// The rebuild being worked on
		ticket: RebuildTicket,
		/// The stage that will run next
		next: RebuildStage,
	},
	/// The rebuild finished and its field is now the one being read
	Published(RebuildTicket),
	/// The rebuild was aborted, the previous field is still published
	Failed(RebuildTicket, FlowFieldError),
}

/// The outcome of a rebuild request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebuildStatus {
	/// Queued or in flight
	Pending,
	/// Its field is the one currently published
	Published,
	/// A later request replaced it, either before it ran or by publishing after it
	Superseded,
	/// The rebuild was aborted by an error and no later field has been published
	Failed,
	/// The ticket was never issued by this [Pathfinder]
	Unknown,
}

/// A sample of the published field at a world position, used to steer actors
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowSample {
	/// The cell underneath the position
	pub index: GridIndex,
	/// Direction of travel out of the cell
	pub direction: Direction,
	/// Cumulative cost to the destination from the cell
	pub best_cost: u16,
}

impl FlowSample {
	/// Unit vector on the `x-z` plane to steer along, zero when there's no direction
	pub fn steering_vector(&self) -> Vec3 {
		let offset = self.direction.get_vector();
		Vec3::new(offset.x as f32, 0.0, offset.y as f32).normalize_or_zero()
	}
	/// Whether an actor in this cell has arrived, i.e it stands in or next to the destination
	pub fn has_arrived(&self) -> bool {
		self.best_cost <= 1
	}
}

/// Owns a grid of flow fields towards a single destination
#[derive(Component, Debug)]
pub struct Pathfinder {
	/// Construction parameters
	config: PathfinderConfig,
	/// The last completed field, the only grid readers ever see
	grid: FieldGrid,
	/// Destination of the published field
	destination: GridIndex,
	/// Ticket of the published field, [None] until the first rebuild completes
	published: Option<RebuildTicket>,
	/// The rebuild currently being worked on
	in_flight: Option<RebuildTask>,
	/// A requested rebuild waiting for the in-flight one to finish
	queued: Option<(RebuildTicket, GridIndex)>,
	/// Ticket handed to the most recent request
	last_ticket: RebuildTicket,
	/// Tickets aborted since the field was last published
	failed: Vec<RebuildTicket>,
}

impl Pathfinder {
	/// Allocate the grid and request an initial rebuild towards cell `(0, 0)`.
	///
	/// The initial field is published once the rebuild has been advanced to
	/// completion, until then every cell reads as unreached
	pub fn new(config: PathfinderConfig) -> Self {
		let grid = FieldGrid::allocate(
			config.get_grid_width(),
			config.get_grid_height(),
			config.get_cell_radius(),
		);
		let mut pathfinder = Pathfinder {
			config,
			grid,
			destination: GridIndex::default(),
			published: None,
			in_flight: None,
			queued: None,
			last_ticket: RebuildTicket::default(),
			failed: Vec::new(),
		};
		pathfinder.request_rebuild(GridIndex::default());
		pathfinder
	}
	/// Get the configuration
	pub fn get_config(&self) -> &PathfinderConfig {
		&self.config
	}
	/// Get the last published grid
	pub fn get_grid(&self) -> &FieldGrid {
		&self.grid
	}
	/// Get the destination of the last published field
	pub fn get_destination(&self) -> GridIndex {
		self.destination
	}
	/// Get the ticket of the last published field
	pub fn get_published_ticket(&self) -> Option<RebuildTicket> {
		self.published
	}
	/// Whether a rebuild is in flight or queued
	pub fn is_rebuilding(&self) -> bool {
		self.in_flight.is_some() || self.queued.is_some()
	}
	/// Whether the next call to [Pathfinder::advance] runs a cost pass, the
	/// only stage which reads obstacles
	pub fn needs_obstacles(&self) -> bool {
		match &self.in_flight {
			Some(task) => task.get_stage() == RebuildStage::CostPass,
			None => self.queued.is_some(),
		}
	}
	/// Map a world position to the cell containing it, clamped into the grid
	pub fn world_to_index(&self, position: Vec3) -> GridIndex {
		self.grid.world_to_index(position)
	}
	/// Request that the fields be rebuilt to flow towards `world_position`.
	///
	/// The returned ticket can be polled with [Pathfinder::rebuild_status]
	pub fn set_destination(&mut self, world_position: Vec3) -> RebuildTicket {
		let destination = self.world_to_index(world_position);
		self.request_rebuild(destination)
	}
	/// Request a rebuild towards the cell `destination`, which is clamped into the grid
	pub fn set_destination_index(&mut self, destination: GridIndex) -> RebuildTicket {
		let clamped = GridIndex::new(
			destination.get_x().min(self.grid.get_width() - 1),
			destination.get_y().min(self.grid.get_height() - 1),
		);
		self.request_rebuild(clamped)
	}
	/// Start a rebuild if none is in flight, otherwise queue it in place of
	/// any earlier queued request
	fn request_rebuild(&mut self, destination: GridIndex) -> RebuildTicket {
		let ticket = self.last_ticket.next();
		self.last_ticket = ticket;
		if self.in_flight.is_none() {
			debug!("Starting rebuild {:?} towards {:?}", ticket, destination);
			self.in_flight = Some(RebuildTask::new(ticket, destination, &self.grid));
		} else {
			if let Some((replaced, _)) = self.queued {
				debug!("Rebuild {:?} replaced by {:?}", replaced, ticket);
			}
			self.queued = Some((ticket, destination));
		}
		ticket
	}
	/// Run a single stage of the in-flight rebuild, starting the queued one
	/// if nothing is in flight. A completed rebuild is published immediately,
	/// a failed one is discarded and the previous field kept
	pub fn advance(&mut self, obstacles: &dyn ObstacleQuery) -> RebuildProgress {
		if self.in_flight.is_none() {
			match self.queued.take() {
				Some((ticket, destination)) => {
					debug!("Starting rebuild {:?} towards {:?}", ticket, destination);
					self.in_flight = Some(RebuildTask::new(ticket, destination, &self.grid));
				}
				None => return RebuildProgress::Idle,
			}
		}
		let Some(task) = self.in_flight.as_mut() else {
			return RebuildProgress::Idle;
		};
		let ticket = task.get_ticket();
		match task.step(obstacles, self.config.get_classifiers()) {
			Ok(RebuildStage::Complete) => {
				let Some(task) = self.in_flight.take() else {
					return RebuildProgress::Idle;
				};
				let destination = task.get_destination();
				if let Some(grid) = task.into_grid() {
					self.grid = grid;
					self.destination = destination;
					self.published = Some(ticket);
					self.failed.clear();
					debug!("Published rebuild {:?} towards {:?}", ticket, destination);
				}
				RebuildProgress::Published(ticket)
			}
			Ok(next) => RebuildProgress::Working { ticket, next },
			Err(e) => {
				error!(
					"Rebuild {:?} aborted, keeping the previous field: {}",
					ticket, e
				);
				self.in_flight = None;
				self.failed.push(ticket);
				RebuildProgress::Failed(ticket, e)
			}
		}
	}
	/// Advance until no rebuild is in flight or queued. Returns the outcome of
	/// the last rebuild to finish, [None] if there was nothing to do
	pub fn complete_rebuilds(&mut self, obstacles: &dyn ObstacleQuery) -> Option<RebuildProgress> {
		let mut last = None;
		loop {
			match self.advance(obstacles) {
				RebuildProgress::Idle => return last,
				RebuildProgress::Working { .. } => {}
				finished => last = Some(finished),
			}
		}
	}
	/// Find out what became of a rebuild request
	pub fn rebuild_status(&self, ticket: RebuildTicket) -> RebuildStatus {
		if self.published == Some(ticket) {
			return RebuildStatus::Published;
		}
		if ticket > self.last_ticket || ticket == RebuildTicket::default() {
			return RebuildStatus::Unknown;
		}
		if self.failed.contains(&ticket) {
			return RebuildStatus::Failed;
		}
		let in_flight = self.in_flight.as_ref().map(|t| t.get_ticket());
		let queued = self.queued.map(|(t, _)| t);
		if in_flight == Some(ticket) || queued == Some(ticket) {
			return RebuildStatus::Pending;
		}
		RebuildStatus::Superseded
	}
	/// Walk the published flow field from `start` until `end` is reached.
	///
	/// The returned path holds `start` and every cell stepped through, but not
	/// `end` itself. Errors if either index lies outside of the grid, or with
	/// [FlowFieldError::Unreachable] if the walk meets an impassable or
	/// unreached cell or a cell with no direction
	pub fn extract_path(
		&self,
		start: GridIndex,
		end: GridIndex,
	) -> Result<Vec<GridIndex>, FlowFieldError> {
		self.grid.get_cell(end)?;
		let unreachable = FlowFieldError::Unreachable { start, end };
		let mut current = self.grid.get_cell(start)?;
		let mut path = Vec::new();
		// a valid field strictly decreases with every step so can never take
		// more steps than there are cells
		let step_limit = self.grid.get_cells().len();
		while current.get_grid_index() != end {
			if !current.is_passable() || !current.is_reached() || path.len() >= step_limit {
				return Err(unreachable);
			}
			let index = current.get_grid_index();
			path.push(index);
			let next = index
				.step(current.get_best_direction())
				.filter(|next| *next != index)
				.ok_or_else(|| unreachable.clone())?;
			current = self.grid.get_cell(next)?;
		}
		Ok(path)
	}
	/// Whether a route exists from `start` to the published destination
	/// without crossing an impassable cell. Errors only if `start` lies outside of the grid
	pub fn is_path_valid(&self, start: GridIndex) -> Result<bool, FlowFieldError> {
		// a walk never steps onto an impassable cell, so any path found is valid
		match self.extract_path(start, self.destination) {
			Ok(_) => Ok(true),
			Err(FlowFieldError::Unreachable { .. }) => Ok(false),
			Err(e) => Err(e),
		}
	}
	/// Sample the published field underneath a world position
	pub fn sample_flow(&self, world_position: Vec3) -> Result<FlowSample, FlowFieldError> {
		let index = self.world_to_index(world_position);
		let cell = self.grid.get_cell(index)?;
		Ok(FlowSample {
			index,
			direction: cell.get_best_direction(),
			best_cost: cell.get_best_cost(),
		})
	}
	/// Take a read-only copy of the published field
	pub fn debug_snapshot(&self) -> FieldSnapshot {
		FieldSnapshot::capture(&self.grid, self.destination)
	}
}
