//! Rebuilding the fields for a new destination is split into stages so that a
//! host frame loop can advance it a little at a time rather than stalling for
//! the whole calculation.
//!
//! A [RebuildTask] works on its own copy of the grid, the published grid is
//! only replaced once every stage has succeeded, so readers never observe a
//! half built field:
//!
//! ```text
//! CostPass -> IntegrationPass -> DirectionPass -> Complete
//!    |              |                 |
//!   yield         yield             yield
//! ```
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Identifies a requested rebuild, later requests have larger tickets
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub struct RebuildTicket(u64);

impl RebuildTicket {
	/// Create a new instance of [RebuildTicket]
	pub fn new(id: u64) -> Self {
		RebuildTicket(id)
	}
	/// Get the raw id
	pub fn get(&self) -> u64 {
		self.0
	}
	/// The ticket issued after this one
	pub fn next(&self) -> Self {
		RebuildTicket(self.0 + 1)
	}
}

/// The next piece of work a [RebuildTask] will perform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RebuildStage {
	/// Reset the scratch grid and derive costs from obstacles
	CostPass,
	/// Relax costs outwards from the destination
	IntegrationPass,
	/// Point each cell at its cheapest neighbour
	DirectionPass,
	/// Every stage has run, the grid can be published
	Complete,
}

/// An in-flight rebuild of the fields towards a single destination
#[derive(Debug)]
pub struct RebuildTask {
	/// Which request this task is fulfilling
	ticket: RebuildTicket,
	/// Where the field flows to
	destination: GridIndex,
	/// Private copy of the grid being built
	scratch: FieldGrid,
	/// What runs on the next [RebuildTask::step]
	stage: RebuildStage,
}

impl RebuildTask {
	/// Create a task that will build a copy of `grid` towards `destination`
	pub fn new(ticket: RebuildTicket, destination: GridIndex, grid: &FieldGrid) -> Self {
		RebuildTask {
			ticket,
			destination,
			scratch: grid.clone(),
			stage: RebuildStage::CostPass,
		}
	}
	/// Get the ticket of the request
	pub fn get_ticket(&self) -> RebuildTicket {
		self.ticket
	}
	/// Get the destination being built towards
	pub fn get_destination(&self) -> GridIndex {
		self.destination
	}
	/// Get the stage that will run next
	pub fn get_stage(&self) -> RebuildStage {
		self.stage
	}
	/// Whether every stage has run
	pub fn is_complete(&self) -> bool {
		self.stage == RebuildStage::Complete
	}
	/// Run exactly one stage. Returns the stage that will run next
	pub fn step(
		&mut self,
		obstacles: &dyn ObstacleQuery,
		classifiers: &TerrainClassifiers,
	) -> Result<RebuildStage, FlowFieldError> {
		match self.stage {
			RebuildStage::CostPass => {
				self.scratch.reset_fields();
				let report = self.scratch.calculate_cost_field(obstacles, classifiers)?;
				if report.failed_queries > 0 {
					warn!(
						"Rebuild {:?} had {} failed obstacle queries",
						self.ticket, report.failed_queries
					);
				}
				self.stage = RebuildStage::IntegrationPass;
			}
			RebuildStage::IntegrationPass => {
				self.scratch.calculate_integration_field(self.destination)?;
				self.stage = RebuildStage::DirectionPass;
			}
			RebuildStage::DirectionPass => {
				self.scratch.calculate_flow_field()?;
				self.stage = RebuildStage::Complete;
			}
			RebuildStage::Complete => {}
		}
		debug!("Rebuild {:?} advanced to {:?}", self.ticket, self.stage);
		Ok(self.stage)
	}
	/// Consume a complete task and yield the finished grid, [None] if stages remain
	pub fn into_grid(self) -> Option<FieldGrid> {
		if self.is_complete() {
			Some(self.scratch)
		} else {
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn classifiers() -> TerrainClassifiers {
		TerrainClassifiers::new(LayerMask::from_layers(&[2]), LayerMask::from_layers(&[1]))
	}

	#[test]
	fn stages_run_in_order() {
		let grid = FieldGrid::new(4, 4, 0.5).unwrap();
		let mut task = RebuildTask::new(RebuildTicket::new(1), GridIndex::new(0, 0), &grid);
		let obstacles = BoxObstacles::new();
		assert_eq!(RebuildStage::CostPass, task.get_stage());
		let result = task.step(&obstacles, &classifiers()).unwrap();
		assert_eq!(RebuildStage::IntegrationPass, result);
		let result = task.step(&obstacles, &classifiers()).unwrap();
		assert_eq!(RebuildStage::DirectionPass, result);
		let result = task.step(&obstacles, &classifiers()).unwrap();
		assert_eq!(RebuildStage::Complete, result);
		let built = task.into_grid().unwrap();
		let far = built.get_cell(GridIndex::new(3, 3)).unwrap();
		assert_eq!(3, far.get_best_cost());
	}
	#[test]
	fn incomplete_task_has_no_grid() {
		let grid = FieldGrid::new(2, 2, 0.5).unwrap();
		let mut task = RebuildTask::new(RebuildTicket::new(1), GridIndex::new(0, 0), &grid);
		task.step(&BoxObstacles::new(), &classifiers()).unwrap();
		assert!(task.into_grid().is_none());
	}
	#[test]
	fn source_grid_is_untouched() {
		let grid = FieldGrid::new(3, 3, 0.5).unwrap();
		let mut task = RebuildTask::new(RebuildTicket::new(1), GridIndex::new(1, 1), &grid);
		let obstacles = BoxObstacles::new();
		while !task.is_complete() {
			task.step(&obstacles, &classifiers()).unwrap();
		}
		assert!(grid.get_cells().iter().all(|c| !c.is_reached()));
	}
	#[test]
	fn tickets_are_ordered() {
		let first = RebuildTicket::default();
		let second = first.next();
		assert!(second > first);
		assert_eq!(1, second.get());
	}
}
