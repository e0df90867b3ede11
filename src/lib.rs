//! This is a plugin for Bevy game engine to calculate a pathfinding FlowField
//! across a grid of cells towards a single destination
//!

pub mod flowfields;
pub mod pathfinder;
pub mod plugin;

pub mod prelude;
