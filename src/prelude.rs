//! `use bevy_flowfield_pathfinder::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::flowfields::{
	error::*,
	fields::{cost_field::*, *},
	grid::*,
	obstacles::*,
	rebuild::*,
	snapshot::*,
	utilities::*,
};

#[doc(hidden)]
pub use crate::{
	pathfinder::*,
	plugin::{destination_layer::*, rebuild_layer::*, *},
};
