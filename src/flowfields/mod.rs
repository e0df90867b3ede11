//! Flowfields are a means of handling pathfinding for a crowd of actors.
//!
//! [Fixing Pathfinding Once and For All](https://web.archive.org/web/20150905073624/http://www.ai-blog.net/archives/000152.html)
//!
//! [jdxdev](https://www.jdxdev.com/blog/2020/05/03/flowfields/)
//!
//! [leifnode](https://leifnode.com/2013/12/flow-field-pathfinding/)
//!
//! The world is covered by a single rectangular grid of cells lying on the
//! `x-z` plane, cell `(0, 0)` sits at the world origin and North is `+z`. Every
//! cell carries three layers of data which together form the fields:
//!
//! ```text
//!  _____________________________
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! |__|__|__|__|__|__|__|__|__|__|
//! ```
//!
//! * Cost field - 8-bit value where `255` represents impassable terrain and range `1 - 254`
//! represents the cost of traversing the cell, `1` being the default and easiest. Difficult
//! terrain raises the cost so pathing will try to avoid it
//! * Integration field - uses the cost field as input and stores the calculated cost-to-goal,
//! the cumulative cost of travelling from a cell to the destination
//! * Flow field - the direction an actor standing in a cell should move in to reach the
//! destination along the cheapest route
//!
//! The fields are rebuilt together whenever the destination changes, see [rebuild].
//!

pub mod error;
pub mod fields;
pub mod grid;
pub mod obstacles;
pub mod rebuild;
pub mod snapshot;
pub mod utilities;
