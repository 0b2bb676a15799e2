//! Turn-aware pathfinding for tile-based strategy games.
//!
//! Units move with a per-turn movement allowance, so a route is measured in
//! both cost and turns. This crate searches such routes with pluggable
//! policies:
//!
//! - a [`CostDecider`] prices each step and tracks the mover's remaining
//!   movement, rolling over to a new turn when a step does not fit;
//! - a [`GoalDecider`] decides which settled node the search should end at,
//!   optionally remembering fallback sub-goals.
//!
//! All searches run through [`PathFinder`], which owns and reuses its node
//! arena and frontier so repeated queries allocate little after warm-up.
//!
//! # Trait hierarchy
//!
//! | Trait | Role |
//! |---|---|
//! | [`WorldMap`] | adjacency and bounds |
//! | [`MoveRules`] : [`WorldMap`] | mover allowance and terrain costs |
//! | [`CostDecider`] | step pricing policy |
//! | [`GoalDecider`] | termination policy |
//!
//! # Example
//!
//! ```
//! use tilepath_core::{Point, Range};
//! use tilepath_search::{MoveRules, PathFinder, WorldMap};
//!
//! struct Plains;
//!
//! impl WorldMap for Plains {
//!     fn range(&self) -> Range {
//!         Range::with_size(8, 1)
//!     }
//!
//!     fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
//!         buf.extend(p.neighbors_4().into_iter().filter(|n| self.is_on_map(*n)));
//!     }
//! }
//!
//! impl MoveRules for Plains {
//!     type Mover = ();
//!
//!     fn movement_allowance(&self, _: &()) -> i32 {
//!         3
//!     }
//!
//!     fn terrain_cost(&self, _: &(), _: Point, _: Point) -> i32 {
//!         1
//!     }
//! }
//!
//! let mut finder = PathFinder::new();
//! let path = finder
//!     .find_path(&Plains, &(), Point::new(0, 0), Point::new(5, 0))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(path.cost(), 5);
//! assert_eq!(path.turns(), 1);
//! ```

mod cost;
mod error;
mod finder;
mod goal;
mod limits;
mod node;
mod path;
mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cost::{
    AvoidIllegalCostDecider, AvoidSettlementsCostDecider, BaseCostDecider, CostDecider,
    CostPolicy, ILLEGAL_MOVE, RoadPreferringCostDecider, StepOutcome,
};
pub use error::SearchError;
pub use finder::{PathFinder, SearchStats};
pub use goal::{
    AdjacentGoal, Compose, ComposedGoal, FallbackGoal, GoalDecider, GoalVerdict,
    HighestScoreGoal, LocationGoal, MatchGoal, ReachAll,
};
pub use limits::SearchLimits;
pub use node::{NodeId, SearchNode};
pub use path::Path;
pub use traits::{MoveRules, MoveType, WorldMap};

pub use tilepath_core::{Direction, Point, Range};
