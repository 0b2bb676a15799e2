use tilepath_core::Point;

use crate::node::NodeId;

/// Caller contract violations reported before (or instead of) a path.
///
/// An unreachable goal is not an error: searches report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("origin {0} is not on the map")]
    OriginOffMap(Point),
    #[error("destination {0} is not on the map")]
    DestinationOffMap(Point),
    #[error("movement allowance must be positive, got {0}")]
    InvalidAllowance(i32),
    #[error("moves left {moves_left} outside 0..={allowance}")]
    InvalidMovesLeft { moves_left: i32, allowance: i32 },
    #[error("goal decider returned node {0:?} from another search; reset it before reuse")]
    StaleGoal(NodeId),
    #[error("a path needs at least its origin node")]
    EmptyPath,
}
