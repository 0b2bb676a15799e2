use tilepath_core::{Direction, Point};

use crate::error::SearchError;
use crate::node::SearchNode;

/// A route produced by a search: the nodes from the origin (inclusive) to
/// the goal (inclusive).
///
/// A path always holds at least one node. When the origin is the goal it
/// is that single node, with cost 0 and no turns.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<SearchNode>", into = "Vec<SearchNode>")
)]
pub struct Path {
    nodes: Vec<SearchNode>,
}

impl Path {
    /// Wrap nodes already in origin-to-goal order.
    pub(crate) fn from_nodes(nodes: Vec<SearchNode>) -> Self {
        debug_assert!(!nodes.is_empty(), "a path has at least its origin");
        Self { nodes }
    }

    #[inline]
    pub fn nodes(&self) -> &[SearchNode] {
        &self.nodes
    }

    /// Number of nodes, counting the origin.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the path never leaves the origin.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Number of steps taken.
    #[inline]
    pub fn steps(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn first(&self) -> Option<&SearchNode> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&SearchNode> {
        self.nodes.last()
    }

    #[inline]
    fn goal_node(&self) -> &SearchNode {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Where the path starts.
    pub fn origin(&self) -> Point {
        self.nodes[0].pos
    }

    /// Where the path ends.
    pub fn destination(&self) -> Point {
        self.goal_node().pos
    }

    /// Total cost of the path.
    pub fn cost(&self) -> i32 {
        self.goal_node().cost
    }

    /// Turn boundaries crossed by the path.
    pub fn turns(&self) -> u32 {
        self.goal_node().turns
    }

    /// Tiles visited, origin first.
    pub fn positions(&self) -> Vec<Point> {
        self.nodes.iter().map(|n| n.pos).collect()
    }

    /// Direction of every step. `None` for steps between tiles that do not
    /// touch.
    pub fn directions(&self) -> Vec<Option<Direction>> {
        self.nodes.iter().skip(1).map(|n| n.dir).collect()
    }

    /// The origin plus every node reached before the first turn boundary:
    /// what the mover can walk right now.
    pub fn this_turn(&self) -> &[SearchNode] {
        let end = self
            .nodes
            .iter()
            .position(|n| n.turns > 0)
            .unwrap_or(self.nodes.len());
        &self.nodes[..end]
    }

    /// The last node of every turn the path spans, in order. The final node
    /// is always included.
    pub fn turn_ends(&self) -> Vec<SearchNode> {
        let mut ends: Vec<SearchNode> = self
            .nodes
            .windows(2)
            .filter(|w| w[1].turns > w[0].turns)
            .map(|w| w[0])
            .collect();
        ends.push(*self.goal_node());
        ends
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchNode> {
        self.nodes.iter()
    }
}

impl TryFrom<Vec<SearchNode>> for Path {
    type Error = SearchError;

    /// Accepts nodes in origin-to-goal order; at least the origin.
    fn try_from(nodes: Vec<SearchNode>) -> Result<Self, SearchError> {
        if nodes.is_empty() {
            return Err(SearchError::EmptyPath);
        }
        Ok(Self { nodes })
    }
}

impl From<Path> for Vec<SearchNode> {
    fn from(path: Path) -> Self {
        path.nodes
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a SearchNode;
    type IntoIter = std::slice::Iter<'a, SearchNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::node::NodeId;

    #[test]
    fn path_serializes_as_node_list() {
        let origin = SearchNode {
            id: NodeId {
                generation: 1,
                index: 0,
            },
            pos: Point::new(2, 3),
            cost: 0,
            moves_left: 3,
            turns: 0,
            prev: None,
            dir: None,
        };
        let path = Path::from_nodes(vec![origin]);
        let json = serde_json::to_string(&path).unwrap();
        assert!(json.starts_with('['));
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn empty_node_list_is_rejected() {
        let err = serde_json::from_str::<Path>("[]").unwrap_err();
        assert!(err.to_string().contains("at least its origin"));
    }
}
