use std::cmp::Ordering;

use tilepath_core::{Direction, Point};

/// Handle to a node in a [`PathFinder`](crate::PathFinder)'s arena.
///
/// The handle remembers which search created it, so a handle kept past the
/// search that made it is recognised rather than resolved to an unrelated
/// node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId {
    pub(crate) generation: u32,
    pub(crate) index: u32,
}

impl NodeId {
    /// Creation order of the node within its search. The origin is 0.
    #[inline]
    pub fn seq(self) -> u32 {
        self.index
    }

    /// The search that created the node.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// One way of arriving at a tile, as discovered by a search.
///
/// Along any predecessor chain `cost` and `turns` never decrease, and
/// `moves_left` only grows back at a turn boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchNode {
    pub id: NodeId,
    pub pos: Point,
    /// Cumulative cost from the origin; the frontier ordering key.
    pub cost: i32,
    /// Movement points left on arrival, within the current turn.
    pub moves_left: i32,
    /// Turn boundaries crossed to get here.
    pub turns: u32,
    /// The node this one was reached from. `None` for the origin.
    pub prev: Option<NodeId>,
    /// Step direction from the predecessor, when the two tiles touch.
    pub dir: Option<Direction>,
}

impl SearchNode {
    /// Whether this is the node a search started from.
    #[inline]
    pub fn is_origin(&self) -> bool {
        self.prev.is_none()
    }
}

// ---------------------------------------------------------------------------
// Frontier entry
// ---------------------------------------------------------------------------

/// Arena reference ordered by `(cost, seq)` for use in `BinaryHeap`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FrontierEntry {
    pub(crate) cost: i32,
    pub(crate) idx: u32,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (max-heap) pops the cheapest, then the
        // oldest, entry first.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn heap_pops_cheapest_first() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry { cost: 7, idx: 0 });
        heap.push(FrontierEntry { cost: 2, idx: 1 });
        heap.push(FrontierEntry { cost: 5, idx: 2 });
        let order: Vec<i32> = std::iter::from_fn(|| heap.pop()).map(|e| e.cost).collect();
        assert_eq!(order, vec![2, 5, 7]);
    }

    #[test]
    fn equal_costs_pop_in_creation_order() {
        let mut heap = BinaryHeap::new();
        for idx in [4, 1, 3, 2] {
            heap.push(FrontierEntry { cost: 3, idx });
        }
        let order: Vec<u32> = std::iter::from_fn(|| heap.pop()).map(|e| e.idx).collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
    }
}
