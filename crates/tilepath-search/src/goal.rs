//! Goal policies.
//!
//! A [`GoalDecider`] sees every node a search settles, cheapest first, and
//! decides where the search should end. Deciders are stateful: use a fresh
//! one per search, or call [`reset`](GoalDecider::reset) in between.

use tilepath_core::Point;

use crate::node::SearchNode;

/// What a goal decider makes of one settled node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GoalVerdict {
    /// The node is a goal. Without sub-goals the search stops here.
    Accept,
    /// The node is a fallback candidate; keep searching.
    SubGoal,
    /// Not interesting.
    Continue,
}

/// Decides which settled node a search should return a path to.
pub trait GoalDecider<M: ?Sized> {
    /// Inspect a settled node. Called once per node, in increasing
    /// `(cost, seq)` order.
    fn check(&mut self, mover: &M, node: &SearchNode) -> GoalVerdict;

    /// The best node found so far.
    fn goal(&self) -> Option<SearchNode>;

    /// Whether the search must run to exhaustion so later candidates can
    /// be compared. Read once when the search starts.
    fn has_sub_goals(&self) -> bool {
        false
    }

    /// Forget everything from previous searches.
    fn reset(&mut self);
}

/// `a` beats `b` when it is cheaper, or as cheap and created earlier.
#[inline]
fn cheaper(a: &SearchNode, b: &SearchNode) -> bool {
    (a.cost, a.id.seq()) < (b.cost, b.id.seq())
}

// ---------------------------------------------------------------------------
// LocationGoal / AdjacentGoal
// ---------------------------------------------------------------------------

/// Reach one exact tile.
#[derive(Clone, Debug)]
pub struct LocationGoal {
    target: Point,
    found: Option<SearchNode>,
}

impl LocationGoal {
    pub fn new(target: Point) -> Self {
        Self {
            target,
            found: None,
        }
    }

    pub fn target(&self) -> Point {
        self.target
    }
}

impl<M: ?Sized> GoalDecider<M> for LocationGoal {
    fn check(&mut self, _mover: &M, node: &SearchNode) -> GoalVerdict {
        if node.pos != self.target {
            return GoalVerdict::Continue;
        }
        self.found.get_or_insert(*node);
        GoalVerdict::Accept
    }

    fn goal(&self) -> Option<SearchNode> {
        self.found
    }

    fn reset(&mut self) {
        self.found = None;
    }
}

/// Reach any tile next to a target, e.g. to attack or trade with whatever
/// stands on it.
#[derive(Clone, Debug)]
pub struct AdjacentGoal {
    target: Point,
    found: Option<SearchNode>,
}

impl AdjacentGoal {
    pub fn new(target: Point) -> Self {
        Self {
            target,
            found: None,
        }
    }
}

impl<M: ?Sized> GoalDecider<M> for AdjacentGoal {
    fn check(&mut self, _mover: &M, node: &SearchNode) -> GoalVerdict {
        if !node.pos.is_adjacent(self.target) {
            return GoalVerdict::Continue;
        }
        self.found.get_or_insert(*node);
        GoalVerdict::Accept
    }

    fn goal(&self) -> Option<SearchNode> {
        self.found
    }

    fn reset(&mut self) {
        self.found = None;
    }
}

// ---------------------------------------------------------------------------
// MatchGoal
// ---------------------------------------------------------------------------

/// Stop at the cheapest node satisfying a predicate.
pub struct MatchGoal<F> {
    pred: F,
    found: Option<SearchNode>,
}

impl<F: FnMut(&SearchNode) -> bool> MatchGoal<F> {
    pub fn new(pred: F) -> Self {
        Self { pred, found: None }
    }
}

impl<M: ?Sized, F: FnMut(&SearchNode) -> bool> GoalDecider<M> for MatchGoal<F> {
    fn check(&mut self, _mover: &M, node: &SearchNode) -> GoalVerdict {
        if !(self.pred)(node) {
            return GoalVerdict::Continue;
        }
        self.found.get_or_insert(*node);
        GoalVerdict::Accept
    }

    fn goal(&self) -> Option<SearchNode> {
        self.found
    }

    fn reset(&mut self) {
        self.found = None;
    }
}

// ---------------------------------------------------------------------------
// FallbackGoal
// ---------------------------------------------------------------------------

/// Prefer the cheapest node matching `exact`; if none is reachable, fall
/// back to the cheapest node matching `fallback`.
///
/// Always runs the search to exhaustion.
pub struct FallbackGoal<E, S> {
    exact: E,
    fallback: S,
    best_exact: Option<SearchNode>,
    best_fallback: Option<SearchNode>,
}

impl<E, S> FallbackGoal<E, S>
where
    E: FnMut(&SearchNode) -> bool,
    S: FnMut(&SearchNode) -> bool,
{
    pub fn new(exact: E, fallback: S) -> Self {
        Self {
            exact,
            fallback,
            best_exact: None,
            best_fallback: None,
        }
    }

    /// Whether an exact match was found.
    pub fn found_exact(&self) -> bool {
        self.best_exact.is_some()
    }
}

impl<M, E, S> GoalDecider<M> for FallbackGoal<E, S>
where
    M: ?Sized,
    E: FnMut(&SearchNode) -> bool,
    S: FnMut(&SearchNode) -> bool,
{
    fn check(&mut self, _mover: &M, node: &SearchNode) -> GoalVerdict {
        if (self.exact)(node) {
            keep_cheaper(&mut self.best_exact, node);
            GoalVerdict::Accept
        } else if (self.fallback)(node) {
            keep_cheaper(&mut self.best_fallback, node);
            GoalVerdict::SubGoal
        } else {
            GoalVerdict::Continue
        }
    }

    fn goal(&self) -> Option<SearchNode> {
        self.best_exact.or(self.best_fallback)
    }

    fn has_sub_goals(&self) -> bool {
        true
    }

    fn reset(&mut self) {
        self.best_exact = None;
        self.best_fallback = None;
    }
}

fn keep_cheaper(slot: &mut Option<SearchNode>, node: &SearchNode) {
    match slot {
        Some(best) if !cheaper(node, best) => {}
        _ => *slot = Some(*node),
    }
}

// ---------------------------------------------------------------------------
// HighestScoreGoal
// ---------------------------------------------------------------------------

/// Pick the reachable node with the highest score. `score` returns `None`
/// for nodes that are not candidates. Equal scores go to the cheaper node.
pub struct HighestScoreGoal<F> {
    score: F,
    best: Option<(i32, SearchNode)>,
}

impl<F: FnMut(&SearchNode) -> Option<i32>> HighestScoreGoal<F> {
    pub fn new(score: F) -> Self {
        Self { score, best: None }
    }

    /// Score of the current best node.
    pub fn best_score(&self) -> Option<i32> {
        self.best.map(|(s, _)| s)
    }
}

impl<M: ?Sized, F: FnMut(&SearchNode) -> Option<i32>> GoalDecider<M> for HighestScoreGoal<F> {
    fn check(&mut self, _mover: &M, node: &SearchNode) -> GoalVerdict {
        let Some(score) = (self.score)(node) else {
            return GoalVerdict::Continue;
        };
        let better = match &self.best {
            None => true,
            Some((s, n)) => score > *s || (score == *s && cheaper(node, n)),
        };
        if better {
            self.best = Some((score, *node));
        }
        GoalVerdict::SubGoal
    }

    fn goal(&self) -> Option<SearchNode> {
        self.best.map(|(_, n)| n)
    }

    fn has_sub_goals(&self) -> bool {
        true
    }

    fn reset(&mut self) {
        self.best = None;
    }
}

// ---------------------------------------------------------------------------
// ReachAll
// ---------------------------------------------------------------------------

/// Never accepts anything, so the search visits every reachable node.
#[derive(Clone, Debug, Default)]
pub struct ReachAll {
    visited: usize,
}

impl ReachAll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes seen since the last reset.
    pub fn visited(&self) -> usize {
        self.visited
    }
}

impl<M: ?Sized> GoalDecider<M> for ReachAll {
    fn check(&mut self, _mover: &M, _node: &SearchNode) -> GoalVerdict {
        self.visited += 1;
        GoalVerdict::Continue
    }

    fn goal(&self) -> Option<SearchNode> {
        None
    }

    fn reset(&mut self) {
        self.visited = 0;
    }
}

// ---------------------------------------------------------------------------
// ComposedGoal
// ---------------------------------------------------------------------------

/// How a [`ComposedGoal`] combines its children.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Compose {
    /// A node matches when every child matches it.
    All,
    /// A node matches when at least one child matches it.
    Any,
}

/// Combines several deciders. Each child sees every node; a child
/// "matches" a node when its verdict is anything but
/// [`GoalVerdict::Continue`]. The composed goal is the cheapest matching
/// node.
pub struct ComposedGoal<'a, M: ?Sized> {
    mode: Compose,
    children: Vec<Box<dyn GoalDecider<M> + 'a>>,
    found: Option<SearchNode>,
}

impl<'a, M: ?Sized> ComposedGoal<'a, M> {
    pub fn new(mode: Compose) -> Self {
        Self {
            mode,
            children: Vec::new(),
            found: None,
        }
    }

    /// Add a child decider.
    pub fn with(mut self, child: impl GoalDecider<M> + 'a) -> Self {
        self.children.push(Box::new(child));
        self
    }

    pub fn all() -> Self {
        Self::new(Compose::All)
    }

    pub fn any() -> Self {
        Self::new(Compose::Any)
    }
}

impl<M: ?Sized> GoalDecider<M> for ComposedGoal<'_, M> {
    fn check(&mut self, mover: &M, node: &SearchNode) -> GoalVerdict {
        if self.children.is_empty() {
            return GoalVerdict::Continue;
        }
        let mut matches = 0;
        for child in self.children.iter_mut() {
            if child.check(mover, node) != GoalVerdict::Continue {
                matches += 1;
            }
        }
        let matched = match self.mode {
            Compose::All => matches == self.children.len(),
            Compose::Any => matches > 0,
        };
        if !matched {
            return GoalVerdict::Continue;
        }
        keep_cheaper(&mut self.found, node);
        GoalVerdict::Accept
    }

    fn goal(&self) -> Option<SearchNode> {
        self.found
    }

    fn has_sub_goals(&self) -> bool {
        self.children.iter().any(|c| c.has_sub_goals())
    }

    fn reset(&mut self) {
        self.found = None;
        for child in self.children.iter_mut() {
            child.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeId;

    fn node(seq: u32, x: i32, cost: i32) -> SearchNode {
        SearchNode {
            id: NodeId {
                generation: 1,
                index: seq,
            },
            pos: Point::new(x, 0),
            cost,
            moves_left: 0,
            turns: 0,
            prev: None,
            dir: None,
        }
    }

    #[test]
    fn location_goal_accepts_only_target() {
        let mut g = LocationGoal::new(Point::new(2, 0));
        assert_eq!(g.check(&(), &node(0, 1, 0)), GoalVerdict::Continue);
        assert_eq!(g.check(&(), &node(1, 2, 3)), GoalVerdict::Accept);
        assert_eq!(GoalDecider::<()>::goal(&g).map(|n| n.cost), Some(3));
        assert!(!GoalDecider::<()>::has_sub_goals(&g));
        GoalDecider::<()>::reset(&mut g);
        assert_eq!(GoalDecider::<()>::goal(&g), None);
    }

    #[test]
    fn adjacent_goal_skips_target_itself() {
        let mut g = AdjacentGoal::new(Point::new(2, 0));
        assert_eq!(g.check(&(), &node(0, 2, 0)), GoalVerdict::Continue);
        assert_eq!(g.check(&(), &node(1, 3, 1)), GoalVerdict::Accept);
    }

    #[test]
    fn fallback_prefers_cheapest_sub_goal() {
        let mut g = FallbackGoal::new(|_: &SearchNode| false, |n: &SearchNode| n.pos.x >= 4);
        assert_eq!(g.check(&(), &node(0, 0, 0)), GoalVerdict::Continue);
        assert_eq!(g.check(&(), &node(3, 4, 4)), GoalVerdict::SubGoal);
        assert_eq!(g.check(&(), &node(5, 7, 7)), GoalVerdict::SubGoal);
        assert_eq!(GoalDecider::<()>::goal(&g).map(|n| n.pos.x), Some(4));
        assert!(!g.found_exact());
        assert!(GoalDecider::<()>::has_sub_goals(&g));
    }

    #[test]
    fn fallback_exact_beats_cheaper_sub_goal() {
        let mut g = FallbackGoal::new(|n: &SearchNode| n.pos.x == 9, |_: &SearchNode| true);
        g.check(&(), &node(1, 1, 1));
        assert_eq!(g.check(&(), &node(2, 9, 8)), GoalVerdict::Accept);
        assert_eq!(GoalDecider::<()>::goal(&g).map(|n| n.pos.x), Some(9));
    }

    #[test]
    fn fallback_ties_go_to_earlier_node() {
        let mut g = FallbackGoal::new(|_: &SearchNode| false, |_: &SearchNode| true);
        g.check(&(), &node(4, 1, 5));
        g.check(&(), &node(2, 2, 5));
        assert_eq!(GoalDecider::<()>::goal(&g).map(|n| n.id.seq()), Some(2));
    }

    #[test]
    fn highest_score_wins_then_cheapest() {
        let mut g = HighestScoreGoal::new(|n: &SearchNode| (n.pos.x > 0).then_some(n.pos.x % 3));
        for (seq, x, cost) in [(0, 0, 0), (1, 2, 1), (2, 5, 2), (3, 4, 3)] {
            g.check(&(), &node(seq, x, cost));
        }
        assert_eq!(g.best_score(), Some(2));
        assert_eq!(GoalDecider::<()>::goal(&g).map(|n| n.pos.x), Some(2));
    }

    #[test]
    fn reach_all_counts_and_never_accepts() {
        let mut g = ReachAll::new();
        for i in 0..5 {
            assert_eq!(g.check(&(), &node(i, i as i32, 0)), GoalVerdict::Continue);
        }
        assert_eq!(g.visited(), 5);
        assert_eq!(GoalDecider::<()>::goal(&g), None);
    }

    #[test]
    fn composed_all_needs_every_child() {
        let mut g: ComposedGoal<'_, ()> = ComposedGoal::all()
            .with(MatchGoal::new(|n: &SearchNode| n.pos.x > 2))
            .with(MatchGoal::new(|n: &SearchNode| n.pos.x % 2 == 0));
        assert_eq!(g.check(&(), &node(0, 3, 1)), GoalVerdict::Continue);
        assert_eq!(g.check(&(), &node(1, 2, 2)), GoalVerdict::Continue);
        assert_eq!(g.check(&(), &node(2, 4, 3)), GoalVerdict::Accept);
        assert_eq!(g.goal().map(|n| n.pos.x), Some(4));
    }

    #[test]
    fn composed_any_and_sub_goals() {
        let mut g: ComposedGoal<'_, ()> = ComposedGoal::any()
            .with(LocationGoal::new(Point::new(5, 0)))
            .with(HighestScoreGoal::new(|n: &SearchNode| Some(n.pos.x)));
        assert!(g.has_sub_goals());
        assert_eq!(g.check(&(), &node(0, 1, 1)), GoalVerdict::Accept);
        g.reset();
        assert_eq!(g.goal(), None);
    }

    #[test]
    fn empty_composition_matches_nothing() {
        let mut g: ComposedGoal<'_, ()> = ComposedGoal::all();
        assert_eq!(g.check(&(), &node(0, 0, 0)), GoalVerdict::Continue);
    }
}
