use std::collections::BinaryHeap;

use log::{debug, trace, warn};
use tilepath_core::{Point, Range};

use crate::cost::{BaseCostDecider, CostDecider, CostPolicy};
use crate::error::SearchError;
use crate::goal::{GoalDecider, GoalVerdict, LocationGoal, ReachAll};
use crate::limits::SearchLimits;
use crate::node::{FrontierEntry, NodeId, SearchNode};
use crate::path::Path;
use crate::traits::MoveRules;

/// Why the main loop ended.
#[derive(Copy, Clone, Debug)]
enum Stop {
    Exhausted,
    Accepted(u32),
    Destination(u32),
}

/// Counters describing the last search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Nodes created, the origin included.
    pub created: usize,
    /// Tiles settled, each counted once.
    pub settled: usize,
    /// Frontier entries skipped because a cheaper node already covered them.
    pub stale: usize,
    /// Steps the cost decider refused.
    pub illegal: usize,
    /// Nodes settled past the search limits and therefore not expanded.
    pub pruned: usize,
}

/// Turn-aware best-first search over a tile map.
///
/// `PathFinder` owns the node arena, the frontier and per-tile bookkeeping,
/// and reuses their allocations across searches. Each search invalidates
/// the nodes of the previous one; [`settled_at`](Self::settled_at) and
/// [`path_to`](Self::path_to) read the most recent search only.
///
/// With a cost decider whose cost tracks movement exactly
/// ([`CostDecider::cheaper_dominates`]) the search keeps one node per tile.
/// Otherwise it keeps one per tile and movement left, holding the fewest
/// turns for each, so that penalised routes are still optimal. Either way
/// every tile is settled, reported and goal-checked once, at its cheapest.
#[derive(Debug, Default)]
pub struct PathFinder {
    rng: Range,
    generation: u32,
    nodes: Vec<SearchNode>,
    // Per search key (a tile, or a tile and moves left): newest frontier
    // node, valid when `stamp` matches.
    best: Vec<u32>,
    stamp: Vec<u32>,
    // Per search key: closed in generation `closed` with `closed_turns`.
    closed: Vec<u32>,
    closed_turns: Vec<u32>,
    // Per tile: first settled in generation `settled`, by `settled_node`.
    settled: Vec<u32>,
    settled_node: Vec<u32>,
    open: BinaryHeap<FrontierEntry>,
    results: Vec<SearchNode>,
    nbuf: Vec<Point>,
    stats: SearchStats,
}

/// How tiles map onto search keys.
#[derive(Copy, Clone, Debug)]
struct Keys {
    per_tile: usize,
}

impl Keys {
    fn by_tile() -> Self {
        Self { per_tile: 1 }
    }

    fn by_moves_left(allowance: i32) -> Self {
        Self {
            per_tile: allowance as usize + 1,
        }
    }

    #[inline]
    fn by_state(self) -> bool {
        self.per_tile > 1
    }

    #[inline]
    fn key(self, tile: usize, moves_left: i32) -> usize {
        if self.per_tile == 1 {
            return tile;
        }
        let ml = (moves_left.max(0) as usize).min(self.per_tile - 1);
        tile * self.per_tile + ml
    }
}

impl PathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a finder with per-tile caches already sized for `rng`.
    pub fn with_range(rng: Range) -> Self {
        let mut pf = Self::new();
        pf.reserve(rng.len(), rng.len());
        pf.rng = rng;
        pf
    }

    /// Run a search from `origin`.
    ///
    /// Tiles are settled cheapest first and handed to `goal`. The search
    /// ends at the first of:
    ///
    /// - a node `goal` accepts, when it has no sub-goals;
    /// - a node on `destination`, whose path is returned;
    /// - an empty frontier, after which the path to `goal.goal()` is
    ///   returned, if any.
    ///
    /// Steps `cost` refuses are treated as absent. Nodes beyond `limits`
    /// are settled and goal-checked but not expanded. An unreachable goal
    /// yields `Ok(None)`.
    #[allow(clippy::too_many_arguments)]
    pub fn search<R, C, G>(
        &mut self,
        rules: &R,
        mover: &R::Mover,
        origin: Point,
        destination: Option<Point>,
        cost: &mut C,
        goal: &mut G,
        limits: SearchLimits,
    ) -> Result<Option<Path>, SearchError>
    where
        R: MoveRules + ?Sized,
        C: CostDecider<R> + ?Sized,
        G: GoalDecider<R::Mover> + ?Sized,
    {
        let found = self.run(rules, mover, origin, destination, cost, goal, limits)?;
        Ok(found.map(|idx| self.reconstruct(idx)))
    }

    /// Cheapest path from `origin` to `destination` with the
    /// always-cheapest cost policy and no limits.
    pub fn find_path<R>(
        &mut self,
        rules: &R,
        mover: &R::Mover,
        origin: Point,
        destination: Point,
    ) -> Result<Option<Path>, SearchError>
    where
        R: MoveRules + ?Sized,
    {
        let mut cost = BaseCostDecider::new();
        let mut goal = LocationGoal::new(destination);
        self.search(
            rules,
            mover,
            origin,
            Some(destination),
            &mut cost,
            &mut goal,
            SearchLimits::NONE,
        )
    }

    /// Like [`find_path`](Self::find_path), with a configured cost policy
    /// and limits.
    pub fn find_path_with<R>(
        &mut self,
        rules: &R,
        mover: &R::Mover,
        origin: Point,
        destination: Point,
        policy: CostPolicy,
        limits: SearchLimits,
    ) -> Result<Option<Path>, SearchError>
    where
        R: MoveRules + ?Sized,
    {
        let mut cost = policy.decider::<R>(Some(destination));
        let mut goal = LocationGoal::new(destination);
        self.search(
            rules,
            mover,
            origin,
            Some(destination),
            &mut cost,
            &mut goal,
            limits,
        )
    }

    /// Settle everything reachable from `origin` and return the nodes in
    /// the order they were settled (cheapest first). Nodes past `limits`
    /// are included but not expanded.
    pub fn reach_map<R, C>(
        &mut self,
        rules: &R,
        mover: &R::Mover,
        origin: Point,
        cost: &mut C,
        limits: SearchLimits,
    ) -> Result<&[SearchNode], SearchError>
    where
        R: MoveRules + ?Sized,
        C: CostDecider<R> + ?Sized,
    {
        let mut goal = ReachAll::new();
        self.run(rules, mover, origin, None, cost, &mut goal, limits)?;
        Ok(&self.results)
    }

    /// The node that settled `p` in the last search.
    pub fn settled_at(&self, p: Point) -> Option<SearchNode> {
        let i = self.rng.index_of(p)?;
        if self.generation == 0 || self.settled.get(i) != Some(&self.generation) {
            return None;
        }
        self.nodes.get(self.settled_node[i] as usize).copied()
    }

    /// Path from the last search's origin to `p`, if `p` was settled.
    pub fn path_to(&self, p: Point) -> Option<Path> {
        let node = self.settled_at(p)?;
        Some(self.reconstruct(node.id.index))
    }

    /// Counters of the last search.
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    // -----------------------------------------------------------------------
    // Search core
    // -----------------------------------------------------------------------

    #[allow(clippy::too_many_arguments)]
    fn run<R, C, G>(
        &mut self,
        rules: &R,
        mover: &R::Mover,
        origin: Point,
        destination: Option<Point>,
        cost: &mut C,
        goal: &mut G,
        limits: SearchLimits,
    ) -> Result<Option<u32>, SearchError>
    where
        R: MoveRules + ?Sized,
        C: CostDecider<R> + ?Sized,
        G: GoalDecider<R::Mover> + ?Sized,
    {
        let rng = rules.range();
        if !rules.is_on_map(origin) || !rng.contains(origin) {
            return Err(SearchError::OriginOffMap(origin));
        }
        if let Some(dest) = destination {
            if !rules.is_on_map(dest) || !rng.contains(dest) {
                return Err(SearchError::DestinationOffMap(dest));
            }
        }
        let allowance = rules.movement_allowance(mover);
        if allowance <= 0 {
            return Err(SearchError::InvalidAllowance(allowance));
        }
        let start_moves = rules.moves_left(mover);
        if !(0..=allowance).contains(&start_moves) {
            return Err(SearchError::InvalidMovesLeft {
                moves_left: start_moves,
                allowance,
            });
        }

        let keys = if cost.cheaper_dominates() {
            Keys::by_tile()
        } else {
            Keys::by_moves_left(allowance)
        };
        let by_state = keys.by_state();
        self.begin(rng, keys);
        let cur_gen = self.generation;
        let sub_goals = goal.has_sub_goals();
        debug!(
            "search from {origin} to {destination:?}: moves {start_moves}/{allowance}, \
             {limits:?}, sub-goals {sub_goals}, per-state {by_state}"
        );

        if let Some(ci) = self.rng.index_of(origin) {
            self.add_node(keys.key(ci, start_moves), origin, 0, start_moves, 0, None);
        }

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let stop = 'search: loop {
            let Some(entry) = self.open.pop() else {
                break 'search Stop::Exhausted;
            };
            let node = self.nodes[entry.idx as usize];
            let Some(ci) = self.rng.index_of(node.pos) else {
                continue;
            };

            // Skip entries a cheaper node already closed.
            let k = keys.key(ci, node.moves_left);
            if self.closed[k] == cur_gen && (!by_state || self.closed_turns[k] <= node.turns) {
                self.stats.stale += 1;
                continue;
            }
            self.closed[k] = cur_gen;
            self.closed_turns[k] = node.turns;

            if self.settled[ci] != cur_gen {
                self.settled[ci] = cur_gen;
                self.settled_node[ci] = entry.idx;
                self.results.push(node);
                self.stats.settled += 1;

                if goal.check(mover, &node) == GoalVerdict::Accept && !sub_goals {
                    break 'search Stop::Accepted(entry.idx);
                }
                if destination == Some(node.pos) {
                    break 'search Stop::Destination(entry.idx);
                }
            }

            if !limits.allows(node.turns, node.cost) {
                trace!(
                    "not expanding {} (turns {}, cost {}) beyond {limits:?}",
                    node.pos, node.turns, node.cost
                );
                self.stats.pruned += 1;
                continue;
            }

            nbuf.clear();
            rules.neighbors(node.pos, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.rng.index_of(np) else {
                    continue;
                };
                if (!by_state && self.settled[ni] == cur_gen) || !rules.is_on_map(np) {
                    continue;
                }
                let Some(step) =
                    cost.evaluate(rules, mover, node.pos, np, node.moves_left, node.turns)
                else {
                    self.stats.illegal += 1;
                    continue;
                };
                if step.cost < 0 {
                    warn!(
                        "cost decider priced {} -> {np} at {}; treating as illegal",
                        node.pos, step.cost
                    );
                    self.stats.illegal += 1;
                    continue;
                }
                debug_assert!(
                    (0..=allowance).contains(&step.moves_left),
                    "moves left {} outside 0..={allowance}",
                    step.moves_left
                );

                let turns = node.turns + u32::from(step.new_turn);
                let tentative = node.cost.saturating_add(step.cost);
                let nk = keys.key(ni, step.moves_left);
                if self.closed[nk] == cur_gen && (!by_state || self.closed_turns[nk] <= turns) {
                    continue;
                }
                if self.stamp[nk] == cur_gen {
                    let known = &self.nodes[self.best[nk] as usize];
                    if tentative >= known.cost && (!by_state || turns >= known.turns) {
                        continue;
                    }
                }

                self.add_node(nk, np, tentative, step.moves_left, turns, Some(node.id));
            }
        };

        self.nbuf = nbuf;

        let result = match (stop, goal.goal()) {
            (Stop::Destination(idx), _) => Some(idx),
            (Stop::Accepted(_) | Stop::Exhausted, Some(g)) => Some(self.resolve(&g)?),
            (Stop::Accepted(idx), None) => Some(idx),
            (Stop::Exhausted, None) => None,
        };
        debug!(
            "search from {origin} done: {:?}, goal {:?}",
            self.stats,
            result.map(|i| self.nodes[i as usize].pos)
        );
        Ok(result)
    }

    /// Grow the caches to hold `tiles` tiles and `keys` search keys.
    fn reserve(&mut self, tiles: usize, keys: usize) {
        if self.settled.len() < tiles {
            self.settled.resize(tiles, 0);
            self.settled_node.resize(tiles, 0);
        }
        if self.closed.len() < keys {
            self.best.resize(keys, 0);
            self.stamp.resize(keys, 0);
            self.closed.resize(keys, 0);
            self.closed_turns.resize(keys, 0);
        }
    }

    /// Invalidate the previous search and size the caches for `rng`.
    fn begin(&mut self, rng: Range, keys: Keys) {
        let tiles = rng.len();
        self.reserve(tiles, tiles * keys.per_tile);
        self.rng = rng;

        // Bump generation to lazily invalidate all per-tile entries. Zero is
        // never a live generation, so wrap-around needs a real clear.
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.stamp.fill(0);
            self.closed.fill(0);
            self.settled.fill(0);
            self.generation = 1;
        }

        self.nodes.clear();
        self.results.clear();
        self.open.clear();
        self.stats = SearchStats::default();
    }

    fn add_node(
        &mut self,
        key: usize,
        pos: Point,
        cost: i32,
        moves_left: i32,
        turns: u32,
        prev: Option<NodeId>,
    ) {
        let index = self.nodes.len() as u32;
        let dir = prev.and_then(|p| self.nodes[p.index as usize].pos.direction_to(pos));
        self.nodes.push(SearchNode {
            id: NodeId {
                generation: self.generation,
                index,
            },
            pos,
            cost,
            moves_left,
            turns,
            prev,
            dir,
        });
        self.best[key] = index;
        self.stamp[key] = self.generation;
        self.open.push(FrontierEntry { cost, idx: index });
        self.stats.created += 1;
    }

    /// Map a node handed back by a goal decider onto this search's arena.
    fn resolve(&self, node: &SearchNode) -> Result<u32, SearchError> {
        let id = node.id;
        if id.generation != self.generation || self.nodes.get(id.index as usize) != Some(node) {
            warn!("goal decider returned a node from another search: {id:?}");
            return Err(SearchError::StaleGoal(id));
        }
        Ok(id.index)
    }

    /// Walk predecessor links back to the origin.
    fn reconstruct(&self, idx: u32) -> Path {
        let mut nodes = Vec::new();
        let mut cur = Some(idx);
        while let Some(i) = cur {
            let n = self.nodes[i as usize];
            nodes.push(n);
            cur = n.prev.map(|p| p.index);
        }
        nodes.reverse();
        Path::from_nodes(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::FallbackGoal;
    use crate::traits::WorldMap;
    use tilepath_core::Direction;

    /// Open 4-way grid; entering a tile costs `cost[y][x]`, 0 blocks it.
    struct Field {
        rows: Vec<Vec<i32>>,
        allowance: i32,
        start_moves: i32,
        roads: Vec<Point>,
    }

    impl Field {
        fn new(rows: &[&[i32]], allowance: i32) -> Self {
            Self {
                rows: rows.iter().map(|r| r.to_vec()).collect(),
                allowance,
                start_moves: allowance,
                roads: Vec::new(),
            }
        }
    }

    impl WorldMap for Field {
        fn range(&self) -> Range {
            Range::with_size(self.rows[0].len() as i32, self.rows.len() as i32)
        }

        fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
            for n in p.neighbors_4() {
                if self.is_on_map(n) {
                    buf.push(n);
                }
            }
        }
    }

    impl MoveRules for Field {
        type Mover = ();

        fn movement_allowance(&self, _: &()) -> i32 {
            self.allowance
        }

        fn moves_left(&self, _: &()) -> i32 {
            self.start_moves
        }

        fn terrain_cost(&self, _: &(), _from: Point, to: Point) -> i32 {
            self.rows[to.y as usize][to.x as usize]
        }

        fn has_road(&self, p: Point) -> bool {
            self.roads.contains(&p)
        }
    }

    #[test]
    fn straight_line_within_one_turn() {
        let f = Field::new(&[&[1, 1, 1, 1]], 3);
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(&f, &(), Point::new(0, 0), Point::new(3, 0))
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.cost(), 3);
        assert_eq!(path.turns(), 0);
        assert_eq!(path.last().unwrap().moves_left, 0);
        assert_eq!(path.directions(), vec![Some(Direction::E); 3]);
    }

    #[test]
    fn long_walk_spans_turns() {
        let f = Field::new(&[&[1, 1, 1, 1, 1, 1, 1]], 3);
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(&f, &(), Point::new(0, 0), Point::new(6, 0))
            .unwrap()
            .unwrap();
        let turns: Vec<u32> = path.iter().map(|n| n.turns).collect();
        assert_eq!(turns, vec![0, 0, 0, 0, 1, 1, 1]);
        assert_eq!(path.cost(), 6);
        assert_eq!(path.this_turn().len(), 4);
    }

    #[test]
    fn origin_is_destination() {
        let f = Field::new(&[&[1]], 3);
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(&f, &(), Point::new(0, 0), Point::new(0, 0))
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 1);
        assert!(path.is_empty());
        assert_eq!(path.cost(), 0);
        assert_eq!(path.turns(), 0);
    }

    #[test]
    fn walls_make_target_unreachable() {
        let f = Field::new(&[&[1, 0, 1]], 3);
        let mut pf = PathFinder::new();
        let res = pf.find_path(&f, &(), Point::new(0, 0), Point::new(2, 0));
        assert_eq!(res, Ok(None));
        assert_eq!(pf.settled_at(Point::new(2, 0)), None);
        assert!(pf.last_stats().illegal > 0);
    }

    #[test]
    fn detours_around_expensive_terrain() {
        let f = Field::new(&[&[1, 9, 1], &[1, 1, 1]], 4);
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(&f, &(), Point::new(0, 0), Point::new(2, 0))
            .unwrap()
            .unwrap();
        assert_eq!(
            path.positions(),
            vec![
                Point::new(0, 0),
                Point::new(0, 1),
                Point::new(1, 1),
                Point::new(2, 1),
                Point::new(2, 0)
            ]
        );
        assert_eq!(path.cost(), 4);
        assert_eq!(path.turns(), 0);
    }

    #[test]
    fn partial_start_moves_roll_over() {
        let mut f = Field::new(&[&[1, 5]], 3);
        f.start_moves = 1;
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(&f, &(), Point::new(0, 0), Point::new(1, 0))
            .unwrap()
            .unwrap();
        let last = path.last().unwrap();
        assert_eq!(last.turns, 1);
        assert_eq!(last.moves_left, 0);
        assert_eq!(last.cost, 4);
    }

    #[test]
    fn turn_limit_stops_expansion() {
        let f = Field::new(&[&[1, 1, 1, 1, 1, 1, 1]], 3);
        let mut pf = PathFinder::new();
        let mut cost = BaseCostDecider::new();
        let mut goal = LocationGoal::new(Point::new(6, 0));
        let res = pf.search(
            &f,
            &(),
            Point::new(0, 0),
            None,
            &mut cost,
            &mut goal,
            SearchLimits::turns(0),
        );
        assert_eq!(res, Ok(None));
        // The first node past the limit is settled but goes no further.
        let past = pf.settled_at(Point::new(4, 0)).unwrap();
        assert_eq!(past.turns, 1);
        assert!(pf.settled_at(Point::new(5, 0)).is_none());
        assert_eq!(pf.last_stats().pruned, 1);
    }

    #[test]
    fn destination_just_past_turn_limit_is_found() {
        let f = Field::new(&[&[1, 1, 1, 1, 1]], 3);
        let mut pf = PathFinder::new();
        let mut cost = BaseCostDecider::new();
        let mut goal = LocationGoal::new(Point::new(4, 0));
        let path = pf
            .search(
                &f,
                &(),
                Point::new(0, 0),
                Some(Point::new(4, 0)),
                &mut cost,
                &mut goal,
                SearchLimits::turns(0),
            )
            .unwrap()
            .unwrap();
        assert_eq!(path.turns(), 1);
        assert_eq!(path.cost(), 4);
    }

    #[test]
    fn cost_limit_stops_expansion() {
        let f = Field::new(&[&[1, 1, 1, 1, 1]], 3);
        let mut pf = PathFinder::new();
        let mut cost = BaseCostDecider::new();
        let reached = pf
            .reach_map(&f, &(), Point::new(0, 0), &mut cost, SearchLimits::NONE.with_max_cost(2))
            .unwrap();
        let xs: Vec<i32> = reached.iter().map(|n| n.pos.x).collect();
        assert_eq!(xs, vec![0, 1, 2, 3]);
    }

    #[test]
    fn penalised_route_keeps_spare_moves() {
        // O X #
        // Y T Z    roads everywhere but X; allowance 10.
        // Via Y, T is reached at cost 3 with 7 moves left, which forces a
        // rollover into Z. Via X it costs 6 but leaves 8 moves, enough for Z.
        let mut f = Field::new(&[&[1, 1, 0], &[2, 1, 8]], 10);
        f.roads = vec![
            Point::new(0, 0),
            Point::new(0, 1),
            Point::new(1, 1),
            Point::new(2, 1),
        ];
        let mut pf = PathFinder::new();
        let path = pf
            .find_path_with(
                &f,
                &(),
                Point::new(0, 0),
                Point::new(2, 1),
                CostPolicy::PreferRoads { off_road_penalty: 2 },
                SearchLimits::NONE,
            )
            .unwrap()
            .unwrap();
        assert_eq!(
            path.positions(),
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(1, 1), Point::new(2, 1)]
        );
        assert_eq!(path.cost(), 14);
        assert_eq!(path.turns(), 0);
        // T is still reported once, at its cheapest arrival.
        assert_eq!(pf.settled_at(Point::new(1, 1)).map(|n| n.cost), Some(3));
    }

    #[test]
    fn reach_map_is_cheapest_first() {
        let f = Field::new(&[&[1, 2, 1], &[3, 1, 1]], 3);
        let mut pf = PathFinder::new();
        let mut cost = BaseCostDecider::new();
        let reached = pf
            .reach_map(&f, &(), Point::new(0, 0), &mut cost, SearchLimits::NONE)
            .unwrap();
        assert_eq!(reached.len(), 6);
        assert!(reached.windows(2).all(|w| w[0].cost <= w[1].cost));
        let path = pf.path_to(Point::new(2, 1)).unwrap();
        assert_eq!(path.origin(), Point::new(0, 0));
        assert_eq!(path.destination(), Point::new(2, 1));
    }

    #[test]
    fn sub_goal_fallback_picks_cheapest() {
        // X at cost 4, Y at cost 7, no exact goal anywhere.
        let f = Field::new(&[&[1, 1, 1, 1, 1, 1, 1, 1]], 10);
        let mut pf = PathFinder::new();
        let mut cost = BaseCostDecider::new();
        let mut goal = FallbackGoal::new(
            |_: &SearchNode| false,
            |n: &SearchNode| n.pos.x == 4 || n.pos.x == 7,
        );
        let path = pf
            .search(&f, &(), Point::new(0, 0), None, &mut cost, &mut goal, SearchLimits::NONE)
            .unwrap()
            .unwrap();
        assert_eq!(path.destination(), Point::new(4, 0));
        assert_eq!(path.cost(), 4);
        // Sub-goal mode drains the whole map.
        assert_eq!(pf.last_stats().settled, 8);
    }

    #[test]
    fn reused_goal_decider_is_reported() {
        let f = Field::new(&[&[1, 1, 1]], 3);
        let mut pf = PathFinder::new();
        let mut cost = BaseCostDecider::new();
        let mut goal = LocationGoal::new(Point::new(2, 0));
        let first = pf.search(&f, &(), Point::new(0, 0), None, &mut cost, &mut goal, SearchLimits::NONE);
        assert!(matches!(first, Ok(Some(_))));
        // Not reset: the decider still holds the first search's node.
        let second = pf.search(&f, &(), Point::new(1, 0), None, &mut cost, &mut goal, SearchLimits::NONE);
        assert!(matches!(second, Err(SearchError::StaleGoal(_))));
        GoalDecider::<()>::reset(&mut goal);
        let third = pf.search(&f, &(), Point::new(1, 0), None, &mut cost, &mut goal, SearchLimits::NONE);
        assert_eq!(third.unwrap().unwrap().cost(), 1);
    }

    #[test]
    fn preconditions_fail_fast() {
        let mut f = Field::new(&[&[1, 1]], 3);
        let mut pf = PathFinder::new();
        assert_eq!(
            pf.find_path(&f, &(), Point::new(5, 0), Point::new(0, 0)),
            Err(SearchError::OriginOffMap(Point::new(5, 0)))
        );
        assert_eq!(
            pf.find_path(&f, &(), Point::new(0, 0), Point::new(0, -1)),
            Err(SearchError::DestinationOffMap(Point::new(0, -1)))
        );
        f.start_moves = 4;
        assert_eq!(
            pf.find_path(&f, &(), Point::new(0, 0), Point::new(1, 0)),
            Err(SearchError::InvalidMovesLeft {
                moves_left: 4,
                allowance: 3
            })
        );
        f.allowance = 0;
        assert_eq!(
            pf.find_path(&f, &(), Point::new(0, 0), Point::new(1, 0)),
            Err(SearchError::InvalidAllowance(0))
        );
    }

    #[test]
    fn generations_isolate_searches() {
        let f = Field::new(&[&[1, 1, 1]], 3);
        let mut pf = PathFinder::with_range(f.range());
        pf.find_path(&f, &(), Point::new(0, 0), Point::new(2, 0)).unwrap();
        let first = pf.settled_at(Point::new(2, 0)).unwrap();
        pf.find_path(&f, &(), Point::new(2, 0), Point::new(2, 0)).unwrap();
        assert_eq!(pf.settled_at(Point::new(0, 0)), None);
        let again = pf.settled_at(Point::new(2, 0)).unwrap();
        assert_ne!(first.id, again.id);
        assert_eq!(again.cost, 0);
    }
}
