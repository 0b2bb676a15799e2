//! Step cost policies.
//!
//! A [`CostDecider`] prices one step at a time and is queried in two phases:
//! [`get_cost`](CostDecider::get_cost) prices the step, then
//! [`moves_left`](CostDecider::moves_left) and
//! [`is_new_turn`](CostDecider::is_new_turn) describe the mover's state after
//! it. Every built-in policy shares the movement accounting of
//! [`BaseCostDecider`]; the stricter ones forbid more steps or add penalties
//! on top.
//!
//! # Turn rollover
//!
//! With allowance `A`, terrain cost `c` and `m` points left this turn:
//!
//! | Case | Cost | Moves left after | New turn |
//! |---|---|---|---|
//! | `c <= m` | `c` | `m - c` | no |
//! | `c > m`, `m == A` | `m` | `0` | no |
//! | otherwise | `m + min(c, A)` | `A - min(c, A)` | yes |
//!
//! A unit with a full allowance can always enter a tile. Otherwise unused
//! points are forfeited and the step is taken from the next turn's
//! allowance, completing even if it costs more than a whole turn.

use tilepath_core::Point;

use crate::traits::MoveRules;

/// Cost returned for a step that is forbidden outright.
pub const ILLEGAL_MOVE: i32 = -1;

/// The three results of one evaluation, bundled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepOutcome {
    pub cost: i32,
    pub moves_left: i32,
    pub new_turn: bool,
}

/// Prices single steps for a search.
///
/// Implementations keep the state of their last evaluation. They are used
/// strictly sequentially: evaluate a step, read its state, then evaluate the
/// next.
pub trait CostDecider<R: MoveRules + ?Sized> {
    /// Price the step from `from` to the adjacent `to` for a mover with
    /// `moves_left` points left in the current turn, `turns` turn boundaries
    /// into the path. Returns [`ILLEGAL_MOVE`] if the step is forbidden.
    fn get_cost(
        &mut self,
        rules: &R,
        mover: &R::Mover,
        from: Point,
        to: Point,
        moves_left: i32,
        turns: u32,
    ) -> i32;

    /// Movement points left after the last evaluated step.
    fn moves_left(&self) -> i32;

    /// Whether the last evaluated step began a new turn.
    fn is_new_turn(&self) -> bool;

    /// Whether any step has been evaluated yet.
    fn has_evaluated(&self) -> bool;

    /// Whether reaching a tile more cheaply is never worse than reaching it
    /// dearer, whatever movement is left.
    ///
    /// True when the returned cost is pure movement accounting, since then
    /// cost always equals `start + turns * allowance - moves_left`. Policies
    /// that add penalties break that link and must return `false`, which
    /// makes the search track every `(tile, moves left)` state separately.
    fn cheaper_dominates(&self) -> bool {
        false
    }

    /// Evaluate a step and read back its state. `None` if illegal.
    fn evaluate(
        &mut self,
        rules: &R,
        mover: &R::Mover,
        from: Point,
        to: Point,
        moves_left: i32,
        turns: u32,
    ) -> Option<StepOutcome> {
        let cost = self.get_cost(rules, mover, from, to, moves_left, turns);
        if cost == ILLEGAL_MOVE {
            return None;
        }
        Some(StepOutcome {
            cost,
            moves_left: self.moves_left(),
            new_turn: self.is_new_turn(),
        })
    }
}

impl<R, C> CostDecider<R> for Box<C>
where
    R: MoveRules + ?Sized,
    C: CostDecider<R> + ?Sized,
{
    fn get_cost(
        &mut self,
        rules: &R,
        mover: &R::Mover,
        from: Point,
        to: Point,
        moves_left: i32,
        turns: u32,
    ) -> i32 {
        (**self).get_cost(rules, mover, from, to, moves_left, turns)
    }

    fn moves_left(&self) -> i32 {
        (**self).moves_left()
    }

    fn is_new_turn(&self) -> bool {
        (**self).is_new_turn()
    }

    fn has_evaluated(&self) -> bool {
        (**self).has_evaluated()
    }

    fn cheaper_dominates(&self) -> bool {
        (**self).cheaper_dominates()
    }
}

// ---------------------------------------------------------------------------
// BaseCostDecider
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct LastStep {
    moves_left: i32,
    new_turn: bool,
}

/// Always-cheapest policy: terrain cost plus turn rollover, nothing else.
#[derive(Clone, Debug, Default)]
pub struct BaseCostDecider {
    last: Option<LastStep>,
}

impl BaseCostDecider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the rollover rule to a step of terrain cost `cost`.
    fn charge(&mut self, allowance: i32, cost: i32, moves_left: i32) -> i32 {
        if cost <= 0 || allowance <= 0 {
            return self.reject(moves_left);
        }
        let (charged, left, new_turn) = if cost <= moves_left {
            (cost, moves_left - cost, false)
        } else if moves_left >= allowance {
            (moves_left, 0, false)
        } else {
            let fresh = cost.min(allowance);
            (moves_left + fresh, allowance - fresh, true)
        };
        self.last = Some(LastStep {
            moves_left: left,
            new_turn,
        });
        charged
    }

    /// Record a forbidden step. The mover's state is left as it was.
    fn reject(&mut self, moves_left: i32) -> i32 {
        self.last = Some(LastStep {
            moves_left,
            new_turn: false,
        });
        ILLEGAL_MOVE
    }

    fn last(&self) -> LastStep {
        debug_assert!(
            self.last.is_some(),
            "cost decider state queried before any step was evaluated"
        );
        self.last.unwrap_or(LastStep {
            moves_left: 0,
            new_turn: false,
        })
    }
}

impl<R: MoveRules + ?Sized> CostDecider<R> for BaseCostDecider {
    fn get_cost(
        &mut self,
        rules: &R,
        mover: &R::Mover,
        from: Point,
        to: Point,
        moves_left: i32,
        _turns: u32,
    ) -> i32 {
        let allowance = rules.movement_allowance(mover);
        let cost = rules.terrain_cost(mover, from, to);
        self.charge(allowance, cost, moves_left)
    }

    fn moves_left(&self) -> i32 {
        self.last().moves_left
    }

    fn is_new_turn(&self) -> bool {
        self.last().new_turn
    }

    fn has_evaluated(&self) -> bool {
        self.last.is_some()
    }

    fn cheaper_dominates(&self) -> bool {
        true
    }
}

/// Accessor boilerplate for policies that wrap a `BaseCostDecider` in `base`.
macro_rules! delegate_state {
    () => {
        fn moves_left(&self) -> i32 {
            self.base.last().moves_left
        }

        fn is_new_turn(&self) -> bool {
            self.base.last().new_turn
        }

        fn has_evaluated(&self) -> bool {
            self.base.last.is_some()
        }
    };
}

// ---------------------------------------------------------------------------
// AvoidIllegalCostDecider
// ---------------------------------------------------------------------------

/// Like [`BaseCostDecider`], but only steps that relocate the mover
/// ([`MoveType::is_progress`](crate::MoveType::is_progress)) are allowed.
#[derive(Clone, Debug, Default)]
pub struct AvoidIllegalCostDecider {
    base: BaseCostDecider,
}

impl AvoidIllegalCostDecider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: MoveRules + ?Sized> CostDecider<R> for AvoidIllegalCostDecider {
    fn get_cost(
        &mut self,
        rules: &R,
        mover: &R::Mover,
        from: Point,
        to: Point,
        moves_left: i32,
        turns: u32,
    ) -> i32 {
        if !rules.move_type(mover, from, to).is_progress() {
            return self.base.reject(moves_left);
        }
        self.base.get_cost(rules, mover, from, to, moves_left, turns)
    }

    fn cheaper_dominates(&self) -> bool {
        true
    }

    delegate_state!();
}

// ---------------------------------------------------------------------------
// AvoidSettlementsCostDecider
// ---------------------------------------------------------------------------

/// Avoids illegal moves and never routes through settlements, except into
/// the destination itself.
///
/// With [`with_blocking_units`](Self::with_blocking_units), entering a tile
/// occupied by another unit costs an extra full allowance, as if waiting a
/// turn for it to move away.
#[derive(Clone, Debug, Default)]
pub struct AvoidSettlementsCostDecider {
    base: BaseCostDecider,
    destination: Option<Point>,
    avoid_units: bool,
}

impl AvoidSettlementsCostDecider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow the final step into a settlement at `destination`.
    pub fn toward(destination: Point) -> Self {
        Self {
            destination: Some(destination),
            ..Self::default()
        }
    }

    /// Also penalise tiles held by other units.
    pub fn with_blocking_units(mut self) -> Self {
        self.avoid_units = true;
        self
    }
}

impl<R: MoveRules + ?Sized> CostDecider<R> for AvoidSettlementsCostDecider {
    fn get_cost(
        &mut self,
        rules: &R,
        mover: &R::Mover,
        from: Point,
        to: Point,
        moves_left: i32,
        turns: u32,
    ) -> i32 {
        let is_destination = self.destination == Some(to);
        if !rules.move_type(mover, from, to).is_progress()
            || (!is_destination && rules.is_settlement(to))
        {
            return self.base.reject(moves_left);
        }
        let cost = self.base.get_cost(rules, mover, from, to, moves_left, turns);
        if cost == ILLEGAL_MOVE {
            return cost;
        }
        if self.avoid_units && !is_destination && rules.is_occupied(mover, to) {
            return cost.saturating_add(rules.movement_allowance(mover));
        }
        cost
    }

    fn cheaper_dominates(&self) -> bool {
        !self.avoid_units
    }

    delegate_state!();
}

// ---------------------------------------------------------------------------
// RoadPreferringCostDecider
// ---------------------------------------------------------------------------

/// Like [`BaseCostDecider`], but steps that do not run from road to road
/// carry an extra penalty, so routes stick to the road network when it is
/// not much longer.
#[derive(Clone, Debug)]
pub struct RoadPreferringCostDecider {
    base: BaseCostDecider,
    off_road_penalty: i32,
}

impl RoadPreferringCostDecider {
    /// Default penalty per off-road step.
    pub const DEFAULT_PENALTY: i32 = 1;

    /// `off_road_penalty` is clamped to be non-negative.
    pub fn new(off_road_penalty: i32) -> Self {
        Self {
            base: BaseCostDecider::new(),
            off_road_penalty: off_road_penalty.max(0),
        }
    }
}

impl Default for RoadPreferringCostDecider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PENALTY)
    }
}

impl<R: MoveRules + ?Sized> CostDecider<R> for RoadPreferringCostDecider {
    fn get_cost(
        &mut self,
        rules: &R,
        mover: &R::Mover,
        from: Point,
        to: Point,
        moves_left: i32,
        turns: u32,
    ) -> i32 {
        let cost = self.base.get_cost(rules, mover, from, to, moves_left, turns);
        if cost == ILLEGAL_MOVE || (rules.has_road(from) && rules.has_road(to)) {
            return cost;
        }
        cost.saturating_add(self.off_road_penalty)
    }

    fn cheaper_dominates(&self) -> bool {
        self.off_road_penalty == 0
    }

    delegate_state!();
}

// ---------------------------------------------------------------------------
// CostPolicy
// ---------------------------------------------------------------------------

/// Names one of the built-in cost policies, for configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CostPolicy {
    #[default]
    AlwaysCheapest,
    AvoidIllegal,
    AvoidSettlements,
    AvoidSettlementsAndBlockingUnits,
    PreferRoads {
        off_road_penalty: i32,
    },
}

impl CostPolicy {
    /// Build a fresh decider for this policy. `destination` is the tile the
    /// settlement-avoiding policies may still enter.
    pub fn decider<R: MoveRules + ?Sized>(
        self,
        destination: Option<Point>,
    ) -> Box<dyn CostDecider<R>> {
        let settlements = || match destination {
            Some(d) => AvoidSettlementsCostDecider::toward(d),
            None => AvoidSettlementsCostDecider::new(),
        };
        match self {
            CostPolicy::AlwaysCheapest => Box::new(BaseCostDecider::new()),
            CostPolicy::AvoidIllegal => Box::new(AvoidIllegalCostDecider::new()),
            CostPolicy::AvoidSettlements => Box::new(settlements()),
            CostPolicy::AvoidSettlementsAndBlockingUnits => {
                Box::new(settlements().with_blocking_units())
            }
            CostPolicy::PreferRoads { off_road_penalty } => {
                Box::new(RoadPreferringCostDecider::new(off_road_penalty))
            }
        }
    }
}
