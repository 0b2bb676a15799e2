use tilepath_core::{Point, Range};

/// Map adjacency: the minimal interface a search walks over.
pub trait WorldMap {
    /// Bounds of the map. Every tile a search visits lies inside it.
    fn range(&self) -> Range;

    /// Append the tiles reachable in one step from `p` into `buf`. The
    /// caller clears `buf` before calling. Adjacency may be directional.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);

    /// Whether `p` is a tile of this map.
    fn is_on_map(&self, p: Point) -> bool {
        self.range().contains(p)
    }
}

/// What a step from one tile to the next would mean for a mover.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveType {
    /// An ordinary move onto an empty tile.
    Move,
    /// A move into a settlement the mover may enter.
    EnterSettlement,
    /// The target holds a hostile unit; stepping there is an attack.
    Attack,
    /// The mover is not allowed onto the target at all.
    NoAccess,
}

impl MoveType {
    /// Whether the step actually relocates the mover.
    #[inline]
    pub fn is_progress(self) -> bool {
        matches!(self, MoveType::Move | MoveType::EnterSettlement)
    }
}

/// Mover and terrain attributes consulted while costing a step.
///
/// Only [`movement_allowance`](Self::movement_allowance) and
/// [`terrain_cost`](Self::terrain_cost) are required; the other queries have
/// permissive defaults and are used by the stricter cost policies.
pub trait MoveRules: WorldMap {
    /// The entity being moved.
    type Mover: ?Sized;

    /// Movement points the mover receives at the start of every turn.
    fn movement_allowance(&self, mover: &Self::Mover) -> i32;

    /// Movement points the mover has left in the current turn, where the
    /// search starts. Defaults to a full allowance.
    fn moves_left(&self, mover: &Self::Mover) -> i32 {
        self.movement_allowance(mover)
    }

    /// Movement points needed to step from `from` to the adjacent `to`.
    /// A value `<= 0` means the terrain is impassable for this mover.
    fn terrain_cost(&self, mover: &Self::Mover, from: Point, to: Point) -> i32;

    /// Classify the step from `from` to `to`.
    fn move_type(&self, _mover: &Self::Mover, _from: Point, _to: Point) -> MoveType {
        MoveType::Move
    }

    /// Whether a settlement stands on `p`.
    fn is_settlement(&self, _p: Point) -> bool {
        false
    }

    /// Whether a unit other than `mover` stands on `p`.
    fn is_occupied(&self, _mover: &Self::Mover, _p: Point) -> bool {
        false
    }

    /// Whether `p` carries a road.
    fn has_road(&self, _p: Point) -> bool {
        false
    }
}
