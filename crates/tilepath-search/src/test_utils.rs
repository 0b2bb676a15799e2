//! ASCII map fixtures for tests and benchmarks.
//!
//! Available with the `test-utils` feature.
//!
//! | Char | Tile |
//! |---|---|
//! | `.` | plains, cost 1 |
//! | `h` `f` | hills / forest, cost 2 |
//! | `m` | mountains, cost 3 |
//! | `#` `~` | impassable rock / water |
//! | `=` | plains with a road |
//! | `S` | own settlement (with road) |
//! | `X` | foreign settlement, no access |
//! | `u` | plains held by a friendly unit |
//! | `e` | plains held by an enemy unit |
//! | `@` `*` `A`–`D` | plains, remembered as markers |
//!
//! Moving between two road tiles costs 1 whatever the terrain.

use tilepath_core::{Grid, Point, Range};

use crate::traits::{MoveRules, MoveType, WorldMap};

/// Who a settlement or unit belongs to, relative to the mover.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Owner {
    Own,
    Foreign,
}

/// One tile of a [`TerrainGrid`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Movement cost to enter; 0 is impassable.
    pub cost: i32,
    pub road: bool,
    pub settlement: Option<Owner>,
    pub unit: Option<Owner>,
}

impl Tile {
    pub const PLAINS: Tile = Tile {
        cost: 1,
        road: false,
        settlement: None,
        unit: None,
    };

    fn from_char(c: char) -> Option<Tile> {
        let p = Tile::PLAINS;
        Some(match c {
            '.' | '@' | '*' | 'A'..='D' => p,
            'h' | 'f' => Tile { cost: 2, ..p },
            'm' => Tile { cost: 3, ..p },
            '#' | '~' => Tile { cost: 0, ..p },
            '=' => Tile { road: true, ..p },
            'S' => Tile {
                road: true,
                settlement: Some(Owner::Own),
                ..p
            },
            'X' => Tile {
                settlement: Some(Owner::Foreign),
                ..p
            },
            'u' => Tile {
                unit: Some(Owner::Own),
                ..p
            },
            'e' => Tile {
                unit: Some(Owner::Foreign),
                ..p
            },
            _ => return None,
        })
    }
}

/// A unit with a per-turn allowance and the points it has left now.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TestUnit {
    pub allowance: i32,
    pub moves_left: i32,
}

impl TestUnit {
    /// A unit at the start of its turn.
    pub fn new(allowance: i32) -> Self {
        Self {
            allowance,
            moves_left: allowance,
        }
    }

    /// The same unit after it has already spent some points.
    pub fn with_moves_left(mut self, moves_left: i32) -> Self {
        self.moves_left = moves_left;
        self
    }
}

/// A map built from ASCII rows.
#[derive(Clone, Debug)]
pub struct TerrainGrid {
    tiles: Grid<Tile>,
    markers: Vec<(char, Point)>,
    diagonals: bool,
}

impl TerrainGrid {
    /// Parse a map. Blank lines are ignored and surrounding whitespace is
    /// trimmed; short rows are padded with impassable rock.
    ///
    /// # Panics
    ///
    /// On characters not listed in the module docs.
    pub fn parse(ascii: &str) -> Self {
        let rows: Vec<&str> = ascii
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let bounds = Range::with_size(width as i32, rows.len() as i32);
        let mut tiles = Grid::new(bounds, Tile { cost: 0, ..Tile::PLAINS });
        let mut markers = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let p = Point::new(x as i32, y as i32);
                let tile = Tile::from_char(c)
                    .unwrap_or_else(|| panic!("unknown tile {c:?} at {p}"));
                if matches!(c, '@' | '*' | 'A'..='D') {
                    markers.push((c, p));
                }
                tiles.set(p, tile);
            }
        }
        Self {
            tiles,
            markers,
            diagonals: false,
        }
    }

    /// Allow 8-way movement.
    pub fn with_diagonals(mut self) -> Self {
        self.diagonals = true;
        self
    }

    /// Where marker `c` was placed.
    ///
    /// # Panics
    ///
    /// If the map has no such marker.
    pub fn marker(&self, c: char) -> Point {
        self.markers
            .iter()
            .find(|(m, _)| *m == c)
            .map(|(_, p)| *p)
            .unwrap_or_else(|| panic!("no marker {c:?} on the map"))
    }

    pub fn tile(&self, p: Point) -> Option<&Tile> {
        self.tiles.at(p)
    }

    /// Replace the tile at `p`.
    pub fn set_tile(&mut self, p: Point, tile: Tile) {
        self.tiles.set(p, tile);
    }
}

impl WorldMap for TerrainGrid {
    fn range(&self) -> Range {
        self.tiles.bounds()
    }

    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        if self.diagonals {
            buf.extend(p.neighbors_8().into_iter().filter(|n| self.tiles.contains(*n)));
        } else {
            buf.extend(p.neighbors_4().into_iter().filter(|n| self.tiles.contains(*n)));
        }
    }
}

impl MoveRules for TerrainGrid {
    type Mover = TestUnit;

    fn movement_allowance(&self, mover: &TestUnit) -> i32 {
        mover.allowance
    }

    fn moves_left(&self, mover: &TestUnit) -> i32 {
        mover.moves_left
    }

    fn terrain_cost(&self, _mover: &TestUnit, from: Point, to: Point) -> i32 {
        let Some(target) = self.tiles.at(to) else {
            return 0;
        };
        if target.cost > 0 && target.road && self.has_road(from) {
            return 1;
        }
        target.cost
    }

    fn move_type(&self, _mover: &TestUnit, _from: Point, to: Point) -> MoveType {
        let Some(t) = self.tiles.at(to) else {
            return MoveType::NoAccess;
        };
        match (t.settlement, t.unit) {
            (Some(Owner::Foreign), _) => MoveType::NoAccess,
            (Some(Owner::Own), _) => MoveType::EnterSettlement,
            (None, Some(Owner::Foreign)) => MoveType::Attack,
            _ => MoveType::Move,
        }
    }

    fn is_settlement(&self, p: Point) -> bool {
        self.tiles.at(p).is_some_and(|t| t.settlement.is_some())
    }

    fn is_occupied(&self, _mover: &TestUnit, p: Point) -> bool {
        self.tiles.at(p).is_some_and(|t| t.unit.is_some())
    }

    fn has_road(&self, p: Point) -> bool {
        self.tiles.at(p).is_some_and(|t| t.road)
    }
}
