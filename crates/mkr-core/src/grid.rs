//! Lattice primitives: positions, robot headings, and the six absolute
//! neighbor directions.
//!
//! # Coordinate conventions
//!
//! The world is an N³ cube of unit cells addressed by integer `(x, y, z)`.
//! Coordinates are signed so off-lattice neighbor positions (used by sensors
//! probing past the boundary) are representable; the world decides validity.
//!
//! Robot headings are unit axis vectors.  Monsters have no body frame and
//! perceive through the six world-absolute [`SixDir`] directions instead.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Pos ───────────────────────────────────────────────────────────────────────

/// A lattice cell address (possibly out of bounds).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell displaced by `(dx, dy, dz)`.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Pos {
        Pos::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The neighbor cell one step along `heading`.
    #[inline]
    pub fn step(self, heading: Heading) -> Pos {
        let (dx, dy, dz) = heading.vector();
        self.offset(dx, dy, dz)
    }

    /// The neighbor cell one step along the absolute direction `dir`.
    #[inline]
    pub fn neighbor(self, dir: SixDir) -> Pos {
        let (dx, dy, dz) = dir.vector();
        self.offset(dx, dy, dz)
    }

    /// `[x, y, z]` triple, the form used in log files and the JSON summary.
    #[inline]
    pub fn triple(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[i32; 3]> for Pos {
    fn from([x, y, z]: [i32; 3]) -> Pos {
        Pos::new(x, y, z)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.x, self.y, self.z)
    }
}

// ── Heading ───────────────────────────────────────────────────────────────────

/// A robot's orientation: one of the six unit axis vectors.
///
/// The initial heading is `PosZ` (forward along +ẑ).  Body-frame lateral
/// directions derive from the heading vector by the fixed XY-plane rotations
/// `left = (−oy, ox, oz)` and `right = (oy, −ox, oz)`; note that for the
/// vertical headings (`±ẑ`) those formulas degenerate to the heading itself.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Heading {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Heading {
    /// All six headings, in a fixed order (useful for exhaustive tests).
    pub const ALL: [Heading; 6] = [
        Heading::PosX,
        Heading::NegX,
        Heading::PosY,
        Heading::NegY,
        Heading::PosZ,
        Heading::NegZ,
    ];

    /// The unit vector `(ox, oy, oz)` for this heading.
    #[inline]
    pub fn vector(self) -> (i32, i32, i32) {
        match self {
            Heading::PosX => (1, 0, 0),
            Heading::NegX => (-1, 0, 0),
            Heading::PosY => (0, 1, 0),
            Heading::NegY => (0, -1, 0),
            Heading::PosZ => (0, 0, 1),
            Heading::NegZ => (0, 0, -1),
        }
    }

    /// Heading from a unit axis vector; `None` for anything else.
    pub fn from_vector(v: (i32, i32, i32)) -> Option<Heading> {
        Heading::ALL.into_iter().find(|h| h.vector() == v)
    }

    /// Body-frame left lateral: `(−oy, ox, oz)`.
    #[inline]
    pub fn left(self) -> Heading {
        let (ox, oy, oz) = self.vector();
        // (−oy, ox, oz) maps unit axis vectors to unit axis vectors.
        Heading::from_vector((-oy, ox, oz)).unwrap_or(self)
    }

    /// Body-frame right lateral: `(oy, −ox, oz)`.
    #[inline]
    pub fn right(self) -> Heading {
        let (ox, oy, oz) = self.vector();
        Heading::from_vector((oy, -ox, oz)).unwrap_or(self)
    }

    /// `[ox, oy, oz]` triple, the form used in log files.
    #[inline]
    pub fn triple(self) -> [i32; 3] {
        let (ox, oy, oz) = self.vector();
        [ox, oy, oz]
    }
}

impl Default for Heading {
    /// The initial heading of every robot: forward along +ẑ.
    fn default() -> Self {
        Heading::PosZ
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ox, oy, oz) = self.vector();
        write!(f, "[{ox},{oy},{oz}]")
    }
}

// ── SixDir ────────────────────────────────────────────────────────────────────

/// The six world-absolute neighbor directions used by monster perception and
/// monster movement.
///
/// Naming follows the rule-table columns: `Front`/`Behind` run along ±ŷ,
/// `Right`/`Left` along ±x̂, `Top`/`Down` along ±ẑ.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SixDir {
    Top,
    Left,
    Front,
    Right,
    Down,
    Behind,
}

impl SixDir {
    /// All six directions in rule-table column order.
    pub const ALL: [SixDir; 6] = [
        SixDir::Top,
        SixDir::Left,
        SixDir::Front,
        SixDir::Right,
        SixDir::Down,
        SixDir::Behind,
    ];

    /// The unit vector for this direction.
    #[inline]
    pub fn vector(self) -> (i32, i32, i32) {
        match self {
            SixDir::Top => (0, 0, 1),
            SixDir::Left => (-1, 0, 0),
            SixDir::Front => (0, 1, 0),
            SixDir::Right => (1, 0, 0),
            SixDir::Down => (0, 0, -1),
            SixDir::Behind => (0, -1, 0),
        }
    }

    /// Parse a direction name as it appears in monster rule actions.
    pub fn parse(s: &str) -> Option<SixDir> {
        match s.trim() {
            "Top" => Some(SixDir::Top),
            "Left" => Some(SixDir::Left),
            "Front" => Some(SixDir::Front),
            "Right" => Some(SixDir::Right),
            "Down" => Some(SixDir::Down),
            "Behind" => Some(SixDir::Behind),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SixDir::Top => "Top",
            SixDir::Left => "Left",
            SixDir::Front => "Front",
            SixDir::Right => "Right",
            SixDir::Down => "Down",
            SixDir::Behind => "Behind",
        }
    }
}

impl fmt::Display for SixDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
