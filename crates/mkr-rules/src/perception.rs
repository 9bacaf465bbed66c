//! Sensor snapshot types, shared by the rule book (match keys), the agents
//! (producers), and the operation log (recorded per act).

use mkr_core::SixDir;

// ── RobotPerception ───────────────────────────────────────────────────────────

/// One robot perception: the eight sensor channels, refreshed each step.
///
/// Value domains follow the rule tables: monster detectors are 0/1, the
/// vacuscope is 0/−1, the roboscanner is 0/2.  Field order matches the rule
/// CSV columns.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct RobotPerception {
    /// Monster in the robot's own cell.
    pub energometer: i8,
    /// Monster one cell above (world +ẑ).
    pub top: i8,
    /// Monster in the body-frame left neighbor.
    pub left: i8,
    /// Sticky flag: was the last forward move blocked by an empty cell?
    pub vacuscope_front: i8,
    /// Monster in the body-forward neighbor.
    pub front: i8,
    /// Another live robot in the body-forward neighbor.
    pub roboscanner_front: i8,
    /// Monster in the body-frame right neighbor.
    pub right: i8,
    /// Monster one cell below (world −ẑ).
    pub down: i8,
}

impl RobotPerception {
    /// Exact equality over all eight key sensors.
    ///
    /// Used both by rule matching (non-short-circuit rows) and by the robot's
    /// replay-memory lookup.
    pub fn matches(&self, other: &RobotPerception) -> bool {
        self == other
    }
}

// ── MonsterPerception ─────────────────────────────────────────────────────────

/// One monster perception: the six world-absolute neighbor directions, each
/// 0 when the neighbor cell is free and −1 otherwise (empty or off-lattice).
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct MonsterPerception {
    pub top: i8,
    pub left: i8,
    pub front: i8,
    pub right: i8,
    pub down: i8,
    pub behind: i8,
}

impl MonsterPerception {
    #[inline]
    pub fn get(&self, dir: SixDir) -> i8 {
        match dir {
            SixDir::Top => self.top,
            SixDir::Left => self.left,
            SixDir::Front => self.front,
            SixDir::Right => self.right,
            SixDir::Down => self.down,
            SixDir::Behind => self.behind,
        }
    }

    #[inline]
    pub fn set(&mut self, dir: SixDir, value: i8) {
        match dir {
            SixDir::Top => self.top = value,
            SixDir::Left => self.left = value,
            SixDir::Front => self.front = value,
            SixDir::Right => self.right = value,
            SixDir::Down => self.down = value,
            SixDir::Behind => self.behind = value,
        }
    }

    /// Number of free neighbor directions.
    pub fn n_free(&self) -> u32 {
        SixDir::ALL.iter().filter(|&&d| self.get(d) == 0).count() as u32
    }
}
