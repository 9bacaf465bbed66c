//! The `World` struct: cell grid plus agent registries.

use rustc_hash::FxHashMap;
use tracing::debug;

use mkr_core::{MonsterId, Pos, RobotId, SimRng};

// ── CellState ─────────────────────────────────────────────────────────────────

/// The state of one lattice cell.
///
/// Only free cells admit agents.  The outer shell (any coordinate equal to 0
/// or N−1) is empty from construction onward, so the lattice is closed: no
/// sensor or move ever has to special-case the world edge beyond the normal
/// empty-cell handling.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CellState {
    Free,
    Empty,
}

/// Cell counts reported in the final summary.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct CellCensus {
    pub free: usize,
    pub interior_empty: usize,
    pub boundary: usize,
}

// ── World ─────────────────────────────────────────────────────────────────────

/// The N³ lattice and the positions of every live agent.
pub struct World {
    n: i32,
    /// Row-major `x * n² + y * n + z`.
    cells: Vec<CellState>,
    robots: FxHashMap<RobotId, Pos>,
    monsters: FxHashMap<MonsterId, Pos>,
}

impl World {
    // ── Construction ──────────────────────────────────────────────────────

    /// A world whose interior is entirely free (boundary shell empty).
    ///
    /// `n` below 3 yields a world with no interior at all.
    pub fn with_size(n: i32) -> World {
        let len = (n.max(0) as usize).pow(3);
        let mut world = World {
            n,
            cells: vec![CellState::Free; len],
            robots: FxHashMap::default(),
            monsters: FxHashMap::default(),
        };
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    if x == 0 || x == n - 1 || y == 0 || y == n - 1 || z == 0 || z == n - 1 {
                        world.set(Pos::new(x, y, z), CellState::Empty);
                    }
                }
            }
        }
        world
    }

    /// Generate a world with randomly placed interior empty cells.
    ///
    /// The number of interior empties is
    /// `floor((N−2)³ · p_empty · internal_ratio · 0.5)`, sampled uniformly
    /// without replacement from the strict interior.
    pub fn generate(n: i32, p_empty: f64, internal_ratio: f64, rng: &mut SimRng) -> World {
        let mut world = World::with_size(n);

        let interior: Vec<Pos> = world.interior_cells();
        let target = (interior.len() as f64 * p_empty * internal_ratio * 0.5).floor() as usize;

        for i in rng.sample_indices(interior.len(), target) {
            world.set(interior[i], CellState::Empty);
        }

        debug!(n, interior_empty = target, "world generated");
        world
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Side length N.
    pub fn n(&self) -> i32 {
        self.n
    }

    pub fn in_bounds(&self, p: Pos) -> bool {
        (0..self.n).contains(&p.x) && (0..self.n).contains(&p.y) && (0..self.n).contains(&p.z)
    }

    /// In bounds and the cell is free.
    pub fn is_free(&self, p: Pos) -> bool {
        self.cell(p) == Some(CellState::Free)
    }

    /// Out of bounds counts as empty, so sensors probing past the boundary
    /// degrade gracefully.
    pub fn is_empty(&self, p: Pos) -> bool {
        self.cell(p) != Some(CellState::Free)
    }

    /// The cell state at `p`, or `None` out of bounds.
    pub fn cell(&self, p: Pos) -> Option<CellState> {
        self.index(p).map(|i| self.cells[i])
    }

    /// The live monster at `p`, if any.  With transient multi-occupancy
    /// (pre-sweep) the smallest id wins, keeping every query deterministic.
    pub fn monster_at(&self, p: Pos) -> Option<MonsterId> {
        self.monsters
            .iter()
            .filter(|&(_, &pos)| pos == p)
            .map(|(&id, _)| id)
            .min()
    }

    /// The live robot at `p`, if any, optionally excluding one id (an agent
    /// probing its own surroundings passes its own id).
    pub fn robot_at(&self, p: Pos, exclude: Option<RobotId>) -> Option<RobotId> {
        self.robots
            .iter()
            .filter(|&(&id, &pos)| pos == p && Some(id) != exclude)
            .map(|(&id, _)| id)
            .min()
    }

    /// All strict-interior cells (free or not), in lattice order.
    fn interior_cells(&self) -> Vec<Pos> {
        let mut cells = Vec::new();
        for x in 1..self.n - 1 {
            for y in 1..self.n - 1 {
                for z in 1..self.n - 1 {
                    cells.push(Pos::new(x, y, z));
                }
            }
        }
        cells
    }

    /// All free strict-interior cells, in lattice order.
    pub fn internal_free_cells(&self) -> Vec<Pos> {
        self.interior_cells()
            .into_iter()
            .filter(|&p| self.is_free(p))
            .collect()
    }

    /// Uniform draw over interior free cells.  Occupancy is ignored: a
    /// duplicate spawn is legal and resolved by the first collision sweep.
    pub fn random_internal_free_cell(&self, rng: &mut SimRng) -> Option<Pos> {
        let cells = self.internal_free_cells();
        rng.choose(&cells).copied()
    }

    /// Free / interior-empty / boundary cell counts.
    pub fn census(&self) -> CellCensus {
        let mut census = CellCensus::default();
        for x in 0..self.n {
            for y in 0..self.n {
                for z in 0..self.n {
                    let p = Pos::new(x, y, z);
                    let boundary = x == 0
                        || x == self.n - 1
                        || y == 0
                        || y == self.n - 1
                        || z == 0
                        || z == self.n - 1;
                    match self.cell(p) {
                        Some(CellState::Free) => census.free += 1,
                        Some(CellState::Empty) if boundary => census.boundary += 1,
                        Some(CellState::Empty) => census.interior_empty += 1,
                        None => {}
                    }
                }
            }
        }
        census
    }

    /// Number of registered (live) robots.
    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    /// Number of registered (live) monsters.
    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    pub fn register_robot(&mut self, id: RobotId, p: Pos) {
        self.robots.insert(id, p);
    }

    /// Update a robot's registered position.  Unknown id: silent no-op.
    pub fn update_robot_position(&mut self, id: RobotId, p: Pos) {
        if let Some(pos) = self.robots.get_mut(&id) {
            *pos = p;
        }
    }

    pub fn unregister_robot(&mut self, id: RobotId) {
        self.robots.remove(&id);
    }

    pub fn register_monster(&mut self, id: MonsterId, p: Pos) {
        self.monsters.insert(id, p);
    }

    /// Update a monster's registered position.  Unknown id: silent no-op.
    pub fn update_monster_position(&mut self, id: MonsterId, p: Pos) {
        if let Some(pos) = self.monsters.get_mut(&id) {
            *pos = p;
        }
    }

    pub fn unregister_monster(&mut self, id: MonsterId) {
        self.monsters.remove(&id);
    }

    /// Remove the monster registered at `p` (smallest id on multi-occupancy)
    /// and turn the cell empty.  Returns the removed id.
    pub fn destroy_monster_at(&mut self, p: Pos) -> Option<MonsterId> {
        let id = self.monster_at(p)?;
        self.monsters.remove(&id);
        self.create_empty(p);
        debug!(monster = id.0, pos = %p, "monster destroyed, cell now empty");
        Some(id)
    }

    /// Turn the cell at `p` empty.  Out of bounds: silent no-op.
    pub fn create_empty(&mut self, p: Pos) {
        self.set(p, CellState::Empty);
    }

    // ── Internal ──────────────────────────────────────────────────────────

    fn set(&mut self, p: Pos, state: CellState) {
        if let Some(i) = self.index(p) {
            self.cells[i] = state;
        }
    }

    fn index(&self, p: Pos) -> Option<usize> {
        if !self.in_bounds(p) {
            return None;
        }
        let n = self.n as usize;
        Some((p.x as usize) * n * n + (p.y as usize) * n + p.z as usize)
    }
}
