//! The monster: an energetic entity with no body frame, moving through the
//! six world-absolute directions under K/p gating.

use tracing::debug;

use mkr_core::{MonsterId, Pos, SimRng, SixDir};
use mkr_rules::{MonsterAction, MonsterPerception, RuleBook};
use mkr_world::World;

// ── MonsterTurn ───────────────────────────────────────────────────────────────

/// The outcome of one gated monster turn, with everything the operation log
/// needs.
#[derive(Clone, Debug)]
pub struct MonsterTurn {
    /// 1-based matched rule number; 0 for gated waits and the default.
    pub rule_num: u32,
    /// The action taken (`Wait` when the gate closed).
    pub action: MonsterAction,
    /// `K − counter` after the gating update; K right after a reset.
    pub steps_remaining: u32,
    /// New position when the action actually moved the monster.
    pub moved_to: Option<Pos>,
}

// ── Monster ───────────────────────────────────────────────────────────────────

pub struct Monster {
    pub id: MonsterId,
    pub position: Pos,
    pub alive: bool,
    /// Eligibility period: may act at most once every `k` steps.
    pub k: u32,
    /// Probability of acting on an eligible step.
    pub p: f64,
    pub steps_since_last_action: u32,
}

impl Monster {
    pub fn new(id: MonsterId, position: Pos, k: u32, p: f64) -> Monster {
        Monster { id, position, alive: true, k, p, steps_since_last_action: 0 }
    }

    // ── Perception ────────────────────────────────────────────────────────

    /// Probe the six absolute neighbors: 0 when free, −1 otherwise (empty
    /// or off-lattice).  Occupancy is invisible to monsters; only the cell
    /// state matters.
    pub fn perceive(&self, world: &World) -> MonsterPerception {
        let mut perception = MonsterPerception::default();
        for dir in SixDir::ALL {
            let value = if world.is_free(self.position.neighbor(dir)) { 0 } else { -1 };
            perception.set(dir, value);
        }
        perception
    }

    // ── Gated turn ────────────────────────────────────────────────────────

    /// One turn: advance the cooldown counter, roll the p-gate when
    /// eligible, and dispatch through the rule book when the gate opens.
    pub fn step(
        &mut self,
        perception: &MonsterPerception,
        rules: &RuleBook,
        rng: &mut SimRng,
        world: &mut World,
    ) -> MonsterTurn {
        self.steps_since_last_action += 1;

        // Cooldown: not yet eligible.
        if self.steps_since_last_action < self.k {
            return MonsterTurn {
                rule_num: 0,
                action: MonsterAction::Wait,
                steps_remaining: self.k - self.steps_since_last_action,
                moved_to: None,
            };
        }

        // Eligible: act with probability p, else wait out this window.
        if !rng.gen_bool(self.p) {
            self.steps_since_last_action = 0;
            return MonsterTurn {
                rule_num: 0,
                action: MonsterAction::Wait,
                steps_remaining: self.k,
                moved_to: None,
            };
        }

        let (rule_num, action) = rules.monster_lookup(perception);
        self.steps_since_last_action = 0;
        let moved_to = self.execute(&action, rng, world);

        MonsterTurn { rule_num, action, steps_remaining: self.k, moved_to }
    }

    fn execute(&mut self, action: &MonsterAction, rng: &mut SimRng, world: &mut World) -> Option<Pos> {
        match action {
            MonsterAction::Wait => None,
            MonsterAction::MoveTo(dir) => self.try_move(*dir, world),
            MonsterAction::MoveRandomAmong(dirs) => {
                let dir = rng.choose(dirs).copied()?;
                self.try_move(dir, world)
            }
        }
    }

    /// Move into the named neighbor if it is a free cell; silently remain
    /// otherwise.
    fn try_move(&mut self, dir: SixDir, world: &mut World) -> Option<Pos> {
        let target = self.position.neighbor(dir);
        if !world.is_free(target) {
            debug!(monster = self.id.0, %dir, target = %target, "move blocked");
            return None;
        }
        self.position = target;
        world.update_monster_position(self.id, target);
        Some(target)
    }
}
