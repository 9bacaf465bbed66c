//! The monster-killer robot.
//!
//! One robot turn is three calls made by the scheduler, in order:
//!
//! 1. [`perceive`](Robot::perceive) — read all eight sensors (with the
//!    robot-encounter reflex applied at the end);
//! 2. [`decide`](Robot::decide) — empty-cell override, memory replay, or
//!    rule lookup; records the experience and consumes the vacuscope flag;
//! 3. [`execute`](Robot::execute) — apply the resolved action to self and
//!    world.
//!
//! The split keeps each call borrow-simple: `perceive`/`decide` read the
//! world, only `execute` writes it.

use tracing::{debug, info, warn};

use mkr_core::{Heading, MonsterId, Pos, RobotId, SimRng};
use mkr_rules::{MoveToken, RobotAction, RobotActionKind, RobotPerception, RuleBook};
use mkr_world::World;

use crate::memory::{Experience, ReplayMemory};
use crate::orientation::{is_effective, rotated};

// ── Decision ──────────────────────────────────────────────────────────────────

/// Where a decision came from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DecisionSource {
    /// Replayed from memory (`Regla` 0, `Usa_Memoria?` 1).
    Memory,
    /// Matched a rule row (`Usa_Regla?` 1).
    Rule,
    /// No row matched; the built-in default action (both flags 0).
    Default,
}

/// The outcome of one [`Robot::decide`] call.
#[derive(Clone, Debug)]
pub struct Decision {
    /// The action as drawn from the rule/memory (logged as `Nueva_Accion`).
    pub declared: RobotAction,
    /// The specific action to execute: `move_random` collapsed to a concrete
    /// single-token `move`.  This is also what memory records.
    pub action: RobotAction,
    /// 1-based matched rule number; 0 for memory replay and the default.
    pub rule_num: u32,
    pub source: DecisionSource,
    /// The replayed action when `source` is `Memory` (logged as `Accion_Memoria`).
    pub memory_action: Option<RobotAction>,
}

// ── Robot ─────────────────────────────────────────────────────────────────────

/// A monster-killer robot.
pub struct Robot {
    pub id: RobotId,
    pub position: Pos,
    pub orientation: Heading,
    pub alive: bool,
    /// Position held before the latest successful move (step-back target).
    pub previous_position: Option<Pos>,
    /// 0 or −1; set when a forward move is blocked, read by the next
    /// perception, then consumed.  Sticky for exactly one cycle.
    pub vacuscope_memory: i8,
    pub memory: ReplayMemory,
    pub monsters_destroyed: u32,
    pub robots_collided: u32,
}

impl Robot {
    pub fn new(id: RobotId, position: Pos, memory_limit: usize) -> Robot {
        Robot {
            id,
            position,
            orientation: Heading::default(),
            alive: true,
            previous_position: None,
            vacuscope_memory: 0,
            memory: ReplayMemory::new(memory_limit),
            monsters_destroyed: 0,
            robots_collided: 0,
        }
    }

    // ── Perception ────────────────────────────────────────────────────────

    /// Read all eight sensors.
    ///
    /// Sensor values reflect the orientation held on entry; if the
    /// roboscanner finds another robot in the forward cell, the encounter
    /// reflex rotates this robot `y+90` after every value has been read.
    pub fn perceive(&mut self, world: &World) -> RobotPerception {
        let pos = self.position;
        let front = pos.step(self.orientation);

        let perception = RobotPerception {
            energometer: world.monster_at(pos).is_some() as i8,
            top: world.monster_at(pos.offset(0, 0, 1)).is_some() as i8,
            left: world.monster_at(pos.step(self.orientation.left())).is_some() as i8,
            vacuscope_front: self.vacuscope_memory,
            front: world.monster_at(front).is_some() as i8,
            roboscanner_front: match world.robot_at(front, Some(self.id)) {
                Some(_) => 2,
                None => 0,
            },
            right: world.monster_at(pos.step(self.orientation.right())).is_some() as i8,
            down: world.monster_at(pos.offset(0, 0, -1)).is_some() as i8,
        };

        if perception.roboscanner_front == 2 {
            // Robot-encounter reflex: turn left rather than stare each other down.
            self.orientation = rotated(self.orientation, MoveToken::YPlus90);
            info!(robot = self.id.0, "robot ahead, turned y+90");
        }

        perception
    }

    // ── Decision ──────────────────────────────────────────────────────────

    /// Choose an action for perception `p`.
    ///
    /// A −1 vacuscope reading bypasses memory entirely: empty-cell avoidance
    /// must never be overridden by historical replay.  Otherwise memory is
    /// consulted first (newest to oldest), then the rule book.  The chosen
    /// specific action is appended to memory, and a consumed vacuscope flag
    /// is reset so it cannot leak into a second cycle.
    pub fn decide(&mut self, p: &RobotPerception, rules: &RuleBook, rng: &mut SimRng) -> Decision {
        let empty_override = p.vacuscope_front == -1;

        let (declared, rule_num, source, memory_action) = if empty_override {
            let (rule_num, action) = rules.robot_lookup(p);
            let source =
                if rule_num == 0 { DecisionSource::Default } else { DecisionSource::Rule };
            debug!(robot = self.id.0, rule = rule_num, "empty-cell override, memory bypassed");
            (action, rule_num, source, None)
        } else if let Some(action) = self.memory.recall(p) {
            let action = action.clone();
            debug!(robot = self.id.0, action = %action, "memory replay");
            (action.clone(), 0, DecisionSource::Memory, Some(action))
        } else {
            let (rule_num, action) = rules.robot_lookup(p);
            let source =
                if rule_num == 0 { DecisionSource::Default } else { DecisionSource::Rule };
            (action, rule_num, source, None)
        };

        let action = self.resolve(&declared, rng);

        self.memory.push(Experience { perception: *p, action: action.clone() });

        if self.vacuscope_memory == -1 {
            self.vacuscope_memory = 0;
        }

        Decision { declared, action, rule_num, source, memory_action }
    }

    /// Collapse a `move_random` to a concrete single-token `move`.
    ///
    /// Tokens that would do nothing from the current heading are filtered
    /// out first; if none survive, the first listed token is used.
    fn resolve(&self, declared: &RobotAction, rng: &mut SimRng) -> RobotAction {
        if declared.kind != RobotActionKind::MoveRandom {
            return declared.clone();
        }

        let effective: Vec<MoveToken> = declared
            .directions
            .iter()
            .copied()
            .filter(|&t| is_effective(self.orientation, t))
            .collect();

        let token = rng
            .choose(&effective)
            .copied()
            .or_else(|| declared.directions.first().copied());
        match token {
            Some(t) => RobotAction::single_move(t),
            None => RobotAction::idle(),
        }
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Apply a resolved action.  Returns the id of a destroyed monster so
    /// the scheduler can retire the corresponding entity.
    pub fn execute(&mut self, action: &RobotAction, world: &mut World) -> Option<MonsterId> {
        match action.kind {
            RobotActionKind::Destroy => self.destroy(world),
            RobotActionKind::Memory => {
                self.step_back(world);
                None
            }
            RobotActionKind::Idle => None,
            RobotActionKind::Move | RobotActionKind::MoveRandom => {
                if let Some(&token) = action.directions.first() {
                    self.apply_token(token, world);
                }
                None
            }
            RobotActionKind::Rotate => {
                if let Some(&token) = action.directions.first() {
                    if !token.is_translation() {
                        self.orientation = rotated(self.orientation, token);
                    }
                }
                None
            }
        }
    }

    fn apply_token(&mut self, token: MoveToken, world: &mut World) {
        if token.is_translation() {
            self.advance(world);
        } else {
            self.orientation = rotated(self.orientation, token);
        }
    }

    /// Attempt the body-forward translation.  Empty cells, the world edge,
    /// and other robots all block; a block arms the vacuscope for the next
    /// perception cycle.
    fn advance(&mut self, world: &mut World) {
        let target = self.position.step(self.orientation);
        let blocked = !world.is_free(target) || world.robot_at(target, Some(self.id)).is_some();

        if blocked {
            self.vacuscope_memory = -1;
            debug!(robot = self.id.0, target = %target, "forward move blocked");
            return;
        }

        self.previous_position = Some(self.position);
        self.position = target;
        world.update_robot_position(self.id, target);
    }

    /// Step back to the position held before the latest successful move.
    ///
    /// The previous cell is re-checked: a monster destroyed there since may
    /// have turned it empty, and live agents never stand on empty cells.
    fn step_back(&mut self, world: &mut World) {
        let Some(prev) = self.previous_position else {
            warn!(robot = self.id.0, "step-back with no previous position");
            return;
        };
        if !world.is_free(prev) {
            debug!(robot = self.id.0, prev = %prev, "step-back target no longer free");
            return;
        }
        self.position = prev;
        world.update_robot_position(self.id, prev);
    }

    /// Mutual sacrifice: destroy the monster sharing this cell and die doing
    /// it.  Without a monster present the attempt is a no-op.
    fn destroy(&mut self, world: &mut World) -> Option<MonsterId> {
        match world.destroy_monster_at(self.position) {
            Some(victim) => {
                self.monsters_destroyed += 1;
                self.alive = false;
                world.unregister_robot(self.id);
                info!(
                    robot = self.id.0,
                    monster = victim.0,
                    pos = %self.position,
                    "monster destroyed, robot sacrificed"
                );
                Some(victim)
            }
            None => {
                warn!(robot = self.id.0, pos = %self.position, "destroy attempted, no monster here");
                None
            }
        }
    }
}
