//! The `Sim` struct and its step loop.

use std::collections::BTreeMap;

use tracing::{debug, info};

use mkr_agent::{DecisionSource, Monster, Robot};
use mkr_core::{Pos, SimConfig, SimRng};
use mkr_rules::{MonsterAction, RuleBook};
use mkr_world::World;

use crate::observer::SimObserver;
use crate::record::{MonsterOp, RobotOp};

// ── Reports ───────────────────────────────────────────────────────────────────

/// Why a run stopped.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    RobotsExtinct,
    MonstersExtinct,
    StepCapReached,
}

/// End-of-step snapshot handed to observers.
#[derive(Copy, Clone, Debug)]
pub struct StepReport {
    /// The 1-based step that just completed.
    pub step: u64,
    pub robots_alive: usize,
    pub monsters_alive: usize,
    /// `Some` when the run should stop after this step.
    pub outcome: Option<Outcome>,
}

/// Final run summary.
#[derive(Copy, Clone, Debug)]
pub struct RunReport {
    pub steps_executed: u64,
    pub outcome: Outcome,
    pub robots_alive: usize,
    pub monsters_alive: usize,
    pub monsters_destroyed: u32,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.  Create via [`SimBuilder`][crate::SimBuilder].
///
/// Holds the world, both agent populations (ascending id order, the order in
/// which they act), the immutable rule book, and the single RNG stream.
pub struct Sim {
    pub config: SimConfig,
    pub world: World,
    pub rules: RuleBook,
    pub robots: Vec<Robot>,
    pub monsters: Vec<Monster>,
    pub rng: SimRng,
    /// Completed steps.
    step: u64,
}

impl Sim {
    pub(crate) fn new(
        config: SimConfig,
        world: World,
        rules: RuleBook,
        robots: Vec<Robot>,
        monsters: Vec<Monster>,
        rng: SimRng,
    ) -> Sim {
        Sim { config, world, rules, robots, monsters, rng, step: 0 }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Number of completed steps.
    pub fn steps_completed(&self) -> u64 {
        self.step
    }

    pub fn robots_alive(&self) -> usize {
        self.robots.iter().filter(|r| r.alive).count()
    }

    pub fn monsters_alive(&self) -> usize {
        self.monsters.iter().filter(|m| m.alive).count()
    }

    /// Run until the step cap or an extinction, whichever comes first.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> RunReport {
        let outcome = loop {
            if self.step >= self.config.simulation_steps {
                break Outcome::StepCapReached;
            }
            if let Some(outcome) = self.step_once(observer).outcome {
                break outcome;
            }
        };

        let report = RunReport {
            steps_executed: self.step,
            outcome,
            robots_alive: self.robots_alive(),
            monsters_alive: self.monsters_alive(),
            monsters_destroyed: self.robots.iter().map(|r| r.monsters_destroyed).sum(),
        };
        info!(
            steps = report.steps_executed,
            outcome = ?report.outcome,
            robots_alive = report.robots_alive,
            monsters_alive = report.monsters_alive,
            "simulation finished"
        );
        observer.on_sim_end(&report);
        report
    }

    /// Execute exactly one step (all five phases).
    ///
    /// Never fails; an external wrapper may call this repeatedly at its own
    /// cadence instead of [`run`](Self::run).
    pub fn step_once<O: SimObserver>(&mut self, observer: &mut O) -> StepReport {
        let step = self.step + 1;
        observer.on_step_start(step);

        // ── Phase 1: robots act in ascending id order ─────────────────────
        for i in 0..self.robots.len() {
            if !self.robots[i].alive {
                continue;
            }

            let pos = self.robots[i].position;
            let orientation = self.robots[i].orientation;
            let perception = self.robots[i].perceive(&self.world);
            let decision = self.robots[i].decide(&perception, &self.rules, &mut self.rng);
            let destroyed = self.robots[i].execute(&decision.action, &mut self.world);

            let robot = &self.robots[i];
            observer.on_robot_op(&RobotOp {
                robot: robot.id.0,
                step,
                pos,
                orientation,
                perception,
                rule_num: decision.rule_num,
                action: decision.declared,
                memory_action: decision.memory_action,
                uses_memory: decision.source == DecisionSource::Memory,
                uses_rule: decision.source == DecisionSource::Rule,
                pos_after: robot.position,
                orientation_after: robot.orientation,
                alive_after: robot.alive,
            });

            // A destroyed monster dies immediately: later actors this very
            // step must not sense it.  The world side already happened inside
            // execute; here the entity is retired and its terminal row logged.
            if let Some(victim) = destroyed {
                if let Some(monster) = self.monsters.iter_mut().find(|m| m.id == victim) {
                    monster.alive = false;
                    observer.on_monster_op(&MonsterOp {
                        monster: monster.id.0,
                        step,
                        pos: monster.position,
                        perception: None,
                        rule_num: 0,
                        action: MonsterAction::Wait,
                        death_by_robot: true,
                        steps_remaining: monster.k.saturating_sub(monster.steps_since_last_action),
                        k: monster.k,
                        p: monster.p,
                        alive: false,
                        pos_after: monster.position,
                    });
                }
            }
        }

        // ── Phase 2: robot collision sweep ────────────────────────────────
        self.robot_collision_sweep();

        // ── Phase 3: monsters act in ascending id order ───────────────────
        for i in 0..self.monsters.len() {
            if !self.monsters[i].alive {
                continue;
            }

            let pos = self.monsters[i].position;
            let perception = self.monsters[i].perceive(&self.world);
            let turn =
                self.monsters[i].step(&perception, &self.rules, &mut self.rng, &mut self.world);

            let monster = &self.monsters[i];
            observer.on_monster_op(&MonsterOp {
                monster: monster.id.0,
                step,
                pos,
                perception: Some(perception),
                rule_num: turn.rule_num,
                action: turn.action,
                death_by_robot: false,
                steps_remaining: turn.steps_remaining,
                k: monster.k,
                p: monster.p,
                alive: true,
                pos_after: monster.position,
            });
        }

        // ── Phase 4: monster collision sweep ──────────────────────────────
        self.monster_collision_sweep();

        // ── Phase 5: termination check ────────────────────────────────────
        self.step = step;
        let robots_alive = self.robots_alive();
        let monsters_alive = self.monsters_alive();
        let outcome = if robots_alive == 0 {
            Some(Outcome::RobotsExtinct)
        } else if monsters_alive == 0 {
            Some(Outcome::MonstersExtinct)
        } else if step >= self.config.simulation_steps {
            Some(Outcome::StepCapReached)
        } else {
            None
        };

        let report = StepReport { step, robots_alive, monsters_alive, outcome };
        debug!(step, robots_alive, monsters_alive, "step complete");
        observer.on_step_end(&report);
        report
    }

    // ── Collision sweeps ──────────────────────────────────────────────────

    /// Resolve robots sharing a cell: the smallest id survives, everyone
    /// else on the cell dies, and the survivor's `robots_collided` counter
    /// goes up once per eliminated peer.
    fn robot_collision_sweep(&mut self) {
        let mut by_pos: BTreeMap<Pos, Vec<usize>> = BTreeMap::new();
        for (i, robot) in self.robots.iter().enumerate() {
            if robot.alive {
                by_pos.entry(robot.position).or_default().push(i);
            }
        }

        for (pos, indices) in by_pos {
            if indices.len() < 2 {
                continue;
            }
            // `self.robots` is in ascending id order, so indices[0] is the
            // smallest id on the cell.
            let survivor = indices[0];
            for &loser in &indices[1..] {
                let id = self.robots[loser].id;
                self.robots[loser].alive = false;
                self.world.unregister_robot(id);
                info!(
                    survivor = self.robots[survivor].id.0,
                    loser = id.0,
                    pos = %pos,
                    "robot collision resolved"
                );
            }
            self.robots[survivor].robots_collided += (indices.len() - 1) as u32;
        }
    }

    /// Same arbitration for monsters.  The loser's cell is NOT emptied; the
    /// survivor keeps standing on it.
    fn monster_collision_sweep(&mut self) {
        let mut by_pos: BTreeMap<Pos, Vec<usize>> = BTreeMap::new();
        for (i, monster) in self.monsters.iter().enumerate() {
            if monster.alive {
                by_pos.entry(monster.position).or_default().push(i);
            }
        }

        for (pos, indices) in by_pos {
            if indices.len() < 2 {
                continue;
            }
            for &loser in &indices[1..] {
                let id = self.monsters[loser].id;
                self.monsters[loser].alive = false;
                self.world.unregister_monster(id);
                info!(
                    survivor = self.monsters[indices[0]].id.0,
                    loser = id.0,
                    pos = %pos,
                    "monster collision resolved"
                );
            }
        }
    }
}
