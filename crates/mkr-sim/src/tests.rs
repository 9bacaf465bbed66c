//! Integration tests for mkr-sim.

use mkr_core::{PlacementMode, Pos, SimConfig};
use mkr_rules::{
    MonsterAction, MonsterPerception, MonsterRule, MoveToken, RobotAction, RobotActionKind,
    RobotPerception, RobotRule, RuleBook,
};
use mkr_world::World;

use crate::{NoopObserver, Outcome, SimBuilder, SimObserver};
use crate::record::{MonsterOp, RobotOp};
use crate::sim::StepReport;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn base_config() -> SimConfig {
    SimConfig {
        world_size: 6,
        num_robots: 0,
        num_monsters: 0,
        simulation_steps: 5,
        monster_frequency: 1,
        monster_probability: 0.0,
        robot_memory_limit: 100,
        random_seed: 1,
        ..SimConfig::default()
    }
}

fn robot_rule(sensors: RobotPerception, action: RobotAction) -> RobotRule {
    RobotRule { sensors, action }
}

fn idle() -> RobotAction {
    RobotAction::idle()
}

fn destroy() -> RobotAction {
    RobotAction { kind: RobotActionKind::Destroy, directions: vec![] }
}

/// Robots idle on a clear view; useful when only collision/gating behavior
/// is under test.
fn idle_book() -> RuleBook {
    RuleBook::new(vec![robot_rule(RobotPerception::default(), idle())], vec![])
}

/// Observer that records every op and step report.
#[derive(Default)]
struct Recorder {
    robot_ops: Vec<RobotOp>,
    monster_ops: Vec<MonsterOp>,
    steps: Vec<StepReport>,
}

impl SimObserver for Recorder {
    fn on_robot_op(&mut self, op: &RobotOp) {
        self.robot_ops.push(op.clone());
    }
    fn on_monster_op(&mut self, op: &MonsterOp) {
        self.monster_ops.push(op.clone());
    }
    fn on_step_end(&mut self, report: &StepReport) {
        self.steps.push(*report);
    }
}

// ── Builder validation ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let config = SimConfig { num_robots: 2, num_monsters: 3, ..base_config() };
        let sim = SimBuilder::new(config, idle_book()).build().unwrap();
        assert_eq!(sim.robots.len(), 2);
        assert_eq!(sim.monsters.len(), 3);
        // Ascending id order, ids 1-based.
        assert_eq!(sim.robots[0].id.0, 1);
        assert_eq!(sim.robots[1].id.0, 2);
        assert_eq!(sim.monsters[2].id.0, 3);
    }

    #[test]
    fn invalid_config_fails_before_any_step() {
        let config = SimConfig { world_size: 2, ..base_config() };
        assert!(SimBuilder::new(config, idle_book()).build().is_err());
    }

    #[test]
    fn fixed_position_on_boundary_is_rejected() {
        let config = SimConfig {
            num_robots: 1,
            robot_position_mode: PlacementMode::Fixed,
            robot_fixed_position: Some(Pos::new(0, 2, 2)),
            ..base_config()
        };
        assert!(SimBuilder::new(config, idle_book()).build().is_err());
    }

    #[test]
    fn random_placement_lands_on_interior_free_cells() {
        let config = SimConfig { num_robots: 4, num_monsters: 4, ..base_config() };
        let sim = SimBuilder::new(config, idle_book()).build().unwrap();
        for robot in &sim.robots {
            assert!(sim.world.is_free(robot.position));
        }
        for monster in &sim.monsters {
            assert!(sim.world.is_free(monster.position));
        }
    }

    #[test]
    fn zero_step_cap_runs_nothing() {
        let config = SimConfig {
            num_robots: 1,
            num_monsters: 1,
            simulation_steps: 0,
            ..base_config()
        };
        let mut sim = SimBuilder::new(config, idle_book()).build().unwrap();
        let report = sim.run(&mut NoopObserver);
        assert_eq!(report.steps_executed, 0);
        assert_eq!(report.outcome, Outcome::StepCapReached);
    }
}

// ── Boundary bounce ───────────────────────────────────────────────────────────

#[cfg(test)]
mod boundary_bounce_tests {
    use super::*;

    /// A robot advancing along +ẑ from (2,2,2) in a 6-world: two clean moves,
    /// then the boundary blocks the third and the vacuscope arms for the
    /// following perception.
    fn bounce_sim(steps: u64) -> (crate::Sim, Recorder) {
        let config = SimConfig {
            num_robots: 1,
            robot_position_mode: PlacementMode::Fixed,
            robot_fixed_position: Some(Pos::new(2, 2, 2)),
            // A dormant monster far from the path keeps the run alive.
            num_monsters: 1,
            monster_position_mode: PlacementMode::Fixed,
            monster_fixed_position: Some(Pos::new(4, 4, 1)),
            monster_frequency: 5,
            monster_probability: 0.0,
            simulation_steps: steps,
            ..base_config()
        };
        let mut sim = SimBuilder::new(config, RuleBook::new(vec![], vec![]))
            .world(World::with_size(6))
            .build()
            .unwrap();
        let mut recorder = Recorder::default();
        sim.run(&mut recorder);
        (sim, recorder)
    }

    #[test]
    fn advances_until_the_boundary_blocks() {
        let (sim, recorder) = bounce_sim(3);
        assert_eq!(sim.robots[0].position, Pos::new(2, 2, 4));
        assert_eq!(sim.robots[0].vacuscope_memory, -1);
        assert_eq!(recorder.robot_ops[0].pos_after, Pos::new(2, 2, 3));
        assert_eq!(recorder.robot_ops[1].pos_after, Pos::new(2, 2, 4));
        assert_eq!(recorder.robot_ops[2].pos_after, Pos::new(2, 2, 4));
    }

    #[test]
    fn next_perception_reads_the_armed_vacuscope() {
        let (_, recorder) = bounce_sim(4);
        assert_eq!(recorder.robot_ops[2].perception.vacuscope_front, 0);
        assert_eq!(recorder.robot_ops[3].perception.vacuscope_front, -1);
    }

    #[test]
    fn default_then_memory_provenance() {
        let (_, recorder) = bounce_sim(4);
        // Step 1: nothing matched, default action: both flags 0, rule 0.
        let first = &recorder.robot_ops[0];
        assert!(!first.uses_rule && !first.uses_memory);
        assert_eq!(first.rule_num, 0);
        // Step 2: the identical perception replays from memory.
        let second = &recorder.robot_ops[1];
        assert!(second.uses_memory);
        assert_eq!(second.rule_num, 0);
        // Step 4: vacuscope −1 overrides memory; with no matching row the
        // default fires again, bypassing the remembered action.
        let fourth = &recorder.robot_ops[3];
        assert!(!fourth.uses_memory);
    }
}

// ── Mutual sacrifice ──────────────────────────────────────────────────────────

#[cfg(test)]
mod mutual_sacrifice_tests {
    use super::*;

    fn sacrifice_sim() -> (crate::Sim, Recorder, crate::RunReport) {
        let shared = Pos::new(2, 2, 2);
        let config = SimConfig {
            num_robots: 1,
            robot_position_mode: PlacementMode::Fixed,
            robot_fixed_position: Some(shared),
            num_monsters: 1,
            monster_position_mode: PlacementMode::Fixed,
            monster_fixed_position: Some(shared),
            simulation_steps: 3,
            ..base_config()
        };
        let rules = RuleBook::new(
            vec![robot_rule(
                RobotPerception { energometer: 1, ..Default::default() },
                destroy(),
            )],
            vec![],
        );
        let mut sim = SimBuilder::new(config, rules)
            .world(World::with_size(6))
            .build()
            .unwrap();
        let mut recorder = Recorder::default();
        let report = sim.run(&mut recorder);
        (sim, recorder, report)
    }

    #[test]
    fn both_die_and_the_cell_turns_empty() {
        let (sim, _, report) = sacrifice_sim();
        assert!(!sim.robots[0].alive);
        assert!(!sim.monsters[0].alive);
        assert_eq!(sim.robots[0].monsters_destroyed, 1);
        assert!(sim.world.is_empty(Pos::new(2, 2, 2)));
        assert_eq!(report.outcome, Outcome::RobotsExtinct);
        assert_eq!(report.steps_executed, 1);
        assert_eq!(report.monsters_destroyed, 1);
    }

    #[test]
    fn energometer_short_circuit_fires_through_noise() {
        // The destroy row has zeros everywhere else, yet it must match even
        // with a second monster lighting up a directional sensor.
        let shared = Pos::new(2, 2, 2);
        let config = SimConfig {
            num_robots: 1,
            robot_position_mode: PlacementMode::Fixed,
            robot_fixed_position: Some(shared),
            num_monsters: 2,
            monster_position_mode: PlacementMode::Fixed,
            monster_fixed_position: Some(shared),
            simulation_steps: 2,
            ..base_config()
        };
        let rules = RuleBook::new(
            vec![robot_rule(
                RobotPerception { energometer: 1, ..Default::default() },
                destroy(),
            )],
            vec![],
        );
        let mut sim = SimBuilder::new(config, rules)
            .world(World::with_size(6))
            .build()
            .unwrap();
        let mut recorder = Recorder::default();
        sim.run(&mut recorder);

        let op = &recorder.robot_ops[0];
        assert_eq!(op.perception.energometer, 1);
        assert_eq!(op.rule_num, 1);
        assert!(!sim.robots[0].alive);
        // Only the smallest-id monster on the cell was destroyed.
        assert!(!sim.monsters[0].alive);
        assert!(sim.monsters[1].alive);
    }

    #[test]
    fn victim_gets_a_terminal_death_row() {
        let (_, recorder, _) = sacrifice_sim();
        let death = recorder
            .monster_ops
            .iter()
            .find(|op| op.death_by_robot)
            .expect("death row recorded");
        assert_eq!(death.monster, 1);
        assert!(!death.alive);
        assert!(death.perception.is_none());
    }
}

// ── Collision arbitration ─────────────────────────────────────────────────────

#[cfg(test)]
mod collision_tests {
    use super::*;

    fn pileup(num_robots: u32) -> crate::Sim {
        let config = SimConfig {
            num_robots,
            robot_position_mode: PlacementMode::Fixed,
            robot_fixed_position: Some(Pos::new(3, 3, 3)),
            simulation_steps: 1,
            ..base_config()
        };
        let mut sim = SimBuilder::new(config, idle_book())
            .world(World::with_size(6))
            .build()
            .unwrap();
        sim.run(&mut NoopObserver);
        sim
    }

    #[test]
    fn smaller_id_survives_a_pair() {
        let sim = pileup(2);
        assert!(sim.robots[0].alive);
        assert!(!sim.robots[1].alive);
        assert_eq!(sim.robots[0].robots_collided, 1);
        assert_eq!(sim.robots[0].position, Pos::new(3, 3, 3));
        assert_eq!(sim.world.robot_count(), 1);
    }

    #[test]
    fn pileup_of_three_leaves_one() {
        let sim = pileup(3);
        assert!(sim.robots[0].alive);
        assert!(!sim.robots[1].alive && !sim.robots[2].alive);
        assert_eq!(sim.robots[0].robots_collided, 2);
    }

    #[test]
    fn monster_collision_does_not_empty_the_cell() {
        let shared = Pos::new(3, 3, 3);
        let config = SimConfig {
            num_robots: 1,
            robot_position_mode: PlacementMode::Fixed,
            robot_fixed_position: Some(Pos::new(1, 1, 1)),
            num_monsters: 2,
            monster_position_mode: PlacementMode::Fixed,
            monster_fixed_position: Some(shared),
            simulation_steps: 1,
            monster_frequency: 3, // both on cooldown: they wait in place
            ..base_config()
        };
        let mut sim = SimBuilder::new(config, idle_book())
            .world(World::with_size(6))
            .build()
            .unwrap();
        sim.run(&mut NoopObserver);

        assert!(sim.monsters[0].alive);
        assert!(!sim.monsters[1].alive);
        // The survivor stands there; the cell must still be free.
        assert!(sim.world.is_free(shared));
        assert_eq!(sim.world.monster_count(), 1);
    }
}

// ── Monster gating over a full run ────────────────────────────────────────────

#[cfg(test)]
mod gating_tests {
    use super::*;

    #[test]
    fn zero_probability_monster_never_moves() {
        let config = SimConfig {
            num_robots: 1,
            robot_position_mode: PlacementMode::Fixed,
            robot_fixed_position: Some(Pos::new(1, 1, 1)),
            num_monsters: 1,
            monster_position_mode: PlacementMode::Fixed,
            monster_fixed_position: Some(Pos::new(3, 3, 3)),
            monster_frequency: 3,
            monster_probability: 0.0,
            simulation_steps: 100,
            ..base_config()
        };
        let rules = RuleBook::new(
            vec![robot_rule(RobotPerception::default(), idle())],
            vec![MonsterRule {
                sensors: MonsterPerception::default(),
                action: MonsterAction::MoveRandomAmong(mkr_core::SixDir::ALL.to_vec()),
            }],
        );
        let mut sim = SimBuilder::new(config, rules)
            .world(World::with_size(6))
            .build()
            .unwrap();
        let mut recorder = Recorder::default();
        let report = sim.run(&mut recorder);

        assert_eq!(report.steps_executed, 100);
        assert_eq!(recorder.steps.len(), 100);
        assert!(recorder.steps[..99].iter().all(|s| s.outcome.is_none()));
        assert_eq!(recorder.steps[99].outcome, Some(Outcome::StepCapReached));
        assert_eq!(sim.monsters[0].position, Pos::new(3, 3, 3));
        assert_eq!(recorder.monster_ops.len(), 100);
        assert!(recorder.monster_ops.iter().all(|op| op.action == MonsterAction::Wait));
        // Cooldown countdown pattern: 2, 1, then a reset back to K.
        assert_eq!(recorder.monster_ops[0].steps_remaining, 2);
        assert_eq!(recorder.monster_ops[1].steps_remaining, 1);
        assert_eq!(recorder.monster_ops[2].steps_remaining, 3);
    }

    #[test]
    fn wait_ratio_respects_k_and_p() {
        let config = SimConfig {
            num_robots: 1,
            robot_position_mode: PlacementMode::Fixed,
            robot_fixed_position: Some(Pos::new(1, 1, 1)),
            num_monsters: 1,
            monster_position_mode: PlacementMode::Fixed,
            monster_fixed_position: Some(Pos::new(3, 3, 3)),
            monster_frequency: 4,
            monster_probability: 0.5,
            simulation_steps: 400,
            random_seed: 7,
            ..base_config()
        };
        let rules = RuleBook::new(
            vec![robot_rule(RobotPerception::default(), idle())],
            vec![MonsterRule {
                sensors: MonsterPerception::default(),
                action: MonsterAction::Wait,
            }],
        );
        let mut sim = SimBuilder::new(config, rules)
            .world(World::with_size(6))
            .build()
            .unwrap();
        let mut recorder = Recorder::default();
        sim.run(&mut recorder);

        // At most one in K steps can be an acted (non-gated) step at all:
        // rule-sourced rows are the only ones with rule_num > 0.
        let acted = recorder.monster_ops.iter().filter(|op| op.rule_num > 0).count();
        assert!(acted <= 100, "acted {acted} of 400 with K=4");
        assert!(acted > 10, "p=0.5 should fire sometimes, acted {acted}");
    }
}

// ── Memory replay and empty-override ──────────────────────────────────────────

#[cfg(test)]
mod memory_tests {
    use super::*;

    /// Rules: clear view → advance (rule 1); armed vacuscope → idle (rule 2).
    fn replay_sim() -> (crate::Sim, Recorder) {
        let config = SimConfig {
            num_robots: 1,
            robot_position_mode: PlacementMode::Fixed,
            robot_fixed_position: Some(Pos::new(2, 2, 2)),
            num_monsters: 1,
            monster_position_mode: PlacementMode::Fixed,
            monster_fixed_position: Some(Pos::new(3, 3, 1)),
            monster_frequency: 5,
            simulation_steps: 4,
            world_size: 5,
            ..base_config()
        };
        let rules = RuleBook::new(
            vec![
                robot_rule(RobotPerception::default(), RobotAction::advance()),
                robot_rule(
                    RobotPerception { vacuscope_front: -1, ..Default::default() },
                    idle(),
                ),
            ],
            vec![],
        );
        let mut sim = SimBuilder::new(config, rules)
            .world(World::with_size(5))
            .build()
            .unwrap();
        let mut recorder = Recorder::default();
        sim.run(&mut recorder);
        (sim, recorder)
    }

    #[test]
    fn recurring_perception_replays_from_memory() {
        let (_, recorder) = replay_sim();
        let first = &recorder.robot_ops[0];
        assert!(first.uses_rule);
        assert_eq!(first.rule_num, 1);

        // Same clear view next step: memory wins, rule column reads 0.
        let second = &recorder.robot_ops[1];
        assert!(second.uses_memory && !second.uses_rule);
        assert_eq!(second.rule_num, 0);
        assert_eq!(second.memory_action, Some(RobotAction::advance()));
    }

    #[test]
    fn armed_vacuscope_forces_rule_lookup() {
        let (_, recorder) = replay_sim();
        // Step 2's replayed advance hits the boundary (world 5: last free z
        // is 3), arming the vacuscope for step 3.
        let third = &recorder.robot_ops[2];
        assert_eq!(third.perception.vacuscope_front, -1);
        assert!(third.uses_rule && !third.uses_memory);
        assert_eq!(third.rule_num, 2);
        assert_eq!(third.action.kind, RobotActionKind::Idle);
    }

    #[test]
    fn vacuscope_clears_after_one_cycle() {
        let (_, recorder) = replay_sim();
        // Step 3 idled (no new block), so step 4 reads a clear vacuscope.
        assert_eq!(recorder.robot_ops[3].perception.vacuscope_front, 0);
    }

    #[test]
    fn memory_stays_bounded() {
        let (sim, _) = replay_sim();
        assert!(sim.robots[0].memory.len() <= 100);
        assert_eq!(sim.robots[0].memory.len(), 4);
    }
}

// ── Whole-run invariants and determinism ──────────────────────────────────────

#[cfg(test)]
mod invariant_tests {
    use super::*;

    fn random_config(seed: u64) -> SimConfig {
        SimConfig {
            world_size: 8,
            percentage_empty: 0.4,
            internal_empty_ratio: 0.5,
            num_robots: 4,
            num_monsters: 5,
            monster_frequency: 2,
            monster_probability: 0.8,
            simulation_steps: 60,
            random_seed: seed,
            ..base_config()
        }
    }

    fn busy_book() -> RuleBook {
        RuleBook::new(
            vec![
                robot_rule(
                    RobotPerception { energometer: 1, ..Default::default() },
                    destroy(),
                ),
                robot_rule(
                    RobotPerception { vacuscope_front: -1, ..Default::default() },
                    RobotAction { kind: RobotActionKind::Memory, directions: vec![] },
                ),
                robot_rule(
                    RobotPerception::default(),
                    RobotAction {
                        kind: RobotActionKind::MoveRandom,
                        directions: vec![
                            MoveToken::ZPlus90,
                            MoveToken::ZPlus90,
                            MoveToken::YPlus90,
                            MoveToken::YMinus90,
                        ],
                    },
                ),
            ],
            vec![MonsterRule {
                sensors: MonsterPerception::default(),
                action: MonsterAction::MoveRandomAmong(mkr_core::SixDir::ALL.to_vec()),
            }],
        )
    }

    #[test]
    fn live_agents_stay_on_unique_free_cells() {
        let mut sim = SimBuilder::new(random_config(21), busy_book()).build().unwrap();

        loop {
            let report = sim.step_once(&mut NoopObserver);

            let mut robot_cells: Vec<Pos> =
                sim.robots.iter().filter(|r| r.alive).map(|r| r.position).collect();
            for &cell in &robot_cells {
                assert!(sim.world.is_free(cell), "live robot on non-free cell {cell}");
            }
            robot_cells.sort_unstable();
            robot_cells.dedup();
            assert_eq!(
                robot_cells.len(),
                sim.robots_alive(),
                "two live robots share a cell after the sweep"
            );

            let mut monster_cells: Vec<Pos> =
                sim.monsters.iter().filter(|m| m.alive).map(|m| m.position).collect();
            for &cell in &monster_cells {
                assert!(sim.world.is_free(cell), "live monster on non-free cell {cell}");
            }
            monster_cells.sort_unstable();
            monster_cells.dedup();
            assert_eq!(monster_cells.len(), sim.monsters_alive());

            if report.outcome.is_some() {
                break;
            }
        }
    }

    #[test]
    fn destroyed_monster_cells_stay_empty() {
        let mut sim = SimBuilder::new(random_config(33), busy_book()).build().unwrap();
        let mut recorder = Recorder::default();
        sim.run(&mut recorder);

        for op in recorder.monster_ops.iter().filter(|op| op.death_by_robot) {
            assert!(sim.world.is_empty(op.pos), "destroy site {} reverted", op.pos);
        }
    }

    #[test]
    fn same_seed_same_run() {
        let run = |seed| {
            let mut sim = SimBuilder::new(random_config(seed), busy_book()).build().unwrap();
            let mut recorder = Recorder::default();
            let report = sim.run(&mut recorder);
            (format!("{:?}", recorder.robot_ops), format!("{:?}", recorder.monster_ops), report)
        };

        let (robots_a, monsters_a, report_a) = run(42);
        let (robots_b, monsters_b, report_b) = run(42);
        assert_eq!(robots_a, robots_b);
        assert_eq!(monsters_a, monsters_b);
        assert_eq!(report_a.steps_executed, report_b.steps_executed);
        assert_eq!(report_a.outcome, report_b.outcome);
    }

    #[test]
    fn different_seeds_diverge() {
        let run = |seed| {
            let mut sim = SimBuilder::new(random_config(seed), busy_book()).build().unwrap();
            let mut recorder = Recorder::default();
            sim.run(&mut recorder);
            format!("{:?}{:?}", recorder.robot_ops, recorder.monster_ops)
        };
        assert_ne!(run(1), run(2));
    }
}
