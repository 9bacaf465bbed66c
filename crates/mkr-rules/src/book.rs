//! The immutable rule book and its first-match lookup.

use std::path::Path;

use tracing::debug;

use crate::action::{MonsterAction, RobotAction};
use crate::error::RuleResult;
use crate::loader;
use crate::perception::{MonsterPerception, RobotPerception};

// ── Rule rows ─────────────────────────────────────────────────────────────────

/// One robot rule: the sensor vector to match and the action to take.
#[derive(Clone, Debug)]
pub struct RobotRule {
    pub sensors: RobotPerception,
    pub action: RobotAction,
}

/// One monster rule.
#[derive(Clone, Debug)]
pub struct MonsterRule {
    pub sensors: MonsterPerception,
    pub action: MonsterAction,
}

// ── RuleBook ──────────────────────────────────────────────────────────────────

/// Both rule tables, loaded once at startup and immutable afterwards.
pub struct RuleBook {
    robot_rules: Vec<RobotRule>,
    monster_rules: Vec<MonsterRule>,
}

impl RuleBook {
    pub fn new(robot_rules: Vec<RobotRule>, monster_rules: Vec<MonsterRule>) -> RuleBook {
        RuleBook { robot_rules, monster_rules }
    }

    /// Load both tables from CSV files.  Missing files or malformed column
    /// sets are fatal (no step may execute without a complete book).
    pub fn load(robot_path: &Path, monster_path: &Path) -> RuleResult<RuleBook> {
        let robot_rules = loader::load_robot_rules_csv(robot_path)?;
        let monster_rules = loader::load_monster_rules_csv(monster_path)?;
        debug!(
            robot_rules = robot_rules.len(),
            monster_rules = monster_rules.len(),
            "rule book loaded"
        );
        Ok(RuleBook::new(robot_rules, monster_rules))
    }

    pub fn robot_rule_count(&self) -> usize {
        self.robot_rules.len()
    }

    pub fn monster_rule_count(&self) -> usize {
        self.monster_rules.len()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// First matching robot rule for `p`: `(1-based rule number, action)`.
    /// No match: `(0, move [z+90])`.
    pub fn robot_lookup(&self, p: &RobotPerception) -> (u32, RobotAction) {
        for (i, rule) in self.robot_rules.iter().enumerate() {
            if robot_row_matches(rule, p) {
                return (i as u32 + 1, rule.action.clone());
            }
        }
        (0, RobotAction::advance())
    }

    /// First matching monster rule for `p`: `(1-based rule number, action)`.
    /// No match: `(0, wait)`.
    pub fn monster_lookup(&self, p: &MonsterPerception) -> (u32, MonsterAction) {
        for (i, rule) in self.monster_rules.iter().enumerate() {
            if rule.sensors == *p {
                return (i as u32 + 1, rule.action.clone());
            }
        }
        (0, MonsterAction::Wait)
    }
}

/// Per-row match test.
///
/// The Energometer short-circuit is evaluated here, per row and per lookup:
/// a row whose `Energometro` is 1 matches iff the perception's `Energometro`
/// is 1, regardless of every other sensor.  All other rows require exact
/// equality on the full eight-sensor vector.
fn robot_row_matches(rule: &RobotRule, p: &RobotPerception) -> bool {
    if rule.sensors.energometer == 1 {
        p.energometer == 1
    } else {
        rule.sensors.matches(p)
    }
}
