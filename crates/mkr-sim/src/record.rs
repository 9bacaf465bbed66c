//! Plain data records emitted once per agent act, consumed by observers.

use mkr_core::{Heading, Pos};
use mkr_rules::{MonsterAction, MonsterPerception, RobotAction, RobotPerception};

/// One robot act: pre-state, sensors, decision provenance, post-state.
///
/// Exactly one of `uses_memory`/`uses_rule` is set, except when the default
/// action was taken (both false, `rule_num` 0).
#[derive(Clone, Debug)]
pub struct RobotOp {
    pub robot: u32,
    /// 1-based step number.
    pub step: u64,
    /// Position and orientation going into the act.
    pub pos: Pos,
    pub orientation: Heading,
    pub perception: RobotPerception,
    /// Matched rule number; 0 for memory replay and the default action.
    pub rule_num: u32,
    /// The action as decided (a `move_random` keeps its surface form).
    pub action: RobotAction,
    /// The replayed action on a memory-sourced decision.
    pub memory_action: Option<RobotAction>,
    pub uses_memory: bool,
    pub uses_rule: bool,
    pub pos_after: Pos,
    pub orientation_after: Heading,
    pub alive_after: bool,
}

/// One monster act (including gated waits and the terminal death row).
#[derive(Clone, Debug)]
pub struct MonsterOp {
    pub monster: u32,
    /// 1-based step number.
    pub step: u64,
    pub pos: Pos,
    /// `None` only on the `death_by_robot` row (sensors were never read).
    pub perception: Option<MonsterPerception>,
    /// Matched rule number; 0 for waits and the default.
    pub rule_num: u32,
    pub action: MonsterAction,
    /// Set when a robot destroyed this monster; the row is terminal.
    pub death_by_robot: bool,
    /// `K − counter` after the gating update for this step.
    pub steps_remaining: u32,
    pub k: u32,
    pub p: f64,
    pub alive: bool,
    pub pos_after: Pos,
}
