//! Simulation observer trait for progress reporting and log collection.

use crate::record::{MonsterOp, RobotOp};
use crate::sim::{RunReport, StepReport};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] and
/// [`Sim::step_once`][crate::Sim::step_once] at key points in the step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  The operation logger in `mkr-output`
/// is the main implementor; a dashboard wrapper would be another.
pub trait SimObserver {
    /// Called at the very start of each step, before any agent acts.
    fn on_step_start(&mut self, _step: u64) {}

    /// Called once per robot act, after the act has been applied.
    fn on_robot_op(&mut self, _op: &RobotOp) {}

    /// Called once per monster act, and once more (with `death_by_robot`)
    /// when a robot destroys a monster.
    fn on_monster_op(&mut self, _op: &MonsterOp) {}

    /// Called at the end of each step, after both collision sweeps.
    fn on_step_end(&mut self, _report: &StepReport) {}

    /// Called once when [`Sim::run`][crate::Sim::run] finishes.
    fn on_sim_end(&mut self, _report: &RunReport) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
