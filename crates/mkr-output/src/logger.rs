//! `RunLogger` — buffers op records during the run, writes everything at
//! finalization.
//!
//! Buffer-then-flush (rather than streaming rows as they happen) keeps the
//! step loop free of I/O: the logger's observer callbacks only clone small
//! records, and a slow disk cannot distort a timed run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{error, info};

use mkr_sim::{MonsterOp, RobotOp, RunReport, Sim, SimObserver};

use crate::csv::{write_monster_csv, write_robot_csv};
use crate::error::{OutputError, OutputResult};
use crate::summary;

/// Collects per-agent operation streams and flushes them as CSV files plus
/// a JSON summary under `base/<simulation id>/`.
pub struct RunLogger {
    simulation_id: String,
    output_dir: PathBuf,
    started_at: DateTime<Local>,
    robot_ops: BTreeMap<u32, Vec<RobotOp>>,
    monster_ops: BTreeMap<u32, Vec<MonsterOp>>,
}

impl RunLogger {
    /// A logger with a wall-clock simulation id (`simulacion_<DDMMYYYY_HHMMSS>`).
    pub fn new(base: &Path) -> RunLogger {
        let started_at = Local::now();
        let simulation_id = format!("simulacion_{}", started_at.format("%d%m%Y_%H%M%S"));
        RunLogger::with_parts(base, simulation_id, started_at)
    }

    /// A logger with an explicit id, for reproducible output paths (tests,
    /// replayed runs).
    pub fn with_simulation_id(base: &Path, simulation_id: impl Into<String>) -> RunLogger {
        RunLogger::with_parts(base, simulation_id.into(), Local::now())
    }

    fn with_parts(base: &Path, simulation_id: String, started_at: DateTime<Local>) -> RunLogger {
        let output_dir = base.join(&simulation_id);
        RunLogger {
            simulation_id,
            output_dir,
            started_at,
            robot_ops: BTreeMap::new(),
            monster_ops: BTreeMap::new(),
        }
    }

    pub fn simulation_id(&self) -> &str {
        &self.simulation_id
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write all per-agent CSVs and the JSON summary; returns the output
    /// directory.
    ///
    /// Creating the directory is fatal.  After that, an error on one file is
    /// logged and the remaining files are still written; the first error is
    /// returned once everything has been attempted.  Agents that never acted
    /// get no file, matching the buffered-rows contract.
    pub fn finalize(&self, sim: &Sim, report: &RunReport) -> OutputResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let mut first_error: Option<OutputError> = None;

        for (&id, ops) in &self.robot_ops {
            if ops.is_empty() {
                continue;
            }
            let path = self.output_dir.join(format!("R{id:03}.csv"));
            if let Err(err) = write_robot_csv(&path, ops) {
                error!(robot = id, %err, "robot log write failed, continuing");
                first_error.get_or_insert(err);
            }
        }

        for (&id, ops) in &self.monster_ops {
            if ops.is_empty() {
                continue;
            }
            let path = self.output_dir.join(format!("M{id:03}.csv"));
            if let Err(err) = write_monster_csv(&path, ops) {
                error!(monster = id, %err, "monster log write failed, continuing");
                first_error.get_or_insert(err);
            }
        }

        let stats = summary::build(
            sim,
            report,
            &self.robot_ops,
            &self.monster_ops,
            &self.simulation_id,
            self.started_at,
            Local::now(),
        );
        if let Err(err) = self.write_summary(&stats) {
            error!(%err, "summary write failed");
            first_error.get_or_insert(err);
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                info!(dir = %self.output_dir.display(), "run output finalized");
                Ok(self.output_dir.clone())
            }
        }
    }

    fn write_summary(&self, stats: &summary::FinalStats) -> OutputResult<()> {
        let file = std::fs::File::create(self.output_dir.join("estadisticas_finales.json"))?;
        serde_json::to_writer_pretty(file, stats)?;
        Ok(())
    }
}

impl SimObserver for RunLogger {
    fn on_robot_op(&mut self, op: &RobotOp) {
        self.robot_ops.entry(op.robot).or_default().push(op.clone());
    }

    fn on_monster_op(&mut self, op: &MonsterOp) {
        self.monster_ops.entry(op.monster).or_default().push(op.clone());
    }
}
