//! `mkr-output` — operation logs and the end-of-run summary.
//!
//! The [`RunLogger`] implements `mkr_sim::SimObserver`: during the run it
//! only buffers op records in memory.  Finalization then writes, under
//! `output/<simulation id>/`:
//!
//! | File                        | Contents                                  |
//! |-----------------------------|-------------------------------------------|
//! | `R<id>.csv` (one per robot) | one row per act: sensors, rule, actions   |
//! | `M<id>.csv` (one per monster) | one row per act incl. waits and death   |
//! | `estadisticas_finales.json` | run metadata, results, per-agent aggregates |
//!
//! A write error on one agent's file is reported and finalization continues
//! with the remaining agents; the first error is returned at the end.  There
//! is no retry.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut logger = RunLogger::new(Path::new("output"));
//! let report = sim.run(&mut logger);
//! let dir = logger.finalize(&sim, &report)?;
//! ```

pub mod csv;
pub mod error;
pub mod logger;
pub mod summary;


pub use error::{OutputError, OutputResult};
pub use logger::RunLogger;
pub use summary::FinalStats;
