//! `mkr-core` — foundational types for the `rust_mkr` simulation.
//!
//! This crate is a dependency of every other `mkr-*` crate.  It intentionally
//! has no `mkr-*` dependencies and minimal external ones (only `rand`,
//! `thiserror`, and `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                             |
//! |------------|------------------------------------------------------|
//! | [`ids`]    | `RobotId`, `MonsterId`                               |
//! | [`grid`]   | `Pos`, `Heading`, `SixDir` lattice primitives        |
//! | [`rng`]    | `SimRng` — the single deterministic RNG stream       |
//! | [`config`] | `SimConfig`, `PlacementMode`                         |
//! | [`error`]  | `CoreError`, `CoreResult`                            |

pub mod config;
pub mod error;
pub mod grid;
pub mod ids;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{PlacementMode, SimConfig};
pub use error::{CoreError, CoreResult};
pub use grid::{Heading, Pos, SixDir};
pub use ids::{MonsterId, RobotId};
pub use rng::SimRng;
