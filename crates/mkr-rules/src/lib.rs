//! `mkr-rules` — the rule engine: perception vectors in, actions out.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`perception`] | `RobotPerception` (8 sensors), `MonsterPerception` (6 dirs) |
//! | [`action`]     | `RobotAction`, `MonsterAction`, `MoveToken` + parsing      |
//! | [`loader`]     | CSV loaders for both rule tables                           |
//! | [`book`]       | `RuleBook` — first-match lookup with defaults              |
//! | [`error`]      | `RuleError`, `RuleResult<T>`                               |
//!
//! # Matching semantics
//!
//! Lookup is a linear top-to-bottom scan; the first matching row wins and is
//! reported by its 1-based row number.  A robot row with `Energometro = 1`
//! short-circuits: it matches exactly when the perception's `Energometro` is
//! 1, every other sensor ignored.  All other rows (and all monster rows)
//! require exact equality on every sensor column.  When nothing matches the
//! book answers rule 0 with the default action (`move [z+90]` for robots,
//! `wait` for monsters).
//!
//! Tables are immutable after load and lookup is pure, so the book can be
//! shared freely.

pub mod action;
pub mod book;
pub mod error;
pub mod loader;
pub mod perception;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use action::{MonsterAction, MoveToken, RobotAction, RobotActionKind};
pub use book::{MonsterRule, RobotRule, RuleBook};
pub use error::{RuleError, RuleResult};
pub use loader::{
    load_monster_rules_csv, load_monster_rules_reader, load_robot_rules_csv,
    load_robot_rules_reader,
};
pub use perception::{MonsterPerception, RobotPerception};
