//! `mkr-agent` — the two reflex agent kinds.
//!
//! # Crate layout
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`orientation`] | Head-relative rotation table (6 headings × 4 tokens)   |
//! | [`memory`]      | `ReplayMemory` — bounded (perception, action) cache    |
//! | [`robot`]       | `Robot`: perceive → decide → execute                   |
//! | [`monster`]     | `Monster`: perceive → K/p gate → execute               |
//!
//! # Design notes
//!
//! Agents are plain data driven by the step loop: they borrow the `World`
//! for the duration of one call and hold no references between calls, so
//! there are no ownership cycles between agents and world.  All randomness
//! comes in as `&mut SimRng` from the scheduler's single stream.

pub mod memory;
pub mod monster;
pub mod orientation;
pub mod robot;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use memory::{Experience, ReplayMemory};
pub use monster::{Monster, MonsterTurn};
pub use orientation::{is_effective, rotated};
pub use robot::{Decision, DecisionSource, Robot};
