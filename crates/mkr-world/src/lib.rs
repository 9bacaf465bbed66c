//! `mkr-world` — the closed cubic lattice the agents live in.
//!
//! A [`World`] owns two things:
//!
//! 1. the N³ grid of [`CellState`]s (free vs empty, with an always-empty
//!    boundary shell), and
//! 2. the id → position registries for live robots and monsters.
//!
//! Agents never hold references to each other or back-pointers from the
//! world; the registries are the only shared state, and every mutation goes
//! through `World` methods.  Queries are pure and never fail; mutations that
//! name an absent id are silent no-ops.

pub mod world;


pub use world::{CellCensus, CellState, World};
