//! Run configuration.
//!
//! A [`SimConfig`] is read once at init — typically deserialized from a JSON
//! file by the application crate — validated, and then treated as immutable
//! for the whole run.  Unknown keys are rejected so a typo in a config file
//! fails loudly instead of silently falling back to a default.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::grid::Pos;

// ── PlacementMode ─────────────────────────────────────────────────────────────

/// How initial agent positions are chosen.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Uniform draw over interior free cells (occupancy ignored; duplicate
    /// spawns are resolved by the first collision sweep).
    Random,
    /// Every agent of the kind starts at the configured fixed position.
    Fixed,
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Lattice side length N.  The world is an N³ cube; must be ≥ 3 so at
    /// least one interior cell exists inside the always-empty boundary shell.
    pub world_size: i32,

    /// Interior empty-cell density input, in [0, 1].
    pub percentage_empty: f64,

    /// Scaling factor applied to `percentage_empty` for interior cells.
    pub internal_empty_ratio: f64,

    /// Initial robot population.
    pub num_robots: u32,

    /// Initial monster population.
    pub num_monsters: u32,

    pub robot_position_mode: PlacementMode,
    /// Required when `robot_position_mode` is `fixed`.
    pub robot_fixed_position: Option<Pos>,

    pub monster_position_mode: PlacementMode,
    /// Required when `monster_position_mode` is `fixed`.
    pub monster_fixed_position: Option<Pos>,

    /// Step cap: the run stops after this many steps unless a side goes
    /// extinct first.
    pub simulation_steps: u64,

    /// Monster eligibility period K: a monster may act at most once every K
    /// steps.  Must be ≥ 1.
    pub monster_frequency: u32,

    /// Monster move probability p on an eligible step, in [0, 1].
    pub monster_probability: f64,

    /// Robot replay-memory cap M (FIFO eviction beyond this).
    pub robot_memory_limit: usize,

    /// Master RNG seed.  The same seed always produces identical results.
    pub random_seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_size: 7,
            percentage_empty: 0.2,
            internal_empty_ratio: 0.3,
            num_robots: 2,
            num_monsters: 3,
            robot_position_mode: PlacementMode::Random,
            robot_fixed_position: None,
            monster_position_mode: PlacementMode::Random,
            monster_fixed_position: None,
            simulation_steps: 50,
            monster_frequency: 3,
            monster_probability: 0.5,
            robot_memory_limit: 1000,
            random_seed: 42,
        }
    }
}

impl SimConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_path(path: &Path) -> CoreResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(file)
    }

    /// Like [`from_json_path`](Self::from_json_path) but accepts any `Read`
    /// source (pass a `Cursor` in tests).
    pub fn from_json_reader<R: Read>(reader: R) -> CoreResult<Self> {
        let config: SimConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and cross-field requirements.
    pub fn validate(&self) -> CoreResult<()> {
        if self.world_size < 3 {
            return Err(CoreError::Config(format!(
                "world_size must be >= 3, got {}",
                self.world_size
            )));
        }
        if !(0.0..=1.0).contains(&self.percentage_empty) {
            return Err(CoreError::Config(format!(
                "percentage_empty must be in [0, 1], got {}",
                self.percentage_empty
            )));
        }
        if !(0.0..=1.0).contains(&self.internal_empty_ratio) {
            return Err(CoreError::Config(format!(
                "internal_empty_ratio must be in [0, 1], got {}",
                self.internal_empty_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.monster_probability) {
            return Err(CoreError::Config(format!(
                "monster_probability must be in [0, 1], got {}",
                self.monster_probability
            )));
        }
        if self.monster_frequency == 0 {
            return Err(CoreError::Config(
                "monster_frequency (K) must be >= 1".into(),
            ));
        }
        if self.robot_position_mode == PlacementMode::Fixed && self.robot_fixed_position.is_none() {
            return Err(CoreError::Config(
                "robot_position_mode is \"fixed\" but robot_fixed_position is missing".into(),
            ));
        }
        if self.monster_position_mode == PlacementMode::Fixed
            && self.monster_fixed_position.is_none()
        {
            return Err(CoreError::Config(
                "monster_position_mode is \"fixed\" but monster_fixed_position is missing".into(),
            ));
        }
        Ok(())
    }
}
