//! Fluent builder for constructing a [`Sim`].

use tracing::info;

use mkr_agent::{Monster, Robot};
use mkr_core::{MonsterId, PlacementMode, Pos, RobotId, SimConfig, SimRng};
use mkr_rules::RuleBook;
use mkr_world::World;

use crate::error::{SimError, SimResult};
use crate::sim::Sim;

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — world size, populations, gating, seed, …
/// - [`RuleBook`] — both tables, already loaded (a missing or malformed
///   table never reaches this point)
///
/// # Optional inputs
///
/// | Method       | Default                                          |
/// |--------------|--------------------------------------------------|
/// | `.world(w)`  | Generated from the config via the seeded RNG     |
///
/// # Example
///
/// ```rust,ignore
/// let rules = RuleBook::load(robot_csv, monster_csv)?;
/// let mut sim = SimBuilder::new(config, rules).build()?;
/// let report = sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder {
    config: SimConfig,
    rules: RuleBook,
    world: Option<World>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, rules: RuleBook) -> SimBuilder {
        SimBuilder { config, rules, world: None }
    }

    /// Inject a pre-built world instead of generating one (tests use this to
    /// pin exact cell layouts).  Random placement still draws from the
    /// seeded RNG stream.
    pub fn world(mut self, world: World) -> SimBuilder {
        self.world = Some(world);
        self
    }

    /// Validate the configuration, build (or adopt) the world, place both
    /// populations, and return a ready-to-run [`Sim`].
    ///
    /// Everything fatal fails here, before any step executes.
    pub fn build(self) -> SimResult<Sim> {
        let config = self.config;
        config.validate().map_err(|e| SimError::Config(e.to_string()))?;

        let mut rng = SimRng::new(config.random_seed);

        let mut world = match self.world {
            Some(world) => world,
            None => World::generate(
                config.world_size,
                config.percentage_empty,
                config.internal_empty_ratio,
                &mut rng,
            ),
        };

        // ── Place robots (ids 1..=num_robots, ascending act order) ────────
        let mut robots = Vec::with_capacity(config.num_robots as usize);
        for i in 1..=config.num_robots {
            let pos = Self::place(
                &world,
                &mut rng,
                config.robot_position_mode,
                config.robot_fixed_position,
                "robot",
            )?;
            let robot = Robot::new(RobotId(i), pos, config.robot_memory_limit);
            world.register_robot(robot.id, pos);
            robots.push(robot);
        }

        // ── Place monsters ────────────────────────────────────────────────
        let mut monsters = Vec::with_capacity(config.num_monsters as usize);
        for i in 1..=config.num_monsters {
            let pos = Self::place(
                &world,
                &mut rng,
                config.monster_position_mode,
                config.monster_fixed_position,
                "monster",
            )?;
            let monster = Monster::new(
                MonsterId(i),
                pos,
                config.monster_frequency,
                config.monster_probability,
            );
            world.register_monster(monster.id, pos);
            monsters.push(monster);
        }

        info!(
            robots = robots.len(),
            monsters = monsters.len(),
            world = config.world_size,
            seed = config.random_seed,
            "simulation built"
        );
        Ok(Sim::new(config, world, self.rules, robots, monsters, rng))
    }

    /// One initial position.  Duplicate spawns are fine (the first collision
    /// sweep arbitrates); a fixed position on a non-free cell is not.
    fn place(
        world: &World,
        rng: &mut SimRng,
        mode: PlacementMode,
        fixed: Option<Pos>,
        kind: &'static str,
    ) -> SimResult<Pos> {
        match mode {
            PlacementMode::Fixed => {
                let pos = fixed.ok_or_else(|| {
                    SimError::Config(format!("{kind} fixed placement without a position"))
                })?;
                if !world.is_free(pos) {
                    return Err(SimError::Config(format!(
                        "{kind} fixed position {pos} is not a free cell"
                    )));
                }
                Ok(pos)
            }
            PlacementMode::Random => world
                .random_internal_free_cell(rng)
                .ok_or(SimError::NoFreeCells),
        }
    }
}
