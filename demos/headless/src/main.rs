//! headless — end-to-end runner for the rust_mkr simulation.
//!
//! Runs a full robots-vs-monsters simulation with no visual layer: config
//! in, rule tables in, per-agent CSV logs and a JSON summary out.
//!
//! ```text
//! headless [config.json] [robot_rules.csv] [monster_rules.csv]
//! ```
//!
//! All three arguments are optional; missing ones fall back to the built-in
//! defaults below.  Set `RUST_LOG=debug` for per-step detail.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use mkr_core::SimConfig;
use mkr_output::RunLogger;
use mkr_rules::{load_monster_rules_reader, load_robot_rules_reader, RuleBook};
use mkr_sim::SimBuilder;

// ── Built-in rule tables ──────────────────────────────────────────────────────

// A compact hunting policy: destroy on contact, steer toward any sensed
// monster, honor the vacuscope, and otherwise wander forward-biased.
const DEFAULT_ROBOT_RULES: &str = "\
Energometro,Lado1_Top,Lado2_Left,Vacuoscopio_Front,Lado0_Front,Roboscanner_Front,Lado3_Right,Lado4_Down,Regla,Accion\n\
1,0,0,0,0,0,0,0,1,\"{\"\"tipo\"\": \"\"destroy\"\"}\"\n\
0,0,0,0,1,0,0,0,2,\"{\"\"tipo\"\": \"\"move\"\", \"\"directions\"\": [\"\"z+90\"\"]}\"\n\
0,1,0,0,0,0,0,0,3,\"{\"\"tipo\"\": \"\"move\"\", \"\"directions\"\": [\"\"x+90\"\"]}\"\n\
0,0,1,0,0,0,0,0,4,\"{\"\"tipo\"\": \"\"move\"\", \"\"directions\"\": [\"\"y+90\"\"]}\"\n\
0,0,0,0,0,0,1,0,5,\"{\"\"tipo\"\": \"\"move\"\", \"\"directions\"\": [\"\"y-90\"\"]}\"\n\
0,0,0,0,0,0,0,1,6,\"{\"\"tipo\"\": \"\"move\"\", \"\"directions\"\": [\"\"x-90\"\"]}\"\n\
0,0,0,-1,0,0,0,0,7,\"{\"\"tipo\"\": \"\"memory\"\"}\"\n\
0,0,0,0,0,2,0,0,8,\"{\"\"tipo\"\": \"\"idle\"\"}\"\n\
0,0,0,0,0,0,0,0,9,\"{\"\"tipo\"\": \"\"move_random\"\", \"\"directions\"\": [\"\"z+90\"\", \"\"z+90\"\", \"\"y+90\"\", \"\"y-90\"\"]}\"\n\
";

// Monsters drift away from whatever blocks them and freeze when boxed in.
const DEFAULT_MONSTER_RULES: &str = "\
Top,Left,Front,Right,Down,Behind,Regla,Accion\n\
0,0,0,0,0,0,1,\"Mover aleatorio entre [Top, Left, Front, Right, Down, Behind]\"\n\
-1,0,0,0,0,0,2,\"Mover aleatorio entre [Left, Front, Right, Down, Behind]\"\n\
0,-1,0,0,0,0,3,\"Mover aleatorio entre [Top, Front, Right, Down, Behind]\"\n\
0,0,-1,0,0,0,4,\"Mover aleatorio entre [Top, Left, Right, Down, Behind]\"\n\
0,0,0,-1,0,0,5,\"Mover aleatorio entre [Top, Left, Front, Down, Behind]\"\n\
0,0,0,0,-1,0,6,\"Mover aleatorio entre [Top, Left, Front, Right, Behind]\"\n\
0,0,0,0,0,-1,7,\"Mover aleatorio entre [Top, Left, Front, Right, Down]\"\n\
-1,-1,-1,-1,-1,-1,8,wait\n\
";

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = std::env::args().collect();

    // 1. Configuration.
    let config = match args.get(1) {
        Some(path) => SimConfig::from_json_path(Path::new(path))
            .with_context(|| format!("loading config {path}"))?,
        None => SimConfig::default(),
    };

    // 2. Rule tables (files when given, embedded defaults otherwise).
    let robot_rules = match args.get(2) {
        Some(path) => mkr_rules::load_robot_rules_csv(Path::new(path))
            .with_context(|| format!("loading robot rules {path}"))?,
        None => load_robot_rules_reader(Cursor::new(DEFAULT_ROBOT_RULES))?,
    };
    let monster_rules = match args.get(3) {
        Some(path) => mkr_rules::load_monster_rules_csv(Path::new(path))
            .with_context(|| format!("loading monster rules {path}"))?,
        None => load_monster_rules_reader(Cursor::new(DEFAULT_MONSTER_RULES))?,
    };
    let rules = RuleBook::new(robot_rules, monster_rules);

    println!("=== rust_mkr — monster-killer robots vs monsters ===");
    println!(
        "World: {n}³  |  Robots: {r}  |  Monsters: {m} (K={k}, p={p})  |  Seed: {s}",
        n = config.world_size,
        r = config.num_robots,
        m = config.num_monsters,
        k = config.monster_frequency,
        p = config.monster_probability,
        s = config.random_seed,
    );
    println!(
        "Rules: {} robot rows, {} monster rows  |  Step cap: {}",
        rules.robot_rule_count(),
        rules.monster_rule_count(),
        config.simulation_steps,
    );
    println!();

    // 3. Build and run with the operation logger attached.
    let mut sim = SimBuilder::new(config, rules).build()?;
    let mut logger = RunLogger::new(Path::new("output"));

    let t0 = Instant::now();
    let report = sim.run(&mut logger);
    let elapsed = t0.elapsed();

    // 4. Flush per-agent logs and the summary.
    let out_dir = logger.finalize(&sim, &report).context("finalizing run output")?;

    // 5. Final status table.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!(
        "  steps executed : {}  ({:?})",
        report.steps_executed, report.outcome
    );
    println!(
        "  robots alive   : {} / {}",
        report.robots_alive,
        sim.robots.len()
    );
    println!(
        "  monsters alive : {} / {}",
        report.monsters_alive,
        sim.monsters.len()
    );
    println!("  monsters destroyed : {}", report.monsters_destroyed);
    println!("  output         : {}", out_dir.display());
    println!();

    println!("{:<8} {:<7} {:<10} {:<12} {:<10} {:<10}", "Robot", "Alive", "Pos", "Heading", "Destroyed", "Collisions");
    println!("{}", "-".repeat(62));
    for robot in &sim.robots {
        println!(
            "{:<8} {:<7} {:<10} {:<12} {:<10} {:<10}",
            format!("R{:03}", robot.id.0),
            if robot.alive { "yes" } else { "no" },
            robot.position.to_string(),
            robot.orientation.to_string(),
            robot.monsters_destroyed,
            robot.robots_collided,
        );
    }
    println!();

    println!("{:<8} {:<7} {:<10} {:<6} {:<6}", "Monster", "Alive", "Pos", "K", "p");
    println!("{}", "-".repeat(40));
    for monster in &sim.monsters {
        println!(
            "{:<8} {:<7} {:<10} {:<6} {:<6}",
            format!("M{:03}", monster.id.0),
            if monster.alive { "yes" } else { "no" },
            monster.position.to_string(),
            monster.k,
            monster.p,
        );
    }

    Ok(())
}
