//! The final statistics file (`estadisticas_finales.json`).
//!
//! Keys are Spanish: the file is the wire format of the system these runs
//! are compared against, and downstream tooling keys on the original names.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::Serialize;

use mkr_sim::{MonsterOp, RobotOp, RunReport, Sim};
use mkr_rules::MonsterAction;

// ── Serialized shape ──────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct FinalStats {
    pub simulacion: SimulationBlock,
    pub resultados: ResultsBlock,
    pub estadisticas_robots: BTreeMap<String, RobotStats>,
    pub estadisticas_monstruos: BTreeMap<String, MonsterStats>,
    pub estadisticas_entorno: EnvironmentBlock,
}

#[derive(Serialize, Debug)]
pub struct SimulationBlock {
    pub id: String,
    pub fecha_inicio: String,
    pub fecha_fin: String,
    pub duracion_segundos: f64,
    pub pasos_ejecutados: u64,
    pub configuracion: ConfigEcho,
}

#[derive(Serialize, Debug)]
pub struct ConfigEcho {
    #[serde(rename = "tamaño_mundo")]
    pub world_size: i32,
    pub num_robots: u32,
    pub num_monstruos: u32,
    pub pasos_simulacion: u64,
    pub frecuencia_monstruo: u32,
    pub probabilidad_monstruo: f64,
    pub limite_memoria_robot: usize,
    pub semilla_aleatoria: u64,
}

#[derive(Serialize, Debug)]
pub struct ResultsBlock {
    pub robots_vivos: usize,
    pub robots_muertos: usize,
    pub monstruos_vivos: usize,
    /// Dead monsters, all causes.
    pub monstruos_eliminados: usize,
    /// Robots lost to robot-robot collisions (destroy sacrifices excluded).
    pub robots_eliminados: usize,
}

#[derive(Serialize, Debug)]
pub struct UsageBlock {
    pub veces_usado: usize,
    pub porcentaje: f64,
}

#[derive(Serialize, Debug)]
pub struct RuleUsage {
    pub regla: u32,
    pub veces: usize,
}

#[derive(Serialize, Debug)]
pub struct RobotStats {
    pub total_operaciones: usize,
    pub uso_memoria: UsageBlock,
    pub uso_reglas: UsageBlock,
    pub reglas_mas_usadas: Vec<RuleUsage>,
    pub posicion_final: [i32; 3],
    pub orientacion_final: [i32; 3],
}

#[derive(Serialize, Debug)]
pub struct MonsterStats {
    pub total_operaciones: usize,
    pub acciones_espera: UsageBlock,
    pub acciones_movimiento: UsageBlock,
    pub reglas_mas_usadas: Vec<RuleUsage>,
    pub posicion_final: [i32; 3],
    pub alive: bool,
    pub parametros: MonsterParams,
}

#[derive(Serialize, Debug)]
pub struct MonsterParams {
    #[serde(rename = "K")]
    pub k: u32,
    pub p: f64,
}

#[derive(Serialize, Debug)]
pub struct EnvironmentBlock {
    pub zonas_libres: usize,
    pub zonas_vacias_internas: usize,
    pub zonas_borde: usize,
}

// ── Assembly ──────────────────────────────────────────────────────────────────

/// Assemble the summary from buffered op streams and the finished sim.
pub fn build(
    sim: &Sim,
    report: &RunReport,
    robot_ops: &BTreeMap<u32, Vec<RobotOp>>,
    monster_ops: &BTreeMap<u32, Vec<MonsterOp>>,
    simulation_id: &str,
    started_at: DateTime<Local>,
    finished_at: DateTime<Local>,
) -> FinalStats {
    let robots_dead = sim.robots.iter().filter(|r| !r.alive).count();
    let sacrifices = sim
        .robots
        .iter()
        .filter(|r| !r.alive && r.monsters_destroyed > 0)
        .count();
    let census = sim.world.census();

    FinalStats {
        simulacion: SimulationBlock {
            id: simulation_id.to_owned(),
            fecha_inicio: started_at.to_rfc3339(),
            fecha_fin: finished_at.to_rfc3339(),
            duracion_segundos: (finished_at - started_at).num_milliseconds() as f64 / 1000.0,
            pasos_ejecutados: report.steps_executed,
            configuracion: ConfigEcho {
                world_size: sim.config.world_size,
                num_robots: sim.config.num_robots,
                num_monstruos: sim.config.num_monsters,
                pasos_simulacion: sim.config.simulation_steps,
                frecuencia_monstruo: sim.config.monster_frequency,
                probabilidad_monstruo: sim.config.monster_probability,
                limite_memoria_robot: sim.config.robot_memory_limit,
                semilla_aleatoria: sim.config.random_seed,
            },
        },
        resultados: ResultsBlock {
            robots_vivos: report.robots_alive,
            robots_muertos: robots_dead,
            monstruos_vivos: report.monsters_alive,
            monstruos_eliminados: sim.monsters.iter().filter(|m| !m.alive).count(),
            robots_eliminados: robots_dead - sacrifices,
        },
        estadisticas_robots: robot_ops
            .iter()
            .filter_map(|(&id, ops)| {
                let last = ops.last()?;
                Some((format!("robot_{id:03}"), robot_stats(ops, last)))
            })
            .collect(),
        estadisticas_monstruos: monster_ops
            .iter()
            .filter_map(|(&id, ops)| {
                let last = ops.last()?;
                Some((format!("monster_{id:03}"), monster_stats(sim, id, ops, last)))
            })
            .collect(),
        estadisticas_entorno: EnvironmentBlock {
            zonas_libres: census.free,
            zonas_vacias_internas: census.interior_empty,
            zonas_borde: census.boundary,
        },
    }
}

fn robot_stats(ops: &[RobotOp], last: &RobotOp) -> RobotStats {
    let total = ops.len();
    let memory_uses = ops.iter().filter(|op| op.uses_memory).count();
    let rule_uses = ops.iter().filter(|op| op.uses_rule).count();

    RobotStats {
        total_operaciones: total,
        uso_memoria: usage(memory_uses, total),
        uso_reglas: usage(rule_uses, total),
        reglas_mas_usadas: top_rules(ops.iter().map(|op| op.rule_num)),
        posicion_final: last.pos_after.triple(),
        orientacion_final: last.orientation_after.triple(),
    }
}

fn monster_stats(sim: &Sim, id: u32, ops: &[MonsterOp], last: &MonsterOp) -> MonsterStats {
    let total = ops.len();
    let waits = ops
        .iter()
        .filter(|op| !op.death_by_robot && op.action == MonsterAction::Wait)
        .count();
    let moves = ops
        .iter()
        .filter(|op| !op.death_by_robot && op.action != MonsterAction::Wait)
        .count();

    let entity = sim.monsters.iter().find(|m| m.id.0 == id);

    MonsterStats {
        total_operaciones: total,
        acciones_espera: usage(waits, total),
        acciones_movimiento: usage(moves, total),
        reglas_mas_usadas: top_rules(ops.iter().map(|op| op.rule_num)),
        posicion_final: last.pos_after.triple(),
        alive: entity.map(|m| m.alive).unwrap_or(last.alive),
        parametros: MonsterParams {
            k: entity.map(|m| m.k).unwrap_or(last.k),
            p: entity.map(|m| m.p).unwrap_or(last.p),
        },
    }
}

fn usage(count: usize, total: usize) -> UsageBlock {
    let pct = if total == 0 { 0.0 } else { count as f64 * 100.0 / total as f64 };
    UsageBlock { veces_usado: count, porcentaje: (pct * 100.0).round() / 100.0 }
}

/// Top-5 matched rules, most used first (ties broken by rule number so the
/// output is stable).  Rule 0 rows (memory, defaults, waits) don't count.
fn top_rules(rule_nums: impl Iterator<Item = u32>) -> Vec<RuleUsage> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for rule in rule_nums.filter(|&r| r > 0) {
        *counts.entry(rule).or_default() += 1;
    }
    let mut usages: Vec<RuleUsage> =
        counts.into_iter().map(|(regla, veces)| RuleUsage { regla, veces }).collect();
    usages.sort_by(|a, b| b.veces.cmp(&a.veces).then(a.regla.cmp(&b.regla)));
    usages.truncate(5);
    usages
}
