//! Per-agent CSV writers.
//!
//! Column sets are the wire format inherited from the system these logs
//! feed; header names (and the trailing `?` flags) are load-bearing for
//! downstream consumers and must not be renamed.

use std::path::Path;

use csv::Writer;

use mkr_sim::{MonsterOp, RobotOp};

use crate::error::OutputResult;

/// Robot log columns, in file order.
pub const ROBOT_COLUMNS: [&str; 16] = [
    "#",
    "Pos",
    "Orientacion",
    "Energometro",
    "Lado1_Top",
    "Lado2_Left",
    "Vacuoscopio_Front",
    "Lado0_Front",
    "Roboscanner_Front",
    "Lado3_Right",
    "Lado4_Down",
    "Regla",
    "Nueva_Accion",
    "Accion_Memoria",
    "Usa_Memoria?",
    "Usa_Regla?",
];

/// Monster log columns, in file order.
pub const MONSTER_COLUMNS: [&str; 15] = [
    "#",
    "Pos",
    "Top",
    "Left",
    "Front",
    "Right",
    "Down",
    "Behind",
    "n_free",
    "p",
    "Regla",
    "Accion",
    "Steps_Remaining",
    "K",
    "Alive",
];

/// Write one robot's full operation history to `path`.
pub fn write_robot_csv(path: &Path, ops: &[RobotOp]) -> OutputResult<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(ROBOT_COLUMNS)?;

    for (i, op) in ops.iter().enumerate() {
        writer.write_record(&[
            (i + 1).to_string(),
            op.pos.to_string(),
            op.orientation.to_string(),
            op.perception.energometer.to_string(),
            op.perception.top.to_string(),
            op.perception.left.to_string(),
            op.perception.vacuscope_front.to_string(),
            op.perception.front.to_string(),
            op.perception.roboscanner_front.to_string(),
            op.perception.right.to_string(),
            op.perception.down.to_string(),
            op.rule_num.to_string(),
            op.action.to_string(),
            op.memory_action.as_ref().map(ToString::to_string).unwrap_or_default(),
            (op.uses_memory as u8).to_string(),
            (op.uses_rule as u8).to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write one monster's full operation history to `path`.
///
/// The terminal `death_by_robot` row carries no perception: its sensor and
/// `n_free` cells are left blank, as the action happened to the monster
/// rather than being sensed by it.
pub fn write_monster_csv(path: &Path, ops: &[MonsterOp]) -> OutputResult<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(MONSTER_COLUMNS)?;

    for (i, op) in ops.iter().enumerate() {
        let sensor = |value: Option<i8>| value.map(|v| v.to_string()).unwrap_or_default();
        let action = if op.death_by_robot {
            "death_by_robot".to_owned()
        } else {
            op.action.to_string()
        };

        writer.write_record(&[
            (i + 1).to_string(),
            op.pos.to_string(),
            sensor(op.perception.map(|p| p.top)),
            sensor(op.perception.map(|p| p.left)),
            sensor(op.perception.map(|p| p.front)),
            sensor(op.perception.map(|p| p.right)),
            sensor(op.perception.map(|p| p.down)),
            sensor(op.perception.map(|p| p.behind)),
            op.perception.map(|p| p.n_free().to_string()).unwrap_or_default(),
            op.p.to_string(),
            op.rule_num.to_string(),
            action,
            op.steps_remaining.to_string(),
            op.k.to_string(),
            op.alive.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
