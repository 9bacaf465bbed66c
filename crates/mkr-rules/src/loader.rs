//! CSV rule-table loaders.
//!
//! # CSV formats
//!
//! Robot table, one rule per row:
//!
//! ```csv
//! Energometro,Lado1_Top,Lado2_Left,Vacuoscopio_Front,Lado0_Front,Roboscanner_Front,Lado3_Right,Lado4_Down,Regla,Accion
//! 1,0,0,0,0,0,0,0,1,"{""tipo"": ""destroy""}"
//! 0,0,0,0,1,0,0,0,2,"{""tipo"": ""move"", ""directions"": [""z+90""]}"
//! ```
//!
//! Monster table:
//!
//! ```csv
//! Top,Left,Front,Right,Down,Behind,Regla,Accion
//! 0,0,0,0,0,0,1,"Mover aleatorio entre [Top, Left, Front, Right, Down, Behind]"
//! -1,-1,-1,-1,-1,-1,2,wait
//! ```
//!
//! A missing column is a parse error (fatal at startup).  The `Regla` column
//! is informational: the 1-based row position is authoritative for rule
//! numbering, and a disagreement only produces a warning.
//!
//! Malformed `Accion` cells are NOT fatal — they decode to `idle`/`wait`
//! with a warning, per the action-payload error contract.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::action::{MonsterAction, RobotAction};
use crate::book::{MonsterRule, RobotRule};
use crate::error::{RuleError, RuleResult};
use crate::perception::{MonsterPerception, RobotPerception};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RobotRuleRecord {
    #[serde(rename = "Energometro")]
    energometro: i8,
    #[serde(rename = "Lado1_Top")]
    lado1_top: i8,
    #[serde(rename = "Lado2_Left")]
    lado2_left: i8,
    #[serde(rename = "Vacuoscopio_Front")]
    vacuoscopio_front: i8,
    #[serde(rename = "Lado0_Front")]
    lado0_front: i8,
    #[serde(rename = "Roboscanner_Front")]
    roboscanner_front: i8,
    #[serde(rename = "Lado3_Right")]
    lado3_right: i8,
    #[serde(rename = "Lado4_Down")]
    lado4_down: i8,
    #[serde(rename = "Regla")]
    regla: u32,
    #[serde(rename = "Accion")]
    accion: String,
}

#[derive(Deserialize)]
struct MonsterRuleRecord {
    #[serde(rename = "Top")]
    top: i8,
    #[serde(rename = "Left")]
    left: i8,
    #[serde(rename = "Front")]
    front: i8,
    #[serde(rename = "Right")]
    right: i8,
    #[serde(rename = "Down")]
    down: i8,
    #[serde(rename = "Behind")]
    behind: i8,
    #[serde(rename = "Regla")]
    regla: u32,
    #[serde(rename = "Accion")]
    accion: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the robot rule table from a CSV file.
pub fn load_robot_rules_csv(path: &Path) -> RuleResult<Vec<RobotRule>> {
    let file = std::fs::File::open(path).map_err(RuleError::Io)?;
    load_robot_rules_reader(file)
}

/// Like [`load_robot_rules_csv`] but accepts any `Read` source (pass a
/// `Cursor` in tests).
pub fn load_robot_rules_reader<R: Read>(reader: R) -> RuleResult<Vec<RobotRule>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rules = Vec::new();

    for (i, result) in csv_reader.deserialize::<RobotRuleRecord>().enumerate() {
        let record = result.map_err(|e| RuleError::Parse(e.to_string()))?;
        check_regla_column(record.regla, i, "robot");
        rules.push(RobotRule {
            sensors: RobotPerception {
                energometer: record.energometro,
                top: record.lado1_top,
                left: record.lado2_left,
                vacuscope_front: record.vacuoscopio_front,
                front: record.lado0_front,
                roboscanner_front: record.roboscanner_front,
                right: record.lado3_right,
                down: record.lado4_down,
            },
            action: RobotAction::parse(&record.accion),
        });
    }

    Ok(rules)
}

/// Load the monster rule table from a CSV file.
pub fn load_monster_rules_csv(path: &Path) -> RuleResult<Vec<MonsterRule>> {
    let file = std::fs::File::open(path).map_err(RuleError::Io)?;
    load_monster_rules_reader(file)
}

/// Like [`load_monster_rules_csv`] but accepts any `Read` source.
pub fn load_monster_rules_reader<R: Read>(reader: R) -> RuleResult<Vec<MonsterRule>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rules = Vec::new();

    for (i, result) in csv_reader.deserialize::<MonsterRuleRecord>().enumerate() {
        let record = result.map_err(|e| RuleError::Parse(e.to_string()))?;
        check_regla_column(record.regla, i, "monster");
        rules.push(MonsterRule {
            sensors: MonsterPerception {
                top: record.top,
                left: record.left,
                front: record.front,
                right: record.right,
                down: record.down,
                behind: record.behind,
            },
            action: MonsterAction::parse(&record.accion),
        });
    }

    Ok(rules)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check_regla_column(declared: u32, row_index: usize, table: &str) {
    let positional = row_index as u32 + 1;
    if declared != positional {
        warn!(
            table,
            declared,
            positional,
            "Regla column disagrees with row order; row order is authoritative"
        );
    }
}
