//! Action payloads as they appear in rule-table cells.
//!
//! # Concrete syntax
//!
//! Robot cells are JSON objects:
//!
//! ```text
//! {"tipo": "move", "directions": ["z+90"]}
//! {"tipo": "move_random", "directions": ["y+90", "y-90", "z+90"]}
//! {"tipo": "destroy"}
//! ```
//!
//! Monster cells are short natural-language forms:
//!
//! ```text
//! wait
//! Mover hacia [Behind]
//! Mover aleatorio entre [Top, Left, Front]
//! ```
//!
//! Malformed payloads never abort a run: unknown kinds or direction tokens
//! are logged with the offending cell and parsed as `idle` (robot) / `wait`
//! (monster).

use std::fmt;

use serde::Deserialize;
use tracing::warn;

use mkr_core::SixDir;

// ── MoveToken ─────────────────────────────────────────────────────────────────

/// A direction token in a robot action payload.
///
/// The four `x`/`y` tokens are head-relative rotations; `z+90` is the
/// translation token ("advance along body-forward").
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MoveToken {
    XPlus90,
    XMinus90,
    YPlus90,
    YMinus90,
    ZPlus90,
}

impl MoveToken {
    pub fn parse(s: &str) -> Option<MoveToken> {
        match s.trim() {
            "x+90" => Some(MoveToken::XPlus90),
            "x-90" => Some(MoveToken::XMinus90),
            "y+90" => Some(MoveToken::YPlus90),
            "y-90" => Some(MoveToken::YMinus90),
            "z+90" => Some(MoveToken::ZPlus90),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoveToken::XPlus90 => "x+90",
            MoveToken::XMinus90 => "x-90",
            MoveToken::YPlus90 => "y+90",
            MoveToken::YMinus90 => "y-90",
            MoveToken::ZPlus90 => "z+90",
        }
    }

    /// `true` for the translation token (`z+90`).
    pub fn is_translation(self) -> bool {
        self == MoveToken::ZPlus90
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RobotAction ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RobotActionKind {
    Move,
    MoveRandom,
    Rotate,
    Destroy,
    Memory,
    Idle,
}

impl RobotActionKind {
    fn as_str(self) -> &'static str {
        match self {
            RobotActionKind::Move => "move",
            RobotActionKind::MoveRandom => "move_random",
            RobotActionKind::Rotate => "rotate",
            RobotActionKind::Destroy => "destroy",
            RobotActionKind::Memory => "memory",
            RobotActionKind::Idle => "idle",
        }
    }
}

/// A decoded robot action payload.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RobotAction {
    pub kind: RobotActionKind,
    pub directions: Vec<MoveToken>,
}

/// Raw JSON shape of a robot action cell.  Extra fields (the original tables
/// carry free-text `notes`) are ignored.
#[derive(Deserialize)]
struct RawRobotAction {
    tipo: String,
    #[serde(default)]
    directions: Vec<String>,
}

impl RobotAction {
    /// The default action when no rule matches: advance along body-forward.
    pub fn advance() -> RobotAction {
        RobotAction {
            kind: RobotActionKind::Move,
            directions: vec![MoveToken::ZPlus90],
        }
    }

    pub fn idle() -> RobotAction {
        RobotAction { kind: RobotActionKind::Idle, directions: vec![] }
    }

    /// A deterministic single-token `move` (what a resolved `move_random`
    /// collapses to).
    pub fn single_move(token: MoveToken) -> RobotAction {
        RobotAction { kind: RobotActionKind::Move, directions: vec![token] }
    }

    /// Parse a rule-cell payload.  Never fails: malformed input degrades to
    /// `idle` with a warning naming the offending payload.
    pub fn parse(cell: &str) -> RobotAction {
        let raw: RawRobotAction = match serde_json::from_str(cell) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(payload = cell, %err, "unparseable robot action, treating as idle");
                return RobotAction::idle();
            }
        };

        let kind = match raw.tipo.as_str() {
            "move" => RobotActionKind::Move,
            "move_random" => RobotActionKind::MoveRandom,
            "rotate" => RobotActionKind::Rotate,
            "destroy" => RobotActionKind::Destroy,
            "memory" => RobotActionKind::Memory,
            "idle" => RobotActionKind::Idle,
            other => {
                warn!(payload = cell, tipo = other, "unknown robot action kind, treating as idle");
                return RobotAction::idle();
            }
        };

        let mut directions = Vec::with_capacity(raw.directions.len());
        for token in &raw.directions {
            match MoveToken::parse(token) {
                Some(t) => directions.push(t),
                None => {
                    warn!(payload = cell, token = token.as_str(),
                          "unknown direction token, treating as idle");
                    return RobotAction::idle();
                }
            }
        }

        // The direction-driven kinds need at least one token to mean anything.
        let needs_directions = matches!(
            kind,
            RobotActionKind::Move | RobotActionKind::MoveRandom | RobotActionKind::Rotate
        );
        if needs_directions && directions.is_empty() {
            warn!(payload = cell, "direction-driven action without directions, treating as idle");
            return RobotAction::idle();
        }

        RobotAction { kind, directions }
    }
}

impl fmt::Display for RobotAction {
    /// Canonical JSON form, as written to the operation log.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.directions.is_empty() {
            write!(f, r#"{{"tipo": "{}"}}"#, self.kind.as_str())
        } else {
            let dirs: Vec<String> = self.directions.iter().map(|t| format!("\"{t}\"")).collect();
            write!(
                f,
                r#"{{"tipo": "{}", "directions": [{}]}}"#,
                self.kind.as_str(),
                dirs.join(", ")
            )
        }
    }
}

// ── MonsterAction ─────────────────────────────────────────────────────────────

/// A decoded monster action payload.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MonsterAction {
    Wait,
    MoveTo(SixDir),
    MoveRandomAmong(Vec<SixDir>),
}

impl MonsterAction {
    /// Parse a rule-cell payload.  Never fails: malformed input degrades to
    /// `wait` with a warning.
    pub fn parse(cell: &str) -> MonsterAction {
        let cell = cell.trim();
        if cell.eq_ignore_ascii_case("wait") {
            return MonsterAction::Wait;
        }

        if let Some(rest) = cell.strip_prefix("Mover hacia") {
            return match bracketed_list(rest).as_deref() {
                Some([dir]) => match SixDir::parse(dir) {
                    Some(d) => MonsterAction::MoveTo(d),
                    None => {
                        warn!(payload = cell, "unknown monster direction, treating as wait");
                        MonsterAction::Wait
                    }
                },
                _ => {
                    warn!(payload = cell, "malformed monster move, treating as wait");
                    MonsterAction::Wait
                }
            };
        }

        if let Some(rest) = cell.strip_prefix("Mover aleatorio entre") {
            let Some(names) = bracketed_list(rest) else {
                warn!(payload = cell, "malformed monster move list, treating as wait");
                return MonsterAction::Wait;
            };
            let mut dirs = Vec::with_capacity(names.len());
            for name in &names {
                match SixDir::parse(name) {
                    Some(d) => dirs.push(d),
                    None => {
                        warn!(payload = cell, token = name.as_str(),
                              "unknown monster direction, treating as wait");
                        return MonsterAction::Wait;
                    }
                }
            }
            if dirs.is_empty() {
                warn!(payload = cell, "empty monster move list, treating as wait");
                return MonsterAction::Wait;
            }
            return MonsterAction::MoveRandomAmong(dirs);
        }

        warn!(payload = cell, "unknown monster action, treating as wait");
        MonsterAction::Wait
    }
}

impl fmt::Display for MonsterAction {
    /// The original surface form, as written to the operation log.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonsterAction::Wait => f.write_str("wait"),
            MonsterAction::MoveTo(d) => write!(f, "Mover hacia [{d}]"),
            MonsterAction::MoveRandomAmong(dirs) => {
                let names: Vec<&str> = dirs.iter().map(|d| d.name()).collect();
                write!(f, "Mover aleatorio entre [{}]", names.join(", "))
            }
        }
    }
}

/// Extract `"[a, b, c]" → ["a", "b", "c"]` from the tail of an action cell.
fn bracketed_list(s: &str) -> Option<Vec<String>> {
    let start = s.find('[')?;
    let end = s.find(']')?;
    if end < start {
        return None;
    }
    Some(
        s[start + 1..end]
            .split(',')
            .map(|part| part.trim().to_owned())
            .filter(|part| !part.is_empty())
            .collect(),
    )
}
