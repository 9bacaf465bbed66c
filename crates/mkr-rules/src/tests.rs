//! Unit tests for mkr-rules.

use std::io::Cursor;

use mkr_core::SixDir;

use crate::{
    load_monster_rules_reader, load_robot_rules_reader, MonsterAction, MonsterPerception,
    MoveToken, RobotAction, RobotActionKind, RobotPerception, RuleBook,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

const ROBOT_CSV: &str = "\
Energometro,Lado1_Top,Lado2_Left,Vacuoscopio_Front,Lado0_Front,Roboscanner_Front,Lado3_Right,Lado4_Down,Regla,Accion\n\
1,0,0,0,0,0,0,0,1,\"{\"\"tipo\"\": \"\"destroy\"\"}\"\n\
0,0,0,0,1,0,0,0,2,\"{\"\"tipo\"\": \"\"move\"\", \"\"directions\"\": [\"\"z+90\"\"]}\"\n\
0,0,0,-1,0,0,0,0,3,\"{\"\"tipo\"\": \"\"memory\"\"}\"\n\
0,0,0,0,0,2,0,0,4,\"{\"\"tipo\"\": \"\"move_random\"\", \"\"directions\"\": [\"\"y+90\"\", \"\"y-90\"\"]}\"\n\
";

const MONSTER_CSV: &str = "\
Top,Left,Front,Right,Down,Behind,Regla,Accion\n\
0,0,0,0,0,0,1,\"Mover aleatorio entre [Top, Left, Front, Right, Down, Behind]\"\n\
-1,0,0,0,0,0,2,\"Mover hacia [Down]\"\n\
-1,-1,-1,-1,-1,-1,3,wait\n\
";

fn book() -> RuleBook {
    RuleBook::new(
        load_robot_rules_reader(Cursor::new(ROBOT_CSV)).unwrap(),
        load_monster_rules_reader(Cursor::new(MONSTER_CSV)).unwrap(),
    )
}

fn all_clear() -> RobotPerception {
    RobotPerception::default()
}

// ── Action parsing ────────────────────────────────────────────────────────────

#[cfg(test)]
mod action_tests {
    use super::*;

    #[test]
    fn robot_action_round_trips_through_display() {
        let action = RobotAction::parse(r#"{"tipo": "move", "directions": ["z+90"]}"#);
        assert_eq!(action.kind, RobotActionKind::Move);
        assert_eq!(action.directions, vec![MoveToken::ZPlus90]);
        assert_eq!(action.to_string(), r#"{"tipo": "move", "directions": ["z+90"]}"#);

        let reparsed = RobotAction::parse(&action.to_string());
        assert_eq!(reparsed, action);
    }

    #[test]
    fn directionless_kinds_display_without_directions() {
        let destroy = RobotAction::parse(r#"{"tipo": "destroy"}"#);
        assert_eq!(destroy.kind, RobotActionKind::Destroy);
        assert_eq!(destroy.to_string(), r#"{"tipo": "destroy"}"#);
    }

    #[test]
    fn extra_json_fields_are_ignored() {
        let action =
            RobotAction::parse(r#"{"tipo": "memory", "notes": "avoid_previous_empty"}"#);
        assert_eq!(action.kind, RobotActionKind::Memory);
    }

    #[test]
    fn unknown_kind_degrades_to_idle() {
        assert_eq!(RobotAction::parse(r#"{"tipo": "teleport"}"#), RobotAction::idle());
    }

    #[test]
    fn unknown_token_degrades_to_idle() {
        let action = RobotAction::parse(r#"{"tipo": "move", "directions": ["z-90"]}"#);
        assert_eq!(action, RobotAction::idle());
    }

    #[test]
    fn non_json_degrades_to_idle() {
        assert_eq!(RobotAction::parse("advance!!"), RobotAction::idle());
    }

    #[test]
    fn move_without_directions_degrades_to_idle() {
        assert_eq!(RobotAction::parse(r#"{"tipo": "move"}"#), RobotAction::idle());
    }

    #[test]
    fn monster_action_forms() {
        assert_eq!(MonsterAction::parse("wait"), MonsterAction::Wait);
        assert_eq!(
            MonsterAction::parse("Mover hacia [Behind]"),
            MonsterAction::MoveTo(SixDir::Behind)
        );
        assert_eq!(
            MonsterAction::parse("Mover aleatorio entre [Top, Down]"),
            MonsterAction::MoveRandomAmong(vec![SixDir::Top, SixDir::Down])
        );
    }

    #[test]
    fn monster_action_round_trips_through_display() {
        for cell in ["wait", "Mover hacia [Left]", "Mover aleatorio entre [Top, Front, Down]"] {
            let action = MonsterAction::parse(cell);
            assert_eq!(action.to_string(), cell);
        }
    }

    #[test]
    fn malformed_monster_action_degrades_to_wait() {
        assert_eq!(MonsterAction::parse("Mover hacia [Sideways]"), MonsterAction::Wait);
        assert_eq!(MonsterAction::parse("Mover aleatorio entre []"), MonsterAction::Wait);
        assert_eq!(MonsterAction::parse("dance"), MonsterAction::Wait);
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader_tests {
    use super::*;

    #[test]
    fn loads_both_tables() {
        let book = book();
        assert_eq!(book.robot_rule_count(), 4);
        assert_eq!(book.monster_rule_count(), 3);
    }

    #[test]
    fn missing_column_is_fatal() {
        let bad = "Energometro,Lado1_Top,Regla,Accion\n1,0,1,wait\n";
        assert!(load_robot_rules_reader(Cursor::new(bad)).is_err());
    }

    #[test]
    fn non_numeric_sensor_is_fatal() {
        let bad = MONSTER_CSV.replace("-1,0,0,0,0,0", "x,0,0,0,0,0");
        assert!(load_monster_rules_reader(Cursor::new(bad)).is_err());
    }

    #[test]
    fn malformed_action_cell_is_not_fatal() {
        let odd = "Top,Left,Front,Right,Down,Behind,Regla,Accion\n0,0,0,0,0,0,1,gibberish\n";
        let rules = load_monster_rules_reader(Cursor::new(odd)).unwrap();
        assert_eq!(rules[0].action, MonsterAction::Wait);
    }
}

// ── Lookup ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lookup_tests {
    use super::*;

    #[test]
    fn first_match_wins_with_row_number() {
        let book = book();
        let p = RobotPerception { front: 1, ..all_clear() };
        let (rule, action) = book.robot_lookup(&p);
        assert_eq!(rule, 2);
        assert_eq!(action.kind, RobotActionKind::Move);
    }

    #[test]
    fn energometer_short_circuit_ignores_other_sensors() {
        let book = book();
        // Every other sensor disagrees with row 1, yet Energometro=1 matches it.
        let p = RobotPerception {
            energometer: 1,
            top: 1,
            left: 1,
            vacuscope_front: -1,
            front: 1,
            roboscanner_front: 2,
            right: 1,
            down: 1,
        };
        let (rule, action) = book.robot_lookup(&p);
        assert_eq!(rule, 1);
        assert_eq!(action.kind, RobotActionKind::Destroy);
    }

    #[test]
    fn short_circuit_row_rejects_energometer_zero() {
        // A perception identical to row 1's sensor vector except Energometro=0
        // must NOT match row 1 (and the all-zero vector matches nothing here).
        let book = book();
        let (rule, action) = book.robot_lookup(&all_clear());
        assert_eq!(rule, 0);
        assert_eq!(action, RobotAction::advance());
    }

    #[test]
    fn robot_default_is_advance() {
        let book = book();
        let p = RobotPerception { down: 1, ..all_clear() };
        let (rule, action) = book.robot_lookup(&p);
        assert_eq!(rule, 0);
        assert_eq!(action, RobotAction::advance());
    }

    #[test]
    fn monster_exact_match_and_default() {
        let book = book();

        let open = MonsterPerception::default();
        let (rule, action) = book.monster_lookup(&open);
        assert_eq!(rule, 1);
        assert!(matches!(action, MonsterAction::MoveRandomAmong(ref d) if d.len() == 6));

        let blocked_top = MonsterPerception { top: -1, ..MonsterPerception::default() };
        assert_eq!(book.monster_lookup(&blocked_top), (2, MonsterAction::MoveTo(SixDir::Down)));

        // No row for this combination: default wait, rule 0.
        let odd = MonsterPerception { left: -1, ..MonsterPerception::default() };
        assert_eq!(book.monster_lookup(&odd), (0, MonsterAction::Wait));
    }

    #[test]
    fn n_free_counts_zeros() {
        let p = MonsterPerception { top: -1, behind: -1, ..MonsterPerception::default() };
        assert_eq!(p.n_free(), 4);
    }
}
