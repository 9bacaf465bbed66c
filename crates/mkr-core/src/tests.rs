//! Unit tests for mkr-core.

use std::io::Cursor;

use crate::{Heading, PlacementMode, Pos, SimConfig, SimRng, SixDir};

// ── Grid ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid_tests {
    use super::*;

    #[test]
    fn pos_step_follows_heading() {
        let p = Pos::new(2, 2, 2);
        assert_eq!(p.step(Heading::PosZ), Pos::new(2, 2, 3));
        assert_eq!(p.step(Heading::NegY), Pos::new(2, 1, 2));
        assert_eq!(p.neighbor(SixDir::Left), Pos::new(1, 2, 2));
    }

    #[test]
    fn pos_display_is_bracketed_triple() {
        assert_eq!(Pos::new(1, 2, 3).to_string(), "[1,2,3]");
        assert_eq!(Heading::PosZ.to_string(), "[0,0,1]");
    }

    #[test]
    fn heading_round_trips_through_vector() {
        for h in Heading::ALL {
            assert_eq!(Heading::from_vector(h.vector()), Some(h));
        }
        assert_eq!(Heading::from_vector((1, 1, 0)), None);
    }

    #[test]
    fn lateral_formulas_match_plane_rotation() {
        // left = (−oy, ox, oz), right = (oy, −ox, oz)
        assert_eq!(Heading::PosY.left(), Heading::NegX);
        assert_eq!(Heading::PosY.right(), Heading::PosX);
        assert_eq!(Heading::PosX.left(), Heading::PosY);
        assert_eq!(Heading::PosX.right(), Heading::NegY);
        // Vertical headings degenerate to themselves.
        assert_eq!(Heading::PosZ.left(), Heading::PosZ);
        assert_eq!(Heading::NegZ.right(), Heading::NegZ);
    }

    #[test]
    fn sixdir_parse_round_trips() {
        for d in SixDir::ALL {
            assert_eq!(SixDir::parse(d.name()), Some(d));
        }
        assert_eq!(SixDir::parse(" Top "), Some(SixDir::Top));
        assert_eq!(SixDir::parse("Up"), None);
    }
}

// ── RNG ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rng_tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(7);
        let mut b = SimRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.gen_range(0..1000u32), b.gen_range(0..1000u32));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(1);
        assert!((0..50).all(|_| !rng.gen_bool(0.0)));
        assert!((0..50).all(|_| rng.gen_bool(1.0)));
    }

    #[test]
    fn sample_indices_distinct_and_capped() {
        let mut rng = SimRng::new(3);
        let mut sampled = rng.sample_indices(10, 4);
        sampled.sort_unstable();
        sampled.dedup();
        assert_eq!(sampled.len(), 4);
        assert!(sampled.iter().all(|&i| i < 10));

        assert_eq!(rng.sample_indices(3, 10).len(), 3);
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(5);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_tiny_world() {
        let config = SimConfig { world_size: 2, ..SimConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let config = SimConfig { monster_probability: 1.5, ..SimConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn fixed_mode_requires_position() {
        let config = SimConfig {
            robot_position_mode: PlacementMode::Fixed,
            robot_fixed_position: None,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_from_json() {
        let json = r#"{
            "world_size": 9,
            "num_robots": 1,
            "monster_position_mode": "fixed",
            "monster_fixed_position": {"x": 4, "y": 4, "z": 4},
            "random_seed": 123
        }"#;
        let config = SimConfig::from_json_reader(Cursor::new(json)).unwrap();
        assert_eq!(config.world_size, 9);
        assert_eq!(config.num_robots, 1);
        assert_eq!(config.monster_position_mode, PlacementMode::Fixed);
        assert_eq!(config.monster_fixed_position, Some(Pos::new(4, 4, 4)));
        assert_eq!(config.random_seed, 123);
        // Unset keys take defaults.
        assert_eq!(config.monster_frequency, SimConfig::default().monster_frequency);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let json = r#"{"world_sise": 9}"#;
        assert!(SimConfig::from_json_reader(Cursor::new(json)).is_err());
    }
}
