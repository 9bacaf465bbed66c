//! Head-relative rotation algebra.
//!
//! Rotation tokens are resolved through a literal 24-entry lookup
//! (six headings × four rotation tokens), NOT through ℝ³ rotation matrices.
//! The semantics are fixed relative to the robot's *initial* head reference:
//! `y+90` always means "head turns left", `y−90` "right", `x+90` "up",
//! `x−90` "down", whatever the current heading is.  Deriving the mapping
//! from axis-angle math drifts for non-canonical headings, so the table is
//! materialized verbatim.
//!
//! `z+90` is not a rotation: it is the translation token ("advance along
//! body-forward") and leaves the heading unchanged here.

use mkr_core::Heading;
use mkr_rules::MoveToken;

/// The heading after applying one rotation token to `heading`.
pub fn rotated(heading: Heading, token: MoveToken) -> Heading {
    use Heading::*;
    use MoveToken::*;

    match (token, heading) {
        // z+90 translates; the heading is untouched.
        (ZPlus90, h) => h,

        // y−90: head turns right.
        (YMinus90, PosY) => PosX,
        (YMinus90, NegY) => NegX,
        (YMinus90, PosX) => NegY,
        (YMinus90, NegX) => PosY,
        (YMinus90, PosZ) => PosX,
        (YMinus90, NegZ) => NegX,

        // y+90: head turns left.
        (YPlus90, PosY) => NegX,
        (YPlus90, NegY) => PosX,
        (YPlus90, PosX) => PosY,
        (YPlus90, NegX) => NegY,
        (YPlus90, PosZ) => NegX,
        (YPlus90, NegZ) => PosX,

        // x+90: head turns up.
        (XPlus90, PosY) => PosZ,
        (XPlus90, NegY) => NegZ,
        (XPlus90, PosX) => PosY,
        (XPlus90, NegX) => NegY,
        (XPlus90, PosZ) => NegY,
        (XPlus90, NegZ) => PosY,

        // x−90: head turns down.
        (XMinus90, PosY) => NegZ,
        (XMinus90, NegY) => PosZ,
        (XMinus90, PosX) => NegY,
        (XMinus90, NegX) => PosY,
        (XMinus90, PosZ) => PosY,
        (XMinus90, NegZ) => NegY,
    }
}

/// Whether `token` would actually do something from `heading`: translations
/// always count, rotations only when they change the heading.
///
/// Used by `move_random` to avoid drawing a no-op token.
pub fn is_effective(heading: Heading, token: MoveToken) -> bool {
    token.is_translation() || rotated(heading, token) != heading
}
