//! Colours for squares and walls.

use crate::protocol::{SquareType, WallType};

pub fn square_fill(square_type: SquareType) -> &'static str {
    use SquareType::*;
    match square_type {
        Normal => "#3b3b3b",
        YellowTeleportPad => "rgba(240,210,73,0.45)",
        PurpleTeleportPad => "rgba(203,151,239,0.45)",
        GreenTeleportPad => "rgba(129,174,98,0.45)",
        OrangeTeleportPad => "rgba(231,130,52,0.45)",
        YellowItem => "#f0d249",
        PurpleItem => "#cb97ef",
        GreenItem => "#81ae62",
        OrangeItem => "#e78234",
        // Escapes keep the floor colour and get a coloured outline.
        YellowEscape | PurpleEscape | GreenEscape | OrangeEscape => "#3b3b3b",
        Escalator => "#6f7d8c",
        TimerFlip => "#c33c3c",
        TimerFlipUsed => "#6e3030",
        Filled => "#111111",
    }
}

pub fn wall_stroke(wall: WallType) -> &'static str {
    match wall.door_color() {
        Some(color) => color.hex(),
        None if wall == WallType::Impassable => "#d8d8d8",
        None => "transparent",
    }
}
