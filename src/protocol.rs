//! Closed enumerations for the server's numeric wire codes, plus the intent
//! messages the client sends back.
//!
//! Codes arrive as plain integers in the decoded `GameState`. They are checked
//! here, once, so the rest of the crate never handles a raw code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::GridPosition;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} code {code}")]
pub struct DecodeError {
    pub kind: &'static str,
    pub code: i32,
}

/// Declares a fieldless enum with fixed wire codes, and both conversions.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i32", into = "i32")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl TryFrom<i32> for $name {
            type Error = DecodeError;

            fn try_from(code: i32) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    _ => Err(DecodeError { kind: stringify!($name), code }),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> i32 {
                match value {
                    $($name::$variant => $code,)+
                }
            }
        }
    };
}

wire_enum! {
    HeisterColor {
        Yellow = 0,
        Purple = 1,
        Green = 2,
        Orange = 3,
    }
}

wire_enum! {
    SquareType {
        Normal = 0,
        YellowTeleportPad = 1,
        PurpleTeleportPad = 2,
        GreenTeleportPad = 3,
        OrangeTeleportPad = 4,
        YellowItem = 5,
        PurpleItem = 6,
        GreenItem = 7,
        OrangeItem = 8,
        YellowEscape = 9,
        PurpleEscape = 10,
        GreenEscape = 11,
        OrangeEscape = 12,
        Escalator = 13,
        TimerFlip = 14,
        TimerFlipUsed = 15,
        Filled = 16,
    }
}

wire_enum! {
    WallType {
        Clear = 0,
        Impassable = 1,
        YellowDoor = 2,
        PurpleDoor = 3,
        GreenDoor = 4,
        OrangeDoor = 5,
    }
}

wire_enum! {
    Ability {
        MoveNorth = 0,
        MoveEast = 1,
        MoveSouth = 2,
        MoveWest = 3,
        Teleport = 4,
        RevealTiles = 5,
        UseEscalator = 6,
    }
}

wire_enum! {
    #[derive(Default)]
    GameStatus {
        #[default]
        Staging = 0,
        Ongoing = 1,
        Victory = 2,
        Defeat = 3,
    }
}

impl HeisterColor {
    /// Sprite fill colour.
    pub fn hex(self) -> &'static str {
        match self {
            HeisterColor::Yellow => "#f0d249",
            HeisterColor::Purple => "#cb97ef",
            HeisterColor::Green => "#81ae62",
            HeisterColor::Orange => "#e78234",
        }
    }
}

impl SquareType {
    /// Colour the square is tied to, if any (pads, items, escapes).
    pub fn color(self) -> Option<HeisterColor> {
        use SquareType::*;
        match self {
            YellowTeleportPad | YellowItem | YellowEscape => Some(HeisterColor::Yellow),
            PurpleTeleportPad | PurpleItem | PurpleEscape => Some(HeisterColor::Purple),
            GreenTeleportPad | GreenItem | GreenEscape => Some(HeisterColor::Green),
            OrangeTeleportPad | OrangeItem | OrangeEscape => Some(HeisterColor::Orange),
            _ => None,
        }
    }
}

impl WallType {
    /// Door colour, `None` for clear and impassable walls.
    pub fn door_color(self) -> Option<HeisterColor> {
        match self {
            WallType::YellowDoor => Some(HeisterColor::Yellow),
            WallType::PurpleDoor => Some(HeisterColor::Purple),
            WallType::GreenDoor => Some(HeisterColor::Green),
            WallType::OrangeDoor => Some(HeisterColor::Orange),
            WallType::Clear | WallType::Impassable => None,
        }
    }
}

/// Cardinal move. The map origin is top-left, so north decreases `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    North,
    East,
    South,
    West,
}

impl MoveDirection {
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveDirection::North => (0, -1),
            MoveDirection::East => (1, 0),
            MoveDirection::South => (0, 1),
            MoveDirection::West => (-1, 0),
        }
    }
}

/// A request for the server. The client never applies these itself; the next
/// snapshot reflects whatever the server decided.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Intent {
    #[serde(rename_all = "camelCase")]
    MoveHeister {
        heister_color: HeisterColor,
        position: GridPosition,
    },
    #[serde(rename_all = "camelCase")]
    PlaceTile { tile_entrance: GridPosition },
    /// Leave staging and start the timer.
    StartGame {},
    Chat(String),
}

impl Intent {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_wire_values() {
        assert_eq!(HeisterColor::try_from(2), Ok(HeisterColor::Green));
        assert_eq!(i32::from(HeisterColor::Orange), 3);
        assert_eq!(SquareType::try_from(13), Ok(SquareType::Escalator));
        assert_eq!(WallType::try_from(5), Ok(WallType::OrangeDoor));
        assert_eq!(GameStatus::try_from(3), Ok(GameStatus::Defeat));
        assert_eq!(Ability::try_from(6), Ok(Ability::UseEscalator));
    }

    #[test]
    fn every_variant_survives_its_code() {
        for &c in SquareType::ALL {
            assert_eq!(SquareType::try_from(i32::from(c)), Ok(c));
        }
        for &w in WallType::ALL {
            assert_eq!(WallType::try_from(i32::from(w)), Ok(w));
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        let err = HeisterColor::try_from(4).unwrap_err();
        assert_eq!(err, DecodeError { kind: "HeisterColor", code: 4 });
        assert_eq!(err.to_string(), "unknown HeisterColor code 4");
        assert!(SquareType::try_from(-1).is_err());
        assert!(serde_json::from_str::<WallType>("9").is_err());
    }

    #[test]
    fn colours_of_squares_and_doors() {
        assert_eq!(SquareType::PurpleItem.color(), Some(HeisterColor::Purple));
        assert_eq!(SquareType::Escalator.color(), None);
        assert_eq!(WallType::GreenDoor.door_color(), Some(HeisterColor::Green));
        assert_eq!(WallType::Impassable.door_color(), None);
    }

    #[test]
    fn intent_json_shape() {
        let intent = Intent::MoveHeister {
            heister_color: HeisterColor::Purple,
            position: GridPosition::new(1, -2),
        };
        assert_eq!(
            intent.to_json().unwrap(),
            r#"{"moveHeister":{"heisterColor":1,"position":{"x":1,"y":-2}}}"#
        );
        let place = Intent::PlaceTile { tile_entrance: GridPosition::new(4, 2) };
        assert_eq!(
            place.to_json().unwrap(),
            r#"{"placeTile":{"tileEntrance":{"x":4,"y":2}}}"#
        );
    }

    #[test]
    fn lobby_intents_json_shape() {
        assert_eq!(Intent::StartGame {}.to_json().unwrap(), r#"{"startGame":{}}"#);
        assert_eq!(
            Intent::Chat("meet at the vault".into()).to_json().unwrap(),
            r#"{"chat":"meet at the vault"}"#
        );
    }

    #[test]
    fn status_defaults_to_staging() {
        assert_eq!(GameStatus::default(), GameStatus::Staging);
        assert_eq!(serde_json::from_str::<GameStatus>("2").unwrap(), GameStatus::Victory);
    }
}
