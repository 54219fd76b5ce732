//! Decoded game-state snapshots.
//!
//! The page decodes the server's binary `GameState` with the generated
//! protobuf classes and hands over `toObject()` as JSON: camelCase keys,
//! repeated fields suffixed `List`, maps as `[key, value]` pairs. A snapshot
//! is replaced wholesale on every update and never edited locally.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{GridPosition, SQUARES_PER_TILE, TILE_SIDE};
use crate::protocol::{Ability, DecodeError, GameStatus, HeisterColor, MoveDirection, SquareType, WallType};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed game state: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("{0} without a position")]
    MissingPosition(&'static str),

    #[error("tile {index} has {count} squares, expected {}", SQUARES_PER_TILE)]
    TileSquares { index: usize, count: usize },

    #[error("server message has no body")]
    EmptyMessage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    pub north_wall: WallType,
    pub east_wall: WallType,
    pub south_wall: WallType,
    pub west_wall: WallType,
    pub square_type: SquareType,
}

impl Square {
    pub fn wall(&self, direction: MoveDirection) -> WallType {
        match direction {
            MoveDirection::North => self.north_wall,
            MoveDirection::East => self.east_wall,
            MoveDirection::South => self.south_wall,
            MoveDirection::West => self.west_wall,
        }
    }
}

/// A placed tile: its first square's position and its squares in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub position: GridPosition,
    pub squares: Vec<Square>,
}

impl Tile {
    /// Offset of `pos` from the tile's first square, if the tile covers it.
    fn local(&self, pos: GridPosition) -> Option<(i32, i32)> {
        let dx = pos.x.checked_sub(self.position.x)?;
        let dy = pos.y.checked_sub(self.position.y)?;
        ((0..TILE_SIDE).contains(&dx) && (0..TILE_SIDE).contains(&dy)).then_some((dx, dy))
    }

    pub fn covers(&self, pos: GridPosition) -> bool {
        self.local(pos).is_some()
    }

    pub fn square_at(&self, pos: GridPosition) -> Option<&Square> {
        let (dx, dy) = self.local(pos)?;
        self.squares.get((dy * TILE_SIDE + dx) as usize)
    }

    /// Every square with its absolute grid position. Squares that would lie
    /// past the `i32` grid are left out.
    pub fn squares_with_positions(&self) -> impl Iterator<Item = (GridPosition, &Square)> + '_ {
        self.squares.iter().enumerate().filter_map(move |(i, sq)| {
            let i = i as i32;
            let pos = GridPosition::new(
                self.position.x.checked_add(i % TILE_SIDE)?,
                self.position.y.checked_add(i / TILE_SIDE)?,
            );
            Some((pos, sq))
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Heister {
    pub color: HeisterColor,
    pub position: GridPosition,
    pub has_taken_item: bool,
    pub has_escaped: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub abilities: Vec<Ability>,
}

impl Player {
    pub fn can(&self, ability: Ability) -> bool {
        self.abilities.contains(&ability)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameSnapshot {
    pub game_name: String,
    pub game_status: GameStatus,
    pub game_started: u64,
    pub timer_runs_out: u64,
    pub remaining_tiles: u32,
    pub all_items_taken: bool,
    pub tiles: Vec<Tile>,
    pub heisters: Vec<Heister>,
    pub players: Vec<Player>,
    pub possible_placements: Vec<GridPosition>,
    pub possible_escalators: HashMap<HeisterColor, GridPosition>,
}

impl GameSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let wire: WireGameState = serde_json::from_str(json)?;
        Self::from_wire(wire)
    }

    pub fn heister(&self, color: HeisterColor) -> Option<&Heister> {
        self.heisters.iter().find(|h| h.color == color)
    }

    /// Heister standing on `pos`. Escaped heisters have left the board.
    pub fn heister_at(&self, pos: GridPosition) -> Option<&Heister> {
        self.heisters
            .iter()
            .find(|h| !h.has_escaped && h.position == pos)
    }

    pub fn tile_at(&self, pos: GridPosition) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.covers(pos))
    }

    pub fn square_at(&self, pos: GridPosition) -> Option<&Square> {
        self.tile_at(pos).and_then(|t| t.square_at(pos))
    }

    pub fn is_placement(&self, pos: GridPosition) -> bool {
        self.possible_placements.contains(&pos)
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Seconds left on the sand timer at unix time `now` (seconds). `None`
    /// while the game is still in staging; zero once the timer has run out.
    pub fn seconds_remaining(&self, now: u64) -> Option<u64> {
        if self.game_status == GameStatus::Staging || self.timer_runs_out == 0 {
            return None;
        }
        Some(self.timer_runs_out.saturating_sub(now))
    }
}

/// Anything the server pushes down the socket, decoded from the JSON form of
/// its `MainMessage` envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerMessage {
    GameState(GameSnapshot),
    /// The server refused the last intent.
    InvalidRequest { reason: String },
    Chat(String),
}

impl ServerMessage {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let wire: WireMainMessage = serde_json::from_str(json)?;
        if let Some(state) = wire.game_state {
            return Ok(ServerMessage::GameState(GameSnapshot::from_wire(state)?));
        }
        if let Some(invalid) = wire.invalid_request {
            return Ok(ServerMessage::InvalidRequest { reason: invalid.reason });
        }
        wire.chat.map(ServerMessage::Chat).ok_or(SnapshotError::EmptyMessage)
    }
}

// --- Wire shapes ------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMainMessage {
    game_state: Option<WireGameState>,
    invalid_request: Option<WireInvalidRequest>,
    chat: Option<String>,
}

#[derive(Deserialize)]
struct WireInvalidRequest {
    #[serde(default)]
    reason: String,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireGameState {
    game_name: String,
    game_started: u64,
    timer_runs_out: u64,
    tiles_list: Vec<WireTile>,
    heisters_list: Vec<WireHeister>,
    players_list: Vec<WirePlayer>,
    all_items_taken: bool,
    #[serde(alias = "remainingTile")]
    remaining_tiles: u32,
    game_status: GameStatus,
    possible_placements_list: Vec<GridPosition>,
    possible_escalators_map: Vec<(i32, GridPosition)>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTile {
    #[serde(default)]
    squares_list: Vec<WireSquare>,
    position: Option<GridPosition>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSquare {
    north_wall: WallType,
    east_wall: WallType,
    south_wall: WallType,
    west_wall: WallType,
    square_type: SquareType,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireHeister {
    heister_color: HeisterColor,
    map_position: Option<GridPosition>,
    #[serde(default)]
    has_taken_item: bool,
    #[serde(default)]
    has_escaped: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePlayer {
    name: String,
    #[serde(default)]
    abilities_list: Vec<Ability>,
}

impl GameSnapshot {
    fn from_wire(wire: WireGameState) -> Result<Self, SnapshotError> {
        let mut tiles = Vec::with_capacity(wire.tiles_list.len());
        for (index, tile) in wire.tiles_list.into_iter().enumerate() {
            let position = tile.position.ok_or(SnapshotError::MissingPosition("tile"))?;
            if tile.squares_list.len() != SQUARES_PER_TILE {
                return Err(SnapshotError::TileSquares {
                    index,
                    count: tile.squares_list.len(),
                });
            }
            let squares = tile
                .squares_list
                .into_iter()
                .map(|s| Square {
                    north_wall: s.north_wall,
                    east_wall: s.east_wall,
                    south_wall: s.south_wall,
                    west_wall: s.west_wall,
                    square_type: s.square_type,
                })
                .collect();
            tiles.push(Tile { position, squares });
        }

        let heisters = wire
            .heisters_list
            .into_iter()
            .map(|h| {
                Ok(Heister {
                    color: h.heister_color,
                    position: h.map_position.ok_or(SnapshotError::MissingPosition("heister"))?,
                    has_taken_item: h.has_taken_item,
                    has_escaped: h.has_escaped,
                })
            })
            .collect::<Result<Vec<_>, SnapshotError>>()?;

        let players = wire
            .players_list
            .into_iter()
            .map(|p| Player {
                name: p.name,
                abilities: p.abilities_list,
            })
            .collect();

        let mut possible_escalators = HashMap::new();
        for (code, pos) in wire.possible_escalators_map {
            possible_escalators.insert(HeisterColor::try_from(code)?, pos);
        }

        Ok(GameSnapshot {
            game_name: wire.game_name,
            game_status: wire.game_status,
            game_started: wire.game_started,
            timer_runs_out: wire.timer_runs_out,
            remaining_tiles: wire.remaining_tiles,
            all_items_taken: wire.all_items_taken,
            tiles,
            heisters,
            players,
            possible_placements: wire.possible_placements_list,
            possible_escalators,
        })
    }
}
