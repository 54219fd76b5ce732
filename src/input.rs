//! Turns keyboard and pointer events into intents for the server.
//!
//! Nothing here touches the snapshot. A rejected or unresolvable drop simply
//! produces no intent, and the next frame draws the heister where the server
//! last put it.

use log::{debug, info, warn};

use crate::config::LayoutConfig;
use crate::geometry::{CanvasPosition, GridPosition};
use crate::protocol::{HeisterColor, Intent, MoveDirection};
use crate::snapshot::GameSnapshot;
use crate::transform::CoordinateTransform;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Move(MoveDirection),
    Select(HeisterColor),
    Escalator,
}

impl KeyAction {
    pub fn from_key(key: &str) -> Option<Self> {
        let action = match key {
            "w" | "ArrowUp" => KeyAction::Move(MoveDirection::North),
            "d" | "ArrowRight" => KeyAction::Move(MoveDirection::East),
            "s" | "ArrowDown" => KeyAction::Move(MoveDirection::South),
            "a" | "ArrowLeft" => KeyAction::Move(MoveDirection::West),
            "1" => KeyAction::Select(HeisterColor::Yellow),
            "2" => KeyAction::Select(HeisterColor::Purple),
            "3" => KeyAction::Select(HeisterColor::Green),
            "4" => KeyAction::Select(HeisterColor::Orange),
            "e" => KeyAction::Escalator,
            _ => return None,
        };
        Some(action)
    }
}

/// A heister being dragged. `pointer` is where its sprite centre is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drag {
    pub color: HeisterColor,
    pub from: GridPosition,
    pub pointer: CanvasPosition,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InputState {
    pub selected: HeisterColor,
    pub drag: Option<Drag>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            selected: HeisterColor::Yellow,
            drag: None,
        }
    }
}

impl InputState {
    pub fn on_key(&mut self, key: &str, snapshot: &GameSnapshot) -> Option<Intent> {
        let action = KeyAction::from_key(key)?;
        match action {
            KeyAction::Select(color) => {
                debug!("selected heister {color:?}");
                self.selected = color;
                None
            }
            KeyAction::Move(direction) => {
                let heister = snapshot.heister(self.selected).filter(|h| !h.has_escaped)?;
                Some(Intent::MoveHeister {
                    heister_color: heister.color,
                    position: heister.position.step(direction)?,
                })
            }
            KeyAction::Escalator => {
                if snapshot.heister(self.selected).is_none_or(|h| h.has_escaped) {
                    return None;
                }
                let Some(dest) = snapshot.possible_escalators.get(&self.selected) else {
                    info!("no escalator destination for {:?}", self.selected);
                    return None;
                };
                Some(Intent::MoveHeister {
                    heister_color: self.selected,
                    position: *dest,
                })
            }
        }
    }

    /// Starts a drag if the press lands on a heister. Returns whether it did.
    pub fn on_pointer_down(
        &mut self,
        pos: CanvasPosition,
        snapshot: &GameSnapshot,
        transform: &CoordinateTransform,
        config: &LayoutConfig,
    ) -> bool {
        let Some(square) = transform.to_grid(pos, config.canvas(), 0.0) else {
            return false;
        };
        let Some(heister) = snapshot.heister_at(square) else {
            return false;
        };
        debug!("drag start {:?} from {:?}", heister.color, square);
        self.selected = heister.color;
        self.drag = Some(Drag {
            color: heister.color,
            from: square,
            pointer: pos,
        });
        true
    }

    pub fn on_pointer_move(&mut self, pos: CanvasPosition) {
        if let Some(drag) = self.drag.as_mut() {
            drag.pointer = pos;
        }
    }

    /// Ends a drag. Yields a move only when the drop resolves to a different square.
    pub fn on_pointer_up(
        &mut self,
        pos: CanvasPosition,
        transform: &CoordinateTransform,
        config: &LayoutConfig,
    ) -> Option<Intent> {
        let drag = self.drag.take()?;
        let Some(dest) = transform.to_grid(pos, config.canvas(), 0.0) else {
            warn!("dropped {:?} outside any tile, ignoring", drag.color);
            return None;
        };
        if dest == drag.from {
            return None;
        }
        Some(Intent::MoveHeister {
            heister_color: drag.color,
            position: dest,
        })
    }

    /// Pointer left the canvas: abandon any drag.
    pub fn cancel(&mut self) {
        self.drag = None;
    }

    /// A click that was not a drag: reveal a tile if it hit a placement square.
    pub fn on_click(
        &self,
        pos: CanvasPosition,
        snapshot: &GameSnapshot,
        transform: &CoordinateTransform,
        config: &LayoutConfig,
    ) -> Option<Intent> {
        let square = transform.to_grid(pos, config.canvas(), 0.0)?;
        snapshot.is_placement(square).then_some(Intent::PlaceTile {
            tile_entrance: square,
        })
    }
}
