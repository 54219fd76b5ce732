//! Browser glue: owns the canvas, listens for input, redraws every frame.
//!
//! The page decodes server messages and passes them here with
//! [`push_message`] (or a bare `GameState` with [`push_snapshot`]); intents
//! come back through the callback given to [`start_board`] as JSON strings,
//! ready to wrap in an outbound message.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, window};

use crate::config::LayoutConfig;
use crate::geometry::{CanvasPosition, GridPosition};
use crate::input::InputState;
use crate::layout::{FrameLayout, HeisterSprite, SquareSprite};
use crate::protocol::{Intent, SquareType, WallType};
use crate::snapshot::{GameSnapshot, ServerMessage};
use crate::transform::CoordinateTransform;

mod paint;

/// Runtime board state.
struct BoardState {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    snapshot: GameSnapshot,
    input: InputState,
    on_intent: js_sys::Function,
    // Press that did not start a drag; a release turns it into a click.
    pressed_at: Option<CanvasPosition>,
    // Reason the server gave for refusing the last intent.
    rejected: Option<String>,
}

fn emit(on_intent: &js_sys::Function, intent: Intent) {
    let json = match intent.to_json() {
        Ok(json) => json,
        Err(e) => {
            warn!("could not encode {intent:?}: {e}");
            return;
        }
    };
    info!("intent {json}");
    if let Err(e) = on_intent.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
        warn!("intent callback threw: {e:?}");
    }
}

/// Run `f` against the board. Any intent it yields is sent after the state
/// borrow is released, so the callback may call straight back into the board.
fn with_board(f: impl FnOnce(&mut BoardState) -> Option<Intent>) {
    let pending = BOARD_STATE.with(|cell| {
        let mut guard = cell.borrow_mut();
        let st = guard.as_mut()?;
        let intent = f(st)?;
        Some((st.on_intent.clone(), intent))
    });
    if let Some((on_intent, intent)) = pending {
        emit(&on_intent, intent);
    }
}

thread_local! {
    static BOARD_STATE: RefCell<Option<BoardState>> = const { RefCell::new(None) };
    static LAYOUT: Cell<Option<LayoutConfig>> = const { Cell::new(None) };
}

fn layout() -> LayoutConfig {
    LAYOUT.with(|l| l.get()).unwrap_or_default()
}

fn transform() -> CoordinateTransform {
    CoordinateTransform::new(&layout())
}

/// Replace the layout constants. Takes a JSON object with any of
/// `canvasWidth`, `canvasHeight`, `squarePx`, `wallPx`, `heisterPx`.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = LayoutConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    LAYOUT.with(|l| l.set(Some(config)));
    BOARD_STATE.with(|cell| {
        if let Some(st) = cell.borrow().as_ref() {
            st.canvas.set_width(config.canvas_width as u32);
            st.canvas.set_height(config.canvas_height as u32);
        }
    });
    info!("layout {config:?}");
    Ok(())
}

/// Canvas `[x, y]` of grid square `(x, y)`, or `undefined` if it is not on a tile slot.
#[wasm_bindgen]
pub fn map_to_canvas(x: i32, y: i32, pixel_offset: f64) -> Option<Vec<f64>> {
    let config = layout();
    transform()
        .to_canvas(GridPosition::new(x, y), config.canvas(), pixel_offset)
        .map(|p| vec![p.x, p.y])
}

/// Grid `[x, y]` under canvas pixel `(x, y)`, or `undefined` over a gap.
#[wasm_bindgen]
pub fn canvas_to_map(x: f64, y: f64, pixel_offset: f64) -> Option<Vec<i32>> {
    let config = layout();
    transform()
        .to_grid(CanvasPosition::new(x, y), config.canvas(), pixel_offset)
        .map(|p| vec![p.x, p.y])
}

/// Replace the game state with a freshly decoded server snapshot.
#[wasm_bindgen]
pub fn push_snapshot(json: &str) -> Result<(), JsValue> {
    let snapshot = GameSnapshot::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    debug!(
        "snapshot {}: {} tiles, {} heisters, status {:?}",
        snapshot.game_name,
        snapshot.tiles.len(),
        snapshot.heisters.len(),
        snapshot.game_status
    );
    with_board(|st| {
        st.snapshot = snapshot;
        st.rejected = None;
        None
    });
    Ok(())
}

/// Handle one server `MainMessage` (its `toObject()` JSON).
#[wasm_bindgen]
pub fn push_message(json: &str) -> Result<(), JsValue> {
    let message = ServerMessage::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    match message {
        ServerMessage::GameState(snapshot) => with_board(|st| {
            st.snapshot = snapshot;
            st.rejected = None;
            None
        }),
        ServerMessage::InvalidRequest { reason } => {
            warn!("server rejected intent: {reason}");
            with_board(|st| {
                st.rejected = Some(reason);
                None
            });
        }
        ServerMessage::Chat(text) => info!("chat: {text}"),
    }
    Ok(())
}

/// Ask the server to leave staging and start the timer.
#[wasm_bindgen]
pub fn start_game() {
    with_board(|_| Some(Intent::StartGame {}));
}

#[wasm_bindgen]
pub fn send_chat(message: &str) {
    let message = message.trim();
    if message.is_empty() {
        return;
    }
    with_board(|_| Some(Intent::Chat(message.to_owned())));
}

#[wasm_bindgen]
pub fn start_board(canvas_id: &str, on_intent: js_sys::Function) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let config = layout();

    // Create / reuse canvas
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(canvas_id) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(canvas_id);
        c.set_attribute("style", "display:block; margin:0 auto; background:#222222;")
            .ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    canvas.set_width(config.canvas_width as u32);
    canvas.set_height(config.canvas_height as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let board = BoardState {
        canvas: canvas.clone(),
        ctx,
        snapshot: GameSnapshot::default(),
        input: InputState::default(),
        on_intent,
        pressed_at: None,
        rejected: None,
    };
    BOARD_STATE.with(|b| b.replace(Some(board)));

    // Keyboard: moves, heister selection, escalator
    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            with_board(|st| {
                let intent = st.input.on_key(&evt.key(), &st.snapshot)?;
                evt.prevent_default();
                Some(intent)
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Press: pick up a heister, or remember the spot for a click
    {
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let pos = event_position(&evt);
            let config = layout();
            let t = CoordinateTransform::new(&config);
            with_board(|st| {
                let dragging = st.input.on_pointer_down(pos, &st.snapshot, &t, &config);
                st.pressed_at = (!dragging).then_some(pos);
                None
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Move: the dragged sprite follows the pointer
    {
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let pos = event_position(&evt);
            with_board(|st| {
                st.input.on_pointer_move(pos);
                None
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Release: drop or click
    {
        let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
            let pos = event_position(&evt);
            let config = layout();
            let t = CoordinateTransform::new(&config);
            with_board(|st| {
                if st.input.drag.is_some() {
                    st.input.on_pointer_up(pos, &t, &config)
                } else if st.pressed_at.take().is_some() {
                    st.input.on_click(pos, &st.snapshot, &t, &config)
                } else {
                    None
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Mouse leave drops whatever was held
    {
        let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            with_board(|st| {
                st.input.cancel();
                st.pressed_at = None;
                None
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_board_loop();
    info!("board started on #{canvas_id}");
    Ok(())
}

fn event_position(evt: &MouseEvent) -> CanvasPosition {
    CanvasPosition::new(f64::from(evt.offset_x()), f64::from(evt.offset_y()))
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_board_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        BOARD_STATE.with(|state_cell| {
            if let Some(state) = state_cell.borrow().as_ref() {
                render_board(state);
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(f: &FrameCallback) {
    if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

// --- Rendering ---------------------------------------------------------------

fn render_board(state: &BoardState) {
    let config = layout();
    let t = CoordinateTransform::new(&config);
    let frame = FrameLayout::build(&state.snapshot, &t, &config, state.input.drag.as_ref());
    let ctx = &state.ctx;

    ctx.set_fill_style_str("#222222");
    ctx.fill_rect(0.0, 0.0, config.canvas_width, config.canvas_height);

    for tile in &frame.tiles {
        ctx.set_fill_style_str("#111111");
        ctx.fill_rect(tile.corner.x, tile.corner.y, tile.side, tile.side);
        for sq in &tile.squares {
            draw_square(ctx, sq, frame.square_px);
        }
    }

    ctx.set_stroke_style_str("rgba(255,240,150,0.75)");
    ctx.set_line_width(3.0);
    for p in &frame.placements {
        ctx.stroke_rect(p.x + 1.5, p.y + 1.5, frame.square_px - 3.0, frame.square_px - 3.0);
    }

    for h in &frame.heisters {
        draw_heister(ctx, h, state.input.selected == h.color);
    }

    draw_status(state);
}

fn draw_status(state: &BoardState) {
    let ctx = &state.ctx;
    ctx.set_font("20px monospace");
    ctx.set_fill_style_str("#eeeeee");
    let now = (js_sys::Date::now() / 1000.0) as u64;
    let timer = match state.snapshot.seconds_remaining(now) {
        Some(secs) => format!("{}:{:02}", secs / 60, secs % 60),
        None => "Not started yet!".to_string(),
    };
    let _ = ctx.fill_text(&timer, 16.0, 28.0);
    if let Some(reason) = &state.rejected {
        ctx.set_fill_style_str("#e36a6a");
        let _ = ctx.fill_text(reason, 16.0, 56.0);
    }
}

fn draw_square(ctx: &CanvasRenderingContext2d, sq: &SquareSprite, size: f64) {
    let (x, y) = (sq.corner.x, sq.corner.y);
    ctx.set_fill_style_str(paint::square_fill(sq.square.square_type));
    ctx.fill_rect(x + 1.0, y + 1.0, size - 2.0, size - 2.0);

    if let Some(color) = sq.square.square_type.color() {
        if matches!(
            sq.square.square_type,
            SquareType::YellowEscape | SquareType::PurpleEscape | SquareType::GreenEscape | SquareType::OrangeEscape
        ) {
            ctx.set_stroke_style_str(color.hex());
            ctx.set_line_width(3.0);
            ctx.stroke_rect(x + 6.0, y + 6.0, size - 12.0, size - 12.0);
        }
    }

    let walls = [
        (sq.square.north_wall, (x, y), (x + size, y)),
        (sq.square.east_wall, (x + size, y), (x + size, y + size)),
        (sq.square.south_wall, (x, y + size), (x + size, y + size)),
        (sq.square.west_wall, (x, y), (x, y + size)),
    ];
    for (wall, from, to) in walls {
        if wall == WallType::Clear {
            continue;
        }
        ctx.set_stroke_style_str(paint::wall_stroke(wall));
        ctx.set_line_width(if wall == WallType::Impassable { 4.0 } else { 6.0 });
        line(ctx, from, to);
    }
}

fn draw_heister(ctx: &CanvasRenderingContext2d, h: &HeisterSprite, selected: bool) {
    ctx.set_global_alpha(if h.dragging { 0.7 } else { 1.0 });
    ctx.begin_path();
    let _ = ctx.arc(h.center.x, h.center.y, h.radius.max(1.0), 0.0, std::f64::consts::TAU);
    ctx.set_fill_style_str(h.color.hex());
    ctx.fill();
    if selected {
        ctx.set_stroke_style_str("#ffffff");
        ctx.set_line_width(3.0);
        ctx.stroke();
    }
    ctx.set_global_alpha(1.0);
}

fn line(ctx: &CanvasRenderingContext2d, (x1, y1): (f64, f64), (x2, y2): (f64, f64)) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}
