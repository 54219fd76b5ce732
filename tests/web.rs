// Browser smoke tests, run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use heist_board::board;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn exported_helpers_round_trip() {
    let pos = board::map_to_canvas(4, 1, 0.0).unwrap();
    let back = board::canvas_to_map(pos[0], pos[1], 0.0).unwrap();
    assert_eq!(back, vec![4, 1]);
    assert!(board::map_to_canvas(4, 0, 0.0).is_none());
}

#[wasm_bindgen_test]
fn board_starts_and_accepts_snapshots() {
    let noop = js_sys::Function::new_no_args("");
    board::start_board("heist-test-canvas", noop).unwrap();
    board::push_snapshot(r#"{"gameName":"smoke","gameStatus":1}"#).unwrap();
    assert!(board::push_snapshot(r#"{"gameStatus":42}"#).is_err());
    assert!(board::configure(r#"{"squarePx":-1}"#).is_err());
    board::configure(r#"{"canvasWidth":800,"canvasHeight":600}"#).unwrap();
}

#[wasm_bindgen_test]
fn intent_callback_may_call_back_into_the_board() {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let echo = Closure::wrap(Box::new(move |json: JsValue| {
        sink.borrow_mut().push(json.as_string().unwrap_or_default());
        // A page echoing state straight back must not trip the board's borrow.
        board::push_snapshot(r#"{"gameName":"echo","gameStatus":1}"#).unwrap();
        board::configure("{}").unwrap();
    }) as Box<dyn FnMut(JsValue)>);
    let callback: js_sys::Function = echo.as_ref().unchecked_ref::<js_sys::Function>().clone();
    board::start_board("heist-echo-canvas", callback).unwrap();

    board::start_game();
    board::send_chat("  ready  ");
    board::send_chat("   ");
    assert_eq!(
        *seen.borrow(),
        vec![r#"{"startGame":{}}"#.to_string(), r#"{"chat":"ready"}"#.to_string()]
    );
    board::push_message(r#"{"invalidRequest":{"reason":"not your turn"}}"#).unwrap();
    assert!(board::push_message("{}").is_err());
    echo.forget();
}
