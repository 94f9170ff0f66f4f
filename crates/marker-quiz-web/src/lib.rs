//! Browser entry points for the marker quiz.
//!
//! wasm-bindgen cannot export the runner directly, so it lives in a
//! `thread_local!` and is reached through free functions. The DOM view lives
//! in a second slot: events are drained from the runner first and rendered
//! afterwards, so DOM callbacks fired while rendering never find the runner
//! borrowed.

pub mod dom;
pub mod runner;
pub mod scene;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use marker_quiz::{QuizEvent, QuizSetup, QuizView, TrackingEvent};

pub use dom::DomView;
pub use runner::QuizRunner;

/// Frame interval of the self-driven loop started by `quiz_run`.
const DEFAULT_FRAME_MS: i32 = 100;

struct FrameLoop {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

thread_local! {
    static RUNNER: RefCell<Option<QuizRunner>> = RefCell::new(None);
    static VIEW: RefCell<Option<DomView>> = RefCell::new(None);
    static FRAME_LOOP: RefCell<Option<FrameLoop>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut QuizRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => Some(f(runner)),
        None => {
            log::warn!("Quiz not initialized. Call quiz_init() first.");
            None
        }
    })
}

fn render(events: Vec<QuizEvent>) {
    if events.is_empty() {
        return;
    }
    VIEW.with(|cell| {
        if let Some(view) = cell.borrow_mut().as_mut() {
            for event in &events {
                view.apply(event);
            }
        }
    });
}

/// Queue a tracking event; it is dispatched on the next tick.
pub(crate) fn push_tracking(event: TrackingEvent) {
    with_runner(|r| r.push(event));
}

fn parse_setup(json: Option<String>) -> QuizSetup {
    match json {
        Some(json) => QuizSetup::from_json(&json).unwrap_or_else(|err| {
            log::error!("Invalid quiz setup, using defaults: {}", err);
            QuizSetup::default()
        }),
        None => QuizSetup::default(),
    }
}

/// Build the HUD and start the first round.
/// `setup_json` may carry `config`, `catalog` and `layout` sections.
#[wasm_bindgen]
pub fn quiz_init(setup_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let setup = parse_setup(setup_json);
    let round_seconds = setup.config.round_seconds;
    let runner = QuizRunner::from_setup(setup).map_err(|err| JsValue::from_str(&err.to_string()))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("missing document"))?;
    // A previous view takes its scene and restart button with it.
    VIEW.with(|cell| cell.borrow_mut().take());
    let view = DomView::new(document);
    view.mount_hud(round_seconds)?;

    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
    VIEW.with(|cell| *cell.borrow_mut() = Some(view));

    let events = with_runner(|r| r.init()).unwrap_or_default();
    render(events);
    log::info!("marker-quiz: initialized");
    Ok(())
}

/// Advance the quiz by `dt` seconds and render the result.
#[wasm_bindgen]
pub fn quiz_tick(dt: f32) {
    let events = with_runner(|r| r.tick(dt)).unwrap_or_default();
    render(events);
}

#[wasm_bindgen]
pub fn quiz_target_found(slot: u32) {
    push_tracking(TrackingEvent::TargetFound { slot });
}

#[wasm_bindgen]
pub fn quiz_target_lost(slot: u32) {
    push_tracking(TrackingEvent::TargetLost { slot });
}

#[wasm_bindgen]
pub fn quiz_restart() {
    push_tracking(TrackingEvent::Restart);
}

/// Drive `quiz_tick` from a window interval instead of a host loop.
#[wasm_bindgen]
pub fn quiz_run(frame_ms: Option<i32>) -> Result<(), JsValue> {
    quiz_stop();
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
    let mut last = js_sys::Date::now();
    let callback = Closure::wrap(Box::new(move || {
        let now = js_sys::Date::now();
        let dt = ((now - last) / 1000.0) as f32;
        last = now;
        quiz_tick(dt);
    }) as Box<dyn FnMut()>);

    let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        frame_ms.unwrap_or(DEFAULT_FRAME_MS),
    )?;
    FRAME_LOOP.with(|cell| {
        *cell.borrow_mut() = Some(FrameLoop {
            handle,
            _callback: callback,
        })
    });
    Ok(())
}

/// Stop the loop started by `quiz_run`.
#[wasm_bindgen]
pub fn quiz_stop() {
    let previous = FRAME_LOOP.with(|cell| cell.borrow_mut().take());
    if let (Some(frame_loop), Some(window)) = (previous, web_sys::window()) {
        window.clear_interval_with_handle(frame_loop.handle);
    }
}

// ---- Read-only accessors ----

#[wasm_bindgen]
pub fn quiz_score() -> u32 {
    with_runner(|r| r.score()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn quiz_seconds_remaining() -> u32 {
    with_runner(|r| r.seconds_remaining()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn quiz_current_element() -> String {
    with_runner(|r| r.current_element()).unwrap_or_default()
}
