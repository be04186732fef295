//! Code Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{AddEventListenerOptions, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use code_runner::consts::*;
    use code_runner::renderer::{self, CanvasPainter};
    use code_runner::sim::{GamePhase, GameState, LogEntry, TickInput, Viewport, tick};
    use code_runner::{HighScore, Tuning};

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Game instance holding all state
    pub(crate) struct Game {
        pub(crate) state: GameState,
        painter: CanvasPainter,
        last_time: f64,
        pub(crate) input: TickInput,
        // Track best score for persistence
        saved_high: u64,
        // Newest log entry already mirrored into the DOM
        shown_log: Option<LogEntry>,
        last_phase: GamePhase,
    }

    impl Game {
        fn new(state: GameState, painter: CanvasPainter) -> Self {
            Self {
                saved_high: state.high.best,
                last_phase: state.phase,
                state,
                painter,
                last_time: 0.0,
                input: TickInput::default(),
                shown_log: None,
            }
        }

        /// Run one simulation tick
        fn update(&mut self, dt: f32) {
            let input = self.input.clone();
            tick(&mut self.state, &input, dt);

            // Clear one-shot inputs after processing
            self.input.jump = false;
            self.input.restart = false;

            if self.state.high.best != self.saved_high {
                self.state.high.save();
                self.saved_high = self.state.high.best;
            }

            if self.state.phase != self.last_phase {
                if self.state.phase == GamePhase::GameOver {
                    // Final score may not beat the stored best but still flush it
                    self.state.high.save();
                    log::info!("Run ended with score {}", self.state.score.floor() as u64);
                }
                self.last_phase = self.state.phase;
            }
        }

        fn render(&self) {
            self.painter.paint(&renderer::build(&self.state));
        }

        /// Mirror HUD text into the DOM when the page provides the elements
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&renderer::score_text(&self.state)));
            }
            if let Some(el) = document.get_element_by_id("high") {
                el.set_text_content(Some(&renderer::high_text(&self.state)));
            }
            if let Some(el) = document.get_element_by_id("chaos-ind") {
                el.set_text_content(Some(&renderer::chaos_indicator_text(&self.state)));
            }

            let latest = self.state.log.latest().cloned();
            if latest != self.shown_log {
                if let Some(list) = document.get_element_by_id("log-list") {
                    list.set_inner_html("");
                    for entry in self.state.log.iter() {
                        if let Ok(item) = document.create_element("div") {
                            item.set_text_content(Some(&renderer::log_line(entry)));
                            let _ = list.append_child(&item);
                        }
                    }
                }
                self.shown_log = latest;
            }

            if let Some(el) = document.get_element_by_id("restart-btn") {
                let hidden = self.state.phase != GamePhase::GameOver;
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Code Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Fill the window, falling back to the default play field
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(DEFAULT_WIDTH as f64) as f32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(DEFAULT_HEIGHT as f64) as f32;
        let dpr = window.device_pixel_ratio();
        let _ = canvas
            .style()
            .set_property("width", &format!("{width}px"));
        let _ = canvas
            .style()
            .set_property("height", &format!("{height}px"));

        let painter = match CanvasPainter::new(&canvas, width, height, dpr) {
            Ok(painter) => painter,
            Err(e) => {
                log::error!("Canvas 2D unavailable: {:?}", e);
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(seed, Viewport::new(width, height), Tuning::load())
            .with_high(HighScore::load());
        log::info!("Seed: {}, best so far: {}", seed, state.high.best);

        let game = Rc::new(RefCell::new(Game::new(state, painter)));
        game.borrow_mut().state.reset();
        GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());

        request_animation_frame(game);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" | "ArrowUp" => {
                        event.prevent_default();
                        g.input.jump = true;
                    }
                    _ => match event.key().as_str() {
                        "r" | "R" => g.input.restart = true,
                        "a" | "A" => {
                            g.input.autopilot = !g.input.autopilot;
                            log::info!("Autopilot: {}", g.input.autopilot);
                        }
                        _ => {}
                    },
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (jump); non-passive so the page doesn't scroll
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.jump = true;
            });
            let options = AddEventListenerOptions::new();
            options.set_passive(false);
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        // Mouse down (jump)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.jump = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.restart = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Run `f` against the live game, if one has started
    pub(crate) fn with_game<R>(f: impl FnOnce(&mut Game) -> R) -> Option<R> {
        let game = GAME.with(|slot| slot.borrow().clone())?;
        let mut g = game.borrow_mut();
        Some(f(&mut g))
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// JSON view of the running session for the browser console
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn debug_snapshot() -> String {
    wasm_game::with_game(|g| serde_json::to_string(&g.state.snapshot()))
        .and_then(|r| r.ok())
        .unwrap_or_else(|| "null".to_string())
}

/// Force a chaos event right now (debug only)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn debug_trigger_chaos() {
    wasm_game::with_game(|g| {
        if g.state.is_running() {
            code_runner::sim::chaos::trigger_random_chaos(&mut g.state);
        }
    });
}

/// Apply and persist tuning overrides from JSON; returns false if rejected
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn debug_set_tuning(json: &str) -> bool {
    let tuning = match code_runner::Tuning::from_json(json) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::warn!("Rejected tuning override: {}", e);
            return false;
        }
    };
    tuning.save();
    wasm_game::with_game(|g| g.state.tuning = tuning).is_some()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Code Runner (native) starting...");
    log::info!("Native mode runs a headless autopilot session - use `trunk serve` to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let summary = headless::run(seed, 120.0);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use serde::Serialize;

    use code_runner::sim::{GamePhase, GameState, Snapshot, TickInput, Viewport, tick};
    use code_runner::{HighScore, Tuning};

    #[derive(Debug, Serialize)]
    pub struct Summary {
        pub seed: u64,
        pub frames: u32,
        pub final_state: Snapshot,
        pub game_over: Option<String>,
        pub log: Vec<String>,
    }

    /// Play up to `seconds` of autopilot at 60 fps, stopping at game over
    pub fn run(seed: u64, seconds: f32) -> Summary {
        let mut state = GameState::new(seed, Viewport::default(), Tuning::load())
            .with_high(HighScore::load());
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        state.reset();

        let dt = 1.0 / 60.0;
        let max_frames = (seconds / dt) as u32;
        let mut frames = 0;
        while frames < max_frames && state.phase == GamePhase::Running {
            tick(&mut state, &input, dt);
            frames += 1;
        }
        state.high.save();

        Summary {
            seed,
            frames,
            final_state: state.snapshot(),
            game_over: state
                .game_over
                .as_ref()
                .map(|info| format!("{}: {}", info.title, info.message)),
            log: state
                .log
                .iter()
                .map(code_runner::renderer::log_line)
                .collect(),
        }
    }
}
