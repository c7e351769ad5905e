//! Neon Dash entry point
//!
//! Browser: wires DOM input and `requestAnimationFrame` to the run driver and
//! hands every frame to a JS presenter. Native: runs a headless autopilot demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent};

    use neon_dash::Settings;
    use neon_dash::platform::{FrameScheduler, RunDriver, Trigger};
    use neon_dash::sim::{GameEvent, GameState};

    // Presentation lives in JS; it receives one snapshot per frame
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            if (typeof window.neonDashPresent === 'function') {
                window.neonDashPresent(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
    }

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// `requestAnimationFrame` as a frame scheduler
    pub struct AnimationFrames {
        callback: FrameCallback,
    }

    impl FrameScheduler for AnimationFrames {
        type Handle = i32;

        fn request_frame(&mut self) -> i32 {
            let Some(window) = web_sys::window() else {
                return 0;
            };
            match self.callback.borrow().as_ref() {
                Some(cb) => window
                    .request_animation_frame(cb.as_ref().unchecked_ref())
                    .unwrap_or_else(|e| {
                        log::error!("requestAnimationFrame failed: {:?}", e);
                        0
                    }),
                None => 0,
            }
        }

        fn cancel_frame(&mut self, handle: i32) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    pub type Game = RunDriver<AnimationFrames>;

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Run `f` against the game, if it has been initialized
    pub fn with_game<T>(f: impl FnOnce(&mut Game) -> T) -> Option<T> {
        GAME.with(|slot| {
            slot.borrow()
                .as_ref()
                .map(|game| f(&mut game.borrow_mut()))
        })
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Dash starting...");

        let window = web_sys::window().expect("no window");
        let settings = window_settings(&window, Settings::default());
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                log::warn!("Window unusable ({}), using default world", e);
                Settings::default()
            }
        };

        let seed = js_sys::Date::now() as u64;
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = AnimationFrames {
            callback: callback.clone(),
        };
        let game = Rc::new(RefCell::new(RunDriver::new(
            GameState::with_settings(settings, seed),
            scheduler,
        )));

        {
            let game = game.clone();
            *callback.borrow_mut() = Some(Closure::new(move |_time: f64| {
                frame(&game);
            }));
        }

        setup_input_handlers(game.clone());
        GAME.with(|slot| *slot.borrow_mut() = Some(game));

        log::info!("Neon Dash ready (seed {})", seed);
    }

    /// `base` resized to the window's current inner size
    fn window_settings(window: &web_sys::Window, base: Settings) -> Settings {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(base.world_width as f64) as f32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(base.world_height as f64) as f32;
        Settings {
            world_width: width,
            world_height: height,
            ..base
        }
    }

    fn frame(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        let report = g.on_frame();

        for event in &report.events {
            if let GameEvent::ScoreChanged { score } = event {
                set_text("hud-score", &format!("{:05}", score));
            }
        }
        if let Some(score) = report.game_over {
            set_text("final-score", &score.to_string());
            if let Some(best) = g.high_scores.top_score() {
                set_text("high-score", &best.to_string());
            }
            match report.rank {
                Some(rank) => set_text("rank", &format!("#{rank}")),
                None => set_text("rank", ""),
            }
            show("game-over");
        }

        let snapshot = serde_json::to_string(&g.state.snapshot());
        // The presenter may call back into start_run/stop_run
        drop(g);
        match snapshot {
            Ok(json) => present_frame(&json),
            Err(e) => log::warn!("Snapshot serialization failed: {}", e),
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn show(id: &str) {
        if let Some(el) = element(id) {
            let _ = el.class_list().remove_1("hidden");
        }
    }

    pub fn hide(id: &str) {
        if let Some(el) = element(id) {
            let _ = el.class_list().add_1("hidden");
        }
    }

    fn element(id: &str) -> Option<web_sys::Element> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(trigger) = Trigger::from_key_code(&event.code()) {
                    event.prevent_default();
                    game.borrow_mut().input.press(trigger);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(trigger) = Trigger::from_key_code(&event.code()) {
                    game.borrow_mut().input.release(trigger);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.press(Trigger::Pointer);
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.release(Trigger::Pointer);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().input.press(Trigger::Touch);
            });
            let _ = window
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().input.release(Trigger::Touch);
            });
            let _ = window
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize: new geometry applies between runs
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let mut g = game.borrow_mut();
                let settings = window_settings(&window, g.state.settings.clone());
                if let Err(e) = g.set_world(settings) {
                    log::warn!("Ignoring resize: {}", e);
                }
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus loss drops held triggers so a missed keyup can't block jumps
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.reset();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

/// Start a run. `theme_json` is a generated theme; anything unusable falls back
/// to the built-in fallback theme. `None` replays the previous theme.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_run(theme_json: Option<String>) -> bool {
    use neon_dash::theme::{self, ThemeParameters};

    wasm_game::with_game(|g| {
        let theme = match theme_json {
            Some(json) => theme::resolve(ThemeParameters::from_json(&json)),
            None => g.state.theme().clone(),
        };
        let started = g.start(theme);
        if started {
            wasm_game::hide("game-over");
        }
        started
    })
    .unwrap_or(false)
}

/// Tear down the current run (back to menu)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop_run() {
    wasm_game::with_game(|g| g.teardown());
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn set_autopilot(enabled: bool) {
    wasm_game::with_game(|g| {
        g.input.autopilot = enabled;
        log::info!("Autopilot: {}", enabled);
    });
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn high_scores_json() -> String {
    wasm_game::with_game(|g| serde_json::to_string(&g.high_scores).unwrap_or_default())
        .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scheduler for headless runs: a request is just a counter
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct HeadlessFrames {
    requested: u64,
}

#[cfg(not(target_arch = "wasm32"))]
impl neon_dash::platform::FrameScheduler for HeadlessFrames {
    type Handle = u64;

    fn request_frame(&mut self) -> u64 {
        self.requested += 1;
        self.requested
    }

    fn cancel_frame(&mut self, _handle: u64) {}
}

/// Headless autopilot demo: `neon-dash [seed] [max_frames]`
///
/// `NEON_DASH_THEME` may point at a theme JSON file.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_dash::platform::RunDriver;
    use neon_dash::sim::GameState;
    use neon_dash::theme::{self, ThemeParameters};

    env_logger::init();
    log::info!("Neon Dash (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42u64);
    let max_frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(36_000u64);

    let theme = match std::env::var("NEON_DASH_THEME") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => theme::resolve(ThemeParameters::from_json(&json)),
            Err(e) => {
                log::warn!("Can't read theme file {}: {}", path, e);
                ThemeParameters::fallback()
            }
        },
        Err(_) => ThemeParameters::default(),
    };

    let mut driver = RunDriver::new(GameState::new(seed), HeadlessFrames::default());
    driver.input.autopilot = true;
    driver.start(theme);

    let mut final_score = None;
    while driver.is_scheduled() && driver.state.run.frame_count < max_frames {
        let report = driver.on_frame();
        if report.game_over.is_some() {
            final_score = report.game_over;
        }
    }

    let frames = driver.state.run.frame_count;
    match final_score {
        Some(score) => println!("Crashed after {frames} frames, score {score}"),
        None => println!(
            "Survived {frames} frames (x{:.1} speed), score {}",
            driver.state.run.speed_multiplier,
            driver.state.display_score()
        ),
    }
    driver.teardown();
}
