//! Brickout entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use brickout::consts::*;
    use brickout::renderer::{RenderState, build_scene};
    use brickout::sim::{GameState, Screen, TickInput, tick};
    use brickout::{AudioManager, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        audio: AudioManager,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Cleared by Escape; the frame loop stops requesting frames
        running: bool,
        show_fps: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: &Settings) -> Self {
            Self {
                state: GameState::with_settings(seed, settings),
                audio: AudioManager::with_settings(settings),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                running: true,
                show_fps: settings.show_fps,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                self.audio.set_muted(self.state.muted);
                self.audio.play_events(&self.state.events);

                // Clear one-shot inputs after processing
                self.input.action = false;
                self.input.fire = false;
                self.input.toggle_mute = false;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(&self.state);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let state = &self.state;
            let playing = state.screen == Screen::Playing;

            set_visible(document, "hud", playing);
            set_text(document, "hud-score", &format!("Score: {}", state.score));
            set_text(document, "hud-lives", &format!("Lives: {}", state.lives));
            set_text(document, "hud-level", &format!("Level: {}", state.level_number()));

            set_visible(document, "hud-fps", self.show_fps);
            if self.show_fps {
                set_text(document, "hud-fps", &format!("{} FPS", self.fps));
            }

            match &state.message {
                Some(message) => {
                    set_text(document, "message", &message.text);
                    set_visible(document, "message", true);
                }
                None => set_visible(document, "message", false),
            }

            set_visible(document, "title-screen", state.screen == Screen::TitleScreen);

            let banner = match state.screen {
                Screen::GameOver => Some("GAME OVER"),
                Screen::YouWin => Some("YOU WIN!"),
                Screen::TitleScreen | Screen::Playing => None,
            };
            set_visible(document, "end-screen", banner.is_some());
            if let Some(text) = banner {
                set_text(document, "end-title", text);
                set_text(document, "final-score", &state.score.to_string());
            }

            // Mute indicator only on the menu screens
            set_visible(document, "mute-indicator", state.muted && !playing);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Brickout starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let settings = Settings::default();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, &settings)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device, running without rendering: {}", e),
        }

        setup_input_handlers(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Brickout running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Key down: held movement plus one-shot actions
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let repeat = event.repeat();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = true,
                    "ArrowRight" | "d" | "D" => g.input.right = true,
                    " " => {
                        event.prevent_default();
                        g.input.action_held = true;
                        if !repeat {
                            g.input.action = true;
                        }
                    }
                    "f" | "F" if !repeat => g.input.fire = true,
                    "m" | "M" if !repeat => g.input.toggle_mute = true,
                    "i" | "I" if !repeat => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    "Escape" => {
                        g.running = false;
                        log::info!("Quit requested, stopping game loop");
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release held keys
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = false,
                    "ArrowRight" | "d" | "D" => g.input.right = false,
                    " " => g.input.action_held = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            if !g.running {
                return;
            }

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Ten minutes of simulated play
#[cfg(not(target_arch = "wasm32"))]
const DEMO_TICK_LIMIT: u64 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_SEED: u64 = 0xB41C;

/// Headless autoplay demo
///
/// Usage: `brickout [settings.json] [seed]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use brickout::sim::{GameEvent, GameState, Screen, TickInput, tick};
    use brickout::{AudioManager, Settings};

    env_logger::init();
    log::info!("Brickout (native) starting headless autoplay...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => load_settings(&path),
        None => Settings::default(),
    };
    let seed = match args.next() {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            log::warn!("Invalid seed {:?} ({}), using {}", raw, e, DEFAULT_SEED);
            DEFAULT_SEED
        }),
        None => DEFAULT_SEED,
    };

    let mut state = GameState::with_settings(seed, &settings);
    let audio = AudioManager::with_settings(&settings);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    log::info!(
        "Seed {}, particle cap {}, audio {}",
        state.seed,
        state.max_particles,
        if audio.is_available() { "on" } else { "off" }
    );

    while state.time_ticks < DEMO_TICK_LIMIT {
        tick(&mut state, &input);
        audio.play_events(&state.events);

        for event in &state.events {
            if let GameEvent::LevelStarted(n) = event {
                log::info!("Reached level {} at tick {}", n, state.time_ticks);
            }
        }

        if state.time_ticks % (60 * 30) == 0 {
            log::info!(
                "t={}s level={} score={} lives={} bricks={}",
                state.time_ticks / 60,
                state.level_number(),
                state.score,
                state.lives,
                state.bricks.len()
            );
        }

        if matches!(state.screen, Screen::GameOver | Screen::YouWin) {
            break;
        }
    }

    let outcome = match state.screen {
        Screen::GameOver => "game over",
        Screen::YouWin => "all levels cleared",
        Screen::TitleScreen | Screen::Playing => "time limit reached",
    };
    println!(
        "seed {}: {} after {} ticks: level {}, score {}, lives {}",
        state.seed,
        outcome,
        state.time_ticks,
        state.level_number(),
        state.score,
        state.lives
    );
}

/// Read settings from a JSON file, falling back to defaults on any error
#[cfg(not(target_arch = "wasm32"))]
fn load_settings(path: &str) -> brickout::Settings {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Could not read settings {}: {}, using defaults", path, e);
            return brickout::Settings::default();
        }
    };
    match brickout::Settings::from_json(&json) {
        Ok(settings) => {
            log::info!("Loaded settings from {}", path);
            settings
        }
        Err(e) => {
            log::error!("Invalid settings {}: {}, using defaults", path, e);
            brickout::Settings::default()
        }
    }
}
