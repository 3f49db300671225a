//! Kaspa Flap entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlInputElement, KeyboardEvent};

    use kaspa_flap::audio::AudioManager;
    use kaspa_flap::consts::*;
    use kaspa_flap::identifier::abbreviate;
    use kaspa_flap::leaderboard::{LeaderboardView, ViewStatus, report_score};
    use kaspa_flap::platform::FetchReporter;
    use kaspa_flap::renderer::{RenderState, scene};
    use kaspa_flap::settings::Settings;
    use kaspa_flap::sim::{GamePhase, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        audio: AudioManager,
        settings: Settings,
        /// Shared with in-flight score reports
        leaderboard: Rc<RefCell<LeaderboardView>>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Phase seen by the last HUD update
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64, width: u32, height: u32, settings: Settings) -> Self {
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                state: GameState::new(seed, width as f32, height as f32),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                audio,
                settings,
                leaderboard: Rc::new(RefCell::new(LeaderboardView::new())),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Idle,
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

                // Clear one-shot inputs after processing
                self.input.flap = false;
            }

            let events = self.state.drain_events();
            self.audio.play_events(&events);
            self.dispatch_submission();

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

        /// Hand a finished run's score to the reporter task
        fn dispatch_submission(&mut self) {
            let Some(submission) = self.state.take_submission() else {
                return;
            };
            let ticket = self.leaderboard.borrow_mut().begin_loading();
            render_leaderboard(&self.leaderboard.borrow());

            let view = self.leaderboard.clone();
            let reporter = FetchReporter::from_settings(&self.settings);
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = report_score(&reporter, &submission).await;
                let mut view = view.borrow_mut();
                if view.apply(ticket, outcome) {
                    render_leaderboard(&view);
                    render_rank(view.rank_of(&submission.identifier));
                }
            });
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = scene(&self.state);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
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
        fn update_hud(&mut self) {
            let Some(document) = current_document() else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.best.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                set_hidden(&el, !self.settings.show_fps);
                if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                    val.set_text_content(Some(&self.fps.to_string()));
                }
            }

            let phase = self.state.phase;
            if phase == self.last_phase {
                return;
            }
            self.last_phase = phase;

            if let Some(el) = document.get_element_by_id("playScreen") {
                set_hidden(&el, phase != GamePhase::Idle);
            }
            if let Some(el) = document.get_element_by_id("playAgainButton") {
                set_hidden(&el, phase != GamePhase::Ended);
            }
            if let Some(el) = document.get_element_by_id("finalScore") {
                if phase == GamePhase::Ended {
                    el.set_text_content(Some(&format!("Final Score: {}", self.state.score)));
                } else {
                    el.set_text_content(None);
                }
            }
        }

        /// Take the settings and push them to audio
        fn apply_settings(&mut self, settings: Settings) {
            self.audio.apply_settings(&settings);
            self.settings = settings;
        }

        fn resize(&mut self, width: u32, height: u32) {
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
            self.state.resize(width as f32, height as f32);
        }
    }

    fn current_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_hidden(el: &web_sys::Element, hidden: bool) {
        let classes = el.class_list();
        let _ = if hidden {
            classes.add_1("hidden")
        } else {
            classes.remove_1("hidden")
        };
    }

    fn set_display(document: &Document, id: &str, visible: bool) {
        let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let _ = el
            .style()
            .set_property("display", if visible { "inline" } else { "none" });
    }

    /// Redraw the leaderboard list and its page controls
    fn render_leaderboard(view: &LeaderboardView) {
        let Some(document) = current_document() else {
            return;
        };
        let Some(list) = document.get_element_by_id("leaderboard") else {
            return;
        };
        list.set_inner_html("");

        match &view.status {
            ViewStatus::Hidden => {}
            ViewStatus::Loading => list.set_text_content(Some("Submitting score...")),
            ViewStatus::Failed(msg) => list.set_text_content(Some(msg)),
            ViewStatus::Ready => {
                for (rank, entry) in view.page_entries() {
                    if let Ok(row) = document.create_element("div") {
                        row.set_text_content(Some(&format!(
                            "{}. {}: {}",
                            rank,
                            abbreviate(&entry.identifier),
                            entry.score
                        )));
                        let _ = list.append_child(&row);
                    }
                }
            }
        }

        let ready = view.status == ViewStatus::Ready;
        set_display(&document, "prevButton", ready && view.has_prev());
        set_display(&document, "nextButton", ready && view.has_next());

        if let Some(el) = document.get_element_by_id("leaderboardPage") {
            if ready {
                let text = format!("Page {} of {}", view.page() + 1, view.page_count());
                el.set_text_content(Some(&text));
            } else {
                el.set_text_content(None);
            }
        }
    }

    /// Show where the player's run landed on the board
    fn render_rank(rank: Option<usize>) {
        let Some(el) = current_document().and_then(|d| d.get_element_by_id("playerRank")) else {
            return;
        };
        match rank {
            Some(rank) => el.set_text_content(Some(&format!("Your rank: #{}", rank))),
            None => el.set_text_content(None),
        }
    }

    /// Canvas size in device pixels for the current viewport
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("No graphics adapter available: {}", e);
                return None;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                None
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger unavailable: {}", e).into());
        }

        log::info!("Kaspa Flap starting...");

        let Some(document) = current_document() else {
            log::error!("No document; nothing to run in");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            set_hidden(&loading, true);
        }

        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        let (width, height) = fit_canvas(&canvas);

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(seed, width, height, settings)));

        log::info!("Game initialized with seed: {}", seed);

        match init_renderer(&canvas, width, height).await {
            Some(render_state) => game.borrow_mut().render_state = Some(render_state),
            None => log::warn!("Rendering disabled; HUD only"),
        }

        setup_wallet_form(game.clone());
        setup_buttons(game.clone());
        setup_input_handlers(&canvas, game.clone());
        setup_resize(canvas, game.clone());
        setup_focus_mute(game.clone());

        render_leaderboard(&game.borrow().leaderboard.borrow());

        request_animation_frame(game);

        log::info!("Kaspa Flap running!");
    }

    fn setup_wallet_form(game: Rc<RefCell<Game>>) {
        let Some(document) = current_document() else {
            return;
        };
        let Some(form) = document.get_element_by_id("walletForm") else {
            log::warn!("No #walletForm element");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            let Some(document) = current_document() else {
                return;
            };
            let raw = document
                .get_element_by_id("walletAddress")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.value())
                .unwrap_or_default();

            let result = game
                .borrow_mut()
                .state
                .submit_identifier(&raw)
                .map(|id| id.abbreviated());

            let error_el = document.get_element_by_id("walletError");
            match result {
                Ok(short) => {
                    log::info!("Playing as {}", short);
                    if let Some(el) = &error_el {
                        el.set_text_content(None);
                    }
                    if let Some(el) = document.get_element_by_id("walletForm") {
                        set_hidden(&el, true);
                    }
                    if let Some(el) = document.get_element_by_id("playScreen") {
                        set_hidden(&el, false);
                    }
                }
                Err(e) => {
                    log::info!("Identifier refused: {}", e);
                    if let Some(el) = &error_el {
                        el.set_text_content(Some(&e.to_string()));
                    }
                }
            }
        });
        let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = current_document() else {
            return;
        };

        // Play
        if let Some(btn) = document.get_element_by_id("playButton") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.accumulator = 0.0;
                if let Err(e) = g.state.start() {
                    log::warn!("Cannot start: {}", e);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Play again
        if let Some(btn) = document.get_element_by_id("playAgainButton") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.accumulator = 0.0;
                g.input = TickInput::default();
                match g.state.restart() {
                    Ok(()) => {
                        let mut view = g.leaderboard.borrow_mut();
                        view.reset();
                        render_leaderboard(&view);
                        render_rank(None);
                    }
                    Err(e) => log::warn!("Cannot restart: {}", e),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Leaderboard paging
        for (id, forward) in [("prevButton", false), ("nextButton", true)] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let view = game.borrow().leaderboard.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut view = view.borrow_mut();
                let moved = if forward {
                    view.next_page()
                } else {
                    view.prev_page()
                };
                if moved {
                    render_leaderboard(&view);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mute toggle
        if let Some(btn) = document.get_element_by_id("muteButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                let mut settings = g.settings.clone();
                settings.muted = !settings.muted;
                settings.save();
                g.apply_settings(settings);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Click and tap flap
        for event_name in ["mousedown", "touchstart"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if g.state.is_playing() {
                    event.prevent_default();
                    g.input.flap = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: space / up arrow flap
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if !g.state.is_playing() {
                    return;
                }
                match event.code().as_str() {
                    "Space" | "ArrowUp" | "KeyW" => {
                        event.prevent_default();
                        g.input.flap = true;
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = fit_canvas(&canvas);
            game.borrow_mut().resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_focus_mute(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_suspended(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus back restores the saved mute state
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_suspended(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
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
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless demo: the autopilot plays one run and the result is logged
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use kaspa_flap::sim::{GameState, TickInput, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Kaspa Flap (native) starting...");
    log::info!("The playable build targets wasm32 - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);
    let mut state = GameState::new(seed, 450.0, 800.0);
    if let Err(e) = state.submit_identifier("kaspa:demo") {
        log::error!("Demo identifier refused: {}", e);
        return;
    }
    if let Err(e) = state.start() {
        log::error!("Demo run refused: {}", e);
        return;
    }

    let input = TickInput {
        flap: false,
        autopilot: true,
    };
    // Ten minutes of simulated play at most
    let max_ticks = 60 * 60 * 10;
    while state.is_playing() && state.time_ticks < max_ticks {
        tick(&mut state, &input);
    }

    log::info!(
        "Demo run finished in phase {} with score {} after {} ticks",
        state.phase,
        state.score,
        state.time_ticks
    );
    if let Some(submission) = state.take_submission() {
        match serde_json::to_string(&submission) {
            Ok(json) => log::info!("Would submit: {}", json),
            Err(e) => log::warn!("Could not encode submission: {}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
