//! Sum Bubbles entry point
//!
//! The browser build wires DOM input, the round timer and the animation
//! frame loop into the simulation. The native build plays a seeded round
//! headlessly and posts the result to an in-memory leaderboard.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{AddEventListenerOptions, Element, HtmlCanvasElement, MouseEvent, TouchEvent};

    use sum_bubbles::consts::*;
    use sum_bubbles::leaderboard::FirebaseLeaderboard;
    use sum_bubbles::platform::dom::{BubbleView, Hud, element};
    use sum_bubbles::platform::ranking::RankingPanel;
    use sum_bubbles::platform::{PointerPhase, pointer_command};
    use sum_bubbles::renderer::canvas::OverlayCanvas;
    use sum_bubbles::renderer::selection_overlay;
    use sum_bubbles::settings::Settings;
    use sum_bubbles::sim::{Command, GameEvent, GameState, run_pending};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        container: Element,
        bubbles: BubbleView,
        hud: Hud,
        overlay: Option<OverlayCanvas>,
        ranking: Option<Rc<RankingPanel<FirebaseLeaderboard>>>,
        // Round timer
        clock_handle: Option<i32>,
        clock_closure: Option<Closure<dyn FnMut()>>,
    }

    impl Game {
        /// Play-area origin in client coordinates
        fn origin(&self) -> Vec2 {
            let rect = self.container.get_bounding_client_rect();
            Vec2::new(rect.left() as f32, rect.top() as f32)
        }

        fn post_pointer(&mut self, phase: PointerPhase, client: Option<Vec2>) {
            if let Some(cmd) = pointer_command(phase, client, self.origin()) {
                self.state.post(cmd);
            }
        }

        /// Sync the simulation and the canvas with the container size
        fn resize(&mut self) {
            let width = self.container.client_width().max(0);
            let height = self.container.client_height().max(0);
            if let Some(overlay) = &self.overlay {
                overlay.resize(width as u32, height as u32);
            }
            self.state.post(Command::Resize {
                width: width as f32,
                height: height as f32,
            });
        }

        fn stop_clock(&mut self) {
            if let (Some(handle), Some(window)) = (self.clock_handle.take(), web_sys::window()) {
                window.clear_interval_with_handle(handle);
            }
        }

        /// Push one event to every view
        fn present(&mut self, event: &GameEvent) {
            self.bubbles.apply(event);
            self.hud.apply(event);
            if let GameEvent::GameOver { score, .. } = event {
                self.stop_clock();
                if let Some(ranking) = &self.ranking {
                    ranking.set_last_score(*score);
                }
            }
        }

        fn render(&self) {
            if let Some(overlay) = &self.overlay {
                overlay.draw(&selection_overlay(&self.state));
            }
        }
    }

    /// Process queued commands and update the views
    fn pump(game: &Rc<RefCell<Game>>) {
        let events = {
            let mut g = game.borrow_mut();
            let events = run_pending(&mut g.state, js_sys::Date::now());
            for event in &events {
                g.present(event);
            }
            events
        };

        for event in &events {
            if let GameEvent::GameStarted { epoch, .. } = event {
                start_clock(game, *epoch);
            }
        }
    }

    /// (Re)arm the one-second timer for round `epoch`
    fn start_clock(game: &Rc<RefCell<Game>>, epoch: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut g = game.borrow_mut();
        g.stop_clock();

        let tick_game = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            tick_game.borrow_mut().state.post(Command::ClockTick { epoch });
            pump(&tick_game);
        });
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            CLOCK_INTERVAL_MS as i32,
        ) {
            Ok(handle) => g.clock_handle = Some(handle),
            Err(e) => log::error!("Failed to start timer: {:?}", e),
        }
        g.clock_closure = Some(closure);
    }

    fn random_seed() -> u64 {
        getrandom::u64().unwrap_or_else(|_| js_sys::Date::now() as u64)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Sum Bubbles starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let Some(container) = element(&document, "bubbles-container") else {
            return Err("no bubbles container".into());
        };

        let overlay = element(&document, "connection-canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .and_then(|canvas| match OverlayCanvas::new(canvas) {
                Ok(overlay) => Some(overlay),
                Err(e) => {
                    log::error!("Overlay canvas unavailable: {:?}", e);
                    None
                }
            });

        // Write back so the stored copy carries every field, sanitized
        let settings = Settings::load();
        settings.save();
        let ranking = RankingPanel::find(
            &document,
            FirebaseLeaderboard::new(settings.leaderboard_url.clone()),
        );
        if let Some(panel) = &ranking {
            panel.bind();
        }

        let seed = random_seed();
        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed, settings),
            bubbles: BubbleView::new(document.clone(), container.clone()),
            hud: Hud::find(&document),
            container: container.clone(),
            overlay,
            ranking,
            clock_handle: None,
            clock_closure: None,
        }));
        log::info!("Game initialized with seed: {}", seed);

        game.borrow_mut().resize();
        pump(&game);

        setup_input_handlers(&container, game.clone());
        setup_start_button(game.clone());
        setup_resize(game.clone());

        request_animation_frame(game);

        log::info!("Sum Bubbles running!");
        Ok(())
    }

    fn setup_input_handlers(container: &Element, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let active = AddEventListenerOptions::new();
        active.set_passive(false);

        // Mouse down - starts a gesture inside the play area
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.cancelable() {
                    event.prevent_default();
                }
                let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                game.borrow_mut().post_pointer(PointerPhase::Start, Some(client));
                pump(&game);
            });
            let _ = container.add_event_listener_with_callback_and_add_event_listener_options(
                "mousedown",
                closure.as_ref().unchecked_ref(),
                &active,
            );
            closure.forget();
        }

        // Mouse move/up - tracked on the window so drags can leave the area
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                game.borrow_mut().post_pointer(PointerPhase::Move, Some(client));
                pump(&game);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().post_pointer(PointerPhase::End, None);
                pump(&game);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if event.cancelable() {
                    event.prevent_default();
                }
                let client = event
                    .touches()
                    .get(0)
                    .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32));
                game.borrow_mut().post_pointer(PointerPhase::Start, client);
                pump(&game);
            });
            let _ = container.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &active,
            );
            closure.forget();
        }

        // Touch move - block page scrolling while dragging
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if game.borrow().state.dragging {
                    event.prevent_default();
                }
                let client = event
                    .touches()
                    .get(0)
                    .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32));
                game.borrow_mut().post_pointer(PointerPhase::Move, client);
                pump(&game);
            });
            let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
                "touchmove",
                closure.as_ref().unchecked_ref(),
                &active,
            );
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().post_pointer(PointerPhase::End, None);
                pump(&game);
            });
            let _ = window
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = element(&document, "start-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().state.post(Command::StartGame);
                pump(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
            pump(&game);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        // Releases delayed refills and fail-mark clears
        pump(&game);
        game.borrow().render();

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use sum_bubbles::consts::*;
    use sum_bubbles::leaderboard::{Leaderboard, MemoryLeaderboard, rank_rows, submit_and_refresh};
    use sum_bubbles::settings::Settings;
    use sum_bubbles::sim::{BubbleId, Command, GameEvent, GamePhase, GameState, run_pending};

    /// Play area the bot plays on
    const AREA: Vec2 = Vec2::new(600.0, 480.0);
    /// Time the bot spends per move
    const MOVE_MS: f64 = 700.0;
    /// Longest chain the bot looks for
    const MAX_CHAIN: usize = 4;

    /// Linked chain of bubbles summing to the target, if one exists
    fn find_chain(state: &GameState) -> Option<Vec<BubbleId>> {
        fn extend(state: &GameState, chain: &mut Vec<usize>, sum: u32) -> bool {
            let bubbles = state.bubbles.as_slice();
            if chain.len() >= 2 && sum == state.target {
                return true;
            }
            if chain.len() == MAX_CHAIN {
                return false;
            }
            let Some(&last) = chain.last() else {
                return false;
            };
            for (next, b) in bubbles.iter().enumerate() {
                if chain.contains(&next)
                    || sum + b.value > state.target
                    || b.pos.distance(bubbles[last].pos) > state.settings.link_distance
                {
                    continue;
                }
                chain.push(next);
                if extend(state, chain, sum + b.value) {
                    return true;
                }
                chain.pop();
            }
            false
        }

        let bubbles = state.bubbles.as_slice();
        for (start, b) in bubbles.iter().enumerate() {
            let mut chain = vec![start];
            if extend(state, &mut chain, b.value) {
                return Some(chain.into_iter().map(|i| bubbles[i].id).collect());
            }
        }
        None
    }

    /// Drag from bubble center to bubble center
    fn drag(state: &mut GameState, chain: &[BubbleId]) {
        let centers: Vec<Vec2> = chain
            .iter()
            .filter_map(|id| state.bubbles.get(*id).map(|b| b.pos))
            .collect();
        let Some((first, rest)) = centers.split_first() else {
            return;
        };
        state.post(Command::PointerDown(*first));
        for p in rest {
            state.post(Command::PointerMove(*p));
        }
        state.post(Command::PointerUp);
    }

    /// Play one round to the end. Returns (score, level).
    pub fn play(seed: u64) -> (u64, u32) {
        let mut state = GameState::new(seed, Settings::default());
        state.post(Command::Resize {
            width: AREA.x,
            height: AREA.y,
        });
        state.post(Command::StartGame);

        let mut now = 0.0;
        let mut epoch = 0;
        let mut next_tick = CLOCK_INTERVAL_MS;
        let mut matches = 0u32;

        loop {
            for event in run_pending(&mut state, now) {
                match event {
                    GameEvent::GameStarted { epoch: e, .. } => epoch = e,
                    GameEvent::MatchSucceeded { sum, gained } => {
                        matches += 1;
                        log::debug!("Match #{}: {} (+{})", matches, sum, gained);
                    }
                    GameEvent::TargetChanged(t) => log::debug!("Target {}", t),
                    GameEvent::GameOver { score, level } => {
                        log::info!("Round over: score {} at level {}", score, level);
                    }
                    _ => {}
                }
            }
            if state.phase == GamePhase::GameOver {
                break;
            }

            // Skip moves while the board refills
            if state.queue.delayed_len() == 0 {
                match find_chain(&state) {
                    Some(chain) => drag(&mut state, &chain),
                    None => log::debug!("No chain sums to {}", state.target),
                }
            }

            now += MOVE_MS;
            while next_tick <= now {
                state.post(Command::ClockTick { epoch });
                next_tick += CLOCK_INTERVAL_MS;
            }
        }

        (state.score, state.level)
    }

    /// Submit the result next to a few rival scores and print the table
    pub fn publish(score: u64) {
        let board = MemoryLeaderboard::new();
        let start = 1_700_000_000_000.0;
        for (i, (name, rival)) in [("ann", 420), ("bob", 1350), ("cat", 760)].iter().enumerate() {
            board.set_now(start + i as f64 * 3_600_000.0);
            if let Err(e) = pollster::block_on(board.push(name, *rival)) {
                log::error!("Error saving score: {}", e);
            }
        }

        let now = start + 86_400_000.0;
        board.set_now(now);
        match pollster::block_on(submit_and_refresh(&board, "demo", score)) {
            Ok(records) => {
                for row in rank_rows(&records, now) {
                    println!("#{:<3}{:<10}{:>6}  {}", row.rank, row.name, row.score, row.when);
                }
            }
            Err(e) => log::warn!("Score not saved: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sum Bubbles (native) starting...");
    log::info!("Run with `trunk serve` for the web version; playing a demo round");

    let (score, level) = demo::play(0x5eed);
    println!("Demo round: score {} (level {})", score, level);
    demo::publish(score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
