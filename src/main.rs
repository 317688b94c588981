//! PPM Minigames entry point
//!
//! On the web, picks the game from the page (`#stage` for jump rope, `#board`
//! for card matching) and drives it from `requestAnimationFrame`. Natively,
//! runs both cores headless with scripted players.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement};

    use ppm_minigames::BestScore;
    use ppm_minigames::platform::{Action, BrowserStore, FrameClock, PendingInput, action_for_key};
    use ppm_minigames::sim::pairs::{self, PairsState, PairsView, SelectOutcome};
    use ppm_minigames::sim::rope::{self, RopeEvent, RopePhase, RopeState, RopeView};
    use ppm_minigames::sim::{PairsTuning, RopeTuning};

    fn window() -> web_sys::Window {
        web_sys::window().expect("no window")
    }

    fn document() -> Document {
        window().document().expect("no document")
    }

    fn now_ms() -> f64 {
        window().performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn html(doc: &Document, id: &str) -> Option<HtmlElement> {
        doc
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn set_text(doc: &Document, id: &str, text: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn on_click(el: &Element, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let doc = document();
        if doc.get_element_by_id("stage").is_some() {
            log::info!("Jump rope starting...");
            rope_page::start(&doc);
        } else if doc.get_element_by_id("board").is_some() {
            log::info!("Card matching starting...");
            pairs_page::start(&doc);
        } else {
            log::error!("Page has neither #stage nor #board");
        }
    }

    mod rope_page {
        use super::*;

        /// Rope game instance holding all state
        struct RopeGame {
            state: RopeState,
            clock: FrameClock,
            input: PendingInput,
            best: BestScore,
            store: BrowserStore,
            /// Outstanding animation frame, if the loop is scheduled
            frame: Option<i32>,
        }

        impl RopeGame {
            fn update(&mut self, time: f64) {
                let dt = self.clock.frame(time);
                let input = self.input.take_rope_input();
                for event in rope::tick(&mut self.state, &input, dt) {
                    match event {
                        RopeEvent::Reset => self.clock.reset(),
                        RopeEvent::GameOver { score, .. } => {
                            if self.best.record(score) {
                                self.best.save(&mut self.store);
                            }
                        }
                        _ => {}
                    }
                }
            }

            /// Keep running while the rope turns or input is waiting
            fn wants_frame(&self) -> bool {
                self.state.phase == RopePhase::Running || !self.input.is_empty()
            }
        }

        fn render(doc: &Document, view: &RopeView) {
            if let Some(rope) = doc.query_selector(".rope").ok().flatten() {
                if let Ok(rope) = rope.dyn_into::<HtmlElement>() {
                    let _ = rope
                        .style()
                        .set_property("transform", &format!("rotate({}deg)", view.angle));
                }
            }
            if let Some(player) = html(doc, "player") {
                let _ = player.style().set_property(
                    "transform",
                    &format!("translateX(-50%) translateY({}px)", -view.height),
                );
            }
            set_text(doc, "score", &view.score.to_string());
            set_text(doc, "best", &view.best.to_string());
            set_text(doc, "statusText", view.status);
            if let Some(overlay) = html(doc, "overlay") {
                overlay.set_hidden(view.overlay.is_none());
            }
            if let Some(text) = &view.overlay {
                set_text(doc, "overlayText", text);
            }
        }

        pub fn start(doc: &Document) {
            let store = BrowserStore::new();
            let best = BestScore::load(&store);
            let game = Rc::new(RefCell::new(RopeGame {
                state: RopeState::new(RopeTuning::default(), best.value),
                clock: FrameClock::default(),
                input: PendingInput::default(),
                best,
                store,
                frame: None,
            }));
            render(doc, &game.borrow().state.view());
            setup_input_handlers(doc, game);
        }

        fn push(game: &Rc<RefCell<RopeGame>>, action: Action) {
            game.borrow_mut().input.push(action);
            ensure_frame(game.clone());
        }

        fn setup_input_handlers(doc: &Document, game: Rc<RefCell<RopeGame>>) {
            // Keyboard
            {
                let game = game.clone();
                let closure =
                    Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                        if let Some(action) = action_for_key(&event.code()) {
                            event.prevent_default();
                            push(&game, action);
                        }
                    });
                let _ = doc
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            // Pointer press anywhere on the page
            {
                let game = game.clone();
                let closure =
                    Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PointerEvent| {
                        push(&game, Action::Activate);
                    });
                let _ = doc.add_event_listener_with_callback(
                    "pointerdown",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }

            if let Some(btn) = doc.get_element_by_id("restartBtn") {
                let game = game.clone();
                on_click(&btn, move |_| push(&game, Action::Reset));
            }
            if let Some(btn) = doc.get_element_by_id("overlayRestart") {
                on_click(&btn, move |_| push(&game, Action::Restart));
            }
        }

        fn ensure_frame(game: Rc<RefCell<RopeGame>>) {
            if game.borrow().frame.is_some() {
                return;
            }
            let handle = game.clone();
            let closure = Closure::once(move |time: f64| game_loop(handle, time));
            let id = window()
                .request_animation_frame(closure.as_ref().unchecked_ref())
                .ok();
            closure.forget();
            game.borrow_mut().frame = id;
        }

        fn game_loop(game: Rc<RefCell<RopeGame>>, time: f64) {
            let again = {
                let mut g = game.borrow_mut();
                g.frame = None;
                g.update(time);
                render(&document(), &g.state.view());
                g.wants_frame()
            };
            // Not rescheduled once the run ends, so a reset never races a stale frame
            if again {
                ensure_frame(game);
            }
        }
    }

    mod pairs_page {
        use super::*;

        /// Card game instance holding all state
        struct PairsGame {
            state: PairsState,
            /// Bumped on every setup so a late image preload cannot start a newer round
            setup_epoch: u64,
            frame: Option<i32>,
        }

        pub fn start(doc: &Document) {
            let game = Rc::new(RefCell::new(PairsGame {
                state: PairsState::new(PairsTuning::default(), js_sys::Date::now() as u64),
                setup_epoch: 0,
                frame: None,
            }));

            if let Some(btn) = doc.get_element_by_id("restartBtn") {
                let game = game.clone();
                on_click(&btn, move |_| setup(game.clone()));
            }
            setup(game);
        }

        fn setup(game: Rc<RefCell<PairsGame>>) {
            let epoch = {
                let mut g = game.borrow_mut();
                if let Some(id) = g.frame.take() {
                    let _ = window().cancel_animation_frame(id);
                }
                let seed = js_sys::Date::now() as u64;
                g.state.restart(seed);
                g.setup_epoch += 1;
                g.setup_epoch
            };

            let doc = document();
            build_board(&doc, &game);
            render(&doc, &game.borrow().state.view());

            wasm_bindgen_futures::spawn_local(async move {
                ppm_minigames::platform::assets::preload_images(pairs::asset_urls()).await;
                {
                    let mut g = game.borrow_mut();
                    if g.setup_epoch != epoch {
                        log::debug!("Discarding preload from an older round");
                        return;
                    }
                    pairs::assets_loaded(&mut g.state, now_ms());
                }
                ensure_frame(game);
            });
        }

        fn build_board(doc: &Document, game: &Rc<RefCell<PairsGame>>) {
            let Some(board) = doc.get_element_by_id("board") else {
                return;
            };
            board.set_inner_html("");

            let view = game.borrow().state.view();
            for (index, card) in view.cards.iter().enumerate() {
                let Ok(button) = build_card(doc, &card.id, card.key, &card.aria_label) else {
                    log::warn!("Could not create card {}", card.id);
                    continue;
                };
                let game = game.clone();
                on_click(&button, move |_| {
                    let outcome = {
                        let mut g = game.borrow_mut();
                        pairs::select(&mut g.state, index, now_ms())
                    };
                    if !matches!(outcome, SelectOutcome::Rejected(_)) {
                        render(&document(), &game.borrow().state.view());
                    }
                });
                let _ = board.append_child(&button);
            }
        }

        fn build_card(
            doc: &Document,
            id: &str,
            key: &str,
            aria_label: &str,
        ) -> Result<Element, JsValue> {
            let button = doc.create_element("button")?;
            button.set_class_name("card");
            button.set_attribute("type", "button")?;
            button.set_attribute("data-key", key)?;
            button.set_attribute("data-id", id)?;
            button.set_attribute("aria-label", aria_label)?;

            let inner = doc.create_element("div")?;
            inner.set_class_name("card-inner");

            let back = doc.create_element("div")?;
            back.set_class_name("face back has-image");
            let back_img = doc.create_element("img")?;
            back_img.set_attribute("src", pairs::CARD_BACK_URL)?;
            back_img.set_attribute("alt", "Card back")?;
            back_img.set_attribute("draggable", "false")?;
            back.append_child(&back_img)?;

            let front = doc.create_element("div")?;
            front.set_class_name("face front");
            let front_img = doc.create_element("img")?;
            front_img.set_attribute("src", &format!("/cards/{key}.png"))?;
            front_img.set_attribute("alt", &format!("{aria_label} front"))?;
            front_img.set_attribute("draggable", "false")?;
            front.append_child(&front_img)?;

            inner.append_child(&back)?;
            inner.append_child(&front)?;
            button.append_child(&inner)?;
            Ok(button)
        }

        fn render(doc: &Document, view: &PairsView) {
            if let Some(board) = doc.get_element_by_id("board") {
                let buttons = board.children();
                for (index, card) in view.cards.iter().enumerate() {
                    let Some(button) = buttons.item(index as u32) else {
                        continue;
                    };
                    let classes = button.class_list();
                    let _ = classes.toggle_with_force("flipped", card.face_up);
                    let _ = classes.toggle_with_force("matched", card.matched);
                    if card.matched {
                        let _ = button.set_attribute("disabled", "true");
                    } else {
                        let _ = button.remove_attribute("disabled");
                    }
                }
            }

            set_text(doc, "timerLabel", &view.timer_label);
            if let Some(fill) = html(doc, "timerFill") {
                let _ = fill
                    .style()
                    .set_property("transform", &format!("scaleX({})", view.ratio));
            }
            if let Some(status) = html(doc, "status") {
                status.set_text_content(view.status.as_deref());
                status.set_hidden(view.status.is_none());
                let _ = status
                    .class_list()
                    .toggle_with_force("show", view.status.is_some());
            }
        }

        fn ensure_frame(game: Rc<RefCell<PairsGame>>) {
            if game.borrow().frame.is_some() {
                return;
            }
            let handle = game.clone();
            let closure = Closure::once(move |time: f64| game_loop(handle, time));
            let id = window()
                .request_animation_frame(closure.as_ref().unchecked_ref())
                .ok();
            closure.forget();
            game.borrow_mut().frame = id;
        }

        fn game_loop(game: Rc<RefCell<PairsGame>>, time: f64) {
            let again = {
                let mut g = game.borrow_mut();
                g.frame = None;
                for event in pairs::tick(&mut g.state, time) {
                    log::debug!("{:?}", event);
                }
                render(&document(), &g.state.view());
                !g.state.phase.is_finished()
            };
            if again {
                ensure_frame(game);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("PPM Minigames (native) starting...");
    log::info!("Native mode runs scripted players - serve the web build to play");

    demo_rope();
    demo_pairs();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Jump whenever the rope is a quarter turn away, until it gets too fast
#[cfg(not(target_arch = "wasm32"))]
fn demo_rope() {
    use ppm_minigames::BestScore;
    use ppm_minigames::platform::{Action, FrameClock, MemoryStore, PendingInput};
    use ppm_minigames::sim::rope::{RopeEvent, RopePhase, RopeState, tick};
    use ppm_minigames::sim::RopeTuning;

    let mut store = MemoryStore::new();
    let mut best = BestScore::load(&store);
    let mut state = RopeState::new(RopeTuning::default(), best.value);
    let mut clock = FrameClock::default();
    let mut input = PendingInput::default();

    let frame_ms = 1000.0 / 60.0;
    input.push(Action::Restart);
    for frame in 0..60 * 120 {
        let dt = clock.frame(frame as f64 * frame_ms);
        let commands = input.take_rope_input();
        for event in tick(&mut state, &commands, dt) {
            if let RopeEvent::GameOver { score, .. } = event {
                if best.record(score) {
                    best.save(&mut store);
                }
            }
        }
        if state.phase != RopePhase::Running {
            break;
        }
        if state.player.is_grounded() && (300.0..330.0).contains(&state.rope.angle) {
            input.push(Action::Activate);
        }
    }

    println!(
        "Rope: score {} (best {}), final speed {:.0}°/s",
        state.score, best.value, state.rope.angular_vel
    );
}

/// Peek once, then play a perfect memory with one deliberate miss
#[cfg(not(target_arch = "wasm32"))]
fn demo_pairs() {
    use ppm_minigames::platform::{LoadResult, Preloader};
    use ppm_minigames::sim::PairsTuning;
    use ppm_minigames::sim::pairs::{PairsState, asset_urls, assets_loaded, select, tick};

    let tuning = PairsTuning::default();
    let mut state = PairsState::new(tuning, 2024);

    let urls = asset_urls();
    let mut preloader = Preloader::new(urls.iter().cloned());
    for (i, url) in urls.iter().enumerate() {
        // Pretend the back image is missing; setup must not care
        let result = if i + 1 == urls.len() {
            LoadResult::Failed
        } else {
            LoadResult::Loaded
        };
        if preloader.settle(url, result) {
            assets_loaded(&mut state, 0.0);
        }
    }

    let mut order: Vec<usize> = Vec::new();
    for i in 0..state.deck.len() {
        if order.contains(&i) {
            continue;
        }
        let partner = (i + 1..state.deck.len())
            .find(|&j| state.deck[j].character == state.deck[i].character);
        if let Some(j) = partner {
            order.extend([i, j]);
        }
    }
    let decoy = (1..state.deck.len()).find(|&j| state.deck[j].character != state.deck[0].character);
    if let Some(j) = decoy {
        order.splice(0..0, [0, j]);
    }

    let frame_ms = 1000.0 / 60.0;
    let pick_every_ms = 150.0;
    let mut next_pick_at = 0.0;
    let mut now = 0.0;
    let mut picks = order.into_iter();
    while !state.phase.is_finished() && now < 60_000.0 {
        now += frame_ms;
        for event in tick(&mut state, now) {
            log::info!("{:?}", event);
        }
        if state.locked || now < next_pick_at {
            continue;
        }
        if let Some(index) = picks.next() {
            log::debug!("pick {} -> {:?}", index, select(&mut state, index, now));
            next_pick_at = now + pick_every_ms;
        }
    }

    match serde_json::to_string(&state.view()) {
        Ok(json) => log::debug!("Final board: {}", json),
        Err(e) => log::warn!("Could not encode board: {}", e),
    }
    println!(
        "Pairs: {:?} with {}/{} pairs, {:.2}s left",
        state.phase,
        state.matched_pairs,
        state.total_pairs(),
        state.remaining_ms / 1000.0
    );
}
