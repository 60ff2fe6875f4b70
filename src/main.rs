//! Goora entry point
//!
//! Mounts the race scene in the browser, or runs a headless demo natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{DeviceOrientationEvent, Document, Element, MouseEvent, PageTransitionEvent};

    use goora::audio::AudioManager;
    use goora::consts::*;
    use goora::platform::{IntervalHandle, ListenerHandle};
    use goora::renderer::{JsSceneRenderer, SceneRenderer};
    use goora::sim::{Difficulty, QuestionBank, QuizPhase, QuizSession};
    use goora::{CountdownCommand, Race, Settings};

    // iOS only delivers orientation events after an explicit permission prompt,
    // which must be triggered from a user gesture.
    #[wasm_bindgen(inline_js = "
        export function request_orientation_permission() {
            const doe = window.DeviceOrientationEvent;
            if (doe && typeof doe.requestPermission === 'function') {
                doe.requestPermission()
                    .then(state => console.log('Orientation permission:', state))
                    .catch(e => console.warn('Orientation permission failed:', e));
            }
        }
    ")]
    extern "C" {
        fn request_orientation_permission();
    }

    thread_local! {
        static SCENE: RefCell<Option<Scene>> = const { RefCell::new(None) };
    }

    struct Game {
        race: Race<AudioManager>,
        renderer: JsSceneRenderer,
        settings: Settings,
        countdown: Option<IntervalHandle>,
        /// Question index whose answer buttons are currently in the DOM
        rendered_question: Option<usize>,
    }

    /// A mounted scene. Dropping it releases every listener and timer.
    struct Scene {
        game: Rc<RefCell<Game>>,
        _listeners: Vec<ListenerHandle>,
        _camera: Option<IntervalHandle>,
    }

    impl Drop for Scene {
        fn drop(&mut self) {
            let mut g = self.game.borrow_mut();
            g.countdown = None;
            g.race.cues_mut().stop_drone();
            log::info!("Scene torn down");
        }
    }

    impl Scene {
        fn mount(document: &Document, game: Game) -> Self {
            let game = Rc::new(RefCell::new(game));
            let mut listeners = Vec::new();

            let window = web_sys::window();
            let has_sensor = window.as_ref().is_some_and(|w| {
                js_sys::Reflect::has(w, &JsValue::from_str("DeviceOrientationEvent"))
                    .unwrap_or(false)
            });
            if let (Some(window), true) = (window, has_sensor) {
                let g = game.clone();
                listeners.extend(ListenerHandle::attach(
                    &window,
                    "deviceorientation",
                    move |event: DeviceOrientationEvent| {
                        g.borrow_mut().race.on_tilt(event.gamma());
                    },
                ));
            } else {
                log::warn!("No orientation sensor - steering disabled");
            }

            listeners.extend(setup_difficulty_buttons(document, game.clone()));
            listeners.extend(setup_answer_buttons(document, game.clone()));
            listeners.extend(setup_restart_button(document, game.clone()));
            listeners.extend(setup_mute_button(document, game.clone()));

            let camera = {
                let g = game.clone();
                IntervalHandle::start(CAMERA_TICK_MS, move || {
                    let mut g = g.borrow_mut();
                    g.race.camera_tick();
                    let frame = g.race.frame();
                    g.renderer.present(&frame);
                })
            };

            let initial = game.borrow().race.initial_countdown();
            apply_countdown(&game, initial);
            refresh(&game);

            log::info!("Scene mounted");
            Self {
                game,
                _listeners: listeners,
                _camera: camera,
            }
        }
    }

    /// Acquire or release the countdown task
    fn apply_countdown(game: &Rc<RefCell<Game>>, command: Option<CountdownCommand>) {
        match command {
            Some(CountdownCommand::Start) => {
                let weak = Rc::downgrade(game);
                let handle = IntervalHandle::start(COUNTDOWN_TICK_MS, move || {
                    if let Some(game) = weak.upgrade() {
                        let command = game.borrow_mut().race.countdown_tick();
                        apply_countdown(&game, command);
                        refresh(&game);
                    }
                });
                // Replacing the handle clears any previous interval
                game.borrow_mut().countdown = handle;
            }
            Some(CountdownCommand::Stop) => {
                let stopped = game.borrow_mut().countdown.take();
                drop(stopped);
            }
            None => {}
        }
    }

    fn refresh(game: &Rc<RefCell<Game>>) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            update_hud(&document, &mut game.borrow_mut());
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Sync DOM with quiz state
    fn update_hud(document: &Document, game: &mut Game) {
        let quiz = game.race.quiz();
        let phase = quiz.phase();

        set_visible(document, "difficulty-screen", phase == QuizPhase::AwaitingDifficulty);
        set_visible(document, "quiz", phase == QuizPhase::Playing);
        set_visible(document, "game-over", phase == QuizPhase::GameOver);

        match phase {
            QuizPhase::AwaitingDifficulty => {
                let suggested = game.settings.difficulty;
                for difficulty in Difficulty::ALL {
                    let selector = format!("[data-difficulty=\"{}\"]", difficulty.as_str());
                    if let Some(btn) = document.query_selector(&selector).ok().flatten() {
                        let _ = btn
                            .class_list()
                            .toggle_with_force("suggested", difficulty == suggested);
                    }
                }
            }
            QuizPhase::Playing => {
                set_text(document, "timer", &format!("Time left: {}s", quiz.remaining()));
                set_text(document, "streak", &quiz.streak().to_string());

                if game.rendered_question != Some(quiz.index()) {
                    let question = quiz.current_question();
                    set_text(document, "question-prompt", &question.prompt);
                    if let Some(container) = document.get_element_by_id("answer-options") {
                        container.set_inner_html("");
                        for (i, option) in question.options.iter().enumerate() {
                            let Ok(btn) = document.create_element("button") else {
                                continue;
                            };
                            btn.set_class_name("answer-btn");
                            btn.set_text_content(Some(option));
                            let _ = btn.set_attribute("data-option", &i.to_string());
                            let _ = container.append_child(&btn);
                        }
                    }
                    game.rendered_question = Some(quiz.index());
                }
            }
            QuizPhase::GameOver => {
                set_text(document, "final-streak", &quiz.streak().to_string());
                set_text(document, "best-streak", &quiz.best_streak().to_string());
            }
        }
    }

    /// Attribute value of the clicked element (or its nearest ancestor carrying it)
    fn clicked_attribute(event: &MouseEvent, attribute: &str) -> Option<String> {
        let target: Element = event.target()?.dyn_into().ok()?;
        let el = target.closest(&format!("[{}]", attribute)).ok()??;
        el.get_attribute(attribute)
    }

    fn setup_difficulty_buttons(
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Option<ListenerHandle> {
        let screen = document.get_element_by_id("difficulty-screen")?;
        ListenerHandle::attach(&screen, "click", move |event: MouseEvent| {
            let Some(difficulty) =
                clicked_attribute(&event, "data-difficulty").and_then(|d| Difficulty::parse(&d))
            else {
                return;
            };

            request_orientation_permission();
            let result = {
                let mut g = game.borrow_mut();
                g.race.cues_mut().resume();
                g.race.cues_mut().start_drone();
                let result = g.race.select_difficulty(difficulty);
                if result.is_ok() {
                    g.settings.difficulty = difficulty;
                    g.settings.save();
                }
                result
            };

            match result {
                Ok(command) => apply_countdown(&game, command),
                Err(e) => log::debug!("{}", e),
            }
            refresh(&game);
        })
    }

    fn setup_answer_buttons(
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Option<ListenerHandle> {
        let container = document.get_element_by_id("answer-options")?;
        ListenerHandle::attach(&container, "click", move |event: MouseEvent| {
            let Some(option) =
                clicked_attribute(&event, "data-option").and_then(|o| o.parse::<usize>().ok())
            else {
                return;
            };
            let command = game.borrow_mut().race.submit_answer(option);
            apply_countdown(&game, command);
            refresh(&game);
        })
    }

    fn setup_restart_button(
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Option<ListenerHandle> {
        let btn = document.get_element_by_id("restart-btn")?;
        ListenerHandle::attach(&btn, "click", move |_event: MouseEvent| {
            let result = game.borrow_mut().race.restart();
            match result {
                Ok(command) => apply_countdown(&game, command),
                Err(e) => log::debug!("{}", e),
            }
            refresh(&game);
        })
    }

    fn setup_mute_button(
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Option<ListenerHandle> {
        let btn = document.get_element_by_id("mute-btn")?;
        let label = btn.clone();
        ListenerHandle::attach(&btn, "click", move |_event: MouseEvent| {
            let mut g = game.borrow_mut();
            let audio = g.race.cues_mut();
            let muted = !audio.is_muted();
            audio.set_muted(muted);
            label.set_text_content(Some(if muted { "Unmute" } else { "Mute" }));
            let _ = label.class_list().toggle_with_force("muted", muted);
            log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        })
    }

    /// Build a fresh game and mount it as the live scene
    fn mount_scene(document: &Document) {
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let bank = QuestionBank::builtin().shuffled(seed);
        log::info!("Loaded {} questions (seed {})", bank.len(), seed);

        if let Some(btn) = document.get_element_by_id("mute-btn") {
            btn.set_text_content(Some("Mute"));
            let _ = btn.class_list().remove_1("muted");
        }

        let game = Game {
            race: Race::new(QuizSession::new(bank), AudioManager::new()),
            renderer: JsSceneRenderer::default(),
            settings,
            countdown: None,
            rendered_question: None,
        };
        let scene = Scene::mount(document, game);
        SCENE.with(|s| *s.borrow_mut() = Some(scene));
    }

    fn teardown() {
        let scene = SCENE.with(|s| s.borrow_mut().take());
        drop(scene);
    }

    /// Page restored from the back/forward cache after `pagehide` tore it down
    fn remount(event: PageTransitionEvent) {
        if !event.persisted() || SCENE.with(|s| s.borrow().is_some()) {
            return;
        }
        log::info!("Page restored from cache, remounting scene");
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            mount_scene(&document);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Goora starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        mount_scene(&document);

        // The page is going away: release every task the scene holds
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| teardown());
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();

        // ...and coming back from the back/forward cache
        let closure = Closure::<dyn FnMut(PageTransitionEvent)>::new(remount);
        let _ = window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
        closure.forget();

        log::info!("Goora running!");
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
    log::info!("Goora (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(7);
    demo::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use goora::audio::CueLog;
    use goora::renderer::NullRenderer;
    use goora::sim::{Cue, QuestionBank, QuizPhase, QuizSession};
    use goora::{HeadlessRace, Race, Settings};

    const FRAME_MS: f64 = 16.0;
    /// Scripted player answers once every 1.5s
    const ANSWER_EVERY_FRAMES: u32 = 94;
    const ROUNDS: u32 = 3;

    /// Drive a headless race with a tilt sweep and a scripted answerer
    pub fn run(seed: u64) {
        let settings = Settings::load();
        let bank = QuestionBank::builtin().shuffled(seed);
        let quiz = QuizSession::with_difficulty(bank, settings.difficulty);
        let mut race = HeadlessRace::mount(Race::new(quiz, CueLog::default()), NullRenderer::default());
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut rounds = 1;
        let mut frame = 0u32;
        loop {
            frame += 1;
            let t = frame as f64 * FRAME_MS / 1000.0;
            race.on_tilt(Some(30.0 * (t * 1.3).sin()));
            race.advance(FRAME_MS);

            let quiz = race.race().quiz();
            if quiz.phase() == QuizPhase::GameOver {
                log::info!(
                    "Round {} over after {} correct (car at x = {:.2})",
                    rounds,
                    quiz.streak(),
                    race.race().car().position().x
                );
                if rounds == ROUNDS {
                    break;
                }
                rounds += 1;
                if let Err(e) = race.restart() {
                    log::error!("{}", e);
                    break;
                }
                continue;
            }

            if frame % ANSWER_EVERY_FRAMES == 0 {
                let question = quiz.current_question();
                let option = if rng.random_bool(0.8) {
                    question.answer
                } else {
                    (question.answer + 1) % question.options.len().max(1)
                };
                log::info!("Q: {} -> {}", question.prompt, question.options[option]);
                race.submit_answer(option);
            }
        }

        race.teardown();
        let cues = race.race().cues();
        println!(
            "\n{} rounds on {}: {} correct, {} wrong, best streak {}, {} frames",
            ROUNDS,
            settings.difficulty.label(),
            cues.count(Cue::Correct),
            cues.count(Cue::Wrong),
            race.race().quiz().best_streak(),
            race.renderer().frames
        );
    }
}
