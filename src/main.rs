//! Horse Corral entry point
//!
//! Mounts the herd into the page on the web, or runs a headless session
//! natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlElement, HtmlImageElement, PageTransitionEvent, PointerEvent,
    };

    use horse_corral::Settings;
    use horse_corral::platform::web::{DomLayout, ElementCapture, IntervalTimer};
    use horse_corral::platform::{Layout, LayoutSource, NoCapture, PointerCapture};
    use horse_corral::sim::{
        Herd, PointerSample, ReleaseOutcome, Ticker, cancel, drag_to, grab, release, rescale,
        resize, tick,
    };

    const CONTAINER_ID: &str = "corral";
    const BARN_ID: &str = "barn";
    const DEFAULT_HORSE_SRC: &str = "horse.png";
    const PLACEHOLDER_SRC: &str = concat!(
        "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 72 72'%3E",
        "%3Ctext x='8' y='54' font-size='52'%3E%F0%9F%90%B4%3C/text%3E%3C/svg%3E",
    );

    /// One horse element and the listeners bound to it
    struct Horse {
        id: u32,
        el: HtmlElement,
        on_down: Closure<dyn FnMut(PointerEvent)>,
        on_error: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl Drop for Horse {
        fn drop(&mut self) {
            let _ = self.el.remove_event_listener_with_callback(
                "pointerdown",
                self.on_down.as_ref().unchecked_ref(),
            );
            let _ = self.el.remove_event_listener_with_callback(
                "error",
                self.on_error.as_ref().unchecked_ref(),
            );
            self.el.remove();
        }
    }

    /// Game instance holding all state
    struct Game {
        herd: Herd,
        layout: DomLayout,
        /// Whether bounds come from a real measurement yet
        measured: bool,
        ticker: Ticker,
        timer: Option<IntervalTimer>,
        document: Document,
        container: Element,
        horse_src: String,
        /// Horse elements in actor id order
        horses: Vec<Horse>,
    }

    impl Game {
        fn horse_element(&self, id: u32) -> Option<&HtmlElement> {
            self.horses.iter().find(|h| h.id == id).map(|h| &h.el)
        }

        /// True when the DOM no longer matches the actor ids (after a reset)
        fn needs_rebuild(&self) -> bool {
            self.horses.len() != self.herd.actors().len()
                || self
                    .horses
                    .iter()
                    .zip(self.herd.actors())
                    .any(|(horse, actor)| horse.id != actor.id)
        }

        /// Measure the corral and fit the herd's bounds to it
        fn measure(&mut self) -> Layout {
            let layout = self.layout.layout();
            if let Some(container) = layout.container {
                if self.measured {
                    resize(&mut self.herd, container.size());
                } else {
                    rescale(&mut self.herd, container.size());
                    self.measured = true;
                }
            }
            layout
        }

        fn on_timer(&mut self) {
            let steps = self.ticker.advance(js_sys::Date::now());
            // No box yet (corral hidden): motion waits
            if self.measure().container.is_none() {
                return;
            }
            for _ in 0..steps {
                tick(&mut self.herd);
            }
            if steps > 0 {
                self.render();
            }
        }

        fn on_resize(&mut self) {
            if self.measure().container.is_some() {
                self.render();
            }
        }

        /// Push positions and flags into the DOM
        fn render(&self) {
            let held = self.herd.held_id();
            for view in self.herd.views() {
                let Some(el) = self.horse_element(view.id) else {
                    continue;
                };
                let _ = el.style().set_property(
                    "transform",
                    &format!("translate({:.1}px, {:.1}px)", view.x, view.y),
                );
                let classes = el.class_list();
                let _ = classes.toggle_with_force("contained", view.contained);
                let _ = classes.toggle_with_force("held", held == Some(view.id));
            }

            if let Some(overlay) = self.document.get_element_by_id("win-overlay") {
                let _ = overlay
                    .class_list()
                    .toggle_with_force("hidden", !self.herd.won());
            }
        }

        fn start_drag(&mut self, id: u32, sample: PointerSample, target: &Element) {
            let container = self.measure().container;
            if grab(&mut self.herd, id, sample, container, &ElementCapture(target)) {
                self.render();
            }
        }

        fn continue_drag(&mut self, sample: PointerSample) {
            if self.herd.held_id().is_none() {
                return;
            }
            let container = self.measure().container;
            drag_to(&mut self.herd, sample, container);
            self.render();
        }

        /// Pointer-up or pointer-cancel from the holding pointer
        fn finish_drag(&mut self, sample: PointerSample, is_cancel: bool) {
            let Some(held) = self.herd.held_id() else {
                return;
            };
            let layout = self.measure();
            let target = self.horse_element(held).cloned();
            let outcome = match target {
                Some(el) => {
                    let capture = ElementCapture(&el);
                    end(&mut self.herd, sample, layout, &capture, is_cancel)
                }
                None => end(&mut self.herd, sample, layout, &NoCapture, is_cancel),
            };
            if outcome.is_some() {
                self.render();
            }
        }
    }

    fn end(
        herd: &mut Herd,
        sample: PointerSample,
        layout: Layout,
        capture: &impl PointerCapture,
        is_cancel: bool,
    ) -> Option<ReleaseOutcome> {
        if is_cancel {
            cancel(herd, sample, layout, capture)
        } else {
            release(herd, sample, layout, capture)
        }
    }

    fn pointer_sample(event: &PointerEvent) -> PointerSample {
        PointerSample::new(
            event.pointer_id(),
            event.client_x() as f32,
            event.client_y() as f32,
        )
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Horse Corral starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let Some(container) = document.get_element_by_id(CONTAINER_ID) else {
            log::error!("No #{} element to mount into", CONTAINER_ID);
            return;
        };

        let settings = Settings::load();
        let layout = DomLayout::new(document.clone(), CONTAINER_ID, BARN_ID);
        let seed = js_sys::Date::now() as u64;
        let (herd, measured) = match layout.layout().container {
            Some(rect) => (Herd::new(settings.clone(), seed, rect.size()), true),
            None => {
                log::info!("Corral not laid out yet, spawning against the fallback size");
                (Herd::with_fallback_container(settings.clone(), seed), false)
            }
        };
        log::info!("Herd spawned with seed: {}", seed);

        let horse_src = container
            .get_attribute("data-horse-src")
            .unwrap_or_else(|| DEFAULT_HORSE_SRC.to_string());

        let game = Rc::new(RefCell::new(Game {
            herd,
            layout,
            measured,
            ticker: Ticker::new(settings.tick_interval_ms),
            timer: None,
            document: document.clone(),
            container: container.clone(),
            horse_src,
            horses: Vec::new(),
        }));

        if let Err(e) = sync_horses(&game) {
            log::error!("Failed to create horse elements: {:?}", e);
        }

        setup_pointer_handlers(&container, game.clone());
        setup_resize(game.clone());
        setup_play_again(&document, game.clone());

        start_timer(&game);
        setup_page_lifecycle(game.clone());

        game.borrow_mut().on_resize();
        game.borrow().render();
        log::info!("Horse Corral running!");
    }

    /// (Re)start the motion timer; replaces any running one
    fn start_timer(game: &Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let interval = game.borrow().herd.settings.tick_interval_ms;
        let timer = {
            let game = game.clone();
            IntervalTimer::start(&window, interval, move || {
                game.borrow_mut().on_timer();
            })
        };
        let mut g = game.borrow_mut();
        g.ticker.clear();
        g.timer = timer;
    }

    /// Recreate one `<img>` per actor if the actor ids changed
    fn sync_horses(game: &Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let mut g = game.borrow_mut();
        if !g.needs_rebuild() {
            return Ok(());
        }

        // Dropping a horse detaches its listeners and removes the element
        g.horses.clear();

        let ids: Vec<u32> = g.herd.actors().iter().map(|a| a.id).collect();
        for id in ids {
            let horse = create_horse(&g.document, &g.horse_src, id, game.clone())?;
            g.container.append_child(&horse.el)?;
            g.horses.push(horse);
        }
        Ok(())
    }

    fn create_horse(
        document: &Document,
        src: &str,
        id: u32,
        game: Rc<RefCell<Game>>,
    ) -> Result<Horse, JsValue> {
        let img: HtmlImageElement = document.create_element("img")?.dyn_into()?;
        img.set_class_name("horse");
        img.set_alt("horse");
        img.set_draggable(false);
        img.set_attribute("data-horse-id", &id.to_string())?;

        // Swap in the placeholder once if the asset is missing
        let on_error = {
            let img = img.clone();
            Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if img.src() != PLACEHOLDER_SRC {
                    log::warn!("Horse image failed to load, using placeholder");
                    img.set_src(PLACEHOLDER_SRC);
                }
            })
        };
        img.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())?;

        let on_down = {
            let target: Element = img.clone().into();
            Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut()
                    .start_drag(id, pointer_sample(&event), &target);
            })
        };
        img.add_event_listener_with_callback("pointerdown", on_down.as_ref().unchecked_ref())?;

        img.set_src(src);
        Ok(Horse {
            id,
            el: img.into(),
            on_down,
            on_error,
        })
    }

    fn setup_pointer_handlers(container: &Element, game: Rc<RefCell<Game>>) {
        // Pointer move - follow while holding
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                game.borrow_mut().continue_drag(pointer_sample(&event));
            });
            let _ = container
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up / cancel - drop the horse
        for (name, is_cancel) in [("pointerup", false), ("pointercancel", true)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                game.borrow_mut()
                    .finish_drag(pointer_sample(&event), is_cancel);
            });
            let _ =
                container.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().on_resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_play_again(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id("play-again-btn") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let seed = js_sys::Date::now() as u64;
            {
                let mut g = game.borrow_mut();
                g.herd.restart(seed);
                g.ticker.clear();
            }
            if let Err(e) = sync_horses(&game) {
                log::error!("Failed to rebuild horse elements: {:?}", e);
            }
            game.borrow().render();
            log::info!("Herd restarted with seed: {}", seed);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop the motion timer when the page is hidden or unloaded, and start
    /// it again if the page comes back from the back/forward cache
    fn setup_page_lifecycle(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let timer = game.borrow_mut().timer.take();
                drop(timer);
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                if event.persisted() && game.borrow().timer.is_none() {
                    log::info!("Page restored from cache, restarting motion timer");
                    start_timer(&game);
                }
            });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use horse_corral::Settings;
    use horse_corral::platform::{Layout, NoCapture};
    use horse_corral::sim::{Herd, PointerSample, Rect, drag_to, grab, release, tick};

    /// Let the herd wander, then carry every horse into the barn
    pub fn run() {
        let settings = Settings::load();
        let size = settings.fallback_container;
        let container = Rect::new(0.0, 0.0, size.x, size.y);
        let barn = Rect::from_edges(300.0, 200.0, 380.0, 340.0);
        let layout = Layout {
            container: Some(container),
            barn: Some(barn),
        };

        let mut herd = Herd::new(settings, 2024, container.size());
        for _ in 0..120 {
            tick(&mut herd);
        }

        let half = herd.footprint() * 0.5;
        let ids: Vec<u32> = herd.actors().iter().map(|a| a.id).collect();
        for (pointer_id, id) in (1..).zip(ids) {
            let Some(grip) = herd.actor(id).map(|a| a.pos + half) else {
                continue;
            };
            let drop_at: Vec2 = barn.center();

            grab(
                &mut herd,
                id,
                PointerSample::new(pointer_id, grip.x, grip.y),
                layout.container,
                &NoCapture,
            );
            drag_to(
                &mut herd,
                PointerSample::new(pointer_id, drop_at.x, drop_at.y),
                layout.container,
            );
            tick(&mut herd);
            let outcome = release(
                &mut herd,
                PointerSample::new(pointer_id, drop_at.x, drop_at.y),
                layout,
                &NoCapture,
            );
            log::info!("Horse {}: {:?}", id, outcome);
        }

        println!(
            "Corralled {}/{} horses after {} ticks, won: {}",
            herd.contained_count(),
            herd.actors().len(),
            herd.time_ticks,
            herd.won()
        );
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
    log::info!("Horse Corral (native) starting...");
    log::info!("Native mode runs a headless session - run with `trunk serve` for the web version");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
