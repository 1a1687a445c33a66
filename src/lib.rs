//! Page behaviour for the After Entertainment site: header scroll state, nav
//! highlighting, the inquiry form stub, reveal-on-scroll sections, fade
//! transitions between pages, the partner marquee, the hero slider and the
//! paged portfolio grid.
//!
//! Every component mounts independently; one that finds its markup missing
//! stays off without stopping the others.

use std::cell::RefCell;

use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Window};

pub mod config;
pub mod dom;
pub mod error;
pub mod form;
pub mod header;
pub mod hero;
pub mod listener;
pub mod nav;
pub mod portfolio;
pub mod reveal;
pub mod slider;
pub mod timer;
pub mod transition;

#[cfg(test)]
mod testing;

pub use config::SiteConfig;
pub use error::{Result, SiteError};

use listener::EventListener;
use portfolio::PortfolioHandle;
use reveal::RevealHandle;
use timer::BrowserTimer;
use transition::TransitionHandle;

/// Everything mounted on the current document. Dropping it removes every
/// listener, observer and timer it owns.
#[derive(Default)]
pub struct Page {
    current_path: String,
    scroll: Option<EventListener>,
    form: Option<EventListener>,
    reveal: Option<RevealHandle>,
    transition: Option<TransitionHandle>,
    hero: Option<BrowserTimer>,
    portfolio: Option<PortfolioHandle>,
}

impl Page {
    /// Names of the components that are live on this page.
    pub fn mounted(&self) -> Vec<&'static str> {
        [
            ("scroll watcher", self.scroll.is_some()),
            ("inquiry form", self.form.is_some()),
            ("reveal animator", self.reveal.is_some()),
            ("page transitions", self.transition.is_some()),
            ("hero slider", self.hero.is_some()),
            ("portfolio", self.portfolio.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, live)| live.then_some(name))
        .collect()
    }
}

thread_local! {
    static ACTIVE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

fn adopt<T>(component: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(handle) => Some(handle),
        Err(SiteError::MissingElement(selector)) => {
            debug!("{} off: `{}` not on this page", component, selector);
            None
        }
        Err(err) => {
            warn!("{} failed to start: {}", component, err);
            None
        }
    }
}

/// Mounts every component on `document`.
pub fn mount(window: &Window, document: &Document) -> Page {
    let config = SiteConfig::load(document);
    let current_path = nav::location_path(window, &config.index_document);

    if let Some(marked) = adopt("nav highlighter", nav::mount(document, &current_path)) {
        debug!("{} nav link(s) match {}", marked, current_path);
    }
    // before the link listeners, so copied anchors are intercepted too
    adopt("slider seeder", slider::mount(document));

    let page = Page {
        scroll: adopt("scroll watcher", header::mount(window, document, &config)),
        form: adopt(
            "inquiry form",
            form::mount(window, document, &config.inquiry_confirmation),
        ),
        reveal: adopt("reveal animator", reveal::mount(document, &config)),
        transition: adopt(
            "page transitions",
            transition::mount(window, document, &current_path, &config),
        ),
        hero: adopt("hero slider", hero::mount(document, config.slide_interval_ms)),
        portfolio: adopt("portfolio", portfolio::mount(window, document, &config)),
        current_path,
    };
    debug!("Mounted on {}: {:?}", page.current_path, page.mounted());
    page
}

/// `document.readyState` before the DOM has been parsed.
fn still_loading(ready_state: &str) -> bool {
    ready_state == "loading"
}

fn install(window: &Window, document: &Document) {
    stop();
    let page = mount(window, document);
    ACTIVE.with(|active| *active.borrow_mut() = Some(page));
}

/// Mounts the page now, or on `DOMContentLoaded` while the document is
/// still loading. Calling it again replaces the previous mount.
pub fn start() -> Result<()> {
    let window = web_sys::window().ok_or(SiteError::MissingElement("window"))?;
    let document = window
        .document()
        .ok_or(SiteError::MissingElement("document"))?;

    if still_loading(&document.ready_state()) {
        let target = document.clone();
        let ready = Closure::once_into_js(move || install(&window, &document));
        target.add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())?;
    } else {
        install(&window, &document);
    }
    Ok(())
}

/// Tears down the mounted page, if any.
pub fn stop() {
    let previous = ACTIVE.with(|active| active.borrow_mut().take());
    if previous.is_some() {
        debug!("Tearing down page behaviour");
    }
}
