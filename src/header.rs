use web_sys::{Document, Window};

use crate::config::SiteConfig;
use crate::dom::{self, ClassList};
use crate::error::Result;
use crate::listener::EventListener;

pub const HEADER_SELECTOR: &str = ".header";
pub const SCROLLED_CLASS: &str = "scrolled";

pub struct ScrollWatcher<E> {
    header: E,
    threshold: f64,
}

impl<E: ClassList> ScrollWatcher<E> {
    pub fn new(header: E, threshold: f64) -> Self {
        Self { header, threshold }
    }

    pub fn on_scroll(&self, offset_y: f64) {
        self.header
            .toggle_class(SCROLLED_CLASS, offset_y > self.threshold);
    }
}

pub fn mount(window: &Window, document: &Document, config: &SiteConfig) -> Result<EventListener> {
    let header = dom::select_one(document, HEADER_SELECTOR)?;
    let watcher = ScrollWatcher::new(header, config.scroll_threshold);

    // Initial check
    watcher.on_scroll(window.scroll_y().unwrap_or(0.0));

    let win = window.clone();
    EventListener::new(window, "scroll", move |_| {
        watcher.on_scroll(win.scroll_y().unwrap_or(0.0));
    })
}
