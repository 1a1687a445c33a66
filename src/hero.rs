use std::cell::RefCell;
use std::rc::Rc;

use web_sys::Document;

use crate::dom::{self, ClassList, ACTIVE_CLASS};
use crate::error::{Result, SiteError};
use crate::timer::{BrowserScheduler, BrowserTimer, Scheduler};

pub const SLIDE_SELECTOR: &str = ".hero-slide";

/// Circular rotation over a fixed set of slides.
pub struct HeroRotation<E> {
    slides: Vec<E>,
    current: usize,
}

impl<E: ClassList> HeroRotation<E> {
    /// `None` when there is nothing to rotate. Starts from the slide the
    /// markup marks active, else the first one.
    pub fn new(slides: Vec<E>) -> Option<Self> {
        if slides.is_empty() {
            return None;
        }
        let current = slides
            .iter()
            .position(|slide| slide.has_class(ACTIVE_CLASS))
            .unwrap_or(0);
        Some(Self { slides, current })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn advance(&mut self) -> usize {
        let next = (self.current + 1) % self.slides.len();
        for (index, slide) in self.slides.iter().enumerate() {
            slide.toggle_class(ACTIVE_CLASS, index == next);
        }
        self.current = next;
        next
    }
}

/// Rotates `slides` every `interval_ms` for as long as the returned handle
/// lives.
pub fn start<E, S>(
    slides: Vec<E>,
    scheduler: &S,
    interval_ms: u32,
) -> Option<(Rc<RefCell<HeroRotation<E>>>, S::Handle)>
where
    E: ClassList + 'static,
    S: Scheduler,
{
    let rotation = Rc::new(RefCell::new(HeroRotation::new(slides)?));
    let ticking = rotation.clone();
    let timer = scheduler.every(
        interval_ms,
        Box::new(move || {
            ticking.borrow_mut().advance();
        }),
    );
    Some((rotation, timer))
}

pub fn mount(document: &Document, interval_ms: u32) -> Result<BrowserTimer> {
    let slides = dom::select_all(document, SLIDE_SELECTOR)?;
    start(slides, &BrowserScheduler, interval_ms)
        .map(|(_, timer)| timer)
        .ok_or(SiteError::MissingElement(SLIDE_SELECTOR))
}
