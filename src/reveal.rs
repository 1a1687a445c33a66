use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::SiteConfig;
use crate::dom::{self, ClassList, InlineStyle};
use crate::error::Result;

pub const SECTION_SELECTOR: &str = "section";
/// Layout roles whose background must show immediately.
pub const ALWAYS_VISIBLE: [&str; 2] = ["hero", "sub-visual"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    AlwaysVisible,
    Hidden,
    Revealed,
}

pub struct RevealAnimator<E> {
    sections: Vec<(E, Reveal)>,
}

impl<E: ClassList + InlineStyle> RevealAnimator<E> {
    /// Classifies the sections and applies their starting styles.
    pub fn new(sections: Vec<E>, config: &SiteConfig) -> Self {
        let sections = sections
            .into_iter()
            .map(|section| {
                if ALWAYS_VISIBLE.iter().any(|role| section.has_class(role)) {
                    show(&section);
                    (section, Reveal::AlwaysVisible)
                } else {
                    section.set_style("opacity", "0");
                    section.set_style("transform", &config.reveal_offset);
                    section.set_style("transition", &config.reveal_transition);
                    (section, Reveal::Hidden)
                }
            })
            .collect();
        Self { sections }
    }

    pub fn state(&self, index: usize) -> Option<Reveal> {
        self.sections.get(index).map(|(_, state)| *state)
    }

    /// Sections that need an intersection watcher.
    pub fn revealable(&self) -> impl Iterator<Item = &E> {
        self.sections
            .iter()
            .filter(|(_, state)| *state != Reveal::AlwaysVisible)
            .map(|(section, _)| section)
    }

    /// Returns true when this call revealed the section.
    pub fn on_intersect(&mut self, index: usize, is_intersecting: bool) -> bool {
        match self.sections.get_mut(index) {
            Some((section, state @ Reveal::Hidden)) if is_intersecting => {
                show(&*section);
                *state = Reveal::Revealed;
                true
            }
            _ => false,
        }
    }

    pub fn position_of(&self, target: &E) -> Option<usize>
    where
        E: PartialEq,
    {
        self.sections.iter().position(|(section, _)| section == target)
    }
}

fn show<E: InlineStyle>(section: &E) {
    section.set_style("opacity", "1");
    section.set_style("transform", "translateY(0)");
}

/// Live intersection watcher; disconnects on drop.
pub struct RevealHandle {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array)>,
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub fn mount(document: &Document, config: &SiteConfig) -> Result<RevealHandle> {
    let sections = dom::select_all(document, SECTION_SELECTOR)?;
    let animator = Rc::new(RefCell::new(RevealAnimator::new(sections, config)));

    let callback = {
        let animator = animator.clone();
        Closure::wrap(Box::new(move |entries: Array| {
            let mut animator = animator.borrow_mut();
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target: Element = entry.target();
                if let Some(index) = animator.position_of(&target) {
                    animator.on_intersect(index, entry.is_intersecting());
                }
            }
        }) as Box<dyn FnMut(Array)>)
    };

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(config.reveal_threshold));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    for section in animator.borrow().revealable() {
        observer.observe(section);
    }

    Ok(RevealHandle {
        observer,
        _callback: callback,
    })
}
