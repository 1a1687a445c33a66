//! Fade-out before same-site navigation, and repair of the fade state when
//! the page becomes visible again (including bfcache restores).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, MouseEvent, PageTransitionEvent, Window};

use crate::config::SiteConfig;
use crate::dom::{self, ClassList, InlineStyle, Reflow};
use crate::error::{Result, SiteError};
use crate::listener::EventListener;
use crate::timer::{BrowserScheduler, Scheduler};

pub const FADE_OUT_CLASS: &str = "fade-out";
pub const FADE_DURATION_PROPERTY: &str = "--page-fade-duration";

pub trait Navigator {
    fn navigate(&self, href: &str);
}

impl Navigator for Window {
    fn navigate(&self, href: &str) {
        let _ = self.location().set_href(href);
    }
}

/// Why a click was left to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    NoHref,
    NewContext,
    External,
    NotPageFile,
    CurrentPage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkClick<'a> {
    pub href: Option<&'a str>,
    pub target: Option<&'a str>,
    /// A modifier key or a non-primary button was involved.
    pub modified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    Intercept,
    PassThrough(PassReason),
}

/// True for hrefs with a URL scheme or a protocol-relative host.
pub fn is_external(href: &str) -> bool {
    if href.starts_with("//") {
        return true;
    }
    match href.split_once(':') {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && !scheme.contains('/')
                && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// `_blank` and named targets open elsewhere; `_self`, `_parent`, `_top`
/// and an empty target stay here.
pub fn opens_new_context(target: Option<&str>) -> bool {
    match target.map(str::trim) {
        None | Some("") => false,
        Some(target) if target.eq_ignore_ascii_case("_blank") => true,
        Some(target) => !target.starts_with('_'),
    }
}

pub fn classify(click: &LinkClick<'_>, current_path: &str, page_suffix: &str) -> LinkAction {
    let Some(href) = click.href else {
        return LinkAction::PassThrough(PassReason::NoHref);
    };
    if click.modified || opens_new_context(click.target) {
        LinkAction::PassThrough(PassReason::NewContext)
    } else if is_external(href) {
        LinkAction::PassThrough(PassReason::External)
    } else if !href.ends_with(page_suffix) {
        LinkAction::PassThrough(PassReason::NotPageFile)
    } else if href == current_path {
        LinkAction::PassThrough(PassReason::CurrentPage)
    } else {
        LinkAction::Intercept
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    Transitioning { href: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    PassThrough(PassReason),
    Deferred { href: String, delay_ms: u32 },
    /// A navigation is already pending; this click is swallowed.
    Suppressed,
}

impl ClickOutcome {
    pub fn prevents_default(&self) -> bool {
        !matches!(self, ClickOutcome::PassThrough(_))
    }
}

pub struct TransitionController<B, N, S: Scheduler> {
    body: B,
    navigator: N,
    scheduler: S,
    current_path: String,
    page_suffix: String,
    delay_ms: u32,
    entrance_animation: String,
    destination: Option<String>,
    /// Set while the navigation timer is armed; the timer clears it as it
    /// fires.
    armed: Rc<Cell<bool>>,
    pending: Option<S::Handle>,
}

impl<B, N, S> TransitionController<B, N, S>
where
    B: ClassList + InlineStyle + Reflow,
    N: Navigator + Clone + 'static,
    S: Scheduler,
{
    pub fn new(
        body: B,
        navigator: N,
        scheduler: S,
        current_path: impl Into<String>,
        config: &SiteConfig,
    ) -> Self {
        // a reload can land on a body that still carries the flag
        body.remove_class(FADE_OUT_CLASS);
        body.set_style(FADE_DURATION_PROPERTY, &config.fade_duration_css());
        Self {
            body,
            navigator,
            scheduler,
            current_path: current_path.into(),
            page_suffix: config.page_suffix.clone(),
            delay_ms: config.transition_delay_ms,
            entrance_animation: config.entrance_animation.clone(),
            destination: None,
            armed: Rc::new(Cell::new(false)),
            pending: None,
        }
    }

    /// Transitioning only while the navigation timer has not fired yet. The
    /// fade class stays on after it fires; the next page show clears it.
    pub fn state(&self) -> TransitionState {
        match &self.destination {
            Some(href) if self.armed.get() => TransitionState::Transitioning {
                href: href.clone(),
            },
            _ => TransitionState::Idle,
        }
    }

    pub fn on_click(&mut self, click: &LinkClick<'_>) -> ClickOutcome {
        if let LinkAction::PassThrough(reason) =
            classify(click, &self.current_path, &self.page_suffix)
        {
            return ClickOutcome::PassThrough(reason);
        }
        if self.armed.get() {
            return ClickOutcome::Suppressed;
        }

        let href = click.href.unwrap_or_default().to_string();
        debug!("Deferring navigation to {} by {}ms", href, self.delay_ms);
        self.body.add_class(FADE_OUT_CLASS);

        let navigator = self.navigator.clone();
        let destination = href.clone();
        let armed = self.armed.clone();
        armed.set(true);
        self.pending = Some(self.scheduler.once(
            self.delay_ms,
            Box::new(move || {
                armed.set(false);
                navigator.navigate(&destination);
            }),
        ));
        self.destination = Some(href.clone());
        ClickOutcome::Deferred {
            href,
            delay_ms: self.delay_ms,
        }
    }

    /// The page became visible. `persisted` is set for bfcache restores.
    pub fn on_page_show(&mut self, persisted: bool) {
        if self.pending.take().is_some() {
            debug!("Dropping pending navigation on page show");
        }
        self.armed.set(false);
        self.destination = None;
        self.body.remove_class(FADE_OUT_CLASS);

        if persisted {
            debug!("Restored from bfcache, replaying entrance animation");
            self.body.set_style("animation", "none");
            self.body.force_reflow();
            self.body.set_style("animation", &self.entrance_animation);
        }
    }
}

pub type BrowserTransition = TransitionController<Element, Window, BrowserScheduler>;

pub struct TransitionHandle {
    _controller: Rc<RefCell<BrowserTransition>>,
    _listeners: Vec<EventListener>,
}

fn is_modified(event: &Event) -> bool {
    event
        .dyn_ref::<MouseEvent>()
        .map(|mouse| {
            mouse.ctrl_key()
                || mouse.meta_key()
                || mouse.shift_key()
                || mouse.alt_key()
                || mouse.button() != 0
        })
        .unwrap_or(false)
}

pub fn mount(
    window: &Window,
    document: &Document,
    current_path: &str,
    config: &SiteConfig,
) -> Result<TransitionHandle> {
    let body: Element = document
        .body()
        .ok_or(SiteError::MissingElement("body"))?
        .into();
    let controller = Rc::new(RefCell::new(TransitionController::new(
        body,
        window.clone(),
        BrowserScheduler,
        current_path,
        config,
    )));

    let mut listeners = Vec::new();
    for link in dom::select_all(document, "a")? {
        let controller = controller.clone();
        let anchor = link.clone();
        listeners.push(EventListener::new(&link, "click", move |event| {
            let href = anchor.get_attribute("href");
            let target = anchor.get_attribute("target");
            let click = LinkClick {
                href: href.as_deref(),
                target: target.as_deref(),
                modified: is_modified(&event),
            };
            if controller.borrow_mut().on_click(&click).prevents_default() {
                event.prevent_default();
            }
        })?);
    }

    let restore = controller.clone();
    listeners.push(EventListener::new(window, "pageshow", move |event| {
        let persisted = event
            .dyn_ref::<PageTransitionEvent>()
            .map(PageTransitionEvent::persisted)
            .unwrap_or(false);
        restore.borrow_mut().on_page_show(persisted);
    })?);

    Ok(TransitionHandle {
        _controller: controller,
        _listeners: listeners,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeElement, ManualScheduler, Recorder};

    type Controller = TransitionController<FakeElement, Recorder, ManualScheduler>;

    fn controller(current: &str) -> (Controller, FakeElement, Recorder, ManualScheduler) {
        let body = FakeElement::new();
        let navigator = Recorder::default();
        let scheduler = ManualScheduler::new();
        let controller = TransitionController::new(
            body.clone(),
            navigator.clone(),
            scheduler.clone(),
            current,
            &SiteConfig::default(),
        );
        (controller, body, navigator, scheduler)
    }

    fn link(href: &str) -> LinkClick<'_> {
        LinkClick {
            href: Some(href),
            ..LinkClick::default()
        }
    }

    #[test]
    fn start_clears_stale_fade_and_publishes_duration() {
        let body = FakeElement::with_classes(&[FADE_OUT_CLASS]);
        let controller: Controller = TransitionController::new(
            body.clone(),
            Recorder::default(),
            ManualScheduler::new(),
            "index.html",
            &SiteConfig::default(),
        );
        assert!(!body.has_class(FADE_OUT_CLASS));
        assert_eq!(body.style(FADE_DURATION_PROPERTY).as_deref(), Some("800ms"));
        assert_eq!(controller.state(), TransitionState::Idle);
    }

    #[test]
    fn classify_follows_link_rules() {
        let check = |click: LinkClick<'_>| classify(&click, "index.html", ".html");

        assert_eq!(check(link("about.html")), LinkAction::Intercept);
        assert_eq!(check(link("works/portfolio.html")), LinkAction::Intercept);
        assert_eq!(
            check(LinkClick::default()),
            LinkAction::PassThrough(PassReason::NoHref)
        );
        assert_eq!(
            check(link("https://example.com/page.html")),
            LinkAction::PassThrough(PassReason::External)
        );
        assert_eq!(
            check(link("//cdn.example.com/page.html")),
            LinkAction::PassThrough(PassReason::External)
        );
        assert_eq!(
            check(link("#contact")),
            LinkAction::PassThrough(PassReason::NotPageFile)
        );
        assert_eq!(
            check(link("brochure.pdf")),
            LinkAction::PassThrough(PassReason::NotPageFile)
        );
        assert_eq!(
            check(link("index.html")),
            LinkAction::PassThrough(PassReason::CurrentPage)
        );
        assert_eq!(
            check(LinkClick {
                target: Some("_blank"),
                ..link("about.html")
            }),
            LinkAction::PassThrough(PassReason::NewContext)
        );
        assert_eq!(
            check(LinkClick {
                modified: true,
                ..link("about.html")
            }),
            LinkAction::PassThrough(PassReason::NewContext)
        );
        assert_eq!(
            check(LinkClick {
                target: Some("_self"),
                ..link("about.html")
            }),
            LinkAction::Intercept
        );
    }

    #[test]
    fn scheme_detection() {
        assert!(is_external("http://a.b/c.html"));
        assert!(is_external("mailto:hello@example.com"));
        assert!(is_external("tel:+82-2-000"));
        assert!(!is_external("about.html"));
        assert!(!is_external("docs/a:b.html"));
        assert!(!is_external(":odd.html"));
    }

    #[test]
    fn target_contexts() {
        assert!(!opens_new_context(None));
        assert!(!opens_new_context(Some("")));
        assert!(!opens_new_context(Some("_self")));
        assert!(!opens_new_context(Some("_top")));
        assert!(opens_new_context(Some("_blank")));
        assert!(opens_new_context(Some("gallery")));
    }

    #[test]
    fn intercepted_click_fades_now_and_navigates_after_delay() {
        let (mut controller, body, navigator, scheduler) = controller("index.html");

        let outcome = controller.on_click(&link("about.html"));
        assert_eq!(
            outcome,
            ClickOutcome::Deferred {
                href: "about.html".into(),
                delay_ms: 800
            }
        );
        assert!(outcome.prevents_default());
        assert!(body.has_class(FADE_OUT_CLASS));
        assert_eq!(
            controller.state(),
            TransitionState::Transitioning {
                href: "about.html".into()
            }
        );

        scheduler.advance(799);
        assert!(navigator.entries().is_empty());
        scheduler.advance(1);
        assert_eq!(navigator.entries(), vec!["about.html"]);
    }

    #[test]
    fn passthrough_click_touches_nothing() {
        let (mut controller, body, navigator, scheduler) = controller("index.html");

        for href in ["https://example.com", "index.html", "#top"] {
            let outcome = controller.on_click(&link(href));
            assert!(!outcome.prevents_default());
        }
        assert!(!body.has_class(FADE_OUT_CLASS));
        assert_eq!(scheduler.pending(), 0);
        scheduler.advance(5_000);
        assert!(navigator.entries().is_empty());
    }

    #[test]
    fn second_click_while_transitioning_is_swallowed() {
        let (mut controller, _, navigator, scheduler) = controller("index.html");

        controller.on_click(&link("about.html"));
        scheduler.advance(400);
        let outcome = controller.on_click(&link("contact.html"));
        assert_eq!(outcome, ClickOutcome::Suppressed);
        assert!(outcome.prevents_default());
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance(2_000);
        assert_eq!(navigator.entries(), vec!["about.html"]);
    }

    #[test]
    fn bfcache_restore_clears_fade_and_replays_entrance() {
        let (mut controller, body, navigator, scheduler) = controller("index.html");
        controller.on_click(&link("about.html"));

        controller.on_page_show(true);

        assert!(!body.has_class(FADE_OUT_CLASS));
        assert_eq!(controller.state(), TransitionState::Idle);
        assert_eq!(body.reflows(), 1);
        let animation: Vec<String> = body
            .style_log()
            .into_iter()
            .filter(|(property, _)| property == "animation")
            .map(|(_, value)| value)
            .collect();
        assert_eq!(
            animation,
            vec!["none".to_string(), SiteConfig::default().entrance_animation]
        );

        // the pending navigation died with the restore
        scheduler.advance(2_000);
        assert!(navigator.entries().is_empty());
    }

    #[test]
    fn plain_page_show_clears_fade_without_replay() {
        let (mut controller, body, _, _) = controller("index.html");
        body.add_class(FADE_OUT_CLASS);

        controller.on_page_show(false);

        assert!(!body.has_class(FADE_OUT_CLASS));
        assert_eq!(body.reflows(), 0);
        assert!(body.style("animation").is_none());
    }

    #[test]
    fn navigation_is_possible_again_after_restore() {
        let (mut controller, _, navigator, scheduler) = controller("index.html");
        controller.on_click(&link("about.html"));
        controller.on_page_show(true);

        let outcome = controller.on_click(&link("portfolio.html"));
        assert!(matches!(outcome, ClickOutcome::Deferred { .. }));
        scheduler.advance(800);
        assert_eq!(navigator.entries(), vec!["portfolio.html"]);
    }

    #[test]
    fn fired_navigation_frees_later_clicks_but_keeps_fade() {
        let (mut controller, body, navigator, scheduler) = controller("index.html");
        controller.on_click(&link("a.html"));
        scheduler.advance(800);

        // navigation was stopped or answered without a new page
        assert_eq!(controller.state(), TransitionState::Idle);
        assert!(body.has_class(FADE_OUT_CLASS));

        let outcome = controller.on_click(&link("b.html"));
        assert!(matches!(outcome, ClickOutcome::Deferred { .. }));
        scheduler.advance(800);
        assert_eq!(navigator.entries(), vec!["a.html", "b.html"]);
    }
}
