//! Test doubles for the DOM capability traits and the timer scheduler.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::dom::{Attributes, ClassList, InlineStyle, Markup, Reflow};
use crate::form::{InquiryForm, Notice};
use crate::timer::Scheduler;
use crate::transition::Navigator;

#[derive(Default, Debug)]
struct ElementState {
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    style_log: Vec<(String, String)>,
    attributes: BTreeMap<String, String>,
    html: String,
    reflows: usize,
}

/// Shared-state element; clones observe the same element.
#[derive(Clone, Default, Debug)]
pub struct FakeElement(Rc<RefCell<ElementState>>);

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl FakeElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classes(classes: &[&str]) -> Self {
        let element = Self::new();
        for class in classes {
            element.add_class(class);
        }
        element
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute_value(name, value);
        self
    }

    pub fn with_html(self, html: &str) -> Self {
        self.0.borrow_mut().html = html.to_string();
        self
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().styles.get(property).cloned()
    }

    /// Every `set_style` call in order.
    pub fn style_log(&self) -> Vec<(String, String)> {
        self.0.borrow().style_log.clone()
    }

    pub fn reflows(&self) -> usize {
        self.0.borrow().reflows
    }
}

impl ClassList for FakeElement {
    fn add_class(&self, name: &str) {
        self.0.borrow_mut().classes.insert(name.to_string());
    }

    fn remove_class(&self, name: &str) {
        self.0.borrow_mut().classes.remove(name);
    }

    fn has_class(&self, name: &str) -> bool {
        self.0.borrow().classes.contains(name)
    }
}

impl InlineStyle for FakeElement {
    fn set_style(&self, property: &str, value: &str) {
        let mut state = self.0.borrow_mut();
        state.styles.insert(property.to_string(), value.to_string());
        state.style_log.push((property.to_string(), value.to_string()));
    }
}

impl Attributes for FakeElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn set_attribute_value(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }
}

impl Markup for FakeElement {
    fn inner_html(&self) -> String {
        self.0.borrow().html.clone()
    }

    fn replace_inner_html(&self, html: &str) {
        self.0.borrow_mut().html = html.to_string();
    }
}

impl Reflow for FakeElement {
    fn force_reflow(&self) {
        self.0.borrow_mut().reflows += 1;
    }
}

/// Records navigations and notices instead of performing them.
#[derive(Clone, Default, Debug)]
pub struct Recorder(Rc<RefCell<Vec<String>>>);

impl Recorder {
    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

impl Navigator for Recorder {
    fn navigate(&self, href: &str) {
        self.0.borrow_mut().push(href.to_string());
    }
}

impl Notice for Recorder {
    fn notify(&self, message: &str) {
        self.0.borrow_mut().push(message.to_string());
    }
}

#[derive(Clone, Default, Debug)]
pub struct FakeForm {
    resets: Rc<Cell<usize>>,
}

impl FakeForm {
    pub fn resets(&self) -> usize {
        self.resets.get()
    }
}

impl InquiryForm for FakeForm {
    fn reset(&self) {
        self.resets.set(self.resets.get() + 1);
    }
}

enum Job {
    Once(Box<dyn FnOnce()>),
    Every(Box<dyn FnMut()>, u64),
}

struct Task {
    due: u64,
    seq: u64,
    cancelled: Rc<Cell<bool>>,
    job: Job,
}

#[derive(Default)]
struct Clock {
    now: u64,
    next_seq: u64,
    tasks: Vec<Task>,
}

/// Virtual-clock scheduler; nothing fires until [`ManualScheduler::advance`].
#[derive(Clone, Default)]
pub struct ManualScheduler(Rc<RefCell<Clock>>);

pub struct ManualTimer(Rc<Cell<bool>>);

impl Drop for ManualTimer {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.0
            .borrow()
            .tasks
            .iter()
            .filter(|task| !task.cancelled.get())
            .count()
    }

    fn push(&self, due_in: u64, job: Job) -> ManualTimer {
        let cancelled = Rc::new(Cell::new(false));
        let mut clock = self.0.borrow_mut();
        let task = Task {
            due: clock.now + due_in,
            seq: clock.next_seq,
            cancelled: cancelled.clone(),
            job,
        };
        clock.next_seq += 1;
        clock.tasks.push(task);
        ManualTimer(cancelled)
    }

    /// Moves the clock forward, running every timer that falls due on the way
    /// in due order.
    pub fn advance(&self, millis: u64) {
        let target = self.0.borrow().now + millis;
        loop {
            let task = {
                let mut clock = self.0.borrow_mut();
                clock.tasks.retain(|task| !task.cancelled.get());
                let next = clock
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, task)| task.due <= target)
                    .min_by_key(|(_, task)| (task.due, task.seq))
                    .map(|(index, _)| index);
                match next {
                    Some(index) => {
                        let task = clock.tasks.remove(index);
                        clock.now = task.due;
                        task
                    }
                    None => {
                        clock.now = target;
                        return;
                    }
                }
            };
            match task.job {
                Job::Once(callback) => callback(),
                Job::Every(mut callback, period) => {
                    callback();
                    if !task.cancelled.get() {
                        let mut clock = self.0.borrow_mut();
                        let seq = clock.next_seq;
                        clock.next_seq += 1;
                        clock.tasks.push(Task {
                            due: task.due + period,
                            seq,
                            cancelled: task.cancelled,
                            job: Job::Every(callback, period),
                        });
                    }
                }
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTimer;

    fn once(&self, millis: u32, callback: Box<dyn FnOnce()>) -> ManualTimer {
        self.push(u64::from(millis), Job::Once(callback))
    }

    fn every(&self, millis: u32, callback: Box<dyn FnMut()>) -> ManualTimer {
        let period = u64::from(millis.max(1));
        self.push(period, Job::Every(callback, period))
    }
}
