use gloo_timers::callback::{Interval, Timeout};

/// Source of one-shot and repeating timers. Dropping a returned handle
/// cancels the timer.
pub trait Scheduler {
    type Handle;

    fn once(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Self::Handle;
    fn every(&self, millis: u32, callback: Box<dyn FnMut()>) -> Self::Handle;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

pub enum BrowserTimer {
    Timeout(Timeout),
    Interval(Interval),
}

impl Scheduler for BrowserScheduler {
    type Handle = BrowserTimer;

    fn once(&self, millis: u32, callback: Box<dyn FnOnce()>) -> BrowserTimer {
        BrowserTimer::Timeout(Timeout::new(millis, callback))
    }

    fn every(&self, millis: u32, mut callback: Box<dyn FnMut()>) -> BrowserTimer {
        BrowserTimer::Interval(Interval::new(millis, move || callback()))
    }
}
