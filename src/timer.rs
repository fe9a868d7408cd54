//! A repeating task on a fixed period, with a cooperative cancel handle.
//!
//! Everything runs on the calling thread: [`Interval::run`] waits one period, invokes the task,
//! and repeats until the task (or anyone holding a [`CancelHandle`]) cancels it. Exactly one
//! invocation is in flight at a time.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

pub trait Clock {
    fn sleep(&mut self, period: Duration);
}

/// Blocks the thread for each period.
#[derive(Debug, Default, Copy, Clone)]
pub struct WallClock;

impl Clock for WallClock {
    fn sleep(&mut self, period: Duration) {
        std::thread::sleep(period);
    }
}

/// Never blocks; only keeps track of how much time would have passed.
#[derive(Debug, Default, Copy, Clone)]
pub struct VirtualClock {
    elapsed: Duration,
}

impl VirtualClock {
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Clock for VirtualClock {
    fn sleep(&mut self, period: Duration) {
        self.elapsed += period;
    }
}

#[derive(Debug, Default, Clone)]
pub struct CancelHandle(Rc<Cell<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug)]
pub struct Interval<C> {
    period: Duration,
    clock: C,
    cancel: CancelHandle,
}

impl<C: Clock> Interval<C> {
    pub fn new(period: Duration, clock: C) -> Self {
        Interval {
            period,
            clock,
            cancel: CancelHandle::default(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Runs `task` once per period until cancelled. Returns the number of invocations.
    ///
    /// If the handle is already cancelled, `task` is never called.
    pub fn run<F: FnMut(&CancelHandle)>(&mut self, mut task: F) -> u64 {
        let mut ticks = 0;
        while !self.cancel.is_cancelled() {
            self.clock.sleep(self.period);
            task(&self.cancel);
            ticks += 1;
        }
        ticks
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_runs_until_cancelled() {
        let mut interval = Interval::new(Duration::from_millis(33), VirtualClock::default());
        let mut calls = 0;
        let ticks = interval.run(|cancel| {
            calls += 1;
            if calls == 5 {
                cancel.cancel();
            }
        });
        assert_eq!(ticks, 5);
        assert_eq!(calls, 5);
        assert_eq!(interval.clock().elapsed(), Duration::from_millis(165));
    }

    #[test]
    fn test_cancelled_before_start() {
        let mut interval = Interval::new(Duration::from_millis(13), VirtualClock::default());
        interval.cancel_handle().cancel();
        let ticks = interval.run(|_| panic!("task ran after cancel"));
        assert_eq!(ticks, 0);
        assert_eq!(interval.clock().elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_external_handle() {
        let mut interval = Interval::new(Duration::from_millis(1), VirtualClock::default());
        let handle = interval.cancel_handle();
        let mut calls = 0;
        interval.run(|_| {
            calls += 1;
            if calls == 3 {
                handle.cancel();
            }
        });
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_wall_clock_sleeps() {
        let start = std::time::Instant::now();
        WallClock.sleep(Duration::from_millis(5));
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
