//! Rate control for high-frequency events.
//!
//! All types here are clock-agnostic: timestamps are milliseconds supplied
//! by the caller, so tests can drive them deterministically.

/// Coalesces any number of events into one animation-frame callback.
///
/// ## Example
///
/// ```rust
/// use folio_core_fx::FrameThrottle;
///
/// let mut throttle = FrameThrottle::new();
/// let requests = (0..1000).filter(|_| throttle.trigger()).count();
/// assert_eq!(requests, 1);
///
/// let mut runs = 0;
/// throttle.run(|| runs += 1);
/// throttle.run(|| runs += 1);
/// assert_eq!(runs, 1);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameThrottle {
    pending: bool,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event.
    ///
    /// Returns `true` when the caller must request an animation frame,
    /// `false` when one is already pending.
    pub fn trigger(&mut self) -> bool {
        if self.pending {
            false
        } else {
            self.pending = true;
            true
        }
    }

    /// Run the coalesced work from the frame callback.
    ///
    /// Does nothing unless a frame is pending. The flag is cleared after
    /// `work` returns.
    pub fn run<R>(&mut self, work: impl FnOnce() -> R) -> Option<R> {
        if !self.pending {
            return None;
        }
        let result = work();
        self.pending = false;
        Some(result)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Trailing-edge debounce keeping the most recent value.
///
/// ## Example
///
/// ```rust
/// use folio_core_fx::Debouncer;
///
/// let mut search = Debouncer::new(300.0);
/// search.push(0.0, "r");
/// search.push(100.0, "ru");
/// search.push(200.0, "rust");
/// assert_eq!(search.poll(450.0), None);
/// assert_eq!(search.poll(500.0), Some("rust"));
/// assert_eq!(search.poll(900.0), None);
/// ```
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    wait_ms: f64,
    deadline: Option<f64>,
    latest: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(wait_ms: f64) -> Self {
        Self {
            wait_ms: wait_ms.max(0.0),
            deadline: None,
            latest: None,
        }
    }

    /// Record an event at `now_ms`, restarting the quiet period.
    pub fn push(&mut self, now_ms: f64, value: T) {
        self.deadline = Some(now_ms + self.wait_ms);
        self.latest = Some(value);
    }

    /// Take the latest value once the quiet period has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                self.latest.take()
            }
            _ => None,
        }
    }

    /// When the pending value becomes due, if any.
    #[inline]
    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Drop the pending value.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.latest = None;
    }
}

/// Leading-edge throttle: at most one call per `limit_ms`.
#[derive(Clone, Copy, Debug)]
pub struct RateLimiter {
    limit_ms: f64,
    open_at: Option<f64>,
}

impl RateLimiter {
    pub fn new(limit_ms: f64) -> Self {
        Self {
            limit_ms: limit_ms.max(0.0),
            open_at: None,
        }
    }

    /// Returns `true` if a call may run at `now_ms`.
    pub fn try_acquire(&mut self, now_ms: f64) -> bool {
        match self.open_at {
            Some(open_at) if now_ms < open_at => false,
            _ => {
                self.open_at = Some(now_ms + self.limit_ms);
                true
            }
        }
    }
}

/// Pointer-events change requested by [`ScrollingFlag`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvents {
    /// Set `pointer-events: none` on the body
    Disable,
    /// Restore `pointer-events: auto`
    Enable,
}

/// Body-wide "page is scrolling" flag.
///
/// Pointer events are disabled on the first scroll event of a burst and
/// enabled again once no scroll arrived for the quiet period.
#[derive(Clone, Debug)]
pub struct ScrollingFlag {
    quiet: Debouncer<()>,
    scrolling: bool,
}

impl Default for ScrollingFlag {
    fn default() -> Self {
        Self::new(150.0)
    }
}

impl ScrollingFlag {
    pub fn new(quiet_ms: f64) -> Self {
        Self {
            quiet: Debouncer::new(quiet_ms),
            scrolling: false,
        }
    }

    /// Record a scroll event.
    pub fn on_scroll(&mut self, now_ms: f64) -> Option<PointerEvents> {
        self.quiet.push(now_ms, ());
        if self.scrolling {
            None
        } else {
            self.scrolling = true;
            Some(PointerEvents::Disable)
        }
    }

    /// Check the quiet period from a timer.
    pub fn poll(&mut self, now_ms: f64) -> Option<PointerEvents> {
        self.quiet.poll(now_ms).map(|()| {
            self.scrolling = false;
            PointerEvents::Enable
        })
    }

    #[inline]
    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    #[inline]
    pub fn deadline(&self) -> Option<f64> {
        self.quiet.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousand_events_one_execution() {
        let mut throttle = FrameThrottle::new();
        let mut requested = 0;
        for _ in 0..1000 {
            if throttle.trigger() {
                requested += 1;
            }
        }
        assert_eq!(requested, 1);

        let mut executions = 0;
        assert_eq!(throttle.run(|| { executions += 1; executions }), Some(1));
        assert_eq!(executions, 1);
        assert!(!throttle.is_pending());

        // Next frame without new events does nothing
        assert_eq!(throttle.run(|| executions += 1), None);
        assert_eq!(executions, 1);

        // A new event after the frame schedules again
        assert!(throttle.trigger());
    }

    #[test]
    fn test_debouncer_restarts_on_each_push() {
        let mut d = Debouncer::new(150.0);
        d.push(0.0, 1);
        d.push(140.0, 2);
        assert_eq!(d.poll(150.0), None);
        assert_eq!(d.deadline(), Some(290.0));
        assert_eq!(d.poll(290.0), Some(2));
        assert_eq!(d.deadline(), None);
    }

    #[test]
    fn test_debouncer_cancel() {
        let mut d = Debouncer::new(10.0);
        d.push(0.0, "x");
        d.cancel();
        assert_eq!(d.poll(100.0), None);
    }

    #[test]
    fn test_rate_limiter() {
        let mut limiter = RateLimiter::new(100.0);
        assert!(limiter.try_acquire(0.0));
        assert!(!limiter.try_acquire(50.0));
        assert!(!limiter.try_acquire(99.9));
        assert!(limiter.try_acquire(100.0));
    }

    #[test]
    fn test_scrolling_flag() {
        let mut flag = ScrollingFlag::default();
        assert_eq!(flag.on_scroll(0.0), Some(PointerEvents::Disable));
        assert_eq!(flag.on_scroll(50.0), None);
        assert_eq!(flag.on_scroll(100.0), None);
        assert!(flag.is_scrolling());
        assert_eq!(flag.poll(200.0), None);
        assert_eq!(flag.poll(250.0), Some(PointerEvents::Enable));
        assert!(!flag.is_scrolling());
        assert_eq!(flag.on_scroll(300.0), Some(PointerEvents::Disable));
    }
}
