//! Time-based easing animation driver.

use crate::Easing;

/// Opaque handle to a renderable element owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetId(pub u32);

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Error type for animation requests.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Duration is zero, negative or not finite
    #[error("Invalid duration: {duration_ms}ms")]
    InvalidDuration { duration_ms: f64 },
    /// Start or end value is NaN or infinite
    #[error("Value is not finite: {value}")]
    NonFiniteValue { value: f64 },
    /// End value is below zero
    #[error("End value is negative: {value}")]
    NegativeEnd { value: f64 },
    /// The target already has a running animation
    #[error("Target {target} is already animating")]
    AlreadyAnimating { target: TargetId },
}

/// Lifecycle of a single animation task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    /// Created, no frame seen yet
    Pending,
    /// At least one frame emitted, end not reached
    Running,
    /// Terminal frame emitted
    Finished,
}

/// One emitted frame of a task.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaskFrame {
    /// Element the value belongs to
    pub target: TargetId,
    /// Interpolated value (exactly the end value on the final frame)
    pub value: f64,
    /// Linear elapsed fraction in `[0, 1]`
    pub progress: f64,
    /// True only for the terminal frame
    pub is_final: bool,
}

type FrameFn = Box<dyn FnMut(f64)>;
type CompleteFn = Box<dyn FnOnce(f64)>;

/// A single tween from `start_value` to `end_value`.
///
/// The task does not own a clock. The caller feeds it monotonic timestamps
/// (milliseconds) from its animation-frame callback through [`advance`].
/// The first timestamp becomes the start time.
///
/// [`advance`]: AnimationTask::advance
///
/// ## Example
///
/// ```rust
/// use folio_core_fx::{AnimationTask, Easing, TargetId};
///
/// let mut task = AnimationTask::new(TargetId(1), 0.0, 100.0, 2000.0, Easing::OutCubic).unwrap();
///
/// let first = task.advance(16.0).unwrap();
/// assert_eq!(first.value, 0.0);
///
/// let last = task.advance(2016.0).unwrap();
/// assert!(last.is_final);
/// assert_eq!(last.value, 100.0);
///
/// // Nothing after completion
/// assert!(task.advance(2032.0).is_none());
/// ```
pub struct AnimationTask {
    target: TargetId,
    start_value: f64,
    end_value: f64,
    duration_ms: f64,
    easing: Easing,
    /// Timestamp of the first frame
    started_at: Option<f64>,
    state: AnimationState,
    on_frame: Option<FrameFn>,
    on_complete: Option<CompleteFn>,
}

impl std::fmt::Debug for AnimationTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationTask")
            .field("target", &self.target)
            .field("start_value", &self.start_value)
            .field("end_value", &self.end_value)
            .field("duration_ms", &self.duration_ms)
            .field("easing", &self.easing)
            .field("started_at", &self.started_at)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl AnimationTask {
    /// Create a task, validating its parameters.
    pub fn new(
        target: TargetId,
        start_value: f64,
        end_value: f64,
        duration_ms: f64,
        easing: Easing,
    ) -> Result<Self, AnimationError> {
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(AnimationError::InvalidDuration { duration_ms });
        }
        if !start_value.is_finite() {
            return Err(AnimationError::NonFiniteValue { value: start_value });
        }
        if !end_value.is_finite() {
            return Err(AnimationError::NonFiniteValue { value: end_value });
        }
        if end_value < 0.0 {
            return Err(AnimationError::NegativeEnd { value: end_value });
        }

        Ok(Self {
            target,
            start_value,
            end_value,
            duration_ms,
            easing,
            started_at: None,
            state: AnimationState::Pending,
            on_frame: None,
            on_complete: None,
        })
    }

    /// Attach a per-frame callback.
    pub fn with_on_frame(mut self, on_frame: impl FnMut(f64) + 'static) -> Self {
        self.on_frame = Some(Box::new(on_frame));
        self
    }

    /// Attach a completion callback.
    ///
    /// When present it receives the end value instead of the frame callback on
    /// the terminal frame.
    pub fn with_on_complete(mut self, on_complete: impl FnOnce(f64) + 'static) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    #[inline]
    pub fn target(&self) -> TargetId {
        self.target
    }

    #[inline]
    pub fn start_value(&self) -> f64 {
        self.start_value
    }

    #[inline]
    pub fn end_value(&self) -> f64 {
        self.end_value
    }

    #[inline]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    #[inline]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Check if the terminal frame has been emitted.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state == AnimationState::Finished
    }

    /// Interpolated value at a linear progress fraction.
    pub fn value_at(&self, progress: f64) -> f64 {
        self.start_value + (self.end_value - self.start_value) * self.easing.apply(progress)
    }

    /// Advance the task to `now_ms`.
    ///
    /// Returns the emitted frame, or `None` once the task has finished.
    pub fn advance(&mut self, now_ms: f64) -> Option<TaskFrame> {
        if self.state == AnimationState::Finished {
            return None;
        }

        let started_at = *self.started_at.get_or_insert(now_ms);
        self.state = AnimationState::Running;

        let elapsed = now_ms - started_at;
        let progress = if elapsed.is_nan() {
            0.0
        } else {
            (elapsed / self.duration_ms).clamp(0.0, 1.0)
        };

        if progress >= 1.0 {
            self.state = AnimationState::Finished;
            let end = self.end_value;
            if let Some(on_complete) = self.on_complete.take() {
                on_complete(end);
            } else if let Some(on_frame) = self.on_frame.as_mut() {
                on_frame(end);
            }
            self.on_frame = None;
            return Some(TaskFrame {
                target: self.target,
                value: end,
                progress: 1.0,
                is_final: true,
            });
        }

        let value = self.value_at(progress);
        if let Some(on_frame) = self.on_frame.as_mut() {
            on_frame(value);
        }
        Some(TaskFrame {
            target: self.target,
            value,
            progress,
            is_final: false,
        })
    }
}

/// Owner of every running [`AnimationTask`].
///
/// Holds at most one task per target. The host calls [`on_frame`] from its
/// animation-frame callback and requests another frame only while
/// [`needs_frame`] is true.
///
/// [`on_frame`]: AnimationDriver::on_frame
/// [`needs_frame`]: AnimationDriver::needs_frame
///
/// ## Example
///
/// ```rust
/// use folio_core_fx::{AnimationDriver, Easing, TargetId};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let shown = Rc::new(Cell::new(0.0));
/// let sink = shown.clone();
///
/// let mut driver = AnimationDriver::new();
/// driver
///     .animate(TargetId(7), 0.0, 45.0, 1000.0, Easing::OutCubic, move |v| sink.set(v), None)
///     .unwrap();
///
/// let mut now = 0.0;
/// while driver.needs_frame() {
///     driver.on_frame(now);
///     now += 16.0;
/// }
/// assert_eq!(shown.get(), 45.0);
/// ```
#[derive(Debug, Default)]
pub struct AnimationDriver {
    tasks: Vec<AnimationTask>,
}

impl AnimationDriver {
    /// Create an empty driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and start a tween on `target`.
    ///
    /// Invalid requests are logged and rejected without scheduling anything.
    #[allow(clippy::too_many_arguments)]
    pub fn animate(
        &mut self,
        target: TargetId,
        start_value: f64,
        end_value: f64,
        duration_ms: f64,
        easing: Easing,
        on_frame: impl FnMut(f64) + 'static,
        on_complete: Option<Box<dyn FnOnce(f64)>>,
    ) -> Result<(), AnimationError> {
        let task = match AnimationTask::new(target, start_value, end_value, duration_ms, easing) {
            Ok(task) => task,
            Err(err) => {
                log::warn!("animate {}: {}", target, err);
                return Err(err);
            }
        };
        let mut task = task.with_on_frame(on_frame);
        task.on_complete = on_complete;
        self.start(task)
    }

    /// Start a prepared task.
    pub fn start(&mut self, task: AnimationTask) -> Result<(), AnimationError> {
        let target = task.target();
        if self.is_animating(target) {
            let err = AnimationError::AlreadyAnimating { target };
            log::warn!("animate {}: {}", target, err);
            return Err(err);
        }
        log::debug!(
            "animate {}: {} -> {} over {}ms",
            target,
            task.start_value(),
            task.end_value(),
            task.duration_ms()
        );
        self.tasks.push(task);
        Ok(())
    }

    /// Advance every task to `now_ms` and drop the ones that finished.
    pub fn on_frame(&mut self, now_ms: f64) -> Vec<TaskFrame> {
        let frames: Vec<TaskFrame> = self
            .tasks
            .iter_mut()
            .filter_map(|task| task.advance(now_ms))
            .collect();
        self.tasks.retain(|task| !task.is_finished());
        frames
    }

    /// Check if another animation frame should be requested.
    #[inline]
    pub fn needs_frame(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Check if `target` currently has a running task.
    pub fn is_animating(&self, target: TargetId) -> bool {
        self.tasks.iter().any(|task| task.target() == target)
    }

    /// Number of running tasks.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn run_to_end(driver: &mut AnimationDriver, step: f64) -> Vec<TaskFrame> {
        let mut frames = Vec::new();
        let mut now = 1000.0;
        while driver.needs_frame() {
            frames.extend(driver.on_frame(now));
            now += step;
        }
        frames
    }

    #[test]
    fn test_counter_reaches_exact_end() {
        let mut driver = AnimationDriver::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        driver
            .animate(
                TargetId(1),
                0.0,
                100.0,
                2000.0,
                Easing::OutCubic,
                move |v| sink.borrow_mut().push(v),
                None,
            )
            .unwrap();

        let frames = run_to_end(&mut driver, 16.7);
        let last = frames.last().unwrap();
        assert!(last.is_final);
        assert_eq!(last.value, 100.0);
        assert_eq!(*seen.borrow().last().unwrap(), 100.0);
        assert_eq!(frames.iter().filter(|f| f.is_final).count(), 1);
    }

    #[test]
    fn test_on_complete_replaces_final_frame_callback() {
        let frames = Rc::new(RefCell::new(Vec::new()));
        let completed = Rc::new(RefCell::new(None));
        let frame_sink = frames.clone();
        let done_sink = completed.clone();

        let mut driver = AnimationDriver::new();
        driver
            .animate(
                TargetId(2),
                0.0,
                10.0,
                100.0,
                Easing::Linear,
                move |v| frame_sink.borrow_mut().push(v),
                Some(Box::new(move |v| *done_sink.borrow_mut() = Some(v))),
            )
            .unwrap();

        driver.on_frame(0.0);
        driver.on_frame(50.0);
        driver.on_frame(100.0);

        assert_eq!(*frames.borrow(), vec![0.0, 5.0]);
        assert_eq!(*completed.borrow(), Some(10.0));
        assert!(!driver.needs_frame());
    }

    #[test]
    fn test_invalid_requests_are_rejected() {
        let mut driver = AnimationDriver::new();
        let noop = |_: f64| {};

        assert!(matches!(
            driver.animate(TargetId(1), 0.0, 10.0, 0.0, Easing::Linear, noop, None),
            Err(AnimationError::InvalidDuration { .. })
        ));
        assert!(matches!(
            driver.animate(TargetId(1), 0.0, f64::NAN, 10.0, Easing::Linear, noop, None),
            Err(AnimationError::NonFiniteValue { .. })
        ));
        assert!(matches!(
            driver.animate(TargetId(1), 0.0, -5.0, 10.0, Easing::Linear, noop, None),
            Err(AnimationError::NegativeEnd { .. })
        ));
        assert!(!driver.needs_frame());
    }

    #[test]
    fn test_one_task_per_target() {
        let mut driver = AnimationDriver::new();
        driver
            .animate(TargetId(3), 0.0, 10.0, 100.0, Easing::Linear, |_| {}, None)
            .unwrap();
        let second = driver.animate(TargetId(3), 0.0, 20.0, 100.0, Easing::Linear, |_| {}, None);
        assert_eq!(
            second,
            Err(AnimationError::AlreadyAnimating { target: TargetId(3) })
        );
        assert_eq!(driver.active_count(), 1);

        // Other targets are independent
        driver
            .animate(TargetId(4), 0.0, 20.0, 100.0, Easing::Linear, |_| {}, None)
            .unwrap();
        assert_eq!(driver.active_count(), 2);

        // Once finished the target may animate again
        driver.on_frame(0.0);
        driver.on_frame(100.0);
        assert!(!driver.is_animating(TargetId(3)));
        assert!(driver
            .animate(TargetId(3), 0.0, 20.0, 100.0, Easing::Linear, |_| {}, None)
            .is_ok());
    }

    #[test]
    fn test_early_timestamp_clamps_to_start() {
        let mut task = AnimationTask::new(TargetId(1), 5.0, 10.0, 100.0, Easing::Linear).unwrap();
        assert_eq!(task.advance(500.0).unwrap().value, 5.0);
        let frame = task.advance(400.0).unwrap();
        assert_eq!(frame.progress, 0.0);
        assert_eq!(frame.value, 5.0);
        assert_eq!(task.state(), AnimationState::Running);
    }

    #[test]
    fn test_single_frame_past_duration_finishes() {
        let mut task = AnimationTask::new(TargetId(1), 0.0, 75.0, 10.0, Easing::OutQuart).unwrap();
        assert!(!task.advance(0.0).unwrap().is_final);
        let last = task.advance(10_000.0).unwrap();
        assert!(last.is_final);
        assert_eq!(last.value, 75.0);
        assert!(task.is_finished());
    }

    proptest! {
        #[test]
        fn values_are_monotonic_and_end_exactly(
            end in 0.0f64..10_000.0,
            duration in 1.0f64..5_000.0,
            steps in proptest::collection::vec(0.0f64..200.0, 1..64),
        ) {
            let mut task =
                AnimationTask::new(TargetId(9), 0.0, end, duration, Easing::OutCubic).unwrap();
            let mut now = 0.0;
            let mut last = task.advance(now).unwrap().value;
            for step in steps {
                now += step;
                if let Some(frame) = task.advance(now) {
                    prop_assert!(frame.value >= last);
                    prop_assert!(frame.value <= end);
                    last = frame.value;
                }
            }
            if !task.is_finished() {
                let frame = task.advance(now + duration).unwrap();
                prop_assert!(frame.is_final);
                last = frame.value;
            }
            prop_assert_eq!(last, end);
        }
    }
}
