//! Viewport visibility gating.
//!
//! The gate does not compute intersections itself. The host forwards the
//! visible fraction of each watched element (from `IntersectionObserver` or
//! from [`intersection_ratio`]) and the gate turns those into one-shot or
//! toggling events.

use crate::TargetId;

/// Handle of a registered watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

/// How a watch reacts to crossings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchMode {
    /// Fire on the first entry, then unregister
    Once,
    /// Fire on every entry and exit
    Toggle,
}

/// Direction of a threshold crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Entered,
    Exited,
}

/// Event produced when a watch fires.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityEvent<T> {
    pub watch: WatchId,
    pub target: TargetId,
    pub visibility: Visibility,
    /// The binding registered with the watch
    pub payload: T,
}

#[derive(Clone, Debug)]
struct VisibilityWatch<T> {
    id: WatchId,
    target: TargetId,
    threshold: f64,
    mode: WatchMode,
    visible: bool,
    payload: T,
}

impl<T> VisibilityWatch<T> {
    fn is_visible_at(&self, ratio: f64) -> bool {
        if self.threshold <= 0.0 {
            ratio > 0.0
        } else {
            ratio >= self.threshold
        }
    }
}

/// Set of visibility watches, each carrying a payload of type `T`.
///
/// ## Example
///
/// ```rust
/// use folio_core_fx::{TargetId, Visibility, VisibilityGate, WatchMode};
///
/// let mut gate = VisibilityGate::new();
/// gate.watch(TargetId(1), 0.5, WatchMode::Once, "counter");
///
/// assert!(gate.notify(TargetId(1), 0.2).is_empty());
/// let events = gate.notify(TargetId(1), 0.6);
/// assert_eq!(events[0].visibility, Visibility::Entered);
/// assert_eq!(events[0].payload, "counter");
///
/// // Gone after firing
/// gate.notify(TargetId(1), 0.0);
/// assert!(gate.notify(TargetId(1), 1.0).is_empty());
/// assert!(gate.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct VisibilityGate<T> {
    watches: Vec<VisibilityWatch<T>>,
    next_id: u64,
}

impl<T> Default for VisibilityGate<T> {
    fn default() -> Self {
        Self {
            watches: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T: Clone> VisibilityGate<T> {
    /// Create an empty gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a watch on `target`.
    ///
    /// `threshold` is clamped into `[0, 1]`.
    pub fn watch(
        &mut self,
        target: TargetId,
        threshold: f64,
        mode: WatchMode,
        payload: T,
    ) -> WatchId {
        let id = WatchId(self.next_id);
        self.next_id += 1;
        let threshold = if threshold.is_nan() {
            0.0
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self.watches.push(VisibilityWatch {
            id,
            target,
            threshold,
            mode,
            visible: false,
            payload,
        });
        id
    }

    /// Remove a watch. Returns `false` if it was already gone.
    pub fn unwatch(&mut self, id: WatchId) -> bool {
        let before = self.watches.len();
        self.watches.retain(|w| w.id != id);
        self.watches.len() != before
    }

    /// Report the visible fraction of `target` and collect the events it causes.
    pub fn notify(&mut self, target: TargetId, ratio: f64) -> Vec<VisibilityEvent<T>> {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio };
        let mut events = Vec::new();

        for watch in self.watches.iter_mut().filter(|w| w.target == target) {
            let now_visible = watch.is_visible_at(ratio);
            if now_visible == watch.visible {
                continue;
            }
            watch.visible = now_visible;

            let visibility = if now_visible {
                Visibility::Entered
            } else {
                Visibility::Exited
            };
            events.push(VisibilityEvent {
                watch: watch.id,
                target,
                visibility,
                payload: watch.payload.clone(),
            });
        }

        // Once watches are torn down as soon as they fire
        self.watches.retain(|w| !(w.mode == WatchMode::Once && w.visible));
        events
    }

    /// Check if `target` has any live watch.
    pub fn is_watching(&self, target: TargetId) -> bool {
        self.watches.iter().any(|w| w.target == target)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.watches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }
}

/// Error type for root margin parsing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RootMarginError {
    #[error("Root margin needs 1 to 4 values, got {count}")]
    ValueCount { count: usize },
    #[error("Invalid root margin value: {value}")]
    InvalidValue { value: String },
}

/// Margins grown (positive) or shrunk (negative) around the viewport, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    /// Parse the CSS margin shorthand used by `IntersectionObserver` (`px` only).
    ///
    /// ```rust
    /// use folio_core_fx::RootMargin;
    ///
    /// let m = RootMargin::parse("0px 0px -50px 0px").unwrap();
    /// assert_eq!(m.bottom, -50.0);
    /// let m = RootMargin::parse("50px 0px").unwrap();
    /// assert_eq!((m.top, m.right, m.bottom, m.left), (50.0, 0.0, 50.0, 0.0));
    /// ```
    pub fn parse(s: &str) -> Result<Self, RootMarginError> {
        let values = s
            .split_whitespace()
            .map(|part| {
                let number = part.strip_suffix("px").unwrap_or(part);
                number
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .filter(|_| number != part || part == "0")
                    .ok_or_else(|| RootMarginError::InvalidValue {
                        value: part.to_string(),
                    })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let (top, right, bottom, left) = match values.as_slice() {
            [all] => (*all, *all, *all, *all),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => return Err(RootMarginError::ValueCount { count: values.len() }),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// CSS form accepted by `IntersectionObserverInit.rootMargin`.
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// Observer configuration for one kind of watched region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl ObserverOptions {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            root_margin: RootMargin::default(),
        }
    }

    pub fn with_root_margin(mut self, root_margin: RootMargin) -> Self {
        self.root_margin = root_margin;
        self
    }
}

/// Axis-aligned rectangle in page or viewport pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// Visible fraction of `target` inside `viewport` grown by `margin`.
///
/// A zero-area target counts as fully visible when it lies inside the
/// (grown) viewport, matching browser behaviour for empty elements.
pub fn intersection_ratio(target: Rect, viewport: Rect, margin: RootMargin) -> f64 {
    let root_left = viewport.x - margin.left;
    let root_top = viewport.y - margin.top;
    let root_right = viewport.x + viewport.width + margin.right;
    let root_bottom = viewport.y + viewport.height + margin.bottom;

    let left = target.x.max(root_left);
    let top = target.y.max(root_top);
    let right = (target.x + target.width).min(root_right);
    let bottom = (target.y + target.height).min(root_bottom);

    if right < left || bottom < top {
        return 0.0;
    }

    let area = target.area();
    if area == 0.0 {
        return 1.0;
    }
    ((right - left) * (bottom - top) / area).clamp(0.0, 1.0)
}
