//! # folio-core-fx
//!
//! Scroll, visibility and animation core for a single-page portfolio.
//!
//! This crate provides platform-agnostic state machines for:
//! - Easing-driven value animations advanced by host frame timestamps
//! - Visibility gates that fire bindings when regions enter the viewport
//! - Frame throttling, debouncing and rate limiting of scroll/resize events
//! - Counters, skill levels and circular gauges started on visibility
//! - Navigation highlighting, parallax and keyboard navigation
//! - A typewriter headline, a persisted light/dark theme and the contact form
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for data structures
//! - `toml` - Load [`FxConfig`] from TOML
//! - `web` - Enable browser bindings (observers, animation frames, localStorage)
//!
//! ## Example
//!
//! ```rust
//! use folio_core_fx::{Command, Effect, EffectKind, FxConfig, Orchestrator, TargetId};
//!
//! let mut fx = Orchestrator::new(&FxConfig::default()).unwrap();
//! fx.register(TargetId(7), Effect::new(EffectKind::LevelFill, 90.0)).unwrap();
//!
//! // Host forwards observer entries, then drives frames while work remains
//! fx.on_visibility(TargetId(7), 0.5);
//! let mut now = 0.0;
//! let mut commands = Vec::new();
//! while fx.needs_frame() {
//!     commands.extend(fx.on_frame(now));
//!     now += 16.0;
//! }
//! assert_eq!(
//!     commands.last(),
//!     Some(&Command::SetWidthPercent { target: TargetId(7), percent: 90.0 })
//! );
//! ```

mod animation;
mod config;
mod counter;
mod easing;
mod form;
mod navigation;
mod notification;
mod orchestrator;
mod skills;
mod theme;
mod throttle;
mod typewriter;
mod visibility;
#[cfg(feature = "web")]
pub mod web;

pub use animation::{
    AnimationDriver, AnimationError, AnimationState, AnimationTask, TargetId, TaskFrame,
};
pub use config::{
    AnimationConfig, ConfigError, ContactConfig, FxConfig, RelayConfig, TypewriterConfig,
    VisibilityConfig, WatchConfig,
};
pub use counter::{
    format_counter, format_percent, parse_level, CounterProfile, CounterSuffix, GaugeFrame,
    GAUGE_RADIUS,
};
pub use easing::Easing;
pub use form::{
    is_valid_email, validate, ContactFields, ContactForm, DemoRelay, Field, FormErrors,
    MessageRelay, OutboundMessage, RelayError, SubmitButton, SubmitOutcome, ValidationReport,
    INVALID_FORM_MESSAGE,
};
pub use navigation::{
    anchor_scroll_target, nav_update, KeyboardNav, NavAction, NavKey, NavUpdate, Parallax,
    SectionBounds, ANCHOR_OFFSET, NAVBAR_SCROLLED_AT, SCROLL_TOP_VISIBLE_AT, SECTION_LEAD,
};
pub use notification::{Notification, NotificationKind, NotificationTimeline};
pub use orchestrator::{Command, Effect, EffectKind, Orchestrator, REVEAL_CLASS};
pub use skills::{
    filter_by_category, filter_by_search, skill_statistics, stagger_delay_ms, FilterResult,
    SkillEntry, ALL_CATEGORIES, SEARCH_DEBOUNCE_MS, STAGGER_STEP_MS,
};
pub use theme::{MemoryStore, PreferenceStore, StorageError, Theme, ThemeToggle, THEME_KEY};
pub use throttle::{Debouncer, FrameThrottle, PointerEvents, RateLimiter, ScrollingFlag};
pub use typewriter::{TypePhase, TypeStep, Typewriter, TypewriterError, TypewriterTimings};
pub use visibility::{
    intersection_ratio, ObserverOptions, Rect, RootMargin, RootMarginError, Visibility,
    VisibilityEvent, VisibilityGate, WatchId, WatchMode,
};

#[cfg(feature = "web")]
pub use web::{EffectHost, EmailJsRelay, LocalStorageStore, PageRelay};
