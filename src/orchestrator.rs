//! Binds page regions to the visibility gate and the animation driver.
//!
//! The orchestrator never touches the DOM. It turns visibility
//! notifications and frame timestamps into [`Command`]s that the host applies.

use std::collections::HashMap;

use crate::config::{AnimationConfig, ConfigError, FxConfig};
use crate::counter::{format_counter, format_percent, parse_level, CounterProfile, GaugeFrame};
use crate::visibility::{ObserverOptions, Visibility, VisibilityGate, WatchId, WatchMode};
use crate::{AnimationDriver, AnimationError, AnimationTask, Easing, TargetId};

/// Class added to elements revealed on scroll.
pub const REVEAL_CLASS: &str = "animate-in";

/// Kind of effect bound to a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Skill bar: width and counter label
    SkillBar,
    /// Hero stat number with `+`/`%` suffix
    StatCounter,
    /// `NN%` skill level text
    LevelDisplay,
    /// Level fill width
    LevelFill,
    /// Circular gauge
    Gauge,
    /// Add the reveal class once
    Reveal,
    /// Pause decorative animations while off-screen
    Background,
}

impl EffectKind {
    pub const ALL: [EffectKind; 7] = [
        EffectKind::SkillBar,
        EffectKind::StatCounter,
        EffectKind::LevelDisplay,
        EffectKind::LevelFill,
        EffectKind::Gauge,
        EffectKind::Reveal,
        EffectKind::Background,
    ];

    /// Check if entering the viewport starts a driver task.
    pub fn is_animated(&self) -> bool {
        !matches!(self, EffectKind::Reveal | EffectKind::Background)
    }

    pub fn watch_mode(&self) -> WatchMode {
        match self {
            EffectKind::Background => WatchMode::Toggle,
            _ => WatchMode::Once,
        }
    }

    fn index(&self) -> usize {
        match self {
            EffectKind::SkillBar => 0,
            EffectKind::StatCounter => 1,
            EffectKind::LevelDisplay => 2,
            EffectKind::LevelFill => 3,
            EffectKind::Gauge => 4,
            EffectKind::Reveal => 5,
            EffectKind::Background => 6,
        }
    }

    fn profile(&self, durations: &AnimationConfig) -> CounterProfile {
        match self {
            EffectKind::SkillBar | EffectKind::StatCounter => CounterProfile {
                duration_ms: durations.counter_ms,
                easing: CounterProfile::STAT.easing,
            },
            EffectKind::LevelDisplay => CounterProfile {
                duration_ms: durations.level_display_ms,
                easing: CounterProfile::LEVEL.easing,
            },
            EffectKind::LevelFill => CounterProfile {
                duration_ms: durations.level_fill_ms,
                easing: CounterProfile::FILL.easing,
            },
            EffectKind::Gauge | EffectKind::Reveal | EffectKind::Background => CounterProfile {
                duration_ms: durations.gauge_ms,
                easing: Easing::Linear,
            },
        }
    }
}

/// An effect with its target value (level, count or percentage).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    /// Ignored by `Reveal` and `Background`
    pub value: f64,
}

impl Effect {
    pub fn new(kind: EffectKind, value: f64) -> Self {
        Self { kind, value }
    }

    pub fn reveal() -> Self {
        Self::new(EffectKind::Reveal, 0.0)
    }

    pub fn background() -> Self {
        Self::new(EffectKind::Background, 0.0)
    }

    /// Build an effect from a `data-*` attribute or text content.
    pub fn from_attribute(kind: EffectKind, raw: &str) -> Result<Self, AnimationError> {
        Ok(Self::new(kind, parse_level(raw)?))
    }

    fn check(&self) -> Result<(), AnimationError> {
        if !self.kind.is_animated() {
            return Ok(());
        }
        if !self.value.is_finite() {
            return Err(AnimationError::NonFiniteValue { value: self.value });
        }
        if self.value < 0.0 {
            return Err(AnimationError::NegativeEnd { value: self.value });
        }
        Ok(())
    }
}

/// A DOM mutation for the host to apply.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replace the element's text
    SetText { target: TargetId, text: String },
    /// Set `style.width` to a percentage
    SetWidthPercent { target: TargetId, percent: f64 },
    /// Update a circular gauge
    SetGauge { target: TargetId, frame: GaugeFrame },
    /// Add a class
    AddClass { target: TargetId, class: &'static str },
    /// Set `animation-play-state` of the element's decorations
    SetPlayState { target: TargetId, running: bool },
}

impl Command {
    pub fn target(&self) -> TargetId {
        match self {
            Command::SetText { target, .. }
            | Command::SetWidthPercent { target, .. }
            | Command::SetGauge { target, .. }
            | Command::AddClass { target, .. }
            | Command::SetPlayState { target, .. } => *target,
        }
    }
}

/// Page effect orchestrator.
///
/// ## Example
///
/// ```rust
/// use folio_core_fx::{Command, Effect, EffectKind, FxConfig, Orchestrator, TargetId};
///
/// let mut fx = Orchestrator::new(&FxConfig::default()).unwrap();
/// fx.register(TargetId(1), Effect::new(EffectKind::StatCounter, 75.0)).unwrap();
///
/// fx.on_visibility(TargetId(1), 1.0);
/// let mut last = Vec::new();
/// let mut now = 0.0;
/// while fx.needs_frame() {
///     last = fx.on_frame(now);
///     now += 16.0;
/// }
/// assert_eq!(last, vec![Command::SetText { target: TargetId(1), text: "75+".into() }]);
/// ```
#[derive(Debug)]
pub struct Orchestrator {
    gate: VisibilityGate<Effect>,
    driver: AnimationDriver,
    running: HashMap<TargetId, Effect>,
    options: [ObserverOptions; 7],
    durations: AnimationConfig,
}

impl Orchestrator {
    /// Create an orchestrator from a validated config.
    pub fn new(config: &FxConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let entries = config.visibility.entries();
        let mut options = [ObserverOptions::new(0.0); 7];
        for kind in EffectKind::ALL {
            let (field, watch) = entries[kind.index()];
            options[kind.index()] = watch.resolve(field)?;
        }
        Ok(Self {
            gate: VisibilityGate::new(),
            driver: AnimationDriver::new(),
            running: HashMap::new(),
            options,
            durations: config.animation,
        })
    }

    /// Observer configuration the host should use for `kind`.
    pub fn observer_options(&self, kind: EffectKind) -> ObserverOptions {
        self.options[kind.index()]
    }

    /// Watch `target` for `effect`.
    ///
    /// Effects with an unusable value are logged and not registered.
    pub fn register(
        &mut self,
        target: TargetId,
        effect: Effect,
    ) -> Result<WatchId, AnimationError> {
        if let Err(err) = effect.check() {
            log::warn!("register {} {:?}: {}", target, effect.kind, err);
            return Err(err);
        }
        let threshold = self.observer_options(effect.kind).threshold;
        let mode = effect.kind.watch_mode();
        Ok(self.gate.watch(target, threshold, mode, effect))
    }

    /// Number of live watches.
    pub fn watch_count(&self) -> usize {
        self.gate.len()
    }

    /// Check if `target` still has a live watch. Hosts stop observing
    /// targets once this turns false.
    pub fn is_watching(&self, target: TargetId) -> bool {
        self.gate.is_watching(target)
    }

    /// Forward an intersection ratio for `target`.
    pub fn on_visibility(&mut self, target: TargetId, ratio: f64) -> Vec<Command> {
        let mut commands = Vec::new();
        for event in self.gate.notify(target, ratio) {
            let effect = event.payload;
            match (effect.kind, event.visibility) {
                (EffectKind::Reveal, Visibility::Entered) => commands.push(Command::AddClass {
                    target,
                    class: REVEAL_CLASS,
                }),
                (EffectKind::Reveal, Visibility::Exited) => {}
                (EffectKind::Background, visibility) => commands.push(Command::SetPlayState {
                    target,
                    running: visibility == Visibility::Entered,
                }),
                (_, Visibility::Entered) => self.start(target, effect),
                (_, Visibility::Exited) => {}
            }
        }
        commands
    }

    fn start(&mut self, target: TargetId, effect: Effect) {
        let profile = effect.kind.profile(&self.durations);
        let task = AnimationTask::new(
            target,
            0.0,
            effect.value,
            profile.duration_ms,
            profile.easing,
        )
        .and_then(|task| self.driver.start(task));
        match task {
            Ok(()) => {
                self.running.insert(target, effect);
            }
            Err(err) => log::warn!("start {} {:?}: {}", target, effect.kind, err),
        }
    }

    /// Advance running animations to `now_ms`.
    pub fn on_frame(&mut self, now_ms: f64) -> Vec<Command> {
        let mut commands = Vec::new();
        for frame in self.driver.on_frame(now_ms) {
            let Some(effect) = self.running.get(&frame.target).copied() else {
                continue;
            };
            let target = frame.target;
            match effect.kind {
                EffectKind::SkillBar => {
                    commands.push(Command::SetWidthPercent {
                        target,
                        percent: frame.value,
                    });
                    commands.push(Command::SetText {
                        target,
                        text: format_counter(frame.value, effect.value),
                    });
                }
                EffectKind::StatCounter => commands.push(Command::SetText {
                    target,
                    text: format_counter(frame.value, effect.value),
                }),
                EffectKind::LevelDisplay => commands.push(Command::SetText {
                    target,
                    text: format_percent(frame.value),
                }),
                EffectKind::LevelFill => commands.push(Command::SetWidthPercent {
                    target,
                    percent: frame.value,
                }),
                EffectKind::Gauge => commands.push(Command::SetGauge {
                    target,
                    frame: GaugeFrame::at(frame.progress, effect.value),
                }),
                EffectKind::Reveal | EffectKind::Background => {}
            }
            if frame.is_final {
                self.running.remove(&target);
            }
        }
        commands
    }

    /// Check if the host should request another animation frame.
    #[inline]
    pub fn needs_frame(&self) -> bool {
        self.driver.needs_frame()
    }
}
