//! Browser bindings for the effect core.
//!
//! [`EffectHost`] owns the registered elements, one `IntersectionObserver`
//! per [`EffectKind`] and the `requestAnimationFrame` loop, and applies the
//! orchestrator's [`Command`]s to the DOM.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Storage, Window,
};

use crate::{
    Command, ContactConfig, Effect, EffectKind, FrameThrottle, FxConfig, MessageRelay,
    Orchestrator, OutboundMessage, PreferenceStore, RelayConfig, RelayError, StorageError,
    TargetId, Typewriter, TypewriterConfig, TypewriterError,
};

/// Attribute holding the [`TargetId`] of a registered element.
pub const TARGET_ATTRIBUTE: &str = "data-fx-target";

/// Selector of the percentage text inside a gauge.
pub const GAUGE_LABEL_SELECTOR: &str = ".progress-text";

/// Crossing ratios reported by the browser can land slightly under the threshold.
const RATIO_EPSILON: f64 = 1e-3;

fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "No window available".to_string())
}

fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Current `performance.now()` in milliseconds, or `0.0` outside a window.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Resolve after `ms` milliseconds using `setTimeout`.
pub async fn sleep_ms(ms: u32) -> Result<(), String> {
    let window = window()?;
    let timeout = ms.min(i32::MAX as u32) as i32;
    let mut scheduled = Ok(0);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout);
    });
    scheduled.map_err(|e| js_error(&e))?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| js_error(&e))
}

/// `log` backend writing to the browser console.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            log::Level::Info => web_sys::console::info_1(&line),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install [`ConsoleLogger`] as the global logger.
pub fn init_console_logger(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

/// [`PreferenceStore`] backed by `window.localStorage`.
#[derive(Clone, Debug)]
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn open() -> Result<Self, StorageError> {
        let unavailable = |reason: String| StorageError::Unavailable { reason };
        let storage = window()
            .map_err(unavailable)?
            .local_storage()
            .map_err(|e| unavailable(js_error(&e)))?
            .ok_or_else(|| unavailable("localStorage is disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable { reason: js_error(&e) })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::WriteRefused {
                key: key.to_string(),
                reason: js_error(&e),
            })
    }
}

/// Demo-mode relay: waits like a real send, then reports it is unconfigured.
#[derive(Clone, Copy, Debug)]
pub struct DelayedDemoRelay {
    pub delay_ms: u32,
}

impl MessageRelay for DelayedDemoRelay {
    async fn send(&self, _message: &OutboundMessage) -> Result<(), RelayError> {
        sleep_ms(self.delay_ms)
            .await
            .map_err(|reason| RelayError::Transport { reason })?;
        Err(RelayError::Unconfigured)
    }
}

fn transport(value: &JsValue) -> RelayError {
    RelayError::Transport {
        reason: js_error(value),
    }
}

fn method(object: &JsValue, name: &str) -> Result<js_sys::Function, RelayError> {
    js_sys::Reflect::get(object, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
        .ok_or(RelayError::Unconfigured)
}

/// Relay through the EmailJS browser SDK loaded as `window.emailjs`.
///
/// The SDK is initialized with the public key on first use. A page without
/// the SDK yields [`RelayError::Unconfigured`].
#[derive(Clone, Debug)]
pub struct EmailJsRelay {
    config: RelayConfig,
    initialized: Cell<bool>,
}

impl EmailJsRelay {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            initialized: Cell::new(false),
        }
    }

    fn client(&self) -> Result<JsValue, RelayError> {
        let window = window().map_err(|reason| RelayError::Transport { reason })?;
        let emailjs = js_sys::Reflect::get(&window, &JsValue::from_str("emailjs"))
            .map_err(|e| transport(&e))?;
        if emailjs.is_undefined() || emailjs.is_null() {
            return Err(RelayError::Unconfigured);
        }
        if !self.initialized.get() {
            method(&emailjs, "init")?
                .call1(&emailjs, &JsValue::from_str(&self.config.public_key))
                .map_err(|e| transport(&e))?;
            self.initialized.set(true);
        }
        Ok(emailjs)
    }
}

impl MessageRelay for EmailJsRelay {
    async fn send(&self, message: &OutboundMessage) -> Result<(), RelayError> {
        let emailjs = self.client()?;

        let params = js_sys::Object::new();
        let fields = [
            ("from_name", message.from_name.as_str()),
            ("from_email", message.from_email.as_str()),
            ("subject", message.subject.as_str()),
            ("message", message.message.as_str()),
            ("to_email", message.to_email.as_str()),
        ];
        for (key, value) in fields {
            js_sys::Reflect::set(&params, &JsValue::from_str(key), &JsValue::from_str(value))
                .map_err(|e| transport(&e))?;
        }

        let pending = method(&emailjs, "send")?
            .call3(
                &emailjs,
                &JsValue::from_str(&self.config.service_id),
                &JsValue::from_str(&self.config.template_id),
                &params,
            )
            .map_err(|e| transport(&e))?;
        let promise = pending
            .dyn_into::<js_sys::Promise>()
            .map_err(|_| RelayError::Transport {
                reason: "emailjs.send did not return a promise".to_string(),
            })?;
        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| RelayError::Rejected {
                reason: js_error(&e),
            })
    }
}

/// The relay a page uses for its contact form.
///
/// Sends through [`EmailJsRelay`] when credentials are configured. Without
/// credentials, or when the SDK is missing, it waits `demo_delay_ms` and
/// reports [`RelayError::Unconfigured`] so the form shows its demo message.
#[derive(Clone, Debug)]
pub struct PageRelay {
    relay: Option<EmailJsRelay>,
    demo: DelayedDemoRelay,
}

impl PageRelay {
    pub fn from_config(config: &ContactConfig) -> Self {
        Self {
            relay: config.relay.clone().map(EmailJsRelay::new),
            demo: DelayedDemoRelay {
                delay_ms: config.demo_delay_ms,
            },
        }
    }

    /// Check if third-party credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.relay.is_some()
    }
}

impl MessageRelay for PageRelay {
    async fn send(&self, message: &OutboundMessage) -> Result<(), RelayError> {
        if let Some(relay) = &self.relay {
            match relay.send(message).await {
                Err(RelayError::Unconfigured) => {}
                sent => return sent,
            }
        }
        self.demo.send(message).await
    }
}

/// Run a typewriter in `element` until the page goes away.
pub fn spawn_typewriter(element: Element, mut typewriter: Typewriter) {
    wasm_bindgen_futures::spawn_local(async move {
        let mut delay = typewriter.start_delay_ms();
        loop {
            if let Err(err) = sleep_ms(delay).await {
                log::warn!("typewriter stopped: {}", err);
                return;
            }
            let step = typewriter.step();
            element.set_text_content(Some(step.text.as_str()));
            delay = step.next_delay_ms;
        }
    });
}

/// Start the configured headline typewriter in `element`.
pub fn start_typewriter(
    element: Element,
    config: &TypewriterConfig,
) -> Result<(), TypewriterError> {
    spawn_typewriter(element, Typewriter::from_config(config)?);
    Ok(())
}

struct Registration {
    element: HtmlElement,
    /// Text element of a gauge
    label: Option<Element>,
    kind: EffectKind,
    observed: bool,
}

struct HostState {
    orchestrator: RefCell<Orchestrator>,
    registrations: RefCell<Vec<Registration>>,
    throttle: RefCell<FrameThrottle>,
    frame_request: Cell<Option<i32>>,
    observers: RefCell<HashMap<EffectKind, IntersectionObserver>>,
    observer_callbacks: RefCell<Vec<Closure<dyn FnMut(js_sys::Array)>>>,
    frame_callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl HostState {
    fn on_entries(state: &Rc<Self>, entries: js_sys::Array, threshold: f64) {
        let mut commands = Vec::new();
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let Some(target) = target_of(&entry.target()) else {
                continue;
            };
            let mut ratio = entry.intersection_ratio();
            if entry.is_intersecting() && ratio < threshold && threshold - ratio < RATIO_EPSILON {
                ratio = threshold;
            }
            commands.extend(state.visibility(target, ratio));
        }
        state.apply_all(&commands);
        Self::schedule_frame(state);
    }

    fn visibility(&self, target: TargetId, ratio: f64) -> Vec<Command> {
        let commands = self.orchestrator.borrow_mut().on_visibility(target, ratio);
        self.release(target);
        commands
    }

    /// Stop observing `target` once its watch is gone.
    fn release(&self, target: TargetId) {
        if self.orchestrator.borrow().is_watching(target) {
            return;
        }
        let mut registrations = self.registrations.borrow_mut();
        let Some(registration) = registrations.get_mut(target.0 as usize) else {
            return;
        };
        if !registration.observed {
            return;
        }
        if let Some(observer) = self.observers.borrow().get(&registration.kind) {
            observer.unobserve(&registration.element);
        }
        registration.observed = false;
    }

    fn on_frame(state: &Rc<Self>, now_ms: f64) {
        state.frame_request.set(None);
        let commands = state
            .throttle
            .borrow_mut()
            .run(|| state.orchestrator.borrow_mut().on_frame(now_ms))
            .unwrap_or_default();
        state.apply_all(&commands);
        Self::schedule_frame(state);
    }

    fn schedule_frame(state: &Rc<Self>) {
        if !state.orchestrator.borrow().needs_frame() || !state.throttle.borrow_mut().trigger() {
            return;
        }
        let requested = match state.frame_callback.borrow().as_ref() {
            Some(callback) => window().and_then(|w| {
                w.request_animation_frame(callback.as_ref().unchecked_ref())
                    .map_err(|e| js_error(&e))
            }),
            None => Err("No frame callback installed".to_string()),
        };
        match requested {
            Ok(id) => state.frame_request.set(Some(id)),
            Err(err) => {
                log::warn!("requestAnimationFrame: {}", err);
                // Leave the throttle idle so the next event can retry
                state.throttle.borrow_mut().run(|| ());
            }
        }
    }

    fn apply_all(&self, commands: &[Command]) {
        for command in commands {
            if let Err(err) = self.apply(command) {
                log::warn!("apply {:?}: {}", command, err);
            }
        }
    }

    fn apply(&self, command: &Command) -> Result<(), String> {
        let registrations = self.registrations.borrow();
        let registration = registrations
            .get(command.target().0 as usize)
            .ok_or_else(|| format!("Unknown target {}", command.target()))?;
        let element = &registration.element;
        let style = element.style();
        match command {
            Command::SetText { text, .. } => element.set_text_content(Some(text.as_str())),
            Command::SetWidthPercent { percent, .. } => style
                .set_property("width", &format!("{}%", percent))
                .map_err(|e| js_error(&e))?,
            Command::SetGauge { frame, .. } => {
                style
                    .set_property("background", &frame.conic_gradient())
                    .map_err(|e| js_error(&e))?;
                style
                    .set_property("stroke-dashoffset", &frame.dash_offset.to_string())
                    .map_err(|e| js_error(&e))?;
                if let Some(label) = &registration.label {
                    label.set_text_content(Some(frame.label().as_str()));
                }
            }
            Command::AddClass { class, .. } => {
                element.class_list().add_1(class).map_err(|e| js_error(&e))?
            }
            Command::SetPlayState { running, .. } => {
                let state = if *running { "running" } else { "paused" };
                style
                    .set_property("animation-play-state", state)
                    .map_err(|e| js_error(&e))?;
            }
        }
        Ok(())
    }
}

fn target_of(element: &Element) -> Option<TargetId> {
    element
        .get_attribute(TARGET_ATTRIBUTE)
        .and_then(|raw| raw.parse().ok())
        .map(TargetId)
}

/// Find the percentage text of a gauge inside `ring` or next to it.
fn gauge_label(ring: &Element) -> Option<Element> {
    let find = |root: &Element| root.query_selector(GAUGE_LABEL_SELECTOR).ok().flatten();
    find(ring).or_else(|| ring.parent_element().and_then(|parent| find(&parent)))
}

/// Connects an [`Orchestrator`] to the live page.
///
/// ## Example
///
/// ```rust,ignore
/// use folio_core_fx::web::EffectHost;
/// use folio_core_fx::{Effect, EffectKind, FxConfig};
///
/// let host = EffectHost::new(&FxConfig::default())?;
/// let bar: web_sys::HtmlElement = // ... a `.skill-progress` element
/// host.register(bar, Effect::from_attribute(EffectKind::SkillBar, "85")?)?;
/// ```
pub struct EffectHost {
    state: Rc<HostState>,
}

impl EffectHost {
    pub fn new(config: &FxConfig) -> Result<Self, String> {
        let orchestrator = Orchestrator::new(config).map_err(|e| e.to_string())?;
        let state = Rc::new(HostState {
            orchestrator: RefCell::new(orchestrator),
            registrations: RefCell::new(Vec::new()),
            throttle: RefCell::new(FrameThrottle::new()),
            frame_request: Cell::new(None),
            observers: RefCell::new(HashMap::new()),
            observer_callbacks: RefCell::new(Vec::new()),
            frame_callback: RefCell::new(None),
        });

        let weak: Weak<HostState> = Rc::downgrade(&state);
        let frame = Closure::<dyn FnMut(f64)>::new(move |now: f64| {
            if let Some(state) = weak.upgrade() {
                HostState::on_frame(&state, now);
            }
        });
        *state.frame_callback.borrow_mut() = Some(frame);
        Ok(Self { state })
    }

    /// Register `element` for `effect` and start observing it.
    ///
    /// Gauges write their percentage into the `.progress-text` element found
    /// inside `element` or its parent.
    pub fn register(&self, element: HtmlElement, effect: Effect) -> Result<TargetId, String> {
        let label = match effect.kind {
            EffectKind::Gauge => gauge_label(&element),
            _ => None,
        };
        if effect.kind == EffectKind::Gauge && label.is_none() {
            log::warn!("gauge without {} element", GAUGE_LABEL_SELECTOR);
        }
        self.register_parts(element, label, effect)
    }

    /// Register a gauge ring with an explicit percentage text element.
    pub fn register_gauge(
        &self,
        ring: HtmlElement,
        label: Element,
        percent: f64,
    ) -> Result<TargetId, String> {
        self.register_parts(ring, Some(label), Effect::new(EffectKind::Gauge, percent))
    }

    fn register_parts(
        &self,
        element: HtmlElement,
        label: Option<Element>,
        effect: Effect,
    ) -> Result<TargetId, String> {
        let observer = self.observer(effect.kind)?;
        let target = TargetId(self.state.registrations.borrow().len() as u32);
        element
            .set_attribute(TARGET_ATTRIBUTE, &target.0.to_string())
            .map_err(|e| js_error(&e))?;

        let registered = self
            .state
            .orchestrator
            .borrow_mut()
            .register(target, effect);
        if let Err(err) = registered {
            element.remove_attribute(TARGET_ATTRIBUTE).ok();
            return Err(err.to_string());
        }

        self.state.registrations.borrow_mut().push(Registration {
            element: element.clone(),
            label,
            kind: effect.kind,
            observed: true,
        });
        observer.observe(&element);
        Ok(target)
    }

    fn observer(&self, kind: EffectKind) -> Result<IntersectionObserver, String> {
        if let Some(observer) = self.state.observers.borrow().get(&kind) {
            return Ok(observer.clone());
        }

        let options = self.state.orchestrator.borrow().observer_options(kind);
        let weak = Rc::downgrade(&self.state);
        let threshold = options.threshold;
        let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            if let Some(state) = weak.upgrade() {
                HostState::on_entries(&state, entries, threshold);
            }
        });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin.to_css());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|e| js_error(&e))?;

        log::debug!("observer for {:?}: {:?}", kind, options);
        self.state.observer_callbacks.borrow_mut().push(callback);
        self.state.observers.borrow_mut().insert(kind, observer.clone());
        Ok(observer)
    }

    /// Forward a visible ratio for `target` without waiting for the observer.
    pub fn notify(&self, target: TargetId, ratio: f64) {
        let commands = self.state.visibility(target, ratio);
        self.state.apply_all(&commands);
        HostState::schedule_frame(&self.state);
    }

    /// Check if the browser still observes `target`.
    pub fn is_observed(&self, target: TargetId) -> bool {
        self.state
            .registrations
            .borrow()
            .get(target.0 as usize)
            .map(|r| r.observed)
            .unwrap_or(false)
    }

    /// Check if an animation frame is scheduled or running.
    pub fn is_animating(&self) -> bool {
        self.state.orchestrator.borrow().needs_frame()
    }
}

impl Drop for EffectHost {
    fn drop(&mut self) {
        if let Some(id) = self.state.frame_request.take() {
            if let Ok(window) = window() {
                window.cancel_animation_frame(id).ok();
            }
        }
        for observer in self.state.observers.borrow().values() {
            observer.disconnect();
        }
    }
}
