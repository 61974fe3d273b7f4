#![cfg(all(target_arch = "wasm32", feature = "web"))]
use folio_core_fx::web::{sleep_ms, EffectHost, LocalStorageStore, PageRelay, TARGET_ATTRIBUTE};
use folio_core_fx::{
    ContactConfig, ContactFields, ContactForm, Effect, EffectKind, FxConfig, PreferenceStore,
    RelayConfig, SubmitOutcome, TargetId, Theme, ThemeToggle, THEME_KEY,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn element(tag: &str) -> HtmlElement {
    let el: HtmlElement = document().create_element(tag).unwrap().dyn_into().unwrap();
    document().body().unwrap().append_child(&el).unwrap();
    el
}

// Short durations so each animation finishes within a few frames
fn fast_config() -> FxConfig {
    let mut config = FxConfig::default();
    config.animation.counter_ms = 40.0;
    config.animation.level_display_ms = 40.0;
    config.animation.level_fill_ms = 40.0;
    config.animation.gauge_ms = 40.0;
    config
}

async fn settle(host: &EffectHost) {
    for _ in 0..100 {
        if !host.is_animating() {
            return;
        }
        sleep_ms(20).await.unwrap();
    }
    panic!("animation did not finish");
}

#[wasm_bindgen_test]
fn local_storage_round_trip() {
    let mut store = LocalStorageStore::open().unwrap();
    store.set(THEME_KEY, "dark-theme").unwrap();
    assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark-theme"));

    let mut toggle = ThemeToggle::load(store);
    assert_eq!(toggle.current(), Theme::Dark);
    toggle.toggle();

    let reopened = LocalStorageStore::open().unwrap();
    assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("light-theme"));
}

#[wasm_bindgen_test]
async fn counter_runs_to_target_and_stops_observing() {
    let host = EffectHost::new(&fast_config()).unwrap();
    let el = element("span");
    let target = host
        .register(el.clone(), Effect::new(EffectKind::StatCounter, 75.0))
        .unwrap();
    assert!(host.is_observed(target));

    host.notify(target, 1.0);
    assert!(!host.is_observed(target));

    settle(&host).await;
    assert_eq!(el.text_content().as_deref(), Some("75+"));
}

#[wasm_bindgen_test]
async fn frame_loop_rearms_after_going_idle() {
    let host = EffectHost::new(&fast_config()).unwrap();
    let first = element("div");
    let second = element("div");
    let a = host
        .register(first.clone(), Effect::new(EffectKind::LevelFill, 40.0))
        .unwrap();
    let b = host
        .register(second.clone(), Effect::new(EffectKind::LevelFill, 80.0))
        .unwrap();

    host.notify(a, 1.0);
    settle(&host).await;
    assert_eq!(first.style().get_property_value("width").unwrap(), "40%");

    host.notify(b, 1.0);
    assert!(host.is_animating());
    settle(&host).await;
    assert_eq!(second.style().get_property_value("width").unwrap(), "80%");
}

#[wasm_bindgen_test]
async fn gauge_writes_its_label() {
    let host = EffectHost::new(&fast_config()).unwrap();
    let container = element("div");
    let ring: HtmlElement = document().create_element("div").unwrap().dyn_into().unwrap();
    let label = document().create_element("span").unwrap();
    label.set_class_name("progress-text");
    container.append_child(&ring).unwrap();
    container.append_child(&label).unwrap();

    let target = host
        .register(ring.clone(), Effect::new(EffectKind::Gauge, 70.0))
        .unwrap();
    host.notify(target, 1.0);
    settle(&host).await;

    assert_eq!(label.text_content().as_deref(), Some("70%"));
    assert!(ring
        .style()
        .get_property_value("background")
        .unwrap()
        .contains("conic-gradient"));
}

#[wasm_bindgen_test]
fn reveal_and_background_observation() {
    let host = EffectHost::new(&fast_config()).unwrap();
    let card = element("div");
    let hero = element("div");
    let reveal = host.register(card.clone(), Effect::reveal()).unwrap();
    let background = host.register(hero.clone(), Effect::background()).unwrap();

    host.notify(reveal, 0.5);
    assert!(card.class_list().contains("animate-in"));
    assert!(!host.is_observed(reveal));

    host.notify(background, 0.5);
    host.notify(background, 0.0);
    assert_eq!(
        hero.style().get_property_value("animation-play-state").unwrap(),
        "paused"
    );
    assert!(host.is_observed(background));
}

#[wasm_bindgen_test]
fn failed_registration_does_not_consume_an_id() {
    let host = EffectHost::new(&fast_config()).unwrap();
    let bad = element("span");
    assert!(host
        .register(bad.clone(), Effect::new(EffectKind::StatCounter, f64::NAN))
        .is_err());
    assert!(bad.get_attribute(TARGET_ATTRIBUTE).is_none());

    let good = element("span");
    let target = host
        .register(good, Effect::new(EffectKind::StatCounter, 10.0))
        .unwrap();
    assert_eq!(target, TargetId(0));
}

#[wasm_bindgen_test]
async fn dropping_host_cancels_pending_frame() {
    let host = EffectHost::new(&fast_config()).unwrap();
    let el = element("span");
    let target = host
        .register(el.clone(), Effect::new(EffectKind::StatCounter, 90.0))
        .unwrap();
    host.notify(target, 1.0);
    assert!(host.is_animating());
    drop(host);

    sleep_ms(60).await.unwrap();
    assert_ne!(el.text_content().as_deref(), Some("90+"));
}

#[wasm_bindgen_test]
async fn relay_without_sdk_falls_back_to_demo() {
    let config = ContactConfig {
        relay: Some(RelayConfig {
            public_key: "pk".into(),
            service_id: "svc".into(),
            template_id: "tpl".into(),
        }),
        demo_delay_ms: 10,
        ..ContactConfig::default()
    };
    let relay = PageRelay::from_config(&config);
    assert!(relay.has_credentials());

    let mut form = ContactForm::from_config(&config);
    let fields = ContactFields::new(
        "Jo",
        "jo@example.com",
        "Hello there",
        "A message long enough to pass.",
    );
    let outcome = form.submit(&fields, &relay).await;
    assert!(matches!(outcome, SubmitOutcome::Demo { .. }));
    assert!(outcome.should_reset());
}
