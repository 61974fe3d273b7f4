//! Page configuration.
//!
//! Every field has a default matching the shipped page, so a config file
//! only needs the values it overrides.

use crate::counter::CounterProfile;
use crate::typewriter::TypewriterTimings;
use crate::visibility::{ObserverOptions, RootMargin, RootMarginError};

/// Error type for configuration loading.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[cfg(feature = "toml")]
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("Invalid root margin for {field}: {source}")]
    RootMargin {
        field: &'static str,
        source: RootMarginError,
    },
}

/// Headline typewriter settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TypewriterConfig {
    pub phrases: Vec<String>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub timings: TypewriterTimings,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            phrases: [
                "Senior Software Developer",
                "Full Stack Developer",
                "Data Analytics Expert",
                "Python Specialist",
                "React Developer",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            timings: TypewriterTimings::default(),
        }
    }
}

/// Credentials of the transactional-email relay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelayConfig {
    pub public_key: String,
    pub service_id: String,
    pub template_id: String,
}

/// Contact form settings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContactConfig {
    pub recipient: String,
    /// Relay credentials; `None` keeps the form in demo mode
    pub relay: Option<RelayConfig>,
    /// Simulated send time in demo mode
    pub demo_delay_ms: u32,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: "hello@example.com".to_string(),
            relay: None,
            demo_delay_ms: 1500,
        }
    }
}

/// Threshold and root margin of one kind of watched region.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatchConfig {
    pub threshold: f64,
    pub root_margin: String,
}

impl WatchConfig {
    fn new(threshold: f64, root_margin: &str) -> Self {
        Self {
            threshold,
            root_margin: root_margin.to_string(),
        }
    }

    /// Validate and convert into observer options. `field` names the entry in errors.
    pub fn resolve(&self, field: &'static str) -> Result<ObserverOptions, ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::Invalid {
                field,
                reason: format!("threshold {} outside [0, 1]", self.threshold),
            });
        }
        let root_margin = RootMargin::parse(&self.root_margin)
            .map_err(|source| ConfigError::RootMargin { field, source })?;
        Ok(ObserverOptions::new(self.threshold).with_root_margin(root_margin))
    }
}

/// Visibility settings per effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VisibilityConfig {
    pub skill_bar: WatchConfig,
    pub counter: WatchConfig,
    pub level_display: WatchConfig,
    pub level_fill: WatchConfig,
    pub gauge: WatchConfig,
    pub reveal: WatchConfig,
    pub background: WatchConfig,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            skill_bar: WatchConfig::new(0.3, "0px 0px -50px 0px"),
            counter: WatchConfig::new(0.5, "0px"),
            level_display: WatchConfig::new(0.5, "0px 0px -50px 0px"),
            level_fill: WatchConfig::new(0.5, "0px"),
            gauge: WatchConfig::new(0.5, "0px"),
            reveal: WatchConfig::new(0.1, "50px 0px"),
            background: WatchConfig::new(0.1, "50px"),
        }
    }
}

impl VisibilityConfig {
    /// Every entry with its qualified field name.
    pub fn entries(&self) -> [(&'static str, &WatchConfig); 7] {
        [
            ("visibility.skill_bar", &self.skill_bar),
            ("visibility.counter", &self.counter),
            ("visibility.level_display", &self.level_display),
            ("visibility.level_fill", &self.level_fill),
            ("visibility.gauge", &self.gauge),
            ("visibility.reveal", &self.reveal),
            ("visibility.background", &self.background),
        ]
    }
}

/// Animation durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationConfig {
    pub counter_ms: f64,
    pub level_display_ms: f64,
    pub level_fill_ms: f64,
    pub gauge_ms: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            counter_ms: CounterProfile::STAT.duration_ms,
            level_display_ms: CounterProfile::LEVEL.duration_ms,
            level_fill_ms: CounterProfile::FILL.duration_ms,
            gauge_ms: CounterProfile::GAUGE.duration_ms,
        }
    }
}

/// Complete page configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FxConfig {
    pub typewriter: TypewriterConfig,
    pub contact: ContactConfig,
    pub visibility: VisibilityConfig,
    pub animation: AnimationConfig,
}

impl FxConfig {
    /// Parse a TOML config and validate it.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: FxConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that the types cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.typewriter.timings;
        if t.delete_ms >= t.type_ms {
            return Err(ConfigError::Invalid {
                field: "typewriter.delete_ms",
                reason: format!("{} must be below type_ms {}", t.delete_ms, t.type_ms),
            });
        }

        let durations = [
            ("animation.counter_ms", self.animation.counter_ms),
            ("animation.level_display_ms", self.animation.level_display_ms),
            ("animation.level_fill_ms", self.animation.level_fill_ms),
            ("animation.gauge_ms", self.animation.gauge_ms),
        ];
        for (field, ms) in durations {
            if !ms.is_finite() || ms <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("duration {} must be positive", ms),
                });
            }
        }

        for (field, watch) in self.visibility.entries() {
            watch.resolve(field)?;
        }
        Ok(())
    }
}
