//! Display rules for animated numbers, bars and circular gauges.

use std::f64::consts::PI;

use crate::{AnimationError, Easing};

/// Radius of the circular gauge ring in pixels.
pub const GAUGE_RADIUS: f64 = 56.0;

/// Suffix appended to a stat counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterSuffix {
    None,
    /// `+`, for targets of 50 and above
    Plus,
    /// `%`, for a target of exactly 100
    Percent,
}

impl CounterSuffix {
    /// Pick the suffix for a counter's target value.
    pub fn for_target(target: f64) -> Self {
        if target == 100.0 {
            CounterSuffix::Percent
        } else if target >= 50.0 {
            CounterSuffix::Plus
        } else {
            CounterSuffix::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CounterSuffix::None => "",
            CounterSuffix::Plus => "+",
            CounterSuffix::Percent => "%",
        }
    }
}

/// Format a stat counter frame: the value floored, followed by the target's suffix.
///
/// ## Example
///
/// ```rust
/// use folio_core_fx::format_counter;
///
/// assert_eq!(format_counter(45.0, 45.0), "45");
/// assert_eq!(format_counter(75.0, 75.0), "75+");
/// assert_eq!(format_counter(100.0, 100.0), "100%");
/// assert_eq!(format_counter(37.9, 100.0), "37%");
/// ```
pub fn format_counter(value: f64, target: f64) -> String {
    format!(
        "{}{}",
        value.floor() as i64,
        CounterSuffix::for_target(target).as_str()
    )
}

/// Format a percentage frame, rounded.
pub fn format_percent(value: f64) -> String {
    format!("{}%", value.round() as i64)
}

/// Parse a level or count from a data attribute or text content.
///
/// Accepts surrounding whitespace, an optional trailing `%` and trailing junk
/// after the leading integer (`"85%"`, `" 12 "`, `"50+"`).
pub fn parse_level(raw: &str) -> Result<f64, AnimationError> {
    let trimmed = raw.trim();
    let digits: String = trimmed
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(_, c)| c)
        .collect();

    let value = digits
        .parse::<i64>()
        .map(|v| v as f64)
        .unwrap_or(f64::NAN);

    if !value.is_finite() {
        return Err(AnimationError::NonFiniteValue { value });
    }
    if value < 0.0 {
        return Err(AnimationError::NegativeEnd { value });
    }
    Ok(value)
}

/// Timing and rounding of one kind of animated number.
#[derive(Clone, Copy, Debug)]
pub struct CounterProfile {
    pub duration_ms: f64,
    pub easing: Easing,
}

impl CounterProfile {
    /// Hero stat counters and skill-bar labels.
    pub const STAT: CounterProfile = CounterProfile {
        duration_ms: 2000.0,
        easing: Easing::OutCubic,
    };

    /// Skill level displays (`NN%`).
    pub const LEVEL: CounterProfile = CounterProfile {
        duration_ms: 1500.0,
        easing: Easing::OutQuart,
    };

    /// Level fill bars.
    pub const FILL: CounterProfile = CounterProfile {
        duration_ms: 1500.0,
        easing: Easing::OutCubic,
    };

    /// Circular gauges.
    pub const GAUGE: CounterProfile = CounterProfile {
        duration_ms: 2000.0,
        easing: Easing::Linear,
    };
}

/// Rendered state of a circular gauge at some point of its animation.
#[derive(Clone, Debug, PartialEq)]
pub struct GaugeFrame {
    /// Rounded percentage shown in the centre
    pub percent: u32,
    /// Filled arc in degrees
    pub angle_deg: f64,
    /// Stroke dash offset for SVG rings
    pub dash_offset: f64,
}

impl GaugeFrame {
    /// Compute the gauge at linear `progress` towards `target_percent`.
    pub fn at(progress: f64, target_percent: f64) -> Self {
        let progress = progress.clamp(0.0, 1.0);
        let circumference = 2.0 * PI * GAUGE_RADIUS;
        let percent = (target_percent * progress).round().max(0.0) as u32;
        Self {
            percent,
            angle_deg: 360.0 * percent as f64 / 100.0,
            dash_offset: circumference - circumference * progress * target_percent / 100.0,
        }
    }

    /// Text shown in the gauge.
    pub fn label(&self) -> String {
        format!("{}%", self.percent)
    }

    /// CSS background for conic-gradient gauges.
    pub fn conic_gradient(&self) -> String {
        format!(
            "conic-gradient(#6366f1 0deg, #8b5cf6 {}deg, rgba(255, 255, 255, 0.1) {}deg)",
            self.angle_deg, self.angle_deg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_rule() {
        assert_eq!(CounterSuffix::for_target(45.0), CounterSuffix::None);
        assert_eq!(CounterSuffix::for_target(50.0), CounterSuffix::Plus);
        assert_eq!(CounterSuffix::for_target(75.0), CounterSuffix::Plus);
        assert_eq!(CounterSuffix::for_target(100.0), CounterSuffix::Percent);
        assert_eq!(CounterSuffix::for_target(150.0), CounterSuffix::Plus);
    }

    #[test]
    fn test_format_counter() {
        assert_eq!(format_counter(45.0, 45.0), "45");
        assert_eq!(format_counter(75.0, 75.0), "75+");
        assert_eq!(format_counter(100.0, 100.0), "100%");
        assert_eq!(format_counter(12.99, 75.0), "12+");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(84.5), "85%");
        assert_eq!(format_percent(0.2), "0%");
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("85"), Ok(85.0));
        assert_eq!(parse_level(" 85% "), Ok(85.0));
        assert_eq!(parse_level("50+"), Ok(50.0));
        assert!(matches!(
            parse_level("abc"),
            Err(AnimationError::NonFiniteValue { .. })
        ));
        assert!(matches!(parse_level(""), Err(AnimationError::NonFiniteValue { .. })));
        assert!(matches!(parse_level("-3"), Err(AnimationError::NegativeEnd { .. })));
    }

    #[test]
    fn test_gauge_endpoints() {
        let start = GaugeFrame::at(0.0, 80.0);
        assert_eq!(start.percent, 0);
        assert_eq!(start.angle_deg, 0.0);
        assert!((start.dash_offset - 2.0 * PI * GAUGE_RADIUS).abs() < 1e-9);

        let end = GaugeFrame::at(1.0, 80.0);
        assert_eq!(end.percent, 80);
        assert!((end.angle_deg - 288.0).abs() < 1e-9);
        assert_eq!(end.label(), "80%");
        assert!(end.conic_gradient().contains("288deg"));
    }

    #[test]
    fn test_gauge_midpoint() {
        let mid = GaugeFrame::at(0.5, 90.0);
        assert_eq!(mid.percent, 45);
        assert!((mid.angle_deg - 162.0).abs() < 1e-9);
    }
}
