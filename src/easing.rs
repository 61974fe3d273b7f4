//! Normalized easing curves.

/// An easing curve mapping elapsed fraction `[0, 1]` to progress fraction `[0, 1]`.
///
/// Every built-in curve satisfies `apply(0) == 0` and `apply(1) == 1` and is
/// monotonic on `[0, 1]`. `Custom` curves are expected to honour the same contract.
///
/// ## Example
///
/// ```rust
/// use folio_core_fx::Easing;
///
/// assert_eq!(Easing::OutCubic.apply(0.0), 0.0);
/// assert_eq!(Easing::OutCubic.apply(1.0), 1.0);
/// assert!(Easing::OutCubic.apply(0.5) > 0.5); // fast start, slow end
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub enum Easing {
    /// Constant speed
    #[default]
    Linear,
    /// `1 - (1 - t)^3`
    OutCubic,
    /// `1 - (1 - t)^4`
    OutQuart,
    /// Slow start and end, cubic
    InOutCubic,
    /// Caller-supplied curve
    Custom(fn(f64) -> f64),
}

impl Easing {
    /// Evaluate the curve at `t`, clamping `t` into `[0, 1]` first.
    ///
    /// A NaN input is treated as `0`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::Linear => t,
            Easing::OutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::OutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Custom(f) => f(t),
        }
    }

    /// Look up a built-in curve by its CSS-like name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" => Some(Easing::Linear),
            "ease-out-cubic" | "out-cubic" => Some(Easing::OutCubic),
            "ease-out-quart" | "out-quart" => Some(Easing::OutQuart),
            "ease-in-out-cubic" | "in-out-cubic" | "ease-in-out" => Some(Easing::InOutCubic),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BUILTIN: [Easing; 4] = [
        Easing::Linear,
        Easing::OutCubic,
        Easing::OutQuart,
        Easing::InOutCubic,
    ];

    #[test]
    fn test_endpoints() {
        for easing in BUILTIN {
            assert_eq!(easing.apply(0.0), 0.0, "{:?}", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?}", easing);
        }
    }

    #[test]
    fn test_clamps_input() {
        assert_eq!(Easing::OutCubic.apply(-3.0), 0.0);
        assert_eq!(Easing::OutCubic.apply(7.5), 1.0);
        assert_eq!(Easing::Linear.apply(f64::NAN), 0.0);
    }

    #[test]
    fn test_known_values() {
        assert!((Easing::OutCubic.apply(0.5) - 0.875).abs() < 1e-12);
        assert!((Easing::OutQuart.apply(0.5) - 0.9375).abs() < 1e-12);
        assert!((Easing::InOutCubic.apply(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_custom() {
        fn square(t: f64) -> f64 {
            t * t
        }
        assert_eq!(Easing::Custom(square).apply(0.5), 0.25);
    }

    #[test]
    fn test_from_name() {
        assert!(matches!(Easing::from_name("ease-out-cubic"), Some(Easing::OutCubic)));
        assert!(matches!(Easing::from_name(" Linear "), Some(Easing::Linear)));
        assert!(Easing::from_name("bounce").is_none());
    }

    proptest! {
        #[test]
        fn builtin_curves_are_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for easing in BUILTIN {
                prop_assert!(easing.apply(lo) <= easing.apply(hi) + 1e-12);
            }
        }
    }
}
