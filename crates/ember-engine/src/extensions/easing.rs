//! Easing functions for property animation.
//!
//! Pure functions from normalized progress in `[0, 1]` to an output ratio.
//! Back and elastic variants deliberately overshoot; everything else stays in
//! `[0, 1]` with exact 0.0/1.0 at the endpoints. The algebraic forms are the
//! classic Clutter/Kivy set, evaluated in f64.

use std::f64::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Overshoot constant for the back family.
const BACK_OVERSHOOT: f64 = 1.70158;

/// Easing function selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity.
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    /// Spring past the target, period 0.3.
    InElastic,
    OutElastic,
    /// Spring, period 0.45.
    InOutElastic,
    /// Pull back before launching.
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
}

impl Easing {
    /// Apply the easing curve to `progress` in `[0, 1]`.
    pub fn apply(self, progress: f64) -> f64 {
        let p = progress;
        match self {
            Easing::Linear => p,

            Easing::InQuad => p * p,
            Easing::OutQuad => -1.0 * p * (p - 2.0),
            Easing::InOutQuad => {
                let mut q = p * 2.0;
                if q < 1.0 {
                    return 0.5 * q * q;
                }
                q -= 1.0;
                -0.5 * (q * (q - 2.0) - 1.0)
            }

            Easing::InCubic => p * p * p,
            Easing::OutCubic => {
                let q = p - 1.0;
                q * q * q + 1.0
            }
            Easing::InOutCubic => {
                let mut q = p * 2.0;
                if q < 1.0 {
                    return 0.5 * q * q * q;
                }
                q -= 2.0;
                0.5 * (q * q * q + 2.0)
            }

            Easing::InQuart => p * p * p * p,
            Easing::OutQuart => {
                let q = p - 1.0;
                -1.0 * (q * q * q * q - 1.0)
            }
            Easing::InOutQuart => {
                let mut q = p * 2.0;
                if q < 1.0 {
                    return 0.5 * q * q * q * q;
                }
                q -= 2.0;
                -0.5 * (q * q * q * q - 2.0)
            }

            Easing::InQuint => p * p * p * p * p,
            Easing::OutQuint => {
                let q = p - 1.0;
                q * q * q * q * q + 1.0
            }
            Easing::InOutQuint => {
                let mut q = p * 2.0;
                if q < 1.0 {
                    return 0.5 * q * q * q * q * q;
                }
                q -= 2.0;
                0.5 * (q * q * q * q * q + 2.0)
            }

            Easing::InSine => -1.0 * (p * (PI / 2.0)).cos() + 1.0,
            Easing::OutSine => (p * (PI / 2.0)).sin(),
            Easing::InOutSine => -0.5 * ((PI * p).cos() - 1.0),

            // The expo pair special-cases the endpoints: pow never quite
            // reaches them.
            Easing::InExpo => {
                if p == 0.0 {
                    return 0.0;
                }
                2f64.powf(10.0 * (p - 1.0))
            }
            Easing::OutExpo => {
                if p == 1.0 {
                    return 1.0;
                }
                -(2f64.powf(-10.0 * p)) + 1.0
            }
            Easing::InOutExpo => {
                if p == 0.0 {
                    return 0.0;
                }
                if p == 1.0 {
                    return 1.0;
                }
                let mut q = p * 2.0;
                if q < 1.0 {
                    return 0.5 * 2f64.powf(10.0 * (q - 1.0));
                }
                q -= 1.0;
                0.5 * (-(2f64.powf(-10.0 * q)) + 2.0)
            }

            Easing::InCirc => -1.0 * ((1.0 - p * p).sqrt() - 1.0),
            Easing::OutCirc => {
                let q = p - 1.0;
                (1.0 - q * q).sqrt()
            }
            Easing::InOutCirc => {
                let mut q = p * 2.0;
                if q < 1.0 {
                    return -0.5 * ((1.0 - q * q).sqrt() - 1.0);
                }
                q -= 2.0;
                0.5 * ((1.0 - q * q).sqrt() + 1.0)
            }

            Easing::InElastic => {
                let period = 0.3;
                let s = period / 4.0;
                if p == 1.0 {
                    return 1.0;
                }
                let q = p - 1.0;
                -(2f64.powf(10.0 * q) * ((q - s) * (2.0 * PI) / period).sin())
            }
            Easing::OutElastic => {
                let period = 0.3;
                let s = period / 4.0;
                if p == 1.0 {
                    return 1.0;
                }
                2f64.powf(-10.0 * p) * ((p - s) * (2.0 * PI) / period).sin() + 1.0
            }
            Easing::InOutElastic => {
                let period = 0.3 * 1.5;
                let s = period / 4.0;
                let mut q = p * 2.0;
                if q == 2.0 {
                    return 1.0;
                }
                if q < 1.0 {
                    q -= 1.0;
                    -0.5 * (2f64.powf(10.0 * q) * ((q - s) * (2.0 * PI) / period).sin())
                } else {
                    q -= 1.0;
                    2f64.powf(-10.0 * q) * ((q - s) * (2.0 * PI) / period).sin() * 0.5 + 1.0
                }
            }

            Easing::InBack => p * p * ((BACK_OVERSHOOT + 1.0) * p - BACK_OVERSHOOT),
            Easing::OutBack => {
                let q = p - 1.0;
                q * q * ((BACK_OVERSHOOT + 1.0) * q + BACK_OVERSHOOT) + 1.0
            }
            Easing::InOutBack => {
                let mut q = p * 2.0;
                let s = BACK_OVERSHOOT * 1.525;
                if q < 1.0 {
                    return 0.5 * (q * q * ((s + 1.0) * q - s));
                }
                q -= 2.0;
                0.5 * (q * q * ((s + 1.0) * q + s) + 2.0)
            }

            Easing::InBounce => in_bounce(p, 1.0),
            Easing::OutBounce => out_bounce(p, 1.0),
            Easing::InOutBounce => {
                let q = p * 2.0;
                if q < 1.0 {
                    in_bounce(q, 1.0) * 0.5
                } else {
                    out_bounce(q - 1.0, 1.0) * 0.5 + 0.5
                }
            }
        }
    }

    /// All selectors, in declaration order.
    pub fn all() -> [Easing; 31] {
        use Easing::*;
        [
            Linear, InQuad, OutQuad, InOutQuad, InCubic, OutCubic, InOutCubic, InQuart, OutQuart,
            InOutQuart, InQuint, OutQuint, InOutQuint, InSine, OutSine, InOutSine, InExpo, OutExpo,
            InOutExpo, InCirc, OutCirc, InOutCirc, InElastic, OutElastic, InOutElastic, InBack,
            OutBack, InOutBack, InBounce, OutBounce, InOutBounce,
        ]
    }
}

/// Ease-out bounce over duration `d`: four quadratic arcs at breakpoints
/// 1/2.75, 2/2.75 and 2.5/2.75.
fn out_bounce(t: f64, d: f64) -> f64 {
    let mut p = t / d;
    if p < 1.0 / 2.75 {
        7.5625 * p * p
    } else if p < 2.0 / 2.75 {
        p -= 1.5 / 2.75;
        7.5625 * p * p + 0.75
    } else if p < 2.5 / 2.75 {
        p -= 2.25 / 2.75;
        7.5625 * p * p + 0.9375
    } else {
        p -= 2.625 / 2.75;
        7.5625 * p * p + 0.984375
    }
}

fn in_bounce(t: f64, d: f64) -> f64 {
    1.0 - out_bounce(d - t, d)
}

impl FromStr for Easing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        use Easing::*;
        Ok(match s {
            "linear" => Linear,
            "in_quad" => InQuad,
            "out_quad" => OutQuad,
            "in_out_quad" => InOutQuad,
            "in_cubic" => InCubic,
            "out_cubic" => OutCubic,
            "in_out_cubic" => InOutCubic,
            "in_quart" => InQuart,
            "out_quart" => OutQuart,
            "in_out_quart" => InOutQuart,
            "in_quint" => InQuint,
            "out_quint" => OutQuint,
            "in_out_quint" => InOutQuint,
            "in_sine" => InSine,
            "out_sine" => OutSine,
            "in_out_sine" => InOutSine,
            "in_expo" => InExpo,
            "out_expo" => OutExpo,
            "in_out_expo" => InOutExpo,
            "in_circ" => InCirc,
            "out_circ" => OutCirc,
            "in_out_circ" => InOutCirc,
            "in_elastic" => InElastic,
            "out_elastic" => OutElastic,
            "in_out_elastic" => InOutElastic,
            "in_back" => InBack,
            "out_back" => OutBack,
            "in_out_back" => InOutBack,
            "in_bounce" => InBounce,
            "out_bounce" => OutBounce,
            "in_out_bounce" => InOutBounce,
            other => {
                return Err(Error::InvalidArgument(format!(
                    "unknown easing `{}`",
                    other
                )))
            }
        })
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f64, b: f64, t: f64, easing: Easing) -> f64 {
    lerp(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn endpoints_are_exact() {
        for easing in Easing::all() {
            let end = easing.apply(1.0);
            assert!((end - 1.0).abs() < TOL, "{:?}(1) = {}", easing, end);
            // The in/in-out elastic forms carry a residual of ~2^-10 at the
            // start; every other curve begins at zero.
            if matches!(easing, Easing::InElastic | Easing::InOutElastic) {
                assert!(easing.apply(0.0).abs() < 1e-3);
                continue;
            }
            let start = easing.apply(0.0);
            assert!(start.abs() < TOL, "{:?}(0) = {}", easing, start);
        }
    }

    #[test]
    fn expo_boundaries_bypass_pow() {
        assert_eq!(Easing::InExpo.apply(0.0), 0.0);
        assert_eq!(Easing::OutExpo.apply(1.0), 1.0);
        assert_eq!(Easing::InOutExpo.apply(0.0), 0.0);
        assert_eq!(Easing::InOutExpo.apply(1.0), 1.0);
    }

    #[test]
    fn quad_midpoints() {
        assert!((Easing::InQuad.apply(0.5) - 0.25).abs() < TOL);
        assert!((Easing::OutQuad.apply(0.5) - 0.75).abs() < TOL);
        assert!((Easing::InOutQuad.apply(0.5) - 0.5).abs() < TOL);
    }

    #[test]
    fn sine_midpoint() {
        let expected = -1.0 * (0.5 * (PI / 2.0)).cos() + 1.0;
        assert!((Easing::InSine.apply(0.5) - expected).abs() < TOL);
        assert!((Easing::InOutSine.apply(0.5) - 0.5).abs() < TOL);
    }

    #[test]
    fn bounce_breakpoint_samples() {
        // Sample inside the second arc: p = 0.5 lies in [1/2.75, 2/2.75).
        let p: f64 = 0.5 - 1.5 / 2.75;
        let expected = 7.5625 * p * p + 0.75;
        assert!((Easing::OutBounce.apply(0.5) - expected).abs() < TOL);
        // in-bounce mirrors out-bounce.
        let mirrored = 1.0 - Easing::OutBounce.apply(1.0 - 0.3);
        assert!((Easing::InBounce.apply(0.3) - mirrored).abs() < TOL);
    }

    #[test]
    fn in_out_bounce_halves() {
        let lower = Easing::InBounce.apply(0.6) * 0.5;
        assert!((Easing::InOutBounce.apply(0.3) - lower).abs() < TOL);
        let upper = Easing::OutBounce.apply(0.6) * 0.5 + 0.5;
        assert!((Easing::InOutBounce.apply(0.8) - upper).abs() < TOL);
    }

    #[test]
    fn back_overshoots() {
        assert!(Easing::InBack.apply(0.3) < 0.0);
        assert!(Easing::OutBack.apply(0.7) > 1.0);
    }

    #[test]
    fn elastic_formula_sample() {
        // Direct evaluation of the documented closed form at p = 0.5.
        let period = 0.3;
        let s = period / 4.0;
        let expected = 2f64.powf(-10.0 * 0.5) * ((0.5 - s) * (2.0 * PI) / period).sin() + 1.0;
        assert!((Easing::OutElastic.apply(0.5) - expected).abs() < TOL);
    }

    #[test]
    fn parse_round_trip() {
        assert_eq!("in_out_quint".parse::<Easing>().unwrap(), Easing::InOutQuint);
        assert!("wobble".parse::<Easing>().is_err());
    }

    #[test]
    fn ease_helper_interpolates() {
        let v = ease(100.0, 200.0, 0.5, Easing::Linear);
        assert!((v - 150.0).abs() < TOL);
    }
}
