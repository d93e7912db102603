//! Easing catalog and cubic Bézier evaluation.
//!
//! Every named easing maps to a canonical cubic Bézier control quadruple
//! and/or a native easing-curve descriptor. Names with a native descriptor
//! let the executor delegate to the host's tweening facility; names with
//! only a Bézier definition run on the custom sampler.
//!
//! # Usage
//!
//! ```
//! use motion_engine::easing::{CubicBezier, EasingId};
//!
//! let def = EasingId::EaseOutQuad.definition();
//! assert!(def.native.is_some());
//!
//! let bezier = CubicBezier::new(0.4, 0.0, 0.2, 1.0);
//! let progress = bezier.evaluate(0.5);
//! assert!(progress > 0.5);
//! ```

use serde::{Deserialize, Serialize};

/// Native easing style understood by the host's tweening facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingStyle {
    Linear,
    Sine,
    Quad,
    Cubic,
    Quart,
    Quint,
    Exponential,
    Circular,
    Back,
    Elastic,
    Bounce,
}

/// Native easing direction understood by the host's tweening facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingDirection {
    In,
    Out,
    InOut,
}

/// A style + direction pair the host's native tweening facility accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeCurve {
    pub style: EasingStyle,
    pub direction: EasingDirection,
}

impl NativeCurve {
    pub const fn new(style: EasingStyle, direction: EasingDirection) -> Self {
        Self { style, direction }
    }

    /// The curve used for the sampler's per-step micro-tweens.
    pub const fn linear() -> Self {
        Self::new(EasingStyle::Linear, EasingDirection::InOut)
    }
}

/// A cubic Bézier easing curve defined by its two inner control points.
///
/// The implicit outer points are (0, 0) and (1, 1). x values must be in
/// [0, 1] so the curve is a function of time; y values may overshoot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    /// Create a cubic Bézier curve.
    ///
    /// # Panics
    /// Panics if x1 or x2 are outside [0, 1].
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "Bezier x values must be in [0, 1]"
        );
        Self { x1, y1, x2, y2 }
    }

    const fn raw(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Evaluate the curve at normalized time `u`, returning eased progress.
    ///
    /// Inverts x(t) = u with Newton-Raphson iteration, then evaluates the
    /// y coordinate at the solved parameter. Deterministic and
    /// side-effect-free.
    pub fn evaluate(&self, u: f32) -> f32 {
        if u <= 0.0 {
            return 0.0;
        }
        if u >= 1.0 {
            return 1.0;
        }

        let t = self.solve_x(u);
        axis(self.y1, self.y2, t)
    }

    /// Solve for the parameter t where x(t) equals `target_x`.
    fn solve_x(&self, target_x: f32) -> f32 {
        let mut t = target_x;

        for _ in 0..8 {
            let x = axis(self.x1, self.x2, t) - target_x;
            if x.abs() < 1e-6 {
                break;
            }

            let dx = self.x_derivative(t);
            if dx.abs() < 1e-6 {
                break;
            }

            t -= x / dx;
            t = t.clamp(0.0, 1.0);
        }

        t
    }

    /// dx/dt = 3(1-t)²·x1 + 6(1-t)t·(x2-x1) + 3t²·(1-x2)
    #[inline]
    fn x_derivative(&self, t: f32) -> f32 {
        let mt = 1.0 - t;
        3.0 * mt * mt * self.x1 + 6.0 * mt * t * (self.x2 - self.x1) + 3.0 * t * t * (1.0 - self.x2)
    }
}

/// One axis of the curve at parameter t: 3(1-t)²t·c1 + 3(1-t)t²·c2 + t³
#[inline]
fn axis(c1: f32, c2: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;

    3.0 * mt2 * t * c1 + 3.0 * mt * t2 * c2 + t3
}

/// Named easing identifiers.
///
/// The `ease*` family follows the CSS shorthand curves and has no native
/// equivalent; elastic and bounce have no Bézier form and only run
/// natively; everything else carries both definitions on purpose so the
/// executor can prefer the native path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingId {
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
}

/// Catalog entry for one named easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasingDef {
    /// Canonical Bézier control quadruple, if the curve has one.
    pub bezier: Option<CubicBezier>,
    /// Native curve descriptor, if the host can run this curve directly.
    pub native: Option<NativeCurve>,
}

impl EasingDef {
    const fn both(bezier: CubicBezier, style: EasingStyle, direction: EasingDirection) -> Self {
        Self {
            bezier: Some(bezier),
            native: Some(NativeCurve::new(style, direction)),
        }
    }

    const fn bezier_only(bezier: CubicBezier) -> Self {
        Self {
            bezier: Some(bezier),
            native: None,
        }
    }

    const fn native_only(style: EasingStyle, direction: EasingDirection) -> Self {
        Self {
            bezier: None,
            native: Some(NativeCurve::new(style, direction)),
        }
    }
}

impl EasingId {
    /// Every named easing, in catalog order.
    pub const ALL: [EasingId; 35] = [
        Self::Linear,
        Self::Ease,
        Self::EaseIn,
        Self::EaseOut,
        Self::EaseInOut,
        Self::EaseInSine,
        Self::EaseOutSine,
        Self::EaseInOutSine,
        Self::EaseInQuad,
        Self::EaseOutQuad,
        Self::EaseInOutQuad,
        Self::EaseInCubic,
        Self::EaseOutCubic,
        Self::EaseInOutCubic,
        Self::EaseInQuart,
        Self::EaseOutQuart,
        Self::EaseInOutQuart,
        Self::EaseInQuint,
        Self::EaseOutQuint,
        Self::EaseInOutQuint,
        Self::EaseInExpo,
        Self::EaseOutExpo,
        Self::EaseInOutExpo,
        Self::EaseInCirc,
        Self::EaseOutCirc,
        Self::EaseInOutCirc,
        Self::EaseInBack,
        Self::EaseOutBack,
        Self::EaseInOutBack,
        Self::EaseInElastic,
        Self::EaseOutElastic,
        Self::EaseInOutElastic,
        Self::EaseInBounce,
        Self::EaseOutBounce,
        Self::EaseInOutBounce,
    ];

    /// The canonical definition for this easing.
    pub const fn definition(self) -> EasingDef {
        use EasingDirection::{In, InOut, Out};
        use EasingStyle as S;

        match self {
            Self::Linear => EasingDef::both(CubicBezier::raw(0.0, 0.0, 1.0, 1.0), S::Linear, InOut),
            Self::Ease => EasingDef::bezier_only(CubicBezier::raw(0.25, 0.1, 0.25, 1.0)),
            Self::EaseIn => EasingDef::bezier_only(CubicBezier::raw(0.42, 0.0, 1.0, 1.0)),
            Self::EaseOut => EasingDef::bezier_only(CubicBezier::raw(0.0, 0.0, 0.58, 1.0)),
            Self::EaseInOut => EasingDef::bezier_only(CubicBezier::raw(0.42, 0.0, 0.58, 1.0)),
            Self::EaseInSine => {
                EasingDef::both(CubicBezier::raw(0.12, 0.0, 0.39, 0.0), S::Sine, In)
            }
            Self::EaseOutSine => {
                EasingDef::both(CubicBezier::raw(0.61, 1.0, 0.88, 1.0), S::Sine, Out)
            }
            Self::EaseInOutSine => {
                EasingDef::both(CubicBezier::raw(0.37, 0.0, 0.63, 1.0), S::Sine, InOut)
            }
            Self::EaseInQuad => EasingDef::both(CubicBezier::raw(0.11, 0.0, 0.5, 0.0), S::Quad, In),
            Self::EaseOutQuad => {
                EasingDef::both(CubicBezier::raw(0.5, 1.0, 0.89, 1.0), S::Quad, Out)
            }
            Self::EaseInOutQuad => {
                EasingDef::both(CubicBezier::raw(0.45, 0.0, 0.55, 1.0), S::Quad, InOut)
            }
            Self::EaseInCubic => {
                EasingDef::both(CubicBezier::raw(0.32, 0.0, 0.67, 0.0), S::Cubic, In)
            }
            Self::EaseOutCubic => {
                EasingDef::both(CubicBezier::raw(0.33, 1.0, 0.68, 1.0), S::Cubic, Out)
            }
            Self::EaseInOutCubic => {
                EasingDef::both(CubicBezier::raw(0.65, 0.0, 0.35, 1.0), S::Cubic, InOut)
            }
            Self::EaseInQuart => {
                EasingDef::both(CubicBezier::raw(0.5, 0.0, 0.75, 0.0), S::Quart, In)
            }
            Self::EaseOutQuart => {
                EasingDef::both(CubicBezier::raw(0.25, 1.0, 0.5, 1.0), S::Quart, Out)
            }
            Self::EaseInOutQuart => {
                EasingDef::both(CubicBezier::raw(0.76, 0.0, 0.24, 1.0), S::Quart, InOut)
            }
            Self::EaseInQuint => {
                EasingDef::both(CubicBezier::raw(0.64, 0.0, 0.78, 0.0), S::Quint, In)
            }
            Self::EaseOutQuint => {
                EasingDef::both(CubicBezier::raw(0.22, 1.0, 0.36, 1.0), S::Quint, Out)
            }
            Self::EaseInOutQuint => {
                EasingDef::both(CubicBezier::raw(0.83, 0.0, 0.17, 1.0), S::Quint, InOut)
            }
            Self::EaseInExpo => {
                EasingDef::both(CubicBezier::raw(0.7, 0.0, 0.84, 0.0), S::Exponential, In)
            }
            Self::EaseOutExpo => {
                EasingDef::both(CubicBezier::raw(0.16, 1.0, 0.3, 1.0), S::Exponential, Out)
            }
            Self::EaseInOutExpo => {
                EasingDef::both(CubicBezier::raw(0.87, 0.0, 0.13, 1.0), S::Exponential, InOut)
            }
            Self::EaseInCirc => {
                EasingDef::both(CubicBezier::raw(0.55, 0.0, 1.0, 0.45), S::Circular, In)
            }
            Self::EaseOutCirc => {
                EasingDef::both(CubicBezier::raw(0.0, 0.55, 0.45, 1.0), S::Circular, Out)
            }
            Self::EaseInOutCirc => {
                EasingDef::both(CubicBezier::raw(0.85, 0.0, 0.15, 1.0), S::Circular, InOut)
            }
            Self::EaseInBack => {
                EasingDef::both(CubicBezier::raw(0.36, 0.0, 0.66, -0.56), S::Back, In)
            }
            Self::EaseOutBack => {
                EasingDef::both(CubicBezier::raw(0.34, 1.56, 0.64, 1.0), S::Back, Out)
            }
            Self::EaseInOutBack => {
                EasingDef::both(CubicBezier::raw(0.68, -0.6, 0.32, 1.6), S::Back, InOut)
            }
            Self::EaseInElastic => EasingDef::native_only(S::Elastic, In),
            Self::EaseOutElastic => EasingDef::native_only(S::Elastic, Out),
            Self::EaseInOutElastic => EasingDef::native_only(S::Elastic, InOut),
            Self::EaseInBounce => EasingDef::native_only(S::Bounce, In),
            Self::EaseOutBounce => EasingDef::native_only(S::Bounce, Out),
            Self::EaseInOutBounce => EasingDef::native_only(S::Bounce, InOut),
        }
    }

    /// Look up an easing by its snake_case name (as used in `motion.toml`).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name() == name)
    }

    /// The snake_case name of this easing.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Ease => "ease",
            Self::EaseIn => "ease_in",
            Self::EaseOut => "ease_out",
            Self::EaseInOut => "ease_in_out",
            Self::EaseInSine => "ease_in_sine",
            Self::EaseOutSine => "ease_out_sine",
            Self::EaseInOutSine => "ease_in_out_sine",
            Self::EaseInQuad => "ease_in_quad",
            Self::EaseOutQuad => "ease_out_quad",
            Self::EaseInOutQuad => "ease_in_out_quad",
            Self::EaseInCubic => "ease_in_cubic",
            Self::EaseOutCubic => "ease_out_cubic",
            Self::EaseInOutCubic => "ease_in_out_cubic",
            Self::EaseInQuart => "ease_in_quart",
            Self::EaseOutQuart => "ease_out_quart",
            Self::EaseInOutQuart => "ease_in_out_quart",
            Self::EaseInQuint => "ease_in_quint",
            Self::EaseOutQuint => "ease_out_quint",
            Self::EaseInOutQuint => "ease_in_out_quint",
            Self::EaseInExpo => "ease_in_expo",
            Self::EaseOutExpo => "ease_out_expo",
            Self::EaseInOutExpo => "ease_in_out_expo",
            Self::EaseInCirc => "ease_in_circ",
            Self::EaseOutCirc => "ease_out_circ",
            Self::EaseInOutCirc => "ease_in_out_circ",
            Self::EaseInBack => "ease_in_back",
            Self::EaseOutBack => "ease_out_back",
            Self::EaseInOutBack => "ease_in_out_back",
            Self::EaseInElastic => "ease_in_elastic",
            Self::EaseOutElastic => "ease_out_elastic",
            Self::EaseInOutElastic => "ease_in_out_elastic",
            Self::EaseInBounce => "ease_in_bounce",
            Self::EaseOutBounce => "ease_out_bounce",
            Self::EaseInOutBounce => "ease_in_out_bounce",
        }
    }
}

/// Find the native descriptor for a raw Bézier quadruple, if its control
/// points are deep-equal to a catalog entry that also has a native form.
///
/// Exact equality only, no tolerance: control points that differ by
/// floating error from a preset fall through to the custom path.
pub fn native_equivalent(bezier: &CubicBezier) -> Option<NativeCurve> {
    EasingId::ALL.iter().find_map(|id| {
        let def = id.definition();
        match (def.bezier, def.native) {
            (Some(canonical), Some(native)) if canonical == *bezier => Some(native),
            _ => None,
        }
    })
}
