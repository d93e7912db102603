//! Declarative animation engine: resolution and interpolation of
//! property tweens on a host-provided object.
//!
//! This crate provides:
//! - **Target resolution**: declarative requests (property bags, named
//!   variants, ordered lists of either) into conflict-free animation plans
//! - **Easing catalog**: named presets with cubic Bézier and/or native
//!   curve forms, plus equivalence detection for raw control points
//! - **Interpolation**: type-dispatched lerp over a closed set of
//!   tweenable value kinds
//! - **Execution**: native-path delegation when a curve has an exact
//!   native form, per-frame custom sampling otherwise
//!
//! # Architecture
//!
//! ```text
//! AnimationRequest
//!   └── target::resolve ── Vec<ResolvedTarget>
//!         └── executor::start
//!               ├── TweenHost::create_tween   (native path)
//!               └── CustomSampler             (custom path)
//!                     ├── CubicBezier / ProgressFn
//!                     └── Value::interpolate
//! ```
//!
//! The engine is single threaded and cooperative: all time arrives
//! through the host's per-frame callbacks, and the engine never blocks.

pub mod easing;
pub mod error;
pub mod executor;
pub mod host;
pub mod sampler;
pub mod target;
pub mod transition;
pub mod value;

#[cfg(test)]
pub mod test_support;

pub use easing::{
    native_equivalent, CubicBezier, EasingDef, EasingDirection, EasingId, EasingStyle, NativeCurve,
};
pub use error::{MotionError, Result};
pub use executor::{
    start, start_with_config, start_with_precision, Animations, DEFAULT_PRECISION,
};
pub use host::{
    CompletionCallback, FrameCallback, FrameFlow, FrameSubscription, NativeTween,
    NativeTweenParams, SharedObject, TweenHost, TweenObject,
};
pub use sampler::CustomSampler;
pub use target::{
    resolve, resolve_initial, AnimationRequest, RequestEntry, ResolvedTarget, Target, Variants,
};
pub use transition::{Callback, Ease, PlaybackState, ProgressFn, Transition, TransitionSpec};
pub use value::{
    Dim, Interpolate, PoseLerp, PropertyMap, Rect, Transform, Value, ValueKind, Vec2, Vec3,
};
