//! Transition configuration: timing, easing, and completion callbacks.
//!
//! Callers describe transitions with [`TransitionSpec`], where every field
//! is optional. The resolver merges an entry spec over a caller-supplied
//! default spec and normalizes the result into a fully-populated
//! [`Transition`] exactly once, so the executor never sees optional fields
//! or legacy aliases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use crate::easing::{CubicBezier, EasingId};

/// Playback state of a running animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Created but not yet played.
    Begin,
    /// Actively running.
    Playing,
    /// Paused; progress is preserved.
    Paused,
    /// Completed naturally.
    Completed,
    /// Cancelled before completion; properties were reverted.
    Cancelled,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Begin
    }
}

/// Completion callback, invoked with the terminal playback state.
pub type Callback = Rc<dyn Fn(PlaybackState)>;

/// An arbitrary progress-mapping function: normalized time in, eased
/// progress out.
pub type ProgressFn = Rc<dyn Fn(f32) -> f32>;

/// Easing selector for a transition.
#[derive(Clone)]
pub enum Ease {
    /// A named preset from the easing catalog.
    Named(EasingId),
    /// Raw Bézier control points. If they are deep-equal to a preset with
    /// a native form, the executor still takes the native path.
    Bezier(CubicBezier),
    /// An arbitrary progress-mapping function; always custom-sampled.
    Custom(ProgressFn),
}

impl fmt::Debug for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(id) => f.debug_tuple("Named").field(id).finish(),
            Self::Bezier(b) => f.debug_tuple("Bezier").field(b).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Ease {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Named(a), Self::Named(b)) => a == b,
            (Self::Bezier(a), Self::Bezier(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<EasingId> for Ease {
    fn from(id: EasingId) -> Self {
        Self::Named(id)
    }
}

impl From<CubicBezier> for Ease {
    fn from(bezier: CubicBezier) -> Self {
        Self::Bezier(bezier)
    }
}

/// Caller-facing transition configuration with optional fields.
#[derive(Clone, Default)]
pub struct TransitionSpec {
    /// Duration in seconds.
    pub duration: Option<f32>,
    /// Easing curve.
    pub ease: Option<Ease>,
    /// Number of extra repetitions (0 = play once).
    pub repeat_count: Option<u32>,
    /// Play the animation backwards after each forward pass.
    pub reverses: Option<bool>,
    /// Delay in seconds before the animation starts.
    pub delay: Option<f32>,
    /// Completion callbacks, invoked in order with the terminal state.
    pub callbacks: Vec<Callback>,
}

impl fmt::Debug for TransitionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionSpec")
            .field("duration", &self.duration)
            .field("ease", &self.ease)
            .field("repeat_count", &self.repeat_count)
            .field("reverses", &self.reverses)
            .field("delay", &self.delay)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl TransitionSpec {
    /// Create an empty spec; every field falls back to defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration in seconds.
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the easing curve.
    pub fn with_ease(mut self, ease: impl Into<Ease>) -> Self {
        self.ease = Some(ease.into());
        self
    }

    /// Set the repeat count.
    pub fn with_repeat_count(mut self, repeat_count: u32) -> Self {
        self.repeat_count = Some(repeat_count);
        self
    }

    /// Set whether the animation reverses after each forward pass.
    pub fn with_reverses(mut self, reverses: bool) -> Self {
        self.reverses = Some(reverses);
        self
    }

    /// Set the start delay in seconds.
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Append a completion callback.
    pub fn with_callback(mut self, callback: impl Fn(PlaybackState) + 'static) -> Self {
        self.callbacks.push(Rc::new(callback));
        self
    }

    /// Build a default spec from loaded configuration.
    ///
    /// Unknown easing names fall back to the engine default.
    pub fn from_config(config: &motion_config::MotionConfig) -> Self {
        let mut spec = Self::new().with_duration(config.animation.duration);
        if let Some(name) = config.animation.easing.as_deref() {
            if let Some(id) = EasingId::from_name(name) {
                spec.ease = Some(Ease::Named(id));
            } else {
                log::warn!("unknown easing name in config: {name:?}");
            }
        }
        spec
    }

    /// Merge an entry spec over a default spec.
    ///
    /// Entry-level settings win field-by-field. Callbacks fan out rather
    /// than override: the default's callbacks run first, then the entry's.
    pub fn merge(default: Option<&Self>, entry: Option<&Self>) -> Self {
        let mut merged = default.cloned().unwrap_or_default();
        if let Some(entry) = entry {
            if entry.duration.is_some() {
                merged.duration = entry.duration;
            }
            if entry.ease.is_some() {
                merged.ease = entry.ease.clone();
            }
            if entry.repeat_count.is_some() {
                merged.repeat_count = entry.repeat_count;
            }
            if entry.reverses.is_some() {
                merged.reverses = entry.reverses;
            }
            if entry.delay.is_some() {
                merged.delay = entry.delay;
            }
            merged.callbacks.extend(entry.callbacks.iter().cloned());
        }
        merged
    }

    /// Normalize into a fully-populated [`Transition`].
    pub fn normalize(&self) -> Transition {
        Transition {
            duration: self.duration.unwrap_or(1.0),
            ease: self.ease.clone().unwrap_or(Ease::Named(EasingId::Linear)),
            repeat_count: self.repeat_count.unwrap_or(0),
            reverses: self.reverses.unwrap_or(false),
            delay: self.delay.unwrap_or(0.0),
            callbacks: self.callbacks.clone(),
        }
    }
}

/// A fully-populated transition. Every field has a concrete value; this is
/// the only shape the executor ever consumes.
#[derive(Clone)]
pub struct Transition {
    /// Duration in seconds.
    pub duration: f32,
    /// Easing curve.
    pub ease: Ease,
    /// Number of extra repetitions (0 = play once).
    pub repeat_count: u32,
    /// Play the animation backwards after each forward pass.
    pub reverses: bool,
    /// Delay in seconds before the animation starts.
    pub delay: f32,
    /// Completion callbacks, invoked in order with the terminal state.
    pub callbacks: Vec<Callback>,
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("duration", &self.duration)
            .field("ease", &self.ease)
            .field("repeat_count", &self.repeat_count)
            .field("reverses", &self.reverses)
            .field("delay", &self.delay)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl Default for Transition {
    fn default() -> Self {
        TransitionSpec::default().normalize()
    }
}

impl Transition {
    /// Invoke every callback in order with the given state.
    pub fn fire_callbacks(&self, state: PlaybackState) {
        for callback in &self.callbacks {
            callback(state);
        }
    }
}

impl PartialEq for Transition {
    fn eq(&self, other: &Self) -> bool {
        self.duration == other.duration
            && self.ease == other.ease
            && self.repeat_count == other.repeat_count
            && self.reverses == other.reverses
            && self.delay == other.delay
            && self.callbacks.len() == other.callbacks.len()
            && self
                .callbacks
                .iter()
                .zip(other.callbacks.iter())
                .all(|(a, b)| Rc::ptr_eq(a, b))
    }
}

impl PartialEq for TransitionSpec {
    fn eq(&self, other: &Self) -> bool {
        self.duration == other.duration
            && self.ease == other.ease
            && self.repeat_count == other.repeat_count
            && self.reverses == other.reverses
            && self.delay == other.delay
            && self.callbacks.len() == other.callbacks.len()
            && self
                .callbacks
                .iter()
                .zip(other.callbacks.iter())
                .all(|(a, b)| Rc::ptr_eq(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_normalize_defaults() {
        let transition = TransitionSpec::new().normalize();
        assert_eq!(transition.duration, 1.0);
        assert_eq!(transition.ease, Ease::Named(EasingId::Linear));
        assert_eq!(transition.repeat_count, 0);
        assert!(!transition.reverses);
        assert_eq!(transition.delay, 0.0);
        assert!(transition.callbacks.is_empty());
    }

    #[test]
    fn test_merge_entry_wins_field_by_field() {
        let default = TransitionSpec::new()
            .with_duration(5.0)
            .with_ease(EasingId::EaseOutQuint)
            .with_repeat_count(3);
        let entry = TransitionSpec::new().with_duration(3.0).with_repeat_count(0);

        let merged = TransitionSpec::merge(Some(&default), Some(&entry));
        assert_eq!(merged.duration, Some(3.0));
        assert_eq!(merged.ease, Some(Ease::Named(EasingId::EaseOutQuint)));
        assert_eq!(merged.repeat_count, Some(0));
    }

    #[test]
    fn test_merge_without_entry_keeps_default() {
        let default = TransitionSpec::new().with_duration(5.0);
        let merged = TransitionSpec::merge(Some(&default), None);
        assert_eq!(merged, default);
    }

    #[test]
    fn test_merge_without_default_keeps_entry() {
        let entry = TransitionSpec::new().with_duration(5.0).with_delay(0.5);
        let merged = TransitionSpec::merge(None, Some(&entry));
        assert_eq!(merged, entry);
    }

    #[test]
    fn test_merge_callbacks_fan_out_default_first() {
        let order = Rc::new(RefCell::new(Vec::new()));

        let log_a = order.clone();
        let default = TransitionSpec::new().with_callback(move |_| log_a.borrow_mut().push("default"));
        let log_b = order.clone();
        let entry = TransitionSpec::new().with_callback(move |_| log_b.borrow_mut().push("entry"));

        let merged = TransitionSpec::merge(Some(&default), Some(&entry)).normalize();
        assert_eq!(merged.callbacks.len(), 2);

        merged.fire_callbacks(PlaybackState::Completed);
        assert_eq!(*order.borrow(), vec!["default", "entry"]);
    }

    #[test]
    fn test_merge_single_callback_passes_through() {
        let default = TransitionSpec::new().with_callback(|_| {});
        let merged = TransitionSpec::merge(Some(&default), Some(&TransitionSpec::new()));
        assert_eq!(merged.callbacks.len(), 1);

        let entry = TransitionSpec::new().with_callback(|_| {});
        let merged = TransitionSpec::merge(None, Some(&entry));
        assert_eq!(merged.callbacks.len(), 1);
    }

    #[test]
    fn test_ease_equality() {
        assert_eq!(Ease::Named(EasingId::Linear), Ease::Named(EasingId::Linear));
        assert_ne!(
            Ease::Named(EasingId::Linear),
            Ease::Named(EasingId::EaseOutQuad)
        );

        let b = CubicBezier::new(0.4, 0.0, 0.2, 1.0);
        assert_eq!(Ease::Bezier(b), Ease::Bezier(b));

        let f: ProgressFn = Rc::new(|t| t);
        assert_eq!(Ease::Custom(f.clone()), Ease::Custom(f.clone()));
        assert_ne!(Ease::Custom(f), Ease::Custom(Rc::new(|t| t)));
    }

    #[test]
    fn test_from_config() {
        let mut config = motion_config::MotionConfig::default();
        config.animation.duration = 0.25;
        config.animation.easing = Some("ease_out_quad".to_string());

        let spec = TransitionSpec::from_config(&config);
        assert_eq!(spec.duration, Some(0.25));
        assert_eq!(spec.ease, Some(Ease::Named(EasingId::EaseOutQuad)));
    }

    #[test]
    fn test_from_config_unknown_easing_falls_back() {
        let mut config = motion_config::MotionConfig::default();
        config.animation.easing = Some("not_a_real_easing".to_string());

        let spec = TransitionSpec::from_config(&config);
        assert_eq!(spec.ease, None);
    }
}
