//! Host platform boundary: the per-frame clock, the native tweening
//! facility, and the tweenable object surface.
//!
//! The engine is single threaded and cooperative. It never blocks and
//! owns no clock of its own; all time passes through [`TweenHost::subscribe`]
//! callbacks, and all native-path execution goes through
//! [`TweenHost::create_tween`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::transition::PlaybackState;
use crate::value::{PoseLerp, PropertyMap, Value};

/// An animatable object: named properties the engine can read and write,
/// plus the host's canonical pose interpolation.
pub trait TweenObject: PoseLerp {
    /// Read a property's current value, or `None` if the object has no
    /// such property.
    fn get(&self, property: &str) -> Option<Value>;

    /// Write a property. Only called for properties [`TweenObject::get`]
    /// reported as present.
    fn set(&mut self, property: &str, value: Value);
}

/// A target object shared between the caller and running animations. The
/// engine borrows it per frame; it never holds a borrow across frames.
pub type SharedObject<O> = Rc<RefCell<O>>;

/// Whether a frame callback stays subscribed after this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFlow {
    /// Keep receiving frame callbacks.
    Continue,
    /// Remove this callback; equivalent to disconnecting from inside the
    /// tick.
    Disconnect,
}

/// A per-frame callback, invoked with the elapsed delta time in seconds.
pub type FrameCallback = Box<dyn FnMut(f32) -> FrameFlow>;

/// Handle to a frame subscription. Disconnects on drop, so a subscription
/// held by a sampler cannot outlive it; disconnection is immediate and no
/// further callbacks arrive afterwards.
pub struct FrameSubscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl FrameSubscription {
    /// Wrap a host-specific cancel action. The action must be safe to run
    /// after the callback already removed itself via
    /// [`FrameFlow::Disconnect`].
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Disconnect now instead of at drop time.
    pub fn disconnect(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for FrameSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for FrameSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSubscription")
            .field("connected", &self.cancel.is_some())
            .finish()
    }
}

/// Curve and timing parameters handed to the native tweening facility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeTweenParams {
    /// Duration in seconds.
    pub duration: f32,
    /// Native curve descriptor.
    pub curve: crate::easing::NativeCurve,
    /// Number of extra repetitions (0 = play once).
    pub repeat_count: u32,
    /// Play backwards after each forward pass.
    pub reverses: bool,
    /// Delay in seconds before the tween starts.
    pub delay: f32,
}

/// One-shot completion notification from a native tween.
pub type CompletionCallback = Box<dyn FnOnce(PlaybackState)>;

/// Handle to a tween running inside the host's native facility.
pub trait NativeTween {
    /// Start or restart playback.
    fn play(&self);

    /// Tear the tween down. Does not fire the completion notification;
    /// the engine reports terminal state itself on disposal.
    fn destroy(&self);

    /// Current playback state.
    fn playback_state(&self) -> PlaybackState;

    /// Register the one-shot completion notification. Fires with
    /// [`PlaybackState::Completed`] when the tween finishes naturally.
    fn on_completed(&self, callback: CompletionCallback);
}

/// The host platform as seen by the engine: a frame clock plus a native
/// tween factory over one object type.
pub trait TweenHost {
    type Object: TweenObject;

    /// Subscribe to per-frame callbacks. Dropping the returned handle
    /// disconnects.
    fn subscribe(&self, callback: FrameCallback) -> FrameSubscription;

    /// Submit goals to the native tweening facility. The returned handle
    /// is not yet playing.
    fn create_tween(
        &self,
        object: &SharedObject<Self::Object>,
        goals: PropertyMap,
        params: NativeTweenParams,
    ) -> Rc<dyn NativeTween>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_subscription_disconnects_on_drop() {
        let cancelled = Rc::new(Cell::new(0));
        let count = cancelled.clone();
        let subscription = FrameSubscription::new(move || count.set(count.get() + 1));

        assert_eq!(cancelled.get(), 0);
        drop(subscription);
        assert_eq!(cancelled.get(), 1);
    }

    #[test]
    fn test_explicit_disconnect_cancels_once() {
        let cancelled = Rc::new(Cell::new(0));
        let count = cancelled.clone();
        let subscription = FrameSubscription::new(move || count.set(count.get() + 1));

        subscription.disconnect();
        assert_eq!(cancelled.get(), 1);
    }
}
