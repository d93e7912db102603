//! Per-frame custom sampling for easings with no native equivalent.
//!
//! The sampler divides the duration into `precision` fixed sub-steps.
//! Each frame tick accumulates delta time; whenever a full sub-step has
//! elapsed, it evaluates the progress function at the current step,
//! interpolates every goal property, and drives a short linear native
//! micro-tween to the freshly computed values so motion stays smooth
//! between discrete evaluation points.
//!
//! All state lives behind one `Rc<RefCell>`; the frame callback holds a
//! weak reference and fires completion callbacks only after releasing the
//! borrow, so a callback may freely pause, cancel, or start new animations.

use std::cell::RefCell;
use std::rc::Rc;

use crate::easing::NativeCurve;
use crate::host::{
    FrameFlow, FrameSubscription, NativeTween, NativeTweenParams, SharedObject, TweenHost,
    TweenObject,
};
use crate::transition::{Callback, PlaybackState, ProgressFn, Transition};
use crate::value::PropertyMap;

/// Callbacks to fire once the sampler borrow is released.
type PendingFire = Option<(Vec<Callback>, PlaybackState)>;

/// Engine-driven animation for one resolved target.
pub struct CustomSampler<H: TweenHost + 'static>
where
    H::Object: 'static,
{
    inner: Rc<RefCell<SamplerInner<H>>>,
}

struct SamplerInner<H: TweenHost> {
    host: Rc<H>,
    object: SharedObject<H::Object>,
    goals: PropertyMap,
    initial: PropertyMap,
    progress: ProgressFn,
    duration: f32,
    precision: u32,
    repeat_count: u32,
    reverses: bool,
    callbacks: Vec<Callback>,

    state: PlaybackState,
    remaining_delay: f32,
    accumulated: f32,
    step_index: u32,
    reversed: bool,
    cycles_done: u32,
    fired: bool,
    subscription: Option<FrameSubscription>,
    micro: Option<Rc<dyn NativeTween>>,
}

impl<H: TweenHost + 'static> CustomSampler<H>
where
    H::Object: 'static,
{
    /// Build a sampler for one resolved target. `initial` must hold a
    /// snapshot value for every key in `goals`; the executor validates
    /// that before construction.
    pub(crate) fn new(
        host: Rc<H>,
        object: SharedObject<H::Object>,
        goals: PropertyMap,
        initial: PropertyMap,
        progress: ProgressFn,
        transition: &Transition,
        precision: u32,
    ) -> Self {
        assert!(precision > 0, "sampler precision must be at least 1");

        Self {
            inner: Rc::new(RefCell::new(SamplerInner {
                host,
                object,
                goals,
                initial,
                progress,
                duration: transition.duration,
                precision,
                repeat_count: transition.repeat_count,
                reverses: transition.reverses,
                callbacks: transition.callbacks.clone(),
                state: PlaybackState::Begin,
                remaining_delay: transition.delay,
                accumulated: 0.0,
                step_index: 0,
                reversed: false,
                cycles_done: 0,
                fired: false,
                subscription: None,
                micro: None,
            })),
        }
    }

    /// Start or resume playback. No-op while already playing or after a
    /// terminal state was reached. Resuming after a pause continues from
    /// the preserved step index.
    pub fn play(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            match inner.state {
                PlaybackState::Playing
                | PlaybackState::Completed
                | PlaybackState::Cancelled => return,
                PlaybackState::Begin | PlaybackState::Paused => {}
            }
            inner.state = PlaybackState::Playing;
        }

        let host = self.inner.borrow().host.clone();
        let weak = Rc::downgrade(&self.inner);
        let subscription = host.subscribe(Box::new(move |dt| {
            let Some(inner) = weak.upgrade() else {
                return FrameFlow::Disconnect;
            };
            let (flow, fire) = {
                let mut inner = inner.borrow_mut();
                inner.tick(dt)
            };
            fire_pending(fire);
            flow
        }));
        self.inner.borrow_mut().subscription = Some(subscription);
    }

    /// Pause playback: the frame subscription disconnects, partial
    /// sub-step time is discarded, and the step index is preserved.
    pub fn pause(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.state != PlaybackState::Playing {
            return;
        }
        inner.state = PlaybackState::Paused;
        inner.accumulated = 0.0;
        inner.subscription = None;
    }

    /// Cancel playback and revert every goal property to its
    /// pre-animation snapshot value. Fires callbacks with
    /// [`PlaybackState::Cancelled`].
    pub fn cancel(&self) {
        let fire = {
            let mut inner = self.inner.borrow_mut();
            if inner.is_terminal() {
                return;
            }
            inner.state = PlaybackState::Cancelled;
            inner.subscription = None;
            inner.step_index = 0;
            inner.accumulated = 0.0;
            inner.destroy_micro();

            let snapshot = inner.initial.clone();
            {
                let mut object = inner.object.borrow_mut();
                for (name, value) in &snapshot {
                    object.set(name, *value);
                }
            }
            inner.take_callbacks(PlaybackState::Cancelled)
        };
        fire_pending(fire);
    }

    /// Engine-initiated teardown. Disconnects and fires callbacks once
    /// with the current playback state; unlike [`CustomSampler::cancel`],
    /// properties keep their current values.
    pub fn dispose(&self) {
        let fire = {
            let mut inner = self.inner.borrow_mut();
            inner.subscription = None;
            inner.destroy_micro();
            let state = inner.state;
            inner.take_callbacks(state)
        };
        fire_pending(fire);
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.inner.borrow().state
    }
}

fn fire_pending(fire: PendingFire) {
    if let Some((callbacks, state)) = fire {
        for callback in &callbacks {
            callback(state);
        }
    }
}

impl<H: TweenHost> SamplerInner<H> {
    fn tick(&mut self, dt: f32) -> (FrameFlow, PendingFire) {
        if self.state != PlaybackState::Playing {
            return (FrameFlow::Disconnect, None);
        }

        let mut dt = dt;
        if self.remaining_delay > 0.0 {
            if dt < self.remaining_delay {
                self.remaining_delay -= dt;
                return (FrameFlow::Continue, None);
            }
            dt -= self.remaining_delay;
            self.remaining_delay = 0.0;
        }

        let step_duration = self.duration / self.precision as f32;
        if step_duration <= f32::EPSILON {
            // zero-length transitions settle immediately
            return self.complete();
        }

        self.accumulated += dt;
        while self.accumulated >= step_duration {
            self.accumulated -= step_duration;
            self.apply_step(step_duration);
            self.step_index += 1;
            if self.step_index > self.precision && !self.advance_cycle() {
                return self.complete();
            }
        }
        (FrameFlow::Continue, None)
    }

    /// Evaluate the progress function at the current step and drive a
    /// linear micro-tween to the interpolated values.
    fn apply_step(&mut self, step_duration: f32) {
        let u = (self.step_index as f32 / self.precision as f32).min(1.0);
        let raw = if self.reversed { 1.0 - u } else { u };
        let eased = (self.progress)(raw);

        let values: PropertyMap = {
            let object = self.object.borrow();
            self.goals
                .iter()
                .map(|(name, goal)| {
                    let from = self.initial[name.as_str()];
                    (name.clone(), from.interpolate(goal, eased, &*object))
                })
                .collect()
        };

        self.destroy_micro();
        let micro = self.host.create_tween(
            &self.object,
            values,
            NativeTweenParams {
                duration: step_duration,
                curve: NativeCurve::linear(),
                repeat_count: 0,
                reverses: false,
                delay: 0.0,
            },
        );
        micro.play();
        self.micro = Some(micro);
    }

    /// Roll over into the next pass if one remains. A reverse pass runs
    /// before the cycle counts as done.
    fn advance_cycle(&mut self) -> bool {
        if self.reverses && !self.reversed {
            self.reversed = true;
            self.step_index = 0;
            return true;
        }
        if self.cycles_done < self.repeat_count {
            self.cycles_done += 1;
            self.reversed = false;
            self.step_index = 0;
            return true;
        }
        false
    }

    fn complete(&mut self) -> (FrameFlow, PendingFire) {
        self.state = PlaybackState::Completed;
        self.subscription = None;
        self.destroy_micro();

        // settle exactly on the terminal values; the progress function is
        // not required to hit 1.0 (or 0.0) exactly at the endpoints
        let finals = if self.reversed {
            self.initial.clone()
        } else {
            self.goals.clone()
        };
        {
            let mut object = self.object.borrow_mut();
            for (name, value) in &finals {
                object.set(name, *value);
            }
        }
        (FrameFlow::Disconnect, self.take_callbacks(PlaybackState::Completed))
    }

    fn destroy_micro(&mut self) {
        if let Some(micro) = self.micro.take() {
            micro.destroy();
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            PlaybackState::Completed | PlaybackState::Cancelled
        )
    }

    fn take_callbacks(&mut self, state: PlaybackState) -> PendingFire {
        if self.fired {
            return None;
        }
        self.fired = true;
        log::debug!("sampler finished with state {state:?}");
        Some((self.callbacks.clone(), state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{shared_object, RecordingHost};
    use crate::transition::TransitionSpec;
    use crate::value::Value;
    use std::cell::RefCell as StdRefCell;

    const EPSILON: f64 = 0.001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    /// Sampler over `value: 0 -> 100`, duration 10s, 10 sub-steps, linear
    /// progress.
    fn linear_sampler(
        host: &Rc<RecordingHost>,
        spec: TransitionSpec,
    ) -> (CustomSampler<RecordingHost>, SharedObject<crate::test_support::MockObject>) {
        let object = shared_object([("value", Value::from(0.0))]);
        let mut goals = PropertyMap::new();
        goals.insert("value".to_string(), Value::from(100.0));
        let mut initial = PropertyMap::new();
        initial.insert("value".to_string(), Value::from(0.0));

        let transition = spec.with_duration(10.0).normalize();
        let sampler = CustomSampler::new(
            host.clone(),
            object.clone(),
            goals,
            initial,
            Rc::new(|u| u),
            &transition,
            10,
        );
        (sampler, object)
    }

    #[test]
    fn test_steps_advance_with_accumulated_time() {
        let host = RecordingHost::new();
        let (sampler, object) = linear_sampler(&host, TransitionSpec::new());

        sampler.play();
        assert_eq!(sampler.playback_state(), PlaybackState::Playing);
        assert_eq!(host.subscription_count(), 1);

        // 3 seconds = 3 sub-steps, last evaluated at u = 2/10
        host.step(3.0);
        assert!(approx_eq(object.borrow().number("value"), 20.0));
        assert_eq!(sampler.playback_state(), PlaybackState::Playing);

        // partial sub-steps accumulate across ticks
        host.step(0.5);
        host.step(0.5);
        assert!(approx_eq(object.borrow().number("value"), 30.0));
    }

    #[test]
    fn test_completion_settles_on_goal_and_disconnects() {
        let host = RecordingHost::new();
        let states = Rc::new(StdRefCell::new(Vec::new()));
        let log = states.clone();
        let (sampler, object) = linear_sampler(
            &host,
            TransitionSpec::new().with_callback(move |state| log.borrow_mut().push(state)),
        );

        sampler.play();
        host.step(20.0);

        assert_eq!(sampler.playback_state(), PlaybackState::Completed);
        assert_eq!(object.borrow().number("value"), 100.0);
        assert_eq!(*states.borrow(), vec![PlaybackState::Completed]);
        assert_eq!(host.subscription_count(), 0);

        // further ticks are inert
        host.step(5.0);
        assert_eq!(object.borrow().number("value"), 100.0);
        assert_eq!(*states.borrow(), vec![PlaybackState::Completed]);
    }

    #[test]
    fn test_each_step_drives_a_linear_micro_tween() {
        let host = RecordingHost::new();
        let (sampler, _object) = linear_sampler(&host, TransitionSpec::new());

        sampler.play();
        host.step(2.0);

        assert_eq!(host.tween_count(), 2);
        let tweens = host.tweens.borrow();
        let micro = &tweens[0];
        assert_eq!(micro.params.curve, NativeCurve::linear());
        assert!((micro.params.duration - 1.0).abs() < 1e-6);
        // superseded micro-tweens are destroyed
        assert!(micro.destroyed.get());
        assert!(!tweens[1].destroyed.get());
    }

    #[test]
    fn test_play_is_idempotent_while_playing() {
        let host = RecordingHost::new();
        let (sampler, _object) = linear_sampler(&host, TransitionSpec::new());

        sampler.play();
        sampler.play();
        assert_eq!(host.subscription_count(), 1);
    }

    #[test]
    fn test_pause_preserves_step_and_discards_partial_time() {
        let host = RecordingHost::new();
        let (sampler, object) = linear_sampler(&host, TransitionSpec::new());

        sampler.play();
        host.step(3.5);
        assert!(approx_eq(object.borrow().number("value"), 20.0));

        sampler.pause();
        assert_eq!(sampler.playback_state(), PlaybackState::Paused);
        assert_eq!(host.subscription_count(), 0);
        host.step(10.0);
        assert!(approx_eq(object.borrow().number("value"), 20.0));

        // resume continues from the preserved step; the half sub-step
        // accumulated before the pause was discarded
        sampler.play();
        host.step(1.0);
        assert!(approx_eq(object.borrow().number("value"), 30.0));
    }

    #[test]
    fn test_cancel_reverts_to_snapshot() {
        let host = RecordingHost::new();
        let states = Rc::new(StdRefCell::new(Vec::new()));
        let log = states.clone();
        let (sampler, object) = linear_sampler(
            &host,
            TransitionSpec::new().with_callback(move |state| log.borrow_mut().push(state)),
        );

        sampler.play();
        host.step(5.0);
        assert!(object.borrow().number("value") > 0.0);

        sampler.cancel();
        assert_eq!(sampler.playback_state(), PlaybackState::Cancelled);
        assert_eq!(object.borrow().number("value"), 0.0);
        assert_eq!(*states.borrow(), vec![PlaybackState::Cancelled]);
        assert_eq!(host.subscription_count(), 0);

        // terminal; cancel and play are now no-ops
        sampler.cancel();
        sampler.play();
        host.step(5.0);
        assert_eq!(object.borrow().number("value"), 0.0);
        assert_eq!(states.borrow().len(), 1);
    }

    #[test]
    fn test_delay_consumes_time_before_stepping() {
        let host = RecordingHost::new();
        let (sampler, object) =
            linear_sampler(&host, TransitionSpec::new().with_delay(2.0));

        sampler.play();
        host.step(1.5);
        assert_eq!(object.borrow().number("value"), 0.0);
        assert_eq!(host.tween_count(), 0);

        // 0.5s finishes the delay, the remaining 1.5s advances one step
        host.step(2.0);
        assert!(approx_eq(object.borrow().number("value"), 0.0));
        assert_eq!(host.tween_count(), 1);
        host.step(1.0);
        assert!(approx_eq(object.borrow().number("value"), 10.0));
    }

    #[test]
    fn test_reverses_returns_to_initial_before_completing() {
        let host = RecordingHost::new();
        let states = Rc::new(StdRefCell::new(Vec::new()));
        let log = states.clone();
        let (sampler, object) = linear_sampler(
            &host,
            TransitionSpec::new()
                .with_reverses(true)
                .with_callback(move |state| log.borrow_mut().push(state)),
        );

        sampler.play();
        // forward pass only
        host.step(11.0);
        assert_eq!(sampler.playback_state(), PlaybackState::Playing);
        assert!(object.borrow().number("value") > 50.0);

        // reverse pass walks back to the snapshot
        host.step(11.0);
        assert_eq!(sampler.playback_state(), PlaybackState::Completed);
        assert_eq!(object.borrow().number("value"), 0.0);
        assert_eq!(*states.borrow(), vec![PlaybackState::Completed]);
    }

    #[test]
    fn test_repeat_runs_extra_passes() {
        let host = RecordingHost::new();
        let (sampler, object) =
            linear_sampler(&host, TransitionSpec::new().with_repeat_count(1));

        sampler.play();
        host.step(11.0);
        // first pass rolled over into the repeat instead of completing
        assert_eq!(sampler.playback_state(), PlaybackState::Playing);

        host.step(11.0);
        assert_eq!(sampler.playback_state(), PlaybackState::Completed);
        assert_eq!(object.borrow().number("value"), 100.0);
    }

    #[test]
    fn test_dispose_fires_once_with_current_state() {
        let host = RecordingHost::new();
        let states = Rc::new(StdRefCell::new(Vec::new()));
        let log = states.clone();
        let (sampler, object) = linear_sampler(
            &host,
            TransitionSpec::new().with_callback(move |state| log.borrow_mut().push(state)),
        );

        sampler.play();
        host.step(5.0);
        let mid = object.borrow().number("value");

        sampler.dispose();
        assert_eq!(*states.borrow(), vec![PlaybackState::Playing]);
        assert_eq!(host.subscription_count(), 0);
        // dispose does not revert
        assert_eq!(object.borrow().number("value"), mid);

        sampler.dispose();
        assert_eq!(states.borrow().len(), 1);
    }

    #[test]
    fn test_dispose_after_completion_is_silent() {
        let host = RecordingHost::new();
        let states = Rc::new(StdRefCell::new(Vec::new()));
        let log = states.clone();
        let (sampler, _object) = linear_sampler(
            &host,
            TransitionSpec::new().with_callback(move |state| log.borrow_mut().push(state)),
        );

        sampler.play();
        host.step(20.0);
        sampler.dispose();
        assert_eq!(*states.borrow(), vec![PlaybackState::Completed]);
    }

    #[test]
    fn test_zero_duration_settles_immediately() {
        let host = RecordingHost::new();
        let object = shared_object([("value", Value::from(0.0))]);
        let mut goals = PropertyMap::new();
        goals.insert("value".to_string(), Value::from(100.0));
        let mut initial = PropertyMap::new();
        initial.insert("value".to_string(), Value::from(0.0));

        let transition = TransitionSpec::new().with_duration(0.0).normalize();
        let sampler = CustomSampler::new(
            host.clone(),
            object.clone(),
            goals,
            initial,
            Rc::new(|u| u),
            &transition,
            10,
        );

        sampler.play();
        host.step(0.016);
        assert_eq!(sampler.playback_state(), PlaybackState::Completed);
        assert_eq!(object.borrow().number("value"), 100.0);
    }
}
