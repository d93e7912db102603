//! Strategy selection and animation lifecycle.
//!
//! For each resolved target the executor picks exactly one execution
//! path. Easings that resolve to a native curve descriptor, directly or
//! through control-point equivalence detection, are handed to the host's
//! native tweening facility; everything else runs on a [`CustomSampler`].
//! [`start`] returns an [`Animations`] handle that tears everything down
//! when dropped.

use std::cell::Cell;
use std::rc::Rc;

use crate::easing::{self, NativeCurve};
use crate::error::{MotionError, Result};
use crate::host::{NativeTween, NativeTweenParams, SharedObject, TweenHost, TweenObject};
use crate::sampler::CustomSampler;
use crate::target::ResolvedTarget;
use crate::transition::{Callback, Ease, PlaybackState, ProgressFn};
use crate::value::PropertyMap;

/// Default number of sub-steps a custom-sampled animation divides its
/// duration into.
pub const DEFAULT_PRECISION: u32 = 100;

enum Strategy<H: TweenHost + 'static>
where
    H::Object: 'static,
{
    Native {
        tween: Rc<dyn NativeTween>,
        callbacks: Vec<Callback>,
        fired: Rc<Cell<bool>>,
    },
    Custom(CustomSampler<H>),
}

struct Entry<H: TweenHost + 'static>
where
    H::Object: 'static,
{
    strategy: Strategy<H>,
}

/// Handle to the animations started by one executor invocation.
///
/// Dropping the handle disposes every animation it started: native tweens
/// are destroyed, samplers disconnect from the frame clock, and each
/// target's callbacks fire once with the playback state reached.
pub struct Animations<H: TweenHost + 'static>
where
    H::Object: 'static,
{
    entries: Vec<Entry<H>>,
    native: usize,
    custom: usize,
}

impl<H: TweenHost + 'static> std::fmt::Debug for Animations<H>
where
    H::Object: 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animations")
            .field("entries", &self.entries.len())
            .field("native", &self.native)
            .field("custom", &self.custom)
            .finish()
    }
}

/// Start every resolved target on `object` with the default sampling
/// precision.
pub fn start<H: TweenHost + 'static>(
    host: &Rc<H>,
    object: &SharedObject<H::Object>,
    targets: Vec<ResolvedTarget>,
) -> Result<Animations<H>>
where
    H::Object: 'static,
{
    start_with_precision(host, object, targets, DEFAULT_PRECISION)
}

/// Start every resolved target on `object`, sampling custom-path easings
/// at `precision` sub-steps.
///
/// Targets are started in list order. Validation happens up front:
/// every goal property must exist on the object with a matching value
/// kind, and nothing starts if any target fails.
///
/// # Errors
/// [`MotionError::UnknownProperty`] or [`MotionError::KindMismatch`] when
/// a goal does not fit the object.
pub fn start_with_precision<H: TweenHost + 'static>(
    host: &Rc<H>,
    object: &SharedObject<H::Object>,
    targets: Vec<ResolvedTarget>,
    precision: u32,
) -> Result<Animations<H>>
where
    H::Object: 'static,
{
    // validate every target before starting any of them
    let snapshots = targets
        .iter()
        .map(|target| snapshot(object, &target.properties))
        .collect::<Result<Vec<_>>>()?;

    let mut animations = Animations {
        entries: Vec::with_capacity(targets.len()),
        native: 0,
        custom: 0,
    };

    for (target, initial) in targets.into_iter().zip(snapshots) {
        let strategy = match plan(&target.transition.ease) {
            Plan::Native(curve) => {
                log::debug!(
                    "native tween: {} propert(ies), curve {curve:?}",
                    target.properties.len()
                );
                let tween = host.create_tween(
                    object,
                    target.properties,
                    NativeTweenParams {
                        duration: target.transition.duration,
                        curve,
                        repeat_count: target.transition.repeat_count,
                        reverses: target.transition.reverses,
                        delay: target.transition.delay,
                    },
                );

                let callbacks = target.transition.callbacks.clone();
                let fired = Rc::new(Cell::new(false));
                let fired_hook = fired.clone();
                let hook_callbacks = callbacks.clone();
                tween.on_completed(Box::new(move |state| {
                    fire_once(&fired_hook, &hook_callbacks, state);
                }));
                tween.play();

                animations.native += 1;
                Strategy::Native {
                    tween,
                    callbacks,
                    fired,
                }
            }
            Plan::Sampled(progress) => {
                log::debug!(
                    "custom sampler: {} propert(ies), {precision} sub-steps",
                    target.properties.len()
                );
                let sampler = CustomSampler::new(
                    host.clone(),
                    object.clone(),
                    target.properties,
                    initial,
                    progress,
                    &target.transition,
                    precision,
                );
                sampler.play();

                animations.custom += 1;
                Strategy::Custom(sampler)
            }
        };
        animations.entries.push(Entry { strategy });
    }

    Ok(animations)
}

/// Start every resolved target, taking the sampling precision from
/// loaded configuration.
pub fn start_with_config<H: TweenHost + 'static>(
    host: &Rc<H>,
    object: &SharedObject<H::Object>,
    targets: Vec<ResolvedTarget>,
    config: &motion_config::MotionConfig,
) -> Result<Animations<H>>
where
    H::Object: 'static,
{
    start_with_precision(host, object, targets, config.animation.precision.max(1))
}

enum Plan {
    Native(NativeCurve),
    Sampled(ProgressFn),
}

/// Pick the execution path for an easing. Named presets and raw control
/// points that exactly match a preset with a native form take the native
/// path; everything else is custom-sampled.
fn plan(ease: &Ease) -> Plan {
    match ease {
        Ease::Named(id) => {
            let def = id.definition();
            if let Some(native) = def.native {
                Plan::Native(native)
            } else {
                // every catalog entry carries at least one form
                let bezier = def.bezier.expect("easing catalog entry has no form");
                Plan::Sampled(Rc::new(move |u| bezier.evaluate(u)))
            }
        }
        Ease::Bezier(bezier) => {
            if let Some(native) = easing::native_equivalent(bezier) {
                Plan::Native(native)
            } else {
                let bezier = *bezier;
                Plan::Sampled(Rc::new(move |u| bezier.evaluate(u)))
            }
        }
        Ease::Custom(progress) => Plan::Sampled(progress.clone()),
    }
}

/// Read the current value of every goal property, checking existence and
/// kind compatibility.
fn snapshot<O: TweenObject>(
    object: &SharedObject<O>,
    goals: &PropertyMap,
) -> Result<PropertyMap> {
    let object = object.borrow();
    let mut initial = PropertyMap::with_capacity(goals.len());
    for (name, goal) in goals {
        let current = object
            .get(name)
            .ok_or_else(|| MotionError::UnknownProperty {
                property: name.clone(),
            })?;
        if current.kind() != goal.kind() {
            return Err(MotionError::KindMismatch {
                property: name.clone(),
                found: current.kind(),
                expected: goal.kind(),
            });
        }
        initial.insert(name.clone(), current);
    }
    Ok(initial)
}

fn fire_once(fired: &Cell<bool>, callbacks: &[Callback], state: PlaybackState) {
    if fired.get() {
        return;
    }
    fired.set(true);
    for callback in callbacks {
        callback(state);
    }
}

impl<H: TweenHost + 'static> Animations<H>
where
    H::Object: 'static,
{
    /// Number of animations running on the native path.
    pub fn native_count(&self) -> usize {
        self.native
    }

    /// Number of animations running on a custom sampler.
    pub fn custom_count(&self) -> usize {
        self.custom
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dispose every animation now. Each target's callbacks fire once
    /// with the playback state reached before teardown; an animation
    /// that already completed stays silent.
    pub fn stop(&mut self) {
        for entry in self.entries.drain(..) {
            match entry.strategy {
                Strategy::Native {
                    tween,
                    callbacks,
                    fired,
                } => {
                    fire_once(&fired, &callbacks, tween.playback_state());
                    tween.destroy();
                }
                Strategy::Custom(sampler) => sampler.dispose(),
            }
        }
        self.native = 0;
        self.custom = 0;
    }
}

impl<H: TweenHost + 'static> Drop for Animations<H>
where
    H::Object: 'static,
{
    fn drop(&mut self) {
        self.stop();
    }
}
