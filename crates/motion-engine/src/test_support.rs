//! Mock host platform for sampler and executor tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use crate::host::{
    CompletionCallback, FrameCallback, FrameFlow, FrameSubscription, NativeTween,
    NativeTweenParams, SharedObject, TweenHost, TweenObject,
};
use crate::transition::PlaybackState;
use crate::value::{PoseLerp, PropertyMap, Transform, Value};

/// A tweenable object backed by a plain property map.
#[derive(Debug, Default)]
pub struct MockObject {
    pub properties: PropertyMap,
}

impl MockObject {
    pub fn new(properties: PropertyMap) -> Self {
        Self { properties }
    }

    pub fn number(&self, property: &str) -> f64 {
        self.properties[property].as_number().unwrap()
    }
}

impl PoseLerp for MockObject {
    fn lerp_transform(&self, from: &Transform, to: &Transform, t: f32) -> Transform {
        let mut components = [0.0; 12];
        for (i, slot) in components.iter_mut().enumerate() {
            *slot = from.components[i] + (to.components[i] - from.components[i]) * t as f64;
        }
        Transform { components }
    }
}

impl TweenObject for MockObject {
    fn get(&self, property: &str) -> Option<Value> {
        self.properties.get(property).copied()
    }

    fn set(&mut self, property: &str, value: Value) {
        self.properties.insert(property.to_string(), value);
    }
}

/// A native tween that applies its goals instantly when played and fires
/// its completion notification synchronously.
pub struct MockNativeTween {
    object: SharedObject<MockObject>,
    pub goals: PropertyMap,
    pub params: NativeTweenParams,
    state: Cell<PlaybackState>,
    completed: RefCell<Option<CompletionCallback>>,
    pub destroyed: Cell<bool>,
}

impl NativeTween for MockNativeTween {
    fn play(&self) {
        {
            let mut object = self.object.borrow_mut();
            for (name, value) in &self.goals {
                object.set(name, *value);
            }
        }
        self.state.set(PlaybackState::Completed);
        if let Some(callback) = self.completed.borrow_mut().take() {
            callback(PlaybackState::Completed);
        }
    }

    fn destroy(&self) {
        self.destroyed.set(true);
    }

    fn playback_state(&self) -> PlaybackState {
        self.state.get()
    }

    fn on_completed(&self, callback: CompletionCallback) {
        *self.completed.borrow_mut() = Some(callback);
    }
}

/// A frame clock plus native tween factory that records everything it is
/// handed. `step` drives subscribed frame callbacks; created native tweens
/// stay inspectable through `tweens`.
#[derive(Default)]
pub struct RecordingHost {
    callbacks: RefCell<Vec<(u64, FrameCallback)>>,
    cancelled: Rc<RefCell<HashSet<u64>>>,
    next_id: Cell<u64>,
    pub tweens: RefCell<Vec<Rc<MockNativeTween>>>,
}

impl RecordingHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Advance the clock by `dt` seconds.
    ///
    /// Callbacks are drained before invocation so a callback may
    /// subscribe or disconnect without re-entering the callback list.
    pub fn step(&self, dt: f32) {
        let drained: Vec<_> = self.callbacks.borrow_mut().drain(..).collect();
        let mut keep = Vec::new();
        for (id, mut callback) in drained {
            if self.cancelled.borrow_mut().remove(&id) {
                continue;
            }
            match callback(dt) {
                FrameFlow::Continue => keep.push((id, callback)),
                FrameFlow::Disconnect => {}
            }
        }
        // anything subscribed during the tick goes after the survivors
        let mut slot = self.callbacks.borrow_mut();
        keep.append(&mut slot);
        *slot = keep;
    }

    /// Number of live frame subscriptions.
    pub fn subscription_count(&self) -> usize {
        let cancelled = self.cancelled.borrow();
        self.callbacks
            .borrow()
            .iter()
            .filter(|(id, _)| !cancelled.contains(id))
            .count()
    }

    /// Number of native tweens created so far, micro-tweens included.
    pub fn tween_count(&self) -> usize {
        self.tweens.borrow().len()
    }
}

impl TweenHost for RecordingHost {
    type Object = MockObject;

    fn subscribe(&self, callback: FrameCallback) -> FrameSubscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.callbacks.borrow_mut().push((id, callback));

        let cancelled = self.cancelled.clone();
        FrameSubscription::new(move || {
            cancelled.borrow_mut().insert(id);
        })
    }

    fn create_tween(
        &self,
        object: &SharedObject<MockObject>,
        goals: PropertyMap,
        params: NativeTweenParams,
    ) -> Rc<dyn NativeTween> {
        let tween = Rc::new(MockNativeTween {
            object: object.clone(),
            goals,
            params,
            state: Cell::new(PlaybackState::Begin),
            completed: RefCell::new(None),
            destroyed: Cell::new(false),
        });
        self.tweens.borrow_mut().push(tween.clone());
        tween
    }
}

/// Build a shared mock object from `(name, value)` pairs.
pub fn shared_object(properties: impl IntoIterator<Item = (&'static str, Value)>) -> SharedObject<MockObject> {
    let map = properties
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    Rc::new(RefCell::new(MockObject::new(map)))
}
