//! Tweenable values and type-dispatched interpolation.
//!
//! `Value` is the closed set of property kinds the engine can animate.
//! Interpolation is exhaustive over that set; adding or removing a kind is
//! a compile-time-checked change.
//!
//! Transforms are opaque to the engine: the `Transform` arm delegates to
//! the target object's canonical pose interpolation through [`PoseLerp`]
//! rather than reimplementing matrix math here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Goal properties keyed by property name.
pub type PropertyMap = HashMap<String, Value>;

/// A 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 3D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A composite dimension: a relative scale plus an absolute pixel offset.
/// The two sub-components are independent and interpolate independently.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dim {
    pub scale: f64,
    pub offset: f64,
}

impl Dim {
    pub const fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }
}

/// Rectangular bounds as a min/max corner pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }
}

/// An opaque pose: a 3x3 rotation basis followed by a translation, in
/// row-major order. The engine stores and forwards these components but
/// never interpolates them itself; see [`PoseLerp`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub components: [f64; 12],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            // Identity basis, zero translation
            components: [
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0, //
                0.0, 0.0, 0.0,
            ],
        }
    }
}

/// Canonical pose interpolation, supplied by the target object's type.
///
/// The host platform owns the semantics of blending two poses (matrix or
/// quaternion interpolation); the engine only routes through it.
pub trait PoseLerp {
    fn lerp_transform(&self, from: &Transform, to: &Transform, t: f32) -> Transform;
}

/// Enum representing all tweenable value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    /// Numeric value.
    Number { value: f64 },
    /// Boolean value. Booleans cannot be smoothly interpolated; they hold
    /// the initial value until progress reaches 1, then snap to the goal.
    Bool { value: bool },
    /// 2D vector.
    Vec2 {
        #[serde(flatten)]
        vector: Vec2,
    },
    /// 3D vector.
    Vec3 {
        #[serde(flatten)]
        vector: Vec3,
    },
    /// RGBA color.
    Color { rgba: [f32; 4] },
    /// Composite scale/offset pair.
    Dim {
        #[serde(flatten)]
        dim: Dim,
    },
    /// Rectangular bounds.
    Rect {
        #[serde(flatten)]
        rect: Rect,
    },
    /// Opaque pose, interpolated through the target's [`PoseLerp`].
    Transform {
        #[serde(flatten)]
        transform: Transform,
    },
}

/// The kind of a [`Value`], for construction-time compatibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Number,
    Bool,
    Vec2,
    Vec3,
    Color,
    Dim,
    Rect,
    Transform,
}

/// Trait for types that interpolate linearly between two values.
///
/// When t = 0.0, returns self; when t = 1.0, returns to.
pub trait Interpolate: Sized {
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

#[inline]
fn lerp_f64(from: f64, to: f64, t: f32) -> f64 {
    from + (to - from) * t as f64
}

#[inline]
fn lerp_f32(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp_f64(*self, *to, t)
    }
}

impl Interpolate for [f32; 4] {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        [
            lerp_f32(self[0], to[0], t),
            lerp_f32(self[1], to[1], t),
            lerp_f32(self[2], to[2], t),
            lerp_f32(self[3], to[3], t),
        ]
    }
}

impl Interpolate for Vec2 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            x: lerp_f64(self.x, to.x, t),
            y: lerp_f64(self.y, to.y, t),
        }
    }
}

impl Interpolate for Vec3 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            x: lerp_f64(self.x, to.x, t),
            y: lerp_f64(self.y, to.y, t),
            z: lerp_f64(self.z, to.z, t),
        }
    }
}

impl Interpolate for Dim {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            scale: lerp_f64(self.scale, to.scale, t),
            offset: lerp_f64(self.offset, to.offset, t),
        }
    }
}

impl Interpolate for Rect {
    /// Each corner interpolates as a vector.
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            min: self.min.interpolate(&to.min, t),
            max: self.max.interpolate(&to.max, t),
        }
    }
}

impl Value {
    /// The kind of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Number { .. } => ValueKind::Number,
            Self::Bool { .. } => ValueKind::Bool,
            Self::Vec2 { .. } => ValueKind::Vec2,
            Self::Vec3 { .. } => ValueKind::Vec3,
            Self::Color { .. } => ValueKind::Color,
            Self::Dim { .. } => ValueKind::Dim,
            Self::Rect { .. } => ValueKind::Rect,
            Self::Transform { .. } => ValueKind::Transform,
        }
    }

    /// Interpolate between this value and `to` at progress `t`.
    ///
    /// The executor validates kind compatibility when a tween is
    /// constructed, so a mismatch here is a programmer error.
    ///
    /// # Panics
    /// Panics if `self` and `to` are different kinds.
    pub fn interpolate(&self, to: &Self, t: f32, pose: &dyn PoseLerp) -> Self {
        match (self, to) {
            (Self::Number { value: from }, Self::Number { value: to_val }) => Self::Number {
                value: from.interpolate(to_val, t),
            },
            (Self::Bool { value: from }, Self::Bool { value: to_val }) => Self::Bool {
                value: if t >= 1.0 { *to_val } else { *from },
            },
            (Self::Vec2 { vector: from }, Self::Vec2 { vector: to_val }) => Self::Vec2 {
                vector: from.interpolate(to_val, t),
            },
            (Self::Vec3 { vector: from }, Self::Vec3 { vector: to_val }) => Self::Vec3 {
                vector: from.interpolate(to_val, t),
            },
            (Self::Color { rgba: from }, Self::Color { rgba: to_val }) => Self::Color {
                rgba: from.interpolate(to_val, t),
            },
            (Self::Dim { dim: from }, Self::Dim { dim: to_val }) => Self::Dim {
                dim: from.interpolate(to_val, t),
            },
            (Self::Rect { rect: from }, Self::Rect { rect: to_val }) => Self::Rect {
                rect: from.interpolate(to_val, t),
            },
            (Self::Transform { transform: from }, Self::Transform { transform: to_val }) => {
                Self::Transform {
                    transform: pose.lerp_transform(from, to_val, t),
                }
            }
            (from, to) => panic!(
                "cannot interpolate between value kinds {:?} and {:?}",
                from.kind(),
                to.kind()
            ),
        }
    }

    /// Try to extract a numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number { value } => Some(*value),
            _ => None,
        }
    }

    /// Try to extract a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool { value } => Some(*value),
            _ => None,
        }
    }

    /// Try to extract a 2D vector.
    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            Self::Vec2 { vector } => Some(*vector),
            _ => None,
        }
    }

    /// Try to extract a 3D vector.
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Self::Vec3 { vector } => Some(*vector),
            _ => None,
        }
    }

    /// Try to extract a color.
    pub fn as_color(&self) -> Option<[f32; 4]> {
        match self {
            Self::Color { rgba } => Some(*rgba),
            _ => None,
        }
    }

    /// Try to extract a scale/offset pair.
    pub fn as_dim(&self) -> Option<Dim> {
        match self {
            Self::Dim { dim } => Some(*dim),
            _ => None,
        }
    }

    /// Try to extract rectangular bounds.
    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            Self::Rect { rect } => Some(*rect),
            _ => None,
        }
    }

    /// Try to extract a transform.
    pub fn as_transform(&self) -> Option<Transform> {
        match self {
            Self::Transform { transform } => Some(*transform),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number { value: v }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool { value: v }
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Self::Vec2 { vector: v }
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Self::Vec3 { vector: v }
    }
}

impl From<[f32; 4]> for Value {
    fn from(c: [f32; 4]) -> Self {
        Self::Color { rgba: c }
    }
}

impl From<Dim> for Value {
    fn from(d: Dim) -> Self {
        Self::Dim { dim: d }
    }
}

impl From<Rect> for Value {
    fn from(r: Rect) -> Self {
        Self::Rect { rect: r }
    }
}

impl From<Transform> for Value {
    fn from(t: Transform) -> Self {
        Self::Transform { transform: t }
    }
}
