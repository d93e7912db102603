//! Error types for the motion engine.

use thiserror::Error;

use crate::value::ValueKind;

/// Result type for motion engine operations.
pub type Result<T> = std::result::Result<T, MotionError>;

/// Errors that can occur during target resolution or tween construction.
///
/// All of these are caller mistakes that surface synchronously, at the
/// point of resolution or tween construction, never from inside a frame
/// callback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// A variant name was referenced but no variant table was supplied.
    #[error("variant \"{name}\" cannot be set because no variants have been set")]
    NoVariants {
        /// The variant name that was requested.
        name: String,
    },

    /// A variant name is not present in the variant table.
    #[error("variant \"{name}\" is invalid: {}", available.join(", "))]
    UnknownVariant {
        /// The variant name that was requested.
        name: String,
        /// The valid variant names, for the caller to fix the declaration.
        available: Vec<String>,
    },

    /// A goal property does not exist on the target object.
    #[error("property \"{property}\" does not exist on the target object")]
    UnknownProperty {
        /// The property name that was requested.
        property: String,
    },

    /// A goal value's kind does not match the object's current value kind.
    #[error(
        "property \"{property}\" cannot tween from {found:?} to {expected:?}: value kinds differ"
    )]
    KindMismatch {
        /// The property name being animated.
        property: String,
        /// Kind of the object's current value.
        found: ValueKind,
        /// Kind of the goal value.
        expected: ValueKind,
    },
}
