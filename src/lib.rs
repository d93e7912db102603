//! Umbrella crate for the motion workspace.
//!
//! Re-exports the animation engine and its configuration loader; most
//! users depend on this crate and pull everything from the root.

pub use motion_engine::*;

pub use motion_config as config;
