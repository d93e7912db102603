//! Target resolution: declarative requests into executable animation plans.
//!
//! An [`AnimationRequest`] is a property bag, a named variant, or an
//! ordered list mixing both. [`resolve`] expands variants, merges each
//! entry's transition over the caller's default transition, normalizes the
//! result, and removes property conflicts so every property has exactly
//! one owner per pass. Resolution is pure: the same inputs always produce
//! structurally equal output, and nothing is cached across passes.

use std::collections::{HashMap, HashSet};

use crate::error::{MotionError, Result};
use crate::transition::{Transition, TransitionSpec};
use crate::value::PropertyMap;

/// Reserved key name; never a goal property.
const TRANSITION_KEY: &str = "transition";

/// A mapping from property name to goal value, optionally carrying its own
/// transition configuration.
#[derive(Debug, Clone, Default)]
pub struct Target {
    /// Goal values keyed by property name.
    pub properties: PropertyMap,
    /// Transition for this target; merged over the default transition
    /// during resolution.
    pub transition: Option<TransitionSpec>,
}

impl Target {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a goal property.
    pub fn property(mut self, name: impl Into<String>, value: impl Into<crate::value::Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Set this target's transition.
    pub fn transition(mut self, spec: TransitionSpec) -> Self {
        self.transition = Some(spec);
        self
    }
}

/// Named, pre-registered targets supplied by the caller.
pub type Variants = HashMap<String, Target>;

/// One entry of a list request: a literal target or a variant name.
#[derive(Debug, Clone)]
pub enum RequestEntry {
    Target(Target),
    Variant(String),
}

impl From<Target> for RequestEntry {
    fn from(target: Target) -> Self {
        Self::Target(target)
    }
}

impl From<&str> for RequestEntry {
    fn from(name: &str) -> Self {
        Self::Variant(name.to_string())
    }
}

impl From<String> for RequestEntry {
    fn from(name: String) -> Self {
        Self::Variant(name)
    }
}

/// A declarative animation request.
#[derive(Debug, Clone)]
pub enum AnimationRequest {
    /// A single literal target.
    Target(Target),
    /// A single variant name.
    Variant(String),
    /// An ordered list; later entries take priority on property conflicts.
    List(Vec<RequestEntry>),
}

impl From<Target> for AnimationRequest {
    fn from(target: Target) -> Self {
        Self::Target(target)
    }
}

impl From<&str> for AnimationRequest {
    fn from(name: &str) -> Self {
        Self::Variant(name.to_string())
    }
}

impl From<String> for AnimationRequest {
    fn from(name: String) -> Self {
        Self::Variant(name)
    }
}

impl From<Vec<RequestEntry>> for AnimationRequest {
    fn from(entries: Vec<RequestEntry>) -> Self {
        Self::List(entries)
    }
}

/// A target after variant expansion, transition merge, and conflict
/// resolution. Owned exclusively by the executor invocation that consumes
/// it; created fresh on every resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget {
    /// Conflict-free goal values.
    pub properties: PropertyMap,
    /// Fully-populated transition.
    pub transition: Transition,
}

/// Look up a variant by name.
fn variant<'a>(variants: Option<&'a Variants>, name: &str) -> Result<&'a Target> {
    let variants = variants.ok_or_else(|| MotionError::NoVariants {
        name: name.to_string(),
    })?;
    variants.get(name).ok_or_else(|| {
        let mut available: Vec<String> = variants.keys().cloned().collect();
        available.sort();
        MotionError::UnknownVariant {
            name: name.to_string(),
            available,
        }
    })
}

/// Expand a request into an ordered list of literal targets.
///
/// Returns the targets and whether the request was a list (conflict
/// resolution only applies to lists).
fn expand(
    variants: Option<&Variants>,
    request: &AnimationRequest,
) -> Result<(Vec<Target>, bool)> {
    match request {
        AnimationRequest::Target(target) => Ok((vec![target.clone()], false)),
        AnimationRequest::Variant(name) => Ok((vec![variant(variants, name)?.clone()], false)),
        AnimationRequest::List(entries) => {
            let targets = entries
                .iter()
                .map(|entry| match entry {
                    RequestEntry::Target(target) => Ok(target.clone()),
                    RequestEntry::Variant(name) => Ok(variant(variants, name)?.clone()),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok((targets, true))
        }
    }
}

/// Remove property conflicts from an expanded list, scanning from the last
/// entry to the first. When multiple entries set the same property, only
/// the right-most entry's value survives; earlier entries keep their other
/// properties and their own transition.
fn resolve_conflicts(targets: &mut [Target]) {
    let mut claimed: HashSet<String> = HashSet::new();
    for target in targets.iter_mut().rev() {
        let keys: Vec<String> = target.properties.keys().cloned().collect();
        for key in keys {
            if key == TRANSITION_KEY {
                target.properties.remove(&key);
                continue;
            }
            if claimed.contains(&key) {
                target.properties.remove(&key);
            } else {
                claimed.insert(key);
            }
        }
    }
}

/// Resolve a declarative request into an ordered, conflict-free list of
/// fully-parameterized targets.
///
/// Returns `Ok(None)` when no request was supplied.
///
/// # Errors
/// [`MotionError::NoVariants`] if a variant name is used without a variant
/// table, [`MotionError::UnknownVariant`] if the name is not registered.
pub fn resolve(
    variants: Option<&Variants>,
    request: Option<&AnimationRequest>,
    default_transition: Option<&TransitionSpec>,
) -> Result<Option<Vec<ResolvedTarget>>> {
    let Some(request) = request else {
        return Ok(None);
    };

    let (mut targets, is_list) = expand(variants, request)?;
    if is_list {
        resolve_conflicts(&mut targets);
    }

    let resolved = targets
        .into_iter()
        .map(|target| ResolvedTarget {
            transition: TransitionSpec::merge(default_transition, target.transition.as_ref())
                .normalize(),
            properties: target.properties,
        })
        .collect::<Vec<_>>();

    log::trace!("resolved {} target(s)", resolved.len());
    Ok(Some(resolved))
}

/// Resolve a request into a single merged property bag, skipping
/// transitions entirely.
///
/// This is the pre-animation snapshot mode used for `initial` requests:
/// the same expansion and conflict logic as [`resolve`], folded left to
/// right into one bag.
pub fn resolve_initial(
    variants: Option<&Variants>,
    request: Option<&AnimationRequest>,
) -> Result<Option<PropertyMap>> {
    let Some(request) = request else {
        return Ok(None);
    };

    let (mut targets, is_list) = expand(variants, request)?;
    if is_list {
        resolve_conflicts(&mut targets);
    }

    let mut merged = PropertyMap::new();
    for target in targets {
        merged.extend(target.properties);
    }
    Ok(Some(merged))
}
