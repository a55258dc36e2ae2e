// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback state of animations bound to a model.
//!
//! The controller never owns an [`AnimationState`]. It keeps the name hash and
//! asks an [`AnimationStateProvider`] for the state on every call, so a model
//! that drops a state between frames simply makes the animation "not found".

use crate::hash::NameHash;
use crate::resource::Animation;
use indexmap::IndexMap;
use std::sync::Arc;

/// Runtime playback state of one animation on a model
#[derive(Debug, Clone)]
pub struct AnimationState {
    /// Animation resource being played
    animation: Arc<Animation>,
    /// Playback position in seconds
    time: f32,
    /// Blend weight in `[0, 1]`
    weight: f32,
    /// Whether playback wraps at the end
    looped: bool,
    /// Blending priority
    priority: i32,
    /// Bone the animation is applied from (whole skeleton when `None`)
    start_bone: Option<String>,
}

impl AnimationState {
    /// Create a state for an animation: time 0, weight 0, not looped
    pub fn new(animation: Arc<Animation>) -> Self {
        Self {
            animation,
            time: 0.0,
            weight: 0.0,
            looped: false,
            priority: 0,
            start_bone: None,
        }
    }

    /// The animation resource
    pub fn animation(&self) -> &Arc<Animation> {
        &self.animation
    }

    /// Playback position
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Set playback position, clamped to the animation length
    pub fn set_time(&mut self, time: f32) {
        self.time = time.clamp(0.0, self.length());
    }

    /// Advance playback. Looped states wrap, others clamp at the ends.
    pub fn add_time(&mut self, delta: f32) {
        let length = self.length();
        if delta == 0.0 || length == 0.0 {
            return;
        }

        let mut time = self.time + delta;
        if self.looped {
            time = time.rem_euclid(length);
        }
        self.set_time(time);
    }

    /// Animation length in seconds
    pub fn length(&self) -> f32 {
        self.animation.length()
    }

    /// Blend weight
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Set blend weight, clamped to `[0, 1]`
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight.clamp(0.0, 1.0);
    }

    /// Whether playback wraps
    pub fn is_looped(&self) -> bool {
        self.looped
    }

    /// Enable or disable looping
    pub fn set_looped(&mut self, looped: bool) {
        self.looped = looped;
    }

    /// Blending priority
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Set blending priority
    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    /// Start bone name
    pub fn start_bone(&self) -> Option<&str> {
        self.start_bone.as_deref()
    }

    /// Set start bone
    pub fn set_start_bone(&mut self, bone: Option<String>) {
        self.start_bone = bone;
    }

    /// Whether a non-looped state has played to its end
    pub fn is_finished(&self) -> bool {
        !self.looped && self.time >= self.length()
    }
}

/// Owner of animation states, usually an animated model.
pub trait AnimationStateProvider {
    /// Look up a state by resource name hash or internal animation name hash
    fn animation_state(&self, hash: NameHash) -> Option<&AnimationState>;

    /// Mutable lookup, same matching rules as [`Self::animation_state`]
    fn animation_state_mut(&mut self, hash: NameHash) -> Option<&mut AnimationState>;

    /// Add a state for an animation, returning the hash it is stored under.
    /// Adding an animation that already has a state returns the existing one.
    fn add_animation_state(&mut self, animation: Arc<Animation>) -> Option<NameHash>;

    /// Detach a state. Returns whether anything was removed.
    fn remove_animation_state(&mut self, hash: NameHash) -> bool;

    /// Whether the skeleton has a bone with this name
    fn has_bone(&self, name: &str) -> bool;
}

/// In-memory animated model: a bone name list plus its animation states
#[derive(Debug, Clone, Default)]
pub struct AnimatedModel {
    /// Skeleton bone names
    bones: Vec<String>,
    /// States keyed by resource name hash, in insertion order
    states: IndexMap<NameHash, AnimationState>,
}

impl AnimatedModel {
    /// Create a model without bones
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model with the given skeleton bones
    pub fn with_bones<I, S>(bones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bones: bones.into_iter().map(Into::into).collect(),
            states: IndexMap::new(),
        }
    }

    /// Number of attached states
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Iterate over attached states
    pub fn states(&self) -> impl Iterator<Item = &AnimationState> {
        self.states.values()
    }

    fn resolve_key(&self, hash: NameHash) -> Option<NameHash> {
        if self.states.contains_key(&hash) {
            return Some(hash);
        }
        self.states
            .iter()
            .find(|(_, state)| state.animation().animation_name_hash() == hash)
            .map(|(key, _)| *key)
    }
}

impl AnimationStateProvider for AnimatedModel {
    fn animation_state(&self, hash: NameHash) -> Option<&AnimationState> {
        let key = self.resolve_key(hash)?;
        self.states.get(&key)
    }

    fn animation_state_mut(&mut self, hash: NameHash) -> Option<&mut AnimationState> {
        let key = self.resolve_key(hash)?;
        self.states.get_mut(&key)
    }

    fn add_animation_state(&mut self, animation: Arc<Animation>) -> Option<NameHash> {
        let key = animation.name_hash();
        self.states
            .entry(key)
            .or_insert_with(|| AnimationState::new(animation));
        Some(key)
    }

    fn remove_animation_state(&mut self, hash: NameHash) -> bool {
        match self.resolve_key(hash) {
            Some(key) => self.states.shift_remove(&key).is_some(),
            None => false,
        }
    }

    fn has_bone(&self, name: &str) -> bool {
        self.bones.iter().any(|bone| bone == name)
    }
}
