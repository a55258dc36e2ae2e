// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation resources and the loader seam used to resolve them by name.

use crate::hash::NameHash;
use indexmap::IndexMap;
use std::sync::Arc;

/// An animation resource.
///
/// Only the metadata the blend controller needs is modelled here; keyframe data
/// lives with whoever samples the animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Resource name (for example `Models/Jack_Walk.ani`)
    name: String,
    /// Internal animation name stored inside the resource
    animation_name: String,
    /// Length in seconds
    length: f32,
}

impl Animation {
    /// Create a new animation resource
    pub fn new(name: impl Into<String>, animation_name: impl Into<String>, length: f32) -> Self {
        Self {
            name: name.into(),
            animation_name: animation_name.into(),
            length: length.max(0.0),
        }
    }

    /// Resource name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hash of the resource name
    pub fn name_hash(&self) -> NameHash {
        NameHash::new(&self.name)
    }

    /// Internal animation name
    pub fn animation_name(&self) -> &str {
        &self.animation_name
    }

    /// Hash of the internal animation name
    pub fn animation_name_hash(&self) -> NameHash {
        NameHash::new(&self.animation_name)
    }

    /// Length in seconds
    pub fn length(&self) -> f32 {
        self.length
    }
}

/// Resolves animation resources by name.
pub trait AnimationResourceLoader {
    /// Load (or fetch from cache) the named animation. `None` if it cannot be resolved.
    fn load_animation(&self, name: &str) -> Option<Arc<Animation>>;
}

/// In-memory animation registry keyed by resource name hash.
#[derive(Debug, Clone, Default)]
pub struct AnimationLibrary {
    animations: IndexMap<NameHash, Arc<Animation>>,
}

impl AnimationLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an animation, replacing any previous one with the same resource name
    pub fn insert(&mut self, animation: Animation) -> Arc<Animation> {
        let animation = Arc::new(animation);
        self.animations.insert(animation.name_hash(), Arc::clone(&animation));
        animation
    }

    /// Builder-style registration
    pub fn with(mut self, animation: Animation) -> Self {
        self.insert(animation);
        self
    }

    /// Number of registered animations
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    /// Whether the library is empty
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

impl AnimationResourceLoader for AnimationLibrary {
    fn load_animation(&self, name: &str) -> Option<Arc<Animation>> {
        self.animations.get(&NameHash::new(name)).cloned()
    }
}
