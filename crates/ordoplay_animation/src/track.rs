// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation control tracks.

use crate::hash::NameHash;
use serde::{Deserialize, Serialize};

/// Per-animation blend control record.
///
/// A track binds an animation (by resource name hash) to the parameters the
/// controller drives every frame. The playback state itself lives on the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationTrack {
    /// Resource name hash of the animation
    pub name_hash: NameHash,
    /// Exclusion group
    pub group: u8,
    /// Playback speed multiplier
    pub speed: f32,
    /// Weight the fade converges to, in `[0, 1]`
    pub target_weight: f32,
    /// Time in seconds to fade across the full weight range
    pub fade_time: f32,
    /// Fade-out time applied once a non-looped animation has ended
    pub auto_fade_time: f32,
}

impl AnimationTrack {
    /// Create a track with default blend parameters
    pub fn new(name_hash: NameHash) -> Self {
        Self {
            name_hash,
            group: 0,
            speed: 1.0,
            target_weight: 0.0,
            fade_time: 0.0,
            auto_fade_time: 0.0,
        }
    }

    /// Builder-style group assignment
    pub fn with_group(mut self, group: u8) -> Self {
        self.group = group;
        self
    }

    /// Schedule a fade to `target_weight` over `fade_time` seconds
    pub fn fade_to(&mut self, target_weight: f32, fade_time: f32) {
        self.target_weight = target_weight.clamp(0.0, 1.0);
        self.fade_time = fade_time;
    }
}

/// Lifecycle phase of a track, derived from the track and its playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackPhase {
    /// Weight is pursuing (or holding at) the target
    Active,
    /// Non-looped animation ended and is fading out
    AutoFading,
    /// Will be removed by the next update
    PendingRemoval,
    /// No longer tracked, or the model dropped the state
    Removed,
}

impl TrackPhase {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::AutoFading => "AutoFading",
            Self::PendingRemoval => "PendingRemoval",
            Self::Removed => "Removed",
        }
    }
}
