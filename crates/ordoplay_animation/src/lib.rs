// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation blend control for OrdoPlay.
//!
//! This crate drives the blend weights of animations playing on a model:
//! - Per-animation weight fades with a fixed duration
//! - Autofade once a non-looped animation ends
//! - Exclusion groups with fade-out of the rest of the group
//! - Binary persistence of the control tracks
//!
//! ## Architecture
//!
//! The [`AnimationController`] only owns [`AnimationTrack`] records. Playback
//! state lives on the model and is reached through the
//! [`AnimationStateProvider`] passed to each call. Missing animation states are
//! created from resources returned by an [`AnimationResourceLoader`].

pub mod codec;
pub mod controller;
pub mod hash;
pub mod resource;
pub mod state;
pub mod track;

pub use codec::{decode_tracks, encode_tracks, TrackCodecError, TRACK_RECORD_SIZE};
pub use controller::{AnimationController, AnimationLookup, SetAnimation, FADE_EPSILON};
pub use hash::NameHash;
pub use resource::{Animation, AnimationLibrary, AnimationResourceLoader};
pub use state::{AnimatedModel, AnimationState, AnimationStateProvider};
pub use track::{AnimationTrack, TrackPhase};
