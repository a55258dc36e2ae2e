// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation controller driving weight fades on a model's animation states.
//!
//! The controller owns one [`AnimationTrack`] per active animation. Each frame
//! [`AnimationController::update`] advances playback, steps weights towards
//! their targets and drops tracks whose weight has faded out. Animation states
//! are looked up through the [`AnimationStateProvider`] passed to every call.

use crate::codec::{self, decode_tracks, encode_tracks};
use crate::hash::NameHash;
use crate::resource::AnimationResourceLoader;
use crate::state::{AnimationState, AnimationStateProvider};
use crate::track::{AnimationTrack, TrackPhase};
use std::sync::Arc;

/// Minimum fade time used when a fade must not complete instantly
pub const FADE_EPSILON: f32 = 0.000_001;

/// Result of resolving an animation name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimationLookup {
    /// Index of the controller track, if any
    pub index: Option<usize>,
    /// Resource name hash of the model's state, if any
    pub state: Option<NameHash>,
}

impl AnimationLookup {
    /// Whether either a track or a state was found
    pub fn is_found(&self) -> bool {
        self.index.is_some() || self.state.is_some()
    }
}

/// Parameters for [`AnimationController::set_animation`]
#[derive(Debug, Clone, PartialEq)]
pub struct SetAnimation {
    /// Resource name or internal animation name
    pub name: String,
    /// Exclusion group
    pub group: u8,
    /// Loop playback
    pub looped: bool,
    /// Rewind to the start
    pub restart: bool,
    /// Playback speed
    pub speed: f32,
    /// Weight to fade to (or to apply immediately without a fade)
    pub target_weight: f32,
    /// Fade duration; zero or less applies the weight immediately
    pub fade_time: f32,
    /// Fade-out time once a non-looped animation ends
    pub auto_fade_time: f32,
    /// Fade out the other animations of the same group
    pub fade_out_others_in_group: bool,
}

impl SetAnimation {
    /// Play `name` at full weight, once, at normal speed
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: 0,
            looped: false,
            restart: false,
            speed: 1.0,
            target_weight: 1.0,
            fade_time: 0.0,
            auto_fade_time: 0.0,
            fade_out_others_in_group: false,
        }
    }

    /// Set the group
    pub fn group(mut self, group: u8) -> Self {
        self.group = group;
        self
    }

    /// Set looping
    pub fn looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    /// Rewind before playing
    pub fn restart(mut self, restart: bool) -> Self {
        self.restart = restart;
        self
    }

    /// Set the playback speed
    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Fade to `target_weight` over `fade_time` seconds
    pub fn fade(mut self, target_weight: f32, fade_time: f32) -> Self {
        self.target_weight = target_weight;
        self.fade_time = fade_time;
        self
    }

    /// Set the autofade time
    pub fn auto_fade(mut self, auto_fade_time: f32) -> Self {
        self.auto_fade_time = auto_fade_time;
        self
    }

    /// Fade out the rest of the group
    pub fn fade_out_others(mut self, enable: bool) -> Self {
        self.fade_out_others_in_group = enable;
        self
    }
}

/// Target weight and fade time in effect for a track this frame.
///
/// A finished non-looped animation with an autofade fades to zero regardless of
/// the stored target.
fn effective_fade(track: &AnimationTrack, state: &AnimationState) -> (f32, f32) {
    if state.is_finished() && track.auto_fade_time > 0.0 {
        (0.0, track.auto_fade_time)
    } else {
        (track.target_weight, track.fade_time)
    }
}

fn is_faded_out(weight: f32, target_weight: f32, fade_time: f32) -> bool {
    weight == 0.0 && (target_weight == 0.0 || fade_time == 0.0)
}

/// Drives blend weights of a model's animation states
pub struct AnimationController {
    /// Active tracks in creation order
    tracks: Vec<AnimationTrack>,
    /// Resource loader used when an animation has no state yet
    loader: Arc<dyn AnimationResourceLoader>,
}

impl AnimationController {
    /// Create a controller resolving resources through `loader`
    pub fn new(loader: Arc<dyn AnimationResourceLoader>) -> Self {
        Self {
            tracks: Vec::new(),
            loader,
        }
    }

    /// Advance all tracks by `time_step` seconds.
    ///
    /// Tracks whose state disappeared, or whose weight reached zero with no
    /// pending fade, are removed and their state detached from the model.
    pub fn update(&mut self, model: &mut dyn AnimationStateProvider, time_step: f32) {
        self.tracks.retain_mut(|track| {
            let Some(state) = model.animation_state_mut(track.name_hash) else {
                tracing::trace!("Dropping track {} without animation state", track.name_hash);
                return false;
            };

            if track.speed != 0.0 {
                state.add_time(track.speed * time_step);
            }

            let (target_weight, fade_time) = effective_fade(track, state);

            let mut weight = state.weight();
            if weight != target_weight && fade_time > 0.0 {
                let delta = time_step / fade_time;
                if weight < target_weight {
                    weight = (weight + delta).min(target_weight);
                } else {
                    weight = (weight - delta).max(target_weight);
                }
                state.set_weight(weight);
            }

            if is_faded_out(state.weight(), target_weight, fade_time) {
                tracing::trace!("Track {} faded out", track.name_hash);
                model.remove_animation_state(track.name_hash);
                return false;
            }
            true
        });
    }

    /// Resolve an animation name to its track index and state.
    ///
    /// A name may be an alias of the resource (its internal animation name).
    /// Tracks are keyed by resource name, so when the model knows the state the
    /// hash is corrected to the resource hash before scanning the tracks.
    pub fn find_animation(&self, model: &dyn AnimationStateProvider, name: &str) -> AnimationLookup {
        let mut name_hash = NameHash::new(name);
        let state = model
            .animation_state(name_hash)
            .map(|state| state.animation().name_hash());
        if let Some(resource_hash) = state {
            name_hash = resource_hash;
        }

        AnimationLookup {
            index: self.index_of(name_hash),
            state,
        }
    }

    fn index_of(&self, name_hash: NameHash) -> Option<usize> {
        self.tracks.iter().position(|track| track.name_hash == name_hash)
    }

    fn find_track_mut(&mut self, model: &dyn AnimationStateProvider, name: &str) -> Option<&mut AnimationTrack> {
        let index = self.find_animation(model, name).index?;
        self.tracks.get_mut(index)
    }

    fn find_track(&self, model: &dyn AnimationStateProvider, name: &str) -> Option<&AnimationTrack> {
        let index = self.find_animation(model, name).index?;
        self.tracks.get(index)
    }

    /// Start controlling an animation. If it is already controlled only the group changes.
    ///
    /// Returns false if the resource cannot be loaded or the model refuses the state.
    pub fn add_animation(&mut self, model: &mut dyn AnimationStateProvider, name: &str, group: u8) -> bool {
        let lookup = self.find_animation(model, name);

        let name_hash = match lookup.state {
            Some(hash) => hash,
            None => {
                let Some(animation) = self.loader.load_animation(name) else {
                    tracing::warn!("Animation resource {name} not found");
                    return false;
                };
                let Some(hash) = model.add_animation_state(animation) else {
                    tracing::warn!("Could not create animation state for {name}");
                    return false;
                };
                hash
            }
        };

        let index = match lookup.index.or_else(|| self.index_of(name_hash)) {
            Some(index) => index,
            None => {
                tracing::debug!("Added animation track {name} ({name_hash})");
                self.tracks.push(AnimationTrack::new(name_hash));
                self.tracks.len() - 1
            }
        };

        self.tracks[index].group = group;
        true
    }

    /// Stop controlling an animation.
    ///
    /// A `fade_time` of zero or less removes it immediately, otherwise it fades
    /// out and is removed by a later update. Returns whether it was found.
    pub fn remove_animation(&mut self, model: &mut dyn AnimationStateProvider, name: &str, fade_time: f32) -> bool {
        let lookup = self.find_animation(model, name);

        if fade_time <= 0.0 {
            if let Some(index) = lookup.index {
                self.tracks.remove(index);
            }
            if let Some(hash) = lookup.state {
                model.remove_animation_state(hash);
            }
            tracing::debug!("Removed animation {name}");
        } else if let Some(index) = lookup.index {
            self.tracks[index].fade_to(0.0, fade_time);
        }

        lookup.is_found()
    }

    /// Remove every animation of a group. Only a negative `fade_time` removes immediately.
    pub fn remove_animations(&mut self, model: &mut dyn AnimationStateProvider, group: u8, fade_time: f32) {
        self.remove_matching(model, fade_time, |track| track.group == group);
    }

    /// Remove every animation. Only a negative `fade_time` removes immediately.
    pub fn remove_all_animations(&mut self, model: &mut dyn AnimationStateProvider, fade_time: f32) {
        self.remove_matching(model, fade_time, |_| true);
    }

    fn remove_matching<F>(&mut self, model: &mut dyn AnimationStateProvider, fade_time: f32, matches: F)
    where
        F: Fn(&AnimationTrack) -> bool,
    {
        self.tracks.retain_mut(|track| {
            if !matches(track) {
                return true;
            }
            if fade_time < 0.0 {
                model.remove_animation_state(track.name_hash);
                return false;
            }
            track.fade_to(0.0, fade_time);
            true
        });
    }

    /// Play an animation with the given blend parameters.
    ///
    /// Setting a zero target on an animation that is not playing does nothing
    /// and succeeds. Returns false only if the animation had to be added and
    /// could not be.
    pub fn set_animation(&mut self, model: &mut dyn AnimationStateProvider, params: &SetAnimation) -> bool {
        let mut lookup = self.find_animation(model, &params.name);
        if lookup.index.is_none() || lookup.state.is_none() {
            if params.target_weight <= 0.0 {
                return true;
            }
            if !self.add_animation(model, &params.name, params.group) {
                return false;
            }
            lookup = self.find_animation(model, &params.name);
        }

        let (Some(index), Some(state_hash)) = (lookup.index, lookup.state) else {
            return false;
        };
        let Some(state) = model.animation_state_mut(state_hash) else {
            return false;
        };

        state.set_looped(params.looped);
        if params.restart {
            state.set_time(0.0);
        }
        if params.fade_time <= 0.0 {
            state.set_weight(params.target_weight);
        }

        let track = &mut self.tracks[index];
        track.group = params.group;
        track.speed = params.speed;
        if params.fade_time > 0.0 {
            track.target_weight = params.target_weight.clamp(0.0, 1.0);
        }
        track.fade_time = params.fade_time.max(0.0);
        track.auto_fade_time = params.auto_fade_time.max(0.0);

        if params.fade_out_others_in_group {
            let fade_time = params.fade_time.max(FADE_EPSILON);
            for (i, other) in self.tracks.iter_mut().enumerate() {
                if i != index && other.group == params.group {
                    other.fade_to(0.0, fade_time);
                }
            }
        }
        true
    }

    /// Set all blend parameters of a controlled animation
    pub fn set_properties(
        &mut self,
        model: &dyn AnimationStateProvider,
        name: &str,
        group: u8,
        speed: f32,
        target_weight: f32,
        fade_time: f32,
        auto_fade_time: f32,
    ) -> bool {
        let Some(track) = self.find_track_mut(model, name) else {
            return false;
        };
        track.group = group;
        track.speed = speed;
        track.target_weight = target_weight.clamp(0.0, 1.0);
        track.fade_time = fade_time.max(0.0);
        track.auto_fade_time = auto_fade_time.max(0.0);
        true
    }

    /// Set the current weight immediately, cancelling any fade in progress
    pub fn set_weight(&mut self, model: &mut dyn AnimationStateProvider, name: &str, weight: f32) -> bool {
        let lookup = self.find_animation(model, name);
        let (Some(index), Some(state_hash)) = (lookup.index, lookup.state) else {
            return false;
        };
        let Some(state) = model.animation_state_mut(state_hash) else {
            return false;
        };
        state.set_weight(weight);
        self.tracks[index].fade_time = 0.0;
        true
    }

    /// Fade a controlled animation to `target_weight` over `time` seconds
    pub fn set_fade(&mut self, model: &dyn AnimationStateProvider, name: &str, target_weight: f32, time: f32) -> bool {
        let Some(track) = self.find_track_mut(model, name) else {
            return false;
        };
        track.fade_to(target_weight, time.max(FADE_EPSILON));
        true
    }

    /// Fade every other animation in the named animation's group
    pub fn set_fade_others(&mut self, model: &dyn AnimationStateProvider, name: &str, target_weight: f32, time: f32) -> bool {
        let Some(index) = self.find_animation(model, name).index else {
            return false;
        };
        let group = self.tracks[index].group;
        let fade_time = time.max(FADE_EPSILON);

        for (i, track) in self.tracks.iter_mut().enumerate() {
            if i != index && track.group == group {
                track.fade_to(target_weight, fade_time);
            }
        }
        true
    }

    /// Set the playback position of an animation state
    pub fn set_time(&mut self, model: &mut dyn AnimationStateProvider, name: &str, time: f32) -> bool {
        match model.animation_state_mut(NameHash::new(name)) {
            Some(state) => {
                state.set_time(time);
                true
            }
            None => false,
        }
    }

    /// Enable or disable looping of an animation state
    pub fn set_looped(&mut self, model: &mut dyn AnimationStateProvider, name: &str, looped: bool) -> bool {
        match model.animation_state_mut(NameHash::new(name)) {
            Some(state) => {
                state.set_looped(looped);
                true
            }
            None => false,
        }
    }

    /// Set the blending priority of an animation state
    pub fn set_priority(&mut self, model: &mut dyn AnimationStateProvider, name: &str, priority: i32) -> bool {
        match model.animation_state_mut(NameHash::new(name)) {
            Some(state) => {
                state.set_priority(priority);
                true
            }
            None => false,
        }
    }

    /// Set the start bone of an animation state. Unknown bones clear it.
    pub fn set_start_bone(&mut self, model: &mut dyn AnimationStateProvider, name: &str, start_bone: &str) -> bool {
        let bone = model.has_bone(start_bone).then(|| start_bone.to_string());
        match model.animation_state_mut(NameHash::new(name)) {
            Some(state) => {
                state.set_start_bone(bone);
                true
            }
            None => false,
        }
    }

    /// Set priority and start bone together
    pub fn set_blending(
        &mut self,
        model: &mut dyn AnimationStateProvider,
        name: &str,
        priority: i32,
        start_bone: &str,
    ) -> bool {
        let bone = model.has_bone(start_bone).then(|| start_bone.to_string());
        match model.animation_state_mut(NameHash::new(name)) {
            Some(state) => {
                state.set_priority(priority);
                state.set_start_bone(bone);
                true
            }
            None => false,
        }
    }

    /// Set the group of a controlled animation
    pub fn set_group(&mut self, model: &dyn AnimationStateProvider, name: &str, group: u8) -> bool {
        let Some(track) = self.find_track_mut(model, name) else {
            return false;
        };
        track.group = group;
        true
    }

    /// Set the playback speed of a controlled animation
    pub fn set_speed(&mut self, model: &dyn AnimationStateProvider, name: &str, speed: f32) -> bool {
        let Some(track) = self.find_track_mut(model, name) else {
            return false;
        };
        track.speed = speed;
        true
    }

    /// Set the autofade time of a controlled animation
    pub fn set_auto_fade(&mut self, model: &dyn AnimationStateProvider, name: &str, time: f32) -> bool {
        let Some(track) = self.find_track_mut(model, name) else {
            return false;
        };
        track.auto_fade_time = time.max(0.0);
        true
    }

    /// Whether the animation is controlled
    pub fn has_animation(&self, model: &dyn AnimationStateProvider, name: &str) -> bool {
        self.find_animation(model, name).index.is_some()
    }

    /// Current weight, 0 if unknown
    pub fn weight(&self, model: &dyn AnimationStateProvider, name: &str) -> f32 {
        model
            .animation_state(NameHash::new(name))
            .map_or(0.0, AnimationState::weight)
    }

    /// Playback position, 0 if unknown
    pub fn time(&self, model: &dyn AnimationStateProvider, name: &str) -> f32 {
        model
            .animation_state(NameHash::new(name))
            .map_or(0.0, AnimationState::time)
    }

    /// Animation length, 0 if unknown
    pub fn length(&self, model: &dyn AnimationStateProvider, name: &str) -> f32 {
        model
            .animation_state(NameHash::new(name))
            .map_or(0.0, AnimationState::length)
    }

    /// Whether the animation loops, false if unknown
    pub fn is_looped(&self, model: &dyn AnimationStateProvider, name: &str) -> bool {
        model
            .animation_state(NameHash::new(name))
            .is_some_and(AnimationState::is_looped)
    }

    /// Blending priority, 0 if unknown
    pub fn priority(&self, model: &dyn AnimationStateProvider, name: &str) -> i32 {
        model
            .animation_state(NameHash::new(name))
            .map_or(0, AnimationState::priority)
    }

    /// Start bone name, `None` if unknown or unset
    pub fn start_bone<'a>(&self, model: &'a dyn AnimationStateProvider, name: &str) -> Option<&'a str> {
        model.animation_state(NameHash::new(name))?.start_bone()
    }

    /// Group, 0 if not controlled
    pub fn group(&self, model: &dyn AnimationStateProvider, name: &str) -> u8 {
        self.find_track(model, name).map_or(0, |track| track.group)
    }

    /// Playback speed, 0 if not controlled
    pub fn speed(&self, model: &dyn AnimationStateProvider, name: &str) -> f32 {
        self.find_track(model, name).map_or(0.0, |track| track.speed)
    }

    /// Fade target weight, 0 if not controlled
    pub fn fade_target(&self, model: &dyn AnimationStateProvider, name: &str) -> f32 {
        self.find_track(model, name).map_or(0.0, |track| track.target_weight)
    }

    /// Fade time, 0 if not controlled
    pub fn fade_time(&self, model: &dyn AnimationStateProvider, name: &str) -> f32 {
        self.find_track(model, name).map_or(0.0, |track| track.fade_time)
    }

    /// Autofade time, 0 if not controlled
    pub fn auto_fade(&self, model: &dyn AnimationStateProvider, name: &str) -> f32 {
        self.find_track(model, name).map_or(0.0, |track| track.auto_fade_time)
    }

    /// Lifecycle phase of an animation as of the last update
    pub fn phase(&self, model: &dyn AnimationStateProvider, name: &str) -> TrackPhase {
        let lookup = self.find_animation(model, name);
        let Some(track) = lookup.index.and_then(|index| self.tracks.get(index)) else {
            return TrackPhase::Removed;
        };
        let Some(state) = lookup.state.and_then(|hash| model.animation_state(hash)) else {
            return TrackPhase::Removed;
        };

        let (target_weight, fade_time) = effective_fade(track, state);
        if is_faded_out(state.weight(), target_weight, fade_time) {
            TrackPhase::PendingRemoval
        } else if state.is_finished() && track.auto_fade_time > 0.0 {
            TrackPhase::AutoFading
        } else {
            TrackPhase::Active
        }
    }

    /// All tracks in creation order
    pub fn tracks(&self) -> &[AnimationTrack] {
        &self.tracks
    }

    /// Replace the track list. Later duplicates of a name hash are dropped.
    pub fn set_tracks(&mut self, tracks: impl IntoIterator<Item = AnimationTrack>) {
        self.tracks.clear();
        for track in tracks {
            if self.index_of(track.name_hash).is_none() {
                self.tracks.push(track);
            }
        }
    }

    /// Number of tracks
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Whether no animation is controlled
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Encode the track list
    pub fn tracks_to_bytes(&self) -> codec::Result<Vec<u8>> {
        encode_tracks(&self.tracks)
    }

    /// Replace the track list from encoded bytes. On error the tracks are unchanged.
    pub fn set_tracks_from_bytes(&mut self, bytes: &[u8]) -> codec::Result<()> {
        let tracks = decode_tracks(bytes)?;
        self.set_tracks(tracks);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Animation, AnimationLibrary};
    use crate::state::AnimatedModel;

    const WALK: &str = "Models/Walk.ani";
    const RUN: &str = "Models/Run.ani";
    const WAVE: &str = "Models/Wave.ani";

    fn controller() -> AnimationController {
        let library = AnimationLibrary::new()
            .with(Animation::new(WALK, "Walk", 1.0))
            .with(Animation::new(RUN, "Run", 0.8))
            .with(Animation::new(WAVE, "Wave", 0.5));
        AnimationController::new(Arc::new(library))
    }

    fn model() -> AnimatedModel {
        AnimatedModel::with_bones(["Root", "Spine", "Head"])
    }

    /// Model wrapper recording every detached state, optionally refusing new ones
    #[derive(Default)]
    struct CountingModel {
        inner: AnimatedModel,
        removed: Vec<NameHash>,
        refuse_states: bool,
    }

    impl AnimationStateProvider for CountingModel {
        fn animation_state(&self, hash: NameHash) -> Option<&AnimationState> {
            self.inner.animation_state(hash)
        }

        fn animation_state_mut(&mut self, hash: NameHash) -> Option<&mut AnimationState> {
            self.inner.animation_state_mut(hash)
        }

        fn add_animation_state(&mut self, animation: Arc<Animation>) -> Option<NameHash> {
            if self.refuse_states {
                return None;
            }
            self.inner.add_animation_state(animation)
        }

        fn remove_animation_state(&mut self, hash: NameHash) -> bool {
            self.removed.push(hash);
            self.inner.remove_animation_state(hash)
        }

        fn has_bone(&self, name: &str) -> bool {
            self.inner.has_bone(name)
        }
    }

    #[test]
    fn test_add_animation_is_idempotent() {
        let mut controller = controller();
        let mut model = model();

        assert!(controller.add_animation(&mut model, WALK, 1));
        assert!(controller.add_animation(&mut model, WALK, 3));

        assert_eq!(controller.track_count(), 1);
        assert_eq!(model.state_count(), 1);
        assert_eq!(controller.group(&model, WALK), 3);
        assert_eq!(controller.tracks()[0].name_hash, NameHash::new(WALK));
    }

    #[test]
    fn test_add_missing_resource_fails() {
        let mut controller = controller();
        let mut model = model();

        assert!(!controller.add_animation(&mut model, "Models/Missing.ani", 0));
        assert!(!controller.set_animation(&mut model, &SetAnimation::new("Models/Missing.ani")));
        assert!(controller.is_empty());
        assert_eq!(model.state_count(), 0);
    }

    #[test]
    fn test_refused_state_adds_no_track() {
        let mut controller = controller();
        let mut model = CountingModel {
            refuse_states: true,
            ..Default::default()
        };

        assert!(!controller.add_animation(&mut model, WALK, 0));
        assert!(!controller.set_animation(&mut model, &SetAnimation::new(WALK)));
        assert!(controller.is_empty());
        assert_eq!(model.inner.state_count(), 0);
        assert!(!controller.has_animation(&model, WALK));
    }

    #[test]
    fn test_set_animation_zero_weight_is_noop() {
        let mut controller = controller();
        let mut model = model();

        assert!(controller.set_animation(&mut model, &SetAnimation::new(WALK).fade(0.0, 0.5)));
        assert!(controller.is_empty());
        assert_eq!(model.state_count(), 0);
    }

    #[test]
    fn test_fade_in_never_overshoots() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WALK).looped(true).fade(1.0, 0.5));
        assert_eq!(controller.weight(&model, WALK), 0.0);

        let mut previous = 0.0;
        for _ in 0..6 {
            controller.update(&mut model, 0.2);
            let weight = controller.weight(&model, WALK);
            assert!(weight >= previous);
            assert!((0.0..=1.0).contains(&weight));
            previous = weight;
        }
        assert_eq!(previous, 1.0);
        assert_eq!(controller.phase(&model, WALK), TrackPhase::Active);
    }

    #[test]
    fn test_fade_out_stays_within_bounds() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WALK).looped(true).fade(0.8, 0.0));
        controller.set_fade(&model, WALK, 0.3, 1.0);

        for _ in 0..10 {
            controller.update(&mut model, 0.13);
            let weight = controller.weight(&model, WALK);
            assert!((0.3..=0.8).contains(&weight), "weight {weight} out of range");
        }
        assert!((controller.weight(&model, WALK) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_faded_out_track_is_removed_and_detached_once() {
        let mut controller = controller();
        let mut model = CountingModel::default();

        controller.set_animation(&mut model, &SetAnimation::new(WALK).looped(true));
        assert_eq!(controller.weight(&model, WALK), 1.0);

        assert!(controller.remove_animation(&mut model, WALK, 0.5));
        controller.update(&mut model, 0.25);
        assert!(controller.has_animation(&model, WALK));
        assert_eq!(controller.weight(&model, WALK), 0.5);

        controller.update(&mut model, 0.25);
        assert_eq!(controller.phase(&model, WALK), TrackPhase::Removed);
        assert!(controller.is_empty());
        assert_eq!(model.removed, vec![NameHash::new(WALK)]);

        controller.update(&mut model, 0.25);
        assert_eq!(model.removed.len(), 1);
    }

    #[test]
    fn test_zero_weight_without_fade_is_removed_on_next_update() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WALK).looped(true));
        controller.set_weight(&mut model, WALK, 0.0);

        // Removal happens during update, not synchronously
        assert!(controller.has_animation(&model, WALK));
        assert_eq!(controller.phase(&model, WALK), TrackPhase::PendingRemoval);

        controller.update(&mut model, 0.016);
        assert!(!controller.has_animation(&model, WALK));
        assert_eq!(model.state_count(), 0);
    }

    #[test]
    fn test_set_weight_cancels_fade() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WALK).looped(true).fade(1.0, 1.0));
        controller.update(&mut model, 0.25);
        assert!((controller.weight(&model, WALK) - 0.25).abs() < 1e-6);

        assert!(controller.set_weight(&mut model, WALK, 0.5));
        assert_eq!(controller.fade_time(&model, WALK), 0.0);

        for _ in 0..5 {
            controller.update(&mut model, 0.25);
            assert_eq!(controller.weight(&model, WALK), 0.5);
        }
        assert!(controller.has_animation(&model, WALK));
    }

    #[test]
    fn test_autofade_after_non_looped_end() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WAVE).auto_fade(0.25));
        assert_eq!(controller.weight(&model, WAVE), 1.0);

        controller.update(&mut model, 0.45);
        assert_eq!(controller.weight(&model, WAVE), 1.0);
        assert_eq!(controller.phase(&model, WAVE), TrackPhase::Active);

        controller.update(&mut model, 0.1);
        assert_eq!(controller.time(&model, WAVE), 0.5);
        assert!((controller.weight(&model, WAVE) - 0.6).abs() < 1e-5);
        assert_eq!(controller.phase(&model, WAVE), TrackPhase::AutoFading);

        controller.update(&mut model, 0.1);
        assert!(controller.has_animation(&model, WAVE));
        controller.update(&mut model, 0.1);
        assert!(!controller.has_animation(&model, WAVE));
        assert_eq!(model.state_count(), 0);
    }

    #[test]
    fn test_autofade_ignored_when_looped() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WAVE).looped(true).auto_fade(0.25));
        for _ in 0..10 {
            controller.update(&mut model, 0.1);
        }
        assert_eq!(controller.weight(&model, WAVE), 1.0);
    }

    #[test]
    fn test_fade_out_others_in_group() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WALK).group(1).looped(true));
        controller.set_animation(&mut model, &SetAnimation::new(WAVE).group(2).looped(true));
        controller.set_animation(
            &mut model,
            &SetAnimation::new(RUN).group(1).looped(true).fade_out_others(true),
        );

        assert_eq!(controller.fade_target(&model, WALK), 0.0);
        assert_eq!(controller.fade_time(&model, WALK), FADE_EPSILON);
        assert_eq!(controller.fade_target(&model, RUN), 0.0);
        assert_eq!(controller.fade_time(&model, WAVE), 0.0);

        controller.update(&mut model, 0.016);
        assert!(!controller.has_animation(&model, WALK));
        assert!(controller.has_animation(&model, RUN));
        assert!(controller.has_animation(&model, WAVE));
    }

    #[test]
    fn test_set_fade_others() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WALK).group(4).looped(true));
        controller.set_animation(&mut model, &SetAnimation::new(RUN).group(4).looped(true));

        assert!(controller.set_fade_others(&model, RUN, 0.5, 0.0));
        assert_eq!(controller.fade_target(&model, WALK), 0.5);
        assert_eq!(controller.fade_time(&model, WALK), FADE_EPSILON);
        assert_eq!(controller.fade_time(&model, RUN), 0.0);
        assert!(!controller.set_fade_others(&model, WAVE, 0.5, 1.0));
    }

    #[test]
    fn test_remove_animation_immediate() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WALK));
        assert!(controller.remove_animation(&mut model, WALK, 0.0));
        assert!(controller.is_empty());
        assert_eq!(model.state_count(), 0);
        assert!(!controller.remove_animation(&mut model, WALK, 0.0));
    }

    #[test]
    fn test_remove_animation_without_track() {
        let mut controller = controller();
        let mut model = model();
        model.add_animation_state(Arc::new(Animation::new(WALK, "Walk", 1.0)));
        assert!(controller.is_empty());

        assert!(controller.remove_animation(&mut model, WALK, 0.0));
        assert_eq!(model.state_count(), 0);
        assert!(!controller.remove_animation(&mut model, WALK, 0.0));
    }

    #[test]
    fn test_remove_animations_negative_fade_is_immediate() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WALK).group(1).looped(true));
        controller.set_animation(&mut model, &SetAnimation::new(RUN).group(1).looped(true));
        controller.set_animation(&mut model, &SetAnimation::new(WAVE).group(2).looped(true));

        // Zero is a scheduled fade for the group variants
        controller.remove_animations(&mut model, 1, 0.0);
        assert_eq!(controller.track_count(), 3);
        assert_eq!(controller.fade_target(&model, WALK), 0.0);

        controller.remove_animations(&mut model, 1, -1.0);
        assert_eq!(controller.track_count(), 1);
        assert_eq!(model.state_count(), 1);
        assert!(controller.has_animation(&model, WAVE));

        controller.remove_all_animations(&mut model, 0.5);
        assert_eq!(controller.fade_time(&model, WAVE), 0.5);
        controller.remove_all_animations(&mut model, -1.0);
        assert!(controller.is_empty());
        assert_eq!(model.state_count(), 0);
    }

    #[test]
    fn test_alias_resolves_to_resource_track() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WALK).looped(true));
        assert!(controller.add_animation(&mut model, "Walk", 2));

        assert_eq!(controller.track_count(), 1);
        assert_eq!(controller.group(&model, WALK), 2);
        assert!(controller.has_animation(&model, "walk"));
        assert_eq!(controller.weight(&model, "Walk"), 1.0);

        let lookup = controller.find_animation(&model, "Walk");
        assert_eq!(lookup.index, Some(0));
        assert_eq!(lookup.state, Some(NameHash::new(WALK)));
    }

    #[test]
    fn test_queries_default_when_unresolved() {
        let controller = controller();
        let model = model();

        assert!(!controller.has_animation(&model, WALK));
        assert_eq!(controller.weight(&model, WALK), 0.0);
        assert_eq!(controller.time(&model, WALK), 0.0);
        assert_eq!(controller.length(&model, WALK), 0.0);
        assert!(!controller.is_looped(&model, WALK));
        assert_eq!(controller.group(&model, WALK), 0);
        assert_eq!(controller.speed(&model, WALK), 0.0);
        assert_eq!(controller.fade_target(&model, WALK), 0.0);
        assert_eq!(controller.fade_time(&model, WALK), 0.0);
        assert_eq!(controller.auto_fade(&model, WALK), 0.0);
        assert_eq!(controller.priority(&model, WALK), 0);
        assert_eq!(controller.start_bone(&model, WALK), None);
        assert_eq!(controller.find_animation(&model, WALK), AnimationLookup::default());
    }

    #[test]
    fn test_mutators_fail_when_unresolved() {
        let mut controller = controller();
        let mut model = model();

        assert!(!controller.set_weight(&mut model, WALK, 1.0));
        assert!(!controller.set_fade(&model, WALK, 1.0, 1.0));
        assert!(!controller.set_time(&mut model, WALK, 0.5));
        assert!(!controller.set_looped(&mut model, WALK, true));
        assert!(!controller.set_group(&model, WALK, 1));
        assert!(!controller.set_speed(&model, WALK, 2.0));
        assert!(!controller.set_priority(&mut model, WALK, 1));
        assert!(!controller.set_start_bone(&mut model, WALK, "Spine"));
        assert!(!controller.set_blending(&mut model, WALK, 1, "Spine"));
        assert!(!controller.set_auto_fade(&model, WALK, 1.0));
        assert!(!controller.set_properties(&model, WALK, 0, 1.0, 1.0, 0.0, 0.0));
        assert!(controller.is_empty());
    }

    #[test]
    fn test_track_mutators() {
        let mut controller = controller();
        let mut model = model();
        controller.set_animation(&mut model, &SetAnimation::new(RUN).looped(true));

        assert!(controller.set_properties(&model, RUN, 3, 2.0, 1.5, -1.0, 0.4));
        assert_eq!(controller.group(&model, RUN), 3);
        assert_eq!(controller.speed(&model, RUN), 2.0);
        assert_eq!(controller.fade_target(&model, RUN), 1.0);
        assert_eq!(controller.fade_time(&model, RUN), 0.0);
        assert_eq!(controller.auto_fade(&model, RUN), 0.4);

        assert!(controller.set_speed(&model, RUN, 0.0));
        controller.update(&mut model, 1.0);
        assert_eq!(controller.time(&model, RUN), 0.0);

        assert!(controller.set_time(&mut model, RUN, 0.3));
        assert_eq!(controller.time(&model, RUN), 0.3);
        assert_eq!(controller.length(&model, RUN), 0.8);
        assert!(controller.set_looped(&mut model, RUN, false));
        assert!(!controller.is_looped(&model, RUN));
        assert!(controller.set_auto_fade(&model, RUN, -2.0));
        assert_eq!(controller.auto_fade(&model, RUN), 0.0);
    }

    #[test]
    fn test_start_bone_and_blending() {
        let mut controller = controller();
        let mut model = model();
        controller.set_animation(&mut model, &SetAnimation::new(WAVE).looped(true));

        assert!(controller.set_start_bone(&mut model, WAVE, "Spine"));
        assert_eq!(controller.start_bone(&model, WAVE), Some("Spine"));

        assert!(controller.set_blending(&mut model, WAVE, 5, "Head"));
        assert_eq!(controller.priority(&model, WAVE), 5);
        assert_eq!(controller.start_bone(&model, WAVE), Some("Head"));

        assert!(controller.set_start_bone(&mut model, WAVE, "Tail"));
        assert_eq!(controller.start_bone(&model, WAVE), None);
    }

    #[test]
    fn test_restart_rewinds() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WALK).looped(true));
        controller.update(&mut model, 0.4);
        assert!((controller.time(&model, WALK) - 0.4).abs() < 1e-6);

        controller.set_animation(&mut model, &SetAnimation::new(WALK).looped(true).restart(true));
        assert_eq!(controller.time(&model, WALK), 0.0);
    }

    #[test]
    fn test_state_dropped_by_model_removes_track() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WALK).looped(true));
        model.remove_animation_state(NameHash::new(WALK));
        assert_eq!(controller.phase(&model, WALK), TrackPhase::Removed);
        assert_eq!(controller.track_count(), 1);

        controller.update(&mut model, 0.016);
        assert!(controller.is_empty());
    }

    #[test]
    fn test_removal_keeps_other_tracks_in_order() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WALK).looped(true));
        controller.set_animation(&mut model, &SetAnimation::new(RUN).looped(true));
        controller.set_animation(&mut model, &SetAnimation::new(WAVE).looped(true));
        controller.set_weight(&mut model, RUN, 0.0);

        controller.update(&mut model, 0.016);
        let hashes: Vec<_> = controller.tracks().iter().map(|t| t.name_hash).collect();
        assert_eq!(hashes, vec![NameHash::new(WALK), NameHash::new(WAVE)]);
    }

    #[test]
    fn test_tracks_byte_round_trip() {
        let mut controller = controller();
        let mut model = model();

        controller.set_animation(&mut model, &SetAnimation::new(WALK).group(1).looped(true).fade(0.5, 0.2));
        controller.set_animation(&mut model, &SetAnimation::new(WAVE).group(2).speed(1.5).auto_fade(0.3));

        let bytes = controller.tracks_to_bytes().unwrap();
        let mut restored = self::controller();
        restored.set_tracks_from_bytes(&bytes).unwrap();
        assert_eq!(restored.tracks(), controller.tracks());

        assert!(restored.set_tracks_from_bytes(&bytes[..3]).is_err());
        assert_eq!(restored.tracks(), controller.tracks());
    }

    #[test]
    fn test_set_tracks_drops_duplicates() {
        let mut controller = controller();
        let walk = AnimationTrack::new(NameHash::new(WALK));
        controller.set_tracks([walk.with_group(1), walk.with_group(2)]);
        assert_eq!(controller.track_count(), 1);
        assert_eq!(controller.tracks()[0].group, 1);
    }
}
