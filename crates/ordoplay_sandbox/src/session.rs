// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scripted sandbox sessions.
//!
//! A session lists the animation resources and skeleton of one model, the items
//! and style of one list view, and a script of actions keyed by frame number.

use ordoplay_animation::TrackCodecError;
use ordoplay_listview::{ConfigError, Key, ListViewConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Session used when no file is given
pub const DEFAULT_SESSION: &str = r#"(
    time_step: 0.1,
    frames: 30,
    bones: ["Root", "Spine", "Head"],
    animations: [
        (name: "Models/Walk.ani", animation_name: "Walk", length: 1.2),
        (name: "Models/Run.ani", animation_name: "Run", length: 0.8),
        (name: "Models/Wave.ani", animation_name: "Wave", length: 1.0),
    ],
    items: [
        (name: "Locomotion"),
        (name: "Walk"),
        (name: "Run"),
        (name: "Gestures"),
        (name: "Wave", height: Some(24)),
    ],
    style: (
        version: 1,
        items: [
            (name: "Locomotion"),
            (name: "Walk", indent: Some(1)),
            (name: "Run", indent: Some(1)),
            (name: "Gestures"),
            (name: "Wave", indent: Some(1)),
        ],
        highlight: Some("always"),
        hierarchy: Some(true),
        selections: [1],
    ),
    script: [
        (frame: 0, action: Play(name: "Models/Walk.ani", group: 1, looped: true, fade: 0.3)),
        (frame: 5, action: Key(Down)),
        (frame: 10, action: Play(name: "Models/Run.ani", group: 1, looped: true, fade: 0.5, exclusive: true)),
        (frame: 12, action: Play(name: "Models/Wave.ani", group: 2, auto_fade: 0.4)),
        (frame: 15, action: Click(item: "Locomotion")),
        (frame: 16, action: Click(item: "Locomotion")),
        (frame: 27, action: StopGroup(group: 1, fade: 0.5)),
    ],
)"#;

/// Sandbox errors
#[derive(Debug, Error)]
pub enum SandboxError {
    /// Session file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid session RON
    #[error("Session parse error: {0}")]
    Parse(String),

    /// List view style error
    #[error("Style error: {0}")]
    Config(#[from] ConfigError),

    /// Track persistence error
    #[error("Track codec error: {0}")]
    Codec(#[from] TrackCodecError),

    /// An animation could not be started
    #[error("Could not play animation {0}")]
    PlayFailed(String),
}

fn default_time_step() -> f32 {
    1.0 / 60.0
}

fn full_weight() -> f32 {
    1.0
}

/// Animation resource of the session model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationEntry {
    /// Resource name
    pub name: String,
    /// Internal animation name
    pub animation_name: String,
    /// Length in seconds
    pub length: f32,
}

/// Item registered with the list view's container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    /// Item name
    pub name: String,
    /// Height in pixels, default when absent
    #[serde(default)]
    pub height: Option<i32>,
}

/// Scripted action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Start or retarget an animation
    Play {
        /// Resource name
        name: String,
        /// Exclusion group
        #[serde(default)]
        group: u8,
        /// Loop playback
        #[serde(default)]
        looped: bool,
        /// Target weight
        #[serde(default = "full_weight")]
        weight: f32,
        /// Fade-in time
        #[serde(default)]
        fade: f32,
        /// Autofade time
        #[serde(default)]
        auto_fade: f32,
        /// Fade out the rest of the group
        #[serde(default)]
        exclusive: bool,
    },
    /// Stop one animation
    Stop {
        /// Resource or animation name
        name: String,
        /// Fade-out time
        #[serde(default)]
        fade: f32,
    },
    /// Stop every animation of a group
    StopGroup {
        /// Exclusion group
        group: u8,
        /// Fade-out time
        fade: f32,
    },
    /// Give or take list view focus
    Focus(bool),
    /// Press a key on the list view
    Key(Key),
    /// Left-click a list item by name
    Click {
        /// Item name
        item: String,
        /// Shift held
        #[serde(default)]
        shift: bool,
        /// Ctrl held
        #[serde(default)]
        ctrl: bool,
    },
}

/// Action run at the start of a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Frame number
    pub frame: u32,
    /// Action to run
    pub action: Action,
}

/// Complete sandbox session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Seconds per frame
    #[serde(default = "default_time_step")]
    pub time_step: f32,
    /// Number of frames to run
    pub frames: u32,
    /// Skeleton bone names
    #[serde(default)]
    pub bones: Vec<String>,
    /// Animation resources
    #[serde(default)]
    pub animations: Vec<AnimationEntry>,
    /// List items
    #[serde(default)]
    pub items: Vec<ItemEntry>,
    /// List view style
    #[serde(default)]
    pub style: ListViewConfig,
    /// Scripted actions
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

impl Session {
    /// Parse a session from RON text
    pub fn from_ron(content: &str) -> Result<Self, SandboxError> {
        ron::from_str(content).map_err(|e| SandboxError::Parse(e.to_string()))
    }

    /// Load a session file
    pub fn load(path: &Path) -> Result<Self, SandboxError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Actions scheduled for a frame, in script order
    pub fn actions_at(&self, frame: u32) -> impl Iterator<Item = &Action> {
        self.script
            .iter()
            .filter(move |step| step.frame == frame)
            .map(|step| &step.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_parses() {
        let session = Session::from_ron(DEFAULT_SESSION).unwrap();
        assert_eq!(session.frames, 30);
        assert_eq!(session.animations.len(), 3);
        assert_eq!(session.items[4].height, Some(24));
        assert_eq!(session.style.hierarchy, Some(true));
        assert_eq!(session.actions_at(5).collect::<Vec<_>>(), vec![&Action::Key(Key::Down)]);
    }

    #[test]
    fn test_action_defaults() {
        let session = Session::from_ron(r#"(frames: 1, script: [(frame: 0, action: Play(name: "a"))])"#).unwrap();
        assert_eq!(session.time_step, default_time_step());
        assert_eq!(
            session.script[0].action,
            Action::Play {
                name: "a".to_string(),
                group: 0,
                looped: false,
                weight: 1.0,
                fade: 0.0,
                auto_fade: 0.0,
                exclusive: false,
            }
        );
    }

    #[test]
    fn test_invalid_session() {
        assert!(matches!(Session::from_ron("(frames: -1)"), Err(SandboxError::Parse(_))));
    }
}
