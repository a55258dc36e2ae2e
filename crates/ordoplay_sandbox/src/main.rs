// SPDX-License-Identifier: MIT OR Apache-2.0
//! `OrdoPlay` sandbox - headless animation and list view driver.
//!
//! Runs a scripted session against an in-memory animated model and item list:
//! - Animation blending with fades, autofade and group exclusion
//! - List view selection driven by key presses and clicks
//! - Track persistence round trip at the end of the run
//!
//! Usage: `ordoplay_sandbox [session.ron]`. Without a path a built-in session
//! is used. Log verbosity follows `RUST_LOG`.

mod session;

use ordoplay_animation::{
    AnimatedModel, Animation, AnimationController, AnimationLibrary, AnimationStateProvider, SetAnimation,
};
use ordoplay_listview::{
    ConfigError, ItemContainer, ItemData, ItemTree, ListView, MouseButton, MouseButtons, Qualifiers,
    CONFIG_FORMAT_VERSION,
};
use session::{Action, SandboxError, Session, DEFAULT_SESSION};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("ordoplay_sandbox=debug,ordoplay_animation=debug,ordoplay_listview=info")
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting OrdoPlay sandbox v{}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args().nth(1).map(PathBuf::from);
    if let Err(e) = run(path) {
        tracing::error!("Sandbox failed: {e}");
        std::process::exit(1);
    }
}

/// The animated model and list view driven by a session
struct Sandbox {
    model: AnimatedModel,
    controller: AnimationController,
    view: ListView<ItemTree>,
}

impl Sandbox {
    fn new(session: &Session) -> Result<Self, SandboxError> {
        if session.style.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: session.style.version,
                supported: CONFIG_FORMAT_VERSION,
            }
            .into());
        }

        let library = session.animations.iter().fold(AnimationLibrary::new(), |library, entry| {
            library.with(Animation::new(&entry.name, &entry.animation_name, entry.length))
        });
        tracing::info!("Loaded {} animation(s)", library.len());

        let mut tree = ItemTree::new();
        for entry in &session.items {
            let mut data = ItemData::new(&entry.name);
            if let Some(height) = entry.height {
                data = data.with_height(height);
            }
            tree.create_item(data);
        }

        let mut view = ListView::new(tree);
        view.set_viewport_height(64);
        view.subscribe(|event| tracing::info!("List view: {event:?}"));
        view.apply_config(&session.style);

        Ok(Self {
            model: AnimatedModel::with_bones(session.bones.iter().cloned()),
            controller: AnimationController::new(Arc::new(library)),
            view,
        })
    }

    fn apply(&mut self, action: &Action) -> Result<(), SandboxError> {
        match action {
            Action::Play {
                name,
                group,
                looped,
                weight,
                fade,
                auto_fade,
                exclusive,
            } => {
                let params = SetAnimation::new(name.as_str())
                    .group(*group)
                    .looped(*looped)
                    .fade(*weight, *fade)
                    .auto_fade(*auto_fade)
                    .fade_out_others(*exclusive);
                if !self.controller.set_animation(&mut self.model, &params) {
                    return Err(SandboxError::PlayFailed(name.clone()));
                }
            }
            Action::Stop { name, fade } => {
                if !self.controller.remove_animation(&mut self.model, name, *fade) {
                    tracing::warn!("Animation {name} is not playing");
                }
            }
            Action::StopGroup { group, fade } => {
                self.controller.remove_animations(&mut self.model, *group, *fade);
            }
            Action::Focus(focused) => self.view.set_focus(*focused),
            Action::Key(key) => self.view.on_key(*key, MouseButtons::NONE, Qualifiers::NONE),
            Action::Click { item, shift, ctrl } => {
                let Some(id) = self.view.container().find_by_name(item) else {
                    tracing::warn!("List item {item} not found");
                    return Ok(());
                };
                let qualifiers = Qualifiers {
                    shift: *shift,
                    ctrl: *ctrl,
                    alt: false,
                };
                self.view.on_click(id, MouseButton::Left, qualifiers);
            }
        }
        Ok(())
    }

    fn step(&mut self, frame: u32, time_step: f32) {
        self.controller.update(&mut self.model, time_step);
        self.view.update(time_step);

        for track in self.controller.tracks() {
            if let Some(state) = self.model.animation_state(track.name_hash) {
                tracing::debug!(
                    "Frame {frame}: {} time {:.2} weight {:.2}",
                    state.animation().animation_name(),
                    state.time(),
                    state.weight()
                );
            }
        }
    }
}

fn run(path: Option<PathBuf>) -> Result<(), SandboxError> {
    let session = match &path {
        Some(path) => {
            tracing::info!("Loading session {}", path.display());
            Session::load(path)?
        }
        None => Session::from_ron(DEFAULT_SESSION)?,
    };

    let mut sandbox = Sandbox::new(&session)?;
    for frame in 0..session.frames {
        for action in session.actions_at(frame) {
            sandbox.apply(action)?;
        }
        sandbox.step(frame, session.time_step);
    }

    let bytes = sandbox.controller.tracks_to_bytes()?;
    sandbox.controller.set_tracks_from_bytes(&bytes)?;
    tracing::info!(
        "Finished {} frame(s): {} track(s) ({} bytes), {} state(s)",
        session.frames,
        sandbox.controller.track_count(),
        bytes.len(),
        sandbox.model.state_count()
    );

    let selected: Vec<&str> = sandbox
        .view
        .selected_items()
        .iter()
        .filter_map(|id| sandbox.view.container().get(id))
        .map(|data| data.name.as_str())
        .collect();
    tracing::info!("Selected items: {selected:?}");
    Ok(())
}
