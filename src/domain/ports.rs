// Ports for the collaborators the simulation talks to: input, presentation, assets.

use crate::domain::entity::Entity;
use crate::domain::input::InputFrame;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Opaque handle to an image, sound or font owned by the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceHandle(Arc<str>);

impl ResourceHandle {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sound the presentation layer should play after the current frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioCue {
    pub sound: ResourceHandle,
}

// Port for per-tick input polling.
pub trait InputSource {
    fn poll(&mut self) -> InputFrame;
}

// Port for frame output. Entities arrive in insertion order after all mutation.
pub trait Presenter {
    fn begin_frame(&mut self, _tick: u64) {}
    fn draw(&mut self, entity: &Entity);
    fn play(&mut self, _cue: &AudioCue) {}
    fn end_frame(&mut self) {}
}

// Port for checking that a named asset exists. Contents are never inspected.
pub trait AssetCatalog {
    fn resolve(&self, name: &str) -> Option<ResourceHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_cue_serializes_its_handle_as_a_bare_name() {
        let cue = AudioCue {
            sound: ResourceHandle::new("spaceship_fired.mp3"),
        };

        let json = serde_json::to_value(&cue).expect("cue serializes");

        assert_eq!(json, serde_json::json!({ "sound": "spaceship_fired.mp3" }));
    }
}
