// Scripted input source. Stands in for device polling in headless runs and tests.

use crate::domain::errors::ConfigError;
use crate::domain::input::{InputEvent, InputFrame, Key};
use crate::domain::ports::InputSource;
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;

/// One script entry: events for a tick plus held keys, optionally repeated.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub events: Vec<InputEvent>,
    #[serde(default)]
    pub held: Vec<Key>,
    #[serde(default = "one")]
    pub repeat: u32,
}

fn one() -> u32 {
    1
}

/// Replays frames in order and reports quit once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
}

impl ScriptedInput {
    pub fn from_steps(steps: Vec<ScriptStep>) -> Self {
        let mut frames = VecDeque::new();
        for step in steps {
            for i in 0..step.repeat {
                // Discrete events fire on the first repetition only.
                let events = if i == 0 {
                    step.events.clone()
                } else {
                    Vec::new()
                };
                frames.push_back(InputFrame {
                    events,
                    held: step.held.iter().copied().collect(),
                });
            }
        }
        Self { frames }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let steps: Vec<ScriptStep> = serde_json::from_str(json)?;
        Ok(Self::from_steps(steps))
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let to_error = |reason: String| ConfigError::InputScript {
            path: path.display().to_string(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| to_error(e.to_string()))?;
        Self::from_json(&text).map_err(|e| to_error(e.to_string()))
    }

    /// A short exchange of fire that plays out without a keyboard.
    pub fn demo() -> Self {
        let fire = |key| ScriptStep {
            events: vec![InputEvent::KeyDown(key)],
            held: Vec::new(),
            repeat: 20,
        };
        let hold = |keys: &[Key], repeat| ScriptStep {
            events: Vec::new(),
            held: keys.to_vec(),
            repeat,
        };
        Self::from_steps(vec![
            hold(&[Key::D, Key::Left], 30),
            fire(Key::LCtrl),
            fire(Key::RCtrl),
            hold(&[Key::S, Key::Up], 10),
            fire(Key::LCtrl),
            fire(Key::RCtrl),
            hold(&[], 120),
        ])
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputFrame {
        self.frames.pop_front().unwrap_or_else(InputFrame::quit)
    }
}
