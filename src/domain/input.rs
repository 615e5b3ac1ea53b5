// Keyboard model shared by input sources and craft controls.

use crate::domain::errors::ConfigError;
use serde::Deserialize;
use std::collections::HashSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    A,
    D,
    W,
    S,
    Left,
    Right,
    Up,
    Down,
    LCtrl,
    RCtrl,
    Space,
    Enter,
    Escape,
}

impl FromStr for Key {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = match value.trim().to_ascii_lowercase().as_str() {
            "a" => Key::A,
            "d" => Key::D,
            "w" => Key::W,
            "s" => Key::S,
            "left" => Key::Left,
            "right" => Key::Right,
            "up" => Key::Up,
            "down" => Key::Down,
            "lctrl" => Key::LCtrl,
            "rctrl" => Key::RCtrl,
            "space" => Key::Space,
            "enter" => Key::Enter,
            "escape" => Key::Escape,
            other => {
                return Err(ConfigError::MalformedKeyMapping(format!(
                    "unknown key name `{other}`"
                )));
            }
        };
        Ok(key)
    }
}

/// Discrete events pulled from the input source once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "key")]
pub enum InputEvent {
    KeyDown(Key),
    Quit,
}

/// Snapshot of the keys held down at poll time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldKeys(HashSet<Key>);

impl HeldKeys {
    pub fn contains(&self, key: Key) -> bool {
        self.0.contains(&key)
    }
}

impl FromIterator<Key> for HeldKeys {
    fn from_iter<T: IntoIterator<Item = Key>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Everything the core reads from the input collaborator in one tick.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,
    pub held: HeldKeys,
}

impl InputFrame {
    pub fn quit() -> Self {
        Self {
            events: vec![InputEvent::Quit],
            held: HeldKeys::default(),
        }
    }

    pub fn wants_quit(&self) -> bool {
        self.events.contains(&InputEvent::Quit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlScheme {
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
    pub fire: Key,
}

impl ControlScheme {
    pub const fn keys(&self) -> [Key; 5] {
        [self.left, self.right, self.up, self.down, self.fire]
    }

    /// Parses `left,right,up,down,fire`, rejecting repeated keys.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let keys = value
            .split(',')
            .map(Key::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        let Ok([left, right, up, down, fire]) = <[Key; 5]>::try_from(keys.as_slice()) else {
            return Err(ConfigError::MalformedKeyMapping(format!(
                "expected 5 keys (left,right,up,down,fire), got {}",
                keys.len()
            )));
        };

        let scheme = Self {
            left,
            right,
            up,
            down,
            fire,
        };
        scheme.ensure_distinct()?;
        Ok(scheme)
    }

    pub fn ensure_distinct(&self) -> Result<(), ConfigError> {
        let unique: HashSet<Key> = self.keys().into_iter().collect();
        if unique.len() != self.keys().len() {
            return Err(ConfigError::MalformedKeyMapping(
                "a key is bound to more than one action".to_string(),
            ));
        }
        Ok(())
    }

    pub fn shares_keys_with(&self, other: &ControlScheme) -> bool {
        self.keys().iter().any(|k| other.keys().contains(k))
    }
}
