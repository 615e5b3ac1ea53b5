// Use-case level settings and loop states.

use crate::domain::entity::{Rgb, Side};
use crate::domain::errors::ConfigError;
use crate::domain::input::{ControlScheme, Key};
use crate::domain::tuning::{CraftTuning, ProjectileTuning};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Playing,
    /// A craft was destroyed. Only quit is honoured from here on.
    Over,
}

/// Per-craft setup supplied at construction time.
#[derive(Debug, Clone)]
pub struct CraftSettings {
    pub name: String,
    pub side: Side,
    pub color: Rgb,
    pub controls: ControlScheme,
    pub x: i32,
    pub y: i32,
    pub icon: String,
    pub fire_sound: String,
    pub hit_sound: String,
}

/// Everything needed to lay out a match. Immutable once the arena is built.
#[derive(Debug, Clone)]
pub struct ArenaSettings {
    pub width: i32,
    pub height: i32,
    pub fps: u32,
    pub divider_width: i32,
    pub background: String,
    pub font: String,
    /// Height of the health labels in pixels.
    pub label_height: i32,
    pub craft: CraftTuning,
    pub projectile: ProjectileTuning,
    pub left: CraftSettings,
    pub right: CraftSettings,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            width: 900,
            height: 500,
            fps: 60,
            divider_width: 10,
            background: "space.png".to_string(),
            font: "QuirkyRobot.ttf".to_string(),
            label_height: 30,
            craft: CraftTuning::default(),
            projectile: ProjectileTuning::default(),
            left: CraftSettings {
                name: "Red".to_string(),
                side: Side::Left,
                color: Rgb::RED,
                controls: ControlScheme {
                    left: Key::A,
                    right: Key::D,
                    up: Key::W,
                    down: Key::S,
                    fire: Key::LCtrl,
                },
                x: 300,
                y: 100,
                icon: "spaceship_red.png".to_string(),
                fire_sound: "spaceship_fired.mp3".to_string(),
                hit_sound: "spaceship_hit.mp3".to_string(),
            },
            right: CraftSettings {
                name: "Yellow".to_string(),
                side: Side::Right,
                color: Rgb::YELLOW,
                controls: ControlScheme {
                    left: Key::Left,
                    right: Key::Right,
                    up: Key::Up,
                    down: Key::Down,
                    fire: Key::RCtrl,
                },
                x: 700,
                y: 100,
                icon: "spaceship_yellow.png".to_string(),
                fire_sound: "spaceship_fired.mp3".to_string(),
                hit_sound: "spaceship_hit.mp3".to_string(),
            },
        }
    }
}

impl ArenaSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::InvalidSetting(format!(
                "field must have a positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if !(1..=1000).contains(&self.fps) {
            return Err(ConfigError::InvalidSetting(format!(
                "fps must be within 1..=1000, got {}",
                self.fps
            )));
        }
        if self.divider_width <= 0 || self.divider_width >= self.width {
            return Err(ConfigError::InvalidSetting(format!(
                "divider width {} does not fit a field {} wide",
                self.divider_width, self.width
            )));
        }
        if self.craft.velocity <= 0 || self.craft.width <= 0 || self.craft.height <= 0 {
            return Err(ConfigError::InvalidSetting(
                "craft velocity and size must be positive".to_string(),
            ));
        }
        if self.craft.starting_health == 0 {
            return Err(ConfigError::InvalidSetting(
                "starting health must be at least 1".to_string(),
            ));
        }
        // A projectile faster than it is wide could skip the field edge check.
        let p = &self.projectile;
        if p.width <= 0 || p.height <= 0 || !(1..=p.width).contains(&p.speed) {
            return Err(ConfigError::InvalidSetting(format!(
                "projectile speed must be within 1..={} and its size positive",
                p.width
            )));
        }

        if self.left.side != Side::Left || self.right.side != Side::Right {
            return Err(ConfigError::InvalidSetting(
                "crafts must occupy the left and right sides".to_string(),
            ));
        }
        for craft in [&self.left, &self.right] {
            craft.controls.ensure_distinct()?;
            let inside = craft.x > 0
                && craft.y > 0
                && craft.x + self.craft.width < self.width
                && craft.y + self.craft.height < self.height;
            if !inside {
                return Err(ConfigError::InvalidSetting(format!(
                    "craft `{}` starts outside the field",
                    craft.name
                )));
            }
        }
        if self.left.controls.shares_keys_with(&self.right.controls) {
            return Err(ConfigError::ConflictingKeyMapping(
                self.left.name.clone(),
                self.right.name.clone(),
            ));
        }
        Ok(())
    }
}
