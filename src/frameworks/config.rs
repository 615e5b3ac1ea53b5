use crate::domain::errors::ConfigError;
use crate::domain::input::ControlScheme;
use crate::use_cases::ArenaSettings;
use std::{env, path::PathBuf, str::FromStr};

// Runtime configuration read from the environment (and `.env`).
// Every variable is optional; a value that is present but malformed is fatal.

pub const FPS_VAR: &str = "ARENA_FPS";
pub const WIDTH_VAR: &str = "ARENA_WIDTH";
pub const HEIGHT_VAR: &str = "ARENA_HEIGHT";
pub const STARTING_HEALTH_VAR: &str = "ARENA_STARTING_HEALTH";
pub const STARTING_AMMO_VAR: &str = "ARENA_STARTING_AMMO";
pub const LEFT_KEYS_VAR: &str = "ARENA_LEFT_KEYS";
pub const RIGHT_KEYS_VAR: &str = "ARENA_RIGHT_KEYS";
pub const ASSETS_DIR_VAR: &str = "ARENA_ASSETS_DIR";
pub const INPUT_SCRIPT_VAR: &str = "ARENA_INPUT_SCRIPT";

pub fn arena_settings() -> Result<ArenaSettings, ConfigError> {
    settings_from(|name| env::var(name).ok())
}

pub fn assets_dir() -> Option<PathBuf> {
    env::var_os(ASSETS_DIR_VAR).map(PathBuf::from)
}

pub fn input_script() -> Option<PathBuf> {
    env::var_os(INPUT_SCRIPT_VAR).map(PathBuf::from)
}

/// Applies overrides from `lookup` on top of the default layout, then validates.
pub fn settings_from<F>(lookup: F) -> Result<ArenaSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = ArenaSettings::default();

    if let Some(fps) = parse(&lookup, FPS_VAR)? {
        settings.fps = fps;
    }
    if let Some(width) = parse(&lookup, WIDTH_VAR)? {
        settings.width = width;
    }
    if let Some(height) = parse(&lookup, HEIGHT_VAR)? {
        settings.height = height;
    }
    if let Some(health) = parse(&lookup, STARTING_HEALTH_VAR)? {
        settings.craft.starting_health = health;
    }
    if let Some(ammo) = parse(&lookup, STARTING_AMMO_VAR)? {
        settings.craft.starting_ammo = ammo;
    }
    if let Some(keys) = lookup(LEFT_KEYS_VAR) {
        settings.left.controls = ControlScheme::parse(&keys)?;
    }
    if let Some(keys) = lookup(RIGHT_KEYS_VAR) {
        settings.right.controls = ControlScheme::parse(&keys)?;
    }

    // Default starts are at 1/3 and 7/9 of the width; keep them there on resize.
    if let Some(value) = lookup(WIDTH_VAR) {
        let right_x = settings
            .width
            .checked_mul(7)
            .map(|scaled| scaled / 9)
            .ok_or(ConfigError::InvalidValue {
                name: WIDTH_VAR,
                value,
            })?;
        settings.left.x = settings.width / 3;
        settings.right.x = right_x;
    }

    settings.validate()?;
    Ok(settings)
}

fn parse<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(value) = lookup(name) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue { name, value })
}
