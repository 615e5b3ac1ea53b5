/// Gameplay tuning for player-controlled craft.
///
/// Keep this separate from runtime configuration (tick rate, window size, etc.).

#[derive(Debug, Clone, Copy)]
pub struct CraftTuning {
    /// Pixels moved per tick for each held direction key.
    pub velocity: i32,

    /// Hit points at match start.
    pub starting_health: u32,

    /// Projectiles a craft may have in flight at once.
    pub starting_ammo: u32,

    /// Sprite footprint in pixels.
    pub width: i32,
    pub height: i32,
}

impl Default for CraftTuning {
    fn default() -> Self {
        Self {
            velocity: 5,
            starting_health: 10,
            starting_ammo: 3,
            width: 55,
            height: 40,
        }
    }
}
