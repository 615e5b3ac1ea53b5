/// Gameplay tuning for projectiles.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Horizontal speed in pixels per tick. The sign comes from the firer's facing.
    pub speed: i32,

    pub width: i32,
    pub height: i32,

    /// Space left between the firing craft and the spawned projectile.
    pub spawn_gap: i32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 5,
            width: 10,
            height: 5,
            spawn_gap: 2,
        }
    }
}
