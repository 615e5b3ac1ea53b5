pub mod craft;
pub mod projectile;

pub use craft::CraftTuning;
pub use projectile::ProjectileTuning;
