// Domain layer: entity model, bus events and simulation rules.

pub mod entity;
pub mod errors;
pub mod events;
pub mod geometry;
pub mod input;
pub mod ports;
pub mod systems;
pub mod tuning;

pub use entity::{Entity, EntityId, EntityIds, EntityKind, Side};
pub use errors::ConfigError;
pub use events::{BusEvent, EventBus, GameEvent};
pub use geometry::Rect;
pub use input::{ControlScheme, HeldKeys, InputEvent, InputFrame, Key};
