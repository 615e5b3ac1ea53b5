// Use cases layer: match construction and the fixed-tick loop.

pub mod arena;
pub mod game;
pub mod types;

pub use arena::build_arena;
pub use game::{Simulation, run};
pub use types::{ArenaSettings, CraftSettings, LoopState, MatchPhase};
