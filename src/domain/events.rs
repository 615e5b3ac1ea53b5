// In-frame event records and the FIFO bus that carries them.

use crate::domain::entity::{EntityId, Side};
use crate::domain::input::Key;
use std::collections::VecDeque;

/// Notifications posted by entities during dispatch or collision handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    ProjectileExitedBounds {
        projectile: EntityId,
    },
    CraftHit {
        projectile: EntityId,
        craft: EntityId,
        health_remaining: u32,
    },
    CraftDestroyed {
        craft: EntityId,
        side: Side,
    },
}

impl BusEvent {
    /// Projectile that has to leave the live set once this event drains.
    pub const fn spent_projectile(&self) -> Option<EntityId> {
        match *self {
            BusEvent::ProjectileExitedBounds { projectile }
            | BusEvent::CraftHit { projectile, .. } => Some(projectile),
            BusEvent::CraftDestroyed { .. } => None,
        }
    }
}

/// What an entity is offered through `on_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    KeyDown(Key),
    Bus(BusEvent),
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: VecDeque<BusEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, event: BusEvent) {
        self.queue.push_back(event);
    }

    pub fn pop(&mut self) -> Option<BusEvent> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
