// Frame snapshot DTOs written by the presenter. One JSON object per tick.

use crate::domain::entity::{Entity, EntityKind, Rgb, Side};
use crate::domain::geometry::Rect;
use crate::domain::ports::{AudioCue, ResourceHandle};
use serde::Serialize;

/// Everything drawn and played during one tick.
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub entities: Vec<EntitySnapshotDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cues: Vec<AudioCue>,
}

impl FrameSnapshot {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            entities: Vec::new(),
            cues: Vec::new(),
        }
    }
}

/// Flattened draw command for one entity.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum EntitySnapshotDto {
    Field {
        id: u64,
        rect: Rect,
        background: ResourceHandle,
    },
    Divider {
        id: u64,
        rect: Rect,
        color: Rgb,
    },
    Craft {
        id: u64,
        rect: Rect,
        name: String,
        side: Side,
        icon: ResourceHandle,
        health: u32,
        ammo: u32,
    },
    Projectile {
        id: u64,
        rect: Rect,
        owner: u64,
        color: Rgb,
    },
    StatusDisplay {
        id: u64,
        rect: Rect,
        side: Side,
        color: Rgb,
        font: ResourceHandle,
        text: String,
    },
    Banner {
        id: u64,
        rect: Rect,
        font: ResourceHandle,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

impl From<&Entity> for EntitySnapshotDto {
    fn from(entity: &Entity) -> Self {
        let id = entity.id.0;
        let rect = entity.rect;
        match &entity.kind {
            EntityKind::Field(field) => Self::Field {
                id,
                rect,
                background: field.background.clone(),
            },
            EntityKind::Divider(divider) => Self::Divider {
                id,
                rect,
                color: divider.color,
            },
            EntityKind::Craft(craft) => Self::Craft {
                id,
                rect,
                name: craft.name.clone(),
                side: craft.side,
                icon: craft.icon.clone(),
                health: craft.health,
                ammo: craft.ammo,
            },
            EntityKind::Projectile(projectile) => Self::Projectile {
                id,
                rect,
                owner: projectile.owner.0,
                color: projectile.color,
            },
            EntityKind::StatusDisplay(display) => Self::StatusDisplay {
                id,
                rect,
                side: display.side,
                color: display.color,
                font: display.font.clone(),
                text: display.label(),
            },
            EntityKind::Banner(banner) => Self::Banner {
                id,
                rect,
                font: banner.font.clone(),
                text: banner.message(),
            },
        }
    }
}
