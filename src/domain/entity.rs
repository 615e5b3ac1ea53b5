// Simulated objects. A closed set of variants dispatched by exhaustive matches.

use crate::domain::events::{BusEvent, EventBus, GameEvent};
use crate::domain::geometry::Rect;
use crate::domain::input::{ControlScheme, HeldKeys};
use crate::domain::ports::{AudioCue, ResourceHandle};
use crate::domain::tuning::ProjectileTuning;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

/// Monotonic id source owned by the simulation.
#[derive(Debug)]
pub struct EntityIds {
    next: u64,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Which half of the arena a craft starts in. A left craft faces right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Sign of the x velocity for projectiles fired from this side.
    pub const fn facing(self) -> i32 {
        match self {
            Side::Left => 1,
            Side::Right => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
}

/// Mutable handles a dispatch call may use. Only valid for the duration of the call.
pub struct TickContext<'a> {
    pub ids: &'a mut EntityIds,
    pub bus: &'a mut EventBus,
    pub cues: &'a mut Vec<AudioCue>,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub background: ResourceHandle,
}

#[derive(Debug, Clone)]
pub struct Divider {
    pub color: Rgb,
}

#[derive(Debug, Clone)]
pub struct Craft {
    pub name: String,
    pub side: Side,
    pub color: Rgb,
    pub controls: ControlScheme,
    pub velocity: i32,
    pub health: u32,
    pub ammo: u32,
    /// Projectiles this craft fired that have not been resolved yet. Identity only.
    pub fired: Vec<EntityId>,
    pub projectile: ProjectileTuning,
    pub icon: ResourceHandle,
    pub fire_sound: ResourceHandle,
    pub hit_sound: ResourceHandle,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    /// Firing craft, for bookkeeping only. The projectile's lifetime is the loop's.
    pub owner: EntityId,
    pub velocity: i32,
    pub color: Rgb,
}

#[derive(Debug, Clone)]
pub struct StatusDisplay {
    pub craft: EntityId,
    pub side: Side,
    pub color: Rgb,
    pub font: ResourceHandle,
    /// `None` until the tracked craft is first hit.
    pub health: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub left_name: String,
    pub right_name: String,
    pub font: ResourceHandle,
    pub winner: Option<Side>,
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Field(Field),
    Divider(Divider),
    Craft(Craft),
    Projectile(Projectile),
    StatusDisplay(StatusDisplay),
    Banner(Banner),
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    /// Position and size. This is also the bounding rectangle.
    pub rect: Rect,
    /// Set when the entity should leave the live set at the next purge.
    pub removed: bool,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(id: EntityId, rect: Rect, kind: EntityKind) -> Self {
        Self {
            id,
            rect,
            removed: false,
            kind,
        }
    }

    pub fn bounding_rectangle(&self) -> Rect {
        self.rect
    }

    pub fn as_craft(&self) -> Option<&Craft> {
        match &self.kind {
            EntityKind::Craft(craft) => Some(craft),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match &self.kind {
            EntityKind::Projectile(projectile) => Some(projectile),
            _ => None,
        }
    }

    pub fn as_status_display(&self) -> Option<&StatusDisplay> {
        match &self.kind {
            EntityKind::StatusDisplay(display) => Some(display),
            _ => None,
        }
    }

    pub fn as_banner(&self) -> Option<&Banner> {
        match &self.kind {
            EntityKind::Banner(banner) => Some(banner),
            _ => None,
        }
    }

    /// Offers an event to this entity and returns any entities it spawns.
    pub fn on_event(&mut self, event: &GameEvent, ctx: &mut TickContext<'_>) -> Vec<Entity> {
        match &mut self.kind {
            EntityKind::Craft(craft) => craft.on_event(self.id, &self.rect, event, ctx),
            EntityKind::StatusDisplay(display) => {
                display.on_event(event);
                Vec::new()
            }
            EntityKind::Banner(banner) => {
                banner.on_event(event);
                Vec::new()
            }
            EntityKind::Field(_) | EntityKind::Divider(_) | EntityKind::Projectile(_) => {
                Vec::new()
            }
        }
    }

    /// Moves a craft one velocity step per held direction key. No clamping.
    pub fn on_keys_held(&mut self, held: &HeldKeys) {
        let EntityKind::Craft(craft) = &self.kind else {
            return;
        };
        let c = &craft.controls;
        let v = craft.velocity;

        let mut dx = 0;
        let mut dy = 0;
        if held.contains(c.left) {
            dx -= v;
        }
        if held.contains(c.right) {
            dx += v;
        }
        if held.contains(c.up) {
            dy -= v;
        }
        if held.contains(c.down) {
            dy += v;
        }
        self.rect.translate(dx, dy);
    }

    /// Moves a projectile one step along its fixed velocity.
    pub fn advance(&mut self) {
        if let EntityKind::Projectile(projectile) = &self.kind {
            self.rect.translate(projectile.velocity, 0);
        }
    }

    /// Reacts to an overlapping entity. Called once per direction of each pair.
    pub fn on_collision(&mut self, other: &Entity, ctx: &mut TickContext<'_>) {
        match &mut self.kind {
            EntityKind::Field(_) => match &other.kind {
                EntityKind::Projectile(_) => {
                    let p = other.rect;
                    if p.x <= self.rect.x || p.right() >= self.rect.right() {
                        debug!(projectile = other.id.0, x = p.x, "projectile left the field");
                        ctx.bus.post(BusEvent::ProjectileExitedBounds {
                            projectile: other.id,
                        });
                    }
                }
                EntityKind::Field(_)
                | EntityKind::Divider(_)
                | EntityKind::Craft(_)
                | EntityKind::StatusDisplay(_)
                | EntityKind::Banner(_) => {}
            },
            EntityKind::Craft(craft) => match &other.kind {
                EntityKind::Divider(_) => {
                    // Push back toward the side of the divider we came from.
                    if self.rect.x <= other.rect.x {
                        self.rect.x -= craft.velocity;
                    } else {
                        self.rect.x += craft.velocity;
                    }
                }
                EntityKind::Field(_) => {
                    let (dx, dy) = nudge_inside(&self.rect, &other.rect, craft.velocity);
                    self.rect.translate(dx, dy);
                }
                EntityKind::Projectile(_) => craft.take_hit(self.id, other.id, ctx),
                EntityKind::Craft(_) | EntityKind::StatusDisplay(_) | EntityKind::Banner(_) => {}
            },
            EntityKind::Divider(_)
            | EntityKind::Projectile(_)
            | EntityKind::StatusDisplay(_)
            | EntityKind::Banner(_) => {}
        }
    }
}

// One velocity step back inside `bounds` on each axis whose edge is crossed.
fn nudge_inside(rect: &Rect, bounds: &Rect, step: i32) -> (i32, i32) {
    let dx = if rect.x <= bounds.x {
        step
    } else if rect.right() >= bounds.right() {
        -step
    } else {
        0
    };
    let dy = if rect.y <= bounds.y {
        step
    } else if rect.bottom() >= bounds.bottom() {
        -step
    } else {
        0
    };
    (dx, dy)
}

impl Craft {
    fn on_event(
        &mut self,
        id: EntityId,
        rect: &Rect,
        event: &GameEvent,
        ctx: &mut TickContext<'_>,
    ) -> Vec<Entity> {
        match event {
            GameEvent::KeyDown(key) if *key == self.controls.fire => {
                self.fire(id, rect, ctx).into_iter().collect()
            }
            GameEvent::KeyDown(_) => Vec::new(),
            GameEvent::Bus(bus_event) => {
                if let Some(projectile) = bus_event.spent_projectile() {
                    self.reclaim(projectile);
                }
                Vec::new()
            }
        }
    }

    /// Spawns a projectile at the leading edge, or does nothing without ammunition.
    pub fn fire(&mut self, id: EntityId, rect: &Rect, ctx: &mut TickContext<'_>) -> Option<Entity> {
        if self.ammo == 0 {
            return None;
        }

        let tuning = self.projectile;
        let x = match self.side {
            Side::Left => rect.right() + tuning.spawn_gap,
            Side::Right => rect.x - tuning.width - tuning.spawn_gap,
        };
        let y = rect.y + rect.height / 2;
        let projectile_id = ctx.ids.next();

        self.ammo -= 1;
        self.fired.push(projectile_id);
        ctx.cues.push(AudioCue {
            sound: self.fire_sound.clone(),
        });
        debug!(
            craft = id.0,
            projectile = projectile_id.0,
            ammo = self.ammo,
            "craft fired"
        );

        Some(Entity::new(
            projectile_id,
            Rect::new(x, y, tuning.width, tuning.height),
            EntityKind::Projectile(Projectile {
                owner: id,
                velocity: tuning.speed * self.side.facing(),
                color: self.color,
            }),
        ))
    }

    // The only path that returns ammunition.
    fn reclaim(&mut self, projectile: EntityId) {
        if let Some(pos) = self.fired.iter().position(|p| *p == projectile) {
            self.fired.remove(pos);
            self.ammo += 1;
        }
    }

    fn take_hit(&mut self, id: EntityId, projectile: EntityId, ctx: &mut TickContext<'_>) {
        if self.health > 0 {
            self.health -= 1;
            if self.health == 0 {
                info!(craft = id.0, name = %self.name, "craft destroyed");
                ctx.bus.post(BusEvent::CraftDestroyed {
                    craft: id,
                    side: self.side,
                });
            }
        }
        ctx.cues.push(AudioCue {
            sound: self.hit_sound.clone(),
        });
        debug!(
            craft = id.0,
            projectile = projectile.0,
            health = self.health,
            "craft hit"
        );
        ctx.bus.post(BusEvent::CraftHit {
            projectile,
            craft: id,
            health_remaining: self.health,
        });
    }
}

impl StatusDisplay {
    fn on_event(&mut self, event: &GameEvent) {
        if let GameEvent::Bus(BusEvent::CraftHit {
            craft,
            health_remaining,
            ..
        }) = event
        {
            if *craft == self.craft {
                self.health = Some(*health_remaining);
            }
        }
    }

    pub fn label(&self) -> String {
        match self.health {
            Some(health) => format!("Health: {health}"),
            None => "Health: Full".to_string(),
        }
    }
}

impl Banner {
    // Later destroyed events overwrite earlier ones within the same drain.
    fn on_event(&mut self, event: &GameEvent) {
        if let GameEvent::Bus(BusEvent::CraftDestroyed { side, .. }) = event {
            self.winner = Some(side.opponent());
        }
    }

    pub fn message(&self) -> Option<String> {
        let name = match self.winner? {
            Side::Left => &self.left_name,
            Side::Right => &self.right_name,
        };
        Some(format!("{name} Wins!!!"))
    }
}
