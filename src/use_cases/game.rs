use super::types::{LoopState, MatchPhase};
use crate::domain::entity::{Entity, EntityId, EntityIds, EntityKind, Side, TickContext};
use crate::domain::events::{BusEvent, EventBus, GameEvent};
use crate::domain::geometry::Rect;
use crate::domain::input::{InputEvent, InputFrame};
use crate::domain::ports::{AudioCue, InputSource, Presenter};
use crate::domain::systems::collisions;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{debug, debug_span, info, warn};

/// Upper bound on events handled by a single drain pass.
pub const MAX_EVENTS_PER_DRAIN: usize = 1024;

/// Owns the live entity set and the bus; advances them one tick at a time.
pub struct Simulation {
    entities: Vec<Entity>,
    bus: EventBus,
    ids: EntityIds,
    cues: Vec<AudioCue>,
    phase: MatchPhase,
    tick: u64,
}

impl Simulation {
    pub fn new(entities: Vec<Entity>, ids: EntityIds) -> Self {
        Self {
            entities,
            bus: EventBus::new(),
            ids,
            cues: Vec::new(),
            phase: MatchPhase::Playing,
            tick: 0,
        }
    }

    /// Live entities in insertion (draw) order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Adds an entity at the end of the live set and returns its id.
    pub fn spawn(&mut self, rect: Rect, kind: EntityKind) -> EntityId {
        let id = self.ids.next();
        self.entities.push(Entity::new(id, rect, kind));
        id
    }

    /// Queues an event for the next drain, as an entity would.
    pub fn post(&mut self, event: BusEvent) {
        self.bus.post(event);
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn winner(&self) -> Option<Side> {
        self.entities
            .iter()
            .find_map(|e| e.as_banner().and_then(|b| b.winner))
    }

    /// Runs one tick: input dispatch, drain, motion, collisions, drain, purge, draw.
    pub fn step<P: Presenter>(&mut self, frame: InputFrame, presenter: &mut P) -> LoopState {
        if frame.wants_quit() {
            info!(tick = self.tick, "quit received");
            return LoopState::Terminated;
        }

        self.tick += 1;
        let span = debug_span!("tick", tick = self.tick);
        let _enter = span.enter();

        if self.phase == MatchPhase::Playing {
            for event in &frame.events {
                if let InputEvent::KeyDown(key) = *event {
                    self.dispatch(GameEvent::KeyDown(key));
                }
            }
            self.drain_bus();

            for entity in &mut self.entities {
                entity.on_keys_held(&frame.held);
                entity.advance();
            }

            let mut ctx = TickContext {
                ids: &mut self.ids,
                bus: &mut self.bus,
                cues: &mut self.cues,
            };
            collisions::resolve_collisions(&mut self.entities, &mut ctx);
            self.drain_bus();
        }

        self.purge();
        self.present(presenter);
        LoopState::Running
    }

    // Offers one event to every live entity; spawns join the set afterwards.
    fn dispatch(&mut self, event: GameEvent) {
        let mut ctx = TickContext {
            ids: &mut self.ids,
            bus: &mut self.bus,
            cues: &mut self.cues,
        };
        let mut spawned = Vec::new();
        for entity in self.entities.iter_mut().filter(|e| !e.removed) {
            spawned.extend(entity.on_event(&event, &mut ctx));
        }
        self.entities.extend(spawned);
    }

    fn drain_bus(&mut self) {
        let mut drained = 0;
        while let Some(event) = self.bus.pop() {
            if drained == MAX_EVENTS_PER_DRAIN {
                warn!(
                    dropped = self.bus.len() + 1,
                    "bus drain limit reached, dropping remaining events"
                );
                self.bus.clear();
                break;
            }
            drained += 1;

            if let Some(projectile) = event.spent_projectile() {
                self.mark_removed(projectile);
            }
            if let BusEvent::CraftDestroyed { craft, side } = event {
                if self.phase == MatchPhase::Playing {
                    info!(craft = craft.0, ?side, "match over");
                }
                self.phase = MatchPhase::Over;
            }

            self.dispatch(GameEvent::Bus(event));
        }
    }

    fn mark_removed(&mut self, id: EntityId) {
        match self.entities.iter_mut().find(|e| e.id == id) {
            Some(entity) if entity.as_projectile().is_some() => entity.removed = true,
            Some(_) => warn!(entity = id.0, "removal requested for a non-projectile"),
            None => debug!(entity = id.0, "event references an entity no longer live"),
        }
    }

    fn purge(&mut self) {
        let before = self.entities.len();
        self.entities.retain(|e| !e.removed);
        let purged = before - self.entities.len();
        if purged > 0 {
            debug!(purged, live = self.entities.len(), "purged entities");
        }
    }

    fn present<P: Presenter>(&mut self, presenter: &mut P) {
        presenter.begin_frame(self.tick);
        for entity in &self.entities {
            presenter.draw(entity);
        }
        for cue in self.cues.drain(..) {
            presenter.play(&cue);
        }
        presenter.end_frame();
    }
}

/// Drives the simulation at a fixed rate until quit or shutdown. Returns ticks run.
pub async fn run<I, P>(
    sim: &mut Simulation,
    input: &mut I,
    presenter: &mut P,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) -> u64
where
    I: InputSource,
    P: Presenter,
{
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(tick_ms = tick_interval.as_millis() as u64, "match started");
    loop {
        tokio::select! {
            biased;
            _ = shutdown.notified() => {
                info!(tick = sim.tick(), "shutdown requested");
                break;
            }
            _ = interval.tick() => {}
        }

        let frame = input.poll();
        if sim.step(frame, presenter) == LoopState::Terminated {
            break;
        }
    }
    sim.tick()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::tests::{craft, field, projectile};
    use crate::domain::entity::{Banner, Projectile, Rgb};
    use crate::domain::input::{HeldKeys, Key};
    use crate::domain::ports::ResourceHandle;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Vec<EntityId>>,
        cues: usize,
    }

    impl Presenter for Recorder {
        fn begin_frame(&mut self, _tick: u64) {
            self.frames.push(Vec::new());
        }

        fn draw(&mut self, entity: &Entity) {
            if let Some(frame) = self.frames.last_mut() {
                frame.push(entity.id);
            }
        }

        fn play(&mut self, _cue: &AudioCue) {
            self.cues += 1;
        }
    }

    fn banner(id: u64) -> Entity {
        Entity::new(
            EntityId(id),
            Rect::new(0, 0, 900, 500),
            EntityKind::Banner(Banner {
                left_name: "Red".to_string(),
                right_name: "Yellow".to_string(),
                font: ResourceHandle::new("font"),
                winner: None,
            }),
        )
    }

    // Field, two crafts and a banner, ids 1..=4.
    fn duel(left_ammo: u32, left_health: u32, right_health: u32) -> Simulation {
        let mut ids = EntityIds::default();
        for _ in 0..4 {
            ids.next();
        }
        Simulation::new(
            vec![
                field(1, 900, 500),
                craft(2, Side::Left, 300, left_ammo, left_health),
                craft(3, Side::Right, 700, 3, right_health),
                banner(4),
            ],
            ids,
        )
    }

    fn keys(events: &[Key]) -> InputFrame {
        InputFrame {
            events: events.iter().copied().map(InputEvent::KeyDown).collect(),
            held: HeldKeys::default(),
        }
    }

    fn ammo(sim: &Simulation, id: u64) -> u32 {
        sim.entity(EntityId(id))
            .and_then(Entity::as_craft)
            .map(|c| c.ammo)
            .unwrap_or_default()
    }

    fn live_projectiles(sim: &Simulation, owner: u64) -> usize {
        sim.entities()
            .iter()
            .filter(|e| e.as_projectile().is_some_and(|p| p.owner == EntityId(owner)))
            .count()
    }

    #[test]
    fn when_quit_is_received_then_loop_terminates_without_a_tick() {
        let mut sim = duel(3, 10, 10);
        let mut recorder = Recorder::default();

        let state = sim.step(InputFrame::quit(), &mut recorder);

        assert_eq!(state, LoopState::Terminated);
        assert_eq!(sim.tick(), 0);
        assert!(recorder.frames.is_empty());
    }

    #[test]
    fn when_fire_key_is_pressed_then_projectile_joins_the_live_set_and_draws_last() {
        let mut sim = duel(3, 10, 10);
        let mut recorder = Recorder::default();

        sim.step(keys(&[Key::LCtrl]), &mut recorder);

        assert_eq!(ammo(&sim, 2), 2);
        assert_eq!(live_projectiles(&sim, 2), 1);
        let frame = &recorder.frames[0];
        assert_eq!(&frame[..4], &[EntityId(1), EntityId(2), EntityId(3), EntityId(4)]);
        assert_eq!(frame.len(), 5);
        assert_eq!(recorder.cues, 1);
    }

    #[test]
    fn spawned_projectile_moves_in_the_same_tick() {
        let mut sim = duel(3, 10, 10);
        let mut recorder = Recorder::default();

        sim.step(keys(&[Key::LCtrl]), &mut recorder);

        let shot = sim
            .entities()
            .iter()
            .find(|e| e.as_projectile().is_some())
            .expect("projectile spawned");
        assert_eq!(shot.rect.x, 300 + 55 + 2 + 5);
    }

    #[test]
    fn when_projectile_leaves_the_field_then_ammo_returns_and_it_is_purged() {
        let mut sim = duel(2, 10, 10);
        let id = sim.spawn(
            Rect::new(850, 400, 10, 5),
            EntityKind::Projectile(Projectile {
                owner: EntityId(2),
                velocity: 5,
                color: Rgb::RED,
            }),
        );
        if let Some(EntityKind::Craft(c)) = sim.entity_mut(EntityId(2)).map(|e| &mut e.kind) {
            c.fired.push(id);
        }
        let mut recorder = Recorder::default();

        let mut ticks = 0;
        while sim.entity(id).is_some() {
            sim.step(InputFrame::default(), &mut recorder);
            ticks += 1;
            assert!(ticks < 20, "projectile never left the field");
        }

        // 850 + 8 * 5 = 890, the first x where x + width reaches 900.
        assert_eq!(ticks, 8);
        assert_eq!(ammo(&sim, 2), 3);
        let last = recorder.frames.last().expect("frames drawn");
        assert!(!last.contains(&id));
    }

    #[test]
    fn ammunition_plus_live_projectiles_is_conserved() {
        let mut sim = duel(3, 10, 10);
        let mut recorder = Recorder::default();

        for tick in 0..200 {
            let frame = if tick % 7 == 0 {
                keys(&[Key::LCtrl])
            } else {
                InputFrame::default()
            };
            sim.step(frame, &mut recorder);

            let fired = sim
                .entity(EntityId(2))
                .and_then(Entity::as_craft)
                .map(|c| c.fired.len())
                .unwrap_or_default();
            assert_eq!(ammo(&sim, 2) as usize + live_projectiles(&sim, 2), 3);
            assert_eq!(fired, live_projectiles(&sim, 2));
        }
    }

    #[test]
    fn when_projectile_hits_a_craft_then_it_is_removed_and_credited() {
        let mut sim = duel(3, 10, 10);
        let mut recorder = Recorder::default();
        // Park the right craft just ahead of the left craft's muzzle.
        if let Some(right) = sim.entity_mut(EntityId(3)) {
            right.rect.x = 365;
        }

        sim.step(keys(&[Key::LCtrl]), &mut recorder);

        let right = sim.entity(EntityId(3)).and_then(Entity::as_craft);
        assert_eq!(right.map(|c| c.health), Some(9));
        assert_eq!(live_projectiles(&sim, 2), 0);
        assert_eq!(ammo(&sim, 2), 3);
    }

    #[test]
    fn when_both_crafts_fall_in_one_tick_then_last_destroyed_event_decides() {
        let mut sim = duel(3, 1, 1);
        // Right craft is hit by a projectile overlapping it; left likewise.
        sim.entities.push(projectile(10, 2, 710, 110, 5));
        sim.entities.push(projectile(11, 3, 310, 110, -5));
        let mut recorder = Recorder::default();

        sim.step(InputFrame::default(), &mut recorder);

        // Pairs resolve in insertion order: left craft (index 1) before right (index 2),
        // so the right craft's destroyed event drains last and the left side wins.
        assert_eq!(sim.phase(), MatchPhase::Over);
        assert_eq!(sim.winner(), Some(Side::Left));
        for id in [2, 3] {
            let health = sim.entity(EntityId(id)).and_then(Entity::as_craft).map(|c| c.health);
            assert_eq!(health, Some(0));
        }
    }

    #[test]
    fn when_match_is_over_then_input_and_motion_are_ignored() {
        let mut sim = duel(3, 10, 1);
        sim.post(BusEvent::CraftDestroyed {
            craft: EntityId(3),
            side: Side::Right,
        });
        let mut recorder = Recorder::default();

        sim.step(InputFrame::default(), &mut recorder);
        assert_eq!(sim.phase(), MatchPhase::Over);
        assert_eq!(sim.winner(), Some(Side::Left));

        let frame = InputFrame {
            events: vec![InputEvent::KeyDown(Key::LCtrl)],
            held: [Key::D].into_iter().collect(),
        };
        let state = sim.step(frame, &mut recorder);

        assert_eq!(state, LoopState::Running);
        assert_eq!(ammo(&sim, 2), 3);
        assert_eq!(sim.entity(EntityId(2)).map(|e| e.rect.x), Some(300));
        assert_eq!(recorder.frames.len(), 2);
        assert_eq!(sim.step(InputFrame::quit(), &mut recorder), LoopState::Terminated);
    }

    #[test]
    fn when_event_references_a_missing_entity_then_it_is_a_no_op() {
        let mut sim = duel(3, 10, 10);
        sim.post(BusEvent::ProjectileExitedBounds {
            projectile: EntityId(999),
        });
        sim.post(BusEvent::CraftHit {
            projectile: EntityId(998),
            craft: EntityId(3),
            health_remaining: 10,
        });
        let mut recorder = Recorder::default();

        let state = sim.step(InputFrame::default(), &mut recorder);

        assert_eq!(state, LoopState::Running);
        assert_eq!(sim.entities().len(), 4);
        assert_eq!(ammo(&sim, 2), 3);
    }

    #[test]
    fn when_removal_targets_a_craft_then_the_craft_stays_live() {
        let mut sim = duel(3, 10, 10);
        sim.post(BusEvent::ProjectileExitedBounds {
            projectile: EntityId(2),
        });

        sim.step(InputFrame::default(), &mut Recorder::default());

        assert!(sim.entity(EntityId(2)).is_some());
    }

    #[test]
    fn when_bus_floods_then_drain_stops_at_the_limit() {
        let mut sim = duel(3, 10, 10);
        for n in 0..(MAX_EVENTS_PER_DRAIN as u64 + 10) {
            sim.post(BusEvent::ProjectileExitedBounds {
                projectile: EntityId(10_000 + n),
            });
        }

        sim.step(InputFrame::default(), &mut Recorder::default());

        assert!(sim.bus.is_empty());
    }

    #[test]
    fn held_keys_move_crafts_before_collisions_push_them_back() {
        let mut sim = duel(3, 10, 10);
        if let Some(left) = sim.entity_mut(EntityId(2)) {
            left.rect.x = 2;
        }
        let frame = InputFrame {
            events: Vec::new(),
            held: [Key::A].into_iter().collect(),
        };

        sim.step(frame, &mut Recorder::default());

        // Moved to -3, then the field nudged it one step back inside.
        assert_eq!(sim.entity(EntityId(2)).map(|e| e.rect.x), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_when_shutdown_is_notified() {
        struct Idle;
        impl InputSource for Idle {
            fn poll(&mut self) -> InputFrame {
                InputFrame::default()
            }
        }

        let mut sim = duel(3, 10, 10);
        let shutdown = Arc::new(Notify::new());
        shutdown.notify_one();

        let ticks = run(
            &mut sim,
            &mut Idle,
            &mut Recorder::default(),
            Duration::from_millis(16),
            shutdown,
        )
        .await;

        assert_eq!(ticks, 0);
    }
}
