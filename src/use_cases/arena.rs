// Lays out a fresh match from settings and resolved asset handles.

use crate::domain::entity::{
    Banner, Craft, Divider, Entity, EntityIds, EntityKind, Field, Rgb, Side, StatusDisplay,
};
use crate::domain::errors::ConfigError;
use crate::domain::geometry::Rect;
use crate::domain::ports::{AssetCatalog, ResourceHandle};
use crate::use_cases::game::Simulation;
use crate::use_cases::types::{ArenaSettings, CraftSettings};
use tracing::info;

/// Builds the live set in draw order: field, divider, crafts, health labels, banner.
pub fn build_arena<A: AssetCatalog>(
    settings: &ArenaSettings,
    assets: &A,
) -> Result<Simulation, ConfigError> {
    settings.validate()?;

    let resolve = |name: &str| -> Result<ResourceHandle, ConfigError> {
        assets
            .resolve(name)
            .ok_or_else(|| ConfigError::MissingResource(name.to_string()))
    };
    let background = resolve(&settings.background)?;
    let font = resolve(&settings.font)?;

    let mut ids = EntityIds::default();
    let mut entities = Vec::with_capacity(7);

    entities.push(Entity::new(
        ids.next(),
        Rect::new(0, 0, settings.width, settings.height),
        EntityKind::Field(Field { background }),
    ));
    entities.push(Entity::new(
        ids.next(),
        Rect::new(
            settings.width / 2 - settings.divider_width / 2,
            0,
            settings.divider_width,
            settings.height,
        ),
        EntityKind::Divider(Divider { color: Rgb::BLACK }),
    ));

    let mut displays = Vec::with_capacity(2);
    for craft in [&settings.left, &settings.right] {
        let entity = build_craft(settings, craft, &resolve, &mut ids)?;
        let anchor_x = match craft.side {
            Side::Left => 0,
            Side::Right => settings.width,
        };
        displays.push(Entity::new(
            ids.next(),
            Rect::new(anchor_x, 0, 0, settings.label_height),
            EntityKind::StatusDisplay(StatusDisplay {
                craft: entity.id,
                side: craft.side,
                color: craft.color,
                font: font.clone(),
                health: None,
            }),
        ));
        entities.push(entity);
    }
    entities.extend(displays);

    entities.push(Entity::new(
        ids.next(),
        Rect::new(0, 0, settings.width, settings.height),
        EntityKind::Banner(Banner {
            left_name: settings.left.name.clone(),
            right_name: settings.right.name.clone(),
            font,
            winner: None,
        }),
    ));

    info!(
        width = settings.width,
        height = settings.height,
        entities = entities.len(),
        "arena built"
    );
    Ok(Simulation::new(entities, ids))
}

fn build_craft<F>(
    settings: &ArenaSettings,
    craft: &CraftSettings,
    resolve: &F,
    ids: &mut EntityIds,
) -> Result<Entity, ConfigError>
where
    F: Fn(&str) -> Result<ResourceHandle, ConfigError>,
{
    let tuning = settings.craft;
    Ok(Entity::new(
        ids.next(),
        Rect::new(craft.x, craft.y, tuning.width, tuning.height),
        EntityKind::Craft(Craft {
            name: craft.name.clone(),
            side: craft.side,
            color: craft.color,
            controls: craft.controls,
            velocity: tuning.velocity,
            health: tuning.starting_health,
            ammo: tuning.starting_ammo,
            fired: Vec::new(),
            projectile: settings.projectile,
            icon: resolve(&craft.icon)?,
            fire_sound: resolve(&craft.fire_sound)?,
            hit_sound: resolve(&craft.hit_sound)?,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Listed(HashSet<&'static str>);

    impl AssetCatalog for Listed {
        fn resolve(&self, name: &str) -> Option<ResourceHandle> {
            self.0.contains(name).then(|| ResourceHandle::new(name))
        }
    }

    fn all_assets() -> Listed {
        Listed(
            [
                "space.png",
                "QuirkyRobot.ttf",
                "spaceship_red.png",
                "spaceship_yellow.png",
                "spaceship_fired.mp3",
                "spaceship_hit.mp3",
            ]
            .into_iter()
            .collect(),
        )
    }

    #[test]
    fn when_assets_resolve_then_entities_are_laid_out_in_draw_order() {
        let sim = build_arena(&ArenaSettings::default(), &all_assets()).expect("arena builds");
        let kinds: Vec<&str> = sim
            .entities()
            .iter()
            .map(|e| match e.kind {
                EntityKind::Field(_) => "field",
                EntityKind::Divider(_) => "divider",
                EntityKind::Craft(_) => "craft",
                EntityKind::Projectile(_) => "projectile",
                EntityKind::StatusDisplay(_) => "status",
                EntityKind::Banner(_) => "banner",
            })
            .collect();

        assert_eq!(
            kinds,
            vec!["field", "divider", "craft", "craft", "status", "status", "banner"]
        );
        assert_eq!(sim.entities()[1].rect, Rect::new(445, 0, 10, 500));
    }

    #[test]
    fn status_displays_track_the_crafts_on_their_side() {
        let sim = build_arena(&ArenaSettings::default(), &all_assets()).expect("arena builds");
        let crafts: Vec<_> = sim
            .entities()
            .iter()
            .filter_map(|e| e.as_craft().map(|c| (e.id, c.side)))
            .collect();
        let displays: Vec<_> = sim
            .entities()
            .iter()
            .filter_map(|e| e.as_status_display().map(|d| (d.craft, d.side)))
            .collect();

        assert_eq!(crafts, displays);
        assert_eq!(crafts[0].1, Side::Left);
    }

    #[test]
    fn when_an_icon_is_missing_then_returns_missing_resource() {
        let mut assets = all_assets();
        assets.0.remove("spaceship_yellow.png");

        let result = build_arena(&ArenaSettings::default(), &assets);

        assert!(matches!(
            result,
            Err(ConfigError::MissingResource(name)) if name == "spaceship_yellow.png"
        ));
    }

    #[test]
    fn when_settings_are_invalid_then_arena_is_not_built() {
        let settings = ArenaSettings {
            width: 0,
            ..ArenaSettings::default()
        };

        assert!(matches!(
            build_arena(&settings, &all_assets()),
            Err(ConfigError::InvalidSetting(_))
        ));
    }
}
