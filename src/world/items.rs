//! Items lying in the world, waiting to be picked up.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::shared::*;

pub fn spawn_world_items(mut commands: Commands, mut events: EventReader<SpawnWorldItemEvent>) {
    for ev in events.read() {
        commands.spawn((
            WorldItem {
                item_code: ev.item_code,
            },
            Transform::from_translation(ev.position),
        ));
    }
}

/// Send an `ItemPickupEvent` when a world item comes within reach of the
/// player. An item left on the ground (not collectable, or no room) is
/// touched again only after the player steps away and back.
pub fn detect_item_pickups(
    settings: Res<GameSettings>,
    input: Res<PlayerInputState>,
    player_query: Query<&Transform, With<Player>>,
    item_query: Query<(Entity, &Transform, &WorldItem)>,
    mut in_reach: Local<HashSet<Entity>>,
    mut pickup_events: EventWriter<ItemPickupEvent>,
) {
    if input.disabled {
        in_reach.clear();
        return;
    }
    let Ok(player) = player_query.get_single() else {
        in_reach.clear();
        return;
    };
    let reach = player.translation.truncate();

    let mut now_in_reach = HashSet::new();
    for (entity, transform, item) in &item_query {
        if transform.translation.truncate().distance(reach) > settings.pickup_radius {
            continue;
        }
        now_in_reach.insert(entity);
        if !in_reach.contains(&entity) {
            pickup_events.send(ItemPickupEvent {
                item_code: item.item_code,
                entity,
            });
        }
    }
    *in_reach = now_in_reach;
}
