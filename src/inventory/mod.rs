//! Inventory domain — per-location stacks, pickups, starting items.
//!
//! Stack changes from other domains go through `AddInventoryItemEvent`,
//! `RemoveInventoryItemEvent` and `ItemPickupEvent`; every successful change
//! is announced with `InventoryUpdatedEvent`. The player domain moves the
//! selection directly.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::shared::*;

pub struct InventoryPlugin;

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InventoryStore>()
            .add_systems(OnEnter(GameState::Playing), init_inventories)
            .add_systems(
                Update,
                (
                    handle_item_pickup.in_set(PickupSet::Collect),
                    handle_add_item_events,
                    handle_remove_item_events,
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Apply configured capacities and hand the player their starting items.
pub fn init_inventories(
    settings: Res<GameSettings>,
    item_registry: Res<ItemRegistry>,
    mut store: ResMut<InventoryStore>,
    mut updated_events: EventWriter<InventoryUpdatedEvent>,
) {
    for location in InventoryLocation::ALL {
        store.set_capacity(location, settings.capacity(location));
    }

    let mut starting: Vec<&ItemDetails> = item_registry
        .items
        .values()
        .filter(|d| d.is_starting_item)
        .collect();
    starting.sort_by_key(|d| d.item_code);

    for details in starting {
        if let Err(e) = store.add_item(InventoryLocation::Player, details.item_code) {
            warn!("[Inventory] starting item {} dropped: {}", details.description, e);
        }
    }

    // Equip the first tool so tool use has something to swing.
    let first_tool = store
        .items(InventoryLocation::Player)
        .iter()
        .map(|i| i.item_code)
        .find(|code| item_registry.get(*code).is_some_and(|d| d.kind.is_tool()));
    if let Some(code) = first_tool {
        let _ = store.set_selected_item(InventoryLocation::Player, code);
    }

    for location in InventoryLocation::ALL {
        updated_events.send(InventoryUpdatedEvent {
            location,
            items: store.snapshot(location),
        });
    }
}

pub fn handle_add_item_events(
    mut events: EventReader<AddInventoryItemEvent>,
    mut store: ResMut<InventoryStore>,
    mut updated_events: EventWriter<InventoryUpdatedEvent>,
) {
    for ev in events.read() {
        match store.add_item(ev.location, ev.item_code) {
            Ok(()) => {
                updated_events.send(InventoryUpdatedEvent {
                    location: ev.location,
                    items: store.snapshot(ev.location),
                });
            }
            Err(e) => warn!("[Inventory] could not add item {}: {}", ev.item_code, e),
        }
    }
}

pub fn handle_remove_item_events(
    mut events: EventReader<RemoveInventoryItemEvent>,
    mut store: ResMut<InventoryStore>,
    mut updated_events: EventWriter<InventoryUpdatedEvent>,
) {
    for ev in events.read() {
        match store.remove_item(ev.location, ev.item_code) {
            Ok(()) => {
                updated_events.send(InventoryUpdatedEvent {
                    location: ev.location,
                    items: store.snapshot(ev.location),
                });
            }
            Err(e) => warn!("[Inventory] could not remove item {}: {}", ev.item_code, e),
        }
    }
}

/// Move touched world items into the player's inventory. Items that cannot
/// be picked up, or that do not fit, stay in the world.
///
/// Each world item is collected at most once: touches of an entity that is
/// already gone, or already collected earlier in the batch, are ignored.
pub fn handle_item_pickup(
    mut commands: Commands,
    mut events: EventReader<ItemPickupEvent>,
    world_items: Query<&WorldItem>,
    item_registry: Res<ItemRegistry>,
    mut store: ResMut<InventoryStore>,
    mut updated_events: EventWriter<InventoryUpdatedEvent>,
) {
    let mut collected = HashSet::new();
    for ev in events.read() {
        if collected.contains(&ev.entity) || world_items.get(ev.entity).is_err() {
            debug!("[Inventory] item {} already collected", ev.item_code);
            continue;
        }

        let details = match item_registry.get_item_details(ev.item_code) {
            Ok(d) => d,
            Err(e) => {
                debug!("[Inventory] ignoring pickup: {}", e);
                continue;
            }
        };

        debug!("[Inventory] touched {}", details.description);

        if !details.can_be_picked_up {
            continue;
        }

        if let Err(e) = store.add_item(InventoryLocation::Player, ev.item_code) {
            debug!("[Inventory] {} left on the ground: {}", details.description, e);
            continue;
        }

        collected.insert(ev.entity);
        if let Some(mut entity) = commands.get_entity(ev.entity) {
            entity.despawn();
        }

        updated_events.send(InventoryUpdatedEvent {
            location: InventoryLocation::Player,
            items: store.snapshot(InventoryLocation::Player),
        });
    }
}
