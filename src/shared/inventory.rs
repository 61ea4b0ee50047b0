//! Capacity-bounded stackable inventories, one ordered list per location.

use bevy::prelude::*;
use std::collections::HashMap;

use super::*;

#[derive(Debug, Clone, Default)]
struct LocationInventory {
    items: Vec<InventoryItem>,
    capacity: usize,
    selected: Option<ItemCode>,
}

#[derive(Resource, Debug, Clone)]
pub struct InventoryStore {
    locations: HashMap<InventoryLocation, LocationInventory>,
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::with_settings(&GameSettings::default())
    }
}

impl InventoryStore {
    pub fn with_settings(settings: &GameSettings) -> Self {
        let locations = InventoryLocation::ALL
            .into_iter()
            .map(|location| {
                (
                    location,
                    LocationInventory {
                        capacity: settings.capacity(location),
                        ..default()
                    },
                )
            })
            .collect();
        Self { locations }
    }

    fn location(&self, location: InventoryLocation) -> &LocationInventory {
        // Every location is created up front.
        &self.locations[&location]
    }

    fn location_mut(&mut self, location: InventoryLocation) -> &mut LocationInventory {
        self.locations.entry(location).or_default()
    }

    pub fn items(&self, location: InventoryLocation) -> &[InventoryItem] {
        &self.location(location).items
    }

    pub fn capacity(&self, location: InventoryLocation) -> usize {
        self.location(location).capacity
    }

    /// Shrinking below the current entry count keeps the existing entries;
    /// only new item codes are refused until space frees up.
    pub fn set_capacity(&mut self, location: InventoryLocation, capacity: usize) {
        self.location_mut(location).capacity = capacity;
    }

    /// Position of the entry holding `item_code`, if any.
    pub fn find_item(&self, location: InventoryLocation, item_code: ItemCode) -> Option<usize> {
        self.items(location)
            .iter()
            .position(|item| item.item_code == item_code)
    }

    pub fn quantity_of(&self, location: InventoryLocation, item_code: ItemCode) -> u32 {
        self.find_item(location, item_code)
            .map(|i| self.items(location)[i].quantity)
            .unwrap_or(0)
    }

    /// Add one unit of `item_code`.
    ///
    /// An existing stack grows in place, keeping its position. A new code is
    /// appended at the end, unless the location already holds `capacity`
    /// distinct entries, in which case nothing changes.
    pub fn add_item(
        &mut self,
        location: InventoryLocation,
        item_code: ItemCode,
    ) -> Result<(), InventoryError> {
        let inv = self.location_mut(location);
        if let Some(item) = inv.items.iter_mut().find(|i| i.item_code == item_code) {
            item.quantity = item
                .quantity
                .checked_add(1)
                .ok_or(InventoryError::StackFull { location, item_code })?;
            return Ok(());
        }

        if inv.items.len() >= inv.capacity {
            return Err(InventoryError::CapacityExceeded {
                location,
                capacity: inv.capacity,
            });
        }

        inv.items.push(InventoryItem {
            item_code,
            quantity: 1,
        });
        Ok(())
    }

    /// Remove one unit of `item_code`. The entry disappears when it reaches
    /// zero, and the selection is cleared with it.
    pub fn remove_item(
        &mut self,
        location: InventoryLocation,
        item_code: ItemCode,
    ) -> Result<(), InventoryError> {
        let inv = self.location_mut(location);
        let Some(index) = inv.items.iter().position(|i| i.item_code == item_code) else {
            return Err(InventoryError::NotFound {
                location,
                item_code,
            });
        };

        inv.items[index].quantity -= 1;
        if inv.items[index].quantity == 0 {
            inv.items.remove(index);
            if inv.selected == Some(item_code) {
                inv.selected = None;
            }
        }
        Ok(())
    }

    /// Exchange the entries at two positions (inventory bar drag and drop).
    pub fn swap_items(
        &mut self,
        location: InventoryLocation,
        from: usize,
        to: usize,
    ) -> Result<(), InventoryError> {
        let inv = self.location_mut(location);
        let len = inv.items.len();
        for index in [from, to] {
            if index >= len {
                return Err(InventoryError::PositionOutOfRange { location, index });
            }
        }
        inv.items.swap(from, to);
        Ok(())
    }

    pub fn selected_item(&self, location: InventoryLocation) -> Option<ItemCode> {
        self.location(location).selected
    }

    /// Only items currently held can be selected.
    pub fn set_selected_item(
        &mut self,
        location: InventoryLocation,
        item_code: ItemCode,
    ) -> Result<(), InventoryError> {
        if self.find_item(location, item_code).is_none() {
            return Err(InventoryError::NotFound {
                location,
                item_code,
            });
        }
        self.location_mut(location).selected = Some(item_code);
        Ok(())
    }

    pub fn clear_selected_item(&mut self, location: InventoryLocation) {
        self.location_mut(location).selected = None;
    }

    pub fn snapshot(&self, location: InventoryLocation) -> Vec<InventoryItem> {
        self.items(location).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: InventoryLocation = InventoryLocation::Player;
    const CHEST: InventoryLocation = InventoryLocation::Chest;

    fn store_with_capacity(capacity: usize) -> InventoryStore {
        let mut store = InventoryStore::default();
        store.set_capacity(PLAYER, capacity);
        store
    }

    #[test]
    fn test_add_new_item_creates_single_entry() {
        let mut store = InventoryStore::default();
        store.add_item(PLAYER, 3003).unwrap();
        assert_eq!(
            store.items(PLAYER),
            &[InventoryItem { item_code: 3003, quantity: 1 }]
        );
    }

    #[test]
    fn test_add_existing_item_stacks_in_place() {
        let mut store = InventoryStore::default();
        store.add_item(PLAYER, 10).unwrap();
        store.add_item(PLAYER, 3003).unwrap();
        store.add_item(PLAYER, 20).unwrap();
        store.add_item(PLAYER, 3003).unwrap();

        let items = store.items(PLAYER);
        assert_eq!(items.len(), 3);
        assert_eq!(items[1], InventoryItem { item_code: 3003, quantity: 2 });
        assert_eq!(store.find_item(PLAYER, 3003), Some(1));
    }

    #[test]
    fn test_locations_are_independent() {
        let mut store = InventoryStore::default();
        store.add_item(PLAYER, 1).unwrap();
        store.add_item(CHEST, 2).unwrap();
        assert_eq!(store.quantity_of(PLAYER, 2), 0);
        assert_eq!(store.quantity_of(CHEST, 2), 1);
        assert_eq!(store.items(CHEST).len(), 1);
    }

    #[test]
    fn test_new_code_beyond_capacity_rejected() {
        let mut store = store_with_capacity(2);
        store.add_item(PLAYER, 1).unwrap();
        store.add_item(PLAYER, 2).unwrap();

        assert_eq!(
            store.add_item(PLAYER, 3),
            Err(InventoryError::CapacityExceeded {
                location: PLAYER,
                capacity: 2,
            })
        );
        assert_eq!(store.items(PLAYER).len(), 2);
        assert_eq!(store.find_item(PLAYER, 3), None);
    }

    #[test]
    fn test_existing_code_never_fails_on_capacity() {
        let mut store = store_with_capacity(1);
        for _ in 0..50 {
            store.add_item(PLAYER, 7).unwrap();
        }
        assert_eq!(store.quantity_of(PLAYER, 7), 50);
        assert_eq!(store.items(PLAYER).len(), 1);
    }

    #[test]
    fn test_full_stack_refuses_more_units() {
        let mut store = InventoryStore::default();
        store.add_item(PLAYER, 7).unwrap();
        store.location_mut(PLAYER).items[0].quantity = u32::MAX;

        assert_eq!(
            store.add_item(PLAYER, 7),
            Err(InventoryError::StackFull {
                location: PLAYER,
                item_code: 7,
            })
        );
        assert_eq!(store.quantity_of(PLAYER, 7), u32::MAX);
    }

    #[test]
    fn test_capacity_counts_entries_not_quantity() {
        let mut store = store_with_capacity(2);
        store.add_item(PLAYER, 1).unwrap();
        store.add_item(PLAYER, 1).unwrap();
        store.add_item(PLAYER, 1).unwrap();
        assert!(store.add_item(PLAYER, 2).is_ok());
    }

    #[test]
    fn test_capacity_defaults_come_from_settings() {
        let settings = GameSettings {
            player_inventory_capacity: 3,
            chest_inventory_capacity: 5,
            ..default()
        };
        let store = InventoryStore::with_settings(&settings);
        assert_eq!(store.capacity(PLAYER), 3);
        assert_eq!(store.capacity(CHEST), 5);
    }

    #[test]
    fn test_remove_decrements_then_drops_entry() {
        let mut store = InventoryStore::default();
        store.add_item(PLAYER, 5).unwrap();
        store.add_item(PLAYER, 6).unwrap();
        store.add_item(PLAYER, 5).unwrap();

        store.remove_item(PLAYER, 5).unwrap();
        assert_eq!(store.quantity_of(PLAYER, 5), 1);

        store.remove_item(PLAYER, 5).unwrap();
        assert_eq!(store.find_item(PLAYER, 5), None);
        assert_eq!(store.items(PLAYER), &[InventoryItem { item_code: 6, quantity: 1 }]);
    }

    #[test]
    fn test_remove_missing_item_is_not_found() {
        let mut store = InventoryStore::default();
        assert_eq!(
            store.remove_item(PLAYER, 9),
            Err(InventoryError::NotFound { location: PLAYER, item_code: 9 })
        );
    }

    #[test]
    fn test_swap_items_reorders() {
        let mut store = InventoryStore::default();
        store.add_item(PLAYER, 1).unwrap();
        store.add_item(PLAYER, 2).unwrap();
        store.swap_items(PLAYER, 0, 1).unwrap();
        assert_eq!(store.find_item(PLAYER, 2), Some(0));
        assert_eq!(
            store.swap_items(PLAYER, 0, 4),
            Err(InventoryError::PositionOutOfRange { location: PLAYER, index: 4 })
        );
    }

    #[test]
    fn test_selection_follows_held_items() {
        let mut store = InventoryStore::default();
        assert!(store.set_selected_item(PLAYER, 2002).is_err());

        store.add_item(PLAYER, 2002).unwrap();
        store.set_selected_item(PLAYER, 2002).unwrap();
        assert_eq!(store.selected_item(PLAYER), Some(2002));

        store.remove_item(PLAYER, 2002).unwrap();
        assert_eq!(store.selected_item(PLAYER), None);
    }
}
