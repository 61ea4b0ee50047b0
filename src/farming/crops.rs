//! Crop planting.

use bevy::prelude::*;
use crate::shared::*;
use super::FarmState;

/// Put `seed` into the dug cell at `position` and start tracking it.
pub fn plant_seed(
    position: GridPosition,
    seed: ItemCode,
    farm_state: &mut FarmState,
    grid: &mut GridProperties,
    crop_registry: &CropRegistry,
) -> Result<(), HarvestError> {
    let Some(cell) = grid.get_cell_state(position.x, position.y) else {
        return Err(HarvestError::NotFound(position));
    };
    if cell.days_since_dug.is_none() {
        return Err(HarvestError::NotFound(position));
    }
    if cell.has_crop() || farm_state.crops.contains_key(&(position.x, position.y)) {
        return Err(HarvestError::CellOccupied(position));
    }
    if crop_registry.get(seed).is_none() {
        return Err(HarvestError::InvalidState { position, seed });
    }

    let mut cell = cell.clone();
    cell.seed_item_code = Some(seed);
    cell.growth_days = Some(0);
    grid.set_cell_state(position.x, position.y, cell);

    farm_state.crops.insert(
        (position.x, position.y),
        CropInstance {
            position,
            seed_item_code: seed,
            harvest_action_count: 0,
        },
    );
    Ok(())
}

/// Plant requested seeds and take one from the player's bag for each.
pub fn handle_plant_seed(
    mut plant_events: EventReader<PlantSeedEvent>,
    mut farm_state: ResMut<FarmState>,
    mut grid: ResMut<GridProperties>,
    crop_registry: Res<CropRegistry>,
    mut remove_events: EventWriter<RemoveInventoryItemEvent>,
) {
    for ev in plant_events.read() {
        match plant_seed(ev.target, ev.seed, &mut farm_state, &mut grid, &crop_registry) {
            Ok(()) => {
                debug!("[Farming] planted seed {} at {}", ev.seed, ev.target);
                remove_events.send(RemoveInventoryItemEvent {
                    location: InventoryLocation::Player,
                    item_code: ev.seed,
                });
            }
            Err(e) => debug!("[Farming] cannot plant: {}", e),
        }
    }
}
