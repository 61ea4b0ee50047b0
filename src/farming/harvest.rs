//! Harvest progression — tool actions count up towards a crop's threshold.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;
use super::FarmState;

// ─────────────────────────────────────────────────────────────────────────────
// Core bookkeeping
// ─────────────────────────────────────────────────────────────────────────────

/// Apply one action of `tool` to the crop planted at `position`.
///
/// Only tools listed in the crop's tool table move it forward; any other tool
/// is rejected with `WrongTool` and leaves the action count untouched. When the
/// count reaches the tool's threshold the crop is removed, the cell forgets its
/// seed and the rolled yields are returned for delivery.
pub fn process_tool_action<R: Rng + ?Sized>(
    position: GridPosition,
    tool: ItemCode,
    farm_state: &mut FarmState,
    grid: &mut GridProperties,
    item_registry: &ItemRegistry,
    crop_registry: &CropRegistry,
    rng: &mut R,
) -> Result<HarvestOutcome, HarvestError> {
    let key = (position.x, position.y);
    if !farm_state.crops.contains_key(&key) {
        return Err(HarvestError::NotFound(position));
    }

    let Some(mut cell) = grid.get_cell_state(position.x, position.y).cloned() else {
        return Err(HarvestError::NotFound(position));
    };
    let Some(seed) = cell.seed_item_code else {
        return Err(HarvestError::NotFound(position));
    };

    let invalid = HarvestError::InvalidState { position, seed };
    if item_registry.get_item_details(seed).is_err() {
        return Err(invalid);
    }
    let Some(def) = crop_registry.get(seed) else {
        return Err(invalid);
    };

    let required = def
        .required_harvest_actions(tool)
        .ok_or(HarvestError::WrongTool { tool, seed })?;

    let Some(crop) = farm_state.crops.get_mut(&key) else {
        return Err(HarvestError::NotFound(position));
    };
    crop.harvest_action_count += 1;
    let current = crop.harvest_action_count;

    if current < required {
        return Ok(HarvestOutcome::Progress { current, required });
    }

    farm_state.crops.remove(&key);
    cell.clear_crop();
    grid.set_cell_state(position.x, position.y, cell);

    Ok(HarvestOutcome::Harvested {
        yields: roll_yields(def, rng),
    })
}

/// How many units one produced-item entry gives. A range collapsed to a
/// single value, or an inverted one, always gives `min`.
pub fn roll_yield_quantity<R: Rng + ?Sized>(min: u32, max: u32, rng: &mut R) -> u32 {
    if min == max || max < min {
        min
    } else {
        rng.gen_range(min..=max)
    }
}

pub fn roll_yields<R: Rng + ?Sized>(def: &CropDefinition, rng: &mut R) -> Vec<HarvestYield> {
    def.produced_items
        .iter()
        .map(|p| HarvestYield {
            item_code: p.item_code,
            quantity: roll_yield_quantity(p.min_quantity, p.max_quantity, rng),
            spawn_at_actor: def.spawns_at_actor(p),
        })
        .filter(|y| y.quantity > 0)
        .collect()
}

/// Somewhere within `WORLD_ITEM_SCATTER` of `origin` on both axes.
pub fn scatter_position<R: Rng + ?Sized>(origin: Vec3, rng: &mut R) -> Vec3 {
    origin
        + Vec3::new(
            rng.gen_range(-WORLD_ITEM_SCATTER..WORLD_ITEM_SCATTER),
            rng.gen_range(-WORLD_ITEM_SCATTER..WORLD_ITEM_SCATTER),
            0.0,
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// System
// ─────────────────────────────────────────────────────────────────────────────

/// Feed landed tool actions into the crop bookkeeping and hand out the
/// produce: actor-bound units go to the player's inventory one at a time,
/// the rest are dropped around the crop.
pub fn handle_tool_actions(
    mut tool_events: EventReader<ToolActionEvent>,
    mut farm_state: ResMut<FarmState>,
    mut grid: ResMut<GridProperties>,
    item_registry: Res<ItemRegistry>,
    crop_registry: Res<CropRegistry>,
    mut add_item_events: EventWriter<AddInventoryItemEvent>,
    mut spawn_events: EventWriter<SpawnWorldItemEvent>,
    mut effect_events: EventWriter<HarvestEffectEvent>,
    mut harvested_events: EventWriter<CropHarvestedEvent>,
) {
    let mut rng = rand::thread_rng();

    for ev in tool_events.read() {
        let seed = farm_state
            .crops
            .get(&(ev.target.x, ev.target.y))
            .map(|c| c.seed_item_code);

        let outcome = match process_tool_action(
            ev.target,
            ev.tool,
            &mut farm_state,
            &mut grid,
            &item_registry,
            &crop_registry,
            &mut rng,
        ) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!("[Farming] tool {} ignored: {}", ev.tool, e);
                continue;
            }
        };

        let origin = ev.target.to_world();
        let effect = seed
            .and_then(|s| crop_registry.get(s))
            .and_then(|def| def.harvest_effect);
        if let Some(effect) = effect {
            effect_events.send(HarvestEffectEvent {
                position: origin,
                effect,
            });
        }

        match outcome {
            HarvestOutcome::Progress { current, required } => {
                debug!(
                    "[Farming] crop at {}: {}/{} harvest actions",
                    ev.target, current, required
                );
            }
            HarvestOutcome::Harvested { yields } => {
                for y in &yields {
                    for _ in 0..y.quantity {
                        if y.spawn_at_actor {
                            add_item_events.send(AddInventoryItemEvent {
                                location: InventoryLocation::Player,
                                item_code: y.item_code,
                            });
                        } else {
                            spawn_events.send(SpawnWorldItemEvent {
                                item_code: y.item_code,
                                position: scatter_position(origin, &mut rng),
                            });
                        }
                    }
                }

                info!("[Farming] harvested crop at {}: {:?}", ev.target, yields);
                if let Some(seed_item_code) = seed {
                    harvested_events.send(CropHarvestedEvent {
                        seed_item_code,
                        position: ev.target,
                        yields,
                    });
                }
            }
        }
    }
}
