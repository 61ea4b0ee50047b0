//! World domain — the farm grid and items lying on the ground.

use bevy::prelude::*;
use crate::shared::*;

pub mod items;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GridProperties>()
            .configure_sets(Update, (PickupSet::Detect, PickupSet::Collect).chain())
            .add_systems(
                Update,
                (
                    items::spawn_world_items,
                    items::detect_item_pickups.in_set(PickupSet::Detect),
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
