//! Farming domain — soil digging, watering, planting, harvest progression.
//!
//! Communicates with other domains exclusively through crate::shared events/resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::shared::*;

pub mod crops;
pub mod harvest;
pub mod soil;

pub use crops::plant_seed;
pub use harvest::{process_tool_action, roll_yield_quantity};

/// Planted crops keyed by grid cell. The matching `CellState` in
/// `GridProperties` carries the seed; this carries harvest progress.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FarmState {
    pub crops: HashMap<(i32, i32), CropInstance>,
}

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FarmState>().add_systems(
            Update,
            (
                // Soil first so a dig and a plant on the same frame both land.
                soil::handle_hoe_tool_use,
                soil::handle_watering_can_tool_use,
                crops::handle_plant_seed,
                harvest::handle_tool_actions,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}
