use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use harvest_vale::shared::*;
use harvest_vale::{data, farming, inventory, player, world};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Harvest Vale".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<GameSettings>()
        .init_resource::<ItemRegistry>()
        .init_resource::<CropRegistry>()
        // Events
        .add_event::<ItemUseRequestEvent>()
        .add_event::<ToolActionEvent>()
        .add_event::<PlantSeedEvent>()
        .add_event::<ItemPickupEvent>()
        .add_event::<AddInventoryItemEvent>()
        .add_event::<RemoveInventoryItemEvent>()
        .add_event::<SpawnWorldItemEvent>()
        .add_event::<InventoryUpdatedEvent>()
        .add_event::<HarvestEffectEvent>()
        .add_event::<CropHarvestedEvent>()
        // Domain plugins
        .add_plugins(player::PlayerPlugin)
        .add_plugins(farming::FarmingPlugin)
        .add_plugins(inventory::InventoryPlugin)
        .add_plugins(world::WorldPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_scale(Vec3::splat(1.0 / PIXELS_PER_UNIT)),
    ));
}
