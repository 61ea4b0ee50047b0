mod tools;

pub use tools::{advance_tool_gate, handle_item_use_requests, ToolActionGate, ToolPhase};

use bevy::prelude::*;
use crate::shared::*;

/// World units per second.
const WALK_SPEED: f32 = 4.0;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        // -- Local resources --
        app.init_resource::<ToolActionGate>();
        app.init_resource::<PlayerInputState>();

        // -- Spawn player when we enter Playing --
        app.add_systems(OnEnter(GameState::Playing), spawn_player);

        // -- Systems that run every frame while Playing --
        app.add_systems(
            Update,
            (
                player_movement,
                cycle_selected_item,
                use_selected_item,
                // Requests first so a swing started this frame is ticked too.
                (handle_item_use_requests, advance_tool_gate).chain(),
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}

fn spawn_player(mut commands: Commands) {
    commands.spawn((Player, Transform::from_translation(GridPosition::new(0, 0).to_world())));
}

fn player_movement(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    input: Res<PlayerInputState>,
    mut query: Query<&mut Transform, With<Player>>,
) {
    if input.disabled {
        return;
    }
    let mut dir = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        dir.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        dir.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        dir.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        dir.x += 1.0;
    }
    if dir == Vec2::ZERO {
        return;
    }
    let step = dir.normalize() * WALK_SPEED * time.delta_secs();
    for mut transform in &mut query {
        transform.translation += step.extend(0.0);
    }
}

/// Step the selection through the player's inventory (E forward, Q back).
fn cycle_selected_item(
    keyboard: Res<ButtonInput<KeyCode>>,
    input: Res<PlayerInputState>,
    mut store: ResMut<InventoryStore>,
) {
    if input.disabled {
        return;
    }
    let forward = keyboard.just_pressed(KeyCode::KeyE);
    let back = keyboard.just_pressed(KeyCode::KeyQ);
    if !forward && !back {
        return;
    }

    let location = InventoryLocation::Player;
    let len = store.items(location).len();
    if len == 0 {
        return;
    }
    let current = store
        .selected_item(location)
        .and_then(|code| store.find_item(location, code));
    let next = match (current, forward) {
        (None, _) => 0,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    };
    let code = store.items(location)[next].item_code;
    let _ = store.set_selected_item(location, code);
}

/// Space uses the selected item on the cell the player stands on.
fn use_selected_item(
    keyboard: Res<ButtonInput<KeyCode>>,
    input: Res<PlayerInputState>,
    store: Res<InventoryStore>,
    query: Query<&Transform, With<Player>>,
    mut requests: EventWriter<ItemUseRequestEvent>,
) {
    if input.disabled || !keyboard.just_pressed(KeyCode::Space) {
        return;
    }
    let Some(item_code) = store.selected_item(InventoryLocation::Player) else {
        return;
    };
    let Ok(transform) = query.get_single() else {
        return;
    };
    requests.send(ItemUseRequestEvent {
        item_code,
        target: GridPosition::from_world(transform.translation),
    });
}
