//! Soil digging and watering.

use bevy::prelude::*;
use crate::shared::*;

fn tool_kind(item_registry: &ItemRegistry, tool: ItemCode) -> Option<ItemKind> {
    item_registry.get(tool).map(|d| d.kind)
}

/// Hoe — dig a cell nobody has touched yet.
pub fn handle_hoe_tool_use(
    mut tool_events: EventReader<ToolActionEvent>,
    item_registry: Res<ItemRegistry>,
    mut grid: ResMut<GridProperties>,
) {
    for ev in tool_events.read() {
        if tool_kind(&item_registry, ev.tool) != Some(ItemKind::HoeingTool) {
            continue;
        }

        let (x, y) = (ev.target.x, ev.target.y);
        match grid.get_cell_state(x, y).cloned() {
            Some(cell) if cell.days_since_dug.is_some() => continue,
            Some(mut cell) => {
                cell.days_since_dug = Some(0);
                grid.set_cell_state(x, y, cell);
            }
            None => grid.set_cell_state(x, y, CellState::dug()),
        }
        debug!("[Farming] dug {}", ev.target);
    }
}

/// Watering can — only dug soil holds water.
pub fn handle_watering_can_tool_use(
    mut tool_events: EventReader<ToolActionEvent>,
    item_registry: Res<ItemRegistry>,
    mut grid: ResMut<GridProperties>,
) {
    for ev in tool_events.read() {
        if tool_kind(&item_registry, ev.tool) != Some(ItemKind::WateringTool) {
            continue;
        }

        let (x, y) = (ev.target.x, ev.target.y);
        let Some(cell) = grid.get_cell_state(x, y) else {
            continue;
        };
        if cell.days_since_dug.is_none() {
            continue;
        }
        let mut cell = cell.clone();
        cell.days_since_watered = Some(0);
        grid.set_cell_state(x, y, cell);
    }
}
