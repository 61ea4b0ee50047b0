//! Shared components, resources, events, and states for Harvest Vale.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

mod inventory;

pub use inventory::InventoryStore;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

/// Pickups cross two domains: the world finds items in reach, the
/// inventory collects them. Collection always sees this frame's touches.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupSet {
    Detect,
    Collect,
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD GEOMETRY
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 1280.0;
pub const SCREEN_HEIGHT: f32 = 720.0;
/// World units per grid cell.
pub const GRID_CELL_SIZE: f32 = 1.0;
/// Half-width of the square a scattered harvest item may land in, in world units.
pub const WORLD_ITEM_SCATTER: f32 = 1.0;
/// Pixels per world unit used by the camera.
pub const PIXELS_PER_UNIT: f32 = 16.0;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Centre of the cell in world space.
    pub fn to_world(self) -> Vec3 {
        Vec3::new(
            (self.x as f32 + 0.5) * GRID_CELL_SIZE,
            (self.y as f32 + 0.5) * GRID_CELL_SIZE,
            0.0,
        )
    }

    pub fn from_world(pos: Vec3) -> Self {
        Self {
            x: (pos.x / GRID_CELL_SIZE).floor() as i32,
            y: (pos.y / GRID_CELL_SIZE).floor() as i32,
        }
    }
}

impl std::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SETTINGS — loaded from data
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub player_inventory_capacity: usize,
    pub chest_inventory_capacity: usize,
    /// Pause between the tool swing starting and the action landing.
    pub tool_wind_up_secs: f32,
    /// Pause after the action lands before another swing may start.
    pub tool_cooldown_secs: f32,
    /// Distance within which the player collects world items.
    pub pickup_radius: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            player_inventory_capacity: 24,
            chest_inventory_capacity: 48,
            tool_wind_up_secs: 0.25,
            tool_cooldown_secs: 0.2,
            pickup_radius: 0.5,
        }
    }
}

impl GameSettings {
    pub fn capacity(&self, location: InventoryLocation) -> usize {
        match location {
            InventoryLocation::Player => self.player_inventory_capacity,
            InventoryLocation::Chest => self.chest_inventory_capacity,
        }
    }

    /// Negative or non-finite values count as no pause at all.
    pub fn tool_wind_up(&self) -> Duration {
        Duration::try_from_secs_f32(self.tool_wind_up_secs).unwrap_or_default()
    }

    pub fn tool_cooldown(&self) -> Duration {
        Duration::try_from_secs_f32(self.tool_cooldown_secs).unwrap_or_default()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ITEMS
// ═══════════════════════════════════════════════════════════════════════

/// Numeric identifier for every item type in the game.
pub type ItemCode = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Seed,
    Commodity,
    WateringTool,
    HoeingTool,
    ChoppingTool,
    BreakingTool,
    ReapingTool,
    CollectingTool,
    ReapableScenery,
    Furniture,
}

impl ItemKind {
    pub fn is_tool(self) -> bool {
        matches!(
            self,
            ItemKind::WateringTool
                | ItemKind::HoeingTool
                | ItemKind::ChoppingTool
                | ItemKind::BreakingTool
                | ItemKind::ReapingTool
                | ItemKind::CollectingTool
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub item_code: ItemCode,
    pub kind: ItemKind,
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub sprite_index: u32,
    #[serde(default)]
    pub use_grid_radius: u8,
    #[serde(default)]
    pub use_radius: f32,
    #[serde(default)]
    pub is_starting_item: bool,
    #[serde(default)]
    pub can_be_picked_up: bool,
    #[serde(default)]
    pub can_be_dropped: bool,
    #[serde(default)]
    pub can_be_eaten: bool,
    #[serde(default)]
    pub can_be_carried: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no item details for item code {0}")]
    ItemNotFound(ItemCode),
}

// ═══════════════════════════════════════════════════════════════════════
// ITEM REGISTRY — loaded from data
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Default)]
pub struct ItemRegistry {
    pub items: HashMap<ItemCode, ItemDetails>,
}

impl ItemRegistry {
    pub fn get(&self, code: ItemCode) -> Option<&ItemDetails> {
        self.items.get(&code)
    }

    /// Resolve an item code to its configured details.
    ///
    /// An unknown code means the item cannot be resolved; callers are
    /// expected to ignore it rather than treat it as fatal.
    pub fn get_item_details(&self, code: ItemCode) -> Result<&ItemDetails, RegistryError> {
        self.get(code).ok_or(RegistryError::ItemNotFound(code))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INVENTORY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryLocation {
    Player,
    Chest,
}

impl InventoryLocation {
    pub const ALL: [InventoryLocation; 2] = [InventoryLocation::Player, InventoryLocation::Chest];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_code: ItemCode,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("{location:?} inventory is full ({capacity} entries)")]
    CapacityExceeded {
        location: InventoryLocation,
        capacity: usize,
    },
    #[error("stack of item {item_code} in {location:?} inventory is at its limit")]
    StackFull {
        location: InventoryLocation,
        item_code: ItemCode,
    },
    #[error("item {item_code} not found in {location:?} inventory")]
    NotFound {
        location: InventoryLocation,
        item_code: ItemCode,
    },
    #[error("no {location:?} inventory position {index}")]
    PositionOutOfRange {
        location: InventoryLocation,
        index: usize,
    },
}

// ═══════════════════════════════════════════════════════════════════════
// FARMING
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarvestEffectKind {
    Reaping,
    Chopping,
    Breaking,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducedItem {
    pub item_code: ItemCode,
    pub min_quantity: u32,
    pub max_quantity: u32,
    /// Overrides the crop's `spawn_at_actor` for this entry.
    #[serde(default)]
    pub spawn_at_actor: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropDefinition {
    pub seed_item_code: ItemCode,
    /// Tool item code → actions required before harvest.
    /// Tools missing from this table cannot harvest the crop.
    pub harvest_tools: HashMap<ItemCode, u32>,
    pub produced_items: Vec<ProducedItem>,
    /// Default delivery for produced items that don't set their own:
    /// straight to the acting player, or dropped around the crop.
    #[serde(default)]
    pub spawn_at_actor: bool,
    #[serde(default)]
    pub harvest_effect: Option<HarvestEffectKind>,
}

impl CropDefinition {
    pub fn required_harvest_actions(&self, tool: ItemCode) -> Option<u32> {
        self.harvest_tools.get(&tool).copied()
    }

    pub fn spawns_at_actor(&self, produced: &ProducedItem) -> bool {
        produced.spawn_at_actor.unwrap_or(self.spawn_at_actor)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct CropRegistry {
    /// Keyed by seed item code.
    pub crops: HashMap<ItemCode, CropDefinition>,
}

impl CropRegistry {
    pub fn get(&self, seed: ItemCode) -> Option<&CropDefinition> {
        self.crops.get(&seed)
    }
}

/// Progress record for a planted crop. Lives in `FarmState` keyed by cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropInstance {
    pub position: GridPosition,
    pub seed_item_code: ItemCode,
    pub harvest_action_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestYield {
    pub item_code: ItemCode,
    pub quantity: u32,
    pub spawn_at_actor: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestOutcome {
    Progress { current: u32, required: u32 },
    Harvested { yields: Vec<HarvestYield> },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarvestError {
    #[error("no crop at {0}")]
    NotFound(GridPosition),
    #[error("crop at {position} has no usable definition for seed {seed}")]
    InvalidState {
        position: GridPosition,
        seed: ItemCode,
    },
    #[error("tool {tool} cannot harvest seed {seed}")]
    WrongTool { tool: ItemCode, seed: ItemCode },
    #[error("cell {0} already holds a crop")]
    CellOccupied(GridPosition),
}

// ═══════════════════════════════════════════════════════════════════════
// GRID
// ═══════════════════════════════════════════════════════════════════════

/// Per-cell record owned by the world grid. `None` fields mean "unset".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellState {
    pub seed_item_code: Option<ItemCode>,
    pub growth_days: Option<u32>,
    pub days_since_dug: Option<u32>,
    pub days_since_watered: Option<u32>,
    pub days_since_last_harvest: Option<u32>,
}

impl CellState {
    pub fn dug() -> Self {
        Self {
            days_since_dug: Some(0),
            ..default()
        }
    }

    pub fn has_crop(&self) -> bool {
        self.seed_item_code.is_some()
    }

    /// Forget the crop but keep the soil.
    pub fn clear_crop(&mut self) {
        self.seed_item_code = None;
        self.growth_days = None;
        self.days_since_watered = None;
        self.days_since_last_harvest = None;
    }
}

/// Per-cell properties of the farm grid. A missing cell has never been
/// touched (not dug, nothing planted).
#[derive(Resource, Debug, Clone, Default)]
pub struct GridProperties {
    cells: HashMap<(i32, i32), CellState>,
}

impl GridProperties {
    pub fn get_cell_state(&self, x: i32, y: i32) -> Option<&CellState> {
        self.cells.get(&(x, y))
    }

    pub fn set_cell_state(&mut self, x: i32, y: i32, state: CellState) {
        self.cells.insert((x, y), state);
    }

    /// Forget everything about the cell.
    pub fn clear_cell(&mut self, x: i32, y: i32) -> Option<CellState> {
        self.cells.remove(&(x, y))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone, Default)]
pub struct Player;

/// Whether the player currently accepts input. Disabling input aborts any
/// tool action still winding up.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInputState {
    pub disabled: bool,
}

impl PlayerInputState {
    pub fn disable(&mut self) {
        self.disabled = true;
    }

    pub fn enable(&mut self) {
        self.disabled = false;
    }
}

/// An item lying on the ground, waiting to be picked up.
#[derive(Component, Debug, Clone, Copy)]
pub struct WorldItem {
    pub item_code: ItemCode,
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// The player asked to use an item on a cell. Tools go through the
/// wind-up gate, seeds are planted straight away.
#[derive(Event, Debug, Clone)]
pub struct ItemUseRequestEvent {
    pub item_code: ItemCode,
    pub target: GridPosition,
}

/// A tool action lands on a cell after its wind-up.
#[derive(Event, Debug, Clone)]
pub struct ToolActionEvent {
    pub tool: ItemCode,
    pub target: GridPosition,
}

#[derive(Event, Debug, Clone)]
pub struct PlantSeedEvent {
    pub seed: ItemCode,
    pub target: GridPosition,
}

/// A world item was touched by the player.
#[derive(Event, Debug, Clone)]
pub struct ItemPickupEvent {
    pub item_code: ItemCode,
    pub entity: Entity,
}

/// Put one unit of an item into a location's inventory.
#[derive(Event, Debug, Clone)]
pub struct AddInventoryItemEvent {
    pub location: InventoryLocation,
    pub item_code: ItemCode,
}

/// Take one unit of an item out of a location's inventory.
#[derive(Event, Debug, Clone)]
pub struct RemoveInventoryItemEvent {
    pub location: InventoryLocation,
    pub item_code: ItemCode,
}

#[derive(Event, Debug, Clone)]
pub struct SpawnWorldItemEvent {
    pub item_code: ItemCode,
    pub position: Vec3,
}

#[derive(Event, Debug, Clone)]
pub struct InventoryUpdatedEvent {
    pub location: InventoryLocation,
    pub items: Vec<InventoryItem>,
}

#[derive(Event, Debug, Clone)]
pub struct HarvestEffectEvent {
    pub position: Vec3,
    pub effect: HarvestEffectKind,
}

#[derive(Event, Debug, Clone)]
pub struct CropHarvestedEvent {
    pub seed_item_code: ItemCode,
    pub position: GridPosition,
    pub yields: Vec<HarvestYield>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_round_trip_and_clear() {
        let mut grid = GridProperties::default();
        assert!(grid.get_cell_state(1, 2).is_none());

        grid.set_cell_state(1, 2, CellState::dug());
        assert_eq!(grid.get_cell_state(1, 2), Some(&CellState::dug()));

        assert!(grid.clear_cell(1, 2).is_some());
        assert!(grid.get_cell_state(1, 2).is_none());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_clear_crop_keeps_soil() {
        let mut cell = CellState {
            seed_item_code: Some(1001),
            growth_days: Some(4),
            days_since_dug: Some(6),
            days_since_watered: Some(0),
            days_since_last_harvest: None,
        };
        cell.clear_crop();
        assert!(!cell.has_crop());
        assert_eq!(cell.days_since_dug, Some(6));
        assert_eq!(cell.growth_days, None);
    }
}
