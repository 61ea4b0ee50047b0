//! Data layer — populates all registries at game startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills ItemRegistry,
//! CropRegistry and GameSettings from the RON tables under `assets/data/`,
//! then transitions the game into GameState::Playing.
//!
//! The tables are embedded at compile time so headless runs need no asset
//! server. No other domain needs to seed these resources.

mod crops;
mod items;

pub use crops::parse_crops;
pub use items::parse_items;

use bevy::prelude::*;
use thiserror::Error;

use crate::shared::*;

const ITEMS_RON: &str = include_str!("../../assets/data/items.ron");
const CROPS_RON: &str = include_str!("../../assets/data/crops.ron");
const SETTINGS_RON: &str = include_str!("../../assets/data/settings.ron");

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("could not parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("item code {0} is defined more than once")]
    DuplicateItem(ItemCode),
    #[error("crop for seed {0} is defined more than once")]
    DuplicateCrop(ItemCode),
    #[error("setting {name} must be a finite, non-negative number (got {value})")]
    InvalidSetting { name: &'static str, value: f32 },
}

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

pub fn parse_settings(src: &str) -> Result<GameSettings, DataLoadError> {
    let settings: GameSettings = ron::de::from_str(src)?;
    for (name, value) in [
        ("tool_wind_up_secs", settings.tool_wind_up_secs),
        ("tool_cooldown_secs", settings.tool_cooldown_secs),
        ("pickup_radius", settings.pickup_radius),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(DataLoadError::InvalidSetting { name, value });
        }
    }
    Ok(settings)
}

/// Single system that populates every registry and then transitions to Playing.
///
/// A table that fails to parse is logged and left at its default; the game
/// still starts so the failure is visible rather than a hang on Loading.
fn load_all_data(
    mut item_registry: ResMut<ItemRegistry>,
    mut crop_registry: ResMut<CropRegistry>,
    mut settings: ResMut<GameSettings>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("[Data] populating registries…");

    match parse_items(ITEMS_RON) {
        Ok(registry) => *item_registry = registry,
        Err(e) => error!("[Data] items.ron: {}", e),
    }
    info!("[Data]   Items loaded: {}", item_registry.items.len());

    match parse_crops(CROPS_RON) {
        Ok(registry) => *crop_registry = registry,
        Err(e) => error!("[Data] crops.ron: {}", e),
    }
    info!("[Data]   Crops loaded: {}", crop_registry.crops.len());

    match parse_settings(SETTINGS_RON) {
        Ok(loaded) => *settings = loaded,
        Err(e) => error!("[Data] settings.ron: {}", e),
    }

    for crop in crop_registry.crops.values() {
        if item_registry.get(crop.seed_item_code).is_none() {
            warn!(
                "[Data] crop seed {} has no item details and cannot be harvested",
                crop.seed_item_code
            );
        }
    }

    info!("[Data] all registries populated. Transitioning to Playing.");
    next_state.set(GameState::Playing);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_tables_parse() {
        let items = parse_items(ITEMS_RON).expect("items.ron");
        let crops = parse_crops(CROPS_RON).expect("crops.ron");
        parse_settings(SETTINGS_RON).expect("settings.ron");

        assert!(!items.items.is_empty());
        for crop in crops.crops.values() {
            let seed = items
                .get_item_details(crop.seed_item_code)
                .expect("every crop seed has item details");
            assert_eq!(seed.kind, ItemKind::Seed);
            for produced in &crop.produced_items {
                assert!(items.get(produced.item_code).is_some());
            }
            for tool in crop.harvest_tools.keys() {
                assert!(items.get(*tool).is_some_and(|d| d.kind.is_tool()));
            }
        }
    }

    #[test]
    fn test_settings_match_defaults() {
        let settings = parse_settings(SETTINGS_RON).unwrap();
        assert_eq!(settings, GameSettings::default());
    }

    #[test]
    fn test_negative_timing_rejected() {
        let src = r#"(
            player_inventory_capacity: 24,
            chest_inventory_capacity: 48,
            tool_wind_up_secs: -0.25,
            tool_cooldown_secs: 0.2,
            pickup_radius: 0.5,
        )"#;
        assert!(matches!(
            parse_settings(src),
            Err(DataLoadError::InvalidSetting { name: "tool_wind_up_secs", .. })
        ));
    }

    #[test]
    fn test_bad_timing_never_panics_at_use() {
        let settings = GameSettings {
            tool_wind_up_secs: f32::NAN,
            tool_cooldown_secs: -1.0,
            ..default()
        };
        assert_eq!(settings.tool_wind_up(), std::time::Duration::ZERO);
        assert_eq!(settings.tool_cooldown(), std::time::Duration::ZERO);
    }
}
