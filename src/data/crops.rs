use serde::Deserialize;

use super::DataLoadError;
use crate::shared::*;

#[derive(Deserialize)]
struct CropList {
    crops: Vec<CropDefinition>,
}

/// Build the seed-code → crop definition table from a RON crop list.
pub fn parse_crops(src: &str) -> Result<CropRegistry, DataLoadError> {
    let list: CropList = ron::de::from_str(src)?;
    let mut registry = CropRegistry::default();
    for def in list.crops {
        let seed = def.seed_item_code;
        if registry.crops.insert(seed, def).is_some() {
            return Err(DataLoadError::DuplicateCrop(seed));
        }
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_table_and_defaults() {
        let src = r#"(crops: [
            (
                seed_item_code: 1001,
                harvest_tools: { 2002: 3 },
                produced_items: [ (item_code: 3003, min_quantity: 2, max_quantity: 2) ],
            ),
        ])"#;
        let registry = parse_crops(src).unwrap();
        let def = registry.get(1001).unwrap();
        assert_eq!(def.required_harvest_actions(2002), Some(3));
        assert_eq!(def.required_harvest_actions(2003), None);
        assert_eq!(def.harvest_effect, None);
        assert!(!def.spawn_at_actor);
        assert_eq!(def.produced_items[0].spawn_at_actor, None);
        assert!(!def.spawns_at_actor(&def.produced_items[0]));
    }

    #[test]
    fn test_produced_items_inherit_crop_delivery() {
        let src = r#"(crops: [
            (
                seed_item_code: 1002,
                harvest_tools: { 2002: 1 },
                produced_items: [
                    (item_code: 3004, min_quantity: 1, max_quantity: 3),
                    (item_code: 1002, min_quantity: 0, max_quantity: 1, spawn_at_actor: Some(false)),
                ],
                spawn_at_actor: true,
            ),
        ])"#;
        let registry = parse_crops(src).unwrap();
        let def = registry.get(1002).unwrap();
        assert!(def.spawns_at_actor(&def.produced_items[0]));
        assert!(!def.spawns_at_actor(&def.produced_items[1]));
    }

    #[test]
    fn test_duplicate_seed_rejected() {
        let src = r#"(crops: [
            (seed_item_code: 5, harvest_tools: {}, produced_items: []),
            (seed_item_code: 5, harvest_tools: {}, produced_items: []),
        ])"#;
        assert!(matches!(
            parse_crops(src),
            Err(DataLoadError::DuplicateCrop(5))
        ));
    }
}
