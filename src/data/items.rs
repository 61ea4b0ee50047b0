use serde::Deserialize;

use super::DataLoadError;
use crate::shared::*;

#[derive(Deserialize)]
struct ItemList {
    items: Vec<ItemDetails>,
}

/// Build the item-code lookup table from a RON item list.
pub fn parse_items(src: &str) -> Result<ItemRegistry, DataLoadError> {
    let list: ItemList = ron::de::from_str(src)?;
    let mut registry = ItemRegistry::default();
    for details in list.items {
        let code = details.item_code;
        if registry.items.insert(code, details).is_some() {
            return Err(DataLoadError::DuplicateItem(code));
        }
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_ITEMS: &str = r#"(
        items: [
            (item_code: 7, kind: Commodity, description: "Stone", can_be_picked_up: true),
            (item_code: 9, kind: ReapingTool, description: "Scythe"),
        ],
    )"#;

    #[test]
    fn test_get_item_details_returns_configured_record() {
        let registry = parse_items(TWO_ITEMS).unwrap();
        let stone = registry.get_item_details(7).unwrap();
        assert_eq!(stone.description, "Stone");
        assert_eq!(stone.kind, ItemKind::Commodity);
        assert!(stone.can_be_picked_up);
        assert!(!stone.can_be_eaten);
    }

    #[test]
    fn test_get_item_details_unknown_code_is_not_found() {
        let registry = parse_items(TWO_ITEMS).unwrap();
        assert_eq!(
            registry.get_item_details(8),
            Err(RegistryError::ItemNotFound(8))
        );
    }

    #[test]
    fn test_duplicate_item_code_rejected() {
        let src = r#"(items: [
            (item_code: 1, kind: Seed, description: "a"),
            (item_code: 1, kind: Seed, description: "b"),
        ])"#;
        assert!(matches!(
            parse_items(src),
            Err(DataLoadError::DuplicateItem(1))
        ));
    }

    #[test]
    fn test_malformed_table_is_ron_error() {
        assert!(matches!(
            parse_items("(items: [ (item_code: ) ])"),
            Err(DataLoadError::Ron(_))
        ));
    }
}
