//! The `/v2/items` catalog record.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemRarity {
    Junk,
    Basic,
    Fine,
    Masterwork,
    Rare,
    Exotic,
    Ascended,
    Legendary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Top-level item category, e.g. "Weapon" or "CraftingMaterial".
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub level: u32,
    pub rarity: ItemRarity,
    /// Merchant sell value in copper coins.
    #[serde(default)]
    pub vendor_value: u64,
    /// Render-service icon locator.
    #[serde(default)]
    pub icon: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        let json = r#"{
            "id": 19721,
            "name": "Glob of Ectoplasm",
            "type": "CraftingMaterial",
            "level": 0,
            "rarity": "Exotic",
            "vendor_value": 128,
            "icon": "https://render.guildwars2.com/file/18CE5D78317265000CF3C23ED76AB3CEE86BA60E/65941.png"
        }"#;

        let item: Item = serde_json::from_str(json).expect("valid item");
        assert_eq!(item.kind, "CraftingMaterial");
        assert!(item.rarity > ItemRarity::Rare);
        assert!(item.description.is_none());
    }
}
