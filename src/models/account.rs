//! Account-scoped resources: the account record, wallet and currencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content access an account is entitled to (`access` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Access {
    None,
    PlayForFree,
    GuildWars2,
    HeartOfThorns,
    PathOfFire,
    EndOfDragons,
    SecretsOfTheObscure,
    JanthirWilds,
    /// Expansions released after this build.
    #[serde(other)]
    Unknown,
}

/// The `/v2/account` record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Account age in seconds.
    #[serde(default)]
    pub age: u64,
    pub world: u32,
    #[serde(default)]
    pub guilds: Vec<String>,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub access: Vec<Access>,
    #[serde(default)]
    pub commander: bool,
    #[serde(default)]
    pub fractal_level: u32,
    #[serde(default)]
    pub wvw_rank: u32,
}

impl Account {
    /// Display name without the numeric suffix, e.g. "Zojja" for "Zojja.1234".
    pub fn short_name(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }

    pub fn age_hours(&self) -> u64 {
        self.age / 3600
    }
}

/// One `/v2/account/wallet` entry: a currency id and the amount held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletEntry {
    pub id: u32,
    pub value: u64,
}

/// A `/v2/currencies` record, used to label wallet entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub icon: String,
    pub order: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_account() {
        let json = r#"{
            "id": "8c6b2ef5-3abc-4f30-8c62-023b2da06e77",
            "name": "Firstborn.9283",
            "age": 502200,
            "world": 1007,
            "guilds": ["4BBB52AA-D768-4FC6-8EDE-C299F2822F0F"],
            "created": "2013-06-23T16:20:00Z",
            "access": ["GuildWars2", "HeartOfThorns", "SomeFutureExpansion"],
            "commander": true,
            "fractal_level": 74,
            "wvw_rank": 514
        }"#;

        let account: Account = serde_json::from_str(json).expect("valid account");
        assert_eq!(account.short_name(), "Firstborn");
        assert_eq!(account.world, 1007);
        assert_eq!(account.age_hours(), 139);
        // Unknown expansions fall back instead of failing the whole decode.
        assert_eq!(account.access[2], Access::Unknown);
    }

    #[test]
    fn test_parse_wallet() {
        let json = r#"[{"id": 1, "value": 100001}, {"id": 2, "value": 35}]"#;
        let wallet: Vec<WalletEntry> = serde_json::from_str(json).expect("valid wallet");
        assert_eq!(wallet.len(), 2);
        assert_eq!(wallet[0].value, 100001);
    }
}
