//! Bundled fixture data for offline and demo operation.
//!
//! Each file mirrors the live `v2` JSON schema exactly, so fixtures decode
//! through the same models and the same decoder as network responses. The
//! offline set stands in for the network when the offline flag is set; the
//! demo set backs the reserved demo credential.

/// Resources with bundled fixture data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Account,
    Wallet,
    Currencies,
    Characters,
    Worlds,
    Items,
    GuildTreasury,
    WvwMatch,
}

/// Which bundled data set to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureSet {
    Offline,
    Demo,
}

/// Raw fixture JSON for a resource.
pub fn raw(set: FixtureSet, resource: Resource) -> &'static str {
    match set {
        FixtureSet::Offline => match resource {
            Resource::Account => include_str!("offline/account.json"),
            Resource::Wallet => include_str!("offline/wallet.json"),
            Resource::Currencies => include_str!("offline/currencies.json"),
            Resource::Characters => include_str!("offline/characters.json"),
            Resource::Worlds => include_str!("offline/worlds.json"),
            Resource::Items => include_str!("offline/items.json"),
            Resource::GuildTreasury => include_str!("offline/guild_treasury.json"),
            Resource::WvwMatch => include_str!("offline/wvw_match.json"),
        },
        FixtureSet::Demo => match resource {
            Resource::Account => include_str!("demo/account.json"),
            Resource::Wallet => include_str!("demo/wallet.json"),
            Resource::Currencies => include_str!("demo/currencies.json"),
            Resource::Characters => include_str!("demo/characters.json"),
            Resource::Worlds => include_str!("demo/worlds.json"),
            Resource::Items => include_str!("demo/items.json"),
            Resource::GuildTreasury => include_str!("demo/guild_treasury.json"),
            Resource::WvwMatch => include_str!("demo/wvw_match.json"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, Character, Currency, Item, TreasuryItem, WalletEntry, World, WvwMatch};

    /// Every fixture must stay decodable through the live-schema models.
    #[test]
    fn test_all_fixtures_decode() {
        for set in [FixtureSet::Offline, FixtureSet::Demo] {
            serde_json::from_str::<Account>(raw(set, Resource::Account)).expect("account fixture");
            serde_json::from_str::<Vec<WalletEntry>>(raw(set, Resource::Wallet)).expect("wallet fixture");
            serde_json::from_str::<Vec<Currency>>(raw(set, Resource::Currencies)).expect("currencies fixture");
            serde_json::from_str::<Vec<Character>>(raw(set, Resource::Characters)).expect("characters fixture");
            serde_json::from_str::<Vec<World>>(raw(set, Resource::Worlds)).expect("worlds fixture");
            serde_json::from_str::<Vec<Item>>(raw(set, Resource::Items)).expect("items fixture");
            serde_json::from_str::<Vec<TreasuryItem>>(raw(set, Resource::GuildTreasury))
                .expect("treasury fixture");
            serde_json::from_str::<WvwMatch>(raw(set, Resource::WvwMatch)).expect("match fixture");
        }
    }

    #[test]
    fn test_demo_roster_is_distinct_from_offline() {
        assert_ne!(
            raw(FixtureSet::Demo, Resource::Characters),
            raw(FixtureSet::Offline, Resource::Characters)
        );
    }
}
