//! The `/v2/guild/{id}/treasury` record.

use serde::{Deserialize, Serialize};

/// An upgrade still waiting on this treasury item, and how many it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryNeed {
    pub upgrade_id: u64,
    pub count: u64,
}

/// One stack in the guild treasury.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasuryItem {
    pub item_id: u64,
    pub count: u64,
    #[serde(default)]
    pub needed_by: Vec<TreasuryNeed>,
}

impl TreasuryItem {
    /// Total count still required across all pending upgrades.
    pub fn total_needed(&self) -> u64 {
        self.needed_by.iter().map(|n| n.count).sum()
    }

    pub fn is_satisfied(&self) -> bool {
        self.count >= self.total_needed()
    }
}
