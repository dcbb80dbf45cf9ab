//! The `/v2/worlds` record.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldPopulation {
    Low,
    Medium,
    High,
    VeryHigh,
    Full,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub id: u32,
    pub name: String,
    pub population: WorldPopulation,
}

impl World {
    /// Worlds in the 2xxx id range are the European region.
    pub fn is_european(&self) -> bool {
        (2000..3000).contains(&self.id)
    }
}
