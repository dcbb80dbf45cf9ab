//! The `/v2/wvw/matches` scoreboard record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-team values keyed by match color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WvwSides<T> {
    pub red: T,
    pub blue: T,
    pub green: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WvwMatch {
    /// Match id, e.g. "2-4" (region-tier).
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub scores: WvwSides<u64>,
    /// Main world id on each side.
    pub worlds: WvwSides<u32>,
}

impl WvwMatch {
    /// Color currently holding the highest score.
    pub fn leading_color(&self) -> &'static str {
        let WvwSides { red, blue, green } = self.scores;
        if red >= blue && red >= green {
            "red"
        } else if blue >= green {
            "blue"
        } else {
            "green"
        }
    }

    /// Side color of a world in this match, if it participates.
    pub fn color_of_world(&self, world_id: u32) -> Option<&'static str> {
        if self.worlds.red == world_id {
            Some("red")
        } else if self.worlds.blue == world_id {
            Some("blue")
        } else if self.worlds.green == world_id {
            Some("green")
        } else {
            None
        }
    }
}
