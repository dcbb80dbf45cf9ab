//! The `/v2/characters` roster record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub race: String,
    pub gender: String,
    pub profession: String,
    pub level: u32,
    /// Guild the character represents, when any.
    #[serde(default)]
    pub guild: Option<String>,
    /// Played time in seconds.
    #[serde(default)]
    pub age: u64,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub deaths: u32,
}

impl Character {
    pub fn played_hours(&self) -> u64 {
        self.age / 3600
    }

    /// One-line roster label, e.g. "Rox Whetstone (80 Charr Ranger)".
    pub fn summary(&self) -> String {
        format!(
            "{} ({} {} {})",
            self.name, self.level, self.race, self.profession
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_character() {
        let json = r#"{
            "name": "Rox Whetstone",
            "race": "Charr",
            "gender": "Female",
            "profession": "Ranger",
            "level": 80,
            "guild": "116E2AF3-0C46-4D35-AA24-6B0447282E24",
            "age": 1259712,
            "created": "2014-03-15T18:10:00Z",
            "deaths": 371
        }"#;

        let character: Character = serde_json::from_str(json).expect("valid character");
        assert_eq!(character.played_hours(), 349);
        assert_eq!(character.summary(), "Rox Whetstone (80 Charr Ranger)");
    }
}
