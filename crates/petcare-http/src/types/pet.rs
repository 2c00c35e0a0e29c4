//! Pet payloads. The server owns every value here.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;
use std::fmt;
use std::str::FromStr;

pub type PetId = i64;

/// Pet as returned by the server. Unknown fields are kept and written back out.
///
/// Stats are kept as the server's numbers, integral or not, and re-serialize
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetResponse {
    pub id: PetId,
    pub name: String,
    pub species: String,
    pub hunger: Number,
    pub happiness: Number,
    pub energy: Number,
    pub health: Number,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub owner_username: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRequest {
    pub name: String,
    pub species: String,
}

impl PetRequest {
    pub fn new(name: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
        }
    }
}

/// Care actions. Their effect on stats is computed server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PetAction {
    Feed,
    Play,
    Sleep,
}

impl PetAction {
    pub const ALL: [PetAction; 3] = [PetAction::Feed, PetAction::Play, PetAction::Sleep];

    /// Path segment under `/pets/{id}/`.
    pub fn as_str(self) -> &'static str {
        match self {
            PetAction::Feed => "feed",
            PetAction::Play => "play",
            PetAction::Sleep => "sleep",
        }
    }
}

impl fmt::Display for PetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feed" => Ok(PetAction::Feed),
            "play" => Ok(PetAction::Play),
            // the dashboard labels this one "rest"
            "sleep" | "rest" => Ok(PetAction::Sleep),
            other => Err(format!("unknown pet action: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pet_response_keeps_unknown_fields() {
        let raw = serde_json::json!({
            "id": 7,
            "name": "Rex",
            "species": "dog",
            "hunger": 40,
            "happiness": 80,
            "energy": 55,
            "health": 90,
            "ownerUsername": "alice",
            "createdAt": "2024-01-01"
        });
        let pet: PetResponse = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(pet.owner_username, "alice");
        assert_eq!(pet.extra.get("createdAt").unwrap(), "2024-01-01");
        assert_eq!(serde_json::to_value(&pet).unwrap(), raw);
    }

    #[test]
    fn test_fractional_stats_pass_through() {
        let raw = serde_json::json!({
            "id": 3,
            "name": "Tom",
            "species": "cat",
            "hunger": 10.5,
            "happiness": 80,
            "energy": 0.25,
            "health": 99.9,
            "ownerUsername": "bob"
        });
        let pet: PetResponse = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(pet.hunger.as_f64(), Some(10.5));
        assert_eq!(pet.happiness.as_i64(), Some(80));
        assert_eq!(serde_json::to_value(&pet).unwrap(), raw);
    }

    #[test]
    fn test_missing_or_null_owner_is_empty() {
        let mut raw = serde_json::json!({
            "id": 1, "name": "Rex", "species": "dog",
            "hunger": 0, "happiness": 0, "energy": 0, "health": 0
        });
        let pet: PetResponse = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(pet.owner_username, "");

        raw["ownerUsername"] = serde_json::Value::Null;
        let pet: PetResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(pet.owner_username, "");
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("feed".parse::<PetAction>().unwrap(), PetAction::Feed);
        assert_eq!("rest".parse::<PetAction>().unwrap(), PetAction::Sleep);
        assert!("heal".parse::<PetAction>().is_err());
        assert_eq!(PetAction::Play.to_string(), "play");
    }
}
