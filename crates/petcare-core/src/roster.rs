//! Client-side views over a fetched pet list: search and summary stats.

use petcare_http::PetResponse;
use serde_json::Number;
use std::collections::BTreeSet;

/// Case-insensitive substring match on name, owner or species.
pub fn filter_pets<'a>(pets: &'a [PetResponse], term: &str) -> Vec<&'a PetResponse> {
    let needle = term.trim().to_lowercase();
    pets.iter()
        .filter(|pet| {
            needle.is_empty()
                || pet.name.to_lowercase().contains(&needle)
                || pet.owner_username.to_lowercase().contains(&needle)
                || pet.species.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Summary shown on the administrative dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopulationStats {
    pub total: usize,
    pub owners: usize,
    pub avg_health: i64,
    pub avg_happiness: i64,
}

impl PopulationStats {
    pub fn from_pets(pets: &[PetResponse]) -> Self {
        if pets.is_empty() {
            return Self::default();
        }
        let owners: BTreeSet<&str> = pets.iter().map(|p| p.owner_username.as_str()).collect();
        Self {
            total: pets.len(),
            owners: owners.len(),
            avg_health: rounded_mean(pets.iter().map(|p| stat_value(&p.health))),
            avg_happiness: rounded_mean(pets.iter().map(|p| stat_value(&p.happiness))),
        }
    }
}

fn rounded_mean(values: impl ExactSizeIterator<Item = f64>) -> i64 {
    let n = values.len();
    if n == 0 {
        return 0;
    }
    let sum: f64 = values.sum();
    (sum / n as f64).round() as i64
}

/// Server stat as a float for display math.
pub fn stat_value(stat: &Number) -> f64 {
    stat.as_f64().unwrap_or(0.0)
}

/// Fill level of a stat bar, clamped to `0..=100`.
pub fn stat_percentage(value: f64, max: f64) -> u8 {
    if max <= 0.0 || value.is_nan() {
        return 0;
    }
    let pct = (value / max) * 100.0;
    pct.clamp(0.0, 100.0).round() as u8
}
