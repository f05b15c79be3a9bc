use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
}

const DOG_BREEDS: [Breed; 5] = [
    Breed::Shiba,
    Breed::Corgi,
    Breed::Husky,
    Breed::Golden,
    Breed::Poodle,
];

const CAT_BREEDS: [Breed; 5] = [
    Breed::Tabby,
    Breed::Siamese,
    Breed::Persian,
    Breed::Calico,
    Breed::Tuxedo,
];

impl Species {
    pub const ALL: [Species; 2] = [Species::Dog, Species::Cat];

    pub fn breeds(self) -> &'static [Breed] {
        match self {
            Species::Dog => &DOG_BREEDS,
            Species::Cat => &CAT_BREEDS,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Species::Dog => "🐶",
            Species::Cat => "🐱",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Dog => write!(f, "dog"),
            Species::Cat => write!(f, "cat"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breed {
    Shiba,
    Corgi,
    Husky,
    Golden,
    Poodle,
    Tabby,
    Siamese,
    Persian,
    Calico,
    Tuxedo,
}

impl Breed {
    pub fn species(self) -> Species {
        match self {
            Breed::Shiba | Breed::Corgi | Breed::Husky | Breed::Golden | Breed::Poodle => {
                Species::Dog
            }
            Breed::Tabby | Breed::Siamese | Breed::Persian | Breed::Calico | Breed::Tuxedo => {
                Species::Cat
            }
        }
    }
}

impl fmt::Display for Breed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Breed::Shiba => "shiba",
            Breed::Corgi => "corgi",
            Breed::Husky => "husky",
            Breed::Golden => "golden retriever",
            Breed::Poodle => "poodle",
            Breed::Tabby => "tabby",
            Breed::Siamese => "siamese",
            Breed::Persian => "persian",
            Breed::Calico => "calico",
            Breed::Tuxedo => "tuxedo",
        };
        f.write_str(name)
    }
}

/// What a pet award hands out: a species and, when chosen, one of its breeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub species: Species,
    pub breed: Option<Breed>,
}

impl Reward {
    pub fn new(species: Species, breed: Option<Breed>) -> Self {
        Self { species, breed }
    }
}

impl fmt::Display for Reward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.breed {
            Some(breed) => write!(f, "{} {} {}", self.species.emoji(), breed, self.species),
            None => write!(f, "{} {}", self.species.emoji(), self.species),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Uuid,
    pub species: Species,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<Breed>,
    pub created_at: DateTime<Utc>,
}

impl Pet {
    pub fn new(reward: Reward, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            species: reward.species,
            breed: reward.breed,
            created_at: now,
        }
    }

    pub fn reward(&self) -> Reward {
        Reward::new(self.species, self.breed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(content: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub pet_reward: Species,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_breed: Option<Breed>,
}

impl DiaryEntry {
    pub fn new(content: String, reward: Reward, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            created_at: now,
            pet_reward: reward.species,
            reward_breed: reward.breed,
        }
    }

    pub fn reward(&self) -> Reward {
        Reward::new(self.pet_reward, self.reward_breed)
    }
}

/// Cached counters over the pet and diary collections.
///
/// Never a source of truth: [`Stats::reconcile`] recomputes the counts from
/// the collections and is applied on every load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    pub dog_count: usize,
    pub cat_count: usize,
    pub total_diary_count: usize,
    pub last_entry_timestamp: Option<DateTime<Utc>>,
    /// Evictions already charged against the current gap since the last entry.
    pub penalties_charged: u32,
}

impl Stats {
    pub fn count(&self, species: Species) -> usize {
        match species {
            Species::Dog => self.dog_count,
            Species::Cat => self.cat_count,
        }
    }

    pub fn record_award(&mut self, species: Species) {
        match species {
            Species::Dog => self.dog_count += 1,
            Species::Cat => self.cat_count += 1,
        }
    }

    /// Clamped at zero so a drifted counter never underflows.
    pub fn record_loss(&mut self, species: Species) {
        match species {
            Species::Dog => self.dog_count = self.dog_count.saturating_sub(1),
            Species::Cat => self.cat_count = self.cat_count.saturating_sub(1),
        }
    }

    /// Recompute the counters from the collections. Returns true when any
    /// cached value had drifted.
    pub fn reconcile(&mut self, pets: &[Pet], diaries: &[DiaryEntry]) -> bool {
        let before = self.clone();

        self.dog_count = pets.iter().filter(|p| p.species == Species::Dog).count();
        self.cat_count = pets.iter().filter(|p| p.species == Species::Cat).count();
        self.total_diary_count = diaries.len();
        if self.last_entry_timestamp.is_none() {
            self.last_entry_timestamp = diaries.iter().map(|d| d.created_at).max();
        }

        *self != before
    }
}

/// The whole journal: every record the gateway persists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub pets: Vec<Pet>,
    pub notes: Vec<Note>,
    pub diaries: Vec<DiaryEntry>,
    pub stats: Stats,
}

impl State {
    pub fn reconcile(&mut self) -> bool {
        self.stats.reconcile(&self.pets, &self.diaries)
    }

    /// Whether the cached counters agree with the collections.
    pub fn is_consistent(&self) -> bool {
        self.stats.dog_count + self.stats.cat_count == self.pets.len()
            && self.stats.total_diary_count == self.diaries.len()
    }

    pub fn pets_of(&self, species: Species) -> impl Iterator<Item = &Pet> {
        self.pets.iter().filter(move |p| p.species == species)
    }
}

/// The calendar day `ts` falls on, as seen from `offset`.
pub fn calendar_day(ts: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn breeds_belong_to_their_species() {
        for species in Species::ALL {
            for breed in species.breeds() {
                assert_eq!(breed.species(), species);
            }
        }
    }

    #[test]
    fn record_loss_clamps_at_zero() {
        let mut stats = Stats::default();
        stats.record_loss(Species::Dog);
        stats.record_loss(Species::Cat);
        assert_eq!(stats.dog_count, 0);
        assert_eq!(stats.cat_count, 0);
    }

    #[test]
    fn reconcile_corrects_drifted_counters() {
        let pets = vec![
            Pet::new(Reward::new(Species::Dog, None), at(1)),
            Pet::new(Reward::new(Species::Cat, Some(Breed::Tabby)), at(2)),
            Pet::new(Reward::new(Species::Cat, None), at(3)),
        ];
        let diaries = vec![DiaryEntry::new(
            "hi".into(),
            Reward::new(Species::Dog, None),
            at(4),
        )];
        let mut stats = Stats {
            dog_count: 7,
            cat_count: 0,
            total_diary_count: 12,
            ..Default::default()
        };

        assert!(stats.reconcile(&pets, &diaries));
        assert_eq!(stats.dog_count, 1);
        assert_eq!(stats.cat_count, 2);
        assert_eq!(stats.total_diary_count, 1);
        assert_eq!(stats.last_entry_timestamp, Some(at(4)));

        assert!(!stats.reconcile(&pets, &diaries));
    }

    #[test]
    fn reconcile_keeps_recorded_last_entry() {
        let diaries = vec![DiaryEntry::new(
            "old".into(),
            Reward::new(Species::Cat, None),
            at(1),
        )];
        let mut stats = Stats {
            total_diary_count: 1,
            last_entry_timestamp: Some(at(9)),
            ..Default::default()
        };
        assert!(!stats.reconcile(&[], &diaries));
        assert_eq!(stats.last_entry_timestamp, Some(at(9)));
    }

    #[test]
    fn calendar_day_respects_offset() {
        let late = Utc.with_ymd_and_hms(2026, 3, 1, 23, 30, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            calendar_day(late, utc),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
        assert_eq!(
            calendar_day(late, tokyo),
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
        );
    }

    #[test]
    fn stats_missing_fields_default() {
        let stats: Stats = serde_json::from_str(r#"{"dogCount": 2}"#).unwrap();
        assert_eq!(stats.dog_count, 2);
        assert_eq!(stats.cat_count, 0);
        assert_eq!(stats.penalties_charged, 0);
        assert!(stats.last_entry_timestamp.is_none());
    }

    #[test]
    fn pet_serializes_species_lowercase() {
        let pet = Pet::new(Reward::new(Species::Cat, Some(Breed::Calico)), at(1));
        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(json["species"], "cat");
        assert_eq!(json["breed"], "calico");
        assert!(json.get("createdAt").is_some());
    }
}
