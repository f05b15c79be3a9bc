use crate::commands::CmdResult;
use crate::events::Event;
use crate::model::{Breed, Pet, Reward, Species, State};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Pick a species uniformly, then one of its breeds uniformly.
pub fn choose_reward<R: Rng + ?Sized>(rng: &mut R) -> Reward {
    let species = Species::ALL[rng.gen_range(0..Species::ALL.len())];
    Reward::new(species, Some(choose_breed(rng, species)))
}

pub fn choose_breed<R: Rng + ?Sized>(rng: &mut R, species: Species) -> Breed {
    let breeds = species.breeds();
    breeds[rng.gen_range(0..breeds.len())]
}

/// Add a pet to the farm. Always succeeds.
pub fn award(
    state: &mut State,
    reward: Reward,
    now: DateTime<Utc>,
    result: &mut CmdResult,
) -> Pet {
    let pet = Pet::new(reward, now);
    state.pets.push(pet.clone());
    state.stats.record_award(pet.species);
    tracing::info!(species = %pet.species, id = %pet.id, "pet awarded");
    result.push_event(Event::PetAwarded { pet: pet.clone() });
    pet
}

/// Remove one pet chosen uniformly at random. No-op on an empty farm.
pub fn evict<R: Rng + ?Sized>(
    state: &mut State,
    rng: &mut R,
    result: &mut CmdResult,
) -> Option<Pet> {
    if state.pets.is_empty() {
        return None;
    }

    let index = rng.gen_range(0..state.pets.len());
    let pet = state.pets.remove(index);
    state.stats.record_loss(pet.species);
    tracing::info!(species = %pet.species, id = %pet.id, "pet evicted");
    result.push_event(Event::PetLost { pet: pet.clone() });
    Some(pet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rewards_stay_within_species_breeds() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let reward = choose_reward(&mut rng);
            let breed = reward.breed.expect("diary rewards carry a breed");
            assert_eq!(breed.species(), reward.species);
            seen.insert(reward.species);
        }
        assert_eq!(seen.len(), 2, "both species should come up");
    }

    #[test]
    fn award_appends_and_counts() {
        let mut state = State::default();
        let mut result = CmdResult::default();
        let pet = award(
            &mut state,
            Reward::new(Species::Cat, None),
            Utc::now(),
            &mut result,
        );

        assert_eq!(state.pets, vec![pet.clone()]);
        assert_eq!(state.stats.cat_count, 1);
        assert_eq!(result.events, vec![Event::PetAwarded { pet }]);
    }

    #[test]
    fn evict_on_empty_farm_is_noop() {
        let mut state = State::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut result = CmdResult::default();
        assert!(evict(&mut state, &mut rng, &mut result).is_none());
        assert!(result.events.is_empty());
        assert_eq!(state, State::default());
    }

    #[test]
    fn evict_never_underflows_drifted_counter() {
        let mut state = State::default();
        state
            .pets
            .push(Pet::new(Reward::new(Species::Dog, None), Utc::now()));
        let mut rng = StdRng::seed_from_u64(3);
        let mut result = CmdResult::default();

        let lost = evict(&mut state, &mut rng, &mut result).unwrap();
        assert_eq!(lost.species, Species::Dog);
        assert_eq!(state.stats.dog_count, 0);
        assert!(state.pets.is_empty());
        assert_eq!(result.pets_lost(), 1);
    }
}
