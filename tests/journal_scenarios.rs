use chrono::{DateTime, Duration, TimeZone, Utc};
use petjournal::api::JournalApi;
use petjournal::error::{JournalError, StoreError};
use petjournal::events::Event;
use petjournal::model::{Pet, Reward, Species, State};
use petjournal::rules::Rules;
use petjournal::store::gateway::StateGateway;
use petjournal::store::mem_backend::MemBackend;
use petjournal::store::Record;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::Cell;
use std::rc::Rc;

type Clock = Rc<Cell<DateTime<Utc>>>;

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap() + Duration::days(n)
}

fn open(backend: MemBackend, rules: Rules, seed: u64) -> (JournalApi<MemBackend>, Clock) {
    let clock = Rc::new(Cell::new(day(0)));
    let tick = clock.clone();
    let api = JournalApi::open_with_rng(backend, rules, StdRng::seed_from_u64(seed))
        .with_clock(move || tick.get());
    (api, clock)
}

/// A backend pre-seeded with `pets` and a last entry on day 0.
fn seeded_backend(pets: usize) -> MemBackend {
    let mut state = State::default();
    for i in 0..pets {
        let species = if i % 2 == 0 { Species::Dog } else { Species::Cat };
        state.pets.push(Pet::new(Reward::new(species, None), day(0)));
    }
    state.reconcile();
    state.stats.last_entry_timestamp = Some(day(0));

    let gateway = StateGateway::new(MemBackend::new());
    gateway.save_all(&state).unwrap();
    let seeded = gateway.backend();
    Record::ALL
        .iter()
        .fold(MemBackend::new(), |backend, &record| {
            backend.with_raw(record, seeded.raw(record).unwrap())
        })
}

#[test]
fn first_diary_creates_one_entry_and_one_pet() {
    let (mut api, _) = open(MemBackend::new(), Rules::strict(), 1);

    let result = api.submit_diary("Today was good").unwrap();

    let state = api.state();
    assert_eq!(state.diaries.len(), 1);
    assert_eq!(state.stats.total_diary_count, 1);
    assert_eq!(state.pets.len(), 1);
    assert!(result
        .events
        .iter()
        .any(|e| matches!(e, Event::DiarySaved { .. })));
}

#[test]
fn second_diary_on_same_day_is_rejected_under_strict_rules() {
    let (mut api, clock) = open(MemBackend::new(), Rules::strict(), 2);
    api.submit_diary("A").unwrap();
    clock.set(day(0) + Duration::hours(8));

    let err = api.submit_diary("B").unwrap_err();
    assert!(matches!(err, JournalError::DuplicateEntry(_)));
    assert!(matches!(err.rejection(), Some(Event::DiaryRejected { .. })));
    assert_eq!(api.state().pets.len(), 1);
    assert_eq!(api.state().diaries.len(), 1);
}

#[test]
fn relaxed_rules_accept_many_diaries_a_day() {
    let (mut api, _) = open(MemBackend::new(), Rules::relaxed(), 3);
    api.submit_diary("A").unwrap();
    api.submit_diary("B").unwrap();
    assert_eq!(api.state().diaries.len(), 2);
    assert_eq!(api.state().pets.len(), 2);
}

#[test]
fn seven_missed_days_cost_two_of_four_pets() {
    let (mut api, clock) = open(seeded_backend(4), Rules::strict(), 4);
    clock.set(day(7));

    let result = api.check_missed_days().unwrap();

    assert_eq!(result.pets_lost(), 2);
    assert_eq!(api.state().pets.len(), 2);
    assert!(api.state().is_consistent());
}

#[test]
fn eviction_stops_when_the_farm_is_empty() {
    let (mut api, clock) = open(seeded_backend(1), Rules::strict(), 5);
    clock.set(day(7));

    let result = api.check_missed_days().unwrap();

    assert_eq!(result.pets_lost(), 1);
    assert!(api.state().pets.is_empty());
    assert_eq!(api.state().stats.dog_count, 0);
    assert_eq!(api.state().stats.cat_count, 0);
}

#[test]
fn penalty_is_not_charged_twice_across_restarts() {
    let backend = seeded_backend(4);
    let (mut api, clock) = open(backend, Rules::strict(), 6);
    clock.set(day(7));
    api.check_missed_days().unwrap();
    assert_eq!(api.state().pets.len(), 2);

    // Same gap, fresh process: nothing more is owed.
    api.reload();
    let again = api.check_missed_days().unwrap();
    assert_eq!(again.pets_lost(), 0);
    assert_eq!(api.state().pets.len(), 2);
}

#[test]
fn one_or_two_days_only_warn() {
    let (mut api, clock) = open(seeded_backend(2), Rules::strict(), 7);
    clock.set(day(2));

    let result = api.check_missed_days().unwrap();

    assert_eq!(
        result.events,
        vec![Event::Warning {
            days_since_last_entry: 2
        }]
    );
    assert_eq!(api.state().pets.len(), 2);
    assert!(api.status().show_warning);
}

#[test]
fn completing_a_note_awards_exactly_one_cat() {
    let (mut api, _) = open(MemBackend::new(), Rules::strict(), 8);
    api.add_note("walk the dog").unwrap();
    let id = api.state().notes[0].id;
    let cats_before = api.state().stats.cat_count;

    api.complete_note(id).unwrap();

    assert!(api.state().notes.is_empty());
    assert_eq!(api.state().stats.cat_count, cats_before + 1);
    assert_eq!(api.state().stats.dog_count, 0);
}

#[test]
fn deleting_a_note_twice_is_a_no_op() {
    let (mut api, _) = open(MemBackend::new(), Rules::strict(), 9);
    api.add_note("a").unwrap();
    api.add_note("b").unwrap();
    let id = api.state().notes[0].id;

    let first = api.delete_note(id).unwrap();
    let after_once = api.state().clone();
    let second = api.delete_note(id).unwrap();

    assert_eq!(first.events, vec![Event::NoteDeleted { id }]);
    assert!(second.events.is_empty());
    assert_eq!(*api.state(), after_once);
}

#[test]
fn deleting_a_diary_keeps_its_pet_and_recounts() {
    let (mut api, clock) = open(MemBackend::new(), Rules::strict(), 10);
    api.submit_diary("one").unwrap();
    clock.set(day(1));
    api.submit_diary("two").unwrap();

    let id = api.resolve_diary("1").unwrap();
    api.delete_diary(id).unwrap();

    assert_eq!(api.state().diaries.len(), 1);
    assert_eq!(api.state().diaries[0].content, "one");
    assert_eq!(api.state().stats.total_diary_count, 1);
    assert_eq!(api.state().pets.len(), 2);
}

#[test]
fn counters_match_collections_after_random_operations() {
    let (mut api, clock) = open(MemBackend::new(), Rules::strict(), 11);
    let mut driver = StdRng::seed_from_u64(99);

    for step in 0..300 {
        match driver.gen_range(0..7) {
            0 => {
                let _ = api.submit_diary(&format!("entry {}", step));
            }
            1 => {
                api.add_note(&format!("note {}", step)).unwrap();
            }
            2 => {
                if let Some(note) = api.state().notes.first() {
                    let id = note.id;
                    api.complete_note(id).unwrap();
                }
            }
            3 => {
                if let Some(note) = api.state().notes.last() {
                    let id = note.id;
                    api.delete_note(id).unwrap();
                }
            }
            4 => {
                if let Some(entry) = api.state().diaries.last() {
                    let id = entry.id;
                    api.delete_diary(id).unwrap();
                }
            }
            5 => {
                api.check_missed_days().unwrap();
            }
            _ => clock.set(clock.get() + Duration::hours(driver.gen_range(1..96))),
        }

        let state = api.state();
        assert!(state.is_consistent(), "drift after step {}", step);
        for pet in &state.pets {
            if let Some(breed) = pet.breed {
                assert_eq!(breed.species(), pet.species);
            }
        }
    }

    let stored = api.gateway().load_strict().unwrap();
    assert_eq!(stored, *api.state());
}

#[test]
fn failed_save_reports_persistence_and_keeps_old_state() {
    let (mut api, _) = open(MemBackend::new(), Rules::strict(), 12);
    api.add_note("kept").unwrap();
    let before = api.state().clone();

    api.gateway().backend().set_simulate_write_error(true);
    let err = api.submit_diary("lost").unwrap_err();

    assert!(matches!(
        err,
        JournalError::Persistence(StoreError::Unavailable(_))
    ));
    assert_eq!(*api.state(), before);
}

#[test]
fn save_failing_partway_restores_every_record() {
    let (mut api, _) = open(MemBackend::new(), Rules::strict(), 14);
    api.add_note("kept").unwrap();
    let before = api.state().clone();

    // Pets and notes are written, then the diaries write fails.
    api.gateway().backend().fail_nth_write(3);
    let err = api.submit_diary("lost").unwrap_err();

    assert!(matches!(err, JournalError::Persistence(_)));
    assert_eq!(*api.state(), before);
    assert_eq!(api.gateway().load_strict().unwrap(), before);
}

#[test]
fn damaged_diaries_survive_an_unrelated_write() {
    let damaged = r#"[{"content": "one"}, {"content": "two"}, {"content": "three"}"#;
    let backend = MemBackend::new().with_raw(Record::Diaries, damaged);
    let (mut api, _) = open(backend, Rules::relaxed(), 15);

    let err = api.add_note("unrelated note").unwrap_err();

    assert!(matches!(
        err,
        JournalError::Persistence(StoreError::Corrupt { .. })
    ));
    assert_eq!(
        api.gateway().backend().raw(Record::Diaries).as_deref(),
        Some(damaged)
    );
    assert!(api.state().notes.is_empty());
}

#[test]
fn corrupt_records_fall_back_without_crashing() {
    let backend = MemBackend::new()
        .with_raw(Record::Pets, "[{\"species\": \"dragon\"}]")
        .with_raw(Record::Notes, "not json")
        .with_raw(Record::Stats, "{\"dogCount\": 12}");
    let (api, _) = open(backend, Rules::strict(), 13);

    assert_eq!(api.load_report().fallbacks.len(), 2);
    assert_eq!(*api.state(), State::default());
}
