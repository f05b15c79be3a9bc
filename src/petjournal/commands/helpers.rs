use crate::error::{JournalError, Result};
use crate::model::{DiaryEntry, Note};
use uuid::Uuid;

/// Shortest id prefix accepted as a selector.
pub const MIN_PREFIX_LEN: usize = 4;

/// Anything listed to the user with an id.
pub trait Identified {
    fn id(&self) -> Uuid;
}

impl Identified for Note {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identified for DiaryEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Resolve a user selector against a listing.
///
/// Accepts a 1-based display index, a full uuid, or a unique uuid prefix of
/// at least [`MIN_PREFIX_LEN`] characters. Indexes follow the listing order,
/// which is newest first for notes and diaries.
pub fn resolve<T: Identified>(items: &[T], selector: &str, kind: &str) -> Result<Uuid> {
    let selector = selector.trim();

    // An all-digit selector can also be an id prefix; indexes win when in range.
    if let Ok(index) = selector.parse::<usize>() {
        if let Some(item) = index.checked_sub(1).and_then(|i| items.get(i)) {
            return Ok(item.id());
        }
        if selector.len() < MIN_PREFIX_LEN {
            return Err(JournalError::NotFound(format!("{} #{}", kind, index)));
        }
    }

    if let Ok(id) = Uuid::parse_str(selector) {
        return items
            .iter()
            .map(Identified::id)
            .find(|candidate| *candidate == id)
            .ok_or_else(|| JournalError::NotFound(format!("{} {}", kind, id)));
    }

    if selector.len() < MIN_PREFIX_LEN {
        return Err(JournalError::Validation(format!(
            "'{}' is neither an index nor an id prefix of at least {} characters",
            selector, MIN_PREFIX_LEN
        )));
    }

    let prefix = selector.to_ascii_lowercase();
    let mut matches = items
        .iter()
        .map(Identified::id)
        .filter(|id| id.to_string().starts_with(&prefix));

    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (Some(_), Some(_)) => Err(JournalError::Validation(format!(
            "'{}' matches more than one {}",
            selector, kind
        ))),
        (None, _) => Err(JournalError::NotFound(format!("{} {}", kind, selector))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn notes(n: usize) -> Vec<Note> {
        (0..n)
            .map(|i| Note::new(format!("note {}", i), Utc::now()))
            .collect()
    }

    #[test]
    fn index_is_one_based() {
        let items = notes(3);
        assert_eq!(resolve(&items, "1", "note").unwrap(), items[0].id);
        assert_eq!(resolve(&items, "3", "note").unwrap(), items[2].id);
    }

    #[test]
    fn out_of_range_index_is_not_found() {
        let items = notes(2);
        assert!(matches!(
            resolve(&items, "0", "note"),
            Err(JournalError::NotFound(_))
        ));
        assert!(matches!(
            resolve(&items, "3", "note"),
            Err(JournalError::NotFound(_))
        ));
    }

    #[test]
    fn full_uuid_and_prefix_resolve() {
        let items = notes(2);
        let full = items[1].id.to_string();
        assert_eq!(resolve(&items, &full, "note").unwrap(), items[1].id);
        assert_eq!(resolve(&items, &full[..8], "note").unwrap(), items[1].id);
    }

    #[test]
    fn short_prefix_is_rejected() {
        let items = notes(1);
        let full = items[0].id.to_string();
        assert!(matches!(
            resolve(&items, &format!("{}x", &full[..1]), "note"),
            Err(JournalError::Validation(_))
        ));
    }

    #[test]
    fn unknown_uuid_is_not_found() {
        let items = notes(1);
        let other = Uuid::new_v4().to_string();
        assert!(matches!(
            resolve(&items, &other, "note"),
            Err(JournalError::NotFound(_))
        ));
    }
}
