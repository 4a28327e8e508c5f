use crate::logging;
use crate::models::Bookmark;
use crate::state::{ReadingStore, now_timestamp};

/// In-memory mirror of the active reading's bookmarks, written through to the store.
///
/// Insertion order is display order; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkList {
    items: Vec<Bookmark>,
}

impl BookmarkList {
    pub fn new(items: Vec<Bookmark>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Bookmark] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Bookmark> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Marker positions for the progress track.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().map(|b| b.position)
    }

    pub fn add<S: ReadingStore + ?Sized>(
        &mut self,
        store: &mut S,
        reading_id: &str,
        position: usize,
        note: Option<String>,
    ) -> &Bookmark {
        let bookmark = match store.add_bookmark(reading_id, position, note.clone()) {
            Ok(Some(bookmark)) => bookmark,
            Ok(None) => {
                logging::warn(format!(
                    "Reading {} is not in the library, bookmark kept in memory only",
                    reading_id
                ));
                Bookmark {
                    position,
                    note,
                    timestamp: now_timestamp(),
                }
            }
            Err(err) => {
                logging::warn(format!("Failed to save bookmark: {}", err));
                Bookmark {
                    position,
                    note,
                    timestamp: now_timestamp(),
                }
            }
        };
        self.items.push(bookmark);
        &self.items[self.items.len() - 1]
    }

    /// Removes the bookmark at `index`. Out of range does nothing.
    pub fn remove<S: ReadingStore + ?Sized>(
        &mut self,
        store: &mut S,
        reading_id: &str,
        index: usize,
    ) -> Option<Bookmark> {
        if index >= self.items.len() {
            return None;
        }
        if let Err(err) = store.remove_bookmark(reading_id, index) {
            logging::warn(format!("Failed to remove bookmark: {}", err));
        }
        Some(self.items.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewReading;
    use crate::state::MemoryStore;

    fn setup() -> (MemoryStore, String) {
        let mut store = MemoryStore::new();
        let reading = store
            .add_reading(NewReading::custom("book", "one two three"))
            .unwrap();
        (store, reading.id)
    }

    #[test]
    fn test_add_appends_in_order_and_persists() {
        let (mut store, id) = setup();
        let mut list = BookmarkList::default();
        list.add(&mut store, &id, 7, None);
        list.add(&mut store, &id, 2, Some("intro".to_string()));
        list.add(&mut store, &id, 7, None);

        assert_eq!(list.positions().collect::<Vec<_>>(), vec![7, 2, 7]);
        let stored = store.get_reading(&id).unwrap().unwrap().bookmarks;
        assert_eq!(stored, list.items());
    }

    #[test]
    fn test_add_then_remove_restores_list() {
        let (mut store, id) = setup();
        let mut list = BookmarkList::default();
        list.add(&mut store, &id, 1, None);
        list.add(&mut store, &id, 5, Some("x".to_string()));
        let before = list.clone();

        list.add(&mut store, &id, 9, None);
        let removed = list.remove(&mut store, &id, list.len() - 1).unwrap();
        assert_eq!(removed.position, 9);
        assert_eq!(list, before);
        assert_eq!(store.get_reading(&id).unwrap().unwrap().bookmarks, before.items());
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let (mut store, id) = setup();
        let mut list = BookmarkList::default();
        list.add(&mut store, &id, 1, None);
        assert!(list.remove(&mut store, &id, 3).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_store_failure_keeps_memory_authoritative() {
        let (mut store, id) = setup();
        store.set_fail_writes(true);
        let mut list = BookmarkList::default();
        list.add(&mut store, &id, 4, None);
        assert_eq!(list.len(), 1);
        assert!(store.get_reading(&id).unwrap().unwrap().bookmarks.is_empty());
    }
}
