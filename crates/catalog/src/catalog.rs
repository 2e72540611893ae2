use std::collections::BTreeMap;

use libris_core::{DomainError, DomainResult, ItemId};

use crate::entry::{CatalogEntry, ItemEdit, NewItem};

/// In-memory catalog keyed by item id.
///
/// Ids are handed out monotonically, so id order is insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: BTreeMap<ItemId, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ItemId) -> Option<&CatalogEntry> {
        self.entries.get(&id)
    }

    /// Look up an entry, failing with `NotFound`.
    pub fn require(&self, id: ItemId) -> DomainResult<&CatalogEntry> {
        self.entries.get(&id).ok_or_else(|| id.not_found())
    }

    pub fn add(&mut self, id: ItemId, item: NewItem) -> DomainResult<&CatalogEntry> {
        if item.title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if self.entries.contains_key(&id) {
            return Err(DomainError::conflict(format!("item {id} already exists")));
        }
        let entry = self.entries.entry(id).or_insert(CatalogEntry::new(id, item));
        Ok(&*entry)
    }

    /// Overwrite title/author/year with whatever non-empty values `edit` carries.
    pub fn edit(&mut self, id: ItemId, edit: &ItemEdit) -> DomainResult<&CatalogEntry> {
        let entry = self.entries.get_mut(&id).ok_or_else(|| id.not_found())?;
        entry.apply_edit(edit);
        Ok(&*entry)
    }

    /// Delete an entry. Callers are responsible for the "no active loan" check.
    pub fn remove(&mut self, id: ItemId) -> DomainResult<CatalogEntry> {
        self.entries.remove(&id).ok_or_else(|| id.not_found())
    }

    /// Flip the availability flag.
    ///
    /// Reserved for the lending ledger, which keeps the flag in lockstep with
    /// open loans.
    pub fn set_availability(&mut self, id: ItemId, available: bool) -> DomainResult<()> {
        let entry = self.entries.get_mut(&id).ok_or_else(|| id.not_found())?;
        entry.set_available(available);
        Ok(())
    }

    /// Entries whose title or author contains `keyword` (case-sensitive).
    pub fn search_by_keyword(&self, keyword: &str) -> Vec<&CatalogEntry> {
        self.entries
            .values()
            .filter(|e| e.matches_keyword(keyword))
            .collect()
    }

    /// Entries whose category equals `category` exactly.
    pub fn search_by_category(&self, category: &str) -> Vec<&CatalogEntry> {
        self.entries
            .values()
            .filter(|e| e.category() == category)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris_core::Entity;

    fn seeded() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add(
                ItemId::new(1),
                NewItem::book("Rust in Action", "McNamara", 2021, "Programming", "111", 456),
            )
            .unwrap();
        catalog
            .add(
                ItemId::new(2),
                NewItem::article("Time, Clocks", "Lamport", 1978, "Systems", "CACM", 21),
            )
            .unwrap();
        catalog
            .add(
                ItemId::new(3),
                NewItem::digital("Programming Talks", "Various", 2020, "Programming", "mp4", 700.0),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn add_rejects_blank_title() {
        let mut catalog = Catalog::new();
        let err = catalog
            .add(ItemId::new(1), NewItem::book("  ", "A", 2000, "c", "i", 1))
            .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for blank title"),
        }
        assert!(catalog.iter().next().is_none());
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut catalog = seeded();
        let err = catalog
            .add(ItemId::new(1), NewItem::book("Other", "A", 2000, "c", "i", 1))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(catalog.get(ItemId::new(1)).unwrap().title(), "Rust in Action");
    }

    #[test]
    fn search_by_keyword_checks_title_and_author() {
        let catalog = seeded();
        let ids: Vec<u64> = catalog
            .search_by_keyword("Lamport")
            .iter()
            .map(|e| e.id().get())
            .collect();
        assert_eq!(ids, vec![2]);

        let ids: Vec<u64> = catalog
            .search_by_keyword("Programming")
            .iter()
            .map(|e| e.id().get())
            .collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn search_by_category_is_exact() {
        let catalog = seeded();
        assert_eq!(catalog.search_by_category("Programming").len(), 2);
        assert!(catalog.search_by_category("programming").is_empty());
    }

    #[test]
    fn iter_lists_in_id_order() {
        let catalog = seeded();
        let ids: Vec<u64> = catalog.iter().map(|e| e.id().get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn edit_unknown_item_is_not_found() {
        let mut catalog = seeded();
        let err = catalog.edit(ItemId::new(9), &ItemEdit::default()).unwrap_err();
        assert_eq!(err, ItemId::new(9).not_found());
    }

    #[test]
    fn edit_never_touches_availability() {
        let mut catalog = seeded();
        catalog.set_availability(ItemId::new(1), false).unwrap();
        let entry = catalog
            .edit(
                ItemId::new(1),
                &ItemEdit {
                    title: Some("Rust in Action, 2nd ed.".to_string()),
                    ..ItemEdit::default()
                },
            )
            .unwrap();
        assert_eq!(entry.title(), "Rust in Action, 2nd ed.");
        assert!(!entry.is_available());
    }

    #[test]
    fn whitespace_only_edit_keeps_existing_title_and_author() {
        let mut catalog = seeded();
        let entry = catalog
            .edit(
                ItemId::new(1),
                &ItemEdit {
                    title: Some("   ".to_string()),
                    author: Some("\t".to_string()),
                    publication_year: None,
                },
            )
            .unwrap();
        assert_eq!(entry.title(), "Rust in Action");
        assert_eq!(entry.author(), "McNamara");
    }

    #[test]
    fn remove_returns_entry_and_forgets_it() {
        let mut catalog = seeded();
        let removed = catalog.remove(ItemId::new(2)).unwrap();
        assert_eq!(removed.title(), "Time, Clocks");
        assert!(catalog.get(ItemId::new(2)).is_none());
        assert!(matches!(
            catalog.remove(ItemId::new(2)),
            Err(DomainError::NotFound { .. })
        ));
    }
}
