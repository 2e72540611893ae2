use std::collections::BTreeMap;

use libris_core::{DomainError, DomainResult, PatronId};

use crate::patron::{NewPatron, Patron};

/// Patron lookup by id, iterated in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatronRegistry {
    patrons: BTreeMap<PatronId, Patron>,
}

impl PatronRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: PatronId, patron: NewPatron) -> DomainResult<&Patron> {
        if patron.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.patrons.contains_key(&id) {
            return Err(DomainError::conflict(format!("patron {id} already exists")));
        }
        let patron = self.patrons.entry(id).or_insert(Patron::new(id, patron));
        Ok(&*patron)
    }

    pub fn get(&self, id: PatronId) -> Option<&Patron> {
        self.patrons.get(&id)
    }

    pub fn require(&self, id: PatronId) -> DomainResult<&Patron> {
        self.patrons.get(&id).ok_or_else(|| id.not_found())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patron> {
        self.patrons.values()
    }
}
