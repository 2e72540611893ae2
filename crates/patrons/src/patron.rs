use serde::{Deserialize, Serialize};

use libris_core::{Entity, PatronId, Record};

/// Input for registering a patron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatron {
    pub name: String,
    pub email: String,
    /// Free-text role label (Student, Faculty, Staff, ...).
    pub patron_type: String,
}

impl NewPatron {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        patron_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            patron_type: patron_type.into(),
        }
    }
}

/// A registered library patron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patron {
    id: PatronId,
    name: String,
    email: String,
    patron_type: String,
}

impl Patron {
    pub fn new(id: PatronId, patron: NewPatron) -> Self {
        Self {
            id,
            name: patron.name,
            email: patron.email,
            patron_type: patron.patron_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn patron_type(&self) -> &str {
        &self.patron_type
    }

    pub fn describe(&self) -> String {
        format!(
            "Patron ID: {}, Name: {}, Email: {}, Type: {}",
            self.id, self.name, self.email, self.patron_type
        )
    }
}

impl Entity for Patron {
    type Id = PatronId;

    fn id(&self) -> PatronId {
        self.id
    }
}

impl Record for Patron {
    fn to_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.patron_type.clone(),
        ]
    }
}
