//! Serializable point-in-time view of the whole library, for export.

use serde::{Deserialize, Serialize};

use libris_catalog::CatalogEntry;
use libris_core::{CalendarDate, Record};
use libris_events::Notification;
use libris_lending::{Loan, Reservation};
use libris_patrons::Patron;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    pub taken_on: CalendarDate,
    pub items: Vec<CatalogEntry>,
    pub patrons: Vec<Patron>,
    pub loans: Vec<Loan>,
    pub reservations: Vec<Reservation>,
    pub notifications: Vec<Notification>,
}

/// One flat table: a name plus rows produced by `Record::to_record`.
pub type Table = (&'static str, Vec<Vec<String>>);

impl LibrarySnapshot {
    /// Tabular export: items, patrons, loans, reservations (in that order).
    pub fn records(&self) -> Vec<Table> {
        vec![
            ("items", rows(&self.items)),
            ("patrons", rows(&self.patrons)),
            ("loans", rows(&self.loans)),
            ("reservations", rows(&self.reservations)),
        ]
    }
}

fn rows<R: Record>(records: &[R]) -> Vec<Vec<String>> {
    records.iter().map(Record::to_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Library, LibraryConfig};
    use libris_catalog::NewItem;
    use libris_core::FixedClock;
    use libris_patrons::NewPatron;

    fn snapshot() -> LibrarySnapshot {
        let mut lib = Library::with_clock(
            LibraryConfig::default(),
            FixedClock::new(CalendarDate::new(3, 2, 2025)),
        )
        .unwrap();
        let patron = lib
            .add_patron(NewPatron::new("Ada", "ada@example.com", "Faculty"))
            .unwrap();
        let item = lib
            .add_item(NewItem::book("Dune", "Herbert", 1965, "SciFi", "978-0441", 412))
            .unwrap();
        lib.borrow(patron, item).unwrap();
        lib.snapshot()
    }

    #[test]
    fn records_are_flat_rows_per_table() {
        let tables = snapshot().records();
        let names: Vec<&str> = tables.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["items", "patrons", "loans", "reservations"]);

        let (_, items) = &tables[0];
        assert_eq!(items[0][..2], ["1".to_string(), "Book".to_string()]);
        assert_eq!(items[0][6], "0");

        let (_, loans) = &tables[2];
        assert_eq!(
            loans[0],
            vec!["1", "1", "1", "3/2/2025", "17/2/2025", "", "0"]
        );
        assert!(tables[3].1.is_empty());
    }

    #[test]
    fn snapshot_survives_json_round_trip() {
        let snapshot = snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: LibrarySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
        assert_eq!(restored.notifications.len(), 2);
    }
}
