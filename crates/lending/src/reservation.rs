use serde::{Deserialize, Serialize};

use libris_core::{CalendarDate, Entity, ItemId, PatronId, Record, ReservationId, flag};

/// A patron waiting for an item that is currently on loan.
///
/// Reservations are never deleted; deactivation is the only mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    patron_id: PatronId,
    item_id: ItemId,
    reserved_on: CalendarDate,
    active: bool,
}

impl Reservation {
    pub(crate) fn place(
        id: ReservationId,
        patron_id: PatronId,
        item_id: ItemId,
        reserved_on: CalendarDate,
    ) -> Self {
        Self {
            id,
            patron_id,
            item_id,
            reserved_on,
            active: true,
        }
    }

    pub fn patron_id(&self) -> PatronId {
        self.patron_id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn reserved_on(&self) -> CalendarDate {
        self.reserved_on
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn describe(&self) -> String {
        format!(
            "Reservation ID: {}, Patron ID: {}, Item ID: {}, Date: {}, Active: {}",
            self.id,
            self.patron_id,
            self.item_id,
            self.reserved_on,
            if self.active { "Yes" } else { "No" }
        )
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Entity for Reservation {
    type Id = ReservationId;

    fn id(&self) -> ReservationId {
        self.id
    }
}

impl Record for Reservation {
    fn to_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.patron_id.to_string(),
            self.item_id.to_string(),
            self.reserved_on.to_string(),
            flag(self.active),
        ]
    }
}
