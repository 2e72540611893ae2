//! The lending ledger: loans, reservations, and the rules tying them to item
//! availability.
//!
//! Per item the ledger moves between:
//!
//! ```text
//! Available --borrow--> Loaned --return--> Available
//!                         |  ^
//!                         renew (due date extended, same loan)
//! ```
//!
//! An item's catalog availability flag is `false` exactly while one loan on it
//! is open. [`Ledger::execute`] is the only path that flips the flag, and it
//! does so in the same step that opens or closes the loan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use libris_catalog::Catalog;
use libris_core::{
    Aggregate, CalendarDate, DomainError, DomainResult, Entity, ItemId, LoanId, PatronId,
    ReservationId,
};
use libris_events::Event;

use crate::loan::Loan;
use crate::policy::{FulfillmentPolicy, LendingPolicy, check_period};
use crate::reservation::Reservation;

/// Command: BorrowItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowItem {
    pub loan_id: LoanId,
    pub patron_id: PatronId,
    pub item_id: ItemId,
    pub today: CalendarDate,
}

/// Command: ReturnItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnItem {
    pub loan_id: LoanId,
    pub today: CalendarDate,
}

/// Command: RenewLoan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewLoan {
    pub loan_id: LoanId,
    pub days: u32,
    pub today: CalendarDate,
}

/// Command: PlaceReservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceReservation {
    pub reservation_id: ReservationId,
    pub patron_id: PatronId,
    pub item_id: ItemId,
    pub today: CalendarDate,
}

/// Command: CancelReservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelReservation {
    pub reservation_id: ReservationId,
    pub today: CalendarDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LendingCommand {
    BorrowItem(BorrowItem),
    ReturnItem(ReturnItem),
    RenewLoan(RenewLoan),
    PlaceReservation(PlaceReservation),
    CancelReservation(CancelReservation),
}

/// Event: LoanOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanOpened {
    pub loan_id: LoanId,
    pub patron_id: PatronId,
    pub item_id: ItemId,
    pub borrowed_on: CalendarDate,
    pub due_on: CalendarDate,
}

/// Event: LoanReturned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanReturned {
    pub loan_id: LoanId,
    pub patron_id: PatronId,
    pub item_id: ItemId,
    pub returned_on: CalendarDate,
}

/// Event: LoanRenewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRenewed {
    pub loan_id: LoanId,
    pub item_id: ItemId,
    pub due_on: CalendarDate,
    pub renewed_on: CalendarDate,
}

/// Event: ReservationPlaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationPlaced {
    pub reservation_id: ReservationId,
    pub patron_id: PatronId,
    pub item_id: ItemId,
    pub reserved_on: CalendarDate,
}

/// Event: ReservationReady. The earliest waiting patron can now borrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationReady {
    pub reservation_id: ReservationId,
    pub patron_id: PatronId,
    pub item_id: ItemId,
    pub occurred_on: CalendarDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeactivationReason {
    Cancelled,
    Fulfilled,
}

/// Event: ReservationDeactivated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDeactivated {
    pub reservation_id: ReservationId,
    pub patron_id: PatronId,
    pub item_id: ItemId,
    pub reason: DeactivationReason,
    pub occurred_on: CalendarDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LendingEvent {
    LoanOpened(LoanOpened),
    LoanReturned(LoanReturned),
    LoanRenewed(LoanRenewed),
    ReservationPlaced(ReservationPlaced),
    ReservationReady(ReservationReady),
    ReservationDeactivated(ReservationDeactivated),
}

impl Event for LendingEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LendingEvent::LoanOpened(_) => "lending.loan.opened",
            LendingEvent::LoanReturned(_) => "lending.loan.returned",
            LendingEvent::LoanRenewed(_) => "lending.loan.renewed",
            LendingEvent::ReservationPlaced(_) => "lending.reservation.placed",
            LendingEvent::ReservationReady(_) => "lending.reservation.ready",
            LendingEvent::ReservationDeactivated(_) => "lending.reservation.deactivated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_on(&self) -> CalendarDate {
        match self {
            LendingEvent::LoanOpened(e) => e.borrowed_on,
            LendingEvent::LoanReturned(e) => e.returned_on,
            LendingEvent::LoanRenewed(e) => e.renewed_on,
            LendingEvent::ReservationPlaced(e) => e.reserved_on,
            LendingEvent::ReservationReady(e) => e.occurred_on,
            LendingEvent::ReservationDeactivated(e) => e.occurred_on,
        }
    }
}

/// Aggregate: every loan and reservation the library has ever recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    policy: LendingPolicy,
    loans: BTreeMap<LoanId, Loan>,
    reservations: BTreeMap<ReservationId, Reservation>,
    version: u64,
}

impl Ledger {
    pub fn new(policy: LendingPolicy) -> Self {
        Self {
            policy,
            loans: BTreeMap::new(),
            reservations: BTreeMap::new(),
            version: 0,
        }
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    pub fn loan(&self, id: LoanId) -> Option<&Loan> {
        self.loans.get(&id)
    }

    pub fn reservation(&self, id: ReservationId) -> Option<&Reservation> {
        self.reservations.get(&id)
    }

    /// All loans, oldest first.
    pub fn loans(&self) -> impl Iterator<Item = &Loan> {
        self.loans.values()
    }

    /// All reservations (active or not), oldest first.
    pub fn reservations(&self) -> impl Iterator<Item = &Reservation> {
        self.reservations.values()
    }

    /// The open loan on `item_id`, if the item is out.
    pub fn active_loan_for(&self, item_id: ItemId) -> Option<&Loan> {
        self.loans
            .values()
            .find(|l| l.item_id() == item_id && !l.is_returned())
    }

    pub fn has_active_loan(&self, item_id: ItemId) -> bool {
        self.active_loan_for(item_id).is_some()
    }

    /// Earliest-created active reservation for `item_id` (first come, first served).
    pub fn next_waiting(&self, item_id: ItemId) -> Option<&Reservation> {
        self.reservations
            .values()
            .find(|r| r.item_id() == item_id && r.is_active())
    }

    pub fn active_reservations_for(&self, patron_id: PatronId) -> Vec<&Reservation> {
        self.reservations
            .values()
            .filter(|r| r.patron_id() == patron_id && r.is_active())
            .collect()
    }

    /// Borrow history of a patron, returned loans included.
    pub fn loans_for(&self, patron_id: PatronId) -> Vec<&Loan> {
        self.loans
            .values()
            .filter(|l| l.patron_id() == patron_id)
            .collect()
    }

    /// Open loans whose due date is before `today`.
    pub fn overdue_loans(&self, today: CalendarDate) -> Vec<&Loan> {
        self.loans.values().filter(|l| l.is_overdue(today)).collect()
    }

    /// Items whose catalog flag disagrees with the ledger's open loans.
    ///
    /// Always empty while every availability change goes through `execute`.
    pub fn availability_mismatches(&self, catalog: &Catalog) -> Vec<ItemId> {
        catalog
            .iter()
            .filter(|entry| entry.is_available() == self.has_active_loan(entry.id()))
            .map(|entry| entry.id())
            .collect()
    }

    /// Decide, apply, and mirror availability into the catalog.
    ///
    /// Nothing changes (ledger or catalog) when an error is returned.
    pub fn execute(
        &mut self,
        command: LendingCommand,
        catalog: &mut Catalog,
    ) -> DomainResult<Vec<LendingEvent>> {
        if let LendingCommand::BorrowItem(cmd) = &command {
            catalog.require(cmd.item_id)?;
        }

        let events = self.handle(&command)?;
        for event in &events {
            self.apply(event);
            Self::sync_availability(catalog, event);
        }
        Ok(events)
    }

    fn sync_availability(catalog: &mut Catalog, event: &LendingEvent) {
        let (item_id, available) = match event {
            LendingEvent::LoanOpened(e) => (e.item_id, false),
            LendingEvent::LoanReturned(e) => (e.item_id, true),
            _ => return,
        };
        if let Err(err) = catalog.set_availability(item_id, available) {
            tracing::warn!(item_id = %item_id, error = %err, "availability sync skipped");
        }
    }
}

impl Aggregate for Ledger {
    type Command = LendingCommand;
    type Event = LendingEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LendingEvent::LoanOpened(e) => {
                self.loans.insert(
                    e.loan_id,
                    Loan::open(e.loan_id, e.patron_id, e.item_id, e.borrowed_on, e.due_on),
                );
            }
            LendingEvent::LoanReturned(e) => {
                if let Some(loan) = self.loans.get_mut(&e.loan_id) {
                    loan.close(e.returned_on);
                }
            }
            LendingEvent::LoanRenewed(e) => {
                if let Some(loan) = self.loans.get_mut(&e.loan_id) {
                    loan.extend_to(e.due_on);
                }
            }
            LendingEvent::ReservationPlaced(e) => {
                self.reservations.insert(
                    e.reservation_id,
                    Reservation::place(e.reservation_id, e.patron_id, e.item_id, e.reserved_on),
                );
            }
            LendingEvent::ReservationReady(_) => {}
            LendingEvent::ReservationDeactivated(e) => {
                if let Some(reservation) = self.reservations.get_mut(&e.reservation_id) {
                    reservation.deactivate();
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LendingCommand::BorrowItem(cmd) => self.handle_borrow(cmd),
            LendingCommand::ReturnItem(cmd) => self.handle_return(cmd),
            LendingCommand::RenewLoan(cmd) => self.handle_renew(cmd),
            LendingCommand::PlaceReservation(cmd) => self.handle_reserve(cmd),
            LendingCommand::CancelReservation(cmd) => self.handle_cancel(cmd),
        }
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Ledger {
    fn open_loan(&self, loan_id: LoanId) -> Result<&Loan, DomainError> {
        let loan = self.loans.get(&loan_id).ok_or_else(|| loan_id.not_found())?;
        if loan.is_returned() {
            return Err(DomainError::AlreadyReturned(loan_id));
        }
        Ok(loan)
    }

    fn handle_borrow(&self, cmd: &BorrowItem) -> Result<Vec<LendingEvent>, DomainError> {
        if self.loans.contains_key(&cmd.loan_id) {
            return Err(DomainError::conflict(format!("loan {} already exists", cmd.loan_id)));
        }
        if self.has_active_loan(cmd.item_id) {
            return Err(DomainError::conflict(format!(
                "item {} is not available",
                cmd.item_id
            )));
        }

        Ok(vec![LendingEvent::LoanOpened(LoanOpened {
            loan_id: cmd.loan_id,
            patron_id: cmd.patron_id,
            item_id: cmd.item_id,
            borrowed_on: cmd.today,
            due_on: cmd.today.add_days(self.policy.loan_period_days)?,
        })])
    }

    fn handle_return(&self, cmd: &ReturnItem) -> Result<Vec<LendingEvent>, DomainError> {
        let loan = self.open_loan(cmd.loan_id)?;

        let mut events = vec![LendingEvent::LoanReturned(LoanReturned {
            loan_id: cmd.loan_id,
            patron_id: loan.patron_id(),
            item_id: loan.item_id(),
            returned_on: cmd.today,
        })];

        if let Some(waiting) = self.next_waiting(loan.item_id()) {
            events.push(LendingEvent::ReservationReady(ReservationReady {
                reservation_id: waiting.id(),
                patron_id: waiting.patron_id(),
                item_id: waiting.item_id(),
                occurred_on: cmd.today,
            }));
            if self.policy.fulfillment == FulfillmentPolicy::AutoDeactivate {
                events.push(LendingEvent::ReservationDeactivated(ReservationDeactivated {
                    reservation_id: waiting.id(),
                    patron_id: waiting.patron_id(),
                    item_id: waiting.item_id(),
                    reason: DeactivationReason::Fulfilled,
                    occurred_on: cmd.today,
                }));
            }
        }

        Ok(events)
    }

    fn handle_renew(&self, cmd: &RenewLoan) -> Result<Vec<LendingEvent>, DomainError> {
        let loan = self.open_loan(cmd.loan_id)?;

        check_period("renewal", cmd.days)?;
        if self.next_waiting(loan.item_id()).is_some() {
            return Err(DomainError::conflict(format!(
                "item {} has pending reservations",
                loan.item_id()
            )));
        }

        Ok(vec![LendingEvent::LoanRenewed(LoanRenewed {
            loan_id: cmd.loan_id,
            item_id: loan.item_id(),
            due_on: loan.due_on().add_days(cmd.days)?,
            renewed_on: cmd.today,
        })])
    }

    fn handle_reserve(&self, cmd: &PlaceReservation) -> Result<Vec<LendingEvent>, DomainError> {
        if self.reservations.contains_key(&cmd.reservation_id) {
            return Err(DomainError::conflict(format!(
                "reservation {} already exists",
                cmd.reservation_id
            )));
        }
        if !self.has_active_loan(cmd.item_id) {
            return Err(DomainError::DirectlyAvailable(cmd.item_id));
        }
        let duplicate = self.reservations.values().any(|r| {
            r.is_active() && r.patron_id() == cmd.patron_id && r.item_id() == cmd.item_id
        });
        if duplicate {
            return Err(DomainError::DuplicateReservation {
                patron_id: cmd.patron_id,
                item_id: cmd.item_id,
            });
        }

        Ok(vec![LendingEvent::ReservationPlaced(ReservationPlaced {
            reservation_id: cmd.reservation_id,
            patron_id: cmd.patron_id,
            item_id: cmd.item_id,
            reserved_on: cmd.today,
        })])
    }

    fn handle_cancel(&self, cmd: &CancelReservation) -> Result<Vec<LendingEvent>, DomainError> {
        let reservation = self
            .reservations
            .get(&cmd.reservation_id)
            .ok_or_else(|| cmd.reservation_id.not_found())?;
        if !reservation.is_active() {
            return Err(DomainError::conflict(format!(
                "reservation {} is not active",
                cmd.reservation_id
            )));
        }

        Ok(vec![LendingEvent::ReservationDeactivated(ReservationDeactivated {
            reservation_id: cmd.reservation_id,
            patron_id: reservation.patron_id(),
            item_id: reservation.item_id(),
            reason: DeactivationReason::Cancelled,
            occurred_on: cmd.today,
        })])
    }
}
