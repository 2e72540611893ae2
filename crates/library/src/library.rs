//! Library facade: resolves identifiers, enforces cross-entity preconditions,
//! delegates lending transitions to the ledger, and turns the resulting
//! events into notifications.

use libris_catalog::{Catalog, CatalogEntry, ItemEdit, NewItem};
use libris_core::{
    CalendarDate, Clock, DomainError, DomainResult, IdSequence, ItemId, LoanId, PatronId,
    ReservationId, SystemClock,
};
use libris_events::{Notification, NotificationCategory, NotificationLog, NotificationSink};
use libris_lending::{
    BorrowItem, CancelReservation, Ledger, LendingCommand, LendingEvent, Loan, PlaceReservation,
    RenewLoan, Reservation, ReturnItem,
};
use libris_patrons::{NewPatron, Patron, PatronRegistry};

use crate::config::LibraryConfig;
use crate::snapshot::LibrarySnapshot;

/// Outcome of a successful return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnReceipt {
    pub loan: Loan,
    /// Patron holding the earliest active reservation, who was just notified.
    pub notified_patron: Option<PatronId>,
}

#[derive(Debug, Default, Clone)]
struct Sequences {
    items: IdSequence,
    patrons: IdSequence,
    loans: IdSequence,
    reservations: IdSequence,
}

/// Single-instance library state.
///
/// Every operation runs to completion synchronously. Callers that share a
/// `Library` across threads must wrap the whole value in one lock, since an
/// availability flip and its loan record have to change together.
#[derive(Debug)]
pub struct Library<C: Clock = SystemClock> {
    config: LibraryConfig,
    clock: C,
    ids: Sequences,
    catalog: Catalog,
    patrons: PatronRegistry,
    ledger: Ledger,
    notifications: NotificationLog,
}

impl Library<SystemClock> {
    pub fn new(config: LibraryConfig) -> DomainResult<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Library<C> {
    pub fn with_clock(config: LibraryConfig, clock: C) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            ids: Sequences::default(),
            catalog: Catalog::new(),
            patrons: PatronRegistry::new(),
            ledger: Ledger::new(config.lending),
            notifications: NotificationLog::new(),
        })
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn today(&self) -> CalendarDate {
        self.clock.today()
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    // ---- catalog -------------------------------------------------------

    pub fn add_item(&mut self, item: NewItem) -> DomainResult<ItemId> {
        let id: ItemId = self.ids.items.peek_id();
        let title = self.catalog.add(id, item)?.title().to_string();
        self.ids.items.advance();

        tracing::info!(item_id = %id, title = %title, "item added");
        self.notify(
            NotificationCategory::NewAcquisition,
            format!("New item added: {title}"),
        );
        Ok(id)
    }

    pub fn edit_item(&mut self, id: ItemId, edit: &ItemEdit) -> DomainResult<&CatalogEntry> {
        let entry = self.catalog.edit(id, edit)?;
        tracing::info!(item_id = %id, "item edited");
        Ok(entry)
    }

    /// Delete an item that is not currently on loan.
    pub fn remove_item(&mut self, id: ItemId) -> DomainResult<CatalogEntry> {
        self.catalog.require(id)?;
        if self.ledger.has_active_loan(id) {
            tracing::debug!(item_id = %id, "remove refused: item on loan");
            return Err(DomainError::conflict(format!(
                "item {id} is currently on loan"
            )));
        }

        let removed = self.catalog.remove(id)?;
        tracing::info!(item_id = %id, title = %removed.title(), "item removed");
        Ok(removed)
    }

    pub fn item(&self, id: ItemId) -> Option<&CatalogEntry> {
        self.catalog.get(id)
    }

    pub fn list_all(&self) -> Vec<&CatalogEntry> {
        self.catalog.iter().collect()
    }

    pub fn search_by_keyword(&self, keyword: &str) -> Vec<&CatalogEntry> {
        self.catalog.search_by_keyword(keyword)
    }

    pub fn search_by_category(&self, category: &str) -> Vec<&CatalogEntry> {
        self.catalog.search_by_category(category)
    }

    // ---- patrons -------------------------------------------------------

    pub fn add_patron(&mut self, patron: NewPatron) -> DomainResult<PatronId> {
        let id: PatronId = self.ids.patrons.peek_id();
        self.patrons.register(id, patron)?;
        self.ids.patrons.advance();
        tracing::info!(patron_id = %id, "patron registered");
        Ok(id)
    }

    pub fn patron(&self, id: PatronId) -> Option<&Patron> {
        self.patrons.get(id)
    }

    pub fn patrons(&self) -> Vec<&Patron> {
        self.patrons.iter().collect()
    }

    // ---- lending -------------------------------------------------------

    /// Lend an available item; the loan is due after the configured period.
    pub fn borrow(&mut self, patron_id: PatronId, item_id: ItemId) -> DomainResult<Loan> {
        self.patrons.require(patron_id)?;
        self.catalog.require(item_id)?;

        let loan_id: LoanId = self.ids.loans.peek_id();
        let command = LendingCommand::BorrowItem(BorrowItem {
            loan_id,
            patron_id,
            item_id,
            today: self.today(),
        });
        self.run(command)?;
        self.ids.loans.advance();

        let loan = self.require_loan(loan_id)?;
        tracing::info!(
            loan_id = %loan_id,
            patron_id = %patron_id,
            item_id = %item_id,
            due_on = %loan.due_on(),
            "item borrowed"
        );
        Ok(loan)
    }

    /// Close a loan, make the item available, and notify the earliest waiting patron.
    pub fn return_item(&mut self, loan_id: LoanId) -> DomainResult<ReturnReceipt> {
        let command = LendingCommand::ReturnItem(ReturnItem {
            loan_id,
            today: self.today(),
        });
        let events = self.run(command)?;

        let notified_patron = events.iter().find_map(|e| match e {
            LendingEvent::ReservationReady(ready) => Some(ready.patron_id),
            _ => None,
        });
        let loan = self.require_loan(loan_id)?;
        tracing::info!(
            loan_id = %loan_id,
            item_id = %loan.item_id(),
            notified_patron = ?notified_patron.map(PatronId::get),
            "item returned"
        );
        Ok(ReturnReceipt {
            loan,
            notified_patron,
        })
    }

    /// Extend a loan by the configured renewal period.
    pub fn renew(&mut self, loan_id: LoanId) -> DomainResult<Loan> {
        self.renew_for(loan_id, self.config.lending.renewal_days)
    }

    /// Extend a loan by `days`; refused while anyone waits for the item.
    pub fn renew_for(&mut self, loan_id: LoanId, days: u32) -> DomainResult<Loan> {
        let command = LendingCommand::RenewLoan(RenewLoan {
            loan_id,
            days,
            today: self.today(),
        });
        self.run(command)?;

        let loan = self.require_loan(loan_id)?;
        tracing::info!(loan_id = %loan_id, due_on = %loan.due_on(), "loan renewed");
        Ok(loan)
    }

    /// Join the waitlist for an item that is out on loan.
    pub fn reserve(&mut self, patron_id: PatronId, item_id: ItemId) -> DomainResult<Reservation> {
        self.patrons.require(patron_id)?;
        self.catalog.require(item_id)?;

        let reservation_id: ReservationId = self.ids.reservations.peek_id();
        let command = LendingCommand::PlaceReservation(PlaceReservation {
            reservation_id,
            patron_id,
            item_id,
            today: self.today(),
        });
        self.run(command)?;
        self.ids.reservations.advance();

        tracing::info!(
            reservation_id = %reservation_id,
            patron_id = %patron_id,
            item_id = %item_id,
            "item reserved"
        );
        self.ledger
            .reservation(reservation_id)
            .cloned()
            .ok_or_else(|| reservation_id.not_found())
    }

    pub fn cancel_reservation(&mut self, reservation_id: ReservationId) -> DomainResult<()> {
        let command = LendingCommand::CancelReservation(CancelReservation {
            reservation_id,
            today: self.today(),
        });
        self.run(command)?;
        tracing::info!(reservation_id = %reservation_id, "reservation cancelled");
        Ok(())
    }

    pub fn loan(&self, id: LoanId) -> Option<&Loan> {
        self.ledger.loan(id)
    }

    pub fn reservation(&self, id: ReservationId) -> Option<&Reservation> {
        self.ledger.reservation(id)
    }

    pub fn loans(&self) -> Vec<&Loan> {
        self.ledger.loans().collect()
    }

    pub fn reservations(&self) -> Vec<&Reservation> {
        self.ledger.reservations().collect()
    }

    /// Active reservations held by `patron_id`, oldest first.
    pub fn list_active_reservations(&self, patron_id: PatronId) -> Vec<&Reservation> {
        self.ledger.active_reservations_for(patron_id)
    }

    /// Every loan `patron_id` ever took out, oldest first.
    pub fn loan_history(&self, patron_id: PatronId) -> Vec<&Loan> {
        self.ledger.loans_for(patron_id)
    }

    /// Open loans due before `today`; records one overdue notification each.
    pub fn check_overdue_items(&mut self, today: CalendarDate) -> Vec<Loan> {
        let overdue: Vec<Loan> = self
            .ledger
            .overdue_loans(today)
            .into_iter()
            .cloned()
            .collect();

        for loan in &overdue {
            let name = self.patrons.get(loan.patron_id()).map(|p| p.name().to_string());
            match name {
                Some(name) => {
                    self.notify(NotificationCategory::Overdue, format!("Overdue item for {name}"))
                }
                None => {
                    tracing::warn!(patron_id = %loan.patron_id(), "overdue loan for unknown patron")
                }
            }
        }
        tracing::debug!(count = overdue.len(), today = %today, "overdue check");
        overdue
    }

    // ---- notifications & export ---------------------------------------

    /// The most recent `limit` notifications, oldest first.
    pub fn list_notifications(&self, limit: usize) -> &[Notification] {
        self.notifications.recent(limit)
    }

    pub fn recent_notifications(&self) -> &[Notification] {
        self.notifications.recent(self.config.notification_view_limit)
    }

    pub fn snapshot(&self) -> LibrarySnapshot {
        LibrarySnapshot {
            taken_on: self.today(),
            items: self.catalog.iter().cloned().collect(),
            patrons: self.patrons.iter().cloned().collect(),
            loans: self.ledger.loans().cloned().collect(),
            reservations: self.ledger.reservations().cloned().collect(),
            notifications: self.notifications.all().to_vec(),
        }
    }

    /// Items whose availability flag disagrees with open loans (always empty).
    pub fn availability_mismatches(&self) -> Vec<ItemId> {
        self.ledger.availability_mismatches(&self.catalog)
    }

    // ---- internals -----------------------------------------------------

    fn run(&mut self, command: LendingCommand) -> DomainResult<Vec<LendingEvent>> {
        let events = self
            .ledger
            .execute(command, &mut self.catalog)
            .inspect_err(|err| tracing::debug!(error = %err, "lending command refused"))?;
        for event in &events {
            self.publish(event);
        }
        Ok(events)
    }

    fn publish(&mut self, event: &LendingEvent) {
        match event {
            LendingEvent::LoanOpened(e) => {
                let message = format!("Item borrowed: {}", self.title_of(e.item_id));
                self.notify(NotificationCategory::Borrow, message);
            }
            LendingEvent::ReservationReady(e) => {
                let patron = self
                    .patrons
                    .get(e.patron_id)
                    .map(|p| p.name().to_string())
                    .unwrap_or_else(|| format!("patron {}", e.patron_id));
                let message = format!(
                    "Reserved item '{}' is now available for {}",
                    self.title_of(e.item_id),
                    patron
                );
                self.notify(NotificationCategory::Available, message);
            }
            LendingEvent::LoanReturned(_)
            | LendingEvent::LoanRenewed(_)
            | LendingEvent::ReservationPlaced(_)
            | LendingEvent::ReservationDeactivated(_) => {}
        }
    }

    fn title_of(&self, item_id: ItemId) -> String {
        self.catalog
            .get(item_id)
            .map(|e| e.title().to_string())
            .unwrap_or_else(|| format!("item {item_id}"))
    }

    fn notify(&mut self, category: NotificationCategory, message: String) {
        let today = self.today();
        self.notifications
            .publish(Notification::new(category, message, today));
    }

    fn require_loan(&self, loan_id: LoanId) -> DomainResult<Loan> {
        self.ledger
            .loan(loan_id)
            .cloned()
            .ok_or_else(|| loan_id.not_found())
    }
}
