//! Lending domain module.
//!
//! Loans, reservations and the ledger that enforces the borrow / return /
//! renew / reserve state machine. Pure domain logic: no IO, no clock reads.

pub mod ledger;
pub mod loan;
pub mod policy;
pub mod reservation;

pub use ledger::{
    BorrowItem, CancelReservation, DeactivationReason, Ledger, LendingCommand, LendingEvent,
    LoanOpened, LoanRenewed, LoanReturned, PlaceReservation, RenewLoan, ReservationDeactivated,
    ReservationPlaced, ReservationReady, ReturnItem,
};
pub use loan::Loan;
pub use policy::{FulfillmentPolicy, LendingPolicy, MAX_PERIOD_DAYS};
pub use reservation::Reservation;
