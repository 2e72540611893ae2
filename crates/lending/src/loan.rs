use serde::{Deserialize, Serialize};

use libris_core::{CalendarDate, Entity, ItemId, LoanId, PatronId, Record, flag};

/// One lending of one item to one patron.
///
/// Loans are permanent history: returning closes a loan but never deletes it.
/// Once `returned` is set, the due and return dates no longer change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    id: LoanId,
    patron_id: PatronId,
    item_id: ItemId,
    borrowed_on: CalendarDate,
    due_on: CalendarDate,
    returned_on: Option<CalendarDate>,
    returned: bool,
}

impl Loan {
    pub(crate) fn open(
        id: LoanId,
        patron_id: PatronId,
        item_id: ItemId,
        borrowed_on: CalendarDate,
        due_on: CalendarDate,
    ) -> Self {
        Self {
            id,
            patron_id,
            item_id,
            borrowed_on,
            due_on,
            returned_on: None,
            returned: false,
        }
    }

    pub fn patron_id(&self) -> PatronId {
        self.patron_id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn borrowed_on(&self) -> CalendarDate {
        self.borrowed_on
    }

    pub fn due_on(&self) -> CalendarDate {
        self.due_on
    }

    pub fn returned_on(&self) -> Option<CalendarDate> {
        self.returned_on
    }

    pub fn is_returned(&self) -> bool {
        self.returned
    }

    /// Open and past its due date.
    pub fn is_overdue(&self, today: CalendarDate) -> bool {
        !self.returned && self.due_on.is_overdue(&today)
    }

    pub fn describe(&self, today: CalendarDate) -> String {
        let mut text = format!(
            "Loan ID: {}, Patron ID: {}, Item ID: {}, Borrowed: {}, Due: {}, Returned: {}",
            self.id,
            self.patron_id,
            self.item_id,
            self.borrowed_on,
            self.due_on,
            match self.returned_on {
                Some(date) => date.to_string(),
                None => "No".to_string(),
            }
        );
        if self.is_overdue(today) {
            text.push_str(" (OVERDUE)");
        }
        text
    }

    pub(crate) fn close(&mut self, returned_on: CalendarDate) {
        self.returned = true;
        self.returned_on = Some(returned_on);
    }

    pub(crate) fn extend_to(&mut self, due_on: CalendarDate) {
        self.due_on = due_on;
    }
}

impl Entity for Loan {
    type Id = LoanId;

    fn id(&self) -> LoanId {
        self.id
    }
}

impl Record for Loan {
    fn to_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.patron_id.to_string(),
            self.item_id.to_string(),
            self.borrowed_on.to_string(),
            self.due_on.to_string(),
            self.returned_on.map(|d| d.to_string()).unwrap_or_default(),
            flag(self.returned),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan() -> Loan {
        Loan::open(
            LoanId::new(1),
            PatronId::new(2),
            ItemId::new(3),
            CalendarDate::new(1, 5, 2024),
            CalendarDate::new(15, 5, 2024),
        )
    }

    #[test]
    fn open_loan_is_overdue_only_after_due_date() {
        let loan = loan();
        assert!(!loan.is_overdue(CalendarDate::new(15, 5, 2024)));
        assert!(loan.is_overdue(CalendarDate::new(16, 5, 2024)));
        assert!(loan.describe(CalendarDate::new(16, 5, 2024)).ends_with("(OVERDUE)"));
    }

    #[test]
    fn returned_loan_is_never_overdue() {
        let mut loan = loan();
        loan.close(CalendarDate::new(20, 5, 2024));
        assert!(!loan.is_overdue(CalendarDate::new(1, 1, 2030)));
        assert_eq!(loan.returned_on(), Some(CalendarDate::new(20, 5, 2024)));
    }

    #[test]
    fn record_has_empty_return_date_while_open() {
        let mut loan = loan();
        assert_eq!(
            loan.to_record(),
            vec!["1", "2", "3", "1/5/2024", "15/5/2024", "", "0"]
        );
        loan.close(CalendarDate::new(10, 5, 2024));
        assert_eq!(loan.to_record()[5..], ["10/5/2024".to_string(), "1".to_string()]);
    }
}
