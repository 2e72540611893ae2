//! Monotonic identifier sequences.

/// Process-local, monotonically increasing id generator.
///
/// Starts at 1 and never hands out the same value twice. Owned explicitly by
/// whoever creates records, so separate instances never share counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Sequence whose first allocation is `next` (clamped to at least 1).
    pub(crate) fn starting_at(next: u64) -> Self {
        Self { next: next.max(1) }
    }

    /// Allocate the next identifier.
    pub fn next_id<T: From<u64>>(&mut self) -> T {
        let id = self.peek_id();
        self.advance();
        id
    }

    /// The identifier the next allocation will return, without consuming it.
    ///
    /// Pair with [`IdSequence::advance`] once the record is actually created,
    /// so rejected operations do not burn identifiers.
    pub fn peek_id<T: From<u64>>(&self) -> T {
        T::from(self.next)
    }

    pub fn advance(&mut self) {
        self.next += 1;
    }

    /// Raw value the next allocation will return.
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{ItemId, LoanId};

    #[test]
    fn hands_out_increasing_ids_starting_at_one() {
        let mut seq = IdSequence::new();
        let a: ItemId = seq.next_id();
        let b: ItemId = seq.next_id();
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert_eq!(seq.peek(), 3);
    }

    #[test]
    fn independent_sequences_do_not_share_state() {
        let mut first = IdSequence::new();
        let mut second = IdSequence::new();
        let _: LoanId = first.next_id();
        let _: LoanId = first.next_id();
        let id: LoanId = second.next_id();
        assert_eq!(id.get(), 1);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut seq = IdSequence::new();
        let peeked: LoanId = seq.peek_id();
        let again: LoanId = seq.peek_id();
        assert_eq!(peeked, again);
        seq.advance();
        let next: LoanId = seq.next_id();
        assert_eq!(next.get(), 2);
    }

    #[test]
    fn starting_at_zero_is_clamped() {
        let mut seq = IdSequence::starting_at(0);
        let id: ItemId = seq.next_id();
        assert_eq!(id.get(), 1);
    }
}
