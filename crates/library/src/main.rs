use anyhow::{Context, bail};

use libris_core::Entity;
use libris_library::{
    Clock, DomainError, FixedClock, Library, LibraryConfig, NewItem, NewPatron, SystemClock,
};

fn main() -> anyhow::Result<()> {
    libris_observability::init();

    let config = LibraryConfig::from_env();
    let clock = FixedClock::new(SystemClock.today());
    let mut library = Library::with_clock(config, clock).context("invalid library configuration")?;

    let alice = library.add_patron(NewPatron::new("Alice", "alice@example.com", "Student"))?;
    let bob = library.add_patron(NewPatron::new("Bob", "bob@example.com", "Faculty"))?;
    let book = library.add_item(NewItem::book(
        "The Rust Programming Language",
        "Klabnik & Nichols",
        2019,
        "Programming",
        "978-1718500440",
        552,
    ))?;
    library.add_item(NewItem::digital(
        "Lending Systems Lecture",
        "Hopper",
        2021,
        "Lectures",
        "mp4",
        734.5,
    ))?;

    let first = library.borrow(alice, book)?;
    tracing::info!(loan = %first.describe(library.today()), "demo: first loan");

    library.reserve(bob, book)?;

    match library.renew(first.id()) {
        Err(DomainError::Conflict(reason)) => {
            tracing::info!(%reason, "demo: renewal refused while a reservation waits")
        }
        Ok(_) => bail!("renewal should be refused while {book} is reserved"),
        Err(other) => return Err(other.into()),
    }

    let receipt = library.return_item(first.id())?;
    tracing::info!(notified = ?receipt.notified_patron.map(|p| p.get()), "demo: returned");

    let second = library.borrow(bob, book)?;
    library.clock_mut().advance(config.lending.loan_period_days + 1)?;
    let today = library.today();
    let overdue = library.check_overdue_items(today);
    tracing::info!(
        count = overdue.len(),
        loan = %second.describe(today),
        "demo: overdue check"
    );

    let snapshot = library.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
