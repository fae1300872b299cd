/// quick start - schedule a loan and watch penalty interest accrue
use chrono::{NaiveDate, TimeZone, Utc};
use loan_servicing_rs::{
    Client, EventStore, InterestEngine, Loan, Money, SafeTimeProvider, TaxId, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a client with a R$ 5,000 loan in 3 monthly installments
    let mut client = Client::new(TaxId::new("12345678901")?, "Maria Souza");
    client.loans.push(Loan::schedule(
        Money::from_major(5_000),
        3,
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
    )?);

    // evaluate the portfolio 20 days after the first due date
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
    ));
    let engine = InterestEngine::default();
    let mut events = EventStore::new();
    engine.refresh_client(&mut client, &time, &mut events);

    for installment in &client.loans[0].installments {
        println!(
            "installment {} due {}: {:?}, {} days overdue, owes {}",
            installment.number,
            installment.due_date,
            installment.status,
            installment.days_overdue,
            installment.current_amount(),
        );
    }

    for event in events.take_events() {
        println!("event: {event:?}");
    }

    Ok(())
}
