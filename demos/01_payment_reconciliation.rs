/// charge issuance and webhook-style reconciliation against a repository
use chrono::{NaiveDate, TimeZone, Utc};
use loan_servicing_rs::{
    ChargeIssuer, ChargeRequest, Client, EventStore, Loan, LoanRepository, MemoryRepository,
    Money, PaymentCodeBuilder, PaymentNotification, Reconciler, SafeTimeProvider, TaxId,
    TimeSource,
};

/// stand-in for the banking vendor's payment-code format
struct DemoCodeBuilder;

impl PaymentCodeBuilder for DemoCodeBuilder {
    fn payment_code(&self, charge: &ChargeRequest) -> String {
        format!("PAY-{}-{}", charge.charge_id, charge.amount_due)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap(),
    ));
    let mut events = EventStore::new();

    // seed the repository with one client, one overdue installment
    let tax_id = TaxId::new("98765432100")?;
    let mut client = Client::new(tax_id.clone(), "Carlos Lima");
    client.loans.push(Loan::schedule(
        Money::from_str_exact("1573.20")?,
        1,
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    )?);
    let loan_id = client.loans[0].id;

    // issue a charge: 10 days overdue at 1%/day -> 1730.52
    let issuer = ChargeIssuer::default();
    let installment = client.installment_mut(loan_id, 1)?;
    let issued = issuer.issue(installment, &DemoCodeBuilder, &time, &mut events);
    println!("charge {} for {}: {}", issued.charge_id, issued.amount_due, issued.payment_code);

    let mut repo = MemoryRepository::new();
    repo.save_client(&client)?;

    // webhook delivers a batch; the short payment and the unknown charge
    // are logged and skipped, the sufficient one settles
    let reconciler = Reconciler::default();
    let batch = vec![
        PaymentNotification {
            charge_id: issued.charge_id.clone(),
            amount_received: Money::from_str_exact("1600.00")?,
            end_to_end_id: Some("E2E404".to_string()),
        },
        PaymentNotification {
            charge_id: issued.charge_id.clone(),
            amount_received: Money::from_str_exact("1650.00")?,
            end_to_end_id: Some("E2E405".to_string()),
        },
    ];
    for result in reconciler.reconcile_batch(&batch, &mut repo, &time, &mut events) {
        println!("outcome: {result:?}");
    }

    // redelivery of the settled notification is a no-op
    let redelivered = reconciler.reconcile(&batch[1], &mut repo, &time, &mut events)?;
    println!("redelivery: {redelivered:?}");

    for event in events.take_events() {
        println!("event: {event:?}");
    }

    Ok(())
}
