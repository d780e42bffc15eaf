use chrono::NaiveDate;
use payagelib::{
    error::PayageError,
    expiry::{default_bounds, expiry_alerts},
    model::{Obligation, ObligationStatus, StockBatch},
    reminders::{reminders, Urgency},
    BucketBounds,
};
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn ob(id: &str, due: Option<NaiveDate>, total: i64) -> Obligation {
    Obligation {
        id: id.into(),
        counterparty: "Acme".into(),
        total_amount: Decimal::new(total, 0),
        paid_amount: Decimal::ZERO,
        due_date: due,
        status: ObligationStatus::Open,
    }
}

fn batch(id: &str, qty: u32, expiry: NaiveDate) -> StockBatch {
    StockBatch {
        batch: id.into(),
        item: "Amoxicillin 500mg".into(),
        quantity: qty,
        expiry_date: expiry,
    }
}

#[test]
fn reminders_classify_and_sort_by_due_date() {
    let today = d(2025, 10, 10);
    let list = reminders(
        &[
            ob("soon", Some(d(2025, 10, 15)), 10),
            ob("late", Some(d(2025, 10, 1)), 10),
            ob("today", Some(today), 10),
            ob("far", Some(d(2025, 11, 30)), 10),
            ob("undated", None, 10),
            ob("zero", Some(d(2025, 10, 2)), 0),
        ],
        today,
        7,
    )
    .unwrap();

    let ids: Vec<&str> = list.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["late", "today", "soon"]);
    assert_eq!(list[0].urgency, Urgency::Overdue { days: 9 });
    assert_eq!(list[1].urgency, Urgency::DueToday);
    assert_eq!(list[2].urgency, Urgency::DueSoon { days: 5 });
}

#[test]
fn settled_obligations_are_not_reminded() {
    let mut o = ob("x", Some(d(2025, 10, 1)), 10);
    o.status = ObligationStatus::Settled;
    assert!(reminders(&[o], d(2025, 10, 10), 7).unwrap().is_empty());
}

#[test]
fn negative_window_is_rejected() {
    let err = reminders(&[], d(2025, 10, 10), -1).unwrap_err();
    assert!(matches!(err, PayageError::InvalidWindow(-1)));
}

#[test]
fn expiry_buckets_by_days_left() {
    let today = d(2025, 10, 1);
    let report = expiry_alerts(
        &[
            batch("B1", 10, d(2025, 9, 20)),
            batch("B2", 5, today),
            batch("B3", 7, d(2025, 10, 31)),
            batch("B4", 3, d(2025, 11, 15)),
            batch("B5", 9, d(2026, 6, 1)),
            batch("B6", 0, d(2025, 9, 1)),
        ],
        today,
        &default_bounds().unwrap(),
    );

    let labels: Vec<&str> = report.buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, ["expired", "1-30", "31-60", "61-90"]);
    assert_eq!(report.expired().batches, 2);
    assert_eq!(report.expired().quantity, 15);
    assert_eq!(report.buckets[1].batches, 1);
    assert_eq!(report.buckets[2].batches, 1);
    assert_eq!(report.buckets[3].batches, 0);

    let ids: Vec<&str> = report.alerts.iter().map(|a| a.batch.as_str()).collect();
    assert_eq!(ids, ["B1", "B2", "B3", "B4"]);
    assert_eq!(report.alerts[0].days_left, -11);
}

#[test]
fn expiry_with_custom_bounds() {
    let bounds = BucketBounds::new(vec![14]).unwrap();
    let report = expiry_alerts(&[batch("B1", 1, d(2025, 10, 10))], d(2025, 10, 1), &bounds);
    assert_eq!(report.buckets.len(), 2);
    assert_eq!(report.buckets[1].label, "1-14");
    assert_eq!(report.alerts[0].bucket, "1-14");
}
