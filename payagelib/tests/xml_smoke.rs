use chrono::NaiveDate;
use payagelib::{
    error::PayageError,
    formats::xml::SimpleXml,
    model::ObligationStatus,
    resolve::{resolve_obligations, ObligationRecord},
    summarize,
    traits::{ReadFormat, WriteFormat},
};
use rust_decimal::Decimal;
use std::io::Cursor;

const LEDGER: &str = r#"<Ledger>
  <obligation>
    <id>PO-1</id>
    <counterparty>Acme Pharma</counterparty>
    <total_amount>1000.00</total_amount>
    <paid_amount>400.00</paid_amount>
    <due_date>2025-09-16</due_date>
    <status>partial</status>
  </obligation>
  <obligation>
    <id>PO-2</id>
    <counterparty>Beta Labs</counterparty>
    <total_amount>250.50</total_amount>
    <order_date>2025-10-20</order_date>
  </obligation>
</Ledger>"#;

#[test]
fn simple_xml_reads_ledger() {
    let recs: Vec<ObligationRecord> = SimpleXml::read(Cursor::new(LEDGER)).expect("read xml");
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].paid_amount, Some(Decimal::new(40000, 2)));
    assert_eq!(recs[0].status, ObligationStatus::PartiallyPaid);
    assert_eq!(recs[1].due_date, None);
    assert_eq!(recs[1].resolved_due_date(), NaiveDate::from_ymd_opt(2025, 10, 20));
    assert_eq!(recs[1].status, ObligationStatus::Open);
}

#[test]
fn simple_xml_writes_summary() {
    let recs: Vec<ObligationRecord> = SimpleXml::read(Cursor::new(LEDGER)).expect("read xml");
    let s = summarize(&resolve_obligations(&recs, &[]), NaiveDate::from_ymd_opt(2025, 10, 31).unwrap());
    assert_eq!(s.bucket("31-60").unwrap().amount, Decimal::new(600, 0));
    assert_eq!(s.bucket("1-30").unwrap().amount, Decimal::new(25050, 2));

    let mut out = Vec::new();
    SimpleXml::write(&mut out, &s).expect("write simple xml");
    let xml = String::from_utf8(out).unwrap();
    assert!(xml.starts_with("<AgingSummary>"));
    assert!(xml.contains("<reference_date>2025-10-31</reference_date>"));
    assert!(xml.contains("<label>31-60</label>"));
    assert!(xml.contains("<overdue_count>2</overdue_count>"));
}

fn one_total(total: &str) -> String {
    format!(
        "<Ledger><obligation><id>PO-9</id><counterparty>Acme</counterparty><total_amount>{total}</total_amount></obligation></Ledger>"
    )
}

#[test]
fn simple_xml_rejects_negative_total() {
    let res: Result<Vec<ObligationRecord>, PayageError> = SimpleXml::read(Cursor::new(one_total("-5.00")));
    match res {
        Err(PayageError::Parse(msg)) => assert!(msg.contains("total_amount"), "{msg}"),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn simple_xml_names_field_of_malformed_total() {
    let res: Result<Vec<ObligationRecord>, PayageError> = SimpleXml::read(Cursor::new(one_total("12,5x")));
    assert!(matches!(res, Err(PayageError::Parse(ref msg)) if msg.starts_with("total_amount")));
}
