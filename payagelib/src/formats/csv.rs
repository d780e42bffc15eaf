//! CSV. Заголовки на входе:
//! * обязательства: id,counterparty,total_amount,paid_amount,due_date,grn_date,order_date,status
//! * платежи: id,order_id,counterparty,amount,status,due_date,payment_date
//! * партии склада: batch,item,quantity,expiry_date
//!
//! На выходе — сводка по корзинам (строка на корзину + итоговые строки) и напоминания.

use crate::{
    error::{PayageError, Result},
    model::{AgingSummary, StockBatch},
    reminders::Reminder,
    resolve::{ObligationRecord, PaymentRecord},
};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};

const DATE_FMT: &str = "%Y-%m-%d";

#[derive(serde::Deserialize)]
struct ObligationRow {
    id: String,
    counterparty: String,
    total_amount: String,
    paid_amount: Option<String>,
    due_date: Option<String>,
    grn_date: Option<String>,
    order_date: Option<String>,
    status: Option<String>,
}

#[derive(serde::Deserialize)]
struct PaymentRow {
    id: String,
    order_id: Option<String>,
    counterparty: String,
    amount: String,
    status: Option<String>,
    due_date: Option<String>,
    payment_date: Option<String>,
}

#[derive(serde::Deserialize)]
struct BatchRow {
    batch: String,
    item: String,
    quantity: String,
    expiry_date: String,
}

#[derive(serde::Serialize)]
struct SummaryOutRow<'a> {
    bucket: &'a str,
    amount: String,
    count: usize,
}

#[derive(serde::Serialize)]
struct ReminderOutRow<'a> {
    id: &'a str,
    counterparty: &'a str,
    due_date: String,
    pending_amount: String,
    urgency: String,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub(crate) fn parse_date(field: &str, s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FMT).map_err(|e| PayageError::Parse(format!("{field}: {e}")))
}

pub(crate) fn parse_opt_date(field: &str, v: Option<String>) -> Result<Option<NaiveDate>> {
    non_empty(v).map(|s| parse_date(field, &s)).transpose()
}

pub(crate) fn parse_amount(field: &str, s: &str) -> Result<Decimal> {
    let amount: Decimal = s
        .trim()
        .parse()
        .map_err(|e| PayageError::Parse(format!("{field}: {e}")))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PayageError::Parse(format!("{field}: negative amount {amount}")));
    }
    Ok(amount)
}

pub struct Csv;

impl crate::traits::ReadFormat<Vec<ObligationRecord>> for Csv {
    fn read<R: BufRead>(r: R) -> Result<Vec<ObligationRecord>> {
        let mut rdr = ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(r);
        let mut out = Vec::new();

        for rec in rdr.deserialize::<ObligationRow>() {
            let row = rec?;
            out.push(ObligationRecord {
                total_amount: parse_amount("total_amount", &row.total_amount)?,
                paid_amount: non_empty(row.paid_amount)
                    .map(|s| parse_amount("paid_amount", &s))
                    .transpose()?,
                due_date: parse_opt_date("due_date", row.due_date)?,
                grn_date: parse_opt_date("grn_date", row.grn_date)?,
                order_date: parse_opt_date("order_date", row.order_date)?,
                status: row.status.as_deref().unwrap_or("").parse()?,
                id: row.id,
                counterparty: row.counterparty,
            });
        }
        Ok(out)
    }
}

impl crate::traits::ReadFormat<Vec<PaymentRecord>> for Csv {
    fn read<R: BufRead>(r: R) -> Result<Vec<PaymentRecord>> {
        let mut rdr = ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(r);
        let mut out = Vec::new();

        for rec in rdr.deserialize::<PaymentRow>() {
            let row = rec?;
            out.push(PaymentRecord {
                amount: parse_amount("amount", &row.amount)?,
                status: row.status.as_deref().unwrap_or("").parse()?,
                due_date: parse_opt_date("due_date", row.due_date)?,
                payment_date: parse_opt_date("payment_date", row.payment_date)?,
                order_id: non_empty(row.order_id),
                id: row.id,
                counterparty: row.counterparty,
            });
        }
        Ok(out)
    }
}

impl crate::traits::ReadFormat<Vec<StockBatch>> for Csv {
    fn read<R: BufRead>(r: R) -> Result<Vec<StockBatch>> {
        let mut rdr = ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(r);
        let mut out = Vec::new();

        for rec in rdr.deserialize::<BatchRow>() {
            let row = rec?;
            out.push(StockBatch {
                quantity: row
                    .quantity
                    .parse()
                    .map_err(|e| PayageError::Parse(format!("quantity: {e}")))?,
                expiry_date: parse_date("expiry_date", &row.expiry_date)?,
                batch: row.batch,
                item: row.item,
            });
        }
        Ok(out)
    }
}

impl crate::traits::WriteFormat<AgingSummary> for Csv {
    fn write<W: Write>(mut w: W, s: &AgingSummary) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(&mut w);

        for b in &s.buckets {
            wrt.serialize(SummaryOutRow {
                bucket: &b.label,
                amount: b.amount.to_string(),
                count: b.count,
            })?;
        }
        wrt.serialize(SummaryOutRow {
            bucket: "total_overdue",
            amount: s.total_overdue.to_string(),
            count: s.overdue_count,
        })?;
        wrt.serialize(SummaryOutRow {
            bucket: "total_pending",
            amount: s.total_pending.to_string(),
            count: s.buckets.iter().map(|b| b.count).sum(),
        })?;
        wrt.flush()?;
        Ok(())
    }
}

impl crate::traits::WriteFormat<Vec<Reminder>> for Csv {
    fn write<W: Write>(mut w: W, list: &Vec<Reminder>) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(&mut w);

        for r in list {
            wrt.serialize(ReminderOutRow {
                id: &r.id,
                counterparty: &r.counterparty,
                due_date: r.due_date.format(DATE_FMT).to_string(),
                pending_amount: r.pending_amount.to_string(),
                urgency: r.urgency.describe(),
            })?;
        }
        wrt.flush()?;
        Ok(())
    }
}
