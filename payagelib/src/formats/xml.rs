//! Простой XML: <Ledger><obligation>...</obligation></Ledger> на входе,
//! <AgingSummary>...</AgingSummary> на выходе.

use crate::{
    error::{PayageError, Result},
    model::{AgingSummary, ObligationStatus},
    resolve::ObligationRecord,
};
use quick_xml::{de::from_reader, se::to_string};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

use super::csv::{parse_amount, parse_opt_date};

#[derive(Deserialize, Debug)]
struct XmlObligation {
    id: String,
    counterparty: String,
    total_amount: String,
    #[serde(default)]
    paid_amount: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    grn_date: Option<String>,
    #[serde(default)]
    order_date: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize, Debug)]
struct XmlLedger {
    #[serde(rename = "obligation", default)]
    obligations: Vec<XmlObligation>,
}

#[derive(Serialize, Debug)]
struct XmlBucket {
    label: String,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    count: usize,
}

#[derive(Serialize, Debug)]
struct XmlBuckets {
    bucket: Vec<XmlBucket>,
}

#[derive(Serialize, Debug)]
#[serde(rename = "AgingSummary")]
struct XmlSummary {
    reference_date: String,
    buckets: XmlBuckets,
    #[serde(with = "rust_decimal::serde::str")]
    total_pending: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    total_overdue: Decimal,
    overdue_count: usize,
    distinct_overdue_counterparties: usize,
}

pub struct SimpleXml;

impl crate::traits::ReadFormat<Vec<ObligationRecord>> for SimpleXml {
    fn read<R: BufRead>(r: R) -> Result<Vec<ObligationRecord>> {
        let x: XmlLedger = from_reader(r).map_err(|e| PayageError::Xml(format!("{e}")))?;

        let mut out = Vec::with_capacity(x.obligations.len());
        for o in x.obligations {
            let paid_amount = match o.paid_amount.as_deref().map(str::trim) {
                Some(s) if !s.is_empty() => Some(parse_amount("paid_amount", s)?),
                _ => None,
            };
            let total_amount = parse_amount("total_amount", &o.total_amount)?;
            let status: ObligationStatus = o.status.as_deref().unwrap_or("").parse()?;

            out.push(ObligationRecord {
                id: o.id,
                counterparty: o.counterparty,
                total_amount,
                paid_amount,
                due_date: parse_opt_date("due_date", o.due_date)?,
                grn_date: parse_opt_date("grn_date", o.grn_date)?,
                order_date: parse_opt_date("order_date", o.order_date)?,
                status,
            });
        }
        Ok(out)
    }
}

impl crate::traits::WriteFormat<AgingSummary> for SimpleXml {
    fn write<W: Write>(mut w: W, s: &AgingSummary) -> Result<()> {
        let x = XmlSummary {
            reference_date: s.reference_date.format("%Y-%m-%d").to_string(),
            buckets: XmlBuckets {
                bucket: s
                    .buckets
                    .iter()
                    .map(|b| XmlBucket {
                        label: b.label.clone(),
                        amount: b.amount,
                        count: b.count,
                    })
                    .collect(),
            },
            total_pending: s.total_pending,
            total_overdue: s.total_overdue,
            overdue_count: s.overdue_count,
            distinct_overdue_counterparties: s.distinct_overdue_counterparties,
        };

        let out = to_string(&x).map_err(|e| PayageError::Xml(format!("{e}")))?;
        w.write_all(out.as_bytes())?;
        Ok(())
    }
}
