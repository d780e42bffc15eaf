//! Граница между сырыми выгрузками (заказы, платежи) и `Obligation`.
//!
//! Срок оплаты разрешается единообразно: `due_date → grn_date → order_date`.
//! Оплаченная сумма — колонка записи плюс завершённые платежи по заказу.

use crate::{
    error::PayageError,
    model::{Obligation, ObligationStatus},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

/// Заказ поставщику (или иная кредиторка) в том виде, как пришёл из выгрузки.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObligationRecord {
    pub id: String,
    pub counterparty: String,
    pub total_amount: Decimal,
    pub paid_amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub grn_date: Option<NaiveDate>,
    pub order_date: Option<NaiveDate>,
    pub status: ObligationStatus,
}

impl ObligationRecord {
    pub fn resolved_due_date(&self) -> Option<NaiveDate> {
        self.due_date.or(self.grn_date).or(self.order_date)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl FromStr for PaymentStatus {
    type Err = PayageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pending" | "scheduled" => Ok(PaymentStatus::Pending),
            "completed" | "paid" | "done" => Ok(PaymentStatus::Completed),
            "failed" | "cancelled" | "canceled" | "rejected" => Ok(PaymentStatus::Failed),
            other => Err(PayageError::Parse(format!("unknown payment status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRecord {
    pub id: String,
    pub order_id: Option<String>,
    pub counterparty: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub due_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
}

impl PaymentRecord {
    /// Отдельный (не привязанный к заказу) неоплаченный платёж — сам по себе обязательство.
    fn as_standalone(&self) -> Option<Obligation> {
        if self.order_id.is_some() || self.status != PaymentStatus::Pending {
            return None;
        }
        Some(Obligation {
            id: self.id.clone(),
            counterparty: self.counterparty.clone(),
            total_amount: self.amount,
            paid_amount: Decimal::ZERO,
            due_date: self.due_date.or(self.payment_date),
            status: ObligationStatus::Open,
        })
    }
}

impl From<&ObligationRecord> for Obligation {
    fn from(r: &ObligationRecord) -> Self {
        let paid = r.paid_amount.unwrap_or(Decimal::ZERO);
        Obligation {
            id: r.id.clone(),
            counterparty: r.counterparty.clone(),
            total_amount: r.total_amount,
            paid_amount: paid,
            due_date: r.resolved_due_date(),
            status: derive_status(r.status, r.total_amount, paid),
        }
    }
}

fn derive_status(declared: ObligationStatus, total: Decimal, paid: Decimal) -> ObligationStatus {
    if declared == ObligationStatus::Settled || (paid >= total && total > Decimal::ZERO) {
        ObligationStatus::Settled
    } else if paid > Decimal::ZERO {
        ObligationStatus::PartiallyPaid
    } else {
        declared
    }
}

/// Платежи с `order_id`, которому нет записи, в любом статусе.
pub fn unmatched_payments<'a>(records: &[ObligationRecord], payments: &'a [PaymentRecord]) -> Vec<&'a PaymentRecord> {
    let known: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
    payments
        .iter()
        .filter(|p| p.order_id.as_deref().is_some_and(|id| !known.contains(id)))
        .collect()
}

/// Собирает обязательства из заказов и журнала платежей.
///
/// Платежи без заказа и в статусе `Pending` становятся отдельными
/// обязательствами; платежи на неизвестный заказ пропускаются.
pub fn resolve_obligations(records: &[ObligationRecord], payments: &[PaymentRecord]) -> Vec<Obligation> {
    let mut settled_by_order: HashMap<&str, Decimal> = HashMap::new();
    for p in payments {
        let Some(order_id) = p.order_id.as_deref() else {
            continue;
        };
        if p.status == PaymentStatus::Completed {
            *settled_by_order.entry(order_id).or_insert(Decimal::ZERO) += p.amount;
        }
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
    let mut out = Vec::with_capacity(records.len());
    for r in records {
        if !seen.insert(r.id.as_str()) {
            tracing::warn!(id = %r.id, "duplicate record id; linked payments counted for each copy");
        }
        let extra = settled_by_order.get(r.id.as_str()).copied().unwrap_or(Decimal::ZERO);
        let mut ob = Obligation::from(r);
        if !extra.is_zero() {
            ob.paid_amount += extra;
            ob.status = derive_status(r.status, r.total_amount, ob.paid_amount);
        }
        if ob.due_date.is_none() {
            tracing::warn!(id = %r.id, "no due, GRN or order date; treated as not yet due");
        }
        out.push(ob);
    }

    for p in unmatched_payments(records, payments) {
        tracing::warn!(payment = %p.id, order_id = ?p.order_id, status = ?p.status, "payment references an unknown order; ignored");
    }

    out.extend(payments.iter().filter_map(PaymentRecord::as_standalone));
    out
}
