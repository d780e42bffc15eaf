//! Доменные модели — общий слой между форматами и расчётами.

use crate::error::PayageError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObligationStatus {
    Open,
    PartiallyPaid,
    Settled,
}

impl ObligationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ObligationStatus::Open => "open",
            ObligationStatus::PartiallyPaid => "partially_paid",
            ObligationStatus::Settled => "settled",
        }
    }
}

impl FromStr for ObligationStatus {
    type Err = PayageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "open" | "pending" | "unpaid" => Ok(ObligationStatus::Open),
            "partial" | "partially_paid" | "partially paid" => Ok(ObligationStatus::PartiallyPaid),
            "settled" | "paid" | "completed" => Ok(ObligationStatus::Settled),
            other => Err(PayageError::Parse(format!("unknown status: {other}"))),
        }
    }
}

/// Сумма к оплате контрагенту: заказ поставщику или отдельный платёж.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Obligation {
    pub id: String,
    pub counterparty: String,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    /// Уже разрешённый срок оплаты; `None` — дату установить не удалось.
    pub due_date: Option<NaiveDate>,
    pub status: ObligationStatus,
}

impl Obligation {
    /// Остаток к оплате, не меньше нуля (переплата даёт ноль).
    pub fn pending_amount(&self) -> Decimal {
        (self.total_amount - self.paid_amount).max(Decimal::ZERO)
    }

    pub fn is_settled(&self) -> bool {
        self.status == ObligationStatus::Settled
    }
}

/// Диапазон дней в корзине. Границы включительные.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayRange {
    /// `days <= 0`
    Current,
    /// `from <= days <= to`
    Between { from: i64, to: i64 },
    /// `days > after`
    Over { after: i64 },
}

impl DayRange {
    pub fn contains(&self, days: i64) -> bool {
        match *self {
            DayRange::Current => days <= 0,
            DayRange::Between { from, to } => from <= days && days <= to,
            DayRange::Over { after } => days > after,
        }
    }

    pub fn label(&self) -> String {
        match *self {
            DayRange::Current => "current".to_string(),
            DayRange::Between { from, to } => format!("{from}-{to}"),
            DayRange::Over { after } => format!("{after}+"),
        }
    }
}

impl fmt::Display for DayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgingBucket {
    pub label: String,
    pub range: DayRange,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub count: usize,
}

impl AgingBucket {
    pub fn empty(range: DayRange) -> Self {
        AgingBucket {
            label: range.label(),
            range,
            amount: Decimal::ZERO,
            count: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgingSummary {
    pub reference_date: NaiveDate,
    pub buckets: Vec<AgingBucket>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_pending: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_overdue: Decimal,
    pub overdue_count: usize,
    pub distinct_overdue_counterparties: usize,
}

impl AgingSummary {
    /// Корзина «ещё не просрочено»; всегда первая.
    pub fn current(&self) -> &AgingBucket {
        &self.buckets[0]
    }

    pub fn bucket(&self, label: &str) -> Option<&AgingBucket> {
        self.buckets.iter().find(|b| b.label == label)
    }

    pub fn overdue_buckets(&self) -> &[AgingBucket] {
        &self.buckets[1..]
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.count == 0)
    }
}

/// Партия товара аптечного склада.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockBatch {
    pub batch: String,
    pub item: String,
    pub quantity: u32,
    pub expiry_date: NaiveDate,
}
