//! Напоминания об оплате: просроченные, на сегодня и в ближайшие дни.

use crate::{
    aging::days_between,
    error::{PayageError, Result},
    model::Obligation,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Urgency {
    Overdue { days: i64 },
    DueToday,
    DueSoon { days: i64 },
}

impl Urgency {
    pub fn describe(&self) -> String {
        match *self {
            Urgency::Overdue { days } => format!("overdue {days}d"),
            Urgency::DueToday => "due today".to_string(),
            Urgency::DueSoon { days } => format!("due in {days}d"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    pub id: String,
    pub counterparty: String,
    pub due_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub pending_amount: Decimal,
    pub urgency: Urgency,
}

/// Обязательства без срока или с нулевым остатком не напоминаются.
/// Сортировка: по сроку, затем по id.
pub fn reminders(obligations: &[Obligation], reference_date: NaiveDate, window_days: i64) -> Result<Vec<Reminder>> {
    if window_days < 0 {
        return Err(PayageError::InvalidWindow(window_days));
    }

    let mut out: Vec<Reminder> = obligations
        .iter()
        .filter(|o| !o.is_settled())
        .filter_map(|o| {
            let due = o.due_date?;
            let pending = o.pending_amount();
            if pending.is_zero() {
                return None;
            }
            let until = days_between(reference_date, due);
            let urgency = match until {
                d if d < 0 => Urgency::Overdue { days: -d },
                0 => Urgency::DueToday,
                d if d <= window_days => Urgency::DueSoon { days: d },
                _ => return None,
            };
            Some(Reminder {
                id: o.id.clone(),
                counterparty: o.counterparty.clone(),
                due_date: due,
                pending_amount: pending,
                urgency,
            })
        })
        .collect();

    out.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));
    tracing::debug!(count = out.len(), window_days, "payment reminders built");
    Ok(out)
}
