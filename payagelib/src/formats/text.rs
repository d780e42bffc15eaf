//! Текстовые таблицы для терминала. Только запись.

use crate::{
    error::Result,
    expiry::ExpiryReport,
    model::AgingSummary,
    reminders::Reminder,
};
use rust_decimal::Decimal;
use std::fmt::Write as FmtWrite;
use std::io::Write;

pub struct Text;

/// Доля от итога в процентах, один знак после запятой.
pub fn share(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (part / total * Decimal::ONE_HUNDRED).round_dp(1)
}

impl crate::traits::WriteFormat<AgingSummary> for Text {
    fn write<W: Write>(mut w: W, s: &AgingSummary) -> Result<()> {
        let mut out = String::new();
        let _ = writeln!(out, "Aging as of {}", s.reference_date.format("%Y-%m-%d"));
        let _ = writeln!(out, "{:<10} {:>14} {:>6} {:>7}", "bucket", "amount", "count", "share");
        for b in &s.buckets {
            let _ = writeln!(
                out,
                "{:<10} {:>14} {:>6} {:>6}%",
                b.label,
                b.amount.round_dp(2),
                b.count,
                share(b.amount, s.total_pending)
            );
        }
        let _ = writeln!(out, "total pending: {}", s.total_pending.round_dp(2));
        let _ = writeln!(
            out,
            "total overdue: {} ({} obligations, {} suppliers)",
            s.total_overdue.round_dp(2),
            s.overdue_count,
            s.distinct_overdue_counterparties
        );
        w.write_all(out.as_bytes())?;
        Ok(())
    }
}

impl crate::traits::WriteFormat<Vec<Reminder>> for Text {
    fn write<W: Write>(mut w: W, list: &Vec<Reminder>) -> Result<()> {
        let mut out = String::new();
        if list.is_empty() {
            let _ = writeln!(out, "No payments due.");
        }
        for r in list {
            let _ = writeln!(
                out,
                "{:<12} {:<24} {} {:>14}  {}",
                r.id,
                r.counterparty,
                r.due_date.format("%Y-%m-%d"),
                r.pending_amount.round_dp(2),
                r.urgency.describe()
            );
        }
        w.write_all(out.as_bytes())?;
        Ok(())
    }
}

impl crate::traits::WriteFormat<ExpiryReport> for Text {
    fn write<W: Write>(mut w: W, rep: &ExpiryReport) -> Result<()> {
        let mut out = String::new();
        let _ = writeln!(out, "Expiry as of {}", rep.reference_date.format("%Y-%m-%d"));
        for b in &rep.buckets {
            let _ = writeln!(out, "{:<10} {:>6} batches {:>8} units", b.label, b.batches, b.quantity);
        }
        for a in &rep.alerts {
            let _ = writeln!(
                out,
                "  {:<12} {:<24} {:>6}  {} ({})",
                a.batch,
                a.item,
                a.quantity,
                a.expiry_date.format("%Y-%m-%d"),
                a.bucket
            );
        }
        w.write_all(out.as_bytes())?;
        Ok(())
    }
}
