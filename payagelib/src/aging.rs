//! Расчёт задолженности по срокам просрочки (aging).
//!
//! Корзины задаются границами `BucketBounds`; по умолчанию это
//! current / 1-30 / 31-60 / 61-90 / 91-120 / 120+.

use crate::{
    error::{PayageError, Result},
    model::{AgingBucket, AgingSummary, DayRange, Obligation},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Разница в календарных днях: положительная — `reference` позже `date`.
pub fn days_between(date: NaiveDate, reference: NaiveDate) -> i64 {
    reference.signed_duration_since(date).num_days()
}

/// Строго возрастающие положительные верхние границы корзин.
///
/// `n` границ дают `n + 2` корзины: `Current` (`days <= 0`), `n` закрытых
/// диапазонов и хвост `Over` после последней границы.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketBounds {
    upper: Vec<i64>,
}

impl BucketBounds {
    pub const AGING: [i64; 4] = [30, 60, 90, 120];
    /// Сто лет; дальше корзины смысла не имеют.
    pub const MAX_DAYS: i64 = 36_500;

    pub fn new(upper: Vec<i64>) -> Result<Self> {
        if upper.is_empty() {
            return Err(PayageError::InvalidBuckets("no bounds given".into()));
        }
        if upper[0] <= 0 {
            return Err(PayageError::InvalidBuckets(format!(
                "first bound must be positive, got {}",
                upper[0]
            )));
        }
        if let Some(&b) = upper.iter().find(|&&b| b > Self::MAX_DAYS) {
            return Err(PayageError::InvalidBuckets(format!(
                "bound {b} exceeds {} days",
                Self::MAX_DAYS
            )));
        }
        if let Some(w) = upper.windows(2).find(|w| w[0] >= w[1]) {
            return Err(PayageError::InvalidBuckets(format!(
                "bounds must increase: {} then {}",
                w[0], w[1]
            )));
        }
        Ok(BucketBounds { upper })
    }

    pub fn aging() -> Self {
        BucketBounds {
            upper: Self::AGING.to_vec(),
        }
    }

    pub fn upper(&self) -> &[i64] {
        &self.upper
    }

    pub fn bucket_count(&self) -> usize {
        self.upper.len() + 2
    }

    pub fn ranges(&self) -> Vec<DayRange> {
        let mut out = Vec::with_capacity(self.bucket_count());
        out.push(DayRange::Current);
        let mut from = 1;
        for &to in &self.upper {
            out.push(DayRange::Between { from, to });
            from = to + 1;
        }
        // upper непустой — проверено в new()
        out.push(DayRange::Over {
            after: from - 1,
        });
        out
    }

    /// Индекс корзины для заданного числа дней.
    pub fn index_of(&self, days: i64) -> usize {
        if days <= 0 {
            return 0;
        }
        // первая граница, не меньшая days; иначе хвост
        self.upper.partition_point(|&b| b < days) + 1
    }
}

impl Default for BucketBounds {
    fn default() -> Self {
        Self::aging()
    }
}

/// Агрегатор дебиторской/кредиторской задолженности по срокам.
#[derive(Debug, Clone, Default)]
pub struct AgingCalculator {
    bounds: BucketBounds,
}

impl AgingCalculator {
    pub fn new(bounds: BucketBounds) -> Self {
        AgingCalculator { bounds }
    }

    pub fn bounds(&self) -> &BucketBounds {
        &self.bounds
    }

    /// Один проход по обязательствам. Порядок входа на результат не влияет.
    pub fn summarize(&self, obligations: &[Obligation], reference_date: NaiveDate) -> AgingSummary {
        let mut buckets: Vec<AgingBucket> = self
            .bounds
            .ranges()
            .into_iter()
            .map(AgingBucket::empty)
            .collect();
        let mut total_overdue = Decimal::ZERO;
        let mut overdue_count = 0usize;
        let mut overdue_parties: BTreeSet<&str> = BTreeSet::new();

        for ob in obligations {
            if ob.is_settled() {
                tracing::trace!(id = %ob.id, "skip settled obligation");
                continue;
            }
            let pending = ob.pending_amount();
            if pending.is_zero() {
                tracing::trace!(id = %ob.id, "skip obligation with nothing pending");
                continue;
            }

            // без срока — считаем ещё не наступившим
            let days = ob
                .due_date
                .map(|d| days_between(d, reference_date))
                .unwrap_or(0);
            let idx = self.bounds.index_of(days);

            let bucket = &mut buckets[idx];
            bucket.amount += pending;
            bucket.count += 1;

            if idx != 0 {
                total_overdue += pending;
                overdue_count += 1;
                overdue_parties.insert(ob.counterparty.as_str());
            }
        }

        let total_pending: Decimal = buckets.iter().map(|b| b.amount).sum();

        tracing::debug!(
            %reference_date,
            %total_pending,
            %total_overdue,
            overdue_count,
            "aging summary computed"
        );

        AgingSummary {
            reference_date,
            buckets,
            total_pending,
            total_overdue,
            overdue_count,
            distinct_overdue_counterparties: overdue_parties.len(),
        }
    }
}

/// Сводка с корзинами по умолчанию.
pub fn summarize(obligations: &[Obligation], reference_date: NaiveDate) -> AgingSummary {
    AgingCalculator::default().summarize(obligations, reference_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_of_respects_inclusive_upper_bounds() {
        let b = BucketBounds::aging();
        assert_eq!(b.index_of(-5), 0);
        assert_eq!(b.index_of(0), 0);
        assert_eq!(b.index_of(1), 1);
        assert_eq!(b.index_of(30), 1);
        assert_eq!(b.index_of(31), 2);
        assert_eq!(b.index_of(120), 4);
        assert_eq!(b.index_of(121), 5);
    }

    #[test]
    fn default_ranges_have_expected_labels() {
        let labels: Vec<String> = BucketBounds::aging().ranges().iter().map(|r| r.label()).collect();
        assert_eq!(labels, ["current", "1-30", "31-60", "61-90", "91-120", "120+"]);
    }

    #[test]
    fn bounds_must_be_positive_and_increasing() {
        assert!(BucketBounds::new(vec![]).is_err());
        assert!(BucketBounds::new(vec![0, 30]).is_err());
        assert!(BucketBounds::new(vec![30, 30]).is_err());
        assert!(BucketBounds::new(vec![60, 30]).is_err());
        assert!(BucketBounds::new(vec![7, 14]).is_ok());
    }

    #[test]
    fn huge_bound_is_rejected_instead_of_overflowing() {
        let err = BucketBounds::new(vec![30, i64::MAX]).unwrap_err();
        assert!(matches!(err, PayageError::InvalidBuckets(_)));
        assert!(BucketBounds::new(vec![30, BucketBounds::MAX_DAYS + 1]).is_err());

        let b = BucketBounds::new(vec![30, BucketBounds::MAX_DAYS]).unwrap();
        let last = b.ranges().last().copied().unwrap();
        assert_eq!(last, DayRange::Over { after: BucketBounds::MAX_DAYS });
    }
}
