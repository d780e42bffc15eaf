//! Сроки годности партий: просроченные и истекающие в пределах границ.

use crate::{
    aging::{days_between, BucketBounds},
    error::Result,
    model::{DayRange, StockBatch},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpiryBucket {
    pub label: String,
    pub range: DayRange,
    pub batches: usize,
    pub quantity: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpiryAlert {
    pub batch: String,
    pub item: String,
    pub quantity: u32,
    pub expiry_date: NaiveDate,
    pub days_left: i64,
    pub bucket: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpiryReport {
    pub reference_date: NaiveDate,
    /// Первая — `expired`, хвост после последней границы не включается.
    pub buckets: Vec<ExpiryBucket>,
    pub alerts: Vec<ExpiryAlert>,
}

impl ExpiryReport {
    pub fn expired(&self) -> &ExpiryBucket {
        &self.buckets[0]
    }
}

pub const EXPIRY_BOUNDS: [i64; 3] = [30, 60, 90];

pub fn default_bounds() -> Result<BucketBounds> {
    BucketBounds::new(EXPIRY_BOUNDS.to_vec())
}

pub fn expiry_alerts(batches: &[StockBatch], reference_date: NaiveDate, bounds: &BucketBounds) -> ExpiryReport {
    let ranges = bounds.ranges();
    // хвост Over — за горизонтом, не алертим
    let tracked = ranges.len() - 1;
    let mut buckets: Vec<ExpiryBucket> = ranges[..tracked]
        .iter()
        .map(|r| ExpiryBucket {
            label: match r {
                DayRange::Current => "expired".to_string(),
                other => other.label(),
            },
            range: *r,
            batches: 0,
            quantity: 0,
        })
        .collect();

    let mut alerts = Vec::new();
    for b in batches.iter().filter(|b| b.quantity > 0) {
        let days_left = days_between(reference_date, b.expiry_date);
        let idx = bounds.index_of(days_left);
        if idx >= tracked {
            continue;
        }
        let bucket = &mut buckets[idx];
        bucket.batches += 1;
        bucket.quantity += u64::from(b.quantity);
        alerts.push(ExpiryAlert {
            batch: b.batch.clone(),
            item: b.item.clone(),
            quantity: b.quantity,
            expiry_date: b.expiry_date,
            days_left,
            bucket: bucket.label.clone(),
        });
    }
    alerts.sort_by(|a, b| a.expiry_date.cmp(&b.expiry_date).then_with(|| a.batch.cmp(&b.batch)));

    tracing::debug!(alerts = alerts.len(), %reference_date, "expiry alerts built");
    ExpiryReport {
        reference_date,
        buckets,
        alerts,
    }
}
