// habit/mod.rs — The habit model: date-set mutation, interpolated
// history, and consecutive-streak computation.
//
// One instance owns the in-memory date set and its `DateStore`. A single
// tokio mutex guards the set: mutating calls hold it across the whole
// read-compute-persist critical section so concurrent requests never
// lose updates, and readers never see a mid-mutation set.
//
// Rollback contract: a mutation builds a candidate set, persists it, and
// only then commits it to memory. A failed save leaves memory at the
// last state that actually reached disk.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::HabitError;
use crate::store::{DateStore, DATE_FORMAT};

/// One interpolated day: present in the range, flagged by whether the
/// habit was performed. Serialized as `{"date": "YYYY-MM-DD", "performed": bool}`.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub performed: bool,
}

/// Parse a boundary date string. Anything that is not a calendar date in
/// `YYYY-MM-DD` form is a validation error, distinct from storage faults.
pub fn parse_date(raw: &str) -> Result<NaiveDate, HabitError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| HabitError::InvalidDate(raw.to_string()))
}

pub struct HabitModel {
    store: DateStore,
    dates: Mutex<BTreeSet<NaiveDate>>,
}

impl HabitModel {
    /// Load the persisted date set and wrap it in a model. Called once at
    /// startup; a corrupt or unreadable file refuses to start rather than
    /// silently serving an empty habit.
    pub async fn load(store: DateStore) -> Result<Self, HabitError> {
        let dates = store.load().await?;
        info!(
            file = %store.path().display(),
            dates = dates.len(),
            "habit model loaded"
        );
        Ok(Self {
            store,
            dates: Mutex::new(dates),
        })
    }

    /// Validate the whole batch before touching anything. One malformed
    /// entry rejects the call atomically with no mutation.
    fn parse_batch(raw: &[String]) -> Result<Vec<NaiveDate>, HabitError> {
        raw.iter().map(|s| parse_date(s)).collect()
    }

    /// Insert each date not already present; duplicates (within the batch
    /// or against the set) are ignored. Returns the number of *new* dates.
    ///
    /// When nothing changed (empty input, all duplicates) the store is not
    /// touched at all.
    pub async fn add_dates(&self, raw: &[String]) -> Result<usize, HabitError> {
        let parsed = Self::parse_batch(raw)?;

        let mut guard = self.dates.lock().await;
        let mut next = guard.clone();
        let mut added = 0;
        for date in parsed {
            if next.insert(date) {
                added += 1;
            }
        }
        if added == 0 {
            return Ok(0);
        }

        self.store.save(&next).await?;
        *guard = next;
        info!(added, total = guard.len(), "habit dates added");
        Ok(added)
    }

    /// Remove each date if present; absent dates are ignored. Returns the
    /// number actually removed. Same persistence contract as `add_dates`.
    pub async fn delete_dates(&self, raw: &[String]) -> Result<usize, HabitError> {
        let parsed = Self::parse_batch(raw)?;

        let mut guard = self.dates.lock().await;
        let mut next = guard.clone();
        let mut deleted = 0;
        for date in parsed {
            if next.remove(&date) {
                deleted += 1;
            }
        }
        if deleted == 0 {
            return Ok(0);
        }

        self.store.save(&next).await?;
        *guard = next;
        info!(deleted, total = guard.len(), "habit dates deleted");
        Ok(deleted)
    }

    /// Interpolate the `count` consecutive days ending at `start`
    /// inclusive, oldest first, every day explicitly flagged. `count <= 0`
    /// is an empty history. The core imposes no upper bound on `count`;
    /// the HTTP layer enforces its own sanity limit.
    pub async fn history(&self, start: &str, count: i64) -> Result<Vec<HistoryEntry>, HabitError> {
        let start = parse_date(start)?;
        if count <= 0 {
            return Ok(Vec::new());
        }

        let span = (count - 1) as u64;
        let first = start.checked_sub_days(Days::new(span)).ok_or_else(|| {
            HabitError::InvalidRange(format!("count {count} reaches past the calendar start"))
        })?;

        let guard = self.dates.lock().await;
        let mut entries = Vec::with_capacity(count as usize);
        for offset in 0..count as u64 {
            // Cannot overflow: `first + span == start` is a valid date.
            let date = first
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| HabitError::Internal("date range overflow".to_string()))?;
            entries.push(HistoryEntry {
                date,
                performed: guard.contains(&date),
            });
        }
        Ok(entries)
    }

    /// Count consecutive performed days walking backward from `start`.
    /// The first missing day stops the walk; `start` itself absent is 0.
    /// Pure function of the current set and `start`.
    pub async fn streak(&self, start: &str) -> Result<u32, HabitError> {
        let start = parse_date(start)?;

        let guard = self.dates.lock().await;
        let mut streak = 0u32;
        let mut cursor = start;
        while guard.contains(&cursor) {
            streak += 1;
            match cursor.pred_opt() {
                Some(prev) => cursor = prev,
                // Calendar start is a store boundary; the walk ends there.
                None => break,
            }
        }
        Ok(streak)
    }

    /// Number of recorded dates. Used by the health endpoint.
    pub async fn date_count(&self) -> usize {
        self.dates.lock().await.len()
    }
}
