// store/mod.rs — Flat-file persistence for the habit date set.
//
// The backing file is single-column CSV: one ISO `YYYY-MM-DD` date per
// line. Load tolerates blank lines and duplicate/out-of-order entries
// (the result is a set) but rejects anything that is not a date —
// corruption surfaces as a typed error, never as silently dropped rows.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::HabitError;

/// Wire/disk date format. Everything that crosses a boundary is a plain
/// calendar date in this shape.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Owns the durable copy of the date set.
///
/// Single-process, single-writer: there is no lock file or concurrent
/// writer arbitration. `HabitModel` serializes all access.
pub struct DateStore {
    path: PathBuf,
}

impl DateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every persisted date. A missing file is a first run and
    /// loads as an empty set; any malformed line fails the whole load.
    pub async fn load(&self) -> Result<BTreeSet<NaiveDate>, HabitError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(file = %self.path.display(), "no date file yet — starting empty");
                return Ok(BTreeSet::new());
            }
            Err(e) => return Err(HabitError::Storage(e)),
        };

        let mut dates = BTreeSet::new();
        for (idx, raw) in content.lines().enumerate() {
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }
            let date =
                NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| HabitError::Corrupt {
                    line: idx + 1,
                    value: value.to_string(),
                })?;
            dates.insert(date);
        }

        debug!(file = %self.path.display(), count = dates.len(), "date file loaded");
        Ok(dates)
    }

    /// Overwrite the backing file with the full set, ascending, one date
    /// per line. Writes a sibling temp file and renames it into place so
    /// an interrupted save never leaves a half-written file behind.
    pub async fn save(&self, dates: &BTreeSet<NaiveDate>) -> Result<(), HabitError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }

        let mut out = String::with_capacity(dates.len() * 11);
        for date in dates {
            out.push_str(&date.format(DATE_FORMAT).to_string());
            out.push('\n');
        }

        let tmp = self.path.with_extension("csv.tmp");
        tokio::fs::write(&tmp, out.as_bytes()).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(file = %self.path.display(), count = dates.len(), "date file saved");
        Ok(())
    }
}
