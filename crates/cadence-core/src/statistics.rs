//! Statistics aggregator: date-bucketed trends and CSV export.
//!
//! Everything here is computed directly from task records joined to their
//! plans. The `daily_logs` cache is only ever written from these results,
//! never read back by them.

use std::path::Path;

use jiff::{civil::Date, Span};
use log::debug;

use crate::{
    db::Database,
    error::{Result, TrackerError},
    execution::{Clock, SystemClock},
    models::{DailyStats, TrendSummary},
};

/// Column order of the exported file.
pub const EXPORT_HEADER: [&str; 5] = [
    "date",
    "scheduled_minutes",
    "actual_minutes",
    "avg_focus_level",
    "completion_rate",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Today's date in the system time zone.
pub fn local_today() -> Date {
    SystemClock.today()
}

/// First day included in a window of `window_days` ending on `today`.
pub fn window_start(today: Date, window_days: u32) -> Result<Date> {
    today
        .checked_sub(Span::new().days(i64::from(window_days)))
        .map_err(|e| TrackerError::invalid_input("days").with_reason(e.to_string()))
}

/// Per-day rollups for the trailing window, newest day first.
///
/// Days without records are absent rather than zero-filled.
pub fn daily_statistics(db: &Database, window_days: u32, today: Date) -> Result<Vec<DailyStats>> {
    let since = window_start(today, window_days)?;
    let days = db.daily_stats_between(since, today)?;
    debug!("Aggregated {} day(s) from {since} to {today}", days.len());
    Ok(days)
}

/// Window means, `None` when the window holds no records.
pub fn trend_summary(db: &Database, window_days: u32, today: Date) -> Result<Option<TrendSummary>> {
    let days = daily_statistics(db, window_days, today)?;
    Ok(TrendSummary::from_days(&days))
}

/// Serializes days as UTF-8 CSV with a byte-order mark.
///
/// # Examples
///
/// ```rust
/// use cadence_core::{models::DailyStats, statistics::export_csv};
/// use jiff::civil::date;
///
/// let day = DailyStats::from_counts(date(2026, 3, 14), 35, 32, 6.5, 2, 2);
/// let bytes = export_csv(&[day]).unwrap();
/// let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
/// assert_eq!(
///     text,
///     "date,scheduled_minutes,actual_minutes,avg_focus_level,completion_rate\n\
///      2026-03-14,35,32,6.50,100.00\n"
/// );
/// ```
pub fn export_csv(days: &[DailyStats]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());

    writer.write_record(EXPORT_HEADER).map_err(export_error)?;
    for day in days {
        writer
            .write_record([
                day.date.to_string(),
                day.scheduled_minutes.to_string(),
                day.actual_minutes.to_string(),
                format!("{:.2}", day.avg_focus_level),
                format!("{:.2}", day.completion_rate),
            ])
            .map_err(export_error)?;
    }

    writer.into_inner().map_err(|e| TrackerError::Export {
        message: e.to_string(),
    })
}

/// Aggregates the window and serializes it in one step.
pub fn export(db: &Database, window_days: u32, today: Date) -> Result<Vec<u8>> {
    export_csv(&daily_statistics(db, window_days, today)?)
}

/// Writes an export to `path`, returning the number of day rows.
pub fn export_to_file(db: &Database, window_days: u32, today: Date, path: &Path) -> Result<usize> {
    let days = daily_statistics(db, window_days, today)?;
    let bytes = export_csv(&days)?;
    std::fs::write(path, bytes).map_err(|e| TrackerError::FileSystem {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!("Exported {} day(s) to {}", days.len(), path.display());
    Ok(days.len())
}

/// `cadence_stats_YYYYMMDD.csv` for the given day.
pub fn default_export_file_name(today: Date) -> String {
    format!("cadence_stats_{}.csv", today.strftime("%Y%m%d"))
}

/// Rewrites the `daily_logs` cache for the window. Returns rows written.
pub fn refresh_daily_logs(db: &mut Database, window_days: u32, today: Date) -> Result<usize> {
    let days = daily_statistics(db, window_days, today)?;
    db.refresh_daily_logs(&days)
}

fn export_error(e: csv::Error) -> TrackerError {
    TrackerError::Export {
        message: e.to_string(),
    }
}
