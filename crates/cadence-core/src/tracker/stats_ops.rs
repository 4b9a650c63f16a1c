//! Statistics operations for the Tracker.

use std::path::PathBuf;

use jiff::civil::Date;

use super::Tracker;
use crate::{
    display::DailyStatsTable,
    error::Result,
    models::{DailyLog, TrendSummary},
    params::{AnnotateDay, StatsWindow},
    execution::Clock,
    statistics,
};

impl Tracker {
    /// Per-day rollups for the window ending today, newest first.
    pub async fn daily_statistics(&self, params: &StatsWindow) -> Result<DailyStatsTable> {
        let (days, today) = (params.days, self.clock.today());
        self.with_database(move |db| statistics::daily_statistics(db, days, today))
            .await
            .map(DailyStatsTable)
    }

    /// Window means, `None` when the window is empty.
    pub async fn trend_summary(&self, params: &StatsWindow) -> Result<Option<TrendSummary>> {
        let (days, today) = (params.days, self.clock.today());
        self.with_database(move |db| statistics::trend_summary(db, days, today))
            .await
    }

    /// CSV export of the window as bytes.
    pub async fn export_statistics(&self, params: &StatsWindow) -> Result<Vec<u8>> {
        let (days, today) = (params.days, self.clock.today());
        self.with_database(move |db| statistics::export(db, days, today))
            .await
    }

    /// Writes the CSV export to `path`, returning the number of day rows.
    pub async fn export_statistics_to(&self, params: &StatsWindow, path: PathBuf) -> Result<usize> {
        let (days, today) = (params.days, self.clock.today());
        self.with_database(move |db| statistics::export_to_file(db, days, today, &path))
        .await
    }

    /// Rewrites the `daily_logs` cache for the window.
    pub async fn refresh_daily_logs(&self, params: &StatsWindow) -> Result<usize> {
        let (days, today) = (params.days, self.clock.today());
        self.with_database(move |db| statistics::refresh_daily_logs(db, days, today))
            .await
    }

    /// Sets the journal note of a day (today by default).
    pub async fn annotate_day(&self, params: &AnnotateDay) -> Result<Date> {
        let date = params.date.unwrap_or_else(|| self.clock.today());
        let notes = params.notes.clone();
        self.with_database(move |db| db.annotate_day(date, &notes).map(|()| date))
            .await
    }

    /// Cached rollup of a day, if one was materialized.
    pub async fn daily_log(&self, date: Date) -> Result<Option<DailyLog>> {
        self.with_database(move |db| db.get_daily_log(date)).await
    }
}
