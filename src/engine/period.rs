use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PeriodError {
    #[error("window start {start} is after end {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },

    #[error("invalid calendar month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("custom period needs both start and end")]
    MissingBounds,

    #[error("unknown period: {0}")]
    UnknownPeriod(String),
}

impl DateWindow {
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Monday to Sunday of the week before the one containing `today`.
    pub fn last_full_week(today: NaiveDate) -> Self {
        let this_monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        let start = this_monday - Duration::days(7);
        Self {
            start,
            end: this_monday - Duration::days(1),
        }
    }

    /// First to last day of the month before the one containing `today`.
    pub fn last_full_month(today: NaiveDate) -> Self {
        let first_of_this_month = today.with_day(1).unwrap_or(today);
        let end = first_of_this_month - Duration::days(1);
        Self {
            start: end.with_day(1).unwrap_or(end),
            end,
        }
    }

    pub fn calendar_month(year: i32, month: u32) -> Result<Self, PeriodError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or(PeriodError::InvalidMonth { year, month })?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .ok_or(PeriodError::InvalidMonth { year, month })?;
        Ok(Self {
            start,
            end: next - Duration::days(1),
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Period selector as it arrives from a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodPreset {
    Week,
    Month,
    Custom,
}

impl PeriodPreset {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "week" | "weekly" => Some(PeriodPreset::Week),
            "month" | "monthly" => Some(PeriodPreset::Month),
            "custom" => Some(PeriodPreset::Custom),
            _ => None,
        }
    }

    /// Resolve to a concrete window relative to `today`.
    pub fn window(
        &self,
        today: NaiveDate,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DateWindow, PeriodError> {
        match self {
            PeriodPreset::Week => Ok(DateWindow::last_full_week(today)),
            PeriodPreset::Month => Ok(DateWindow::last_full_month(today)),
            PeriodPreset::Custom => match (start, end) {
                (Some(s), Some(e)) => DateWindow::custom(s, e),
                _ => Err(PeriodError::MissingBounds),
            },
        }
    }
}

/// Resolve an optional `period` query value; absent means last full month.
pub fn resolve_window(
    period: Option<&str>,
    today: NaiveDate,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<DateWindow, PeriodError> {
    let preset = match period {
        None => {
            if start.is_some() || end.is_some() {
                PeriodPreset::Custom
            } else {
                PeriodPreset::Month
            }
        }
        Some(p) => PeriodPreset::from_api_str(p).ok_or_else(|| PeriodError::UnknownPeriod(p.to_string()))?,
    };
    preset.window(today, start, end)
}
