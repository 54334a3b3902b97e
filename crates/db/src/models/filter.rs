//! Shared filter building blocks: sort direction, pagination clamping, and
//! the inclusive date-range convention used by the list endpoints.

use chrono::{Days, NaiveDate, NaiveTime};
use serde::Deserialize;

use helpdesk_core::types::Timestamp;

/// Default page size for filtered list endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// Upper bound on page size. The caller may ask for less, never more.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sort direction; anything other than `desc` sorts ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a direction string. Only `"desc"` (case-insensitive) selects
    /// descending; everything else, including `None`, is ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Clamp a 1-based page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamp a page size into `1..=MAX_PAGE_SIZE`, defaulting when absent.
pub fn clamp_page_size(page_size: Option<i64>) -> i64 {
    page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Lower bound for a `from_date` filter: midnight UTC of that day.
pub fn range_start(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Exclusive upper bound for a `to_date` filter: midnight UTC of the
/// following day, so the entire `to_date` day is included.
pub fn range_end_exclusive(date: NaiveDate) -> Timestamp {
    date.checked_add_days(Days::new(1))
        .unwrap_or(NaiveDate::MAX)
        .and_time(NaiveTime::MIN)
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_defaults_to_asc() {
        assert_eq!(SortDirection::parse(None), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("ASC")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("garbage")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("DESC")), SortDirection::Desc);
    }

    #[test]
    fn page_and_size_are_clamped() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(3)), 3);
        assert_eq!(clamp_page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(Some(0)), 1);
        assert_eq!(clamp_page_size(Some(10_000)), MAX_PAGE_SIZE);
    }

    #[test]
    fn to_date_covers_entire_day() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let end = range_end_exclusive(day);
        assert_eq!(end.date_naive(), day.succ_opt().unwrap());
    }
}
