//! Query-parameter parsing for result listings.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::domain::test_run::ResultsFilter;

pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const CPID: &str = "cpid";
pub const PAGE: &str = "page";

/// Parameters accepted by the results listing.
pub const LIST_PARAMS: &[&str] = &[START_DATE, END_DATE, CPID, PAGE];

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Errors raised for malformed or unsupported listing parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unsupported query parameter `{0}`")]
    UnknownParameter(String),
    #[error("invalid date format for `{key}`: `{value}`")]
    InvalidDate { key: String, value: String },
    #[error("invalid dates: start_date {start} is later than end_date {end}")]
    InvertedRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    #[error("invalid page number: `{0}` is not an integer")]
    InvalidPage(String),
    #[error("cpid filter cannot be blank")]
    BlankCpid,
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// Parses a date bound. A bare date covers the whole day for the given bound.
fn parse_date(
    key: &str,
    value: &str,
    date_format: &str,
    bound: Bound,
) -> Result<NaiveDateTime, FilterError> {
    let value = value.trim();
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, date_format) {
        return Ok(parsed);
    }

    let invalid = || FilterError::InvalidDate {
        key: key.to_string(),
        value: value.to_string(),
    };
    let date = NaiveDate::parse_from_str(value, DATE_ONLY_FORMAT).map_err(|_| invalid())?;
    match bound {
        Bound::Start => Ok(date.and_time(NaiveTime::MIN)),
        // Stored timestamps carry nanoseconds.
        Bound::End => date
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(invalid),
    }
}

/// Builds a [`ResultsFilter`] from raw query parameters.
///
/// Keys outside `recognized` are rejected rather than ignored. Recognized keys
/// that are not filter dimensions (such as [`PAGE`]) are left to their own
/// parsers.
pub fn parse_filters(
    raw: &HashMap<String, String>,
    recognized: &[&str],
    date_format: &str,
) -> Result<ResultsFilter, FilterError> {
    let mut unknown: Vec<&String> = raw
        .keys()
        .filter(|key| !recognized.contains(&key.as_str()))
        .collect();
    unknown.sort();
    if let Some(key) = unknown.first() {
        return Err(FilterError::UnknownParameter((*key).clone()));
    }

    let mut filter = ResultsFilter::new();

    if let Some(value) = raw.get(START_DATE) {
        filter = filter.start_date(parse_date(START_DATE, value, date_format, Bound::Start)?);
    }
    if let Some(value) = raw.get(END_DATE) {
        filter = filter.end_date(parse_date(END_DATE, value, date_format, Bound::End)?);
    }
    if let Some(cpid) = raw.get(CPID) {
        let cpid = cpid.trim();
        if cpid.is_empty() {
            return Err(FilterError::BlankCpid);
        }
        filter = filter.cpid(cpid);
    }

    match (filter.start_date, filter.end_date) {
        (Some(start), Some(end)) if start > end => {
            return Err(FilterError::InvertedRange { start, end });
        }
        _ => {}
    }

    Ok(filter)
}

/// Reads the optional `page` parameter. Range checks are left to pagination.
pub fn parse_page(raw: &HashMap<String, String>) -> Result<Option<i64>, FilterError> {
    raw.get(PAGE)
        .map(|value| {
            value
                .trim()
                .parse::<i64>()
                .map_err(|_| FilterError::InvalidPage(value.clone()))
        })
        .transpose()
}
