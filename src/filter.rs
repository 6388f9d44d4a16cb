//! Date filter.
//!
//! Keeps the records whose date field parses (with a `chrono` strftime
//! pattern, date only) to a day on or after the threshold. Records with a
//! missing, empty or unparsable date are dropped with a warning; one bad
//! record never aborts the batch. Survivors keep their original order.

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::error::FilterError;
use crate::models::Record;
use crate::utils::truncate_for_log;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of "today" for the default threshold.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The local calendar date at the time of the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen at a given date.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// A record the filter dropped because its date could not be read.
#[derive(Debug)]
pub struct Skipped {
    /// Position in the input sequence.
    pub index: usize,
    pub record: Record,
    pub reason: FilterError,
}

impl Skipped {
    /// Short label for the kind of failure, for grouping in logs.
    pub fn kind(&self) -> &'static str {
        match self.reason {
            FilterError::MissingField { .. } => "missing",
            FilterError::DateParse { .. } => "unparsable",
        }
    }
}

#[derive(Debug, Default)]
pub struct FilterReport {
    pub kept: Vec<Record>,
    /// Records without a usable date. Records older than the threshold are
    /// dropped silently and do not appear here.
    pub skipped: Vec<Skipped>,
}

impl FilterReport {
    /// Number of skipped records per [`Skipped::kind`], in first-seen order.
    pub fn skipped_by_kind(&self) -> Vec<(&'static str, usize)> {
        let mut counts: Vec<(&'static str, usize)> = Vec::new();
        for skipped in &self.skipped {
            match counts.iter_mut().find(|(kind, _)| *kind == skipped.kind()) {
                Some((_, n)) => *n += 1,
                None => counts.push((skipped.kind(), 1)),
            }
        }
        counts
    }
}

/// Parse the value of `field` in `record` with `format`.
pub fn record_date(record: &Record, field: &str, format: &str) -> Result<NaiveDate, FilterError> {
    let value = record
        .value(field)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| FilterError::MissingField {
            field: field.to_string(),
        })?;
    NaiveDate::parse_from_str(value, format).map_err(|source| FilterError::DateParse {
        field: field.to_string(),
        value: value.to_string(),
        format: format.to_string(),
        source,
    })
}

/// Keep the records dated on or after `threshold`.
///
/// # Arguments
///
/// * `records` - Records to filter, in order
/// * `field` - Name of the field holding each record's date
/// * `format` - `chrono` strftime pattern the date must match exactly
/// * `threshold` - Earliest day kept (inclusive)
///
/// # Returns
///
/// A [`FilterReport`] with the surviving records in input order, plus every
/// record whose date was missing, empty or unparsable together with the reason.
pub fn filter_by_date<I>(records: I, field: &str, format: &str, threshold: NaiveDate) -> FilterReport
where
    I: IntoIterator<Item = Record>,
{
    let mut report = FilterReport::default();
    let mut total = 0usize;

    for (index, record) in records.into_iter().enumerate() {
        total += 1;
        match record_date(&record, field, format) {
            Ok(date) if date >= threshold => report.kept.push(record),
            Ok(_) => {}
            Err(reason) => {
                warn!(
                    index,
                    record = %truncate_for_log(&record.to_string(), 200),
                    error = %reason,
                    "Skipping record"
                );
                report.skipped.push(Skipped {
                    index,
                    record,
                    reason,
                });
            }
        }
    }

    info!(
        total,
        kept = report.kept.len(),
        skipped = report.skipped.len(),
        %threshold,
        "Filtered records by date"
    );
    report
}

/// [`filter_by_date`] with the threshold taken from `clock`.
pub fn filter_by_date_with_clock<I>(
    records: I,
    field: &str,
    format: &str,
    clock: &dyn Clock,
) -> FilterReport
where
    I: IntoIterator<Item = Record>,
{
    filter_by_date(records, field, format, clock.today())
}
