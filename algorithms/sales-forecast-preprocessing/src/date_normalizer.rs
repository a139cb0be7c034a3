//! Parsing of `D/M/YYYY` sale dates into epoch milliseconds
//!
//! Dates are interpreted at midnight UTC. Local time zones are never consulted, so the same
//! input always yields the same timestamp.
use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;

use crate::error::Result;
use crate::record::{Field, ParsedRecord, RawRecord};
use crate::warning::{Defect, Warning};

const DATE_PATTERN: &str = r"^(\d{1,2})/(\d{1,2})/(\d{4})$";

/// Parses the `sales_date` column of a batch
///
/// Only `D/M/YYYY` and `DD/MM/YYYY` are accepted. Text matching the pattern but naming a day that
/// does not exist (`13/13/2023`, `31/2/2023`) is rejected as well.
#[derive(Debug, Clone)]
pub struct DateNormalizer {
    pattern: Regex,
}

impl DateNormalizer {
    pub fn new() -> Result<Self> {
        Ok(DateNormalizer {
            pattern: Regex::new(DATE_PATTERN)?,
        })
    }

    /// Parses a single cell into epoch milliseconds at UTC midnight
    pub fn parse(&self, field: &Field) -> std::result::Result<i64, Defect> {
        let text = match field {
            Field::Number(value) => return Err(Defect::MalformedDate(value.to_string())),
            field => field.as_text().ok_or(Defect::MissingDate)?,
        };

        let captures = self
            .pattern
            .captures(text)
            .ok_or_else(|| Defect::MalformedDate(text.to_string()))?;
        let malformed = |_| Defect::MalformedDate(text.to_string());
        let day = captures[1].parse::<u32>().map_err(malformed)?;
        let month = captures[2].parse::<u32>().map_err(malformed)?;
        let year = captures[3].parse::<i32>().map_err(malformed)?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(timestamp_millis)
            .ok_or_else(|| Defect::InvalidCalendarDate(text.to_string()))
    }

    /// Parses the dates of a whole batch
    ///
    /// Never fails: unparseable dates are marked with a [`Defect`] and reported as a warning
    /// tagged with the row index.
    pub fn normalize(&self, records: &[RawRecord]) -> (Vec<ParsedRecord>, Vec<Warning>) {
        let mut warnings = Vec::new();
        let parsed = records
            .iter()
            .enumerate()
            .map(|(row, record)| {
                let sales_date = self.parse(&record.sales_date);
                if let Err(defect) = &sales_date {
                    warnings.push(Warning::row(row, defect.clone()));
                }
                ParsedRecord {
                    row,
                    sales_date,
                    product_description: record.product_description.clone(),
                    quantity_sold: record.quantity_sold.clone(),
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            rows = records.len(),
            invalid = warnings.len(),
            "parsed sales dates"
        );
        (parsed, warnings)
    }
}

/// Epoch milliseconds of the given date at midnight UTC
pub fn timestamp_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Calendar date (UTC) of an epoch millisecond timestamp
pub fn date_of(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp).map(|datetime| datetime.date_naive())
}

/// Formats an epoch millisecond timestamp as `YYYY-MM-DD` (UTC)
pub fn format_timestamp(timestamp: i64) -> Option<String> {
    date_of(timestamp).map(|date| date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> DateNormalizer {
        DateNormalizer::new().unwrap()
    }

    #[test]
    fn parses_day_first_dates_at_utc_midnight() {
        let normalizer = normalizer();
        assert_eq!(
            normalizer.parse(&Field::from("1/1/2023")),
            Ok(1_672_531_200_000)
        );
        assert_eq!(
            normalizer.parse(&Field::from("02/01/2023")),
            Ok(1_672_617_600_000)
        );
        assert_eq!(normalizer.parse(&Field::from("1/1/1970")), Ok(0));
        assert_eq!(
            normalizer.parse(&Field::from(" 15/6/2024 ")),
            Ok(timestamp_millis(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()))
        );
    }

    #[test]
    fn timestamps_format_back_to_padded_dates() {
        let normalizer = normalizer();
        for (day, month, year) in &[(1, 1, 2023), (9, 12, 1999), (29, 2, 2024), (31, 7, 2030)] {
            let text = format!("{}/{}/{}", day, month, year);
            let timestamp = normalizer.parse(&Field::from(text.as_str())).unwrap();
            assert_eq!(
                format_timestamp(timestamp).unwrap(),
                format!("{:04}-{:02}-{:02}", year, month, day)
            );
        }
    }

    #[test]
    fn rejects_other_formats() {
        let normalizer = normalizer();
        for text in &["2023-01-01", "1/1/23", "001/1/2023", "1/1/2023 10:00", "Jan 1 2023"] {
            assert_eq!(
                normalizer.parse(&Field::from(*text)),
                Err(Defect::MalformedDate(text.to_string()))
            );
        }
        assert_eq!(
            normalizer.parse(&Field::from(20230101.0)),
            Err(Defect::MalformedDate("20230101".to_string()))
        );
        assert_eq!(normalizer.parse(&Field::Missing), Err(Defect::MissingDate));
        assert_eq!(normalizer.parse(&Field::from("")), Err(Defect::MissingDate));
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        let normalizer = normalizer();
        for text in &["13/13/2023", "31/2/2023", "0/1/2023", "29/2/2023"] {
            assert_eq!(
                normalizer.parse(&Field::from(*text)),
                Err(Defect::InvalidCalendarDate(text.to_string()))
            );
        }
    }

    #[test]
    fn normalize_reports_rows_and_continues() {
        let records = vec![
            RawRecord::new("1/1/2023", "Widget", 10.0),
            RawRecord::new("2023/01/02", "Widget", 11.0),
            RawRecord::new(Field::Missing, "Gadget", 12.0),
            RawRecord::new("3/1/2023", "Gadget", 13.0),
        ];
        let (parsed, warnings) = normalizer().normalize(&records);

        assert_eq!(parsed.len(), 4);
        assert!(parsed[0].sales_date.is_ok());
        assert!(parsed[1].sales_date.is_err());
        assert!(parsed[2].sales_date.is_err());
        assert!(parsed[3].sales_date.is_ok());
        assert_eq!(parsed[3].row, 3);
        assert_eq!(
            warnings.iter().map(|w| w.row_index()).collect::<Vec<_>>(),
            vec![Some(1), Some(2)]
        );
    }
}
