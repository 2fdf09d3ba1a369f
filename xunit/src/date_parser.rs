use std::time::Duration;

use chrono::{DateTime as ChronoDateTime, FixedOffset};
use speedate::{Date as SpeedateDate, DateTime as SpeedateDateTime};

#[derive(Debug, Copy, Clone)]
enum DateType {
    DateTime,
    NaiveDate,
}

#[derive(Debug, Clone)]
struct TimestampAndOffset {
    timestamp_secs_micros: Option<(i64, u32)>,
    offset_secs: Option<i32>,
}

/// Best-effort parser for the `start-time` and `end-time` attributes.
///
/// Results files use one timestamp style throughout, so the style that
/// parsed last is tried first on the next value.
#[derive(Debug, Clone, Default)]
pub struct TimestampParser {
    date_type: Option<DateType>,
}

impl TimestampParser {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn parse<T: AsRef<str>>(&mut self, value: T) -> Option<ChronoDateTime<FixedOffset>> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return None;
        }

        if let Ok(date_time) = ChronoDateTime::parse_from_rfc3339(value) {
            self.date_type = Some(DateType::DateTime);
            return Some(date_time);
        }

        let (date_type, timestamp_and_offset) = match self.date_type {
            Some(DateType::NaiveDate) => {
                Self::parse_naive_date(value).or_else(|| Self::parse_date_time(value))
            }
            Some(DateType::DateTime) | None => {
                Self::parse_date_time(value).or_else(|| Self::parse_naive_date(value))
            }
        }?;

        let date_time = Self::convert_to_chrono_date_time(timestamp_and_offset)?;
        self.date_type = Some(date_type);
        Some(date_time)
    }

    fn parse_date_time(value: &str) -> Option<(DateType, TimestampAndOffset)> {
        SpeedateDateTime::parse_str(value).ok().map(|dt| {
            (
                DateType::DateTime,
                TimestampAndOffset {
                    timestamp_secs_micros: Some((dt.timestamp(), dt.time.microsecond)),
                    offset_secs: dt.time.tz_offset,
                },
            )
        })
    }

    fn parse_naive_date(value: &str) -> Option<(DateType, TimestampAndOffset)> {
        SpeedateDate::parse_str(value).ok().map(|d| {
            (
                DateType::NaiveDate,
                TimestampAndOffset {
                    timestamp_secs_micros: Some((d.timestamp(), 0)),
                    offset_secs: None,
                },
            )
        })
    }

    fn convert_to_chrono_date_time(
        TimestampAndOffset {
            timestamp_secs_micros,
            offset_secs,
        }: TimestampAndOffset,
    ) -> Option<ChronoDateTime<FixedOffset>> {
        match (
            timestamp_secs_micros.and_then(|(secs, micros)| {
                let duration = Duration::from_micros(micros.into());
                ChronoDateTime::from_timestamp(
                    secs,
                    duration.as_nanos().try_into().unwrap_or_default(),
                )
            }),
            offset_secs.and_then(FixedOffset::east_opt),
        ) {
            (Some(chrono_date_time), Some(fixed_offset)) => {
                Some(chrono_date_time.with_timezone(&fixed_offset))
            }
            (Some(chrono_date_time), None) => Some(chrono_date_time.fixed_offset()),
            (None, None) | (None, Some(..)) => None,
        }
    }
}
