use crate::domain::model::LocalTime;
use crate::utils::error::{Result, SolarError};
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Local wall-clock time on `date`.
///
/// A time swallowed by a DST gap moves forward by whole hours until it exists;
/// an ambiguous time resolves to its first occurrence.
pub fn local_time(tz: Tz, date: NaiveDate, time: NaiveTime) -> Result<LocalTime> {
    let naive = date.and_time(time);
    for shift in 0..=3 {
        let candidate = naive + Duration::hours(shift);
        if let Some(t) = tz.from_local_datetime(&candidate).earliest() {
            return Ok(t);
        }
    }
    Err(SolarError::InvalidDate {
        message: format!("{} {} does not exist in {}", date, time, tz.name()),
    })
}

pub fn day_start(tz: Tz, date: NaiveDate) -> Result<LocalTime> {
    local_time(tz, date, NaiveTime::MIN)
}

/// 一天的起訖：當地零時到隔天零時前一秒
pub fn day_bounds(tz: Tz, date: NaiveDate) -> Result<(LocalTime, LocalTime)> {
    let next = date.succ_opt().ok_or_else(|| SolarError::InvalidDate {
        message: format!("{} has no following day", date),
    })?;
    let start = day_start(tz, date)?;
    let end = day_start(tz, next)? - Duration::seconds(1);
    Ok((start, end))
}

/// Instant named by an optional date and time of day.
///
/// Missing parts are taken from `now`, so a date alone keeps the current
/// wall-clock time on that date.
pub fn resolve_instant(
    now: LocalTime,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Result<LocalTime> {
    match (date, time) {
        (None, None) => Ok(now),
        (date, time) => local_time(
            now.timezone(),
            date.unwrap_or_else(|| now.date_naive()),
            time.unwrap_or_else(|| now.time()),
        ),
    }
}

pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// `HH:MM`, 24-hour, seconds truncated.
pub fn format_hhmm(t: &LocalTime) -> String {
    t.format("%H:%M").to_string()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| SolarError::InvalidDate {
        message: format!("'{}': {}", raw, e),
    })
}

pub fn parse_hhmm(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|e| SolarError::InvalidDate {
        message: format!("time '{}': {}", raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::America::{Denver, Santiago};

    #[test]
    fn test_day_bounds_regular_day() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let (start, end) = day_bounds(Denver, date).unwrap();
        assert_eq!(format_hhmm(&start), "00:00");
        assert_eq!(end.date_naive(), date);
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
    }

    #[test]
    fn test_day_start_skips_midnight_dst_gap() {
        // Chile moved clocks from 00:00 to 01:00 on 2023-09-03
        let date = NaiveDate::from_ymd_opt(2023, 9, 3).unwrap();
        let start = day_start(Santiago, date).unwrap();
        assert_eq!(start.date_naive(), date);
        assert_eq!(start.hour(), 1);
    }

    #[test]
    fn test_format_truncates_seconds() {
        let t = Denver.with_ymd_and_hms(2024, 6, 21, 5, 31, 59).unwrap();
        assert_eq!(format_hhmm(&t), "05:31");
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(
            parse_date("2024-12-21").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 21).unwrap()
        );
        assert!(parse_date("21/12/2024").is_err());
        assert_eq!(parse_hhmm("08:05").unwrap(), NaiveTime::from_hms_opt(8, 5, 0).unwrap());
    }

    #[test]
    fn test_resolve_instant_fills_missing_parts_from_now() {
        let now = Denver.with_ymd_and_hms(2024, 11, 3, 14, 25, 10).unwrap();
        let solstice = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let eight = NaiveTime::from_hms_opt(8, 0, 0).unwrap();

        assert_eq!(resolve_instant(now, None, None).unwrap(), now);

        // 只給日期：沿用現在的時刻
        let on_date = resolve_instant(now, Some(solstice), None).unwrap();
        assert_eq!(on_date.date_naive(), solstice);
        assert_eq!((on_date.hour(), on_date.minute(), on_date.second()), (14, 25, 10));
        assert_eq!(on_date.naive_utc().hour(), 20);

        let at = resolve_instant(now, None, Some(eight)).unwrap();
        assert_eq!(at.date_naive(), now.date_naive());
        assert_eq!(format_hhmm(&at), "08:00");

        let both = resolve_instant(now, Some(solstice), Some(eight)).unwrap();
        assert_eq!(both.date_naive(), solstice);
        assert_eq!(format_hhmm(&both), "08:00");
    }
}
