use crate::core::clock::{day_bounds, local_time};
use crate::core::scanner::ElevationProfile;
use crate::core::timetable::crossings_for;
use crate::domain::model::{AlmanacRow, Depression, Direction, Horizon, LocalTime, Location};
use crate::domain::ports::SolarModel;
use crate::utils::error::{Result, SolarError};
use crate::utils::validation::{validate_positive_number, validate_range};
use chrono::{Datelike, NaiveDate, NaiveTime};

pub const DEFAULT_THRESHOLDS: [f64; 2] = [35.0, 40.0];
pub const DEFAULT_SAMPLE_HOUR: u32 = 8;

/// Dawn time at `depression` for `days` consecutive dates from `start`.
pub fn dawn_outlook<M: SolarModel + ?Sized>(
    model: &M,
    location: &Location,
    start: NaiveDate,
    days: usize,
    depression: Depression,
) -> Result<Vec<(NaiveDate, Option<LocalTime>)>> {
    validate_positive_number("days", days, 1)?;
    start
        .iter_days()
        .take(days)
        .map(|date| {
            let events = model.horizon_events(location, date, Horizon::Twilight(depression))?;
            Ok((date, events.rise))
        })
        .collect()
}

/// Threshold angles sorted ascending with duplicates removed.
pub fn normalize_thresholds(angles: &[f64]) -> Result<Vec<f64>> {
    let mut sorted = Vec::with_capacity(angles.len());
    for angle in angles {
        if !angle.is_finite() {
            return Err(SolarError::ConfigError {
                message: format!("angle {} is not a number", angle),
            });
        }
        validate_range("angles", *angle, 0.0, 90.0)?;
        sorted.push(*angle);
    }
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    Ok(sorted)
}

/// One day of the yearly table. `angles` must be sorted ascending.
pub fn almanac_row<M: SolarModel + ?Sized>(
    model: &M,
    location: &Location,
    date: NaiveDate,
    angles: &[f64],
    sample_hour: u32,
) -> Result<AlmanacRow> {
    let tz = location.timezone();
    let events = model.horizon_events(location, date, Horizon::SunriseSunset)?;
    let noon = events.transit;
    let (start, end) = day_bounds(tz, date)?;

    let sample_at = local_time(
        tz,
        date,
        NaiveTime::from_hms_opt(sample_hour, 0, 0).ok_or_else(|| SolarError::ConfigError {
            message: format!("sample hour {} is not a valid hour", sample_hour),
        })?,
    )?;
    let sample_elevation = model.elevation(location, &sample_at)?;
    let max_elevation = model.elevation(location, &noon)?;

    let morning = ElevationProfile::sample(model, location, start, noon)?;
    let afternoon = ElevationProfile::sample(model, location, noon, end)?;
    let (rises, falls): (Vec<_>, Vec<_>) = crossings_for(angles, &morning, &afternoon)
        .into_iter()
        .partition(|c| c.direction == Direction::Ascending);

    Ok(AlmanacRow {
        date,
        sunrise: events.rise,
        sample_hour,
        sample_elevation,
        solar_noon: Some(noon),
        max_elevation,
        rises,
        falls,
        sunset: events.set,
    })
}

/// Every calendar day of `year`, in order.
pub fn year_rows<M: SolarModel + ?Sized>(
    model: &M,
    location: &Location,
    year: i32,
    angles: &[f64],
    sample_hour: u32,
) -> Result<Vec<AlmanacRow>> {
    validate_range("sample_hour", sample_hour, 0, 23)?;
    let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| SolarError::InvalidDate {
        message: format!("year {} is out of range", year),
    })?;
    let angles = normalize_thresholds(angles)?;

    let rows = first
        .iter_days()
        .take_while(|date| date.year() == year)
        .map(|date| almanac_row(model, location, date, &angles, sample_hour))
        .collect::<Result<Vec<_>>>()?;
    tracing::info!("Computed {} days for {}", rows.len(), year);
    Ok(rows)
}
