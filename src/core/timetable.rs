use crate::core::clock::day_bounds;
use crate::core::events::events_for;
use crate::core::scanner::ElevationProfile;
use crate::domain::model::{AngleCrossing, Direction, Location, SolarEvent, Timetable};
use crate::domain::ports::SolarModel;
use crate::utils::error::Result;
use crate::utils::validation::validate_range;
use chrono::NaiveDate;

pub const DEFAULT_ANGLE_STEP: u32 = 5;

/// Multiples of `step` from 0° to 90° that do not exceed `max_elevation`.
pub fn reachable_angles(step: u32, max_elevation: f64) -> Result<Vec<f64>> {
    validate_range("angle_step", step, 1, 90)?;
    Ok((0..=90u32)
        .step_by(step as usize)
        .map(f64::from)
        .filter(|angle| *angle <= max_elevation)
        .collect())
}

/// Crossings of each angle: ascending over the morning window in increasing
/// angle order, then descending over the afternoon window in decreasing order.
pub fn crossings_for(
    angles: &[f64],
    morning: &ElevationProfile,
    afternoon: &ElevationProfile,
) -> Vec<AngleCrossing> {
    let rising = angles.iter().map(|angle| AngleCrossing {
        target_angle: *angle,
        direction: Direction::Ascending,
        time: morning.crossing(*angle, Direction::Ascending),
    });
    let setting = angles.iter().rev().map(|angle| AngleCrossing {
        target_angle: *angle,
        direction: Direction::Descending,
        time: afternoon.crossing(*angle, Direction::Descending),
    });
    rising.chain(setting).collect()
}

pub fn build_timetable<M: SolarModel + ?Sized>(
    model: &M,
    location: &Location,
    date: NaiveDate,
    angle_step: u32,
) -> Result<Timetable> {
    let events = events_for(model, location, date)?;
    let noon = events.require(SolarEvent::SolarNoon)?;
    let (start, end) = day_bounds(location.timezone(), date)?;

    let max_elevation = model.elevation(location, &noon)?;
    let angles = reachable_angles(angle_step, max_elevation)?;
    tracing::debug!(
        "Scanning {} angles on {} (peak {:.2}°)",
        angles.len(),
        date,
        max_elevation
    );

    let morning = ElevationProfile::sample(model, location, start, noon)?;
    let afternoon = ElevationProfile::sample(model, location, noon, end)?;
    let crossings = crossings_for(&angles, &morning, &afternoon);

    Ok(Timetable {
        date,
        events,
        max_elevation,
        crossings,
    })
}
