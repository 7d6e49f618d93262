use crate::domain::model::{Depression, Horizon, Location, SolarEventSet};
use crate::domain::ports::SolarModel;
use crate::utils::error::Result;
use chrono::NaiveDate;

/// Sunrise, solar noon, sunset and dawn/dusk at the three depressions for
/// one local date.
///
/// Events that do not occur (polar day or night) are left as `None`; only
/// ephemeris failures abort the whole set.
pub fn events_for<M: SolarModel + ?Sized>(
    model: &M,
    location: &Location,
    date: NaiveDate,
) -> Result<SolarEventSet> {
    let mut events = SolarEventSet::empty(date);

    let horizon = model.horizon_events(location, date, Horizon::SunriseSunset)?;
    events.sunrise = horizon.rise;
    events.solar_noon = Some(horizon.transit);
    events.sunset = horizon.set;

    for depression in Depression::ALL {
        let twilight = model.horizon_events(location, date, Horizon::Twilight(depression))?;
        events.dawn.set(depression, twilight.rise);
        events.dusk.set(depression, twilight.set);
    }

    for (event, time) in events.iter() {
        if time.is_none() {
            tracing::debug!("{} is not observable on {}", event, date);
        }
    }

    Ok(events)
}
