use crate::core::clock::day_start;
use crate::domain::model::{Depression, Horizon, LocalTime, Location};
use crate::domain::ports::{HorizonEvents, SolarModel};
use crate::utils::error::Result;
use chrono::{Duration, NaiveDate};
use solar_positioning::time::DeltaT;
use solar_positioning::types::SunriseResult;
use solar_positioning::{spa, RefractionCorrection};

/// Solar ephemeris backed by the NREL SPA implementation of `solar-positioning`.
///
/// Elevations are apparent (standard atmospheric refraction) for an observer
/// at `observer_height` meters.
#[derive(Debug, Clone, Copy)]
pub struct SolarPositionModel {
    observer_height: f64,
    refraction: Option<RefractionCorrection>,
}

impl SolarPositionModel {
    pub fn new() -> Self {
        Self {
            observer_height: 0.0,
            refraction: Some(RefractionCorrection::standard()),
        }
    }

    /// 不做大氣折射修正的幾何高度角
    pub fn geometric() -> Self {
        Self {
            refraction: None,
            ..Self::new()
        }
    }
}

impl Default for SolarPositionModel {
    fn default() -> Self {
        Self::new()
    }
}

fn spa_horizon(horizon: Horizon) -> solar_positioning::Horizon {
    match horizon {
        Horizon::SunriseSunset => solar_positioning::Horizon::SunriseSunset,
        Horizon::Twilight(Depression::Civil) => solar_positioning::Horizon::CivilTwilight,
        Horizon::Twilight(Depression::Nautical) => solar_positioning::Horizon::NauticalTwilight,
        Horizon::Twilight(Depression::Astronomical) => {
            solar_positioning::Horizon::AstronomicalTwilight
        }
    }
}

impl SolarModel for SolarPositionModel {
    fn elevation(&self, location: &Location, at: &LocalTime) -> Result<f64> {
        let delta_t = DeltaT::estimate_from_date_like(at.date_naive())?;
        let position = spa::solar_position(
            *at,
            location.latitude(),
            location.longitude(),
            self.observer_height,
            delta_t,
            self.refraction,
        )?;
        Ok(position.elevation_angle())
    }

    /// Rise before and set after the date's transit, each at most a day away.
    ///
    /// SPA works on the UTC day of the local midnight, so an evening event
    /// past local midnight can come back on the following date (and a dawn
    /// before midnight on the previous one). Candidates from the neighbouring
    /// dates are used when the date's own result is out of order.
    fn horizon_events(
        &self,
        location: &Location,
        date: NaiveDate,
        horizon: Horizon,
    ) -> Result<HorizonEvents> {
        let day = self.spa_events(location, date, horizon)?;
        let transit = day.transit;
        let rise_ok = day.rise.map_or(true, |rise| rise < transit);
        let set_ok = day.set.map_or(true, |set| set > transit);
        if rise_ok && set_ok {
            return Ok(day);
        }

        let mut candidates = vec![day.clone()];
        for neighbour in [date.pred_opt(), date.succ_opt()].into_iter().flatten() {
            candidates.push(self.spa_events(location, neighbour, horizon)?);
        }

        let rise = if rise_ok {
            day.rise
        } else {
            candidates
                .iter()
                .filter_map(|c| c.rise)
                .filter(|rise| *rise < transit && transit - *rise < Duration::hours(24))
                .max()
        };
        let set = if set_ok {
            day.set
        } else {
            candidates
                .iter()
                .filter_map(|c| c.set)
                .filter(|set| *set > transit && *set - transit < Duration::hours(24))
                .min()
        };
        tracing::debug!(
            "Realigned {:?} on {} around transit {}: rise {:?}, set {:?}",
            horizon,
            date,
            transit,
            rise,
            set
        );

        Ok(HorizonEvents { rise, transit, set })
    }
}

impl SolarPositionModel {
    /// 單日 SPA 結果，不檢查先後順序
    fn spa_events(
        &self,
        location: &Location,
        date: NaiveDate,
        horizon: Horizon,
    ) -> Result<HorizonEvents> {
        let start = day_start(location.timezone(), date)?;
        let delta_t = DeltaT::estimate_from_date_like(date)?;
        let result = spa::sunrise_sunset_for_horizon(
            start,
            location.latitude(),
            location.longitude(),
            delta_t,
            spa_horizon(horizon),
        )?;

        let events = match result {
            SunriseResult::RegularDay {
                sunrise,
                transit,
                sunset,
            } => HorizonEvents {
                rise: Some(sunrise),
                transit,
                set: Some(sunset),
            },
            SunriseResult::AllDay { transit } | SunriseResult::AllNight { transit } => {
                tracing::debug!(
                    "No rise/set for {:?} on {} at ({}, {})",
                    horizon,
                    date,
                    location.latitude(),
                    location.longitude()
                );
                HorizonEvents {
                    rise: None,
                    transit,
                    set: None,
                }
            }
        };

        Ok(events)
    }
}
