pub mod cli;
pub mod keyvalue;

use crate::core::clock::{parse_date, today};
use crate::core::resolver::LocationResolver;
use crate::core::timetable::DEFAULT_ANGLE_STEP;
use crate::domain::model::Location;
use crate::utils::error::{Result, SolarError};
use crate::utils::validation::{validate_latitude, validate_longitude, validate_range, Validate};
use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Args, Parser};

/// Location overrides shared by every binary.
#[derive(Debug, Clone, Default, Args)]
pub struct LocationArgs {
    /// Latitude in decimal degrees, north positive
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees, east positive
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// IANA timezone name, e.g. America/Denver
    #[arg(long)]
    pub tz: Option<String>,
}

impl LocationArgs {
    pub fn resolver(&self) -> LocationResolver {
        LocationResolver::standard(self.lat, self.lon, self.tz.clone())
    }

    /// 驗證後走完整的回退鏈
    pub async fn resolve(&self) -> Result<Location> {
        self.validate()?;
        self.resolver().resolve().await
    }
}

impl Validate for LocationArgs {
    fn validate(&self) -> Result<()> {
        if let Some(lat) = self.lat {
            validate_latitude(lat)?;
        }
        if let Some(lon) = self.lon {
            validate_longitude(lon)?;
        }
        if let Some(tz) = self.tz.as_deref().map(str::trim).filter(|tz| !tz.is_empty()) {
            tz.parse::<Tz>().map_err(|_| SolarError::InvalidTimezone {
                value: tz.to_string(),
            })?;
        }
        Ok(())
    }
}

/// `--date`, or today in the location's timezone.
pub fn date_or_today(raw: Option<&str>, location: &Location) -> Result<NaiveDate> {
    match raw {
        Some(raw) => parse_date(raw),
        None => Ok(today(location.timezone())),
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "solar-timetable")]
#[command(about = "Sunrise, twilight and solar angle timetable for one day")]
pub struct TimetableConfig {
    #[command(flatten)]
    pub location: LocationArgs,

    /// Local date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,

    /// Step between reported elevation angles, in degrees
    #[arg(long, default_value_t = DEFAULT_ANGLE_STEP)]
    pub angle_step: u32,

    /// Write the JSON document to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for TimetableConfig {
    fn validate(&self) -> Result<()> {
        self.location.validate()?;
        validate_range("angle_step", self.angle_step, 1, 90)?;
        if let Some(date) = &self.date {
            parse_date(date)?;
        }
        Ok(())
    }
}
