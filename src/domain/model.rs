use crate::utils::error::{Result, SolarError};
use crate::utils::validation::{validate_latitude, validate_longitude};
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

/// 當地時區的時間點
pub type LocalTime = DateTime<Tz>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationField {
    Latitude,
    Longitude,
    Timezone,
}

impl LocationField {
    pub const ALL: [LocationField; 3] = [
        LocationField::Latitude,
        LocationField::Longitude,
        LocationField::Timezone,
    ];

    /// 環境變數與設定檔共用的鍵名
    pub fn key(self) -> &'static str {
        match self {
            LocationField::Latitude => "LATITUDE",
            LocationField::Longitude => "LONGITUDE",
            LocationField::Timezone => "TIMEZONE",
        }
    }
}

impl fmt::Display for LocationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A location source's answer; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
}

impl PartialLocation {
    pub fn has(&self, field: LocationField) -> bool {
        match field {
            LocationField::Latitude => self.latitude.is_some(),
            LocationField::Longitude => self.longitude.is_some(),
            LocationField::Timezone => self.timezone.is_some(),
        }
    }

    pub fn missing(&self) -> Vec<LocationField> {
        LocationField::ALL
            .into_iter()
            .filter(|field| !self.has(*field))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// 只填補尚缺的欄位，回傳本次填上的欄位
    pub fn fill_missing(&mut self, other: PartialLocation) -> Vec<LocationField> {
        let mut filled = Vec::new();
        if self.latitude.is_none() && other.latitude.is_some() {
            self.latitude = other.latitude;
            filled.push(LocationField::Latitude);
        }
        if self.longitude.is_none() && other.longitude.is_some() {
            self.longitude = other.longitude;
            filled.push(LocationField::Longitude);
        }
        if self.timezone.is_none() {
            if let Some(tz) = other.timezone.filter(|tz| !tz.trim().is_empty()) {
                self.timezone = Some(tz.trim().to_string());
                filled.push(LocationField::Timezone);
            }
        }
        filled
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    latitude: f64,
    longitude: f64,
    timezone: Tz,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, timezone: &str) -> Result<Self> {
        validate_latitude(latitude)?;
        validate_longitude(longitude)?;
        let timezone = timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| SolarError::InvalidTimezone {
                value: timezone.to_string(),
            })?;
        Ok(Self {
            latitude,
            longitude,
            timezone,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

impl TryFrom<PartialLocation> for Location {
    type Error = SolarError;

    fn try_from(partial: PartialLocation) -> Result<Self> {
        match (partial.latitude, partial.longitude, partial.timezone.as_deref()) {
            (Some(lat), Some(lon), Some(tz)) => Location::new(lat, lon, tz),
            _ => Err(SolarError::LocationUnresolved {
                missing: partial
                    .missing()
                    .into_iter()
                    .map(|field| field.key().to_string())
                    .collect(),
            }),
        }
    }
}

/// Degrees below the horizon that define the twilight kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Depression {
    Civil,
    Nautical,
    Astronomical,
}

impl Depression {
    pub const ALL: [Depression; 3] = [
        Depression::Civil,
        Depression::Nautical,
        Depression::Astronomical,
    ];

    pub fn degrees(self) -> f64 {
        match self {
            Depression::Civil => 6.0,
            Depression::Nautical => 12.0,
            Depression::Astronomical => 18.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Depression::Civil => "civil",
            Depression::Nautical => "nautical",
            Depression::Astronomical => "astronomical",
        }
    }
}

impl fmt::Display for Depression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Depression {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Depression::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown depression '{}', expected civil, nautical or astronomical", s))
    }
}

/// Horizon a rise/set pair is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    SunriseSunset,
    Twilight(Depression),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolarEvent {
    Sunrise,
    SolarNoon,
    Sunset,
    Dawn(Depression),
    Dusk(Depression),
}

impl SolarEvent {
    pub const ALL: [SolarEvent; 9] = [
        SolarEvent::Dawn(Depression::Astronomical),
        SolarEvent::Dawn(Depression::Nautical),
        SolarEvent::Dawn(Depression::Civil),
        SolarEvent::Sunrise,
        SolarEvent::SolarNoon,
        SolarEvent::Sunset,
        SolarEvent::Dusk(Depression::Civil),
        SolarEvent::Dusk(Depression::Nautical),
        SolarEvent::Dusk(Depression::Astronomical),
    ];

    pub fn label(self) -> String {
        match self {
            SolarEvent::Sunrise => "sunrise".to_string(),
            SolarEvent::SolarNoon => "solar_noon".to_string(),
            SolarEvent::Sunset => "sunset".to_string(),
            SolarEvent::Dawn(d) => format!("{}_dawn", d.label()),
            SolarEvent::Dusk(d) => format!("{}_dusk", d.label()),
        }
    }

    /// 顯示用名稱，例如 "Civil dawn"
    pub fn title(self) -> String {
        let label = self.label().replace('_', " ");
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => label,
        }
    }
}

impl fmt::Display for SolarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for SolarEvent {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        SolarEvent::ALL
            .into_iter()
            .find(|event| event.label() == wanted)
            .ok_or_else(|| {
                let labels: Vec<String> = SolarEvent::ALL.iter().map(|e| e.label()).collect();
                format!("unknown event '{}', expected one of: {}", s, labels.join(", "))
            })
    }
}

/// Dawn or dusk times for each depression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Twilight {
    pub civil: Option<LocalTime>,
    pub nautical: Option<LocalTime>,
    pub astronomical: Option<LocalTime>,
}

impl Twilight {
    pub fn get(&self, depression: Depression) -> Option<LocalTime> {
        match depression {
            Depression::Civil => self.civil,
            Depression::Nautical => self.nautical,
            Depression::Astronomical => self.astronomical,
        }
    }

    pub fn set(&mut self, depression: Depression, time: Option<LocalTime>) {
        match depression {
            Depression::Civil => self.civil = time,
            Depression::Nautical => self.nautical = time,
            Depression::Astronomical => self.astronomical = time,
        }
    }
}

/// Named solar events of one calendar day at one location.
///
/// Events that do not happen that day (polar day or night) are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarEventSet {
    pub date: NaiveDate,
    pub sunrise: Option<LocalTime>,
    pub solar_noon: Option<LocalTime>,
    pub sunset: Option<LocalTime>,
    pub dawn: Twilight,
    pub dusk: Twilight,
}

impl SolarEventSet {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            sunrise: None,
            solar_noon: None,
            sunset: None,
            dawn: Twilight::default(),
            dusk: Twilight::default(),
        }
    }

    pub fn get(&self, event: SolarEvent) -> Option<LocalTime> {
        match event {
            SolarEvent::Sunrise => self.sunrise,
            SolarEvent::SolarNoon => self.solar_noon,
            SolarEvent::Sunset => self.sunset,
            SolarEvent::Dawn(d) => self.dawn.get(d),
            SolarEvent::Dusk(d) => self.dusk.get(d),
        }
    }

    pub fn require(&self, event: SolarEvent) -> Result<LocalTime> {
        self.get(event).ok_or_else(|| SolarError::EventNotObservable {
            event: event.label(),
            date: self.date.to_string(),
        })
    }

    /// 依時間先後列出全部事件
    pub fn iter(&self) -> impl Iterator<Item = (SolarEvent, Option<LocalTime>)> + '_ {
        SolarEvent::ALL.into_iter().map(|event| (event, self.get(event)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn suffix(self) -> &'static str {
        match self {
            Direction::Ascending => "up",
            Direction::Descending => "down",
        }
    }
}

/// Instant the solar elevation passes `target_angle` in `direction`.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleCrossing {
    pub target_angle: f64,
    pub direction: Direction,
    pub time: Option<LocalTime>,
}

impl AngleCrossing {
    /// 輸出鍵名，例如 "35_up"
    pub fn key(&self) -> String {
        format!("{}_{}", self.target_angle, self.direction.suffix())
    }
}

/// One day's timetable: events, peak elevation and angle crossings.
#[derive(Debug, Clone, PartialEq)]
pub struct Timetable {
    pub date: NaiveDate,
    pub events: SolarEventSet,
    pub max_elevation: f64,
    pub crossings: Vec<AngleCrossing>,
}

/// A row of the yearly table.
#[derive(Debug, Clone, PartialEq)]
pub struct AlmanacRow {
    pub date: NaiveDate,
    pub sunrise: Option<LocalTime>,
    pub sample_hour: u32,
    pub sample_elevation: f64,
    pub solar_noon: Option<LocalTime>,
    pub max_elevation: f64,
    pub rises: Vec<AngleCrossing>,
    pub falls: Vec<AngleCrossing>,
    pub sunset: Option<LocalTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_missing_keeps_first_value() {
        let mut resolved = PartialLocation {
            latitude: Some(10.0),
            ..Default::default()
        };
        let filled = resolved.fill_missing(PartialLocation {
            latitude: Some(20.0),
            longitude: Some(30.0),
            timezone: Some("  ".to_string()),
        });

        assert_eq!(filled, vec![LocationField::Longitude]);
        assert_eq!(resolved.latitude, Some(10.0));
        assert_eq!(resolved.longitude, Some(30.0));
        assert_eq!(resolved.missing(), vec![LocationField::Timezone]);
    }

    #[test]
    fn test_location_requires_all_fields() {
        let err = Location::try_from(PartialLocation {
            latitude: Some(1.0),
            ..Default::default()
        })
        .unwrap_err();
        match err {
            SolarError::LocationUnresolved { missing } => {
                assert_eq!(missing, vec!["LONGITUDE", "TIMEZONE"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_location_rejects_bad_values() {
        assert!(matches!(
            Location::new(91.0, 0.0, "UTC"),
            Err(SolarError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            Location::new(0.0, 0.0, "Mars/Olympus_Mons"),
            Err(SolarError::InvalidTimezone { .. })
        ));
        let denver = Location::new(39.9205, -105.0867, "America/Denver").unwrap();
        assert_eq!(denver.timezone(), chrono_tz::America::Denver);
    }

    #[test]
    fn test_event_labels_parse_back() {
        for event in SolarEvent::ALL {
            assert_eq!(event.label().parse::<SolarEvent>().unwrap(), event);
        }
        assert_eq!(
            "Civil-Dawn".parse::<SolarEvent>().unwrap(),
            SolarEvent::Dawn(Depression::Civil)
        );
        assert_eq!(SolarEvent::Dusk(Depression::Nautical).title(), "Nautical dusk");
        assert!("moonrise".parse::<SolarEvent>().is_err());
    }

    #[test]
    fn test_crossing_key() {
        let crossing = AngleCrossing {
            target_angle: 35.0,
            direction: Direction::Descending,
            time: None,
        };
        assert_eq!(crossing.key(), "35_down");
    }
}
