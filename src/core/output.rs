use crate::core::clock::format_hhmm;
use crate::domain::model::{
    AlmanacRow, AngleCrossing, Depression, LocalTime, Timetable, Twilight,
};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, SolarError};
use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::io::Write;

fn hhmm(time: &Option<LocalTime>) -> Option<String> {
    time.as_ref().map(format_hhmm)
}

/// 保留兩位小數
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

struct TwilightView<'a>(&'a Twilight);

impl Serialize for TwilightView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Depression::ALL.len()))?;
        for depression in Depression::ALL {
            map.serialize_entry(depression.label(), &hhmm(&self.0.get(depression)))?;
        }
        map.end()
    }
}

struct CrossingsView<'a>(&'a [AngleCrossing]);

impl Serialize for CrossingsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for crossing in self.0 {
            map.serialize_entry(&crossing.key(), &hhmm(&crossing.time))?;
        }
        map.end()
    }
}

impl Serialize for Timetable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(8))?;
        map.serialize_entry("date", &self.date.to_string())?;
        map.serialize_entry("sunrise", &hhmm(&self.events.sunrise))?;
        map.serialize_entry("solar_noon", &hhmm(&self.events.solar_noon))?;
        map.serialize_entry("sunset", &hhmm(&self.events.sunset))?;
        map.serialize_entry("max_elevation", &round2(self.max_elevation))?;
        map.serialize_entry("dawn", &TwilightView(&self.events.dawn))?;
        map.serialize_entry("dusk", &TwilightView(&self.events.dusk))?;
        map.serialize_entry("angle", &CrossingsView(&self.crossings))?;
        map.end()
    }
}

/// Pretty-printed JSON, keys in fixed order, absent times as `null`.
pub fn timetable_json(timetable: &Timetable) -> Result<String> {
    Ok(serde_json::to_string_pretty(timetable)?)
}

struct OutlookView<'a>(&'a [(NaiveDate, Option<LocalTime>)]);

impl Serialize for OutlookView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (date, time) in self.0 {
            map.serialize_entry(&date.to_string(), &hhmm(time))?;
        }
        map.end()
    }
}

pub fn outlook_json(days: &[(NaiveDate, Option<LocalTime>)]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&OutlookView(days))?)
}

/// Column names of the yearly table; `angles` sorted ascending.
pub fn almanac_header(angles: &[f64], sample_hour: u32) -> Vec<String> {
    let mut header = vec![
        "date".to_string(),
        "sunrise".to_string(),
        format!("{:02}h_angle", sample_hour),
    ];
    header.extend(angles.iter().map(|a| format!("{}_up", a)));
    header.push("solar_noon".to_string());
    header.push("max_angle".to_string());
    header.extend(angles.iter().rev().map(|a| format!("{}_down", a)));
    header.push("sunset".to_string());
    header
}

fn almanac_record(row: &AlmanacRow) -> Vec<String> {
    let time = |t: &Option<LocalTime>| hhmm(t).unwrap_or_default();
    let mut record = vec![
        row.date.to_string(),
        time(&row.sunrise),
        format!("{:.2}", row.sample_elevation),
    ];
    record.extend(row.rises.iter().map(|c| time(&c.time)));
    record.push(time(&row.solar_noon));
    record.push(format!("{:.2}", row.max_elevation));
    record.extend(row.falls.iter().map(|c| time(&c.time)));
    record.push(time(&row.sunset));
    record
}

/// CSV bytes, one row per day; missing times are empty fields.
pub fn almanac_csv(rows: &[AlmanacRow], angles: &[f64], sample_hour: u32) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(almanac_header(angles, sample_hour))?;
    for row in rows {
        writer.write_record(almanac_record(row))?;
    }
    writer
        .into_inner()
        .map_err(|e| SolarError::IoError(e.into_error()))
}

pub fn elevation_line(at: &LocalTime, elevation: f64) -> String {
    format!("Solar angle at {}: {:.2}°", format_hhmm(at), elevation)
}

pub fn event_line(title: &str, at: &LocalTime) -> String {
    format!("{}: {}", title, format_hhmm(at))
}

/// Writes a finished document to `target`, or to stdout when absent.
///
/// Returns the written path.
pub async fn deliver<S: Storage>(
    storage: &S,
    target: Option<&str>,
    content: &[u8],
) -> Result<Option<String>> {
    match target {
        Some(path) => Ok(Some(storage.write_file(path, content).await?)),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content)?;
            if !content.ends_with(b"\n") {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
            Ok(None)
        }
    }
}
