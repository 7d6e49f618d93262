use chrono::{NaiveDate, TimeZone, Timelike};
use serde_json::Value;
use solar_timetable::core::almanac::{almanac_row, dawn_outlook, year_rows};
use solar_timetable::core::clock::{day_bounds, format_hhmm};
use solar_timetable::core::events::events_for;
use solar_timetable::core::output::{almanac_csv, outlook_json, timetable_json};
use solar_timetable::core::scanner::find_crossing;
use solar_timetable::core::timetable::build_timetable;
use solar_timetable::domain::model::{Depression, Direction, LocalTime};
use solar_timetable::{Location, SolarError, SolarEvent, SolarPositionModel};

fn broomfield() -> Location {
    Location::new(39.9205, -105.0867, "America/Denver").unwrap()
}

fn tromso() -> Location {
    Location::new(69.6492, 18.9553, "Europe/Oslo").unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 與參考時刻相差不超過一分鐘
fn assert_within_minute(actual: LocalTime, expected: LocalTime, what: &str) {
    let diff = (actual - expected).num_seconds().abs();
    assert!(diff <= 60, "{what}: {actual} vs reference {expected} ({diff}s)");
}

#[test]
fn test_summer_solstice_matches_reference_almanac() -> anyhow::Result<()> {
    let model = SolarPositionModel::new();
    let location = broomfield();
    let events = events_for(&model, &location, date(2024, 6, 21))?;
    let at = |h, m, s| location.timezone().with_ymd_and_hms(2024, 6, 21, h, m, s).unwrap();

    // NOAA 太陽計算器數值
    assert_within_minute(events.require(SolarEvent::Sunrise)?, at(5, 32, 5), "sunrise");
    assert_within_minute(events.require(SolarEvent::SolarNoon)?, at(13, 2, 20), "solar noon");
    assert_within_minute(events.require(SolarEvent::Sunset)?, at(20, 32, 34), "sunset");
    assert_within_minute(
        events.require(SolarEvent::Dawn(Depression::Civil))?,
        at(4, 59, 16),
        "civil dawn",
    );
    assert_within_minute(
        events.require(SolarEvent::Dusk(Depression::Civil))?,
        at(21, 5, 23),
        "civil dusk",
    );

    let times: Vec<_> = events.iter().map(|(_, t)| t.unwrap()).collect();
    assert!(times.windows(2).all(|w| w[0] < w[1]));
    Ok(())
}

#[test]
fn test_polar_night_keeps_noon_and_twilight() -> anyhow::Result<()> {
    let model = SolarPositionModel::new();
    let events = events_for(&model, &tromso(), date(2024, 12, 21))?;

    assert_eq!(events.sunrise, None);
    assert_eq!(events.sunset, None);
    assert!(events.solar_noon.is_some());
    assert!(events.dawn.get(Depression::Civil).is_some());

    let err = events.require(SolarEvent::Sunrise).unwrap_err();
    assert!(matches!(err, SolarError::EventNotObservable { .. }));
    assert!(err.to_string().contains("sunrise"));
    Ok(())
}

#[test]
fn test_crossings_bracket_solar_noon() -> anyhow::Result<()> {
    let model = SolarPositionModel::new();
    let location = broomfield();
    let day = date(2024, 6, 21);
    let noon = events_for(&model, &location, day)?.require(SolarEvent::SolarNoon)?;
    let (start, end) = day_bounds(location.timezone(), day)?;

    let up = find_crossing(&model, &location, start, noon, 30.0, true)?.unwrap();
    let down = find_crossing(&model, &location, noon, end, 30.0, false)?.unwrap();
    assert!(up < noon && noon < down);
    assert_eq!(up.second(), 0);

    let unreachable = find_crossing(&model, &location, start, noon, 80.0, true)?;
    assert_eq!(unreachable, None);
    Ok(())
}

fn hhmm_value(time: Option<LocalTime>) -> Value {
    time.map_or(Value::Null, |t| Value::String(format_hhmm(&t)))
}

#[test]
fn test_timetable_document_reparses_to_same_times() -> anyhow::Result<()> {
    let model = SolarPositionModel::new();
    let timetable = build_timetable(&model, &broomfield(), date(2024, 6, 21), 5)?;

    assert!((timetable.max_elevation - 73.5).abs() < 1.0);
    // 0° 到 70° 每 5°，上升與下降各一次
    assert_eq!(timetable.crossings.len(), 30);
    assert_eq!(timetable.crossings[0].key(), "0_up");
    assert_eq!(timetable.crossings[15].key(), "70_down");
    assert_eq!(timetable.crossings[29].key(), "0_down");

    let text = timetable_json(&timetable)?;
    let json: Value = serde_json::from_str(&text)?;
    let events = &timetable.events;
    assert_eq!(json["date"], "2024-06-21");
    assert_eq!(json["sunrise"], hhmm_value(events.sunrise));
    assert_eq!(json["solar_noon"], hhmm_value(events.solar_noon));
    assert_eq!(json["sunset"], hhmm_value(events.sunset));
    for depression in Depression::ALL {
        assert_eq!(json["dawn"][depression.label()], hhmm_value(events.dawn.get(depression)));
        assert_eq!(json["dusk"][depression.label()], hhmm_value(events.dusk.get(depression)));
    }

    assert_eq!(json["angle"].as_object().unwrap().len(), timetable.crossings.len());
    for crossing in &timetable.crossings {
        assert_eq!(json["angle"][crossing.key()], hhmm_value(crossing.time));
    }
    // 文件中的鍵順序與計算順序一致
    let positions: Vec<usize> = timetable
        .crossings
        .iter()
        .map(|c| text.find(&format!("\"{}\"", c.key())).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let sunrise = events.sunrise.unwrap();
    let zero_up = timetable.crossings[0].time.unwrap();
    assert!(zero_up >= sunrise);
    assert!(zero_up - sunrise < chrono::Duration::minutes(15));
    Ok(())
}

#[test]
fn test_polar_night_timetable_has_no_angles() -> anyhow::Result<()> {
    let model = SolarPositionModel::new();
    let timetable = build_timetable(&model, &tromso(), date(2024, 12, 21), 5)?;

    assert!(timetable.max_elevation < 0.0);
    assert!(timetable.crossings.is_empty());

    let json: serde_json::Value = serde_json::from_str(&timetable_json(&timetable)?)?;
    assert!(json["sunrise"].is_null());
    assert!(json["solar_noon"].is_string());
    assert!(json["angle"].as_object().unwrap().is_empty());
    Ok(())
}

#[test]
fn test_dawn_outlook() -> anyhow::Result<()> {
    let model = SolarPositionModel::new();
    let start = date(2024, 3, 1);
    let days = dawn_outlook(&model, &broomfield(), start, 14, Depression::Civil)?;

    assert_eq!(days.len(), 14);
    assert_eq!(days[0].0, start);
    assert_eq!(days[13].0, date(2024, 3, 14));
    assert!(days.iter().all(|(_, t)| t.is_some()));

    let json: serde_json::Value = serde_json::from_str(&outlook_json(&days)?)?;
    assert_eq!(json.as_object().unwrap().len(), 14);

    assert!(dawn_outlook(&model, &broomfield(), start, 0, Depression::Civil).is_err());
    Ok(())
}

#[test]
fn test_almanac_csv_reparses_to_same_row() -> anyhow::Result<()> {
    let model = SolarPositionModel::new();
    let row = almanac_row(&model, &broomfield(), date(2024, 6, 21), &[35.0, 40.0], 8)?;

    assert_eq!(row.rises.len(), 2);
    assert_eq!(row.falls[0].target_angle, 40.0);
    assert!(row.falls.iter().all(|c| c.direction == Direction::Descending));
    assert!(row.rises[0].time.unwrap() < row.rises[1].time.unwrap());
    assert!(row.sample_elevation > 10.0 && row.sample_elevation < 40.0);

    let bytes = almanac_csv(std::slice::from_ref(&row), &[35.0, 40.0], 8)?;
    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let headers = reader.headers()?.clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["date", "sunrise", "08h_angle", "35_up", "40_up", "solar_noon", "max_angle", "40_down", "35_down", "sunset"]
    );
    let records = reader.records().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(records.len(), 1);
    let field = |name: &str| {
        let index = headers.iter().position(|h| h == name).unwrap();
        records[0][index].to_string()
    };
    let hhmm = |t: Option<LocalTime>| t.map(|t| format_hhmm(&t)).unwrap_or_default();

    assert_eq!(field("date"), "2024-06-21");
    assert_eq!(field("sunrise"), hhmm(row.sunrise));
    assert_eq!(field("solar_noon"), hhmm(row.solar_noon));
    assert_eq!(field("sunset"), hhmm(row.sunset));
    for crossing in row.rises.iter().chain(&row.falls) {
        assert_eq!(field(&crossing.key()), hhmm(crossing.time));
    }
    let sample: f64 = field("08h_angle").parse()?;
    assert!((sample - row.sample_elevation).abs() <= 0.005);
    let max: f64 = field("max_angle").parse()?;
    assert!((max - row.max_elevation).abs() <= 0.005);
    Ok(())
}

#[test]
fn test_year_rows_rejects_bad_sample_hour() {
    let model = SolarPositionModel::new();
    let err = year_rows(&model, &broomfield(), 2024, &[35.0], 24).unwrap_err();
    assert!(matches!(err, SolarError::ConfigError { .. }));
}

#[test]
fn test_descending_crossing_is_after_noon_on_dst_day() -> anyhow::Result<()> {
    // 美國夏令時間開始日
    let model = SolarPositionModel::new();
    let timetable = build_timetable(&model, &broomfield(), date(2024, 3, 10), 10)?;
    let noon = timetable.events.solar_noon.unwrap();

    for crossing in &timetable.crossings {
        let time = crossing.time.unwrap();
        match crossing.direction {
            Direction::Ascending => assert!(time < noon),
            Direction::Descending => assert!(time > noon),
        }
    }
    assert_eq!(noon.hour(), 13);
    Ok(())
}

#[test]
fn test_evening_events_past_midnight() -> anyhow::Result<()> {
    let model = SolarPositionModel::new();
    let reykjavik = Location::new(64.15, -21.94, "Atlantic/Reykjavik")?;
    let day = date(2024, 6, 20);
    let timetable = build_timetable(&model, &reykjavik, day, 5)?;
    let events = &timetable.events;

    let sunrise = events.require(SolarEvent::Sunrise)?;
    let noon = events.require(SolarEvent::SolarNoon)?;
    let sunset = events.require(SolarEvent::Sunset)?;
    assert!(sunrise < noon && noon < sunset);
    assert_eq!(sunset.date_naive(), date(2024, 6, 21));

    // 0° 下降先於日落
    let zero_down = timetable
        .crossings
        .iter()
        .find(|c| c.key() == "0_down")
        .and_then(|c| c.time)
        .unwrap();
    assert!(zero_down < sunset);

    let next = events_for(&model, &reykjavik, date(2024, 6, 21))?;
    assert!(next.require(SolarEvent::Sunset)? > sunset);
    assert!(next.require(SolarEvent::Sunrise)? > sunset);

    let coruna = Location::new(43.36, -8.41, "Europe/Madrid")?;
    let events = events_for(&model, &coruna, date(2024, 6, 21))?;
    let times: Vec<_> = events.iter().map(|(_, t)| t.unwrap()).collect();
    assert!(times.windows(2).all(|w| w[0] < w[1]), "{times:?}");
    assert_eq!(
        events.dusk.get(Depression::Astronomical).unwrap().date_naive(),
        date(2024, 6, 22)
    );
    Ok(())
}

#[test]
fn test_fall_back_day() -> anyhow::Result<()> {
    // 美國夏令時間結束日，01:00 至 02:00 重複
    let model = SolarPositionModel::new();
    let location = broomfield();
    let day = date(2024, 11, 3);

    let (start, end) = day_bounds(location.timezone(), day)?;
    assert_eq!(end - start, chrono::Duration::hours(25) - chrono::Duration::seconds(1));

    let timetable = build_timetable(&model, &location, day, 10)?;
    let noon = timetable.events.require(SolarEvent::SolarNoon)?;
    assert_eq!(noon.hour(), 11);
    let times: Vec<_> = timetable.events.iter().map(|(_, t)| t.unwrap()).collect();
    assert!(times.windows(2).all(|w| w[0] < w[1]));

    assert!(!timetable.crossings.is_empty());
    for crossing in &timetable.crossings {
        let time = crossing.time.unwrap();
        match crossing.direction {
            Direction::Ascending => assert!(time < noon),
            Direction::Descending => assert!(time > noon),
        }
    }
    Ok(())
}
