use crate::domain::model::{LocationField, PartialLocation};
use crate::utils::error::Result;
use crate::utils::validation::parse_coordinate;
use std::io::ErrorKind;
use std::path::Path;

/// `.env`-style `KEY=VALUE` file.
///
/// Blank lines and `#` comments are skipped, an `export ` prefix and matching
/// quotes around the value are stripped. When a key repeats, the first
/// occurrence wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValueConfig {
    entries: Vec<(String, String)>,
}

impl KeyValueConfig {
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let line = line.strip_prefix("export ").unwrap_or(line);
                let (key, value) = line.split_once('=')?;
                Some((key.trim().to_string(), unquote(value.trim()).to_string()))
            })
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Self { entries }
    }

    /// 檔案不存在時回傳 None
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        match tokio::fs::read_to_string(path.as_ref()).await {
            Ok(content) => Ok(Some(Self::parse(&content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn to_location(&self) -> Result<PartialLocation> {
        location_from_lookup(|key| self.get(key).map(str::to_string))
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Builds a partial location from `LATITUDE`/`LONGITUDE`/`TIMEZONE` lookups.
///
/// Empty values count as absent; non-numeric coordinates are an error.
pub fn location_from_lookup<F>(lookup: F) -> Result<PartialLocation>
where
    F: Fn(&str) -> Option<String>,
{
    let value = |field: LocationField| {
        lookup(field.key())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let latitude = value(LocationField::Latitude)
        .map(|raw| parse_coordinate("latitude", &raw))
        .transpose()?;
    let longitude = value(LocationField::Longitude)
        .map(|raw| parse_coordinate("longitude", &raw))
        .transpose()?;

    Ok(PartialLocation {
        latitude,
        longitude,
        timezone: value(LocationField::Timezone),
    })
}
