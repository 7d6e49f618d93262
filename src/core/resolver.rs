use crate::adapters::sources::{
    ArgumentSource, CoordinateTimezoneSource, DeviceLocationSource, EnvSource, FileSource,
};
use crate::domain::model::{Location, PartialLocation};
use crate::domain::ports::LocationSource;
use crate::utils::error::Result;

/// Ordered location fallback chain.
///
/// Each field is taken from the first source that supplies a non-empty value.
/// A source is skipped once every field it can provide is known; recoverable
/// source failures (the device command) are logged and passed over.
pub struct LocationResolver {
    sources: Vec<Box<dyn LocationSource>>,
}

impl LocationResolver {
    pub fn new(sources: Vec<Box<dyn LocationSource>>) -> Self {
        Self { sources }
    }

    /// Arguments, environment, `.env` beside the executable,
    /// `~/.config/location`, device location, timezone from coordinates.
    pub fn standard(latitude: Option<f64>, longitude: Option<f64>, timezone: Option<String>) -> Self {
        Self::new(vec![
            Box::new(ArgumentSource::new(latitude, longitude, timezone)),
            Box::new(EnvSource::process()),
            Box::new(FileSource::beside_executable()),
            Box::new(FileSource::home_config()),
            Box::new(DeviceLocationSource::new()),
            Box::new(CoordinateTimezoneSource),
        ])
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub async fn resolve_partial(&self) -> Result<PartialLocation> {
        let mut resolved = PartialLocation::default();

        for source in &self.sources {
            if source.provides().iter().all(|field| resolved.has(*field)) {
                tracing::debug!("Skipping {}: nothing left to provide", source.name());
                continue;
            }

            match source.lookup(&resolved).await {
                Ok(found) => {
                    for field in resolved.fill_missing(found) {
                        tracing::debug!("📍 {} resolved from {}", field, source.name());
                    }
                }
                Err(e) if e.is_recoverable() => {
                    tracing::info!("Location source {} skipped: {}", source.name(), e);
                }
                Err(e) => return Err(e),
            }

            if resolved.is_complete() {
                break;
            }
        }

        Ok(resolved)
    }

    /// Fails with `LocationUnresolved` naming every field still missing.
    pub async fn resolve(&self) -> Result<Location> {
        let resolved = self.resolve_partial().await?;
        Location::try_from(resolved)
    }
}

pub async fn resolve(
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<String>,
) -> Result<Location> {
    LocationResolver::standard(latitude, longitude, timezone)
        .resolve()
        .await
}
