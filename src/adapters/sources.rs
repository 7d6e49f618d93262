use crate::adapters::timezone::timezone_for;
use crate::config::keyvalue::{location_from_lookup, KeyValueConfig};
use crate::domain::model::{LocationField, PartialLocation};
use crate::domain::ports::LocationSource;
use crate::utils::error::{Result, SolarError};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

const COORDINATES: [LocationField; 2] = [LocationField::Latitude, LocationField::Longitude];
const TIMEZONE: [LocationField; 1] = [LocationField::Timezone];

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct ArgumentSource {
    values: PartialLocation,
}

impl ArgumentSource {
    pub fn new(latitude: Option<f64>, longitude: Option<f64>, timezone: Option<String>) -> Self {
        Self {
            values: PartialLocation {
                latitude,
                longitude,
                timezone,
            },
        }
    }
}

#[async_trait]
impl LocationSource for ArgumentSource {
    fn name(&self) -> &str {
        "command line"
    }

    async fn lookup(&self, _known: &PartialLocation) -> Result<PartialLocation> {
        Ok(self.values.clone())
    }
}

/// `LATITUDE` / `LONGITUDE` / `TIMEZONE` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    // None 代表讀取行程環境
    vars: Option<HashMap<String, String>>,
}

impl EnvSource {
    pub fn process() -> Self {
        Self { vars: None }
    }

    pub fn from_map(vars: HashMap<String, String>) -> Self {
        Self { vars: Some(vars) }
    }
}

#[async_trait]
impl LocationSource for EnvSource {
    fn name(&self) -> &str {
        "environment"
    }

    async fn lookup(&self, _known: &PartialLocation) -> Result<PartialLocation> {
        match &self.vars {
            Some(vars) => location_from_lookup(|key| vars.get(key).cloned()),
            None => location_from_lookup(|key| std::env::var(key).ok()),
        }
    }
}

/// A key=value location file; a missing file contributes nothing.
#[derive(Debug, Clone)]
pub struct FileSource {
    name: String,
    path: Option<PathBuf>,
}

impl FileSource {
    pub fn new(name: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path,
        }
    }

    /// `.env` in the directory of the running executable.
    pub fn beside_executable() -> Self {
        let path = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(".env")));
        Self::new(".env beside executable", path)
    }

    /// `~/.config/location`.
    pub fn home_config() -> Self {
        let path = dirs::home_dir().map(|home| home.join(".config").join("location"));
        Self::new("~/.config/location", path)
    }
}

#[async_trait]
impl LocationSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, _known: &PartialLocation) -> Result<PartialLocation> {
        let Some(path) = &self.path else {
            return Ok(PartialLocation::default());
        };
        match KeyValueConfig::from_file(path).await? {
            Some(config) => {
                tracing::debug!("Read location file {}", path.display());
                config.to_location()
            }
            None => Ok(PartialLocation::default()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeviceFix {
    latitude: f64,
    longitude: f64,
}

/// Device location service run as a subprocess.
///
/// The command must print a JSON object with `latitude` and `longitude`.
/// It runs once, is killed after `timeout`, and every failure is reported as
/// the recoverable `SubprocessUnavailable`.
#[derive(Debug, Clone)]
pub struct DeviceLocationSource {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl DeviceLocationSource {
    pub const DEFAULT_COMMAND: &'static str = "termux-location";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new() -> Self {
        Self::with_command(
            Self::DEFAULT_COMMAND,
            vec!["-p".to_string(), "network".to_string()],
            Self::DEFAULT_TIMEOUT,
        )
    }

    pub fn with_command(command: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args,
            timeout,
        }
    }

    fn unavailable(&self, reason: impl Into<String>) -> SolarError {
        SolarError::SubprocessUnavailable {
            command: self.command.clone(),
            reason: reason.into(),
        }
    }

    /// 含路徑分隔符的指令直接檢查檔案，否則在 PATH 中搜尋
    fn locate(&self) -> Option<PathBuf> {
        let command = Path::new(&self.command);
        if command.components().count() > 1 {
            return command.is_file().then(|| command.to_path_buf());
        }
        let paths = std::env::var_os("PATH")?;
        std::env::split_paths(&paths)
            .map(|dir| dir.join(&self.command))
            .find(|candidate| candidate.is_file())
    }

    async fn run(&self) -> Result<PartialLocation> {
        let program = self
            .locate()
            .ok_or_else(|| self.unavailable("not found on PATH"))?;

        tracing::debug!("Running {} {:?}", program.display(), self.args);
        let mut command = tokio::process::Command::new(&program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| self.unavailable(format!("timed out after {:?}", self.timeout)))?
            .map_err(|e| self.unavailable(e.to_string()))?;

        if !output.status.success() {
            return Err(self.unavailable(format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let fix: DeviceFix = serde_json::from_slice(&output.stdout)
            .map_err(|e| self.unavailable(format!("unexpected output: {}", e)))?;
        Ok(PartialLocation {
            latitude: Some(fix.latitude),
            longitude: Some(fix.longitude),
            timezone: None,
        })
    }
}

impl Default for DeviceLocationSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationSource for DeviceLocationSource {
    fn name(&self) -> &str {
        &self.command
    }

    fn provides(&self) -> &'static [LocationField] {
        &COORDINATES
    }

    async fn lookup(&self, _known: &PartialLocation) -> Result<PartialLocation> {
        self.run().await
    }
}

/// Derives the timezone from already resolved coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateTimezoneSource;

#[async_trait]
impl LocationSource for CoordinateTimezoneSource {
    fn name(&self) -> &str {
        "coordinate timezone lookup"
    }

    fn provides(&self) -> &'static [LocationField] {
        &TIMEZONE
    }

    async fn lookup(&self, known: &PartialLocation) -> Result<PartialLocation> {
        let timezone = known
            .coordinates()
            .and_then(|(lat, lon)| timezone_for(lat, lon));
        Ok(PartialLocation {
            timezone,
            ..Default::default()
        })
    }
}
