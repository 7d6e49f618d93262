use crate::domain::model::{Horizon, LocalTime, Location, LocationField, PartialLocation};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// One step of the location fallback chain.
#[async_trait]
pub trait LocationSource: Send + Sync {
    fn name(&self) -> &str;

    /// 此來源能提供的欄位；全部已知時解析器會跳過它
    fn provides(&self) -> &'static [LocationField] {
        &LocationField::ALL
    }

    async fn lookup(&self, known: &PartialLocation) -> Result<PartialLocation>;
}

/// Rise, transit and set relative to one horizon on one local date.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonEvents {
    pub rise: Option<LocalTime>,
    pub transit: LocalTime,
    pub set: Option<LocalTime>,
}

pub trait SolarModel {
    /// Apparent solar elevation in degrees at `at`.
    fn elevation(&self, location: &Location, at: &LocalTime) -> Result<f64>;

    fn horizon_events(
        &self,
        location: &Location,
        date: NaiveDate,
        horizon: Horizon,
    ) -> Result<HorizonEvents>;
}
