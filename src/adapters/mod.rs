// 外部系統的具體實作：星曆、位置來源、時區查詢

pub mod ephemeris;
pub mod sources;
pub mod timezone;
