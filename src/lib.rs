pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::ephemeris::SolarPositionModel;
pub use config::{cli::LocalStorage, LocationArgs, TimetableConfig};
pub use core::resolver::LocationResolver;
pub use domain::model::{Location, SolarEvent, SolarEventSet, Timetable};
pub use utils::error::{Result, SolarError};
