pub mod almanac;
pub mod clock;
pub mod events;
pub mod output;
pub mod resolver;
pub mod scanner;
pub mod timetable;

pub use crate::domain::model::{Location, SolarEvent, Timetable};
pub use crate::domain::ports::{LocationSource, SolarModel, Storage};
pub use crate::utils::error::Result;
