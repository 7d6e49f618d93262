use crate::domain::model::{Direction, LocalTime, Location};
use crate::domain::ports::SolarModel;
use crate::utils::error::Result;
use chrono::Duration;

/// Sampling step of every elevation scan.
pub fn scan_step() -> Duration {
    Duration::minutes(1)
}

fn crosses(previous: f64, current: f64, target: f64, direction: Direction) -> bool {
    match direction {
        Direction::Ascending => previous < target && target <= current,
        Direction::Descending => previous > target && target >= current,
    }
}

/// Solar elevation sampled once a minute over a window.
///
/// Sampling once and querying many thresholds gives the same answers as one
/// linear scan per threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationProfile {
    samples: Vec<(LocalTime, f64)>,
}

impl ElevationProfile {
    pub fn sample<M: SolarModel + ?Sized>(
        model: &M,
        location: &Location,
        start: LocalTime,
        end: LocalTime,
    ) -> Result<Self> {
        let step = scan_step();
        let mut samples = Vec::new();
        let mut t = start;
        loop {
            samples.push((t, model.elevation(location, &t)?));
            t += step;
            if t > end {
                break;
            }
        }
        Ok(Self { samples })
    }

    /// First ascending, or last descending, sample at which elevation reaches
    /// `target` coming from the other side.
    pub fn crossing(&self, target: f64, direction: Direction) -> Option<LocalTime> {
        let mut hits = self
            .samples
            .windows(2)
            .filter(|pair| crosses(pair[0].1, pair[1].1, target, direction))
            .map(|pair| pair[1].0);
        match direction {
            Direction::Ascending => hits.next(),
            Direction::Descending => hits.last(),
        }
    }

    pub fn max_elevation(&self) -> Option<f64> {
        self.samples.iter().map(|(_, e)| *e).reduce(f64::max)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Minute at which the solar elevation crosses `target_degrees` inside
/// `[window_start, window_end]`, or `None` if it never does.
pub fn find_crossing<M: SolarModel + ?Sized>(
    model: &M,
    location: &Location,
    window_start: LocalTime,
    window_end: LocalTime,
    target_degrees: f64,
    ascending: bool,
) -> Result<Option<LocalTime>> {
    let direction = if ascending {
        Direction::Ascending
    } else {
        Direction::Descending
    };
    let profile = ElevationProfile::sample(model, location, window_start, window_end)?;
    Ok(profile.crossing(target_degrees, direction))
}
