use std::sync::OnceLock;
use tzf_rs::DefaultFinder;

/// IANA timezone name for a coordinate, from the bundled tzf-rs boundary data.
///
/// Returns `None` when the finder has no answer (open ocean without a
/// nautical zone in the data set).
pub fn timezone_for(latitude: f64, longitude: f64) -> Option<String> {
    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    let finder = FINDER.get_or_init(DefaultFinder::new);

    // tzf-rs 參數順序為 (經度, 緯度)
    let name = finder.get_tz_name(longitude, latitude);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
