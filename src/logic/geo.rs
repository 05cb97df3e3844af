use geo::{Distance, Haversine, Point};

use crate::error::{LogisticsError, LogisticsResult};
use crate::model::{City, Position};

const METERS_PER_MILE: f64 = 1_609.344;

/// Cities closer than this to the origin are the origin itself
const MIN_NEIGHBOR_DISTANCE_METERS: f64 = 1.0;

/// Great-circle distance between two `[lng, lat]` positions
pub fn distance_meters(a: &Position, b: &Position) -> f64 {
    Haversine.distance(Point::new(a[0], a[1]), Point::new(b[0], b[1]))
}

pub fn distance_miles(a: &Position, b: &Position) -> f64 {
    distance_meters(a, b) / METERS_PER_MILE
}

/// The cities nearest to `origin`, closest first, never the origin itself.
/// `None` returns every other city.
pub fn nearest_neighbors(origin: &City, cities: Vec<City>, limit: Option<usize>) -> Vec<City> {
    let mut candidates: Vec<(f64, City)> = cities
        .into_iter()
        .map(|city| (distance_meters(&origin.position, &city.position), city))
        .filter(|(distance, _)| *distance >= MIN_NEIGHBOR_DISTANCE_METERS)
        .collect();

    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
    candidates
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|(_, city)| city)
        .collect()
}

/// Parses `"lng,lat"`
pub fn parse_position(value: &str) -> LogisticsResult<Position> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [lng, lat] = parts.as_slice() else {
        return Err(LogisticsError::InvalidLocation(value.to_string()));
    };

    let parse = |part: &str| {
        part.parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .ok_or_else(|| LogisticsError::InvalidLocation(value.to_string()))
    };
    Ok([parse(*lng)?, parse(*lat)?])
}

/// Headings are degrees in `[0, 360]`
pub fn parse_heading(value: &str) -> LogisticsResult<f64> {
    match value.trim().parse::<f64>() {
        Ok(heading) if (0.0..=360.0).contains(&heading) => Ok(heading),
        _ => Err(LogisticsError::InvalidHeading(value.to_string())),
    }
}

/// A result limit with cursor semantics: `0` means unlimited and a negative
/// count limits by its magnitude
pub fn parse_limit(value: &str) -> LogisticsResult<Option<usize>> {
    let limit = value
        .trim()
        .parse::<i64>()
        .map_err(|_| LogisticsError::InvalidLimit(value.to_string()))?;

    match limit.unsigned_abs() {
        0 => Ok(None),
        n => Ok(Some(usize::try_from(n).unwrap_or(usize::MAX))),
    }
}
