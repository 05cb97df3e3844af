//! Computed flight totals for a new landing.
//!
//! Totals are recomputed from the previous values and written with `set`
//! semantics, so replaying the same landing against the same plane state gives
//! the same result. The first landing of a plane only starts the log: with no
//! previous landing there is no leg to measure and both totals are 0.

use crate::model::{FlightLogUpdate, LandingEvent, Plane, MAINTENANCE_REQUIRED_LIMIT, PLANE_SCHEMA_VERSION};
use crate::logic::geo::distance_miles;

pub fn flight_log_update(plane: &Plane, event: LandingEvent) -> FlightLogUpdate {
    let (total_distance_flown, total_flight_time) = match &plane.last_landing_event {
        Some(last) => {
            let leg_miles = distance_miles(&last.position, &event.position);
            let leg_seconds = (event.date - last.date).num_seconds().abs() as f64;
            (
                plane.total_distance_flown.unwrap_or(0.0) + leg_miles,
                plane.total_flight_time.unwrap_or(0.0) + leg_seconds,
            )
        }
        None => (0.0, 0.0),
    };

    let requires_maintenance =
        plane.requires_maintenance || total_distance_flown > MAINTENANCE_REQUIRED_LIMIT;

    FlightLogUpdate {
        event,
        total_distance_flown,
        total_flight_time,
        requires_maintenance,
        schema_version: PLANE_SCHEMA_VERSION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn landing(location: &str, position: [f64; 2], seconds: i64) -> LandingEvent {
        LandingEvent {
            location: location.to_string(),
            date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seconds),
            position,
        }
    }

    #[test]
    fn test_first_landing_starts_totals_at_zero() {
        let plane = Plane::seeded("CARGO0".to_string(), [0.0, 0.0]);
        let update = flight_log_update(&plane, landing("London_GB", [-0.13, 51.51], 0));

        assert_eq!(update.total_distance_flown, 0.0);
        assert_eq!(update.total_flight_time, 0.0);
        assert!(!update.requires_maintenance);
        assert_eq!(update.schema_version, PLANE_SCHEMA_VERSION);
    }

    #[test]
    fn test_second_landing_adds_leg() {
        let mut plane = Plane::seeded("CARGO0".to_string(), [0.0, 0.0]);
        plane.last_landing_event = Some(landing("London_GB", [-0.1276, 51.5072], 0));
        plane.total_distance_flown = Some(100.0);
        plane.total_flight_time = Some(60.0);

        let update = flight_log_update(&plane, landing("Paris_FR", [2.3522, 48.8566], 90));

        assert!((update.total_distance_flown - 313.0).abs() < 3.0);
        assert_eq!(update.total_flight_time, 150.0);
    }

    #[test]
    fn test_flight_time_uses_absolute_difference() {
        let mut plane = Plane::seeded("CARGO0".to_string(), [0.0, 0.0]);
        plane.last_landing_event = Some(landing("A_ZZ", [0.0, 0.0], 500));

        let update = flight_log_update(&plane, landing("B_ZZ", [0.0, 0.0], 200));
        assert_eq!(update.total_flight_time, 300.0);
    }

    #[test]
    fn test_maintenance_after_distance_limit() {
        let mut plane = Plane::seeded("CARGO0".to_string(), [0.0, 0.0]);
        plane.last_landing_event = Some(landing("A_ZZ", [0.0, 0.0], 0));
        plane.total_distance_flown = Some(MAINTENANCE_REQUIRED_LIMIT - 10.0);

        let update = flight_log_update(&plane, landing("B_ZZ", [1.0, 0.0], 10));
        assert!(update.requires_maintenance);
    }

    #[test]
    fn test_maintenance_flag_is_sticky() {
        let mut plane = Plane::seeded("CARGO0".to_string(), [0.0, 0.0]);
        plane.requires_maintenance = true;

        let update = flight_log_update(&plane, landing("A_ZZ", [0.0, 0.0], 0));
        assert!(update.requires_maintenance);
    }
}
