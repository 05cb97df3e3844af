use crate::model::{Id, Position};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Planes created by the seeding pipeline carry no schema version; they are
/// treated as version 0. The first recorded landing upgrades them to 1.
pub const PLANE_SCHEMA_VERSION: i32 = 1;

pub const STATUS_LANDED: &str = "landed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plane {
    pub id: Id,
    pub current_location: Position,
    pub heading: f64,
    pub route: Vec<Id>,
    pub landed: Option<Id>,
    pub status: Option<String>,
    pub schema_version: i32,
    pub total_distance_flown: Option<f64>,
    pub total_flight_time: Option<f64>,
    pub requires_maintenance: bool,
    /// Most recent entry of the flight log; the full log is never loaded
    pub last_landing_event: Option<LandingEvent>,
}

impl Plane {
    /// A freshly seeded plane: zero heading, empty route, no history
    pub fn seeded(id: Id, current_location: Position) -> Self {
        Self {
            id,
            current_location,
            heading: 0.0,
            route: Vec::new(),
            landed: None,
            status: None,
            schema_version: 0,
            total_distance_flown: None,
            total_flight_time: None,
            requires_maintenance: false,
            last_landing_event: None,
        }
    }
}

/// One entry of a plane's flight log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingEvent {
    /// Id of the city the plane landed in
    pub location: Id,
    pub date: DateTime<Utc>,
    pub position: Position,
}

/// Computed totals written together with a new flight log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightLogUpdate {
    pub event: LandingEvent,
    pub total_distance_flown: f64,
    pub total_flight_time: f64,
    pub requires_maintenance: bool,
    pub schema_version: i32,
}

/// Plane as exposed by the HTTP API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneResponse {
    pub callsign: Id,
    pub current_location: Position,
    pub heading: f64,
    pub route: Vec<Id>,
    pub landed: Option<Id>,
}

impl From<Plane> for PlaneResponse {
    fn from(plane: Plane) -> Self {
        Self {
            callsign: plane.id,
            current_location: plane.current_location,
            heading: plane.heading,
            route: plane.route,
            landed: plane.landed,
        }
    }
}
