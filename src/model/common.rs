use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type Id = String;

/// An ordered `[longitude, latitude]` pair.
pub type Position = [f64; 2];

pub const COLLECTION_WORLD_CITIES: &str = "worldcities";
pub const COLLECTION_CITIES: &str = "cities";
pub const COLLECTION_PLANES: &str = "planes";
pub const COLLECTION_CARGO: &str = "cargo";

/// Distance (in miles) after which a plane is flagged for maintenance
pub const MAINTENANCE_REQUIRED_LIMIT: f64 = 50_000.0;

pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}

/// Generic `{ "ok": true }` body returned by mutating endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
