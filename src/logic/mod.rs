pub mod cargo;
pub mod cities;
pub mod fleet;
pub mod flight_log;
pub mod geo;
pub mod landing_listener;

pub use self::flight_log::flight_log_update;
pub use self::geo::{distance_miles, nearest_neighbors, parse_heading, parse_position};
pub use self::landing_listener::{record_landing, spawn_landing_listener};
