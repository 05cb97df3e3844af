use crate::model::{generate_id, Id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CargoStatus {
    #[serde(rename = "in process")]
    InProcess,
    #[serde(rename = "in transit")]
    InTransit,
    #[serde(rename = "delivered")]
    Delivered,
}

impl CargoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CargoStatus::InProcess => "in process",
            CargoStatus::InTransit => "in transit",
            CargoStatus::Delivered => "delivered",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in process" => Some(CargoStatus::InProcess),
            "in transit" => Some(CargoStatus::InTransit),
            "delivered" => Some(CargoStatus::Delivered),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    pub id: Id,
    /// Id of the city or plane currently holding the cargo
    pub location: Id,
    pub destination: Id,
    pub received: DateTime<Utc>,
    pub status: CargoStatus,
    pub courier: Option<Id>,
    pub delivered: Option<DateTime<Utc>>,
}

impl Cargo {
    pub fn new(location: Id, destination: Id) -> Self {
        Self {
            id: generate_id(),
            location,
            destination,
            received: Utc::now(),
            status: CargoStatus::InProcess,
            courier: None,
            delivered: None,
        }
    }
}
