use crate::model::{Id, Position};
use serde::{Deserialize, Serialize};

/// A raw record of the `worldcities` dataset.
///
/// Only the columns the pipelines read are kept; extra CSV columns are ignored
/// on import. A missing population never passes the size filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldCity {
    pub city_ascii: String,
    pub country: String,
    pub iso2: String,
    pub lng: f64,
    pub lat: f64,
    #[serde(default)]
    pub population: Option<f64>,
}

impl WorldCity {
    pub fn new(
        city_ascii: impl Into<String>,
        country: impl Into<String>,
        iso2: impl Into<String>,
        lng: f64,
        lat: f64,
        population: Option<f64>,
    ) -> Self {
        Self {
            city_ascii: city_ascii.into(),
            country: country.into(),
            iso2: iso2.into(),
            lng,
            lat,
            population,
        }
    }

    /// Identifier of the derived city: `{city_ascii}_{iso2}` with `/` replaced by `_`
    pub fn derived_id(&self) -> Id {
        format!("{}_{}", self.city_ascii, self.iso2).replace('/', "_")
    }

    pub fn position(&self) -> Position {
        [self.lng, self.lat]
    }
}

/// A record of the derived `cities` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: Id,
    pub position: Position,
    pub country: String,
}

/// City as exposed by the HTTP API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityResponse {
    pub name: Id,
    pub country: String,
    pub location: Position,
}

impl From<City> for CityResponse {
    fn from(city: City) -> Self {
        Self {
            name: city.id,
            country: city.country,
            location: city.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborsResponse {
    pub neighbors: Vec<CityResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_id_joins_name_and_code() {
        let city = WorldCity::new("Foo", "X", "XX", 1.0, 2.0, Some(5000.0));
        assert_eq!(city.derived_id(), "Foo_XX");
        assert_eq!(city.position(), [1.0, 2.0]);
    }

    #[test]
    fn test_derived_id_replaces_slashes() {
        let city = WorldCity::new("A/B", "Y", "YY", 0.0, 0.0, Some(2000.0));
        assert_eq!(city.derived_id(), "A_B_YY");
    }

    #[test]
    fn test_city_response_uses_id_as_name() {
        let city = City {
            id: "London_GB".to_string(),
            position: [-0.1275, 51.5072],
            country: "United Kingdom".to_string(),
        };
        let response = CityResponse::from(city);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["name"], "London_GB");
        assert_eq!(json["location"][1], 51.5072);
    }
}
