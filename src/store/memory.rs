use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::mpsc;

use crate::model::{Cargo, CargoStatus, City, FlightLogUpdate, Id, LandingEvent, Plane, Position, WorldCity};
use crate::model::STATUS_LANDED;
use crate::store::traits::{CargoStore, CityStore, PlaneStore, Store, WorldCityStore};

#[derive(Debug, Default)]
struct Collections {
    world_cities: Vec<WorldCity>,
    cities: BTreeMap<Id, City>,
    planes: BTreeMap<Id, Plane>,
    flight_logs: HashMap<Id, Vec<LandingEvent>>,
    cargo: BTreeMap<Id, Cargo>,
}

/// Process-local store used for tests and for running the service without Postgres
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
    landing_subscribers: Mutex<Vec<mpsc::UnboundedSender<Id>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full flight log of a plane, oldest landing first
    pub fn flight_log(&self, id: &Id) -> Vec<LandingEvent> {
        self.collections
            .read()
            .flight_logs
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    fn with_plane<F>(&self, id: &Id, update: F) -> bool
    where
        F: FnOnce(&mut Plane),
    {
        let mut collections = self.collections.write();
        match collections.planes.get_mut(id) {
            Some(plane) => {
                update(plane);
                true
            }
            None => false,
        }
    }

    fn with_cargo<F>(&self, id: &Id, update: F) -> bool
    where
        F: FnOnce(&mut Cargo),
    {
        let mut collections = self.collections.write();
        match collections.cargo.get_mut(id) {
            Some(cargo) => {
                update(cargo);
                true
            }
            None => false,
        }
    }

    fn publish_landing(&self, id: &Id) {
        // Closed receivers are dropped on the next publish
        self.landing_subscribers
            .lock()
            .retain(|subscriber| subscriber.send(id.clone()).is_ok());
    }
}

#[async_trait::async_trait]
impl WorldCityStore for MemoryStore {
    async fn list_world_cities(&self) -> Result<Vec<WorldCity>> {
        Ok(self.collections.read().world_cities.clone())
    }

    async fn replace_world_cities(&self, cities: Vec<WorldCity>) -> Result<usize> {
        let count = cities.len();
        self.collections.write().world_cities = cities;
        Ok(count)
    }
}

#[async_trait::async_trait]
impl CityStore for MemoryStore {
    async fn get_city(&self, id: &Id) -> Result<Option<City>> {
        Ok(self.collections.read().cities.get(id).cloned())
    }

    async fn list_cities(&self) -> Result<Vec<City>> {
        Ok(self.collections.read().cities.values().cloned().collect())
    }

    async fn replace_cities(&self, cities: Vec<City>) -> Result<usize> {
        let mut replacement = BTreeMap::new();
        for city in cities {
            replacement.insert(city.id.clone(), city);
        }
        let count = replacement.len();
        self.collections.write().cities = replacement;
        Ok(count)
    }
}

#[async_trait::async_trait]
impl PlaneStore for MemoryStore {
    async fn get_plane(&self, id: &Id) -> Result<Option<Plane>> {
        let collections = self.collections.read();
        Ok(collections.planes.get(id).map(|plane| {
            let mut plane = plane.clone();
            plane.last_landing_event = collections
                .flight_logs
                .get(id)
                .and_then(|log| log.last().cloned());
            plane
        }))
    }

    async fn list_planes(&self) -> Result<Vec<Plane>> {
        Ok(self.collections.read().planes.values().cloned().collect())
    }

    async fn replace_planes(&self, planes: Vec<Plane>) -> Result<usize> {
        let mut replacement = BTreeMap::new();
        for plane in planes {
            replacement.insert(plane.id.clone(), plane);
        }
        let count = replacement.len();
        let mut collections = self.collections.write();
        collections.planes = replacement;
        collections.flight_logs.clear();
        Ok(count)
    }

    async fn update_location(&self, id: &Id, location: Position, heading: f64) -> Result<bool> {
        Ok(self.with_plane(id, |plane| {
            plane.current_location = location;
            plane.heading = heading;
        }))
    }

    async fn land_plane(&self, id: &Id, location: Position, heading: f64, city: &Id) -> Result<bool> {
        let updated = self.with_plane(id, |plane| {
            plane.current_location = location;
            plane.heading = heading;
            plane.landed = Some(city.clone());
            plane.status = Some(STATUS_LANDED.to_string());
        });
        if updated {
            self.publish_landing(id);
        }
        Ok(updated)
    }

    async fn set_route(&self, id: &Id, route: Vec<Id>) -> Result<bool> {
        Ok(self.with_plane(id, |plane| plane.route = route))
    }

    async fn add_to_route(&self, id: &Id, city: &Id) -> Result<bool> {
        Ok(self.with_plane(id, |plane| {
            if !plane.route.contains(city) {
                plane.route.push(city.clone());
            }
        }))
    }

    async fn pop_route(&self, id: &Id) -> Result<bool> {
        Ok(self.with_plane(id, |plane| {
            if !plane.route.is_empty() {
                plane.route.remove(0);
            }
        }))
    }

    async fn record_landing(&self, id: &Id, update: FlightLogUpdate) -> Result<bool> {
        let mut collections = self.collections.write();
        let Some(plane) = collections.planes.get_mut(id) else {
            return Ok(false);
        };
        plane.schema_version = update.schema_version;
        plane.total_distance_flown = Some(update.total_distance_flown);
        plane.total_flight_time = Some(update.total_flight_time);
        plane.requires_maintenance = update.requires_maintenance;
        collections
            .flight_logs
            .entry(id.clone())
            .or_default()
            .push(update.event);
        Ok(true)
    }

    async fn subscribe_landings(&self) -> Result<mpsc::UnboundedReceiver<Id>> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.landing_subscribers.lock().push(sender);
        Ok(receiver)
    }
}

#[async_trait::async_trait]
impl CargoStore for MemoryStore {
    async fn get_cargo(&self, id: &Id) -> Result<Option<Cargo>> {
        Ok(self.collections.read().cargo.get(id).cloned())
    }

    async fn insert_cargo(&self, cargo: Cargo) -> Result<()> {
        self.collections.write().cargo.insert(cargo.id.clone(), cargo);
        Ok(())
    }

    async fn list_cargo_in_process_at(&self, location: &Id) -> Result<Vec<Cargo>> {
        Ok(self
            .collections
            .read()
            .cargo
            .values()
            .filter(|cargo| &cargo.location == location && cargo.status == CargoStatus::InProcess)
            .cloned()
            .collect())
    }

    async fn mark_cargo_delivered(&self, id: &Id, at: DateTime<Utc>) -> Result<bool> {
        Ok(self.with_cargo(id, |cargo| {
            cargo.status = CargoStatus::Delivered;
            cargo.delivered = Some(at);
        }))
    }

    async fn set_cargo_courier(&self, id: &Id, courier: Option<Id>) -> Result<bool> {
        Ok(self.with_cargo(id, |cargo| cargo.courier = courier))
    }

    async fn move_cargo(&self, id: &Id, location: &Id) -> Result<bool> {
        Ok(self.with_cargo(id, |cargo| cargo.location = location.clone()))
    }
}

impl Store for MemoryStore {}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(id: &str, country: &str) -> City {
        City {
            id: id.to_string(),
            position: [0.0, 0.0],
            country: country.to_string(),
        }
    }

    #[tokio::test]
    async fn test_replace_cities_keeps_last_record_per_id() {
        let store = MemoryStore::new();
        store.replace_cities(vec![city("Old_ZZ", "Z")]).await.unwrap();

        let stored = store
            .replace_cities(vec![city("Dup_ZZ", "First"), city("Dup_ZZ", "Second")])
            .await
            .unwrap();

        assert_eq!(stored, 1);
        assert!(store.get_city(&"Old_ZZ".to_string()).await.unwrap().is_none());
        let dup = store.get_city(&"Dup_ZZ".to_string()).await.unwrap().unwrap();
        assert_eq!(dup.country, "Second");
    }

    #[tokio::test]
    async fn test_route_add_has_set_semantics() {
        let store = MemoryStore::new();
        let id = "CARGO0".to_string();
        store
            .replace_planes(vec![Plane::seeded(id.clone(), [0.0, 0.0])])
            .await
            .unwrap();

        let london = "London_GB".to_string();
        let paris = "Paris_FR".to_string();
        store.add_to_route(&id, &london).await.unwrap();
        store.add_to_route(&id, &paris).await.unwrap();
        store.add_to_route(&id, &london).await.unwrap();
        assert_eq!(store.get_plane(&id).await.unwrap().unwrap().route, vec![london.clone(), paris.clone()]);

        store.pop_route(&id).await.unwrap();
        store.pop_route(&id).await.unwrap();
        store.pop_route(&id).await.unwrap();
        assert!(store.get_plane(&id).await.unwrap().unwrap().route.is_empty());
    }

    #[tokio::test]
    async fn test_landing_is_published_to_subscribers() {
        let store = MemoryStore::new();
        let id = "CARGO3".to_string();
        store
            .replace_planes(vec![Plane::seeded(id.clone(), [0.0, 0.0])])
            .await
            .unwrap();

        let mut landings = store.subscribe_landings().await.unwrap();
        store
            .land_plane(&id, [1.0, 1.0], 90.0, &"Rome_IT".to_string())
            .await
            .unwrap();

        assert_eq!(landings.recv().await, Some(id.clone()));
        let plane = store.get_plane(&id).await.unwrap().unwrap();
        assert_eq!(plane.landed.as_deref(), Some("Rome_IT"));
        assert_eq!(plane.status.as_deref(), Some(STATUS_LANDED));
    }

    #[tokio::test]
    async fn test_unknown_plane_updates_report_false() {
        let store = MemoryStore::new();
        let missing = "CARGO99".to_string();
        assert!(!store.update_location(&missing, [0.0, 0.0], 0.0).await.unwrap());
        assert!(!store.pop_route(&missing).await.unwrap());
    }
}
