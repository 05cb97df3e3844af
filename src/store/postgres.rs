use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::error;
use sqlx::postgres::{PgListener, PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tokio::sync::mpsc;

use crate::model::{Cargo, CargoStatus, City, FlightLogUpdate, Id, LandingEvent, Plane, Position, WorldCity};
use crate::model::STATUS_LANDED;
use crate::store::traits::{CargoStore, CityStore, PlaneStore, Store, WorldCityStore};

/// Channel carrying the id of every plane that lands
pub const LANDINGS_CHANNEL: &str = "plane_landings";

const PLANE_COLUMNS: &str = r#"
    p.id, p.lng, p.lat, p.heading, p.route, p.landed, p.status, p.schema_version,
    p.total_distance_flown, p.total_flight_time, p.requires_maintenance
"#;

const CARGO_COLUMNS: &str =
    "id, location, destination, received, status, courier, delivered";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }
}

fn city_from_row(row: &PgRow) -> Result<City> {
    Ok(City {
        id: row.try_get("id")?,
        position: [row.try_get("lng")?, row.try_get("lat")?],
        country: row.try_get("country")?,
    })
}

fn plane_from_row(row: &PgRow) -> Result<Plane> {
    Ok(Plane {
        id: row.try_get("id")?,
        current_location: [row.try_get("lng")?, row.try_get("lat")?],
        heading: row.try_get("heading")?,
        route: row.try_get("route")?,
        landed: row.try_get("landed")?,
        status: row.try_get("status")?,
        schema_version: row.try_get("schema_version")?,
        total_distance_flown: row.try_get("total_distance_flown")?,
        total_flight_time: row.try_get("total_flight_time")?,
        requires_maintenance: row.try_get("requires_maintenance")?,
        last_landing_event: None,
    })
}

fn landing_from_row(row: &PgRow) -> Result<Option<LandingEvent>> {
    let location: Option<String> = row.try_get("last_location")?;
    let Some(location) = location else {
        return Ok(None);
    };

    Ok(Some(LandingEvent {
        location,
        date: row.try_get("last_landed_at")?,
        position: [row.try_get("last_lng")?, row.try_get("last_lat")?],
    }))
}

fn cargo_from_row(row: &PgRow) -> Result<Cargo> {
    let status: String = row.try_get("status")?;
    let status = CargoStatus::parse(&status)
        .ok_or_else(|| anyhow!("Unknown cargo status '{}'", status))?;

    Ok(Cargo {
        id: row.try_get("id")?,
        location: row.try_get("location")?,
        destination: row.try_get("destination")?,
        received: row.try_get("received")?,
        status,
        courier: row.try_get("courier")?,
        delivered: row.try_get("delivered")?,
    })
}

#[async_trait::async_trait]
impl WorldCityStore for PostgresStore {
    async fn list_world_cities(&self) -> Result<Vec<WorldCity>> {
        let rows = sqlx::query(
            "SELECT city_ascii, country, iso2, lng, lat, population FROM world_cities ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list world cities")?;

        rows.iter()
            .map(|row| -> Result<WorldCity> {
                Ok(WorldCity {
                    city_ascii: row.try_get("city_ascii")?,
                    country: row.try_get("country")?,
                    iso2: row.try_get("iso2")?,
                    lng: row.try_get("lng")?,
                    lat: row.try_get("lat")?,
                    population: row.try_get("population")?,
                })
            })
            .collect()
    }

    async fn replace_world_cities(&self, cities: Vec<WorldCity>) -> Result<usize> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM world_cities")
            .execute(&mut *tx)
            .await
            .context("Failed to clear world cities")?;

        for city in &cities {
            sqlx::query(
                r#"
                INSERT INTO world_cities (city_ascii, country, iso2, lng, lat, population)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&city.city_ascii)
            .bind(&city.country)
            .bind(&city.iso2)
            .bind(city.lng)
            .bind(city.lat)
            .bind(city.population)
            .execute(&mut *tx)
            .await
            .context("Failed to insert world city")?;
        }

        tx.commit().await.context("Failed to commit world cities")?;
        Ok(cities.len())
    }
}

#[async_trait::async_trait]
impl CityStore for PostgresStore {
    async fn get_city(&self, id: &Id) -> Result<Option<City>> {
        let row = sqlx::query("SELECT id, lng, lat, country FROM cities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch city")?;

        row.as_ref().map(city_from_row).transpose()
    }

    async fn list_cities(&self) -> Result<Vec<City>> {
        let rows = sqlx::query("SELECT id, lng, lat, country FROM cities ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list cities")?;

        rows.iter().map(city_from_row).collect()
    }

    async fn replace_cities(&self, cities: Vec<City>) -> Result<usize> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM cities")
            .execute(&mut *tx)
            .await
            .context("Failed to clear cities")?;

        // Later records overwrite earlier ones with the same id
        for city in &cities {
            sqlx::query(
                r#"
                INSERT INTO cities (id, lng, lat, country)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE SET
                    lng = EXCLUDED.lng,
                    lat = EXCLUDED.lat,
                    country = EXCLUDED.country
                "#,
            )
            .bind(&city.id)
            .bind(city.position[0])
            .bind(city.position[1])
            .bind(&city.country)
            .execute(&mut *tx)
            .await
            .context("Failed to insert city")?;
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cities")
            .fetch_one(&mut *tx)
            .await
            .context("Failed to count cities")?;

        tx.commit().await.context("Failed to commit cities")?;
        Ok(count as usize)
    }
}

#[async_trait::async_trait]
impl PlaneStore for PostgresStore {
    async fn get_plane(&self, id: &Id) -> Result<Option<Plane>> {
        let query = format!(
            r#"
            SELECT {PLANE_COLUMNS},
                f.location AS last_location, f.landed_at AS last_landed_at,
                f.lng AS last_lng, f.lat AS last_lat
            FROM planes p
            LEFT JOIN LATERAL (
                SELECT location, landed_at, lng, lat FROM flight_log
                WHERE plane_id = p.id
                ORDER BY seq DESC
                LIMIT 1
            ) f ON TRUE
            WHERE p.id = $1
            "#
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch plane")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut plane = plane_from_row(&row)?;
        plane.last_landing_event = landing_from_row(&row)?;
        Ok(Some(plane))
    }

    async fn list_planes(&self) -> Result<Vec<Plane>> {
        let query = format!("SELECT {PLANE_COLUMNS} FROM planes p ORDER BY p.id");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list planes")?;

        rows.iter().map(plane_from_row).collect()
    }

    async fn replace_planes(&self, planes: Vec<Plane>) -> Result<usize> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        // Cascades to the flight log
        sqlx::query("DELETE FROM planes")
            .execute(&mut *tx)
            .await
            .context("Failed to clear planes")?;

        for plane in &planes {
            sqlx::query(
                r#"
                INSERT INTO planes (id, lng, lat, heading, route, landed, status, schema_version,
                    total_distance_flown, total_flight_time, requires_maintenance)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                ON CONFLICT (id) DO UPDATE SET
                    lng = EXCLUDED.lng,
                    lat = EXCLUDED.lat,
                    heading = EXCLUDED.heading,
                    route = EXCLUDED.route
                "#,
            )
            .bind(&plane.id)
            .bind(plane.current_location[0])
            .bind(plane.current_location[1])
            .bind(plane.heading)
            .bind(&plane.route)
            .bind(&plane.landed)
            .bind(&plane.status)
            .bind(plane.schema_version)
            .bind(plane.total_distance_flown)
            .bind(plane.total_flight_time)
            .bind(plane.requires_maintenance)
            .execute(&mut *tx)
            .await
            .context("Failed to insert plane")?;
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM planes")
            .fetch_one(&mut *tx)
            .await
            .context("Failed to count planes")?;

        tx.commit().await.context("Failed to commit planes")?;
        Ok(count as usize)
    }

    async fn update_location(&self, id: &Id, location: Position, heading: f64) -> Result<bool> {
        let result = sqlx::query("UPDATE planes SET lng = $2, lat = $3, heading = $4 WHERE id = $1")
            .bind(id)
            .bind(location[0])
            .bind(location[1])
            .bind(heading)
            .execute(&self.pool)
            .await
            .context("Failed to update plane location")?;

        Ok(result.rows_affected() > 0)
    }

    async fn land_plane(&self, id: &Id, location: Position, heading: f64, city: &Id) -> Result<bool> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let result = sqlx::query(
            r#"
            UPDATE planes SET lng = $2, lat = $3, heading = $4, landed = $5, status = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(location[0])
        .bind(location[1])
        .bind(heading)
        .bind(city)
        .bind(STATUS_LANDED)
        .execute(&mut *tx)
        .await
        .context("Failed to land plane")?;

        if result.rows_affected() == 0 {
            tx.rollback().await.context("Failed to roll back landing")?;
            return Ok(false);
        }

        // Delivered to listeners only once the transaction commits
        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(LANDINGS_CHANNEL)
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to publish landing")?;

        tx.commit().await.context("Failed to commit landing")?;
        Ok(true)
    }

    async fn set_route(&self, id: &Id, route: Vec<Id>) -> Result<bool> {
        let result = sqlx::query("UPDATE planes SET route = $2 WHERE id = $1")
            .bind(id)
            .bind(&route)
            .execute(&self.pool)
            .await
            .context("Failed to set plane route")?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_to_route(&self, id: &Id, city: &Id) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE planes
            SET route = CASE WHEN $2 = ANY(route) THEN route ELSE array_append(route, $2) END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(city)
        .execute(&self.pool)
        .await
        .context("Failed to extend plane route")?;

        Ok(result.rows_affected() > 0)
    }

    async fn pop_route(&self, id: &Id) -> Result<bool> {
        let result = sqlx::query("UPDATE planes SET route = COALESCE(route[2:], '{}') WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to pop plane route")?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_landing(&self, id: &Id, update: FlightLogUpdate) -> Result<bool> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let result = sqlx::query(
            r#"
            UPDATE planes SET
                schema_version = $2,
                total_distance_flown = $3,
                total_flight_time = $4,
                requires_maintenance = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(update.schema_version)
        .bind(update.total_distance_flown)
        .bind(update.total_flight_time)
        .bind(update.requires_maintenance)
        .execute(&mut *tx)
        .await
        .context("Failed to update flight totals")?;

        if result.rows_affected() == 0 {
            tx.rollback().await.context("Failed to roll back flight log")?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO flight_log (plane_id, location, landed_at, lng, lat)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(&update.event.location)
        .bind(update.event.date)
        .bind(update.event.position[0])
        .bind(update.event.position[1])
        .execute(&mut *tx)
        .await
        .context("Failed to append flight log")?;

        tx.commit().await.context("Failed to commit flight log")?;
        Ok(true)
    }

    async fn subscribe_landings(&self) -> Result<mpsc::UnboundedReceiver<Id>> {
        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .context("Failed to connect landing listener")?;
        listener
            .listen(LANDINGS_CHANNEL)
            .await
            .context("Failed to listen for landings")?;

        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    Ok(notification) => {
                        if sender.send(notification.payload().to_string()).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Landing notification stream failed: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(receiver)
    }
}

#[async_trait::async_trait]
impl CargoStore for PostgresStore {
    async fn get_cargo(&self, id: &Id) -> Result<Option<Cargo>> {
        let query = format!("SELECT {CARGO_COLUMNS} FROM cargo WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch cargo")?;

        row.as_ref().map(cargo_from_row).transpose()
    }

    async fn insert_cargo(&self, cargo: Cargo) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cargo (id, location, destination, received, status, courier, delivered)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&cargo.id)
        .bind(&cargo.location)
        .bind(&cargo.destination)
        .bind(cargo.received)
        .bind(cargo.status.as_str())
        .bind(&cargo.courier)
        .bind(cargo.delivered)
        .execute(&self.pool)
        .await
        .context("Failed to insert cargo")?;

        Ok(())
    }

    async fn list_cargo_in_process_at(&self, location: &Id) -> Result<Vec<Cargo>> {
        let query = format!(
            "SELECT {CARGO_COLUMNS} FROM cargo WHERE location = $1 AND status = $2 ORDER BY received"
        );
        let rows = sqlx::query(&query)
            .bind(location)
            .bind(CargoStatus::InProcess.as_str())
            .fetch_all(&self.pool)
            .await
            .context("Failed to list cargo at location")?;

        rows.iter().map(cargo_from_row).collect()
    }

    async fn mark_cargo_delivered(&self, id: &Id, at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query("UPDATE cargo SET status = $2, delivered = $3 WHERE id = $1")
            .bind(id)
            .bind(CargoStatus::Delivered.as_str())
            .bind(at)
            .execute(&self.pool)
            .await
            .context("Failed to mark cargo delivered")?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_cargo_courier(&self, id: &Id, courier: Option<Id>) -> Result<bool> {
        let result = sqlx::query("UPDATE cargo SET courier = $2 WHERE id = $1")
            .bind(id)
            .bind(courier)
            .execute(&self.pool)
            .await
            .context("Failed to update cargo courier")?;

        Ok(result.rows_affected() > 0)
    }

    async fn move_cargo(&self, id: &Id, location: &Id) -> Result<bool> {
        let result = sqlx::query("UPDATE cargo SET location = $2 WHERE id = $1")
            .bind(id)
            .bind(location)
            .execute(&self.pool)
            .await
            .context("Failed to move cargo")?;

        Ok(result.rows_affected() > 0)
    }
}

impl Store for PostgresStore {}
