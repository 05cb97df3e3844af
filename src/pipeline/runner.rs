use anyhow::{Context, Result};
use log::info;
use rand::Rng;
use serde::Serialize;

use crate::config::SeedingConfig;
use crate::model::{COLLECTION_CITIES, COLLECTION_PLANES, COLLECTION_WORLD_CITIES};
use crate::pipeline::{reduce_cities, sample_rng, seed_planes};
use crate::store::traits::Store;

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub source: &'static str,
    pub destination: &'static str,
    /// Records read from the source collection
    pub read: usize,
    /// Records produced by the stages
    pub emitted: usize,
    /// Records in the destination after the replace
    pub written: usize,
}

/// Rebuild `cities` from the raw dataset
pub async fn run_city_reduction<S: Store>(store: &S, settings: &SeedingConfig) -> Result<StageReport> {
    let world_cities = store
        .list_world_cities()
        .await
        .context("Failed to read the raw cities dataset")?;

    let cities = reduce_cities(&world_cities, settings);
    let emitted = cities.len();
    let written = store
        .replace_cities(cities)
        .await
        .context("Failed to replace the cities collection")?;

    let report = StageReport {
        source: COLLECTION_WORLD_CITIES,
        destination: COLLECTION_CITIES,
        read: world_cities.len(),
        emitted,
        written,
    };
    info!(
        "{} -> {}: read {}, emitted {}, written {}",
        report.source, report.destination, report.read, report.emitted, report.written
    );
    Ok(report)
}

/// Rebuild `planes` from a sample of `cities`
pub async fn run_plane_seeding<S: Store, R: Rng + Send>(
    store: &S,
    settings: &SeedingConfig,
    rng: &mut R,
) -> Result<StageReport> {
    let cities = store
        .list_cities()
        .await
        .context("Failed to read the cities collection")?;

    let planes = seed_planes(&cities, settings, rng);
    let emitted = planes.len();
    let written = store
        .replace_planes(planes)
        .await
        .context("Failed to replace the planes collection")?;

    let report = StageReport {
        source: COLLECTION_CITIES,
        destination: COLLECTION_PLANES,
        read: cities.len(),
        emitted,
        written,
    };
    info!(
        "{} -> {}: read {}, emitted {}, written {}",
        report.source, report.destination, report.read, report.emitted, report.written
    );
    Ok(report)
}

/// Both pipelines, cities first
pub async fn run_all<S: Store>(store: &S, settings: &SeedingConfig) -> Result<Vec<StageReport>> {
    let cities = run_city_reduction(store, settings).await?;
    let mut rng = sample_rng(settings.sample_seed);
    let planes = run_plane_seeding(store, settings, &mut rng).await?;
    Ok(vec![cities, planes])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorldCity;
    use crate::store::{CityStore, MemoryStore, PlaneStore, WorldCityStore};

    fn dataset() -> Vec<WorldCity> {
        let mut cities = Vec::new();
        for country in 0..20 {
            for rank in 0..20 {
                cities.push(WorldCity::new(
                    format!("City{country}x{rank}"),
                    format!("Country{country:02}"),
                    format!("C{country}"),
                    country as f64,
                    rank as f64,
                    Some(500.0 + rank as f64 * 1000.0),
                ));
            }
        }
        cities
    }

    #[tokio::test]
    async fn test_run_all_rebuilds_both_collections() {
        let store = MemoryStore::new();
        store.replace_world_cities(dataset()).await.unwrap();

        let settings = SeedingConfig {
            sample_seed: Some(11),
            ..SeedingConfig::default()
        };
        let reports = run_all(&store, &settings).await.unwrap();

        // 19 of 20 cities per country exceed 1000; 15 kept for each of 20 countries
        assert_eq!(reports[0].read, 400);
        assert_eq!(reports[0].written, 300);
        assert_eq!(reports[1].read, 300);
        assert_eq!(reports[1].written, 200);
        assert_eq!(store.list_cities().await.unwrap().len(), 300);
        assert_eq!(store.list_planes().await.unwrap().len(), 200);
    }

    #[tokio::test]
    async fn test_seeded_runs_are_idempotent() {
        let store = MemoryStore::new();
        store.replace_world_cities(dataset()).await.unwrap();
        let settings = SeedingConfig {
            sample_seed: Some(5),
            ..SeedingConfig::default()
        };

        run_all(&store, &settings).await.unwrap();
        let first = store.list_planes().await.unwrap();
        run_all(&store, &settings).await.unwrap();
        let second = store.list_planes().await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_dataset_clears_destinations() {
        let store = MemoryStore::new();
        store.replace_world_cities(dataset()).await.unwrap();
        run_all(&store, &SeedingConfig::default()).await.unwrap();

        store.replace_world_cities(Vec::new()).await.unwrap();
        let reports = run_all(&store, &SeedingConfig::default()).await.unwrap();

        assert_eq!(reports[0].written, 0);
        assert_eq!(reports[1].written, 0);
        assert!(store.list_planes().await.unwrap().is_empty());
    }
}
