use crate::error::{LogisticsError, LogisticsResult};
use crate::logic::geo::{nearest_neighbors, parse_limit};
use crate::model::{City, Id};
use crate::store::traits::Store;

pub async fn list_cities<S: Store>(store: &S) -> LogisticsResult<Vec<City>> {
    Ok(store.list_cities().await?)
}

pub async fn get_city<S: Store>(store: &S, id: &Id) -> LogisticsResult<City> {
    store
        .get_city(id)
        .await?
        .ok_or_else(|| LogisticsError::CityNotFound(id.clone()))
}

/// The `limit` cities closest to `id` (`0` for all of them)
pub async fn neighbors<S: Store>(store: &S, id: &Id, limit: &str) -> LogisticsResult<Vec<City>> {
    let origin = get_city(store, id).await?;
    let limit = parse_limit(limit)?;
    let cities = store.list_cities().await?;
    Ok(nearest_neighbors(&origin, cities, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CityStore, MemoryStore};

    #[tokio::test]
    async fn test_neighbors_of_known_city() {
        let store = MemoryStore::new();
        let cities = ["A", "B", "C", "D"]
            .iter()
            .enumerate()
            .map(|(i, name)| City {
                id: format!("{name}_ZZ"),
                position: [i as f64, 0.0],
                country: "Z".to_string(),
            })
            .collect();
        store.replace_cities(cities).await.unwrap();

        let found = neighbors(&store, &"B_ZZ".to_string(), "2").await.unwrap();
        let mut ids: Vec<String> = found.into_iter().map(|c| c.id).collect();
        ids.sort();
        assert_eq!(ids, vec!["A_ZZ", "C_ZZ"]);

        // Zero is unlimited, a negative count limits by its magnitude
        let all = neighbors(&store, &"B_ZZ".to_string(), "0").await.unwrap();
        assert_eq!(all.len(), 3);
        let nearest = neighbors(&store, &"D_ZZ".to_string(), "-1").await.unwrap();
        assert_eq!(nearest.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["C_ZZ"]);
    }

    #[tokio::test]
    async fn test_neighbors_errors() {
        let store = MemoryStore::new();
        let err = neighbors(&store, &"Nowhere_ZZ".to_string(), "5").await.unwrap_err();
        assert!(err.is_not_found());

        store
            .replace_cities(vec![City {
                id: "A_ZZ".to_string(),
                position: [0.0, 0.0],
                country: "Z".to_string(),
            }])
            .await
            .unwrap();
        let err = neighbors(&store, &"A_ZZ".to_string(), "many").await.unwrap_err();
        assert!(err.is_invalid_input());
    }
}
