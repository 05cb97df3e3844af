//! Reduction of the raw `worldcities` dataset to the largest cities of each country.
//!
//! Stages, in order: population filter, rank by descending population, group by
//! country (identical records collapse), keep the first N of each group, flatten,
//! project into [`City`].
//!
//! Ties on population are broken by `city_ascii`, `iso2`, `lng` and `lat`
//! (ascending), so the same input always selects the same cities. Countries are
//! emitted in ascending name order.

use itertools::Itertools;
use std::cmp::Ordering;

use crate::config::SeedingConfig;
use crate::model::{City, WorldCity};

pub fn reduce_cities(world_cities: &[WorldCity], settings: &SeedingConfig) -> Vec<City> {
    let ranked = world_cities
        .iter()
        .filter(|city| qualifies(city, settings.min_population))
        .sorted_by(|a, b| rank_order(a, b))
        .dedup();

    let by_country = ranked.chunk_by(|city| city.country.clone());

    let mut reduced = Vec::new();
    for (_country, group) in &by_country {
        reduced.extend(
            group
                .take(settings.max_cities_per_country)
                .map(project_city),
        );
    }
    reduced
}

/// Cities without a population never qualify
fn qualifies(city: &WorldCity, min_population: f64) -> bool {
    city.population.is_some_and(|population| population > min_population)
}

/// Country ascending, then population descending, then the tie-break fields.
/// Identical records compare equal and end up adjacent.
fn rank_order(a: &WorldCity, b: &WorldCity) -> Ordering {
    let population = |city: &WorldCity| city.population.unwrap_or(f64::NEG_INFINITY);

    a.country
        .cmp(&b.country)
        .then_with(|| population(b).total_cmp(&population(a)))
        .then_with(|| a.city_ascii.cmp(&b.city_ascii))
        .then_with(|| a.iso2.cmp(&b.iso2))
        .then_with(|| a.lng.total_cmp(&b.lng))
        .then_with(|| a.lat.total_cmp(&b.lat))
}

fn project_city(city: &WorldCity) -> City {
    City {
        id: city.derived_id(),
        position: city.position(),
        country: city.country.clone(),
    }
}
