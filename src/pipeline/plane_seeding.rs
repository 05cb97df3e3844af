use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::config::SeedingConfig;
use crate::model::{City, Plane};

/// Draws up to `plane_sample_size` distinct cities and emits one plane per city.
///
/// Cities are put in id order before sampling so that a seeded rng always picks
/// the same planes for the same collection. When fewer cities exist than the
/// sample size, every city is used. Plane ids are `{prefix}{n}` with `n`
/// counting from 0 in emission order.
pub fn seed_planes<R: Rng + ?Sized>(
    cities: &[City],
    settings: &SeedingConfig,
    rng: &mut R,
) -> Vec<Plane> {
    let mut ordered: Vec<&City> = cities.iter().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    ordered
        .choose_multiple(rng, settings.plane_sample_size)
        .enumerate()
        .map(|(sequence, city)| {
            Plane::seeded(
                format!("{}{}", settings.plane_id_prefix, sequence),
                city.position,
            )
        })
        .collect()
}

pub fn sample_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}
