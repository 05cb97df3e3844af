use crate::model::WorldCity;
use crate::store::traits::Store;
use anyhow::Result;

/// (city_ascii, country, iso2, lng, lat, population)
type Row = (&'static str, &'static str, &'static str, f64, f64, Option<f64>);

const DEMO_CITIES: &[Row] = &[
    ("London", "United Kingdom", "GB", -0.1275, 51.5072, Some(11_262_000.0)),
    ("Birmingham", "United Kingdom", "GB", -1.9025, 52.4800, Some(2_919_600.0)),
    ("Manchester", "United Kingdom", "GB", -2.2333, 53.4794, Some(2_705_000.0)),
    ("Glasgow", "United Kingdom", "GB", -4.2500, 55.8611, Some(1_000_000.0)),
    ("Paris", "France", "FR", 2.3522, 48.8567, Some(11_060_000.0)),
    ("Marseille", "France", "FR", 5.3700, 43.2964, Some(873_076.0)),
    ("Lyon", "France", "FR", 4.8400, 45.7600, Some(522_250.0)),
    ("Berlin", "Germany", "DE", 13.3833, 52.5167, Some(3_644_826.0)),
    ("Hamburg", "Germany", "DE", 10.0000, 53.5500, Some(1_841_179.0)),
    ("Munich", "Germany", "DE", 11.5755, 48.1372, Some(1_471_508.0)),
    ("Madrid", "Spain", "ES", -3.7167, 40.4167, Some(6_211_000.0)),
    ("Barcelona", "Spain", "ES", 2.1769, 41.3825, Some(4_800_000.0)),
    ("Rome", "Italy", "IT", 12.4828, 41.8931, Some(2_872_800.0)),
    ("Milan", "Italy", "IT", 9.1900, 45.4669, Some(1_366_180.0)),
    ("Cairo", "Egypt", "EG", 31.2358, 30.0444, Some(20_296_000.0)),
    ("Alexandria", "Egypt", "EG", 29.9167, 31.2000, Some(5_200_000.0)),
    ("Lagos", "Nigeria", "NG", 3.3958, 6.4550, Some(15_388_000.0)),
    ("Nairobi", "Kenya", "KE", 36.8172, -1.2864, Some(4_397_073.0)),
    ("New York", "United States", "US", -73.9249, 40.6943, Some(18_972_871.0)),
    ("Los Angeles", "United States", "US", -118.4068, 34.1141, Some(12_121_244.0)),
    ("Chicago", "United States", "US", -87.6866, 41.8375, Some(8_595_181.0)),
    ("Mexico City", "Mexico", "MX", -99.1333, 19.4333, Some(21_804_000.0)),
    ("Sao Paulo", "Brazil", "BR", -46.6333, -23.5500, Some(22_495_000.0)),
    ("Buenos Aires", "Argentina", "AR", -58.3817, -34.6033, Some(16_157_000.0)),
    ("Tokyo", "Japan", "JP", 139.6922, 35.6897, Some(37_732_000.0)),
    ("Osaka", "Japan", "JP", 135.5022, 34.6939, Some(15_126_000.0)),
    ("Delhi", "India", "IN", 77.2300, 28.6100, Some(32_226_000.0)),
    ("Mumbai", "India", "IN", 72.8775, 19.0761, Some(24_973_000.0)),
    ("Sydney", "Australia", "AU", 151.2100, -33.8678, Some(4_840_600.0)),
    ("Auckland", "New Zealand", "NZ", 174.7400, -36.8406, Some(1_346_091.0)),
    ("Longyearbyen", "Svalbard", "XR", 15.6333, 78.2167, Some(1_000.0)),
    ("Adamstown", "Pitcairn Islands", "PN", -130.1000, -25.0667, Some(40.0)),
    ("Vatican City", "Vatican City", "VA", 12.4533, 41.9033, None),
];

pub fn demo_world_cities() -> Vec<WorldCity> {
    DEMO_CITIES
        .iter()
        .map(|&(city_ascii, country, iso2, lng, lat, population)| {
            WorldCity::new(city_ascii, country, iso2, lng, lat, population)
        })
        .collect()
}

/// Replace the raw dataset with a small built-in sample of world cities
pub async fn load_seed_data<S: Store>(store: &S) -> Result<usize> {
    store.replace_world_cities(demo_world_cities()).await
}
