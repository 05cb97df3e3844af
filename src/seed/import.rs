use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use crate::model::WorldCity;

/// Read a `worldcities.csv` export (simplemaps layout).
///
/// Columns other than `city_ascii`, `country`, `iso2`, `lng`, `lat` and
/// `population` are ignored; an empty population cell is read as unknown.
pub fn read_world_cities_csv(path: &Path) -> Result<Vec<WorldCity>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    read_world_cities(file).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn read_world_cities<R: Read>(reader: R) -> Result<Vec<WorldCity>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut cities = Vec::new();
    for (line, record) in reader.deserialize::<WorldCity>().enumerate() {
        // Header is line 1
        let city = record.with_context(|| format!("Invalid record on line {}", line + 2))?;
        cities.push(city);
    }
    Ok(cities)
}
