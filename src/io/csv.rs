use crate::grid::Grid;
use crate::tables::FieldTables;
use anyhow::{Context, Result};
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::path::Path;

// Create CSV writer with headers
pub fn create_csv_writer(path: &Path) -> Result<Writer<File>> {
    let mut wtr = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to create CSV file: {:?}", path))?;

    wtr.write_record(["lat", "lon", "intensity", "inclination", "declination"])?;

    Ok(wtr)
}

/// One row per grid point, in scan order.
pub fn write_samples(path: &Path, grid: &Grid, tables: &FieldTables) -> Result<()> {
    let mut wtr = create_csv_writer(path)?;

    for (i, lat, j, lon) in grid.points() {
        let cell = |name: &str, value: Option<f64>| {
            value.with_context(|| format!("{} table has no cell ({}, {})", name, i, j))
        };
        wtr.write_record(&[
            lat.to_string(),
            lon.to_string(),
            cell("intensity", tables.intensity.get(i, j))?.to_string(),
            cell("inclination", tables.inclination.get(i, j))?.to_string(),
            cell("declination", tables.declination.get(i, j))?.to_string(),
        ])?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::tables::SampleTable;

    #[test]
    fn dumps_one_row_per_point() {
        let grid = Grid::build(&GridConfig {
            resolution: 45.0,
            min_lat: -45.0,
            max_lat: 45.0,
            min_lon: 0.0,
            max_lon: 45.0,
        })
        .unwrap();
        let table = |v: f64| SampleTable::new(3, 2, vec![v; 6]).unwrap();
        let tables = FieldTables {
            declination: table(1.5),
            inclination: table(-20.0),
            intensity: table(0.45),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        write_samples(&path, &grid, &tables).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "lat,lon,intensity,inclination,declination");
        assert_eq!(lines[1], "-45,0,0.45,-20,1.5");
        assert_eq!(lines[6], "45,45,0.45,-20,1.5");
    }
}
