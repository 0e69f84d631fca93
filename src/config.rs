use chrono::NaiveDate;
use std::path::PathBuf;

// Sampling grid bounds and step, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    pub resolution: f64,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GridConfig {
    pub fn new() -> Self {
        GridConfig {
            resolution: 10.0,
            min_lat: -90.0,
            max_lat: 90.0,
            min_lon: -180.0,
            max_lon: 180.0,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new()
    }
}

// Remote geomagnetic model endpoint
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub model: String,
    pub revision: String,
}

impl ServiceConfig {
    pub fn new() -> Self {
        ServiceConfig {
            base_url: "https://geomag.bgs.ac.uk/web_service/GMModels".to_string(),
            model: "wmm".to_string(),
            revision: "current".to_string(),
        }
    }

    /// Full query endpoint, e.g. `.../GMModels/wmm/current/`.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/{}/",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.revision
        )
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new()
    }
}

// Everything a single generation pass needs
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub work_dir: PathBuf,
    pub marker: String,
    pub output: PathBuf,
    pub samples_csv: Option<PathBuf>,
    pub grid: GridConfig,
    pub service: ServiceConfig,
    pub date: NaiveDate,
    pub show_progress: bool,
}

impl RunConfig {
    pub fn output_path(&self) -> PathBuf {
        self.work_dir.join(&self.output)
    }

    pub fn samples_csv_path(&self) -> Option<PathBuf> {
        self.samples_csv.as_ref().map(|p| self.work_dir.join(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_model_and_revision() {
        let mut service = ServiceConfig::new();
        service.base_url = "http://localhost:8080/GMModels/".to_string();
        service.model = "igrf".to_string();
        service.revision = "13".to_string();
        assert_eq!(service.endpoint(), "http://localhost:8080/GMModels/igrf/13/");
    }

    #[test]
    fn default_grid_matches_shipped_tables() {
        let grid = GridConfig::default();
        assert_eq!(grid.resolution, 10.0);
        assert_eq!((grid.min_lat, grid.max_lat), (-90.0, 90.0));
        assert_eq!((grid.min_lon, grid.max_lon), (-180.0, 180.0));
    }
}
