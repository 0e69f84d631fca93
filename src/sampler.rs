use crate::grid::Grid;
use crate::tables::{FieldTables, SampleTable};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use indicatif::ProgressBar;
use tracing::debug;

/// Total intensity comes back in nT; the tables store Gauss.
pub const INTENSITY_SCALE: f64 = 1.0e-5;

// Field components at one point as returned by the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationResult {
    pub declination: f64,
    pub inclination: f64,
    pub total_intensity: f64,
}

/// Anything that can evaluate a geomagnetic model at a point.
pub trait FieldModel {
    fn evaluate(
        &mut self,
        latitude: f64,
        longitude: f64,
        altitude_km: f64,
        date: NaiveDate,
    ) -> Result<EvaluationResult>;
}

/// Console line for one sampled point: lat lon intensity inclination declination.
fn progress_line(lat: f64, lon: f64, intensity: f64, field: &EvaluationResult) -> String {
    format!(
        "{} {} {} {} {}",
        lat, lon, intensity, field.inclination, field.declination
    )
}

fn report(pb: &ProgressBar, line: String) {
    if pb.is_hidden() {
        println!("{}", line);
    } else {
        pb.println(line);
    }
}

// Scan the whole grid, latitude outer and longitude inner. Stops at the first failure.
pub fn sample_grid<M: FieldModel + ?Sized>(
    grid: &Grid,
    model: &mut M,
    date: NaiveDate,
    pb: &ProgressBar,
) -> Result<FieldTables> {
    let total = grid.num_points();
    let mut declination = Vec::with_capacity(total);
    let mut inclination = Vec::with_capacity(total);
    let mut intensity = Vec::with_capacity(total);

    for (_, lat, _, lon) in grid.points() {
        let field = model
            .evaluate(lat, lon, 0.0, date)
            .with_context(|| format!("Failed to evaluate field at lat {} lon {}", lat, lon))?;

        let scaled = field.total_intensity * INTENSITY_SCALE;
        if !(scaled.is_finite() && field.inclination.is_finite() && field.declination.is_finite()) {
            bail!(
                "Model returned non-finite values at lat {} lon {}: {:?}",
                lat,
                lon,
                field
            );
        }

        intensity.push(scaled);
        inclination.push(field.inclination);
        declination.push(field.declination);

        report(pb, progress_line(lat, lon, scaled, &field));
        pb.inc(1);
    }

    debug!(points = total, "grid scan finished");

    let (rows, cols) = (grid.num_lat(), grid.num_lon());
    Ok(FieldTables {
        declination: SampleTable::new(rows, cols, declination)?,
        inclination: SampleTable::new(rows, cols, inclination)?,
        intensity: SampleTable::new(rows, cols, intensity)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::GridConfig;
    use anyhow::anyhow;

    /// Deterministic stand-in for the web service.
    pub(crate) struct FakeModel {
        pub calls: usize,
        pub fail_at: Option<usize>,
    }

    impl FakeModel {
        pub(crate) fn new() -> Self {
            FakeModel {
                calls: 0,
                fail_at: None,
            }
        }

        pub(crate) fn failing_at(call: usize) -> Self {
            FakeModel {
                calls: 0,
                fail_at: Some(call),
            }
        }
    }

    impl FieldModel for FakeModel {
        fn evaluate(
            &mut self,
            latitude: f64,
            longitude: f64,
            altitude_km: f64,
            _date: NaiveDate,
        ) -> Result<EvaluationResult> {
            self.calls += 1;
            if self.fail_at == Some(self.calls) {
                return Err(anyhow!("connection reset"));
            }
            assert_eq!(altitude_km, 0.0);
            Ok(EvaluationResult {
                declination: longitude / 10.0,
                inclination: latitude,
                total_intensity: 25_000.0 + latitude.abs() * 400.0,
            })
        }
    }

    pub(crate) fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn small_grid() -> Grid {
        Grid::build(&GridConfig {
            resolution: 30.0,
            min_lat: -30.0,
            max_lat: 30.0,
            min_lon: 0.0,
            max_lon: 90.0,
        })
        .unwrap()
    }

    #[test]
    fn fills_every_cell_in_row_major_order() {
        let grid = small_grid();
        let mut model = FakeModel::new();
        let tables = sample_grid(&grid, &mut model, date(), &ProgressBar::hidden()).unwrap();

        assert_eq!(model.calls, 12);
        assert_eq!((tables.rows(), tables.cols()), (3, 4));
        assert_eq!(tables.inclination.get(0, 3), Some(-30.0));
        assert_eq!(tables.declination.get(2, 3), Some(9.0));
        let expected = (25_000.0 + 30.0 * 400.0) * INTENSITY_SCALE;
        assert!((tables.intensity.get(2, 0).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn full_world_grid_has_703_cells_per_table() {
        let grid = Grid::build(&GridConfig::new()).unwrap();
        let mut model = FakeModel::new();
        let tables = sample_grid(&grid, &mut model, date(), &ProgressBar::hidden()).unwrap();
        assert_eq!(model.calls, 703);
        for (_, table) in tables.named() {
            assert_eq!((table.rows(), table.cols()), (19, 37));
            assert!(table.iter_rows().flatten().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn first_failure_aborts_the_scan() {
        let grid = small_grid();
        let mut model = FakeModel::failing_at(5);
        let err = sample_grid(&grid, &mut model, date(), &ProgressBar::hidden()).unwrap_err();
        assert_eq!(model.calls, 5);
        // fifth point is row 1, col 0
        assert!(err.to_string().contains("lat 0 lon 0"));
    }

    #[test]
    fn console_line_lists_point_then_values() {
        let field = EvaluationResult {
            declination: -3.25,
            inclination: 65.5,
            total_intensity: 48_000.0,
        };
        let line = progress_line(50.0, -10.0, 0.48, &field);
        assert_eq!(line, "50 -10 0.48 65.5 -3.25");
    }

    struct NanModel;

    impl FieldModel for NanModel {
        fn evaluate(&mut self, _: f64, _: f64, _: f64, _: NaiveDate) -> Result<EvaluationResult> {
            Ok(EvaluationResult {
                declination: f64::NAN,
                inclination: 0.0,
                total_intensity: 50_000.0,
            })
        }
    }

    #[test]
    fn non_finite_results_are_errors() {
        let grid = small_grid();
        assert!(sample_grid(&grid, &mut NanModel, date(), &ProgressBar::hidden()).is_err());
    }
}
