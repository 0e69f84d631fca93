use crate::config::RunConfig;
use crate::grid::Grid;
use crate::io;
use crate::sampler::{FieldModel, sample_grid};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{marker} not found in {dir:?}, please run this tool from the AP_Declination directory")]
    MissingMarker { marker: String, dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub output: PathBuf,
    pub rows: usize,
    pub cols: usize,
    pub points: usize,
}

pub fn check_marker(dir: &Path, marker: &str) -> Result<(), GenerateError> {
    if dir.join(marker).is_file() {
        Ok(())
    } else {
        Err(GenerateError::MissingMarker {
            marker: marker.to_string(),
            dir: dir.to_path_buf(),
        })
    }
}

fn progress_bar(total: usize, visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} points ({eta})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// One complete pass. The model is only built once the marker file has been found.
pub fn generate<M, F>(config: &RunConfig, make_model: F) -> Result<GenerationSummary>
where
    M: FieldModel,
    F: FnOnce() -> Result<M>,
{
    check_marker(&config.work_dir, &config.marker)?;

    let grid = Grid::build(&config.grid).context("Invalid sampling grid")?;
    info!(
        lats = grid.num_lat(),
        lons = grid.num_lon(),
        "Fetching fields as of {}",
        config.date.format("%Y-%m-%d")
    );

    let mut model = make_model()?;
    let pb = progress_bar(grid.num_points(), config.show_progress)?;
    let tables = sample_grid(&grid, &mut model, config.date, &pb)?;
    pb.finish_and_clear();

    let output = config.output_path();
    io::source::write_source(&output, &config.grid, &tables)?;
    info!("Tables written to {:?}", output);

    if let Some(csv_path) = config.samples_csv_path() {
        io::csv::write_samples(&csv_path, &grid, &tables)?;
        info!("Samples written to {:?}", csv_path);
    }

    Ok(GenerationSummary {
        output,
        rows: tables.rows(),
        cols: tables.cols(),
        points: grid.num_points(),
    })
}
