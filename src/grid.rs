use crate::config::GridConfig;
use thiserror::Error;

// Step counts within this of an integer are treated as exact
const STEP_TOLERANCE: f64 = 1e-9;

/// Upper bound on grid points; one web query is made per point.
pub const MAX_POINTS: usize = 4_000_000;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("resolution must be a positive finite number, got {0}")]
    BadResolution(f64),
    #[error("{axis} bounds are not finite: [{min}, {max}]")]
    NonFinite { axis: &'static str, min: f64, max: f64 },
    #[error("{axis} minimum {min} is greater than maximum {max}")]
    Inverted { axis: &'static str, min: f64, max: f64 },
    #[error("{axis} bounds [{min}, {max}] exceed [-{limit}, {limit}]")]
    OutOfRange {
        axis: &'static str,
        min: f64,
        max: f64,
        limit: f64,
    },
    #[error("{axis} span {span} is not a multiple of resolution {resolution}")]
    Uneven {
        axis: &'static str,
        span: f64,
        resolution: f64,
    },
    #[error("grid of {points} points exceeds the limit of {limit}")]
    TooLarge { points: f64, limit: usize },
}

/// Ordered sample coordinates, both ends inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
}

impl Grid {
    pub fn build(config: &GridConfig) -> Result<Self, GridError> {
        let res = config.resolution;
        if !res.is_finite() || res <= 0.0 {
            return Err(GridError::BadResolution(res));
        }

        let lats = axis("latitude", config.min_lat, config.max_lat, 90.0, res)?;
        let lons = axis("longitude", config.min_lon, config.max_lon, 180.0, res)?;

        match lats.len().checked_mul(lons.len()) {
            Some(points) if points <= MAX_POINTS => {}
            _ => {
                return Err(GridError::TooLarge {
                    points: lats.len() as f64 * lons.len() as f64,
                    limit: MAX_POINTS,
                });
            }
        }

        Ok(Grid { lats, lons })
    }

    pub fn num_lat(&self) -> usize {
        self.lats.len()
    }

    pub fn num_lon(&self) -> usize {
        self.lons.len()
    }

    pub fn num_points(&self) -> usize {
        self.lats.len() * self.lons.len()
    }

    /// Row-major walk: latitude outer, longitude inner.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64, usize, f64)> + '_ {
        self.lats.iter().enumerate().flat_map(move |(i, &lat)| {
            self.lons.iter().enumerate().map(move |(j, &lon)| (i, lat, j, lon))
        })
    }
}

fn axis(name: &'static str, min: f64, max: f64, limit: f64, res: f64) -> Result<Vec<f64>, GridError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(GridError::NonFinite { axis: name, min, max });
    }
    if min > max {
        return Err(GridError::Inverted { axis: name, min, max });
    }
    if min < -limit || max > limit {
        return Err(GridError::OutOfRange {
            axis: name,
            min,
            max,
            limit,
        });
    }

    let span = max - min;
    let steps = span / res;
    let whole = steps.round();
    if (steps - whole).abs() > STEP_TOLERANCE * whole.max(1.0) {
        return Err(GridError::Uneven {
            axis: name,
            span,
            resolution: res,
        });
    }

    if whole + 1.0 > MAX_POINTS as f64 {
        return Err(GridError::TooLarge {
            points: whole + 1.0,
            limit: MAX_POINTS,
        });
    }

    let steps = whole as usize;
    // min + i * res rather than accumulating, and pin the last value to max
    let mut values: Vec<f64> = (0..=steps).map(|i| min + i as f64 * res).collect();
    if let Some(last) = values.last_mut() {
        *last = max;
    }
    Ok(values)
}
