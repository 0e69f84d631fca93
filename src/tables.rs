use anyhow::{Result, bail};

/// Row-major grid of one sampled quantity, indexed (latitude, longitude).
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl SampleTable {
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != rows * cols {
            bail!(
                "Table of {}x{} needs {} values, got {}",
                rows,
                cols,
                rows * cols,
                values.len()
            );
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            bail!(
                "Non-finite value {} at ({}, {})",
                values[pos],
                pos / cols,
                pos % cols
            );
        }
        Ok(SampleTable { rows, cols, values })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.cols.max(1)).take(self.rows)
    }
}

// The three tables emitted into the generated source
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTables {
    pub declination: SampleTable,
    pub inclination: SampleTable,
    pub intensity: SampleTable,
}

impl FieldTables {
    pub fn rows(&self) -> usize {
        self.declination.rows()
    }

    pub fn cols(&self) -> usize {
        self.declination.cols()
    }

    /// Name / table pairs in the order they are written out.
    pub fn named(&self) -> [(&'static str, &SampleTable); 3] {
        [
            ("declination_table", &self.declination),
            ("inclination_table", &self.inclination),
            ("intensity_table", &self.intensity),
        ]
    }
}
