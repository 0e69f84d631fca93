use crate::config::GridConfig;
use crate::tables::{FieldTables, SampleTable};
use anyhow::{Context, Result};
use std::path::Path;

const CLASS: &str = "AP_Declination";

const HEADER: &str = "// this is an auto-generated file from the IGRF tables. Do not edit
// To re-generate run declination_gen from the AP_Declination directory

#include \"AP_Declination.h\"

";

fn write_constants(out: &mut String, grid: &GridConfig) {
    for (name, value) in [
        ("SAMPLING_RES", grid.resolution),
        ("SAMPLING_MIN_LAT", grid.min_lat),
        ("SAMPLING_MAX_LAT", grid.max_lat),
        ("SAMPLING_MIN_LON", grid.min_lon),
        ("SAMPLING_MAX_LON", grid.max_lon),
    ] {
        // f64 Display drops the fraction for whole numbers: 10, -90
        out.push_str(&format!("const float {}::{} = {};\n", CLASS, name, value));
    }
    out.push('\n');
}

fn write_table(out: &mut String, name: &str, table: &SampleTable) {
    out.push_str(&format!(
        "const float {}::{}[{}][{}] = {{\n",
        CLASS,
        name,
        table.rows(),
        table.cols()
    ));
    let last_row = table.rows().saturating_sub(1);
    for (i, row) in table.iter_rows().enumerate() {
        out.push_str("    {");
        let last_col = row.len().saturating_sub(1);
        for (j, value) in row.iter().enumerate() {
            out.push_str(&format!("{:.5}f", value));
            if j != last_col {
                out.push(',');
            }
        }
        out.push('}');
        if i != last_row {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("};\n\n");
}

/// Render the full `tables.cpp` text.
pub fn render_source(grid: &GridConfig, tables: &FieldTables) -> String {
    let mut out = String::from(HEADER);
    write_constants(&mut out, grid);
    for (name, table) in tables.named() {
        write_table(&mut out, name, table);
    }
    out
}

// Rendered in memory first so the file is only touched once the text is complete
pub fn write_source(path: &Path, grid: &GridConfig, tables: &FieldTables) -> Result<()> {
    let text = render_source(grid, tables);
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write tables to {:?}", path))
}
