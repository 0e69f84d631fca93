use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod generate;
mod grid;
mod io;
mod sampler;
mod service;
mod tables;

use cli::get_args;
use generate::generate;
use service::WebFieldModel;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "declination_gen=info",
        1 => "declination_gen=debug",
        _ => "declination_gen=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let (config, verbose) = get_args()?;
    init_logging(verbose);

    let summary = generate(&config, || {
        let model = WebFieldModel::new(&config.service);
        info!("Using field model at {}", model.endpoint());
        Ok(model)
    })?;

    println!(
        "\nGenerated {}x{} tables ({} points). Output saved to {}",
        summary.rows,
        summary.cols,
        summary.points,
        summary.output.display()
    );
    Ok(())
}
