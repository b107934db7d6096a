//! Fits all three regimes to the default dataset, prints how each one does, and draws them
//!
//! Run with `cargo run --example regimes`; plots land in `target/regimes/`.
use biasvar::{
    dataset::{Dataset, DatasetConfig},
    model::{fit_regime, sweep, BasisKind},
    plotting::{backend::plotters::Backend, render, render_error_curve, PlotConfig, ViewState},
    regime::Regime,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DatasetConfig::default();
    let data = Dataset::generate(&config)?;
    let plot = PlotConfig::default();

    for regime in Regime::ALL {
        let fit = fit_regime(&data, regime, BasisKind::Chebyshev)?;
        println!("{}", fit.summary());
        println!("    {}", fit.equation());

        let path = format!("target/regimes/{}.png", regime.label().to_lowercase());
        let mut backend = Backend::new(&path, plot.size);
        render(&mut backend, &data, &fit, &ViewState::default(), &plot)?;
    }

    //
    // A single split is noisy; the averaged curve shows the U shape of the test error
    let seeds: Vec<u64> = (0..25).collect();
    let curve = sweep(&config, 15, &seeds, BasisKind::Chebyshev)?;
    println!("\n{curve}");

    let mut backend = Backend::new("target/regimes/sweep.png", plot.size);
    render_error_curve(&mut backend, &curve, &plot)?;

    Ok(())
}
