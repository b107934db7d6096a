use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use biasvar::{
    config::Config,
    dataset::Dataset,
    model::sweep,
    plotting::{backend::plotters::Backend, render_error_curve},
    session::{self, Command, Outcome, Session, HELP},
};

const USAGE: &str = "\
Usage: biasvar [once|sweep|help] [key=value ...]

Modes:
  (none)    interactive prompt; every change redraws the plot
  once      draw the selected regime once and exit
  sweep     print and plot the error-vs-degree table
  help      show this message

Settings:
  config=<path.json>            load settings from a JSON file, before any other key
  output=<path.png>             where the regime plot is written
  regime=<label>                underfitting, balanced or overfitting (or 1, 2, 3)
  basis=monomial|chebyshev      polynomial basis for every fit
  seed=<u64>                    seed for the noise and the split
  train=on|off, test=on|off     highlight the partitions
  samples, noise, test_ratio, max_degree, seeds, sweep_output";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Interactive,
    Once,
    Sweep,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "help" | "--help" | "-h"))
    {
        println!("{USAGE}");
        return Ok(());
    }

    //
    // The config file goes first, so the other keys override it wherever they appear
    let mut config = match args.iter().find_map(|arg| arg.strip_prefix("config=")) {
        Some(path) => {
            Config::load(path).with_context(|| format!("Failed to load config `{path}`"))?
        }
        None => Config::default(),
    };

    let mut mode = Mode::Interactive;
    for arg in &args {
        match arg.as_str() {
            "once" => mode = Mode::Once,
            "sweep" => mode = Mode::Sweep,
            _ => {
                let Some((key, value)) = arg.split_once('=') else {
                    anyhow::bail!("Unrecognized argument `{arg}`; try `biasvar help`");
                };
                if key != "config" {
                    config
                        .set(key, value)
                        .with_context(|| format!("Invalid argument `{arg}`"))?;
                }
            }
        }
    }
    config.validate().context("Invalid configuration")?;

    match mode {
        Mode::Sweep => run_sweep(&config),
        Mode::Once | Mode::Interactive => {
            let data = Dataset::generate(&config.dataset).context("Failed to generate data")?;
            let session = Session::new(data, config.fit.basis)
                .with_regime(config.fit.regime)
                .with_view(config.view);

            if mode == Mode::Once {
                run_once(&session, &config)
            } else {
                run_interactive(session, &config)
            }
        }
    }
}

fn run_once(session: &Session, config: &Config) -> Result<()> {
    let mut backend = Backend::new(&config.plot.output, config.plot.size);
    let mut draw = session::renderer(&mut backend, &config.plot);

    if let Outcome::Redrawn(summary) = session.redraw(&mut draw)? {
        println!("{summary}");
        println!("Plot written to {}", config.plot.output.display());
    }
    Ok(())
}

fn run_interactive(mut session: Session, config: &Config) -> Result<()> {
    let mut backend = Backend::new(&config.plot.output, config.plot.size);
    let mut draw = session::renderer(&mut backend, &config.plot);

    println!(
        "{} points, {} for training and {} held out ({} basis, seed {})",
        session.data().len(),
        session.data().train().len(),
        session.data().test().len(),
        session.basis(),
        config.dataset.seed
    );
    println!(
        "The plot is redrawn to {} after every change.\n",
        config.plot.output.display()
    );
    println!("{}\n", session.menu());

    if let Outcome::Redrawn(summary) = session.redraw(&mut draw)? {
        println!("{summary}");
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to write prompt")?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("Failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        //
        // A bad line or a failed frame is reported, and the prompt carries on
        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match session.apply(command, &mut draw) {
            Ok(Outcome::Redrawn(summary)) => {
                if matches!(command, Command::Select(_)) {
                    println!("{}", session.menu());
                }
                println!("{summary}");
            }
            Ok(Outcome::Help) => println!("{HELP}"),
            Ok(Outcome::Quit) => break,
            Err(e) => println!("{e}"),
        }
    }

    Ok(())
}

fn run_sweep(config: &Config) -> Result<()> {
    let seeds = config.sweep_seeds();
    let curve = sweep(
        &config.dataset,
        config.fit.sweep_max_degree,
        &seeds,
        config.fit.basis,
    )
    .context("Sweep failed")?;
    print!("{curve}");

    let mut backend = Backend::new(&config.plot.sweep_output, config.plot.size);
    render_error_curve(&mut backend, &curve, &config.plot)
        .context("Failed to draw the error curve")?;
    println!("Plot written to {}", config.plot.sweep_output.display());
    Ok(())
}
