//! Temperature sweep of the 2D Ising model
//! (see `SimConfig` for all run parameters; flags below override them).

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ising_scan::config::{RecordConvention, SimConfig};
use ising_scan::error::Result;
use ising_scan::measure::TimeSeries;
use ising_scan::report::{CsvReporter, Reporter};
use ising_scan::sweep::{SweepPoint, SweepResult, TemperatureSweep};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Metropolis temperature sweep of the 2D Ising model")]
struct Cli {
    /// Number of lattice sites N (perfect square)
    #[arg(long, default_value_t = SimConfig::default().n_sites)]
    sites: usize,

    /// Coupling constant J
    #[arg(long, default_value_t = SimConfig::default().coupling)]
    coupling: f64,

    /// Metropolis steps per temperature
    #[arg(long, default_value_t = SimConfig::default().n_iter)]
    iters: usize,

    /// Equilibration cutoff (first step included in averages)
    #[arg(long, default_value_t = SimConfig::default().t_equil)]
    equil: usize,

    /// Number of temperature samples
    #[arg(long, default_value_t = SimConfig::default().n_temps)]
    temps: usize,

    /// Lowest temperature in units of T_c
    #[arg(long, default_value_t = SimConfig::default().t_min_ratio)]
    t_min: f64,

    /// Highest temperature in units of T_c
    #[arg(long, default_value_t = SimConfig::default().t_max_ratio)]
    t_max: f64,

    /// RNG seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Record the trial energy and pre-flip magnetization at every step
    #[arg(long)]
    trial_convention: bool,

    /// Spread temperature points over all cores
    #[arg(long)]
    parallel: bool,

    /// Output directory
    #[arg(long, default_value = "ising_output")]
    output_dir: PathBuf,
}

impl Cli {
    fn config(&self) -> SimConfig {
        SimConfig {
            n_sites:     self.sites,
            coupling:    self.coupling,
            n_iter:      self.iters,
            t_equil:     self.equil,
            n_temps:     self.temps,
            t_min_ratio: self.t_min,
            t_max_ratio: self.t_max,
            seed:        self.seed,
            convention:  if self.trial_convention {
                RecordConvention::Trial
            } else {
                RecordConvention::Accepted
            },
        }
    }
}

/// Advances a progress bar on every finished point, forwards the rest.
struct ProgressReporter<R> {
    inner: R,
    bar: ProgressBar,
}

impl<R: Reporter> Reporter for ProgressReporter<R> {
    fn time_series(&mut self, label: usize, temperature: f64, tc: f64, series: &TimeSeries) -> Result<()> {
        self.bar.println(format!("  series {label}: T/Tc = {:.2}", temperature / tc));
        self.inner.time_series(label, temperature, tc, series)
    }

    fn point(&mut self, index: usize, point: &SweepPoint) -> Result<()> {
        self.bar.inc(1);
        self.inner.point(index, point)
    }

    fn sweep(&mut self, result: &SweepResult) -> Result<()> {
        self.bar.finish();
        self.inner.sweep(result)
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Cli::parse();
    let mut cfg = args.config();
    let seed = cfg.seed.unwrap_or_else(rand::random);
    cfg.seed = Some(seed);
    println!("Configuration:\n{cfg:#?}");

    let sweep = TemperatureSweep::new(cfg)?;

    let bar = ProgressBar::new(sweep.grid().len() as u64);
    bar.set_style(ProgressStyle::with_template(
        " {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]",
    )?);

    let csv = CsvReporter::new(&args.output_dir)?;
    let mut reporter = ProgressReporter { inner: csv, bar };

    let result = if args.parallel {
        sweep.run_parallel(seed, &mut reporter)?
    } else {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        sweep.run(&mut rng, &mut reporter)?
    };

    println!("\n{:>10} {:>8} {:>12} {:>12} {:>10}", "T", "T/Tc", "E", "M", "|M|");
    println!("{:-<56}", "");
    for p in &result.points {
        println!(
            "{:>10.4} {:>8.3} {:>12.4} {:>12.4} {:>10.4}",
            p.temperature,
            p.temperature / result.critical_temperature,
            p.energy,
            p.magnetization,
            p.abs_magnetization
        );
    }

    println!("Sweep complete → {}", reporter.inner.sweep_path().display());
    Ok(())
}
