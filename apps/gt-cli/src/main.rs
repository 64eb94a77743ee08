mod error;

use clap::{Parser, Subcommand};
use error::{AppError, AppResult};
use gt_model::{FiniteDifferenceModel, GroundTemperatureModel};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Parser)]
#[command(name = "gt-cli")]
#[command(about = "Ground temperature model - 1-D finite-difference soil column", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a site configuration file
    Validate {
        /// Path to the site YAML or JSON file
        site_path: PathBuf,
    },
    /// Solve the annual profile and print monthly temperatures
    Solve {
        /// Path to the site YAML or JSON file
        site_path: PathBuf,
        /// Depths to tabulate (m)
        #[arg(long, value_delimiter = ',', default_values_t = vec![0.5, 1.0, 2.0, 4.0, 8.0])]
        depths: Vec<f64>,
    },
    /// Query the temperature at one depth and time
    Query {
        /// Path to the site YAML or JSON file
        site_path: PathBuf,
        /// Depth below grade (m)
        #[arg(long)]
        depth: f64,
        /// Seconds since the start of the year
        #[arg(long, conflicts_with_all = ["month", "day"])]
        seconds: Option<f64>,
        /// Month of year (1-12), centred in the month
        #[arg(long, conflicts_with = "day")]
        month: Option<u32>,
        /// Fractional day-of-year coordinate (day 1 = 1.0)
        #[arg(long)]
        day: Option<f64>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { site_path } => cmd_validate(&site_path),
        Commands::Solve { site_path, depths } => cmd_solve(&site_path, &depths),
        Commands::Query {
            site_path,
            depth,
            seconds,
            month,
            day,
        } => cmd_query(&site_path, depth, seconds, month, day),
    }
}

fn load_model(site_path: &Path) -> AppResult<FiniteDifferenceModel> {
    let config = gt_project::load(site_path)?;
    debug!(site = %config.name, path = %site_path.display(), "loaded site configuration");
    Ok(config.build_model(site_path.parent())?)
}

fn cmd_validate(site_path: &Path) -> AppResult<()> {
    println!("Validating site: {}", site_path.display());
    let config = gt_project::load(site_path)?;
    println!("✓ Site '{}' is valid", config.name);
    Ok(())
}

fn cmd_solve(site_path: &Path, depths: &[f64]) -> AppResult<()> {
    let mut model = load_model(site_path)?;
    println!("Solving ground profile for: {}", model.name());

    let profile = model.solve()?;
    let outcome = profile.outcome;
    let caps = profile.initial.capacities;
    let cells = profile.cells.len();
    let bottom = profile.cells.last().map(|c| c.max_z).unwrap_or_default();
    let seed = profile.initial.seed;

    if outcome.converged {
        println!("✓ Converged after {} year(s)", outcome.years);
    } else {
        println!(
            "! Not converged after {} year(s); last change {:.4} °C",
            outcome.years, outcome.max_delta_c
        );
    }
    println!("  Cells: {cells} down to {bottom:.2} m");
    println!("  Inner sweeps: {}", outcome.total_sweeps);
    println!(
        "  Seed: mean {:.2} °C, amplitude {:.2} °C",
        seed.mean_c, seed.amplitude_c
    );
    println!(
        "  ρ·cp (J/m³·K): liquid {:.3e}, freezing {:.3e}, ice {:.3e}",
        caps.liquid, caps.transient, caps.ice
    );

    print!("\n{:>8}", "depth m");
    for name in MONTH_NAMES {
        print!("{name:>7}");
    }
    println!();
    for &depth in depths {
        print!("{depth:>8.2}");
        for month in 1..=12 {
            let t = model.temperature_at_month(depth, month)?;
            print!("{t:>7.2}");
        }
        println!();
    }
    Ok(())
}

fn cmd_query(
    site_path: &Path,
    depth: f64,
    seconds: Option<f64>,
    month: Option<u32>,
    day: Option<f64>,
) -> AppResult<()> {
    let mut model = load_model(site_path)?;
    let t = match (seconds, month, day) {
        (Some(seconds), None, None) => model.temperature_at_seconds(depth, seconds)?,
        (None, Some(month), None) => model.temperature_at_month(depth, month)?,
        (None, None, Some(day)) => model.temperature(depth, day)?,
        _ => {
            return Err(AppError::InvalidArgument(
                "give exactly one of --seconds, --month or --day".to_string(),
            ));
        }
    };
    println!("{t:.3} °C at {depth} m");
    Ok(())
}
