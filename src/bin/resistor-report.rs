//! Command-line front end: evaluates the reference catalog or a netlist file.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resistor_networks::catalog::reference_cases;
use resistor_networks::circuits::{analyze, parse_netlist, resistance_table};
use resistor_networks::config::{ReducerConfig, ReductionStrategy};
use resistor_networks::report::{evaluate, render_table, write_summary_csv, DEFAULT_RELATIVE_TOLERANCE};

#[derive(Parser, Debug)]
#[command(name = "resistor-report", version, about = "Equivalent resistance of resistor networks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the built-in reference networks
    Demo {
        /// Reduction strategy
        #[arg(long, value_enum, default_value_t = Strategy::SeriesParallel)]
        strategy: Strategy,
        /// Also write the summary as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Equivalent resistance between two nodes of a netlist
    Solve {
        /// SPICE-style netlist (R cards)
        netlist: PathBuf,
        /// Source terminal
        #[arg(long)]
        from: String,
        /// Sink terminal
        #[arg(long)]
        to: String,
        /// Reduction strategy
        #[arg(long, value_enum, default_value_t = Strategy::SeriesParallel)]
        strategy: Strategy,
        /// Print every reduction step
        #[arg(long)]
        trace: bool,
    },
    /// All-pairs resistance matrix of a netlist
    Matrix {
        /// SPICE-style netlist (R cards)
        netlist: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    SeriesParallel,
    DeltaWye,
    Laplacian,
}

impl From<Strategy> for ReductionStrategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::SeriesParallel => Self::SeriesParallel,
            Strategy::DeltaWye => Self::SeriesParallelDeltaWye,
            Strategy::Laplacian => Self::LaplacianOnly,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { strategy, csv } => {
            let config = ReducerConfig::default().with_strategy(strategy.into());
            let outcomes = evaluate(&reference_cases(), &config);
            print!("{}", render_table(&outcomes, DEFAULT_RELATIVE_TOLERANCE));
            if let Some(path) = csv {
                let file = File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                write_summary_csv(BufWriter::new(file), &outcomes)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "wrote summary");
            }
            let failed = outcomes
                .iter()
                .filter(|o| !o.passed(DEFAULT_RELATIVE_TOLERANCE))
                .count();
            if failed > 0 {
                bail!("{failed} of {} reference cases failed", outcomes.len());
            }
        }
        Commands::Solve {
            netlist,
            from,
            to,
            strategy,
            trace,
        } => {
            let text = fs::read_to_string(&netlist)
                .with_context(|| format!("reading {}", netlist.display()))?;
            let network = parse_netlist(&text)
                .with_context(|| format!("parsing {}", netlist.display()))?;
            let config = ReducerConfig::default().with_strategy(strategy.into());
            let eq = analyze(&network, &from, &to, &config)
                .with_context(|| format!("solving {from}–{to}"))?;
            if trace {
                for (i, step) in eq.steps.iter().enumerate() {
                    println!("{:>4}. {step}", i + 1);
                }
            }
            println!("R({from}, {to}) = {:.9} Ω  [{:?}]", eq.ohms, eq.method);
        }
        Commands::Matrix { netlist } => {
            let text = fs::read_to_string(&netlist)
                .with_context(|| format!("reading {}", netlist.display()))?;
            let network = parse_netlist(&text)
                .with_context(|| format!("parsing {}", netlist.display()))?;
            let table = resistance_table(&network, &ReducerConfig::default())?;
            print!("{:>10}", "");
            for label in &table.labels {
                print!(" {label:>12}");
            }
            println!();
            for (i, label) in table.labels.iter().enumerate() {
                print!("{label:>10}");
                for j in 0..table.labels.len() {
                    print!(" {:>12.6}", table.values[(i, j)]);
                }
                println!();
            }
        }
    }

    Ok(())
}
