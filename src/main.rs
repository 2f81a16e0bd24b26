use clap::{Parser, Subcommand};
use moo_explorer::cli;
use moo_explorer::core::DEFAULT_SAMPLE_SIZE;
use moo_explorer::error::MooResult;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "moo-explorer")]
#[command(about = "Explore multi-objective optimization logs: SPLOM data and Pareto fronts")]
#[command(long_about = "MOO Explorer - data preparation for multi-objective optimization results

Reads an optimization log (one row per iteration) and a variable
configuration listing objectives, constraints and design variables.

COMMANDS:
  inspect  - List columns, array columns and their roles
  resolve  - Build scatter-plot-matrix dimensions for selected variables
  pareto   - Indices of non-dominated iterations
  detail   - All values of a single iteration

INPUTS:
  Log:     .json (split or records layout), .xlsx, .xls, .ods
  Config:  YAML with objectives / constraints / design_vars lists;
           entries are a name or [name, {lower: .., upper: ..}]

EXAMPLES:
  moo-explorer inspect log.json -c analysis.yaml
  moo-explorer resolve log.json -c analysis.yaml financese.lcoe tower.stress --pareto
  moo-explorer pareto log.json -o financese.lcoe -o financese.aep --sense financese.aep=max
  moo-explorer detail log.json 12

Set RUST_LOG=moo_explorer=debug (or pass --verbose) for per-dimension diagnostics.")]
#[command(version)]
struct Cli {
    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the columns of an optimization log
    Inspect {
        /// Optimization log (.json, .xlsx, .xls, .ods)
        table: PathBuf,

        /// Variable configuration YAML
        #[arg(short, long, env = "MOO_CONFIG")]
        config: Option<PathBuf>,

        /// Non-missing cells sampled per column for array detection
        #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
        sample_size: usize,
    },

    #[command(long_about = "Resolve selected variables into plottable dimensions.

Plain names select scalar columns. Array columns are selected either by
their plain name (both halves) or as NAME_min / NAME_max. Constraint
bounds from the config replace out-of-bounds array extremes with NaN.")]
    /// Build scatter-plot-matrix dimensions for selected variables
    Resolve {
        /// Optimization log (.json, .xlsx, .xls, .ods)
        table: PathBuf,

        /// Selected variables (NAME, NAME_min, NAME_max)
        variables: Vec<String>,

        /// Variable configuration YAML
        #[arg(short, long, env = "MOO_CONFIG")]
        config: Option<PathBuf>,

        /// Also compute the Pareto front over the configured objectives
        #[arg(long)]
        pareto: bool,

        /// YAML/JSON mapping of objective name to minimize|maximize
        #[arg(long)]
        senses: Option<PathBuf>,

        /// Objective sense override, NAME=minimize|maximize (repeatable)
        #[arg(long = "sense")]
        sense: Vec<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Indices of non-dominated iterations
    Pareto {
        /// Optimization log (.json, .xlsx, .xls, .ods)
        table: PathBuf,

        /// Variable configuration YAML (objectives used when none are given)
        #[arg(short, long, env = "MOO_CONFIG")]
        config: Option<PathBuf>,

        /// Objective column (repeatable)
        #[arg(short, long = "objective")]
        objectives: Vec<String>,

        /// YAML/JSON mapping of objective name to minimize|maximize
        #[arg(long)]
        senses: Option<PathBuf>,

        /// Objective sense override, NAME=minimize|maximize (repeatable)
        #[arg(long = "sense")]
        sense: Vec<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show every value of one iteration
    Detail {
        /// Optimization log (.json, .xlsx, .xls, .ods)
        table: PathBuf,

        /// Zero-based iteration (row) index
        iteration: usize,

        /// Variable configuration YAML
        #[arg(short, long, env = "MOO_CONFIG")]
        config: Option<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "moo_explorer=debug"
    } else {
        "moo_explorer=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> MooResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Inspect {
            table,
            config,
            sample_size,
        } => cli::inspect(table, config, sample_size),

        Commands::Resolve {
            table,
            variables,
            config,
            pareto,
            senses,
            sense,
            json,
        } => cli::resolve(table, config, variables, pareto, senses, sense, json),

        Commands::Pareto {
            table,
            config,
            objectives,
            senses,
            sense,
            json,
        } => cli::pareto(table, config, objectives, senses, sense, json),

        Commands::Detail {
            table,
            iteration,
            config,
            json,
        } => cli::detail(table, config, iteration, json),
    }
}
