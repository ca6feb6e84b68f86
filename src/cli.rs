//! The command line interface for the program.
use crate::cost::CostSummaryRow;
use crate::input::include::resolve_includes;
use crate::input::read_yaml_value;
use crate::log;
use crate::output::{create_output_directory, get_output_dir, write_resolved, write_summary};
use crate::plant::PlantConfig;
use crate::settings::Settings;
use crate::units::Money;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::fmt::Write;
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the program.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the summary command
#[derive(Args)]
pub struct SummaryOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Load and validate a plant configuration file.
    Validate {
        /// Path to the plant configuration file.
        config_file: PathBuf,
    },
    /// Summarise the capacity and cost of each technology in a plant.
    Summary {
        /// Path to the plant configuration file.
        config_file: PathBuf,
        /// Other summary options
        #[command(flatten)]
        opts: SummaryOpts,
    },
    /// Print a plant configuration file with all includes expanded.
    Resolve {
        /// Path to the plant configuration file.
        config_file: PathBuf,
    },
    /// Manage example plant configurations.
    Example {
        /// The available subcommands for managing examples.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Manage the program settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Validate { config_file } => handle_validate_command(&config_file, None),
            Self::Summary { config_file, opts } => {
                handle_summary_command(&config_file, &opts, None)
            }
            Self::Resolve { config_file } => handle_resolve_command(&config_file),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ hybrid-plant --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `validate` command.
pub fn handle_validate_command(config_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // We don't save log files when validating
    log::init(Some(&settings.log_level), None).context("Failed to initialise logging.")?;

    PlantConfig::from_path(config_path).context("Failed to validate plant configuration.")?;
    info!("Plant configuration is valid: {}", config_path.display());

    Ok(())
}

/// Handle the `summary` command.
pub fn handle_summary_command(
    config_path: &Path,
    opts: &SummaryOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(config_path)?;
        &pathbuf
    };

    let overwrite = create_output_directory(output_path, opts.overwrite || settings.overwrite)
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    log::init(Some(&settings.log_level), Some(output_path))
        .context("Failed to initialise logging.")?;

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let resolved = read_yaml_value(config_path).context("Failed to load plant configuration.")?;
    let plant = PlantConfig::from_resolved(config_path, &resolved)
        .context("Failed to load plant configuration.")?;
    let rows = plant.summary();
    print!("{}", format_summary_table(&rows));

    write_summary(output_path, &rows)?;
    write_resolved(output_path, &resolved)?;
    info!("Summary written to {}", output_path.display());

    Ok(())
}

/// Handle the `resolve` command.
///
/// The logger is not initialised, so that only the document is written to stdout.
pub fn handle_resolve_command(config_path: &Path) -> Result<()> {
    let value = resolve_includes(config_path).context("Failed to resolve plant configuration.")?;
    print!("{}", serde_yaml::to_string(&value)?);

    Ok(())
}

/// Format an optional amount of money in millions of USD
fn format_million(value: Option<Money>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v.value() / 1e6))
}

/// Format summary rows as a plain-text table
fn format_summary_table(rows: &[CostSummaryRow]) -> String {
    let mut out = format!(
        "{:<10}{:>14}{:>14}{:>16}{:>16}{:>16}\n",
        "tech", "power (MW)", "energy (MWh)", "capex ($M)", "O&M ($M/yr)", "annualised ($M)"
    );
    for row in rows {
        let energy = row
            .energy_capacity_kwh
            .map_or_else(|| "-".to_string(), |e| format!("{:.1}", e.as_mwh()));
        writeln!(
            &mut out,
            "{:<10}{:>14.1}{:>14}{:>16}{:>16}{:>16}",
            row.technology,
            row.rated_power_kw.as_mw(),
            energy,
            format_million(row.installed_cost),
            format_million(row.annual_om_cost),
            format_million(row.annualised_installed_cost),
        )
        .unwrap();
    }

    out
}
